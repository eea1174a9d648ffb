use crate::adapters::template::{render_email, IMAGE_CID};
use crate::config::env::SmtpSettings;
use crate::config::toml_config::EventConfig;
use crate::core::{Notifier, Participant};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::{Attachment, Mailbox, MultiPart, SinglePart};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

const PROVIDER: &str = "SMTP";

fn smtp_error(e: impl std::fmt::Display) -> SantaError {
    SantaError::provider(PROVIDER, None, e.to_string())
}

fn mailbox(field: &str, value: &str) -> Result<Mailbox> {
    value
        .parse::<Mailbox>()
        .map_err(|e| SantaError::InvalidConfigValueError {
            field: field.to_string(),
            value: value.to_string(),
            reason: format!("Not a usable mailbox: {}", e),
        })
}

/// STARTTLS relay with username/password auth.
pub struct SmtpNotifier {
    transport: AsyncSmtpTransport<Tokio1Executor>,
    from: Mailbox,
    event: EventConfig,
}

impl SmtpNotifier {
    pub fn new(settings: SmtpSettings, event: EventConfig) -> Result<Self> {
        let from = mailbox("EMAIL_FROM", &settings.from)?;
        let transport = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&settings.host)
            .map_err(smtp_error)?
            .port(settings.port)
            .credentials(Credentials::new(settings.username, settings.password))
            .build();

        Ok(Self {
            transport,
            from,
            event,
        })
    }

    pub fn build_message(
        &self,
        gifter: &Participant,
        giftee: &Participant,
        message: &str,
        image: &[u8],
    ) -> Result<Message> {
        let to = Mailbox::new(Some(gifter.name.clone()), gifter.email.parse().map_err(smtp_error)?);
        let email = render_email(&self.event, gifter, giftee, message, !image.is_empty())?;

        let html_part = SinglePart::html(email.html);
        let body = if image.is_empty() {
            MultiPart::alternative()
                .singlepart(SinglePart::plain(email.text))
                .singlepart(html_part)
        } else {
            let png = ContentType::parse("image/png").map_err(smtp_error)?;
            MultiPart::alternative()
                .singlepart(SinglePart::plain(email.text))
                .multipart(
                    MultiPart::related()
                        .singlepart(html_part)
                        .singlepart(Attachment::new_inline(IMAGE_CID.to_string()).body(image.to_vec(), png)),
                )
        };

        Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(email.subject)
            .multipart(body)
            .map_err(smtp_error)
    }
}

#[async_trait]
impl Notifier for SmtpNotifier {
    async fn verify_connection(&self) -> Result<()> {
        match self.transport.test_connection().await {
            Ok(true) => Ok(()),
            Ok(false) => Err(SantaError::verification("SMTP server did not accept the connection")),
            Err(e) => Err(SantaError::verification(e.to_string())),
        }
    }

    async fn send_personalized_notification(
        &self,
        gifter: &Participant,
        giftee: &Participant,
        message: &str,
        image: &[u8],
    ) -> Result<()> {
        let email = self.build_message(gifter, giftee, message, image)?;
        let response = self.transport.send(email).await.map_err(smtp_error)?;
        tracing::debug!("SMTP accepted message: {}", response.code());
        Ok(())
    }
}
