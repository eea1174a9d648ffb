use crate::config::toml_config::EventConfig;
use crate::domain::model::Participant;
use crate::utils::error::{Result, SantaError};
use tera::{Context, Tera};

/// Content-ID the HTML body uses for the inline illustration.
pub const IMAGE_CID: &str = "santa-illustration";

const HTML_TEMPLATE: &str = r#"<!DOCTYPE html>
<html>
<body style="font-family: Georgia, serif; background: #fbf7f0; color: #2b2b2b; padding: 24px;">
  <div style="max-width: 560px; margin: 0 auto; background: #ffffff; border-top: 6px solid #b3141c; padding: 24px;">
    <h1 style="color: #b3141c; margin-top: 0;">🎅 {{ event_name }}</h1>
    <p>Hi {{ gifter }},</p>
    <p>You are the Secret Santa for <strong>{{ giftee }}</strong>!</p>
    {% for paragraph in paragraphs %}<p>{{ paragraph }}</p>
    {% endfor %}
    {% if has_image %}<p style="text-align: center;"><img src="cid:{{ image_cid }}" alt="A festive illustration" style="max-width: 100%;"></p>{% endif %}
    {% if budget or exchange_date %}<p style="font-size: 14px; color: #666;">
      {% if budget %}Budget: {{ budget }}<br>{% endif %}
      {% if exchange_date %}Exchange date: {{ exchange_date }}{% endif %}
    </p>{% endif %}
    <p style="font-size: 13px; color: #888;">Keep it secret! 🤫</p>
  </div>
</body>
</html>
"#;

pub struct RenderedEmail {
    pub subject: String,
    pub html: String,
    pub text: String,
}

pub fn subject(event: &EventConfig) -> String {
    match &event.name {
        Some(name) => format!("🎁 {}: your Secret Santa assignment", name),
        None => "🎁 Your Secret Santa assignment".to_string(),
    }
}

/// Renders the notification body. All interpolated values are HTML-escaped.
pub fn render_email(
    event: &EventConfig,
    gifter: &Participant,
    giftee: &Participant,
    message: &str,
    has_image: bool,
) -> Result<RenderedEmail> {
    let paragraphs: Vec<&str> = message
        .split("\n\n")
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .collect();

    let mut context = Context::new();
    context.insert("event_name", event.name.as_deref().unwrap_or("Secret Santa"));
    context.insert("gifter", &gifter.name);
    context.insert("giftee", &giftee.name);
    context.insert("paragraphs", &paragraphs);
    context.insert("has_image", &has_image);
    context.insert("image_cid", IMAGE_CID);
    context.insert("budget", &event.budget);
    context.insert("exchange_date", &event.exchange_date);

    let html = Tera::one_off(HTML_TEMPLATE, &context, true)
        .map_err(|e| SantaError::config(format!("email template failed to render: {}", e)))?;

    let text = format!(
        "Hi {},\n\nYou are the Secret Santa for {}!\n\n{}\n",
        gifter.name,
        giftee.name,
        message.trim()
    );

    Ok(RenderedEmail {
        subject: subject(event),
        html,
        text,
    })
}
