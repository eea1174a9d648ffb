use crate::adapters::template::{render_email, IMAGE_CID};
use crate::config::env::HttpMailSettings;
use crate::config::toml_config::EventConfig;
use crate::core::{Notifier, Participant};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;

const PROVIDER: &str = "Mail API";

/// Transactional mail over a JSON HTTP API (Resend-compatible).
pub struct HttpMailNotifier {
    client: Client,
    settings: HttpMailSettings,
    event: EventConfig,
}

impl HttpMailNotifier {
    pub fn new(settings: HttpMailSettings, event: EventConfig) -> Result<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            client,
            settings,
            event,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    pub fn payload(
        &self,
        gifter: &Participant,
        giftee: &Participant,
        message: &str,
        image: &[u8],
    ) -> Result<Value> {
        let email = render_email(&self.event, gifter, giftee, message, !image.is_empty())?;

        let mut payload = json!({
            "from": self.settings.from,
            "to": [gifter.email],
            "subject": email.subject,
            "html": email.html,
            "text": email.text,
        });

        if !image.is_empty() {
            payload["attachments"] = json!([{
                "filename": "secret-santa.png",
                "content": STANDARD.encode(image),
                "content_type": "image/png",
                "content_id": IMAGE_CID,
            }]);
        }

        Ok(payload)
    }
}

#[async_trait]
impl Notifier for HttpMailNotifier {
    async fn verify_connection(&self) -> Result<()> {
        let response = self
            .client
            .get(self.endpoint("domains"))
            .bearer_auth(&self.settings.api_key)
            .send()
            .await
            .map_err(|e| SantaError::verification(e.to_string()))?;

        let status = response.status();
        if status.is_success() {
            Ok(())
        } else {
            Err(SantaError::verification(format!(
                "mail API answered HTTP {}",
                status.as_u16()
            )))
        }
    }

    async fn send_personalized_notification(
        &self,
        gifter: &Participant,
        giftee: &Participant,
        message: &str,
        image: &[u8],
    ) -> Result<()> {
        let payload = self.payload(gifter, giftee, message, image)?;

        let response = self
            .client
            .post(self.endpoint("emails"))
            .bearer_auth(&self.settings.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body: Value = response.json().await.unwrap_or(Value::Null);
            let reason = body
                .get("message")
                .and_then(Value::as_str)
                .unwrap_or("request rejected")
                .to_string();
            return Err(SantaError::provider(PROVIDER, Some(status.as_u16()), reason));
        }

        tracing::debug!("Mail API accepted message (HTTP {})", status.as_u16());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn notifier(base_url: String) -> HttpMailNotifier {
        HttpMailNotifier::new(
            HttpMailSettings {
                api_key: "re_test".to_string(),
                base_url,
                from: "santa@example.com".to_string(),
            },
            EventConfig::default(),
        )
        .unwrap()
    }

    fn pair() -> (Participant, Participant) {
        (
            Participant::new("Ann", "ann@example.com", "likes jazz"),
            Participant::new("Bob", "bob@example.com", "likes tea"),
        )
    }

    #[test]
    fn test_payload_attaches_image_only_when_present() {
        let mail = notifier("http://localhost".to_string());
        let (ann, bob) = pair();

        let without = mail.payload(&ann, &bob, "Hi", &[]).unwrap();
        assert!(without.get("attachments").is_none());
        assert_eq!(without["to"][0], "ann@example.com");

        let with = mail.payload(&ann, &bob, "Hi", &[1, 2, 3]).unwrap();
        assert_eq!(with["attachments"][0]["content"], STANDARD.encode([1u8, 2, 3]));
        assert_eq!(with["attachments"][0]["content_id"], IMAGE_CID);
    }

    #[tokio::test]
    async fn test_send_posts_to_emails_endpoint() {
        let server = MockServer::start();
        let send_mock = server.mock(|when, then| {
            when.method(POST)
                .path("/emails")
                .header("authorization", "Bearer re_test")
                .body_contains("ann@example.com");
            then.status(200)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"id": "email_123"}));
        });

        let (ann, bob) = pair();
        notifier(server.url(""))
            .send_personalized_notification(&ann, &bob, "Ho ho ho!", &[])
            .await
            .unwrap();

        send_mock.assert();
    }

    #[tokio::test]
    async fn test_send_failure_carries_status() {
        let server = MockServer::start();
        server.mock(|when, then| {
            when.method(POST).path("/emails");
            then.status(422)
                .header("Content-Type", "application/json")
                .json_body(serde_json::json!({"statusCode": 422, "message": "Invalid `to` field"}));
        });

        let (ann, bob) = pair();
        let err = notifier(server.url(""))
            .send_personalized_notification(&ann, &bob, "Ho ho ho!", &[])
            .await
            .unwrap_err();

        match err {
            SantaError::ProviderError { status, message, .. } => {
                assert_eq!(status, Some(422));
                assert_eq!(message, "Invalid `to` field");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_verify_connection() {
        let server = MockServer::start();
        let domains_mock = server.mock(|when, then| {
            when.method(GET).path("/domains");
            then.status(200).json_body(serde_json::json!({"data": []}));
        });
        assert!(notifier(server.url("")).verify_connection().await.is_ok());
        domains_mock.assert();

        let failing = MockServer::start();
        failing.mock(|when, then| {
            when.method(GET).path("/domains");
            then.status(401);
        });
        assert!(matches!(
            notifier(failing.url("")).verify_connection().await,
            Err(SantaError::VerificationError { .. })
        ));
    }
}
