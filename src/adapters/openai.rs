use crate::config::env::OpenAiSettings;
use crate::config::toml_config::{EventConfig, GenerationConfig};
use crate::core::{ImageGenerator, MessageGenerator};
use crate::utils::error::{Result, SantaError};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use reqwest::{header, Client, Response};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

const PROVIDER: &str = "OpenAI";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

const SYSTEM_PROMPT: &str = "You are a cheerful Christmas elf who writes short, warm Secret Santa \
announcements. Write in plain text, no markdown, under 150 words. Address the gifter by name, \
reveal who they are buying for, and suggest two or three gift ideas that fit the recipient's interests.";

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize)]
struct ImageData {
    b64_json: Option<String>,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    message: String,
}

/// Chat completions for messages, image generations for illustrations.
#[derive(Clone)]
pub struct OpenAiClient {
    client: Client,
    settings: OpenAiSettings,
    generation: GenerationConfig,
    event: EventConfig,
}

impl OpenAiClient {
    pub fn new(
        settings: OpenAiSettings,
        generation: GenerationConfig,
        event: EventConfig,
    ) -> Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            settings,
            generation,
            event,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.settings.base_url.trim_end_matches('/'), path)
    }

    pub fn user_prompt(&self, gifter_name: &str, giftee_name: &str, giftee_description: &str) -> String {
        let mut prompt = format!(
            "Write a Secret Santa message to {}. They are the Secret Santa for {}. \
             About {}: {}.",
            gifter_name, giftee_name, giftee_name, giftee_description
        );
        if let Some(name) = &self.event.name {
            prompt.push_str(&format!(" The event is \"{}\".", name));
        }
        if let Some(budget) = &self.event.budget {
            prompt.push_str(&format!(" The gift budget is {}.", budget));
        }
        if let Some(date) = &self.event.exchange_date {
            prompt.push_str(&format!(" Gifts are exchanged on {}.", date));
        }
        prompt
    }

    pub fn image_prompt(description: &str) -> String {
        format!(
            "A whimsical, festive watercolor illustration of a wrapped Christmas present \
             surrounded by hints of the recipient's interests: {}. Cozy winter colors, no text, no letters.",
            description
        )
    }

    /// Turns a non-2xx response into a provider error, keeping OpenAI's own message if present.
    async fn check(response: Response) -> Result<Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let message = serde_json::from_str::<ErrorEnvelope>(&body)
            .map(|e| e.error.message)
            .unwrap_or_else(|_| status.canonical_reason().unwrap_or("request failed").to_string());
        Err(SantaError::provider(PROVIDER, Some(status.as_u16()), message))
    }
}

#[async_trait]
impl MessageGenerator for OpenAiClient {
    async fn generate_message(
        &self,
        gifter_name: &str,
        giftee_name: &str,
        giftee_description: &str,
    ) -> Result<String> {
        let body = json!({
            "model": self.generation.model,
            "temperature": 0.9,
            "messages": [
                {"role": "system", "content": SYSTEM_PROMPT},
                {"role": "user", "content": self.user_prompt(gifter_name, giftee_name, giftee_description)},
            ],
        });

        tracing::debug!("Requesting message from {}", self.generation.model);
        let response = self
            .client
            .post(self.endpoint("chat/completions"))
            .bearer_auth(&self.settings.api_key)
            .header(header::CONTENT_TYPE, "application/json")
            .json(&body)
            .send()
            .await?;

        let parsed: ChatResponse = Self::check(response).await?.json().await?;
        let message = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .map(|content| content.trim().to_string())
            .unwrap_or_default();

        if message.is_empty() {
            return Err(SantaError::provider(PROVIDER, None, "response contained no message text"));
        }
        Ok(message)
    }
}

#[async_trait]
impl ImageGenerator for OpenAiClient {
    async fn generate_image(&self, description: &str) -> Result<Vec<u8>> {
        let body = json!({
            "model": self.generation.image_model,
            "prompt": Self::image_prompt(description),
            "n": 1,
            "size": self.generation.image_size,
            "response_format": "b64_json",
        });

        tracing::debug!("Requesting image from {}", self.generation.image_model);
        let response = self
            .client
            .post(self.endpoint("images/generations"))
            .bearer_auth(&self.settings.api_key)
            .json(&body)
            .send()
            .await?;

        let parsed: ImageResponse = Self::check(response).await?.json().await?;
        let encoded = parsed
            .data
            .into_iter()
            .next()
            .and_then(|d| d.b64_json)
            .ok_or_else(|| SantaError::provider(PROVIDER, None, "response contained no image data"))?;

        STANDARD
            .decode(encoded.as_bytes())
            .map_err(|e| SantaError::provider(PROVIDER, None, format!("image payload is not valid base64: {}", e)))
    }
}
