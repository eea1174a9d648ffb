use crate::utils::error::{Result, SantaError};
use crate::utils::validation::validate_url;
use std::collections::HashMap;

pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
pub const SMTP_HOST: &str = "SMTP_HOST";
pub const SMTP_PORT: &str = "SMTP_PORT";
pub const SMTP_USER: &str = "SMTP_USER";
pub const SMTP_PASS: &str = "SMTP_PASS";
pub const EMAIL_FROM: &str = "EMAIL_FROM";
pub const MAIL_API_KEY: &str = "MAIL_API_KEY";
pub const MAIL_API_URL: &str = "MAIL_API_URL";
pub const SANTA_MASK_KEY: &str = "SANTA_MASK_KEY";

pub const DEFAULT_OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MAIL_API_URL: &str = "https://api.resend.com";
pub const DEFAULT_SMTP_PORT: u16 = 587;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryProvider {
    #[default]
    Smtp,
    Http,
}

impl DeliveryProvider {
    pub fn required_variables(self) -> &'static [&'static str] {
        match self {
            DeliveryProvider::Smtp => &[SMTP_HOST, SMTP_USER, SMTP_PASS, EMAIL_FROM],
            DeliveryProvider::Http => &[MAIL_API_KEY, EMAIL_FROM],
        }
    }
}

/// Snapshot of the variables the run reads. Blank values count as unset.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: HashMap<String, String>,
}

impl Environment {
    /// Loads `.env` if one exists, then reads the process environment.
    pub fn load() -> Self {
        match dotenvy::dotenv() {
            Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!("⚠️ Ignoring unreadable .env file: {}", e),
        }
        Self::from_pairs(std::env::vars())
    }

    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.vars
            .get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    fn require(&self, key: &str) -> Result<String> {
        self.get(key)
            .map(str::to_string)
            .ok_or_else(|| SantaError::MissingEnvironmentError {
                missing: vec![key.to_string()],
            })
    }

    /// Every key in `keys` that is unset, in the order given.
    pub fn missing(&self, keys: &[&str]) -> Vec<String> {
        keys.iter()
            .filter(|key| self.get(key).is_none())
            .map(|key| key.to_string())
            .collect()
    }

    pub fn mask_key(&self) -> Option<String> {
        self.get(SANTA_MASK_KEY).map(str::to_string)
    }

    pub fn openai(&self) -> Result<OpenAiSettings> {
        let base_url = self
            .get(OPENAI_BASE_URL)
            .unwrap_or(DEFAULT_OPENAI_BASE_URL)
            .to_string();
        validate_url(OPENAI_BASE_URL, &base_url)?;

        Ok(OpenAiSettings {
            api_key: self.require(OPENAI_API_KEY)?,
            base_url,
        })
    }

    pub fn smtp(&self) -> Result<SmtpSettings> {
        let port = match self.get(SMTP_PORT) {
            Some(raw) => raw.parse::<u16>().map_err(|_| SantaError::InvalidConfigValueError {
                field: SMTP_PORT.to_string(),
                value: raw.to_string(),
                reason: "Expected a port number".to_string(),
            })?,
            None => DEFAULT_SMTP_PORT,
        };

        Ok(SmtpSettings {
            host: self.require(SMTP_HOST)?,
            port,
            username: self.require(SMTP_USER)?,
            password: self.require(SMTP_PASS)?,
            from: self.require(EMAIL_FROM)?,
        })
    }

    pub fn http_mail(&self) -> Result<HttpMailSettings> {
        let base_url = self
            .get(MAIL_API_URL)
            .unwrap_or(DEFAULT_MAIL_API_URL)
            .to_string();
        validate_url(MAIL_API_URL, &base_url)?;

        Ok(HttpMailSettings {
            api_key: self.require(MAIL_API_KEY)?,
            base_url,
            from: self.require(EMAIL_FROM)?,
        })
    }
}

#[derive(Clone)]
pub struct OpenAiSettings {
    pub api_key: String,
    pub base_url: String,
}

#[derive(Clone)]
pub struct SmtpSettings {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub from: String,
}

#[derive(Clone)]
pub struct HttpMailSettings {
    pub api_key: String,
    pub base_url: String,
    pub from: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_values_are_missing() {
        let env = Environment::from_pairs([(OPENAI_API_KEY, "  "), (SMTP_HOST, "mail.example.com")]);
        assert_eq!(env.get(OPENAI_API_KEY), None);
        assert_eq!(env.missing(&[OPENAI_API_KEY, SMTP_HOST, SMTP_USER]), vec![OPENAI_API_KEY, SMTP_USER]);
    }

    #[test]
    fn test_openai_defaults_base_url() {
        let env = Environment::from_pairs([(OPENAI_API_KEY, "sk-test")]);
        let settings = env.openai().unwrap();
        assert_eq!(settings.base_url, DEFAULT_OPENAI_BASE_URL);
        assert_eq!(settings.api_key, "sk-test");
    }

    #[test]
    fn test_openai_rejects_bad_base_url() {
        let env = Environment::from_pairs([(OPENAI_API_KEY, "sk-test"), (OPENAI_BASE_URL, "not a url")]);
        assert!(env.openai().is_err());
    }

    #[test]
    fn test_smtp_port_parsing() {
        let base = [
            (SMTP_HOST, "smtp.example.com"),
            (SMTP_USER, "santa"),
            (SMTP_PASS, "hohoho"),
            (EMAIL_FROM, "Santa <santa@example.com>"),
        ];
        let env = Environment::from_pairs(base);
        assert_eq!(env.smtp().unwrap().port, DEFAULT_SMTP_PORT);

        let env = Environment::from_pairs(base.into_iter().chain([(SMTP_PORT, "465")]));
        assert_eq!(env.smtp().unwrap().port, 465);

        let env = Environment::from_pairs(base.into_iter().chain([(SMTP_PORT, "smtp")]));
        assert!(env.smtp().is_err());
    }
}
