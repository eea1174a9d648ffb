use crate::config::env::DeliveryProvider;
use crate::domain::model::Participant;
use crate::utils::error::{Result, SantaError};
use crate::utils::validation::{
    find_duplicate, validate_email, validate_non_empty_string, validate_path, validate_range,
    Validate,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const MAX_DELAY_MS: u64 = 60_000;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SantaConfig {
    #[serde(default)]
    pub event: EventConfig,
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub delivery: DeliveryConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub participants: Vec<Participant>,
}

/// Optional details woven into prompts and email subjects.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EventConfig {
    pub name: Option<String>,
    pub budget: Option<String>,
    pub exchange_date: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_image_model")]
    pub image_model: String,
    #[serde(default = "default_image_size")]
    pub image_size: String,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            image_model: default_image_model(),
            image_size: default_image_size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeliveryConfig {
    #[serde(default)]
    pub provider: DeliveryProvider,
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            provider: DeliveryProvider::default(),
            delay_ms: default_delay_ms(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_output_dir")]
    pub dir: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: default_output_dir(),
        }
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_image_model() -> String {
    "dall-e-3".to_string()
}

fn default_image_size() -> String {
    "1024x1024".to_string()
}

fn default_delay_ms() -> u64 {
    2000
}

fn default_output_dir() -> String {
    "./output".to_string()
}

impl SantaConfig {
    /// 從 TOML 檔案載入並驗證配置
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let config = Self::from_file(path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            SantaError::config(format!("cannot read config file '{}': {}", path.display(), e))
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        // 處理環境變數替換
        let processed_content = Self::substitute_env_vars(content);
        let mut config: Self = toml::from_str(&processed_content)?;
        config.normalize();
        Ok(config)
    }

    /// 去除參與者欄位前後空白，之後的驗證與寄送都使用同一個值
    fn normalize(&mut self) {
        for participant in &mut self.participants {
            trim_in_place(&mut participant.name);
            trim_in_place(&mut participant.email);
            trim_in_place(&mut participant.description);
        }
    }

    /// 替換環境變數 (例如 ${OPENAI_API_KEY})，未設定的保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        use std::sync::LazyLock;

        static VAR_RE: LazyLock<Regex> =
            LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("placeholder pattern is valid"));

        // 匹配 ${VAR_NAME} 格式
        VAR_RE
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.participants.is_empty() {
            return Err(SantaError::config("no [[participants]] entries found"));
        }

        for (i, participant) in self.participants.iter().enumerate() {
            validate_non_empty_string(&format!("participants[{}].name", i), &participant.name)?;
            validate_email(&format!("participants[{}].email", i), &participant.email)?;
            validate_non_empty_string(
                &format!("participants[{}].description", i),
                &participant.description,
            )?;
        }

        // 名字重複屬於輸入錯誤，與抽籤時的檢查一致
        if let Some(name) = find_duplicate(self.participants.iter().map(|p| p.name.as_str())) {
            return Err(SantaError::invalid_input(format!(
                "participant name '{}' appears more than once",
                name
            )));
        }

        validate_non_empty_string("generation.model", &self.generation.model)?;
        validate_non_empty_string("generation.image_model", &self.generation.image_model)?;
        // 寄送間隔上限 60 秒
        validate_range("delivery.delay_ms", self.delivery.delay_ms, 0, MAX_DELAY_MS)?;
        validate_path("output.dir", &self.output.dir)?;

        Ok(())
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn delay(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.delivery.delay_ms)
    }
}

fn trim_in_place(value: &mut String) {
    let trimmed = value.trim();
    if trimmed.len() != value.len() {
        *value = trimmed.to_string();
    }
}

impl Validate for SantaConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
[event]
name = "Office Party"
budget = "$25"

[[participants]]
name = "Alice"
email = "alice@example.com"
description = "Loves hiking and dark chocolate"

[[participants]]
name = "Bob"
email = "bob@example.com"
description = "Collects vinyl records"

[[participants]]
name = "Carol"
email = "carol@example.com"
description = "Amateur astronomer"
"#;

    #[test]
    fn test_parse_basic_config_with_defaults() {
        let config = SantaConfig::from_toml_str(BASIC).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.participants().len(), 3);
        assert_eq!(config.event.name.as_deref(), Some("Office Party"));
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(config.delivery.provider, DeliveryProvider::Smtp);
        assert_eq!(config.delay(), std::time::Duration::from_millis(2000));
        assert_eq!(config.output.dir, "./output");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SANTA_TEST_OUTPUT_DIR", "/tmp/santa-out");

        let content = format!("{}\n[output]\ndir = \"${{SANTA_TEST_OUTPUT_DIR}}\"\n", BASIC);
        let config = SantaConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.output.dir, "/tmp/santa-out");

        std::env::remove_var("SANTA_TEST_OUTPUT_DIR");
    }

    #[test]
    fn test_invalid_email_names_the_field() {
        let content = BASIC.replace("bob@example.com", "bob-at-example");
        let config = SantaConfig::from_toml_str(&content).unwrap();

        match config.validate().unwrap_err() {
            SantaError::InvalidConfigValueError { field, .. } => {
                assert_eq!(field, "participants[1].email")
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_empty_description_rejected() {
        let content = BASIC.replace("Amateur astronomer", " ");
        let config = SantaConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_name_is_a_parse_error() {
        let content = r#"
[[participants]]
email = "alice@example.com"
description = "Hiking"
"#;
        let err = SantaConfig::from_toml_str(content).unwrap_err();
        assert!(matches!(err, SantaError::TomlError(_)));
    }

    #[test]
    fn test_duplicate_names_rejected() {
        let content = BASIC.replace("name = \"Carol\"", "name = \"Alice\"");
        let config = SantaConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(SantaError::InvalidInputError { .. })
        ));
    }

    #[test]
    fn test_names_differing_only_by_padding_are_duplicates() {
        let content = BASIC.replace("name = \"Carol\"", "name = \" Alice \"");
        let config = SantaConfig::from_toml_str(&content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(SantaError::InvalidInputError { .. })
        ));
    }

    #[test]
    fn test_participant_fields_are_stored_trimmed() {
        let content = BASIC
            .replace("\"alice@example.com\"", "\" alice@example.com \"")
            .replace("\"Bob\"", "\"  Bob\"");
        let config = SantaConfig::from_toml_str(&content).unwrap();

        assert!(config.validate().is_ok());
        assert_eq!(config.participants()[0].email, "alice@example.com");
        assert_eq!(config.participants()[1].name, "Bob");
    }

    #[test]
    fn test_no_participants_rejected() {
        let config = SantaConfig::from_toml_str("[event]\nname = \"Empty\"\n").unwrap();
        assert!(matches!(config.validate(), Err(SantaError::ConfigError { .. })));
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let content = format!("{}\n[delivery]\nprovider = \"fax\"\n", BASIC);
        assert!(SantaConfig::from_toml_str(&content).is_err());
    }

    #[test]
    fn test_load_twice_yields_equal_participants() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let first = SantaConfig::load(temp_file.path()).unwrap();
        let second = SantaConfig::load(temp_file.path()).unwrap();
        assert_eq!(first.participants(), second.participants());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = SantaConfig::load("/definitely/not/here/santa.toml").unwrap_err();
        assert!(matches!(err, SantaError::ConfigError { .. }));
    }
}
