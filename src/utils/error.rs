use std::fmt;
use thiserror::Error;

/// The step of per-assignment processing that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    MessageGeneration,
    ImageGeneration,
    Delivery,
    ArtifactWrite,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Stage::MessageGeneration => "message generation",
            Stage::ImageGeneration => "image generation",
            Stage::Delivery => "delivery",
            Stage::ArtifactWrite => "artifact write",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum SantaError {
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required environment variables: {}", missing.join(", "))]
    MissingEnvironmentError { missing: Vec<String> },

    #[error("Invalid value for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Invalid participants: {message}")]
    InvalidInputError { message: String },

    #[error("{provider} returned an error{}: {message}", status.map(|s| format!(" (HTTP {s})")).unwrap_or_default())]
    ProviderError {
        provider: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("{stage} failed for {gifter}: {message}")]
    CollaboratorError {
        stage: Stage,
        gifter: String,
        message: String,
    },

    #[error("Delivery channel verification failed: {message}")]
    VerificationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Collaborator,
    Verification,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Medium,
    High,
    Critical,
}

impl SantaError {
    pub fn config(message: impl Into<String>) -> Self {
        SantaError::ConfigError {
            message: message.into(),
        }
    }

    pub fn invalid_input(message: impl Into<String>) -> Self {
        SantaError::InvalidInputError {
            message: message.into(),
        }
    }

    pub fn collaborator(stage: Stage, gifter: impl Into<String>, message: impl Into<String>) -> Self {
        SantaError::CollaboratorError {
            stage,
            gifter: gifter.into(),
            message: message.into(),
        }
    }

    pub fn provider(provider: &'static str, status: Option<u16>, message: impl Into<String>) -> Self {
        SantaError::ProviderError {
            provider,
            status,
            message: message.into(),
        }
    }

    pub fn verification(message: impl Into<String>) -> Self {
        SantaError::VerificationError {
            message: message.into(),
        }
    }

    /// Re-labels a bare adapter failure with the stage and gifter it happened under.
    /// Errors that already carry an assignment are left alone.
    pub fn during(self, stage: Stage, gifter: &str) -> Self {
        match self {
            SantaError::CollaboratorError { .. } => self,
            other => SantaError::collaborator(stage, gifter, other.to_string()),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            SantaError::ConfigError { .. }
            | SantaError::MissingEnvironmentError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::TomlError(_) => ErrorCategory::Configuration,
            SantaError::InvalidInputError { .. } => ErrorCategory::Input,
            SantaError::CollaboratorError { .. }
            | SantaError::ProviderError { .. }
            | SantaError::HttpError(_) => ErrorCategory::Collaborator,
            SantaError::VerificationError { .. } => ErrorCategory::Verification,
            SantaError::IoError(_) | SantaError::SerializationError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Collaborator | ErrorCategory::Verification => ErrorSeverity::Medium,
            ErrorCategory::Configuration | ErrorCategory::Input => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// Short sentence for the console; never includes generated content.
    pub fn user_friendly_message(&self) -> String {
        match self {
            SantaError::MissingEnvironmentError { missing } => {
                format!("Missing environment variables: {}", missing.join(", "))
            }
            SantaError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
            SantaError::CollaboratorError { stage, gifter, .. } => {
                format!("The run stopped during {} for {}", stage, gifter)
            }
            SantaError::VerificationError { .. } => {
                "Could not reach the email delivery channel".to_string()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            SantaError::MissingEnvironmentError { .. } => {
                "Set the listed variables in your shell or in a .env file"
            }
            SantaError::ConfigError { .. }
            | SantaError::InvalidConfigValueError { .. }
            | SantaError::TomlError(_) => "Check santa.toml against the documented format",
            SantaError::InvalidInputError { .. } => {
                "Add at least three participants and give each one a unique name"
            }
            SantaError::CollaboratorError { stage, .. } => match stage {
                Stage::MessageGeneration | Stage::ImageGeneration => {
                    "Check the AI provider key and quota, then rerun the whole exchange"
                }
                Stage::Delivery => "Check the email provider status, then rerun the whole exchange",
                Stage::ArtifactWrite => "Check that the output directory is writable",
            },
            SantaError::HttpError(_) | SantaError::ProviderError { .. } => {
                "Check network connectivity and provider status, then rerun"
            }
            SantaError::VerificationError { .. } => {
                "Check the SMTP or mail API credentials and that the server is reachable"
            }
            SantaError::IoError(_) | SantaError::SerializationError(_) => {
                "Check file permissions and available disk space"
            }
        }
    }
}

pub type Result<T> = std::result::Result<T, SantaError>;
