pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::adapters::{openai::OpenAiClient, storage::LocalStorage};
pub use crate::config::env::{DeliveryProvider, Environment};
pub use crate::config::toml_config::SantaConfig;
pub use crate::core::{
    assignment::assign, delivery::Delivery, engine::SantaEngine, pipeline::SantaPipeline,
};
pub use crate::domain::model::{Assignment, GeneratedContent, Participant, RunMode, RunSummary};
pub use crate::utils::error::{Result, SantaError};
