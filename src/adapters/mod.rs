// Adapters layer: concrete implementations for external systems (AI provider, mail, filesystem).

pub mod http_mail;
pub mod openai;
pub mod smtp;
pub mod storage;
pub mod template;

use crate::config::env::{DeliveryProvider, Environment};
use crate::config::toml_config::EventConfig;
use crate::core::Notifier;
use crate::utils::error::Result;

/// Builds the delivery channel the config asks for.
pub fn build_notifier(
    provider: DeliveryProvider,
    env: &Environment,
    event: &EventConfig,
) -> Result<Box<dyn Notifier>> {
    match provider {
        DeliveryProvider::Smtp => Ok(Box::new(smtp::SmtpNotifier::new(env.smtp()?, event.clone())?)),
        DeliveryProvider::Http => Ok(Box::new(http_mail::HttpMailNotifier::new(
            env.http_mail()?,
            event.clone(),
        )?)),
    }
}
