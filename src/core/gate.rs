use crate::config::env::{DeliveryProvider, Environment, OPENAI_API_KEY};
use crate::domain::model::RunMode;
use crate::domain::ports::Notifier;
use crate::utils::error::{Result, SantaError};

/// Variables a run cannot start without. Delivery credentials only matter live.
pub fn required_variables(mode: RunMode, provider: DeliveryProvider) -> Vec<&'static str> {
    let mut required = vec![OPENAI_API_KEY];
    if !mode.dry_run {
        for key in provider.required_variables() {
            if !required.contains(key) {
                required.push(*key);
            }
        }
    }
    required
}

/// Fails with every missing variable at once, not just the first.
pub fn check_environment(env: &Environment, mode: RunMode, provider: DeliveryProvider) -> Result<()> {
    let missing = env.missing(&required_variables(mode, provider));
    if missing.is_empty() {
        tracing::debug!("✅ Environment has every required variable");
        Ok(())
    } else {
        Err(SantaError::MissingEnvironmentError { missing })
    }
}

/// Pre-flight check against the delivery channel.
pub async fn verify_channel(notifier: &dyn Notifier) -> Result<()> {
    tracing::info!("🔌 Verifying email delivery channel");
    notifier.verify_connection().await.map_err(|e| match e {
        SantaError::VerificationError { .. } => e,
        other => SantaError::verification(other.to_string()),
    })?;
    tracing::info!("✅ Delivery channel is reachable");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::env::{EMAIL_FROM, MAIL_API_KEY, SMTP_HOST, SMTP_PASS, SMTP_USER};

    const DRY: RunMode = RunMode { dry_run: true, skip_images: false };
    const LIVE: RunMode = RunMode { dry_run: false, skip_images: false };

    #[test]
    fn test_dry_run_needs_only_ai_key() {
        assert_eq!(required_variables(DRY, DeliveryProvider::Smtp), vec![OPENAI_API_KEY]);

        let env = Environment::from_pairs([(OPENAI_API_KEY, "sk-test")]);
        assert!(check_environment(&env, DRY, DeliveryProvider::Smtp).is_ok());
    }

    #[test]
    fn test_live_smtp_reports_every_missing_variable() {
        let env = Environment::from_pairs([(SMTP_USER, "santa")]);
        let err = check_environment(&env, LIVE, DeliveryProvider::Smtp).unwrap_err();

        match err {
            SantaError::MissingEnvironmentError { missing } => {
                assert_eq!(missing, vec![OPENAI_API_KEY, SMTP_HOST, SMTP_PASS, EMAIL_FROM]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_live_http_requirements() {
        assert_eq!(
            required_variables(LIVE, DeliveryProvider::Http),
            vec![OPENAI_API_KEY, MAIL_API_KEY, EMAIL_FROM]
        );

        let env = Environment::from_pairs([
            (OPENAI_API_KEY, "sk-test"),
            (MAIL_API_KEY, "re_test"),
            (EMAIL_FROM, "santa@example.com"),
        ]);
        assert!(check_environment(&env, LIVE, DeliveryProvider::Http).is_ok());
    }
}
