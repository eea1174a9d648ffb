use crate::utils::error::{Result, SantaError};
use regex::Regex;
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9.!#$%&'*+/=?^_`{|}~-]+@[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?(?:\.[A-Za-z0-9](?:[A-Za-z0-9-]{0,61}[A-Za-z0-9])?)+$")
        .expect("email pattern is valid")
});

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(SantaError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_path(field_name: &str, path: &str) -> Result<()> {
    if path.is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path cannot be empty".to_string(),
        });
    }

    if path.contains('\0') {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: path.to_string(),
            reason: "Path contains null bytes".to_string(),
        });
    }

    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

/// Syntactic check only; deliverability is the mail provider's problem.
/// Surrounding whitespace is rejected, not ignored: the value is sent as-is.
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    if !EMAIL_RE.is_match(value) {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Not a valid email address".to_string(),
        });
    }
    Ok(())
}

/// Returns the first name that appears more than once, if any.
pub fn find_duplicate<'a, I>(names: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut seen = HashSet::new();
    names.into_iter().find(|name| !seen.insert(*name))
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(SantaError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("OPENAI_BASE_URL", "https://api.openai.com/v1").is_ok());
        assert!(validate_url("OPENAI_BASE_URL", "http://localhost:8080").is_ok());
        assert!(validate_url("OPENAI_BASE_URL", "").is_err());
        assert!(validate_url("OPENAI_BASE_URL", "invalid-url").is_err());
        assert!(validate_url("OPENAI_BASE_URL", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "alice@example.com").is_ok());
        assert!(validate_email("email", "first.last+tag@mail.example.co.uk").is_ok());
        assert!(validate_email("email", "").is_err());
        assert!(validate_email("email", "alice").is_err());
        assert!(validate_email("email", "alice@localhost").is_err());
        assert!(validate_email("email", "alice @example.com").is_err());
        assert!(validate_email("email", "alice@@example.com").is_err());
        assert!(validate_email("email", " alice@example.com").is_err());
        assert!(validate_email("email", "alice@example.com\n").is_err());
    }

    #[test]
    fn test_find_duplicate() {
        assert_eq!(find_duplicate(["Ann", "Bob", "Cy"]), None);
        assert_eq!(find_duplicate(["Ann", "Bob", "Ann"]), Some("Ann"));
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("delivery.delay_ms", 2000u64, 0, 60_000).is_ok());
        assert!(validate_range("delivery.delay_ms", 90_000u64, 0, 60_000).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("name", "Ann").is_ok());
        assert!(validate_non_empty_string("name", "   ").is_err());
    }
}
