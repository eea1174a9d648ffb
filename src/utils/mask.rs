use sha2::{Digest, Sha256};
use std::collections::HashMap;

/// Deterministic pseudonym for `value` under `key`, e.g. `p-3fa1c09b`.
pub fn pseudonym(key: &str, value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update([0u8]);
    hasher.update(value.as_bytes());
    let digest = hasher.finalize();

    let hex: String = digest[..4].iter().map(|b| format!("{:02x}", b)).collect();
    format!("p-{}", hex)
}

/// Caller-owned memo of pseudonyms for log output.
#[derive(Debug, Clone, Default)]
pub struct Pseudonymizer {
    key: Option<String>,
    cache: HashMap<String, String>,
}

impl Pseudonymizer {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            cache: HashMap::new(),
        }
    }

    pub fn disabled() -> Self {
        Self::default()
    }

    pub fn from_key(key: Option<String>) -> Self {
        match key {
            Some(key) if !key.is_empty() => Self::new(key),
            _ => Self::disabled(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.key.is_some()
    }

    pub fn mask(&mut self, value: &str) -> String {
        let Some(key) = &self.key else {
            return value.to_string();
        };

        self.cache
            .entry(value.to_string())
            .or_insert_with(|| pseudonym(key, value))
            .clone()
    }
}
