use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    pub name: String,
    pub email: String,
    pub description: String,
}

impl Participant {
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            description: description.into(),
        }
    }
}

/// One gifter buying for one giftee. Only `core::assignment` builds these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub gifter: Participant,
    pub giftee: Participant,
}

#[derive(Debug, Clone, Default)]
pub struct GeneratedContent {
    pub message: String,
    /// Empty when image generation is skipped.
    pub image: Vec<u8>,
}

impl GeneratedContent {
    pub fn has_image(&self) -> bool {
        !self.image.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RunMode {
    pub dry_run: bool,
    pub skip_images: bool,
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let delivery = if self.dry_run { "dry run" } else { "live" };
        if self.skip_images {
            write!(f, "{delivery}, images skipped")
        } else {
            f.write_str(delivery)
        }
    }
}

#[derive(Debug, Clone)]
pub struct RunSummary {
    pub mode: RunMode,
    pub delivered: usize,
    pub artifacts: Vec<String>,
    pub duration: std::time::Duration,
}
