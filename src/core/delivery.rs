use crate::domain::model::{Assignment, GeneratedContent};
use crate::domain::ports::{Notifier, Storage};
use crate::utils::error::{Result, Stage};
use std::collections::HashSet;

const PREVIEW_CHARS: usize = 280;

/// Lowercase ASCII alphanumerics with single underscores between words.
pub fn safe_file_stem(name: &str) -> String {
    let mut stem = String::with_capacity(name.len());
    for ch in name.chars().flat_map(char::to_lowercase) {
        if ch.is_ascii_alphanumeric() {
            stem.push(ch);
        } else if !stem.ends_with('_') {
            stem.push('_');
        }
    }

    let stem = stem.trim_matches('_');
    if stem.is_empty() {
        "participant".to_string()
    } else {
        stem.to_string()
    }
}

/// One artifact key per gifter, suffixed `_2`, `_3`... when distinct names
/// collapse to the same stem.
pub fn artifact_keys(assignments: &[Assignment]) -> Vec<String> {
    let mut used = HashSet::new();
    assignments
        .iter()
        .map(|a| {
            let base = safe_file_stem(&a.gifter.name);
            let mut key = base.clone();
            let mut n = 2;
            while !used.insert(key.clone()) {
                key = format!("{}_{}", base, n);
                n += 1;
            }
            key
        })
        .collect()
}

fn preview(message: &str) -> String {
    let mut chars = message.chars();
    let head: String = chars.by_ref().take(PREVIEW_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head.trim_end())
    } else {
        head
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeliveryOutcome {
    Saved(Vec<String>),
    Sent,
}

/// Writes each assignment to local files instead of sending it.
pub struct DryRunDelivery<S: Storage> {
    storage: S,
    skip_images: bool,
}

impl<S: Storage> DryRunDelivery<S> {
    pub fn new(storage: S, skip_images: bool) -> Self {
        Self {
            storage,
            skip_images,
        }
    }

    pub fn render_text(assignment: &Assignment, message: &str) -> String {
        format!(
            "Secret Santa assignment\n\
             Gifter: {} <{}>\n\
             Giftee: {}\n\
             Giftee description: {}\n\
             Generated: {}\n\
             \n\
             {}\n",
            assignment.gifter.name,
            assignment.gifter.email,
            assignment.giftee.name,
            assignment.giftee.description,
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            message.trim_end()
        )
    }

    async fn save(
        &self,
        key: &str,
        assignment: &Assignment,
        content: &GeneratedContent,
    ) -> Result<Vec<String>> {
        let mut written = Vec::new();

        let text = Self::render_text(assignment, &content.message);
        written.push(self.storage.write_file(&format!("{}.txt", key), text.as_bytes()).await?);

        if !self.skip_images && content.has_image() {
            written.push(self.storage.write_file(&format!("{}.png", key), &content.image).await?);
        }

        println!(
            "🎁 {} → {}\n{}\n",
            assignment.gifter.name,
            assignment.giftee.name,
            preview(&content.message)
        );

        Ok(written)
    }
}

/// The delivery path for a whole run, fixed when the pipeline is built.
pub enum Delivery<S: Storage> {
    DryRun(DryRunDelivery<S>),
    Live(Box<dyn Notifier>),
}

impl<S: Storage> Delivery<S> {
    pub fn dry_run(storage: S, skip_images: bool) -> Self {
        Delivery::DryRun(DryRunDelivery::new(storage, skip_images))
    }

    pub fn live(notifier: Box<dyn Notifier>) -> Self {
        Delivery::Live(notifier)
    }

    pub fn notifier(&self) -> Option<&dyn Notifier> {
        match self {
            Delivery::Live(notifier) => Some(notifier.as_ref()),
            Delivery::DryRun(_) => None,
        }
    }

    /// Empties the dry-run output area. Live delivery has nothing to prepare.
    pub async fn prepare(&self) -> Result<()> {
        match self {
            Delivery::DryRun(dry) => dry.storage.clear().await,
            Delivery::Live(_) => Ok(()),
        }
    }

    pub async fn deliver(
        &self,
        key: &str,
        assignment: &Assignment,
        content: &GeneratedContent,
    ) -> Result<DeliveryOutcome> {
        let gifter = assignment.gifter.email.as_str();
        match self {
            Delivery::DryRun(dry) => dry
                .save(key, assignment, content)
                .await
                .map(DeliveryOutcome::Saved)
                .map_err(|e| e.during(Stage::ArtifactWrite, gifter)),
            Delivery::Live(notifier) => notifier
                .send_personalized_notification(
                    &assignment.gifter,
                    &assignment.giftee,
                    &content.message,
                    &content.image,
                )
                .await
                .map(|_| DeliveryOutcome::Sent)
                .map_err(|e| e.during(Stage::Delivery, gifter)),
        }
    }
}
