use crate::core::delivery::{artifact_keys, Delivery, DeliveryOutcome};
use crate::domain::model::{Assignment, GeneratedContent, RunMode};
use crate::domain::ports::{ImageGenerator, MessageGenerator, Storage};
use crate::utils::error::{Result, SantaError, Stage};
use crate::utils::mask::Pseudonymizer;
use std::time::Duration;

pub const DEFAULT_DELAY: Duration = Duration::from_millis(2000);

#[derive(Debug, Clone, Default)]
pub struct PipelineReport {
    pub delivered: usize,
    pub artifacts: Vec<String>,
}

/// Runs every assignment through message, image and delivery, one at a time.
///
/// The first failure stops the run; nothing after it is attempted.
pub struct SantaPipeline<M, I, S>
where
    M: MessageGenerator,
    I: ImageGenerator,
    S: Storage,
{
    messages: M,
    images: I,
    delivery: Delivery<S>,
    mode: RunMode,
    delay: Duration,
    masker: Pseudonymizer,
}

impl<M, I, S> SantaPipeline<M, I, S>
where
    M: MessageGenerator,
    I: ImageGenerator,
    S: Storage,
{
    pub fn new(messages: M, images: I, delivery: Delivery<S>, mode: RunMode) -> Self {
        Self {
            messages,
            images,
            delivery,
            mode,
            delay: DEFAULT_DELAY,
            masker: Pseudonymizer::disabled(),
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_masker(mut self, masker: Pseudonymizer) -> Self {
        self.masker = masker;
        self
    }

    pub fn mode(&self) -> RunMode {
        self.mode
    }

    pub fn delivery(&self) -> &Delivery<S> {
        &self.delivery
    }

    pub async fn generate(&self, assignment: &Assignment) -> Result<GeneratedContent> {
        let gifter = assignment.gifter.email.as_str();

        let message = self
            .messages
            .generate_message(
                &assignment.gifter.name,
                &assignment.giftee.name,
                &assignment.giftee.description,
            )
            .await
            .map_err(|e| e.during(Stage::MessageGeneration, gifter))?;

        if message.trim().is_empty() {
            return Err(SantaError::collaborator(
                Stage::MessageGeneration,
                gifter,
                "provider returned an empty message",
            ));
        }

        let image = if self.mode.skip_images {
            Vec::new()
        } else {
            self.images
                .generate_image(&assignment.giftee.description)
                .await
                .map_err(|e| e.during(Stage::ImageGeneration, gifter))?
        };

        Ok(GeneratedContent { message, image })
    }

    pub async fn run(&mut self, assignments: &[Assignment]) -> Result<PipelineReport> {
        self.delivery.prepare().await?;

        let keys = artifact_keys(assignments);
        let total = assignments.len();
        let mut report = PipelineReport::default();

        for (index, (assignment, key)) in assignments.iter().zip(&keys).enumerate() {
            let gifter = self.masker.mask(&assignment.gifter.name);
            let giftee = self.masker.mask(&assignment.giftee.name);
            tracing::info!("🎅 [{}/{}] {} → {}", index + 1, total, gifter, giftee);

            let content = self.generate(assignment).await.inspect_err(|e| {
                tracing::error!("❌ [{}/{}] {}", index + 1, total, e);
            })?;
            tracing::debug!(
                "📝 Message ready ({} chars, image {} bytes)",
                content.message.chars().count(),
                content.image.len()
            );

            match self.delivery.deliver(key, assignment, &content).await {
                Ok(DeliveryOutcome::Saved(paths)) => {
                    tracing::info!("💾 [{}/{}] Saved {} artifact(s)", index + 1, total, paths.len());
                    report.artifacts.extend(paths);
                }
                Ok(DeliveryOutcome::Sent) => {
                    tracing::info!("📧 [{}/{}] Sent to {}", index + 1, total, gifter);
                }
                Err(e) => {
                    tracing::error!("❌ [{}/{}] {}", index + 1, total, e);
                    return Err(e);
                }
            }
            report.delivered += 1;

            if index + 1 < total && !self.delay.is_zero() {
                tracing::debug!("⏳ Waiting {:?} before the next assignment", self.delay);
                tokio::time::sleep(self.delay).await;
            }
        }

        Ok(report)
    }
}
