use crate::core::assignment::assign;
use crate::core::gate::verify_channel;
use crate::core::pipeline::SantaPipeline;
use crate::domain::model::{Participant, RunSummary};
use crate::domain::ports::{ImageGenerator, MessageGenerator, Storage};
use crate::utils::error::Result;
use std::time::Instant;

pub struct SantaEngine<M, I, S>
where
    M: MessageGenerator,
    I: ImageGenerator,
    S: Storage,
{
    pipeline: SantaPipeline<M, I, S>,
}

impl<M, I, S> SantaEngine<M, I, S>
where
    M: MessageGenerator,
    I: ImageGenerator,
    S: Storage,
{
    pub fn new(pipeline: SantaPipeline<M, I, S>) -> Self {
        Self { pipeline }
    }

    /// Verify the channel (live only), draw the pairs, then work through them.
    pub async fn run(&mut self, participants: &[Participant]) -> Result<RunSummary> {
        let started = Instant::now();
        let mode = self.pipeline.mode();
        tracing::info!("🎄 Starting Secret Santa run ({})", mode);

        if let Some(notifier) = self.pipeline.delivery().notifier() {
            verify_channel(notifier).await?;
        }

        let assignments = assign(participants)?;
        tracing::info!("🎲 Drew {} assignments", assignments.len());

        let report = self.pipeline.run(&assignments).await?;

        let summary = RunSummary {
            mode,
            delivered: report.delivered,
            artifacts: report.artifacts,
            duration: started.elapsed(),
        };
        tracing::info!(
            "✅ Finished: {} assignment(s) in {:?}",
            summary.delivered,
            summary.duration
        );
        Ok(summary)
    }
}
