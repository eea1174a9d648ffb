pub mod assignment;
pub mod delivery;
pub mod engine;
pub mod gate;
pub mod pipeline;

pub use crate::domain::model::{Assignment, GeneratedContent, Participant, RunMode, RunSummary};
pub use crate::domain::ports::{ImageGenerator, MessageGenerator, Notifier, Storage};
pub use crate::utils::error::Result;
