pub mod env;
pub mod toml_config;

#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "secret-santa")]
#[command(about = "Draw Secret Santa pairs and send each gifter a personalized note")]
pub struct CliConfig {
    /// Path to the TOML participant file
    #[arg(short, long, default_value = "santa.toml")]
    pub config: String,

    /// Write messages to the output directory instead of emailing them
    #[arg(long)]
    pub dry_run: bool,

    /// Do not call the image generator
    #[arg(long)]
    pub skip_images: bool,

    /// Override output.dir from the config file
    #[arg(long)]
    pub output_dir: Option<String>,

    /// Override delivery.delay_ms from the config file
    #[arg(long)]
    pub delay_ms: Option<u64>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn run_mode(&self) -> crate::domain::model::RunMode {
        crate::domain::model::RunMode {
            dry_run: self.dry_run,
            skip_images: self.skip_images,
        }
    }

    /// Applies command-line overrides on top of the file config.
    pub fn apply_overrides(&self, config: &mut toml_config::SantaConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.dir = dir.clone();
            tracing::info!("🔧 Output directory overridden to: {}", dir);
        }
        if let Some(delay_ms) = self.delay_ms {
            config.delivery.delay_ms = delay_ms;
            tracing::info!("🔧 Delay overridden to: {}ms", delay_ms);
        }
    }
}
