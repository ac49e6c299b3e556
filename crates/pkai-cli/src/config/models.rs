use crate::cli::OutputFormat;
use pkai::engine::config::PredictionConfig;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved settings of a `predict` run.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub input_path: PathBuf,
    pub output_path: Option<PathBuf>,
    pub format: OutputFormat,
    pub model_name: String,
    pub model_store: PathBuf,
    pub load_retries: u32,
    pub retry_delay: Duration,
    pub core_config: PredictionConfig,
}
