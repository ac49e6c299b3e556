use pkai::engine::error::EngineError;
use pkai::model::registry::ModelResolutionError;
use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    PkaiCore(#[from] EngineError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Model store error: {0}")]
    Data(String),

    #[error("Failed to parse file '{path}': {source}", path = .path.display())]
    FileParsing {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV output: {0}")]
    Csv(#[from] csv::Error),

    #[error("Invalid argument: {0}")]
    Argument(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<ModelResolutionError> for CliError {
    fn from(e: ModelResolutionError) -> Self {
        CliError::PkaiCore(e.into())
    }
}
