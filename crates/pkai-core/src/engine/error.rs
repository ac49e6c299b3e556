use super::catalog::CatalogError;
use super::config::ConfigError;
use super::encoder::EncodingError;
use crate::core::io::pdb::PdbError;
use crate::core::models::ids::ResidueKey;
use crate::model::predictor::{CatalogMismatch, PredictionError};
use crate::model::registry::ModelResolutionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Failed to read structure: {source}")]
    Parse {
        #[from]
        source: PdbError,
    },

    #[error("Failed to encode site: {source}")]
    Encoding {
        #[from]
        source: EncodingError,
    },

    #[error("Failed to resolve model: {source}")]
    ModelResolution {
        #[from]
        source: ModelResolutionError,
    },

    #[error("Invalid feature catalog: {source}")]
    Catalog {
        #[from]
        source: CatalogError,
    },

    #[error("Invalid configuration: {source}")]
    Config {
        #[from]
        source: ConfigError,
    },

    #[error(transparent)]
    CatalogMismatch(#[from] CatalogMismatch),

    #[error("Structure has {atoms} retained atoms, more than the allowed {limit}")]
    InputTooLarge { atoms: usize, limit: usize },

    #[error("Prediction failed for site {site}: {source}")]
    Prediction {
        site: ResidueKey,
        #[source]
        source: PredictionError,
    },
}
