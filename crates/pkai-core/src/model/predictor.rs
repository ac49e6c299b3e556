use crate::core::chemistry::titratable::TitratableType;
use crate::engine::catalog::FeatureCatalog;
use crate::engine::encoder::EncodedInput;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum PredictionError {
    #[error("Input has {found} values but the model expects {expected}")]
    DimensionMismatch { expected: usize, found: usize },
    #[error("Model produced a non-finite output ({0})")]
    NonFinite(f64),
}

/// A regression function from an encoded site to its pKa shift.
///
/// Implementations must be pure: the same input always gives the same output.
/// They are shared across worker threads.
pub trait Predictor: Send + Sync {
    /// Length of the vectors this predictor accepts.
    fn input_dim(&self) -> usize;

    /// Predicts the shift of a site's pKa from its reference value.
    fn predict(&self, input: &EncodedInput) -> Result<f64, PredictionError>;
}

/// Identity of a model artifact.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: String,
    pub version: String,
}

impl fmt::Display for ModelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.name, self.version)
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
#[error(
    "Model '{model}' expects {model_dim} inputs but catalog '{catalog}' encodes {catalog_dim}"
)]
pub struct CatalogMismatch {
    pub model: String,
    pub catalog: String,
    pub model_dim: usize,
    pub catalog_dim: usize,
}

/// A predictor paired with the catalog its inputs are encoded with.
pub struct LoadedModel {
    info: ModelInfo,
    catalog: FeatureCatalog,
    predictor: Box<dyn Predictor>,
}

impl LoadedModel {
    /// Binds `predictor` to `catalog`, rejecting the pair when the catalog's
    /// encoded length differs from the predictor's input length.
    pub fn new(
        info: ModelInfo,
        catalog: FeatureCatalog,
        predictor: Box<dyn Predictor>,
    ) -> Result<Self, CatalogMismatch> {
        if catalog.input_dim() != predictor.input_dim() {
            return Err(CatalogMismatch {
                model: info.name,
                catalog: catalog.id(),
                model_dim: predictor.input_dim(),
                catalog_dim: catalog.input_dim(),
            });
        }
        Ok(Self {
            info,
            catalog,
            predictor,
        })
    }

    pub fn info(&self) -> &ModelInfo {
        &self.info
    }

    pub fn catalog(&self) -> &FeatureCatalog {
        &self.catalog
    }

    pub fn predictor(&self) -> &dyn Predictor {
        self.predictor.as_ref()
    }

    /// Absolute pKa of a site: the predicted shift plus the site type's
    /// reference pKa, rounded to two decimals.
    pub fn predict_pka(
        &self,
        input: &EncodedInput,
        site_type: TitratableType,
    ) -> Result<f64, PredictionError> {
        let shift = self.predictor.predict(input)?;
        if !shift.is_finite() {
            return Err(PredictionError::NonFinite(shift));
        }
        Ok(round_to_hundredths(shift + site_type.reference_pka()))
    }
}

impl fmt::Debug for LoadedModel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadedModel")
            .field("info", &self.info)
            .field("catalog", &self.catalog.id())
            .field("input_dim", &self.predictor.input_dim())
            .finish()
    }
}

/// Rounds the exact binary value to two decimals, ties to even.
fn round_to_hundredths(value: f64) -> f64 {
    format!("{value:.2}").parse().unwrap_or(value)
}
