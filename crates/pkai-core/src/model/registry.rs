use super::artifact::{ArtifactError, MANIFEST_FILE, load_model};
use super::predictor::{CatalogMismatch, LoadedModel};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{info, instrument};

/// Models this build knows how to run.
pub const KNOWN_MODELS: [&str; 2] = ["pkai", "pkai+"];

/// Model used when none is requested.
pub const DEFAULT_MODEL: &str = "pkai";

#[derive(Debug, Error)]
pub enum ModelResolutionError {
    #[error("Unsupported model '{name}'. Known models: {}", .known.join(", "))]
    Unsupported { name: String, known: Vec<String> },

    #[error("Model '{name}' is not available at '{}': {source}", .path.display())]
    Unavailable {
        name: String,
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error("Model '{name}' at '{}' is invalid: {source}", .path.display())]
    Invalid {
        name: String,
        path: PathBuf,
        #[source]
        source: ArtifactError,
    },

    #[error(transparent)]
    CatalogMismatch(#[from] CatalogMismatch),
}

impl ModelResolutionError {
    /// Whether retrying the same load could succeed, for example once the
    /// artifact has been copied into the store.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ModelResolutionError::Unavailable { .. })
    }
}

/// Availability of a known model in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelStatus {
    pub name: String,
    pub path: PathBuf,
    pub installed: bool,
}

/// Resolves model names to artifacts inside a local model store.
///
/// The store holds one directory per model, each with a `model.toml`
/// manifest. Nothing is downloaded; a missing artifact is reported as
/// unavailable.
#[derive(Debug, Clone)]
pub struct ModelRegistry {
    store: PathBuf,
    known: Vec<String>,
}

impl ModelRegistry {
    pub fn new(store: impl Into<PathBuf>) -> Self {
        Self::with_known_models(store, KNOWN_MODELS.iter().map(|s| s.to_string()))
    }

    pub fn with_known_models<I, S>(store: impl Into<PathBuf>, known: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            store: store.into(),
            known: known.into_iter().map(Into::into).collect(),
        }
    }

    pub fn store(&self) -> &Path {
        &self.store
    }

    pub fn known_models(&self) -> &[String] {
        &self.known
    }

    pub fn is_known(&self, name: &str) -> bool {
        self.known.iter().any(|k| k == name)
    }

    pub fn model_dir(&self, name: &str) -> PathBuf {
        self.store.join(name)
    }

    /// Lists every known model with whether its manifest is present.
    pub fn statuses(&self) -> Vec<ModelStatus> {
        self.known
            .iter()
            .map(|name| {
                let path = self.model_dir(name);
                let installed = path.join(MANIFEST_FILE).is_file();
                ModelStatus {
                    name: name.clone(),
                    path,
                    installed,
                }
            })
            .collect()
    }

    /// Loads the model called `name`.
    ///
    /// # Errors
    ///
    /// * [`ModelResolutionError::Unsupported`] for a name this build does not know.
    /// * [`ModelResolutionError::Unavailable`] when the manifest is missing or unreadable.
    /// * [`ModelResolutionError::Invalid`] when the artifact is present but malformed.
    /// * [`ModelResolutionError::CatalogMismatch`] when the catalog does not fit the network.
    #[instrument(skip(self), fields(store = %self.store.display()))]
    pub fn load(&self, name: &str) -> Result<LoadedModel, ModelResolutionError> {
        if !self.is_known(name) {
            return Err(ModelResolutionError::Unsupported {
                name: name.to_string(),
                known: self.known.clone(),
            });
        }

        let path = self.model_dir(name);
        let model = load_model(&path).map_err(|source| match source {
            ArtifactError::CatalogMismatch(mismatch) => mismatch.into(),
            source if source.is_io() => ModelResolutionError::Unavailable {
                name: name.to_string(),
                path: path.clone(),
                source,
            },
            source => ModelResolutionError::Invalid {
                name: name.to_string(),
                path: path.clone(),
                source,
            },
        })?;

        info!(model = %model.info(), catalog = %model.catalog().id(), "Model loaded.");
        Ok(model)
    }
}
