use super::dense::{DenseLayer, DenseNetwork, DenseNetworkError};
use super::predictor::{CatalogMismatch, LoadedModel, ModelInfo, Predictor};
use crate::engine::catalog::{CatalogError, CatalogSpec};
use nalgebra::{DMatrix, DVector};
use serde::Deserialize;
use std::fs::File;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// File name of the manifest inside a model directory.
pub const MANIFEST_FILE: &str = "model.toml";

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct ModelManifest {
    pub name: String,
    pub version: String,
    pub input_dim: usize,
    pub catalog: CatalogSpec,
    pub layers: Vec<LayerFiles>,
}

/// Weight and bias files of one layer, relative to the model directory.
#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct LayerFiles {
    pub weights: PathBuf,
    pub bias: PathBuf,
}

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("Layer file '{path}' named by the manifest cannot be read: {source}")]
    LayerFile {
        path: String,
        source: std::io::Error,
    },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("'{path}' contains no values")]
    EmptyTensor { path: String },
    #[error("Manifest declares input-dim {declared} but the first layer takes {actual} inputs")]
    InputDim { declared: usize, actual: usize },
    #[error("Invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("Invalid network: {0}")]
    Network(#[from] DenseNetworkError),
    #[error(transparent)]
    CatalogMismatch(#[from] CatalogMismatch),
}

impl ArtifactError {
    /// Whether the manifest could not be read at all. A readable manifest
    /// naming missing layer files is malformed, not unreadable.
    pub fn is_io(&self) -> bool {
        matches!(self, ArtifactError::Io { .. })
    }
}

fn display(path: &Path) -> String {
    path.to_string_lossy().to_string()
}

pub fn read_manifest(path: &Path) -> Result<ModelManifest, ArtifactError> {
    let content = std::fs::read_to_string(path).map_err(|e| ArtifactError::Io {
        path: display(path),
        source: e,
    })?;
    toml::from_str(&content).map_err(|e| ArtifactError::Toml {
        path: display(path),
        source: e,
    })
}

fn read_rows(path: &Path) -> Result<Vec<Vec<f32>>, ArtifactError> {
    let file = File::open(path).map_err(|e| ArtifactError::LayerFile {
        path: display(path),
        source: e,
    })?;
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(file);

    let mut rows = Vec::new();
    for result in reader.deserialize::<Vec<f32>>() {
        let row = result.map_err(|e| ArtifactError::Csv {
            path: display(path),
            source: e,
        })?;
        rows.push(row);
    }
    if rows.iter().all(|r| r.is_empty()) {
        return Err(ArtifactError::EmptyTensor {
            path: display(path),
        });
    }
    Ok(rows)
}

/// Reads a weight matrix stored one output neuron per CSV row.
fn read_matrix(path: &Path) -> Result<DMatrix<f32>, ArtifactError> {
    let rows = read_rows(path)?;
    let ncols = rows[0].len();
    let flat: Vec<f32> = rows.iter().flatten().copied().collect();
    Ok(DMatrix::from_row_slice(rows.len(), ncols, &flat))
}

/// Reads a bias vector, either as one row or one value per row.
fn read_vector(path: &Path) -> Result<DVector<f32>, ArtifactError> {
    let rows = read_rows(path)?;
    let flat: Vec<f32> = rows.into_iter().flatten().collect();
    Ok(DVector::from_vec(flat))
}

/// Loads the model stored in `dir`.
///
/// The manifest's catalog is resolved, the layer files are read relative to
/// `dir`, and the resulting network is bound to the catalog. Any disagreement
/// between the declared input dimension, the first layer and the catalog is
/// an error.
pub fn load_model(dir: &Path) -> Result<LoadedModel, ArtifactError> {
    let manifest = read_manifest(&dir.join(MANIFEST_FILE))?;
    let catalog = manifest.catalog.resolve()?;

    let mut layers = Vec::with_capacity(manifest.layers.len());
    for files in &manifest.layers {
        let weights = read_matrix(&dir.join(&files.weights))?;
        let bias = read_vector(&dir.join(&files.bias))?;
        layers.push(DenseLayer::new(weights, bias));
    }
    let network = DenseNetwork::new(layers)?;

    if network.input_dim() != manifest.input_dim {
        return Err(ArtifactError::InputDim {
            declared: manifest.input_dim,
            actual: network.input_dim(),
        });
    }

    debug!(
        model = %manifest.name,
        version = %manifest.version,
        catalog = %catalog,
        layers = network.layers().len(),
        "Loaded model artifact."
    );

    let info = ModelInfo {
        name: manifest.name,
        version: manifest.version,
    };
    Ok(LoadedModel::new(info, catalog, Box::new(network))?)
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    /// Writes a two-layer model over a tiny inline catalog of input size 5.
    ///
    /// The network returns `2 * relu(sum(x)) + 0.5`.
    pub(crate) fn write_tiny_model(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(
            dir.join(MANIFEST_FILE),
            format!(
                r#"
                name = "{name}"
                version = "0.1.0"
                input-dim = 5

                [catalog]
                name = "tiny"
                version = 1
                environment-classes = ["N", "O", "O_COOH"]
                residue-types = ["ASP", "LYS"]
                capacity = 1
                carboxylate-aliases = ["OXT"]

                [[layers]]
                weights = "fc0.weights.csv"
                bias = "fc0.bias.csv"

                [[layers]]
                weights = "fc1.weights.csv"
                bias = "fc1.bias.csv"
                "#
            ),
        )
        .unwrap();
        fs::write(dir.join("fc0.weights.csv"), "1,1,1,1,1\n").unwrap();
        fs::write(dir.join("fc0.bias.csv"), "0\n").unwrap();
        fs::write(dir.join("fc1.weights.csv"), "2\n").unwrap();
        fs::write(dir.join("fc1.bias.csv"), "0.5\n").unwrap();
    }

    #[test]
    fn load_model_reads_manifest_catalog_and_layers() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny-model");

        let model = load_model(dir.path()).unwrap();
        assert_eq!(model.info().name, "tiny-model");
        assert_eq!(model.info().version, "0.1.0");
        assert_eq!(model.catalog().id(), "tiny-v1");
        assert_eq!(model.predictor().input_dim(), 5);
    }

    #[test]
    fn load_model_reports_missing_manifest_as_io() {
        let dir = tempdir().unwrap();
        let err = load_model(dir.path()).unwrap_err();
        assert!(err.is_io());
    }

    #[test]
    fn load_model_reports_missing_layer_file_as_malformed() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny");
        fs::remove_file(dir.path().join("fc1.bias.csv")).unwrap();
        let err = load_model(dir.path()).unwrap_err();
        assert!(matches!(err, ArtifactError::LayerFile { ref path, .. } if path.ends_with("fc1.bias.csv")));
        assert!(!err.is_io());
    }

    #[test]
    fn load_model_rejects_malformed_manifest() {
        let dir = tempdir().unwrap();
        fs::write(dir.path().join(MANIFEST_FILE), "name = 3").unwrap();
        assert!(matches!(load_model(dir.path()), Err(ArtifactError::Toml { .. })));
    }

    #[test]
    fn load_model_rejects_non_numeric_weights() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny");
        fs::write(dir.path().join("fc0.weights.csv"), "1,1,x,1,1\n").unwrap();
        assert!(matches!(load_model(dir.path()), Err(ArtifactError::Csv { .. })));
    }

    #[test]
    fn load_model_rejects_ragged_weights() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny");
        fs::write(dir.path().join("fc1.weights.csv"), "2\n").unwrap();
        fs::write(dir.path().join("fc0.weights.csv"), "1,1,1,1,1\n1,1\n").unwrap();
        fs::write(dir.path().join("fc0.bias.csv"), "0\n0\n").unwrap();
        assert!(matches!(load_model(dir.path()), Err(ArtifactError::Csv { .. })));
    }

    #[test]
    fn load_model_rejects_declared_dimension_mismatch() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny");
        let manifest = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            manifest.replace("input-dim = 5", "input-dim = 6"),
        )
        .unwrap();
        assert!(matches!(
            load_model(dir.path()),
            Err(ArtifactError::InputDim {
                declared: 6,
                actual: 5
            })
        ));
    }

    #[test]
    fn load_model_rejects_catalog_that_does_not_fit_network() {
        let dir = tempdir().unwrap();
        write_tiny_model(dir.path(), "tiny");
        let manifest = fs::read_to_string(dir.path().join(MANIFEST_FILE)).unwrap();
        fs::write(
            dir.path().join(MANIFEST_FILE),
            manifest.replace("capacity = 1", "capacity = 2"),
        )
        .unwrap();
        assert!(matches!(
            load_model(dir.path()),
            Err(ArtifactError::CatalogMismatch(CatalogMismatch {
                model_dim: 5,
                catalog_dim: 8,
                ..
            }))
        ));
    }
}
