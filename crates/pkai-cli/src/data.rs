use crate::error::{CliError, Result};
use directories::ProjectDirs;
use pkai::model::registry::ModelRegistry;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const QUALIFIER: &str = "org";
const ORGANIZATION: &str = "pkai";
const APPLICATION: &str = "pkai";
const PATH_CONFIG_FILE: &str = "models-path.conf";
const MODELS_DIR: &str = "models";

/// Locates the local model store.
///
/// The store defaults to the platform data directory. A custom location can
/// be persisted in a small file under the platform config directory.
#[derive(Debug)]
pub struct DataManager {
    base_path: PathBuf,
}

impl DataManager {
    pub fn new() -> Result<Self> {
        let path = Self::determine_store_path()?;
        debug!("DataManager initialized with model store: {:?}", &path);
        Ok(Self { base_path: path })
    }

    #[cfg(test)]
    pub fn with_custom_path(path: PathBuf) -> Self {
        Self { base_path: path }
    }

    pub fn get_data_path(&self) -> &Path {
        &self.base_path
    }

    pub fn registry(&self) -> ModelRegistry {
        ModelRegistry::new(&self.base_path)
    }

    pub fn set_custom_path(path: &Path) -> Result<()> {
        if !path.is_absolute() {
            return Err(CliError::Argument(format!(
                "Model store path must be absolute: {}",
                path.display()
            )));
        }
        let config_path = Self::get_path_config_file()?;
        if let Some(parent) = config_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(config_path, path.to_string_lossy().as_bytes()).map_err(CliError::from)
    }

    pub fn reset_path() -> Result<()> {
        if let Ok(config_path) = Self::get_path_config_file() {
            if config_path.exists() {
                fs::remove_file(config_path)?;
            }
        }
        Ok(())
    }

    fn determine_store_path() -> Result<PathBuf> {
        match Self::get_path_config_file() {
            Ok(config_path) if config_path.exists() => {
                Self::read_custom_path(&config_path)?.map_or_else(Self::get_default_store_path, Ok)
            }
            _ => Self::get_default_store_path(),
        }
    }

    fn read_custom_path(config_path: &Path) -> Result<Option<PathBuf>> {
        let custom_path_str = fs::read_to_string(config_path)?.trim().to_string();
        if custom_path_str.is_empty() {
            warn!("Custom model store path file is empty, falling back to default path.");
            return Ok(None);
        }
        Ok(Some(PathBuf::from(custom_path_str)))
    }

    fn project_dirs() -> Result<ProjectDirs> {
        ProjectDirs::from(QUALIFIER, ORGANIZATION, APPLICATION).ok_or_else(|| {
            CliError::Data("Could not determine the user's home directory.".to_string())
        })
    }

    fn get_path_config_file() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join(PATH_CONFIG_FILE))
    }

    fn get_default_store_path() -> Result<PathBuf> {
        Ok(Self::project_dirs()?.data_dir().join(MODELS_DIR))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn registry_points_at_the_store() {
        let temp_dir = tempdir().unwrap();
        let manager = DataManager::with_custom_path(temp_dir.path().to_path_buf());
        let registry = manager.registry();
        assert_eq!(registry.store(), temp_dir.path());
        assert_eq!(registry.model_dir("pkai"), temp_dir.path().join("pkai"));
    }

    #[test]
    fn read_custom_path_trims_and_ignores_empty_files() {
        let temp_dir = tempdir().unwrap();
        let conf = temp_dir.path().join(PATH_CONFIG_FILE);

        fs::write(&conf, "  /srv/pkai/models \n").unwrap();
        assert_eq!(
            DataManager::read_custom_path(&conf).unwrap(),
            Some(PathBuf::from("/srv/pkai/models"))
        );

        fs::write(&conf, "\n").unwrap();
        assert_eq!(DataManager::read_custom_path(&conf).unwrap(), None);
    }

    #[test]
    fn set_custom_path_rejects_relative_paths() {
        let result = DataManager::set_custom_path(Path::new("relative/models"));
        assert!(matches!(result, Err(CliError::Argument(_))));
    }
}
