use std::env;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use validator::Validate;

use crate::dmn_model::DmnDefinitions;

/// Configuration errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    #[error("Cannot read {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("Malformed workspace manifest {path}: {source}")]
    Manifest {
        path: String,
        source: serde_yaml::Error,
    },

    #[error("Malformed model {path}: {source}")]
    Model {
        path: String,
        source: serde_json::Error,
    },

    #[error("Validation error: {0}")]
    Validation(#[from] validator::ValidationErrors),
}

/// A workspace manifest: the model under edit plus the external models its
/// imports may reach. Relative paths resolve against the manifest's directory.
#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct WorkspaceConfig {
    /// Path of the model under edit.
    #[validate(length(min = 1, message = "Model path cannot be empty"))]
    pub model: String,

    /// External model files, keyed into the repository by their namespace.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    #[validate(nested)]
    pub imports: Vec<ImportedModel>,
}

#[derive(Clone, Debug, Validate, Serialize, Deserialize)]
pub struct ImportedModel {
    #[validate(length(min = 1, message = "Import path cannot be empty"))]
    pub file: String,
}

impl WorkspaceConfig {
    /// A workspace holding just one model file and no imports.
    pub fn single_model(path: &str) -> Self {
        Self {
            model: path.to_string(),
            imports: Vec::new(),
        }
    }

    /// Create configuration from environment variables with validation.
    /// `FEELSCOPE_MODEL` names the model; `FEELSCOPE_IMPORTS` is an optional
    /// colon-separated list of external model files.
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self {
            model: env::var("FEELSCOPE_MODEL")?,
            imports: env::var("FEELSCOPE_IMPORTS")
                .map(|list| {
                    list.split(':')
                        .filter(|path| !path.is_empty())
                        .map(|path| ImportedModel {
                            file: path.to_string(),
                        })
                        .collect()
                })
                .unwrap_or_default(),
        };

        config.validate()?;
        Ok(config)
    }

    /// Create configuration from a YAML manifest with validation.
    pub fn from_yaml_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.display().to_string(),
            source: e,
        })?;

        let config: Self = serde_yaml::from_str(&content).map_err(|e| ConfigError::Manifest {
            path: path.display().to_string(),
            source: e,
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load the model under edit and every imported model, resolving relative
    /// paths against `base`.
    pub fn load_models(&self, base: &Path) -> Result<(DmnDefinitions, Vec<DmnDefinitions>), ConfigError> {
        let model = load_model(&join(base, &self.model))?;
        let mut externals = Vec::with_capacity(self.imports.len());
        for import in &self.imports {
            externals.push(load_model(&join(base, &import.file))?);
        }
        Ok((model, externals))
    }
}

/// Read one marshalled model from a JSON file.
pub fn load_model(path: &Path) -> Result<DmnDefinitions, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
        path: path.display().to_string(),
        source: e,
    })?;
    serde_json::from_str(&content).map_err(|e| ConfigError::Model {
        path: path.display().to_string(),
        source: e,
    })
}

fn join(base: &Path, path: &str) -> PathBuf {
    let path = Path::new(path);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}
