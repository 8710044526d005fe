//! Engine configuration.
//!
//! Every field has a default, so a configuration file only needs the values
//! it changes:
//!
//! ```json
//! {
//!   "linguistic_analysis": true,
//!   "storage": { "type": "file", "path": "./models" },
//!   "vectorizer": { "max_features": 1000, "min_df": 1, "ngram_range": [1, 2] },
//!   "classifier": { "alpha": 0.1 }
//! }
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Result, StatuteError};
use crate::ml::section_classifier::{NaiveBayesConfig, VectorizerConfig};
use crate::storage::StorageConfig;
use crate::storage::file::FileStorageConfig;

/// Configuration for the section engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Use lemmatizing normalization; lowercase-only when false.
    pub linguistic_analysis: bool,
    /// Where model artifacts are stored.
    pub storage: StorageConfig,
    /// TF-IDF settings.
    pub vectorizer: VectorizerConfig,
    /// Naive Bayes settings.
    pub classifier: NaiveBayesConfig,
}

impl Default for EngineConfig {
    fn default() -> Self {
        EngineConfig {
            linguistic_analysis: true,
            storage: StorageConfig::default(),
            vectorizer: VectorizerConfig::default(),
            classifier: NaiveBayesConfig::default(),
        }
    }
}

impl EngineConfig {
    /// Load a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            StatuteError::invalid_config(format!("cannot read {}: {e}", path.display()))
        })?;
        let config: EngineConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Store model artifacts in a directory on disk.
    pub fn with_model_dir<P: Into<PathBuf>>(mut self, path: P) -> Self {
        let path = path.into();
        self.storage = match self.storage {
            StorageConfig::File(mut file_config) => {
                file_config.path = path;
                StorageConfig::File(file_config)
            }
            StorageConfig::Memory(_) => StorageConfig::File(FileStorageConfig::new(path)),
        };
        self
    }

    /// Check every section of the configuration.
    pub fn validate(&self) -> Result<()> {
        self.vectorizer.validate()?;
        self.classifier.validate()?;
        Ok(())
    }
}
