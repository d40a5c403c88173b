//! Scan configuration.
//!
//! Rules name parsers rather than holding them, so a configuration can be
//! loaded from JSON and bound to a [`ParserRegistry`](crate::ParserRegistry)
//! at startup.


use crate::tree::TreeLimits;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Cataloger at position {0} has no name")]
    MissingName(usize),

    #[error("Duplicate cataloger name: {0}")]
    DuplicateCataloger(String),

    #[error("Cataloger '{cataloger}' references unknown parser '{parser}'")]
    UnknownParser { cataloger: String, parser: String },
}

/// Everything a scan needs besides the parsers themselves
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    pub limits: TreeLimits,
    pub catalogers: Vec<CatalogerConfig>,
}

/// Selection rules for one cataloger, mapping selectors to parser names
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogerConfig {
    pub name: String,
    /// Exact path -> parser name
    pub paths: BTreeMap<String, String>,
    /// Glob pattern -> parser name
    pub globs: BTreeMap<String, String>,
}

impl ScanConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: ScanConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&json)
    }

    /// Every cataloger needs a unique, non-empty name; it becomes `found_by`
    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (position, cataloger) in self.catalogers.iter().enumerate() {
            if cataloger.name.trim().is_empty() {
                return Err(ConfigError::MissingName(position));
            }
            if !seen.insert(cataloger.name.as_str()) {
                return Err(ConfigError::DuplicateCataloger(cataloger.name.clone()));
            }
        }
        Ok(())
    }
}
