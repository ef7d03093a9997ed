//! Default values applied when callers omit optional catalog fields.
//!
//! Defaults can be loaded from a TOML file; every key is optional:
//!
//! ```toml
//! unit_code = "PCE"
//! unit_factor = "1"
//! feature_unit = "00"
//! image_mime = "image/jpg"
//! weight_feature = "kloeckner_weight"
//! indent = 2
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading [`CatalogDefaults`].
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid catalog config: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Catalog-wide defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CatalogDefaults {
    /// Unit code used by `add_unit` when none is given.
    pub unit_code: String,

    /// Conversion factor used by `add_unit` when none is given.
    pub unit_factor: String,

    /// Feature unit written when a feature is added without one, or when a
    /// feature unit is set to the empty string.
    pub feature_unit: String,

    /// MIME type used by `add_image` when none is given.
    pub image_mime: String,

    /// FID of the well-known weight feature.
    pub weight_feature: String,

    /// Spaces per nesting level when serializing.
    pub indent: usize,
}

impl Default for CatalogDefaults {
    fn default() -> Self {
        Self {
            unit_code: "PCE".to_string(),
            unit_factor: "1".to_string(),
            feature_unit: "00".to_string(),
            image_mime: "image/jpg".to_string(),
            weight_feature: "kloeckner_weight".to_string(),
            indent: 2,
        }
    }
}

impl CatalogDefaults {
    /// Parse defaults from TOML text. Missing keys keep their built-in values.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    /// Read and parse a TOML defaults file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }
}
