//! Command implementations for the catner CLI
//!
//! Each command module handles the CLI interface and delegates to the
//! `catner` library for the catalog work.

use std::path::Path;

use anyhow::{Context, Result};
use catner::CatalogDefaults;

pub mod amend;
pub mod demo;
pub mod edit;
pub mod inspect;

/// Read catalog defaults from `config`, or use the built-in ones.
pub fn load_defaults(config: Option<&Path>) -> Result<CatalogDefaults> {
    match config {
        Some(path) => CatalogDefaults::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display())),
        None => Ok(CatalogDefaults::default()),
    }
}
