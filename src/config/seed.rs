//! Seed record loading from seed.toml
//!
//! This module provides functionality to load initial change requests and assets
//! from a TOML file. The records defined there are inserted into the store on
//! start-up when their identifiers are missing.

use crate::core::{asset::NewAsset, change_request::NewChangeRequest};
use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_SEED_FILE: &str = "seed.toml";

/// Structure of the whole seed file
#[derive(Debug, Default, Deserialize)]
pub struct SeedConfig {
    /// Change requests to seed
    #[serde(default)]
    pub change_requests: Vec<NewChangeRequest>,
    /// CMDB assets to seed
    #[serde(default)]
    pub assets: Vec<NewAsset>,
}

/// Parses seed records from TOML text.
///
/// # Errors
/// Returns an error if the TOML syntax is invalid or a required field is missing.
pub fn parse_seed(contents: &str) -> Result<SeedConfig> {
    toml::from_str(contents).map_err(|e| Error::Config {
        message: format!("Failed to parse seed file: {e}"),
    })
}

/// Loads seed records from a TOML file
///
/// # Errors
/// Returns an error if the file cannot be read or does not parse.
pub fn load_seed<P: AsRef<Path>>(path: P) -> Result<SeedConfig> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!(
            "Failed to read seed file {}: {e}",
            path.as_ref().display()
        ),
    })?;
    parse_seed(&contents)
}

/// Path of the seed file: `SEED_FILE` or `./seed.toml`.
#[must_use]
pub fn seed_file_path() -> String {
    std::env::var("SEED_FILE").unwrap_or_else(|_| DEFAULT_SEED_FILE.to_string())
}
