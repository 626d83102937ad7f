//! Configuration document loading shared by every smartguide config section

use serde::de::DeserializeOwned;
use std::path::{Component, Path};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

/// Parse a configuration document, trying JSON, then TOML, then YAML.
pub fn load_document<T: DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let json_err = match serde_json::from_str::<T>(content) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    let toml_err = match toml::from_str::<T>(content) {
        Ok(value) => return Ok(value),
        Err(e) => e,
    };

    match serde_yaml::from_str::<T>(content) {
        Ok(value) => Ok(value),
        Err(yaml_err) => Err(ConfigError::ParseError(format!(
            "not valid JSON ({}), TOML ({}) or YAML ({})",
            json_err,
            toml_err.to_string().trim(),
            yaml_err
        ))),
    }
}

/// Read and parse a configuration document from disk.
///
/// Paths containing `..` components are refused.
pub fn read_document<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    if path.components().any(|c| matches!(c, Component::ParentDir)) {
        return Err(ConfigError::IoError(format!(
            "Path traversal detected: '{}'",
            path.display()
        )));
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| ConfigError::IoError(format!("{}: {}", path.display(), e)))?;
    load_document(&content)
}
