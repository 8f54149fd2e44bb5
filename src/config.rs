//! JSON declaration of an argument vocabulary.

use crate::registry::{ArgKind, ArgSpec, Registry, RegistryError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while loading a vocabulary.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to parse JSON config: {0}")]
    ParseError(#[from] serde_json::Error),

    #[error("failed to read config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid argument vocabulary: {0}")]
    Registry(#[from] RegistryError),
}

/// Configuration for a single argument.
#[derive(Debug, Clone, Deserialize)]
pub struct ArgConfig {
    /// Full name matched against tokens (e.g., "--verbose")
    pub name: String,
    /// Alternate short name (e.g., "-v")
    pub abbreviation: Option<String>,
    /// Whether the argument is a unary flag or takes a value
    #[serde(rename = "type")]
    pub kind: ArgKind,
}

fn default_separators() -> String {
    "=".to_string()
}

fn default_redefinition_is_error() -> bool {
    true
}

/// Top-level vocabulary declaration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Characters that split inline key=value tokens (default: "=")
    #[serde(default = "default_separators")]
    pub separators: String,
    /// Whether repeating an argument is reported (default: true)
    #[serde(default = "default_redefinition_is_error")]
    pub redefinition_is_error: bool,
    /// Arguments in registration order
    #[serde(default)]
    pub args: Vec<ArgConfig>,
}

impl Config {
    /// Parse a JSON string into a Config.
    pub fn from_json(json: &str) -> Result<Config, ConfigError> {
        let config: Config = serde_json::from_str(json)?;
        Ok(config)
    }

    /// Read and parse a JSON config file.
    pub fn from_path(path: &Path) -> Result<Config, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Build a registry: separators first, then each argument in order.
    pub fn build(&self) -> Result<Registry, ConfigError> {
        let mut registry = Registry::new();
        registry.set_separators(self.separators.chars())?;
        registry.set_redefinition_is_error(self.redefinition_is_error);

        for arg in &self.args {
            registry.register(ArgSpec::new(
                arg.kind,
                arg.name.clone(),
                arg.abbreviation.clone(),
            ))?;
        }

        Ok(registry)
    }
}
