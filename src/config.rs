//! Configuration management for the JupiterOne CLI.
//!
//! Handles loading optional defaults from a TOML file. Values given on the
//! command line (or through their environment variables) always win.

use crate::error::{J1Error, Result};
use crate::output::OutputFormat;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use url::Url;

/// Optional settings read from the config file.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// GraphQL endpoint (e.g., "https://graphql.eu.jupiterone.io").
    pub api_url: Option<String>,

    /// Default output format when `--output` is not given.
    pub output: Option<OutputFormat>,

    /// Request timeout in seconds.
    pub timeout_secs: Option<u64>,

    /// Retries for throttled (429/503) requests.
    pub max_retries: Option<u32>,
}

impl Config {
    /// Returns the default config file path for the current platform.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("jupiterone-cli")
            .join("config.toml")
    }

    /// Loads configuration from a TOML file. A missing file yields defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| J1Error::config(format!("Failed to read config file: {e}")))?;

        Self::parse_toml(&content, path)
    }

    /// Parses configuration from a TOML string.
    fn parse_toml(content: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(|e| {
            J1Error::config(format!(
                "Configuration error in {}:\n  {}",
                path.display(),
                e
            ))
        })?;

        if let Some(url) = &config.api_url {
            validate_api_url(url)?;
        }
        if config.timeout_secs == Some(0) {
            return Err(J1Error::config(format!(
                "Configuration error in {}:\n  timeout_secs must be at least 1",
                path.display()
            )));
        }

        Ok(config)
    }
}

/// Checks that `url` is an absolute http(s) URL.
pub fn validate_api_url(url: &str) -> Result<()> {
    let parsed =
        Url::parse(url).map_err(|e| J1Error::config(format!("Invalid API URL '{url}': {e}")))?;

    match parsed.scheme() {
        "https" | "http" => Ok(()),
        other => Err(J1Error::config(format!(
            "Invalid scheme '{other}' in API URL. Expected 'https' or 'http'"
        ))),
    }
}
