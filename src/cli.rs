//! Command-line argument parsing for the JupiterOne CLI.
//!
//! Uses clap to parse CLI arguments. Credentials may also be supplied through
//! environment variables (or a `.env` file).

use crate::client::{ClientConfig, DEFAULT_API_URL, DEFAULT_MAX_RETRIES, DEFAULT_TIMEOUT_SECS};
use crate::config::{validate_api_url, Config};
use crate::error::Result;
use crate::output::OutputFormat;
use crate::pipeline::QueryRequest;
use clap::Parser;
use std::path::PathBuf;

/// Run a JupiterOne query and print the results as CSV or JSON lines.
#[derive(Parser, Debug)]
#[command(name = "jupiterone-cli")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// JupiterOne query to execute
    #[arg(value_name = "QUERY")]
    pub query: String,

    /// Customer's account ID
    #[arg(long, value_name = "ID", env = "JUPITERONE_ACCOUNT")]
    pub account_id: String,

    /// API token
    #[arg(long, value_name = "TOKEN", env = "JUPITERONE_API_TOKEN", hide_env_values = true)]
    pub token: String,

    /// JupiterOne API URL [default: https://graphql.us.jupiterone.io]
    #[arg(long, value_name = "URL", env = "JUPITERONE_API_URL")]
    pub api_url: Option<String>,

    /// Output format: csv or json [default: csv]
    #[arg(long, value_name = "FORMAT")]
    pub output: Option<OutputFormat>,

    /// Include deleted entities in the query results
    #[arg(long)]
    pub include_deleted: bool,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS", value_parser = clap::value_parser!(u64).range(1..))]
    pub timeout: Option<u64>,

    /// Config file path
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Parses command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Returns the config file path to use.
    ///
    /// Uses the --config argument if provided, otherwise the default path.
    pub fn config_path(&self) -> PathBuf {
        self.config.clone().unwrap_or_else(Config::default_path)
    }

    /// Builds the client configuration.
    ///
    /// Precedence: command line, then config file, then built-in defaults.
    pub fn client_config(&self, config: &Config) -> Result<ClientConfig> {
        let api_url = self
            .api_url
            .clone()
            .or_else(|| config.api_url.clone())
            .unwrap_or_else(|| DEFAULT_API_URL.to_string());
        validate_api_url(&api_url)?;

        Ok(ClientConfig::new(&self.account_id, &self.token)
            .with_url(api_url)
            .with_timeout(
                self.timeout
                    .or(config.timeout_secs)
                    .unwrap_or(DEFAULT_TIMEOUT_SECS),
            )
            .with_max_retries(config.max_retries.unwrap_or(DEFAULT_MAX_RETRIES)))
    }

    /// Builds the query request.
    pub fn query_request(&self, config: &Config) -> QueryRequest {
        QueryRequest::new(&self.query)
            .with_include_deleted(self.include_deleted)
            .with_format(self.output.or(config.output).unwrap_or_default())
    }
}
