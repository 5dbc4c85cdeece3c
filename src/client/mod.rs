//! Query execution against the JupiterOne API.
//!
//! Provides a trait-based interface so the normalization pipeline can be
//! driven by the real HTTP client or by an in-memory mock.

mod jupiterone;
mod mock;

pub use jupiterone::{JupiterOneClient, PAGE_QUERY};
pub use mock::{FailingQueryClient, MockQueryClient, RecordedQuery};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

/// Default JupiterOne GraphQL endpoint.
pub const DEFAULT_API_URL: &str = "https://graphql.us.jupiterone.io";

/// Default timeout for API requests.
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default number of retries for throttled requests.
pub const DEFAULT_MAX_RETRIES: u32 = 5;

/// Connection settings for the query client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// GraphQL endpoint URL.
    pub api_url: String,
    /// JupiterOne account identifier.
    pub account_id: String,
    /// API token sent as a bearer credential.
    pub token: String,
    /// Request timeout in seconds.
    pub timeout_secs: u64,
    /// How many times a throttled (429/503) request is retried.
    pub max_retries: u32,
}

impl ClientConfig {
    /// Creates a config for the given credentials using default settings.
    pub fn new(account_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            account_id: account_id.into(),
            token: token.into(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_retries: DEFAULT_MAX_RETRIES,
        }
    }

    /// Sets the API URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    /// Sets the request timeout.
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.timeout_secs = timeout_secs;
        self
    }

    /// Sets the retry budget for throttled requests.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }
}

/// Trait for clients that can execute a J1QL query.
#[async_trait]
pub trait QueryClient: Send + Sync {
    /// Executes `query` and returns the raw response.
    ///
    /// List results come back as `{"data": [...]}` with every page merged.
    /// Tree results come back as the tree object itself, which has no
    /// `data` key.
    async fn query(&self, query: &str, include_deleted: bool) -> Result<Value>;
}
