//! Mock query clients for testing.
//!
//! Return canned responses without touching the network.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Mutex;

use super::QueryClient;
use crate::error::{J1Error, Result};

/// A query recorded by [`MockQueryClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedQuery {
    pub query: String,
    pub include_deleted: bool,
}

/// A mock client that returns the same response for every query.
#[derive(Debug)]
pub struct MockQueryClient {
    response: Value,
    calls: Mutex<Vec<RecordedQuery>>,
}

impl MockQueryClient {
    /// Creates a mock that answers every query with `response`.
    pub fn new(response: Value) -> Self {
        Self {
            response,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Returns the queries executed so far.
    pub fn calls(&self) -> Vec<RecordedQuery> {
        self.calls
            .lock()
            .map(|calls| calls.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl QueryClient for MockQueryClient {
    async fn query(&self, query: &str, include_deleted: bool) -> Result<Value> {
        if let Ok(mut calls) = self.calls.lock() {
            calls.push(RecordedQuery {
                query: query.to_string(),
                include_deleted,
            });
        }
        Ok(self.response.clone())
    }
}

/// A mock client that fails every query with an API error.
#[derive(Debug, Clone)]
pub struct FailingQueryClient {
    message: String,
}

impl FailingQueryClient {
    /// Creates a mock that fails with `message`.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[async_trait]
impl QueryClient for FailingQueryClient {
    async fn query(&self, _query: &str, _include_deleted: bool) -> Result<Value> {
        Err(J1Error::api(self.message.clone()))
    }
}
