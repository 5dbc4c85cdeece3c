//! JupiterOne GraphQL client.
//!
//! Runs J1QL through the `queryV1` GraphQL field, following cursors until the
//! result set is exhausted.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::time::Duration;
use tracing::{debug, warn};

use super::{ClientConfig, QueryClient};
use crate::error::{J1Error, Result};

/// GraphQL document for one page of a J1QL query.
pub const PAGE_QUERY: &str = r#"
  query J1QL_v2(
    $query: String!
    $variables: JSON
    $flags: QueryV1Flags
    $includeDeleted: Boolean
    $cursor: String
  ) {
    queryV1(
      query: $query
      variables: $variables
      deferredResponse: DISABLED
      flags: $flags
      includeDeleted: $includeDeleted
      cursor: $cursor
    ) {
      type
      data
      cursor
    }
  }
"#;

/// First backoff delay for throttled requests.
const BACKOFF_BASE_MS: u64 = 1000;

/// Upper bound for a single backoff delay.
const BACKOFF_MAX_MS: u64 = 10_000;

/// HTTP client for the JupiterOne query API.
#[derive(Debug, Clone)]
pub struct JupiterOneClient {
    config: ClientConfig,
    client: Client,
}

#[derive(Debug, Serialize)]
struct GraphQlRequest {
    query: &'static str,
    variables: Value,
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse {
    data: Option<QueryData>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryData {
    query_v1: Option<QueryPage>,
}

/// One page of `queryV1` output.
#[derive(Debug, Deserialize)]
struct QueryPage {
    #[serde(rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    data: Value,
    cursor: Option<String>,
}

impl JupiterOneClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ClientConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| J1Error::connection(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    /// Builds the GraphQL request body for one page.
    fn request_body(query: &str, include_deleted: bool, cursor: Option<&str>) -> GraphQlRequest {
        let mut variables = json!({
            "query": query,
            "includeDeleted": include_deleted,
        });
        if let Some(cursor) = cursor {
            variables["cursor"] = Value::String(cursor.to_string());
        }

        GraphQlRequest {
            query: PAGE_QUERY,
            variables,
        }
    }

    /// Parses an API error response.
    fn parse_error(status: StatusCode, body: &str) -> J1Error {
        if status == StatusCode::UNAUTHORIZED {
            return J1Error::auth("401: Unauthorized. Check your account ID and API token.");
        }

        if status == StatusCode::FORBIDDEN {
            return J1Error::auth(format!("403: Forbidden. {}", body.trim()));
        }

        if let Ok(response) = serde_json::from_str::<GraphQlResponse>(body) {
            if let Some(first) = response.errors.first() {
                return J1Error::api(format!("{} ({})", first.message, status));
            }
        }

        J1Error::api(format!("JupiterOne API error ({}): {}", status, body.trim()))
    }

    /// Extracts the `queryV1` page from a successful response body.
    fn parse_page(body: &str) -> Result<QueryPage> {
        let response: GraphQlResponse = serde_json::from_str(body)
            .map_err(|e| J1Error::api(format!("Failed to parse response: {}", e)))?;

        if let Some(first) = response.errors.first() {
            return Err(J1Error::api(first.message.clone()));
        }

        response
            .data
            .and_then(|data| data.query_v1)
            .ok_or_else(|| J1Error::api("Response did not contain queryV1 data"))
    }

    /// Backoff delay before retry number `attempt` (zero-based).
    fn backoff_delay(attempt: u32) -> Duration {
        let factor = 1u64.checked_shl(attempt).unwrap_or(u64::MAX);
        Duration::from_millis(BACKOFF_BASE_MS.saturating_mul(factor).min(BACKOFF_MAX_MS))
    }

    /// Posts one page request, retrying throttled responses.
    async fn fetch_page(
        &self,
        query: &str,
        include_deleted: bool,
        cursor: Option<&str>,
    ) -> Result<QueryPage> {
        let request = Self::request_body(query, include_deleted, cursor);
        let mut attempt = 0;

        loop {
            let response = self
                .client
                .post(&self.config.api_url)
                .bearer_auth(&self.config.token)
                .header("JupiterOne-Account", &self.config.account_id)
                .header("Content-Type", "application/json")
                .json(&request)
                .send()
                .await
                .map_err(|e| {
                    if e.is_timeout() {
                        J1Error::connection("Request timed out. Try again.")
                    } else if e.is_connect() {
                        J1Error::connection(format!(
                            "Failed to connect to {}. Check your network.",
                            self.config.api_url
                        ))
                    } else {
                        J1Error::connection(format!("Request failed: {}", e))
                    }
                })?;

            let status = response.status();
            let body = response
                .text()
                .await
                .map_err(|e| J1Error::connection(format!("Failed to read response: {}", e)))?;

            let throttled = status == StatusCode::TOO_MANY_REQUESTS
                || status == StatusCode::SERVICE_UNAVAILABLE;
            if throttled && attempt < self.config.max_retries {
                let delay = Self::backoff_delay(attempt);
                warn!(%status, attempt, ?delay, "JupiterOne API throttled the request, retrying");
                tokio::time::sleep(delay).await;
                attempt += 1;
                continue;
            }

            if !status.is_success() {
                return Err(Self::parse_error(status, &body));
            }

            return Self::parse_page(&body);
        }
    }
}

/// Returns true for the `{vertices, edges}` payload of a TREE query.
fn is_tree(data: &Value) -> bool {
    data.get("vertices").is_some() && data.get("edges").is_some()
}

#[async_trait]
impl QueryClient for JupiterOneClient {
    async fn query(&self, query: &str, include_deleted: bool) -> Result<Value> {
        let mut records = Vec::new();
        let mut cursor: Option<String> = None;
        let mut pages = 0usize;

        loop {
            let page = self
                .fetch_page(query, include_deleted, cursor.as_deref())
                .await?;
            pages += 1;

            match page.data {
                Value::Array(items) => {
                    debug!(page = pages, records = items.len(), "fetched page");
                    records.extend(items);
                }
                Value::Null => debug!(page = pages, "fetched empty page"),
                other => {
                    debug!(
                        kind = page.kind.as_deref().unwrap_or("unknown"),
                        tree = is_tree(&other),
                        "query returned a non-list result"
                    );
                    return Ok(other);
                }
            }

            match page.cursor {
                Some(next) if cursor.as_deref() == Some(next.as_str()) => {
                    warn!(cursor = %next, "API repeated the previous cursor, stopping pagination");
                    break;
                }
                Some(next) if !next.is_empty() => cursor = Some(next),
                _ => break,
            }
        }

        debug!(pages, records = records.len(), "query complete");
        Ok(json!({ "data": records }))
    }
}
