//! Query-to-table pipeline.
//!
//! Runs one query through the client, normalizes every record, and writes the
//! resulting table. Nothing is written until the whole response has been
//! normalized, so a failure never leaves partial output behind.

use std::io::Write;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::client::QueryClient;
use crate::error::{J1Error, Result};
use crate::output::{write_table, OutputFormat};
use crate::table::{classify, normalize_as, RecordShape, Table};

/// Everything needed to run one query.
#[derive(Debug, Clone, Default)]
pub struct QueryRequest {
    /// J1QL query text.
    pub query: String,
    /// Include soft-deleted entities in the results.
    pub include_deleted: bool,
    /// Rendering for stdout.
    pub format: OutputFormat,
}

impl QueryRequest {
    /// Creates a request for `query` with default options.
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    /// Sets whether deleted entities are included.
    pub fn with_include_deleted(mut self, include_deleted: bool) -> Self {
        self.include_deleted = include_deleted;
        self
    }

    /// Sets the output format.
    pub fn with_format(mut self, format: OutputFormat) -> Self {
        self.format = format;
        self
    }
}

/// Builds a table from a raw query response.
///
/// Responses without a `data` key are tree results and are rejected with
/// [`J1Error::TreeQuery`].
pub fn build_table(response: Value) -> Result<Table> {
    let records = match response {
        Value::Object(mut body) => match body.remove("data") {
            Some(Value::Array(records)) => records,
            Some(Value::Null) => Vec::new(),
            Some(other) => {
                return Err(J1Error::api(format!(
                    "Expected a list of records in 'data', got {}",
                    json_kind(&other)
                )))
            }
            None => return Err(J1Error::TreeQuery),
        },
        _ => return Err(J1Error::TreeQuery),
    };

    let mut table = Table::new();
    let mut shapes: Vec<RecordShape> = Vec::new();

    for (index, record) in records.into_iter().enumerate() {
        let record = match record {
            Value::Object(map) => map,
            other => {
                warn!(index, kind = json_kind(&other), "skipping fields of non-object record");
                Map::new()
            }
        };

        let shape = classify(&record);
        if !shapes.contains(&shape) {
            shapes.push(shape);
        }
        table.push(normalize_as(&record, shape));
    }

    if shapes.len() > 1 {
        let names: Vec<&str> = shapes.iter().map(RecordShape::as_str).collect();
        warn!(shapes = ?names, "records in one response have different shapes");
    }
    debug!(
        rows = table.len(),
        columns = table.columns().len(),
        "normalized response"
    );

    Ok(table)
}

/// Executes the query and returns the normalized table.
pub async fn fetch_table(client: &dyn QueryClient, request: &QueryRequest) -> Result<Table> {
    info!(include_deleted = request.include_deleted, "executing query");
    let response = client.query(&request.query, request.include_deleted).await?;
    build_table(response)
}

/// Executes the query and writes the table to `writer`.
///
/// Returns the number of rows written.
pub async fn run<W: Write>(
    client: &dyn QueryClient,
    request: &QueryRequest,
    writer: W,
) -> Result<usize> {
    let table = fetch_table(client, request).await?;
    write_table(&table, request.format, writer)?;
    Ok(table.len())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
