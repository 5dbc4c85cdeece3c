//! Tabular view of query results.
//!
//! Records returned by the API are normalized into [`FlatRow`]s and collected
//! into a [`Table`] whose columns are the union of every row's keys.

pub mod normalize;
pub mod shape;

pub use normalize::{flatten_into, normalize, normalize_as};
pub use shape::{classify, RecordShape};

use std::collections::HashSet;

use serde_json::{Map, Value};

/// One output row: column name to value, in insertion order.
pub type FlatRow = Map<String, Value>;

/// Ordered collection of rows with a first-seen column registry.
///
/// Rows are stored sparse. A row that lacks a column is resolved to an empty
/// cell by the writers, never backfilled here.
#[derive(Debug, Clone, Default)]
pub struct Table {
    columns: Vec<String>,
    known: HashSet<String>,
    rows: Vec<FlatRow>,
}

impl Table {
    /// Creates an empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a row, registering any columns not seen before.
    pub fn push(&mut self, row: FlatRow) {
        for column in row.keys() {
            if !self.known.contains(column) {
                self.known.insert(column.clone());
                self.columns.push(column.clone());
            }
        }
        self.rows.push(row);
    }

    /// Column names in first-seen order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Rows in insertion order.
    pub fn rows(&self) -> &[FlatRow] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if no rows have been added.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Iterates a row's cells in column order; absent cells yield `None`.
    pub fn cells<'a>(&'a self, row: &'a FlatRow) -> impl Iterator<Item = Option<&'a Value>> + 'a {
        self.columns.iter().map(move |column| row.get(column))
    }
}

impl FromIterator<FlatRow> for Table {
    fn from_iter<I: IntoIterator<Item = FlatRow>>(iter: I) -> Self {
        let mut table = Table::new();
        for row in iter {
            table.push(row);
        }
        table
    }
}
