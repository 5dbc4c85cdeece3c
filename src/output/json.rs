//! Newline-delimited JSON rendering.

use std::io::Write;

use serde_json::{Map, Value};

use crate::error::{J1Error, Result};
use crate::table::Table;

/// Writes one JSON object per row, keys in table column order.
///
/// Every object carries every column; absent cells are written as `null`.
pub fn write_json_lines<W: Write>(table: &Table, mut writer: W) -> Result<()> {
    for row in table.rows() {
        let object: Map<String, Value> = table
            .columns()
            .iter()
            .zip(table.cells(row))
            .map(|(column, cell)| (column.clone(), cell.cloned().unwrap_or(Value::Null)))
            .collect();

        serde_json::to_writer(&mut writer, &object)
            .map_err(|e| J1Error::output(format!("Failed to serialize row: {e}")))?;
        writer.write_all(b"\n")?;
    }

    writer.flush()?;
    Ok(())
}
