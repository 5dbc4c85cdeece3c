//! CSV rendering.

use std::io::Write;

use serde_json::Value;

use crate::error::Result;
use crate::table::Table;

/// Writes a header row followed by one record per table row.
///
/// Missing and null cells are written empty. A table without columns produces
/// no output at all.
pub fn write_csv<W: Write>(table: &Table, writer: W) -> Result<()> {
    if table.columns().is_empty() {
        return Ok(());
    }

    let mut wtr = ::csv::Writer::from_writer(writer);
    wtr.write_record(table.columns())?;

    for row in table.rows() {
        let record: Vec<String> = table.cells(row).map(cell_to_string).collect();
        wtr.write_record(&record)?;
    }

    wtr.flush()?;
    Ok(())
}

/// Renders one cell. Nested values are written as compact JSON.
pub(crate) fn cell_to_string(cell: Option<&Value>) -> String {
    match cell {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(Value::Number(n)) => n.to_string(),
        Some(nested @ (Value::Array(_) | Value::Object(_))) => nested.to_string(),
    }
}
