//! Helpers shared between subcommands.

use comfy_table::{Table, presets::UTF8_FULL_CONDENSED};
use serde_json::Value;

/// A table with the house preset applied.
pub fn table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_header(header);
    table
}

/// A string field of a document, empty when absent, for table cells.
pub fn doc_str<'a>(doc: &'a Value, pointer: &str) -> &'a str {
    doc.pointer(pointer).and_then(Value::as_str).unwrap_or("")
}

/// The version number of a document, for table cells.
pub fn doc_version(doc: &Value) -> u64 {
    doc.get("_version").and_then(Value::as_u64).unwrap_or(1)
}
