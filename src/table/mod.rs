//! Table output for search hits
//!
//! One column per selected field, one row per hit, each cell resolved with
//! [`crate::output::fields::resolve`].

use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use serde_json::Value as JsonValue;

use crate::output::fields::{display_value, resolve};

/// Column used when no fields were selected
pub const DEFAULT_COLUMN: &str = "_id";

/// Format `hits` as a grid with one column per entry in `columns`
pub fn format_hits_table(columns: &[String], hits: &[JsonValue], styled: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    if !styled {
        table.force_no_tty();
    }

    let header: Vec<Cell> = columns
        .iter()
        .map(|col| {
            let cell = Cell::new(col);
            if styled {
                cell.add_attribute(Attribute::Bold)
            } else {
                cell
            }
        })
        .collect();
    table.set_header(header);

    for hit in hits {
        let row: Vec<Cell> = columns
            .iter()
            .map(|col| Cell::new(display_value(&resolve(col, hit))))
            .collect();
        table.add_row(row);
    }

    table.to_string()
}

/// Selected fields, or just `_id`
pub fn columns_for(fields: Option<&[String]>) -> Vec<String> {
    match fields {
        Some(fields) if !fields.is_empty() => fields.to_vec(),
        _ => vec![DEFAULT_COLUMN.to_string()],
    }
}
