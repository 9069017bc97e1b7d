//! Merging new cell values into a located row

use serde_json::Value;
use std::collections::BTreeMap;

use super::matcher::HeaderIndex;
use super::models::{Row, cell_text};
use crate::error::RelayError;

/// Position of the identifier column that is always written back as literal text
pub const TEXT_COLUMN: usize = 1;

/// Leading apostrophe makes `USER_ENTERED` writes keep the cell as text
pub const TEXT_MARKER: char = '\'';

/// Overwrite the named columns of `existing`, leaving every other cell untouched
///
/// Writing past the end of the row pads it with empty cells. Afterwards the
/// cell at [`TEXT_COLUMN`] is always reset to the existing value prefixed with
/// [`TEXT_MARKER`], so a new value supplied for that column is discarded.
pub fn merge(
    header: &HeaderIndex<'_>,
    existing: &[String],
    values: &BTreeMap<String, Value>,
) -> Result<Row, RelayError> {
    let mut merged: Row = existing.to_vec();

    for (column, value) in values {
        let position = header
            .position(column)
            .ok_or_else(|| RelayError::Schema {
                column: column.clone(),
            })?;

        if position >= merged.len() {
            merged.resize(position + 1, String::new());
        }
        merged[position] = cell_text(value);
    }

    if let Some(cell) = merged.get_mut(TEXT_COLUMN) {
        let original = existing.get(TEXT_COLUMN).map(String::as_str).unwrap_or("");
        *cell = format!("{}{}", TEXT_MARKER, original);
    }

    Ok(merged)
}
