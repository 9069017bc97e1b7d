//! A1-notation helpers for addressing sheet ranges

use once_cell::sync::Lazy;
use regex::Regex;

static COLUMN_LETTERS: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z]{1,3}$").unwrap());

/// Quote a sheet name for use in A1 notation
/// e.g., `Sheet1` -> `'Sheet1'`, `Bob's` -> `'Bob''s'`
pub fn quote_sheet_name(sheet_name: &str) -> String {
    format!("'{}'", sheet_name.replace('\'', "''"))
}

/// Columns A through `last_column` of every row
pub fn column_span(sheet_name: &str, last_column: &str) -> String {
    format!("{}!A:{}", quote_sheet_name(sheet_name), last_column)
}

/// Anchor range used for appends (the store appends after the last populated row)
pub fn append_anchor(sheet_name: &str) -> String {
    format!("{}!A1", quote_sheet_name(sheet_name))
}

/// Single-row range from column A to `last_column`
/// `row_number` is 1-based, as the store counts rows
pub fn row_span(sheet_name: &str, row_number: usize, last_column: &str) -> String {
    format!(
        "{}!A{}:{}{}",
        quote_sheet_name(sheet_name),
        row_number,
        last_column,
        row_number
    )
}

/// 1-based position of a column reference: `A` -> 1, `Z` -> 26, `AB` -> 28
pub fn column_number(column: &str) -> usize {
    column
        .bytes()
        .fold(0, |n, b| n * 26 + usize::from(b.to_ascii_uppercase().saturating_sub(b'A')) + 1)
}

/// Whether `column` is a plain column reference such as `Z` or `AB`
pub fn is_column_letters(column: &str) -> bool {
    COLUMN_LETTERS.is_match(column)
}
