//! Wire types for the Google Sheets v4 `spreadsheets.values` endpoints

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the store interprets incoming cell values
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ValueInputOption {
    /// Parsed as if typed by a user (formulas, numbers, dates, leading `'`)
    UserEntered,
}

impl ValueInputOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            ValueInputOption::UserEntered => "USER_ENTERED",
        }
    }
}

/// How appended data is placed relative to existing rows
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum InsertDataOption {
    /// New rows are inserted instead of overwriting cells below the table
    InsertRows,
}

impl InsertDataOption {
    pub fn as_str(&self) -> &'static str {
        match self {
            InsertDataOption::InsertRows => "INSERT_ROWS",
        }
    }
}

/// `ValueRange` resource; `values` is omitted by the API when the range is empty
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

/// Summary the store reports for a write (`UpdateValuesResponse`)
///
/// Fields not modelled here (such as `updatedData`) are kept in `extra` and
/// serialized back unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendSummary {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spreadsheet_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_range: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_rows: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_columns: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_cells: Option<u64>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Response of `values.append`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendValuesResponse {
    pub table_range: Option<String>,
    #[serde(default)]
    pub updates: AppendSummary,
}
