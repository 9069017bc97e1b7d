//! Row-level request types and request-body validation

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

use crate::error::RelayError;

/// One row of text cells
pub type Row = Vec<String>;

/// Ordered rows; row 0 is the header row
pub type Grid = Vec<Row>;

/// How a condition's value is compared against a cell
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Comparison {
    /// Both sides coerced to numbers; non-numeric text never matches
    #[default]
    Numeric,
    /// Trimmed text must be identical
    Text,
}

/// A column/value pair a candidate row must satisfy
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub column: String,
    pub value: Value,
    #[serde(default)]
    pub compare: Comparison,
}

#[cfg(test)]
impl Condition {
    pub fn new(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition {
            column: column.into(),
            value: value.into(),
            compare: Comparison::Numeric,
        }
    }

    pub fn text(column: impl Into<String>, value: impl Into<Value>) -> Self {
        Condition {
            compare: Comparison::Text,
            ..Condition::new(column, value)
        }
    }
}

/// Conditions locating one row plus the cells to overwrite in it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateInstruction {
    pub conditions: Vec<Condition>,
    /// Column name -> new cell value (applied in name order)
    pub values: BTreeMap<String, Value>,
}

/// Validated body of `POST /update`
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateRequest {
    pub sheet_name: String,
    pub rows: Vec<UpdateInstruction>,
}

impl UpdateRequest {
    pub fn from_json(body: Value) -> Result<Self, RelayError> {
        if !body.is_object() {
            return Err(RelayError::validation(
                "Invalid request body. Expected { \"sheetName\": \"...\", \"rows\": [...] }",
            ));
        }

        let request: UpdateRequest = serde_json::from_value(body)
            .map_err(|e| RelayError::Validation(format!("Invalid request body: {}", e)))?;

        if request.sheet_name.trim().is_empty() {
            return Err(RelayError::validation(
                "Invalid request body: \"sheetName\" must be a non-empty string",
            ));
        }
        if request.rows.is_empty() {
            return Err(RelayError::validation(
                "Invalid request body: \"rows\" must contain at least one update",
            ));
        }

        Ok(request)
    }
}

/// Validated body of `POST /append`
#[derive(Debug, Clone, PartialEq)]
pub struct AppendRequest {
    pub sheet_name: Option<String>,
    pub values: Vec<Vec<Value>>,
}

impl AppendRequest {
    pub fn from_json(body: Value) -> Result<Self, RelayError> {
        let Value::Object(mut body) = body else {
            return Err(missing_values());
        };

        let sheet_name = match body.remove("sheetName") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) if !name.trim().is_empty() => Some(name),
            Some(_) => {
                return Err(RelayError::validation(
                    "Invalid request body: \"sheetName\" must be a non-empty string",
                ));
            }
        };

        let values = validate_rows(body.remove("values"))?;

        Ok(AppendRequest { sheet_name, values })
    }
}

/// Check that `values` is a non-empty array whose every element is an array
pub fn validate_rows(values: Option<Value>) -> Result<Vec<Vec<Value>>, RelayError> {
    let Some(Value::Array(rows)) = values else {
        return Err(missing_values());
    };
    if rows.is_empty() {
        return Err(missing_values());
    }

    rows.into_iter()
        .map(|row| match row {
            Value::Array(cells) => Ok(cells),
            _ => Err(RelayError::validation(
                "Invalid request body format. \"values\" should be an array of arrays, e.g., { \"values\": [[\"value1\", \"value2\"]] }",
            )),
        })
        .collect()
}

fn missing_values() -> RelayError {
    RelayError::validation("Invalid request body. Expected { \"values\": [...] }")
}

/// Text form of a JSON value as it is written into a cell
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(true) => "TRUE".to_string(),
        Value::Bool(false) => "FALSE".to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}
