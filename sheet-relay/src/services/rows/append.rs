//! Append orchestration

use log::debug;
use serde_json::Value;

use super::accessor::GridAccessor;
use crate::api::models::{AppendSummary, InsertDataOption, ValueInputOption};
use crate::error::RelayError;

/// Insert `rows` after the last populated row of `target_range`
///
/// Values are interpreted as if typed by a user, so formulas and number
/// formats take effect. The store's summary is returned unmodified.
pub async fn append_rows(
    accessor: &dyn GridAccessor,
    target_range: &str,
    rows: &[Vec<Value>],
) -> Result<AppendSummary, RelayError> {
    if rows.is_empty() {
        return Err(RelayError::validation(
            "Invalid request body. Expected { \"values\": [...] }",
        ));
    }

    debug!("Appending {} rows to {}", rows.len(), target_range);

    let summary = accessor
        .append(
            target_range,
            ValueInputOption::UserEntered,
            InsertDataOption::InsertRows,
            rows,
        )
        .await?;

    Ok(summary)
}
