//! Batch update orchestration: fetch, locate, merge, write back

use log::{debug, info, warn};

use super::accessor::GridAccessor;
use super::matcher::{HeaderIndex, locate};
use super::merge::merge;
use super::models::{Grid, Row, UpdateInstruction};
use crate::api::models::ValueInputOption;
use crate::api::range;
use crate::error::RelayError;

/// Column every row write spans to (A through this column)
pub const DEFAULT_LAST_COLUMN: &str = "Z";

#[derive(Debug, Clone)]
pub struct UpdateOptions {
    pub last_column: String,
}

impl Default for UpdateOptions {
    fn default() -> Self {
        Self {
            last_column: DEFAULT_LAST_COLUMN.to_string(),
        }
    }
}

/// A merged row waiting to be written
#[derive(Debug, Clone, PartialEq)]
pub struct PendingWrite {
    /// Index of the instruction that produced this write
    pub instruction: usize,
    /// Zero-based grid index of the target row
    pub row_index: usize,
    pub range: String,
    pub row: Row,
}

/// Result of a batch update
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// Instructions whose conditions located a row (and were written)
    pub updated_count: usize,
    pub submitted: usize,
}

impl UpdateOutcome {
    pub fn skipped(&self) -> usize {
        self.submitted - self.updated_count
    }
}

/// Resolve every instruction against `grid` without touching the store
///
/// Instructions that locate no row are skipped. An unknown column in any
/// located instruction fails the whole batch. Merged rows never extend past
/// `options.last_column`.
pub fn plan_updates(
    grid: &Grid,
    sheet_name: &str,
    instructions: &[UpdateInstruction],
    options: &UpdateOptions,
) -> Result<Vec<PendingWrite>, RelayError> {
    let Some(header) = grid.first() else {
        return Err(no_data(sheet_name));
    };
    let index = HeaderIndex::new(header);
    let width = range::column_number(&options.last_column);

    let mut writes = Vec::new();
    for (i, instruction) in instructions.iter().enumerate() {
        let Some(row_index) = locate(grid, &index, &instruction.conditions) else {
            info!(
                "Update {} on '{}': no row matches {:?}, skipping",
                i, sheet_name, instruction.conditions
            );
            continue;
        };

        let mut row = merge(&index, &grid[row_index], &instruction.values)?;
        row.truncate(width);
        let range = range::row_span(sheet_name, row_index + 1, &options.last_column);
        debug!("Update {} on '{}': row {} -> {}", i, sheet_name, row_index + 1, range);

        writes.push(PendingWrite {
            instruction: i,
            row_index,
            range,
            row,
        });
    }

    Ok(writes)
}

/// Apply `instructions` to the sheet, writing matched rows one at a time
///
/// Writes are issued in instruction order; when two instructions hit the same
/// row the later write wins. The first failed write aborts the batch and
/// earlier writes stay in place.
pub async fn process_updates(
    accessor: &dyn GridAccessor,
    sheet_name: &str,
    instructions: &[UpdateInstruction],
    options: &UpdateOptions,
) -> Result<UpdateOutcome, RelayError> {
    let grid = accessor
        .get(&range::column_span(sheet_name, &options.last_column))
        .await?;
    if let Some(header) = grid.first() {
        debug!("Header row of '{}': {:?}", sheet_name, header);
    }

    let writes = plan_updates(&grid, sheet_name, instructions, options)?;

    for (done, write) in writes.iter().enumerate() {
        let rows = std::slice::from_ref(&write.row);
        if let Err(err) = accessor
            .update(&write.range, ValueInputOption::UserEntered, rows)
            .await
        {
            warn!(
                "Write to {} failed after {} of {} rows were written: {}",
                write.range,
                done,
                writes.len(),
                err
            );
            return Err(err.into());
        }
    }

    let outcome = UpdateOutcome {
        updated_count: writes.len(),
        submitted: instructions.len(),
    };
    info!(
        "Updated {} of {} rows in '{}' ({} skipped)",
        outcome.updated_count,
        outcome.submitted,
        sheet_name,
        outcome.skipped()
    );

    Ok(outcome)
}

fn no_data(sheet_name: &str) -> RelayError {
    RelayError::NotFound(format!("No data found in sheet '{}'", sheet_name))
}
