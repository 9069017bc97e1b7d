//! In-memory grid store used by tests

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use std::sync::{Arc, Mutex};

use super::accessor::{AccessorProvider, GridAccessor};
use super::models::{Grid, Row, cell_text};
use crate::api::RemoteError;
use crate::api::models::{AppendSummary, InsertDataOption, ValueInputOption};

static ROW_NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"!A(\d+):").unwrap());
static LAST_COLUMN: Lazy<Regex> = Lazy::new(|| Regex::new(r"!A:([A-Z]+)$").unwrap());

/// A call received by [`MemoryGrid`]
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Get(String),
    Append {
        range: String,
        mode: ValueInputOption,
        insert: InsertDataOption,
        rows: Vec<Vec<Value>>,
    },
    Update {
        range: String,
        mode: ValueInputOption,
        rows: Vec<Row>,
    },
}

/// Single-sheet store that records every call
#[derive(Debug, Default)]
pub struct MemoryGrid {
    grid: Mutex<Grid>,
    calls: Mutex<Vec<Call>>,
    /// Reject the update call with this zero-based index
    fail_update: Option<usize>,
}

impl MemoryGrid {
    pub fn new(rows: &[&[&str]]) -> Self {
        let grid = rows
            .iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect();
        Self {
            grid: Mutex::new(grid),
            ..Default::default()
        }
    }

    pub fn failing_update(mut self, index: usize) -> Self {
        self.fail_update = Some(index);
        self
    }

    pub fn grid(&self) -> Grid {
        self.grid.lock().unwrap().clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn updates(&self) -> Vec<(String, Row)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Update { range, mut rows, .. } => Some((range, rows.remove(0))),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GridAccessor for MemoryGrid {
    async fn get(&self, range: &str) -> Result<Grid, RemoteError> {
        self.calls.lock().unwrap().push(Call::Get(range.to_string()));

        // Like the real store, only cells inside the requested columns come back
        let mut grid = self.grid();
        if let Some(caps) = LAST_COLUMN.captures(range) {
            let width = crate::api::range::column_number(&caps[1]);
            for row in &mut grid {
                row.truncate(width);
            }
        }
        Ok(grid)
    }

    async fn append(
        &self,
        range: &str,
        mode: ValueInputOption,
        insert: InsertDataOption,
        rows: &[Vec<Value>],
    ) -> Result<AppendSummary, RemoteError> {
        self.calls.lock().unwrap().push(Call::Append {
            range: range.to_string(),
            mode,
            insert,
            rows: rows.to_vec(),
        });

        let mut grid = self.grid.lock().unwrap();
        let first = grid.len() + 1;
        for row in rows {
            grid.push(row.iter().map(cell_text).collect());
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        Ok(AppendSummary {
            spreadsheet_id: Some("memory".to_string()),
            updated_range: Some(format!("Sheet1!A{}:B{}", first, grid.len())),
            updated_rows: Some(rows.len() as u64),
            updated_columns: Some(columns as u64),
            updated_cells: Some(rows.iter().map(Vec::len).sum::<usize>() as u64),
            ..AppendSummary::default()
        })
    }

    async fn update(
        &self,
        range: &str,
        mode: ValueInputOption,
        rows: &[Row],
    ) -> Result<(), RemoteError> {
        let index = {
            let mut calls = self.calls.lock().unwrap();
            let index = calls
                .iter()
                .filter(|c| matches!(c, Call::Update { .. }))
                .count();
            calls.push(Call::Update {
                range: range.to_string(),
                mode,
                rows: rows.to_vec(),
            });
            index
        };

        if self.fail_update == Some(index) {
            return Err(RemoteError::from_response(
                429,
                r#"{"error":{"code":429,"status":"RESOURCE_EXHAUSTED","message":"Quota exceeded"}}"#,
            ));
        }

        let row_number: usize = ROW_NUMBER.captures(range).unwrap()[1].parse().unwrap();
        let mut grid = self.grid.lock().unwrap();
        if grid.len() < row_number {
            grid.resize(row_number, Vec::new());
        }
        grid[row_number - 1] = rows[0].clone();
        Ok(())
    }
}

/// Provider handing out a shared [`MemoryGrid`]
pub struct MemoryProvider(pub Arc<MemoryGrid>);

#[async_trait]
impl AccessorProvider for MemoryProvider {
    async fn accessor(&self) -> Result<Arc<dyn GridAccessor>, RemoteError> {
        Ok(self.0.clone())
    }
}

/// Provider whose client can never be built
pub struct UnavailableProvider;

#[async_trait]
impl AccessorProvider for UnavailableProvider {
    async fn accessor(&self) -> Result<Arc<dyn GridAccessor>, RemoteError> {
        Err(RemoteError::Transport(
            "Failed to read credentials file: ./credentials.json".to_string(),
        ))
    }
}
