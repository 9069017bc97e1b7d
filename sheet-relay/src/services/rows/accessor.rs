//! The remote grid store as seen by the row engine

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;

use super::models::{Grid, Row};
use crate::api::RemoteError;
use crate::api::models::{AppendSummary, InsertDataOption, ValueInputOption};

/// Read and write access to a spreadsheet's cell grid
#[async_trait]
pub trait GridAccessor: Send + Sync {
    /// Fetch every row in `range` as text cells
    async fn get(&self, range: &str) -> Result<Grid, RemoteError>;

    /// Insert `rows` after the last populated row of `range`
    async fn append(
        &self,
        range: &str,
        mode: ValueInputOption,
        insert: InsertDataOption,
        rows: &[Vec<Value>],
    ) -> Result<AppendSummary, RemoteError>;

    /// Overwrite the cells of `range` with `rows`
    async fn update(&self, range: &str, mode: ValueInputOption, rows: &[Row])
    -> Result<(), RemoteError>;
}

/// Hands out the accessor for a request without the caller constructing it
#[async_trait]
pub trait AccessorProvider: Send + Sync {
    async fn accessor(&self) -> Result<Arc<dyn GridAccessor>, RemoteError>;
}
