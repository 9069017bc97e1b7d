//! Google Sheets v4 values client

use async_trait::async_trait;
use log::{debug, error, info};
use reqwest::{RequestBuilder, Response};
use serde_json::{Value, json};
use std::time::Instant;

use super::auth::AuthManager;
use super::error::RemoteError;
use super::models::{
    AppendSummary, AppendValuesResponse, InsertDataOption, ValueInputOption, ValueRange,
};
use super::resilience::{ConcurrencyLimiter, MonitoringConfig, ResilienceConfig};
use crate::services::rows::models::{Grid, Row, cell_text};
use crate::services::rows::GridAccessor;

/// Client bound to one spreadsheet
pub struct SheetsClient {
    http: reqwest::Client,
    auth: AuthManager,
    spreadsheet_id: String,
    base_url: String,
    limiter: ConcurrencyLimiter,
    monitoring: MonitoringConfig,
}

impl SheetsClient {
    pub fn new(
        http: reqwest::Client,
        auth: AuthManager,
        spreadsheet_id: impl Into<String>,
        base_url: impl Into<String>,
        resilience: &ResilienceConfig,
    ) -> Self {
        Self {
            http,
            auth,
            spreadsheet_id: spreadsheet_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            limiter: ConcurrencyLimiter::new(resilience.concurrency.clone()),
            monitoring: resilience.monitoring.clone(),
        }
    }

    pub fn service_account(&self) -> &str {
        self.auth.client_email()
    }

    /// Obtain an access token, proving the credentials work
    pub async fn verify(&self) -> Result<(), RemoteError> {
        self.auth.access_token().await.map(|_| ())
    }

    fn values_url(&self, range: &str) -> String {
        values_url(&self.base_url, &self.spreadsheet_id, range)
    }

    /// Send an authorized request, turning non-success responses into errors
    async fn send(&self, operation: &str, request: RequestBuilder) -> Result<Response, RemoteError> {
        let token = self.auth.access_token().await?;
        let _permit = self
            .limiter
            .acquire()
            .await
            .map_err(|e| RemoteError::Transport(e.to_string()))?;

        let started = Instant::now();
        let response = request.bearer_auth(token).send().await?;
        let status = response.status();

        if self.monitoring.request_logging {
            let stats = self.limiter.stats();
            debug!(
                "Sheets {} -> {} in {:.1}ms ({} free slots, {:.0}% of calls waited)",
                operation,
                status.as_u16(),
                started.elapsed().as_secs_f64() * 1000.0,
                stats.available_permits,
                stats.wait_rate() * 100.0
            );
        }

        if status.is_success() {
            return Ok(response);
        }

        let body = response.text().await.unwrap_or_default();
        let err = RemoteError::from_response(status.as_u16(), &body);
        error!("Sheets {} failed: {}", operation, err);
        Err(err)
    }
}

/// URL of the `values` resource for `range` (the range is percent-encoded)
pub fn values_url(base_url: &str, spreadsheet_id: &str, range: &str) -> String {
    format!(
        "{}/v4/spreadsheets/{}/values/{}",
        base_url,
        urlencoding::encode(spreadsheet_id),
        urlencoding::encode(range)
    )
}

/// Convert a fetched `ValueRange` into text cells
pub fn grid_from_values(values: Vec<Vec<Value>>) -> Grid {
    values
        .into_iter()
        .map(|row| row.iter().map(cell_text).collect())
        .collect()
}

#[async_trait]
impl GridAccessor for SheetsClient {
    async fn get(&self, range: &str) -> Result<Grid, RemoteError> {
        let request = self.http.get(self.values_url(range));
        let response = self.send("get", request).await?;
        let value_range: ValueRange = response.json().await?;

        let fetched = value_range.range.unwrap_or_else(|| range.to_string());
        let grid = grid_from_values(value_range.values);
        debug!("Fetched {} rows from {}", grid.len(), fetched);
        Ok(grid)
    }

    async fn append(
        &self,
        range: &str,
        mode: ValueInputOption,
        insert: InsertDataOption,
        rows: &[Vec<Value>],
    ) -> Result<AppendSummary, RemoteError> {
        let url = format!("{}:append", self.values_url(range));
        let request = self
            .http
            .post(url)
            .query(&[
                ("valueInputOption", mode.as_str()),
                ("insertDataOption", insert.as_str()),
            ])
            .json(&json!({ "values": rows }));

        let response = self.send("append", request).await?;
        let appended: AppendValuesResponse = response.json().await?;

        info!(
            "Appended {} rows to {} (table {})",
            appended.updates.updated_rows.unwrap_or(0),
            appended.updates.updated_range.as_deref().unwrap_or(range),
            appended.table_range.as_deref().unwrap_or("-")
        );
        Ok(appended.updates)
    }

    async fn update(
        &self,
        range: &str,
        mode: ValueInputOption,
        rows: &[Row],
    ) -> Result<(), RemoteError> {
        let request = self
            .http
            .put(self.values_url(range))
            .query(&[("valueInputOption", mode.as_str())])
            .json(&json!({
                "range": range,
                "majorDimension": "ROWS",
                "values": rows,
            }));

        self.send("update", request).await?;
        debug!("Wrote {}", range);
        Ok(())
    }
}
