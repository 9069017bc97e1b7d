use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use log::{debug, error, info};
use serde_json::Value;

use super::AppState;
use super::response::{APPEND_FAILED, ApiError, AppendResponse, UPDATE_FAILED, UpdateResponse};
use crate::api::{AppendSummary, range};
use crate::error::RelayError;
use crate::services::rows::{
    AppendRequest, UpdateOutcome, UpdateRequest, append_rows, process_updates,
};

pub async fn root() -> &'static str {
    "Google Sheet Append API is running!"
}

pub async fn append(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<AppendResponse>, ApiError> {
    let tag = state.request_tag();
    let body = read_body(&tag, payload)?;
    debug!("{}Received data for append: {}", tag, body);

    let request = AppendRequest::from_json(body).map_err(|e| reject(&tag, e, APPEND_FAILED))?;
    let target_range = match &request.sheet_name {
        Some(sheet) => range::append_anchor(sheet),
        None => state.default_range.clone(),
    };

    match run_append(&state, &target_range, &request.values).await {
        Ok(updates) => {
            info!("{}Appended {} rows to {}", tag, request.values.len(), target_range);
            Ok(Json(AppendResponse::new(updates)))
        }
        Err(err) => Err(reject(&tag, err, APPEND_FAILED)),
    }
}

pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<UpdateResponse>, ApiError> {
    let tag = state.request_tag();
    let body = read_body(&tag, payload)?;
    debug!("{}Received data for update: {}", tag, body);

    let request = UpdateRequest::from_json(body).map_err(|e| reject(&tag, e, UPDATE_FAILED))?;

    match run_update(&state, &request).await {
        Ok(outcome) => Ok(Json(UpdateResponse::new(outcome.updated_count))),
        Err(err) => Err(reject(&tag, err, UPDATE_FAILED)),
    }
}

async fn run_append(
    state: &AppState,
    target_range: &str,
    rows: &[Vec<Value>],
) -> Result<AppendSummary, RelayError> {
    let accessor = state.provider.accessor().await?;
    append_rows(accessor.as_ref(), target_range, rows).await
}

async fn run_update(state: &AppState, request: &UpdateRequest) -> Result<UpdateOutcome, RelayError> {
    let accessor = state.provider.accessor().await?;
    process_updates(
        accessor.as_ref(),
        &request.sheet_name,
        &request.rows,
        &state.update_options,
    )
    .await
}

fn read_body(tag: &str, payload: Result<Json<Value>, JsonRejection>) -> Result<Value, ApiError> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            info!("{}Rejected request body: {}", tag, rejection.body_text());
            Err(ApiError::bad_request(format!(
                "Invalid request body: {}",
                rejection.body_text()
            )))
        }
    }
}

fn reject(tag: &str, err: RelayError, context: &str) -> ApiError {
    match &err {
        RelayError::Remote(remote) => match remote.http_status() {
            Some(status) => error!("{}{} (HTTP {}) {}", tag, context, status, remote),
            None => error!("{}{} {}", tag, context, remote),
        },
        _ => info!("{}{}", tag, err),
    }
    ApiError::from_relay(err, context)
}
