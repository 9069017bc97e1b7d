//! JSON envelopes returned by the handlers

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde_json::json;

use crate::api::AppendSummary;
use crate::error::RelayError;

pub const APPEND_FAILED: &str = "Failed to append data to Google Sheet.";
pub const UPDATE_FAILED: &str = "Failed to update rows in Google Sheet.";

#[derive(Debug, Serialize, PartialEq)]
pub struct AppendResponse {
    pub success: bool,
    pub message: String,
    pub updates: AppendSummary,
}

impl AppendResponse {
    pub fn new(updates: AppendSummary) -> Self {
        Self {
            success: true,
            message: "Data appended successfully!".to_string(),
            updates,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateResponse {
    pub success: bool,
    pub message: String,
    pub updated_count: usize,
}

impl UpdateResponse {
    pub fn new(updated_count: usize) -> Self {
        Self {
            success: true,
            message: format!("Updated {} row(s) successfully", updated_count),
            updated_count,
        }
    }
}

/// Failure envelope `{ success: false, error }`
#[derive(Debug, PartialEq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    /// Map a relay error, prefixing store failures with `context`
    pub fn from_relay(err: RelayError, context: &str) -> Self {
        match err {
            RelayError::Validation(message) => Self::bad_request(message),
            RelayError::Schema { .. } => Self::bad_request(err.to_string()),
            RelayError::NotFound(message) => Self {
                status: StatusCode::NOT_FOUND,
                message,
            },
            RelayError::Remote(remote) => Self {
                status: StatusCode::INTERNAL_SERVER_ERROR,
                message: remote.describe(context),
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "success": false, "error": self.message });
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RemoteError;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (RelayError::validation("bad"), StatusCode::BAD_REQUEST),
            (
                RelayError::Schema {
                    column: "Price".to_string(),
                },
                StatusCode::BAD_REQUEST,
            ),
            (
                RelayError::NotFound("No data found in sheet 'S'".to_string()),
                StatusCode::NOT_FOUND,
            ),
            (
                RelayError::Remote(RemoteError::Transport("refused".to_string())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(ApiError::from_relay(err, UPDATE_FAILED).status, status);
        }
    }

    #[test]
    fn test_remote_message_carries_context() {
        let remote = RemoteError::from_response(
            403,
            r#"{"error":{"code":403,"status":"PERMISSION_DENIED","message":"The caller does not have permission"}}"#,
        );

        let err = ApiError::from_relay(RelayError::Remote(remote), APPEND_FAILED);

        assert_eq!(
            err.message,
            "Failed to append data to Google Sheet. Google API Error (403 - PERMISSION_DENIED): The caller does not have permission"
        );
    }

    #[test]
    fn test_schema_message_has_no_context() {
        let err = ApiError::from_relay(
            RelayError::Schema {
                column: "Price".to_string(),
            },
            UPDATE_FAILED,
        );
        assert_eq!(err.message, "Column 'Price' not found in header row");
    }

    #[test]
    fn test_update_message() {
        let response = UpdateResponse::new(2);
        assert_eq!(response.message, "Updated 2 row(s) successfully");

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["updatedCount"], 2);
        assert_eq!(json["success"], true);
    }
}
