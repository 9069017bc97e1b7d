//! Errors returned by the Google Sheets API and the token endpoint

use serde::Deserialize;
use serde_json::Value;

/// Failure talking to the spreadsheet store
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteError {
    /// Store answered with its structured `{ "error": { code, status, message } }` body
    Api {
        http_status: u16,
        code: Option<i64>,
        status: Option<String>,
        message: String,
    },
    /// Store answered with a non-success response we could not interpret
    Unstructured { http_status: u16, body: String },
    /// No response was received (network, credentials, configuration)
    Transport(String),
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: Option<i64>,
    status: Option<String>,
    message: Option<String>,
}

/// OAuth token endpoint error shape
#[derive(Debug, Deserialize)]
struct OAuthErrorBody {
    error: String,
    error_description: Option<String>,
}

impl RemoteError {
    /// Build an error from a non-success response body
    pub fn from_response(http_status: u16, body: &str) -> Self {
        if let Ok(envelope) = serde_json::from_str::<ApiErrorEnvelope>(body) {
            if let Some(message) = envelope.error.message {
                return RemoteError::Api {
                    http_status,
                    code: envelope.error.code,
                    status: envelope.error.status,
                    message,
                };
            }
        }

        if let Ok(oauth) = serde_json::from_str::<OAuthErrorBody>(body) {
            return RemoteError::Api {
                http_status,
                code: Some(http_status as i64),
                status: Some(oauth.error.clone()),
                message: oauth.error_description.unwrap_or(oauth.error),
            };
        }

        // Compact JSON bodies so the caller-facing message stays on one line
        let body = match serde_json::from_str::<Value>(body) {
            Ok(json) => json.to_string(),
            Err(_) => body.trim().to_string(),
        };

        RemoteError::Unstructured { http_status, body }
    }

    /// HTTP status reported by the store, if a response was received
    pub fn http_status(&self) -> Option<u16> {
        match self {
            RemoteError::Api { http_status, .. } => Some(*http_status),
            RemoteError::Unstructured { http_status, .. } => Some(*http_status),
            RemoteError::Transport(_) => None,
        }
    }

    /// Caller-facing message prefixed with what was being attempted
    pub fn describe(&self, context: &str) -> String {
        format!("{} {}", context, self)
    }
}

impl std::fmt::Display for RemoteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RemoteError::Api {
                code,
                status,
                message,
                ..
            } => {
                let code = code
                    .map(|c| c.to_string())
                    .unwrap_or_else(|| "Unknown Code".to_string());
                let status = status.as_deref().unwrap_or("Unknown Status");
                write!(f, "Google API Error ({} - {}): {}", code, status, message)
            }
            RemoteError::Unstructured { body, .. } => {
                write!(f, "Google API returned an error structure: {}", body)
            }
            RemoteError::Transport(message) => write!(f, "Error: {}", message),
        }
    }
}

impl std::error::Error for RemoteError {}

impl From<reqwest::Error> for RemoteError {
    fn from(err: reqwest::Error) -> Self {
        RemoteError::Transport(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_structured_google_error() {
        let body = r#"{"error":{"code":403,"message":"The caller does not have permission","status":"PERMISSION_DENIED"}}"#;
        let err = RemoteError::from_response(403, body);

        assert_eq!(err.http_status(), Some(403));
        assert_eq!(
            err.describe("Failed to append data to Google Sheet."),
            "Failed to append data to Google Sheet. Google API Error (403 - PERMISSION_DENIED): The caller does not have permission"
        );
    }

    #[test]
    fn test_missing_code_and_status() {
        let body = r#"{"error":{"message":"Unable to parse range: Nope!A1"}}"#;
        let err = RemoteError::from_response(400, body);

        assert_eq!(
            err.to_string(),
            "Google API Error (Unknown Code - Unknown Status): Unable to parse range: Nope!A1"
        );
    }

    #[test]
    fn test_oauth_error_body() {
        let body = r#"{"error":"invalid_grant","error_description":"Invalid JWT Signature."}"#;
        let err = RemoteError::from_response(400, body);

        assert_eq!(
            err.to_string(),
            "Google API Error (400 - invalid_grant): Invalid JWT Signature."
        );
    }

    #[test]
    fn test_unstructured_json_body_is_compacted() {
        let body = "{\n  \"error\": {\n    \"code\": 500\n  }\n}";
        let err = RemoteError::from_response(500, body);

        assert_eq!(
            err.to_string(),
            r#"Google API returned an error structure: {"error":{"code":500}}"#
        );
    }

    #[test]
    fn test_transport_error() {
        let err = RemoteError::Transport("dns error".to_string());
        assert_eq!(err.http_status(), None);
        assert_eq!(
            err.describe("Failed to update rows in Google Sheet."),
            "Failed to update rows in Google Sheet. Error: dns error"
        );
    }
}
