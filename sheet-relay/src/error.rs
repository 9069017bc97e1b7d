//! Errors surfaced by the append and update operations

use crate::api::RemoteError;

/// Failure of an append or update request
///
/// A condition set that matches no row is not an error; the update
/// orchestrator skips it and it never reaches this type.
#[derive(Debug)]
pub enum RelayError {
    /// Request body is missing fields or has the wrong shape
    Validation(String),
    /// The target sheet has no rows at all
    NotFound(String),
    /// A column named in an instruction is absent from the header row
    Schema { column: String },
    /// The spreadsheet store failed or rejected a call
    Remote(RemoteError),
}

impl RelayError {
    pub fn validation(message: impl Into<String>) -> Self {
        RelayError::Validation(message.into())
    }
}

impl std::fmt::Display for RelayError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelayError::Validation(message) => write!(f, "{}", message),
            RelayError::NotFound(message) => write!(f, "{}", message),
            RelayError::Schema { column } => {
                write!(f, "Column '{}' not found in header row", column)
            }
            RelayError::Remote(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for RelayError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RelayError::Remote(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RemoteError> for RelayError {
    fn from(err: RemoteError) -> Self {
        RelayError::Remote(err)
    }
}
