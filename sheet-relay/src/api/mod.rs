//! Google Sheets API Module
//!
//! Service-account authentication, the `spreadsheets.values` client that
//! implements the row engine's `GridAccessor`, and the process-wide manager
//! that owns it.

pub mod auth;
pub mod client;
pub mod error;
pub mod manager;
pub mod models;
pub mod range;
pub mod resilience;

pub use error::RemoteError;
pub use manager::ClientManager;
pub use models::AppendSummary;
