//! Outbound request limiting and monitoring settings
//!
//! Bounds concurrent calls to the Sheets API and controls what gets logged
//! about them.

pub mod concurrency;
pub mod config;

pub use concurrency::ConcurrencyLimiter;
pub use config::{LogLevel, MonitoringConfig, ResilienceConfig};
