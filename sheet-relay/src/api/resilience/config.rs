//! Outbound request configuration with builder pattern
//!
//! Covers how many calls to the Sheets API may be in flight at once and
//! what the client logs about them. Failed calls are never retried.

use serde::Deserialize;

/// Configuration for calls made to the spreadsheet store
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ResilienceConfig {
    pub concurrency: ConcurrencyConfig,
    pub monitoring: MonitoringConfig,
}

/// Concurrency limiting configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Maximum concurrent HTTP requests to the Sheets API across all callers
    pub max_concurrent_requests: usize,
    /// Whether concurrency limiting is enabled
    pub enabled: bool,
}

/// Monitoring and logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MonitoringConfig {
    /// Tag each incoming request's log lines with a short id
    pub correlation_ids: bool,
    /// Log every outbound Sheets API call
    pub request_logging: bool,
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Filter string understood by `env_logger`
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "error" => Some(LogLevel::Error),
            "warn" => Some(LogLevel::Warn),
            "info" => Some(LogLevel::Info),
            "debug" => Some(LogLevel::Debug),
            "trace" => Some(LogLevel::Trace),
            _ => None,
        }
    }
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self {
            max_concurrent_requests: 10, // Sheets allows 300 req/min per project
            enabled: true,
        }
    }
}

impl Default for MonitoringConfig {
    fn default() -> Self {
        Self {
            correlation_ids: true,
            request_logging: true,
            log_level: LogLevel::Info,
        }
    }
}

impl ResilienceConfig {
    /// No limiting and no request logging
    #[cfg(test)]
    pub fn disabled() -> Self {
        Self {
            concurrency: ConcurrencyConfig {
                max_concurrent_requests: usize::MAX,
                enabled: false,
            },
            monitoring: MonitoringConfig {
                correlation_ids: false,
                request_logging: false,
                log_level: LogLevel::Error,
            },
        }
    }
}
