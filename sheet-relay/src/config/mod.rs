//! Layered configuration
//!
//! Values are resolved in order, later layers winning:
//! 1. built-in defaults
//! 2. TOML file (`--config`, `./sheet-relay.toml`, or `<config dir>/sheet-relay/config.toml`)
//! 3. environment variables (a `.env` file is loaded into the environment first)
//! 4. command-line flags

use anyhow::{Context, Result};
use log::debug;
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::api::range::is_column_letters;
use crate::api::resilience::{LogLevel, ResilienceConfig};
use crate::cli::Cli;

const LOCAL_CONFIG_FILE: &str = "sheet-relay.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub sheets: SheetsSettings,
    pub api: ResilienceConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin
    pub cors_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            cors_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SheetsSettings {
    pub spreadsheet_id: Option<String>,
    pub credentials_path: PathBuf,
    /// Append target when a request names no sheet
    pub default_range: String,
    /// Last column covered by single-row update writes
    pub last_column: String,
    pub api_base_url: String,
    pub timeout_secs: u64,
}

impl Default for SheetsSettings {
    fn default() -> Self {
        Self {
            spreadsheet_id: None,
            credentials_path: PathBuf::from("./credentials.json"),
            default_range: "Sheet1!A1".to_string(),
            last_column: "Z".to_string(),
            api_base_url: "https://sheets.googleapis.com".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Config {
    /// Load the file and environment layers
    pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
        let mut config = match Self::locate_file(explicit_path)? {
            Some(path) => {
                debug!("Loading config from {}", path.display());
                Self::from_file(&path)?
            }
            None => Self::default(),
        };

        config.apply_env(|name| std::env::var(name).ok())?;
        Ok(config)
    }

    fn locate_file(explicit_path: Option<&Path>) -> Result<Option<PathBuf>> {
        if let Some(path) = explicit_path {
            if !path.exists() {
                anyhow::bail!("Config file does not exist: {}", path.display());
            }
            return Ok(Some(path.to_path_buf()));
        }

        let local = PathBuf::from(LOCAL_CONFIG_FILE);
        if local.exists() {
            return Ok(Some(local));
        }

        Ok(dirs::config_dir()
            .map(|dir| dir.join("sheet-relay").join("config.toml"))
            .filter(|path| path.exists()))
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Apply environment overrides read through `var`
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(port) = var("PORT") {
            self.server.port = port
                .trim()
                .parse()
                .with_context(|| format!("PORT must be a port number, got '{}'", port))?;
        }
        if let Some(host) = var("HOST") {
            self.server.host = host;
        }
        if let Some(origins) = var("CORS_ORIGINS") {
            self.server.cors_origins = origins
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
        if let Some(id) = var("SPREADSHEET_ID") {
            self.sheets.spreadsheet_id = Some(id);
        }
        if let Some(path) = var("GOOGLE_APPLICATION_CREDENTIALS") {
            self.sheets.credentials_path = PathBuf::from(path);
        }
        if let Some(range) = var("SHEETS_DEFAULT_RANGE") {
            self.sheets.default_range = range;
        }
        if let Some(url) = var("SHEETS_API_BASE_URL") {
            self.sheets.api_base_url = url;
        }
        if let Some(level) = var("SHEET_RELAY_LOG_LEVEL") {
            self.api.monitoring.log_level = LogLevel::parse(&level)
                .with_context(|| format!("Unknown log level '{}'", level))?;
        }
        Ok(())
    }

    /// Apply command-line overrides
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(host) = &cli.host {
            self.server.host = host.clone();
        }
        if let Some(port) = cli.port {
            self.server.port = port;
        }
        if let Some(id) = &cli.spreadsheet_id {
            self.sheets.spreadsheet_id = Some(id.clone());
        }
        if let Some(path) = &cli.credentials {
            self.sheets.credentials_path = path.clone();
        }
    }

    pub fn validate(&self) -> Result<()> {
        if !is_column_letters(&self.sheets.last_column) {
            anyhow::bail!(
                "sheets.last_column must be column letters such as 'Z', got '{}'",
                self.sheets.last_column
            );
        }
        if self.sheets.default_range.trim().is_empty() {
            anyhow::bail!("sheets.default_range cannot be empty");
        }
        if self.sheets.timeout_secs == 0 {
            anyhow::bail!("sheets.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
