//! Command-line arguments

use clap::Parser;
use std::path::PathBuf;

/// HTTP relay that appends and conditionally updates Google Sheets rows
#[derive(Debug, Default, Parser)]
#[command(name = "sheet-relay", version, about)]
pub struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Address to bind
    #[arg(long)]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Spreadsheet ID (from the sheet's URL)
    #[arg(long, value_name = "ID")]
    pub spreadsheet_id: Option<String>,

    /// Service-account key file
    #[arg(long, value_name = "PATH")]
    pub credentials: Option<PathBuf>,

    /// Do not verify credentials at startup
    #[arg(long)]
    pub skip_auth_check: bool,
}
