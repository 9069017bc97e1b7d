//! Process-wide owner of the Sheets client
//!
//! The client is built on first use and then shared by every request. When
//! building fails (missing key file, bad key, no spreadsheet id) the error is
//! returned to that request and the next request tries again.

use anyhow::{Context, Result};
use arc_swap::ArcSwapOption;
use async_trait::async_trait;
use log::{debug, info, warn};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;

use super::auth::{AuthManager, ServiceAccountKey};
use super::client::SheetsClient;
use super::error::RemoteError;
use super::resilience::ResilienceConfig;
use crate::config::SheetsSettings;
use crate::services::rows::{AccessorProvider, GridAccessor};

pub struct ClientManager {
    settings: SheetsSettings,
    resilience: ResilienceConfig,
    client: ArcSwapOption<SheetsClient>,
    build_lock: Mutex<()>,
}

impl ClientManager {
    pub fn new(settings: SheetsSettings, resilience: ResilienceConfig) -> Self {
        Self {
            settings,
            resilience,
            client: ArcSwapOption::empty(),
            build_lock: Mutex::new(()),
        }
    }

    /// Get the shared client, building it if this is the first successful use
    pub async fn client(&self) -> Result<Arc<SheetsClient>, RemoteError> {
        if let Some(client) = self.client.load_full() {
            return Ok(client);
        }

        let _guard = self.build_lock.lock().await;
        if let Some(client) = self.client.load_full() {
            return Ok(client);
        }

        let client = Arc::new(
            self.build()
                .map_err(|e| RemoteError::Transport(format!("{:#}", e)))?,
        );
        info!(
            "Sheets client ready for service account {}",
            client.service_account()
        );
        self.client.store(Some(client.clone()));
        Ok(client)
    }

    fn build(&self) -> Result<SheetsClient> {
        let spreadsheet_id = self
            .settings
            .spreadsheet_id
            .clone()
            .filter(|id| !id.trim().is_empty())
            .context("No spreadsheet configured. Set SPREADSHEET_ID or sheets.spreadsheet_id")?;

        info!(
            "Attempting to authenticate using key file: {}",
            self.settings.credentials_path.display()
        );
        let key = ServiceAccountKey::from_file(&self.settings.credentials_path)?;
        if let Some(project) = &key.project_id {
            debug!("Service account belongs to project {}", project);
        }

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(self.settings.timeout_secs))
            .build()
            .context("Failed to create HTTP client")?;

        let auth = AuthManager::new(key, http.clone())?;

        Ok(SheetsClient::new(
            http,
            auth,
            spreadsheet_id,
            &self.settings.api_base_url,
            &self.resilience,
        ))
    }

    /// Build the client and fetch a token, logging the outcome
    ///
    /// Used at startup; a failure is reported but never stops the server.
    pub async fn verify(&self) -> bool {
        let result = match self.client().await {
            Ok(client) => client.verify().await,
            Err(err) => Err(err),
        };

        match result {
            Ok(()) => {
                info!("Successfully authenticated with Google Sheets API.");
                true
            }
            Err(err) => {
                warn!("Error authenticating with Google Sheets API: {}", err);
                warn!(
                    "Ensure {} exists and the Sheets API is enabled.",
                    self.settings.credentials_path.display()
                );
                warn!("Also ensure the sheet is shared with the service account email.");
                false
            }
        }
    }
}

#[async_trait]
impl AccessorProvider for ClientManager {
    async fn accessor(&self) -> Result<Arc<dyn GridAccessor>, RemoteError> {
        let client: Arc<dyn GridAccessor> = self.client().await?;
        Ok(client)
    }
}
