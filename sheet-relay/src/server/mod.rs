//! HTTP surface
//!
//! `GET /` answers a liveness string, `POST /append` and `POST /update` drive
//! the row engine. Every failure is a JSON `{ success: false, error }` body.

pub mod handlers;
pub mod response;

use anyhow::{Context, Result};
use axum::Router;
use axum::http::HeaderValue;
use axum::routing::{get, post};
use log::{info, warn};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};

use crate::services::rows::{AccessorProvider, UpdateOptions};

#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn AccessorProvider>,
    /// Append target when the request names no sheet
    pub default_range: String,
    pub update_options: UpdateOptions,
    pub correlation_ids: bool,
}

impl AppState {
    pub fn new(
        provider: Arc<dyn AccessorProvider>,
        default_range: impl Into<String>,
        update_options: UpdateOptions,
        correlation_ids: bool,
    ) -> Self {
        Self {
            provider,
            default_range: default_range.into(),
            update_options,
            correlation_ids,
        }
    }

    /// Log prefix for one request, empty when correlation ids are off
    pub fn request_tag(&self) -> String {
        if !self.correlation_ids {
            return String::new();
        }
        let id = uuid::Uuid::new_v4().simple().to_string();
        format!("[{}] ", &id[..8])
    }
}

pub fn router(state: AppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/", get(handlers::root))
        .route("/append", post(handlers::append))
        .route("/update", post(handlers::update))
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Any origin when `origins` is empty, otherwise only the listed ones
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin '{}'", origin);
                None
            }
        })
        .collect();
    layer.allow_origin(AllowOrigin::list(allowed))
}

pub async fn serve(address: &str, app: Router) -> Result<()> {
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .with_context(|| format!("Failed to bind {}", address))?;

    info!("Server listening on http://{}", address);
    axum::serve(listener, app).await.context("Server error")
}
