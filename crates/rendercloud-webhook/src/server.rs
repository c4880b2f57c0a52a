//! HTTP receiver for webhook deliveries.

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use rendercloud_config::WebhookConfig;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower_http::trace::TraceLayer;
use tracing::{debug, info};

use crate::delivery::{DeliveryHeaders, DeliveryOutcome, process_delivery};
use crate::error::{Result, WebhookError};
use crate::store::StateStore;

/// Forwarded envelopes buffered per subscriber before the oldest are dropped.
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Receiver configuration.
#[derive(Debug, Clone)]
pub struct ReceiverConfig {
    pub bind_address: SocketAddr,
    /// Route deliveries are posted to. Always starts with `/`.
    pub path: String,
    pub verify_signature: bool,
    /// Store key holding the subscription secret.
    pub state_key: String,
}

impl Default for ReceiverConfig {
    fn default() -> Self {
        Self {
            bind_address: SocketAddr::from(([0, 0, 0, 0], 5678)),
            path: "/webhook".to_string(),
            verify_signature: true,
            state_key: "default".to_string(),
        }
    }
}

impl ReceiverConfig {
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        let path = path.into();
        self.path = if path.starts_with('/') {
            path
        } else {
            format!("/{}", path)
        };
        self
    }

    pub fn with_state_key(mut self, key: impl Into<String>) -> Self {
        self.state_key = key.into();
        self
    }

    pub fn with_verify_signature(mut self, verify: bool) -> Self {
        self.verify_signature = verify;
        self
    }

    /// Build from the `[webhook]` config section.
    pub fn from_config(config: &WebhookConfig) -> Result<Self> {
        let bind_address = config.bind_address.parse().map_err(|e| {
            WebhookError::InvalidSettings(format!(
                "invalid bind address '{}': {}",
                config.bind_address, e
            ))
        })?;
        Ok(Self {
            bind_address,
            ..Self::default()
        }
        .with_path(config.path.clone())
        .with_verify_signature(config.verify_signature))
    }
}

/// Shared handler state.
#[derive(Clone)]
pub struct ReceiverState {
    store: Arc<dyn StateStore>,
    config: Arc<ReceiverConfig>,
    events: broadcast::Sender<Value>,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// The webhook receiver.
pub struct WebhookServer {
    state: ReceiverState,
}

impl WebhookServer {
    pub fn new(store: Arc<dyn StateStore>, config: ReceiverConfig) -> Self {
        let (events, _) = broadcast::channel(DEFAULT_CHANNEL_CAPACITY);
        Self {
            state: ReceiverState {
                store,
                config: Arc::new(config),
                events,
            },
        }
    }

    /// Receive every envelope forwarded from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<Value> {
        self.state.events.subscribe()
    }

    pub fn config(&self) -> &ReceiverConfig {
        &self.state.config
    }

    pub fn router(&self) -> Router {
        Router::new()
            .route("/health", get(health))
            .route(&self.state.config.path, post(receive))
            .layer(TraceLayer::new_for_http())
            .with_state(self.state.clone())
    }

    pub async fn run(self) -> Result<()> {
        let addr = self.state.config.bind_address;
        let router = self.router();

        info!(%addr, path = %self.state.config.path, "Starting webhook receiver");

        let listener = TcpListener::bind(addr)
            .await
            .map_err(|e| WebhookError::Server(format!("Failed to bind: {}", e)))?;

        axum::serve(listener, router)
            .await
            .map_err(|e| WebhookError::Server(format!("Server error: {}", e)))?;

        Ok(())
    }
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

async fn receive(
    State(state): State<ReceiverState>,
    headers: HeaderMap,
    body: Bytes,
) -> std::result::Result<Response, WebhookError> {
    let payload: Value = serde_json::from_slice(&body)
        .map_err(|e| WebhookError::BadRequest(format!("invalid JSON body: {}", e)))?;

    let stored = state.store.load(&state.config.state_key).await?;
    let outcome = process_delivery(
        payload,
        DeliveryHeaders::from_header_map(&headers),
        state.config.verify_signature,
        stored.webhook_secret.as_deref(),
    );

    match outcome {
        DeliveryOutcome::Forwarded {
            verification,
            envelope,
        } => {
            debug!(?verification, event = ?envelope.get("type"), "delivery accepted");
            if state.events.send(envelope.clone()).is_err() {
                debug!("no subscribers for forwarded delivery");
            }
            Ok((StatusCode::OK, Json(envelope)).into_response())
        }
        DeliveryOutcome::Rejected(rejection) => {
            Ok((StatusCode::UNAUTHORIZED, rejection.to_string()).into_response())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_path_gets_leading_slash() {
        let config = ReceiverConfig::default().with_path("hooks/render");
        assert_eq!(config.path, "/hooks/render");
    }

    #[test]
    fn test_from_config() {
        let webhook = WebhookConfig {
            bind_address: "127.0.0.1:9000".to_string(),
            path: "/render".to_string(),
            verify_signature: false,
            ..Default::default()
        };
        let config = ReceiverConfig::from_config(&webhook).unwrap();
        assert_eq!(config.bind_address.port(), 9000);
        assert_eq!(config.path, "/render");
        assert!(!config.verify_signature);
    }

    #[test]
    fn test_bad_bind_address() {
        let webhook = WebhookConfig {
            bind_address: "not an address".to_string(),
            ..Default::default()
        };
        assert!(ReceiverConfig::from_config(&webhook).is_err());
    }
}
