//! Render webhook triggers.
//!
//! This crate manages the webhook subscription behind a trigger and receives
//! its deliveries:
//!
//! - [`Subscription`] checks, creates and deletes the remote subscription,
//!   remembering its id and signing secret in a [`StateStore`]
//! - [`WebhookServer`] accepts deliveries over HTTP, verifies the
//!   `x-render-signature` HMAC and broadcasts normalized envelopes
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use rendercloud_client::RenderClient;
//! use rendercloud_webhook::{
//!     MemoryStore, ReceiverConfig, Subscription, TriggerSettings, WebhookEventType,
//!     WebhookServer,
//! };
//!
//! # async fn example() -> rendercloud_webhook::Result<()> {
//! let client = RenderClient::builder().api_key("rnd_...").build()?;
//! let store = Arc::new(MemoryStore::new());
//!
//! let settings = TriggerSettings::new("tea-xxxxx", vec![WebhookEventType::DeploySucceeded]);
//! let subscription = Subscription::new(client, store.clone(), "default", settings);
//! subscription.create("https://example.com/webhook").await?;
//!
//! let server = WebhookServer::new(store, ReceiverConfig::default());
//! let mut deliveries = server.subscribe();
//! tokio::spawn(server.run());
//! while let Ok(envelope) = deliveries.recv().await {
//!     println!("{}", envelope);
//! }
//! # Ok(())
//! # }
//! ```

pub mod delivery;
pub mod error;
pub mod events;
pub mod lifecycle;
pub mod server;
pub mod signature;
pub mod store;

pub use delivery::{
    Delivery, DeliveryHeaders, DeliveryOutcome, DeliveryState, Rejection, process_delivery,
};
pub use error::{Result, WebhookError};
pub use events::WebhookEventType;
pub use lifecycle::{Subscription, TriggerSettings, generate_secret};
pub use server::{HealthResponse, ReceiverConfig, WebhookServer};
pub use signature::{
    SIGNATURE_HEADER, SignatureCheck, canonical_json, compute_signature, verify_signature,
};
pub use store::{FileStore, MemoryStore, StateStore, SubscriptionState};
