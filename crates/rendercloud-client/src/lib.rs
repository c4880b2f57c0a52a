//! HTTP client for the Render cloud hosting API (v1).
//!
//! The crate has three layers:
//!
//! - the request gateway ([`RenderClient::request`]), one authenticated call
//!   with typed error classification (rate limits surface as
//!   [`Error::RateLimited`], never retried);
//! - the pagination aggregator ([`RenderClient::request_all`]) which follows
//!   cursors across list pages;
//! - typed per-resource accessors (`client.services()`, `client.deploys()`, ...)
//!   that validate id prefixes before building a path.
//!
//! # Example
//!
//! ```no_run
//! use rendercloud_client::{ListMode, RenderClient, Result};
//! use rendercloud_client::api::ServiceFilters;
//!
//! # async fn example() -> Result<()> {
//! let client = RenderClient::builder()
//!     .api_key(std::env::var("RENDER_API_KEY").unwrap_or_default())
//!     .build()?;
//!
//! let services = client
//!     .services()
//!     .list(&ServiceFilters::default(), ListMode::All)
//!     .await?;
//! for service in services {
//!     println!("{} {}", service["id"], service["name"]);
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod identifiers;
pub mod pagination;
pub mod request;
pub mod types;

pub use client::{ClientBuilder, DEFAULT_BASE_URL, RenderClient};
pub use error::{Error, Result};
pub use identifiers::IdKind;
pub use pagination::{ListMode, PAGE_SIZE, unwrap_envelope};
pub use request::ApiRequest;
pub use types::*;
