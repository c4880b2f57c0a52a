//! Main client implementation.
//!
//! [`RenderClient::request`] is the request gateway: it issues exactly one
//! authenticated call and classifies the outcome. It never retries.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde_json::Value;
use tracing::{debug, warn};
use url::Url;

use crate::api::{
    CustomDomainsApi, DeploysApi, DisksApi, EnvGroupsApi, EnvVarsApi, EnvironmentsApi,
    KeyValueApi, OwnersApi, PostgresApi, ProjectsApi, SecretFilesApi, ServicesApi, WebhooksApi,
};
use crate::error::{Error, ErrorResponse, Result};
use crate::request::ApiRequest;

/// Fixed v1 endpoint of the Render API.
pub const DEFAULT_BASE_URL: &str = "https://api.render.com/v1";

/// Header carrying the number of seconds until the rate limit window resets.
pub const RATE_LIMIT_RESET_HEADER: &str = "ratelimit-reset";

/// Render API client.
///
/// Cheap to clone; clones share one connection pool.
///
/// # Example
///
/// ```no_run
/// use rendercloud_client::RenderClient;
///
/// # async fn example() -> rendercloud_client::Result<()> {
/// let client = RenderClient::builder().api_key("rnd_xxx").build()?;
///
/// let service = client.services().get("srv-abc123").await?;
/// println!("{}", service["name"]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct RenderClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http: reqwest::Client,
    base_url: String,
    timeout: Option<Duration>,
}

impl RenderClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL (no trailing slash).
    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the owners API (workspaces the key can see).
    pub fn owners(&self) -> OwnersApi {
        OwnersApi::new(self.clone())
    }

    /// Access the services API.
    pub fn services(&self) -> ServicesApi {
        ServicesApi::new(self.clone())
    }

    /// Access the deploys API.
    pub fn deploys(&self) -> DeploysApi {
        DeploysApi::new(self.clone())
    }

    /// Access the custom domains API.
    pub fn custom_domains(&self) -> CustomDomainsApi {
        CustomDomainsApi::new(self.clone())
    }

    /// Access the service environment variables API.
    pub fn env_vars(&self) -> EnvVarsApi {
        EnvVarsApi::new(self.clone())
    }

    /// Access the service secret files API.
    pub fn secret_files(&self) -> SecretFilesApi {
        SecretFilesApi::new(self.clone())
    }

    /// Access the projects API.
    pub fn projects(&self) -> ProjectsApi {
        ProjectsApi::new(self.clone())
    }

    /// Access the project environments API.
    pub fn environments(&self) -> EnvironmentsApi {
        EnvironmentsApi::new(self.clone())
    }

    /// Access the Postgres API.
    pub fn postgres(&self) -> PostgresApi {
        PostgresApi::new(self.clone())
    }

    /// Access the Key Value (Redis) API.
    pub fn key_value(&self) -> KeyValueApi {
        KeyValueApi::new(self.clone())
    }

    /// Access the disks API.
    pub fn disks(&self) -> DisksApi {
        DisksApi::new(self.clone())
    }

    /// Access the environment groups API.
    pub fn env_groups(&self) -> EnvGroupsApi {
        EnvGroupsApi::new(self.clone())
    }

    /// Access the webhooks API.
    pub fn webhooks(&self) -> WebhooksApi {
        WebhooksApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Gateway
    // ─────────────────────────────────────────────────────────────────────────

    /// Build the URL for an API path.
    ///
    /// Dot segments are refused, including their percent-encoded forms, since
    /// URL parsing would resolve them into a different resource.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = if path.starts_with('/') {
            path.to_string()
        } else {
            format!("/{}", path)
        };
        if path.split('/').any(is_dot_segment) {
            return Err(Error::InvalidPath(path));
        }
        Url::parse(&format!("{}{}", self.inner.base_url, path)).map_err(Error::from)
    }

    /// Issue one request and decode the JSON response.
    ///
    /// Body and query are left off the wire when absent or empty. A success
    /// response with an empty body decodes to `Value::Null`.
    pub async fn request(&self, request: ApiRequest) -> Result<Value> {
        let url = self.url(&request.path)?;
        debug!(method = %request.method, path = %request.path, "Render API request");

        let mut builder = self.inner.http.request(request.method.clone(), url);
        if let Some(timeout) = self.inner.timeout {
            builder = builder.timeout(timeout);
        }

        let pairs = request.query_pairs();
        if !pairs.is_empty() {
            builder = builder.query(&pairs);
        }
        if let Some(body) = request.effective_body() {
            builder = builder.json(body);
        }

        let response = builder.send().await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response(&self, response: reqwest::Response) -> Result<Value> {
        if response.status().is_success() {
            let bytes = response.bytes().await?;
            if bytes.iter().all(u8::is_ascii_whitespace) {
                return Ok(Value::Null);
            }
            Ok(serde_json::from_slice(&bytes)?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();

        if status == 429 {
            let reset = response
                .headers()
                .get(RATE_LIMIT_RESET_HEADER)
                .and_then(|v| v.to_str().ok())
                .filter(|v| !v.is_empty())
                .unwrap_or("unknown")
                .to_string();
            warn!(reset = %reset, "Render API rate limit exceeded");
            return Error::RateLimited { reset };
        }

        let text = response.text().await.unwrap_or_default();
        let message = match serde_json::from_str::<ErrorResponse>(&text) {
            Ok(err) => err.message,
            Err(_) if !text.trim().is_empty() => text,
            Err(_) => format!("HTTP {}", status),
        };
        debug!(status, message = %message, "Render API error");

        Error::Api { status, message }
    }
}

/// Builder for creating a [`RenderClient`].
#[derive(Debug)]
pub struct ClientBuilder {
    base_url: String,
    api_key: Option<String>,
    timeout: Option<Duration>,
    user_agent: Option<String>,
}

impl ClientBuilder {
    /// Create a new builder pointed at the public v1 endpoint.
    pub fn new() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            api_key: None,
            timeout: None,
            user_agent: None,
        }
    }

    /// Override the base URL (tests, proxies).
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the API key sent as a bearer token.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.api_key = Some(key.into());
        self
    }

    /// Set a per-request timeout. Unset leaves the transport default.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<RenderClient> {
        // Validate and normalize the base URL
        let parsed = Url::parse(&self.base_url)?;
        let base_url = parsed.as_str().trim_end_matches('/').to_string();

        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        if let Some(key) = &self.api_key {
            let mut value = HeaderValue::from_str(&format!("Bearer {}", key))
                .map_err(|_| Error::Config("Invalid API key".to_string()))?;
            value.set_sensitive(true);
            headers.insert(AUTHORIZATION, value);
        }

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("rendercloud-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        Ok(RenderClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn is_dot_segment(segment: &str) -> bool {
    matches!(
        segment.to_ascii_lowercase().as_str(),
        "." | "%2e" | ".." | ".%2e" | "%2e." | "%2e%2e"
    )
}
