//! CLI command handlers.

pub mod config;
pub mod resources;
pub mod run;
pub mod trigger;
pub mod verify;

use std::path::PathBuf;

use anyhow::{Context as _, Result, anyhow};
use rendercloud_client::RenderClient;
use rendercloud_config::{API_KEY_ENV, LoadedConfig, RenderCloudConfig};
use tracing::{debug, warn};

/// Shared context for all commands.
#[derive(Debug, Clone)]
pub struct Context {
    /// Output as JSON for scripting.
    pub json_output: bool,
    /// Verbose output enabled.
    pub verbose: bool,
    /// Override of the API base URL.
    pub api_url: Option<String>,
    /// Override of the user config directory.
    pub config_dir: Option<PathBuf>,
}

impl Context {
    /// The user config directory in effect.
    pub fn config_dir(&self) -> Option<PathBuf> {
        self.config_dir
            .clone()
            .or_else(rendercloud_config::xdg_config_dir)
    }

    /// Load and merge config layers, logging any load warnings.
    pub fn load_config(&self) -> Result<LoadedConfig> {
        let loaded =
            rendercloud_config::load_config_with_options(None, self.config_dir.as_deref())
                .context("failed to load configuration")?;
        for w in &loaded.warnings {
            warn!("{}", w);
        }
        Ok(loaded)
    }

    /// Build an authenticated client from config and flags.
    pub fn client(&self, config: &RenderCloudConfig) -> Result<RenderClient> {
        let api = config.api();
        let key = rendercloud_config::resolve_api_key(api.api_key.as_deref()).ok_or_else(|| {
            anyhow!(
                "No Render API key found. Set {} or [api] api_key in the config file.",
                API_KEY_ENV
            )
        })?;
        debug!(source = %key.source, "resolved API key");

        let mut builder = RenderClient::builder()
            .api_key(key.value)
            .user_agent(concat!("rendercloud/", env!("CARGO_PKG_VERSION")));
        if let Some(url) = self.api_url.clone().or(api.base_url.clone()) {
            builder = builder.base_url(url);
        }
        if let Some(timeout) = api.timeout() {
            builder = builder.timeout(timeout);
        }
        Ok(builder.build()?)
    }
}
