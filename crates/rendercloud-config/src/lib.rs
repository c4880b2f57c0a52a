//! Configuration for the Render cloud connector.
//!
//! Provides TOML-based configuration with:
//! - an `[api]` section (base URL, API key, request timeout)
//! - a `[webhook]` section (receiver address, callback URL, subscription settings)
//! - config file layering (user config dir + project-local overrides)
//! - API key resolution (env var, then config file)

pub mod discovery;
pub mod error;
pub mod secrets;
pub mod types;

pub use discovery::{
    CONFIG_DIR_ENV, ConfigLayer, ConfigSource, LoadedConfig, load_config, load_config_file,
    load_config_with_options, log_dir, save_config, state_dir, xdg_config_dir, xdg_config_path,
};
pub use error::{ConfigError, Result};
pub use secrets::{API_KEY_ENV, ResolvedSecret, SecretSource, resolve_api_key};
pub use types::*;
