//! Where config files live and how their layers combine.
//!
//! Two layers are read, user then project. Each section of the project file
//! replaces the same section of the user file. Command-line flags are applied
//! by the binary afterwards.

use std::fmt;
use std::path::{Path, PathBuf};

use crate::{ConfigError, RenderCloudConfig, Result};

const PROJECT_CONFIG_FILE: &str = "rendercloud.toml";
const USER_CONFIG_FILE: &str = "config.toml";
const APP_NAME: &str = "rendercloud";

/// Overrides the user config directory when set and non-empty.
pub const CONFIG_DIR_ENV: &str = "RENDERCLOUD_CONFIG_DIR";

/// Which layer a config file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigLayer {
    /// `config.toml` in the user config directory.
    User,
    /// `rendercloud.toml` in the project directory.
    Project,
}

impl fmt::Display for ConfigLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(match self {
            ConfigLayer::User => "user",
            ConfigLayer::Project => "project",
        })
    }
}

/// One config file that discovery looked at.
#[derive(Debug, Clone)]
pub struct ConfigSource {
    pub layer: ConfigLayer,
    pub path: PathBuf,
    /// False when the file is absent or failed to parse.
    pub loaded: bool,
}

/// Merged config plus what went into it.
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: RenderCloudConfig,
    /// User layer first when a user directory is known.
    pub sources: Vec<ConfigSource>,
    /// Broken layers and plaintext API keys.
    pub warnings: Vec<String>,
}

impl LoadedConfig {
    pub fn loaded_from(&self) -> Vec<&Path> {
        self.sources
            .iter()
            .filter(|s| s.loaded)
            .map(|s| s.path.as_path())
            .collect()
    }
}

/// Discover and merge config layers using the default user directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<LoadedConfig> {
    load_config_with_options(project_dir, None)
}

/// Discover and merge config layers.
///
/// `config_dir` replaces the user directory from [`xdg_config_dir`];
/// `project_dir` defaults to the working directory.
pub fn load_config_with_options(
    project_dir: Option<&Path>,
    config_dir: Option<&Path>,
) -> Result<LoadedConfig> {
    let user = config_dir
        .map(Path::to_path_buf)
        .or_else(xdg_config_dir)
        .map(|dir| (ConfigLayer::User, dir.join(USER_CONFIG_FILE)));
    let project = (
        ConfigLayer::Project,
        project_dir.unwrap_or(Path::new(".")).join(PROJECT_CONFIG_FILE),
    );

    let mut loaded = LoadedConfig {
        config: RenderCloudConfig::new(),
        sources: Vec::new(),
        warnings: Vec::new(),
    };
    for (layer, path) in user.into_iter().chain(Some(project)) {
        let source = read_layer(layer, path, &mut loaded);
        loaded.sources.push(source);
    }

    if loaded.config.api().has_plaintext_api_key() {
        loaded.warnings.push(
            "[api] contains a plaintext API key. \
             Consider using the RENDER_API_KEY environment variable instead."
                .to_string(),
        );
    }
    Ok(loaded)
}

/// Parse a single config file.
pub fn load_config_file(path: &Path) -> Result<RenderCloudConfig> {
    let contents = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.display().to_string(),
        source: e,
    })?;
    RenderCloudConfig::from_toml(&contents)
}

/// Write `config` as TOML, creating missing parent directories.
pub fn save_config(config: &RenderCloudConfig, path: &Path) -> Result<()> {
    let write_err = |p: &Path, e: std::io::Error| ConfigError::WriteFile {
        path: p.display().to_string(),
        source: e,
    };
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| write_err(parent, e))?;
    }
    std::fs::write(path, config.to_toml()?).map_err(|e| write_err(path, e))
}

pub fn xdg_config_path() -> Option<PathBuf> {
    xdg_config_dir().map(|d| d.join(USER_CONFIG_FILE))
}

/// `$RENDERCLOUD_CONFIG_DIR`, else `<platform config dir>/rendercloud`.
pub fn xdg_config_dir() -> Option<PathBuf> {
    match std::env::var(CONFIG_DIR_ENV) {
        Ok(dir) if !dir.is_empty() => Some(PathBuf::from(dir)),
        _ => dirs::config_dir().map(|d| d.join(APP_NAME)),
    }
}

/// Persisted subscription state, one file per trigger key.
pub fn state_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("state")
}

/// Daily-rotated JSON logs.
pub fn log_dir(config_dir: &Path) -> PathBuf {
    config_dir.join("logs")
}

/// Merge `path` into `loaded.config` if it exists. Parse failures are kept
/// as warnings so one broken file does not hide the other layer.
fn read_layer(layer: ConfigLayer, path: PathBuf, loaded: &mut LoadedConfig) -> ConfigSource {
    let mut source = ConfigSource {
        layer,
        path,
        loaded: false,
    };
    if !source.path.is_file() {
        return source;
    }

    match load_config_file(&source.path) {
        Ok(config) => {
            loaded.config.merge(config);
            source.loaded = true;
        }
        Err(e) => loaded
            .warnings
            .push(format!("Failed to load {}: {}", source.path.display(), e)),
    }
    source
}
