//! API key resolution.
//!
//! Resolution order:
//! 1. `RENDER_API_KEY` environment variable
//! 2. `[api] api_key` in the config file (warned about at load time)

/// Environment variable holding the Render API key.
pub const API_KEY_ENV: &str = "RENDER_API_KEY";

/// Result of API key resolution with provenance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedSecret {
    /// The secret value.
    pub value: String,
    /// Where the secret was found.
    pub source: SecretSource,
}

/// Where a secret was resolved from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SecretSource {
    /// Environment variable.
    EnvVar(String),
    /// Config file (plaintext, not recommended).
    ConfigFile,
}

impl std::fmt::Display for SecretSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SecretSource::EnvVar(var) => write!(f, "env var {}", var),
            SecretSource::ConfigFile => write!(f, "config file (plaintext)"),
        }
    }
}

/// Resolve the API key from the environment, then the config value.
pub fn resolve_api_key(config_value: Option<&str>) -> Option<ResolvedSecret> {
    resolve_from(std::env::var(API_KEY_ENV).ok(), config_value)
}

fn resolve_from(env_value: Option<String>, config_value: Option<&str>) -> Option<ResolvedSecret> {
    if let Some(value) = env_value.filter(|v| !v.is_empty()) {
        return Some(ResolvedSecret {
            value,
            source: SecretSource::EnvVar(API_KEY_ENV.to_string()),
        });
    }

    config_value
        .filter(|v| !v.is_empty())
        .map(|v| ResolvedSecret {
            value: v.to_string(),
            source: SecretSource::ConfigFile,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_env_wins_over_config() {
        let resolved = resolve_from(Some("rnd_env".to_string()), Some("rnd_file")).unwrap();
        assert_eq!(resolved.value, "rnd_env");
        assert_eq!(resolved.source, SecretSource::EnvVar(API_KEY_ENV.to_string()));
    }

    #[test]
    fn test_falls_back_to_config() {
        let resolved = resolve_from(None, Some("rnd_file")).unwrap();
        assert_eq!(resolved.value, "rnd_file");
        assert_eq!(resolved.source, SecretSource::ConfigFile);

        let resolved = resolve_from(Some(String::new()), Some("rnd_file")).unwrap();
        assert_eq!(resolved.source, SecretSource::ConfigFile);
    }

    #[test]
    fn test_nothing_found() {
        assert!(resolve_from(None, None).is_none());
        assert!(resolve_from(None, Some("")).is_none());
    }

    #[test]
    fn test_source_display() {
        assert_eq!(
            SecretSource::EnvVar("RENDER_API_KEY".to_string()).to_string(),
            "env var RENDER_API_KEY"
        );
        assert_eq!(SecretSource::ConfigFile.to_string(), "config file (plaintext)");
    }
}
