//! Configuration: where the token lives and how the client behaves.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CenvarsError, Result};

/// Default name of the variable holding the key token.
pub const DEFAULT_KEY_VARIABLE: &str = "CENVARS_KEY";
/// Default name of the variable holding the payload URL for key generation.
pub const DEFAULT_URL_VARIABLE: &str = "CENVARS_URL";
pub const DEFAULT_KEY_SIZE: usize = 2048;

/// Read access to named configuration values.
pub trait ConfigSource {
    /// Returns `None` when the variable is unset or empty.
    fn lookup(&self, name: &str) -> Option<String>;
}

/// Process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvConfigSource;

impl EnvConfigSource {
    pub fn new() -> Self {
        Self
    }

    /// Loads a `.env` file from the working directory (or a parent) first,
    /// without overriding variables that are already set.
    pub fn with_dotenv() -> Self {
        match dotenv::dotenv() {
            Ok(path) => tracing::debug!(path = %path.display(), "loaded .env file"),
            Err(e) if e.not_found() => {}
            Err(e) => tracing::warn!(error = %e, "failed to load .env file"),
        }
        Self
    }
}

impl ConfigSource for EnvConfigSource {
    fn lookup(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.is_empty())
    }
}

/// In-memory source, for tests and for embedding cenvars without touching
/// process-wide state.
#[derive(Debug, Default, Clone)]
pub struct MapConfigSource {
    values: HashMap<String, String>,
}

impl MapConfigSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }
}

impl ConfigSource for MapConfigSource {
    fn lookup(&self, name: &str) -> Option<String> {
        self.values.get(name).filter(|v| !v.is_empty()).cloned()
    }
}

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CenvarsConfig {
    /// Variable holding the key token
    #[serde(default = "default_key_variable")]
    pub key_variable: String,

    /// Variable holding the URL used when generating a new key
    #[serde(default = "default_url_variable")]
    pub url_variable: String,

    /// Key size used when generating a new key without an explicit size
    #[serde(default = "default_key_size")]
    pub default_key_size: usize,

    /// HTTP transport configuration
    #[serde(default)]
    pub transport: TransportConfig,
}

impl Default for CenvarsConfig {
    fn default() -> Self {
        Self {
            key_variable: default_key_variable(),
            url_variable: default_url_variable(),
            default_key_size: default_key_size(),
            transport: TransportConfig::default(),
        }
    }
}

impl CenvarsConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| {
            CenvarsError::configuration(format!("cannot read {}: {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| CenvarsError::configuration(format!("invalid config: {e}")))
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| CenvarsError::internal(format!("cannot serialize config: {e}")))?;
        std::fs::write(path.as_ref(), content).map_err(|e| {
            CenvarsError::configuration(format!("cannot write {}: {e}", path.as_ref().display()))
        })
    }

    /// Reads the key token named by `key_variable`.
    pub fn token_from(&self, source: &dyn ConfigSource) -> Result<String> {
        source.lookup(&self.key_variable).ok_or_else(|| {
            CenvarsError::configuration(format!("{} is not set", self.key_variable))
        })
    }

    /// Reads the payload URL named by `url_variable`.
    pub fn url_from(&self, source: &dyn ConfigSource) -> Result<String> {
        source.lookup(&self.url_variable).ok_or_else(|| {
            CenvarsError::configuration(format!("{} is not set", self.url_variable))
        })
    }
}

/// HTTP transport configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransportConfig {
    /// Overall request timeout in seconds; no timeout when absent
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

fn default_key_variable() -> String {
    DEFAULT_KEY_VARIABLE.to_string()
}

fn default_url_variable() -> String {
    DEFAULT_URL_VARIABLE.to_string()
}

fn default_key_size() -> usize {
    DEFAULT_KEY_SIZE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = CenvarsConfig::default();
        assert_eq!(config.key_variable, "CENVARS_KEY");
        assert_eq!(config.url_variable, "CENVARS_URL");
        assert_eq!(config.default_key_size, 2048);
        assert_eq!(config.transport.timeout_secs, None);
    }

    #[test]
    fn test_config_from_str() {
        let toml_content = r#"
key_variable = "APP_SECRET_KEY"
default_key_size = 1024

[transport]
timeout_secs = 10
"#;

        let config = CenvarsConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.key_variable, "APP_SECRET_KEY");
        assert_eq!(config.url_variable, "CENVARS_URL");
        assert_eq!(config.default_key_size, 1024);
        assert_eq!(config.transport.timeout_secs, Some(10));
    }

    #[test]
    fn test_config_invalid_toml() {
        let err = CenvarsConfig::from_toml_str("invalid toml content [").unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_config_file_roundtrip() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("cenvars.toml");

        let config = CenvarsConfig {
            key_variable: "MY_KEY".into(),
            transport: TransportConfig {
                timeout_secs: Some(3),
            },
            ..CenvarsConfig::default()
        };
        config.to_file(&path).unwrap();

        assert_eq!(CenvarsConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_missing_file_is_configuration_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let err = CenvarsConfig::from_file(dir.path().join("absent.toml")).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn test_map_source_treats_empty_as_absent() {
        let source = MapConfigSource::new()
            .with("CENVARS_KEY", "")
            .with("CENVARS_URL", "http://example.com/cenvars");
        assert_eq!(source.lookup("CENVARS_KEY"), None);
        assert_eq!(source.lookup("MISSING"), None);
        assert_eq!(
            source.lookup("CENVARS_URL").as_deref(),
            Some("http://example.com/cenvars")
        );
    }

    #[test]
    fn test_token_from_missing_variable() {
        let config = CenvarsConfig::default();
        let err = config.token_from(&MapConfigSource::new()).unwrap_err();
        assert!(err.is_configuration());
        assert!(err.to_string().contains("CENVARS_KEY"));
    }

    #[test]
    fn test_url_from_source() {
        let config = CenvarsConfig::default();
        let source = MapConfigSource::new().with("CENVARS_URL", "http://example.com/cenvars");
        assert_eq!(config.url_from(&source).unwrap(), "http://example.com/cenvars");
    }
}
