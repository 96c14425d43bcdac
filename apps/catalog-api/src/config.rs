//! # Catalog API Configuration
//!
//! Configuration for the HTTP server.
//!
//! ## Configuration Sources (Priority Order)
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Loading                                │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                            │
//! │     CATALOG_HOST, CATALOG_PORT, CATALOG_ENV, CATALOG_API_KEYS, ...      │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  2. Config File                                                         │
//! │     $CATALOG_CONFIG or ./catalog.toml                                   │
//! │                          │                                              │
//! │                          ▼                                              │
//! │  3. Default Values (lowest priority)                                    │
//! │     0.0.0.0:3000, development, auth disabled                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example Config File
//! ```toml
//! host = "127.0.0.1"
//! port = 8080
//! environment = "production"
//! error_rate_threshold = 5.0
//! seed = false
//! cors_origins = ["https://shop.example.com"]
//!
//! [[api_keys]]
//! key = "editor-secret"
//! role = "editor"
//!
//! [[api_keys]]
//! key = "admin-secret"
//! role = "admin"
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::auth::Role;
use catalog_core::metrics::DEFAULT_ERROR_RATE_THRESHOLD;
use catalog_core::RuntimeMode;

/// Default config file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "catalog.toml";

// =============================================================================
// Errors
// =============================================================================

/// Configuration error types.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue { key: String, value: String },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

// =============================================================================
// Main Configuration
// =============================================================================

/// One accepted API key and the role it grants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiKeyConfig {
    pub key: String,
    pub role: Role,
}

/// Catalog API configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Interface to bind.
    pub host: String,

    /// HTTP port.
    pub port: u16,

    /// Decides how much failure detail callers see.
    pub environment: RuntimeMode,

    /// Allowed CORS origins. Empty allows any origin.
    pub cors_origins: Vec<String>,

    /// Accepted API keys. Empty disables authentication.
    pub api_keys: Vec<ApiKeyConfig>,

    /// Errors per minute over the last hour above which health is degraded.
    pub error_rate_threshold: f64,

    /// Load the demo catalog at startup.
    pub seed: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            environment: RuntimeMode::Development,
            cors_origins: Vec::new(),
            api_keys: Vec::new(),
            error_rate_threshold: DEFAULT_ERROR_RATE_THRESHOLD,
            seed: true,
        }
    }
}

impl CatalogConfig {
    /// Loads configuration from file and environment.
    ///
    /// ## Priority
    /// 1. Environment variables (highest)
    /// 2. Config file
    /// 3. Defaults (lowest)
    pub fn load(config_path: Option<PathBuf>) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        let path = config_path
            .or_else(|| std::env::var("CATALOG_CONFIG").ok().map(PathBuf::from))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE));

        if path.exists() {
            info!(?path, "Loading catalog config from file");
            let contents = std::fs::read_to_string(&path)?;
            config = toml::from_str(&contents)?;
        } else {
            debug!(?path, "Config file not found, using defaults");
        }

        config.apply_overrides(|key| std::env::var(key).ok())?;
        config.validate()?;

        Ok(config)
    }

    /// Applies `CATALOG_*` overrides read through `lookup`.
    ///
    /// A malformed override is an error; it is never skipped.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(host) = lookup("CATALOG_HOST") {
            debug!(host = %host, "Overriding host from environment");
            self.host = host;
        }

        if let Some(port) = lookup("CATALOG_PORT") {
            self.port = parse_value("CATALOG_PORT", &port)?;
        }

        if let Some(env) = lookup("CATALOG_ENV") {
            debug!(environment = %env, "Overriding environment from environment");
            self.environment = parse_value("CATALOG_ENV", &env)?;
        }

        if let Some(keys) = lookup("CATALOG_API_KEYS") {
            self.api_keys = parse_api_keys(&keys)?;
        }

        if let Some(threshold) = lookup("CATALOG_ERROR_RATE_THRESHOLD") {
            self.error_rate_threshold = parse_value("CATALOG_ERROR_RATE_THRESHOLD", &threshold)?;
        }

        if let Some(seed) = lookup("CATALOG_SEED") {
            self.seed = parse_value("CATALOG_SEED", &seed)?;
        }

        if let Some(origins) = lookup("CATALOG_CORS_ORIGINS") {
            self.cors_origins = origins
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(())
    }

    /// Validates the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.port == 0 {
            return Err(ConfigError::Invalid("port must be greater than 0".into()));
        }

        if !(self.error_rate_threshold.is_finite() && self.error_rate_threshold > 0.0) {
            return Err(ConfigError::Invalid(
                "error_rate_threshold must be a positive number".into(),
            ));
        }

        if self.api_keys.iter().any(|k| k.key.trim().is_empty()) {
            return Err(ConfigError::Invalid("api key must not be empty".into()));
        }

        Ok(())
    }

    /// `host:port` to bind.
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// True when requests are not checked for an API key.
    pub fn auth_disabled(&self) -> bool {
        self.api_keys.is_empty()
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::InvalidValue {
        key: key.to_string(),
        value: value.to_string(),
    })
}

/// Parses `key:role,key:role`.
fn parse_api_keys(raw: &str) -> Result<Vec<ApiKeyConfig>, ConfigError> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(|entry| {
            let (key, role) = entry.rsplit_once(':').ok_or_else(|| ConfigError::InvalidValue {
                key: "CATALOG_API_KEYS".to_string(),
                value: entry.to_string(),
            })?;
            Ok(ApiKeyConfig {
                key: key.trim().to_string(),
                role: parse_value("CATALOG_API_KEYS", role)?,
            })
        })
        .collect()
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = CatalogConfig::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.environment, RuntimeMode::Development);
        assert_eq!(config.error_rate_threshold, 2.0);
        assert!(config.seed);
        assert!(config.auth_disabled());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_partial_file() {
        let toml_str = r#"
port = 8080
environment = "production"

[[api_keys]]
key = "k1"
role = "admin"
"#;
        let config: CatalogConfig = toml::from_str(toml_str).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.environment, RuntimeMode::Production);
        assert_eq!(config.api_keys[0].role, Role::Admin);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = CatalogConfig::default();
        config
            .apply_overrides(env(&[
                ("CATALOG_PORT", "9000"),
                ("CATALOG_ENV", "test"),
                ("CATALOG_API_KEYS", "abc:editor, xyz:admin"),
                ("CATALOG_SEED", "false"),
                ("CATALOG_CORS_ORIGINS", "https://a.example, https://b.example"),
            ]))
            .unwrap();

        assert_eq!(config.port, 9000);
        assert_eq!(config.environment, RuntimeMode::Test);
        assert!(!config.seed);
        assert_eq!(config.cors_origins.len(), 2);
        assert_eq!(
            config.api_keys,
            vec![
                ApiKeyConfig { key: "abc".into(), role: Role::Editor },
                ApiKeyConfig { key: "xyz".into(), role: Role::Admin },
            ]
        );
    }

    #[test]
    fn test_bad_override_is_error() {
        let mut config = CatalogConfig::default();
        let err = config
            .apply_overrides(env(&[("CATALOG_PORT", "http")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { ref key, .. } if key == "CATALOG_PORT"));

        let err = config
            .apply_overrides(env(&[("CATALOG_API_KEYS", "abc:superuser")]))
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = CatalogConfig {
            port: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let config = CatalogConfig {
            error_rate_threshold: 0.0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_bind_address() {
        let config = CatalogConfig {
            host: "127.0.0.1".into(),
            port: 4000,
            ..Default::default()
        };
        assert_eq!(config.bind_address(), "127.0.0.1:4000");
    }
}
