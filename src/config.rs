//! Configuration module
//!
//! All settings are read once at process start from a TOML file
//! (`~/.config/authgate/config.toml` by default, overridable via the
//! `AUTHGATE_CONFIG` environment variable). There is no hot reload.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("jwt secret is not configured")]
    MissingSecret,

    #[error("jwt secret must be at least {min} bytes, got {len}")]
    WeakSecret { min: usize, len: usize },

    #[error("audience validation is enabled but no audience is configured")]
    MissingAudience,
}

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub security: SecurityConfig,
    pub logging: LoggingConfig,
}

/// HTTP server settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Bind address
    pub host: String,
    /// Bind port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

/// Token signing and validation settings
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct SecurityConfig {
    /// Symmetric signing secret. Must be at least 16 bytes; the
    /// `AUTHGATE_JWT_SECRET` environment variable takes precedence.
    pub jwt_secret: String,
    /// Issuer claim stamped into every token and required on validation
    pub issuer: String,
    /// Token validity window in seconds
    pub token_validity_secs: i64,
    /// Allowed clock disagreement between issuer and validator, in seconds
    pub clock_skew_secs: i64,
    /// Whether the audience stage of the validation pipeline is active
    pub validate_audience: bool,
    /// Expected audience; only consulted when `validate_audience` is set
    pub audience: Option<String>,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            issuer: "authgate".to_string(),
            token_validity_secs: 7200,
            clock_skew_secs: 5,
            validate_audience: false,
            audience: None,
        }
    }
}

// The signing secret must never end up in logs, so no derived Debug.
impl fmt::Debug for SecurityConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecurityConfig")
            .field("jwt_secret", &"<redacted>")
            .field("issuer", &self.issuer)
            .field("token_validity_secs", &self.token_validity_secs)
            .field("clock_skew_secs", &self.clock_skew_secs)
            .field("validate_audience", &self.validate_audience)
            .field("audience", &self.audience)
            .finish()
    }
}

/// Logging settings
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter, e.g. `info` or `authgate=debug`
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file and apply environment overrides.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let cfg: AppConfig = toml::from_str(&raw)?;
        Ok(cfg.with_env_overrides())
    }

    /// Apply environment variable overrides on top of file/default values.
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(secret) = std::env::var("AUTHGATE_JWT_SECRET") {
            self.security.jwt_secret = secret;
        }
        self
    }

    pub fn address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

/// Default config file location: `~/.config/authgate/config.toml`
pub fn default_config_path() -> PathBuf {
    dirs_next::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("authgate")
        .join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.security.issuer, "authgate");
        assert_eq!(cfg.security.token_validity_secs, 7200);
        assert_eq!(cfg.security.clock_skew_secs, 5);
        assert!(!cfg.security.validate_audience);
        assert_eq!(cfg.logging.level, "info");
    }

    #[test]
    fn test_parse_partial_toml() {
        let cfg: AppConfig = toml::from_str(
            r#"
            [server]
            port = 9999

            [security]
            jwt_secret = "0123456789abcdef"
            issuer = "my-issuer"
            "#,
        )
        .unwrap();

        assert_eq!(cfg.server.port, 9999);
        assert_eq!(cfg.server.host, "0.0.0.0");
        assert_eq!(cfg.security.jwt_secret, "0123456789abcdef");
        assert_eq!(cfg.security.issuer, "my-issuer");
        // untouched sections keep their defaults
        assert_eq!(cfg.security.token_validity_secs, 7200);
    }

    #[test]
    fn test_address() {
        let mut cfg = AppConfig::default();
        cfg.server.host = "127.0.0.1".to_string();
        cfg.server.port = 8081;
        assert_eq!(cfg.address(), "127.0.0.1:8081");
    }

    #[test]
    fn test_debug_redacts_secret() {
        let mut cfg = SecurityConfig::default();
        cfg.jwt_secret = "super-secret-value".to_string();
        let printed = format!("{:?}", cfg);
        assert!(!printed.contains("super-secret-value"));
        assert!(printed.contains("<redacted>"));
    }
}
