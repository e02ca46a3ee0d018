//! Key material: the symmetric signing secret and issuer identity.
//!
//! Built once at startup from configuration and shared read-only between
//! the issuer and the validator. Construction fails fast when the secret is
//! missing or below the minimum length; nothing here mutates afterwards.

use std::fmt;

use jsonwebtoken::{DecodingKey, EncodingKey};

use crate::config::{ConfigError, SecurityConfig};

/// Secrets shorter than this are rejected at startup.
const MIN_SECRET_BYTES: usize = 16;

pub struct KeyMaterial {
    encoding: EncodingKey,
    decoding: DecodingKey,
    issuer: String,
    validity_secs: i64,
    clock_skew_secs: i64,
    /// `Some` only when the audience stage is enabled by configuration.
    audience: Option<String>,
}

impl KeyMaterial {
    pub fn from_config(cfg: &SecurityConfig) -> Result<Self, ConfigError> {
        let secret = cfg.jwt_secret.as_bytes();
        if secret.is_empty() {
            return Err(ConfigError::MissingSecret);
        }
        if secret.len() < MIN_SECRET_BYTES {
            return Err(ConfigError::WeakSecret {
                min: MIN_SECRET_BYTES,
                len: secret.len(),
            });
        }

        let audience = if cfg.validate_audience {
            match &cfg.audience {
                Some(aud) => Some(aud.clone()),
                None => return Err(ConfigError::MissingAudience),
            }
        } else {
            None
        };

        Ok(Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
            issuer: cfg.issuer.clone(),
            validity_secs: cfg.token_validity_secs,
            clock_skew_secs: cfg.clock_skew_secs,
            audience,
        })
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    pub fn validity_secs(&self) -> i64 {
        self.validity_secs
    }

    pub fn clock_skew_secs(&self) -> i64 {
        self.clock_skew_secs
    }

    /// Expected audience, when the audience stage is active.
    pub fn audience(&self) -> Option<&str> {
        self.audience.as_deref()
    }

    pub fn encoding_key(&self) -> &EncodingKey {
        &self.encoding
    }

    pub fn decoding_key(&self) -> &DecodingKey {
        &self.decoding
    }
}

// The key bytes must never appear in logs.
impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyMaterial")
            .field("issuer", &self.issuer)
            .field("validity_secs", &self.validity_secs)
            .field("clock_skew_secs", &self.clock_skew_secs)
            .field("audience", &self.audience)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn security_config(secret: &str) -> SecurityConfig {
        SecurityConfig {
            jwt_secret: secret.to_string(),
            ..SecurityConfig::default()
        }
    }

    #[test]
    fn test_load_ok() {
        let keys = KeyMaterial::from_config(&security_config("0123456789abcdef")).unwrap();
        assert_eq!(keys.issuer(), "authgate");
        assert_eq!(keys.validity_secs(), 7200);
        assert!(keys.audience().is_none());
    }

    #[test]
    fn test_missing_secret_rejected() {
        let err = KeyMaterial::from_config(&security_config("")).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecret));
    }

    #[test]
    fn test_short_secret_rejected() {
        let err = KeyMaterial::from_config(&security_config("15-bytes-secret")).unwrap_err();
        assert!(matches!(err, ConfigError::WeakSecret { min: 16, len: 15 }));
    }

    #[test]
    fn test_audience_enabled_without_value_rejected() {
        let mut cfg = security_config("0123456789abcdef");
        cfg.validate_audience = true;
        let err = KeyMaterial::from_config(&cfg).unwrap_err();
        assert!(matches!(err, ConfigError::MissingAudience));
    }

    #[test]
    fn test_audience_ignored_when_disabled() {
        let mut cfg = security_config("0123456789abcdef");
        cfg.audience = Some("clients".to_string());
        let keys = KeyMaterial::from_config(&cfg).unwrap();
        assert!(keys.audience().is_none());
    }

    #[test]
    fn test_debug_never_prints_secret() {
        let keys = KeyMaterial::from_config(&security_config("0123456789abcdef")).unwrap();
        let printed = format!("{:?}", keys);
        assert!(!printed.contains("0123456789abcdef"));
    }
}
