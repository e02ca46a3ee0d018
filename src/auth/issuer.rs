//! Token issuance.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{encode, Algorithm, Header};
use tracing::debug;
use uuid::Uuid;

use super::claims::{Claims, Roles};
use super::error::TokenError;
use super::keys::KeyMaterial;

/// Builds and signs time-bounded tokens for already-authenticated subjects.
///
/// Issuance is pure apart from `jti` generation: no storage, no network,
/// no shared mutable state. The caller is expected to have verified the
/// subject's credentials beforehand.
#[derive(Clone)]
pub struct TokenIssuer {
    keys: Arc<KeyMaterial>,
}

impl TokenIssuer {
    pub fn new(keys: Arc<KeyMaterial>) -> Self {
        Self { keys }
    }

    /// Issue a signed token for `subject` carrying zero or more roles.
    pub fn issue(&self, subject: &str, roles: Vec<String>) -> Result<String, TokenError> {
        self.issue_at(subject, roles, Utc::now().timestamp())
    }

    /// Time-injected issuance; `now` is seconds since the Unix epoch.
    pub fn issue_at(
        &self,
        subject: &str,
        roles: Vec<String>,
        now: i64,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::InvalidSubject);
        }

        let claims = Claims {
            sub: subject.to_string(),
            // UUID v4 comes from the OS CSPRNG, so token ids are unguessable
            jti: Some(Uuid::new_v4().to_string()),
            iss: self.keys.issuer().to_string(),
            iat: now,
            nbf: now,
            exp: now + self.keys.validity_secs(),
            aud: self.keys.audience().map(str::to_string),
            role: Roles::from(roles),
        };

        debug!(subject, exp = claims.exp, "issuing token");

        Ok(encode(
            &Header::new(Algorithm::HS256),
            &claims,
            self.keys.encoding_key(),
        )?)
    }

    /// Validity window stamped into issued tokens, in seconds.
    pub fn validity_secs(&self) -> i64 {
        self.keys.validity_secs()
    }
}
