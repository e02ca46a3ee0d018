//! Token validation pipeline.
//!
//! Stages run in a fixed order and the first failure wins: structure,
//! signature, issuer, audience (disabled by default), temporal. Signature
//! verification is delegated to `jsonwebtoken`, which compares the HMAC in
//! constant time. The `alg` value inside the token header is never trusted
//! for key selection; this deployment has exactly one active key and only
//! accepts HS256.

use std::sync::Arc;

use chrono::Utc;
use jsonwebtoken::{decode, Algorithm, Validation};
use tracing::trace;

use super::claims::Claims;
use super::error::TokenError;
use super::keys::KeyMaterial;

#[derive(Clone)]
pub struct TokenValidator {
    keys: Arc<KeyMaterial>,
}

impl TokenValidator {
    pub fn new(keys: Arc<KeyMaterial>) -> Self {
        Self { keys }
    }

    /// Validate a token string against the current wall clock.
    pub fn validate(&self, token: &str) -> Result<Claims, TokenError> {
        self.validate_at(token, Utc::now().timestamp())
    }

    /// Time-injected validation; `now` is seconds since the Unix epoch.
    pub fn validate_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        // 1. Structure: exactly three non-empty segments.
        let segments: Vec<&str> = token.split('.').collect();
        if segments.len() != 3 || segments.iter().any(|s| s.is_empty()) {
            return Err(TokenError::Malformed);
        }

        // 2. Signature. Claim checks are made by the stages below so the
        // failure order stays deterministic; jsonwebtoken only decodes and
        // verifies the HMAC here.
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.validate_nbf = false;
        validation.validate_aud = false;
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(token, self.keys.decoding_key(), &validation)?;
        let claims = data.claims;

        // 3. Issuer.
        if claims.iss != self.keys.issuer() {
            return Err(TokenError::InvalidIssuer);
        }

        // 4. Audience; inactive unless enabled by configuration.
        if let Some(expected) = self.keys.audience() {
            if claims.aud.as_deref() != Some(expected) {
                return Err(TokenError::InvalidAudience);
            }
        }

        // 5. Temporal, with clock-skew tolerance.
        let skew = self.keys.clock_skew_secs();
        if now < claims.nbf - skew || now < claims.iat - skew {
            return Err(TokenError::NotYetValid);
        }
        if now >= claims.exp + skew {
            return Err(TokenError::Expired);
        }

        trace!(subject = %claims.sub, "token validated");
        Ok(claims)
    }
}
