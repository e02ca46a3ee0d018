//! Error types for the token engine and the request pipeline.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use crate::api::dto::ApiResponse;

/// Internal token error taxonomy. Every variant except `InvalidSubject`
/// comes out of a validation stage; the pipeline collapses all of them to a
/// single `Unauthenticated` at the HTTP boundary.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenError {
    #[error("subject must not be empty")]
    InvalidSubject,

    #[error("token is not a well-formed three-segment JWT")]
    Malformed,

    #[error("signature verification failed")]
    InvalidSignature,

    #[error("issuer claim does not match the configured issuer")]
    InvalidIssuer,

    #[error("audience claim does not match the configured audience")]
    InvalidAudience,

    #[error("token has expired")]
    Expired,

    #[error("token is not valid yet")]
    NotYetValid,
}

impl From<jsonwebtoken::errors::Error> for TokenError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match err.kind() {
            ErrorKind::InvalidSignature => TokenError::InvalidSignature,
            ErrorKind::ExpiredSignature => TokenError::Expired,
            ErrorKind::ImmatureSignature => TokenError::NotYetValid,
            ErrorKind::InvalidIssuer => TokenError::InvalidIssuer,
            ErrorKind::InvalidAudience => TokenError::InvalidAudience,
            // undecodable segments, bad JSON, unexpected algorithm, ...
            _ => TokenError::Malformed,
        }
    }
}

/// Outcome surfaced to HTTP callers. The distinction between the
/// `TokenError` variants stays in the logs so that error responses cannot
/// be used as a signature/issuer oracle; `Forbidden` is kept separate
/// because identity was already proven.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    #[error("authentication required")]
    Unauthenticated,

    #[error("insufficient permissions")]
    Forbidden,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = match self {
            AuthError::Unauthenticated => StatusCode::UNAUTHORIZED,
            AuthError::Forbidden => StatusCode::FORBIDDEN,
        };
        (status, Json(ApiResponse::<()>::error(self.to_string()))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_error_status_codes() {
        let resp = AuthError::Unauthenticated.into_response();
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

        let resp = AuthError::Forbidden.into_response();
        assert_eq!(resp.status(), StatusCode::FORBIDDEN);
    }
}
