//! Authentication and authorization middleware for axum.
//!
//! The authentication layer turns a bearer token into a [`Principal`] in
//! the request extensions, or ends the request with 401. The authorization
//! layer ([`require_role`]) runs after it and checks a declared per-route
//! role requirement, ending the request with 403 when identity was proven
//! but permission was not. Routes left outside both layers are anonymous
//! and simply carry no Principal.

use axum::{
    body::Body,
    extract::State,
    http::{header, Request},
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::debug;

use super::claims::Principal;
use super::error::AuthError;
use super::validator::TokenValidator;

/// State for the authentication middleware.
#[derive(Clone)]
pub struct AuthState {
    pub validator: TokenValidator,
}

/// Pull the bearer token out of an `Authorization` header value. The scheme
/// match is case-insensitive and exactly one token is accepted.
fn extract_bearer(header_value: &str) -> Option<&str> {
    let (scheme, rest) = header_value.trim().split_once(char::is_whitespace)?;
    if !scheme.eq_ignore_ascii_case("Bearer") {
        return None;
    }
    let token = rest.trim();
    if token.is_empty() || token.contains(char::is_whitespace) {
        return None;
    }
    Some(token)
}

/// Authentication middleware: requires a valid bearer token.
pub async fn auth_middleware(
    State(state): State<AuthState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let header_value = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let Some(header_value) = header_value else {
        debug!("missing authorization header");
        return AuthError::Unauthenticated.into_response();
    };

    // Malformed headers are rejected without touching the validator.
    let Some(token) = extract_bearer(header_value) else {
        debug!("authorization header is not a single bearer token");
        return AuthError::Unauthenticated.into_response();
    };

    match state.validator.validate(token) {
        Ok(claims) => {
            request.extensions_mut().insert(Principal::new(claims));
            next.run(request).await
        }
        Err(reason) => {
            // The concrete failure stays in the logs; callers only ever
            // see a generic 401.
            debug!(%reason, "token rejected");
            AuthError::Unauthenticated.into_response()
        }
    }
}

/// Declared per route group and consumed by [`require_role`]. An empty list
/// admits any authenticated principal; otherwise at least one listed role
/// must be present (logical OR).
#[derive(Debug, Clone, Copy)]
pub struct RoleRequirement(pub &'static [&'static str]);

impl RoleRequirement {
    pub fn any_authenticated() -> Self {
        RoleRequirement(&[])
    }

    pub fn allows(&self, principal: &Principal) -> bool {
        self.0.is_empty() || self.0.iter().any(|role| principal.has_role(role))
    }
}

/// Authorization middleware: must run after [`auth_middleware`].
pub async fn require_role(
    State(required): State<RoleRequirement>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let Some(principal) = request.extensions().get::<Principal>() else {
        return AuthError::Unauthenticated.into_response();
    };

    if required.allows(principal) {
        next.run(request).await
    } else {
        debug!(
            subject = principal.username(),
            ?required,
            "role requirement not met"
        );
        AuthError::Forbidden.into_response()
    }
}
