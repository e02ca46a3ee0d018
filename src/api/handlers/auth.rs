//! Authentication API handlers

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    Extension, Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::{AuthError, CredentialVerifier, Principal, TokenError, TokenIssuer};

/// State for the authentication handlers
#[derive(Clone)]
pub struct AuthHandlerState {
    pub issuer: TokenIssuer,
    pub credentials: Arc<dyn CredentialVerifier>,
}

/// Sign-in request
#[derive(Debug, Deserialize, ToSchema)]
#[schema(example = json!({
    "username": "will",
    "password": "secret123"
}))]
pub struct SignInRequest {
    /// Username
    pub username: String,
    /// Password
    pub password: String,
}

/// Successful sign-in response
///
/// Carries the bearer token for subsequent requests; pass it in the
/// `Authorization: Bearer <token>` header.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "token": "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...",
    "token_type": "Bearer",
    "expires_in": 7200
}))]
pub struct SignInResponse {
    /// Signed bearer token
    pub token: String,
    /// Always `Bearer`
    pub token_type: String,
    /// Token lifetime in seconds
    pub expires_in: i64,
}

/// A single claim as a (type, value) pair
#[derive(Debug, Serialize, ToSchema)]
pub struct ClaimDto {
    /// Claim type, e.g. `sub`, `jti`, `role`
    #[serde(rename = "type")]
    pub claim_type: String,
    /// Claim value
    pub value: String,
}

/// Sign in and obtain a bearer token
///
/// Credentials are checked by the configured verifier; on success a signed,
/// time-bounded token is returned. Anonymous endpoint.
#[utoipa::path(
    post,
    path = "/api/v1/auth/signin",
    tag = "Authentication",
    request_body = SignInRequest,
    responses(
        (status = 200, description = "Signed token issued", body = ApiResponse<SignInResponse>),
        (status = 400, description = "Credentials rejected")
    )
)]
pub async fn signin(
    State(state): State<AuthHandlerState>,
    Json(request): Json<SignInRequest>,
) -> Result<Json<ApiResponse<SignInResponse>>, (StatusCode, Json<ApiResponse<SignInResponse>>)> {
    let Some(roles) = state
        .credentials
        .verify(&request.username, &request.password)
    else {
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiResponse::error("Invalid credentials")),
        ));
    };

    let token = state
        .issuer
        .issue(&request.username, roles)
        .map_err(|e| match e {
            TokenError::InvalidSubject => (
                StatusCode::BAD_REQUEST,
                Json(ApiResponse::error("Invalid credentials")),
            ),
            other => (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiResponse::error(other.to_string())),
            ),
        })?;

    Ok(Json(ApiResponse::success(SignInResponse {
        token,
        token_type: "Bearer".to_string(),
        expires_in: state.issuer.validity_secs(),
    })))
}

/// List the claims of the current principal
///
/// Each role expands to its own `role` entry.
#[utoipa::path(
    get,
    path = "/api/v1/auth/claims",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Claims of the authenticated principal", body = ApiResponse<Vec<ClaimDto>>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_claims(
    principal: Option<Extension<Principal>>,
) -> Result<Json<ApiResponse<Vec<ClaimDto>>>, AuthError> {
    let Some(Extension(principal)) = principal else {
        return Err(AuthError::Unauthenticated);
    };

    let claims = principal
        .claim_entries()
        .into_iter()
        .map(|(claim_type, value)| ClaimDto { claim_type, value })
        .collect();

    Ok(Json(ApiResponse::success(claims)))
}

/// Username of the current principal
#[utoipa::path(
    get,
    path = "/api/v1/auth/username",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Subject of the presented token", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_username(
    principal: Option<Extension<Principal>>,
) -> Result<Json<ApiResponse<String>>, AuthError> {
    let Some(Extension(principal)) = principal else {
        return Err(AuthError::Unauthenticated);
    };

    Ok(Json(ApiResponse::success(principal.username().to_string())))
}

/// Unique id (`jti`) of the presented token
///
/// Our issuer always sets `jti`; the 404 branch only fires for tokens
/// minted by an issuer version that did not.
#[utoipa::path(
    get,
    path = "/api/v1/auth/jwtid",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Unique token id", body = ApiResponse<String>),
        (status = 401, description = "Not authenticated"),
        (status = 404, description = "Token carries no jti claim")
    )
)]
pub async fn get_token_id(principal: Option<Extension<Principal>>) -> Response {
    let Some(Extension(principal)) = principal else {
        return AuthError::Unauthenticated.into_response();
    };

    match principal.token_id() {
        Some(jti) => Json(ApiResponse::success(jti.to_string())).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}
