//! Admin-only endpoints, gated on the `admin` role.

use axum::{Extension, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::api::dto::ApiResponse;
use crate::auth::{AuthError, Principal};

/// Identity summary of the calling administrator
#[derive(Debug, Serialize, ToSchema)]
pub struct AdminStatus {
    /// Subject of the presented token
    pub username: String,
    /// Roles carried by the token
    pub roles: Vec<String>,
}

/// Admin status
///
/// Requires the `admin` role; exists mainly so deployments can smoke-test
/// their role assignments.
#[utoipa::path(
    get,
    path = "/api/v1/admin/status",
    tag = "Admin",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Caller is an administrator", body = ApiResponse<AdminStatus>),
        (status = 401, description = "Not authenticated"),
        (status = 403, description = "Authenticated but not an administrator")
    )
)]
pub async fn status(
    principal: Option<Extension<Principal>>,
) -> Result<Json<ApiResponse<AdminStatus>>, AuthError> {
    let Some(Extension(principal)) = principal else {
        return Err(AuthError::Unauthenticated);
    };

    Ok(Json(ApiResponse::success(AdminStatus {
        username: principal.username().to_string(),
        roles: principal.roles().map(str::to_string).collect(),
    })))
}
