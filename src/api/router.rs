//! API Router with Swagger UI

use std::sync::Arc;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::api::dto::ApiResponse;
use crate::api::handlers::{admin, auth, health};
use crate::auth::middleware::{auth_middleware, require_role, AuthState, RoleRequirement};
use crate::auth::{CredentialVerifier, TokenIssuer, TokenValidator};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::signin,
        auth::get_claims,
        auth::get_username,
        auth::get_token_id,
        admin::status,
    ),
    components(
        schemas(
            ApiResponse<String>,
            auth::SignInRequest,
            auth::SignInResponse,
            auth::ClaimDto,
            admin::AdminStatus,
            health::HealthResponse,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Liveness probe for uptime monitoring. No authentication."),
        (name = "Authentication", description = "Sign-in and token introspection. The token returned by `POST /api/v1/auth/signin` goes into the `Authorization: Bearer <token>` header."),
        (name = "Admin", description = "Endpoints restricted to principals carrying the `admin` role."),
    ),
    info(
        title = "Authgate API",
        version = "0.1.0",
        description = "Bearer-token authentication service: signs time-bounded HMAC tokens for \
verified users and authorizes API requests against them.

## Authentication

Obtain a token via `POST /api/v1/auth/signin` and pass it in the
`Authorization: Bearer <token>` header. Tokens expire after the configured
validity window (2 hours by default).

## Response format

Every REST response is wrapped in the standard envelope:
```json
{\"success\": true, \"data\": {...}, \"error\": null}
```",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    issuer: TokenIssuer,
    validator: TokenValidator,
    credentials: Arc<dyn CredentialVerifier>,
) -> Router {
    let auth_state = AuthState { validator };
    let handler_state = auth::AuthHandlerState {
        issuer,
        credentials,
    };

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (anonymous)
    let signin_routes = Router::new()
        .route("/signin", post(auth::signin))
        .with_state(handler_state);

    // Auth routes (protected; any authenticated principal)
    let introspection_routes = Router::new()
        .route("/claims", get(auth::get_claims))
        .route("/username", get(auth::get_username))
        .route("/jwtid", get(auth::get_token_id))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ));

    // Admin routes (protected; `admin` role required)
    let admin_routes = Router::new()
        .route("/status", get(admin::status))
        .layer(middleware::from_fn_with_state(
            RoleRequirement(&["admin"]),
            require_role,
        ))
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware));

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check))
        .nest("/api/v1/auth", signin_routes)
        .nest("/api/v1/auth", introspection_routes)
        .nest("/api/v1/admin", admin_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
