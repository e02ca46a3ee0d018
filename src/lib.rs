//! # Authgate
//!
//! Bearer-token authentication service: issues HMAC-signed, time-bounded
//! tokens (JWT, HS256) for verified users and authenticates/authorizes API
//! requests against them.
//!
//! ## Architecture
//!
//! - **auth**: key material, token issuer/validator, request middleware
//! - **api**: REST API with Swagger documentation
//! - **config**: TOML configuration, loaded once at startup

pub mod api;
pub mod auth;
pub mod config;

pub use config::{default_config_path, AppConfig};

// Re-export the core engine types for embedding as a library
pub use auth::{KeyMaterial, Principal, TokenIssuer, TokenValidator};

// Re-export API router
pub use api::create_api_router;
