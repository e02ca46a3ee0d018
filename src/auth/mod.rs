//! Authentication and Authorization module
//!
//! Token issuance/validation engine plus the axum request pipeline that
//! consumes it.

pub mod claims;
pub mod credentials;
pub mod error;
pub mod issuer;
pub mod keys;
pub mod middleware;
pub mod validator;

pub use claims::{Claims, Principal, Roles};
pub use credentials::{AnyCredentials, CredentialVerifier};
pub use error::{AuthError, TokenError};
pub use issuer::TokenIssuer;
pub use keys::KeyMaterial;
pub use middleware::{auth_middleware, require_role, AuthState, RoleRequirement};
pub use validator::TokenValidator;
