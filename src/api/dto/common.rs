//! Common API DTOs

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Standard response envelope for all REST endpoints.
///
/// Success: `{"success": true, "data": {...}}`.
/// Failure: `{"success": false, "error": "description"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    /// `true` when the request was handled successfully
    pub success: bool,
    /// Payload; `null` on error
    pub data: Option<T>,
    /// Error description; `null` on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_envelope_shapes() {
        let ok = serde_json::to_value(ApiResponse::success("payload")).unwrap();
        assert_eq!(ok["success"], true);
        assert_eq!(ok["data"], "payload");
        assert!(ok.get("error").is_none());

        let err = serde_json::to_value(ApiResponse::<String>::error("boom")).unwrap();
        assert_eq!(err["success"], false);
        assert_eq!(err["error"], "boom");
    }
}
