//! Credential verification seam.
//!
//! Mapping (username, password) to valid/invalid is outside this service's
//! scope; deployments plug their own directory behind [`CredentialVerifier`].

/// External collaborator that checks a username/password pair.
pub trait CredentialVerifier: Send + Sync {
    /// Returns the subject's roles when the credentials are valid, `None`
    /// when they are not.
    fn verify(&self, username: &str, password: &str) -> Option<Vec<String>>;
}

/// Permissive verifier for demo deployments: any non-empty username passes
/// and no roles are granted.
#[derive(Debug, Default, Clone, Copy)]
pub struct AnyCredentials;

impl CredentialVerifier for AnyCredentials {
    fn verify(&self, username: &str, _password: &str) -> Option<Vec<String>> {
        if username.trim().is_empty() {
            None
        } else {
            Some(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_any_credentials_requires_a_username() {
        assert_eq!(AnyCredentials.verify("will", "whatever"), Some(vec![]));
        assert_eq!(AnyCredentials.verify("", "whatever"), None);
        assert_eq!(AnyCredentials.verify("   ", "whatever"), None);
    }
}
