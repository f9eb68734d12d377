//! Error types for the identity provider client.

use thiserror::Error;

/// Errors from verifying a caller against the identity provider.
#[derive(Debug, Error, Clone)]
pub enum IdentityError {
    /// No bearer token on the request
    #[error("Missing bearer token")]
    MissingToken,

    /// The provider rejected the token
    #[error("Identity provider rejected the token")]
    TokenRejected,

    /// Network/HTTP request failed
    #[error("Identity provider unreachable: {message}")]
    Network { message: String },

    /// Provider returned something we can't interpret
    #[error("Unexpected identity provider response: {message}")]
    UnexpectedResponse { message: String },
}

impl IdentityError {
    /// True when the failure is the caller's credential rather than the
    /// provider dependency.
    pub fn is_auth_failure(&self) -> bool {
        matches!(
            self,
            IdentityError::MissingToken | IdentityError::TokenRejected
        )
    }
}

impl From<reqwest::Error> for IdentityError {
    fn from(err: reqwest::Error) -> Self {
        IdentityError::Network {
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credential_failures_are_distinguished_from_outages() {
        assert!(IdentityError::MissingToken.is_auth_failure());
        assert!(IdentityError::TokenRejected.is_auth_failure());
        assert!(!IdentityError::Network {
            message: "timeout".to_string()
        }
        .is_auth_failure());
        assert!(!IdentityError::UnexpectedResponse {
            message: "status 500".to_string()
        }
        .is_auth_failure());
    }
}
