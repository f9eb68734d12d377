//! HTTP client for the external identity provider.
//!
//! The provider issues bearer tokens at sign-in; this client exchanges a
//! token for the user id it belongs to via the provider's user-info
//! endpoint.

use std::time::Duration;

use reqwest::header::AUTHORIZATION;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::error::IdentityError;
use crate::config::IdentitySettings;

/// Path of the provider's user-info endpoint.
const USER_INFO_PATH: &str = "/auth/v1/user";

/// An authenticated caller, as vouched for by the identity provider.
#[derive(Debug, Clone, Deserialize)]
pub struct AuthenticatedUser {
    pub id: String,
}

/// Client for verifying bearer tokens.
pub struct IdentityClient {
    client: Client,
    settings: IdentitySettings,
}

impl IdentityClient {
    /// Builds a client with timeouts suited to a per-request auth check.
    pub fn new(settings: IdentitySettings) -> Result<Self, IdentityError> {
        let client = Client::builder()
            .connect_timeout(Duration::from_secs(5))
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| IdentityError::Network {
                message: format!("Failed to build HTTP client: {e}"),
            })?;

        Ok(Self { client, settings })
    }

    /// Verifies a bearer token, returning the user it belongs to.
    pub async fn verify_token(&self, token: &str) -> Result<AuthenticatedUser, IdentityError> {
        let url = format!(
            "{}{}",
            self.settings.base_url.trim_end_matches('/'),
            USER_INFO_PATH
        );

        let response = self
            .client
            .get(&url)
            .header(AUTHORIZATION, format!("Bearer {token}"))
            .header("apikey", &self.settings.api_key)
            .send()
            .await?;

        match response.status() {
            StatusCode::OK => {
                let user: AuthenticatedUser =
                    response
                        .json()
                        .await
                        .map_err(|e| IdentityError::UnexpectedResponse {
                            message: format!("Malformed user payload: {e}"),
                        })?;
                debug!(token = %token_digest(token), user_id = %user.id, "Verified bearer token");
                Ok(user)
            }
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                warn!(token = %token_digest(token), "Identity provider rejected token");
                Err(IdentityError::TokenRejected)
            }
            status => Err(IdentityError::UnexpectedResponse {
                message: format!("Identity provider returned status {status}"),
            }),
        }
    }
}

/// Short hash of a bearer token, safe to log. Raw tokens never reach the
/// logs.
pub fn token_digest(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    let result = hasher.finalize();
    result[..8].iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_digest_is_stable_and_short() {
        let a = token_digest("token-abc");
        let b = token_digest("token-abc");
        let c = token_digest("token-xyz");

        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 16);
    }
}
