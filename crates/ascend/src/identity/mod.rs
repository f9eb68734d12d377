//! Identity provider integration.
//!
//! Authentication itself is delegated to an external provider that issues
//! bearer tokens; this module verifies a token and resolves the user it
//! belongs to.

mod client;
mod error;

pub use client::{token_digest, AuthenticatedUser, IdentityClient};
pub use error::IdentityError;
