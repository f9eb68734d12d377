//! Shared application state.

use crate::access::ContentCatalog;
use crate::db::MemberDb;
use crate::identity::IdentityClient;

/// State shared across all request handlers.
pub struct AppState {
    pub db: MemberDb,
    pub catalog: ContentCatalog,
    pub identity: IdentityClient,
}
