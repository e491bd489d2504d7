//! Session authentication: bearer tokens resolved against the database.
//!
//! Sessions are issued elsewhere (the web frontend's login flow); this
//! service only resolves them. A request carries `Authorization: Bearer
//! <token>`, the token is hashed and matched against an unexpired
//! session row, and the [`CurrentUser`] extractor additionally confirms
//! the user's profile still exists, revoking the session when it does
//! not.

pub mod extractor;
pub mod session;

pub use extractor::CurrentUser;
pub use session::PostgresSessionProvider;

use async_trait::async_trait;
use uuid::Uuid;

use crate::persistence::StoreError;

/// The authenticated user attached to a request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    /// User id, used as the owner key for trips.
    pub id: Uuid,
    /// Account email.
    pub email: String,
    /// Optional display name.
    pub username: Option<String>,
}

/// Resolves bearer tokens to users and revokes sessions.
#[async_trait]
pub trait SessionProvider: Send + Sync {
    /// Resolves a bearer token to its user. Returns `Ok(None)` for
    /// unknown or expired tokens.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] when the session lookup itself fails.
    async fn current_user(&self, token: &str) -> Result<Option<AuthUser>, StoreError>;

    /// Revokes the session behind a bearer token. Revoking an unknown
    /// token is not an error.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] on database failure.
    async fn sign_out(&self, token: &str) -> Result<(), StoreError>;
}
