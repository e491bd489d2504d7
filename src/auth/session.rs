//! PostgreSQL-backed session resolution.

use async_trait::async_trait;
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use uuid::Uuid;

use super::{AuthUser, SessionProvider};
use crate::persistence::StoreError;

/// Hashes a bearer token for session storage and lookup.
///
/// Sessions store only the hex-encoded SHA-256 of the token, so a leaked
/// sessions table does not leak usable credentials.
#[must_use]
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    hex::encode(hasher.finalize())
}

/// [`SessionProvider`] implementation over the `sessions` and `profiles`
/// tables.
#[derive(Debug, Clone)]
pub struct PostgresSessionProvider {
    pool: PgPool,
}

impl PostgresSessionProvider {
    /// Creates a session provider with the given connection pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SessionProvider for PostgresSessionProvider {
    async fn current_user(&self, token: &str) -> Result<Option<AuthUser>, StoreError> {
        let token_hash = hash_token(token);
        let row = sqlx::query_as::<_, (Uuid, String, Option<String>)>(
            "SELECT p.id, p.email, p.username FROM sessions s \
             JOIN profiles p ON p.id = s.user_id \
             WHERE s.token_hash = $1 AND s.expires_at > now()",
        )
        .bind(&token_hash)
        .fetch_optional(&self.pool)
        .await
        .map_err(StoreError::from_sqlx)?;

        Ok(row.map(|(id, email, username)| AuthUser {
            id,
            email,
            username,
        }))
    }

    async fn sign_out(&self, token: &str) -> Result<(), StoreError> {
        sqlx::query("DELETE FROM sessions WHERE token_hash = $1")
            .bind(hash_token(token))
            .execute(&self.pool)
            .await
            .map_err(StoreError::from_sqlx)?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;

    #[test]
    fn token_hash_is_hex_sha256() {
        let hash = hash_token("my-session-token");
        assert_eq!(hash.len(), 64);
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn token_hash_is_deterministic_and_distinct() {
        assert_eq!(hash_token("abc"), hash_token("abc"));
        assert_ne!(hash_token("abc"), hash_token("abd"));
    }
}
