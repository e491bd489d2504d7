//! Axum extractor for the authenticated user.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::http::{HeaderMap, header};

use super::AuthUser;
use crate::app_state::AppState;
use crate::error::ApiError;

/// Extracts the authenticated user from the `Authorization` header.
///
/// Resolution is two-step: the bearer token must match an unexpired
/// session, and the session's user must still have a profile row. A
/// session whose user was deleted is revoked on sight. When the profiles
/// table itself is missing the account check is skipped, since a
/// half-provisioned database cannot distinguish deleted accounts from
/// never-created ones.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub AuthUser);

fn unauthorized() -> ApiError {
    ApiError::Unauthorized("Please login to continue.".to_string())
}

/// Pulls the bearer token out of an `Authorization` header, if any.
fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(token) = bearer_token(&parts.headers) else {
            return Err(unauthorized());
        };

        let user = match state.sessions.current_user(token).await {
            Ok(Some(user)) => user,
            Ok(None) => return Err(unauthorized()),
            Err(err) => {
                tracing::warn!(error = %err, "session lookup failed");
                return Err(unauthorized());
            }
        };

        match state.trip_store.profile_exists(user.id).await {
            Ok(true) => {}
            Err(err) if err.is_missing_table() => {
                tracing::debug!("profiles table missing; skipping account check");
            }
            Ok(false) | Err(_) => {
                tracing::warn!(user_id = %user.id, "session user no longer exists; revoking session");
                if let Err(err) = state.sessions.sign_out(token).await {
                    tracing::warn!(error = %err, "failed to revoke session");
                }
                return Err(unauthorized());
            }
        }

        Ok(Self(user))
    }
}

#[cfg(test)]
#[allow(clippy::panic)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with_auth(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        let Ok(value) = HeaderValue::from_str(value) else {
            panic!("invalid header value");
        };
        headers.insert(header::AUTHORIZATION, value);
        headers
    }

    #[test]
    fn extracts_bearer_token() {
        let headers = headers_with_auth("Bearer abc123");
        assert_eq!(bearer_token(&headers), Some("abc123"));
    }

    #[test]
    fn rejects_missing_header() {
        assert_eq!(bearer_token(&HeaderMap::new()), None);
    }

    #[test]
    fn rejects_other_schemes() {
        let headers = headers_with_auth("Basic dXNlcjpwYXNz");
        assert_eq!(bearer_token(&headers), None);
    }

    #[test]
    fn scheme_is_case_sensitive() {
        let headers = headers_with_auth("bearer abc123");
        assert_eq!(bearer_token(&headers), None);
    }
}
