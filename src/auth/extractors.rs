use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use tracing::{debug, warn};
use uuid::Uuid;

use super::jwt::{JwtKeys, TokenError};
use crate::error::AppError;

/// Extracts and validates the bearer token, yielding the caller's user ID.
/// Every rejection is the same generic 401; the reason is only logged.
pub struct AuthUser(pub Uuid);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Some(auth) = parts
            .headers
            .get(axum::http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
        else {
            debug!("missing Authorization header");
            return Err(AppError::Unauthenticated);
        };

        let Some(token) = bearer_token(auth) else {
            debug!("invalid auth scheme");
            return Err(AppError::Unauthenticated);
        };

        let keys = JwtKeys::from_ref(state);
        match keys.verify(token) {
            Ok(user_id) => Ok(AuthUser(user_id)),
            Err(TokenError::MissingIdentity) => {
                warn!("signed token without user identity");
                Err(AppError::Unauthenticated)
            }
            Err(TokenError::InvalidToken(e)) => {
                warn!(error = %e, "invalid or expired token");
                Err(AppError::Unauthenticated)
            }
        }
    }
}

// Expect "Bearer <token>", scheme case-insensitive.
fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}
