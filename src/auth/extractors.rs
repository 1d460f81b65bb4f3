use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts, Request, State},
    http::{request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::{claims::SessionIdentity, cookie::token_from_headers, jwt::JwtKeys};
use crate::{error::AppError, state::AppState};

/// Verifies the session token from the `Authorization` header or the
/// `auth-token` cookie.
pub fn authenticate(keys: &JwtKeys, headers: &HeaderMap) -> Result<SessionIdentity, AppError> {
    let token = token_from_headers(headers)
        .ok_or_else(|| AppError::Unauthorized("Unauthorized".into()))?;
    keys.verify(token).ok_or_else(|| {
        warn!("invalid or expired token");
        AppError::Unauthorized("Invalid or expired token".into())
    })
}

/// Route guard: rejects requests without a valid session before any handler
/// runs and stores the identity in the request extensions.
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let keys = JwtKeys::from_ref(&state);
    let identity = authenticate(&keys, req.headers())?;
    req.extensions_mut().insert(identity);
    Ok(next.run(req).await)
}

/// Extracts the caller's identity, reusing the one stored by
/// [`require_session`] when the route is guarded.
pub struct AuthUser(pub SessionIdentity);

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    JwtKeys: FromRef<S>,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(identity) = parts.extensions.get::<SessionIdentity>() {
            return Ok(AuthUser(identity.clone()));
        }
        let keys = JwtKeys::from_ref(state);
        authenticate(&keys, &parts.headers).map(AuthUser)
    }
}
