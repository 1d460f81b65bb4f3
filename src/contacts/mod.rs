use axum::{middleware, Router};

use crate::{auth::extractors::require_session, state::AppState};

pub mod dto;
pub mod handlers;
pub mod repo;
pub mod repo_types;
pub mod services;
pub mod validator;

/// Contact routes, meant to be nested at `/api/contacts`. The guard wraps the
/// fallback too, so unknown paths under the prefix answer 401 to anonymous
/// callers.
pub fn router(state: AppState) -> Router<AppState> {
    handlers::contact_routes().layer(middleware::from_fn_with_state(state, require_session))
}
