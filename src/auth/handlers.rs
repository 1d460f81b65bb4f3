use axum::{
    extract::{rejection::JsonRejection, FromRef, State},
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, post},
    Json, Router,
};
use tracing::{instrument, warn};

use crate::{
    auth::{
        cookie::{clear_session_cookie, session_cookie},
        dto::{AuthResponse, LoginRequest, MessageResponse, PublicUser, RegisterRequest},
        extractors::AuthUser,
        jwt::JwtKeys,
        services,
    },
    error::{AppError, AppResult},
    state::AppState,
    store::UserStore,
};

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(login))
        .route("/auth/register", post(register))
        .route("/auth/logout", post(logout))
}

pub fn me_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(get_me))
}

fn with_cookie(
    state: &AppState,
    keys: &JwtKeys,
    status: StatusCode,
    body: AuthResponse,
) -> impl IntoResponse {
    let cookie = session_cookie(&body.token, keys.ttl_secs(), state.config.cookie_secure);
    (status, AppendHeaders([(header::SET_COOKIE, cookie)]), Json(body))
}

#[instrument(skip(state, payload))]
pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let body = services::login(&*state.store, &keys, payload).await?;
    Ok(with_cookie(&state, &keys, StatusCode::OK, body))
}

#[instrument(skip(state, payload))]
pub async fn register(
    State(state): State<AppState>,
    payload: Result<Json<RegisterRequest>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let keys = JwtKeys::from_ref(&state);
    let body = services::register(&*state.store, &keys, payload).await?;
    Ok(with_cookie(&state, &keys, StatusCode::CREATED, body))
}

/// Clears the browser cookie. The token itself stays valid until it expires.
#[instrument(skip(state))]
pub async fn logout(State(state): State<AppState>) -> impl IntoResponse {
    (
        AppendHeaders([(header::SET_COOKIE, clear_session_cookie(state.config.cookie_secure))]),
        Json(MessageResponse {
            message: "Logged out".into(),
        }),
    )
}

#[instrument(skip(state, identity))]
pub async fn get_me(
    State(state): State<AppState>,
    AuthUser(identity): AuthUser,
) -> AppResult<Json<PublicUser>> {
    match state.store.find_user_by_id(identity.user_id).await? {
        Some(user) => Ok(Json(PublicUser::from(user))),
        None => {
            warn!(user_id = %identity.user_id, "token for unknown user");
            Err(AppError::Unauthorized("User not found".into()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn auth_response_sets_session_cookie() {
        let state = AppState::fake();
        let keys = JwtKeys::from_ref(&state);
        let body = AuthResponse {
            token: "abc.def.ghi".into(),
            user: PublicUser {
                id: uuid::Uuid::new_v4(),
                email: "admin@example.com".into(),
                name: "Administrador".into(),
            },
        };
        let res = with_cookie(&state, &keys, StatusCode::CREATED, body).into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        let cookie = res.headers()[header::SET_COOKIE].to_str().unwrap();
        assert_eq!(
            cookie,
            "auth-token=abc.def.ghi; HttpOnly; SameSite=Lax; Path=/; Max-Age=604800"
        );
    }
}
