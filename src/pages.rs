//! Page-level route guard. The pages themselves are bare shells; the
//! interesting part is where each one sends the browser.

use axum::{
    extract::{FromRef, State},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Router,
};

use crate::{
    auth::{extractors::authenticate, jwt::JwtKeys},
    state::AppState,
};

const LOGIN_PAGE: &str = r#"<!doctype html>
<html><head><meta charset="utf-8"><title>Sign in</title></head>
<body><form id="login" method="post" action="/api/auth/login">
<input name="email" type="email" required><input name="password" type="password" required>
<button type="submit">Sign in</button></form></body></html>"#;

const DASHBOARD_PAGE: &str = r#"<!doctype html>
<html><head><meta charset="utf-8"><title>Contacts</title></head>
<body><main id="contacts"></main></body></html>"#;

pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_page))
        .route("/dashboard", get(dashboard_page))
}

fn signed_in(state: &AppState, headers: &HeaderMap) -> bool {
    authenticate(&JwtKeys::from_ref(state), headers).is_ok()
}

pub async fn login_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if signed_in(&state, &headers) {
        return Redirect::to("/dashboard").into_response();
    }
    Html(LOGIN_PAGE).into_response()
}

pub async fn dashboard_page(State(state): State<AppState>, headers: HeaderMap) -> Response {
    if !signed_in(&state, &headers) {
        return Redirect::to("/login").into_response();
    }
    Html(DASHBOARD_PAGE).into_response()
}
