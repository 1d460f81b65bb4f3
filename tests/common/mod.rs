//! Shared setup for HTTP-level tests: an in-memory app with one seeded user.

use axum::body::Body;
use axum::http::{Request, StatusCode};
use contactbook::app::build_app;
use contactbook::auth::password::hash_password;
use contactbook::state::AppState;
use contactbook::store::UserStore;
use serde_json::Value;
use tower::ServiceExt as _;

pub const PASSWORD: &str = "password123";

pub struct TestContext {
    pub state: AppState,
    pub app: axum::Router,
}

impl TestContext {
    pub async fn new() -> Self {
        let state = AppState::fake();
        let app = build_app(state.clone());
        Self { state, app }
    }

    /// Creates a user and returns a session token for it.
    pub async fn user(&self, email: &str) -> String {
        let hash = hash_password(PASSWORD).unwrap();
        self.state.store.insert_user(email, &hash, "Test User").await.unwrap();
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/login",
                None,
                Some(serde_json::json!({ "email": email, "password": PASSWORD })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "login failed: {body}");
        body["token"].as_str().unwrap().to_string()
    }

    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut req = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            req = req.header("authorization", format!("Bearer {t}"));
        }
        let req = match body {
            Some(b) => req
                .header("content-type", "application/json")
                .body(Body::from(b.to_string())),
            None => req.body(Body::empty()),
        }
        .unwrap();
        self.call(req).await
    }

    pub async fn call(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.app.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        let json = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, json)
    }
}
