use lazy_static::lazy_static;
use regex::Regex;
use tracing::{info, warn};

use crate::{
    auth::{
        dto::{AuthResponse, LoginRequest, PublicUser, RegisterRequest},
        jwt::JwtKeys,
        password::{hash_password, verify_password},
    },
    error::{AppError, AppResult},
    store::{Store, StoreError, UserStore},
};

pub const MIN_PASSWORD_LEN: usize = 8;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

pub(crate) fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

lazy_static! {
    /// Stand-in hash checked when the email is unknown, so both failed-login
    /// paths pay for one argon2 verification.
    static ref DUMMY_HASH: String = hash_password("contactbook-dummy-password").unwrap_or_default();
}

/// Runs the argon2 check off the async runtime.
async fn check_password(password: String, hash: String) -> AppResult<bool> {
    let ok = tokio::task::spawn_blocking(move || verify_password(&password, &hash))
        .await
        .map_err(anyhow::Error::from)?;
    Ok(ok)
}

fn present(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// Checks credentials and issues a session token.
pub async fn login(store: &dyn Store, keys: &JwtKeys, req: LoginRequest) -> AppResult<AuthResponse> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };
    let email = normalize_email(&email);

    let Some(user) = store.find_user_by_email(&email).await? else {
        check_password(password, DUMMY_HASH.clone()).await?;
        warn!(email = %email, "login unknown email");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    };

    if !check_password(password, user.password_hash.clone()).await? {
        warn!(user_id = %user.id, "login invalid password");
        return Err(AppError::Unauthorized("Invalid credentials".into()));
    }

    let token = keys.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "user logged in");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

/// Creates an account and signs the new user in.
pub async fn register(
    store: &dyn Store,
    keys: &JwtKeys,
    req: RegisterRequest,
) -> AppResult<AuthResponse> {
    let (Some(email), Some(password)) = (present(req.email), present(req.password)) else {
        return Err(AppError::Validation("Email and password are required".into()));
    };
    let email = normalize_email(&email);
    if !is_valid_email(&email) {
        return Err(AppError::Validation("Invalid email".into()));
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(AppError::Validation("Password too short".into()));
    }
    let name = present(req.name)
        .map(|n| n.trim().to_string())
        .unwrap_or_else(|| email.split('@').next().unwrap_or_default().to_string());

    if store.find_user_by_email(&email).await?.is_some() {
        warn!(email = %email, "email already registered");
        return Err(AppError::EmailRegistered);
    }

    let hash = tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(anyhow::Error::from)??;

    let user = match store.insert_user(&email, &hash, &name).await {
        Ok(u) => u,
        Err(StoreError::Duplicate(_)) => return Err(AppError::EmailRegistered),
        Err(e) => return Err(e.into()),
    };

    let token = keys.issue(user.id, &user.email)?;
    info!(user_id = %user.id, "user registered");
    Ok(AuthResponse {
        token,
        user: PublicUser::from(user),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::AppState;
    use axum::extract::FromRef;

    async fn seeded() -> (AppState, JwtKeys) {
        let state = AppState::fake();
        let hash = hash_password("password123").unwrap();
        state
            .store
            .insert_user("admin@example.com", &hash, "Administrador")
            .await
            .unwrap();
        let keys = JwtKeys::from_ref(&state);
        (state, keys)
    }

    fn login_req(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: Some(email.into()),
            password: Some(password.into()),
        }
    }

    #[test]
    fn dummy_hash_is_a_real_argon2_hash() {
        assert!(DUMMY_HASH.starts_with("$argon2"));
        assert!(argon2::PasswordHash::new(&DUMMY_HASH).is_ok());
        assert!(!verify_password("password123", &DUMMY_HASH));
    }

    #[test]
    fn email_format() {
        assert!(is_valid_email("juan@example.com"));
        assert!(!is_valid_email("juan@example"));
        assert!(!is_valid_email("juan example.com"));
        assert!(!is_valid_email(""));
    }

    #[tokio::test]
    async fn login_issues_verifiable_token() {
        let (state, keys) = seeded().await;
        let res = login(&*state.store, &keys, login_req(" Admin@Example.com ", "password123"))
            .await
            .expect("login");
        assert_eq!(res.user.email, "admin@example.com");
        assert_eq!(res.user.name, "Administrador");
        let identity = keys.verify(&res.token).expect("token verifies");
        assert_eq!(identity.user_id, res.user.id);
    }

    #[tokio::test]
    async fn login_rejects_bad_credentials_uniformly() {
        let (state, keys) = seeded().await;
        let wrong_pw = login(&*state.store, &keys, login_req("admin@example.com", "nope"))
            .await
            .unwrap_err();
        let unknown = login(&*state.store, &keys, login_req("ghost@example.com", "password123"))
            .await
            .unwrap_err();
        assert!(matches!(wrong_pw, AppError::Unauthorized(ref m) if m == "Invalid credentials"));
        assert!(matches!(unknown, AppError::Unauthorized(ref m) if m == "Invalid credentials"));
    }

    #[tokio::test]
    async fn login_requires_both_fields() {
        let (state, keys) = seeded().await;
        let err = login(
            &*state.store,
            &keys,
            LoginRequest {
                email: Some("admin@example.com".into()),
                password: None,
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn register_then_duplicate() {
        let (state, keys) = seeded().await;
        let req = || RegisterRequest {
            email: Some("new@example.com".into()),
            password: Some("longenough".into()),
            name: None,
        };
        let res = register(&*state.store, &keys, req()).await.expect("register");
        assert_eq!(res.user.name, "new");

        let err = register(&*state.store, &keys, req()).await.unwrap_err();
        assert!(matches!(err, AppError::EmailRegistered));
    }

    #[tokio::test]
    async fn register_validates_input() {
        let (state, keys) = seeded().await;
        let short = RegisterRequest {
            email: Some("x@example.com".into()),
            password: Some("short".into()),
            name: None,
        };
        assert!(matches!(
            register(&*state.store, &keys, short).await.unwrap_err(),
            AppError::Validation(_)
        ));
        let bad_email = RegisterRequest {
            email: Some("not-an-email".into()),
            password: Some("longenough".into()),
            name: None,
        };
        assert!(matches!(
            register(&*state.store, &keys, bad_email).await.unwrap_err(),
            AppError::Validation(_)
        ));
    }
}
