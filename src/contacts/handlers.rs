use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::{header, StatusCode},
    response::{AppendHeaders, IntoResponse},
    routing::{get, put},
    Json, Router,
};
use tracing::instrument;
use uuid::Uuid;

use crate::{
    auth::{dto::MessageResponse, extractors::AuthUser},
    contacts::{
        dto::{ContactInput, ValidResponse, ValidateQuery},
        repo_types::Contact,
        services,
    },
    error::{AppError, AppResult},
    state::AppState,
};

/// Routes relative to the contacts prefix.
pub fn contact_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(list_contacts).post(create_contact))
        .route("/validate", get(validate_contact))
        .route("/:id", put(update_contact).delete(delete_contact))
        .fallback(no_such_route)
}

async fn no_such_route() -> AppError {
    AppError::NotFound("Route")
}

/// Ids that do not parse can't name an existing contact.
fn contact_id(raw: &str) -> AppResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Contact"))
}

#[instrument(skip(state))]
pub async fn list_contacts(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> AppResult<Json<Vec<Contact>>> {
    let contacts = services::list_contacts(&*state.store, user.user_id).await?;
    Ok(Json(contacts))
}

#[instrument(skip(state, payload))]
pub async fn create_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> AppResult<impl IntoResponse> {
    let Json(payload) = payload?;
    let contact = services::create_contact(&*state.store, user.user_id, payload).await?;
    let location = format!("/api/contacts/{}", contact.id);
    Ok((
        StatusCode::CREATED,
        AppendHeaders([(header::LOCATION, location)]),
        Json(contact),
    ))
}

#[instrument(skip(state, payload))]
pub async fn update_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<ContactInput>, JsonRejection>,
) -> AppResult<Json<Contact>> {
    let id = contact_id(&id)?;
    let Json(payload) = payload?;
    let contact = services::update_contact(&*state.store, user.user_id, id, payload).await?;
    Ok(Json(contact))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> AppResult<Json<MessageResponse>> {
    let id = contact_id(&id)?;
    services::delete_contact(&*state.store, user.user_id, id).await?;
    Ok(Json(MessageResponse {
        message: "Contact deleted".into(),
    }))
}

#[instrument(skip(state, query))]
pub async fn validate_contact(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    query: Result<Query<ValidateQuery>, QueryRejection>,
) -> AppResult<Json<ValidResponse>> {
    let Query(query) = query?;
    services::check_availability(&*state.store, user.user_id, query).await?;
    Ok(Json(ValidResponse { valid: true }))
}
