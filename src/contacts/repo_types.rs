use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::{
    auth::services::{is_valid_email, normalize_email},
    contacts::dto::ContactInput,
    error::AppError,
};

/// Contact row, also the JSON shape returned to clients.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Contact {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub address: String,
    pub user_id: Uuid,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

/// Validated, normalized field values for a create or update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContactDraft {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl TryFrom<ContactInput> for ContactDraft {
    type Error = AppError;

    fn try_from(input: ContactInput) -> Result<Self, Self::Error> {
        let field = |v: Option<String>| v.map(|s| s.trim().to_string()).unwrap_or_default();
        let name = field(input.name);
        let email = normalize_email(&field(input.email));
        let phone = field(input.phone);
        let address = field(input.address);

        if name.is_empty() || email.is_empty() || phone.is_empty() {
            return Err(AppError::Validation("Name, email and phone are required".into()));
        }
        if !is_valid_email(&email) {
            return Err(AppError::Validation("Invalid email".into()));
        }
        Ok(Self {
            name,
            email,
            phone,
            address,
        })
    }
}
