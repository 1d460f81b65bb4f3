//! Persistence seam for users and contacts.
//!
//! `PgStore` is the production backend; `MemoryStore` keeps everything in
//! process and enforces the same uniqueness constraints, which makes it usable
//! from tests and local runs without a database.

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

use crate::auth::repo_types::User;
use crate::contacts::repo_types::{Contact, ContactDraft};
use crate::contacts::validator::UniquenessCheck;

pub mod memory;

/// Field covered by a per-owner unique constraint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UniqueField {
    Email,
    Phone,
}

impl fmt::Display for UniqueField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniqueField::Email => f.write_str("email"),
            UniqueField::Phone => f.write_str("phone"),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// A unique constraint rejected the write.
    #[error("duplicate {0}")]
    Duplicate(UniqueField),

    #[error(transparent)]
    Database(#[from] sqlx::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>>;
    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>>;
    /// Fails with `Duplicate(Email)` when the email is registered already.
    async fn insert_user(&self, email: &str, password_hash: &str, name: &str) -> StoreResult<User>;
}

/// Every method is scoped to `owner`; rows of other users are invisible.
#[async_trait]
pub trait ContactStore: Send + Sync {
    async fn list_contacts(&self, owner: Uuid) -> StoreResult<Vec<Contact>>;
    async fn find_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Contact>>;
    async fn find_taken(
        &self,
        owner: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<Uuid>,
    ) -> StoreResult<UniquenessCheck>;
    async fn insert_contact(&self, owner: Uuid, draft: &ContactDraft) -> StoreResult<Contact>;
    async fn update_contact(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: &ContactDraft,
    ) -> StoreResult<Option<Contact>>;
    /// Returns false when nothing owned by `owner` had that id.
    async fn delete_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<bool>;
}

pub trait Store: UserStore + ContactStore {}

impl<T: UserStore + ContactStore> Store for T {}

pub type DynStore = Arc<dyn Store>;

#[derive(Clone)]
pub struct PgStore {
    pub db: PgPool,
}

impl PgStore {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Maps a unique violation to the field its constraint covers.
pub(crate) fn map_write_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            let constraint = db_err.constraint().unwrap_or_default();
            if constraint.contains("phone") {
                return StoreError::Duplicate(UniqueField::Phone);
            }
            if constraint.contains("email") {
                return StoreError::Duplicate(UniqueField::Email);
            }
        }
    }
    StoreError::Database(err)
}

#[cfg(test)]
mod tests {
    use std::error::Error as StdError;

    use sqlx::error::{DatabaseError, ErrorKind};

    use super::*;

    /// Database error as the Postgres driver would report a constraint hit.
    #[derive(Debug)]
    struct ConstraintError {
        unique: bool,
        constraint: &'static str,
    }

    impl fmt::Display for ConstraintError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "violates constraint \"{}\"", self.constraint)
        }
    }

    impl StdError for ConstraintError {}

    impl DatabaseError for ConstraintError {
        fn message(&self) -> &str {
            "constraint violation"
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn constraint(&self) -> Option<&str> {
            Some(self.constraint)
        }

        fn kind(&self) -> ErrorKind {
            if self.unique {
                ErrorKind::UniqueViolation
            } else {
                ErrorKind::ForeignKeyViolation
            }
        }
    }

    fn violation(unique: bool, constraint: &'static str) -> sqlx::Error {
        sqlx::Error::Database(Box::new(ConstraintError { unique, constraint }))
    }

    #[test]
    fn unique_violations_map_to_their_field() {
        assert!(matches!(
            map_write_error(violation(true, "contacts_owner_email_key")),
            StoreError::Duplicate(UniqueField::Email)
        ));
        assert!(matches!(
            map_write_error(violation(true, "contacts_owner_phone_key")),
            StoreError::Duplicate(UniqueField::Phone)
        ));
        assert!(matches!(
            map_write_error(violation(true, "users_email_key")),
            StoreError::Duplicate(UniqueField::Email)
        ));
    }

    #[test]
    fn other_database_errors_pass_through() {
        assert!(matches!(
            map_write_error(violation(false, "contacts_user_id_fkey")),
            StoreError::Database(_)
        ));
        assert!(matches!(
            map_write_error(violation(true, "contacts_pkey")),
            StoreError::Database(_)
        ));
        assert!(matches!(
            map_write_error(sqlx::Error::RowNotFound),
            StoreError::Database(_)
        ));
    }
}
