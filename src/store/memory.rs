use std::collections::HashMap;

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{ContactStore, StoreError, StoreResult, UniqueField, UserStore};
use crate::auth::repo_types::User;
use crate::contacts::repo_types::{Contact, ContactDraft};
use crate::contacts::validator::UniquenessCheck;

#[derive(Default)]
struct Tables {
    users: HashMap<Uuid, User>,
    contacts: Vec<Contact>,
}

/// In-process store. Writes hold the lock across the uniqueness check, so the
/// constraints hold just like the database indexes.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn conflicts(
    contacts: &[Contact],
    owner: Uuid,
    email: Option<&str>,
    phone: Option<&str>,
    exclude: Option<Uuid>,
) -> UniquenessCheck {
    let mut check = UniquenessCheck::default();
    for c in contacts
        .iter()
        .filter(|c| c.user_id == owner && Some(c.id) != exclude)
    {
        check.email_taken |= email.is_some_and(|e| c.email == e);
        check.phone_taken |= phone.is_some_and(|p| c.phone == p);
    }
    check
}

fn reject(check: UniquenessCheck) -> StoreResult<()> {
    match check.first_conflict() {
        Some(field) => Err(StoreError::Duplicate(field)),
        None => Ok(()),
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        let tables = self.tables.read().await;
        Ok(tables.users.values().find(|u| u.email == email).cloned())
    }

    async fn find_user_by_id(&self, id: Uuid) -> StoreResult<Option<User>> {
        Ok(self.tables.read().await.users.get(&id).cloned())
    }

    async fn insert_user(&self, email: &str, password_hash: &str, name: &str) -> StoreResult<User> {
        let mut tables = self.tables.write().await;
        if tables.users.values().any(|u| u.email == email) {
            return Err(StoreError::Duplicate(UniqueField::Email));
        }
        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            password_hash: password_hash.to_string(),
            name: name.to_string(),
            created_at: OffsetDateTime::now_utc(),
        };
        tables.users.insert(user.id, user.clone());
        Ok(user)
    }
}

#[async_trait]
impl ContactStore for MemoryStore {
    async fn list_contacts(&self, owner: Uuid) -> StoreResult<Vec<Contact>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<Contact> = tables
            .contacts
            .iter()
            .filter(|c| c.user_id == owner)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Contact>> {
        let tables = self.tables.read().await;
        Ok(tables
            .contacts
            .iter()
            .find(|c| c.id == id && c.user_id == owner)
            .cloned())
    }

    async fn find_taken(
        &self,
        owner: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<Uuid>,
    ) -> StoreResult<UniquenessCheck> {
        let tables = self.tables.read().await;
        Ok(conflicts(&tables.contacts, owner, email, phone, exclude))
    }

    async fn insert_contact(&self, owner: Uuid, draft: &ContactDraft) -> StoreResult<Contact> {
        let mut tables = self.tables.write().await;
        reject(conflicts(
            &tables.contacts,
            owner,
            Some(&draft.email),
            Some(&draft.phone),
            None,
        ))?;
        let contact = Contact {
            id: Uuid::new_v4(),
            name: draft.name.clone(),
            email: draft.email.clone(),
            phone: draft.phone.clone(),
            address: draft.address.clone(),
            user_id: owner,
            created_at: OffsetDateTime::now_utc(),
        };
        tables.contacts.push(contact.clone());
        Ok(contact)
    }

    async fn update_contact(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: &ContactDraft,
    ) -> StoreResult<Option<Contact>> {
        let mut tables = self.tables.write().await;
        if !tables.contacts.iter().any(|c| c.id == id && c.user_id == owner) {
            return Ok(None);
        }
        reject(conflicts(
            &tables.contacts,
            owner,
            Some(&draft.email),
            Some(&draft.phone),
            Some(id),
        ))?;
        let Some(row) = tables
            .contacts
            .iter_mut()
            .find(|c| c.id == id && c.user_id == owner)
        else {
            return Ok(None);
        };
        row.name = draft.name.clone();
        row.email = draft.email.clone();
        row.phone = draft.phone.clone();
        row.address = draft.address.clone();
        Ok(Some(row.clone()))
    }

    async fn delete_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let mut tables = self.tables.write().await;
        let before = tables.contacts.len();
        tables.contacts.retain(|c| !(c.id == id && c.user_id == owner));
        Ok(tables.contacts.len() != before)
    }
}
