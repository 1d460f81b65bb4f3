//! Per-owner uniqueness of contact email and phone.
//!
//! These checks give precise, per-field feedback. They are not atomic with the
//! write that follows, so the store's unique constraints remain the actual
//! guarantee.

use serde::Serialize;
use uuid::Uuid;

use crate::store::{ContactStore, Store, StoreResult, UniqueField};

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UniquenessCheck {
    pub email_taken: bool,
    pub phone_taken: bool,
}

impl UniquenessCheck {
    /// Email conflicts are reported ahead of phone conflicts.
    pub fn first_conflict(&self) -> Option<UniqueField> {
        if self.email_taken {
            Some(UniqueField::Email)
        } else if self.phone_taken {
            Some(UniqueField::Phone)
        } else {
            None
        }
    }

    pub fn is_clear(&self) -> bool {
        self.first_conflict().is_none()
    }
}

pub async fn check_create(
    store: &dyn Store,
    owner: Uuid,
    email: &str,
    phone: &str,
) -> StoreResult<UniquenessCheck> {
    store.find_taken(owner, Some(email), Some(phone), None).await
}

/// Like [`check_create`] but ignores the contact being edited, so it can keep
/// its current values.
pub async fn check_update(
    store: &dyn Store,
    owner: Uuid,
    contact_id: Uuid,
    email: &str,
    phone: &str,
) -> StoreResult<UniquenessCheck> {
    store
        .find_taken(owner, Some(email), Some(phone), Some(contact_id))
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contacts::repo_types::ContactDraft;
    use crate::store::memory::MemoryStore;

    fn draft(email: &str, phone: &str) -> ContactDraft {
        ContactDraft {
            name: "María García".into(),
            email: email.into(),
            phone: phone.into(),
            address: "Avenida Central 456".into(),
        }
    }

    #[tokio::test]
    async fn fields_are_checked_independently() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        store
            .insert_contact(owner, &draft("maria@example.com", "+0987654321"))
            .await
            .unwrap();

        let c = check_create(&store, owner, "maria@example.com", "+111").await.unwrap();
        assert_eq!(c, UniquenessCheck { email_taken: true, phone_taken: false });

        let c = check_create(&store, owner, "other@example.com", "+0987654321").await.unwrap();
        assert_eq!(c, UniquenessCheck { email_taken: false, phone_taken: true });
        assert_eq!(c.first_conflict(), Some(UniqueField::Phone));

        let c = check_create(&store, owner, "maria@example.com", "+0987654321").await.unwrap();
        assert_eq!(c.first_conflict(), Some(UniqueField::Email));
    }

    #[tokio::test]
    async fn uniqueness_is_per_owner() {
        let store = MemoryStore::new();
        let u1 = Uuid::new_v4();
        let u2 = Uuid::new_v4();
        store.insert_contact(u1, &draft("e@x.io", "1")).await.unwrap();

        assert!(check_create(&store, u2, "e@x.io", "1").await.unwrap().is_clear());
    }

    #[tokio::test]
    async fn update_excludes_the_contact_itself() {
        let store = MemoryStore::new();
        let owner = Uuid::new_v4();
        let a = store.insert_contact(owner, &draft("a@x.io", "1")).await.unwrap();
        store.insert_contact(owner, &draft("b@x.io", "2")).await.unwrap();

        assert!(check_update(&store, owner, a.id, "a@x.io", "1").await.unwrap().is_clear());
        let c = check_update(&store, owner, a.id, "b@x.io", "1").await.unwrap();
        assert_eq!(c.first_conflict(), Some(UniqueField::Email));
    }
}
