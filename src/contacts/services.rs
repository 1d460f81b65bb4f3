use tracing::{info, warn};
use uuid::Uuid;

use crate::{
    auth::services::normalize_email,
    contacts::{
        dto::{ContactInput, ValidateQuery},
        repo_types::{Contact, ContactDraft},
        validator,
    },
    error::{AppError, AppResult},
    store::{ContactStore, Store},
};

const CONTACT: &str = "Contact";

pub async fn list_contacts(store: &dyn Store, owner: Uuid) -> AppResult<Vec<Contact>> {
    Ok(store.list_contacts(owner).await?)
}

pub async fn create_contact(store: &dyn Store, owner: Uuid, input: ContactInput) -> AppResult<Contact> {
    let draft = ContactDraft::try_from(input)?;

    let check = validator::check_create(store, owner, &draft.email, &draft.phone).await?;
    if let Some(field) = check.first_conflict() {
        warn!(user_id = %owner, %field, "create rejected: duplicate");
        return Err(AppError::Duplicate(field));
    }

    // A concurrent create can still slip past the check; the store constraint
    // turns that into the same Duplicate error.
    let contact = store.insert_contact(owner, &draft).await?;
    info!(user_id = %owner, contact_id = %contact.id, "contact created");
    Ok(contact)
}

pub async fn update_contact(
    store: &dyn Store,
    owner: Uuid,
    id: Uuid,
    input: ContactInput,
) -> AppResult<Contact> {
    if store.find_contact(owner, id).await?.is_none() {
        return Err(AppError::NotFound(CONTACT));
    }
    let draft = ContactDraft::try_from(input)?;

    let check = validator::check_update(store, owner, id, &draft.email, &draft.phone).await?;
    if let Some(field) = check.first_conflict() {
        warn!(user_id = %owner, contact_id = %id, %field, "update rejected: duplicate");
        return Err(AppError::Duplicate(field));
    }

    let contact = store
        .update_contact(owner, id, &draft)
        .await?
        .ok_or(AppError::NotFound(CONTACT))?;
    info!(user_id = %owner, contact_id = %id, "contact updated");
    Ok(contact)
}

pub async fn delete_contact(store: &dyn Store, owner: Uuid, id: Uuid) -> AppResult<()> {
    if !store.delete_contact(owner, id).await? {
        return Err(AppError::NotFound(CONTACT));
    }
    info!(user_id = %owner, contact_id = %id, "contact deleted");
    Ok(())
}

/// Pre-flight check used for live form feedback. Blank parameters are skipped;
/// an unparsable `excludeId` cannot match any row and is ignored.
pub async fn check_availability(store: &dyn Store, owner: Uuid, query: ValidateQuery) -> AppResult<()> {
    let email = query
        .email
        .map(|e| normalize_email(&e))
        .filter(|e| !e.is_empty());
    let phone = query
        .phone
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty());
    let exclude = query.exclude_id.and_then(|id| Uuid::parse_str(id.trim()).ok());

    let check = store
        .find_taken(owner, email.as_deref(), phone.as_deref(), exclude)
        .await?;
    match check.first_conflict() {
        Some(field) => Err(AppError::Taken(field)),
        None => Ok(()),
    }
}
