use async_trait::async_trait;
use uuid::Uuid;

use crate::contacts::repo_types::{Contact, ContactDraft};
use crate::contacts::validator::UniquenessCheck;
use crate::store::{map_write_error, ContactStore, PgStore, StoreResult};

const COLUMNS: &str = "id, name, email, phone, address, user_id, created_at";

#[async_trait]
impl ContactStore for PgStore {
    async fn list_contacts(&self, owner: Uuid) -> StoreResult<Vec<Contact>> {
        let rows = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM contacts
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#
        ))
        .bind(owner)
        .fetch_all(&self.db)
        .await?;
        Ok(rows)
    }

    async fn find_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM contacts
            WHERE id = $1 AND user_id = $2
            "#
        ))
        .bind(id)
        .bind(owner)
        .fetch_optional(&self.db)
        .await?;
        Ok(row)
    }

    async fn find_taken(
        &self,
        owner: Uuid,
        email: Option<&str>,
        phone: Option<&str>,
        exclude: Option<Uuid>,
    ) -> StoreResult<UniquenessCheck> {
        let (email_taken, phone_taken) = sqlx::query_as::<_, (bool, bool)>(
            r#"
            SELECT
                COALESCE(BOOL_OR($2::text IS NOT NULL AND email = $2), FALSE),
                COALESCE(BOOL_OR($3::text IS NOT NULL AND phone = $3), FALSE)
            FROM contacts
            WHERE user_id = $1
              AND ($4::uuid IS NULL OR id <> $4)
            "#,
        )
        .bind(owner)
        .bind(email)
        .bind(phone)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;
        Ok(UniquenessCheck {
            email_taken,
            phone_taken,
        })
    }

    async fn insert_contact(&self, owner: Uuid, draft: &ContactDraft) -> StoreResult<Contact> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            INSERT INTO contacts (id, name, email, phone, address, user_id)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.address)
        .bind(owner)
        .fetch_one(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(row)
    }

    async fn update_contact(
        &self,
        owner: Uuid,
        id: Uuid,
        draft: &ContactDraft,
    ) -> StoreResult<Option<Contact>> {
        let row = sqlx::query_as::<_, Contact>(&format!(
            r#"
            UPDATE contacts
               SET name = $3, email = $4, phone = $5, address = $6
             WHERE id = $1 AND user_id = $2
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(owner)
        .bind(&draft.name)
        .bind(&draft.email)
        .bind(&draft.phone)
        .bind(&draft.address)
        .fetch_optional(&self.db)
        .await
        .map_err(map_write_error)?;
        Ok(row)
    }

    async fn delete_contact(&self, owner: Uuid, id: Uuid) -> StoreResult<bool> {
        let res = sqlx::query("DELETE FROM contacts WHERE id = $1 AND user_id = $2")
            .bind(id)
            .bind(owner)
            .execute(&self.db)
            .await?;
        Ok(res.rows_affected() > 0)
    }
}
