use anyhow::Context;
use tracing::info;

use crate::{
    auth::password::hash_password,
    contacts::repo_types::ContactDraft,
    store::{ContactStore, Store, StoreError, UserStore},
};

pub const DEMO_EMAIL: &str = "admin@example.com";
pub const DEMO_PASSWORD: &str = "password123";

fn demo_contacts() -> [ContactDraft; 2] {
    [
        ContactDraft {
            name: "Juan Pérez".into(),
            email: "juan@example.com".into(),
            phone: "+1234567890".into(),
            address: "Calle Principal 123".into(),
        },
        ContactDraft {
            name: "María García".into(),
            email: "maria@example.com".into(),
            phone: "+0987654321".into(),
            address: "Avenida Central 456".into(),
        },
    ]
}

/// Creates the demo account and its sample contacts. Running it again leaves
/// existing rows alone.
pub async fn seed_demo(store: &dyn Store) -> anyhow::Result<()> {
    let user = match store.find_user_by_email(DEMO_EMAIL).await? {
        Some(u) => u,
        None => {
            let hash = tokio::task::spawn_blocking(|| hash_password(DEMO_PASSWORD))
                .await
                .context("hash demo password")??;
            store
                .insert_user(DEMO_EMAIL, &hash, "Administrador")
                .await
                .context("insert demo user")?
        }
    };

    for draft in demo_contacts() {
        match store.insert_contact(user.id, &draft).await {
            Ok(c) => info!(contact_id = %c.id, "seeded contact"),
            Err(StoreError::Duplicate(_)) => {}
            Err(e) => return Err(e).context("insert demo contact"),
        }
    }
    info!(email = DEMO_EMAIL, "seed completed");
    Ok(())
}
