// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `resolvenow create-admin` command implementation.
//!
//! Admin accounts cannot be registered over HTTP; this is the only way to
//! seed one.

use std::sync::Arc;

use resolvenow_auth::{AuthGate, TokenIssuer};
use resolvenow_config::ResolveNowConfig;
use resolvenow_core::types::User;
use resolvenow_core::{ComplaintStore, PluginAdapter, ResolveError};
use resolvenow_service::AccountManager;
use resolvenow_service::validation::RegistrationDraft;
use resolvenow_storage::SqliteStore;

pub async fn run_create_admin(
    config: &ResolveNowConfig,
    name: String,
    email: String,
    password: String,
) -> Result<(), ResolveError> {
    crate::serve::ensure_parent_dir(&config.storage.database_path)?;
    let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
    let draft = RegistrationDraft {
        name,
        email,
        password,
    };
    let created = create_admin(store.clone(), config, &draft).await;
    store.shutdown().await?;
    let user = created?;
    println!("created admin {} <{}> (id {})", user.name, user.email, user.id);
    Ok(())
}

async fn create_admin(
    store: Arc<dyn ComplaintStore>,
    config: &ResolveNowConfig,
    draft: &RegistrationDraft,
) -> Result<User, ResolveError> {
    let gate = Arc::new(AuthGate::new(
        store.clone(),
        TokenIssuer::from_config(&config.auth),
    ));
    AccountManager::new(store, gate).create_admin(draft).await
}

#[cfg(test)]
mod tests {
    use resolvenow_core::Role;
    use resolvenow_storage::Database;

    use super::*;

    fn config() -> ResolveNowConfig {
        let mut config = ResolveNowConfig::default();
        config.auth.jwt_secret = "create-admin-test-secret-0123456789".to_string();
        config
    }

    #[tokio::test]
    async fn creates_active_admin() {
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let draft = RegistrationDraft {
            name: "Root Admin".into(),
            email: "Root@Example.com".into(),
            password: "s3cret-pass".into(),
        };
        let user = create_admin(store.clone(), &config(), &draft).await.unwrap();
        assert_eq!(user.role, Role::Admin);
        assert!(user.is_active);
        assert_eq!(user.email, "root@example.com");
        assert_eq!(store.count_users(Role::Admin).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn duplicate_email_conflicts() {
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let draft = RegistrationDraft {
            name: "Root Admin".into(),
            email: "root@example.com".into(),
            password: "s3cret-pass".into(),
        };
        create_admin(store.clone(), &config(), &draft).await.unwrap();
        let err = create_admin(store, &config(), &draft).await.unwrap_err();
        assert!(matches!(err, ResolveError::Conflict(_)));
    }

    #[tokio::test]
    async fn weak_password_is_rejected() {
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let draft = RegistrationDraft {
            name: "Root Admin".into(),
            email: "root@example.com".into(),
            password: "123".into(),
        };
        let err = create_admin(store, &config(), &draft).await.unwrap_err();
        assert!(matches!(err, ResolveError::Validation { .. }));
    }
}
