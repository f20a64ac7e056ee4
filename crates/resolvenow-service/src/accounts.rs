// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Registration, login, profiles, and admin account management.

use std::sync::Arc;

use resolvenow_auth::{AuthGate, UNMATCHED_PASSWORD_HASH, hash_password, verify_password};
use resolvenow_core::types::{Page, User, new_id, timestamp_now};
use resolvenow_core::{ComplaintStore, Principal, ResolveError, Role};
use tracing::{info, warn};

use crate::validation::{self, LoginDraft, ProfileDraft, RegistrationDraft, UserQuery};

/// Default page size for the admin user listing.
pub const USER_PAGE_LIMIT: u32 = 20;

/// A freshly signed token and the account it belongs to.
#[derive(Debug, Clone)]
pub struct Session {
    pub token: String,
    pub user: User,
}

pub struct AccountManager {
    store: Arc<dyn ComplaintStore>,
    gate: Arc<AuthGate>,
}

/// Argon2 runs on the blocking pool.
async fn hash_blocking(password: String) -> Result<String, ResolveError> {
    tokio::task::spawn_blocking(move || hash_password(&password))
        .await
        .map_err(|e| ResolveError::Internal(format!("password hashing task failed: {e}")))?
}

async fn verify_blocking(password: String, phc: String) -> Result<bool, ResolveError> {
    tokio::task::spawn_blocking(move || verify_password(&password, &phc))
        .await
        .map_err(|e| ResolveError::Internal(format!("password check task failed: {e}")))
}

fn user_not_found() -> ResolveError {
    ResolveError::not_found("user")
}

impl AccountManager {
    pub fn new(store: Arc<dyn ComplaintStore>, gate: Arc<AuthGate>) -> Self {
        Self { store, gate }
    }

    async fn insert_account(
        &self,
        draft: &RegistrationDraft,
        role: Role,
    ) -> Result<User, ResolveError> {
        let valid = draft.validate()?;
        let password_hash = hash_blocking(valid.password).await?;
        let now = timestamp_now();
        let user = User {
            id: new_id(),
            name: valid.name,
            email: valid.email,
            password_hash,
            role,
            is_active: true,
            phone: None,
            address: None,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        };
        if !self.store.insert_user(&user).await? {
            return Err(ResolveError::Conflict(
                "A user with this email already exists".to_string(),
            ));
        }
        info!(user_id = %user.id, role = %role, "account created");
        Ok(user)
    }

    /// Open a `user` account and sign a token for it.
    pub async fn register(&self, draft: &RegistrationDraft) -> Result<Session, ResolveError> {
        let user = self.insert_account(draft, Role::User).await?;
        let token = self.gate.issue_for(&user)?;
        Ok(Session { token, user })
    }

    /// Seed an `admin` account. Used by the command line, never over HTTP.
    pub async fn create_admin(&self, draft: &RegistrationDraft) -> Result<User, ResolveError> {
        self.insert_account(draft, Role::Admin).await
    }

    /// Check credentials, stamp `lastLogin`, and sign a token.
    pub async fn login(&self, draft: &LoginDraft) -> Result<Session, ResolveError> {
        let email = draft.validate()?;
        let invalid = || ResolveError::Unauthenticated("Invalid email or password".to_string());

        let Some(mut user) = self.store.get_user_by_email(&email).await? else {
            // Pay the same Argon2 cost as a real mismatch.
            let _ = verify_blocking(draft.password.clone(), UNMATCHED_PASSWORD_HASH.to_string())
                .await?;
            return Err(invalid());
        };
        if !verify_blocking(draft.password.clone(), user.password_hash.clone()).await? {
            warn!(user_id = %user.id, "login with wrong password");
            return Err(invalid());
        }
        if !user.is_active {
            return Err(ResolveError::Forbidden(
                "Your account is deactivated. Please contact support.".to_string(),
            ));
        }

        let now = timestamp_now();
        self.store.record_login(&user.id, &now).await?;
        user.last_login = Some(now);
        let token = self.gate.issue_for(&user)?;
        info!(user_id = %user.id, "login");
        Ok(Session { token, user })
    }

    pub async fn profile(&self, principal: &Principal) -> Result<User, ResolveError> {
        self.store
            .get_user(&principal.user_id)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn update_profile(
        &self,
        principal: &Principal,
        draft: &ProfileDraft,
    ) -> Result<User, ResolveError> {
        let update = draft.validate()?;
        self.store
            .update_profile(&principal.user_id, &update)
            .await?
            .ok_or_else(user_not_found)
    }

    pub async fn list_users(&self, query: &UserQuery) -> Result<Page<User>, ResolveError> {
        let filter = query.filter()?;
        self.store
            .list_users(&filter, query.page(USER_PAGE_LIMIT))
            .await
    }

    pub async fn set_role(&self, user_id: &str, raw_role: &str) -> Result<User, ResolveError> {
        let role = validation::parse_role(raw_role)?;
        let user = self
            .store
            .set_role(user_id, role)
            .await?
            .ok_or_else(user_not_found)?;
        info!(user_id, role = %role, "role changed");
        Ok(user)
    }

    pub async fn set_active(&self, user_id: &str, active: bool) -> Result<User, ResolveError> {
        let user = self
            .store
            .set_active(user_id, active)
            .await?
            .ok_or_else(user_not_found)?;
        info!(user_id, active, "account status changed");
        Ok(user)
    }

    /// Active agents, for the assignment picker.
    pub async fn agents(&self) -> Result<Vec<User>, ResolveError> {
        self.store.list_active_agents().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixture;

    fn registration(email: &str) -> RegistrationDraft {
        RegistrationDraft {
            name: "Grace Hopper".into(),
            email: email.into(),
            password: "cobol-forever".into(),
        }
    }

    fn login(email: &str, password: &str) -> LoginDraft {
        LoginDraft {
            email: email.into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn register_then_login() {
        let fx = Fixture::new().await;
        let accounts = &fx.desk.accounts;

        let session = accounts
            .register(&registration("Grace@Example.com"))
            .await
            .unwrap();
        assert_eq!(session.user.role, Role::User);
        assert_eq!(session.user.email, "grace@example.com");
        let principal = fx.desk.gate.authenticate(Some(&session.token)).await.unwrap();
        assert_eq!(principal.user_id, session.user.id);

        let err = accounts
            .register(&registration("grace@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ResolveError::Conflict(_)));

        let logged_in = accounts
            .login(&login(" GRACE@example.com", "cobol-forever"))
            .await
            .unwrap();
        assert!(logged_in.user.last_login.is_some());
        let stored = fx.store.get_user(&session.user.id).await.unwrap().unwrap();
        assert_eq!(stored.last_login, logged_in.user.last_login);
    }

    #[tokio::test]
    async fn unknown_email_reads_like_wrong_password() {
        let fx = Fixture::new().await;
        let accounts = &fx.desk.accounts;
        accounts
            .register(&registration("grace@example.com"))
            .await
            .unwrap();

        let unknown = accounts
            .login(&login("nobody@example.com", "cobol-forever"))
            .await
            .unwrap_err();
        let wrong = accounts
            .login(&login("grace@example.com", "not-cobol"))
            .await
            .unwrap_err();
        assert_eq!(unknown.to_string(), wrong.to_string());
        assert!(matches!(
            unknown,
            ResolveError::Unauthenticated(ref m) if m == "Invalid email or password"
        ));
    }

    #[tokio::test]
    async fn login_failures() {
        let fx = Fixture::new().await;
        let accounts = &fx.desk.accounts;
        let session = accounts
            .register(&registration("grace@example.com"))
            .await
            .unwrap();

        for (email, password) in [
            ("grace@example.com", "wrong-password"),
            ("nobody@example.com", "cobol-forever"),
        ] {
            assert!(matches!(
                accounts.login(&login(email, password)).await,
                Err(ResolveError::Unauthenticated(_))
            ));
        }
        assert!(matches!(
            accounts.login(&login("not-an-email", "")).await,
            Err(ResolveError::Validation { .. })
        ));

        accounts.set_active(&session.user.id, false).await.unwrap();
        assert!(matches!(
            accounts
                .login(&login("grace@example.com", "cobol-forever"))
                .await,
            Err(ResolveError::Forbidden(_))
        ));
    }

    #[tokio::test]
    async fn profile_update_and_admin_management() {
        let fx = Fixture::new().await;
        let accounts = &fx.desk.accounts;

        let updated = accounts
            .update_profile(
                &fx.user,
                &ProfileDraft {
                    name: Some("Renamed".into()),
                    phone: Some("555-123-4567".into()),
                    address: None,
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Renamed");
        assert_eq!(updated.phone.as_deref(), Some("555-123-4567"));
        assert_eq!(accounts.profile(&fx.user).await.unwrap().name, "Renamed");

        let promoted = accounts.set_role(&fx.user.user_id, "agent").await.unwrap();
        assert_eq!(promoted.role, Role::Agent);
        assert!(matches!(
            accounts.set_role(&fx.user.user_id, "owner").await,
            Err(ResolveError::Validation { .. })
        ));
        assert!(matches!(
            accounts.set_role("ghost", "agent").await,
            Err(ResolveError::NotFound { .. })
        ));

        let agents = accounts.agents().await.unwrap();
        assert_eq!(agents.len(), 2);
        accounts.set_active(&fx.agent.user_id, false).await.unwrap();
        assert_eq!(accounts.agents().await.unwrap().len(), 1);

        let query = UserQuery {
            role: Some("agent".into()),
            is_active: Some(true),
            ..Default::default()
        };
        let page = accounts.list_users(&query).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].id, fx.user.user_id);
    }

    #[tokio::test]
    async fn create_admin_seeds_admin_role() {
        let fx = Fixture::new().await;
        let admin = fx
            .desk
            .accounts
            .create_admin(&registration("root@example.com"))
            .await
            .unwrap();
        assert_eq!(admin.role, Role::Admin);
        assert!(admin.is_active);
    }
}
