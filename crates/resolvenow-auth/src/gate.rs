// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authorization gate: bearer credential to principal, and role checks.

use std::sync::Arc;

use resolvenow_core::types::User;
use resolvenow_core::{ComplaintStore, Principal, ResolveError, Role};
use tracing::debug;

use crate::token::TokenIssuer;

/// Resolves credentials against the user store on every request, so
/// role changes and deactivation take effect immediately.
pub struct AuthGate {
    store: Arc<dyn ComplaintStore>,
    tokens: TokenIssuer,
}

impl AuthGate {
    pub fn new(store: Arc<dyn ComplaintStore>, tokens: TokenIssuer) -> Self {
        Self { store, tokens }
    }

    /// Sign a fresh token for `user`.
    pub fn issue_for(&self, user: &User) -> Result<String, ResolveError> {
        self.tokens.issue(&user.id, user.role)
    }

    /// Validate `credential` and load the user it names.
    pub async fn authenticate(&self, credential: Option<&str>) -> Result<Principal, ResolveError> {
        let token = credential
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| ResolveError::Unauthenticated("no token provided".to_string()))?;
        let claims = self.tokens.verify(token)?;

        let user = self
            .store
            .get_user(&claims.sub)
            .await?
            .ok_or_else(|| ResolveError::Unauthenticated("user no longer exists".to_string()))?;
        if !user.is_active {
            debug!(user_id = %user.id, "token presented for deactivated account");
            return Err(ResolveError::Unauthenticated(
                "account is deactivated".to_string(),
            ));
        }
        Ok(Principal::from_user(&user))
    }

    /// Exact role match, no hierarchy.
    pub fn authorize(principal: &Principal, required: Role) -> Result<(), ResolveError> {
        if principal.has_role(required) {
            Ok(())
        } else {
            debug!(
                user_id = %principal.user_id,
                role = %principal.role,
                required = %required,
                "role check failed"
            );
            Err(ResolveError::Forbidden(format!("{required} role required")))
        }
    }
}

/// Token part of an `Authorization: Bearer <token>` header value.
pub fn bearer_token(header: &str) -> Option<&str> {
    let (scheme, token) = header.trim().split_once(' ')?;
    if scheme.eq_ignore_ascii_case("bearer") {
        Some(token.trim()).filter(|t| !t.is_empty())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolvenow_core::types::{new_id, timestamp_now};
    use resolvenow_storage::{Database, SqliteStore};
    use secrecy::SecretString;

    const SECRET: &str = "gate-test-secret-long-enough-for-hs256";

    fn user(role: Role, active: bool) -> User {
        let now = timestamp_now();
        let id = new_id();
        User {
            email: format!("{id}@example.com"),
            id,
            name: "Tester".into(),
            password_hash: "x".into(),
            role,
            is_active: active,
            phone: None,
            address: None,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        }
    }

    async fn gate() -> (AuthGate, Arc<SqliteStore>) {
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let tokens = TokenIssuer::new(SecretString::from(SECRET.to_string()), 1);
        (AuthGate::new(store.clone(), tokens), store)
    }

    #[tokio::test]
    async fn valid_token_resolves_principal() {
        let (gate, store) = gate().await;
        let agent = user(Role::Agent, true);
        store.insert_user(&agent).await.unwrap();

        let token = gate.issue_for(&agent).unwrap();
        let principal = gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(principal.user_id, agent.id);
        assert_eq!(principal.role, Role::Agent);
    }

    #[tokio::test]
    async fn missing_token_is_unauthenticated() {
        let (gate, _store) = gate().await;
        for credential in [None, Some(""), Some("   ")] {
            let err = gate.authenticate(credential).await.unwrap_err();
            assert!(matches!(err, ResolveError::Unauthenticated(_)));
        }
    }

    #[tokio::test]
    async fn unknown_or_inactive_user_is_unauthenticated() {
        let (gate, store) = gate().await;
        let ghost = user(Role::User, true);
        let token = gate.issue_for(&ghost).unwrap();
        assert!(matches!(
            gate.authenticate(Some(&token)).await,
            Err(ResolveError::Unauthenticated(_))
        ));

        let dormant = user(Role::User, false);
        store.insert_user(&dormant).await.unwrap();
        let token = gate.issue_for(&dormant).unwrap();
        assert!(matches!(
            gate.authenticate(Some(&token)).await,
            Err(ResolveError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn role_is_read_from_store_not_token() {
        let (gate, store) = gate().await;
        let u = user(Role::User, true);
        store.insert_user(&u).await.unwrap();
        let token = gate.issue_for(&u).unwrap();
        store.set_role(&u.id, Role::Admin).await.unwrap();

        let principal = gate.authenticate(Some(&token)).await.unwrap();
        assert_eq!(principal.role, Role::Admin);
    }

    #[test]
    fn authorize_is_exact_match() {
        let admin = Principal {
            user_id: "a".into(),
            name: "Admin".into(),
            role: Role::Admin,
        };
        assert!(AuthGate::authorize(&admin, Role::Admin).is_ok());
        assert!(matches!(
            AuthGate::authorize(&admin, Role::Agent),
            Err(ResolveError::Forbidden(_))
        ));
    }

    #[test]
    fn bearer_header_parsing() {
        assert_eq!(bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(bearer_token("bearer   xyz "), Some("xyz"));
        assert_eq!(bearer_token("Basic abc"), None);
        assert_eq!(bearer_token("Bearer"), None);
        assert_eq!(bearer_token("Bearer  "), None);
    }
}
