// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! In-memory fixture shared by the unit tests.

use std::sync::Arc;

use resolvenow_config::ResolveNowConfig;
use resolvenow_core::types::{Complaint, User, new_id, timestamp_now};
use resolvenow_core::{ComplaintStore, Principal, Role};
use resolvenow_realtime::{ChannelRegistry, Registration};
use resolvenow_storage::{Database, SqliteStore};

use crate::Desk;
use crate::validation::ComplaintDraft;

pub(crate) const SECRET: &str = "service-test-secret-at-least-32-bytes";

pub(crate) struct Fixture {
    pub store: Arc<SqliteStore>,
    pub registry: Arc<ChannelRegistry>,
    pub desk: Desk,
    pub admin: Principal,
    pub agent: Principal,
    pub user: Principal,
}

pub(crate) fn config() -> ResolveNowConfig {
    let mut config = ResolveNowConfig::default();
    config.auth.jwt_secret = SECRET.to_string();
    config
}

impl Fixture {
    pub async fn new() -> Self {
        Self::with_config(config()).await
    }

    pub async fn with_config(config: ResolveNowConfig) -> Self {
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let registry = Arc::new(ChannelRegistry::new(32));
        let desk = Desk::new(store.clone(), registry.clone(), &config);
        let admin = seed(&store, "Admin", Role::Admin).await;
        let agent = seed(&store, "Agent", Role::Agent).await;
        let user = seed(&store, "User", Role::User).await;
        Self {
            store,
            registry,
            desk,
            admin,
            agent,
            user,
        }
    }

    pub async fn add(&self, name: &str, role: Role) -> Principal {
        seed(&self.store, name, role).await
    }

    /// A valid complaint filed by `owner`.
    pub async fn file(&self, owner: &Principal, title: &str) -> Complaint {
        let draft = ComplaintDraft {
            title: title.to_string(),
            description: "Something went wrong with my order.".to_string(),
            category: "Product Quality".to_string(),
            ..Default::default()
        };
        self.desk.lifecycle.create(owner, &draft).await.unwrap()
    }

    /// A complaint filed by the seeded user and assigned to the seeded agent.
    pub async fn assigned(&self) -> Complaint {
        let c = self.file(&self.user, "Broken item").await;
        self.desk
            .lifecycle
            .assign(&c.id, &self.agent.user_id, &self.admin)
            .await
            .unwrap()
    }

    /// Open a socket for `principal` and join it to `complaint_id`.
    pub fn subscribe(&self, principal: &Principal, complaint_id: Option<&str>) -> Registration {
        let registration = self.registry.register(&principal.user_id);
        if let Some(id) = complaint_id {
            assert!(self.registry.join(&registration.connection_id, id));
        }
        registration
    }
}

/// Insert a user directly, skipping password hashing.
pub(crate) async fn seed(store: &SqliteStore, name: &str, role: Role) -> Principal {
    let now = timestamp_now();
    let id = new_id();
    let user = User {
        email: format!("{}-{}@example.com", name.to_lowercase(), &id[..8]),
        id,
        name: name.to_string(),
        password_hash: "unused".to_string(),
        role,
        is_active: true,
        phone: None,
        address: None,
        last_login: None,
        created_at: now.clone(),
        updated_at: now,
    };
    assert!(store.insert_user(&user).await.unwrap());
    Principal::from_user(&user)
}

/// Next queued frame, parsed.
pub(crate) fn next_frame(registration: &mut Registration) -> Option<serde_json::Value> {
    registration
        .outbound
        .try_recv()
        .ok()
        .map(|frame| serde_json::from_str(&frame).unwrap())
}
