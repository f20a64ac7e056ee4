// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test harness for end-to-end integration testing.
//!
//! Every harness owns its own database file in a temp directory, so tests
//! are independent and order-insensitive.

use std::sync::Arc;

use axum::Router;
use resolvenow_config::ResolveNowConfig;
use resolvenow_config::model::StorageConfig;
use resolvenow_core::types::{Complaint, User};
use resolvenow_core::{Principal, ResolveError, Role};
use resolvenow_gateway::{GatewayState, HealthState, build_router};
use resolvenow_realtime::ChannelRegistry;
use resolvenow_service::Desk;
use resolvenow_service::validation::{ComplaintDraft, RegistrationDraft};
use resolvenow_storage::SqliteStore;

/// Password given to every seeded account.
pub const PASSWORD: &str = "correct-horse-42";

const SECRET: &str = "harness-signing-secret-0123456789abcdef";

/// A seeded account with a ready-to-use bearer token.
#[derive(Debug, Clone)]
pub struct Account {
    pub principal: Principal,
    pub email: String,
    pub token: String,
}

impl Account {
    pub fn id(&self) -> &str {
        &self.principal.user_id
    }

    /// `Authorization` header value.
    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

/// Builder for creating test environments with configurable options.
pub struct TestHarnessBuilder {
    forward_only: bool,
    outbound_buffer: usize,
    prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl TestHarnessBuilder {
    fn new() -> Self {
        Self {
            forward_only: false,
            outbound_buffer: 32,
            prometheus_render: None,
        }
    }

    /// Reject backwards status moves.
    pub fn with_forward_transitions(mut self) -> Self {
        self.forward_only = true;
        self
    }

    /// Per-connection realtime queue depth.
    pub fn with_outbound_buffer(mut self, buffer: usize) -> Self {
        self.outbound_buffer = buffer;
        self
    }

    /// Serve `/metrics` with the given renderer.
    pub fn with_metrics(mut self, render: Arc<dyn Fn() -> String + Send + Sync>) -> Self {
        self.prometheus_render = Some(render);
        self
    }

    /// Build the harness: open the store, wire the desk, seed accounts.
    pub async fn build(self) -> Result<TestHarness, ResolveError> {
        let temp_dir = tempfile::TempDir::new().map_err(ResolveError::storage)?;
        let db_path = temp_dir.path().join("test.db");

        let mut config = ResolveNowConfig::default();
        config.storage = StorageConfig {
            database_path: db_path.to_string_lossy().to_string(),
            wal_mode: true,
        };
        config.auth.jwt_secret = SECRET.to_string();
        config.lifecycle.enforce_forward_transitions = self.forward_only;
        config.realtime.outbound_buffer = self.outbound_buffer;

        let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
        let registry = Arc::new(ChannelRegistry::new(config.realtime.outbound_buffer));
        let desk = Arc::new(Desk::new(store.clone(), registry.clone(), &config));

        let admin = desk
            .accounts
            .create_admin(&registration("Ada Admin", "admin@example.com"))
            .await?;
        let admin = session_for(&desk, admin)?;

        let agent = desk
            .accounts
            .register(&registration("Alan Agent", "agent@example.com"))
            .await?;
        let agent = desk.accounts.set_role(&agent.user.id, "agent").await?;
        let agent = session_for(&desk, agent)?;

        let user = desk
            .accounts
            .register(&registration("Grace User", "user@example.com"))
            .await?;
        let user = session_for(&desk, user.user)?;

        tracing::debug!(path = %config.storage.database_path, "test harness ready");

        Ok(TestHarness {
            state: GatewayState {
                desk: desk.clone(),
                store: store.clone(),
                registry: registry.clone(),
                health: HealthState {
                    prometheus_render: self.prometheus_render,
                    ..HealthState::default()
                },
            },
            config,
            store,
            registry,
            desk,
            admin,
            agent,
            user,
            _temp_dir: temp_dir,
        })
    }
}

fn registration(name: &str, email: &str) -> RegistrationDraft {
    RegistrationDraft {
        name: name.to_string(),
        email: email.to_string(),
        password: PASSWORD.to_string(),
    }
}

fn session_for(desk: &Desk, user: User) -> Result<Account, ResolveError> {
    Ok(Account {
        token: desk.gate.issue_for(&user)?,
        email: user.email.clone(),
        principal: Principal::from_user(&user),
    })
}

/// A complete test environment backed by a temp database.
pub struct TestHarness {
    pub config: ResolveNowConfig,
    pub store: Arc<SqliteStore>,
    pub registry: Arc<ChannelRegistry>,
    pub desk: Arc<Desk>,
    pub admin: Account,
    pub agent: Account,
    pub user: Account,
    state: GatewayState,
    /// Temp directory kept alive for cleanup on drop.
    _temp_dir: tempfile::TempDir,
}

impl TestHarness {
    pub fn builder() -> TestHarnessBuilder {
        TestHarnessBuilder::new()
    }

    /// Gateway state sharing this harness's store and registry.
    pub fn state(&self) -> GatewayState {
        self.state.clone()
    }

    /// The full application router.
    pub fn router(&self) -> Router {
        build_router(self.state(), &self.config.server.cors_origins)
    }

    /// Register another account and give it `role`.
    pub async fn add_account(&self, name: &str, role: Role) -> Result<Account, ResolveError> {
        let email = format!("{}@example.com", name.to_lowercase().replace(' ', "."));
        let session = self
            .desk
            .accounts
            .register(&registration(name, &email))
            .await?;
        let user = match role {
            Role::User => session.user,
            other => {
                self.desk
                    .accounts
                    .set_role(&session.user.id, &other.to_string())
                    .await?
            }
        };
        session_for(&self.desk, user)
    }

    /// File a valid complaint as `owner`.
    pub async fn file_complaint(
        &self,
        owner: &Account,
        title: &str,
    ) -> Result<Complaint, ResolveError> {
        let draft = ComplaintDraft {
            title: title.to_string(),
            description: "The product stopped working after two days.".to_string(),
            category: "Product Quality".to_string(),
            ..Default::default()
        };
        self.desk.lifecycle.create(&owner.principal, &draft).await
    }

    /// A complaint filed by the seeded user and assigned to the seeded agent.
    pub async fn assigned_complaint(&self, title: &str) -> Result<Complaint, ResolveError> {
        let complaint = self.file_complaint(&self.user, title).await?;
        self.desk
            .lifecycle
            .assign(&complaint.id, self.agent.id(), &self.admin.principal)
            .await
    }
}
