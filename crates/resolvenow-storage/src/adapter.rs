// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite implementation of [`ComplaintStore`].

use async_trait::async_trait;
use tokio::sync::OnceCell;
use tracing::debug;

use resolvenow_config::model::StorageConfig;
use resolvenow_core::types::{
    Complaint, ComplaintFilter, ComplaintStatus, Feedback, HealthStatus, Message, Page,
    PageRequest, ProfileUpdate, Role, StatsScope, StatusCounts, ThreadEntry, User, UserFilter,
};
use resolvenow_core::{ComplaintStore, PluginAdapter, ResolveError};

use crate::database::{Database, map_tr_err};
use crate::queries;

/// SQLite-backed complaint store.
///
/// The database is opened lazily by [`SqliteStore::initialize`]; every
/// other call fails until then.
pub struct SqliteStore {
    config: StorageConfig,
    db: OnceCell<Database>,
}

impl SqliteStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            db: OnceCell::new(),
        }
    }

    /// Construct and initialize in one step.
    pub async fn open(config: StorageConfig) -> Result<Self, ResolveError> {
        let store = Self::new(config);
        store.initialize().await?;
        Ok(store)
    }

    /// Wrap an already opened database (e.g. in-memory for tests).
    pub fn with_database(db: Database) -> Self {
        Self {
            config: StorageConfig {
                database_path: ":memory:".to_string(),
                wal_mode: false,
            },
            db: OnceCell::from(db),
        }
    }

    /// Open the database at the configured path and run migrations.
    pub async fn initialize(&self) -> Result<(), ResolveError> {
        let db = Database::open(&self.config.database_path, self.config.wal_mode).await?;
        self.db
            .set(db)
            .map_err(|_| ResolveError::storage(std::io::Error::other("store already initialized")))?;
        debug!(path = %self.config.database_path, "SQLite store initialized");
        Ok(())
    }

    fn db(&self) -> Result<&Database, ResolveError> {
        self.db.get().ok_or_else(|| {
            ResolveError::storage(std::io::Error::other(
                "store not initialized; call initialize() first",
            ))
        })
    }

    async fn checkpoint(&self) -> Result<(), ResolveError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<(), rusqlite::Error> {
                conn.query_row("PRAGMA wal_checkpoint(TRUNCATE)", [], |_| Ok(()))?;
                Ok(())
            })
            .await
            .map_err(map_tr_err)
    }
}

#[async_trait]
impl PluginAdapter for SqliteStore {
    fn name(&self) -> &str {
        "sqlite"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ResolveError> {
        self.db()?
            .connection()
            .call(|conn| -> Result<i64, rusqlite::Error> {
                conn.query_row("SELECT 1", [], |row| row.get(0))
            })
            .await
            .map_err(map_tr_err)?;
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ResolveError> {
        if self.db.get().is_some() && self.config.wal_mode {
            self.checkpoint().await?;
            debug!("shutdown: WAL checkpoint complete");
        }
        Ok(())
    }
}

#[async_trait]
impl ComplaintStore for SqliteStore {
    // --- Users ---

    async fn insert_user(&self, user: &User) -> Result<bool, ResolveError> {
        queries::users::insert_user(self.db()?, user).await
    }

    async fn get_user(&self, id: &str) -> Result<Option<User>, ResolveError> {
        queries::users::get_user(self.db()?, id).await
    }

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ResolveError> {
        queries::users::get_user_by_email(self.db()?, email).await
    }

    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, ResolveError> {
        queries::users::list_users(self.db()?, filter, page).await
    }

    async fn list_active_agents(&self) -> Result<Vec<User>, ResolveError> {
        queries::users::list_active_agents(self.db()?).await
    }

    async fn count_users(&self, role: Role) -> Result<u64, ResolveError> {
        queries::users::count_users(self.db()?, role).await
    }

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, ResolveError> {
        queries::users::update_profile(self.db()?, id, update).await
    }

    async fn set_role(&self, id: &str, role: Role) -> Result<Option<User>, ResolveError> {
        queries::users::set_role(self.db()?, id, role).await
    }

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<User>, ResolveError> {
        queries::users::set_active(self.db()?, id, active).await
    }

    async fn record_login(&self, id: &str, at: &str) -> Result<(), ResolveError> {
        queries::users::record_login(self.db()?, id, at).await
    }

    // --- Complaints ---

    async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), ResolveError> {
        queries::complaints::insert_complaint(self.db()?, complaint).await
    }

    async fn get_complaint(&self, id: &str) -> Result<Option<Complaint>, ResolveError> {
        queries::complaints::get_complaint(self.db()?, id).await
    }

    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ResolveError> {
        queries::complaints::list_complaints(self.db()?, filter, page).await
    }

    async fn assign(
        &self,
        id: &str,
        agent_id: &str,
        at: &str,
    ) -> Result<Option<Complaint>, ResolveError> {
        queries::complaints::assign(self.db()?, id, agent_id, at).await
    }

    async fn transition(
        &self,
        id: &str,
        agent_id: &str,
        status: ComplaintStatus,
        allowed_from: &[ComplaintStatus],
        system_message: &Message,
    ) -> Result<Option<Complaint>, ResolveError> {
        queries::complaints::transition(self.db()?, id, agent_id, status, allowed_from, system_message)
            .await
    }

    async fn resolve(
        &self,
        id: &str,
        agent_id: &str,
        resolution: &str,
        allowed_from: &[ComplaintStatus],
        system_message: &Message,
    ) -> Result<Option<Complaint>, ResolveError> {
        queries::complaints::resolve(
            self.db()?,
            id,
            agent_id,
            resolution,
            allowed_from,
            system_message,
        )
        .await
    }

    async fn set_feedback(
        &self,
        id: &str,
        owner_id: &str,
        feedback: &Feedback,
    ) -> Result<Option<Complaint>, ResolveError> {
        queries::complaints::set_feedback(self.db()?, id, owner_id, feedback).await
    }

    // --- Threads ---

    async fn insert_message(&self, message: &Message) -> Result<(), ResolveError> {
        queries::messages::insert_message(self.db()?, message).await
    }

    async fn list_thread(&self, complaint_id: &str) -> Result<Vec<ThreadEntry>, ResolveError> {
        queries::messages::list_thread(self.db()?, complaint_id).await
    }

    async fn get_thread_entry(
        &self,
        message_id: &str,
    ) -> Result<Option<ThreadEntry>, ResolveError> {
        queries::messages::get_thread_entry(self.db()?, message_id).await
    }

    async fn mark_read(
        &self,
        complaint_id: &str,
        reader_id: &str,
        at: &str,
    ) -> Result<u64, ResolveError> {
        queries::messages::mark_read(self.db()?, complaint_id, reader_id, at).await
    }

    // --- Aggregation ---

    async fn count_by_status(&self, scope: &StatsScope) -> Result<StatusCounts, ResolveError> {
        queries::stats::count_by_status(self.db()?, scope).await
    }
}
