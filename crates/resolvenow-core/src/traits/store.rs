// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Persistence collaborator for users, complaints and threads.
//!
//! Every mutating method is a single atomic unit at the storage layer.
//! Conditional updates return `Ok(None)` when the filter matched no row;
//! the caller re-reads to tell "missing" from "not yours".

use async_trait::async_trait;

use crate::error::ResolveError;
use crate::traits::adapter::PluginAdapter;
use crate::types::{
    Complaint, ComplaintFilter, ComplaintStatus, Feedback, Message, Page, PageRequest,
    ProfileUpdate, Role, StatsScope, StatusCounts, ThreadEntry, User, UserFilter,
};

#[async_trait]
pub trait ComplaintStore: PluginAdapter {
    // --- Users ---

    /// Insert a user. Returns `false` when the email is already taken.
    async fn insert_user(&self, user: &User) -> Result<bool, ResolveError>;

    async fn get_user(&self, id: &str) -> Result<Option<User>, ResolveError>;

    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>, ResolveError>;

    async fn list_users(
        &self,
        filter: &UserFilter,
        page: PageRequest,
    ) -> Result<Page<User>, ResolveError>;

    /// Active users holding the `agent` role, by name.
    async fn list_active_agents(&self) -> Result<Vec<User>, ResolveError>;

    async fn count_users(&self, role: Role) -> Result<u64, ResolveError>;

    async fn update_profile(
        &self,
        id: &str,
        update: &ProfileUpdate,
    ) -> Result<Option<User>, ResolveError>;

    async fn set_role(&self, id: &str, role: Role) -> Result<Option<User>, ResolveError>;

    async fn set_active(&self, id: &str, active: bool) -> Result<Option<User>, ResolveError>;

    async fn record_login(&self, id: &str, at: &str) -> Result<(), ResolveError>;

    // --- Complaints ---

    async fn insert_complaint(&self, complaint: &Complaint) -> Result<(), ResolveError>;

    async fn get_complaint(&self, id: &str) -> Result<Option<Complaint>, ResolveError>;

    /// Newest first.
    async fn list_complaints(
        &self,
        filter: &ComplaintFilter,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ResolveError>;

    /// Set the assignee and force `in-progress`.
    async fn assign(
        &self,
        id: &str,
        agent_id: &str,
        at: &str,
    ) -> Result<Option<Complaint>, ResolveError>;

    /// Set `status` where id and assignee match (and, when `allowed_from`
    /// is non-empty, the current status is one of them). Stamps
    /// resolved/closed times only if unset, and appends `system_message`
    /// in the same transaction.
    async fn transition(
        &self,
        id: &str,
        agent_id: &str,
        status: ComplaintStatus,
        allowed_from: &[ComplaintStatus],
        system_message: &Message,
    ) -> Result<Option<Complaint>, ResolveError>;

    /// Record a resolution and force `resolved`, same guards as [`transition`].
    ///
    /// [`transition`]: ComplaintStore::transition
    async fn resolve(
        &self,
        id: &str,
        agent_id: &str,
        resolution: &str,
        allowed_from: &[ComplaintStatus],
        system_message: &Message,
    ) -> Result<Option<Complaint>, ResolveError>;

    /// Store feedback where id and owner match and the complaint is
    /// resolved or closed.
    async fn set_feedback(
        &self,
        id: &str,
        owner_id: &str,
        feedback: &Feedback,
    ) -> Result<Option<Complaint>, ResolveError>;

    // --- Threads ---

    async fn insert_message(&self, message: &Message) -> Result<(), ResolveError>;

    /// Whole thread in creation order.
    async fn list_thread(&self, complaint_id: &str) -> Result<Vec<ThreadEntry>, ResolveError>;

    async fn get_thread_entry(&self, message_id: &str)
    -> Result<Option<ThreadEntry>, ResolveError>;

    /// Mark messages not sent by `reader_id` as read. Returns rows changed.
    async fn mark_read(
        &self,
        complaint_id: &str,
        reader_id: &str,
        at: &str,
    ) -> Result<u64, ResolveError>;

    // --- Aggregation ---

    async fn count_by_status(&self, scope: &StatsScope) -> Result<StatusCounts, ResolveError>;
}
