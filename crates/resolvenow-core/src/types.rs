// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Domain types shared across the store, the managers, and the gateway.
//!
//! Timestamps are RFC 3339 strings with a fixed microsecond width so that
//! lexical order equals chronological order inside SQLite.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Current UTC time as a fixed-width RFC 3339 string.
pub fn timestamp_now() -> String {
    chrono::Utc::now()
        .format("%Y-%m-%dT%H:%M:%S%.6fZ")
        .to_string()
}

/// Fresh random identifier for users, complaints and messages.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Health status reported by collaborator health checks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}

// --- Enumerations ---

/// Account role. Checked by exact match; there is no hierarchy.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Agent,
    Admin,
}

/// Complaint lifecycle status.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum ComplaintStatus {
    Pending,
    InProgress,
    Resolved,
    Closed,
}

impl ComplaintStatus {
    pub const ALL: [ComplaintStatus; 4] = [
        ComplaintStatus::Pending,
        ComplaintStatus::InProgress,
        ComplaintStatus::Resolved,
        ComplaintStatus::Closed,
    ];

    /// Position in the forward graph `pending → in-progress → resolved → closed`.
    pub fn rank(self) -> u8 {
        match self {
            ComplaintStatus::Pending => 0,
            ComplaintStatus::InProgress => 1,
            ComplaintStatus::Resolved => 2,
            ComplaintStatus::Closed => 3,
        }
    }

    /// Statuses from which `self` is reachable without moving backwards.
    pub fn forward_sources(self) -> Vec<ComplaintStatus> {
        Self::ALL
            .into_iter()
            .filter(|s| s.rank() <= self.rank())
            .collect()
    }

    /// Upper-case label used in system messages, e.g. `IN PROGRESS`.
    pub fn shout(self) -> String {
        self.to_string().replace('-', " ").to_uppercase()
    }
}

/// Complaint priority.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Display,
    EnumString,
    Serialize,
    Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    #[default]
    Medium,
    High,
    Urgent,
}

/// Fixed complaint category set.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
pub enum Category {
    #[strum(serialize = "Product Quality")]
    #[serde(rename = "Product Quality")]
    ProductQuality,
    #[strum(serialize = "Service Issue")]
    #[serde(rename = "Service Issue")]
    ServiceIssue,
    #[strum(serialize = "Billing Problem")]
    #[serde(rename = "Billing Problem")]
    BillingProblem,
    #[strum(serialize = "Delivery Issue")]
    #[serde(rename = "Delivery Issue")]
    DeliveryIssue,
    #[strum(serialize = "Technical Support")]
    #[serde(rename = "Technical Support")]
    TechnicalSupport,
    #[strum(serialize = "Other")]
    #[serde(rename = "Other")]
    Other,
}

impl Category {
    pub const ALL: [Category; 6] = [
        Category::ProductQuality,
        Category::ServiceIssue,
        Category::BillingProblem,
        Category::DeliveryIssue,
        Category::TechnicalSupport,
        Category::Other,
    ];
}

/// Origin of a thread entry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, Serialize, Deserialize,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// Authored by a user, agent or admin.
    Text,
    /// Generated by a lifecycle transition.
    System,
}

/// Display tag attached to thread entries and `new-message` events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display, Serialize, Deserialize)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum SenderTag {
    User,
    Agent,
}

impl SenderTag {
    /// Derived from the sender's role, not from who filed the complaint.
    pub fn for_role(role: Role) -> Self {
        match role {
            Role::User => SenderTag::User,
            Role::Agent | Role::Admin => SenderTag::Agent,
        }
    }
}

// --- Records ---

/// Embedded reference to a user, as returned alongside complaints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRef {
    pub id: String,
    pub name: String,
    pub email: String,
}

/// A stored account.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    /// Argon2id PHC string. Never serialized.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: Role,
    pub is_active: bool,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub last_login: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

impl User {
    pub fn summary(&self) -> UserRef {
        UserRef {
            id: self.id.clone(),
            name: self.name.clone(),
            email: self.email.clone(),
        }
    }
}

/// Authenticated caller, resolved by the authorization gate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub user_id: String,
    pub name: String,
    pub role: Role,
}

impl Principal {
    pub fn from_user(user: &User) -> Self {
        Self {
            user_id: user.id.clone(),
            name: user.name.clone(),
            role: user.role,
        }
    }

    pub fn has_role(&self, role: Role) -> bool {
        self.role == role
    }
}

/// Owner feedback on a finished complaint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Feedback {
    pub rating: u8,
    pub comment: Option<String>,
    pub submitted_at: String,
}

/// A complaint ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Complaint {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: Category,
    pub priority: Priority,
    pub status: ComplaintStatus,
    /// Creator. Immutable after insert.
    pub user: UserRef,
    pub assigned_agent: Option<UserRef>,
    pub contact_phone: Option<String>,
    pub address: Option<String>,
    pub resolution: Option<String>,
    pub feedback: Option<Feedback>,
    pub created_at: String,
    pub updated_at: String,
    /// Set once, on the first transition to `resolved`.
    pub resolved_at: Option<String>,
    /// Set once, on the first transition to `closed`.
    pub closed_at: Option<String>,
}

impl Complaint {
    pub fn is_owned_by(&self, user_id: &str) -> bool {
        self.user.id == user_id
    }

    pub fn is_assigned_to(&self, user_id: &str) -> bool {
        self.assigned_agent
            .as_ref()
            .is_some_and(|agent| agent.id == user_id)
    }
}

/// A thread message as stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub complaint_id: String,
    pub sender_id: String,
    pub content: String,
    pub message_type: MessageType,
    pub is_read: bool,
    pub read_at: Option<String>,
    pub created_at: String,
}

impl Message {
    fn build(
        complaint_id: &str,
        sender_id: &str,
        content: String,
        message_type: MessageType,
    ) -> Self {
        Self {
            id: new_id(),
            complaint_id: complaint_id.to_string(),
            sender_id: sender_id.to_string(),
            content,
            message_type,
            is_read: false,
            read_at: None,
            created_at: timestamp_now(),
        }
    }

    pub fn text(complaint_id: &str, sender_id: &str, content: impl Into<String>) -> Self {
        Self::build(complaint_id, sender_id, content.into(), MessageType::Text)
    }

    pub fn system(complaint_id: &str, sender_id: &str, content: impl Into<String>) -> Self {
        Self::build(complaint_id, sender_id, content.into(), MessageType::System)
    }
}

/// A thread message annotated for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadEntry {
    pub id: String,
    pub complaint_id: String,
    pub content: String,
    pub sender: SenderTag,
    pub sender_name: String,
    pub message_type: MessageType,
    pub is_read: bool,
    pub read_at: Option<String>,
    pub created_at: String,
}

// --- Queries ---

/// Requested page. `page` is 1-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u32,
    pub limit: u32,
}

impl PageRequest {
    pub const MAX_LIMIT: u32 = 100;

    /// Clamp client-supplied values: page ≥ 1, 1 ≤ limit ≤ 100.
    pub fn new(page: Option<u32>, limit: Option<u32>, default_limit: u32) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit
                .unwrap_or(default_limit)
                .clamp(1, Self::MAX_LIMIT),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

/// One page of results plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub request: PageRequest,
}

impl<T> Page<T> {
    pub fn pagination(&self) -> Pagination {
        let limit = u64::from(self.request.limit);
        Pagination {
            current: self.request.page,
            pages: self.total.div_ceil(limit),
            total: self.total,
        }
    }
}

/// Pagination block carried by list responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub current: u32,
    pub pages: u64,
    pub total: u64,
}

/// Complaint list filter. `None` fields do not constrain.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ComplaintFilter {
    pub owner_id: Option<String>,
    pub assigned_agent_id: Option<String>,
    pub status: Option<ComplaintStatus>,
    pub category: Option<Category>,
    pub priority: Option<Priority>,
}

/// User list filter.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserFilter {
    pub role: Option<Role>,
    pub is_active: Option<bool>,
}

/// Partial profile update. `None` leaves the column untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
}

/// Which complaints a status aggregation covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatsScope {
    All,
    Owner(String),
    Assignee(String),
}

/// Complaint counts grouped by status.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusCounts {
    pub pending: u64,
    pub in_progress: u64,
    pub resolved: u64,
    pub closed: u64,
}

impl StatusCounts {
    pub fn add(&mut self, status: ComplaintStatus, count: u64) {
        match status {
            ComplaintStatus::Pending => self.pending += count,
            ComplaintStatus::InProgress => self.in_progress += count,
            ComplaintStatus::Resolved => self.resolved += count,
            ComplaintStatus::Closed => self.closed += count,
        }
    }

    pub fn total(&self) -> u64 {
        self.pending + self.in_progress + self.resolved + self.closed
    }
}

// --- Realtime ---

/// Event names carried on the realtime channel.
pub mod events {
    pub const NEW_COMPLAINT: &str = "new-complaint";
    pub const COMPLAINT_ASSIGNED: &str = "complaint-assigned";
    pub const STATUS_UPDATED: &str = "status-updated";
    pub const NEW_MESSAGE: &str = "new-message";
    pub const COMPLAINT_RESOLVED: &str = "complaint-resolved";
}

/// Audience of a realtime publish.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Scope {
    /// Every connected subscriber.
    Global,
    /// Members of one complaint's channel.
    Complaint(String),
}

/// A named event with a JSON payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RealtimeEvent {
    pub event: String,
    pub data: serde_json::Value,
}

impl RealtimeEvent {
    pub fn new(event: &str, data: serde_json::Value) -> Self {
        Self {
            event: event.to_string(),
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn status_round_trips_kebab_case() {
        assert_eq!(ComplaintStatus::InProgress.to_string(), "in-progress");
        assert_eq!(
            ComplaintStatus::from_str("in-progress").unwrap(),
            ComplaintStatus::InProgress
        );
        let json = serde_json::to_string(&ComplaintStatus::InProgress).unwrap();
        assert_eq!(json, "\"in-progress\"");
        assert!(ComplaintStatus::from_str("done").is_err());
    }

    #[test]
    fn status_shout_label() {
        assert_eq!(ComplaintStatus::InProgress.shout(), "IN PROGRESS");
        assert_eq!(ComplaintStatus::Resolved.shout(), "RESOLVED");
    }

    #[test]
    fn forward_sources_only_include_lower_ranks() {
        assert_eq!(
            ComplaintStatus::Pending.forward_sources(),
            vec![ComplaintStatus::Pending]
        );
        assert_eq!(
            ComplaintStatus::Resolved.forward_sources(),
            vec![
                ComplaintStatus::Pending,
                ComplaintStatus::InProgress,
                ComplaintStatus::Resolved
            ]
        );
    }

    #[test]
    fn category_uses_display_names() {
        assert_eq!(Category::ProductQuality.to_string(), "Product Quality");
        assert_eq!(
            Category::from_str("Technical Support").unwrap(),
            Category::TechnicalSupport
        );
        assert!(Category::from_str("product quality").is_err());
        assert_eq!(Category::ALL.len(), 6);
    }

    #[test]
    fn priority_defaults_to_medium() {
        assert_eq!(Priority::default(), Priority::Medium);
    }

    #[test]
    fn sender_tag_follows_role() {
        assert_eq!(SenderTag::for_role(Role::User), SenderTag::User);
        assert_eq!(SenderTag::for_role(Role::Agent), SenderTag::Agent);
        assert_eq!(SenderTag::for_role(Role::Admin), SenderTag::Agent);
    }

    #[test]
    fn user_serialization_omits_password_hash() {
        let user = User {
            id: "u1".into(),
            name: "Ada".into(),
            email: "ada@example.com".into(),
            password_hash: "$argon2id$secret".into(),
            role: Role::User,
            is_active: true,
            phone: None,
            address: None,
            last_login: None,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2id"));
        assert!(json.contains("\"isActive\":true"));
    }

    #[test]
    fn page_request_clamps_inputs() {
        let req = PageRequest::new(Some(0), Some(1000), 10);
        assert_eq!(req.page, 1);
        assert_eq!(req.limit, PageRequest::MAX_LIMIT);
        assert_eq!(PageRequest::new(None, None, 20).limit, 20);
        assert_eq!(PageRequest::new(Some(3), Some(10), 10).offset(), 20);
    }

    #[test]
    fn pagination_rounds_pages_up() {
        let page: Page<u8> = Page {
            items: vec![],
            total: 21,
            request: PageRequest::new(Some(2), Some(10), 10),
        };
        let p = page.pagination();
        assert_eq!(p.current, 2);
        assert_eq!(p.pages, 3);
        assert_eq!(p.total, 21);
    }

    #[test]
    fn status_counts_total_is_sum() {
        let mut counts = StatusCounts::default();
        counts.add(ComplaintStatus::Pending, 2);
        counts.add(ComplaintStatus::Closed, 3);
        counts.add(ComplaintStatus::Pending, 1);
        assert_eq!(counts.pending, 3);
        assert_eq!(counts.total(), 6);
    }

    #[test]
    fn timestamps_sort_lexically() {
        let a = timestamp_now();
        let b = timestamp_now();
        assert_eq!(a.len(), b.len());
        assert!(a <= b);
    }

    proptest::proptest! {
        #[test]
        fn page_request_always_in_bounds(
            page in proptest::option::of(0u32..10_000),
            limit in proptest::option::of(0u32..10_000),
        ) {
            let req = PageRequest::new(page, limit, 10);
            proptest::prop_assert!(req.page >= 1);
            proptest::prop_assert!((1..=PageRequest::MAX_LIMIT).contains(&req.limit));
        }
    }
}
