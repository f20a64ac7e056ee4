// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complaint lifecycle manager.
//!
//! Status graph: `pending → in-progress → resolved → closed`. By default
//! the assignee may set any status directly. With
//! `lifecycle.enforce_forward_transitions` a move to a lower-ranked status
//! is refused. Each write is followed by one best-effort realtime publish;
//! a failed publish never undoes the write.

use std::sync::Arc;

use resolvenow_auth::AuthGate;
use resolvenow_config::model::LifecycleConfig;
use resolvenow_core::types::{
    Complaint, ComplaintFilter, ComplaintStatus, Feedback, Message, Page, PageRequest,
    RealtimeEvent, Scope, events, new_id, timestamp_now,
};
use resolvenow_core::{ComplaintStore, Notifier, Principal, ResolveError, Role};
use serde_json::json;
use tracing::{debug, info};

use crate::access::{explain_miss, load_visible};
use crate::validation::{self, ComplaintDraft, FeedbackDraft};

/// Default page size for owner listings.
pub const OWNER_PAGE_LIMIT: u32 = 10;
/// Default page size for agent and admin listings.
pub const STAFF_PAGE_LIMIT: u32 = 20;
/// Default size of the admin "recent complaints" list.
pub const RECENT_LIMIT: u32 = 10;

pub struct LifecycleManager {
    store: Arc<dyn ComplaintStore>,
    notifier: Arc<dyn Notifier>,
    enforce_forward: bool,
}

impl LifecycleManager {
    pub fn new(
        store: Arc<dyn ComplaintStore>,
        notifier: Arc<dyn Notifier>,
        config: &LifecycleConfig,
    ) -> Self {
        Self {
            store,
            notifier,
            enforce_forward: config.enforce_forward_transitions,
        }
    }

    fn allowed_from(&self, target: ComplaintStatus) -> Vec<ComplaintStatus> {
        if self.enforce_forward {
            target.forward_sources()
        } else {
            Vec::new()
        }
    }

    /// File a new complaint owned by `owner`. Starts `pending`, unassigned.
    pub async fn create(
        &self,
        owner: &Principal,
        draft: &ComplaintDraft,
    ) -> Result<Complaint, ResolveError> {
        let valid = draft.validate()?;
        let user = self
            .store
            .get_user(&owner.user_id)
            .await?
            .ok_or_else(|| ResolveError::not_found("user"))?;

        let now = timestamp_now();
        let complaint = Complaint {
            id: new_id(),
            title: valid.title,
            description: valid.description,
            category: valid.category,
            priority: valid.priority,
            status: ComplaintStatus::Pending,
            user: user.summary(),
            assigned_agent: None,
            contact_phone: valid.contact_phone,
            address: valid.address,
            resolution: None,
            feedback: None,
            created_at: now.clone(),
            updated_at: now,
            resolved_at: None,
            closed_at: None,
        };
        self.store.insert_complaint(&complaint).await?;
        resolvenow_prometheus::record_complaint_created(&complaint.category.to_string());
        info!(
            complaint_id = %complaint.id,
            user_id = %owner.user_id,
            category = %complaint.category,
            "complaint created"
        );

        self.notifier.publish(
            Scope::Global,
            RealtimeEvent::new(
                events::NEW_COMPLAINT,
                json!({
                    "complaintId": complaint.id,
                    "title": complaint.title,
                    "category": complaint.category,
                    "priority": complaint.priority,
                    "message": "New complaint submitted",
                }),
            ),
        );
        Ok(complaint)
    }

    /// Assign to an active agent and force `in-progress`. Admin only.
    pub async fn assign(
        &self,
        complaint_id: &str,
        agent_id: &str,
        admin: &Principal,
    ) -> Result<Complaint, ResolveError> {
        AuthGate::authorize(admin, Role::Admin)?;
        let agent = self
            .store
            .get_user(agent_id.trim())
            .await?
            .filter(|u| u.role == Role::Agent && u.is_active)
            .ok_or_else(|| {
                debug!(agent_id, "assignment target is not an active agent");
                ResolveError::InvalidAssignee("Invalid agent ID".to_string())
            })?;

        let complaint = self
            .store
            .assign(complaint_id, &agent.id, &timestamp_now())
            .await?
            .ok_or_else(|| ResolveError::not_found("complaint"))?;
        resolvenow_prometheus::record_transition(&complaint.status.to_string());
        info!(
            complaint_id,
            agent_id = %agent.id,
            admin_id = %admin.user_id,
            "complaint assigned"
        );

        self.notifier.publish(
            Scope::Global,
            RealtimeEvent::new(
                events::COMPLAINT_ASSIGNED,
                json!({
                    "complaintId": complaint.id,
                    "agentName": agent.name,
                    "message": "Complaint has been assigned to an agent",
                }),
            ),
        );
        Ok(complaint)
    }

    /// Set a new status. Only the assignee may do this.
    pub async fn update_status(
        &self,
        complaint_id: &str,
        raw_status: &str,
        agent: &Principal,
    ) -> Result<Complaint, ResolveError> {
        let status = validation::parse_status(raw_status)?;
        let note = Message::system(
            complaint_id,
            &agent.user_id,
            format!("Complaint status updated to: {}", status.shout()),
        );
        let allowed_from = self.allowed_from(status);

        let Some(complaint) = self
            .store
            .transition(complaint_id, &agent.user_id, status, &allowed_from, &note)
            .await?
        else {
            return Err(self.transition_miss(complaint_id, agent, status).await);
        };
        resolvenow_prometheus::record_transition(&status.to_string());
        info!(
            complaint_id,
            agent_id = %agent.user_id,
            status = %status,
            "complaint status updated"
        );

        self.notifier.publish(
            Scope::Complaint(complaint.id.clone()),
            RealtimeEvent::new(
                events::STATUS_UPDATED,
                json!({
                    "complaintId": complaint.id,
                    "status": status,
                    "message": format!(
                        "Complaint status updated to {}",
                        status.to_string().replace('-', " ")
                    ),
                }),
            ),
        );
        Ok(complaint)
    }

    /// Record a resolution and force `resolved`. Only the assignee may do this.
    pub async fn resolve(
        &self,
        complaint_id: &str,
        raw_resolution: &str,
        agent: &Principal,
    ) -> Result<Complaint, ResolveError> {
        let resolution = validation::resolution_text(raw_resolution)?;
        let note = Message::system(
            complaint_id,
            &agent.user_id,
            format!("Complaint resolved: {resolution}"),
        );
        let allowed_from = self.allowed_from(ComplaintStatus::Resolved);

        let Some(complaint) = self
            .store
            .resolve(
                complaint_id,
                &agent.user_id,
                &resolution,
                &allowed_from,
                &note,
            )
            .await?
        else {
            return Err(self
                .transition_miss(complaint_id, agent, ComplaintStatus::Resolved)
                .await);
        };
        resolvenow_prometheus::record_transition(&ComplaintStatus::Resolved.to_string());
        info!(complaint_id, agent_id = %agent.user_id, "complaint resolved");

        self.notifier.publish(
            Scope::Complaint(complaint.id.clone()),
            RealtimeEvent::new(
                events::COMPLAINT_RESOLVED,
                json!({
                    "complaintId": complaint.id,
                    "resolution": resolution,
                    "message": "Your complaint has been resolved",
                }),
            ),
        );
        Ok(complaint)
    }

    async fn transition_miss(
        &self,
        complaint_id: &str,
        agent: &Principal,
        target: ComplaintStatus,
    ) -> ResolveError {
        let err = explain_miss(
            self.store.as_ref(),
            complaint_id,
            |c| c.is_assigned_to(&agent.user_id),
            |c| {
                ResolveError::InvalidStatus(format!(
                    "cannot move from {} to {}",
                    c.status, target
                ))
            },
        )
        .await;
        debug!(complaint_id, agent_id = %agent.user_id, error = %err, "transition refused");
        err
    }

    /// A complaint the principal may view.
    pub async fn get(
        &self,
        complaint_id: &str,
        principal: &Principal,
    ) -> Result<Complaint, ResolveError> {
        load_visible(self.store.as_ref(), complaint_id, principal).await
    }

    /// Owner feedback on a resolved or closed complaint.
    pub async fn submit_feedback(
        &self,
        complaint_id: &str,
        draft: &FeedbackDraft,
        owner: &Principal,
    ) -> Result<Complaint, ResolveError> {
        let (rating, comment) = draft.validate()?;
        let feedback = Feedback {
            rating,
            comment,
            submitted_at: timestamp_now(),
        };
        match self
            .store
            .set_feedback(complaint_id, &owner.user_id, &feedback)
            .await?
        {
            Some(complaint) => {
                info!(complaint_id, rating, "feedback submitted");
                Ok(complaint)
            }
            None => Err(explain_miss(
                self.store.as_ref(),
                complaint_id,
                |c| c.is_owned_by(&owner.user_id),
                |_| {
                    ResolveError::InvalidStatus(
                        "feedback requires a resolved or closed complaint".to_string(),
                    )
                },
            )
            .await),
        }
    }

    /// Complaints filed by `owner`, newest first.
    pub async fn list_mine(
        &self,
        owner: &Principal,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ResolveError> {
        let filter = ComplaintFilter {
            owner_id: Some(owner.user_id.clone()),
            ..Default::default()
        };
        self.store.list_complaints(&filter, page).await
    }

    /// Complaints assigned to `agent`, optionally narrowed by status.
    pub async fn list_assigned(
        &self,
        agent: &Principal,
        status: Option<ComplaintStatus>,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ResolveError> {
        let filter = ComplaintFilter {
            assigned_agent_id: Some(agent.user_id.clone()),
            status,
            ..Default::default()
        };
        self.store.list_complaints(&filter, page).await
    }

    /// Every complaint matching `filter`.
    pub async fn list_all(
        &self,
        filter: &ComplaintFilter,
        page: PageRequest,
    ) -> Result<Page<Complaint>, ResolveError> {
        self.store.list_complaints(filter, page).await
    }

    /// Latest `limit` complaints.
    pub async fn recent(&self, limit: Option<u32>) -> Result<Vec<Complaint>, ResolveError> {
        let page = PageRequest::new(Some(1), limit, RECENT_LIMIT);
        let listing = self
            .store
            .list_complaints(&ComplaintFilter::default(), page)
            .await?;
        Ok(listing.items)
    }
}
