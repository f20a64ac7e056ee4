// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Participant checks on a single complaint.

use resolvenow_core::types::Complaint;
use resolvenow_core::{ComplaintStore, Principal, ResolveError, Role};
use tracing::debug;

/// Owner, assignee, or any admin.
pub fn can_view(complaint: &Complaint, principal: &Principal) -> bool {
    principal.has_role(Role::Admin)
        || complaint.is_owned_by(&principal.user_id)
        || complaint.is_assigned_to(&principal.user_id)
}

/// Load a complaint the principal may view.
pub(crate) async fn load_visible(
    store: &dyn ComplaintStore,
    complaint_id: &str,
    principal: &Principal,
) -> Result<Complaint, ResolveError> {
    let complaint = store
        .get_complaint(complaint_id)
        .await?
        .ok_or_else(|| ResolveError::not_found("complaint"))?;
    if can_view(&complaint, principal) {
        Ok(complaint)
    } else {
        debug!(
            complaint_id,
            user_id = %principal.user_id,
            role = %principal.role,
            "complaint access denied"
        );
        Err(ResolveError::AccessDenied)
    }
}

/// Explain why a guarded write matched no row.
///
/// `is_party` decides whether the principal was entitled to the write on
/// the complaint as it stands now.
pub(crate) async fn explain_miss(
    store: &dyn ComplaintStore,
    complaint_id: &str,
    is_party: impl FnOnce(&Complaint) -> bool,
    status_error: impl FnOnce(&Complaint) -> ResolveError,
) -> ResolveError {
    match store.get_complaint(complaint_id).await {
        Ok(None) => ResolveError::not_found("complaint"),
        Ok(Some(complaint)) if !is_party(&complaint) => ResolveError::AccessDenied,
        Ok(Some(complaint)) => status_error(&complaint),
        Err(e) => e,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use resolvenow_core::types::{Category, ComplaintStatus, Priority, UserRef, timestamp_now};

    fn principal(id: &str, role: Role) -> Principal {
        Principal {
            user_id: id.into(),
            name: id.into(),
            role,
        }
    }

    fn complaint(owner: &str, agent: Option<&str>) -> Complaint {
        let reference = |id: &str| UserRef {
            id: id.into(),
            name: id.into(),
            email: format!("{id}@example.com"),
        };
        Complaint {
            id: "c1".into(),
            title: "Broken item".into(),
            description: "It arrived broken".into(),
            category: Category::ProductQuality,
            priority: Priority::Medium,
            status: ComplaintStatus::Pending,
            user: reference(owner),
            assigned_agent: agent.map(reference),
            contact_phone: None,
            address: None,
            resolution: None,
            feedback: None,
            created_at: timestamp_now(),
            updated_at: timestamp_now(),
            resolved_at: None,
            closed_at: None,
        }
    }

    #[test]
    fn participants_can_view() {
        let c = complaint("owner", Some("agent"));
        assert!(can_view(&c, &principal("owner", Role::User)));
        assert!(can_view(&c, &principal("agent", Role::Agent)));
        assert!(can_view(&c, &principal("boss", Role::Admin)));
    }

    #[test]
    fn outsiders_cannot_view() {
        let c = complaint("owner", Some("agent"));
        assert!(!can_view(&c, &principal("other", Role::User)));
        assert!(!can_view(&c, &principal("other-agent", Role::Agent)));
        assert!(!can_view(&complaint("owner", None), &principal("agent", Role::Agent)));
    }
}
