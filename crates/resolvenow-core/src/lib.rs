// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for ResolveNow.
//!
//! Holds the domain types (complaints, threads, users), the error taxonomy,
//! and the collaborator traits the managers are written against: the
//! persistence store and the realtime notifier.

pub mod error;
pub mod traits;
pub mod types;

pub use error::{FieldError, ResolveError};
pub use types::{HealthStatus, Principal, Role};

pub use traits::{ComplaintStore, Notifier, NullNotifier, PluginAdapter};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{RealtimeEvent, Scope};

    #[test]
    fn resolve_error_has_all_variants() {
        let _validation = ResolveError::validation("title", "required");
        let _unauth = ResolveError::Unauthenticated("missing token".into());
        let _forbidden = ResolveError::Forbidden("admin only".into());
        let _denied = ResolveError::AccessDenied;
        let _missing = ResolveError::not_found("complaint");
        let _assignee = ResolveError::InvalidAssignee("not an agent".into());
        let _status = ResolveError::InvalidStatus("done".into());
        let _conflict = ResolveError::Conflict("email".into());
        let _config = ResolveError::Config("bad".into());
        let _storage = ResolveError::storage(std::io::Error::other("test"));
        let _internal = ResolveError::Internal("test".into());
    }

    #[test]
    fn null_notifier_delivers_nothing() {
        let n = NullNotifier;
        let delivered = n.publish(
            Scope::Global,
            RealtimeEvent::new(types::events::NEW_COMPLAINT, serde_json::json!({})),
        );
        assert_eq!(delivered, 0);
    }

    #[test]
    fn all_trait_modules_are_exported() {
        fn _assert_plugin_adapter<T: PluginAdapter>() {}
        fn _assert_store<T: ComplaintStore>() {}
        fn _assert_notifier<T: Notifier>() {}
        fn _assert_store_object(_: &dyn ComplaintStore) {}
        fn _assert_notifier_object(_: &dyn Notifier) {}
    }
}
