// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error taxonomy shared by every ResolveNow crate.

use serde::Serialize;
use thiserror::Error;

/// A single field-level validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Request field the failure refers to (camelCase, as sent by clients).
    pub field: String,
    /// Human readable description.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// The primary error type returned by the lifecycle, thread, stats and
/// account operations, and by the persistence collaborator.
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Malformed or out-of-range input.
    #[error("validation failed: {}", summarize(errors))]
    Validation { errors: Vec<FieldError> },

    /// Missing, malformed, expired, or revoked credential.
    #[error("authentication required: {0}")]
    Unauthenticated(String),

    /// Principal holds the wrong role for the route.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// Principal is not a participant of the referenced complaint.
    #[error("access denied")]
    AccessDenied,

    /// Referenced entity does not exist.
    #[error("{entity} not found")]
    NotFound { entity: &'static str },

    /// Assignment target is not an active agent.
    #[error("invalid assignee: {0}")]
    InvalidAssignee(String),

    /// Status value outside the enumerated set, or a disallowed transition.
    #[error("invalid status: {0}")]
    InvalidStatus(String),

    /// Uniqueness violation (e.g. email already registered).
    #[error("conflict: {0}")]
    Conflict(String),

    /// Configuration errors detected at runtime.
    #[error("configuration error: {0}")]
    Config(String),

    /// Persistence collaborator failure.
    #[error("storage error: {source}")]
    Storage {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl ResolveError {
    /// Single-field validation failure.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            errors: vec![FieldError::new(field, message)],
        }
    }

    /// Wrap any error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage {
            source: Box::new(err),
        }
    }

    pub fn not_found(entity: &'static str) -> Self {
        Self::NotFound { entity }
    }
}

fn summarize(errors: &[FieldError]) -> String {
    errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect::<Vec<_>>()
        .join("; ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validation_display_lists_every_field() {
        let err = ResolveError::Validation {
            errors: vec![
                FieldError::new("title", "too short"),
                FieldError::new("category", "unknown"),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("title: too short"));
        assert!(text.contains("category: unknown"));
    }

    #[test]
    fn not_found_names_entity() {
        assert_eq!(
            ResolveError::not_found("complaint").to_string(),
            "complaint not found"
        );
    }

    #[test]
    fn storage_wraps_source() {
        let err = ResolveError::storage(std::io::Error::other("disk gone"));
        assert!(err.to_string().contains("disk gone"));
    }
}
