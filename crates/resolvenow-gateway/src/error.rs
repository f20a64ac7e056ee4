// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP mapping of [`ResolveError`].
//!
//! Body shape: `{"message": "...", "errors": [{"field", "message"}]}`.
//! `errors` is present only for validation failures. Storage and internal
//! failures are logged and reported with a generic message.

use axum::Json;
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use resolvenow_core::{FieldError, ResolveError};
use serde::Serialize;

/// Error body returned by every route.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<FieldError>>,
}

/// Handler error wrapper.
#[derive(Debug)]
pub struct ApiError(pub ResolveError);

impl From<ResolveError> for ApiError {
    fn from(err: ResolveError) -> Self {
        Self(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self(ResolveError::validation("body", rejection.body_text()))
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        Self(ResolveError::validation("query", rejection.body_text()))
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Status code and body for an error.
pub fn error_parts(err: ResolveError) -> (StatusCode, ErrorResponse) {
    let plain = |status: StatusCode, message: String| {
        (
            status,
            ErrorResponse {
                message,
                errors: None,
            },
        )
    };
    match err {
        ResolveError::Validation { errors } => (
            StatusCode::BAD_REQUEST,
            ErrorResponse {
                message: "Validation failed".to_string(),
                errors: Some(errors),
            },
        ),
        ResolveError::Unauthenticated(reason) => plain(StatusCode::UNAUTHORIZED, reason),
        ResolveError::Forbidden(reason) => plain(StatusCode::FORBIDDEN, reason),
        ResolveError::AccessDenied => plain(StatusCode::FORBIDDEN, "Access denied".to_string()),
        ResolveError::NotFound { entity } => plain(
            StatusCode::NOT_FOUND,
            format!("{} not found", capitalize(entity)),
        ),
        ResolveError::InvalidAssignee(reason) | ResolveError::InvalidStatus(reason) => {
            plain(StatusCode::BAD_REQUEST, reason)
        }
        ResolveError::Conflict(reason) => plain(StatusCode::CONFLICT, reason),
        err @ (ResolveError::Config(_)
        | ResolveError::Storage { .. }
        | ResolveError::Internal(_)) => {
            tracing::error!(error = %err, "request failed");
            plain(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Internal server error".to_string(),
            )
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = error_parts(self.0);
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ResolveError) -> StatusCode {
        error_parts(err).0
    }

    #[test]
    fn status_mapping() {
        assert_eq!(
            status_of(ResolveError::validation("title", "short")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ResolveError::Unauthenticated("x".into())),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            status_of(ResolveError::Forbidden("x".into())),
            StatusCode::FORBIDDEN
        );
        assert_eq!(status_of(ResolveError::AccessDenied), StatusCode::FORBIDDEN);
        assert_eq!(
            status_of(ResolveError::not_found("complaint")),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            status_of(ResolveError::InvalidAssignee("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ResolveError::InvalidStatus("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(ResolveError::Conflict("x".into())),
            StatusCode::CONFLICT
        );
        assert_eq!(
            status_of(ResolveError::storage(std::io::Error::other("disk"))),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn validation_body_lists_fields() {
        let (_, body) = error_parts(ResolveError::validation("title", "too short"));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Validation failed");
        assert_eq!(json["errors"][0]["field"], "title");
    }

    #[test]
    #[tracing_test::traced_test]
    fn internal_details_are_hidden() {
        let (_, body) = error_parts(ResolveError::Internal("secret path /var/db".into()));
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["message"], "Internal server error");
        assert!(json.get("errors").is_none());
        assert!(logs_contain("request failed"));
    }

    #[test]
    fn not_found_names_entity() {
        let (_, body) = error_parts(ResolveError::not_found("complaint"));
        assert_eq!(body.message, "Complaint not found");
    }
}
