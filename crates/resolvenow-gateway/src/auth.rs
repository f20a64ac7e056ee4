// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Authentication and role middleware.
//!
//! [`auth_middleware`] resolves `Authorization: Bearer <token>` to a
//! [`Principal`] and stores it in the request extensions. The role layers
//! run after it and check for an exact role match.

use axum::extract::{Request, State};
use axum::http::header::AUTHORIZATION;
use axum::middleware::Next;
use axum::response::Response;
use resolvenow_auth::{AuthGate, bearer_token};
use resolvenow_core::{Principal, ResolveError, Role};

use crate::error::ApiError;
use crate::server::GatewayState;

/// Reject requests without a valid token. Fail closed.
pub async fn auth_middleware(
    State(state): State<GatewayState>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let credential = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);
    let principal = state.desk.gate.authenticate(credential).await?;
    request.extensions_mut().insert(principal);
    Ok(next.run(request).await)
}

async fn require_role(role: Role, request: Request, next: Next) -> Result<Response, ApiError> {
    let principal = request
        .extensions()
        .get::<Principal>()
        .ok_or_else(|| ResolveError::Unauthenticated("no token provided".to_string()))?;
    AuthGate::authorize(principal, role)?;
    Ok(next.run(request).await)
}

pub async fn require_agent(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Agent, request, next).await
}

pub async fn require_admin(request: Request, next: Next) -> Result<Response, ApiError> {
    require_role(Role::Admin, request, next).await
}
