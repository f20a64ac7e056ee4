// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/api/auth` handlers.

use axum::extract::State;
use axum::http::StatusCode;
use axum::{Extension, Json};
use resolvenow_core::types::User;
use resolvenow_core::{Principal, Role};
use resolvenow_service::Session;
use resolvenow_service::validation::{LoginDraft, ProfileDraft, RegistrationDraft};
use serde::Serialize;

use crate::error::ApiError;
use crate::extract::ApiJson;
use crate::server::GatewayState;

/// Account summary returned with a fresh token.
#[derive(Debug, Serialize)]
pub struct AccountSummary {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub message: &'static str,
    pub token: String,
    pub user: AccountSummary,
}

impl SessionResponse {
    fn new(message: &'static str, session: Session) -> Self {
        Self {
            message,
            token: session.token,
            user: AccountSummary {
                id: session.user.id,
                name: session.user.name,
                email: session.user.email,
                role: session.user.role,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ProfileResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<GatewayState>,
    ApiJson(draft): ApiJson<RegistrationDraft>,
) -> Result<(StatusCode, Json<SessionResponse>), ApiError> {
    let session = state.desk.accounts.register(&draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(SessionResponse::new("User registered successfully", session)),
    ))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<GatewayState>,
    ApiJson(draft): ApiJson<LoginDraft>,
) -> Result<Json<SessionResponse>, ApiError> {
    let session = state.desk.accounts.login(&draft).await?;
    Ok(Json(SessionResponse::new("Login successful", session)))
}

/// GET /api/auth/profile
pub async fn profile(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.desk.accounts.profile(&principal).await?;
    Ok(Json(ProfileResponse {
        message: None,
        user,
    }))
}

/// PUT /api/auth/profile
pub async fn update_profile(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    ApiJson(draft): ApiJson<ProfileDraft>,
) -> Result<Json<ProfileResponse>, ApiError> {
    let user = state.desk.accounts.update_profile(&principal, &draft).await?;
    Ok(Json(ProfileResponse {
        message: Some("Profile updated successfully"),
        user,
    }))
}
