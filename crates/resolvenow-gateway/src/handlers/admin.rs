// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/api/admin` handlers. Mounted behind the `admin` role layer.

use axum::extract::{Path, State};
use axum::{Extension, Json};
use resolvenow_core::Principal;
use resolvenow_core::types::{Complaint, Pagination, User, UserRef};
use resolvenow_service::GlobalStats;
use resolvenow_service::lifecycle::STAFF_PAGE_LIMIT;
use resolvenow_service::validation::{ComplaintQuery, UserQuery};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ComplaintList, complaint_ack};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::server::GatewayState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RecentQuery {
    pub limit: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct AssignBody {
    pub agent_id: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RoleBody {
    pub role: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBody {
    pub is_active: bool,
}

#[derive(Debug, Serialize)]
pub struct RecentResponse {
    pub complaints: Vec<Complaint>,
}

#[derive(Debug, Serialize)]
pub struct UserList {
    pub users: Vec<User>,
    pub pagination: Pagination,
}

#[derive(Debug, Serialize)]
pub struct AgentList {
    pub agents: Vec<UserRef>,
}

/// GET /api/admin/stats
pub async fn stats(State(state): State<GatewayState>) -> Result<Json<GlobalStats>, ApiError> {
    Ok(Json(state.desk.stats.global().await?))
}

/// GET /api/admin/recent-complaints
pub async fn recent(
    State(state): State<GatewayState>,
    ApiQuery(query): ApiQuery<RecentQuery>,
) -> Result<Json<RecentResponse>, ApiError> {
    let complaints = state.desk.lifecycle.recent(query.limit).await?;
    Ok(Json(RecentResponse { complaints }))
}

/// GET /api/admin/complaints
pub async fn complaints(
    State(state): State<GatewayState>,
    ApiQuery(query): ApiQuery<ComplaintQuery>,
) -> Result<Json<ComplaintList>, ApiError> {
    let filter = query.filter()?;
    let page = state
        .desk
        .lifecycle
        .list_all(&filter, query.page(STAFF_PAGE_LIMIT))
        .await?;
    Ok(Json(page.into()))
}

/// PUT /api/admin/complaints/{id}/assign
pub async fn assign(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<AssignBody>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state
        .desk
        .lifecycle
        .assign(&id, &body.agent_id, &principal)
        .await?;
    Ok(Json(complaint_ack("Complaint assigned successfully", &complaint)))
}

/// GET /api/admin/users
pub async fn users(
    State(state): State<GatewayState>,
    ApiQuery(query): ApiQuery<UserQuery>,
) -> Result<Json<UserList>, ApiError> {
    let page = state.desk.accounts.list_users(&query).await?;
    let pagination = page.pagination();
    Ok(Json(UserList {
        users: page.items,
        pagination,
    }))
}

/// PUT /api/admin/users/{id}/role
pub async fn set_role(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<RoleBody>,
) -> Result<Json<Value>, ApiError> {
    let user = state.desk.accounts.set_role(&id, &body.role).await?;
    Ok(Json(json!({
        "message": "User role updated successfully",
        "user": user,
    })))
}

/// PUT /api/admin/users/{id}/status
pub async fn set_status(
    State(state): State<GatewayState>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let user = state.desk.accounts.set_active(&id, body.is_active).await?;
    let verb = if body.is_active { "activated" } else { "deactivated" };
    Ok(Json(json!({
        "message": format!("User account {verb} successfully"),
        "user": user,
    })))
}

/// GET /api/admin/agents
pub async fn agents(State(state): State<GatewayState>) -> Result<Json<AgentList>, ApiError> {
    let agents = state
        .desk
        .accounts
        .agents()
        .await?
        .iter()
        .map(User::summary)
        .collect();
    Ok(Json(AgentList { agents }))
}
