// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/api/agent` handlers. Mounted behind the `agent` role layer.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use resolvenow_core::Principal;
use resolvenow_service::AgentStats;
use resolvenow_service::lifecycle::STAFF_PAGE_LIMIT;
use resolvenow_service::validation::ComplaintQuery;
use serde::Deserialize;
use serde_json::{Value, json};

use super::complaints::MessageBody;
use super::{ComplaintList, complaint_ack, message_ack};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::server::GatewayState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct StatusBody {
    pub status: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResolutionBody {
    pub resolution: String,
}

/// GET /api/agent/stats
pub async fn stats(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<AgentStats>, ApiError> {
    Ok(Json(state.desk.stats.agent(&principal.user_id).await?))
}

/// GET /api/agent/assigned-complaints
pub async fn assigned(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(query): ApiQuery<ComplaintQuery>,
) -> Result<Json<ComplaintList>, ApiError> {
    let status = query.filter()?.status;
    let page = state
        .desk
        .lifecycle
        .list_assigned(&principal, status, query.page(STAFF_PAGE_LIMIT))
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/agent/complaints/{id}
pub async fn get_one(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state.desk.lifecycle.get(&id, &principal).await?;
    Ok(Json(json!({ "complaint": complaint })))
}

/// PUT /api/agent/complaints/{id}/status
pub async fn update_status(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusBody>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state
        .desk
        .lifecycle
        .update_status(&id, &body.status, &principal)
        .await?;
    Ok(Json(complaint_ack(
        "Complaint status updated successfully",
        &complaint,
    )))
}

/// PUT /api/agent/complaints/{id}/resolution
pub async fn resolve(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<ResolutionBody>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state
        .desk
        .lifecycle
        .resolve(&id, &body.resolution, &principal)
        .await?;
    Ok(Json(complaint_ack("Complaint resolved successfully", &complaint)))
}

/// POST /api/agent/complaints/{id}/messages
pub async fn post_message(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<MessageBody>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let entry = state
        .desk
        .threads
        .post(&id, &body.content, &principal)
        .await?;
    Ok((StatusCode::CREATED, Json(message_ack(&entry))))
}
