// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `/api/complaints` handlers. Open to any authenticated principal; the
//! service layer enforces participant access per complaint.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::{Extension, Json};
use resolvenow_core::Principal;
use resolvenow_core::types::ThreadEntry;
use resolvenow_service::UserStats;
use resolvenow_service::lifecycle::OWNER_PAGE_LIMIT;
use resolvenow_service::validation::{ComplaintDraft, ComplaintQuery, FeedbackDraft};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{ComplaintList, complaint_ack, message_ack};
use crate::error::ApiError;
use crate::extract::{ApiJson, ApiQuery};
use crate::server::GatewayState;

/// Body of a posted thread message.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct MessageBody {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct ThreadResponse {
    pub messages: Vec<ThreadEntry>,
}

/// POST /api/complaints
pub async fn create(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    ApiJson(draft): ApiJson<ComplaintDraft>,
) -> Result<(StatusCode, Json<Value>), ApiError> {
    let complaint = state.desk.lifecycle.create(&principal, &draft).await?;
    Ok((
        StatusCode::CREATED,
        Json(complaint_ack("Complaint submitted successfully", &complaint)),
    ))
}

/// GET /api/complaints/my-complaints
pub async fn list_mine(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    ApiQuery(query): ApiQuery<ComplaintQuery>,
) -> Result<Json<ComplaintList>, ApiError> {
    let page = state
        .desk
        .lifecycle
        .list_mine(&principal, query.page(OWNER_PAGE_LIMIT))
        .await?;
    Ok(Json(page.into()))
}

/// GET /api/complaints/stats
pub async fn stats(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<UserStats>, ApiError> {
    Ok(Json(state.desk.stats.user(&principal.user_id).await?))
}

/// GET /api/complaints/{id}
pub async fn get_one(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state.desk.lifecycle.get(&id, &principal).await?;
    Ok(Json(json!({ "complaint": complaint })))
}

/// GET /api/complaints/{id}/messages
pub async fn list_messages(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<ThreadResponse>, ApiError> {
    let messages = state.desk.threads.list(&id, &principal).await?;
    Ok(Json(ThreadResponse { messages }))
}

/// POST /api/complaints/{id}/messages
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

/// PUT /api/complaints/{id}/messages/read
pub async fn mark_read(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let updated = state.desk.threads.mark_read(&id, &principal).await?;
    Ok(Json(json!({
        "message": "Messages marked as read",
        "updated": updated,
    })))
}

/// PUT /api/complaints/{id}/feedback
pub async fn feedback(
    State(state): State<GatewayState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
    ApiJson(draft): ApiJson<FeedbackDraft>,
) -> Result<Json<Value>, ApiError> {
    let complaint = state
        .desk
        .lifecycle
        .submit_feedback(&id, &draft, &principal)
        .await?;
    Ok(Json(complaint_ack(
        "Feedback submitted successfully",
        &complaint,
    )))
}
