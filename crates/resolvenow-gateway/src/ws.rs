// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime socket.
//!
//! The client authenticates during the handshake with `?token=<jwt>` (or an
//! `Authorization: Bearer` header). Once open, the socket receives every
//! global event and may join complaint channels it is allowed to view:
//!
//! ```json
//! {"type": "join-complaint", "complaintId": "..."}
//! {"type": "leave-complaint", "complaintId": "..."}
//! ```
//!
//! Each request is acknowledged to this socket only with `joined`, `left`,
//! or `error`.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::ws::rejection::WebSocketUpgradeRejection;
use axum::extract::{Query, State};
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::response::{IntoResponse, Response};
use futures::{SinkExt, StreamExt};
use resolvenow_auth::bearer_token;
use resolvenow_core::{Principal, ResolveError};
use resolvenow_realtime::{ClientFrame, frames};
use serde::Deserialize;

use crate::error::ApiError;
use crate::server::GatewayState;

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WsParams {
    pub token: Option<String>,
}

/// Authenticate, then upgrade. Unauthenticated handshakes get a 401.
pub async fn ws_handler(
    State(state): State<GatewayState>,
    Query(params): Query<WsParams>,
    headers: HeaderMap,
    ws: Result<WebSocketUpgrade, WebSocketUpgradeRejection>,
) -> Response {
    let header_token = headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token);
    let credential = params.token.as_deref().or(header_token);
    let principal = match state.desk.gate.authenticate(credential).await {
        Ok(principal) => principal,
        Err(e) => return ApiError(e).into_response(),
    };
    match ws {
        Ok(ws) => ws.on_upgrade(move |socket| handle_socket(socket, state, principal)),
        Err(rejection) => rejection.into_response(),
    }
}

async fn handle_socket(socket: WebSocket, state: GatewayState, principal: Principal) {
    let (mut ws_sender, mut ws_receiver) = socket.split();
    let registration = state.registry.register(&principal.user_id);
    let connection_id = registration.connection_id;
    let mut outbound = registration.outbound;

    let sender_task = tokio::spawn(async move {
        while let Some(frame) = outbound.recv().await {
            if ws_sender.send(Message::Text(frame.into())).await.is_err() {
                break;
            }
        }
    });

    while let Some(Ok(msg)) = ws_receiver.next().await {
        match msg {
            Message::Text(text) => {
                let reply = handle_frame(&state, &connection_id, &principal, text.as_str()).await;
                state.registry.send_to(&connection_id, reply);
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    state.registry.unregister(&connection_id);
    sender_task.abort();
}

/// Apply one client frame and return the acknowledgement for this socket.
pub(crate) async fn handle_frame(
    state: &GatewayState,
    connection_id: &str,
    principal: &Principal,
    text: &str,
) -> String {
    let frame = match ClientFrame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::debug!(connection_id, error = %e, "invalid realtime frame");
            return frames::error("Invalid frame");
        }
    };
    match frame {
        ClientFrame::JoinComplaint { complaint_id } => {
            match state.desk.lifecycle.get(&complaint_id, principal).await {
                Ok(_) => {
                    state.registry.join(connection_id, &complaint_id);
                    frames::joined(&complaint_id)
                }
                Err(ResolveError::NotFound { .. }) => frames::error("Complaint not found"),
                Err(ResolveError::AccessDenied) => frames::error("Access denied"),
                Err(e) => {
                    tracing::error!(complaint_id = %complaint_id, error = %e, "join lookup failed");
                    frames::error("Internal server error")
                }
            }
        }
        ClientFrame::LeaveComplaint { complaint_id } => {
            state.registry.leave(connection_id, &complaint_id);
            frames::left(&complaint_id)
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use resolvenow_config::ResolveNowConfig;
    use resolvenow_core::types::{User, new_id, timestamp_now};
    use resolvenow_core::{ComplaintStore, Role};
    use resolvenow_realtime::ChannelRegistry;
    use resolvenow_service::Desk;
    use resolvenow_service::validation::ComplaintDraft;
    use resolvenow_storage::{Database, SqliteStore};
    use serde_json::Value;

    use super::*;
    use crate::server::HealthState;

    async fn state() -> (GatewayState, Arc<SqliteStore>) {
        let mut config = ResolveNowConfig::default();
        config.auth.jwt_secret = "gateway-ws-test-secret-0123456789".to_string();
        let store = Arc::new(SqliteStore::with_database(
            Database::open_in_memory().await.unwrap(),
        ));
        let registry = Arc::new(ChannelRegistry::new(8));
        let desk = Arc::new(Desk::new(store.clone(), registry.clone(), &config));
        let state = GatewayState {
            desk,
            store: store.clone(),
            registry,
            health: HealthState::default(),
        };
        (state, store)
    }

    async fn seed(store: &SqliteStore, name: &str) -> Principal {
        let now = timestamp_now();
        let user = User {
            id: new_id(),
            name: name.to_string(),
            email: format!("{}@example.com", name.to_lowercase()),
            password_hash: "unused".to_string(),
            role: Role::User,
            is_active: true,
            phone: None,
            address: None,
            last_login: None,
            created_at: now.clone(),
            updated_at: now,
        };
        store.insert_user(&user).await.unwrap();
        Principal::from_user(&user)
    }

    fn parse(frame: &str) -> Value {
        serde_json::from_str(frame).unwrap()
    }

    #[tokio::test]
    async fn owner_joins_and_leaves_channel() {
        let (state, store) = state().await;
        let owner = seed(&store, "Owner").await;
        let draft = ComplaintDraft {
            title: "Late delivery".to_string(),
            description: "Parcel is two weeks overdue.".to_string(),
            category: "Delivery Issue".to_string(),
            ..Default::default()
        };
        let complaint = state.desk.lifecycle.create(&owner, &draft).await.unwrap();
        let registration = state.registry.register(&owner.user_id);
        let conn = registration.connection_id.as_str();

        let join = format!(r#"{{"type":"join-complaint","complaintId":"{}"}}"#, complaint.id);
        let reply = parse(&handle_frame(&state, conn, &owner, &join).await);
        assert_eq!(reply["event"], "joined");
        assert_eq!(reply["data"]["complaintId"], complaint.id.as_str());
        assert!(state.registry.is_member(conn, &complaint.id));

        let leave = format!(r#"{{"type":"leave-complaint","complaintId":"{}"}}"#, complaint.id);
        let reply = parse(&handle_frame(&state, conn, &owner, &leave).await);
        assert_eq!(reply["event"], "left");
        assert!(!state.registry.is_member(conn, &complaint.id));
    }

    #[tokio::test]
    async fn stranger_cannot_join() {
        let (state, store) = state().await;
        let owner = seed(&store, "Owner").await;
        let stranger = seed(&store, "Stranger").await;
        let draft = ComplaintDraft {
            title: "Wrong size".to_string(),
            description: "Shoes arrived two sizes too small.".to_string(),
            category: "Product Quality".to_string(),
            ..Default::default()
        };
        let complaint = state.desk.lifecycle.create(&owner, &draft).await.unwrap();
        let registration = state.registry.register(&stranger.user_id);
        let conn = registration.connection_id.as_str();

        let join = format!(r#"{{"type":"join-complaint","complaintId":"{}"}}"#, complaint.id);
        let reply = parse(&handle_frame(&state, conn, &stranger, &join).await);
        assert_eq!(reply["event"], "error");
        assert_eq!(reply["data"]["message"], "Access denied");
        assert!(!state.registry.is_member(conn, &complaint.id));
    }

    #[tokio::test]
    async fn unknown_complaint_and_garbage() {
        let (state, store) = state().await;
        let user = seed(&store, "Someone").await;
        let registration = state.registry.register(&user.user_id);
        let conn = registration.connection_id.as_str();

        let join = r#"{"type":"join-complaint","complaintId":"missing"}"#;
        let reply = parse(&handle_frame(&state, conn, &user, join).await);
        assert_eq!(reply["data"]["message"], "Complaint not found");

        let reply = parse(&handle_frame(&state, conn, &user, "not json").await);
        assert_eq!(reply["data"]["message"], "Invalid frame");
    }
}
