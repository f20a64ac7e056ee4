// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Socket frame formats.
//!
//! Client → server:
//! ```json
//! {"type": "join-complaint", "complaintId": "..."}
//! {"type": "leave-complaint", "complaintId": "..."}
//! ```
//!
//! Server → client: `{"event": "<name>", "data": {...}}`. Besides the
//! lifecycle events, `joined`, `left` and `error` acknowledge the
//! requesting socket only.

use resolvenow_core::types::RealtimeEvent;
use serde::Deserialize;
use serde_json::json;

pub const JOINED: &str = "joined";
pub const LEFT: &str = "left";
pub const ERROR: &str = "error";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ClientFrame {
    JoinComplaint {
        #[serde(rename = "complaintId")]
        complaint_id: String,
    },
    LeaveComplaint {
        #[serde(rename = "complaintId")]
        complaint_id: String,
    },
}

impl ClientFrame {
    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}

fn render(event: RealtimeEvent) -> String {
    // A `Value` payload always serializes.
    serde_json::to_string(&event).unwrap_or_default()
}

pub fn joined(complaint_id: &str) -> String {
    render(RealtimeEvent::new(JOINED, json!({ "complaintId": complaint_id })))
}

pub fn left(complaint_id: &str) -> String {
    render(RealtimeEvent::new(LEFT, json!({ "complaintId": complaint_id })))
}

pub fn error(message: &str) -> String {
    render(RealtimeEvent::new(ERROR, json!({ "message": message })))
}
