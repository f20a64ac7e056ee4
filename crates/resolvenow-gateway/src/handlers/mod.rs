// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP request handlers, grouped by route prefix.

pub mod admin;
pub mod agent;
pub mod auth;
pub mod complaints;
pub mod health;

use resolvenow_core::types::{Complaint, Page, Pagination, ThreadEntry};
use serde::Serialize;
use serde_json::{Value, json};

/// Paginated complaint listing.
#[derive(Debug, Serialize)]
pub struct ComplaintList {
    pub complaints: Vec<Complaint>,
    pub pagination: Pagination,
}

impl From<Page<Complaint>> for ComplaintList {
    fn from(page: Page<Complaint>) -> Self {
        let pagination = page.pagination();
        Self {
            complaints: page.items,
            pagination,
        }
    }
}

/// `{"message": ..., "complaint": ...}`
pub(crate) fn complaint_ack(message: &str, complaint: &Complaint) -> Value {
    json!({ "message": message, "complaint": complaint })
}

/// Response to a posted message. Mirrors the `new-message` event payload.
pub(crate) fn message_ack(entry: &ThreadEntry) -> Value {
    json!({
        "message": "Message sent successfully",
        "messageData": {
            "id": entry.id,
            "content": entry.content,
            "sender": entry.sender,
            "senderName": entry.sender_name,
            "createdAt": entry.created_at,
        },
    })
}
