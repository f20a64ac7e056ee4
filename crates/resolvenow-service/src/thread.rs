// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message thread manager.

use std::sync::Arc;

use resolvenow_core::types::{
    Message, MessageType, RealtimeEvent, Scope, SenderTag, ThreadEntry, events, timestamp_now,
};
use resolvenow_core::{ComplaintStore, Notifier, Principal, ResolveError};
use serde_json::json;
use tracing::debug;

use crate::access::load_visible;
use crate::validation;

pub struct ThreadManager {
    store: Arc<dyn ComplaintStore>,
    notifier: Arc<dyn Notifier>,
}

impl ThreadManager {
    pub fn new(store: Arc<dyn ComplaintStore>, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    /// Append a text message from a participant and fan it out to the
    /// complaint channel.
    pub async fn post(
        &self,
        complaint_id: &str,
        raw_content: &str,
        sender: &Principal,
    ) -> Result<ThreadEntry, ResolveError> {
        let content = validation::message_content(raw_content)?;
        load_visible(self.store.as_ref(), complaint_id, sender).await?;

        let message = Message::text(complaint_id, &sender.user_id, content);
        self.store.insert_message(&message).await?;

        let tag = SenderTag::for_role(sender.role);
        resolvenow_prometheus::record_message_posted(&tag.to_string());
        debug!(
            complaint_id,
            message_id = %message.id,
            sender = %tag,
            "message posted"
        );

        let entry = ThreadEntry {
            id: message.id,
            complaint_id: message.complaint_id,
            content: message.content,
            sender: tag,
            sender_name: sender.name.clone(),
            message_type: MessageType::Text,
            is_read: false,
            read_at: None,
            created_at: message.created_at,
        };
        self.notifier.publish(
            Scope::Complaint(entry.complaint_id.clone()),
            RealtimeEvent::new(
                events::NEW_MESSAGE,
                json!({
                    "id": entry.id,
                    "content": entry.content,
                    "sender": entry.sender,
                    "senderName": entry.sender_name,
                    "createdAt": entry.created_at,
                }),
            ),
        );
        Ok(entry)
    }

    /// The whole thread, oldest first.
    pub async fn list(
        &self,
        complaint_id: &str,
        principal: &Principal,
    ) -> Result<Vec<ThreadEntry>, ResolveError> {
        load_visible(self.store.as_ref(), complaint_id, principal).await?;
        self.store.list_thread(complaint_id).await
    }

    /// Mark every message the reader did not send as read. Returns how many changed.
    pub async fn mark_read(
        &self,
        complaint_id: &str,
        reader: &Principal,
    ) -> Result<u64, ResolveError> {
        load_visible(self.store.as_ref(), complaint_id, reader).await?;
        self.store
            .mark_read(complaint_id, &reader.user_id, &timestamp_now())
            .await
    }
}
