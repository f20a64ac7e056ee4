// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Thread message queries.

use resolvenow_core::ResolveError;
use resolvenow_core::types::{Message, Role, SenderTag, ThreadEntry};
use rusqlite::{OptionalExtension, Row, params};

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

const THREAD_SELECT: &str = "SELECT m.id, m.complaint_id, m.content, u.role, u.name, \
     m.message_type, m.is_read, m.read_at, m.created_at \
     FROM messages m JOIN users u ON u.id = m.sender_id";

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ThreadEntry> {
    let role: Role = parse_column(row, 3)?;
    Ok(ThreadEntry {
        id: row.get(0)?,
        complaint_id: row.get(1)?,
        content: row.get(2)?,
        sender: SenderTag::for_role(role),
        sender_name: row.get(4)?,
        message_type: parse_column(row, 5)?,
        is_read: row.get(6)?,
        read_at: row.get(7)?,
        created_at: row.get(8)?,
    })
}

/// Insert on an already-borrowed connection, so lifecycle updates can
/// append their system message inside their own transaction.
pub(crate) fn insert_message_sync(
    conn: &rusqlite::Connection,
    message: &Message,
) -> rusqlite::Result<()> {
    conn.execute(
        "INSERT INTO messages (id, complaint_id, sender_id, content, message_type, is_read, \
         read_at, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            message.id,
            message.complaint_id,
            message.sender_id,
            message.content,
            message.message_type.to_string(),
            message.is_read,
            message.read_at,
            message.created_at,
        ],
    )?;
    Ok(())
}

pub async fn insert_message(db: &Database, message: &Message) -> Result<(), ResolveError> {
    let message = message.clone();
    db.connection()
        .call(move |conn| insert_message_sync(conn, &message))
        .await
        .map_err(map_tr_err)
}

/// Whole thread, oldest first.
pub async fn list_thread(db: &Database, complaint_id: &str) -> Result<Vec<ThreadEntry>, ResolveError> {
    let complaint_id = complaint_id.to_string();
    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "{THREAD_SELECT} WHERE m.complaint_id = ?1 ORDER BY m.created_at, m.seq"
            ))?;
            let entries = stmt
                .query_map(params![complaint_id], entry_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(entries)
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_thread_entry(
    db: &Database,
    message_id: &str,
) -> Result<Option<ThreadEntry>, ResolveError> {
    let message_id = message_id.to_string();
    db.connection()
        .call(move |conn| {
            conn.query_row(
                &format!("{THREAD_SELECT} WHERE m.id = ?1"),
                params![message_id],
                entry_from_row,
            )
            .optional()
        })
        .await
        .map_err(map_tr_err)
}

/// Mark unread messages from other senders as read. `read_at` is only
/// stamped on the first read.
pub async fn mark_read(
    db: &Database,
    complaint_id: &str,
    reader_id: &str,
    at: &str,
) -> Result<u64, ResolveError> {
    let complaint_id = complaint_id.to_string();
    let reader_id = reader_id.to_string();
    let at = at.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE messages SET is_read = 1, read_at = ?1
                 WHERE complaint_id = ?2 AND sender_id != ?3 AND is_read = 0",
                params![at, complaint_id, reader_id],
            )?;
            Ok(changed as u64)
        })
        .await
        .map_err(map_tr_err)
}
