// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Complaint queries, including the guarded lifecycle updates.

use resolvenow_core::ResolveError;
use resolvenow_core::types::{
    Complaint, ComplaintFilter, ComplaintStatus, Feedback, Message, Page, PageRequest, UserRef,
};
use rusqlite::types::Value;
use rusqlite::{OptionalExtension, Row, params, params_from_iter};

use crate::database::{Database, map_tr_err};
use crate::queries::messages::insert_message_sync;
use crate::queries::{Conditions, parse_column, placeholders};

/// Complaint columns joined with owner and assignee references.
const COMPLAINT_SELECT: &str = "SELECT c.id, c.title, c.description, c.category, c.priority, \
     c.status, u.id, u.name, u.email, a.id, a.name, a.email, c.contact_phone, c.address, \
     c.resolution, c.feedback_rating, c.feedback_comment, c.feedback_submitted_at, \
     c.created_at, c.updated_at, c.resolved_at, c.closed_at \
     FROM complaints c \
     JOIN users u ON u.id = c.user_id \
     LEFT JOIN users a ON a.id = c.assigned_agent_id";

fn complaint_from_row(row: &Row<'_>) -> rusqlite::Result<Complaint> {
    let agent_id: Option<String> = row.get(9)?;
    let assigned_agent = match agent_id {
        Some(id) => Some(UserRef {
            id,
            name: row.get(10)?,
            email: row.get(11)?,
        }),
        None => None,
    };
    let rating: Option<u8> = row.get(15)?;
    let feedback = match rating {
        Some(rating) => Some(Feedback {
            rating,
            comment: row.get(16)?,
            submitted_at: row.get::<_, Option<String>>(17)?.unwrap_or_default(),
        }),
        None => None,
    };

    Ok(Complaint {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        category: parse_column(row, 3)?,
        priority: parse_column(row, 4)?,
        status: parse_column(row, 5)?,
        user: UserRef {
            id: row.get(6)?,
            name: row.get(7)?,
            email: row.get(8)?,
        },
        assigned_agent,
        contact_phone: row.get(12)?,
        address: row.get(13)?,
        resolution: row.get(14)?,
        feedback,
        created_at: row.get(18)?,
        updated_at: row.get(19)?,
        resolved_at: row.get(20)?,
        closed_at: row.get(21)?,
    })
}

pub(crate) fn fetch_complaint(
    conn: &rusqlite::Connection,
    id: &str,
) -> rusqlite::Result<Option<Complaint>> {
    conn.query_row(
        &format!("{COMPLAINT_SELECT} WHERE c.id = ?1"),
        params![id],
        complaint_from_row,
    )
    .optional()
}

pub async fn insert_complaint(db: &Database, complaint: &Complaint) -> Result<(), ResolveError> {
    let c = complaint.clone();
    db.connection()
        .call(move |conn| {
            conn.execute(
                "INSERT INTO complaints (id, title, description, category, priority, status, \
                 user_id, assigned_agent_id, contact_phone, address, resolution, \
                 created_at, updated_at, resolved_at, closed_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15)",
                params![
                    c.id,
                    c.title,
                    c.description,
                    c.category.to_string(),
                    c.priority.to_string(),
                    c.status.to_string(),
                    c.user.id,
                    c.assigned_agent.as_ref().map(|a| a.id.clone()),
                    c.contact_phone,
                    c.address,
                    c.resolution,
                    c.created_at,
                    c.updated_at,
                    c.resolved_at,
                    c.closed_at,
                ],
            )?;
            Ok(())
        })
        .await
        .map_err(map_tr_err)
}

pub async fn get_complaint(db: &Database, id: &str) -> Result<Option<Complaint>, ResolveError> {
    let id = id.to_string();
    db.connection()
        .call(move |conn| fetch_complaint(conn, &id))
        .await
        .map_err(map_tr_err)
}

/// Complaints matching `filter`, newest first.
pub async fn list_complaints(
    db: &Database,
    filter: &ComplaintFilter,
    page: PageRequest,
) -> Result<Page<Complaint>, ResolveError> {
    let mut conditions = Conditions::default();
    if let Some(owner) = &filter.owner_id {
        conditions.push("c.user_id = ?", owner.clone());
    }
    if let Some(agent) = &filter.assigned_agent_id {
        conditions.push("c.assigned_agent_id = ?", agent.clone());
    }
    if let Some(status) = filter.status {
        conditions.push("c.status = ?", status.to_string());
    }
    if let Some(category) = filter.category {
        conditions.push("c.category = ?", category.to_string());
    }
    if let Some(priority) = filter.priority {
        conditions.push("c.priority = ?", priority.to_string());
    }

    db.connection()
        .call(move |conn| {
            let where_sql = conditions.where_sql();
            let total: i64 = conn.query_row(
                &format!("SELECT COUNT(*) FROM complaints c{where_sql}"),
                params_from_iter(conditions.values()),
                |row| row.get(0),
            )?;
            let mut stmt = conn.prepare(&format!(
                "{COMPLAINT_SELECT}{where_sql}
                 ORDER BY c.created_at DESC, c.rowid DESC LIMIT {} OFFSET {}",
                page.limit,
                page.offset()
            ))?;
            let items = stmt
                .query_map(params_from_iter(conditions.values()), complaint_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(Page {
                items,
                total: total as u64,
                request: page,
            })
        })
        .await
        .map_err(map_tr_err)
}

/// Set the assignee and force `in-progress`.
pub async fn assign(
    db: &Database,
    id: &str,
    agent_id: &str,
    at: &str,
) -> Result<Option<Complaint>, ResolveError> {
    let id = id.to_string();
    let agent_id = agent_id.to_string();
    let at = at.to_string();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE complaints SET assigned_agent_id = ?1, status = ?2, updated_at = ?3
                 WHERE id = ?4",
                params![agent_id, ComplaintStatus::InProgress.to_string(), at, id],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_complaint(conn, &id)
        })
        .await
        .map_err(map_tr_err)
}

/// One guarded lifecycle write: the status change, optional resolution
/// text, monotonic resolved/closed stamps, and the system message.
struct GuardedUpdate {
    id: String,
    agent_id: String,
    status: ComplaintStatus,
    resolution: Option<String>,
    allowed_from: Vec<ComplaintStatus>,
    system_message: Message,
}

fn apply_guarded(
    conn: &mut rusqlite::Connection,
    update: GuardedUpdate,
) -> rusqlite::Result<Option<Complaint>> {
    let now = update.system_message.created_at.clone();
    let mut sql = String::from(
        "UPDATE complaints SET
            status = ?1,
            updated_at = ?2,
            resolution = COALESCE(?5, resolution),
            resolved_at = CASE WHEN ?1 = 'resolved' THEN COALESCE(resolved_at, ?2)
                               ELSE resolved_at END,
            closed_at = CASE WHEN ?1 = 'closed' THEN COALESCE(closed_at, ?2)
                             ELSE closed_at END
         WHERE id = ?3 AND assigned_agent_id = ?4",
    );
    let mut values: Vec<Value> = vec![
        update.status.to_string().into(),
        now.into(),
        update.id.clone().into(),
        update.agent_id.into(),
        update.resolution.into(),
    ];
    if !update.allowed_from.is_empty() {
        sql.push_str(&format!(
            " AND status IN ({})",
            placeholders(values.len() + 1, update.allowed_from.len())
        ));
        values.extend(update.allowed_from.iter().map(|s| Value::from(s.to_string())));
    }

    let tx = conn.transaction()?;
    let changed = tx.execute(&sql, params_from_iter(values.iter()))?;
    if changed == 0 {
        return Ok(None);
    }
    insert_message_sync(&tx, &update.system_message)?;
    let complaint = fetch_complaint(&tx, &update.id)?;
    tx.commit()?;
    Ok(complaint)
}

pub async fn transition(
    db: &Database,
    id: &str,
    agent_id: &str,
    status: ComplaintStatus,
    allowed_from: &[ComplaintStatus],
    system_message: &Message,
) -> Result<Option<Complaint>, ResolveError> {
    let update = GuardedUpdate {
        id: id.to_string(),
        agent_id: agent_id.to_string(),
        status,
        resolution: None,
        allowed_from: allowed_from.to_vec(),
        system_message: system_message.clone(),
    };
    db.connection()
        .call(move |conn| apply_guarded(conn, update))
        .await
        .map_err(map_tr_err)
}

pub async fn resolve(
    db: &Database,
    id: &str,
    agent_id: &str,
    resolution: &str,
    allowed_from: &[ComplaintStatus],
    system_message: &Message,
) -> Result<Option<Complaint>, ResolveError> {
    let update = GuardedUpdate {
        id: id.to_string(),
        agent_id: agent_id.to_string(),
        status: ComplaintStatus::Resolved,
        resolution: Some(resolution.to_string()),
        allowed_from: allowed_from.to_vec(),
        system_message: system_message.clone(),
    };
    db.connection()
        .call(move |conn| apply_guarded(conn, update))
        .await
        .map_err(map_tr_err)
}

/// Store owner feedback on a resolved or closed complaint.
pub async fn set_feedback(
    db: &Database,
    id: &str,
    owner_id: &str,
    feedback: &Feedback,
) -> Result<Option<Complaint>, ResolveError> {
    let id = id.to_string();
    let owner_id = owner_id.to_string();
    let feedback = feedback.clone();
    db.connection()
        .call(move |conn| {
            let changed = conn.execute(
                "UPDATE complaints SET
                    feedback_rating = ?1,
                    feedback_comment = ?2,
                    feedback_submitted_at = ?3,
                    updated_at = ?3
                 WHERE id = ?4 AND user_id = ?5 AND status IN ('resolved', 'closed')",
                params![
                    feedback.rating,
                    feedback.comment,
                    feedback.submitted_at,
                    id,
                    owner_id
                ],
            )?;
            if changed == 0 {
                return Ok(None);
            }
            fetch_complaint(conn, &id)
        })
        .await
        .map_err(map_tr_err)
}
