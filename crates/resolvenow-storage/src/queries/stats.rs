// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Status aggregation.

use resolvenow_core::ResolveError;
use resolvenow_core::types::{ComplaintStatus, StatsScope, StatusCounts};
use rusqlite::params_from_iter;
use rusqlite::types::Value;

use crate::database::{Database, map_tr_err};
use crate::queries::parse_column;

/// Complaint counts grouped by status, in one snapshot query.
pub async fn count_by_status(db: &Database, scope: &StatsScope) -> Result<StatusCounts, ResolveError> {
    let (where_sql, values): (&str, Vec<Value>) = match scope {
        StatsScope::All => ("", Vec::new()),
        StatsScope::Owner(id) => (" WHERE user_id = ?1", vec![id.clone().into()]),
        StatsScope::Assignee(id) => (" WHERE assigned_agent_id = ?1", vec![id.clone().into()]),
    };
    let sql = format!("SELECT status, COUNT(*) FROM complaints{where_sql} GROUP BY status");

    db.connection()
        .call(move |conn| {
            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt.query_map(params_from_iter(values.iter()), |row| {
                let status: ComplaintStatus = parse_column(row, 0)?;
                let count: i64 = row.get(1)?;
                Ok((status, count as u64))
            })?;
            let mut counts = StatusCounts::default();
            for row in rows {
                let (status, count) = row?;
                counts.add(status, count);
            }
            Ok(counts)
        })
        .await
        .map_err(map_tr_err)
}
