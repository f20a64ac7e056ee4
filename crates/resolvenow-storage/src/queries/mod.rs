// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Typed query modules. Each function runs as one closure on the
//! connection thread.

pub mod complaints;
pub mod messages;
pub mod stats;
pub mod users;

use std::str::FromStr;

use rusqlite::Row;
use rusqlite::types::{Type, Value};

/// Read a text column and parse it into one of the domain enums.
pub(crate) fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let raw: String = row.get(idx)?;
    raw.parse()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Accumulates `AND`-joined conditions with their positional values.
#[derive(Default)]
pub(crate) struct Conditions {
    clauses: Vec<String>,
    values: Vec<Value>,
}

impl Conditions {
    pub(crate) fn push(&mut self, clause: &str, value: impl Into<Value>) {
        self.clauses.push(clause.to_string());
        self.values.push(value.into());
    }

    pub(crate) fn where_sql(&self) -> String {
        if self.clauses.is_empty() {
            String::new()
        } else {
            format!(" WHERE {}", self.clauses.join(" AND "))
        }
    }

    pub(crate) fn values(&self) -> &[Value] {
        &self.values
    }
}

/// Numbered placeholders `?first, ?first+1, ...`.
pub(crate) fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|n| format!("?{n}"))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_conditions_render_nothing() {
        assert_eq!(Conditions::default().where_sql(), "");
    }

    #[test]
    fn conditions_join_with_and() {
        let mut c = Conditions::default();
        c.push("a = ?", "x".to_string());
        c.push("b = ?", 1i64);
        assert_eq!(c.where_sql(), " WHERE a = ? AND b = ?");
        assert_eq!(c.values().len(), 2);
    }

    #[test]
    fn numbered_placeholders() {
        assert_eq!(placeholders(5, 3), "?5, ?6, ?7");
        assert_eq!(placeholders(1, 0), "");
    }
}
