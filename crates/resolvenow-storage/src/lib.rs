// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! SQLite persistence for ResolveNow.
//!
//! WAL-mode SQLite with embedded migrations and a single-writer model
//! through `tokio-rusqlite`. Multi-statement operations (a lifecycle update
//! plus its system message) run as one transaction on the writer thread,
//! so concurrent requests serialize here.

pub mod adapter;
pub mod database;
pub mod migrations;
pub mod queries;

pub use adapter::SqliteStore;
pub use database::Database;
