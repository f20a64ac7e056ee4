// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Test utilities for ResolveNow integration tests.
//!
//! [`TestHarness`] assembles the full stack (temp SQLite store, socket
//! registry, service desk, gateway router) with one account per role.

pub mod harness;

pub use harness::{Account, TestHarness, TestHarnessBuilder};
