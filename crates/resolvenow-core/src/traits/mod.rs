// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Collaborator traits consumed by the managers.

pub mod adapter;
pub mod notifier;
pub mod store;

pub use adapter::PluginAdapter;
pub use notifier::{Notifier, NullNotifier};
pub use store::ComplaintStore;
