// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime notifier for ResolveNow.
//!
//! [`ChannelRegistry`] tracks open sockets and their complaint channel
//! memberships and implements [`Notifier`](resolvenow_core::Notifier) with
//! best-effort, at-most-once delivery over bounded per-connection queues.

pub mod frames;
pub mod registry;

pub use frames::ClientFrame;
pub use registry::{ChannelRegistry, Registration};
