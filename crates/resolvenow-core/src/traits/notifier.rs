// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Realtime fan-out seam.

use crate::types::{RealtimeEvent, Scope};

/// Best-effort, at-most-once event publisher.
///
/// Implementations must not block and must not fail the caller: a frame
/// that cannot be delivered is dropped.
pub trait Notifier: Send + Sync + 'static {
    /// Publish `event` to `scope`. Returns the number of connections the
    /// frame was queued for.
    fn publish(&self, scope: Scope, event: RealtimeEvent) -> usize;
}

/// Notifier that drops every event. Used when realtime is not wired.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn publish(&self, _scope: Scope, _event: RealtimeEvent) -> usize {
        0
    }
}
