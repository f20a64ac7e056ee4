// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Business operations for ResolveNow.
//!
//! The managers here are written against the [`ComplaintStore`] and
//! [`Notifier`] traits. Each operation checks input and access, performs
//! one storage write, then publishes at most one realtime event.

pub mod access;
pub mod accounts;
pub mod lifecycle;
pub mod stats;
pub mod thread;
pub mod validation;

#[cfg(test)]
mod testing;

use std::sync::Arc;

use resolvenow_auth::{AuthGate, TokenIssuer};
use resolvenow_config::ResolveNowConfig;
use resolvenow_core::{ComplaintStore, Notifier};

pub use accounts::{AccountManager, Session};
pub use lifecycle::LifecycleManager;
pub use stats::{AgentStats, GlobalStats, StatsAggregator, UserStats};
pub use thread::ThreadManager;

/// Every manager, wired to one store and one notifier.
pub struct Desk {
    pub gate: Arc<AuthGate>,
    pub lifecycle: LifecycleManager,
    pub threads: ThreadManager,
    pub stats: StatsAggregator,
    pub accounts: AccountManager,
}

impl Desk {
    pub fn new(
        store: Arc<dyn ComplaintStore>,
        notifier: Arc<dyn Notifier>,
        config: &ResolveNowConfig,
    ) -> Self {
        let gate = Arc::new(AuthGate::new(
            store.clone(),
            TokenIssuer::from_config(&config.auth),
        ));
        Self {
            lifecycle: LifecycleManager::new(store.clone(), notifier.clone(), &config.lifecycle),
            threads: ThreadManager::new(store.clone(), notifier),
            stats: StatsAggregator::new(store.clone()),
            accounts: AccountManager::new(store, gate.clone()),
            gate,
        }
    }
}
