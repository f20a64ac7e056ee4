// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dashboard counters. Each call is a read-only snapshot.

use std::sync::Arc;

use resolvenow_core::types::{StatsScope, StatusCounts};
use resolvenow_core::{ComplaintStore, ResolveError, Role};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GlobalStats {
    pub total_complaints: u64,
    pub total_users: u64,
    pub total_agents: u64,
    pub pending_complaints: u64,
    pub in_progress_complaints: u64,
    pub resolved_complaints: u64,
    pub closed_complaints: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AgentStats {
    pub assigned_complaints: u64,
    pub pending_complaints: u64,
    pub in_progress_complaints: u64,
    pub resolved_complaints: u64,
    pub closed_complaints: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    pub total_complaints: u64,
    pub pending_complaints: u64,
    pub in_progress_complaints: u64,
    pub resolved_complaints: u64,
    pub closed_complaints: u64,
}

impl From<StatusCounts> for UserStats {
    fn from(c: StatusCounts) -> Self {
        Self {
            total_complaints: c.total(),
            pending_complaints: c.pending,
            in_progress_complaints: c.in_progress,
            resolved_complaints: c.resolved,
            closed_complaints: c.closed,
        }
    }
}

impl From<StatusCounts> for AgentStats {
    fn from(c: StatusCounts) -> Self {
        Self {
            assigned_complaints: c.total(),
            pending_complaints: c.pending,
            in_progress_complaints: c.in_progress,
            resolved_complaints: c.resolved,
            closed_complaints: c.closed,
        }
    }
}

pub struct StatsAggregator {
    store: Arc<dyn ComplaintStore>,
}

impl StatsAggregator {
    pub fn new(store: Arc<dyn ComplaintStore>) -> Self {
        Self { store }
    }

    /// Every complaint by status, plus user and agent head counts.
    pub async fn global(&self) -> Result<GlobalStats, ResolveError> {
        let counts = self.store.count_by_status(&StatsScope::All).await?;
        let total_users = self.store.count_users(Role::User).await?;
        let total_agents = self.store.count_users(Role::Agent).await?;
        Ok(GlobalStats {
            total_complaints: counts.total(),
            total_users,
            total_agents,
            pending_complaints: counts.pending,
            in_progress_complaints: counts.in_progress,
            resolved_complaints: counts.resolved,
            closed_complaints: counts.closed,
        })
    }

    pub async fn agent(&self, agent_id: &str) -> Result<AgentStats, ResolveError> {
        let counts = self
            .store
            .count_by_status(&StatsScope::Assignee(agent_id.to_string()))
            .await?;
        Ok(counts.into())
    }

    pub async fn user(&self, user_id: &str) -> Result<UserStats, ResolveError> {
        let counts = self
            .store
            .count_by_status(&StatsScope::Owner(user_id.to_string()))
            .await?;
        Ok(counts.into())
    }
}
