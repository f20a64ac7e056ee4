// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Prometheus exporter for ResolveNow.
//!
//! Metrics flow through the metrics-rs facade; the adapter installs the
//! Prometheus recorder and renders text exposition for `GET /metrics`.

pub mod recording;

use async_trait::async_trait;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};

use resolvenow_core::types::HealthStatus;
use resolvenow_core::{PluginAdapter, ResolveError};

pub use recording::{
    record_complaint_created, record_frames_dropped, record_message_posted, record_transition,
    set_memory_allocated, set_memory_resident, set_realtime_connections,
};

/// Owns the process-wide Prometheus recorder handle.
pub struct PrometheusAdapter {
    handle: PrometheusHandle,
}

impl PrometheusAdapter {
    /// Install the recorder globally. Fails if a recorder is already set.
    pub fn new() -> Result<Self, ResolveError> {
        let handle = PrometheusBuilder::new().install_recorder().map_err(|e| {
            ResolveError::Internal(format!("failed to install Prometheus recorder: {e}"))
        })?;
        recording::register_metrics();
        tracing::info!("prometheus metrics recorder installed");
        Ok(Self { handle })
    }

    pub fn handle(&self) -> &PrometheusHandle {
        &self.handle
    }

    pub fn render(&self) -> String {
        self.handle.render()
    }
}

#[async_trait]
impl PluginAdapter for PrometheusAdapter {
    fn name(&self) -> &str {
        "prometheus"
    }

    fn version(&self) -> semver::Version {
        semver::Version::new(0, 1, 0)
    }

    async fn health_check(&self) -> Result<HealthStatus, ResolveError> {
        Ok(HealthStatus::Healthy)
    }

    async fn shutdown(&self) -> Result<(), ResolveError> {
        Ok(())
    }
}
