// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Metric descriptions and recording helpers.
//!
//! Written against the metrics-rs facade; without an installed recorder
//! every call is a no-op.

use metrics::{describe_counter, describe_gauge};

/// Register metric descriptions. Called once after the recorder is installed.
pub fn register_metrics() {
    describe_counter!(
        "resolvenow_complaints_created_total",
        "Complaints filed, by category"
    );
    describe_counter!(
        "resolvenow_status_transitions_total",
        "Lifecycle status changes, by target status"
    );
    describe_counter!(
        "resolvenow_messages_posted_total",
        "Thread messages posted, by sender tag"
    );
    describe_counter!(
        "resolvenow_realtime_frames_dropped_total",
        "Realtime frames dropped on full or closed queues"
    );
    describe_gauge!(
        "resolvenow_realtime_connections",
        "Open realtime connections"
    );
    describe_gauge!(
        "resolvenow_memory_allocated_bytes",
        "Bytes allocated by the application (jemalloc)"
    );
    describe_gauge!(
        "resolvenow_memory_resident_bytes",
        "Resident bytes reported by jemalloc"
    );
}

pub fn record_complaint_created(category: &str) {
    metrics::counter!("resolvenow_complaints_created_total", "category" => category.to_string())
        .increment(1);
}

pub fn record_transition(status: &str) {
    metrics::counter!("resolvenow_status_transitions_total", "status" => status.to_string())
        .increment(1);
}

pub fn record_message_posted(sender: &str) {
    metrics::counter!("resolvenow_messages_posted_total", "sender" => sender.to_string())
        .increment(1);
}

pub fn record_frames_dropped(count: u64) {
    metrics::counter!("resolvenow_realtime_frames_dropped_total").increment(count);
}

pub fn set_realtime_connections(count: f64) {
    metrics::gauge!("resolvenow_realtime_connections").set(count);
}

pub fn set_memory_allocated(bytes: f64) {
    metrics::gauge!("resolvenow_memory_allocated_bytes").set(bytes);
}

pub fn set_memory_resident(bytes: f64) {
    metrics::gauge!("resolvenow_memory_resident_bytes").set(bytes);
}

#[cfg(test)]
mod tests {
    use super::*;
    use metrics_exporter_prometheus::PrometheusBuilder;

    #[test]
    fn helpers_record_into_local_recorder() {
        let recorder = PrometheusBuilder::new().build_recorder();
        let handle = recorder.handle();
        metrics::with_local_recorder(&recorder, || {
            register_metrics();
            record_complaint_created("Billing Problem");
            record_transition("in-progress");
            record_transition("in-progress");
            record_message_posted("agent");
            set_realtime_connections(3.0);
        });

        let text = handle.render();
        assert!(text.contains("resolvenow_complaints_created_total{category=\"Billing Problem\"} 1"));
        assert!(text.contains("resolvenow_status_transitions_total{status=\"in-progress\"} 2"));
        assert!(text.contains("resolvenow_messages_posted_total{sender=\"agent\"} 1"));
        assert!(text.contains("resolvenow_realtime_connections 3"));
    }

    #[test]
    fn helpers_are_noops_without_recorder() {
        record_frames_dropped(5);
        set_memory_allocated(1024.0);
        set_memory_resident(2048.0);
    }
}
