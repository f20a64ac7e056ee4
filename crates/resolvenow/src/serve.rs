// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `resolvenow serve` command implementation.
//!
//! Opens the SQLite store, wires the service desk to the realtime registry,
//! and serves the gateway until SIGINT or SIGTERM.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use resolvenow_config::ResolveNowConfig;
use resolvenow_core::{PluginAdapter, ResolveError};
use resolvenow_gateway::{GatewayState, HealthState, ServerConfig, start_server};
use resolvenow_prometheus::PrometheusAdapter;
use resolvenow_realtime::ChannelRegistry;
use resolvenow_service::Desk;
use resolvenow_storage::SqliteStore;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::shutdown;

type MetricsRender = Arc<dyn Fn() -> String + Send + Sync>;

pub async fn run_serve(config: ResolveNowConfig) -> Result<(), ResolveError> {
    init_tracing(&config.server.log_level);

    info!(version = env!("CARGO_PKG_VERSION"), "starting resolvenow serve");

    let prometheus_render: Option<MetricsRender> = if config.prometheus.enabled {
        let adapter = PrometheusAdapter::new()?;
        let render: MetricsRender = Arc::new(move || adapter.render());
        Some(render)
    } else {
        info!("prometheus exporter disabled");
        None
    };

    ensure_parent_dir(&config.storage.database_path)?;
    let store = Arc::new(SqliteStore::open(config.storage.clone()).await?);
    info!(path = %config.storage.database_path, "storage ready");

    let registry = Arc::new(ChannelRegistry::new(config.realtime.outbound_buffer));
    let desk = Arc::new(Desk::new(store.clone(), registry.clone(), &config));
    if config.lifecycle.enforce_forward_transitions {
        info!("forward-only status transitions enforced");
    }

    let cancel = shutdown::install_signal_handler();

    if prometheus_render.is_some() {
        let mem_cancel = cancel.clone();
        tokio::spawn(async move {
            memory_monitor(mem_cancel).await;
        });
    }

    let state = GatewayState {
        desk,
        store: store.clone(),
        registry,
        health: HealthState {
            prometheus_render,
            ..HealthState::default()
        },
    };
    let server_config = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
        cors_origins: config.server.cors_origins.clone(),
    };

    let served = start_server(&server_config, state, cancel.clone().cancelled_owned()).await;
    cancel.cancel();

    if let Err(e) = store.shutdown().await {
        warn!(error = %e, "storage shutdown failed");
    }
    served?;

    info!("resolvenow serve shutdown complete");
    Ok(())
}

/// Create the database directory if the path has one.
pub(crate) fn ensure_parent_dir(database_path: &str) -> Result<(), ResolveError> {
    match Path::new(database_path).parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            std::fs::create_dir_all(dir).map_err(ResolveError::storage)
        }
        _ => Ok(()),
    }
}

/// Export jemalloc heap gauges every 5 seconds.
#[cfg(not(target_env = "msvc"))]
async fn memory_monitor(cancel: CancellationToken) {
    let mut interval = tokio::time::interval(Duration::from_secs(5));

    loop {
        tokio::select! {
            _ = interval.tick() => {
                // Stats are cached until the epoch advances.
                let _ = tikv_jemalloc_ctl::epoch::advance();
                let allocated = tikv_jemalloc_ctl::stats::allocated::read().unwrap_or(0);
                let resident = tikv_jemalloc_ctl::stats::resident::read().unwrap_or(0);
                resolvenow_prometheus::set_memory_allocated(allocated as f64);
                resolvenow_prometheus::set_memory_resident(resident as f64);
            }
            _ = cancel.cancelled() => {
                info!("memory monitor shutting down");
                break;
            }
        }
    }
}

#[cfg(target_env = "msvc")]
async fn memory_monitor(cancel: CancellationToken) {
    cancel.cancelled().await;
}

/// Initializes the tracing subscriber with the given log level.
fn init_tracing(log_level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("resolvenow={log_level},warn")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_thread_names(false)
        .init();
}
