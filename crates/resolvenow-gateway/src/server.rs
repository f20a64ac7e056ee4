// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Gateway HTTP server built on axum.
//!
//! Sets up routes, middleware, and shared state for the gateway.

use std::future::Future;
use std::sync::Arc;

use axum::Router;
use axum::http::HeaderValue;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::routing::{get, post, put};
use resolvenow_core::{ComplaintStore, ResolveError};
use resolvenow_realtime::ChannelRegistry;
use resolvenow_service::Desk;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{auth_middleware, require_admin, require_agent};
use crate::handlers::{admin, agent, auth, complaints, health};
use crate::ws;

/// State for the unauthenticated health and metrics endpoints.
#[derive(Clone)]
pub struct HealthState {
    /// Process start time for uptime calculation.
    pub start_time: std::time::Instant,
    /// Prometheus text renderer, when the exporter is enabled.
    pub prometheus_render: Option<Arc<dyn Fn() -> String + Send + Sync>>,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            start_time: std::time::Instant::now(),
            prometheus_render: None,
        }
    }
}

/// Shared state for axum request handlers.
#[derive(Clone)]
pub struct GatewayState {
    pub desk: Arc<Desk>,
    /// Store handle for health checks.
    pub store: Arc<dyn ComplaintStore>,
    /// Socket registry. Also the notifier the desk publishes through.
    pub registry: Arc<ChannelRegistry>,
    pub health: HealthState,
}

/// Listener settings.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Allowed CORS origins. Empty means permissive.
    pub cors_origins: Vec<String>,
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }
    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router.
///
/// - `/api/auth/*`: register and login are public, profile needs a token
/// - `/api/complaints/*`: any authenticated principal
/// - `/api/agent/*`: `agent` role
/// - `/api/admin/*`: `admin` role
/// - `/api/health`, `/metrics`: public
/// - `/ws`: token checked during the handshake
pub fn build_router(state: GatewayState, cors_origins: &[String]) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .merge(
            Router::new()
                .route("/profile", get(auth::profile).put(auth::update_profile))
                .route_layer(from_fn_with_state(state.clone(), auth_middleware)),
        );

    let complaint_routes = Router::new()
        .route("/", post(complaints::create))
        .route("/my-complaints", get(complaints::list_mine))
        .route("/stats", get(complaints::stats))
        .route("/{id}", get(complaints::get_one))
        .route(
            "/{id}/messages",
            get(complaints::list_messages).post(complaints::post_message),
        )
        .route("/{id}/messages/read", put(complaints::mark_read))
        .route("/{id}/feedback", put(complaints::feedback))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let agent_routes = Router::new()
        .route("/stats", get(agent::stats))
        .route("/assigned-complaints", get(agent::assigned))
        .route("/complaints/{id}", get(agent::get_one))
        .route("/complaints/{id}/status", put(agent::update_status))
        .route("/complaints/{id}/resolution", put(agent::resolve))
        .route("/complaints/{id}/messages", post(agent::post_message))
        .route_layer(from_fn(require_agent))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    let admin_routes = Router::new()
        .route("/stats", get(admin::stats))
        .route("/recent-complaints", get(admin::recent))
        .route("/complaints", get(admin::complaints))
        .route("/complaints/{id}/assign", put(admin::assign))
        .route("/users", get(admin::users))
        .route("/users/{id}/role", put(admin::set_role))
        .route("/users/{id}/status", put(admin::set_status))
        .route("/agents", get(admin::agents))
        .route_layer(from_fn(require_admin))
        .route_layer(from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .nest("/api/auth", auth_routes)
        .nest("/api/complaints", complaint_routes)
        .nest("/api/agent", agent_routes)
        .nest("/api/admin", admin_routes)
        .route("/api/health", get(health::health))
        .route("/metrics", get(health::metrics))
        .route("/ws", get(ws::ws_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
        .with_state(state)
}

/// Bind and serve until `shutdown` resolves.
pub async fn start_server(
    config: &ServerConfig,
    state: GatewayState,
    shutdown: impl Future<Output = ()> + Send + 'static,
) -> Result<(), ResolveError> {
    let app = build_router(state, &config.cors_origins);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| ResolveError::Internal(format!("failed to bind gateway to {addr}: {e}")))?;

    tracing::info!("gateway listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await
        .map_err(|e| ResolveError::Internal(format!("gateway server error: {e}")))?;

    Ok(())
}
