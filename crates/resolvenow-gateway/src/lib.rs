// SPDX-FileCopyrightText: 2026 ResolveNow Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST and WebSocket gateway.
//!
//! Routes are thin: each handler extracts the principal and request body,
//! calls one [`resolvenow_service::Desk`] operation, and shapes the JSON
//! response. Errors map to HTTP through [`ApiError`].

pub mod auth;
pub mod error;
pub mod extract;
pub mod handlers;
pub mod server;
pub mod ws;

pub use error::{ApiError, ErrorResponse};
pub use server::{GatewayState, HealthState, ServerConfig, build_router, start_server};
