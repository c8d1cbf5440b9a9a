// SPDX-FileCopyrightText: 2026 Pawdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! REST gateway over the Pawdesk booking engine.
//!
//! Staff dashboards and the customer app talk to the platform through this
//! HTTP surface. The gateway owns nothing but the wire shapes and the
//! error-to-status mapping; every decision is delegated to `pawdesk-engine`.

pub mod handlers;
pub mod server;

pub use server::{GatewayState, ServerConfig, build_router, start_server};
