#![deny(unused)]
//! HTTP gateway for Radny AI.
//!
//! Exposes the orchestration engine over Axum: a gate-routed query endpoint,
//! a classification debug endpoint, and a health check.

pub mod server;
pub mod telemetry;

pub use server::{GatewayConfig, GatewayServer};
pub use telemetry::configure_tracing;
