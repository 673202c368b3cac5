//! HTTP layer for framescope: axum handlers, router, and configuration.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
