//! Domain types and validation helpers for framescope.
//!
//! This crate has no HTTP or SQL dependencies so it can be used by the API
//! layer, the database layer, and any future CLI tooling.

pub mod browse;
pub mod error;
pub mod manifest;

pub use error::CoreError;
