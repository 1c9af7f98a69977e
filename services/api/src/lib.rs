//! services/api/src/lib.rs
//!
//! The library behind the `api` and `openapi` binaries: configuration,
//! adapters for the core ports, and the Axum web layer.

pub mod adapters;
pub mod config;
pub mod error;
pub mod web;
