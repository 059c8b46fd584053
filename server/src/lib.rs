// server/src/lib.rs

//! HTTP application for the storefront: configuration, shared state,
//! request identity extraction and the REST surface over the
//! `storefront-core` domain layer.
//!
//! Library target so integration tests can mount the same route table
//! against an in-memory store; `main.rs` is a thin binary on top.

pub mod config;
pub mod errors;
pub mod services;
pub mod state;
pub mod web;

pub use crate::config::{AppConfig, StoreBackend};
pub use crate::errors::ApiError;
pub use crate::state::AppState;
