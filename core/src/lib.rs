// src/lib.rs

//! Storefront domain and storage layer.
//!
//! Everything the HTTP application needs short of transport concerns:
//!  - Entity models mapped to the relational schema.
//!  - An explicit per-request [`identity::Identity`] instead of ambient auth state.
//!  - The [`store::Store`] seam with PostgreSQL and in-memory implementations.
//!  - Cart operations: ownership resolution, line consolidation with price
//!    snapshots, and the session-to-user migration run at sign-in.
//!  - Favorites and reviews with their per-(user, product) uniqueness guards.
//!  - Read-side catalog browsing with search, filters and sort orders.

pub mod cart;
pub mod catalog;
pub mod error;
pub mod favorites;
pub mod identity;
pub mod models;
pub mod reviews;
pub mod store;

// --- Re-exports for the public API ---

pub use crate::error::{CoreError, CoreResult};
pub use crate::identity::{CartOwner, Identity};
pub use crate::store::{MemoryStore, PgStore, SharedStore, Store};
