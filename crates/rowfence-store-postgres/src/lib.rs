// crates/rowfence-store-postgres/src/lib.rs
// ============================================================================
// Module: Rowfence Postgres Store
// Description: Postgres-backed chain store with native row-level security.
// Purpose: Enforce tenant isolation in the database rather than in queries.
// ============================================================================

//! ## Overview
//!
//! Postgres implementation of the rowfence chain store. Unlike the embedded
//! store, isolation here is enforced by the database itself: every
//! tenant-scoped table carries `ENABLE` and `FORCE ROW LEVEL SECURITY` plus a
//! policy comparing `account_id` against the session setting
//! `rowfence.account_id`. Queries issued by this crate carry no tenant
//! predicates of their own.
//!
//! With no session tenant set the accessor function returns NULL, no policy
//! matches, and every scoped read returns zero rows. The store fails closed.

pub mod postgres_store;

pub use postgres_store::PostgresChainStore;
pub use postgres_store::PostgresStoreConfig;
pub use postgres_store::PostgresStoreError;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
