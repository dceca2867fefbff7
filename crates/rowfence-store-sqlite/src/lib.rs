// crates/rowfence-store-sqlite/src/lib.rs
// ============================================================================
// Module: RowFence SQLite Store
// Description: Embedded tenant-isolation enforcement engine over SQLite.
// Purpose: Realize the session-tenant contract by predicate construction.
// Dependencies: rowfence-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! `SQLite` has no native row-level security, so this crate enforces the
//! contract by construction: every statement against a tenant-scoped table is
//! built with the ambient tenant predicate, and writes are denied locally
//! before any SQL executes unless the record's account matches the session
//! tenant. With no session tenant the predicate is unsatisfiable and reads
//! see zero rows.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod store;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use store::SqliteChainStore;
pub use store::SqliteStoreConfig;
pub use store::SqliteStoreError;
pub use store::SqliteStoreMode;
pub use store::SqliteSyncMode;

/// Crate version string exposed for deployment sanity checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
