// crates/rowfence-core/src/core/mod.rs
// ============================================================================
// Module: RowFence Core Types
// Description: Identifiers, chain records, and the table allow-list.
// Purpose: Group the data-model types shared by all store backends.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Core data-model types for the tenant-isolation contract. Identifiers are
//! opaque strings, records carry their owning `account_id` explicitly, and
//! [`table::ChainTable`] closes the set of tenant-scoped table names.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod identifiers;
pub mod records;
pub mod table;
