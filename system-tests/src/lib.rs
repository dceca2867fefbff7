// system-tests/src/lib.rs
// ============================================================================
// Module: RowFence System Tests Library
// Description: Shared configuration and helpers for acceptance suites.
// Purpose: Provide common utilities for RowFence system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the RowFence acceptance
//! suites in `system-tests/tests`. The Postgres suite is opt-in: it only runs
//! when `ROWFENCE_DB_LOCAL_TEST` is set and a local database is reachable.
//! Security posture: environment inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;
