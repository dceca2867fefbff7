// system-tests/src/config/mod.rs
// ============================================================================
// Module: System Test Configuration
// Description: Centralized configuration for RowFence acceptance suites.
// Purpose: Provide typed access to database test settings and defaults.
// Dependencies: std
// ============================================================================

//! ## Overview
//! Acceptance-suite configuration is read from environment variables and
//! mapped into a small typed structure for reuse across suites.
//! Security posture: environment inputs are untrusted.

// ============================================================================
// SECTION: Modules
// ============================================================================

mod env;

// ============================================================================
// SECTION: Tests
// ============================================================================


// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use env::DbEnv;
pub use env::DbTestConfig;
pub use env::read_env_strict;
