// crates/rowfence-config/src/lib.rs
// ============================================================================
// Module: RowFence Config
// Description: Canonical TOML configuration for store backends and auditing.
// Purpose: Load and validate configuration with fail-closed input handling.
// ============================================================================

//! ## Overview
//!
//! Configuration for the rowfence workspace: which store backends to use and
//! how to audit them, loaded from TOML. Loading is strict: the path, file
//! size, and encoding are validated before parsing, and every section is
//! validated after. Absent files yield defaults; invalid files never do.

pub mod config;

pub use config::AuditSection;
pub use config::AuditSinkKind;
pub use config::CONFIG_ENV_VAR;
pub use config::ConfigError;
pub use config::DEFAULT_CONFIG_NAME;
pub use config::MAX_CONFIG_FILE_SIZE;
pub use config::RowfenceConfig;
pub use config::StoreSection;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
