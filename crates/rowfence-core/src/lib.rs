// crates/rowfence-core/src/lib.rs
// ============================================================================
// Module: RowFence Core
// Description: Tenant-isolation contract types, traits, and audit hooks.
// Purpose: Define the shared surface implemented by RowFence store backends.
// Dependencies: serde, serde_json, thiserror
// ============================================================================

//! ## Overview
//! RowFence enforces row-level tenant isolation in front of relational
//! storage. This crate defines the contract every backend satisfies: ambient
//! session-tenant operations, the tenant-scoped chain data model, the closed
//! table allow-list, the store error taxonomy, and audit sinks for session
//! and fixture activity.
//!
//! Security posture: store contents and table-name inputs are untrusted;
//! dynamic table names must pass the [`ChainTable`] allow-list before any SQL
//! is constructed, and absence of a session tenant fails closed.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod audit;
pub mod core;
pub mod interfaces;

// ============================================================================
// SECTION: Re-exports
// ============================================================================

pub use audit::FileAuditSink;
pub use audit::NoopAuditSink;
pub use audit::SessionAuditEvent;
pub use audit::StderrAuditSink;
pub use audit::StoreAuditSink;
pub use audit::SweepAuditEvent;
pub use core::identifiers::AccountId;
pub use core::identifiers::AssetId;
pub use core::identifiers::ControlId;
pub use core::identifiers::EvidenceId;
pub use core::identifiers::FindingId;
pub use core::identifiers::IntegrationId;
pub use core::identifiers::NotificationId;
pub use core::identifiers::PolicyId;
pub use core::identifiers::RemediationId;
pub use core::identifiers::ScanId;
pub use core::identifiers::TicketId;
pub use core::records::Account;
pub use core::records::Asset;
pub use core::records::Control;
pub use core::records::Evidence;
pub use core::records::Finding;
pub use core::records::FindingStatus;
pub use core::records::Integration;
pub use core::records::Notification;
pub use core::records::Policy;
pub use core::records::Remediation;
pub use core::records::RemediationStatus;
pub use core::records::Scan;
pub use core::records::ScanStatus;
pub use core::records::Severity;
pub use core::records::Ticket;
pub use core::records::TicketProvider;
pub use core::table::ChainTable;
pub use interfaces::ChainStore;
pub use interfaces::StoreError;
pub use interfaces::TenantSession;

/// Crate version string exposed for deployment sanity checks.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
