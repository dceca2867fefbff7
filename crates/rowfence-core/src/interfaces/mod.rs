// crates/rowfence-core/src/interfaces/mod.rs
// ============================================================================
// Module: RowFence Interfaces
// Description: Backend-agnostic contracts for session scoping and storage.
// Purpose: Define the surfaces every RowFence store backend implements.
// Dependencies: crate::core
// ============================================================================

//! ## Overview
//! Interfaces define how callers drive a tenant-isolated store without
//! embedding backend-specific details. Implementations must fail closed: with
//! no session tenant, reads against tenant-scoped tables return zero rows and
//! writes are denied. A session tenant that matches no stored account is not
//! an error; it scopes every tenant-bound query to zero rows.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

use crate::core::identifiers::AccountId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::EvidenceId;
use crate::core::identifiers::FindingId;
use crate::core::identifiers::RemediationId;
use crate::core::identifiers::ScanId;
use crate::core::identifiers::TicketId;
use crate::core::records::Account;
use crate::core::records::Asset;
use crate::core::records::Control;
use crate::core::records::Evidence;
use crate::core::records::Finding;
use crate::core::records::Integration;
use crate::core::records::Notification;
use crate::core::records::Policy;
use crate::core::records::Remediation;
use crate::core::records::Scan;
use crate::core::records::Ticket;
use crate::core::table::ChainTable;

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Chain store errors.
///
/// # Invariants
/// - Variants are stable for programmatic handling.
/// - Error messages avoid embedding row payloads.
#[derive(Debug, Error, Clone)]
pub enum StoreError {
    /// Driver or database failure.
    #[error("chain store db error: {0}")]
    Db(String),
    /// Local validation failure, including allow-list rejection.
    #[error("chain store invalid data: {0}")]
    Invalid(String),
    /// Write attempted without a matching session tenant.
    #[error("chain store denied: {0}")]
    Denied(String),
    /// Store I/O error.
    #[error("chain store io error: {0}")]
    Io(String),
    /// Store schema version mismatch.
    #[error("chain store version mismatch: {0}")]
    VersionMismatch(String),
}

// ============================================================================
// SECTION: Tenant Session
// ============================================================================

/// Ambient session-tenant operations.
///
/// The session moves between exactly three states: no context, context = T,
/// and context = some other tenant. The two mutating operations below are the
/// only transitions, and a fresh session starts with no context.
pub trait TenantSession {
    /// Scopes subsequent reads and writes against tenant-scoped tables to
    /// rows where `account_id` equals `account_id`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session variable cannot be set.
    fn set_session_account(&self, account_id: &AccountId) -> Result<(), StoreError>;

    /// Clears the session tenant; subsequent reads return zero rows.
    ///
    /// Absence of a tenant context must never imply unrestricted access.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session variable cannot be reset.
    fn clear_session_account(&self) -> Result<(), StoreError>;

    /// Returns the active session tenant, if any.
    ///
    /// Callers use this to build tenant-bound predicates without passing the
    /// account on every query.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the session variable cannot be read.
    fn current_account(&self) -> Result<Option<AccountId>, StoreError>;
}

// ============================================================================
// SECTION: Chain Store
// ============================================================================

/// Tenant-isolated chain storage.
///
/// # Invariants
/// - Reads and deletes against tenant-scoped tables are restricted to rows
///   owned by the ambient session tenant; with no session tenant they see
///   zero rows.
/// - Writes to tenant-scoped tables require an active session tenant equal to
///   the record's `account_id` and fail with [`StoreError::Denied`] otherwise.
/// - Account and control operations are unscoped.
pub trait ChainStore: TenantSession {
    /// Inserts an account (unscoped).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_account(&self, account: &Account) -> Result<(), StoreError>;

    /// Inserts a control row (unscoped).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the insert fails.
    fn insert_control(&self, control: &Control) -> Result<(), StoreError>;

    /// Inserts a scan under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_scan(&self, scan: &Scan) -> Result<(), StoreError>;

    /// Inserts a policy under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_policy(&self, policy: &Policy) -> Result<(), StoreError>;

    /// Inserts an asset under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError>;

    /// Inserts a finding under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_finding(&self, finding: &Finding) -> Result<(), StoreError>;

    /// Inserts evidence under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_evidence(&self, evidence: &Evidence) -> Result<(), StoreError>;

    /// Inserts a remediation under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_remediation(&self, remediation: &Remediation) -> Result<(), StoreError>;

    /// Inserts a ticket under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError>;

    /// Inserts an integration under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_integration(&self, integration: &Integration) -> Result<(), StoreError>;

    /// Inserts a notification under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no matching session tenant is
    /// active, or [`StoreError`] when the insert fails.
    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError>;

    /// Counts rows visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the count query fails.
    fn count_rows(&self, table: ChainTable) -> Result<u64, StoreError>;

    /// Reads back a scan visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or stored data is invalid.
    fn scan(&self, id: &ScanId) -> Result<Option<Scan>, StoreError>;

    /// Reads back a finding visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or stored data is invalid.
    fn finding(&self, id: &FindingId) -> Result<Option<Finding>, StoreError>;

    /// Reads back evidence visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or stored data is invalid.
    fn evidence(&self, id: &EvidenceId) -> Result<Option<Evidence>, StoreError>;

    /// Reads back a remediation visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or stored data is invalid.
    fn remediation(&self, id: &RemediationId) -> Result<Option<Remediation>, StoreError>;

    /// Reads back a ticket visible under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails or stored data is invalid.
    fn ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError>;

    /// Reads back a control row (unscoped).
    ///
    /// Control rows are global reference data, visible independent of the
    /// session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the query fails.
    fn control(&self, id: &ControlId) -> Result<Option<Control>, StoreError>;

    /// Deletes rows owned by the ambient session tenant.
    ///
    /// Returns the number of rows deleted; deleting from an already-empty
    /// table is a no-op, so teardown sweeps are idempotent.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_rows(&self, table: ChainTable) -> Result<u64, StoreError>;

    /// Deletes a control row (unscoped); no-op on absence.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_control(&self, id: &ControlId) -> Result<u64, StoreError>;

    /// Deletes an account row (unscoped); no-op on absence.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the delete fails.
    fn delete_account(&self, id: &AccountId) -> Result<u64, StoreError>;

    /// Executes a seed script verbatim under the ambient session tenant.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Denied`] when no session tenant is active, or
    /// [`StoreError`] when the script fails to execute.
    fn load_fixture(&self, sql: &str) -> Result<(), StoreError>;
}
