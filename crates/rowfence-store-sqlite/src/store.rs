// crates/rowfence-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Chain Store
// Description: Embedded ChainStore enforcing tenant isolation per statement.
// Purpose: Provide the isolation contract without native RLS support.
// Dependencies: rowfence-core, rusqlite, serde, thiserror
// ============================================================================

//! ## Overview
//! This module implements [`ChainStore`] over `SQLite`. Session state is held
//! by the store; reads against tenant-scoped tables always carry an
//! `account_id = ?` predicate bound to the current session tenant, so an
//! unset session binds NULL and matches nothing (fail-closed). Writes require
//! an active session tenant equal to the record's `account_id` and are denied
//! locally before SQL executes. Security posture: database contents and
//! fixture scripts are untrusted, so fixture batches run inside a transaction
//! with temporary triggers that abort any tenant-scoped write whose
//! `account_id` differs from the session tenant.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::Mutex;

use rowfence_core::Account;
use rowfence_core::AccountId;
use rowfence_core::Asset;
use rowfence_core::ChainStore;
use rowfence_core::ChainTable;
use rowfence_core::Control;
use rowfence_core::ControlId;
use rowfence_core::Evidence;
use rowfence_core::EvidenceId;
use rowfence_core::Finding;
use rowfence_core::FindingId;
use rowfence_core::FindingStatus;
use rowfence_core::Integration;
use rowfence_core::NoopAuditSink;
use rowfence_core::Notification;
use rowfence_core::Policy;
use rowfence_core::Remediation;
use rowfence_core::RemediationId;
use rowfence_core::RemediationStatus;
use rowfence_core::Scan;
use rowfence_core::ScanId;
use rowfence_core::ScanStatus;
use rowfence_core::SessionAuditEvent;
use rowfence_core::Severity;
use rowfence_core::StoreAuditSink;
use rowfence_core::StoreError;
use rowfence_core::SweepAuditEvent;
use rowfence_core::TenantSession;
use rowfence_core::Ticket;
use rowfence_core::TicketId;
use rowfence_core::TicketProvider;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;
use serde::Deserialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for the store.
const SCHEMA_VERSION: i64 = 1;
/// Default busy timeout (ms).
const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;
/// Maximum length of a single path component.
const MAX_PATH_COMPONENT_LENGTH: usize = 255;
/// Maximum total path length.
const MAX_TOTAL_PATH_LENGTH: usize = 4096;
/// Abort message raised by the fixture write guards.
const FIXTURE_GUARD_MESSAGE: &str = "fixture write outside session tenant";

/// Schema bootstrap executed inside the initialization transaction.
const SCHEMA_SQL: &str = "CREATE TABLE IF NOT EXISTS store_meta (key TEXT PRIMARY KEY, value \
                          INTEGER NOT NULL);
                          CREATE TABLE IF NOT EXISTS account (id TEXT PRIMARY KEY, name TEXT NOT \
                          NULL);
                          CREATE TABLE IF NOT EXISTS control (id TEXT PRIMARY KEY, title TEXT \
                          NOT NULL);
                          CREATE TABLE IF NOT EXISTS scan (account_id TEXT NOT NULL, id TEXT NOT \
                          NULL, status TEXT NOT NULL, control_set_id TEXT NOT NULL, PRIMARY KEY \
                          (account_id, id));
                          CREATE TABLE IF NOT EXISTS policy (account_id TEXT NOT NULL, id TEXT \
                          NOT NULL, name TEXT NOT NULL, PRIMARY KEY (account_id, id));
                          CREATE TABLE IF NOT EXISTS asset (account_id TEXT NOT NULL, id TEXT \
                          NOT NULL, kind TEXT NOT NULL, PRIMARY KEY (account_id, id));
                          CREATE TABLE IF NOT EXISTS finding (account_id TEXT NOT NULL, id TEXT \
                          NOT NULL, scan_id TEXT NOT NULL, asset_id TEXT NOT NULL, status TEXT \
                          NOT NULL, severity TEXT NOT NULL, PRIMARY KEY (account_id, id), \
                          FOREIGN KEY (account_id, scan_id) REFERENCES scan (account_id, id), \
                          FOREIGN KEY (account_id, asset_id) REFERENCES asset (account_id, id));
                          CREATE TABLE IF NOT EXISTS evidence (account_id TEXT NOT NULL, id TEXT \
                          NOT NULL, finding_id TEXT NOT NULL, detail TEXT, PRIMARY KEY \
                          (account_id, id), FOREIGN KEY (account_id, finding_id) REFERENCES \
                          finding (account_id, id));
                          CREATE TABLE IF NOT EXISTS remediation (account_id TEXT NOT NULL, id \
                          TEXT NOT NULL, finding_id TEXT NOT NULL, status TEXT NOT NULL, PRIMARY \
                          KEY (account_id, id), FOREIGN KEY (account_id, finding_id) REFERENCES \
                          finding (account_id, id));
                          CREATE TABLE IF NOT EXISTS ticket (account_id TEXT NOT NULL, id TEXT \
                          NOT NULL, finding_id TEXT NOT NULL, provider TEXT NOT NULL, \
                          external_key TEXT NOT NULL, PRIMARY KEY (account_id, id), FOREIGN KEY \
                          (account_id, finding_id) REFERENCES finding (account_id, id));
                          CREATE TABLE IF NOT EXISTS integration (account_id TEXT NOT NULL, id \
                          TEXT NOT NULL, provider TEXT NOT NULL, PRIMARY KEY (account_id, id));
                          CREATE TABLE IF NOT EXISTS notification (account_id TEXT NOT NULL, id \
                          TEXT NOT NULL, finding_id TEXT NOT NULL, channel TEXT NOT NULL, \
                          PRIMARY KEY (account_id, id), FOREIGN KEY (account_id, finding_id) \
                          REFERENCES finding (account_id, id));";

// ============================================================================
// SECTION: Config
// ============================================================================

/// `SQLite` journal mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `journal_mode` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteStoreMode {
    /// WAL journal mode (recommended).
    #[default]
    Wal,
    /// Delete journal mode (legacy).
    Delete,
}

impl SqliteStoreMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Wal => "wal",
            Self::Delete => "delete",
        }
    }
}

/// `SQLite` sync mode configuration.
///
/// # Invariants
/// - Values map 1:1 to `SQLite` `synchronous` pragma settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SqliteSyncMode {
    /// Full synchronous mode (safest).
    #[default]
    Full,
    /// Normal synchronous mode (balanced).
    Normal,
}

impl SqliteSyncMode {
    /// Returns the `SQLite` pragma value.
    #[must_use]
    pub const fn pragma_value(self) -> &'static str {
        match self {
            Self::Full => "full",
            Self::Normal => "normal",
        }
    }
}

/// Configuration for the `SQLite` chain store.
///
/// # Invariants
/// - `path` must resolve to a file path (not a directory).
/// - `busy_timeout_ms` is interpreted as milliseconds.
#[derive(Debug, Clone, Deserialize)]
pub struct SqliteStoreConfig {
    /// Path to the `SQLite` database file.
    pub path: PathBuf,
    /// Busy timeout in milliseconds.
    #[serde(default = "default_busy_timeout_ms")]
    pub busy_timeout_ms: u64,
    /// `SQLite` journal mode.
    #[serde(default)]
    pub journal_mode: SqliteStoreMode,
    /// `SQLite` sync mode.
    #[serde(default)]
    pub sync_mode: SqliteSyncMode,
}

/// Returns the default busy timeout for `SQLite` connections.
const fn default_busy_timeout_ms() -> u64 {
    DEFAULT_BUSY_TIMEOUT_MS
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// `SQLite` store errors.
///
/// # Invariants
/// - Error messages avoid embedding row payloads.
#[derive(Debug, Error, Clone)]
pub enum SqliteStoreError {
    /// Store I/O error.
    #[error("sqlite store io error: {0}")]
    Io(String),
    /// `SQLite` engine error.
    #[error("sqlite store db error: {0}")]
    Db(String),
    /// Store schema version mismatch.
    #[error("sqlite store version mismatch: {0}")]
    VersionMismatch(String),
    /// Invalid store data.
    #[error("sqlite store invalid data: {0}")]
    Invalid(String),
    /// Write attempted without a matching session tenant.
    #[error("sqlite store denied: {0}")]
    Denied(String),
}

impl From<SqliteStoreError> for StoreError {
    fn from(error: SqliteStoreError) -> Self {
        match error {
            SqliteStoreError::Io(message) => Self::Io(message),
            SqliteStoreError::Db(message) => Self::Db(message),
            SqliteStoreError::VersionMismatch(message) => Self::VersionMismatch(message),
            SqliteStoreError::Invalid(message) => Self::Invalid(message),
            SqliteStoreError::Denied(message) => Self::Denied(message),
        }
    }
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// `SQLite`-backed chain store enforcing tenant isolation per statement.
///
/// # Invariants
/// - Connection access is serialized through a mutex.
/// - Session state lives in the store; every tenant-bound statement binds the
///   current session tenant (NULL when unset, which matches no rows).
pub struct SqliteChainStore {
    /// Shared connection guarded by a mutex.
    connection: Mutex<Connection>,
    /// Ambient session tenant for this store handle.
    session: Mutex<Option<AccountId>>,
    /// Audit sink for session and sweep events.
    audit: Arc<dyn StoreAuditSink>,
}

impl SqliteChainStore {
    /// Opens an `SQLite`-backed chain store with a noop audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn new(config: &SqliteStoreConfig) -> Result<Self, SqliteStoreError> {
        Self::with_audit(config, Arc::new(NoopAuditSink))
    }

    /// Opens an `SQLite`-backed chain store with the given audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`SqliteStoreError`] when the database cannot be opened or
    /// initialized.
    pub fn with_audit(
        config: &SqliteStoreConfig,
        audit: Arc<dyn StoreAuditSink>,
    ) -> Result<Self, SqliteStoreError> {
        validate_store_path(&config.path)?;
        ensure_parent_dir(&config.path)?;
        let mut connection = open_connection(config)?;
        initialize_schema(&mut connection)?;
        Ok(Self {
            connection: Mutex::new(connection),
            session: Mutex::new(None),
            audit,
        })
    }

    /// Locks the connection, mapping mutex poisoning to a store error.
    fn conn(&self) -> Result<std::sync::MutexGuard<'_, Connection>, SqliteStoreError> {
        self.connection.lock().map_err(|_| SqliteStoreError::Db("connection mutex poisoned".to_string()))
    }

    /// Returns a snapshot of the current session tenant.
    fn session_snapshot(&self) -> Result<Option<AccountId>, SqliteStoreError> {
        self.session
            .lock()
            .map(|guard| guard.clone())
            .map_err(|_| SqliteStoreError::Db("session mutex poisoned".to_string()))
    }

    /// Requires an active session tenant matching `account_id` for a write.
    fn require_session_for(&self, account_id: &AccountId) -> Result<(), SqliteStoreError> {
        match self.session_snapshot()? {
            None => Err(SqliteStoreError::Denied("no session tenant active".to_string())),
            Some(current) if current == *account_id => Ok(()),
            Some(_) => Err(SqliteStoreError::Denied(
                "record account does not match session tenant".to_string(),
            )),
        }
    }

    /// Counts rows visible under the ambient session tenant.
    fn count_rows_scoped(&self, table: ChainTable) -> Result<u64, SqliteStoreError> {
        let session = self.session_snapshot()?;
        let guard = self.conn()?;
        let sql = format!("SELECT count(*) FROM {} WHERE account_id = ?1", table.as_str());
        let count: i64 = guard
            .query_row(&sql, params![session.as_ref().map(AccountId::as_str)], |row| row.get(0))
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        u64::try_from(count)
            .map_err(|_| SqliteStoreError::Invalid(format!("negative row count for {table}")))
    }

    /// Deletes rows owned by the ambient session tenant.
    fn delete_rows_scoped(&self, table: ChainTable) -> Result<u64, SqliteStoreError> {
        let session = self.session_snapshot()?;
        let deleted = {
            let guard = self.conn()?;
            let sql = format!("DELETE FROM {} WHERE account_id = ?1", table.as_str());
            guard
                .execute(&sql, params![session.as_ref().map(AccountId::as_str)])
                .map_err(|err| SqliteStoreError::Db(err.to_string()))?
        };
        let rows = u64::try_from(deleted)
            .map_err(|_| SqliteStoreError::Invalid(format!("delete count overflow for {table}")))?;
        self.audit.record_sweep(&SweepAuditEvent::teardown_delete(session.as_ref(), table, rows));
        Ok(rows)
    }
}

// ============================================================================
// SECTION: Tenant Session
// ============================================================================

impl TenantSession for SqliteChainStore {
    fn set_session_account(&self, account_id: &AccountId) -> Result<(), StoreError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| StoreError::Db("session mutex poisoned".to_string()))?;
        *guard = Some(account_id.clone());
        drop(guard);
        self.audit.record_session(&SessionAuditEvent::set(account_id));
        Ok(())
    }

    fn clear_session_account(&self) -> Result<(), StoreError> {
        let mut guard = self
            .session
            .lock()
            .map_err(|_| StoreError::Db("session mutex poisoned".to_string()))?;
        *guard = None;
        drop(guard);
        self.audit.record_session(&SessionAuditEvent::clear());
        Ok(())
    }

    fn current_account(&self) -> Result<Option<AccountId>, StoreError> {
        self.session_snapshot().map_err(StoreError::from)
    }
}

// ============================================================================
// SECTION: Chain Store
// ============================================================================

impl ChainStore for SqliteChainStore {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO account (id, name) VALUES (?1, ?2)",
                params![account.id.as_str(), account.name],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_control(&self, control: &Control) -> Result<(), StoreError> {
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO control (id, title) VALUES (?1, ?2)",
                params![control.id.as_str(), control.title],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_scan(&self, scan: &Scan) -> Result<(), StoreError> {
        self.require_session_for(&scan.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO scan (account_id, id, status, control_set_id) VALUES (?1, ?2, ?3, \
                 ?4)",
                params![
                    scan.account_id.as_str(),
                    scan.id.as_str(),
                    scan.status.as_str(),
                    scan.control_set_id.as_str()
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_policy(&self, policy: &Policy) -> Result<(), StoreError> {
        self.require_session_for(&policy.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO policy (account_id, id, name) VALUES (?1, ?2, ?3)",
                params![policy.account_id.as_str(), policy.id.as_str(), policy.name],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        self.require_session_for(&asset.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO asset (account_id, id, kind) VALUES (?1, ?2, ?3)",
                params![asset.account_id.as_str(), asset.id.as_str(), asset.kind],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_finding(&self, finding: &Finding) -> Result<(), StoreError> {
        self.require_session_for(&finding.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO finding (account_id, id, scan_id, asset_id, status, severity) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    finding.account_id.as_str(),
                    finding.id.as_str(),
                    finding.scan_id.as_str(),
                    finding.asset_id.as_str(),
                    finding.status.as_str(),
                    finding.severity.as_str()
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_evidence(&self, evidence: &Evidence) -> Result<(), StoreError> {
        self.require_session_for(&evidence.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO evidence (account_id, id, finding_id, detail) VALUES (?1, ?2, ?3, \
                 ?4)",
                params![
                    evidence.account_id.as_str(),
                    evidence.id.as_str(),
                    evidence.finding_id.as_str(),
                    evidence.detail
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_remediation(&self, remediation: &Remediation) -> Result<(), StoreError> {
        self.require_session_for(&remediation.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO remediation (account_id, id, finding_id, status) VALUES (?1, ?2, \
                 ?3, ?4)",
                params![
                    remediation.account_id.as_str(),
                    remediation.id.as_str(),
                    remediation.finding_id.as_str(),
                    remediation.status.as_str()
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        self.require_session_for(&ticket.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO ticket (account_id, id, finding_id, provider, external_key) VALUES \
                 (?1, ?2, ?3, ?4, ?5)",
                params![
                    ticket.account_id.as_str(),
                    ticket.id.as_str(),
                    ticket.finding_id.as_str(),
                    ticket.provider.as_str(),
                    ticket.external_key
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_integration(&self, integration: &Integration) -> Result<(), StoreError> {
        self.require_session_for(&integration.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO integration (account_id, id, provider) VALUES (?1, ?2, ?3)",
                params![
                    integration.account_id.as_str(),
                    integration.id.as_str(),
                    integration.provider
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        self.require_session_for(&notification.account_id).map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        guard
            .execute(
                "INSERT INTO notification (account_id, id, finding_id, channel) VALUES (?1, ?2, \
                 ?3, ?4)",
                params![
                    notification.account_id.as_str(),
                    notification.id.as_str(),
                    notification.finding_id.as_str(),
                    notification.channel
                ],
            )
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(())
    }

    fn count_rows(&self, table: ChainTable) -> Result<u64, StoreError> {
        self.count_rows_scoped(table).map_err(StoreError::from)
    }

    fn scan(&self, id: &ScanId) -> Result<Option<Scan>, StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT account_id, id, status, control_set_id FROM scan WHERE account_id = ?1 \
                 AND id = ?2",
                params![session.as_ref().map(AccountId::as_str), id.as_str()],
                |row| {
                    let account_id: String = row.get(0)?;
                    let id: String = row.get(1)?;
                    let status: String = row.get(2)?;
                    let control_set_id: String = row.get(3)?;
                    Ok((account_id, id, status, control_set_id))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        let Some((account_id, id, status, control_set_id)) = row else {
            return Ok(None);
        };
        let status = ScanStatus::parse(&status)
            .ok_or_else(|| StoreError::Invalid(format!("unknown scan status: {status}")))?;
        Ok(Some(Scan {
            account_id: AccountId::new(account_id),
            id: ScanId::new(id),
            status,
            control_set_id: ControlId::new(control_set_id),
        }))
    }

    fn finding(&self, id: &FindingId) -> Result<Option<Finding>, StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT account_id, id, scan_id, asset_id, status, severity FROM finding WHERE \
                 account_id = ?1 AND id = ?2",
                params![session.as_ref().map(AccountId::as_str), id.as_str()],
                |row| {
                    let account_id: String = row.get(0)?;
                    let id: String = row.get(1)?;
                    let scan_id: String = row.get(2)?;
                    let asset_id: String = row.get(3)?;
                    let status: String = row.get(4)?;
                    let severity: String = row.get(5)?;
                    Ok((account_id, id, scan_id, asset_id, status, severity))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        let Some((account_id, id, scan_id, asset_id, status, severity)) = row else {
            return Ok(None);
        };
        let status = FindingStatus::parse(&status)
            .ok_or_else(|| StoreError::Invalid(format!("unknown finding status: {status}")))?;
        let severity = Severity::parse(&severity)
            .ok_or_else(|| StoreError::Invalid(format!("unknown severity: {severity}")))?;
        Ok(Some(Finding {
            account_id: AccountId::new(account_id),
            id: FindingId::new(id),
            scan_id: ScanId::new(scan_id),
            asset_id: rowfence_core::AssetId::new(asset_id),
            status,
            severity,
        }))
    }

    fn evidence(&self, id: &EvidenceId) -> Result<Option<Evidence>, StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT account_id, id, finding_id, detail FROM evidence WHERE account_id = ?1 \
                 AND id = ?2",
                params![session.as_ref().map(AccountId::as_str), id.as_str()],
                |row| {
                    let account_id: String = row.get(0)?;
                    let id: String = row.get(1)?;
                    let finding_id: String = row.get(2)?;
                    let detail: Option<String> = row.get(3)?;
                    Ok((account_id, id, finding_id, detail))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(row.map(|(account_id, id, finding_id, detail)| Evidence {
            account_id: AccountId::new(account_id),
            id: EvidenceId::new(id),
            finding_id: FindingId::new(finding_id),
            detail,
        }))
    }

    fn remediation(&self, id: &RemediationId) -> Result<Option<Remediation>, StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT account_id, id, finding_id, status FROM remediation WHERE account_id = \
                 ?1 AND id = ?2",
                params![session.as_ref().map(AccountId::as_str), id.as_str()],
                |row| {
                    let account_id: String = row.get(0)?;
                    let id: String = row.get(1)?;
                    let finding_id: String = row.get(2)?;
                    let status: String = row.get(3)?;
                    Ok((account_id, id, finding_id, status))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        let Some((account_id, id, finding_id, status)) = row else {
            return Ok(None);
        };
        let status = RemediationStatus::parse(&status)
            .ok_or_else(|| StoreError::Invalid(format!("unknown remediation status: {status}")))?;
        Ok(Some(Remediation {
            account_id: AccountId::new(account_id),
            id: RemediationId::new(id),
            finding_id: FindingId::new(finding_id),
            status,
        }))
    }

    fn ticket(&self, id: &TicketId) -> Result<Option<Ticket>, StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT account_id, id, finding_id, provider, external_key FROM ticket WHERE \
                 account_id = ?1 AND id = ?2",
                params![session.as_ref().map(AccountId::as_str), id.as_str()],
                |row| {
                    let account_id: String = row.get(0)?;
                    let id: String = row.get(1)?;
                    let finding_id: String = row.get(2)?;
                    let provider: String = row.get(3)?;
                    let external_key: String = row.get(4)?;
                    Ok((account_id, id, finding_id, provider, external_key))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        let Some((account_id, id, finding_id, provider, external_key)) = row else {
            return Ok(None);
        };
        let provider = TicketProvider::parse(&provider)
            .ok_or_else(|| StoreError::Invalid(format!("unknown ticket provider: {provider}")))?;
        Ok(Some(Ticket {
            account_id: AccountId::new(account_id),
            id: TicketId::new(id),
            finding_id: FindingId::new(finding_id),
            provider,
            external_key,
        }))
    }

    fn control(&self, id: &ControlId) -> Result<Option<Control>, StoreError> {
        let guard = self.conn().map_err(StoreError::from)?;
        let row = guard
            .query_row(
                "SELECT id, title FROM control WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    let id: String = row.get(0)?;
                    let title: String = row.get(1)?;
                    Ok((id, title))
                },
            )
            .optional()
            .map_err(|err| StoreError::Db(err.to_string()))?;
        Ok(row.map(|(id, title)| Control {
            id: ControlId::new(id),
            title,
        }))
    }

    fn delete_rows(&self, table: ChainTable) -> Result<u64, StoreError> {
        self.delete_rows_scoped(table).map_err(StoreError::from)
    }

    fn delete_control(&self, id: &ControlId) -> Result<u64, StoreError> {
        let deleted = {
            let guard = self.conn().map_err(StoreError::from)?;
            guard
                .execute("DELETE FROM control WHERE id = ?1", params![id.as_str()])
                .map_err(|err| StoreError::Db(err.to_string()))?
        };
        u64::try_from(deleted).map_err(|_| StoreError::Invalid("delete count overflow".to_string()))
    }

    fn delete_account(&self, id: &AccountId) -> Result<u64, StoreError> {
        let deleted = {
            let guard = self.conn().map_err(StoreError::from)?;
            guard
                .execute("DELETE FROM account WHERE id = ?1", params![id.as_str()])
                .map_err(|err| StoreError::Db(err.to_string()))?
        };
        u64::try_from(deleted).map_err(|_| StoreError::Invalid("delete count overflow".to_string()))
    }

    fn load_fixture(&self, sql: &str) -> Result<(), StoreError> {
        let session = self.session_snapshot().map_err(StoreError::from)?;
        let Some(account) = session else {
            return Err(StoreError::Denied(
                "fixture execution requires an active session tenant".to_string(),
            ));
        };
        {
            let mut guard = self.conn().map_err(StoreError::from)?;
            let tx =
                guard.transaction().map_err(|err| StoreError::Db(err.to_string()))?;
            install_fixture_guards(&tx, &account)?;
            tx.execute_batch(sql).map_err(map_fixture_err)?;
            remove_fixture_guards(&tx)?;
            tx.commit().map_err(|err| StoreError::Db(err.to_string()))?;
        }
        self.audit.record_sweep(&SweepAuditEvent::fixture_loaded(&account));
        Ok(())
    }
}

// ============================================================================
// SECTION: Fixture Guards
// ============================================================================

/// Installs temporary write guards for a fixture batch.
///
/// The session tenant lands in a temp table, and each tenant-scoped table
/// gets temporary triggers that abort inserts, updates, and deletes touching
/// a row whose `account_id` differs from it. Guards are transactional: a
/// rolled-back batch removes them with everything else.
fn install_fixture_guards(
    connection: &Connection,
    account: &AccountId,
) -> Result<(), StoreError> {
    connection
        .execute(
            "CREATE TEMP TABLE fixture_session (account_id TEXT NOT NULL)",
            [],
        )
        .map_err(|err| StoreError::Db(err.to_string()))?;
    connection
        .execute(
            "INSERT INTO fixture_session (account_id) VALUES (?1)",
            params![account.as_str()],
        )
        .map_err(|err| StoreError::Db(err.to_string()))?;
    connection
        .execute_batch(&fixture_guard_ddl())
        .map_err(|err| StoreError::Db(err.to_string()))?;
    Ok(())
}

/// Removes the fixture write guards after a successful batch.
fn remove_fixture_guards(connection: &Connection) -> Result<(), StoreError> {
    let mut ddl = String::new();
    for table in ChainTable::ALL {
        let name = table.as_str();
        ddl.push_str(&format!("DROP TRIGGER fixture_guard_{name}_insert;\n"));
        ddl.push_str(&format!("DROP TRIGGER fixture_guard_{name}_update;\n"));
        ddl.push_str(&format!("DROP TRIGGER fixture_guard_{name}_delete;\n"));
    }
    ddl.push_str("DROP TABLE fixture_session;\n");
    connection.execute_batch(&ddl).map_err(|err| StoreError::Db(err.to_string()))
}

/// Builds the temporary trigger DDL for every tenant-scoped table.
///
/// Table names come from the closed [`ChainTable`] enum, so interpolation is
/// safe. `IS NOT` also catches a NULL `account_id`.
fn fixture_guard_ddl() -> String {
    let mut ddl = String::new();
    for table in ChainTable::ALL {
        let name = table.as_str();
        ddl.push_str(&format!(
            "CREATE TEMP TRIGGER fixture_guard_{name}_insert BEFORE INSERT ON {name} \
             WHEN NEW.account_id IS NOT (SELECT account_id FROM fixture_session) \
             BEGIN SELECT RAISE(ABORT, '{FIXTURE_GUARD_MESSAGE}'); END;\n"
        ));
        ddl.push_str(&format!(
            "CREATE TEMP TRIGGER fixture_guard_{name}_update BEFORE UPDATE ON {name} \
             WHEN OLD.account_id IS NOT (SELECT account_id FROM fixture_session) \
             OR NEW.account_id IS NOT (SELECT account_id FROM fixture_session) \
             BEGIN SELECT RAISE(ABORT, '{FIXTURE_GUARD_MESSAGE}'); END;\n"
        ));
        ddl.push_str(&format!(
            "CREATE TEMP TRIGGER fixture_guard_{name}_delete BEFORE DELETE ON {name} \
             WHEN OLD.account_id IS NOT (SELECT account_id FROM fixture_session) \
             BEGIN SELECT RAISE(ABORT, '{FIXTURE_GUARD_MESSAGE}'); END;\n"
        ));
    }
    ddl
}

/// Maps a fixture batch failure, surfacing guard aborts as denials.
fn map_fixture_err(err: rusqlite::Error) -> StoreError {
    let message = err.to_string();
    if message.contains(FIXTURE_GUARD_MESSAGE) {
        StoreError::Denied(message)
    } else {
        StoreError::Db(message)
    }
}

// ============================================================================
// SECTION: Connection Helpers
// ============================================================================

/// Validates the configured store path.
fn validate_store_path(path: &Path) -> Result<(), SqliteStoreError> {
    let raw = path.as_os_str();
    if raw.is_empty() {
        return Err(SqliteStoreError::Invalid("store path must not be empty".to_string()));
    }
    if raw.len() > MAX_TOTAL_PATH_LENGTH {
        return Err(SqliteStoreError::Invalid("store path exceeds max length".to_string()));
    }
    for component in path.components() {
        if component.as_os_str().len() > MAX_PATH_COMPONENT_LENGTH {
            return Err(SqliteStoreError::Invalid(
                "store path component too long".to_string(),
            ));
        }
    }
    if path.is_dir() {
        return Err(SqliteStoreError::Invalid(
            "store path must be a file, not a directory".to_string(),
        ));
    }
    Ok(())
}

/// Creates the parent directory for the store file when missing.
fn ensure_parent_dir(path: &Path) -> Result<(), SqliteStoreError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
        && !parent.exists()
    {
        std::fs::create_dir_all(parent).map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    }
    Ok(())
}

/// Opens a connection with required flags and pragmas applied.
fn open_connection(config: &SqliteStoreConfig) -> Result<Connection, SqliteStoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
        | OpenFlags::SQLITE_OPEN_CREATE
        | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(&config.path, flags)
        .map_err(|err| SqliteStoreError::Io(err.to_string()))?;
    apply_pragmas(&connection, config)?;
    Ok(connection)
}

/// Applies journal, sync, busy-timeout, and foreign-key pragmas.
fn apply_pragmas(
    connection: &Connection,
    config: &SqliteStoreConfig,
) -> Result<(), SqliteStoreError> {
    connection
        .pragma_update(None, "journal_mode", config.journal_mode.pragma_value())
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "synchronous", config.sync_mode.pragma_value())
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "busy_timeout", i64::try_from(config.busy_timeout_ms).unwrap_or(i64::MAX))
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    connection
        .pragma_update(None, "foreign_keys", "on")
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

/// Initializes the schema and verifies the stored schema version.
fn initialize_schema(connection: &mut Connection) -> Result<(), SqliteStoreError> {
    let tx = connection.transaction().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    tx.execute_batch(SCHEMA_SQL).map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    let stored: Option<i64> = tx
        .query_row(
            "SELECT value FROM store_meta WHERE key = 'schema_version'",
            [],
            |row| row.get(0),
        )
        .optional()
        .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    match stored {
        None => {
            tx.execute(
                "INSERT INTO store_meta (key, value) VALUES ('schema_version', ?1)",
                params![SCHEMA_VERSION],
            )
            .map_err(|err| SqliteStoreError::Db(err.to_string()))?;
        }
        Some(version) if version == SCHEMA_VERSION => {}
        Some(version) => {
            return Err(SqliteStoreError::VersionMismatch(format!(
                "unsupported schema version {version} (expected {SCHEMA_VERSION})"
            )));
        }
    }
    tx.commit().map_err(|err| SqliteStoreError::Db(err.to_string()))?;
    Ok(())
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use std::path::Path;
    use std::path::PathBuf;

    use super::SqliteStoreError;
    use super::SqliteStoreMode;
    use super::SqliteSyncMode;
    use super::validate_store_path;

    #[test]
    fn pragma_values_match_sqlite_settings() {
        assert_eq!(SqliteStoreMode::Wal.pragma_value(), "wal");
        assert_eq!(SqliteStoreMode::Delete.pragma_value(), "delete");
        assert_eq!(SqliteSyncMode::Full.pragma_value(), "full");
        assert_eq!(SqliteSyncMode::Normal.pragma_value(), "normal");
    }

    #[test]
    fn validate_store_path_rejects_empty_path() {
        let result = validate_store_path(Path::new(""));
        assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
    }

    #[test]
    fn validate_store_path_rejects_long_component() {
        let component = "a".repeat(300);
        let result = validate_store_path(&PathBuf::from(component));
        assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
    }

    #[test]
    fn validate_store_path_rejects_long_path() {
        let long: PathBuf = (0 .. 40).map(|_| "a".repeat(200)).collect();
        let result = validate_store_path(&long);
        assert!(matches!(result, Err(SqliteStoreError::Invalid(_))));
    }
}
