// crates/rowfence-core/src/audit.rs
// ============================================================================
// Module: RowFence Store Audit
// Description: Audit sinks for session transitions and fixture activity.
// Purpose: Record isolation-relevant store events without altering behavior.
// Dependencies: serde, serde_json
// ============================================================================

//! ## Overview
//! Store backends emit audit events when the session tenant changes and when
//! fixture or teardown sweeps run. Sinks are best-effort: a failing sink is
//! swallowed so auditing never changes store semantics or error paths.
//! Events serialize as single-line JSON with millisecond timestamps.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fs::File;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::SystemTime;
use std::time::UNIX_EPOCH;

use serde::Serialize;

use crate::core::identifiers::AccountId;
use crate::core::table::ChainTable;

// ============================================================================
// SECTION: Events
// ============================================================================

/// Session-tenant transition event.
///
/// # Invariants
/// - `account_id` is `None` for clear transitions.
#[derive(Debug, Clone, Serialize)]
pub struct SessionAuditEvent {
    /// Stable event label.
    pub event: &'static str,
    /// Session tenant after the transition, if any.
    pub account_id: Option<AccountId>,
    /// Milliseconds since the unix epoch.
    pub timestamp_ms: u64,
}

impl SessionAuditEvent {
    /// Builds a session-set event.
    #[must_use]
    pub fn set(account_id: &AccountId) -> Self {
        Self {
            event: "session_account_set",
            account_id: Some(account_id.clone()),
            timestamp_ms: unix_millis(),
        }
    }

    /// Builds a session-clear event.
    #[must_use]
    pub fn clear() -> Self {
        Self {
            event: "session_account_clear",
            account_id: None,
            timestamp_ms: unix_millis(),
        }
    }
}

/// Fixture or teardown sweep event.
#[derive(Debug, Clone, Serialize)]
pub struct SweepAuditEvent {
    /// Stable event label.
    pub event: &'static str,
    /// Session tenant the sweep ran under, if any.
    pub account_id: Option<AccountId>,
    /// Table touched by the sweep, if table-scoped.
    pub table: Option<ChainTable>,
    /// Rows affected, when known.
    pub rows: Option<u64>,
    /// Milliseconds since the unix epoch.
    pub timestamp_ms: u64,
}

impl SweepAuditEvent {
    /// Builds a fixture-loaded event.
    #[must_use]
    pub fn fixture_loaded(account_id: &AccountId) -> Self {
        Self {
            event: "fixture_loaded",
            account_id: Some(account_id.clone()),
            table: None,
            rows: None,
            timestamp_ms: unix_millis(),
        }
    }

    /// Builds a teardown-delete event for one table.
    #[must_use]
    pub fn teardown_delete(account_id: Option<&AccountId>, table: ChainTable, rows: u64) -> Self {
        Self {
            event: "teardown_delete",
            account_id: account_id.cloned(),
            table: Some(table),
            rows: Some(rows),
            timestamp_ms: unix_millis(),
        }
    }
}

// ============================================================================
// SECTION: Sink Trait
// ============================================================================

/// Audit sink for isolation-relevant store events.
///
/// # Invariants
/// - Implementations must not propagate failures to callers; auditing never
///   alters store behavior.
pub trait StoreAuditSink: Send + Sync {
    /// Records a session-tenant transition.
    fn record_session(&self, event: &SessionAuditEvent) {
        let _ = event;
    }

    /// Records a fixture load or teardown sweep.
    fn record_sweep(&self, event: &SweepAuditEvent) {
        let _ = event;
    }
}

// ============================================================================
// SECTION: Sinks
// ============================================================================

/// Sink that discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAuditSink;

impl StoreAuditSink for NoopAuditSink {}

/// Sink that writes JSON lines to stderr.
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrAuditSink;

impl StderrAuditSink {
    /// Serializes and writes one event line, swallowing failures.
    fn write_line<E: Serialize>(event: &E) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let mut stderr = std::io::stderr().lock();
        let _ = writeln!(stderr, "{line}");
    }
}

impl StoreAuditSink for StderrAuditSink {
    fn record_session(&self, event: &SessionAuditEvent) {
        Self::write_line(event);
    }

    fn record_sweep(&self, event: &SweepAuditEvent) {
        Self::write_line(event);
    }
}

/// Sink that appends JSON lines to a file.
///
/// # Invariants
/// - File access is serialized through a mutex; lines are flushed per event.
#[derive(Debug)]
pub struct FileAuditSink {
    /// Append-mode audit log file.
    file: Mutex<File>,
}

impl FileAuditSink {
    /// Opens (or creates) the audit log file in append mode.
    ///
    /// # Errors
    ///
    /// Returns [`std::io::Error`] when the file cannot be opened.
    pub fn open(path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self {
            file: Mutex::new(file),
        })
    }

    /// Serializes and appends one event line, swallowing failures.
    fn write_line<E: Serialize>(&self, event: &E) {
        let Ok(line) = serde_json::to_string(event) else {
            return;
        };
        let Ok(mut guard) = self.file.lock() else {
            return;
        };
        let _ = writeln!(guard, "{line}");
        let _ = guard.flush();
    }
}

impl StoreAuditSink for FileAuditSink {
    fn record_session(&self, event: &SessionAuditEvent) {
        self.write_line(event);
    }

    fn record_sweep(&self, event: &SweepAuditEvent) {
        self.write_line(event);
    }
}

// ============================================================================
// SECTION: Helpers
// ============================================================================

/// Returns milliseconds since the unix epoch, saturating on clock errors.
#[must_use]
pub fn unix_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |elapsed| u64::try_from(elapsed.as_millis()).unwrap_or(u64::MAX))
}
