// system-tests/tests/sqlite_isolation.rs
// ============================================================================
// Module: SQLite Isolation Tests
// Description: Run the acceptance passes against the embedded store.
// Purpose: Ensure both backends honor the same isolation contract.
// Dependencies: rowfence-core, rowfence-store-sqlite, tempfile
// ============================================================================

//! ## Overview
//! The embedded suite mirrors the Postgres acceptance flow without an env
//! gate: no external store is touched, so it always runs. The fixture chain
//! is seeded through typed inserts rather than a SQL script; the visibility
//! passes, chain-integrity checks, and idempotent teardown are identical.

use rowfence_core::Account;
use rowfence_core::AccountId;
use rowfence_core::Asset;
use rowfence_core::AssetId;
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
use rowfence_core::IntegrationId;
use rowfence_core::Notification;
use rowfence_core::NotificationId;
use rowfence_core::Policy;
use rowfence_core::PolicyId;
use rowfence_core::Remediation;
use rowfence_core::RemediationId;
use rowfence_core::RemediationStatus;
use rowfence_core::Scan;
use rowfence_core::ScanId;
use rowfence_core::ScanStatus;
use rowfence_core::Severity;
use rowfence_core::TenantSession;
use rowfence_core::Ticket;
use rowfence_core::TicketId;
use rowfence_core::TicketProvider;
use rowfence_store_sqlite::SqliteChainStore;
use rowfence_store_sqlite::SqliteStoreConfig;
use rowfence_store_sqlite::SqliteStoreMode;
use rowfence_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

/// Tenant owning every fixture row.
const OWNER: &str = "acct_scan_1";
/// Tenant with no rows; visibility under it must be zero.
const OTHER: &str = "acct_other";

type TestResult = Result<(), Box<dyn std::error::Error>>;

fn open_store(dir: &TempDir) -> Result<SqliteChainStore, Box<dyn std::error::Error>> {
    let config = SqliteStoreConfig {
        path: dir.path().join("rowfence.db"),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Delete,
        sync_mode: SqliteSyncMode::Normal,
    };
    Ok(SqliteChainStore::new(&config)?)
}

/// Seeds the full fixture chain under `acct_scan_1` via typed inserts.
fn seed_fixture(store: &SqliteChainStore) -> TestResult {
    let owner = AccountId::new(OWNER);
    store.insert_account(&Account {
        id: owner.clone(),
        name: "Scan Tenant One".to_string(),
    })?;
    store.insert_control(&Control {
        id: ControlId::new("ctrl_001"),
        title: "Baseline Control Set".to_string(),
    })?;
    store.set_session_account(&owner)?;
    store.insert_policy(&Policy {
        account_id: owner.clone(),
        id: PolicyId::new("pol_001"),
        name: "Default Policy".to_string(),
    })?;
    store.insert_asset(&Asset {
        account_id: owner.clone(),
        id: AssetId::new("asset_001"),
        kind: "HOST".to_string(),
    })?;
    store.insert_scan(&Scan {
        account_id: owner.clone(),
        id: ScanId::new("scan_001"),
        status: ScanStatus::Completed,
        control_set_id: ControlId::new("ctrl_001"),
    })?;
    store.insert_finding(&Finding {
        account_id: owner.clone(),
        id: FindingId::new("find_001"),
        scan_id: ScanId::new("scan_001"),
        asset_id: AssetId::new("asset_001"),
        status: FindingStatus::Open,
        severity: Severity::High,
    })?;
    store.insert_evidence(&Evidence {
        account_id: owner.clone(),
        id: EvidenceId::new("evid_001"),
        finding_id: FindingId::new("find_001"),
        detail: Some("port 22 open to 0.0.0.0/0".to_string()),
    })?;
    store.insert_remediation(&Remediation {
        account_id: owner.clone(),
        id: RemediationId::new("rem_001"),
        finding_id: FindingId::new("find_001"),
        status: RemediationStatus::Pending,
    })?;
    store.insert_ticket(&Ticket {
        account_id: owner.clone(),
        id: TicketId::new("tick_001"),
        finding_id: FindingId::new("find_001"),
        provider: TicketProvider::Jira,
        external_key: "JIRA-1001".to_string(),
    })?;
    store.insert_integration(&Integration {
        account_id: owner.clone(),
        id: IntegrationId::new("integ_001"),
        provider: "JIRA".to_string(),
    })?;
    store.insert_notification(&Notification {
        account_id: owner,
        id: NotificationId::new("notif_001"),
        finding_id: FindingId::new("find_001"),
        channel: "EMAIL".to_string(),
    })?;
    Ok(())
}

/// Asserts every chain table holds `expected` visible rows.
fn assert_counts(store: &SqliteChainStore, expected: u64, label: &str) -> TestResult {
    for table in ChainTable::ALL {
        let count = store.count_rows(table)?;
        if count != expected {
            return Err(format!("{label}: expected {expected} rows in {table}, got {count}").into());
        }
    }
    Ok(())
}

#[test]
#[allow(clippy::too_many_lines, reason = "Acceptance flow runs all passes on one store.")]
fn tenant_isolation_across_scan_chain() -> TestResult {
    let dir = TempDir::new()?;
    let store = open_store(&dir)?;
    seed_fixture(&store)?;

    // Pass 1: the owning tenant sees exactly one row per table. Control rows
    // are unscoped and stay visible in every pass.
    assert_counts(&store, 1, "pass 1 (owner)")?;
    if store.control(&ControlId::new("ctrl_001"))?.is_none() {
        return Err("pass 1: control ctrl_001 not visible to owner".into());
    }

    // Pass 2: an unknown tenant is not an error; it sees nothing.
    store.set_session_account(&AccountId::new(OTHER))?;
    assert_counts(&store, 0, "pass 2 (other tenant)")?;
    if store.control(&ControlId::new("ctrl_001"))?.is_none() {
        return Err("pass 2: control ctrl_001 hidden from other tenant".into());
    }

    // Pass 3: no session tenant fails closed to zero visibility.
    store.clear_session_account()?;
    if store.current_account()?.is_some() {
        return Err("session tenant survived reset".into());
    }
    assert_counts(&store, 0, "pass 3 (no tenant)")?;
    if store.control(&ControlId::new("ctrl_001"))?.is_none() {
        return Err("pass 3: control ctrl_001 hidden with no tenant".into());
    }

    // Pass 4: chain integrity under the owning tenant.
    store.set_session_account(&AccountId::new(OWNER))?;
    let scan = store.scan(&ScanId::new("scan_001"))?.ok_or("missing scan_001")?;
    if scan.status != ScanStatus::Completed || scan.control_set_id.as_str() != "ctrl_001" {
        return Err("scan_001 chain fields mismatch".into());
    }
    let finding = store.finding(&FindingId::new("find_001"))?.ok_or("missing find_001")?;
    if finding.scan_id.as_str() != "scan_001"
        || finding.status != FindingStatus::Open
        || finding.severity != Severity::High
    {
        return Err("find_001 chain fields mismatch".into());
    }
    let evidence = store.evidence(&EvidenceId::new("evid_001"))?.ok_or("missing evid_001")?;
    if evidence.finding_id.as_str() != "find_001" {
        return Err("evid_001 does not link to find_001".into());
    }
    let remediation =
        store.remediation(&RemediationId::new("rem_001"))?.ok_or("missing rem_001")?;
    if remediation.finding_id.as_str() != "find_001" {
        return Err("rem_001 does not link to find_001".into());
    }
    let ticket = store.ticket(&TicketId::new("tick_001"))?.ok_or("missing tick_001")?;
    if ticket.finding_id.as_str() != "find_001"
        || ticket.provider != TicketProvider::Jira
        || ticket.external_key != "JIRA-1001"
    {
        return Err("tick_001 chain fields mismatch".into());
    }

    // Teardown: reverse dependency order, each table drops its single row.
    for table in ChainTable::teardown_order() {
        let deleted = store.delete_rows(table)?;
        if deleted != 1 {
            return Err(format!("teardown: expected 1 row deleted from {table}, got {deleted}")
                .into());
        }
    }
    store.clear_session_account()?;
    if store.delete_control(&ControlId::new("ctrl_001"))? != 1 {
        return Err("teardown: control ctrl_001 not deleted".into());
    }
    if store.delete_account(&AccountId::new(OWNER))? != 1 {
        return Err("teardown: account acct_scan_1 not deleted".into());
    }

    // Idempotence: a second sweep deletes nothing and raises no error.
    store.set_session_account(&AccountId::new(OWNER))?;
    for table in ChainTable::teardown_order() {
        let deleted = store.delete_rows(table)?;
        if deleted != 0 {
            return Err(format!("repeat teardown deleted {deleted} rows from {table}").into());
        }
    }
    store.clear_session_account()?;
    if store.delete_control(&ControlId::new("ctrl_001"))? != 0 {
        return Err("repeat teardown re-deleted control".into());
    }
    if store.delete_account(&AccountId::new(OWNER))? != 0 {
        return Err("repeat teardown re-deleted account".into());
    }

    assert_counts(&store, 0, "post-teardown")?;
    Ok(())
}

#[test]
fn table_names_outside_allow_list_are_rejected_locally() -> TestResult {
    for name in ["account", "control", "scan; DROP TABLE scan", "users", ""] {
        match ChainTable::from_name(name) {
            Err(rowfence_core::StoreError::Invalid(_)) => {}
            Err(other) => return Err(format!("expected invalid for {name:?}, got {other}").into()),
            Ok(table) => {
                return Err(format!("name {name:?} unexpectedly mapped to {table}").into());
            }
        }
    }
    Ok(())
}
