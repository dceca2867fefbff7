// crates/rowfence-store-sqlite/tests/proptest_isolation.rs
// ============================================================================
// Module: Isolation Property-Based Tests
// Description: Property tests for cross-tenant invisibility.
// Purpose: Verify the isolation invariant across arbitrary tenant ids.
// ============================================================================

//! Property-based tests for the isolation invariant: rows seeded under tenant
//! A are never visible under a different tenant B or with no session tenant,
//! regardless of the identifiers involved.

#![allow(
    clippy::panic,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic_in_result_fn,
    clippy::unwrap_in_result,
    reason = "Test-only assertions and helpers are permitted."
)]

use proptest::prelude::*;
use rowfence_core::Account;
use rowfence_core::AccountId;
use rowfence_core::ChainStore;
use rowfence_core::ChainTable;
use rowfence_core::ControlId;
use rowfence_core::Policy;
use rowfence_core::PolicyId;
use rowfence_core::Scan;
use rowfence_core::ScanId;
use rowfence_core::ScanStatus;
use rowfence_core::TenantSession;
use rowfence_store_sqlite::SqliteChainStore;
use rowfence_store_sqlite::SqliteStoreConfig;
use rowfence_store_sqlite::SqliteStoreMode;
use rowfence_store_sqlite::SqliteSyncMode;
use tempfile::TempDir;

/// Opaque account identifiers drawn from a printable alphabet.
fn account_id_strategy() -> impl Strategy<Value = String> {
    "[a-z0-9_]{1,24}"
}

fn open_store(dir: &TempDir) -> SqliteChainStore {
    let config = SqliteStoreConfig {
        path: dir.path().join("rowfence.db"),
        busy_timeout_ms: 1_000,
        journal_mode: SqliteStoreMode::Delete,
        sync_mode: SqliteSyncMode::Normal,
    };
    SqliteChainStore::new(&config).expect("open store")
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn rows_seeded_under_one_tenant_are_invisible_elsewhere(
        owner_raw in account_id_strategy(),
        other_raw in account_id_strategy(),
    ) {
        prop_assume!(owner_raw != other_raw);
        let dir = TempDir::new().expect("tempdir");
        let store = open_store(&dir);

        let owner = AccountId::new(owner_raw);
        let other = AccountId::new(other_raw);
        store.insert_account(&Account {
            id: owner.clone(),
            name: "owner".to_string(),
        }).expect("insert account");

        store.set_session_account(&owner).expect("set session");
        store.insert_scan(&Scan {
            account_id: owner.clone(),
            id: ScanId::new("scan_001"),
            status: ScanStatus::Completed,
            control_set_id: ControlId::new("ctrl_001"),
        }).expect("insert scan");
        store.insert_policy(&Policy {
            account_id: owner.clone(),
            id: PolicyId::new("pol_001"),
            name: "policy".to_string(),
        }).expect("insert policy");

        prop_assert_eq!(store.count_rows(ChainTable::Scan).expect("count"), 1);
        prop_assert_eq!(store.count_rows(ChainTable::Policy).expect("count"), 1);

        store.set_session_account(&other).expect("set other session");
        prop_assert_eq!(store.count_rows(ChainTable::Scan).expect("count"), 0);
        prop_assert_eq!(store.count_rows(ChainTable::Policy).expect("count"), 0);

        store.clear_session_account().expect("clear session");
        prop_assert_eq!(store.count_rows(ChainTable::Scan).expect("count"), 0);
        prop_assert_eq!(store.count_rows(ChainTable::Policy).expect("count"), 0);
    }
}
