// crates/rowfence-core/tests/table_allowlist.rs
// ============================================================================
// Module: Table Allow-List Unit Tests
// Description: Validate the closed chain-table enumeration.
// Purpose: Ensure dynamic table names are rejected before SQL construction.
// Dependencies: rowfence-core
// ============================================================================

//! ## Overview
//! Unit coverage for the chain-table allow-list:
//! - Every allow-listed name round-trips through `from_name`.
//! - Unknown names fail with a local validation error.
//! - Teardown order visits each table exactly once, children first.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use std::collections::HashSet;

use rowfence_core::ChainTable;
use rowfence_core::StoreError;

#[test]
fn from_name_accepts_every_allow_listed_table() {
    for table in ChainTable::ALL {
        let parsed = ChainTable::from_name(table.as_str()).expect("allow-listed name");
        assert_eq!(parsed, table);
    }
}

#[test]
fn from_name_rejects_unknown_table() {
    let result = ChainTable::from_name("users; DROP TABLE finding");
    assert!(matches!(result, Err(StoreError::Invalid(_))));
}

#[test]
fn from_name_rejects_unscoped_tables() {
    assert!(matches!(ChainTable::from_name("account"), Err(StoreError::Invalid(_))));
    assert!(matches!(ChainTable::from_name("control"), Err(StoreError::Invalid(_))));
}

#[test]
fn from_name_is_case_sensitive() {
    assert!(matches!(ChainTable::from_name("Scan"), Err(StoreError::Invalid(_))));
}

#[test]
fn all_covers_exactly_nine_tables() {
    let names: HashSet<&str> = ChainTable::ALL.iter().map(|table| table.as_str()).collect();
    assert_eq!(names.len(), 9);
    for expected in [
        "scan",
        "policy",
        "finding",
        "evidence",
        "remediation",
        "ticket",
        "integration",
        "notification",
        "asset",
    ] {
        assert!(names.contains(expected), "missing table {expected}");
    }
}

#[test]
fn teardown_order_is_a_permutation_with_children_first() {
    let order = ChainTable::teardown_order();
    let unique: HashSet<ChainTable> = order.iter().copied().collect();
    assert_eq!(unique.len(), ChainTable::ALL.len());

    let position = |table: ChainTable| {
        order.iter().position(|entry| *entry == table).expect("table present")
    };
    // Children of finding are deleted before finding; finding before scan.
    assert!(position(ChainTable::Ticket) < position(ChainTable::Finding));
    assert!(position(ChainTable::Remediation) < position(ChainTable::Finding));
    assert!(position(ChainTable::Evidence) < position(ChainTable::Finding));
    assert!(position(ChainTable::Notification) < position(ChainTable::Finding));
    assert!(position(ChainTable::Finding) < position(ChainTable::Scan));
    assert!(position(ChainTable::Finding) < position(ChainTable::Asset));
}
