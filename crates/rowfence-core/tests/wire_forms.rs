// crates/rowfence-core/tests/wire_forms.rs
// ============================================================================
// Module: Wire Form Unit Tests
// Description: Validate stored wire forms for status enumerations.
// Purpose: Ensure serde and database text forms agree and stay stable.
// Dependencies: rowfence-core, serde_json
// ============================================================================

//! ## Overview
//! The SCREAMING_SNAKE wire forms are persisted verbatim in database text
//! columns, so serde output, `as_str`, and `parse` must agree on every
//! variant.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    reason = "Test-only assertions favor direct unwrap/expect for clarity."
)]

use rowfence_core::FindingStatus;
use rowfence_core::RemediationStatus;
use rowfence_core::ScanStatus;
use rowfence_core::Severity;
use rowfence_core::TicketProvider;

fn assert_wire<T>(value: T, expected: &str)
where
    T: serde::Serialize + Copy,
{
    let json = serde_json::to_string(&value).expect("serialize wire form");
    assert_eq!(json, format!("\"{expected}\""));
}

#[test]
fn scan_status_wire_forms_are_stable() {
    assert_wire(ScanStatus::Completed, "COMPLETED");
    assert_eq!(ScanStatus::Completed.as_str(), "COMPLETED");
    assert_eq!(ScanStatus::parse("COMPLETED"), Some(ScanStatus::Completed));
    assert_eq!(ScanStatus::parse("completed"), None);
}

#[test]
fn finding_status_wire_forms_are_stable() {
    assert_wire(FindingStatus::Open, "OPEN");
    assert_wire(FindingStatus::InProgress, "IN_PROGRESS");
    assert_eq!(FindingStatus::parse("OPEN"), Some(FindingStatus::Open));
}

#[test]
fn severity_wire_forms_are_stable_and_ordered() {
    assert_wire(Severity::High, "HIGH");
    assert_eq!(Severity::parse("HIGH"), Some(Severity::High));
    assert!(Severity::Low < Severity::Critical);
}

#[test]
fn remediation_status_wire_forms_are_stable() {
    assert_wire(RemediationStatus::Pending, "PENDING");
    assert_eq!(RemediationStatus::parse("APPLIED"), Some(RemediationStatus::Applied));
}

#[test]
fn ticket_provider_wire_forms_are_stable() {
    assert_wire(TicketProvider::Jira, "JIRA");
    assert_eq!(TicketProvider::parse("JIRA"), Some(TicketProvider::Jira));
    assert_eq!(TicketProvider::parse("BUGZILLA"), None);
}

#[test]
fn every_status_round_trips_through_parse() {
    for status in [ScanStatus::Pending, ScanStatus::Running, ScanStatus::Completed, ScanStatus::Failed] {
        assert_eq!(ScanStatus::parse(status.as_str()), Some(status));
    }
    for status in [
        FindingStatus::Open,
        FindingStatus::InProgress,
        FindingStatus::Resolved,
        FindingStatus::Suppressed,
    ] {
        assert_eq!(FindingStatus::parse(status.as_str()), Some(status));
    }
    for severity in [Severity::Low, Severity::Medium, Severity::High, Severity::Critical] {
        assert_eq!(Severity::parse(severity.as_str()), Some(severity));
    }
    for provider in [TicketProvider::Jira, TicketProvider::ServiceNow, TicketProvider::Github] {
        assert_eq!(TicketProvider::parse(provider.as_str()), Some(provider));
    }
}

#[test]
fn version_constant_is_populated() {
    assert!(!rowfence_core::VERSION.is_empty());
    assert!(rowfence_core::VERSION.split('.').count() >= 2);
}
