// crates/rowfence-core/src/core/records.rs
// ============================================================================
// Module: RowFence Chain Records
// Description: Tenant-scoped chain records and their status enumerations.
// Purpose: Model the scan -> finding -> {evidence, remediation, ticket} chain.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Record types for the referential chain persisted by RowFence stores. Every
//! tenant-scoped record carries its owning `account_id` explicitly so backends
//! can enforce the write-side isolation check (`record.account_id` must equal
//! the ambient session tenant) before any SQL executes. Status, severity, and
//! provider enumerations serialize to their SCREAMING_SNAKE wire forms, which
//! are also the exact strings stored in and read back from the database.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;

use crate::core::identifiers::AccountId;
use crate::core::identifiers::AssetId;
use crate::core::identifiers::ControlId;
use crate::core::identifiers::EvidenceId;
use crate::core::identifiers::FindingId;
use crate::core::identifiers::IntegrationId;
use crate::core::identifiers::NotificationId;
use crate::core::identifiers::PolicyId;
use crate::core::identifiers::RemediationId;
use crate::core::identifiers::ScanId;
use crate::core::identifiers::TicketId;

// ============================================================================
// SECTION: Status Enumerations
// ============================================================================

/// Scan lifecycle status.
///
/// # Invariants
/// - Wire forms are SCREAMING_SNAKE and stable; stored text round-trips
///   through [`ScanStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScanStatus {
    /// Scan queued but not yet started.
    Pending,
    /// Scan currently executing.
    Running,
    /// Scan finished and produced findings.
    Completed,
    /// Scan aborted with an error.
    Failed,
}

impl ScanStatus {
    /// Returns the stored wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Running => "RUNNING",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
        }
    }

    /// Parses a stored wire form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "RUNNING" => Some(Self::Running),
            "COMPLETED" => Some(Self::Completed),
            "FAILED" => Some(Self::Failed),
            _ => None,
        }
    }
}

/// Finding lifecycle status.
///
/// # Invariants
/// - Wire forms are SCREAMING_SNAKE and stable; stored text round-trips
///   through [`FindingStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FindingStatus {
    /// Finding detected and unresolved.
    Open,
    /// Remediation in progress.
    InProgress,
    /// Finding resolved.
    Resolved,
    /// Finding suppressed by policy.
    Suppressed,
}

impl FindingStatus {
    /// Returns the stored wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "OPEN",
            Self::InProgress => "IN_PROGRESS",
            Self::Resolved => "RESOLVED",
            Self::Suppressed => "SUPPRESSED",
        }
    }

    /// Parses a stored wire form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "OPEN" => Some(Self::Open),
            "IN_PROGRESS" => Some(Self::InProgress),
            "RESOLVED" => Some(Self::Resolved),
            "SUPPRESSED" => Some(Self::Suppressed),
            _ => None,
        }
    }
}

/// Finding severity.
///
/// # Invariants
/// - Wire forms are SCREAMING_SNAKE and stable; stored text round-trips
///   through [`Severity::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    /// Low severity.
    Low,
    /// Medium severity.
    Medium,
    /// High severity.
    High,
    /// Critical severity.
    Critical,
}

impl Severity {
    /// Returns the stored wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }

    /// Parses a stored wire form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "LOW" => Some(Self::Low),
            "MEDIUM" => Some(Self::Medium),
            "HIGH" => Some(Self::High),
            "CRITICAL" => Some(Self::Critical),
            _ => None,
        }
    }
}

/// Remediation lifecycle status.
///
/// # Invariants
/// - Wire forms are SCREAMING_SNAKE and stable; stored text round-trips
///   through [`RemediationStatus::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RemediationStatus {
    /// Remediation proposed but not applied.
    Pending,
    /// Remediation applied.
    Applied,
    /// Remediation verified effective.
    Verified,
}

impl RemediationStatus {
    /// Returns the stored wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Applied => "APPLIED",
            Self::Verified => "VERIFIED",
        }
    }

    /// Parses a stored wire form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "PENDING" => Some(Self::Pending),
            "APPLIED" => Some(Self::Applied),
            "VERIFIED" => Some(Self::Verified),
            _ => None,
        }
    }
}

/// External ticketing provider.
///
/// # Invariants
/// - Wire forms are SCREAMING_SNAKE and stable; stored text round-trips
///   through [`TicketProvider::parse`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TicketProvider {
    /// Atlassian Jira.
    Jira,
    /// ServiceNow.
    ServiceNow,
    /// GitHub issues.
    Github,
}

impl TicketProvider {
    /// Returns the stored wire form.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Jira => "JIRA",
            Self::ServiceNow => "SERVICE_NOW",
            Self::Github => "GITHUB",
        }
    }

    /// Parses a stored wire form.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "JIRA" => Some(Self::Jira),
            "SERVICE_NOW" => Some(Self::ServiceNow),
            "GITHUB" => Some(Self::Github),
            _ => None,
        }
    }
}

// ============================================================================
// SECTION: Unscoped Records
// ============================================================================

/// Tenant root; all tenant-scoped rows reference an account.
///
/// # Invariants
/// - Accounts are not tenant-scoped themselves; they are created and deleted
///   outside any session-tenant context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account identifier.
    pub id: AccountId,
    /// Display name for the account.
    pub name: String,
}

/// Global control reference data.
///
/// # Invariants
/// - Control rows are visible independent of tenant context.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Control {
    /// Control identifier.
    pub id: ControlId,
    /// Control title.
    pub title: String,
}

// ============================================================================
// SECTION: Chain Records
// ============================================================================

/// A unit of scanning work producing findings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scan {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Scan identifier.
    pub id: ScanId,
    /// Scan lifecycle status.
    pub status: ScanStatus,
    /// Control set evaluated by the scan.
    pub control_set_id: ControlId,
}

/// A compliance policy owned by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Policy {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Policy identifier.
    pub id: PolicyId,
    /// Policy name.
    pub name: String,
}

/// An asset under scan coverage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Asset identifier.
    pub id: AssetId,
    /// Asset kind label (for example `HOST` or `REPOSITORY`).
    pub kind: String,
}

/// A detected issue produced by a scan against an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Finding identifier.
    pub id: FindingId,
    /// Parent scan identifier.
    pub scan_id: ScanId,
    /// Affected asset identifier.
    pub asset_id: AssetId,
    /// Finding lifecycle status.
    pub status: FindingStatus,
    /// Finding severity.
    pub severity: Severity,
}

/// Supporting evidence attached to a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Evidence identifier.
    pub id: EvidenceId,
    /// Referenced finding identifier.
    pub finding_id: FindingId,
    /// Optional evidence detail.
    pub detail: Option<String>,
}

/// A remediation tracked against a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Remediation {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Remediation identifier.
    pub id: RemediationId,
    /// Referenced finding identifier.
    pub finding_id: FindingId,
    /// Remediation lifecycle status.
    pub status: RemediationStatus,
}

/// An external ticket filed for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Ticket identifier.
    pub id: TicketId,
    /// Referenced finding identifier.
    pub finding_id: FindingId,
    /// External ticketing provider.
    pub provider: TicketProvider,
    /// Provider-side ticket key (for example `JIRA-1001`).
    pub external_key: String,
}

/// An outbound integration configured for an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Integration {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Integration identifier.
    pub id: IntegrationId,
    /// Integration provider label.
    pub provider: String,
}

/// A notification emitted for a finding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    /// Owning account identifier.
    pub account_id: AccountId,
    /// Notification identifier.
    pub id: NotificationId,
    /// Referenced finding identifier.
    pub finding_id: FindingId,
    /// Delivery channel label (for example `EMAIL` or `SLACK`).
    pub channel: String,
}
