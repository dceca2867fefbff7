// crates/rowfence-core/src/core/table.rs
// ============================================================================
// Module: RowFence Table Allow-List
// Description: Closed enumeration over tenant-scoped chain table names.
// Purpose: Validate dynamic table names before any SQL is constructed.
// Dependencies: serde
// ============================================================================

//! ## Overview
//! Dynamic table selection is an injection vector when names are interpolated
//! into SQL text. [`ChainTable`] closes the set of tenant-scoped tables so a
//! name is either one of the nine known identifiers or a local validation
//! error raised before any query is built. `account` and `control` are
//! deliberately absent: they are not tenant-scoped and never participate in
//! tenant-bound count or delete sweeps.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::fmt;

use serde::Deserialize;
use serde::Serialize;

use crate::interfaces::StoreError;

// ============================================================================
// SECTION: Chain Table
// ============================================================================

/// Tenant-scoped chain table names.
///
/// # Invariants
/// - The enum is closed; [`ChainTable::as_str`] values are the only table
///   names ever interpolated into tenant-bound SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChainTable {
    /// Scan table.
    Scan,
    /// Policy table.
    Policy,
    /// Finding table.
    Finding,
    /// Evidence table.
    Evidence,
    /// Remediation table.
    Remediation,
    /// Ticket table.
    Ticket,
    /// Integration table.
    Integration,
    /// Notification table.
    Notification,
    /// Asset table.
    Asset,
}

impl ChainTable {
    /// Every tenant-scoped table, in count-sweep order.
    pub const ALL: [Self; 9] = [
        Self::Scan,
        Self::Policy,
        Self::Finding,
        Self::Evidence,
        Self::Remediation,
        Self::Ticket,
        Self::Integration,
        Self::Notification,
        Self::Asset,
    ];

    /// Validates a dynamic table name against the allow-list.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Invalid`] for any name outside the nine
    /// tenant-scoped tables; no SQL is constructed for rejected names.
    pub fn from_name(name: &str) -> Result<Self, StoreError> {
        match name {
            "scan" => Ok(Self::Scan),
            "policy" => Ok(Self::Policy),
            "finding" => Ok(Self::Finding),
            "evidence" => Ok(Self::Evidence),
            "remediation" => Ok(Self::Remediation),
            "ticket" => Ok(Self::Ticket),
            "integration" => Ok(Self::Integration),
            "notification" => Ok(Self::Notification),
            "asset" => Ok(Self::Asset),
            other => {
                Err(StoreError::Invalid(format!("table name not in allow-list: {other}")))
            }
        }
    }

    /// Returns the SQL identifier for the table.
    ///
    /// Safe to interpolate into query text only because the enum is closed.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Scan => "scan",
            Self::Policy => "policy",
            Self::Finding => "finding",
            Self::Evidence => "evidence",
            Self::Remediation => "remediation",
            Self::Ticket => "ticket",
            Self::Integration => "integration",
            Self::Notification => "notification",
            Self::Asset => "asset",
        }
    }

    /// Reverse-dependency deletion order for fixture teardown.
    ///
    /// Children are deleted before the rows they reference so foreign keys
    /// never dangle mid-sweep.
    #[must_use]
    pub const fn teardown_order() -> [Self; 9] {
        [
            Self::Notification,
            Self::Integration,
            Self::Ticket,
            Self::Remediation,
            Self::Evidence,
            Self::Finding,
            Self::Asset,
            Self::Scan,
            Self::Policy,
        ]
    }
}

impl fmt::Display for ChainTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
