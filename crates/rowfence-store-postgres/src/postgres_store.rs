// crates/rowfence-store-postgres/src/postgres_store.rs
// ============================================================================
// Module: Postgres Chain Store
// Description: ChainStore backed by Postgres with native row-level security.
// Purpose: Delegate tenant isolation to database policies, not query text.
// ============================================================================

//! ## Overview
//! This module implements [`ChainStore`] over Postgres. Isolation is enforced
//! by the database: migration installs `ENABLE` and `FORCE ROW LEVEL
//! SECURITY` on every tenant-scoped table plus a policy comparing
//! `account_id` against `rowfence.current_account_id()`, an accessor over the
//! session setting `rowfence.account_id`. Queries in this module carry no
//! tenant predicates; with no session tenant the accessor returns NULL, no
//! policy matches, and scoped reads see zero rows while writes are rejected
//! by the policy's `WITH CHECK` clause (fail-closed).
//!
//! The connection role must not own the tables; `FORCE` exists so even the
//! owner cannot bypass policies, but the harness role is expected to be a
//! plain application role regardless.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::sync::Arc;
use std::sync::Mutex;
use std::sync::MutexGuard;
use std::time::Duration;

use postgres::Client;
use postgres::NoTls;
use postgres::error::SqlState;
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
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// Session setting carrying the ambient tenant for row-level security.
const SESSION_SETTING: &str = "rowfence.account_id";

/// Schema, accessor function, and table bootstrap for the chain store.
const SCHEMA_DDL: &str = "CREATE SCHEMA IF NOT EXISTS rowfence;
    CREATE OR REPLACE FUNCTION rowfence.current_account_id() RETURNS text LANGUAGE sql STABLE AS \
     $$ SELECT nullif(current_setting('rowfence.account_id', true), '') $$;
    CREATE TABLE IF NOT EXISTS rowfence.account (id TEXT PRIMARY KEY, name TEXT NOT NULL);
    CREATE TABLE IF NOT EXISTS rowfence.control (id TEXT PRIMARY KEY, title TEXT NOT NULL);
    CREATE TABLE IF NOT EXISTS rowfence.scan (account_id TEXT NOT NULL, id TEXT NOT NULL, status \
     TEXT NOT NULL, control_set_id TEXT NOT NULL, PRIMARY KEY (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.policy (account_id TEXT NOT NULL, id TEXT NOT NULL, name \
     TEXT NOT NULL, PRIMARY KEY (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.asset (account_id TEXT NOT NULL, id TEXT NOT NULL, kind \
     TEXT NOT NULL, PRIMARY KEY (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.finding (account_id TEXT NOT NULL, id TEXT NOT NULL, \
     scan_id TEXT NOT NULL, asset_id TEXT NOT NULL, status TEXT NOT NULL, severity TEXT NOT \
     NULL, PRIMARY KEY (account_id, id), FOREIGN KEY (account_id, scan_id) REFERENCES \
     rowfence.scan (account_id, id), FOREIGN KEY (account_id, asset_id) REFERENCES rowfence.asset \
     (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.evidence (account_id TEXT NOT NULL, id TEXT NOT NULL, \
     finding_id TEXT NOT NULL, detail TEXT, PRIMARY KEY (account_id, id), FOREIGN KEY \
     (account_id, finding_id) REFERENCES rowfence.finding (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.remediation (account_id TEXT NOT NULL, id TEXT NOT NULL, \
     finding_id TEXT NOT NULL, status TEXT NOT NULL, PRIMARY KEY (account_id, id), FOREIGN KEY \
     (account_id, finding_id) REFERENCES rowfence.finding (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.ticket (account_id TEXT NOT NULL, id TEXT NOT NULL, \
     finding_id TEXT NOT NULL, provider TEXT NOT NULL, external_key TEXT NOT NULL, PRIMARY KEY \
     (account_id, id), FOREIGN KEY (account_id, finding_id) REFERENCES rowfence.finding \
     (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.integration (account_id TEXT NOT NULL, id TEXT NOT NULL, \
     provider TEXT NOT NULL, PRIMARY KEY (account_id, id));
    CREATE TABLE IF NOT EXISTS rowfence.notification (account_id TEXT NOT NULL, id TEXT NOT \
     NULL, finding_id TEXT NOT NULL, channel TEXT NOT NULL, PRIMARY KEY (account_id, id), \
     FOREIGN KEY (account_id, finding_id) REFERENCES rowfence.finding (account_id, id));";

// ============================================================================
// SECTION: Config
// ============================================================================

/// Configuration for the Postgres chain store.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PostgresStoreConfig {
    /// Postgres connection string.
    pub connection: String,
    /// Connect timeout in milliseconds.
    #[serde(default = "default_connect_timeout_ms")]
    pub connect_timeout_ms: u64,
    /// Statement timeout in milliseconds.
    #[serde(default = "default_statement_timeout_ms")]
    pub statement_timeout_ms: u64,
}

impl Default for PostgresStoreConfig {
    fn default() -> Self {
        Self {
            connection: "host=localhost port=5432 dbname=rowfence_dev user=rowfence_app_rw \
                         password=rowfence_app_rw"
                .to_string(),
            connect_timeout_ms: default_connect_timeout_ms(),
            statement_timeout_ms: default_statement_timeout_ms(),
        }
    }
}

/// Returns the default connect timeout.
const fn default_connect_timeout_ms() -> u64 {
    5_000
}

/// Returns the default statement timeout.
const fn default_statement_timeout_ms() -> u64 {
    30_000
}

// ============================================================================
// SECTION: Errors
// ============================================================================

/// Postgres store errors.
#[derive(Debug, Error)]
pub enum PostgresStoreError {
    /// Postgres error.
    #[error("postgres store error: {0}")]
    Postgres(String),
    /// Invalid configuration or data.
    #[error("postgres store invalid data: {0}")]
    Invalid(String),
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// Postgres-backed chain store with policy-enforced tenant isolation.
///
/// # Invariants
/// - Client access is serialized through a mutex; session state lives in the
///   underlying database connection, not in this struct.
/// - Tenant-scoped statements carry no tenant predicates; row-level security
///   policies restrict visibility and writes.
pub struct PostgresChainStore {
    /// Shared client guarded by a mutex.
    client: Mutex<Client>,
    /// Audit sink for session and sweep events.
    audit: Arc<dyn StoreAuditSink>,
}

impl PostgresChainStore {
    /// Connects to Postgres, runs migrations, and returns a store with a
    /// noop audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresStoreError`] when the connection or migration fails.
    pub fn new(config: &PostgresStoreConfig) -> Result<Self, PostgresStoreError> {
        Self::with_audit(config, Arc::new(NoopAuditSink))
    }

    /// Connects to Postgres, runs migrations, and returns a store with the
    /// given audit sink.
    ///
    /// # Errors
    ///
    /// Returns [`PostgresStoreError`] when the connection or migration fails.
    pub fn with_audit(
        config: &PostgresStoreConfig,
        audit: Arc<dyn StoreAuditSink>,
    ) -> Result<Self, PostgresStoreError> {
        let mut pg_config = config
            .connection
            .parse::<postgres::Config>()
            .map_err(|err| PostgresStoreError::Invalid(err.to_string()))?;
        pg_config.connect_timeout(Duration::from_millis(config.connect_timeout_ms));
        let options = format!("-c statement_timeout={}", config.statement_timeout_ms);
        pg_config.options(&options);
        let client = pg_config
            .connect(NoTls)
            .map_err(|err| PostgresStoreError::Postgres(err.to_string()))?;
        let store = Self {
            client: Mutex::new(client),
            audit,
        };
        store.migrate()?;
        Ok(store)
    }

    /// Ensures schema, tables, and row-level security policies exist.
    fn migrate(&self) -> Result<(), PostgresStoreError> {
        let mut guard = self
            .client
            .lock()
            .map_err(|_| PostgresStoreError::Postgres("client mutex poisoned".to_string()))?;
        guard
            .batch_execute(SCHEMA_DDL)
            .map_err(|err| PostgresStoreError::Postgres(err.to_string()))?;
        for table in ChainTable::ALL {
            guard
                .batch_execute(&policy_ddl(table))
                .map_err(|err| PostgresStoreError::Postgres(err.to_string()))?;
        }
        Ok(())
    }

    /// Locks the client, mapping mutex poisoning to a store error.
    fn client(&self) -> Result<MutexGuard<'_, Client>, StoreError> {
        self.client.lock().map_err(|_| StoreError::Db("client mutex poisoned".to_string()))
    }

    /// Reads the session tenant directly from the database connection.
    fn session_snapshot(guard: &mut Client) -> Result<Option<AccountId>, StoreError> {
        let row = guard
            .query_one("SELECT rowfence.current_account_id()", &[])
            .map_err(map_db_err)?;
        let value: Option<String> = row.get(0);
        Ok(value.map(AccountId::new))
    }

    /// Opens an explicit transaction; pair with [`Self::commit_work`].
    ///
    /// Session settings applied with `set_config(..., false)` survive the
    /// commit, so callers can seed, commit, and keep their tenant context.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the statement fails.
    pub fn begin_work(&self) -> Result<(), StoreError> {
        self.client()?.batch_execute("BEGIN").map_err(map_db_err)
    }

    /// Commits the transaction opened by [`Self::begin_work`].
    ///
    /// # Errors
    ///
    /// Returns [`StoreError`] when the statement fails.
    pub fn commit_work(&self) -> Result<(), StoreError> {
        self.client()?.batch_execute("COMMIT").map_err(map_db_err)
    }
}

/// Maps a Postgres error, translating policy rejections into denials.
fn map_db_err(err: postgres::Error) -> StoreError {
    if err.code() == Some(&SqlState::INSUFFICIENT_PRIVILEGE) {
        return StoreError::Denied(err.to_string());
    }
    StoreError::Db(err.to_string())
}

/// Builds row-level security DDL for one tenant-scoped table.
///
/// Table names come from the closed [`ChainTable`] enum, never from caller
/// input, so interpolation is safe here.
fn policy_ddl(table: ChainTable) -> String {
    let name = table.as_str();
    format!(
        "ALTER TABLE rowfence.{name} ENABLE ROW LEVEL SECURITY;
         ALTER TABLE rowfence.{name} FORCE ROW LEVEL SECURITY;
         DROP POLICY IF EXISTS {name}_tenant_isolation ON rowfence.{name};
         CREATE POLICY {name}_tenant_isolation ON rowfence.{name} USING (account_id = \
         rowfence.current_account_id()) WITH CHECK (account_id = \
         rowfence.current_account_id());"
    )
}

// ============================================================================
// SECTION: Tenant Session
// ============================================================================

impl TenantSession for PostgresChainStore {
    fn set_session_account(&self, account_id: &AccountId) -> Result<(), StoreError> {
        {
            let mut guard = self.client()?;
            guard
                .execute(
                    "SELECT set_config($1, $2, false)",
                    &[&SESSION_SETTING, &account_id.as_str()],
                )
                .map_err(map_db_err)?;
        }
        self.audit.record_session(&SessionAuditEvent::set(account_id));
        Ok(())
    }

    fn clear_session_account(&self) -> Result<(), StoreError> {
        {
            let mut guard = self.client()?;
            guard.batch_execute("RESET rowfence.account_id").map_err(map_db_err)?;
        }
        self.audit.record_session(&SessionAuditEvent::clear());
        Ok(())
    }

    fn current_account(&self) -> Result<Option<AccountId>, StoreError> {
        let mut guard = self.client()?;
        Self::session_snapshot(&mut guard)
    }
}

// ============================================================================
// SECTION: Chain Store
// ============================================================================

impl ChainStore for PostgresChainStore {
    fn insert_account(&self, account: &Account) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.account (id, name) VALUES ($1, $2)",
                &[&account.id.as_str(), &account.name],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_control(&self, control: &Control) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.control (id, title) VALUES ($1, $2)",
                &[&control.id.as_str(), &control.title],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_scan(&self, scan: &Scan) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.scan (account_id, id, status, control_set_id) VALUES ($1, \
                 $2, $3, $4)",
                &[
                    &scan.account_id.as_str(),
                    &scan.id.as_str(),
                    &scan.status.as_str(),
                    &scan.control_set_id.as_str(),
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_policy(&self, policy: &Policy) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.policy (account_id, id, name) VALUES ($1, $2, $3)",
                &[&policy.account_id.as_str(), &policy.id.as_str(), &policy.name],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_asset(&self, asset: &Asset) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.asset (account_id, id, kind) VALUES ($1, $2, $3)",
                &[&asset.account_id.as_str(), &asset.id.as_str(), &asset.kind],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_finding(&self, finding: &Finding) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.finding (account_id, id, scan_id, asset_id, status, \
                 severity) VALUES ($1, $2, $3, $4, $5, $6)",
                &[
                    &finding.account_id.as_str(),
                    &finding.id.as_str(),
                    &finding.scan_id.as_str(),
                    &finding.asset_id.as_str(),
                    &finding.status.as_str(),
                    &finding.severity.as_str(),
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_evidence(&self, evidence: &Evidence) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.evidence (account_id, id, finding_id, detail) VALUES ($1, \
                 $2, $3, $4)",
                &[
                    &evidence.account_id.as_str(),
                    &evidence.id.as_str(),
                    &evidence.finding_id.as_str(),
                    &evidence.detail,
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_remediation(&self, remediation: &Remediation) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.remediation (account_id, id, finding_id, status) VALUES \
                 ($1, $2, $3, $4)",
                &[
                    &remediation.account_id.as_str(),
                    &remediation.id.as_str(),
                    &remediation.finding_id.as_str(),
                    &remediation.status.as_str(),
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_ticket(&self, ticket: &Ticket) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.ticket (account_id, id, finding_id, provider, \
                 external_key) VALUES ($1, $2, $3, $4, $5)",
                &[
                    &ticket.account_id.as_str(),
                    &ticket.id.as_str(),
                    &ticket.finding_id.as_str(),
                    &ticket.provider.as_str(),
                    &ticket.external_key,
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_integration(&self, integration: &Integration) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.integration (account_id, id, provider) VALUES ($1, $2, $3)",
                &[
                    &integration.account_id.as_str(),
                    &integration.id.as_str(),
                    &integration.provider,
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn insert_notification(&self, notification: &Notification) -> Result<(), StoreError> {
        let mut guard = self.client()?;
        guard
            .execute(
                "INSERT INTO rowfence.notification (account_id, id, finding_id, channel) VALUES \
                 ($1, $2, $3, $4)",
                &[
                    &notification.account_id.as_str(),
                    &notification.id.as_str(),
                    &notification.finding_id.as_str(),
                    &notification.channel,
                ],
            )
            .map_err(map_db_err)?;
        Ok(())
    }

    fn count_rows(&self, table: ChainTable) -> Result<u64, StoreError> {
        let mut guard = self.client()?;
        let sql = format!(
            "SELECT count(*) FROM rowfence.{} WHERE account_id = rowfence.current_account_id()",
            table.as_str()
        );
        let row = guard.query_one(&sql, &[]).map_err(map_db_err)?;
        let count: i64 = row.get(0);
        u64::try_from(count)
            .map_err(|_| StoreError::Invalid(format!("negative row count for {table}")))
    }

    fn scan(&self, id: &ScanId) -> Result<Option<Scan>, StoreError> {
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT account_id, id, status, control_set_id FROM rowfence.scan WHERE id = $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let account_id: String = row.get(0);
        let id: String = row.get(1);
        let status: String = row.get(2);
        let control_set_id: String = row.get(3);
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
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT account_id, id, scan_id, asset_id, status, severity FROM \
                 rowfence.finding WHERE id = $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let account_id: String = row.get(0);
        let id: String = row.get(1);
        let scan_id: String = row.get(2);
        let asset_id: String = row.get(3);
        let status: String = row.get(4);
        let severity: String = row.get(5);
        let status = FindingStatus::parse(&status)
            .ok_or_else(|| StoreError::Invalid(format!("unknown finding status: {status}")))?;
        let severity = Severity::parse(&severity)
            .ok_or_else(|| StoreError::Invalid(format!("unknown severity: {severity}")))?;
        Ok(Some(Finding {
            account_id: AccountId::new(account_id),
            id: FindingId::new(id),
            scan_id: ScanId::new(scan_id),
            asset_id: AssetId::new(asset_id),
            status,
            severity,
        }))
    }

    fn evidence(&self, id: &EvidenceId) -> Result<Option<Evidence>, StoreError> {
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT account_id, id, finding_id, detail FROM rowfence.evidence WHERE id = $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        Ok(row.map(|row| {
            let account_id: String = row.get(0);
            let id: String = row.get(1);
            let finding_id: String = row.get(2);
            let detail: Option<String> = row.get(3);
            Evidence {
                account_id: AccountId::new(account_id),
                id: EvidenceId::new(id),
                finding_id: FindingId::new(finding_id),
                detail,
            }
        }))
    }

    fn remediation(&self, id: &RemediationId) -> Result<Option<Remediation>, StoreError> {
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT account_id, id, finding_id, status FROM rowfence.remediation WHERE id = \
                 $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let account_id: String = row.get(0);
        let id: String = row.get(1);
        let finding_id: String = row.get(2);
        let status: String = row.get(3);
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
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT account_id, id, finding_id, provider, external_key FROM rowfence.ticket \
                 WHERE id = $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        let Some(row) = row else {
            return Ok(None);
        };
        let account_id: String = row.get(0);
        let id: String = row.get(1);
        let finding_id: String = row.get(2);
        let provider: String = row.get(3);
        let external_key: String = row.get(4);
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
        let mut guard = self.client()?;
        let row = guard
            .query_opt(
                "SELECT id, title FROM rowfence.control WHERE id = $1",
                &[&id.as_str()],
            )
            .map_err(map_db_err)?;
        Ok(row.map(|row| {
            let id: String = row.get(0);
            let title: String = row.get(1);
            Control {
                id: ControlId::new(id),
                title,
            }
        }))
    }

    fn delete_rows(&self, table: ChainTable) -> Result<u64, StoreError> {
        let (session, rows) = {
            let mut guard = self.client()?;
            let session = Self::session_snapshot(&mut guard)?;
            let sql = format!("DELETE FROM rowfence.{}", table.as_str());
            let rows = guard.execute(&sql, &[]).map_err(map_db_err)?;
            (session, rows)
        };
        self.audit.record_sweep(&SweepAuditEvent::teardown_delete(session.as_ref(), table, rows));
        Ok(rows)
    }

    fn delete_control(&self, id: &ControlId) -> Result<u64, StoreError> {
        let mut guard = self.client()?;
        guard
            .execute("DELETE FROM rowfence.control WHERE id = $1", &[&id.as_str()])
            .map_err(map_db_err)
    }

    fn delete_account(&self, id: &AccountId) -> Result<u64, StoreError> {
        let mut guard = self.client()?;
        guard
            .execute("DELETE FROM rowfence.account WHERE id = $1", &[&id.as_str()])
            .map_err(map_db_err)
    }

    fn load_fixture(&self, sql: &str) -> Result<(), StoreError> {
        let account = {
            let mut guard = self.client()?;
            let Some(account) = Self::session_snapshot(&mut guard)? else {
                return Err(StoreError::Denied(
                    "fixture execution requires an active session tenant".to_string(),
                ));
            };
            guard.batch_execute(sql).map_err(map_db_err)?;
            account
        };
        self.audit.record_sweep(&SweepAuditEvent::fixture_loaded(&account));
        Ok(())
    }
}

// ============================================================================
// SECTION: Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use rowfence_core::ChainTable;

    use super::PostgresStoreConfig;
    use super::SCHEMA_DDL;
    use super::policy_ddl;

    #[test]
    fn default_config_targets_local_dev_database() {
        let config = PostgresStoreConfig::default();
        assert!(config.connection.contains("dbname=rowfence_dev"));
        assert!(config.connection.contains("user=rowfence_app_rw"));
        assert_eq!(config.connect_timeout_ms, 5_000);
        assert_eq!(config.statement_timeout_ms, 30_000);
    }

    #[test]
    fn schema_ddl_installs_accessor_and_schema() {
        assert!(SCHEMA_DDL.contains("CREATE SCHEMA IF NOT EXISTS rowfence"));
        assert!(SCHEMA_DDL.contains("rowfence.current_account_id()"));
        assert!(SCHEMA_DDL.contains("current_setting('rowfence.account_id', true)"));
    }

    #[test]
    fn schema_ddl_creates_every_chain_table() {
        for table in ChainTable::ALL {
            let clause = format!("CREATE TABLE IF NOT EXISTS rowfence.{}", table.as_str());
            assert!(SCHEMA_DDL.contains(&clause), "missing table ddl: {table}");
        }
    }

    #[test]
    fn policy_ddl_forces_row_level_security() {
        for table in ChainTable::ALL {
            let ddl = policy_ddl(table);
            assert!(ddl.contains(&format!(
                "ALTER TABLE rowfence.{} ENABLE ROW LEVEL SECURITY",
                table.as_str()
            )));
            assert!(ddl.contains(&format!(
                "ALTER TABLE rowfence.{} FORCE ROW LEVEL SECURITY",
                table.as_str()
            )));
            assert!(ddl.contains("USING (account_id = rowfence.current_account_id())"));
            assert!(ddl.contains("WITH CHECK (account_id = rowfence.current_account_id())"));
        }
    }

    #[test]
    fn version_constant_is_populated() {
        assert!(!crate::VERSION.is_empty());
        assert!(crate::VERSION.split('.').count() >= 2);
    }
}
