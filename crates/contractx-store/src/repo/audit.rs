//! Audit trail persisted to the `audit_log` table

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use chrono::DateTime;
use contractx_core::model::AuditRecord;
use contractx_core::ports::{AuditSink, PortResult};
use rusqlite::params;

use super::{lock, with_conn, SharedConnection};
use crate::errors::{corrupt_column, from_rusqlite, Result};

#[derive(Clone)]
pub struct SqliteAuditSink {
    conn: SharedConnection,
}

impl SqliteAuditSink {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Audit entries for one contract version, oldest first
    pub fn records_for(
        &self,
        contract_number: &str,
        contract_version: i32,
    ) -> Result<Vec<AuditRecord>> {
        let conn = lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT action, severity, ukprn, contract_number, contract_version, message, recorded_at
                 FROM audit_log
                 WHERE contract_number = ?1 AND contract_version = ?2
                 ORDER BY id",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map(params![contract_number, contract_version], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, Option<i32>>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, i32>(4)?,
                    row.get::<_, String>(5)?,
                    row.get::<_, i64>(6)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(action, severity, ukprn, number, version, message, recorded_at)| -> Result<AuditRecord> {
                Ok(AuditRecord {
                    action: action.parse().map_err(|_| corrupt_column("action", &action))?,
                    severity: severity
                        .parse()
                        .map_err(|_| corrupt_column("severity", &severity))?,
                    ukprn,
                    contract_number: number,
                    contract_version: version,
                    message,
                    recorded_at: DateTime::from_timestamp_millis(recorded_at)
                        .ok_or_else(|| corrupt_column("recorded_at", &recorded_at.to_string()))?,
                })
            })
            .collect()
    }
}

#[async_trait]
impl AuditSink for SqliteAuditSink {
    async fn write(&self, record: AuditRecord) -> PortResult<()> {
        with_conn(&self.conn, "audit_write", move |conn| {
            conn.execute(
                "INSERT INTO audit_log
                    (action, severity, ukprn, contract_number, contract_version, message, recorded_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
                params![
                    record.action.as_str(),
                    record.severity.as_str(),
                    record.ukprn,
                    record.contract_number,
                    record.contract_version,
                    record.message,
                    record.recorded_at.timestamp_millis(),
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("audit_write"))?;
            Ok(())
        })
        .await
    }
}
