//! SQLite contract repository
//!
//! Timestamps are stored as epoch milliseconds. `last_updated_at` doubles as
//! the optimistic concurrency token: every write moves it strictly forward,
//! and [`update`](ContractRepository::update) only applies when the stored
//! value still matches the caller's copy.

#![allow(clippy::result_large_err)]

use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use contractx_core::errors::{concurrency_conflict, ContractError, ExError};
use contractx_core::model::{Contract, ContractContent, ContractData, ContractStatus, StatusTransition};
use contractx_core::ports::{ContractIncludes, ContractRepository, PortResult};
use rusqlite::types::ToSql;
use rusqlite::{params, Connection, OptionalExtension, Row, Transaction};

use super::{with_conn, SharedConnection};
use crate::errors::{corrupt_column, from_rusqlite, Result};

const CONTRACT_COLUMNS: &str = "id, contract_number, contract_version, ukprn, title, year,
    value_in_pence, funding_type, contract_type, status, amendment_type,
    parent_contract_number, start_date, end_date, signed_by, signed_by_display_name,
    signed_on, was_manually_approved, created_at, last_updated_at, last_email_reminder_sent";

/// Contract row as stored, before enum and timestamp decoding
struct ContractRow {
    id: i64,
    contract_number: String,
    contract_version: i32,
    ukprn: i32,
    title: String,
    year: String,
    value_in_pence: i64,
    funding_type: String,
    contract_type: String,
    status: String,
    amendment_type: String,
    parent_contract_number: Option<String>,
    start_date: Option<i64>,
    end_date: Option<i64>,
    signed_by: Option<String>,
    signed_by_display_name: Option<String>,
    signed_on: Option<i64>,
    was_manually_approved: bool,
    created_at: i64,
    last_updated_at: i64,
    last_email_reminder_sent: Option<i64>,
}

impl ContractRow {
    fn read(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            contract_number: row.get(1)?,
            contract_version: row.get(2)?,
            ukprn: row.get(3)?,
            title: row.get(4)?,
            year: row.get(5)?,
            value_in_pence: row.get(6)?,
            funding_type: row.get(7)?,
            contract_type: row.get(8)?,
            status: row.get(9)?,
            amendment_type: row.get(10)?,
            parent_contract_number: row.get(11)?,
            start_date: row.get(12)?,
            end_date: row.get(13)?,
            signed_by: row.get(14)?,
            signed_by_display_name: row.get(15)?,
            signed_on: row.get(16)?,
            was_manually_approved: row.get(17)?,
            created_at: row.get(18)?,
            last_updated_at: row.get(19)?,
            last_email_reminder_sent: row.get(20)?,
        })
    }

    fn into_contract(self) -> Result<Contract> {
        Ok(Contract {
            id: self.id,
            contract_number: self.contract_number,
            contract_version: self.contract_version,
            ukprn: self.ukprn,
            title: self.title,
            year: self.year,
            value_in_pence: self.value_in_pence,
            funding_type: parse_column("funding_type", &self.funding_type)?,
            contract_type: parse_column("contract_type", &self.contract_type)?,
            status: parse_column("status", &self.status)?,
            amendment_type: parse_column("amendment_type", &self.amendment_type)?,
            start_date: self.start_date.map(|ms| from_millis("start_date", ms)).transpose()?,
            end_date: self.end_date.map(|ms| from_millis("end_date", ms)).transpose()?,
            signed_by: self.signed_by,
            signed_by_display_name: self.signed_by_display_name,
            signed_on: self.signed_on.map(|ms| from_millis("signed_on", ms)).transpose()?,
            was_manually_approved: self.was_manually_approved,
            created_at: from_millis("created_at", self.created_at)?,
            last_updated_at: from_millis("last_updated_at", self.last_updated_at)?,
            last_email_reminder_sent: self
                .last_email_reminder_sent
                .map(|ms| from_millis("last_email_reminder_sent", ms))
                .transpose()?,
            parent_contract_number: self.parent_contract_number,
            contract_content: None,
            contract_data: None,
            funding_stream_period_codes: Vec::new(),
        })
    }
}

fn parse_column<T>(column: &str, value: &str) -> Result<T>
where
    T: FromStr<Err = ContractError>,
{
    value.parse().map_err(|_| corrupt_column(column, value))
}

fn to_millis(at: DateTime<Utc>) -> i64 {
    at.timestamp_millis()
}

fn from_millis(column: &str, ms: i64) -> Result<DateTime<Utc>> {
    DateTime::from_timestamp_millis(ms).ok_or_else(|| corrupt_column(column, &ms.to_string()))
}

/// Next concurrency token: now, but never at or before the previous one
fn next_stamp(previous_ms: i64) -> i64 {
    to_millis(Utc::now()).max(previous_ms + 1)
}

/// SQLite-backed [`ContractRepository`]
#[derive(Clone)]
pub struct SqliteContractRepository {
    conn: SharedConnection,
}

impl SqliteContractRepository {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    fn select_contracts(
        conn: &Connection,
        filter: &str,
        params: &[&dyn ToSql],
    ) -> Result<Vec<Contract>> {
        let sql = format!("SELECT {} FROM contracts {}", CONTRACT_COLUMNS, filter);
        let mut stmt = conn.prepare(&sql).map_err(from_rusqlite)?;
        let rows = stmt
            .query_map(params, ContractRow::read)
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;
        rows.into_iter().map(ContractRow::into_contract).collect()
    }

    fn select_one(
        conn: &Connection,
        filter: &str,
        params: &[&dyn ToSql],
        includes: ContractIncludes,
    ) -> Result<Option<Contract>> {
        let sql = format!("SELECT {} FROM contracts {}", CONTRACT_COLUMNS, filter);
        let row = conn
            .query_row(&sql, params, ContractRow::read)
            .optional()
            .map_err(from_rusqlite)?;

        match row {
            Some(row) => {
                let mut contract = row.into_contract()?;
                Self::load_includes(conn, &mut contract, includes)?;
                Ok(Some(contract))
            }
            None => Ok(None),
        }
    }

    fn load_includes(
        conn: &Connection,
        contract: &mut Contract,
        includes: ContractIncludes,
    ) -> Result<()> {
        if includes.content {
            contract.contract_content = conn
                .query_row(
                    "SELECT file_name, content, size FROM contract_contents WHERE contract_id = ?1",
                    [contract.id],
                    |row| {
                        Ok(ContractContent {
                            file_name: row.get(0)?,
                            content: row.get(1)?,
                            size: row.get(2)?,
                        })
                    },
                )
                .optional()
                .map_err(from_rusqlite)?;
        }

        if includes.data {
            contract.contract_data = conn
                .query_row(
                    "SELECT original_contract_xml FROM contract_data WHERE contract_id = ?1",
                    [contract.id],
                    |row| {
                        Ok(ContractData {
                            original_contract_xml: row.get(0)?,
                        })
                    },
                )
                .optional()
                .map_err(from_rusqlite)?;
        }

        if includes.funding_stream_periods {
            let mut stmt = conn
                .prepare(
                    "SELECT code FROM contract_funding_stream_periods
                     WHERE contract_id = ?1 ORDER BY code",
                )
                .map_err(from_rusqlite)?;
            contract.funding_stream_period_codes = stmt
                .query_map([contract.id], |row| row.get(0))
                .map_err(from_rusqlite)?
                .collect::<rusqlite::Result<Vec<String>>>()
                .map_err(from_rusqlite)?;
        }

        Ok(())
    }

    /// Write whichever relations the contract carries
    ///
    /// Absent content or data and an empty period list leave stored rows as
    /// they are, so a contract loaded without includes can be updated safely.
    fn write_relations(tx: &Transaction, contract: &Contract) -> Result<()> {
        if let Some(content) = &contract.contract_content {
            tx.execute(
                "INSERT INTO contract_contents (contract_id, file_name, content, size)
                 VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(contract_id) DO UPDATE SET
                    file_name = excluded.file_name,
                    content = excluded.content,
                    size = excluded.size",
                params![contract.id, content.file_name, content.content, content.size],
            )
            .map_err(from_rusqlite)?;
        }

        if let Some(data) = &contract.contract_data {
            tx.execute(
                "INSERT INTO contract_data (contract_id, original_contract_xml)
                 VALUES (?1, ?2)
                 ON CONFLICT(contract_id) DO UPDATE SET
                    original_contract_xml = excluded.original_contract_xml",
                params![contract.id, data.original_contract_xml],
            )
            .map_err(from_rusqlite)?;
        }

        if !contract.funding_stream_period_codes.is_empty() {
            tx.execute(
                "DELETE FROM contract_funding_stream_periods WHERE contract_id = ?1",
                [contract.id],
            )
            .map_err(from_rusqlite)?;
            for code in &contract.funding_stream_period_codes {
                tx.execute(
                    "INSERT OR IGNORE INTO contract_funding_stream_periods (contract_id, code)
                     VALUES (?1, ?2)",
                    params![contract.id, code],
                )
                .map_err(from_rusqlite)?;
            }
        }

        Ok(())
    }

    fn insert(conn: &mut Connection, mut contract: Contract) -> Result<Contract> {
        let tx = conn.transaction().map_err(from_rusqlite)?;

        tx.execute(
            "INSERT INTO contracts (contract_number, contract_version, ukprn, title, year,
                value_in_pence, funding_type, contract_type, status, amendment_type,
                parent_contract_number, start_date, end_date, signed_by, signed_by_display_name,
                signed_on, was_manually_approved, created_at, last_updated_at,
                last_email_reminder_sent)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
                ?17, ?18, ?19, ?20)",
            params![
                contract.contract_number,
                contract.contract_version,
                contract.ukprn,
                contract.title,
                contract.year,
                contract.value_in_pence,
                contract.funding_type.as_str(),
                contract.contract_type.as_str(),
                contract.status.as_str(),
                contract.amendment_type.as_str(),
                contract.parent_contract_number,
                contract.start_date.map(to_millis),
                contract.end_date.map(to_millis),
                contract.signed_by,
                contract.signed_by_display_name,
                contract.signed_on.map(to_millis),
                contract.was_manually_approved,
                to_millis(contract.created_at),
                to_millis(contract.last_updated_at),
                contract.last_email_reminder_sent.map(to_millis),
            ],
        )
        .map_err(|e| {
            from_rusqlite(e)
                .with_op("create_contract")
                .with_contract_number(contract.contract_number.clone())
                .with_contract_version(contract.contract_version)
        })?;

        contract.id = tx.last_insert_rowid();
        Self::write_relations(&tx, &contract)?;
        tx.commit().map_err(from_rusqlite)?;

        // Reflect the stored precision
        contract.created_at = from_millis("created_at", to_millis(contract.created_at))?;
        contract.last_updated_at =
            from_millis("last_updated_at", to_millis(contract.last_updated_at))?;
        Ok(contract)
    }

    fn exists(conn: &Connection, id: i64) -> Result<bool> {
        conn.query_row("SELECT 1 FROM contracts WHERE id = ?1", [id], |_| Ok(()))
            .optional()
            .map(|found| found.is_some())
            .map_err(from_rusqlite)
    }

    fn update_all(conn: &mut Connection, mut contract: Contract) -> Result<Contract> {
        let expected = to_millis(contract.last_updated_at);
        let stamp = next_stamp(expected);

        let tx = conn.transaction().map_err(from_rusqlite)?;
        let changed = tx
            .execute(
                "UPDATE contracts SET
                    ukprn = ?1, title = ?2, year = ?3, value_in_pence = ?4, funding_type = ?5,
                    contract_type = ?6, status = ?7, amendment_type = ?8,
                    parent_contract_number = ?9, start_date = ?10, end_date = ?11,
                    signed_by = ?12, signed_by_display_name = ?13, signed_on = ?14,
                    was_manually_approved = ?15, last_email_reminder_sent = ?16,
                    last_updated_at = ?17
                 WHERE id = ?18 AND last_updated_at = ?19",
                params![
                    contract.ukprn,
                    contract.title,
                    contract.year,
                    contract.value_in_pence,
                    contract.funding_type.as_str(),
                    contract.contract_type.as_str(),
                    contract.status.as_str(),
                    contract.amendment_type.as_str(),
                    contract.parent_contract_number,
                    contract.start_date.map(to_millis),
                    contract.end_date.map(to_millis),
                    contract.signed_by,
                    contract.signed_by_display_name,
                    contract.signed_on.map(to_millis),
                    contract.was_manually_approved,
                    contract.last_email_reminder_sent.map(to_millis),
                    stamp,
                    contract.id,
                    expected,
                ],
            )
            .map_err(from_rusqlite)?;

        if changed == 0 {
            if !Self::exists(&tx, contract.id)? {
                return Err(ContractError::ContractIdNotFound { id: contract.id }.into());
            }
            return Err(concurrency_conflict(
                "update_contract",
                contract.id,
                "contract was modified since it was read",
            )
            .with_contract_number(contract.contract_number.clone())
            .with_contract_version(contract.contract_version));
        }

        Self::write_relations(&tx, &contract)?;
        tx.commit().map_err(from_rusqlite)?;

        contract.last_updated_at = from_millis("last_updated_at", stamp)?;
        Ok(contract)
    }

    fn set_status(
        conn: &Connection,
        id: i64,
        expected: ContractStatus,
        new_status: ContractStatus,
    ) -> Result<StatusTransition> {
        let changed = conn
            .execute(
                "UPDATE contracts SET
                    status = ?1,
                    last_updated_at = MAX(?2, last_updated_at + 1)
                 WHERE id = ?3 AND status = ?4",
                params![new_status.as_str(), to_millis(Utc::now()), id, expected.as_str()],
            )
            .map_err(from_rusqlite)?;

        let contract = Self::select_one(conn, "WHERE id = ?1", &[&id], ContractIncludes::NONE)?
            .ok_or(ContractError::ContractIdNotFound { id })?;

        if changed == 0 {
            return Err(concurrency_conflict(
                "update_status",
                id,
                &format!(
                    "status is {}, expected {}",
                    contract.status.as_str(),
                    expected.as_str()
                ),
            )
            .with_contract_number(contract.contract_number)
            .with_contract_version(contract.contract_version));
        }

        Ok(StatusTransition {
            contract_id: contract.id,
            contract_number: contract.contract_number,
            contract_version: contract.contract_version,
            ukprn: contract.ukprn,
            previous_status: expected,
            new_status,
        })
    }
}

#[async_trait]
impl ContractRepository for SqliteContractRepository {
    async fn get_by_id(&self, id: i64) -> PortResult<Option<Contract>> {
        with_conn(&self.conn, "get_contract", move |conn| {
            Self::select_one(conn, "WHERE id = ?1", &[&id], ContractIncludes::ALL)
        })
        .await
    }

    async fn get_by_number_and_version(
        &self,
        contract_number: &str,
        contract_version: i32,
    ) -> PortResult<Option<Contract>> {
        self.get_by_number_and_version_with_includes(
            contract_number,
            contract_version,
            ContractIncludes::NONE,
        )
        .await
    }

    async fn get_by_number_and_version_with_includes(
        &self,
        contract_number: &str,
        contract_version: i32,
        includes: ContractIncludes,
    ) -> PortResult<Option<Contract>> {
        let contract_number = contract_number.to_string();
        with_conn(&self.conn, "get_by_number_and_version", move |conn| {
            Self::select_one(
                conn,
                "WHERE contract_number = ?1 AND contract_version = ?2",
                &[&contract_number, &contract_version],
                includes,
            )
        })
        .await
    }

    async fn get_by_number(&self, contract_number: &str) -> PortResult<Vec<Contract>> {
        let contract_number = contract_number.to_string();
        with_conn(&self.conn, "get_by_number", move |conn| {
            Self::select_contracts(
                conn,
                "WHERE contract_number = ?1 ORDER BY contract_version",
                &[&contract_number],
            )
        })
        .await
    }

    async fn create(&self, contract: Contract) -> PortResult<Contract> {
        let created = with_conn(&self.conn, "create_contract", move |conn| {
            Self::insert(conn, contract)
        })
        .await?;
        tracing::debug!(
            contract_id = created.id,
            contract_number = %created.contract_number,
            contract_version = created.contract_version,
            "inserted contract"
        );
        Ok(created)
    }

    async fn update(&self, contract: Contract) -> PortResult<Contract> {
        with_conn(&self.conn, "update_contract", move |conn| {
            Self::update_all(conn, contract)
        })
        .await
    }

    async fn update_status(
        &self,
        id: i64,
        expected: ContractStatus,
        new_status: ContractStatus,
    ) -> PortResult<StatusTransition> {
        with_conn(&self.conn, "update_status", move |conn| {
            Self::set_status(conn, id, expected, new_status)
        })
        .await
    }

    async fn update_last_email_reminder_sent(
        &self,
        id: i64,
        sent_at: DateTime<Utc>,
    ) -> PortResult<Contract> {
        with_conn(&self.conn, "update_last_email_reminder_sent", move |conn| {
            let changed = conn
                .execute(
                    "UPDATE contracts SET
                        last_email_reminder_sent = ?1,
                        last_updated_at = MAX(?2, last_updated_at + 1)
                     WHERE id = ?3",
                    params![to_millis(sent_at), to_millis(Utc::now()), id],
                )
                .map_err(from_rusqlite)?;

            if changed == 0 {
                return Err(ExError::from(ContractError::ContractIdNotFound { id }));
            }

            Self::select_one(conn, "WHERE id = ?1", &[&id], ContractIncludes::NONE)?
                .ok_or_else(|| ContractError::ContractIdNotFound { id }.into())
        })
        .await
    }

    async fn query_reminder_candidates(&self, cutoff: DateTime<Utc>) -> PortResult<Vec<Contract>> {
        let cutoff = to_millis(cutoff);
        with_conn(&self.conn, "query_reminder_candidates", move |conn| {
            Self::select_contracts(
                conn,
                "WHERE status = ?1
                   AND ((last_email_reminder_sent IS NULL AND created_at <= ?2)
                     OR (last_email_reminder_sent IS NOT NULL AND last_email_reminder_sent <= ?2))
                 ORDER BY id",
                &[&ContractStatus::PublishedToProvider.as_str(), &cutoff],
            )
        })
        .await
    }
}
