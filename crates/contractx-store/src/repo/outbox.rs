//! Transactional outbox for status-change events
//!
//! Events are serialised into `outbox_messages`; a relay process forwards
//! undispatched rows to the message bus and stamps `dispatched_at`.

#![allow(clippy::result_large_err)]

use async_trait::async_trait;
use chrono::Utc;
use contractx_core::model::ContractStatusChangeEvent;
use contractx_core::ports::{MessagePublisher, PortResult};
use rusqlite::params;
use uuid::Uuid;

use super::{lock, with_conn, SharedConnection};
use crate::errors::{from_rusqlite, serialization_error, Result};

/// Topic status-change events are published on
pub const CONTRACT_STATUS_TOPIC: &str = "contract-status-changed";

/// An outbox row awaiting dispatch
#[derive(Debug, Clone, PartialEq)]
pub struct OutboxMessage {
    pub message_id: String,
    pub topic: String,
    pub event: ContractStatusChangeEvent,
}

#[derive(Clone)]
pub struct SqliteOutboxPublisher {
    conn: SharedConnection,
}

impl SqliteOutboxPublisher {
    pub fn new(conn: SharedConnection) -> Self {
        Self { conn }
    }

    /// Undispatched messages in publication order
    pub fn pending(&self) -> Result<Vec<OutboxMessage>> {
        let conn = lock(&self.conn);
        let mut stmt = conn
            .prepare(
                "SELECT message_id, topic, payload FROM outbox_messages
                 WHERE dispatched_at IS NULL
                 ORDER BY created_at, message_id",
            )
            .map_err(from_rusqlite)?;

        let rows = stmt
            .query_map([], |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                ))
            })
            .map_err(from_rusqlite)?
            .collect::<rusqlite::Result<Vec<_>>>()
            .map_err(from_rusqlite)?;

        rows.into_iter()
            .map(|(message_id, topic, payload)| -> Result<OutboxMessage> {
                let event = serde_json::from_str(&payload)
                    .map_err(|e| serialization_error("outbox_decode", e))?;
                Ok(OutboxMessage {
                    message_id,
                    topic,
                    event,
                })
            })
            .collect()
    }

    /// Mark a message as forwarded to the bus
    pub fn mark_dispatched(&self, message_id: &str) -> Result<bool> {
        let conn = lock(&self.conn);
        let changed = conn
            .execute(
                "UPDATE outbox_messages SET dispatched_at = ?1
                 WHERE message_id = ?2 AND dispatched_at IS NULL",
                params![Utc::now().timestamp_millis(), message_id],
            )
            .map_err(from_rusqlite)?;
        Ok(changed == 1)
    }
}

#[async_trait]
impl MessagePublisher for SqliteOutboxPublisher {
    async fn publish(&self, event: &ContractStatusChangeEvent) -> PortResult<()> {
        let payload =
            serde_json::to_string(event).map_err(|e| serialization_error("outbox_encode", e))?;
        let message_id = Uuid::now_v7().to_string();

        let contract_number = event.contract_number.clone();
        let contract_version = event.contract_version;
        let id = message_id.clone();
        with_conn(&self.conn, "outbox_publish", move |conn| {
            conn.execute(
                "INSERT INTO outbox_messages
                    (message_id, topic, contract_number, contract_version, payload, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    id,
                    CONTRACT_STATUS_TOPIC,
                    contract_number,
                    contract_version,
                    payload,
                    Utc::now().timestamp_millis(),
                ],
            )
            .map_err(|e| from_rusqlite(e).with_op("outbox_publish"))?;
            Ok(())
        })
        .await?;

        tracing::debug!(
            message_id = %message_id,
            contract_number = %event.contract_number,
            status = %event.status,
            "queued status change"
        );
        Ok(())
    }
}
