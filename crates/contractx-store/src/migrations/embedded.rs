//! SQL migrations compiled into the binary, in application order

use super::checksums::compute_checksum;

pub struct Migration {
    pub id: &'static str,
    pub sql: &'static str,
}

impl Migration {
    pub fn checksum(&self) -> String {
        compute_checksum(self.sql)
    }
}

pub const MIGRATIONS: &[Migration] = &[
    Migration {
        id: "001_contracts",
        sql: include_str!("../../migrations/001_contracts.sql"),
    },
    Migration {
        id: "002_audit_outbox",
        sql: include_str!("../../migrations/002_audit_outbox.sql"),
    },
];
