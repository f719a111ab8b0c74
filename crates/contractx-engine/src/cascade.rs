//! Superseded-version cascade
//!
//! Moves earlier versions of a contract to `Replaced` once a newer version
//! becomes active. Each record is a separate compare-and-set; a failure on
//! one record is logged and the rest are still processed.

use contractx_core::errors::ExError;
use contractx_core::model::{AmendmentType, AuditRecord, Contract, ContractStatus, StatusTransition};
use contractx_core::ports::{AuditSink, ContractRepository};

/// Replaced when a `None` or `Variation` amendment is created
pub const REPLACEABLE_ON_PUBLISH: &[ContractStatus] = &[ContractStatus::PublishedToProvider];

/// Replaced when a `Notification` amendment is created (it is approved immediately)
pub const REPLACEABLE_ON_NOTIFICATION: &[ContractStatus] = &[
    ContractStatus::Approved,
    ContractStatus::ApprovedWaitingConfirmation,
    ContractStatus::PublishedToProvider,
];

/// Replaced when a version is approved manually
pub const REPLACEABLE_ON_MANUAL_APPROVAL: &[ContractStatus] = &[
    ContractStatus::Approved,
    ContractStatus::ApprovedWaitingConfirmation,
];

pub fn replaceable_on_create(amendment_type: AmendmentType) -> &'static [ContractStatus] {
    match amendment_type {
        AmendmentType::Notification => REPLACEABLE_ON_NOTIFICATION,
        AmendmentType::None | AmendmentType::Variation => REPLACEABLE_ON_PUBLISH,
    }
}

/// What the cascade did
#[derive(Debug, Default)]
pub struct CascadeOutcome {
    pub replaced: Vec<StatusTransition>,
    pub failed: Vec<(i64, ExError)>,
}

impl CascadeOutcome {
    /// Record how the cascade for `contract_number` went
    pub fn log_summary(&self, contract_number: &str) {
        if self.failed.is_empty() {
            tracing::debug!(
                contract_number = %contract_number,
                replaced = self.replaced.len(),
                "superseded versions replaced"
            );
        } else {
            let failed_ids: Vec<i64> = self.failed.iter().map(|(id, _)| *id).collect();
            tracing::warn!(
                contract_number = %contract_number,
                replaced = self.replaced.len(),
                failed = self.failed.len(),
                failed_ids = ?failed_ids,
                "superseded versions left in place"
            );
        }
    }
}

/// Replace every record in `records` whose status is in `replaceable`
pub async fn replace_superseded(
    repository: &dyn ContractRepository,
    audit: &dyn AuditSink,
    records: &[Contract],
    replaceable: &[ContractStatus],
) -> CascadeOutcome {
    let mut outcome = CascadeOutcome::default();

    for record in records.iter().filter(|r| replaceable.contains(&r.status)) {
        match repository
            .update_status(record.id, record.status, ContractStatus::Replaced)
            .await
        {
            Ok(transition) => {
                if let Err(e) = audit.write(AuditRecord::from_transition(&transition)).await {
                    tracing::warn!(
                        contract_number = %transition.contract_number,
                        contract_version = transition.contract_version,
                        err = %e,
                        "failed to audit replaced contract"
                    );
                }
                tracing::debug!(
                    contract_number = %transition.contract_number,
                    contract_version = transition.contract_version,
                    status_from = %transition.previous_status,
                    "replaced superseded contract"
                );
                outcome.replaced.push(transition);
            }
            Err(e) => {
                tracing::warn!(
                    contract_id = record.id,
                    contract_number = %record.contract_number,
                    contract_version = record.contract_version,
                    err_code = e.code(),
                    err = %e,
                    "failed to replace superseded contract"
                );
                outcome.failed.push((record.id, e));
            }
        }
    }

    outcome
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use contractx_core::errors::{concurrency_conflict, ExErrorKind};
    use contractx_core::ports::{ContractIncludes, PortResult};

    /// Status updates succeed except for one id, whose status has moved on
    struct StaleOnOneId {
        stale_id: i64,
        attempted: Mutex<Vec<i64>>,
    }

    #[async_trait]
    impl ContractRepository for StaleOnOneId {
        async fn get_by_id(&self, _id: i64) -> PortResult<Option<Contract>> {
            unimplemented!()
        }

        async fn get_by_number_and_version(&self, _: &str, _: i32) -> PortResult<Option<Contract>> {
            unimplemented!()
        }

        async fn get_by_number_and_version_with_includes(
            &self,
            _: &str,
            _: i32,
            _: ContractIncludes,
        ) -> PortResult<Option<Contract>> {
            unimplemented!()
        }

        async fn get_by_number(&self, _: &str) -> PortResult<Vec<Contract>> {
            unimplemented!()
        }

        async fn create(&self, _: Contract) -> PortResult<Contract> {
            unimplemented!()
        }

        async fn update(&self, _: Contract) -> PortResult<Contract> {
            unimplemented!()
        }

        async fn update_status(
            &self,
            id: i64,
            expected: ContractStatus,
            new_status: ContractStatus,
        ) -> PortResult<StatusTransition> {
            self.attempted.lock().unwrap().push(id);
            if id == self.stale_id {
                return Err(concurrency_conflict("update_status", id, "status is WithdrawnByProvider"));
            }
            Ok(StatusTransition {
                contract_id: id,
                contract_number: "C-300".to_string(),
                contract_version: id as i32,
                ukprn: 10_000_001,
                previous_status: expected,
                new_status,
            })
        }

        async fn update_last_email_reminder_sent(
            &self,
            _: i64,
            _: DateTime<Utc>,
        ) -> PortResult<Contract> {
            unimplemented!()
        }

        async fn query_reminder_candidates(&self, _: DateTime<Utc>) -> PortResult<Vec<Contract>> {
            unimplemented!()
        }
    }

    #[derive(Default)]
    struct CountingAudit {
        written: Mutex<Vec<AuditRecord>>,
    }

    #[async_trait]
    impl AuditSink for CountingAudit {
        async fn write(&self, record: AuditRecord) -> PortResult<()> {
            self.written.lock().unwrap().push(record);
            Ok(())
        }
    }

    fn stored(id: i64, status: ContractStatus) -> Contract {
        let mut contract = Contract::new("C-300", id as i32, 10_000_001);
        contract.id = id;
        contract.status = status;
        contract
    }

    #[tokio::test]
    async fn test_failure_on_one_record_does_not_stop_the_rest() {
        let repository = StaleOnOneId {
            stale_id: 1,
            attempted: Mutex::new(Vec::new()),
        };
        let audit = CountingAudit::default();
        let records = vec![
            stored(1, ContractStatus::PublishedToProvider),
            stored(2, ContractStatus::PublishedToProvider),
            stored(3, ContractStatus::WithdrawnByAgency),
        ];

        let outcome =
            replace_superseded(&repository, &audit, &records, REPLACEABLE_ON_PUBLISH).await;

        assert_eq!(*repository.attempted.lock().unwrap(), vec![1, 2]);
        assert_eq!(outcome.failed.len(), 1);
        assert_eq!(outcome.failed[0].0, 1);
        assert_eq!(outcome.failed[0].1.kind(), ExErrorKind::Concurrency);
        assert_eq!(outcome.replaced.len(), 1);
        assert_eq!(outcome.replaced[0].contract_id, 2);
        assert_eq!(outcome.replaced[0].new_status, ContractStatus::Replaced);
        assert_eq!(audit.written.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_replaceable_sets_by_amendment() {
        assert_eq!(
            replaceable_on_create(AmendmentType::None),
            &[ContractStatus::PublishedToProvider]
        );
        assert_eq!(
            replaceable_on_create(AmendmentType::Variation),
            replaceable_on_create(AmendmentType::None)
        );
        assert!(replaceable_on_create(AmendmentType::Notification)
            .contains(&ContractStatus::ApprovedWaitingConfirmation));
        assert!(!REPLACEABLE_ON_MANUAL_APPROVAL.contains(&ContractStatus::PublishedToProvider));
    }
}
