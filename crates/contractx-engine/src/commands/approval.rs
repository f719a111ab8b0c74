use chrono::Utc;
use contractx_core::errors::{ExError, ExErrorKind};
use contractx_core::model::{
    ApprovalRequest, AuditRecord, Contract, ContractAction, ContractRequest, ContractStatus,
    ContractStatusChangeEvent,
};
use contractx_core::ports::ContractIncludes;
use contractx_core::rules::{validate, validate_status_change, ApprovalPath, CONTENT_ATTACHED};
use contractx_core::{log_op_end, log_op_error, log_op_start};

use super::{elapsed_ms, ContractService};
use crate::cascade::{replace_superseded, REPLACEABLE_ON_MANUAL_APPROVAL};
use crate::stamping::SigningDetails;
use crate::Result;

impl ContractService {
    /// Approve a contract the provider has confirmed
    ///
    /// Requires `ApprovedWaitingConfirmation`. Writes a single audit record
    /// instead of running the notification fan-out, and returns the event.
    pub async fn confirm_approval(
        &self,
        request: ContractRequest,
    ) -> Result<ContractStatusChangeEvent> {
        log_op_start!(
            "confirm_approval",
            contract_number = %request.contract_number,
            contract_version = request.contract_version
        );
        let start = std::time::Instant::now();

        let event = self.confirm_approval_impl(&request).await.map_err(|e| {
            log_op_error!("confirm_approval", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        log_op_end!(
            "confirm_approval",
            duration_ms = elapsed_ms(start),
            contract_id = event.contract_id
        );

        Ok(event)
    }

    async fn confirm_approval_impl(
        &self,
        request: &ContractRequest,
    ) -> Result<ContractStatusChangeEvent> {
        let loaded = self
            .repository
            .get_by_number_and_version_with_includes(
                &request.contract_number,
                request.contract_version,
                ContractIncludes::DATA,
            )
            .await?;
        let contract = validate(loaded.as_ref(), request, None)?;
        validate_status_change(contract, ContractStatus::Approved, ApprovalPath::Confirmation)?;

        let previous = contract.status;
        let mut contract = contract.clone();
        contract.status = ContractStatus::Approved;

        self.documents
            .upsert_original_contract_xml(&mut contract, &request.file_name)
            .await?;
        let updated = self.repository.update(contract).await?;

        let event =
            ContractStatusChangeEvent::for_contract(&updated, Some(previous), ContractAction::Approved);
        self.audit
            .write(AuditRecord::from_event(&event))
            .await
            .map_err(|e| {
                ExError::new(ExErrorKind::ExternalService)
                    .with_op("confirm_approval_audit")
                    .with_contract_number(updated.contract_number.clone())
                    .with_contract_version(updated.contract_version)
                    .with_message("Failed to write approval audit record")
                    .with_source(e)
            })?;

        Ok(event)
    }

    /// Approve a published contract on the agency's authority
    ///
    /// Requires `PublishedToProvider` and an attached PDF, which is stamped
    /// with the manual-approval signer. Earlier versions that were approved
    /// or awaiting confirmation are replaced afterwards.
    pub async fn manual_approve(&self, request: ApprovalRequest) -> Result<Contract> {
        log_op_start!(
            "manual_approve",
            contract_number = %request.contract.contract_number,
            contract_version = request.contract.contract_version
        );
        let start = std::time::Instant::now();

        let approved = self.manual_approve_impl(&request).await.map_err(|e| {
            log_op_error!("manual_approve", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        log_op_end!(
            "manual_approve",
            duration_ms = elapsed_ms(start),
            contract_id = approved.id
        );

        Ok(approved)
    }

    async fn manual_approve_impl(&self, request: &ApprovalRequest) -> Result<Contract> {
        let target = &request.contract;
        let loaded = self
            .repository
            .get_by_number_and_version_with_includes(
                &target.contract_number,
                target.contract_version,
                ContractIncludes::DATA_AND_CONTENT,
            )
            .await?;
        let same_number = self.repository.get_by_number(&target.contract_number).await?;

        let contract = validate(loaded.as_ref(), target, Some(&CONTENT_ATTACHED))?;
        validate_status_change(contract, ContractStatus::Approved, ApprovalPath::Manual)?;

        let previous = contract.status;
        let mut contract = contract.clone();
        let signer = &self.config.manual_approval_signer;
        let signed_on = Utc::now();

        if let Some(content) = contract.contract_content.as_mut() {
            let details = SigningDetails {
                signed_by: signer.signed_by.clone(),
                display_name: signer.display_name.clone(),
                signed_on,
                funding_type: contract.funding_type,
                principal_id: request.principal_id.clone(),
            };
            let stamped = self.stamper.stamp(&content.content, &details)?;
            content.replace_content(stamped);
        }

        contract.status = ContractStatus::Approved;
        contract.sign(signer.signed_by.clone(), signer.display_name.clone(), signed_on);
        contract.was_manually_approved = true;

        self.documents
            .upsert_original_contract_xml(&mut contract, &target.file_name)
            .await?;
        let updated = self.repository.update(contract).await?;

        let event = ContractStatusChangeEvent::for_contract(
            &updated,
            Some(previous),
            ContractAction::ManuallyApproved,
        );
        let dispatched = self.notifications.dispatch(&event).await;

        let superseded: Vec<Contract> = same_number
            .into_iter()
            .filter(|c| c.contract_version != updated.contract_version)
            .collect();
        replace_superseded(
            self.repository.as_ref(),
            self.audit.as_ref(),
            &superseded,
            REPLACEABLE_ON_MANUAL_APPROVAL,
        )
        .await
        .log_summary(&updated.contract_number);

        dispatched?;
        Ok(updated)
    }
}
