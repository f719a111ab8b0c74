use contractx_core::model::{
    Contract, ContractAction, ContractStatusChangeEvent, WithdrawalRequest,
};
use contractx_core::ports::ContractIncludes;
use contractx_core::rules::{validate_status_change, validate_withdrawal, ApprovalPath};
use contractx_core::{log_op_end, log_op_error, log_op_start};

use super::{elapsed_ms, ContractService};
use crate::Result;

impl ContractService {
    /// Withdraw a published contract on behalf of the agency or the provider
    pub async fn withdraw(&self, request: WithdrawalRequest) -> Result<Contract> {
        log_op_start!(
            "withdraw_contract",
            contract_number = %request.contract.contract_number,
            contract_version = request.contract.contract_version,
            status_to = %request.withdrawal_type
        );
        let start = std::time::Instant::now();

        let withdrawn = self.withdraw_impl(&request).await.map_err(|e| {
            log_op_error!("withdraw_contract", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        log_op_end!(
            "withdraw_contract",
            duration_ms = elapsed_ms(start),
            contract_id = withdrawn.id
        );

        Ok(withdrawn)
    }

    async fn withdraw_impl(&self, request: &WithdrawalRequest) -> Result<Contract> {
        let target = &request.contract;
        let loaded = self
            .repository
            .get_by_number_and_version_with_includes(
                &target.contract_number,
                target.contract_version,
                ContractIncludes::DATA,
            )
            .await?;

        let contract = validate_withdrawal(loaded.as_ref(), request)?;
        // Withdrawal targets ignore the approval path
        validate_status_change(contract, request.withdrawal_type, ApprovalPath::Manual)?;

        let previous = contract.status;
        let mut contract = contract.clone();
        contract.status = request.withdrawal_type;

        self.documents
            .upsert_original_contract_xml(&mut contract, &target.file_name)
            .await?;
        let updated = self.repository.update(contract).await?;

        let event = ContractStatusChangeEvent::for_contract(
            &updated,
            Some(previous),
            ContractAction::Withdrawn,
        );
        self.notifications.dispatch(&event).await?;
        Ok(updated)
    }
}
