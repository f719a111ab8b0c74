use chrono::Utc;
use contractx_core::model::{
    AmendmentType, Contract, ContractAction, ContractStatus, ContractStatusChangeEvent,
    CreateContractRequest,
};
use contractx_core::rules::validate_for_new_contract;
use contractx_core::{log_op_end, log_op_error, log_op_start};

use super::{elapsed_ms, ContractService};
use crate::cascade::{replace_superseded, replaceable_on_create};
use crate::Result;

impl ContractService {
    /// Create a new contract version
    ///
    /// Runs under the guard for the contract number. Initial status follows
    /// the amendment type: notifications are approved and signed by the
    /// system signer straight away; everything else is published to the
    /// provider. Once the guard is released, earlier versions in a
    /// replaceable status move to `Replaced` and the creation event is
    /// dispatched.
    ///
    /// ## Errors
    ///
    /// - `HigherVersionExists` / `DuplicateVersion`: version conflict
    /// - `DocumentFetchFailure` / `DocumentEmpty`: original XML unavailable
    /// - `ExternalService`: a notification handler failed (contract is stored)
    pub async fn create_contract(&self, request: CreateContractRequest) -> Result<Contract> {
        log_op_start!(
            "create_contract",
            contract_number = %request.contract_number,
            contract_version = request.contract_version
        );
        let start = std::time::Instant::now();

        let created = self.create_contract_impl(request).await.map_err(|e| {
            log_op_error!("create_contract", e.clone(), duration_ms = elapsed_ms(start));
            e
        })?;

        log_op_end!(
            "create_contract",
            duration_ms = elapsed_ms(start),
            contract_id = created.id,
            status = %created.status
        );

        Ok(created)
    }

    async fn create_contract_impl(&self, request: CreateContractRequest) -> Result<Contract> {
        let (created, existing, event) = {
            let _scope = self.guard.lock_async(request.contract_number.clone()).await;

            let existing = self
                .repository
                .get_by_number(&request.contract_number)
                .await?;
            validate_for_new_contract(&request, &existing)?;

            let now = Utc::now();
            let mut contract = request.to_contract(now);
            match request.amendment_type {
                AmendmentType::Notification => {
                    let signer = &self.config.system_signer;
                    contract.status = ContractStatus::Approved;
                    contract.sign(
                        signer.signed_by.clone(),
                        signer.display_name.clone(),
                        request.signed_on.unwrap_or(now),
                    );
                }
                AmendmentType::None | AmendmentType::Variation => {
                    contract.status = ContractStatus::PublishedToProvider;
                }
            }

            self.documents
                .upsert_original_contract_xml(&mut contract, &request.file_name)
                .await?;
            let created = self.repository.create(contract).await?;

            let event =
                ContractStatusChangeEvent::for_contract(&created, None, ContractAction::Created);
            (created, existing, event)
        };

        replace_superseded(
            self.repository.as_ref(),
            self.audit.as_ref(),
            &existing,
            replaceable_on_create(request.amendment_type),
        )
        .await
        .log_summary(&created.contract_number);

        self.notifications.dispatch(&event).await?;
        Ok(created)
    }
}
