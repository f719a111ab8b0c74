use contractx_core::errors::ContractError;
use contractx_core::model::Contract;
use contractx_core::{log_op_end, log_op_error, log_op_start};

use super::{elapsed_ms, ContractService};
use crate::Result;

impl ContractService {
    /// Load a contract with all related records
    pub async fn get_contract(&self, id: i64) -> Result<Contract> {
        log_op_start!("get_contract", contract_id = id);
        let start = std::time::Instant::now();

        let contract = self
            .repository
            .get_by_id(id)
            .await
            .and_then(|found| found.ok_or_else(|| ContractError::ContractIdNotFound { id }.into()))
            .map_err(|e| {
                log_op_error!("get_contract", e.clone(), duration_ms = elapsed_ms(start));
                e
            })?;

        log_op_end!("get_contract", duration_ms = elapsed_ms(start));
        Ok(contract)
    }

    /// Load a contract by number and version, without related records
    pub async fn get_by_number_and_version(
        &self,
        contract_number: &str,
        contract_version: i32,
    ) -> Result<Contract> {
        log_op_start!(
            "get_contract_by_number",
            contract_number = contract_number,
            contract_version = contract_version
        );
        let start = std::time::Instant::now();

        let found = self
            .repository
            .get_by_number_and_version(contract_number, contract_version)
            .await
            .and_then(|found| {
                found.ok_or_else(|| {
                    ContractError::ContractNotFound {
                        contract_number: contract_number.to_string(),
                        contract_version,
                    }
                    .into()
                })
            })
            .map_err(|e| {
                log_op_error!(
                    "get_contract_by_number",
                    e.clone(),
                    duration_ms = elapsed_ms(start)
                );
                e
            })?;

        log_op_end!("get_contract_by_number", duration_ms = elapsed_ms(start));
        Ok(found)
    }
}
