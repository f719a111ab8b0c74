use crate::errors::{ContractError, Result};
use crate::model::{
    Contract, ContractRequest, ContractStatus, CreateContractRequest, WithdrawalRequest,
};

/// Named precondition on a loaded contract
///
/// The description is reported verbatim when the check fails.
#[derive(Clone, Copy)]
pub struct ContractPredicate {
    pub description: &'static str,
    pub check: fn(&Contract) -> bool,
}

impl std::fmt::Debug for ContractPredicate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ContractPredicate")
            .field("description", &self.description)
            .finish()
    }
}

/// The contract must carry its signed PDF
pub const CONTENT_ATTACHED: ContractPredicate = ContractPredicate {
    description: "contract.contract_content is not None",
    check: Contract::has_content,
};

/// Check that a request addresses the loaded contract
///
/// 1. the contract must exist
/// 2. number and version must match, and id when the request carries one
/// 3. the optional predicate must hold
///
/// # Errors
/// `ContractNotFound`, `RequestMismatch` or `ExpectationFailed`, in that order.
pub fn validate<'a>(
    contract: Option<&'a Contract>,
    request: &ContractRequest,
    predicate: Option<&ContractPredicate>,
) -> Result<&'a Contract> {
    let contract = contract.ok_or_else(|| ContractError::ContractNotFound {
        contract_number: request.contract_number.clone(),
        contract_version: request.contract_version,
    })?;

    if request.contract_number != contract.contract_number {
        return Err(ContractError::RequestMismatch {
            field: "contract_number",
            requested: request.contract_number.clone(),
            actual: contract.contract_number.clone(),
        });
    }

    if request.contract_version != contract.contract_version {
        return Err(ContractError::RequestMismatch {
            field: "contract_version",
            requested: request.contract_version.to_string(),
            actual: contract.contract_version.to_string(),
        });
    }

    if request.id != 0 && request.id != contract.id {
        return Err(ContractError::RequestMismatch {
            field: "id",
            requested: request.id.to_string(),
            actual: contract.id.to_string(),
        });
    }

    if let Some(predicate) = predicate {
        if !(predicate.check)(contract) {
            return Err(ContractError::ExpectationFailed {
                contract_number: contract.contract_number.clone(),
                contract_version: contract.contract_version,
                predicate: predicate.description.to_string(),
            });
        }
    }

    Ok(contract)
}

/// [`validate`] for withdrawals, which must also name a withdrawal status
///
/// # Errors
/// As [`validate`], plus `InvalidWithdrawalType`.
pub fn validate_withdrawal<'a>(
    contract: Option<&'a Contract>,
    request: &WithdrawalRequest,
) -> Result<&'a Contract> {
    let contract = validate(contract, &request.contract, None)?;

    match request.withdrawal_type {
        ContractStatus::WithdrawnByAgency | ContractStatus::WithdrawnByProvider => Ok(contract),
        other => Err(ContractError::InvalidWithdrawalType { requested: other }),
    }
}

/// Check a new version against the versions already stored under its number
///
/// Lower versions pass: back-filling history is allowed as long as no equal
/// or higher version exists.
///
/// # Errors
/// `HigherVersionExists` takes precedence over `DuplicateContract`.
pub fn validate_for_new_contract(
    request: &CreateContractRequest,
    existing: &[Contract],
) -> Result<()> {
    let same_number = existing
        .iter()
        .filter(|c| c.contract_number == request.contract_number);

    let mut duplicate = false;
    let mut highest: Option<i32> = None;
    for contract in same_number {
        if contract.contract_version > request.contract_version {
            highest = highest.max(Some(contract.contract_version));
        } else if contract.contract_version == request.contract_version {
            duplicate = true;
        }
    }

    if let Some(existing_version) = highest {
        return Err(ContractError::HigherVersionExists {
            contract_number: request.contract_number.clone(),
            requested_version: request.contract_version,
            existing_version,
        });
    }

    if duplicate {
        return Err(ContractError::DuplicateContract {
            contract_number: request.contract_number.clone(),
            contract_version: request.contract_version,
        });
    }

    Ok(())
}
