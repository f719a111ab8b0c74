#![allow(dead_code)]

use contractx_core::model::{
    AmendmentType, Contract, ContractStatus, ContractType, CreateContractRequest, FundingType,
};

pub fn stored_contract(id: i64, number: &str, version: i32, status: ContractStatus) -> Contract {
    let mut contract = Contract::new(number, version, 10_000_001);
    contract.id = id;
    contract.status = status;
    contract
}

pub fn create_request(number: &str, version: i32) -> CreateContractRequest {
    CreateContractRequest {
        contract_number: number.to_string(),
        contract_version: version,
        ukprn: 10_000_001,
        title: format!("Contract {} v{}", number, version),
        year: "2026".to_string(),
        value_in_pence: 1_000_000,
        funding_type: FundingType::MainStream,
        contract_type: ContractType::ConditionsOfFundingGrant,
        amendment_type: AmendmentType::None,
        parent_contract_number: None,
        start_date: None,
        end_date: None,
        signed_on: None,
        file_name: format!("{}-v{}.xml", number, version),
        contract_content: None,
        funding_stream_period_codes: Vec::new(),
    }
}
