#![allow(dead_code)]

use contractx_core::model::{
    AmendmentType, Contract, ContractContent, ContractData, ContractType, FundingType,
};
use contractx_store::db::open_shared_in_memory;
use contractx_store::{SharedConnection, SqliteContractRepository};

pub fn setup() -> (SqliteContractRepository, SharedConnection) {
    let conn = open_shared_in_memory().unwrap();
    (SqliteContractRepository::new(conn.clone()), conn)
}

pub fn sample_contract(number: &str, version: i32) -> Contract {
    let mut contract = Contract::new(number, version, 10_000_346);
    contract.title = format!("Adult education budget {}", number);
    contract.year = "2026".to_string();
    contract.value_in_pence = 12_345_600;
    contract.funding_type = FundingType::Aebp;
    contract.contract_type = ContractType::ContractForServices;
    contract.amendment_type = AmendmentType::None;
    contract
}

pub fn with_relations(mut contract: Contract) -> Contract {
    contract.contract_content = Some(ContractContent::new("contract.pdf", b"%PDF-1.7 body".to_vec()));
    contract.contract_data = Some(ContractData {
        original_contract_xml: "<contract number=\"C-1\"/>".to_string(),
    });
    contract.funding_stream_period_codes = vec!["AEBC-19TRN2026".to_string(), "AEBC-ASCL2026".to_string()];
    contract
}
