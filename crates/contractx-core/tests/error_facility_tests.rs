use contractx_core::errors::{concurrency_conflict, ContractError, ExError, ExErrorKind};
use contractx_core::model::ContractStatus;

#[test]
fn test_not_found_by_number_keeps_identity() {
    let ex: ExError = ContractError::ContractNotFound {
        contract_number: "C-404".to_string(),
        contract_version: 2,
    }
    .into();

    assert_eq!(ex.kind(), ExErrorKind::NotFound);
    assert_eq!(ex.code(), "ERR_NOT_FOUND");
    assert_eq!(ex.contract_number(), Some("C-404"));
    assert_eq!(ex.contract_version(), Some(2));
    assert_eq!(ex.kind().http_status(), 404);
}

#[test]
fn test_not_found_by_id_keeps_identity() {
    let ex: ExError = ContractError::ContractIdNotFound { id: 42 }.into();
    assert_eq!(ex.kind(), ExErrorKind::NotFound);
    assert_eq!(ex.contract_id(), Some(42));
}

#[test]
fn test_request_shape_errors_are_bad_requests() {
    let mismatch: ExError = ContractError::RequestMismatch {
        field: "contract_version",
        requested: "2".to_string(),
        actual: "3".to_string(),
    }
    .into();
    let withdrawal: ExError = ContractError::InvalidWithdrawalType {
        requested: ContractStatus::Approved,
    }
    .into();

    assert_eq!(mismatch.kind(), ExErrorKind::InvalidRequest);
    assert_eq!(withdrawal.kind(), ExErrorKind::InvalidRequest);
    assert_eq!(mismatch.kind().http_status(), 400);
    assert!(mismatch.message().contains("contract_version"));
}

#[test]
fn test_expectation_failure_names_predicate() {
    let ex: ExError = ContractError::ExpectationFailed {
        contract_number: "C-1".to_string(),
        contract_version: 1,
        predicate: "contract.contract_content is not None".to_string(),
    }
    .into();

    assert_eq!(ex.code(), "ERR_EXPECTATION_FAILED");
    assert!(ex.message().contains("contract_content"));
}

#[test]
fn test_concurrency_conflict_helper() {
    let ex = concurrency_conflict("update", 9, "row changed since read");
    assert_eq!(ex.kind(), ExErrorKind::Concurrency);
    assert_eq!(ex.op(), Some("update"));
    assert_eq!(ex.contract_id(), Some(9));
    assert_eq!(ex.kind().http_status(), 409);
}

#[test]
fn test_error_kind_code_mapping() {
    let kinds = vec![
        (ExErrorKind::NotFound, "ERR_NOT_FOUND"),
        (ExErrorKind::InvalidRequest, "ERR_INVALID_REQUEST"),
        (ExErrorKind::ExpectationFailed, "ERR_EXPECTATION_FAILED"),
        (ExErrorKind::StatusConflict, "ERR_STATUS_CONFLICT"),
        (ExErrorKind::DuplicateVersion, "ERR_DUPLICATE_VERSION"),
        (ExErrorKind::HigherVersionExists, "ERR_HIGHER_VERSION_EXISTS"),
        (ExErrorKind::DocumentFetchFailure, "ERR_DOCUMENT_FETCH_FAILURE"),
        (ExErrorKind::DocumentEmpty, "ERR_DOCUMENT_EMPTY"),
        (ExErrorKind::Concurrency, "ERR_CONCURRENCY"),
        (ExErrorKind::Persistence, "ERR_PERSISTENCE"),
    ];

    for (kind, expected_code) in kinds {
        assert_eq!(kind.code(), expected_code);
    }
}
