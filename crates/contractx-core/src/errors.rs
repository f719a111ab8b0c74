use thiserror::Error;

use crate::model::ContractStatus;

/// Result type alias using ContractError
pub type Result<T> = std::result::Result<T, ContractError>;

// ========== Error Facility ==========

/// Canonical error kind taxonomy
///
/// This taxonomy provides a stable, structured classification of all errors
/// in the ContractX system. Each kind maps to a stable error code that can be
/// used for programmatic error handling, testing, and external API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExErrorKind {
    // Lookup / request shape
    NotFound,
    InvalidRequest,
    ExpectationFailed,
    InvalidInput,

    // Lifecycle
    StatusConflict,
    DuplicateVersion,
    HigherVersionExists,

    // Documents
    DocumentFetchFailure,
    DocumentEmpty,

    // Integration/IO
    Concurrency,
    Configuration,
    Persistence,
    Serialization,
    Io,
    ExternalService,

    // Internal
    Internal,
}

impl ExErrorKind {
    /// Get the stable error code for this kind
    pub fn code(&self) -> &'static str {
        match self {
            ExErrorKind::NotFound => "ERR_NOT_FOUND",
            ExErrorKind::InvalidRequest => "ERR_INVALID_REQUEST",
            ExErrorKind::ExpectationFailed => "ERR_EXPECTATION_FAILED",
            ExErrorKind::InvalidInput => "ERR_INVALID_INPUT",
            ExErrorKind::StatusConflict => "ERR_STATUS_CONFLICT",
            ExErrorKind::DuplicateVersion => "ERR_DUPLICATE_VERSION",
            ExErrorKind::HigherVersionExists => "ERR_HIGHER_VERSION_EXISTS",
            ExErrorKind::DocumentFetchFailure => "ERR_DOCUMENT_FETCH_FAILURE",
            ExErrorKind::DocumentEmpty => "ERR_DOCUMENT_EMPTY",
            ExErrorKind::Concurrency => "ERR_CONCURRENCY",
            ExErrorKind::Configuration => "ERR_CONFIGURATION",
            ExErrorKind::Persistence => "ERR_PERSISTENCE",
            ExErrorKind::Serialization => "ERR_SERIALIZATION",
            ExErrorKind::Io => "ERR_IO",
            ExErrorKind::ExternalService => "ERR_EXTERNAL_SERVICE",
            ExErrorKind::Internal => "ERR_INTERNAL",
        }
    }

    /// HTTP status an outer API layer should answer with for this kind.
    pub fn http_status(&self) -> u16 {
        match self {
            ExErrorKind::NotFound => 404,
            ExErrorKind::InvalidRequest
            | ExErrorKind::ExpectationFailed
            | ExErrorKind::InvalidInput => 400,
            ExErrorKind::StatusConflict
            | ExErrorKind::DuplicateVersion
            | ExErrorKind::HigherVersionExists
            | ExErrorKind::Concurrency => 409,
            ExErrorKind::DocumentFetchFailure
            | ExErrorKind::DocumentEmpty
            | ExErrorKind::Configuration
            | ExErrorKind::Persistence
            | ExErrorKind::Serialization
            | ExErrorKind::Io
            | ExErrorKind::ExternalService
            | ExErrorKind::Internal => 500,
        }
    }
}

/// Details of a rejected status transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusConflict {
    pub current: ContractStatus,
    pub requested: ContractStatus,
    pub allowed: Vec<ContractStatus>,
}

/// Canonical structured error type
///
/// This error type provides a structured representation of errors with
/// classification fields for programmatic handling and rich context for debugging.
#[derive(Debug, Clone)]
pub struct ExError {
    kind: ExErrorKind,
    op: Option<String>,
    contract_id: Option<i64>,
    contract_number: Option<String>,
    contract_version: Option<i32>,
    message: String,
    source: Option<Box<ExError>>,
    status_conflict: Option<StatusConflict>,
}

impl ExError {
    /// Create a new error with the specified kind
    pub fn new(kind: ExErrorKind) -> Self {
        Self {
            kind,
            op: None,
            contract_id: None,
            contract_number: None,
            contract_version: None,
            message: String::new(),
            source: None,
            status_conflict: None,
        }
    }

    /// Add operation context
    pub fn with_op(mut self, op: impl Into<String>) -> Self {
        self.op = Some(op.into());
        self
    }

    /// Add contract id context
    pub fn with_contract_id(mut self, id: i64) -> Self {
        self.contract_id = Some(id);
        self
    }

    /// Add contract number context
    pub fn with_contract_number(mut self, number: impl Into<String>) -> Self {
        self.contract_number = Some(number.into());
        self
    }

    /// Add contract version context
    pub fn with_contract_version(mut self, version: i32) -> Self {
        self.contract_version = Some(version);
        self
    }

    /// Add custom message
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Add source error
    pub fn with_source(mut self, source: ExError) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach the details of a rejected status transition
    pub fn with_status_conflict(mut self, conflict: StatusConflict) -> Self {
        self.status_conflict = Some(conflict);
        self
    }

    /// Get the error kind
    pub fn kind(&self) -> ExErrorKind {
        self.kind
    }

    /// Get the stable error code
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }

    /// Get the operation context, if any
    pub fn op(&self) -> Option<&str> {
        self.op.as_deref()
    }

    /// Get the contract id context, if any
    pub fn contract_id(&self) -> Option<i64> {
        self.contract_id
    }

    /// Get the contract number context, if any
    pub fn contract_number(&self) -> Option<&str> {
        self.contract_number.as_deref()
    }

    /// Get the contract version context, if any
    pub fn contract_version(&self) -> Option<i32> {
        self.contract_version
    }

    /// Get the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Get the source error, if any
    pub fn source_error(&self) -> Option<&ExError> {
        self.source.as_deref()
    }

    /// Get the status transition details (populated on StatusConflict)
    pub fn status_conflict(&self) -> Option<&StatusConflict> {
        self.status_conflict.as_ref()
    }
}

impl std::fmt::Display for ExError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.code())?;
        if let Some(op) = &self.op {
            write!(f, " in operation '{}'", op)?;
        }
        if !self.message.is_empty() {
            write!(f, ": {}", self.message)?;
        }
        if let Some(number) = &self.contract_number {
            write!(f, " (contract_number: {})", number)?;
        }
        if let Some(version) = self.contract_version {
            write!(f, " (contract_version: {})", version)?;
        }
        if let Some(id) = self.contract_id {
            write!(f, " (contract_id: {})", id)?;
        }
        if let Some(source) = &self.source {
            write!(f, " caused by {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for ExError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

// ========== End Error Facility ==========

/// Domain error taxonomy raised by contract validation and lifecycle rules
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ContractError {
    // ===== Lookup Errors =====
    /// No contract with the given number and version
    #[error("Contract not found: {contract_number} v{contract_version}")]
    ContractNotFound {
        contract_number: String,
        contract_version: i32,
    },

    /// No contract with the given id
    #[error("Contract not found: id {id}")]
    ContractIdNotFound { id: i64 },

    // ===== Request Errors =====
    /// A request field disagrees with the stored contract
    #[error("Request {field} '{requested}' does not match contract {field} '{actual}'")]
    RequestMismatch {
        field: &'static str,
        requested: String,
        actual: String,
    },

    /// Withdrawal requested with a status that is not a withdrawal
    #[error("Invalid withdrawal type: {requested}")]
    InvalidWithdrawalType { requested: ContractStatus },

    /// A supplementary precondition on the contract evaluated false
    #[error("Contract {contract_number} v{contract_version} failed expectation: {predicate}")]
    ExpectationFailed {
        contract_number: String,
        contract_version: i32,
        predicate: String,
    },

    /// A value could not be parsed into its domain type
    #[error("Invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },

    /// Page number / page size outside their valid range
    #[error("Invalid paging: {reason}")]
    InvalidPaging { reason: String },

    // ===== Lifecycle Errors =====
    /// Status transition not permitted from the current status
    #[error("Contract {contract_number} v{contract_version} cannot move from {current} to {requested}; allowed current statuses: {allowed:?}")]
    StatusConflict {
        contract_number: String,
        contract_version: i32,
        current: ContractStatus,
        requested: ContractStatus,
        allowed: Vec<ContractStatus>,
    },

    /// A later version of the contract is already stored
    #[error("Contract {contract_number} already has version {existing_version}, higher than requested version {requested_version}")]
    HigherVersionExists {
        contract_number: String,
        requested_version: i32,
        existing_version: i32,
    },

    /// The exact number/version pair is already stored
    #[error("Duplicate contract: {contract_number} v{contract_version} already exists")]
    DuplicateContract {
        contract_number: String,
        contract_version: i32,
    },

    // ===== Generic Errors =====
    /// Serialization error (JSON encoding/decoding)
    #[error("Serialization error: {message}")]
    Serialization { message: String },

    /// Generic internal error
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Conversion from ContractError to ExError
///
/// Every domain error is classified into exactly one canonical kind so that
/// callers can translate outcomes without inspecting variants.
impl From<ContractError> for ExError {
    fn from(err: ContractError) -> Self {
        let message = err.to_string();
        match err {
            ContractError::ContractNotFound {
                contract_number,
                contract_version,
            } => ExError::new(ExErrorKind::NotFound)
                .with_contract_number(contract_number)
                .with_contract_version(contract_version)
                .with_message(message),
            ContractError::ContractIdNotFound { id } => ExError::new(ExErrorKind::NotFound)
                .with_contract_id(id)
                .with_message(message),
            ContractError::RequestMismatch { .. } | ContractError::InvalidWithdrawalType { .. } => {
                ExError::new(ExErrorKind::InvalidRequest).with_message(message)
            }
            ContractError::ExpectationFailed {
                contract_number,
                contract_version,
                ..
            } => ExError::new(ExErrorKind::ExpectationFailed)
                .with_contract_number(contract_number)
                .with_contract_version(contract_version)
                .with_message(message),
            ContractError::InvalidValue { .. } | ContractError::InvalidPaging { .. } => {
                ExError::new(ExErrorKind::InvalidInput).with_message(message)
            }
            ContractError::StatusConflict {
                contract_number,
                contract_version,
                current,
                requested,
                allowed,
            } => ExError::new(ExErrorKind::StatusConflict)
                .with_contract_number(contract_number)
                .with_contract_version(contract_version)
                .with_message(message)
                .with_status_conflict(StatusConflict {
                    current,
                    requested,
                    allowed,
                }),
            ContractError::HigherVersionExists {
                contract_number,
                requested_version,
                ..
            } => ExError::new(ExErrorKind::HigherVersionExists)
                .with_contract_number(contract_number)
                .with_contract_version(requested_version)
                .with_message(message),
            ContractError::DuplicateContract {
                contract_number,
                contract_version,
            } => ExError::new(ExErrorKind::DuplicateVersion)
                .with_contract_number(contract_number)
                .with_contract_version(contract_version)
                .with_message(message),
            ContractError::Serialization { .. } => {
                ExError::new(ExErrorKind::Serialization).with_message(message)
            }
            ContractError::Internal { .. } => {
                ExError::new(ExErrorKind::Internal).with_message(message)
            }
        }
    }
}

/// Create a concurrency conflict error for a stale write
pub fn concurrency_conflict(op: &str, contract_id: i64, reason: &str) -> ExError {
    ExError::new(ExErrorKind::Concurrency)
        .with_op(op.to_string())
        .with_contract_id(contract_id)
        .with_message(reason.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_conflict_carries_transition() {
        let err: ExError = ContractError::StatusConflict {
            contract_number: "C-1".to_string(),
            contract_version: 2,
            current: ContractStatus::Approved,
            requested: ContractStatus::WithdrawnByAgency,
            allowed: vec![ContractStatus::PublishedToProvider],
        }
        .into();

        assert_eq!(err.kind(), ExErrorKind::StatusConflict);
        let conflict = err.status_conflict().unwrap();
        assert_eq!(conflict.current, ContractStatus::Approved);
        assert_eq!(conflict.requested, ContractStatus::WithdrawnByAgency);
        assert_eq!(conflict.allowed, vec![ContractStatus::PublishedToProvider]);
    }

    #[test]
    fn test_display_includes_code_and_context() {
        let err = ExError::new(ExErrorKind::NotFound)
            .with_op("get_contract")
            .with_contract_number("C-9")
            .with_message("missing");
        let text = err.to_string();
        assert!(text.starts_with("[ERR_NOT_FOUND]"));
        assert!(text.contains("get_contract"));
        assert!(text.contains("C-9"));
    }

    #[test]
    fn test_source_is_exposed_through_std_error() {
        use std::error::Error;
        let cause = ExError::new(ExErrorKind::Io).with_message("disk gone");
        let err = ExError::new(ExErrorKind::DocumentFetchFailure).with_source(cause);
        let source = err.source().unwrap();
        assert!(source.to_string().contains("disk gone"));
    }
}
