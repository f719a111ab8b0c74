//! Canonical schema constants for structured logging and events
//!
//! These constants ensure consistency across all logging and error reporting.

// Canonical field keys for structured logging
pub const FIELD_COMPONENT: &str = "component";
pub const FIELD_OP: &str = "op";
pub const FIELD_EVENT: &str = "event";
pub const FIELD_DURATION_MS: &str = "duration_ms";

// Entity identifiers
pub const FIELD_CONTRACT_ID: &str = "contract_id";
pub const FIELD_CONTRACT_NUMBER: &str = "contract_number";
pub const FIELD_CONTRACT_VERSION: &str = "contract_version";
pub const FIELD_UKPRN: &str = "ukprn";

// Status transitions
pub const FIELD_STATUS_FROM: &str = "status_from";
pub const FIELD_STATUS_TO: &str = "status_to";

// Paging
pub const FIELD_PAGE_NUMBER: &str = "page_number";
pub const FIELD_PAGE_SIZE: &str = "page_size";
pub const FIELD_TOTAL_COUNT: &str = "total_count";

// Error fields
pub const FIELD_ERR_KIND: &str = "err_kind";
pub const FIELD_ERR_CODE: &str = "err_code";

// Canonical event names
pub const EVENT_START: &str = "start";
pub const EVENT_END: &str = "end";
pub const EVENT_END_ERROR: &str = "end_error";
