//! Structured operation logging
//!
//! Every workflow entry point logs a `start` event, then either an `end`
//! event with its duration or an `end_error` event carrying the error code.
//! Field names come from `contractx_core_types::schema` so log consumers can
//! rely on them.
//!
//! ```rust
//! use contractx_core::logging_facility::{init, Profile};
//!
//! init(Profile::Development);
//! ```
//!
//! Tests install [`test_capture`] instead and assert on the captured events.

pub mod init;
pub mod macros;
pub mod test_capture;

pub use init::{init, Profile};
pub use test_capture::{init_test_capture, CapturedEvent, TestCapture};
