//! Core types shared across ContractX facilities
//!
//! This crate provides the canonical schema constants used by both the
//! error facility and the logging facility, so that log field names and
//! event names stay identical in every crate.

pub mod schema;
