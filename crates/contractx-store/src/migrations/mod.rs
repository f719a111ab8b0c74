//! Schema migrations embedded in the crate and tracked by checksum

mod checksums;
mod embedded;
mod runner;

pub use runner::{applied_migrations, apply_migrations};
