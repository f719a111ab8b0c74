//! Named document storage on the local filesystem
//!
//! Provides:
//! - Async reads behind the `BlobSource` trait
//! - Atomic temp-then-rename writes
//! - Rejection of names that would escape the root directory

mod fs_source;

pub use fs_source::FsBlobSource;
