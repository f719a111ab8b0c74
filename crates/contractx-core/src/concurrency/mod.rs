//! In-process concurrency primitives

pub mod keyed_mutex;

pub use keyed_mutex::{KeyLock, KeyedMutex};
