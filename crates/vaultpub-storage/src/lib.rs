//! Storage abstraction for vaultpub.
//!
//! This crate provides a [`Storage`] trait for abstracting vault file access
//! from the underlying backend. This enables:
//!
//! - **Unit testing** without touching the real filesystem
//! - **Clean separation** between the publishing pipeline and I/O operations
//!
//! # Architecture
//!
//! The crate provides:
//! - [`Storage`] trait with `exists()`, `read_binary()`, `read_to_string()` and `scan_markdown()`
//! - [`FsStorage`] implementation rooted at a vault directory
//! - [`MockStorage`] for testing (behind `mock` feature flag)

mod fs;
#[cfg(any(test, feature = "mock"))]
mod mock;
mod storage;

pub use fs::FsStorage;
#[cfg(any(test, feature = "mock"))]
pub use mock::MockStorage;
pub use storage::{Storage, StorageError, StorageErrorKind};
