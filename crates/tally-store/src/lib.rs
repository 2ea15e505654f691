//! Durable key-value storage for Tally.
//!
//! The calculation log persists itself as one serialized blob under one key.
//! This crate defines the storage boundary it writes through and the backends
//! that implement it.
//!
//! # Storage Backends
//!
//! All backends implement the [`DurableStore`] trait:
//!
//! - [`InMemoryStore`] -- `HashMap`-based store for tests and embedding
//! - [`FileStore`] -- one file per key under a directory, replaced atomically
//!
//! # Design Rules
//!
//! 1. A key is either absent or holds exactly one blob; there is no
//!    distinction between "set to empty" and "absent" other than presence.
//! 2. The store never interprets blob contents.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStore;
pub use memory::InMemoryStore;
pub use traits::DurableStore;
