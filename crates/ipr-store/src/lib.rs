//! CID-addressed block storage.
//!
//! The resolver treats block storage as an injected collaborator: it asks for
//! a block by CID, hands over a finished block to persist, or asks for one to
//! be deleted. Nothing in a store interprets block contents.
//!
//! # Storage Backends
//!
//! All backends implement the [`BlockStore`] trait:
//!
//! - [`InMemoryBlockStore`] -- `HashMap`-based store for tests and embedding
//! - [`FsBlockStore`] -- one file per block under a sharded directory tree
//!
//! # Design Rules
//!
//! 1. Blocks are immutable once written (content addressing guarantees this).
//! 2. A missing block is an error ([`StoreError::NotFound`]), not an empty result.
//! 3. Concurrent reads are always safe.
//! 4. No transactional semantics: batch callers see partial effects on failure.
//! 5. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod fs;
pub mod memory;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use fs::FsBlockStore;
pub use memory::InMemoryBlockStore;
pub use traits::BlockStore;
