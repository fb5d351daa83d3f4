use ipr_types::{Block, Cid};

use crate::error::StoreResult;

/// CID-addressed block store.
///
/// All implementations must satisfy these invariants:
/// - Blocks are immutable once written. Writing a CID that is already present
///   is a no-op.
/// - `get` of an absent CID returns [`StoreError::NotFound`](crate::StoreError::NotFound).
/// - Concurrent reads are always safe.
/// - The store never interprets block contents.
pub trait BlockStore: Send + Sync {
    /// Fetch a block by CID.
    fn get(&self, cid: &Cid) -> StoreResult<Block>;

    /// Persist a block under its own CID.
    fn put(&self, block: &Block) -> StoreResult<()>;

    /// Delete a block. Deleting an absent CID is `NotFound`.
    fn delete(&self, cid: &Cid) -> StoreResult<()>;

    /// Check whether a block exists.
    fn has(&self, cid: &Cid) -> StoreResult<bool>;

    /// Write several blocks in order, stopping at the first failure.
    ///
    /// Blocks written before the failure stay written.
    fn put_many(&self, blocks: &[Block]) -> StoreResult<()> {
        blocks.iter().try_for_each(|block| self.put(block))
    }
}
