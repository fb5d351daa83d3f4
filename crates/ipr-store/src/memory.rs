use std::collections::HashMap;
use std::sync::RwLock;

use bytes::Bytes;
use ipr_types::{Block, Cid};
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::BlockStore;

/// In-memory, HashMap-based block store.
///
/// Intended for tests and embedding. Blocks are held behind a `RwLock`; the
/// payload is a [`Bytes`] so reads only bump a reference count.
pub struct InMemoryBlockStore {
    blocks: RwLock<HashMap<Cid, Bytes>>,
}

impl InMemoryBlockStore {
    /// Create a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            blocks: RwLock::new(HashMap::new()),
        }
    }

    /// Number of blocks currently stored.
    pub fn len(&self) -> usize {
        self.blocks.read().expect("lock poisoned").len()
    }

    /// Returns `true` if the store is empty.
    pub fn is_empty(&self) -> bool {
        self.blocks.read().expect("lock poisoned").is_empty()
    }

    /// Total bytes across all stored blocks.
    pub fn total_bytes(&self) -> u64 {
        self.blocks
            .read()
            .expect("lock poisoned")
            .values()
            .map(|data| data.len() as u64)
            .sum()
    }

    /// Remove all blocks from the store.
    pub fn clear(&self) {
        self.blocks.write().expect("lock poisoned").clear();
    }

    /// Return a sorted list of all CIDs in the store.
    pub fn all_cids(&self) -> Vec<Cid> {
        let map = self.blocks.read().expect("lock poisoned");
        let mut cids: Vec<Cid> = map.keys().copied().collect();
        cids.sort();
        cids
    }
}

impl Default for InMemoryBlockStore {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockStore for InMemoryBlockStore {
    fn get(&self, cid: &Cid) -> StoreResult<Block> {
        let map = self.blocks.read().expect("lock poisoned");
        map.get(cid)
            .map(|data| Block::new(*cid, data.clone()))
            .ok_or(StoreError::NotFound(*cid))
    }

    fn put(&self, block: &Block) -> StoreResult<()> {
        let mut map = self.blocks.write().expect("lock poisoned");
        map.entry(*block.cid()).or_insert_with(|| block.bytes());
        trace!(cid = %block.cid(), len = block.len(), "stored block in memory");
        Ok(())
    }

    fn delete(&self, cid: &Cid) -> StoreResult<()> {
        let mut map = self.blocks.write().expect("lock poisoned");
        map.remove(cid).map(|_| ()).ok_or(StoreError::NotFound(*cid))
    }

    fn has(&self, cid: &Cid) -> StoreResult<bool> {
        let map = self.blocks.read().expect("lock poisoned");
        Ok(map.contains_key(cid))
    }
}

impl std::fmt::Debug for InMemoryBlockStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.len();
        f.debug_struct("InMemoryBlockStore")
            .field("block_count", &count)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipr_crypto::BlockHasher;
    use ipr_types::{CodecId, Version};

    fn make_block(content: &[u8]) -> Block {
        let cid = BlockHasher::SHA2_256
            .cid(Version::V1, CodecId::RAW, content)
            .unwrap();
        Block::new(cid, content.to_vec())
    }

    // -----------------------------------------------------------------------
    // Core operations
    // -----------------------------------------------------------------------

    #[test]
    fn put_and_get() {
        let store = InMemoryBlockStore::new();
        let block = make_block(b"hello world");
        store.put(&block).unwrap();

        let read_back = store.get(block.cid()).unwrap();
        assert_eq!(read_back, block);
    }

    #[test]
    fn get_missing_is_not_found() {
        let store = InMemoryBlockStore::new();
        let block = make_block(b"missing");
        let err = store.get(block.cid()).unwrap_err();
        assert!(matches!(err, StoreError::NotFound(cid) if cid == *block.cid()));
    }

    #[test]
    fn put_is_idempotent() {
        let store = InMemoryBlockStore::new();
        let block = make_block(b"twice");
        store.put(&block).unwrap();
        store.put(&block).unwrap();
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn delete_present_block() {
        let store = InMemoryBlockStore::new();
        let block = make_block(b"to-delete");
        store.put(&block).unwrap();
        store.delete(block.cid()).unwrap();
        assert!(!store.has(block.cid()).unwrap());
    }

    #[test]
    fn delete_missing_block_is_not_found() {
        let store = InMemoryBlockStore::new();
        let block = make_block(b"never-written");
        assert!(matches!(
            store.delete(block.cid()),
            Err(StoreError::NotFound(_))
        ));
    }

    // -----------------------------------------------------------------------
    // Batch / utility
    // -----------------------------------------------------------------------

    #[test]
    fn put_many_writes_all() {
        let store = InMemoryBlockStore::new();
        let blocks = vec![make_block(b"a"), make_block(b"b"), make_block(b"c")];
        store.put_many(&blocks).unwrap();
        assert_eq!(store.len(), 3);
        assert_eq!(store.total_bytes(), 3);
    }

    #[test]
    fn all_cids_is_sorted() {
        let store = InMemoryBlockStore::new();
        for content in [&b"x"[..], b"y", b"z"] {
            store.put(&make_block(content)).unwrap();
        }
        let cids = store.all_cids();
        assert_eq!(cids.len(), 3);
        for w in cids.windows(2) {
            assert!(w[0] <= w[1]);
        }
    }

    #[test]
    fn clear_removes_all() {
        let store = InMemoryBlockStore::default();
        store.put(&make_block(b"a")).unwrap();
        store.clear();
        assert!(store.is_empty());
    }

    #[test]
    fn concurrent_reads_are_safe() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(InMemoryBlockStore::new());
        let block = make_block(b"shared data");
        store.put(&block).unwrap();
        let cid = *block.cid();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let store = Arc::clone(&store);
                thread::spawn(move || {
                    let read = store.get(&cid).unwrap();
                    assert!(BlockHasher::verify(&read).unwrap());
                })
            })
            .collect();

        for h in handles {
            h.join().expect("thread should not panic");
        }
    }

    #[test]
    fn debug_format() {
        let store = InMemoryBlockStore::new();
        store.put(&make_block(b"x")).unwrap();
        let debug = format!("{store:?}");
        assert!(debug.contains("block_count"));
    }
}
