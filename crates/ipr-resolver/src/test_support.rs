//! Fixtures shared by the in-module tests.

use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crate::{PutOptions, Resolver};
use ipr_store::{BlockStore, InMemoryBlockStore, StoreError, StoreResult};
use ipr_types::{Block, Cid, CodecId, Ipld};

pub fn setup() -> (Arc<InMemoryBlockStore>, Resolver) {
    let store = Arc::new(InMemoryBlockStore::new());
    let resolver = Resolver::with_bundled_formats(store.clone());
    (store, resolver)
}

pub fn map(entries: Vec<(&str, Ipld)>) -> Ipld {
    Ipld::Map(
        entries
            .into_iter()
            .map(|(k, v)| (k.to_string(), v))
            .collect::<BTreeMap<_, _>>(),
    )
}

pub fn legacy_link(cid: &Cid) -> Ipld {
    map(vec![("/", Ipld::String(cid.to_string()))])
}

pub fn store_node(resolver: &Resolver, node: Ipld, codec: CodecId) -> Cid {
    resolver
        .put([node], codec, PutOptions::default())
        .next()
        .expect("one node in")
        .expect("put should succeed")
}

/// Wraps an in-memory store and fails chosen operations, recording what was
/// attempted.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryBlockStore,
    pub fail_put: Option<Cid>,
    pub fail_delete: Option<Cid>,
    pub delete_attempts: Mutex<Vec<Cid>>,
    pub get_attempts: Mutex<Vec<Cid>>,
}

impl BlockStore for FaultyStore {
    fn get(&self, cid: &Cid) -> StoreResult<Block> {
        self.get_attempts.lock().unwrap().push(*cid);
        self.inner.get(cid)
    }

    fn put(&self, block: &Block) -> StoreResult<()> {
        if self.fail_put == Some(*block.cid()) {
            return Err(StoreError::ReadOnly);
        }
        self.inner.put(block)
    }

    fn delete(&self, cid: &Cid) -> StoreResult<()> {
        self.delete_attempts.lock().unwrap().push(*cid);
        if self.fail_delete == Some(*cid) {
            return Err(StoreError::Io(std::io::Error::other("disk on fire")));
        }
        self.inner.delete(cid)
    }

    fn has(&self, cid: &Cid) -> StoreResult<bool> {
        self.inner.has(cid)
    }
}
