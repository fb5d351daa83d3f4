use std::sync::Arc;

use ipr_formats::{bundled_formats, Format};
use ipr_store::BlockStore;
use ipr_types::{Cid, CodecId, Ipld};

use crate::bulk::{GetNodes, PutNodes, RemoveBlocks};
use crate::error::{ResolverError, ResolverResult};
use crate::options::{PutOptions, TreeOptions};
use crate::registry::{FormatLoader, FormatRegistry};
use crate::resolve::{ResolveStep, ResolveSteps, ResolvedValue};
use crate::tree::TreePaths;

/// Entry point: a block store plus the formats that can read it.
///
/// The resolver owns its registry, so two resolvers never see each other's
/// formats. All operations take `&self`; the registry is internally locked
/// and every returned iterator owns its own traversal state.
pub struct Resolver {
    store: Arc<dyn BlockStore>,
    registry: FormatRegistry,
}

impl Resolver {
    /// Resolver with no formats and no loader.
    pub fn new(store: Arc<dyn BlockStore>) -> Self {
        Self {
            store,
            registry: FormatRegistry::new(),
        }
    }

    /// Resolver that loads formats on demand.
    pub fn with_loader(store: Arc<dyn BlockStore>, loader: impl FormatLoader + 'static) -> Self {
        Self {
            store,
            registry: FormatRegistry::with_loader(loader),
        }
    }

    /// Resolver with raw, dag-cbor and dag-json registered.
    pub fn with_bundled_formats(store: Arc<dyn BlockStore>) -> Self {
        let resolver = Self::new(store);
        for format in bundled_formats() {
            resolver
                .registry
                .add(format)
                .expect("bundled codecs are distinct");
        }
        resolver
    }

    pub fn store(&self) -> &Arc<dyn BlockStore> {
        &self.store
    }

    pub fn registry(&self) -> &FormatRegistry {
        &self.registry
    }

    // ---- Registry ----

    /// Register a format. Fails if its codec is already taken.
    pub fn add_format(&self, format: Arc<dyn Format>) -> ResolverResult<()> {
        self.registry.add(format)
    }

    /// Unregister a codec; a no-op if it is not registered.
    pub fn remove_format(&self, codec: CodecId) {
        self.registry.remove(codec);
    }

    /// The format for `codec`, consulting the loader on a miss.
    pub fn format(&self, codec: CodecId) -> ResolverResult<Arc<dyn Format>> {
        self.registry.resolve(codec)
    }

    // ---- Resolution ----

    /// Resolve `path` starting at `cid`, one node per step.
    pub fn resolve(&self, cid: &Cid, path: &str) -> ResolveSteps<'_> {
        ResolveSteps::new(self, *cid, path)
    }

    /// Like [`Self::resolve`], with the CID given as a string.
    ///
    /// A malformed CID is rejected before any I/O.
    pub fn resolve_str(&self, cid: &str, path: &str) -> ResolverResult<ResolveSteps<'_>> {
        let cid = cid
            .trim()
            .parse::<Cid>()
            .map_err(|e| ResolverError::invalid_argument(format!("invalid CID {cid:?}: {e}")))?;
        Ok(self.resolve(&cid, path))
    }

    /// Drain a resolution and return its last value together with the CID
    /// of the node it was read from.
    pub fn resolve_value(&self, cid: &Cid, path: &str) -> ResolverResult<ResolvedValue> {
        let mut source = *cid;
        let mut last: Option<ResolveStep> = None;
        for step in self.resolve(cid, path) {
            let step = step?;
            // The previous step's link is the node this step was read from.
            if let Some(next) = last.as_ref().and_then(ResolveStep::link) {
                source = next;
            }
            last = Some(step);
        }
        let step = last.ok_or_else(|| ResolverError::invalid_argument("empty resolution"))?;
        Ok(ResolvedValue {
            cid: source,
            value: step.value,
            remainder: step.remainder,
        })
    }

    // ---- Bulk operations ----

    /// Decode the nodes for `cids`, in order.
    pub fn get<I>(&self, cids: I) -> GetNodes<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Cid>,
    {
        GetNodes::new(self, cids.into_iter())
    }

    /// Encode and store `nodes` with `codec`, yielding their CIDs.
    pub fn put<I>(&self, nodes: I, codec: CodecId, options: PutOptions) -> PutNodes<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Ipld>,
    {
        PutNodes::new(self, nodes.into_iter(), codec, options)
    }

    /// Delete the blocks for `cids`, in order, yielding each removed CID.
    pub fn remove<I>(&self, cids: I) -> RemoveBlocks<'_, I::IntoIter>
    where
        I: IntoIterator<Item = Cid>,
    {
        RemoveBlocks::new(self, cids.into_iter())
    }

    /// Enumerate paths under `cid`, relative to `offset`.
    pub fn tree(&self, cid: &Cid, offset: &str, options: TreeOptions) -> TreePaths<'_> {
        TreePaths::new(self, *cid, offset, options)
    }
}

impl std::fmt::Debug for Resolver {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Resolver")
            .field("registry", &self.registry)
            .finish_non_exhaustive()
    }
}
