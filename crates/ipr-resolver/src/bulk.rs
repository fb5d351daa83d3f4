//! Bulk node reading, writing and removal.
//!
//! None of these are transactional. Each iterator stops at the first failure;
//! blocks written or removed before it stay written or removed.

use std::sync::Arc;

use ipr_formats::{CidOptions, Format};
use ipr_types::{Block, Cid, CodecId, Ipld, Version};
use tracing::debug;

use crate::error::{ResolverError, ResolverResult};
use crate::options::PutOptions;
use crate::resolver::Resolver;

// ---------------------------------------------------------------------------
// GetNodes
// ---------------------------------------------------------------------------

/// Lazy CID → node decoding, one node per input CID, in input order.
pub struct GetNodes<'a, I> {
    resolver: &'a Resolver,
    cids: I,
    done: bool,
}

impl<'a, I> GetNodes<'a, I> {
    pub(crate) fn new(resolver: &'a Resolver, cids: I) -> Self {
        Self {
            resolver,
            cids,
            done: false,
        }
    }
}

impl<I: Iterator<Item = Cid>> GetNodes<'_, I> {
    fn load(&self, cid: &Cid) -> ResolverResult<Ipld> {
        let block = self.resolver.store().get(cid)?;
        // The fetched block's CID decides the format.
        let format = self.resolver.format(block.codec())?;
        let node = format.deserialize(block.data())?;
        debug!(%cid, len = block.len(), "decoded node");
        Ok(node)
    }
}

impl<I: Iterator<Item = Cid>> Iterator for GetNodes<'_, I> {
    type Item = ResolverResult<Ipld>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let cid = self.cids.next()?;
        let result = self.load(&cid);
        self.done = result.is_err();
        Some(result)
    }
}

impl<I: Iterator<Item = Cid>> std::iter::FusedIterator for GetNodes<'_, I> {}

// ---------------------------------------------------------------------------
// PutNodes
// ---------------------------------------------------------------------------

/// Lazy node → block encoding, yielding each node's CID in input order.
///
/// The target format and the effective CID options are settled when the
/// first node is pulled, so building the iterator does no work.
pub struct PutNodes<'a, I> {
    resolver: &'a Resolver,
    nodes: I,
    codec: CodecId,
    options: PutOptions,
    resolved: Option<(Arc<dyn Format>, CidOptions)>,
    done: bool,
}

impl<'a, I> PutNodes<'a, I> {
    pub(crate) fn new(resolver: &'a Resolver, nodes: I, codec: CodecId, options: PutOptions) -> Self {
        Self {
            resolver,
            nodes,
            codec,
            options,
            resolved: None,
            done: false,
        }
    }
}

impl<I: Iterator<Item = Ipld>> PutNodes<'_, I> {
    fn settle(&mut self) -> ResolverResult<(Arc<dyn Format>, CidOptions)> {
        if let Some(resolved) = &self.resolved {
            return Ok(resolved.clone());
        }
        let format = self.resolver.format(self.codec)?;
        let version = Version::try_from(self.options.cid_version).map_err(|e| {
            ResolverError::invalid_argument(format!(
                "cid version {}: {e}",
                self.options.cid_version
            ))
        })?;
        let cid_options = CidOptions {
            version,
            hash_alg: self
                .options
                .hash_alg
                .unwrap_or_else(|| format.default_hash_alg()),
            only_hash: self.options.only_hash,
        };
        self.resolved = Some((Arc::clone(&format), cid_options));
        Ok((format, cid_options))
    }

    fn store_node(&mut self, node: Ipld) -> ResolverResult<Cid> {
        let (format, options) = self.settle()?;
        let cid = format.compute_cid(&node, &options)?;
        if !options.only_hash {
            let data = format.serialize(&node)?;
            self.resolver.store().put(&Block::new(cid, data))?;
        }
        debug!(%cid, only_hash = options.only_hash, "put node");
        Ok(cid)
    }
}

impl<I: Iterator<Item = Ipld>> Iterator for PutNodes<'_, I> {
    type Item = ResolverResult<Cid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let node = self.nodes.next()?;
        let result = self.store_node(node);
        self.done = result.is_err();
        Some(result)
    }
}

impl<I: Iterator<Item = Ipld>> std::iter::FusedIterator for PutNodes<'_, I> {}

// ---------------------------------------------------------------------------
// RemoveBlocks
// ---------------------------------------------------------------------------

/// Lazy block deletion, pulling one CID from the input per step.
///
/// On failure the failing CID's error is yielded and the rest of the input
/// is left unread; [`RemoveBlocks::into_remaining`] hands back what was
/// never attempted.
pub struct RemoveBlocks<'a, I> {
    resolver: &'a Resolver,
    cids: I,
    done: bool,
}

impl<'a, I> RemoveBlocks<'a, I> {
    pub(crate) fn new(resolver: &'a Resolver, cids: I) -> Self {
        Self {
            resolver,
            cids,
            done: false,
        }
    }

    /// The unread input: CIDs not yet attempted.
    pub fn into_remaining(self) -> I {
        self.cids
    }
}

impl<I: Iterator<Item = Cid>> Iterator for RemoveBlocks<'_, I> {
    type Item = ResolverResult<Cid>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        let cid = self.cids.next()?;
        match self.resolver.store().delete(&cid) {
            Ok(()) => {
                debug!(%cid, "removed block");
                Some(Ok(cid))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e.into()))
            }
        }
    }
}

impl<I: Iterator<Item = Cid>> std::iter::FusedIterator for RemoveBlocks<'_, I> {}
