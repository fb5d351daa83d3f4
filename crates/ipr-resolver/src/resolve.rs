//! Step-wise path resolution across node boundaries.

use ipr_formats::Resolution;
use ipr_types::{normalize_link, Cid, CodecId, Ipld};
use tracing::debug;

use crate::error::ResolverResult;
use crate::resolver::Resolver;

/// One hop of a resolution: what a single node made of the path.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolveStep {
    /// Path left over after this node.
    pub remainder: String,
    /// A link to follow next, or the final value.
    pub value: Ipld,
}

impl ResolveStep {
    /// The CID to continue in, if this step ended on a link.
    pub fn link(&self) -> Option<Cid> {
        match &self.value {
            Ipld::Link(cid) => Some(*cid),
            _ => None,
        }
    }
}

/// Lazy sequence of [`ResolveStep`]s for one `(cid, path)` pair.
///
/// Each call to `next` resolves the format for the current CID, fetches its
/// block, and walks the remaining path inside it. The sequence ends after the
/// first step whose value is not a link, or after the first error.
pub struct ResolveSteps<'a> {
    resolver: &'a Resolver,
    cid: Option<Cid>,
    path: String,
}

impl<'a> ResolveSteps<'a> {
    pub(crate) fn new(resolver: &'a Resolver, cid: Cid, path: &str) -> Self {
        Self {
            resolver,
            cid: Some(cid),
            path: path.to_string(),
        }
    }

    /// The CID the next step will load, `None` once finished.
    pub fn current(&self) -> Option<&Cid> {
        self.cid.as_ref()
    }

    fn step(&mut self, cid: Cid) -> ResolverResult<ResolveStep> {
        let format = self.resolver.format(CodecId::new(cid.codec()))?;
        let block = self.resolver.store().get(&cid)?;
        let Resolution { value, remainder } = format.resolve(block.data(), &self.path)?;
        let value = normalize_link(value);

        debug!(
            %cid,
            path = %self.path,
            remainder = %remainder,
            link = matches!(value, Ipld::Link(_)),
            "resolved step"
        );

        self.cid = match &value {
            Ipld::Link(next) => Some(*next),
            _ => None,
        };
        self.path.clone_from(&remainder);
        Ok(ResolveStep { remainder, value })
    }
}

impl Iterator for ResolveSteps<'_> {
    type Item = ResolverResult<ResolveStep>;

    fn next(&mut self) -> Option<Self::Item> {
        // Taking the CID first makes any error terminal: `step` only puts a
        // CID back on success.
        let cid = self.cid.take()?;
        Some(self.step(cid))
    }
}

impl std::iter::FusedIterator for ResolveSteps<'_> {}

/// Final outcome of draining a resolution.
#[derive(Clone, Debug, PartialEq)]
pub struct ResolvedValue {
    /// CID of the node the value was found in.
    pub cid: Cid,
    /// The value at the end of the path.
    pub value: Ipld,
    /// Unconsumed path, non-empty only when resolution stopped at a value
    /// that is link-shaped but could not be followed.
    pub remainder: String,
}
