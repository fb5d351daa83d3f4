use ipr_crypto::BlockHasher;
use ipr_types::{Cid, CodecId, HashAlg, Ipld, Version};

use crate::error::FormatResult;
use crate::path;

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Result of resolving a path inside a single node.
#[derive(Clone, Debug, PartialEq)]
pub struct Resolution {
    /// The value reached. A link here means "continue in another node".
    pub value: Ipld,
    /// The part of the path this node did not consume, `""` when exhausted.
    pub remainder: String,
}

impl Resolution {
    pub fn new(value: Ipld, remainder: impl Into<String>) -> Self {
        Self {
            value,
            remainder: remainder.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// CidOptions
// ---------------------------------------------------------------------------

/// Parameters for CID computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CidOptions {
    pub version: Version,
    pub hash_alg: HashAlg,
    /// Compute the CID without persisting. Formats ignore this; it travels
    /// with the options so callers see one options value end to end.
    pub only_hash: bool,
}

impl Default for CidOptions {
    fn default() -> Self {
        Self {
            version: Version::V1,
            hash_alg: HashAlg::Sha2_256,
            only_hash: false,
        }
    }
}

// ---------------------------------------------------------------------------
// Format trait
// ---------------------------------------------------------------------------

/// Capability contract for one codec.
///
/// Every format works on the shared [`Ipld`] data model, which keeps the
/// trait object-safe so formats can live in a `HashMap<CodecId, Arc<dyn Format>>`.
///
/// Only `codec`, `serialize` and `deserialize` are required. The remaining
/// operations have defaults that decode the node and walk it with
/// [`path`]; formats with a cheaper or different answer override them.
pub trait Format: Send + Sync {
    /// Multicodec this format decodes.
    fn codec(&self) -> CodecId;

    /// Hash function used when the caller does not pick one.
    fn default_hash_alg(&self) -> HashAlg {
        HashAlg::Sha2_256
    }

    /// Encode a node to bytes.
    fn serialize(&self, node: &Ipld) -> FormatResult<Vec<u8>>;

    /// Decode bytes to a node.
    fn deserialize(&self, bytes: &[u8]) -> FormatResult<Ipld>;

    /// Walk `path` inside the node encoded by `bytes`.
    ///
    /// Stops early at a link and reports the unconsumed segments as the
    /// remainder.
    fn resolve(&self, bytes: &[u8], path: &str) -> FormatResult<Resolution> {
        let node = self.deserialize(bytes)?;
        path::resolve_in(node, path)
    }

    /// Every path inside the node, without crossing links.
    fn tree(&self, bytes: &[u8]) -> FormatResult<Vec<String>> {
        let node = self.deserialize(bytes)?;
        Ok(path::paths(&node))
    }

    /// The CID at `path`, if the value there is a link.
    fn is_link(&self, bytes: &[u8], path: &str) -> FormatResult<Option<Cid>> {
        let node = self.deserialize(bytes)?;
        Ok(path::link_at(&node, path))
    }

    /// CID of `node` under `options`.
    fn compute_cid(&self, node: &Ipld, options: &CidOptions) -> FormatResult<Cid> {
        let bytes = self.serialize(node)?;
        let cid = BlockHasher::new(options.hash_alg).cid(options.version, self.codec(), &bytes)?;
        Ok(cid)
    }
}
