use ipr_types::HashAlg;
use serde::{Deserialize, Serialize};

/// Options for [`Resolver::put`](crate::Resolver::put).
///
/// Unset fields fall back to the target format's defaults when the first
/// node is written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PutOptions {
    /// Hash function; `None` uses the format's default.
    pub hash_alg: Option<HashAlg>,
    /// CID version, 0 or 1.
    pub cid_version: u64,
    /// Compute CIDs without writing blocks.
    pub only_hash: bool,
}

impl Default for PutOptions {
    fn default() -> Self {
        Self {
            hash_alg: None,
            cid_version: 1,
            only_hash: false,
        }
    }
}

impl PutOptions {
    /// Options that compute CIDs without touching the store.
    pub fn only_hash() -> Self {
        Self {
            only_hash: true,
            ..Default::default()
        }
    }
}

/// Options for [`Resolver::tree`](crate::Resolver::tree).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeOptions {
    /// Follow links and enumerate the linked nodes too.
    pub recursive: bool,
}

impl TreeOptions {
    pub fn recursive() -> Self {
        Self { recursive: true }
    }
}
