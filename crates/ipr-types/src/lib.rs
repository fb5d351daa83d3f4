//! Foundation types for IPLD path resolution.
//!
//! Every other IPR crate depends on `ipr-types`. The types here are plain
//! values: they carry identity and tagging information but never touch a
//! block store or a codec implementation.
//!
//! # Key Types
//!
//! - [`Cid`] — Content identifier (re-exported from the `cid` crate)
//! - [`CodecId`] — Numeric multicodec identifier with name aliases
//! - [`HashAlg`] — Multihash functions the resolver can compute
//! - [`Block`] — An immutable `(CID, bytes)` pair
//! - [`Ipld`] — The in-memory node representation shared by all formats
//! - [`link`] — Legacy `{"/": "<cid>"}` link detection and normalization

pub mod block;
pub mod codec;
pub mod error;
pub mod hash_alg;
pub mod link;

pub use block::Block;
pub use cid::{Cid, Version};
pub use codec::CodecId;
pub use error::TypeError;
pub use hash_alg::HashAlg;
pub use ipld_core::ipld::Ipld;
pub use link::{as_link, is_link_shaped, normalize_link};
