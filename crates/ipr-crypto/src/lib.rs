//! Hashing primitives for content addressing.
//!
//! Computes multihash digests for the algorithms listed in
//! [`ipr_types::HashAlg`], builds CIDs from encoded bytes, and verifies that
//! a block's bytes match the digest carried by its CID.
//!
//! All crypto operations wrap established libraries — no custom cryptography.

pub mod hasher;

pub use hasher::{BlockHasher, HasherError};
