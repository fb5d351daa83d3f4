use cid::multihash::Multihash;
use cid::{Cid, Version};
use ipr_types::{Block, CodecId, HashAlg};
use sha2::{Digest, Sha256, Sha512};

/// Computes multihashes and CIDs for encoded block bytes.
///
/// Each hasher is bound to one [`HashAlg`]. The same bytes hashed under
/// different algorithms produce different CIDs, so the algorithm is part of a
/// block's identity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BlockHasher {
    alg: HashAlg,
}

impl BlockHasher {
    /// SHA2-256 hasher, the default of every bundled format.
    pub const SHA2_256: Self = Self {
        alg: HashAlg::Sha2_256,
    };
    /// SHA2-512 hasher.
    pub const SHA2_512: Self = Self {
        alg: HashAlg::Sha2_512,
    };
    /// BLAKE3 (32-byte output) hasher.
    pub const BLAKE3: Self = Self {
        alg: HashAlg::Blake3,
    };

    pub const fn new(alg: HashAlg) -> Self {
        Self { alg }
    }

    pub fn alg(&self) -> HashAlg {
        self.alg
    }

    /// Raw digest bytes, without the multihash prefix.
    pub fn digest(&self, data: &[u8]) -> Vec<u8> {
        match self.alg {
            HashAlg::Sha2_256 => Sha256::digest(data).to_vec(),
            HashAlg::Sha2_512 => Sha512::digest(data).to_vec(),
            HashAlg::Blake3 => blake3::hash(data).as_bytes().to_vec(),
        }
    }

    /// Digest wrapped as a multihash.
    pub fn multihash(&self, data: &[u8]) -> Result<Multihash<64>, HasherError> {
        Multihash::wrap(self.alg.code(), &self.digest(data))
            .map_err(|e| HasherError::Multihash(e.to_string()))
    }

    /// Build the CID for `data` encoded with `codec`.
    ///
    /// CIDv0 only exists for dag-pb blocks hashed with SHA2-256; any other
    /// combination is rejected.
    pub fn cid(&self, version: Version, codec: CodecId, data: &[u8]) -> Result<Cid, HasherError> {
        let hash = self.multihash(data)?;
        Cid::new(version, codec.code(), hash).map_err(|e| HasherError::InvalidCid {
            version: version.into(),
            codec,
            reason: e.to_string(),
        })
    }

    /// Check that a block's bytes hash to the digest in its CID.
    ///
    /// The hash function is taken from the CID itself. Blocks hashed with a
    /// function this crate does not implement yield
    /// [`HasherError::UnsupportedHash`].
    pub fn verify(block: &Block) -> Result<bool, HasherError> {
        let hash = block.cid().hash();
        let alg = HashAlg::from_code(hash.code())
            .ok_or(HasherError::UnsupportedHash(hash.code()))?;
        Ok(Self::new(alg).digest(block.data()) == hash.digest())
    }

    /// Short hex form of a CID's digest (first 4 bytes), for log lines.
    pub fn short_digest(cid: &Cid) -> String {
        let digest = cid.hash().digest();
        hex::encode(&digest[..digest.len().min(4)])
    }
}

impl Default for BlockHasher {
    fn default() -> Self {
        Self::SHA2_256
    }
}

/// Errors from hashing operations.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum HasherError {
    #[error("multihash error: {0}")]
    Multihash(String),

    #[error("cannot build CIDv{version} for codec {codec}: {reason}")]
    InvalidCid {
        version: u64,
        codec: CodecId,
        reason: String,
    },

    #[error("unsupported multihash code {0:#x}")]
    UnsupportedHash(u64),
}
