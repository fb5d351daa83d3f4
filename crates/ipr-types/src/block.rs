use bytes::Bytes;
use cid::Cid;

use crate::codec::CodecId;

/// An immutable `(CID, encoded bytes)` pair.
///
/// Blocks are what the block store holds. The data is kept in [`Bytes`] so
/// handing a block to several consumers never copies the payload.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Block {
    cid: Cid,
    data: Bytes,
}

impl Block {
    /// Pair a CID with its encoded bytes.
    ///
    /// No hash verification happens here; see `ipr_crypto::BlockHasher::verify`.
    pub fn new(cid: Cid, data: impl Into<Bytes>) -> Self {
        Self {
            cid,
            data: data.into(),
        }
    }

    pub fn cid(&self) -> &Cid {
        &self.cid
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Cheap clone of the payload.
    pub fn bytes(&self) -> Bytes {
        self.data.clone()
    }

    /// Codec tag of the block's CID. This, not any caller-supplied codec, is
    /// what decides which format decodes the block.
    pub fn codec(&self) -> CodecId {
        CodecId::new(self.cid.codec())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn into_parts(self) -> (Cid, Bytes) {
        (self.cid, self.data)
    }
}
