use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid CID {input:?}: {reason}")]
    InvalidCid { input: String, reason: String },

    #[error("unknown codec: {0}")]
    UnknownCodec(String),

    #[error("unknown hash algorithm: {0}")]
    UnknownHashAlg(String),
}
