use ipr_crypto::HasherError;
use ipr_types::CodecId;

/// Errors raised by format implementations.
///
/// The resolver propagates these verbatim.
#[derive(Debug, thiserror::Error)]
pub enum FormatError {
    /// The bytes are not a valid encoding for this codec.
    #[error("{codec} decode error: {reason}")]
    Decode { codec: CodecId, reason: String },

    /// The node cannot be encoded by this codec.
    #[error("{codec} encode error: {reason}")]
    Encode { codec: CodecId, reason: String },

    /// A path segment does not exist inside the node.
    #[error("path {path:?} not found: no segment {segment:?}")]
    PathNotFound { path: String, segment: String },

    /// The node has the wrong shape for this codec.
    #[error("{codec} cannot represent node: expected {expected}")]
    UnsupportedNode {
        codec: CodecId,
        expected: &'static str,
    },

    /// CID construction failed (bad version/codec/hash combination).
    #[error(transparent)]
    Hash(#[from] HasherError),
}

impl FormatError {
    pub fn decode(codec: CodecId, reason: impl ToString) -> Self {
        Self::Decode {
            codec,
            reason: reason.to_string(),
        }
    }

    pub fn encode(codec: CodecId, reason: impl ToString) -> Self {
        Self::Encode {
            codec,
            reason: reason.to_string(),
        }
    }
}

/// Result alias for format operations.
pub type FormatResult<T> = Result<T, FormatError>;
