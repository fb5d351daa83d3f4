use ipr_formats::FormatError;
use ipr_store::StoreError;
use ipr_types::CodecId;

/// Errors surfaced by resolver operations.
///
/// Format and store errors are wrapped without modification so callers can
/// match on the original cause.
#[derive(Debug, thiserror::Error)]
pub enum ResolverError {
    /// Invalid input at a public entry point, raised before any I/O.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A format is already registered for this codec.
    #[error("duplicate resolver for codec {0}")]
    DuplicateFormat(CodecId),

    /// No format is registered and no loader was configured.
    #[error("no resolver found for codec {0}")]
    NoFormat(CodecId),

    /// The format loader failed.
    #[error("loading format for codec {codec} failed: {source}")]
    Loader {
        codec: CodecId,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error(transparent)]
    Format(#[from] FormatError),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl ResolverError {
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument(message.into())
    }
}

/// Result alias for resolver operations.
pub type ResolverResult<T> = Result<T, ResolverError>;
