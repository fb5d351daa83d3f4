//! Codec → format registry.
//!
//! Formats are registered explicitly with [`FormatRegistry::add`] or pulled
//! in on first use through an optional [`FormatLoader`]. Each registry is
//! owned by one resolver; there is no process-wide state.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use ipr_formats::Format;
use ipr_types::CodecId;
use tracing::{debug, warn};

use crate::error::{ResolverError, ResolverResult};

/// Error type loaders may return. It is passed to the caller unchanged.
pub type LoaderError = Box<dyn std::error::Error + Send + Sync>;

/// Supplies formats for codecs that are not registered yet.
pub trait FormatLoader: Send + Sync {
    fn load(&self, codec: CodecId) -> Result<Arc<dyn Format>, LoaderError>;
}

impl<F> FormatLoader for F
where
    F: Fn(CodecId) -> Result<Arc<dyn Format>, LoaderError> + Send + Sync,
{
    fn load(&self, codec: CodecId) -> Result<Arc<dyn Format>, LoaderError> {
        self(codec)
    }
}

/// Registered formats keyed by codec, plus the optional loader.
///
/// Lookups take a read lock, so concurrent resolution is safe. Two callers
/// registering the same codec at once is the caller's race to avoid: the
/// loser gets [`ResolverError::DuplicateFormat`].
pub struct FormatRegistry {
    formats: RwLock<HashMap<CodecId, Arc<dyn Format>>>,
    loader: Option<Box<dyn FormatLoader>>,
}

impl FormatRegistry {
    /// Empty registry without a loader.
    pub fn new() -> Self {
        Self {
            formats: RwLock::new(HashMap::new()),
            loader: None,
        }
    }

    /// Empty registry that falls back to `loader` on a miss.
    pub fn with_loader(loader: impl FormatLoader + 'static) -> Self {
        Self {
            formats: RwLock::new(HashMap::new()),
            loader: Some(Box::new(loader)),
        }
    }

    /// Register `format` under its own codec.
    pub fn add(&self, format: Arc<dyn Format>) -> ResolverResult<()> {
        let codec = format.codec();
        let mut formats = self.formats.write().expect("lock poisoned");
        if formats.contains_key(&codec) {
            return Err(ResolverError::DuplicateFormat(codec));
        }
        formats.insert(codec, format);
        debug!(%codec, "registered format");
        Ok(())
    }

    /// Unregister a codec. Unknown codecs are ignored.
    pub fn remove(&self, codec: CodecId) -> Option<Arc<dyn Format>> {
        let removed = self.formats.write().expect("lock poisoned").remove(&codec);
        if removed.is_some() {
            debug!(%codec, "removed format");
        }
        removed
    }

    /// Whether a format is registered (the loader is not consulted).
    pub fn contains(&self, codec: CodecId) -> bool {
        self.formats.read().expect("lock poisoned").contains_key(&codec)
    }

    /// Registered codecs, sorted.
    pub fn codecs(&self) -> Vec<CodecId> {
        let mut codecs: Vec<CodecId> = self
            .formats
            .read()
            .expect("lock poisoned")
            .keys()
            .copied()
            .collect();
        codecs.sort();
        codecs
    }

    /// Format for `codec`, loading and registering it on a miss.
    ///
    /// The loader runs without the registry lock held. If another caller
    /// registered the codec meanwhile, that registration wins and is
    /// returned.
    pub fn resolve(&self, codec: CodecId) -> ResolverResult<Arc<dyn Format>> {
        if let Some(format) = self.formats.read().expect("lock poisoned").get(&codec) {
            return Ok(Arc::clone(format));
        }

        let loader = self.loader.as_ref().ok_or(ResolverError::NoFormat(codec))?;
        let loaded = loader.load(codec).map_err(|source| {
            warn!(%codec, error = %source, "format loader failed");
            ResolverError::Loader { codec, source }
        })?;

        let mut formats = self.formats.write().expect("lock poisoned");
        let format = formats.entry(codec).or_insert(loaded);
        debug!(%codec, "loaded format on demand");
        Ok(Arc::clone(format))
    }
}

impl Default for FormatRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FormatRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormatRegistry")
            .field("codecs", &self.codecs())
            .field("has_loader", &self.loader.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ipr_formats::{DagCborFormat, DagJsonFormat, RawFormat};
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct CountingLoader {
        calls: Arc<AtomicUsize>,
    }

    impl FormatLoader for CountingLoader {
        fn load(&self, codec: CodecId) -> Result<Arc<dyn Format>, LoaderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match codec {
                CodecId::DAG_JSON => Ok(Arc::new(DagJsonFormat)),
                other => Err(format!("no plugin for {other}").into()),
            }
        }
    }

    // -----------------------------------------------------------------------
    // Registration
    // -----------------------------------------------------------------------

    #[test]
    fn add_then_resolve() {
        let registry = FormatRegistry::new();
        registry.add(Arc::new(RawFormat)).unwrap();
        let format = registry.resolve(CodecId::RAW).unwrap();
        assert_eq!(format.codec(), CodecId::RAW);
    }

    #[test]
    fn duplicate_add_fails_and_keeps_first() {
        let registry = FormatRegistry::new();
        let first: Arc<dyn Format> = Arc::new(DagCborFormat);
        registry.add(Arc::clone(&first)).unwrap();

        let err = registry.add(Arc::new(DagCborFormat)).unwrap_err();
        assert!(matches!(err, ResolverError::DuplicateFormat(CodecId::DAG_CBOR)));
        assert!(Arc::ptr_eq(&registry.resolve(CodecId::DAG_CBOR).unwrap(), &first));
    }

    #[test]
    fn remove_is_noop_when_absent() {
        let registry = FormatRegistry::new();
        assert!(registry.remove(CodecId::RAW).is_none());
        registry.add(Arc::new(RawFormat)).unwrap();
        assert!(registry.remove(CodecId::RAW).is_some());
        assert!(!registry.contains(CodecId::RAW));
    }

    #[test]
    fn codecs_are_sorted() {
        let registry = FormatRegistry::new();
        registry.add(Arc::new(DagJsonFormat)).unwrap();
        registry.add(Arc::new(RawFormat)).unwrap();
        registry.add(Arc::new(DagCborFormat)).unwrap();
        assert_eq!(
            registry.codecs(),
            vec![CodecId::RAW, CodecId::DAG_CBOR, CodecId::DAG_JSON]
        );
    }

    // -----------------------------------------------------------------------
    // Lookup / loader
    // -----------------------------------------------------------------------

    #[test]
    fn miss_without_loader_is_no_format() {
        let registry = FormatRegistry::new();
        let err = registry.resolve(CodecId::DAG_PB).err().expect("expected an error");
        assert_eq!(err.to_string(), "no resolver found for codec dag-pb");
    }

    #[test]
    fn loader_is_called_once_per_codec() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = FormatRegistry::with_loader(CountingLoader {
            calls: Arc::clone(&calls),
        });

        let first = registry.resolve(CodecId::DAG_JSON).unwrap();
        let second = registry.resolve(CodecId::DAG_JSON).unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(registry.contains(CodecId::DAG_JSON));
    }

    #[test]
    fn loader_failure_propagates() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = FormatRegistry::with_loader(CountingLoader {
            calls: Arc::clone(&calls),
        });

        let err = registry.resolve(CodecId::DAG_PB).err().expect("expected an error");
        match err {
            ResolverError::Loader { codec, source } => {
                assert_eq!(codec, CodecId::DAG_PB);
                assert_eq!(source.to_string(), "no plugin for dag-pb");
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(!registry.contains(CodecId::DAG_PB));
    }

    #[test]
    fn closure_loader() {
        let registry = FormatRegistry::with_loader(
            |_codec: CodecId| -> Result<Arc<dyn Format>, LoaderError> { Ok(Arc::new(RawFormat)) },
        );
        assert_eq!(registry.resolve(CodecId::RAW).unwrap().codec(), CodecId::RAW);
    }

    #[test]
    fn registered_format_shadows_loader() {
        let calls = Arc::new(AtomicUsize::new(0));
        let registry = FormatRegistry::with_loader(CountingLoader {
            calls: Arc::clone(&calls),
        });
        registry.add(Arc::new(DagJsonFormat)).unwrap();
        registry.resolve(CodecId::DAG_JSON).unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }
}
