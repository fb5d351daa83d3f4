//! Path resolution across content-addressed IPLD blocks.
//!
//! [`Resolver`] ties together a [`BlockStore`](ipr_store::BlockStore) and a
//! [`FormatRegistry`]. Given a root CID and a `/`-separated path it loads the
//! root block, asks the block's format to walk as much of the path as the
//! node holds, and follows the link it stops at, until the path is used up.
//!
//! Every operation returns a lazy iterator. Work happens only when the
//! caller pulls the next item, at most one store or codec call is in flight
//! per iterator, and the first error ends the iterator. Dropping an iterator
//! early is the only cancellation there is.
//!
//! ```rust
//! use std::sync::Arc;
//! use ipr_resolver::{PutOptions, Resolver};
//! use ipr_store::InMemoryBlockStore;
//! use ipr_types::{CodecId, Ipld};
//!
//! let resolver = Resolver::with_bundled_formats(Arc::new(InMemoryBlockStore::new()));
//! let cid = resolver
//!     .put([Ipld::String("leaf".into())], CodecId::DAG_CBOR, PutOptions::default())
//!     .next()
//!     .unwrap()
//!     .unwrap();
//! let steps: Vec<_> = resolver.resolve(&cid, "").collect::<Result<_, _>>().unwrap();
//! assert_eq!(steps.len(), 1);
//! assert_eq!(steps[0].value, Ipld::String("leaf".into()));
//! ```

pub mod bulk;
pub mod error;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod resolver;
pub mod tree;

#[cfg(test)]
mod test_support;

pub use bulk::{GetNodes, PutNodes, RemoveBlocks};
pub use error::{ResolverError, ResolverResult};
pub use options::{PutOptions, TreeOptions};
pub use registry::{FormatLoader, FormatRegistry, LoaderError};
pub use resolve::{ResolveStep, ResolveSteps, ResolvedValue};
pub use resolver::Resolver;
pub use tree::TreePaths;
