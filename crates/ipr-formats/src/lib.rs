//! Format capability contract and bundled formats.
//!
//! A [`Format`] is the per-codec plug-in the resolver dispatches to. It knows
//! how to turn a block's bytes into an [`Ipld`](ipr_types::Ipld) node and
//! back, how to walk a path inside one node, which paths a node contains,
//! and how to compute a node's CID.
//!
//! # Bundled Formats
//!
//! - [`RawFormat`] -- opaque bytes (`raw`, 0x55)
//! - [`DagCborFormat`] -- DAG-CBOR (`dag-cbor`, 0x71)
//! - [`DagJsonFormat`] -- DAG-JSON (`dag-json`, 0x0129)

use std::sync::Arc;

pub mod dag_cbor;
pub mod dag_json;
pub mod error;
pub mod format;
pub mod path;
pub mod raw;

pub use dag_cbor::DagCborFormat;
pub use dag_json::DagJsonFormat;
pub use error::{FormatError, FormatResult};
pub use format::{CidOptions, Format, Resolution};
pub use raw::RawFormat;

/// One instance of every bundled format.
pub fn bundled_formats() -> Vec<Arc<dyn Format>> {
    vec![
        Arc::new(RawFormat),
        Arc::new(DagCborFormat),
        Arc::new(DagJsonFormat),
    ]
}
