use ipr_types::{CodecId, Ipld};

use crate::error::{FormatError, FormatResult};
use crate::format::Format;

/// DAG-CBOR (`dag-cbor`, 0x71).
///
/// Encoding is delegated to `serde_ipld_dagcbor`, which emits links as CBOR
/// tag 42 and sorts map keys canonically. Path operations use the trait
/// defaults.
#[derive(Clone, Copy, Debug, Default)]
pub struct DagCborFormat;

impl Format for DagCborFormat {
    fn codec(&self) -> CodecId {
        CodecId::DAG_CBOR
    }

    fn serialize(&self, node: &Ipld) -> FormatResult<Vec<u8>> {
        serde_ipld_dagcbor::to_vec(node).map_err(|e| FormatError::encode(CodecId::DAG_CBOR, e))
    }

    fn deserialize(&self, bytes: &[u8]) -> FormatResult<Ipld> {
        serde_ipld_dagcbor::from_slice(bytes)
            .map_err(|e| FormatError::decode(CodecId::DAG_CBOR, e))
    }
}
