use ipr_types::{Cid, CodecId, Ipld};

use crate::error::{FormatError, FormatResult};
use crate::format::{Format, Resolution};

/// Opaque bytes (`raw`, 0x55).
///
/// A raw block has no internal structure: any path resolves to the whole
/// payload, there are no child paths and no links.
#[derive(Clone, Copy, Debug, Default)]
pub struct RawFormat;

impl Format for RawFormat {
    fn codec(&self) -> CodecId {
        CodecId::RAW
    }

    fn serialize(&self, node: &Ipld) -> FormatResult<Vec<u8>> {
        match node {
            Ipld::Bytes(bytes) => Ok(bytes.clone()),
            _ => Err(FormatError::UnsupportedNode {
                codec: CodecId::RAW,
                expected: "bytes",
            }),
        }
    }

    fn deserialize(&self, bytes: &[u8]) -> FormatResult<Ipld> {
        Ok(Ipld::Bytes(bytes.to_vec()))
    }

    fn resolve(&self, bytes: &[u8], _path: &str) -> FormatResult<Resolution> {
        Ok(Resolution::new(Ipld::Bytes(bytes.to_vec()), ""))
    }

    fn tree(&self, _bytes: &[u8]) -> FormatResult<Vec<String>> {
        Ok(Vec::new())
    }

    fn is_link(&self, _bytes: &[u8], _path: &str) -> FormatResult<Option<Cid>> {
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::CidOptions;

    #[test]
    fn roundtrip_bytes() {
        let node = Ipld::Bytes(b"opaque".to_vec());
        let bytes = RawFormat.serialize(&node).unwrap();
        assert_eq!(bytes, b"opaque");
        assert_eq!(RawFormat.deserialize(&bytes).unwrap(), node);
    }

    #[test]
    fn non_bytes_node_is_rejected() {
        let err = RawFormat.serialize(&Ipld::String("text".into())).unwrap_err();
        assert!(matches!(err, FormatError::UnsupportedNode { .. }));
    }

    #[test]
    fn any_path_resolves_to_payload() {
        let res = RawFormat.resolve(b"payload", "a/b/c").unwrap();
        assert_eq!(res.value, Ipld::Bytes(b"payload".to_vec()));
        assert_eq!(res.remainder, "");
    }

    #[test]
    fn no_tree_and_no_links() {
        assert!(RawFormat.tree(b"x").unwrap().is_empty());
        assert!(RawFormat.is_link(b"x", "").unwrap().is_none());
    }

    #[test]
    fn cid_uses_raw_codec() {
        let cid = RawFormat
            .compute_cid(&Ipld::Bytes(vec![1, 2, 3]), &CidOptions::default())
            .unwrap();
        assert_eq!(cid.codec(), CodecId::RAW.code());
    }
}
