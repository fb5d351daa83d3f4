//! Link detection and legacy link normalization.
//!
//! A link is either a native [`Ipld::Link`] or the legacy single-key map
//! `{"/": "<cid string>"}`. The legacy rule is global: any map whose only key
//! is `/` is link-shaped, whatever the producer meant by it.
//!
//! Normalization never fails. A link-shaped map whose value does not parse as
//! a CID is passed through unchanged.

use cid::Cid;
use ipld_core::ipld::Ipld;

/// Key of the legacy link form.
pub const LINK_KEY: &str = "/";

/// `true` for native links and for any single-key map keyed by `/`.
pub fn is_link_shaped(value: &Ipld) -> bool {
    match value {
        Ipld::Link(_) => true,
        Ipld::Map(map) => map.len() == 1 && map.contains_key(LINK_KEY),
        _ => false,
    }
}

/// The CID a value links to, if any.
pub fn as_link(value: &Ipld) -> Option<Cid> {
    match value {
        Ipld::Link(cid) => Some(*cid),
        Ipld::Map(map) if map.len() == 1 => match map.get(LINK_KEY) {
            Some(Ipld::String(s)) => s.parse::<Cid>().ok(),
            Some(Ipld::Link(cid)) => Some(*cid),
            _ => None,
        },
        _ => None,
    }
}

/// Replace a legacy link with a native [`Ipld::Link`]; anything else is
/// returned as is.
pub fn normalize_link(value: Ipld) -> Ipld {
    match as_link(&value) {
        Some(cid) => Ipld::Link(cid),
        None => value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cid::multihash::Multihash;
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn sample_cid() -> Cid {
        let mh = Multihash::<64>::wrap(0x12, &[1u8; 32]).unwrap();
        Cid::new_v1(0x71, mh)
    }

    fn single(key: &str, value: Ipld) -> Ipld {
        let mut map = BTreeMap::new();
        map.insert(key.to_string(), value);
        Ipld::Map(map)
    }

    #[test]
    fn native_link_is_link() {
        let cid = sample_cid();
        assert!(is_link_shaped(&Ipld::Link(cid)));
        assert_eq!(as_link(&Ipld::Link(cid)), Some(cid));
    }

    #[test]
    fn legacy_link_normalizes_to_cid() {
        let cid = sample_cid();
        let legacy = single("/", Ipld::String(cid.to_string()));
        assert!(is_link_shaped(&legacy));
        assert_eq!(normalize_link(legacy), Ipld::Link(cid));
    }

    #[test]
    fn legacy_link_with_bad_cid_passes_through() {
        let legacy = single("/", Ipld::String("definitely not a cid".into()));
        assert!(is_link_shaped(&legacy));
        assert_eq!(normalize_link(legacy.clone()), legacy);
    }

    #[test]
    fn two_key_map_is_data() {
        let mut map = BTreeMap::new();
        map.insert("/".to_string(), Ipld::String(sample_cid().to_string()));
        map.insert("other".to_string(), Ipld::Null);
        let value = Ipld::Map(map);
        assert!(!is_link_shaped(&value));
        assert_eq!(normalize_link(value.clone()), value);
    }

    #[test]
    fn scalars_pass_through() {
        assert_eq!(normalize_link(Ipld::Integer(3)), Ipld::Integer(3));
        assert!(as_link(&Ipld::String(sample_cid().to_string())).is_none());
    }

    proptest! {
        #[test]
        fn normalization_never_panics(s in ".*") {
            let value = single("/", Ipld::String(s));
            let _ = normalize_link(value);
        }
    }
}
