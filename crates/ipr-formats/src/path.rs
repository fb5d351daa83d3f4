//! Path walking inside a single decoded node.
//!
//! Paths are `/`-separated. Empty segments are ignored, so `"a/b"`,
//! `"/a/b"` and `"a//b/"` all name the same value. Map segments are keys;
//! list segments are decimal indices.
//!
//! Walking never crosses a link. When a link (native or legacy) is reached
//! with segments left over, the link is returned together with the rest of
//! the path so the caller can continue in the linked node.

use ipr_types::{as_link, is_link_shaped, Cid, Ipld};

use crate::error::{FormatError, FormatResult};
use crate::format::Resolution;

/// Non-empty segments of `path`.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Resolve `path` inside `node`.
pub fn resolve_in(node: Ipld, path: &str) -> FormatResult<Resolution> {
    let segs: Vec<&str> = segments(path).collect();
    let mut current = node;

    for (i, seg) in segs.iter().enumerate() {
        if is_link_shaped(&current) {
            return Ok(Resolution::new(current, segs[i..].join("/")));
        }
        current = match current {
            Ipld::Map(mut map) => map.remove(*seg).ok_or_else(|| not_found(path, seg))?,
            Ipld::List(mut list) => {
                let index = seg
                    .parse::<usize>()
                    .ok()
                    .filter(|index| *index < list.len())
                    .ok_or_else(|| not_found(path, seg))?;
                list.swap_remove(index)
            }
            _ => return Err(not_found(path, seg)),
        };
    }

    Ok(Resolution::new(current, ""))
}

/// The CID at `path` inside `node`, if the value there is a link.
///
/// Walks by reference, so one decoded node can answer many lookups. A path
/// that is missing or that runs through a link yields `None`.
pub fn link_at(node: &Ipld, path: &str) -> Option<Cid> {
    let mut current = node;
    for seg in segments(path) {
        if is_link_shaped(current) {
            return None;
        }
        current = match current {
            Ipld::Map(map) => map.get(seg)?,
            Ipld::List(list) => list.get(seg.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }
    as_link(current)
}

/// All paths inside `node`, depth first.
///
/// Map entries come out in key order, list entries in index order. Links are
/// leaves: their own path is listed, nothing beneath it.
pub fn paths(node: &Ipld) -> Vec<String> {
    let mut out = Vec::new();
    collect(node, "", &mut out);
    out
}

fn collect(node: &Ipld, prefix: &str, out: &mut Vec<String>) {
    if is_link_shaped(node) {
        return;
    }
    match node {
        Ipld::Map(map) => {
            for (key, child) in map {
                let child_path = join(prefix, key);
                out.push(child_path.clone());
                collect(child, &child_path, out);
            }
        }
        Ipld::List(list) => {
            for (index, child) in list.iter().enumerate() {
                let child_path = join(prefix, &index.to_string());
                out.push(child_path.clone());
                collect(child, &child_path, out);
            }
        }
        _ => {}
    }
}

fn join(prefix: &str, segment: &str) -> String {
    if prefix.is_empty() {
        segment.to_string()
    } else {
        format!("{prefix}/{segment}")
    }
}

fn not_found(path: &str, segment: &str) -> FormatError {
    FormatError::PathNotFound {
        path: path.to_string(),
        segment: segment.to_string(),
    }
}
