//! Lazy enumeration of the paths beneath a root CID.
//!
//! Nodes are expanded one at a time. In recursive mode, every path that is a
//! link in the node it came from queues the linked node for expansion, so
//! links are crossed breadth first while paths within one node keep the
//! format's own order. Each expanded node is decoded once; link checks for
//! all of its paths run against that decoded value.

use std::collections::VecDeque;

use ipr_formats::path::link_at;
use ipr_types::{Cid, Ipld};
use tracing::debug;

use crate::error::ResolverResult;
use crate::options::TreeOptions;
use crate::resolver::Resolver;

/// The node whose paths are currently being emitted.
struct Expansion {
    /// Decoded node, kept only when links are followed.
    node: Option<Ipld>,
    base: String,
}

/// Lazy sequence of paths under a root CID, relative to an offset path.
///
/// Only paths strictly beneath the offset are emitted, matched segment by
/// segment: offset `a` covers `a/x` but not `a` itself or its sibling `ab`.
/// The offset and the `/` after it are stripped from emitted paths.
pub struct TreePaths<'a> {
    resolver: &'a Resolver,
    offset: String,
    recursive: bool,
    pending: VecDeque<String>,
    queue: VecDeque<(Cid, String)>,
    current: Option<Expansion>,
    done: bool,
}

impl<'a> TreePaths<'a> {
    pub(crate) fn new(resolver: &'a Resolver, root: Cid, offset: &str, options: TreeOptions) -> Self {
        let mut queue = VecDeque::new();
        queue.push_back((root, String::new()));
        Self {
            resolver,
            offset: offset.trim_matches('/').to_string(),
            recursive: options.recursive,
            pending: VecDeque::new(),
            queue,
            current: None,
            done: false,
        }
    }

    /// Load the next queued node and buffer its paths.
    fn expand(&mut self, cid: Cid, base: String) -> ResolverResult<()> {
        let block = self.resolver.store().get(&cid)?;
        let format = self.resolver.format(block.codec())?;
        let paths = format.tree(block.data())?;
        let node = if self.recursive && !paths.is_empty() {
            Some(format.deserialize(block.data())?)
        } else {
            None
        };
        debug!(%cid, base = %base, paths = paths.len(), "expanded node");

        self.pending.extend(paths);
        self.current = Some(Expansion { node, base });
        Ok(())
    }

    /// Handle one buffered segment; `Some` if it should be emitted.
    fn visit(&mut self, segment: String) -> Option<String> {
        let current = self.current.as_ref()?;
        let full = format!("{}{}", current.base, segment);

        // Checked against the node that produced the segment.
        if let Some(link) = current.node.as_ref().and_then(|node| link_at(node, &segment)) {
            self.queue.push_back((link, format!("{full}/")));
        }

        relative_to(&full, &self.offset).map(str::to_string)
    }
}

/// `full` with `offset/` removed, if `full` lies strictly beneath `offset`.
fn relative_to<'p>(full: &'p str, offset: &str) -> Option<&'p str> {
    let rest = if offset.is_empty() {
        full
    } else {
        full.strip_prefix(offset)?.strip_prefix('/')?
    };
    (!rest.is_empty()).then_some(rest)
}

impl Iterator for TreePaths<'_> {
    type Item = ResolverResult<String>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.done {
                return None;
            }

            let Some(segment) = self.pending.pop_front() else {
                let (cid, base) = self.queue.pop_front()?;
                if let Err(e) = self.expand(cid, base) {
                    self.done = true;
                    return Some(Err(e));
                }
                continue;
            };

            if let Some(path) = self.visit(segment) {
                return Some(Ok(path));
            }
        }
    }
}

impl std::iter::FusedIterator for TreePaths<'_> {}
