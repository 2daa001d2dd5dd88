//! Formatting implementation for the tries

use std::fmt::{Debug, Formatter, Result};

use crate::trie::NodeRef;
use crate::{FibTrie, FrozenTrie};

impl Debug for FibTrie {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTrie(self, NodeRef::Root).fmt(f)
    }
}

impl Debug for FrozenTrie {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        DebugTrie(&self.trie, NodeRef::Root).fmt(f)
    }
}

struct DebugTrie<'a>(&'a FibTrie, NodeRef);

impl Debug for DebugTrie<'_> {
    fn fmt(&self, f: &mut Formatter<'_>) -> Result {
        let trie = self.0;
        let node = trie.node(self.1);
        let child = |h| Self(trie, NodeRef::Pooled(h));
        match (node.interface.as_ref(), node.left, node.right) {
            (None, None, None) => node.prefix.fmt(f),
            (None, None, Some(c)) | (None, Some(c), None) => {
                f.debug_map().entry(&node.prefix, &child(c)).finish()
            }
            (None, Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(child(left), child(right)))
                .finish(),
            (Some(v), None, None) => f.debug_map().entry(&node.prefix, v).finish(),
            (Some(v), None, Some(c)) | (Some(v), Some(c), None) => f
                .debug_map()
                .entry(&node.prefix, &(v, child(c)))
                .finish(),
            (Some(v), Some(left), Some(right)) => f
                .debug_map()
                .entry(&node.prefix, &(v, child(left), child(right)))
                .finish(),
        }
    }
}
