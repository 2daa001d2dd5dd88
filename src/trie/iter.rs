//! Module that contains the implementation for the iterators

use super::{FibEntry, FibTrie, Interface, NodeRef};
use crate::pool::NodeHandle;
use crate::Ipv4Prefix;

/// An iterator over all routes of a trie in lexicographic order.
#[derive(Clone)]
pub struct Routes<'a> {
    inner: Nodes<'a>,
}

impl<'a> Iterator for Routes<'a> {
    type Item = FibEntry;

    fn next(&mut self) -> Option<FibEntry> {
        self.inner.by_ref().find_map(|info| {
            info.interface
                .map(|interface| FibEntry::new(info.prefix, interface))
        })
    }
}

/// Description of a single node, as yielded by [`Nodes`].
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct NodeInfo {
    /// Prefix covered by the node.
    pub prefix: Ipv4Prefix,
    /// Interface of the node, if it terminates a route.
    pub interface: Option<Interface>,
    /// Prefix of the left child (next bit is 0).
    pub left: Option<Ipv4Prefix>,
    /// Prefix of the right child (next bit is 1).
    pub right: Option<Ipv4Prefix>,
    /// Number of nodes between the root and this node; the root has depth 0.
    pub depth: usize,
}

/// An iterator over all nodes of a trie (including branching nodes without an interface) in
/// pre-order, visiting left children before right ones.
#[derive(Clone)]
pub struct Nodes<'a> {
    trie: &'a FibTrie,
    stack: Vec<(NodeRef, usize)>,
}

impl<'a> Iterator for Nodes<'a> {
    type Item = NodeInfo;

    fn next(&mut self) -> Option<NodeInfo> {
        let trie = self.trie;
        let (cur, depth) = self.stack.pop()?;
        let node = trie.node(cur);
        if let Some(right) = node.right {
            self.stack.push((NodeRef::Pooled(right), depth + 1));
        }
        if let Some(left) = node.left {
            self.stack.push((NodeRef::Pooled(left), depth + 1));
        }
        let child_prefix = |child: Option<NodeHandle>| child.map(|h| trie.nodes[h].prefix);
        Some(NodeInfo {
            prefix: node.prefix,
            interface: node.interface,
            left: child_prefix(node.left),
            right: child_prefix(node.right),
            depth,
        })
    }
}

impl FibTrie {
    /// Iterate over all routes in lexicographic order.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = FibTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?, 2)?;
    /// trie.insert("192.168.0.0/23".parse()?, 1)?;
    /// trie.insert("10.0.0.0/8".parse()?, 3)?;
    /// let routes: Vec<String> = trie.routes().map(|r| r.prefix.to_string()).collect();
    /// assert_eq!(routes, ["10.0.0.0/8", "192.168.0.0/23", "192.168.1.0/24"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn routes(&self) -> Routes<'_> {
        Routes {
            inner: self.nodes(),
        }
    }

    /// Iterate over all nodes in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        Nodes {
            trie: self,
            stack: vec![(NodeRef::Root, 0)],
        }
    }

    /// Call `f` on every node in pre-order. This is the traversal used to export the trie for
    /// debugging.
    pub fn visit<F: FnMut(&NodeInfo)>(&self, mut f: F) {
        self.nodes().for_each(|info| f(&info))
    }
}
