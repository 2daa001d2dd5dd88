//! Path compression of the built trie, and the frozen trie it produces.

use log::debug;

use super::{FibTrie, Interface, Lookup, NodeInfo, Nodes, Routes};
use crate::pool::NodeHandle;
use crate::{Ipv4Prefix, PoolConfig};

impl FibTrie {
    /// Collapse all nodes that have no interface and exactly one child, turning the trie into a
    /// Patricia trie: afterwards, every node except the root either carries an interface or has
    /// two children. Removed nodes are released to the pool.
    ///
    /// Compression consumes the trie, so no route can be inserted afterwards. The returned
    /// [`FrozenTrie`] only offers shared access and can be used for lookups from multiple threads.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = FibTrie::new();
    /// trie.insert("10.0.0.0/8".parse()?, 1)?;
    /// assert_eq!(trie.len(), 9);
    /// let fib = trie.compress();
    /// assert_eq!(fib.len(), 2);
    /// assert_eq!(fib.removed(), 7);
    /// # Ok(())
    /// # }
    /// ```
    pub fn compress(mut self) -> FrozenTrie {
        let before = self.len();
        let mut removed = 0;
        for right in [false, true] {
            if let Some(child) = self.root.child(right) {
                let child = self.compress_subtree(child, &mut removed);
                self.root.set_child(child, right);
            }
        }
        debug_assert_eq!(before - removed, self.len());
        debug!(
            "compressed trie from {} to {} nodes ({} removed)",
            before,
            self.len(),
            removed
        );
        FrozenTrie {
            trie: self,
            removed,
        }
    }

    /// Compress the subtree rooted at `idx` (post-order) and return the node that should take its
    /// place at the parent.
    fn compress_subtree(&mut self, idx: NodeHandle, removed: &mut usize) -> Option<NodeHandle> {
        for right in [false, true] {
            if let Some(child) = self.nodes[idx].child(right) {
                let child = self.compress_subtree(child, removed);
                self.nodes[idx].set_child(child, right);
            }
        }
        let node = &self.nodes[idx];
        match (node.interface, node.left, node.right) {
            (None, Some(child), None) | (None, None, Some(child)) => {
                self.nodes.release(idx);
                *removed += 1;
                Some(child)
            }
            _ => Some(idx),
        }
    }
}

/// A compressed trie that can no longer be modified, created by [`FibTrie::compress`].
#[derive(Clone)]
pub struct FrozenTrie {
    pub(crate) trie: FibTrie,
    removed: usize,
}

impl FrozenTrie {
    /// Find the interface of the longest prefix that contains `addr`, together with the number of
    /// nodes accessed. See [`FibTrie::lookup`].
    #[inline]
    pub fn lookup(&self, addr: u32) -> Lookup {
        self.trie.lookup(addr)
    }

    /// Get the interface of a route by matching exactly on the prefix.
    pub fn get(&self, prefix: &Ipv4Prefix) -> Option<Interface> {
        self.trie.get(prefix)
    }

    /// Number of nodes left after compression, including the root.
    pub fn len(&self) -> usize {
        self.trie.len()
    }

    /// Whether the trie holds no route at all.
    pub fn is_empty(&self) -> bool {
        self.trie.is_empty()
    }

    /// Number of routes in the trie.
    pub fn num_routes(&self) -> usize {
        self.trie.num_routes()
    }

    /// Number of nodes removed by compression.
    pub fn removed(&self) -> usize {
        self.removed
    }

    /// The configuration of the node pool.
    pub fn config(&self) -> &PoolConfig {
        self.trie.config()
    }

    /// Iterate over all routes in lexicographic order.
    pub fn routes(&self) -> Routes<'_> {
        self.trie.routes()
    }

    /// Iterate over all nodes in pre-order.
    pub fn nodes(&self) -> Nodes<'_> {
        self.trie.nodes()
    }

    /// Call `f` on every node in pre-order.
    pub fn visit<F: FnMut(&NodeInfo)>(&self, f: F) {
        self.trie.visit(f)
    }
}
