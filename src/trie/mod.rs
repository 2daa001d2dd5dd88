//! The binary trie that holds the forwarding information base.
//!
//! A [`FibTrie`] is built by inserting routes one by one. Each node covers exactly one bit
//! position more than its parent, so the trie created by the builder is uncompressed: every
//! prefix on the way to a route exists as a (possibly interface-less) node. Once all routes are
//! inserted, [`FibTrie::compress`] collapses interface-less single-child chains and returns a
//! [`FrozenTrie`], which only offers read-only access.

use log::debug;

use crate::pool::{NodeHandle, Pool, PoolConfig};
use crate::{Error, Ipv4Prefix};

mod compress;
mod insert;
mod iter;
mod lookup;

pub use compress::FrozenTrie;
pub use iter::{NodeInfo, Nodes, Routes};
pub use lookup::Lookup;

/// Identifier of the next-hop interface of a route.
pub type Interface = u32;

/// A single route of the forwarding information base.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FibEntry {
    /// Destination prefix of the route.
    pub prefix: Ipv4Prefix,
    /// Outgoing interface.
    pub interface: Interface,
}

impl FibEntry {
    /// Create a new route.
    pub fn new(prefix: Ipv4Prefix, interface: Interface) -> Self {
        Self { prefix, interface }
    }
}

/// A node of the trie. Every node covers the address range of `prefix`. `interface` is `None` for
/// nodes that only exist as a branching point.
#[derive(Clone, Debug)]
pub(crate) struct Node {
    pub(crate) prefix: Ipv4Prefix,
    pub(crate) interface: Option<Interface>,
    pub(crate) left: Option<NodeHandle>,
    pub(crate) right: Option<NodeHandle>,
}

impl Node {
    pub(crate) fn new(prefix: Ipv4Prefix) -> Self {
        Self {
            prefix,
            interface: None,
            left: None,
            right: None,
        }
    }

    /// Get the child of a node, either to the left or the right
    #[inline(always)]
    pub(crate) fn child(&self, right: bool) -> Option<NodeHandle> {
        if right {
            self.right
        } else {
            self.left
        }
    }

    /// set the child of a node (either to the left or the right), and return the old child.
    #[inline(always)]
    pub(crate) fn set_child(&mut self, child: Option<NodeHandle>, right: bool) -> Option<NodeHandle> {
        if right {
            std::mem::replace(&mut self.right, child)
        } else {
            std::mem::replace(&mut self.left, child)
        }
    }
}

/// Position of a node: the root lives inline in the trie, all other nodes in its pool.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub(crate) enum NodeRef {
    Root,
    Pooled(NodeHandle),
}

/// Binary trie in its build phase. See the [module documentation](self).
///
/// ```
/// # use fib_trie::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut trie = FibTrie::new();
/// trie.insert("10.0.0.0/8".parse()?, 2)?;
/// trie.insert("10.1.0.0/16".parse()?, 3)?;
/// let fib = trie.compress();
/// assert_eq!(fib.lookup(0x0a01_0203).interface, Some(3));
/// assert_eq!(fib.lookup(0x0a02_0000).interface, Some(2));
/// assert_eq!(fib.lookup(0xc0a8_0001).interface, None);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FibTrie {
    pub(crate) root: Node,
    pub(crate) nodes: Pool<Node>,
    routes: usize,
}

impl Default for FibTrie {
    fn default() -> Self {
        Self::with_config(PoolConfig::default())
    }
}

impl FibTrie {
    /// Create a trie that only consists of the interface-less root `0.0.0.0/0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty trie whose nodes are stored in a pool with the given configuration. The
    /// root does not occupy a pool slot, so this never fails.
    pub fn with_config(config: PoolConfig) -> Self {
        Self {
            root: Node::new(Ipv4Prefix::root()),
            nodes: Pool::new(config),
            routes: 0,
        }
    }

    /// Build a trie from a sequence of parsed records. Insertion stops at the end of `records`;
    /// the first record error (or allocation failure) is returned.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let records = vec![
    ///     Ok::<_, Error>(FibEntry::new("0.0.0.0/0".parse()?, 1)),
    ///     Ok(FibEntry::new("10.0.0.0/8".parse()?, 2)),
    /// ];
    /// let trie = FibTrie::build(PoolConfig::default(), records)?;
    /// assert_eq!(trie.num_routes(), 2);
    /// assert_eq!(trie.len(), 9);
    /// # Ok(())
    /// # }
    /// ```
    pub fn build<I, E>(config: PoolConfig, records: I) -> Result<Self, E>
    where
        I: IntoIterator<Item = Result<FibEntry, E>>,
        E: From<Error>,
    {
        let mut trie = Self::with_config(config);
        for record in records {
            let FibEntry { prefix, interface } = record?;
            trie.insert(prefix, interface)?;
        }
        debug!(
            "built trie with {} routes in {} nodes",
            trie.num_routes(),
            trie.len()
        );
        Ok(trie)
    }

    /// Insert all routes of `iter`, stopping at the first allocation failure.
    pub fn try_extend<I>(&mut self, iter: I) -> Result<(), Error>
    where
        I: IntoIterator<Item = FibEntry>,
    {
        for FibEntry { prefix, interface } in iter {
            self.insert(prefix, interface)?;
        }
        Ok(())
    }

    /// The configuration of the node pool.
    pub fn config(&self) -> &PoolConfig {
        self.nodes.config()
    }

    /// Number of nodes in the trie, including the root and all branching nodes.
    pub fn len(&self) -> usize {
        self.nodes.len() + 1
    }

    /// Number of nodes that carry an interface.
    pub fn num_routes(&self) -> usize {
        self.routes
    }

    /// Whether no route was inserted (the root always exists).
    pub fn is_empty(&self) -> bool {
        self.routes == 0
    }

    /// Number of blocks allocated by the node pool.
    pub fn num_blocks(&self) -> usize {
        self.nodes.num_blocks()
    }

    /// Get the interface of a route by matching exactly on the prefix.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = FibTrie::new();
    /// trie.insert("192.168.1.0/24".parse()?, 1)?;
    /// assert_eq!(trie.get(&"192.168.1.0/24".parse()?), Some(1));
    /// assert_eq!(trie.get(&"192.168.0.0/23".parse()?), None);
    /// assert_eq!(trie.get(&"192.168.1.128/25".parse()?), None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn get(&self, prefix: &Ipv4Prefix) -> Option<Interface> {
        let mut node = &self.root;
        loop {
            if node.prefix == *prefix {
                return node.interface;
            }
            let right = prefix.is_bit_set(node.prefix.len());
            let child = &self.nodes[node.child(right)?];
            if !child.prefix.contains(prefix) {
                return None;
            }
            node = child;
        }
    }

    pub(crate) fn node(&self, at: NodeRef) -> &Node {
        match at {
            NodeRef::Root => &self.root,
            NodeRef::Pooled(handle) => &self.nodes[handle],
        }
    }

    pub(crate) fn node_mut(&mut self, at: NodeRef) -> &mut Node {
        match at {
            NodeRef::Root => &mut self.root,
            NodeRef::Pooled(handle) => &mut self.nodes[handle],
        }
    }
}
