//! Longest-prefix-match lookup.

use super::{FibTrie, Interface};
use crate::prefix::is_addr_bit_set;

/// Result of a single lookup.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct Lookup {
    /// Interface of the longest matching prefix, or `None` if no route covers the address.
    pub interface: Option<Interface>,
    /// Number of trie nodes accessed, including the root.
    pub accesses: u32,
}

impl Lookup {
    /// Whether no route covers the address.
    pub fn is_miss(&self) -> bool {
        self.interface.is_none()
    }
}

impl FibTrie {
    /// Find the interface of the longest prefix that contains `addr`.
    ///
    /// The walk starts at the root and follows the bit of `addr` right below the prefix length of
    /// the current node. It ends as soon as a node's prefix no longer matches `addr`, or the
    /// next child is missing. Every node on the way counts as one access, so a lookup that ends at
    /// depth `d` reports `d + 1` accesses. This works both on the uncompressed trie and on the
    /// compressed one, where a child may skip several bits.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = FibTrie::new();
    /// trie.insert("0.0.0.0/0".parse()?, 1)?;
    /// trie.insert("128.0.0.0/1".parse()?, 2)?;
    /// assert_eq!(trie.lookup(0x8000_0001), Lookup { interface: Some(2), accesses: 2 });
    /// assert_eq!(trie.lookup(0x0000_0001), Lookup { interface: Some(1), accesses: 1 });
    /// # Ok(())
    /// # }
    /// ```
    pub fn lookup(&self, addr: u32) -> Lookup {
        let mut best = None;
        let mut accesses = 0;
        let mut node = &self.root;
        loop {
            accesses += 1;
            if !node.prefix.matches(addr) {
                break;
            }
            if node.interface.is_some() {
                best = node.interface;
            }
            let right = is_addr_bit_set(addr, node.prefix.len());
            match node.child(right) {
                Some(child) => node = &self.nodes[child],
                None => break,
            }
        }
        Lookup {
            interface: best,
            accesses,
        }
    }
}
