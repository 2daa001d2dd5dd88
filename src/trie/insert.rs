//! Insertion of routes into the uncompressed trie.

use log::trace;

use super::{FibTrie, Interface, Node, NodeRef};
use crate::{Error, Ipv4Prefix};

impl FibTrie {
    /// Insert a route. If the prefix already exists (either as a route or as a branching node),
    /// its interface is overwritten and the previous one is returned. Otherwise, all missing nodes
    /// on the way from the root to the prefix are created, one bit at a time.
    ///
    /// On [`Error::OutOfMemory`], the nodes created before the failure remain in the trie without
    /// an interface. They do not change the result of any lookup.
    ///
    /// ```
    /// # use fib_trie::*;
    /// # fn main() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut trie = FibTrie::new();
    /// assert_eq!(trie.insert("192.168.0.0/23".parse()?, 1)?, None);
    /// assert_eq!(trie.insert("192.168.1.0/24".parse()?, 2)?, None);
    /// assert_eq!(trie.insert("192.168.1.0/24".parse()?, 3)?, Some(2));
    /// // the /23 was created as a branching node of the /24 before.
    /// assert_eq!(trie.insert("192.168.0.0/22".parse()?, 4)?, None);
    /// # Ok(())
    /// # }
    /// ```
    pub fn insert(
        &mut self,
        prefix: Ipv4Prefix,
        interface: Interface,
    ) -> Result<Option<Interface>, Error> {
        let mut cur = NodeRef::Root;
        loop {
            let node = self.node_mut(cur);
            if node.prefix == prefix {
                let old = node.interface.replace(interface);
                if old.is_none() {
                    self.routes += 1;
                }
                return Ok(old);
            }
            let right = prefix.is_bit_set(node.prefix.len());
            cur = match node.child(right) {
                Some(child) => NodeRef::Pooled(child),
                None => {
                    let Some(child_prefix) = node.prefix.child(right) else {
                        unreachable!("{} is longer than the inserted {}", node.prefix, prefix)
                    };
                    let child = self.nodes.allocate(Node::new(child_prefix))?;
                    trace!("created node {child_prefix}");
                    self.node_mut(cur).set_child(Some(child), right);
                    NodeRef::Pooled(child)
                }
            };
        }
    }

    /// Insert a route given as raw network address and prefix length. The length is validated
    /// before any bit of the trie is touched.
    ///
    /// ```
    /// # use fib_trie::*;
    /// let mut trie = FibTrie::new();
    /// assert!(trie.insert_raw(0x0a00_0000, 8, 1).is_ok());
    /// assert!(matches!(
    ///     trie.insert_raw(0x0a00_0000, 33, 1),
    ///     Err(Error::InvalidPrefixLength(33))
    /// ));
    /// ```
    pub fn insert_raw(
        &mut self,
        addr: u32,
        len: u8,
        interface: Interface,
    ) -> Result<Option<Interface>, Error> {
        self.insert(Ipv4Prefix::new(addr, len)?, interface)
    }
}
