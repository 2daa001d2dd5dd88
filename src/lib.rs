//! This crate performs IPv4 longest-prefix-match (LPM) lookups against a forwarding information
//! base (FIB), the core operation of the data plane of an IP router. For every destination
//! address, it reports the interface of the most specific matching prefix and the number of trie
//! nodes that were accessed to find it.
//!
//! # Description of the Tree
//!
//! The FIB is stored in a binary trie. Each node consists of a prefix, an optional interface, and
//! two optional children. Adding a new child, or traversing into the tree is done as follows: we
//! look at the most significant bit that is **not** part of the prefix itself. If it is not set,
//! then we take the left branch, and otherwise, we take the right one.
//!
//! The trie goes through three phases:
//!
//! 1. **Build**: [`FibTrie::insert`] adds one route at a time. Every missing node between the root
//!    and the new prefix is created, so each child is exactly one bit longer than its parent.
//! 2. **Compress**: [`FibTrie::compress`] runs once and splices out every node that has no
//!    interface and a single child. The result is a Patricia trie, in which every node (except
//!    the root) either carries a route or has two children.
//! 3. **Lookup**: the compressed [`FrozenTrie`] can no longer be modified. [`FrozenTrie::lookup`]
//!    only takes `&self`, so lookups may run concurrently from multiple threads.
//!
//! ```
//! # use fib_trie::*;
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let mut trie = FibTrie::new();
//! trie.insert("0.0.0.0/0".parse()?, 1)?;
//! trie.insert("10.0.0.0/8".parse()?, 2)?;
//! trie.insert("10.1.0.0/16".parse()?, 3)?;
//! let fib = trie.compress();
//!
//! assert_eq!(fib.lookup(u32::from_be_bytes([10, 1, 2, 3])).interface, Some(3));
//! assert_eq!(fib.lookup(u32::from_be_bytes([10, 2, 0, 0])).interface, Some(2));
//! assert_eq!(fib.lookup(u32::from_be_bytes([192, 168, 0, 1])).interface, Some(1));
//! # Ok(())
//! # }
//! ```
//!
//! # Memory management
//!
//! All nodes except the root live in a [`Pool`], a sequence of fixed-capacity blocks. Nodes are
//! referred to by a [`NodeHandle`] (block index, slot index and generation) instead of a pointer.
//! Growing the pool appends a block and never moves a node, and a handle to a released node never
//! resolves again. The maximum number of blocks is configurable through [`PoolConfig`]; once it
//! is reached, insertion fails with [`Error::OutOfMemory`].
//!
//! The following are the computational complexities of the functions, where `w = 32` is the
//! address width.
//!
//! | Operation                   | Complexity    |
//! |-----------------------------|---------------|
//! | `insert`                    | `O(w)`        |
//! | `compress`                  | `O(n)`        |
//! | `lookup`, `get`             | `O(w)`        |
//! | `Pool::allocate`, `release` | `O(1)`        |
//! | `len`, `num_routes`         | `O(1)`        |
//!
//! # Inputs and outputs
//!
//! The [`io`] module reads FIB and packet files and writes the per-lookup report, [`graph`]
//! exports the trie as a Graphviz digraph. Neither is used by the trie itself.

#![deny(missing_docs)]

mod error;
mod fmt;
mod prefix;
#[cfg(feature = "serde")]
mod serde;
#[cfg(test)]
mod fuzzing;

pub mod graph;
pub mod io;
pub mod pool;
pub mod trie;

pub use error::Error;
pub use pool::{Growth, NodeHandle, Pool, PoolConfig};
pub use prefix::{Ipv4Prefix, MAX_PREFIX_LEN};
pub use trie::{FibEntry, FibTrie, FrozenTrie, Interface, Lookup, NodeInfo};
