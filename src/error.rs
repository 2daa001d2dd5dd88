//! Errors returned while building the trie and while reading its inputs.

use thiserror::Error;

/// Possible errors of this crate. A lookup never fails: an address without any covering route
/// yields `None`, which is not an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The node pool cannot hand out another slot, either because the configured maximum number
    /// of blocks is reached or because the next block could not be reserved. The operation in
    /// progress was aborted, the trie stays usable.
    #[error("out of memory: node pool exhausted after {blocks} blocks")]
    OutOfMemory {
        /// Number of blocks allocated when the request failed.
        blocks: usize,
    },
    /// A prefix length outside of `0..=32`.
    #[error("invalid prefix length {0}, must be within 0..=32")]
    InvalidPrefixLength(u8),
    /// A string that cannot be parsed as `a.b.c.d/len`.
    #[error("invalid prefix `{input}`: {reason}")]
    InvalidPrefix {
        /// The offending input.
        input: String,
        /// What is wrong with it.
        reason: String,
    },
    /// A line of the FIB that cannot be parsed.
    #[error("malformed FIB record at line {line}: {reason}")]
    MalformedRecord {
        /// Line number, starting at 1.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// A line of the packet file that cannot be parsed.
    #[error("malformed address at line {line}: {reason}")]
    MalformedAddress {
        /// Line number, starting at 1.
        line: usize,
        /// What is wrong with it.
        reason: String,
    },
    /// Reading an input or writing an output failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}
