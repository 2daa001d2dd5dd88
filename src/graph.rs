//! Export of the trie structure for debugging.
//!
//! [`write_dot`] renders a trie as a Graphviz digraph, [`write_tree`] as an indented text dump.
//! Both only rely on the node traversal offered by [`FibTrie::visit`] and [`FrozenTrie::visit`].

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;

use crate::{Error, FibTrie, FrozenTrie, NodeInfo};

/// Anything whose nodes can be traversed for export.
pub trait Visit {
    /// Call `f` on every node in pre-order.
    fn visit_nodes(&self, f: &mut dyn FnMut(&NodeInfo));
}

impl Visit for FibTrie {
    fn visit_nodes(&self, f: &mut dyn FnMut(&NodeInfo)) {
        self.visit(f)
    }
}

impl Visit for FrozenTrie {
    fn visit_nodes(&self, f: &mut dyn FnMut(&NodeInfo)) {
        self.visit(f)
    }
}

/// Write the trie as a Graphviz digraph. Nodes carrying an interface are drawn as boxes, edges are
/// labelled with the bit that leads to the child.
///
/// ```
/// # use fib_trie::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut trie = FibTrie::new();
/// trie.insert("128.0.0.0/1".parse()?, 7)?;
/// let mut out = Vec::new();
/// graph::write_dot(&trie, &mut out)?;
/// let dot = String::from_utf8(out)?;
/// assert!(dot.contains("\"128.0.0.0/1\" [label=\"128.0.0.0/1\\niface 7\", shape=box];"));
/// assert!(dot.contains("\"0.0.0.0/0\" -> \"128.0.0.0/1\" [label=\"1\"];"));
/// # Ok(())
/// # }
/// ```
pub fn write_dot<T: Visit + ?Sized, W: Write>(trie: &T, mut w: W) -> Result<(), Error> {
    writeln!(w, "digraph fib {{")?;
    let mut result = Ok(());
    trie.visit_nodes(&mut |node| {
        if result.is_ok() {
            result = write_dot_node(&mut w, node);
        }
    });
    result?;
    writeln!(w, "}}")?;
    Ok(())
}

fn write_dot_node<W: Write>(w: &mut W, node: &NodeInfo) -> std::io::Result<()> {
    match node.interface {
        Some(iface) => writeln!(
            w,
            "    \"{0}\" [label=\"{0}\\niface {1}\", shape=box];",
            node.prefix, iface
        )?,
        None => writeln!(w, "    \"{0}\" [label=\"{0}\", shape=ellipse];", node.prefix)?,
    }
    for (bit, child) in [(0, node.left), (1, node.right)] {
        if let Some(child) = child {
            writeln!(w, "    \"{}\" -> \"{}\" [label=\"{}\"];", node.prefix, child, bit)?;
        }
    }
    Ok(())
}

/// Write one line per node, indented by its depth.
///
/// ```
/// # use fib_trie::*;
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let mut trie = FibTrie::new();
/// trie.insert("128.0.0.0/1".parse()?, 7)?;
/// let mut out = Vec::new();
/// graph::write_tree(&trie, &mut out)?;
/// assert_eq!(
///     String::from_utf8(out)?,
///     "(0) 0.0.0.0/0    iface: -\n(1)   128.0.0.0/1    iface: 7\n"
/// );
/// # Ok(())
/// # }
/// ```
pub fn write_tree<T: Visit + ?Sized, W: Write>(trie: &T, mut w: W) -> Result<(), Error> {
    let mut result = Ok(());
    trie.visit_nodes(&mut |node| {
        if result.is_ok() {
            let iface = node
                .interface
                .map(|i| i.to_string())
                .unwrap_or_else(|| "-".to_string());
            let indent = "  ".repeat(node.depth);
            result = writeln!(
                w,
                "({}) {}{}    iface: {}",
                node.depth, indent, node.prefix, iface
            );
        }
    });
    result?;
    Ok(())
}

/// Create (or truncate) the file at `path` and write the Graphviz rendering of `trie` into it.
pub fn export<T: Visit + ?Sized, P: AsRef<Path>>(trie: &T, path: P) -> Result<(), Error> {
    let path = path.as_ref();
    let mut w = BufWriter::new(File::create(path)?);
    write_dot(trie, &mut w)?;
    w.flush()?;
    debug!("wrote trie graph to {}", path.display());
    Ok(())
}
