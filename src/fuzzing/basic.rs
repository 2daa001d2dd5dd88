use super::*;
use itertools::Itertools;

qc!(routes, _routes);
fn _routes(list: Vec<FibEntry>) -> bool {
    let trie = build(&list);
    let hmap = reference(&list);

    // assert that the iterator of both is the same
    trie.num_routes() == hmap.len()
        && trie
            .routes()
            .map(|e| (e.prefix, e.interface))
            .eq(hmap.into_iter().sorted())
}

qc!(prefix_invariant, _prefix_invariant);
fn _prefix_invariant(list: Vec<FibEntry>) -> bool {
    let trie = build(&list);
    trie.nodes().all(|node| {
        node.prefix.addr() & !node.prefix.mask() == 0
            && node.left.map_or(true, |c| node.prefix.child(false) == Some(c))
            && node.right.map_or(true, |c| node.prefix.child(true) == Some(c))
    })
}

qc!(idempotent_insert, _idempotent_insert);
fn _idempotent_insert(list: Vec<FibEntry>) -> bool {
    let mut trie = build(&list);
    let len = trie.len();
    let routes = trie.num_routes();
    for e in &list {
        trie.insert(e.prefix, e.interface + 100).unwrap();
    }
    trie.len() == len
        && trie.num_routes() == routes
        && reference(&list)
            .iter()
            .all(|(p, i)| trie.get(p) == Some(i + 100))
}

qc!(lookup, _lookup);
fn _lookup((list, addrs): (Vec<FibEntry>, Vec<u32>)) -> bool {
    let trie = build(&list);
    let hmap = reference(&list);
    probes(&list, &addrs)
        .into_iter()
        .all(|a| trie.lookup(a).interface == reference_lookup(&hmap, a))
}

qc!(compressed_lookup, _compressed_lookup);
fn _compressed_lookup((list, addrs): (Vec<FibEntry>, Vec<u32>)) -> bool {
    let trie = build(&list);
    let fib = trie.clone().compress();
    let hmap = reference(&list);
    probes(&list, &addrs).into_iter().all(|a| {
        let want = reference_lookup(&hmap, a);
        let full = trie.lookup(a);
        let compressed = fib.lookup(a);
        full.interface == want
            && compressed.interface == want
            && compressed.accesses <= full.accesses
    })
}

qc!(removed_count, _removed_count);
fn _removed_count(list: Vec<FibEntry>) -> bool {
    let trie = build(&list);
    let before = trie.len();
    let fib = trie.compress();
    fib.len() <= before
        && before - fib.len() == fib.removed()
        && fib.nodes().count() == fib.len()
        && fib.num_routes() == reference(&list).len()
}

qc!(patricia_shape, _patricia_shape);
fn _patricia_shape(list: Vec<FibEntry>) -> bool {
    let fib = build(&list).compress();
    fib.nodes().all(|node| {
        let is_root = node.prefix.is_root();
        let necessary = node.interface.is_some()
            || (node.left.is_some() && node.right.is_some())
            || (node.left.is_none() && node.right.is_none());
        let child_ok = |c: Option<Ipv4Prefix>, right: bool| {
            c.map_or(true, |c| {
                c.len() > node.prefix.len()
                    && node.prefix.contains(&c)
                    && c.is_bit_set(node.prefix.len()) == right
            })
        };
        (is_root || necessary) && child_ok(node.left, false) && child_ok(node.right, true)
    })
}

qc!(no_interface_leaves, _no_interface_leaves);
fn _no_interface_leaves(list: Vec<FibEntry>) -> bool {
    // without allocation failures, every leaf carries a route
    let fib = build(&list).compress();
    fib.nodes().all(|node| {
        node.prefix.is_root()
            || node.interface.is_some()
            || node.left.is_some()
            || node.right.is_some()
    })
}

qc!(accesses_equal_depth, _accesses_equal_depth);
fn _accesses_equal_depth(list: Vec<FibEntry>) -> bool {
    let trie = build(&list);
    let fib = trie.clone().compress();
    leaves_ok(trie.nodes(), |a| trie.lookup(a)) && leaves_ok(fib.nodes(), |a| fib.lookup(a))
}

/// A lookup for the address of a leaf ends at that leaf.
fn leaves_ok(nodes: trie::Nodes<'_>, lookup: impl Fn(u32) -> Lookup) -> bool {
    nodes
        .filter(|n| n.left.is_none() && n.right.is_none())
        .all(|n| lookup(n.prefix.addr()).accesses as usize == n.depth + 1)
}

qc!(exact_get, _exact_get);
fn _exact_get(list: Vec<FibEntry>) -> bool {
    let hmap = reference(&list);
    let fib = build(&list).compress();
    hmap.iter().all(|(p, i)| fib.get(p) == Some(*i))
}
