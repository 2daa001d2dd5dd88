//! Module for testing using fuzzing (quickcheck)

use std::collections::HashMap;
use std::fmt::Debug;

use crate::*;
use quickcheck::Arbitrary;

mod basic;
mod pool;

#[cfg(miri)]
const DEFAULT_NUM_TESTS: usize = 10;
#[cfg(not(miri))]
const DEFAULT_NUM_TESTS: usize = 2000;
const DEFAULT_GEN_SIZE: usize = 100;

fn proptest_runner<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F) {
    let num_tests: usize = std::env::var("QUICKCHECK_TESTS")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_NUM_TESTS);

    let gen_size: usize = std::env::var("QUICKCHECK_GENERATOR_SIZE")
        .ok()
        .and_then(|x| x.parse::<usize>().ok())
        .unwrap_or(DEFAULT_GEN_SIZE);

    let mut gen = quickcheck::Gen::new(gen_size);

    // sample all inputs
    for _ in 0..num_tests {
        let input = A::arbitrary(&mut gen);
        let input_c = input.clone();
        let success = f(input_c);
        if !success {
            shrink_failure(f, input)
        }
    }
}

fn shrink_failure<A: Arbitrary + Debug + PartialEq, F: Fn(A) -> bool>(f: F, input: A) -> ! {
    for i in input.shrink() {
        let i_c = i.clone();
        let success = f(i_c);
        if !success {
            shrink_failure(f, i)
        }
    }
    // if we reach this point, then all shrunken inputs work. Therefore, `inputs` is the minimal
    // input
    panic!(
        "[QUICKCHECK] Test case failed!\n  Minimal input:\n    {:?}",
        input
    );
}

#[allow(missing_docs)]
#[macro_export]
macro_rules! qc {
    ($name:ident, $f:ident) => {
        #[test]
        fn $name() {
            proptest_runner($f)
        }
    };
}

impl Arbitrary for Ipv4Prefix {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        // mostly short prefixes, such that random routes overlap
        #[rustfmt::skip]
        let len: u8 = *g
            .choose(&[
                0,
                1, 1,
                2, 2, 2,
                3, 3, 3, 3,
                4, 4, 4, 4, 4,
                5, 5, 5, 5, 5, 5,
                6, 6, 6, 6, 6, 6, 6,
                7, 7, 7, 7, 7, 7, 7, 7,
                8, 8, 8, 8, 8, 8, 8, 8, 8,
                9, 9, 9, 9, 9, 9, 9, 9, 9, 9,
                12, 16, 20, 24, 28, 31, 32,
            ])
            .unwrap();
        let x = u32::arbitrary(g);
        Self::new(x, len).unwrap()
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        if self.len() == 0 {
            quickcheck::empty_shrinker()
        } else {
            let x = Self::new(self.addr(), self.len() - 1).unwrap();
            quickcheck::single_shrinker(x)
        }
    }
}

impl Arbitrary for FibEntry {
    fn arbitrary(g: &mut quickcheck::Gen) -> Self {
        let prefix = Ipv4Prefix::arbitrary(g);
        let interface = u32::arbitrary(g) % 16;
        Self::new(prefix, interface)
    }

    fn shrink(&self) -> Box<dyn Iterator<Item = Self>> {
        let interface = self.interface;
        Box::new(
            self.prefix
                .shrink()
                .map(move |prefix| FibEntry::new(prefix, interface)),
        )
    }
}

fn build(list: &[FibEntry]) -> FibTrie {
    let mut trie = FibTrie::new();
    trie.try_extend(list.iter().copied()).unwrap();
    trie
}

/// Routes with last-write-wins semantics, as a plain map.
fn reference(list: &[FibEntry]) -> HashMap<Ipv4Prefix, Interface> {
    list.iter().map(|e| (e.prefix, e.interface)).collect()
}

/// Longest prefix match by scanning all routes.
fn reference_lookup(routes: &HashMap<Ipv4Prefix, Interface>, addr: u32) -> Option<Interface> {
    routes
        .iter()
        .filter(|(p, _)| p.matches(addr))
        .max_by_key(|(p, _)| p.len())
        .map(|(_, i)| *i)
}

/// Addresses to probe: the given ones, plus the first and last address of every route.
fn probes(list: &[FibEntry], addrs: &[u32]) -> Vec<u32> {
    let mut probes = addrs.to_vec();
    for e in list {
        probes.push(e.prefix.addr());
        probes.push(e.prefix.addr() | !e.prefix.mask());
    }
    probes
}
