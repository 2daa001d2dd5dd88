//! Block pool that stores the nodes of the trie.
//!
//! The pool consists of an ordered sequence of blocks, each one an array of equally sized slots.
//! Blocks are never reallocated once created: the pool grows by appending a new block, so a slot
//! never moves and a [`NodeHandle`] (block and slot index) stays valid across growth. Released
//! slots are threaded into a free list and handed out again before any new slot is carved.
//!
//! Every slot carries a generation that is bumped when the slot is released. A handle remembers
//! the generation it was created with, so a handle to a released node never resolves again, even
//! if the slot was reused in the meantime.

use std::ops::{Index, IndexMut};

use log::debug;

use crate::Error;

/// Opaque, relocation-safe reference to a slot of a [`Pool`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct NodeHandle {
    block: u32,
    slot: u32,
    generation: u32,
}

impl NodeHandle {
    /// Index of the block that holds the slot.
    pub fn block(&self) -> u32 {
        self.block
    }

    /// Index of the slot inside its block.
    pub fn slot(&self) -> u32 {
        self.slot
    }

    fn id(&self) -> SlotId {
        SlotId {
            block: self.block,
            slot: self.slot,
        }
    }
}

/// How the capacity of newly appended blocks is chosen.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum Growth {
    /// Every block has `block_capacity` slots.
    #[default]
    Fixed,
    /// Block `i` has `block_capacity * 2^i` slots.
    Doubling,
}

/// Configuration of a [`Pool`].
///
/// ```
/// # use fib_trie::*;
/// let config = PoolConfig::default().block_capacity(256).max_blocks(4);
/// assert_eq!(config.max_slots(), Some(1024));
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct PoolConfig {
    /// Number of slots of the first block. Zero is treated as one.
    pub block_capacity: usize,
    /// Maximum number of blocks the pool may allocate.
    pub max_blocks: usize,
    /// Capacity of the blocks appended after the first one.
    pub growth: Growth,
}

/// Largest block index or slot index a handle can encode.
const MAX_INDEX: usize = u32::MAX as usize;

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            block_capacity: 1024,
            max_blocks: MAX_INDEX,
            growth: Growth::Fixed,
        }
    }
}

impl PoolConfig {
    /// Set the number of slots of the first block.
    pub fn block_capacity(mut self, block_capacity: usize) -> Self {
        self.block_capacity = block_capacity;
        self
    }

    /// Set the maximum number of blocks.
    pub fn max_blocks(mut self, max_blocks: usize) -> Self {
        self.max_blocks = max_blocks;
        self
    }

    /// Set the growth policy.
    pub fn growth(mut self, growth: Growth) -> Self {
        self.growth = growth;
        self
    }

    /// Capacity of the block with index `block`.
    pub fn capacity_of(&self, block: usize) -> usize {
        let base = self.block_capacity.clamp(1, MAX_INDEX);
        match self.growth {
            Growth::Fixed => base,
            Growth::Doubling => {
                let factor = 1usize.checked_shl(block as u32).unwrap_or(usize::MAX);
                base.saturating_mul(factor).min(MAX_INDEX)
            }
        }
    }

    /// Total number of slots this configuration allows, or `None` if the pool is only bounded by
    /// the system memory.
    pub fn max_slots(&self) -> Option<usize> {
        if self.max_blocks >= MAX_INDEX {
            return None;
        }
        match self.growth {
            Growth::Fixed => self.capacity_of(0).checked_mul(self.max_blocks),
            Growth::Doubling => {
                // from block 64 on, every block is capped at `MAX_INDEX` slots
                let ramp = self.max_blocks.min(64);
                let head = (0..ramp)
                    .try_fold(0usize, |acc, b| acc.checked_add(self.capacity_of(b)))?;
                let tail = (self.max_blocks - ramp).checked_mul(MAX_INDEX)?;
                head.checked_add(tail)
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct SlotId {
    block: u32,
    slot: u32,
}

#[derive(Clone)]
enum Entry<T> {
    Occupied(T),
    Free { next: Option<SlotId> },
}

#[derive(Clone)]
struct Slot<T> {
    generation: u32,
    entry: Entry<T>,
}

/// A block never grows beyond the capacity reserved on creation, so its slots never move.
#[derive(Clone)]
struct Block<T> {
    slots: Vec<Slot<T>>,
}

impl<T> Block<T> {
    fn is_full(&self) -> bool {
        self.slots.len() == self.slots.capacity()
    }
}

/// Pool of equally sized slots, organized in blocks. See the [module documentation](self).
#[derive(Clone)]
pub struct Pool<T> {
    blocks: Vec<Block<T>>,
    free: Option<SlotId>,
    len: usize,
    config: PoolConfig,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new(PoolConfig::default())
    }
}

impl<T> Pool<T> {
    /// Create an empty pool. No block is allocated before the first call to
    /// [`Pool::allocate`].
    pub fn new(config: PoolConfig) -> Self {
        Self {
            blocks: Vec::new(),
            free: None,
            len: 0,
            config,
        }
    }

    /// The configuration of this pool.
    pub fn config(&self) -> &PoolConfig {
        &self.config
    }

    /// Number of occupied slots.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether no slot is occupied.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of allocated blocks.
    pub fn num_blocks(&self) -> usize {
        self.blocks.len()
    }

    /// Total number of slots in all allocated blocks.
    pub fn capacity(&self) -> usize {
        self.blocks.iter().map(|b| b.slots.capacity()).sum()
    }

    /// Store `value` in a free slot and return its handle. A slot on the free list is reused
    /// first, then the newest block is filled, and only then a new block is appended.
    ///
    /// ```
    /// # use fib_trie::*;
    /// let mut pool = Pool::new(PoolConfig::default().block_capacity(1).max_blocks(1));
    /// let a = pool.allocate("a").unwrap();
    /// assert!(matches!(pool.allocate("b"), Err(Error::OutOfMemory { blocks: 1 })));
    /// assert_eq!(pool.release(a), Some("a"));
    /// let b = pool.allocate("b").unwrap();
    /// assert_eq!(pool.get(a), None);
    /// assert_eq!(pool.get(b), Some(&"b"));
    /// ```
    pub fn allocate(&mut self, value: T) -> Result<NodeHandle, Error> {
        if let Some(id) = self.free {
            let slot = &mut self.blocks[id.block as usize].slots[id.slot as usize];
            let Entry::Free { next } = slot.entry else {
                unreachable!("occupied slot on the free list")
            };
            self.free = next;
            slot.entry = Entry::Occupied(value);
            self.len += 1;
            return Ok(NodeHandle {
                block: id.block,
                slot: id.slot,
                generation: slot.generation,
            });
        }

        if self.blocks.last().map(Block::is_full).unwrap_or(true) {
            self.grow()?;
        }
        let block = self.blocks.len() - 1;
        let slots = &mut self.blocks[block].slots;
        let slot = slots.len();
        slots.push(Slot {
            generation: 0,
            entry: Entry::Occupied(value),
        });
        self.len += 1;
        Ok(NodeHandle {
            block: block as u32,
            slot: slot as u32,
            generation: 0,
        })
    }

    /// Return the slot of `handle` to the free list and hand back its value. Returns `None` (and
    /// does nothing) if the handle was already released.
    pub fn release(&mut self, handle: NodeHandle) -> Option<T> {
        let next = self.free;
        let slot = self.slot_mut(handle)?;
        let Entry::Occupied(value) = std::mem::replace(&mut slot.entry, Entry::Free { next })
        else {
            unreachable!("generation matched a free slot")
        };
        slot.generation = slot.generation.wrapping_add(1);
        self.free = Some(handle.id());
        self.len -= 1;
        Some(value)
    }

    /// Dereference a handle. Returns `None` if the handle was released.
    pub fn get(&self, handle: NodeHandle) -> Option<&T> {
        let slot = self
            .blocks
            .get(handle.block as usize)?
            .slots
            .get(handle.slot as usize)?;
        match &slot.entry {
            Entry::Occupied(value) if slot.generation == handle.generation => Some(value),
            _ => None,
        }
    }

    /// Mutably dereference a handle. Returns `None` if the handle was released.
    pub fn get_mut(&mut self, handle: NodeHandle) -> Option<&mut T> {
        match &mut self.slot_mut(handle)?.entry {
            Entry::Occupied(value) => Some(value),
            Entry::Free { .. } => None,
        }
    }

    /// Whether `handle` still refers to an occupied slot.
    pub fn contains(&self, handle: NodeHandle) -> bool {
        self.get(handle).is_some()
    }

    fn slot_mut(&mut self, handle: NodeHandle) -> Option<&mut Slot<T>> {
        let slot = self
            .blocks
            .get_mut(handle.block as usize)?
            .slots
            .get_mut(handle.slot as usize)?;
        match slot.entry {
            Entry::Occupied(_) if slot.generation == handle.generation => Some(slot),
            _ => None,
        }
    }

    /// Append a new block, respecting the configured ceiling.
    fn grow(&mut self) -> Result<(), Error> {
        let blocks = self.blocks.len();
        if blocks >= self.config.max_blocks.min(MAX_INDEX) {
            return Err(Error::OutOfMemory { blocks });
        }
        let capacity = self.config.capacity_of(blocks);
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::OutOfMemory { blocks })?;
        self.blocks
            .try_reserve(1)
            .map_err(|_| Error::OutOfMemory { blocks })?;
        self.blocks.push(Block { slots });
        debug!(
            "node pool grew to {} blocks ({} slots)",
            self.blocks.len(),
            self.capacity()
        );
        Ok(())
    }
}

impl<T> Index<NodeHandle> for Pool<T> {
    type Output = T;

    fn index(&self, handle: NodeHandle) -> &Self::Output {
        match self.get(handle) {
            Some(value) => value,
            None => panic!("stale node handle {handle:?}"),
        }
    }
}

impl<T> IndexMut<NodeHandle> for Pool<T> {
    fn index_mut(&mut self, handle: NodeHandle) -> &mut Self::Output {
        match self.get_mut(handle) {
            Some(value) => value,
            None => panic!("stale node handle {handle:?}"),
        }
    }
}
