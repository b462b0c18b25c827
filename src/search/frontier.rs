//! Best-first priority queue of candidate blocks.

use super::block::Block;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// Heap entry: block priority, then insertion order (earlier pops first).
#[derive(Debug)]
struct FrontierEntry {
    seq: u64,
    block: Block,
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: the smaller sequence number must compare greater.
        self.block
            .priority_cmp(&other.block)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

/// Blocks ordered by utility descending, then refinement kind descending,
/// then insertion order.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
    next_seq: u64,
    peak: usize,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: Block) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(FrontierEntry { seq, block });
        self.peak = self.peak.max(self.heap.len());
    }

    pub fn pop(&mut self) -> Option<Block> {
        self.heap.pop().map(|entry| entry.block)
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Largest size the frontier has reached.
    pub fn peak(&self) -> usize {
        self.peak
    }

    /// Total number of blocks ever pushed.
    pub fn pushed(&self) -> u64 {
        self.next_seq
    }
}

impl Extend<Block> for Frontier {
    fn extend<I: IntoIterator<Item = Block>>(&mut self, iter: I) {
        for block in iter {
            self.push(block);
        }
    }
}
