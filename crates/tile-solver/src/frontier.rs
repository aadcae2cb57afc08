//! Min-priority queue of search nodes.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use crate::node::NodeId;

/// Heap entry ordered by priority, then by insertion sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Entry {
    priority: usize,
    seq: u64,
    node: NodeId,
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap; reverse both keys so the smallest
        // priority, then the oldest insertion, comes out first.
        Reverse((self.priority, self.seq)).cmp(&Reverse((other.priority, other.seq)))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Priority-ordered multiset of nodes, lowest priority first.
///
/// Equal priorities leave in insertion order. Nothing is deduplicated: the
/// same board may sit in the frontier several times under different parents.
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, node: NodeId, priority: usize) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            priority,
            seq,
            node,
        });
    }

    /// Remove the lowest-priority node, or `None` when empty.
    pub fn extract_min(&mut self) -> Option<NodeId> {
        self.heap.pop().map(|entry| entry.node)
    }

    /// Priority of the node [`extract_min`](Self::extract_min) would return.
    pub fn peek_priority(&self) -> Option<usize> {
        self.heap.peek().map(|entry| entry.priority)
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}
