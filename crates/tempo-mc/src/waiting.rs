//! Waiting containers.
//!
//! The frontier of the exploration: the removal order defines the search
//! strategy. Containers do not deduplicate; that is the graph's job.

use std::collections::{BinaryHeap, VecDeque};
use std::fmt;

/// A container of elements waiting to be processed.
pub trait Waiting<N> {
    fn insert(&mut self, n: N);

    /// The element that [`Waiting::remove_first`] would remove.
    fn first(&self) -> Option<&N>;

    fn remove_first(&mut self) -> Option<N>;

    fn is_empty(&self) -> bool;

    /// Drops every element. The container is reusable afterwards.
    fn clear(&mut self);
}

/// Priority function over container elements.
pub type PriorityFn<N> = Box<dyn Fn(&N) -> i64>;

/// Insertion/removal policy of a waiting container.
pub enum Policy<N> {
    /// First in, first out: breadth-first exploration.
    Fifo,
    /// Last in, first out: depth-first exploration.
    Lifo,
    /// Smallest priority first; ties break on insertion order.
    MinPriority(PriorityFn<N>),
    /// Largest priority first; ties break on insertion order.
    MaxPriority(PriorityFn<N>),
}

impl<N> fmt::Debug for Policy<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Policy::Fifo => "Fifo",
            Policy::Lifo => "Lifo",
            Policy::MinPriority(_) => "MinPriority(..)",
            Policy::MaxPriority(_) => "MaxPriority(..)",
        };
        f.write_str(name)
    }
}

/// Builds the waiting container implementing `policy`.
pub fn waiting<N: 'static>(policy: Policy<N>) -> Box<dyn Waiting<N>> {
    match policy {
        Policy::Fifo => Box::new(Fifo(VecDeque::new())),
        Policy::Lifo => Box::new(Lifo(Vec::new())),
        Policy::MinPriority(f) => Box::new(PriorityWaiting::new(f, false)),
        Policy::MaxPriority(f) => Box::new(PriorityWaiting::new(f, true)),
    }
}

struct Fifo<N>(VecDeque<N>);

impl<N> Waiting<N> for Fifo<N> {
    fn insert(&mut self, n: N) {
        self.0.push_back(n);
    }

    fn first(&self) -> Option<&N> {
        self.0.front()
    }

    fn remove_first(&mut self) -> Option<N> {
        self.0.pop_front()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

struct Lifo<N>(Vec<N>);

impl<N> Waiting<N> for Lifo<N> {
    fn insert(&mut self, n: N) {
        self.0.push(n);
    }

    fn first(&self) -> Option<&N> {
        self.0.last()
    }

    fn remove_first(&mut self) -> Option<N> {
        self.0.pop()
    }

    fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    fn clear(&mut self) {
        self.0.clear();
    }
}

struct Entry<N> {
    /// Heap key: the priority, negated for min-priority containers so the
    /// max-heap always pops the wanted end.
    key: i64,
    /// Insertion counter; earlier insertions win ties.
    seq: u64,
    node: N,
}

impl<N> PartialEq for Entry<N> {
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key && self.seq == other.seq
    }
}

impl<N> Eq for Entry<N> {}

impl<N> PartialOrd for Entry<N> {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl<N> Ord for Entry<N> {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.key
            .cmp(&other.key)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

struct PriorityWaiting<N> {
    heap: BinaryHeap<Entry<N>>,
    priority: PriorityFn<N>,
    max: bool,
    seq: u64,
}

impl<N> PriorityWaiting<N> {
    fn new(priority: PriorityFn<N>, max: bool) -> Self {
        Self {
            heap: BinaryHeap::new(),
            priority,
            max,
            seq: 0,
        }
    }
}

impl<N> Waiting<N> for PriorityWaiting<N> {
    fn insert(&mut self, n: N) {
        let p = (self.priority)(&n);
        let key = if self.max { p } else { -p };
        self.heap.push(Entry {
            key,
            seq: self.seq,
            node: n,
        });
        self.seq += 1;
    }

    fn first(&self) -> Option<&N> {
        self.heap.peek().map(|e| &e.node)
    }

    fn remove_first(&mut self) -> Option<N> {
        self.heap.pop().map(|e| e.node)
    }

    fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    fn clear(&mut self) {
        self.heap.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain<N>(w: &mut dyn Waiting<N>) -> Vec<N> {
        let mut out = Vec::new();
        while let Some(n) = w.remove_first() {
            out.push(n);
        }
        out
    }

    #[test]
    fn fifo_is_breadth_first() {
        let mut w = waiting::<u32>(Policy::Fifo);
        for n in [1, 2, 3] {
            w.insert(n);
        }
        assert_eq!(w.first(), Some(&1));
        assert_eq!(drain(w.as_mut()), vec![1, 2, 3]);
        assert!(w.is_empty());
    }

    #[test]
    fn lifo_is_depth_first() {
        let mut w = waiting::<u32>(Policy::Lifo);
        for n in [1, 2, 3] {
            w.insert(n);
        }
        assert_eq!(w.first(), Some(&3));
        assert_eq!(drain(w.as_mut()), vec![3, 2, 1]);
    }

    #[test]
    fn min_priority_pops_smallest() {
        let mut w = waiting::<u32>(Policy::MinPriority(Box::new(|&n| i64::from(n % 10))));
        for n in [23, 11, 42] {
            w.insert(n);
        }
        assert_eq!(drain(w.as_mut()), vec![11, 42, 23]);
    }

    #[test]
    fn max_priority_pops_largest() {
        let mut w = waiting::<u32>(Policy::MaxPriority(Box::new(|&n| i64::from(n))));
        for n in [23, 11, 42] {
            w.insert(n);
        }
        assert_eq!(drain(w.as_mut()), vec![42, 23, 11]);
    }

    #[test]
    fn priority_ties_break_on_insertion_order() {
        let mut w = waiting::<u32>(Policy::MinPriority(Box::new(|_| 0)));
        for n in [5, 6, 7] {
            w.insert(n);
        }
        assert_eq!(drain(w.as_mut()), vec![5, 6, 7]);

        let mut w = waiting::<u32>(Policy::MaxPriority(Box::new(|_| 0)));
        for n in [5, 6, 7] {
            w.insert(n);
        }
        assert_eq!(drain(w.as_mut()), vec![5, 6, 7]);
    }

    #[test]
    fn clear_leaves_an_empty_reusable_container() {
        let mut w = waiting::<u32>(Policy::Fifo);
        w.insert(1);
        w.clear();
        assert!(w.is_empty());
        assert_eq!(w.first(), None);
        w.insert(2);
        assert_eq!(w.remove_first(), Some(2));
    }
}
