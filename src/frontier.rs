use crate::heuristic::Estimate;
use crate::state::StateId;
use fnv::FnvHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::collections::hash_map::Entry;

/// How the open list is ordered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Push estimate first, then moves made plus the positional tie-breaker.
    /// A state is inserted at most once.
    Greedy,
    /// A*: moves made plus push estimate, then the tie-breaker. A state is
    /// inserted again when reached with fewer moves, so solutions are move-optimal.
    #[default]
    Optimal,
}

/// Sort key of an open state. Lower is expanded first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub primary: u32,
    pub secondary: u32,
}

impl Strategy {
    pub fn priority(self, g: u32, h: Estimate) -> Priority {
        match self {
            Strategy::Greedy => Priority {
                primary: h.pushes,
                secondary: g + h.tie_break,
            },
            Strategy::Optimal => Priority {
                primary: g + h.pushes,
                secondary: h.tie_break,
            },
        }
    }
}

/// Lexicographic comparison of two priorities.
pub fn compare_priority(a: &Priority, b: &Priority) -> Ordering {
    a.primary
        .cmp(&b.primary)
        .then_with(|| a.secondary.cmp(&b.secondary))
}

#[derive(Debug)]
struct OpenEntry {
    priority: Priority,
    // insertion order, so equal priorities pop first-in first-out
    sequence: u64,
    g: u32,
    hash: u64,
    id: StateId,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        // intentionally reversed for BinaryHeap
        compare_priority(&other.priority, &self.priority)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for OpenEntry {}

/// Open list plus the set of fingerprints already inserted.
pub struct Frontier {
    strategy: Strategy,
    open: BinaryHeap<OpenEntry>,
    // fingerprint -> fewest moves it was inserted with
    seen: FnvHashMap<u64, u32>,
    next_sequence: u64,
}

impl Frontier {
    pub fn new(strategy: Strategy) -> Self {
        Frontier {
            strategy,
            open: BinaryHeap::new(),
            seen: FnvHashMap::default(),
            next_sequence: 0,
        }
    }

    /// Insert a state unless its fingerprint was seen before.
    /// Returns false if the state was dropped as a duplicate.
    pub fn offer(&mut self, hash: u64, g: u32, h: Estimate, id: StateId) -> bool {
        match self.seen.entry(hash) {
            Entry::Occupied(mut best) => {
                if self.strategy == Strategy::Greedy || g >= *best.get() {
                    return false;
                }
                best.insert(g);
            }
            Entry::Vacant(slot) => {
                slot.insert(g);
            }
        }

        self.open.push(OpenEntry {
            priority: self.strategy.priority(g, h),
            sequence: self.next_sequence,
            g,
            hash,
            id,
        });
        self.next_sequence += 1;
        true
    }

    /// Remove the open state with the lowest priority.
    /// Entries superseded by a cheaper path to the same state are skipped.
    pub fn pop(&mut self) -> Option<StateId> {
        while let Some(entry) = self.open.pop() {
            if self.seen.get(&entry.hash).is_some_and(|&best| entry.g > best) {
                continue;
            }
            return Some(entry.id);
        }
        None
    }

    /// Entries in the open list, including superseded ones.
    pub fn len(&self) -> usize {
        self.open.len()
    }

    pub fn is_empty(&self) -> bool {
        self.open.is_empty()
    }

    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn estimate(pushes: u32, tie_break: u32) -> Estimate {
        Estimate { pushes, tie_break }
    }

    #[test]
    fn test_compare_priority() {
        let low = Priority {
            primary: 1,
            secondary: 900,
        };
        let high = Priority {
            primary: 2,
            secondary: 0,
        };
        assert_eq!(compare_priority(&low, &high), Ordering::Less);
        assert_eq!(compare_priority(&high, &low), Ordering::Greater);
        assert_eq!(compare_priority(&low, &low), Ordering::Equal);

        let tied = Priority {
            primary: 1,
            secondary: 901,
        };
        assert_eq!(compare_priority(&low, &tied), Ordering::Less);
    }

    #[test]
    fn test_greedy_priority_ignores_large_tie_break() {
        // a tie-breaker far beyond one push unit must not reorder push estimates
        let near = Strategy::Greedy.priority(50, estimate(1, 60_000));
        let far = Strategy::Greedy.priority(0, estimate(2, 0));
        assert_eq!(compare_priority(&near, &far), Ordering::Less);
    }

    #[test]
    fn test_optimal_priority_counts_moves() {
        let short = Strategy::Optimal.priority(3, estimate(2, 500));
        let long = Strategy::Optimal.priority(5, estimate(1, 0));
        assert_eq!(compare_priority(&short, &long), Ordering::Less);

        // the same pair under greedy ordering prefers the lower push estimate
        let short = Strategy::Greedy.priority(3, estimate(2, 500));
        let long = Strategy::Greedy.priority(5, estimate(1, 0));
        assert_eq!(compare_priority(&short, &long), Ordering::Greater);
    }

    #[test]
    fn test_pop_ordered() {
        let mut frontier = Frontier::new(Strategy::Optimal);
        frontier.offer(1, 0, estimate(10, 0), StateId::new(0).unwrap());
        frontier.offer(2, 0, estimate(5, 0), StateId::new(1).unwrap());
        frontier.offer(3, 0, estimate(15, 0), StateId::new(2).unwrap());

        assert_eq!(frontier.pop(), Some(StateId::new(1).unwrap()));
        assert_eq!(frontier.pop(), Some(StateId::new(0).unwrap()));
        assert_eq!(frontier.pop(), Some(StateId::new(2).unwrap()));
        assert_eq!(frontier.pop(), None);
    }

    #[test]
    fn test_equal_priorities_pop_in_insertion_order() {
        let mut frontier = Frontier::new(Strategy::Greedy);
        frontier.offer(10, 1, estimate(3, 7), StateId::new(0).unwrap());
        frontier.offer(20, 1, estimate(3, 7), StateId::new(1).unwrap());
        frontier.offer(30, 1, estimate(3, 7), StateId::new(2).unwrap());

        assert_eq!(frontier.pop(), Some(StateId::new(0).unwrap()));
        assert_eq!(frontier.pop(), Some(StateId::new(1).unwrap()));
        assert_eq!(frontier.pop(), Some(StateId::new(2).unwrap()));
    }

    #[test]
    fn test_greedy_never_reinserts() {
        let mut frontier = Frontier::new(Strategy::Greedy);
        assert!(frontier.offer(42, 5, estimate(1, 0), StateId::new(0).unwrap()));
        assert!(!frontier.offer(42, 5, estimate(1, 0), StateId::new(1).unwrap()));
        assert!(!frontier.offer(42, 2, estimate(1, 0), StateId::new(2).unwrap()));

        assert_eq!(frontier.len(), 1);
        assert_eq!(frontier.seen_count(), 1);
        assert_eq!(frontier.pop(), Some(StateId::new(0).unwrap()));
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_optimal_reinserts_cheaper_path() {
        let mut frontier = Frontier::new(Strategy::Optimal);
        assert!(frontier.offer(42, 5, estimate(1, 0), StateId::new(0).unwrap()));
        assert!(!frontier.offer(42, 5, estimate(1, 0), StateId::new(1).unwrap()));
        assert!(frontier.offer(42, 2, estimate(1, 0), StateId::new(2).unwrap()));
        assert_eq!(frontier.len(), 2);
        assert_eq!(frontier.seen_count(), 1);

        // the stale entry with g = 5 is skipped
        assert_eq!(frontier.pop(), Some(StateId::new(2).unwrap()));
        assert_eq!(frontier.pop(), None);
    }
}
