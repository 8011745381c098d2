//! Round-robin load balancing strategy.

use std::sync::atomic::{AtomicUsize, Ordering};

/// Round-robin selector.
/// Stores an internal counter to rotate through backends.
#[derive(Debug, Default)]
pub struct RoundRobin {
    counter: AtomicUsize,
}

impl RoundRobin {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim the next cursor value and map it onto `len` slots.
    ///
    /// Every caller gets a distinct cursor value, so `len` consecutive claims
    /// cover every slot exactly once no matter how callers interleave.
    pub fn next_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "round-robin over an empty set");
        self.counter.fetch_add(1, Ordering::Relaxed) % len
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;
    use std::thread;

    #[test]
    fn test_round_robin() {
        let lb = RoundRobin::new();
        let picks: Vec<usize> = (0..7).map(|_| lb.next_index(3)).collect();
        assert_eq!(picks, vec![0, 1, 2, 0, 1, 2, 0]);
    }

    #[test]
    fn test_single_slot_always_zero() {
        let lb = RoundRobin::new();
        for _ in 0..10 {
            assert_eq!(lb.next_index(1), 0);
        }
    }

    #[test]
    fn test_no_consecutive_repeats() {
        for len in 2..8 {
            let lb = RoundRobin::new();
            let mut prev = lb.next_index(len);
            for _ in 0..100 {
                let next = lb.next_index(len);
                assert_ne!(prev, next, "repeat with {} slots", len);
                prev = next;
            }
        }
    }

    #[test]
    fn test_concurrent_claims_cover_slots_evenly() {
        let len = 7;
        let threads = 16;
        let per_thread = 700;
        let lb = RoundRobin::new();
        let counts = Mutex::new(vec![0usize; len]);

        thread::scope(|s| {
            for _ in 0..threads {
                s.spawn(|| {
                    let mut local = vec![0usize; len];
                    for _ in 0..per_thread {
                        local[lb.next_index(len)] += 1;
                    }
                    let mut counts = counts.lock().unwrap();
                    for (slot, n) in local.into_iter().enumerate() {
                        counts[slot] += n;
                    }
                });
            }
        });

        let total = threads * per_thread;
        let counts = counts.into_inner().unwrap();
        assert_eq!(counts.iter().sum::<usize>(), total);
        // total is a multiple of len, so a gap-free run hits each slot equally.
        for n in counts {
            assert_eq!(n, total / len);
        }
    }
}
