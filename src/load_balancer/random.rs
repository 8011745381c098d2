//! Uniform random load balancing strategy.

use rand::Rng;

/// Random selector. Stateless; each draw uses the calling thread's RNG.
#[derive(Debug, Default, Clone, Copy)]
pub struct Random;

impl Random {
    pub fn new() -> Self {
        Self
    }

    /// Draw a slot uniformly from `0..len`.
    pub fn next_index(&self, len: usize) -> usize {
        debug_assert!(len > 0, "random pick from an empty set");
        rand::thread_rng().gen_range(0..len)
    }
}
