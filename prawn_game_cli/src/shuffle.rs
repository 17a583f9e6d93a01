use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Source of uniform indices for shuffling. Swap in a seeded or scripted
/// implementation for reproducible sessions.
pub trait Randomizer {
    /// Uniform index in `[0, max]`.
    fn index_upto(&mut self, max: usize) -> usize;
}

pub struct RngShuffler<R = StdRng> {
    rng: R,
}

impl RngShuffler<StdRng> {
    pub fn from_entropy() -> Self {
        Self { rng: StdRng::from_entropy() }
    }

    pub fn seeded(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }
}

impl<R: Rng> RngShuffler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }
}

impl<R: Rng> Randomizer for RngShuffler<R> {
    fn index_upto(&mut self, max: usize) -> usize {
        self.rng.gen_range(0..=max)
    }
}

/// Fisher-Yates over a copy; the caller's slice is left alone.
pub fn shuffled<T: Clone>(items: &[T], rng: &mut impl Randomizer) -> Vec<T> {
    let mut out = items.to_vec();
    for i in (1..out.len()).rev() {
        let j = rng.index_upto(i);
        out.swap(i, j);
    }
    out
}
