//! Deterministic per-car RNG.
//!
//! Each car gets its own `SmallRng` seeded by:
//!
//!   seed = global_seed XOR (car_index * MIXING_CONSTANT)
//!
//! so a run is reproducible from one seed, and car threads never share RNG
//! state.

use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

/// 64-bit fractional golden-ratio constant for seed mixing.
const MIXING_CONSTANT: u64 = 0x9e37_79b9_7f4a_7c15;

pub struct CarRng(SmallRng);

impl CarRng {
    /// Seed deterministically from the run's global seed and a car index.
    pub fn new(global_seed: u64, car_index: u64) -> Self {
        let seed = global_seed ^ car_index.wrapping_mul(MIXING_CONSTANT);
        CarRng(SmallRng::seed_from_u64(seed))
    }

    /// Generate a value uniformly in `range`.
    #[inline]
    pub fn gen_range<T, R>(&mut self, range: R) -> T
    where
        T: rand::distributions::uniform::SampleUniform,
        R: rand::distributions::uniform::SampleRange<T>,
    {
        self.0.gen_range(range)
    }

    /// A dwell in `[min, max]`, never below 1.
    pub fn dwell(&mut self, min: u32, max: u32) -> u32 {
        let lo = min.max(1);
        self.gen_range(lo..=max.max(lo))
    }
}
