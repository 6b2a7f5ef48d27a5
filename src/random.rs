//! Injectable uniform random sources.
//!
//! Nothing in this crate calls a global generator. Samplers take a
//! [`UnitSource`], which every `rand` generator implements, and which
//! [`HashRng`] implements for the reproducible "sine hash" sequences the
//! demo pages use.
//!
//! # Reproducibility
//!
//! [`create_rng`] with a fixed seed yields the same `SmallRng` stream on a
//! given platform. [`HashRng`] is fully deterministic across platforms up
//! to the accuracy of `f64::sin`.

use rand::{Rng, RngCore};

/// Creates a fast, seeded random number generator.
///
/// Uses `SmallRng` (Xoshiro256++). The sequence is deterministic for a
/// given seed on the same platform.
///
/// # Examples
/// ```
/// use prime_resonance::random::{create_rng, UnitSource};
/// let mut rng = create_rng(42);
/// let x = rng.next_unit();
/// assert!((0.0..1.0).contains(&x));
/// ```
pub fn create_rng(seed: u64) -> rand::rngs::SmallRng {
    use rand::SeedableRng;
    rand::rngs::SmallRng::seed_from_u64(seed)
}

/// A source of uniform draws in `[0, 1)`.
pub trait UnitSource {
    /// Draws the next value in `[0, 1)`.
    fn next_unit(&mut self) -> f64;
}

impl<R: RngCore> UnitSource for R {
    fn next_unit(&mut self) -> f64 {
        self.random::<f64>()
    }
}

/// Fractional part of `sin(seed · 12.9898) · 43758.5453`.
///
/// The classic shader hash. Always in `[0, 1)`, negative products included.
///
/// # Examples
/// ```
/// use prime_resonance::random::hash_random;
/// let a = hash_random(7.0);
/// assert_eq!(a, hash_random(7.0));
/// assert!((0.0..1.0).contains(&a));
/// ```
pub fn hash_random(seed: f64) -> f64 {
    let x = (seed * 12.9898).sin() * 43758.5453;
    let f = x - x.floor();
    // x - floor(x) can round up to exactly 1.0 for tiny negative x
    if f >= 1.0 {
        0.0
    } else {
        f
    }
}

/// Deterministic sequence `hash_random(seed), hash_random(seed + 1), ...`.
///
/// Intended for reproducible "random" demos, not for statistics: the
/// stream is visibly correlated for nearby seeds.
#[derive(Debug, Clone, PartialEq)]
pub struct HashRng {
    seed: f64,
}

impl HashRng {
    pub fn new(seed: f64) -> Self {
        Self { seed }
    }

    /// The seed the next draw will use.
    pub fn seed(&self) -> f64 {
        self.seed
    }
}

impl UnitSource for HashRng {
    fn next_unit(&mut self) -> f64 {
        let v = hash_random(self.seed);
        self.seed += 1.0;
        v
    }
}
