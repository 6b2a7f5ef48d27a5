//! Born-rule measurement: weighted index selection and partial collapse.
//!
//! "Measurement" here is ordinary inverse-CDF categorical sampling. The
//! randomness comes entirely from the injected [`UnitSource`], so a seeded
//! source gives a reproducible run.

use tracing::trace;

use crate::error::{ensure_finite, NumericError, Result};
use crate::info::normalize;
use crate::random::UnitSource;

fn check_probabilities(probs: &[f64]) -> Result<()> {
    if probs.is_empty() {
        return Err(NumericError::EmptyInput("probability vector"));
    }
    ensure_finite(probs, "probs")?;
    if let Some(i) = probs.iter().position(|&p| p < 0.0) {
        return Err(NumericError::invalid(format!(
            "probs[{i}] is negative ({})",
            probs[i]
        )));
    }
    Ok(())
}

/// Samples an outcome index from an already-normalized distribution.
///
/// Draws `r ∈ [0, 1)` and walks the cumulative sum until it exceeds `r`.
/// If rounding leaves the total short of `r`, the last index is returned.
///
/// The vector is used as given: weights that do not sum to 1 skew the
/// result toward the last index (sum < 1) or the first indices (sum > 1).
/// Use [`BornSampler`] for arbitrary non-negative weights.
///
/// # Complexity
/// Time: O(n) per sample
///
/// # Errors
/// - `EmptyInput` if `probs` is empty.
/// - `InvalidOperand` if an entry is negative or non-finite.
///
/// # Examples
/// ```
/// use prime_resonance::born::sample;
/// use prime_resonance::random::create_rng;
/// let mut rng = create_rng(42);
/// assert_eq!(sample(&[0.0, 1.0, 0.0], &mut rng).unwrap(), 1);
/// ```
pub fn sample<U: UnitSource + ?Sized>(probs: &[f64], rng: &mut U) -> Result<usize> {
    check_probabilities(probs)?;
    let r = rng.next_unit();
    let mut cumulative = 0.0;
    for (i, &p) in probs.iter().enumerate() {
        cumulative += p;
        if cumulative > r {
            return Ok(i);
        }
    }
    // Fallback (floating-point shortfall)
    trace!(r, cumulative, "cumulative probability fell short of draw");
    Ok(probs.len() - 1)
}

/// Repeats [`sample`] `shots` times and returns the per-outcome counts.
///
/// # Errors
/// Same as [`sample`].
pub fn measure_counts<U: UnitSource + ?Sized>(
    probs: &[f64],
    shots: usize,
    rng: &mut U,
) -> Result<Vec<usize>> {
    check_probabilities(probs)?;
    let mut counts = vec![0usize; probs.len()];
    for _ in 0..shots {
        counts[sample(probs, rng)?] += 1;
    }
    Ok(counts)
}

/// Damps every amplitude except `selected` by `1 − strength`.
///
/// The selected entry is left unchanged and the result is **not**
/// renormalized; callers that need a unit vector normalize separately.
/// `strength = 0` is the identity, `strength = 1` zeroes all other entries.
///
/// # Errors
/// - `EmptyInput` if `amplitudes` is empty.
/// - `InvalidOperand` if `selected` is out of range or `strength ∉ [0, 1]`.
///
/// # Examples
/// ```
/// use prime_resonance::born::partial_collapse;
/// let out = partial_collapse(&[0.6, 0.8], 0, 0.5).unwrap();
/// assert_eq!(out, vec![0.6, 0.4]);
/// ```
pub fn partial_collapse(amplitudes: &[f64], selected: usize, strength: f64) -> Result<Vec<f64>> {
    if amplitudes.is_empty() {
        return Err(NumericError::EmptyInput("amplitudes"));
    }
    if selected >= amplitudes.len() {
        return Err(NumericError::invalid(format!(
            "selected index {selected} out of range for {} amplitudes",
            amplitudes.len()
        )));
    }
    if !(0.0..=1.0).contains(&strength) {
        return Err(NumericError::invalid(format!(
            "decoherence strength must lie in [0, 1], got {strength}"
        )));
    }
    let keep = 1.0 - strength;
    Ok(amplitudes
        .iter()
        .enumerate()
        .map(|(i, &a)| if i == selected { a } else { a * keep })
        .collect())
}

/// Converts real amplitudes to outcome probabilities `|aᵢ|² / Σ|aⱼ|²`.
///
/// # Errors
/// `EmptyInput` for no amplitudes, `InvalidOperand` if all are zero or any
/// is non-finite.
pub fn born_probabilities(amplitudes: &[f64]) -> Result<Vec<f64>> {
    ensure_finite(amplitudes, "amplitudes")?;
    let squared: Vec<f64> = amplitudes.iter().map(|a| a * a).collect();
    normalize(&squared)
}

/// Pre-computed sampler for repeated measurement of the same distribution.
///
/// Builds the cumulative table once and normalizes by its total, so any
/// non-negative weights are accepted.
///
/// # Complexity
/// - Construction: O(n)
/// - Sampling: O(log n)
///
/// # Examples
/// ```
/// use prime_resonance::born::BornSampler;
/// use prime_resonance::random::create_rng;
/// let sampler = BornSampler::new(&[1.0, 2.0, 3.0, 4.0]).unwrap();
/// let mut rng = create_rng(42);
/// assert!(sampler.sample(&mut rng) < 4);
/// ```
#[derive(Debug, Clone)]
pub struct BornSampler {
    cumulative: Vec<f64>,
    total: f64,
}

impl BornSampler {
    /// # Errors
    /// `EmptyInput` for no weights, `InvalidOperand` for negative or
    /// non-finite weights or a zero total.
    pub fn new(weights: &[f64]) -> Result<Self> {
        check_probabilities(weights)?;
        let mut cumulative = Vec::with_capacity(weights.len());
        let mut acc = 0.0;
        for &w in weights {
            acc += w;
            cumulative.push(acc);
        }
        let total = acc;
        if total <= 0.0 {
            return Err(NumericError::invalid("weights sum to zero"));
        }
        Ok(Self { cumulative, total })
    }

    /// Samples an index with probability proportional to its weight.
    pub fn sample<U: UnitSource + ?Sized>(&self, rng: &mut U) -> usize {
        let threshold = rng.next_unit() * self.total;
        let i = self.cumulative.partition_point(|&c| c <= threshold);
        i.min(self.cumulative.len() - 1)
    }

    /// Returns the number of outcomes.
    pub fn len(&self) -> usize {
        self.cumulative.len()
    }

    /// Always false: construction rejects empty weights.
    pub fn is_empty(&self) -> bool {
        self.cumulative.is_empty()
    }

    pub fn total_weight(&self) -> f64 {
        self.total
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::random::create_rng;
    use proptest::prelude::*;

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(300))]

        #[test]
        fn sample_returns_valid_index(
            seed in 0_u64..10000,
            weights in proptest::collection::vec(0.0_f64..10.0, 1..20),
        ) {
            let mut rng = create_rng(seed);
            let idx = sample(&weights, &mut rng).unwrap();
            prop_assert!(idx < weights.len());
        }

        #[test]
        fn sampler_never_picks_zero_weight(
            seed in 0_u64..10000,
            weights in proptest::collection::vec(prop_oneof![Just(0.0), 0.1_f64..10.0], 1..20),
        ) {
            prop_assume!(weights.iter().any(|&w| w > 0.0));
            let sampler = BornSampler::new(&weights).unwrap();
            let mut rng = create_rng(seed);
            for _ in 0..20 {
                let idx = sampler.sample(&mut rng);
                prop_assert!(weights[idx] > 0.0, "picked zero-weight index {}", idx);
            }
        }

        #[test]
        fn collapse_preserves_selected(
            amps in proptest::collection::vec(-1.0_f64..1.0, 1..16),
            strength in 0.0_f64..=1.0,
            pick in 0_usize..16,
        ) {
            let selected = pick % amps.len();
            let out = partial_collapse(&amps, selected, strength).unwrap();
            prop_assert_eq!(out[selected], amps[selected]);
            for (i, (&a, &b)) in amps.iter().zip(&out).enumerate() {
                if i != selected {
                    prop_assert!(b.abs() <= a.abs() + 1e-15);
                }
            }
        }
    }
}
