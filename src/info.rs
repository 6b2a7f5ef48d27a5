//! Shannon entropy and coherence of discrete distributions.
//!
//! # Conventions
//!
//! - Logarithms are base 2, so entropy is measured in bits.
//! - `0 · log₂(0) = 0`: zero entries contribute nothing.
//! - [`entropy`] does **not** normalize. An unnormalized vector yields the
//!   entropy expression taken literally; call [`normalize`] first when the
//!   `[0, log₂ N]` bound matters.
//!
//! # Coherence
//!
//! `coherence = 1 − H / log₂ N`, the normalized complement of entropy.
//! For `N = 1` the ratio is undefined and coherence is 1 by convention.

use crate::error::{ensure_finite, NumericError, Result};
use crate::stats::kahan_sum;

/// Shannon entropy `−Σ p·log₂ p` over the strictly positive entries.
///
/// # Errors
/// - `EmptyInput` if `probs` is empty.
/// - `InvalidOperand` if any entry is NaN or infinite.
///
/// # Examples
/// ```
/// use prime_resonance::info::entropy;
/// let h = entropy(&[0.25, 0.25, 0.25, 0.25]).unwrap();
/// assert!((h - 2.0).abs() < 1e-12);
/// ```
pub fn entropy(probs: &[f64]) -> Result<f64> {
    if probs.is_empty() {
        return Err(NumericError::EmptyInput("probability vector"));
    }
    ensure_finite(probs, "probs")?;
    let h = -kahan_sum(
        probs
            .iter()
            .filter(|&&p| p > 0.0)
            .map(|&p| p * p.log2()),
    );
    // -0.0 for a point mass
    Ok(if h == 0.0 { 0.0 } else { h })
}

/// Maximum entropy `log₂ N` of a distribution over `n` outcomes.
pub fn max_entropy(n: usize) -> f64 {
    if n == 0 {
        0.0
    } else {
        (n as f64).log2()
    }
}

/// Coherence `1 − H(probs) / log₂ N`.
///
/// In `[0, 1]` for normalized input: 1 for a point mass, 0 for the uniform
/// distribution. A single-entry vector has coherence 1.
///
/// # Errors
/// Same as [`entropy`].
///
/// # Examples
/// ```
/// use prime_resonance::info::coherence;
/// assert_eq!(coherence(&[1.0, 0.0, 0.0]).unwrap(), 1.0);
/// assert!(coherence(&[0.5, 0.5]).unwrap().abs() < 1e-12);
/// ```
pub fn coherence(probs: &[f64]) -> Result<f64> {
    let h = entropy(probs)?;
    if probs.len() == 1 {
        return Ok(1.0);
    }
    Ok(1.0 - h / max_entropy(probs.len()))
}

/// Rescales non-negative weights so they sum to 1.
///
/// # Errors
/// - `EmptyInput` if `values` is empty.
/// - `InvalidOperand` if any value is negative or non-finite, or all are zero.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(NumericError::EmptyInput("weights"));
    }
    ensure_finite(values, "weights")?;
    if let Some(i) = values.iter().position(|&v| v < 0.0) {
        return Err(NumericError::invalid(format!(
            "weights[{i}] is negative ({})",
            values[i]
        )));
    }
    let total = kahan_sum(values.iter().copied());
    if total <= 0.0 {
        return Err(NumericError::invalid("weights sum to zero"));
    }
    Ok(values.iter().map(|v| v / total).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entropy_point_mass_is_zero() {
        assert_eq!(entropy(&[1.0]).unwrap(), 0.0);
        assert_eq!(entropy(&[0.0, 1.0, 0.0]).unwrap(), 0.0);
    }

    #[test]
    fn test_entropy_fair_coin_is_one_bit() {
        assert!((entropy(&[0.5, 0.5]).unwrap() - 1.0).abs() < 1e-15);
    }

    #[test]
    fn test_entropy_known_value() {
        // H(0.5, 0.25, 0.25) = 1.5 bits
        let h = entropy(&[0.5, 0.25, 0.25]).unwrap();
        assert!((h - 1.5).abs() < 1e-15);
    }

    #[test]
    fn test_entropy_unnormalized_taken_literally() {
        // -(2·log2 2) = -2
        let h = entropy(&[2.0]).unwrap();
        assert!((h + 2.0).abs() < 1e-15);
    }

    #[test]
    fn test_entropy_errors() {
        assert_eq!(
            entropy(&[]),
            Err(NumericError::EmptyInput("probability vector"))
        );
        assert!(matches!(
            entropy(&[0.5, f64::NAN]),
            Err(NumericError::InvalidOperand(_))
        ));
    }

    #[test]
    fn test_coherence_single_entry_is_one() {
        assert_eq!(coherence(&[1.0]).unwrap(), 1.0);
    }

    #[test]
    fn test_coherence_uniform_is_zero() {
        let c = coherence(&[0.125; 8]).unwrap();
        assert!(c.abs() < 1e-12, "got {c}");
    }

    #[test]
    fn test_coherence_matches_definition() {
        let p = [0.7, 0.2, 0.1];
        let expected = 1.0 - entropy(&p).unwrap() / 3.0_f64.log2();
        assert_eq!(coherence(&p).unwrap(), expected);
    }

    #[test]
    fn test_max_entropy() {
        assert_eq!(max_entropy(0), 0.0);
        assert_eq!(max_entropy(1), 0.0);
        assert!((max_entropy(8) - 3.0).abs() < 1e-15);
    }

    #[test]
    fn test_normalize() {
        let p = normalize(&[1.0, 3.0]).unwrap();
        assert!((p[0] - 0.25).abs() < 1e-15);
        assert!((p[1] - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_normalize_errors() {
        assert!(normalize(&[]).is_err());
        assert!(normalize(&[0.0, 0.0]).is_err());
        assert!(normalize(&[1.0, -0.5]).is_err());
        assert!(normalize(&[1.0, f64::INFINITY]).is_err());
    }
}
