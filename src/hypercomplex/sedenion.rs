//! 16-component "sedenions" with a cyclic bitwise sign rule.
//!
//! # Multiplication rule
//!
//! ```text
//! (a · b)[(i + j) mod 16] += sign(i, j) · a[i] · b[j]
//! sign(i, j) = −1  if (i & j) & 8 ≠ 0,  else +1
//! ```
//!
//! This is **not** the canonical Cayley–Dickson sedenion table. It is the
//! simplified rule the showcase pages have always displayed, kept verbatim
//! so that every widget reports the same numbers.
//!
//! # Raw vs. normalized products
//!
//! [`Sedenion::product_raw`] (and `Mul`) keep the magnitude; the normalized
//! variant rescales to unit norm. Zero-divisor detection must use the raw
//! product: rescaling a near-zero result hides the very collapse being
//! measured. Both paths are kept separate on purpose.

use std::ops::{Add, Mul, Neg, Sub};

use tracing::debug;

use super::{components_from_slice, conjugate_components, inverse_components};
use crate::error::{ensure_finite, NumericError, Result};
use crate::stats;

/// Number of components.
pub const DIM: usize = 16;

/// A 16-component hypercomplex value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sedenion(pub [f64; DIM]);

impl Default for Sedenion {
    fn default() -> Self {
        Sedenion([0.0; DIM])
    }
}

#[inline]
fn sign(i: usize, j: usize) -> f64 {
    if (i & j) & 8 != 0 {
        -1.0
    } else {
        1.0
    }
}

impl Sedenion {
    /// Basis element `e_k` (`k < 16`).
    ///
    /// # Panics
    /// If `k >= 16`.
    pub fn basis(k: usize) -> Self {
        let mut c = [0.0; DIM];
        c[k] = 1.0;
        Sedenion(c)
    }

    pub fn components(&self) -> [f64; DIM] {
        self.0
    }

    /// Unnormalized product under the bitwise sign rule.
    pub fn product_raw(&self, other: &Sedenion) -> Sedenion {
        let mut out = [0.0; DIM];
        for (i, &a) in self.0.iter().enumerate() {
            if a == 0.0 {
                continue;
            }
            for (j, &b) in other.0.iter().enumerate() {
                out[(i + j) % DIM] += sign(i, j) * a * b;
            }
        }
        Sedenion(out)
    }

    /// Product, optionally rescaled to unit norm.
    ///
    /// A zero product stays the zero vector when `normalize` is set.
    pub fn product(&self, other: &Sedenion, normalize: bool) -> Sedenion {
        let raw = self.product_raw(other);
        if normalize {
            raw.normalized()
        } else {
            raw
        }
    }

    /// `self / ‖self‖`, or `self` unchanged when the norm is zero.
    pub fn normalized(&self) -> Sedenion {
        let n = self.norm();
        if n > 0.0 {
            Sedenion(self.0.map(|x| x / n))
        } else {
            *self
        }
    }

    pub fn conjugate(&self) -> Sedenion {
        Sedenion(conjugate_components(&self.0))
    }

    pub fn norm_squared(&self) -> f64 {
        stats::norm_squared(&self.0)
    }

    pub fn norm(&self) -> f64 {
        stats::norm(&self.0)
    }

    /// `conj(s) / ‖s‖²`.
    ///
    /// Under the bitwise rule this is not a two-sided multiplicative
    /// inverse in general; it is the conjugate-over-norm quantity the
    /// pages display.
    ///
    /// # Errors
    /// `InvalidOperand` for the zero element.
    pub fn inverse(&self) -> Result<Sedenion> {
        inverse_components(&self.0).map(Sedenion)
    }

    /// `‖ab‖ / (‖a‖·‖b‖)` using the raw product.
    ///
    /// # Errors
    /// `InvalidOperand` if either operand has zero norm.
    pub fn product_ratio(&self, other: &Sedenion) -> Result<f64> {
        let denom = self.norm() * other.norm();
        if denom == 0.0 || !denom.is_finite() {
            return Err(NumericError::invalid(format!(
                "product ratio undefined for operand norms {} and {}",
                self.norm(),
                other.norm()
            )));
        }
        Ok(self.product_raw(other).norm() / denom)
    }
}

impl From<[f64; DIM]> for Sedenion {
    fn from(c: [f64; DIM]) -> Self {
        Sedenion(c)
    }
}

impl TryFrom<&[f64]> for Sedenion {
    type Error = NumericError;

    fn try_from(data: &[f64]) -> Result<Self> {
        components_from_slice(data).map(Sedenion)
    }
}

impl Mul for Sedenion {
    type Output = Sedenion;

    fn mul(self, rhs: Sedenion) -> Sedenion {
        self.product_raw(&rhs)
    }
}

impl Add for Sedenion {
    type Output = Sedenion;

    fn add(self, rhs: Sedenion) -> Sedenion {
        Sedenion(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for Sedenion {
    type Output = Sedenion;

    fn sub(self, rhs: Sedenion) -> Sedenion {
        Sedenion(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Neg for Sedenion {
    type Output = Sedenion;

    fn neg(self) -> Sedenion {
        Sedenion(self.0.map(|x| -x))
    }
}

/// Product of two 16-component slices.
///
/// # Errors
/// - `DimensionMismatch` unless both slices have exactly 16 components.
/// - `InvalidOperand` if any component is NaN or infinite.
///
/// # Examples
/// ```
/// use prime_resonance::hypercomplex::sedenion_product;
/// let mut a = [0.0; 16];
/// a[8] = 1.0;
/// // e8 · e8 = −e0 under the bitwise rule
/// let p = sedenion_product(&a, &a, false).unwrap();
/// assert_eq!(p.components()[0], -1.0);
/// assert!(sedenion_product(&[1.0; 4], &a, false).is_err());
/// ```
pub fn sedenion_product(a: &[f64], b: &[f64], normalize: bool) -> Result<Sedenion> {
    let sa = Sedenion::try_from(a)?;
    let sb = Sedenion::try_from(b)?;
    ensure_finite(a, "a")?;
    ensure_finite(b, "b")?;
    Ok(sa.product(&sb, normalize))
}

/// True when `‖ab‖ / (‖a‖·‖b‖) < threshold_ratio` for the **raw** product.
///
/// # Errors
/// `InvalidOperand` if either operand has zero norm.
pub fn is_zero_divisor_pair(a: &Sedenion, b: &Sedenion, threshold_ratio: f64) -> Result<bool> {
    Ok(a.product_ratio(b)? < threshold_ratio)
}

/// A pair whose raw product nearly vanishes.
#[derive(Debug, Clone, PartialEq)]
pub struct ZeroDivisorPair {
    pub left: Sedenion,
    pub right: Sedenion,
    /// `‖left·right‖ / (‖left‖·‖right‖)`.
    pub ratio: f64,
}

/// The two-term elements `e_a + e_b` and `e_a − e_b` for `0 ≤ a < b < 16`.
pub fn signed_pair_elements() -> Vec<Sedenion> {
    let mut out = Vec::with_capacity(DIM * (DIM - 1));
    for a in 0..DIM {
        for b in (a + 1)..DIM {
            for s in [1.0, -1.0] {
                let mut c = [0.0; DIM];
                c[a] = 1.0;
                c[b] = s;
                out.push(Sedenion(c));
            }
        }
    }
    out
}

/// Scans every ordered pair of `candidates` for raw zero-divisor behaviour.
///
/// Zero-norm candidates are skipped. Results are ordered by ascending ratio.
pub fn find_zero_divisors(candidates: &[Sedenion], threshold_ratio: f64) -> Vec<ZeroDivisorPair> {
    let mut found = Vec::new();
    let mut scanned = 0usize;
    for left in candidates {
        for right in candidates {
            let Ok(ratio) = left.product_ratio(right) else {
                continue;
            };
            scanned += 1;
            if ratio < threshold_ratio {
                found.push(ZeroDivisorPair {
                    left: *left,
                    right: *right,
                    ratio,
                });
            }
        }
    }
    found.sort_by(|a, b| a.ratio.total_cmp(&b.ratio));
    debug!(
        candidates = candidates.len(),
        scanned,
        found = found.len(),
        threshold_ratio,
        "zero divisor search finished"
    );
    found
}
