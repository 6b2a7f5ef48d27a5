//! Hypercomplex number types.
//!
//! - [`Quaternion`]: 4 components `(w, x, y, z)`, Hamilton product.
//! - [`Sedenion`]: 16 components, multiplied with the cyclic bitwise sign
//!   rule described in [`sedenion`].
//!
//! Both are `Copy` value types whose arity is fixed by the type. Slices of
//! the wrong length are rejected with `DimensionMismatch` at the boundary
//! (`TryFrom<&[f64]>` and the slice-level entry points).
//!
//! Conjugate and inverse share one definition for every arity:
//! `conj(a) = (a₀, −a₁, …, −aₙ₋₁)` and `a⁻¹ = conj(a) / ‖a‖²`.

pub mod quaternion;
pub mod sedenion;

pub use quaternion::{non_commutativity, quaternion_product, Quaternion};
pub use sedenion::{
    find_zero_divisors, is_zero_divisor_pair, sedenion_product, signed_pair_elements, Sedenion,
    ZeroDivisorPair,
};

use crate::error::{NumericError, Result};
use crate::stats;

/// Negates every component except the real part.
pub(crate) fn conjugate_components<const N: usize>(a: &[f64; N]) -> [f64; N] {
    let mut out = a.map(|x| -x);
    out[0] = a[0];
    out
}

/// `conj(a) / ‖a‖²`, failing on a zero (or non-finite) norm.
pub(crate) fn inverse_components<const N: usize>(a: &[f64; N]) -> Result<[f64; N]> {
    let n2 = stats::norm_squared(a);
    if n2 == 0.0 || !n2.is_finite() {
        return Err(NumericError::invalid(format!(
            "cannot invert element with squared norm {n2}"
        )));
    }
    Ok(conjugate_components(a).map(|x| x / n2))
}

pub(crate) fn components_from_slice<const N: usize>(data: &[f64]) -> Result<[f64; N]> {
    <[f64; N]>::try_from(data).map_err(|_| NumericError::dimension(N, data.len()))
}
