//! Quaternions `w + xi + yj + zk` with the Hamilton product.

use std::ops::{Add, Mul, Neg, Sub};

use super::{components_from_slice, conjugate_components, inverse_components};
use crate::error::{ensure_finite, NumericError, Result};
use crate::stats;

/// A quaternion stored as `[w, x, y, z]`.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Quaternion(pub [f64; 4]);

impl Quaternion {
    pub const ONE: Quaternion = Quaternion([1.0, 0.0, 0.0, 0.0]);
    pub const I: Quaternion = Quaternion([0.0, 1.0, 0.0, 0.0]);
    pub const J: Quaternion = Quaternion([0.0, 0.0, 1.0, 0.0]);
    pub const K: Quaternion = Quaternion([0.0, 0.0, 0.0, 1.0]);

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self {
        Quaternion([w, x, y, z])
    }

    pub fn components(&self) -> [f64; 4] {
        self.0
    }

    /// Hamilton product `self · other`.
    pub fn hamilton(&self, other: &Quaternion) -> Quaternion {
        let [a1, b1, c1, d1] = self.0;
        let [a2, b2, c2, d2] = other.0;
        Quaternion([
            a1 * a2 - b1 * b2 - c1 * c2 - d1 * d2,
            a1 * b2 + b1 * a2 + c1 * d2 - d1 * c2,
            a1 * c2 - b1 * d2 + c1 * a2 + d1 * b2,
            a1 * d2 + b1 * c2 - c1 * b2 + d1 * a2,
        ])
    }

    pub fn conjugate(&self) -> Quaternion {
        Quaternion(conjugate_components(&self.0))
    }

    pub fn norm_squared(&self) -> f64 {
        stats::norm_squared(&self.0)
    }

    pub fn norm(&self) -> f64 {
        stats::norm(&self.0)
    }

    /// Multiplicative inverse `conj(q) / ‖q‖²`.
    ///
    /// # Errors
    /// `InvalidOperand` for the zero quaternion.
    pub fn inverse(&self) -> Result<Quaternion> {
        inverse_components(&self.0).map(Quaternion)
    }

    /// Commutator norm `‖ab − ba‖`.
    pub fn commutator_norm(&self, other: &Quaternion) -> f64 {
        (self.hamilton(other) - other.hamilton(self)).norm()
    }
}

impl From<[f64; 4]> for Quaternion {
    fn from(c: [f64; 4]) -> Self {
        Quaternion(c)
    }
}

impl TryFrom<&[f64]> for Quaternion {
    type Error = NumericError;

    fn try_from(data: &[f64]) -> Result<Self> {
        components_from_slice(data).map(Quaternion)
    }
}

impl Mul for Quaternion {
    type Output = Quaternion;

    fn mul(self, rhs: Quaternion) -> Quaternion {
        self.hamilton(&rhs)
    }
}

impl Add for Quaternion {
    type Output = Quaternion;

    fn add(self, rhs: Quaternion) -> Quaternion {
        Quaternion(std::array::from_fn(|i| self.0[i] + rhs.0[i]))
    }
}

impl Sub for Quaternion {
    type Output = Quaternion;

    fn sub(self, rhs: Quaternion) -> Quaternion {
        Quaternion(std::array::from_fn(|i| self.0[i] - rhs.0[i]))
    }
}

impl Neg for Quaternion {
    type Output = Quaternion;

    fn neg(self) -> Quaternion {
        Quaternion(self.0.map(|x| -x))
    }
}

/// Hamilton product of two 4-component slices.
///
/// # Errors
/// - `DimensionMismatch` unless both slices have exactly 4 components.
/// - `InvalidOperand` if any component is NaN or infinite.
///
/// # Examples
/// ```
/// use prime_resonance::hypercomplex::quaternion_product;
/// let ab = quaternion_product(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0]).unwrap();
/// assert_eq!(ab.components(), [-60.0, 12.0, 30.0, 24.0]);
/// ```
pub fn quaternion_product(a: &[f64], b: &[f64]) -> Result<Quaternion> {
    let (a, b) = finite_pair(a, b)?;
    Ok(a * b)
}

/// Euclidean norm of `ab − ba` for two 4-component slices.
///
/// Zero exactly when the vector parts are parallel (or either is real).
///
/// # Errors
/// As for [`quaternion_product`].
pub fn non_commutativity(a: &[f64], b: &[f64]) -> Result<f64> {
    let (a, b) = finite_pair(a, b)?;
    Ok(a.commutator_norm(&b))
}

fn finite_pair(a: &[f64], b: &[f64]) -> Result<(Quaternion, Quaternion)> {
    let qa = Quaternion::try_from(a)?;
    let qb = Quaternion::try_from(b)?;
    ensure_finite(a, "a")?;
    ensure_finite(b, "b")?;
    Ok((qa, qb))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basis_relations() {
        let (i, j, k) = (Quaternion::I, Quaternion::J, Quaternion::K);
        assert_eq!(i * j, k);
        assert_eq!(j * k, i);
        assert_eq!(k * i, j);
        assert_eq!(j * i, -k);
        assert_eq!(i * i, -Quaternion::ONE);
        assert_eq!(i * j * k, -Quaternion::ONE);
    }

    #[test]
    fn test_product_is_not_commutative() {
        let a = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let b = Quaternion::new(5.0, 6.0, 7.0, 8.0);
        assert_eq!((a * b).components(), [-60.0, 12.0, 30.0, 24.0]);
        assert_eq!((b * a).components(), [-60.0, 20.0, 14.0, 32.0]);
        assert_ne!(a * b, b * a);
    }

    #[test]
    fn test_non_commutativity_value() {
        let nc = non_commutativity(&[1.0, 2.0, 3.0, 4.0], &[5.0, 6.0, 7.0, 8.0]).unwrap();
        // ab - ba = (0, -8, 16, -8)
        assert!((nc - 384.0_f64.sqrt()).abs() < 1e-12);
        assert!(nc > 0.0);
    }

    #[test]
    fn test_parallel_vectors_commute() {
        let nc = non_commutativity(&[1.0, 1.0, 2.0, 3.0], &[-4.0, 2.0, 4.0, 6.0]).unwrap();
        assert_eq!(nc, 0.0);
    }

    #[test]
    fn test_inverse() {
        let q = Quaternion::new(1.0, 2.0, 3.0, 4.0);
        let p = q * q.inverse().unwrap();
        for (got, want) in p.components().iter().zip([1.0, 0.0, 0.0, 0.0]) {
            assert!((got - want).abs() < 1e-12);
        }
        assert!(Quaternion::default().inverse().is_err());
    }

    #[test]
    fn test_dimension_mismatch() {
        assert_eq!(
            quaternion_product(&[1.0, 2.0, 3.0], &[1.0, 2.0, 3.0, 4.0]),
            Err(NumericError::DimensionMismatch {
                expected: 4,
                actual: 3
            })
        );
        assert!(non_commutativity(&[0.0; 16], &[0.0; 4]).is_err());
    }

    #[test]
    fn test_non_finite_components_rejected() {
        let err = quaternion_product(&[f64::INFINITY, 0.0, 0.0, 0.0], &[0.0, 1.0, 0.0, 0.0])
            .unwrap_err();
        assert!(matches!(err, NumericError::InvalidOperand(_)));
        assert!(err.to_string().contains("a[0]"));

        let err = non_commutativity(&[1.0, 0.0, 0.0, 0.0], &[0.0, 0.0, f64::NAN, 0.0])
            .unwrap_err();
        assert!(err.to_string().contains("b[2]"));

        // arity is reported before finiteness
        assert!(matches!(
            quaternion_product(&[f64::NAN; 3], &[0.0; 4]),
            Err(NumericError::DimensionMismatch { .. })
        ));
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn quaternion() -> impl Strategy<Value = Quaternion> {
        proptest::array::uniform4(-10.0_f64..10.0).prop_map(Quaternion)
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(500))]

        #[test]
        fn norm_is_multiplicative(a in quaternion(), b in quaternion()) {
            let lhs = (a * b).norm();
            let rhs = a.norm() * b.norm();
            prop_assert!((lhs - rhs).abs() < 1e-9 * rhs.max(1.0));
        }

        #[test]
        fn conjugate_reverses_products(a in quaternion(), b in quaternion()) {
            let lhs = (a * b).conjugate();
            let rhs = b.conjugate() * a.conjugate();
            for (x, y) in lhs.components().iter().zip(rhs.components()) {
                prop_assert!((x - y).abs() < 1e-9);
            }
        }

        #[test]
        fn commutator_norm_is_symmetric(a in quaternion(), b in quaternion()) {
            prop_assert!((a.commutator_norm(&b) - b.commutator_norm(&a)).abs() < 1e-9);
        }
    }
}
