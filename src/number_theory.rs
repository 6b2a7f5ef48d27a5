//! Legendre symbols and the prime coupling matrix built from them.
//!
//! # Legendre symbol
//!
//! Euler's criterion: for an odd prime `p`,
//! `(a/p) ≡ a^((p−1)/2) (mod p)`, which is 0, 1 or p − 1.
//! The prime 2 is degenerate and maps to 0 by convention.
//!
//! # Reciprocity and symmetry
//!
//! Quadratic reciprocity gives `(p/q)(q/p) = (−1)^((p−1)/2 · (q−1)/2)`, so
//! `(p/q)` and `(q/p)` differ whenever both primes are ≡ 3 (mod 4). The
//! coupling matrix stores `J[i][j] = (pᵢ/pⱼ)` literally with no reciprocity
//! correction, hence it is generally **not** symmetric.
//! [`CouplingMatrix::asymmetric_pairs`] lists where it is not.

use std::collections::HashSet;

use tracing::debug;

use crate::error::{NumericError, Result};

/// `base^exp mod modulus` by square-and-multiply with 128-bit intermediates.
///
/// Returns 0 when `modulus == 1`.
///
/// # Panics
/// If `modulus == 0`.
pub fn mod_pow(base: u64, mut exp: u64, modulus: u64) -> u64 {
    if modulus == 1 {
        return 0;
    }
    let m = modulus as u128;
    let mut result = 1u128;
    let mut base = base as u128 % m;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result * base % m;
        }
        exp >>= 1;
        base = base * base % m;
    }
    result as u64
}

/// Deterministic primality test by 6k ± 1 trial division.
pub fn is_prime(n: u64) -> bool {
    if n < 2 {
        return false;
    }
    if n < 4 {
        return true;
    }
    if n % 2 == 0 || n % 3 == 0 {
        return false;
    }
    let mut k = 5u64;
    while k.saturating_mul(k) <= n {
        if n % k == 0 || n % (k + 2) == 0 {
            return false;
        }
        k += 6;
    }
    true
}

/// The first `count` primes in increasing order.
///
/// # Examples
/// ```
/// use prime_resonance::number_theory::first_primes;
/// assert_eq!(first_primes(6), vec![2, 3, 5, 7, 11, 13]);
/// ```
pub fn first_primes(count: usize) -> Vec<u64> {
    (2u64..).filter(|&n| is_prime(n)).take(count).collect()
}

fn euler_criterion(a: u64, p: u64) -> i8 {
    if p < 3 {
        return 0;
    }
    match mod_pow(a % p, (p - 1) / 2, p) {
        0 => 0,
        1 => 1,
        _ => -1,
    }
}

/// Legendre symbol `(a/p)` via Euler's criterion.
///
/// - `0` if `p` divides `a`, or if `p = 2` (degenerate convention).
/// - `1` if `a` is a non-zero quadratic residue mod `p`.
/// - `−1` otherwise.
///
/// `p` is assumed to be an odd prime; for composite `p` the value is the
/// Euler-criterion expression taken literally and carries no meaning.
/// Negative `a` is reduced into `[0, p)` first.
///
/// # Examples
/// ```
/// use prime_resonance::number_theory::legendre_symbol;
/// assert_eq!(legendre_symbol(4, 7), 1);   // 2² = 4
/// assert_eq!(legendre_symbol(3, 5), -1);  // residues mod 5 are {1, 4}
/// assert_eq!(legendre_symbol(10, 5), 0);
/// assert_eq!(legendre_symbol(3, 2), 0);
/// ```
pub fn legendre_symbol(a: i64, p: u64) -> i8 {
    if p < 3 {
        return 0;
    }
    let reduced = (a as i128).rem_euclid(p as i128) as u64;
    euler_criterion(reduced, p)
}

/// Reciprocity sign `(−1)^((p−1)/2 · (q−1)/2)` for odd `p`, `q`.
pub fn reciprocity_sign(p: u64, q: u64) -> i8 {
    if (p % 4 == 3) && (q % 4 == 3) {
        -1
    } else {
        1
    }
}

fn validate_primes(primes: &[u64]) -> Result<()> {
    let mut seen = HashSet::with_capacity(primes.len());
    for &p in primes {
        if !is_prime(p) {
            return Err(NumericError::invalid(format!("{p} is not prime")));
        }
        if !seen.insert(p) {
            return Err(NumericError::invalid(format!("prime {p} appears twice")));
        }
    }
    Ok(())
}

/// Square matrix `J[i][j] = (pᵢ/pⱼ)` over an ordered set of distinct primes.
///
/// Entries are in `{−1, 0, 1}`; the diagonal is 0.
///
/// # Examples
/// ```
/// use prime_resonance::number_theory::CouplingMatrix;
/// let j = CouplingMatrix::new(&[3, 5, 7]).unwrap();
/// assert_eq!(j.get(0, 1), Some(-1)); // (3/5)
/// assert_eq!(j.get(0, 2), Some(-1)); // (3/7)
/// assert_eq!(j.get(2, 0), Some(1));  // (7/3) = (1/3)
/// assert!(!j.is_symmetric());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CouplingMatrix {
    primes: Vec<u64>,
    entries: Vec<i8>,
}

impl CouplingMatrix {
    /// Builds the matrix for `primes`, in the given order.
    ///
    /// # Errors
    /// - `EmptyInput` if `primes` is empty.
    /// - `InvalidOperand` if an entry is not prime or appears twice.
    pub fn new(primes: &[u64]) -> Result<Self> {
        if primes.is_empty() {
            return Err(NumericError::EmptyInput("prime set"));
        }
        validate_primes(primes)?;
        let n = primes.len();
        let mut entries = vec![0i8; n * n];
        for (i, &pi) in primes.iter().enumerate() {
            for (j, &pj) in primes.iter().enumerate() {
                if i != j {
                    entries[i * n + j] = euler_criterion(pi, pj);
                }
            }
        }
        let matrix = Self {
            primes: primes.to_vec(),
            entries,
        };
        debug!(
            size = n,
            symmetric = matrix.is_symmetric(),
            "built prime coupling matrix"
        );
        Ok(matrix)
    }

    /// Number of rows (= number of primes).
    pub fn size(&self) -> usize {
        self.primes.len()
    }

    pub fn primes(&self) -> &[u64] {
        &self.primes
    }

    /// Entry `(i, j)`, or `None` out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<i8> {
        let n = self.size();
        (i < n && j < n).then(|| self.entries[i * n + j])
    }

    /// Row `i`, or `None` out of range.
    pub fn row(&self, i: usize) -> Option<&[i8]> {
        let n = self.size();
        (i < n).then(|| &self.entries[i * n..(i + 1) * n])
    }

    /// Entry `(i, j)` as an `f64` weight for oscillator coupling.
    ///
    /// # Panics
    /// If `i` or `j` is out of range.
    pub fn weight(&self, i: usize, j: usize) -> f64 {
        f64::from(self.entries[i * self.size() + j])
    }

    /// Index pairs `(i, j)`, `i < j`, where `J[i][j] ≠ J[j][i]`.
    pub fn asymmetric_pairs(&self) -> Vec<(usize, usize)> {
        let n = self.size();
        let mut out = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.entries[i * n + j] != self.entries[j * n + i] {
                    out.push((i, j));
                }
            }
        }
        out
    }

    pub fn is_symmetric(&self) -> bool {
        self.asymmetric_pairs().is_empty()
    }

    /// Dense `f64` copy, row-major.
    pub fn as_weights(&self) -> Vec<Vec<f64>> {
        let n = self.size();
        (0..n)
            .map(|i| (0..n).map(|j| self.weight(i, j)).collect())
            .collect()
    }
}

/// Symbols of one prime pair in both directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairSymbols {
    pub p: u64,
    pub q: u64,
    /// `(p/q)`
    pub forward: i8,
    /// `(q/p)`
    pub backward: i8,
}

impl PairSymbols {
    fn new(p: u64, q: u64) -> Self {
        Self {
            p,
            q,
            forward: euler_criterion(p, q),
            backward: euler_criterion(q, p),
        }
    }

    /// `(p/q)·(q/p)`.
    pub fn product(&self) -> i8 {
        self.forward * self.backward
    }
}

/// Outcome of the pairwise "Borromean" screen for a prime triple.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BorromeanCheck {
    /// Pairs `(p1, p2)`, `(p1, p3)`, `(p2, p3)`.
    pub pairs: [PairSymbols; 3],
    /// All three pair products equal +1.
    pub possible: bool,
}

/// Pairwise screen for a Borromean (Rédei-linked) prime triple.
///
/// "Possible" means every pair satisfies `(p/q)·(q/p) = 1`. This is only a
/// necessary condition used as a heuristic; the Rédei symbol itself is not
/// computed, so `possible = true` is not a proof of linkage.
///
/// # Errors
/// `InvalidOperand` if an input is not prime or the primes are not distinct.
///
/// # Examples
/// ```
/// use prime_resonance::number_theory::borromean_check;
/// let check = borromean_check(5, 13, 29).unwrap();
/// assert_eq!(check.pairs[0].forward, -1); // (5/13)
/// assert!(check.possible);
/// ```
pub fn borromean_check(p1: u64, p2: u64, p3: u64) -> Result<BorromeanCheck> {
    validate_primes(&[p1, p2, p3])?;
    let pairs = [
        PairSymbols::new(p1, p2),
        PairSymbols::new(p1, p3),
        PairSymbols::new(p2, p3),
    ];
    let possible = pairs.iter().all(|s| s.product() == 1);
    Ok(BorromeanCheck { pairs, possible })
}
