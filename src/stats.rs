//! Summation and norm helpers shared by the metric modules.
//!
//! Sums go through Neumaier's compensated summation so that long time
//! series and 16×16 product accumulations do not drift.
//!
//! Reference: Neumaier (1974), "Rundungsfehleranalyse einiger Verfahren
//! zur Summation endlicher Summen", *ZAMM* 54(1), pp. 39–51.

/// Compensated sum of an iterator of `f64`.
///
/// # Algorithm
/// Neumaier's variant of Kahan summation: the compensation term captures
/// the low-order bits of whichever operand is smaller in magnitude.
///
/// # Complexity
/// Time: O(n), Space: O(1)
///
/// # Examples
/// ```
/// use prime_resonance::stats::kahan_sum;
/// let v = [1e16, 1.0, -1e16];
/// assert_eq!(kahan_sum(v.iter().copied()), 1.0);
/// ```
pub fn kahan_sum<I: IntoIterator<Item = f64>>(values: I) -> f64 {
    let mut sum = 0.0_f64;
    let mut c = 0.0_f64;
    for x in values {
        let t = sum + x;
        if sum.abs() >= x.abs() {
            c += (sum - t) + x;
        } else {
            c += (x - t) + sum;
        }
        sum = t;
    }
    sum + c
}

/// Arithmetic mean with compensated summation.
///
/// # Returns
/// - `None` if `data` is empty or contains any NaN/Inf.
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() || !data.iter().all(|x| x.is_finite()) {
        return None;
    }
    Some(kahan_sum(data.iter().copied()) / data.len() as f64)
}

/// Squared Euclidean norm `Σ xᵢ²`.
pub fn norm_squared(data: &[f64]) -> f64 {
    kahan_sum(data.iter().map(|x| x * x))
}

/// Euclidean norm `√(Σ xᵢ²)`.
pub fn norm(data: &[f64]) -> f64 {
    norm_squared(data).sqrt()
}
