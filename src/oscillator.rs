//! Kuramoto phase oscillators, optionally coupled through Legendre symbols.
//!
//! ```text
//! dθᵢ/dt = ωᵢ + (K/N) Σ_{j≠i} J[i][j] · sin(θⱼ − θᵢ)
//! ```
//!
//! Without a coupling matrix every `J[i][j]` (i ≠ j) is 1, the classic
//! all-to-all model. With a [`CouplingMatrix`] the weights are the Legendre
//! symbols `(pᵢ/pⱼ)` and may be negative (repulsive) or zero.
//!
//! Integration is one explicit Euler step per call. Phases are always
//! wrapped into `[0, 2π)` after the update.
//!
//! The order parameter `r = |(1/N) Σ e^{iθⱼ}|` measures synchrony:
//! r ≈ 0 for spread-out phases, r = 1 for perfect alignment.

use std::f64::consts::TAU;

use crate::config::KuramotoConfig;
use crate::error::{ensure_finite, NumericError, Result};
use crate::number_theory::CouplingMatrix;
use crate::stats::kahan_sum;

/// Reduces an angle into `[0, 2π)`.
pub fn wrap_phase(theta: f64) -> f64 {
    let w = theta.rem_euclid(TAU);
    // rem_euclid rounds tiny negative angles up to exactly 2π
    if w >= TAU {
        0.0
    } else {
        w
    }
}

fn check_inputs(
    phases: &[f64],
    frequencies: &[f64],
    coupling: Option<&CouplingMatrix>,
) -> Result<()> {
    if phases.is_empty() {
        return Err(NumericError::EmptyInput("phases"));
    }
    if frequencies.len() != phases.len() {
        return Err(NumericError::dimension(phases.len(), frequencies.len()));
    }
    if let Some(j) = coupling {
        if j.size() != phases.len() {
            return Err(NumericError::dimension(phases.len(), j.size()));
        }
    }
    ensure_finite(phases, "phases")?;
    ensure_finite(frequencies, "frequencies")
}

/// Euler step on pre-validated inputs.
///
/// Fails if an updated phase overflows before wrapping.
fn integrate(
    phases: &[f64],
    frequencies: &[f64],
    coupling: Option<&CouplingMatrix>,
    strength: f64,
    dt: f64,
) -> Result<Vec<f64>> {
    let n = phases.len();
    let k_over_n = strength / n as f64;
    (0..n)
        .map(|i| {
            let theta_i = phases[i];
            let pull = kahan_sum((0..n).filter(|&j| j != i).map(|j| {
                let w = coupling.map_or(1.0, |m| m.weight(i, j));
                w * (phases[j] - theta_i).sin()
            }));
            let next = theta_i + dt * (frequencies[i] + k_over_n * pull);
            if !next.is_finite() {
                return Err(NumericError::invalid(format!(
                    "phase[{i}] is not finite after the step ({next})"
                )));
            }
            Ok(wrap_phase(next))
        })
        .collect()
}

/// One Euler step of the (optionally Legendre-weighted) Kuramoto model.
///
/// Returns the new phases, each wrapped into `[0, 2π)`.
///
/// # Errors
/// - `EmptyInput` if `phases` is empty.
/// - `DimensionMismatch` if `frequencies` or `coupling` do not match
///   the number of phases.
/// - `InvalidOperand` for non-finite phases, frequencies, `strength` or `dt`,
///   or when an updated phase overflows.
///
/// # Examples
/// ```
/// use prime_resonance::oscillator::{kuramoto_step, order_parameter};
/// let phases = [0.0, 1.0, 2.0];
/// let next = kuramoto_step(&phases, &[0.0; 3], None, 2.0, 0.1).unwrap();
/// assert!(order_parameter(&next).unwrap() > order_parameter(&phases).unwrap());
/// ```
pub fn kuramoto_step(
    phases: &[f64],
    frequencies: &[f64],
    coupling: Option<&CouplingMatrix>,
    strength: f64,
    dt: f64,
) -> Result<Vec<f64>> {
    check_inputs(phases, frequencies, coupling)?;
    ensure_finite(&[strength, dt], "step parameters")?;
    integrate(phases, frequencies, coupling, strength, dt)
}

fn mean_vector(phases: &[f64]) -> Result<(f64, f64)> {
    if phases.is_empty() {
        return Err(NumericError::EmptyInput("phases"));
    }
    ensure_finite(phases, "phases")?;
    Ok(resultant(phases))
}

/// `(1/N) Σ (cos θ, sin θ)` for non-empty, finite phases.
fn resultant(phases: &[f64]) -> (f64, f64) {
    let n = phases.len() as f64;
    let c = kahan_sum(phases.iter().map(|t| t.cos())) / n;
    let s = kahan_sum(phases.iter().map(|t| t.sin())) / n;
    (c, s)
}

fn magnitude((c, s): (f64, f64)) -> f64 {
    // rounding can push a perfectly aligned ensemble a hair above 1
    c.hypot(s).min(1.0)
}

/// Kuramoto order parameter `r ∈ [0, 1]`.
///
/// # Errors
/// `EmptyInput` for no phases, `InvalidOperand` for non-finite phases.
pub fn order_parameter(phases: &[f64]) -> Result<f64> {
    mean_vector(phases).map(magnitude)
}

/// Mean phase `ψ = arg((1/N) Σ e^{iθⱼ})` in `[0, 2π)`.
///
/// Meaningless (but finite) when `r = 0`.
///
/// # Errors
/// Same as [`order_parameter`].
pub fn mean_phase(phases: &[f64]) -> Result<f64> {
    let (c, s) = mean_vector(phases)?;
    Ok(wrap_phase(s.atan2(c)))
}

/// Oscillators with their natural frequencies and optional prime coupling.
///
/// The phases are non-empty and finite at all times: construction checks
/// them, and every mutator validates its input and leaves the ensemble
/// untouched on error.
#[derive(Debug, Clone, PartialEq)]
pub struct OscillatorEnsemble {
    phases: Vec<f64>,
    frequencies: Vec<f64>,
    coupling: Option<CouplingMatrix>,
    coupling_strength: f64,
}

impl OscillatorEnsemble {
    /// All-to-all ensemble. Initial phases are wrapped into `[0, 2π)`.
    ///
    /// # Errors
    /// As for [`kuramoto_step`].
    pub fn new(phases: Vec<f64>, frequencies: Vec<f64>, coupling_strength: f64) -> Result<Self> {
        Self::build(phases, frequencies, None, coupling_strength)
    }

    /// Ensemble whose coupling weights are the Legendre symbols of
    /// `matrix`, one oscillator per prime.
    ///
    /// # Errors
    /// As for [`kuramoto_step`].
    pub fn with_coupling(
        phases: Vec<f64>,
        frequencies: Vec<f64>,
        matrix: CouplingMatrix,
        coupling_strength: f64,
    ) -> Result<Self> {
        Self::build(phases, frequencies, Some(matrix), coupling_strength)
    }

    /// Like [`Self::new`] but with `K` taken from `config`.
    pub fn from_config(
        phases: Vec<f64>,
        frequencies: Vec<f64>,
        config: &KuramotoConfig,
    ) -> Result<Self> {
        config.validate()?;
        Self::new(phases, frequencies, config.coupling_strength)
    }

    fn build(
        phases: Vec<f64>,
        frequencies: Vec<f64>,
        coupling: Option<CouplingMatrix>,
        coupling_strength: f64,
    ) -> Result<Self> {
        check_inputs(&phases, &frequencies, coupling.as_ref())?;
        ensure_finite(&[coupling_strength], "coupling_strength")?;
        Ok(Self {
            phases: phases.into_iter().map(wrap_phase).collect(),
            frequencies,
            coupling,
            coupling_strength,
        })
    }

    pub fn len(&self) -> usize {
        self.phases.len()
    }

    /// Always false: construction rejects empty ensembles.
    pub fn is_empty(&self) -> bool {
        self.phases.is_empty()
    }

    pub fn phases(&self) -> &[f64] {
        &self.phases
    }

    pub fn frequencies(&self) -> &[f64] {
        &self.frequencies
    }

    pub fn coupling(&self) -> Option<&CouplingMatrix> {
        self.coupling.as_ref()
    }

    pub fn coupling_strength(&self) -> f64 {
        self.coupling_strength
    }

    /// # Errors
    /// `InvalidOperand` if `k` is not finite.
    pub fn set_coupling_strength(&mut self, k: f64) -> Result<()> {
        ensure_finite(&[k], "coupling_strength")?;
        self.coupling_strength = k;
        Ok(())
    }

    /// Advances the ensemble in place by `dt`.
    ///
    /// # Errors
    /// `InvalidOperand` if `dt` is not finite or a phase overflows; the
    /// phases are left unchanged.
    pub fn advance(&mut self, dt: f64) -> Result<()> {
        ensure_finite(&[dt], "dt")?;
        self.phases = integrate(
            &self.phases,
            &self.frequencies,
            self.coupling.as_ref(),
            self.coupling_strength,
            dt,
        )?;
        Ok(())
    }

    /// Returns the ensemble advanced by `dt`, leaving `self` untouched.
    ///
    /// # Errors
    /// As for [`Self::advance`].
    pub fn stepped(&self, dt: f64) -> Result<Self> {
        let mut next = self.clone();
        next.advance(dt)?;
        Ok(next)
    }

    pub fn order_parameter(&self) -> f64 {
        magnitude(resultant(&self.phases))
    }

    pub fn mean_phase(&self) -> f64 {
        let (c, s) = resultant(&self.phases);
        wrap_phase(s.atan2(c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{create_rng, UnitSource};
    use std::f64::consts::PI;

    #[test]
    fn test_wrap_phase() {
        assert_eq!(wrap_phase(0.0), 0.0);
        assert!((wrap_phase(3.0 * PI) - PI).abs() < 1e-12);
        assert!((wrap_phase(-PI / 2.0) - 1.5 * PI).abs() < 1e-12);
        let tiny = wrap_phase(-1e-18);
        assert!((0.0..TAU).contains(&tiny));
    }

    #[test]
    fn test_order_parameter_extremes() {
        assert!((order_parameter(&[1.3; 5]).unwrap() - 1.0).abs() < 1e-12);
        let spread: Vec<f64> = (0..4).map(|i| i as f64 * PI / 2.0).collect();
        assert!(order_parameter(&spread).unwrap() < 1e-12);
        assert_eq!(
            order_parameter(&[]),
            Err(NumericError::EmptyInput("phases"))
        );
    }

    #[test]
    fn test_mean_phase() {
        let psi = mean_phase(&[0.1, 0.3]).unwrap();
        assert!((psi - 0.2).abs() < 1e-12);
        let psi = mean_phase(&[-0.1, 0.1 - TAU]).unwrap();
        assert!(psi.abs() < 1e-9 || (psi - TAU).abs() < 1e-9);
    }

    #[test]
    fn test_uncoupled_step_is_free_rotation() {
        let next = kuramoto_step(&[0.5, 1.0], &[1.0, -2.0], None, 0.0, 0.25).unwrap();
        assert!((next[0] - 0.75).abs() < 1e-15);
        assert!((next[1] - 0.5).abs() < 1e-15);
    }

    #[test]
    fn test_step_matches_formula() {
        let phases = [0.0, 1.0, 2.5];
        let freqs = [0.3, 0.1, -0.2];
        let (k, dt) = (1.5, 0.01);
        let next = kuramoto_step(&phases, &freqs, None, k, dt).unwrap();
        for i in 0..3 {
            let sum: f64 = (0..3)
                .filter(|&j| j != i)
                .map(|j| (phases[j] - phases[i]).sin())
                .sum();
            let expected = wrap_phase(phases[i] + dt * (freqs[i] + k / 3.0 * sum));
            assert!((next[i] - expected).abs() < 1e-12);
        }
    }

    #[test]
    fn test_step_wraps_phases() {
        let next = kuramoto_step(&[TAU - 0.01], &[1.0], None, 0.0, 0.1).unwrap();
        assert!((next[0] - 0.09).abs() < 1e-9);
    }

    #[test]
    fn test_legendre_weights_change_the_pull() {
        // primes 3 and 7: (3/7) = -1, (7/3) = 1
        let j = CouplingMatrix::new(&[3, 7]).unwrap();
        let phases = [0.0, 1.0];
        let next = kuramoto_step(&phases, &[0.0, 0.0], Some(&j), 1.0, 0.1).unwrap();
        // oscillator 0 is repelled from 1, oscillator 1 is attracted to 0
        assert!(next[0] > TAU - 0.1);
        assert!(next[1] < 1.0);
    }

    #[test]
    fn test_step_errors() {
        assert!(matches!(
            kuramoto_step(&[0.0, 1.0], &[0.0], None, 1.0, 0.1),
            Err(NumericError::DimensionMismatch {
                expected: 2,
                actual: 1
            })
        ));
        let j = CouplingMatrix::new(&[3, 5, 7]).unwrap();
        assert!(kuramoto_step(&[0.0, 1.0], &[0.0, 0.0], Some(&j), 1.0, 0.1).is_err());
        assert!(kuramoto_step(&[], &[], None, 1.0, 0.1).is_err());
        assert!(kuramoto_step(&[0.0], &[0.0], None, f64::NAN, 0.1).is_err());
    }

    #[test]
    fn test_ensemble_synchronizes() {
        let mut rng = create_rng(5);
        let phases: Vec<f64> = (0..10).map(|_| rng.next_unit() * TAU).collect();
        let mut ens = OscillatorEnsemble::new(phases, vec![0.0; 10], 3.0).unwrap();
        let r0 = ens.order_parameter();
        for _ in 0..2000 {
            ens.advance(0.05).unwrap();
        }
        assert!(ens.order_parameter() > r0);
        assert!(ens.order_parameter() > 0.999);
    }

    #[test]
    fn test_ensemble_stepped_is_pure() {
        let ens = OscillatorEnsemble::new(vec![0.0, 2.0], vec![0.0, 0.0], 1.0).unwrap();
        let next = ens.stepped(0.1).unwrap();
        assert_eq!(ens.phases(), &[0.0, 2.0]);
        assert_ne!(next.phases(), ens.phases());
    }

    #[test]
    fn test_ensemble_construction() {
        let ens = OscillatorEnsemble::new(vec![-PI, 7.0], vec![1.0, 1.0], 0.5).unwrap();
        assert!(ens.phases().iter().all(|p| (0.0..TAU).contains(p)));
        assert_eq!(ens.len(), 2);
        assert!(!ens.is_empty());

        let j = CouplingMatrix::new(&[2, 3, 5]).unwrap();
        assert!(OscillatorEnsemble::with_coupling(vec![0.0; 2], vec![0.0; 2], j, 1.0).is_err());

        let cfg = KuramotoConfig {
            coupling_strength: 2.0,
            dt: 0.01,
        };
        let ens = OscillatorEnsemble::from_config(vec![0.0], vec![0.0], &cfg).unwrap();
        assert_eq!(ens.coupling_strength(), 2.0);
    }

    #[test]
    fn test_step_rejects_overflowing_phase() {
        let err = kuramoto_step(&[0.0, 1.0], &[1e308, 1e308], None, 1.0, 10.0).unwrap_err();
        assert!(matches!(err, NumericError::InvalidOperand(_)));
        assert!(err.to_string().contains("phase[0]"));
    }

    #[test]
    fn test_ensemble_rejects_non_finite_dt() {
        let mut ens = OscillatorEnsemble::new(vec![0.0, 1.0, 2.0], vec![0.0; 3], 1.0).unwrap();
        let before = ens.clone();
        assert!(matches!(
            ens.advance(f64::NAN),
            Err(NumericError::InvalidOperand(_))
        ));
        assert!(ens.advance(f64::INFINITY).is_err());
        assert!(ens.stepped(f64::NEG_INFINITY).is_err());
        assert_eq!(ens, before);
        assert!(ens.phases().iter().all(|p| p.is_finite()));
        assert!(ens.order_parameter() > 0.0);
    }

    #[test]
    fn test_ensemble_rejects_non_finite_coupling_strength() {
        let mut ens = OscillatorEnsemble::new(vec![0.0, 1.0], vec![0.0; 2], 1.0).unwrap();
        assert!(ens.set_coupling_strength(f64::INFINITY).is_err());
        assert!(ens.set_coupling_strength(f64::NAN).is_err());
        assert_eq!(ens.coupling_strength(), 1.0);
        ens.advance(0.1).unwrap();
        assert!(ens.phases().iter().all(|p| (0.0..TAU).contains(p)));

        ens.set_coupling_strength(-2.0).unwrap();
        assert_eq!(ens.coupling_strength(), -2.0);
    }

    #[test]
    fn test_ensemble_overflow_leaves_state_untouched() {
        let mut ens = OscillatorEnsemble::new(vec![0.0, 1.0], vec![1e308, 1e308], 1.0).unwrap();
        let before = ens.clone();
        assert!(ens.advance(10.0).is_err());
        assert_eq!(ens, before);
    }

    #[test]
    fn test_ensemble_accessors_match_free_functions() {
        let ens = OscillatorEnsemble::new(vec![0.1, 0.3, 2.0], vec![0.0; 3], 1.0).unwrap();
        assert_eq!(ens.order_parameter(), order_parameter(ens.phases()).unwrap());
        assert_eq!(ens.mean_phase(), mean_phase(ens.phases()).unwrap());
    }
}
