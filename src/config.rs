//! Tunable constants for the analysis and simulation helpers.
//!
//! Every struct deserializes with serde and fills missing fields from the
//! same defaults as [`Default`], so a consumer can persist only the values
//! it overrides. Nothing here reads files or environment variables.

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::error::{NumericError, Result};

/// Thresholds used by the Lyapunov estimate and stability classification.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct StabilityConfig {
    /// Consecutive differences at or below this magnitude are skipped.
    #[serde(default = "default_lyapunov_epsilon")]
    pub lyapunov_epsilon: f64,

    /// λ strictly above this value is chaotic.
    #[serde(default = "default_chaotic_threshold")]
    pub chaotic_threshold: f64,

    /// λ strictly below this value is stable.
    #[serde(default = "default_stable_threshold")]
    pub stable_threshold: f64,
}

impl Default for StabilityConfig {
    fn default() -> Self {
        Self {
            lyapunov_epsilon: default_lyapunov_epsilon(),
            chaotic_threshold: default_chaotic_threshold(),
            stable_threshold: default_stable_threshold(),
        }
    }
}

impl StabilityConfig {
    /// # Errors
    /// `InvalidOperand` if `lyapunov_epsilon` is negative or the stable
    /// threshold is not below the chaotic one.
    pub fn validate(&self) -> Result<()> {
        if !(self.lyapunov_epsilon >= 0.0 && self.lyapunov_epsilon.is_finite()) {
            return Err(reject(format!(
                "lyapunov_epsilon must be finite and >= 0, got {}",
                self.lyapunov_epsilon
            )));
        }
        if !(self.stable_threshold < self.chaotic_threshold) {
            return Err(reject(format!(
                "stable_threshold ({}) must be below chaotic_threshold ({})",
                self.stable_threshold, self.chaotic_threshold
            )));
        }
        Ok(())
    }
}

/// Parameters of a Kuramoto integration step.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct KuramotoConfig {
    /// Global coupling strength K.
    #[serde(default = "default_coupling_strength")]
    pub coupling_strength: f64,

    /// Euler step size in simulated seconds.
    #[serde(default = "default_dt")]
    pub dt: f64,
}

impl Default for KuramotoConfig {
    fn default() -> Self {
        Self {
            coupling_strength: default_coupling_strength(),
            dt: default_dt(),
        }
    }
}

impl KuramotoConfig {
    /// # Errors
    /// `InvalidOperand` if either value is non-finite or `dt <= 0`.
    pub fn validate(&self) -> Result<()> {
        if !self.coupling_strength.is_finite() {
            return Err(reject(format!(
                "coupling_strength must be finite, got {}",
                self.coupling_strength
            )));
        }
        if !(self.dt > 0.0 && self.dt.is_finite()) {
            return Err(reject(format!("dt must be finite and > 0, got {}", self.dt)));
        }
        Ok(())
    }
}

/// Threshold for the raw-product zero-divisor test.
#[derive(Debug, Clone, Copy, PartialEq, Deserialize, Serialize)]
pub struct ZeroDivisorConfig {
    /// `‖ab‖ / (‖a‖·‖b‖)` below this ratio counts as a zero divisor pair.
    #[serde(default = "default_threshold_ratio")]
    pub threshold_ratio: f64,
}

impl Default for ZeroDivisorConfig {
    fn default() -> Self {
        Self {
            threshold_ratio: default_threshold_ratio(),
        }
    }
}

impl ZeroDivisorConfig {
    /// # Errors
    /// `InvalidOperand` if the ratio is not a positive finite number.
    pub fn validate(&self) -> Result<()> {
        if !(self.threshold_ratio > 0.0 && self.threshold_ratio.is_finite()) {
            return Err(reject(format!(
                "threshold_ratio must be finite and > 0, got {}",
                self.threshold_ratio
            )));
        }
        Ok(())
    }
}

/// Tick interval of a [`crate::driver::Driver`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct DriverConfig {
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
        }
    }
}

impl DriverConfig {
    /// # Errors
    /// `InvalidOperand` if the interval is zero.
    pub fn validate(&self) -> Result<()> {
        if self.tick_interval_ms == 0 {
            return Err(reject("tick_interval_ms must be > 0".to_string()));
        }
        Ok(())
    }
}

/// All tunables in one place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Deserialize, Serialize)]
pub struct ResonanceConfig {
    #[serde(default)]
    pub stability: StabilityConfig,
    #[serde(default)]
    pub kuramoto: KuramotoConfig,
    #[serde(default)]
    pub zero_divisor: ZeroDivisorConfig,
    #[serde(default)]
    pub driver: DriverConfig,
}

impl ResonanceConfig {
    /// Validates every section, reporting the first failure.
    pub fn validate(&self) -> Result<()> {
        self.stability.validate()?;
        self.kuramoto.validate()?;
        self.zero_divisor.validate()?;
        self.driver.validate()
    }
}

fn reject(msg: String) -> NumericError {
    warn!(reason = %msg, "rejecting configuration");
    NumericError::InvalidOperand(msg)
}

// ============================================================================
// Serde default functions
// ============================================================================

fn default_lyapunov_epsilon() -> f64 {
    1e-10
}

fn default_chaotic_threshold() -> f64 {
    0.01
}

fn default_stable_threshold() -> f64 {
    -0.1
}

fn default_coupling_strength() -> f64 {
    1.0
}

fn default_dt() -> f64 {
    0.05
}

fn default_threshold_ratio() -> f64 {
    1e-6
}

fn default_tick_interval_ms() -> u64 {
    50
}
