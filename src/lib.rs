//! # prime-resonance
//!
//! Small numeric primitives behind a set of interactive "prime resonance"
//! demonstrations.
//!
//! Every routine is implemented once here and shared by all consumers. The
//! crate knows nothing about rendering, widgets or event loops; it only
//! turns numbers into numbers.
//!
//! ## Modules
//!
//! - [`info`]: Shannon entropy, coherence and normalization
//! - [`born`]: Born-rule sampling and partial collapse
//! - [`hypercomplex`]: quaternion and sedenion arithmetic, zero-divisor search
//! - [`number_theory`]: Legendre symbols, prime coupling matrices, Borromean check
//! - [`oscillator`]: Kuramoto phase dynamics and the order parameter
//! - [`dynamics`]: Lyapunov estimates, stability classes, cubic free energy
//! - [`driver`]: periodic background stepping of a pure state function
//! - [`stats`], [`random`]: compensated sums and pluggable uniform sources
//! - [`config`], [`error`]: tunable thresholds and the shared error type
//!
//! ## Design Philosophy
//!
//! - **Fail fast**: malformed input returns a [`NumericError`] instead of
//!   letting `NaN` reach a caller
//! - **Injectable randomness**: sampling takes any [`random::UnitSource`],
//!   so tests can script the exact stream of uniforms
//! - **Property-based testing**: algebraic identities verified via proptest

pub mod born;
pub mod config;
pub mod driver;
pub mod dynamics;
pub mod error;
pub mod hypercomplex;
pub mod info;
pub mod number_theory;
pub mod oscillator;
pub mod random;
pub mod stats;

pub use error::{NumericError, Result};
