//! Periodic driver for pure step functions.
//!
//! A [`Driver`] owns a background ticker thread that replaces its state with
//! `step(&state, dt)` once per interval. The ticker is cancelled and joined
//! when the driver is stopped or dropped, so a widget that lets its driver
//! go out of scope can never leave a timer running.
//!
//! The step function itself stays pure; the driver only sequences calls.
//!
//! # Examples
//! ```
//! use prime_resonance::driver::Driver;
//! use std::time::Duration;
//!
//! let driver = Driver::start(0.0_f64, Duration::from_millis(1), 0.5, |x, dt| x + dt).unwrap();
//! std::thread::sleep(Duration::from_millis(20));
//! let total = driver.stop();
//! assert!(total >= 0.0);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::config::DriverConfig;
use crate::error::{NumericError, Result};

/// Owns a ticker thread that advances shared state at a fixed interval.
pub struct Driver<S: Clone + Send + 'static> {
    state: Arc<Mutex<S>>,
    ticks: Arc<AtomicU64>,
    stop_tx: Option<mpsc::Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl<S: Clone + Send + 'static> Driver<S> {
    /// Starts ticking immediately; the first step runs after one `interval`.
    ///
    /// # Errors
    /// - `InvalidOperand` if `interval` is zero or `dt` is not finite.
    /// - `DriverStart` if the ticker thread cannot be spawned.
    pub fn start<F>(initial: S, interval: Duration, dt: f64, mut step: F) -> Result<Self>
    where
        F: FnMut(&S, f64) -> S + Send + 'static,
    {
        if interval.is_zero() {
            return Err(NumericError::invalid("driver interval must be non-zero"));
        }
        if !dt.is_finite() {
            return Err(NumericError::invalid(format!("driver dt must be finite, got {dt}")));
        }

        let state = Arc::new(Mutex::new(initial));
        let ticks = Arc::new(AtomicU64::new(0));
        let (stop_tx, stop_rx) = mpsc::channel::<()>();

        let thread_state = Arc::clone(&state);
        let thread_ticks = Arc::clone(&ticks);
        let handle = std::thread::Builder::new()
            .name("resonance-driver".to_string())
            .spawn(move || loop {
                match stop_rx.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => {
                        let mut guard = thread_state.lock();
                        let next = step(&*guard, dt);
                        *guard = next;
                        let n = thread_ticks.fetch_add(1, Ordering::Relaxed) + 1;
                        trace!(tick = n, "driver tick");
                    }
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            })
            .map_err(|e| NumericError::DriverStart(e.to_string()))?;

        debug!(interval_ms = interval.as_millis() as u64, dt, "driver started");
        Ok(Self {
            state,
            ticks,
            stop_tx: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Starts with the interval from `config`.
    pub fn from_config<F>(initial: S, config: &DriverConfig, dt: f64, step: F) -> Result<Self>
    where
        F: FnMut(&S, f64) -> S + Send + 'static,
    {
        config.validate()?;
        Self::start(
            initial,
            Duration::from_millis(config.tick_interval_ms),
            dt,
            step,
        )
    }

    /// Copy of the current state.
    pub fn snapshot(&self) -> S {
        self.state.lock().clone()
    }

    /// Number of steps applied so far.
    pub fn ticks(&self) -> u64 {
        self.ticks.load(Ordering::Relaxed)
    }

    /// True while the ticker thread is alive: false after [`Self::stop`] or
    /// once a panicking step has ended the thread.
    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Stops the ticker, waits for it to exit and returns the final state.
    pub fn stop(mut self) -> S {
        self.shutdown();
        self.state.lock().clone()
    }

    fn shutdown(&mut self) {
        if let Some(tx) = self.stop_tx.take() {
            // the ticker may already have exited
            let _ = tx.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                warn!("driver step function panicked");
            }
            debug!(ticks = self.ticks(), "driver stopped");
        }
    }
}

impl<S: Clone + Send + 'static> Drop for Driver<S> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl<S: Clone + Send + std::fmt::Debug + 'static> std::fmt::Debug for Driver<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Driver")
            .field("state", &*self.state.lock())
            .field("ticks", &self.ticks())
            .field("running", &self.is_running())
            .finish()
    }
}
