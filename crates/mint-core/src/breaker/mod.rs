//! Circuit breaker.
//!
//! # States
//! - Closed: calls pass through, outcomes are counted
//! - Open: the backend is assumed degraded, calls fail fast
//! - HalfOpen: the cooldown has elapsed, a single probe call is let through
//!
//! # State Transitions
//! ```text
//! Closed   → Open:     failure ratio >= threshold within the window
//!                      (once at least `minimum_calls` were observed)
//! Open     → HalfOpen: cooldown (`circuit_duration`) elapsed
//! HalfOpen → Closed:   probe succeeds, counters reset
//! HalfOpen → Open:     probe fails, cooldown restarts
//! ```
//!
//! One breaker is meant to be shared (behind an `Arc`) by every call a client
//! makes. All transitions happen under a single mutex, so racing calls observe
//! one consistent state.

mod window;

use crate::error::{Classify, FailureClass, ResilienceError};
use std::future::Future;
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use window::RollingWindow;

/// Circuit breaker state as observed by callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CircuitState {
    /// Normal operation
    Closed,
    /// Failure threshold exceeded, calls fail fast
    Open,
    /// Cooldown elapsed, a probe call decides the next state
    HalfOpen,
}

impl std::fmt::Display for CircuitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Closed => write!(f, "closed"),
            Self::Open => write!(f, "open"),
            Self::HalfOpen => write!(f, "half-open"),
        }
    }
}

/// Circuit breaker configuration.
///
/// The defaults protect a backend known to rate-limit aggressively: a long
/// cooldown that outlasts its rate-limit windows, and a high failure threshold.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerConfig {
    /// Failure percentage (0-100) at or above which the breaker opens
    pub threshold: u8,
    /// Length of the rolling observation window
    pub window: Duration,
    /// Number of buckets the window is divided into
    pub buckets: u32,
    /// Calls that must be observed in the window before the ratio is evaluated
    pub minimum_calls: u32,
    /// How long the breaker stays open before allowing a probe
    pub circuit_duration: Duration,
    /// Count rejected credentials as failures
    pub count_rejections: bool,
}

impl Default for CircuitBreakerConfig {
    fn default() -> Self {
        Self {
            threshold: 80,
            window: Duration::from_secs(60),
            buckets: 60,
            minimum_calls: 10,
            circuit_duration: Duration::from_secs(3 * 60 * 60),
            count_rejections: false,
        }
    }
}

/// Point-in-time view of a breaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitBreakerStats {
    /// Current state
    pub state: CircuitState,
    /// Successes in the rolling window
    pub successes: u32,
    /// Failures in the rolling window
    pub failures: u32,
    /// Calls refused since the breaker was created
    pub rejected_calls: u64,
    /// When the breaker last opened, if it is not closed
    pub opened_at: Option<Instant>,
}

impl CircuitBreakerStats {
    /// Failure percentage in the rolling window.
    pub fn failure_percentage(&self) -> f64 {
        let total = self.successes + self.failures;
        if total == 0 {
            0.0
        } else {
            f64::from(self.failures) * 100.0 / f64::from(total)
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Phase {
    Closed,
    Open { opened_at: Instant },
    HalfOpen { opened_at: Instant, probe_in_flight: bool },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Verdict {
    Success,
    Failure,
    Ignored,
}

#[derive(Debug)]
struct Inner {
    phase: Phase,
    window: RollingWindow,
    rejected_calls: u64,
}

/// Failure-rate circuit breaker wrapping arbitrary async operations.
///
/// # Examples
///
/// ```rust
/// use mint_core::breaker::{CircuitBreaker, CircuitBreakerConfig, CircuitState};
/// use mint_core::{Classify, FailureClass, ResilienceError};
///
/// #[derive(Debug)]
/// enum Error {
///     Down,
///     Breaker(ResilienceError),
/// }
///
/// impl Classify for Error {
///     fn failure_class(&self) -> FailureClass {
///         FailureClass::Transient
///     }
/// }
///
/// impl From<ResilienceError> for Error {
///     fn from(err: ResilienceError) -> Self {
///         Error::Breaker(err)
///     }
/// }
///
/// # async fn example() {
/// let breaker = CircuitBreaker::new(CircuitBreakerConfig {
///     minimum_calls: 2,
///     ..Default::default()
/// });
///
/// for _ in 0..2 {
///     let _ = breaker.exec(|| async { Err::<(), _>(Error::Down) }).await;
/// }
/// assert_eq!(breaker.state(), CircuitState::Open);
///
/// let result = breaker.exec(|| async { Ok::<_, Error>(()) }).await;
/// assert!(matches!(result, Err(Error::Breaker(ResilienceError::CircuitOpen))));
/// # }
/// ```
#[derive(Debug)]
pub struct CircuitBreaker {
    config: CircuitBreakerConfig,
    inner: Mutex<Inner>,
}

impl CircuitBreaker {
    /// Create a closed breaker.
    pub fn new(config: CircuitBreakerConfig) -> Self {
        let window = RollingWindow::new(config.window, config.buckets);
        Self {
            config,
            inner: Mutex::new(Inner {
                phase: Phase::Closed,
                window,
                rejected_calls: 0,
            }),
        }
    }

    /// The breaker's configuration.
    pub fn config(&self) -> &CircuitBreakerConfig {
        &self.config
    }

    /// Run `operation` unless the breaker is open.
    ///
    /// When the breaker refuses the call, `operation` is not invoked and
    /// [`ResilienceError::CircuitOpen`] is returned converted into `E`.
    /// Otherwise the operation's own result is returned unchanged after its
    /// outcome has been recorded.
    pub async fn exec<F, Fut, T, E>(&self, operation: F) -> Result<T, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
        E: Classify + From<ResilienceError>,
    {
        let permit = self.acquire()?;
        let result = operation().await;

        let verdict = match &result {
            Ok(_) => Verdict::Success,
            Err(err) => self.verdict_for(err.failure_class()),
        };
        permit.settle(verdict);

        result
    }

    /// Effective state. An open breaker whose cooldown has elapsed reports
    /// `HalfOpen`: the next call would be let through as a probe.
    pub fn state(&self) -> CircuitState {
        let inner = self.lock();
        self.observed_state(inner.phase, Instant::now())
    }

    /// Snapshot of the breaker's counters.
    pub fn stats(&self) -> CircuitBreakerStats {
        let mut inner = self.lock();
        let now = Instant::now();
        let (successes, failures) = inner.window.totals(now);
        let opened_at = match inner.phase {
            Phase::Closed => None,
            Phase::Open { opened_at } | Phase::HalfOpen { opened_at, .. } => Some(opened_at),
        };

        CircuitBreakerStats {
            state: self.observed_state(inner.phase, now),
            successes,
            failures,
            rejected_calls: inner.rejected_calls,
            opened_at,
        }
    }

    /// Force the breaker closed and clear its window.
    pub fn reset(&self) {
        let mut inner = self.lock();
        inner.phase = Phase::Closed;
        inner.window.clear();

        #[cfg(feature = "tracing")]
        tracing::info!("Circuit breaker reset");
    }

    fn acquire(&self) -> Result<Permit<'_>, ResilienceError> {
        let mut inner = self.lock();
        let now = Instant::now();

        match inner.phase {
            Phase::Closed => Ok(Permit::new(self, false)),
            Phase::Open { opened_at }
                if now.duration_since(opened_at) >= self.config.circuit_duration =>
            {
                inner.phase = Phase::HalfOpen {
                    opened_at,
                    probe_in_flight: true,
                };

                #[cfg(feature = "tracing")]
                tracing::info!("Circuit breaker half-open, letting a probe call through");

                Ok(Permit::new(self, true))
            }
            Phase::HalfOpen {
                opened_at,
                probe_in_flight: false,
            } => {
                inner.phase = Phase::HalfOpen {
                    opened_at,
                    probe_in_flight: true,
                };
                Ok(Permit::new(self, true))
            }
            Phase::Open { .. } | Phase::HalfOpen { .. } => {
                inner.rejected_calls += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!(rejected_calls = inner.rejected_calls, "Circuit breaker open, call refused");

                Err(ResilienceError::CircuitOpen)
            }
        }
    }

    fn verdict_for(&self, class: FailureClass) -> Verdict {
        match class {
            FailureClass::Transient => Verdict::Failure,
            FailureClass::Rejected if self.config.count_rejections => Verdict::Failure,
            FailureClass::Rejected | FailureClass::Aborted => Verdict::Ignored,
        }
    }

    fn record(&self, probe: bool, verdict: Verdict) {
        let mut inner = self.lock();
        let now = Instant::now();

        if probe {
            match verdict {
                Verdict::Success => {
                    inner.phase = Phase::Closed;
                    inner.window.clear();

                    #[cfg(feature = "tracing")]
                    tracing::info!("Probe call succeeded, circuit breaker closed");
                }
                Verdict::Failure => {
                    inner.phase = Phase::Open { opened_at: now };

                    #[cfg(feature = "tracing")]
                    tracing::warn!(cooldown = ?self.config.circuit_duration, "Probe call failed, circuit breaker re-opened");
                }
                Verdict::Ignored => self.release_probe(&mut inner),
            }
            return;
        }

        match verdict {
            Verdict::Success => inner.window.record(now, true),
            Verdict::Failure => {
                inner.window.record(now, false);
                if matches!(inner.phase, Phase::Closed) && self.should_trip(&mut inner, now) {
                    inner.phase = Phase::Open { opened_at: now };

                    #[cfg(feature = "tracing")]
                    tracing::warn!(
                        threshold = self.config.threshold,
                        cooldown = ?self.config.circuit_duration,
                        "Failure threshold reached, circuit breaker opened"
                    );
                }
            }
            Verdict::Ignored => {}
        }
    }

    fn should_trip(&self, inner: &mut Inner, now: Instant) -> bool {
        let (successes, failures) = inner.window.totals(now);
        let total = u64::from(successes) + u64::from(failures);

        total >= u64::from(self.config.minimum_calls.max(1))
            && u64::from(failures) * 100 >= u64::from(self.config.threshold) * total
    }

    fn release_probe(&self, inner: &mut Inner) {
        if let Phase::HalfOpen { opened_at, .. } = inner.phase {
            inner.phase = Phase::HalfOpen {
                opened_at,
                probe_in_flight: false,
            };
        }
    }

    fn observed_state(&self, phase: Phase, now: Instant) -> CircuitState {
        match phase {
            Phase::Closed => CircuitState::Closed,
            Phase::Open { opened_at }
                if now.duration_since(opened_at) >= self.config.circuit_duration =>
            {
                CircuitState::HalfOpen
            }
            Phase::Open { .. } => CircuitState::Open,
            Phase::HalfOpen { .. } => CircuitState::HalfOpen,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for CircuitBreaker {
    fn default() -> Self {
        Self::new(CircuitBreakerConfig::default())
    }
}

/// Admission to run one call. A probe permit dropped without being settled
/// (its future was cancelled) frees the half-open slot for the next caller.
struct Permit<'a> {
    breaker: &'a CircuitBreaker,
    probe: bool,
    settled: bool,
}

impl<'a> Permit<'a> {
    fn new(breaker: &'a CircuitBreaker, probe: bool) -> Self {
        Self {
            breaker,
            probe,
            settled: false,
        }
    }

    fn settle(mut self, verdict: Verdict) {
        self.settled = true;
        self.breaker.record(self.probe, verdict);
    }
}

impl Drop for Permit<'_> {
    fn drop(&mut self) {
        if !self.settled && self.probe {
            let mut inner = self.breaker.lock();
            self.breaker.release_probe(&mut inner);
        }
    }
}
