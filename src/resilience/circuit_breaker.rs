//! Circuit breaker for downstream protection.
//!
//! # States
//! - Closed: normal operation, calls pass through
//! - Open: downstream assumed down, calls fail fast
//! - Half-Open: a single trial call tests whether it recovered
//!
//! # State Transitions
//! ```text
//! Closed → Open: consecutive_failures >= threshold
//! Open → Half-Open: after break duration (on the next admission)
//! Half-Open → Closed: trial call succeeds
//! Half-Open → Open: trial call fails (break duration restarts)
//! ```
//!
//! # Design Decisions
//! - One breaker per (caller, endpoint) pair, shared by every in-flight request
//! - All transitions happen under one mutex per breaker; no await while held
//! - Admission hands out a `CallPermit`; at most one trial permit exists at a time
//! - A trial permit dropped without settling frees the trial slot, state unchanged

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::Serialize;
use tokio::time::Instant;

use crate::observability::metrics;

/// Breaker state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum CircuitState {
    Closed,
    Open,
    HalfOpen,
}

/// Thresholds for a breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakerSettings {
    /// Consecutive transient failures before opening.
    pub failure_threshold: u32,
    /// How long the breaker stays open before admitting a trial.
    pub break_duration: Duration,
}

impl Default for BreakerSettings {
    fn default() -> Self {
        Self {
            failure_threshold: 5,
            break_duration: Duration::from_secs(30),
        }
    }
}

/// What a failed attempt did to the breaker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureVerdict {
    /// Still closed; the caller may retry.
    Counted { consecutive_failures: u32 },
    /// The breaker is now open (this failure tripped it, or a concurrent one did).
    Opened,
}

#[derive(Debug)]
struct BreakerInner {
    state: CircuitState,
    consecutive_failures: u32,
    opened_at: Option<Instant>,
    trial_in_flight: bool,
}

/// Point-in-time view of a breaker, for the admin surface.
#[derive(Debug, Clone, Serialize)]
pub struct BreakerSnapshot {
    pub caller: String,
    pub endpoint: String,
    pub state: CircuitState,
    pub consecutive_failures: u32,
    /// Remaining cooldown while open.
    pub retry_after_ms: Option<u64>,
}

/// Circuit breaker for a single (caller, endpoint) pairing.
#[derive(Debug)]
pub struct CircuitBreaker {
    caller: String,
    endpoint: String,
    settings: BreakerSettings,
    inner: Mutex<BreakerInner>,
}

impl CircuitBreaker {
    pub fn new(caller: &str, endpoint: &str, settings: BreakerSettings) -> Self {
        Self {
            caller: caller.to_string(),
            endpoint: endpoint.to_string(),
            settings,
            inner: Mutex::new(BreakerInner {
                state: CircuitState::Closed,
                consecutive_failures: 0,
                opened_at: None,
                trial_in_flight: false,
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, BreakerInner> {
        // State is plain data; a panic elsewhere cannot leave it half-written.
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Ask for permission to make one attempt.
    ///
    /// Returns `None` while the breaker is open and cooling down, or while
    /// another request's trial call is outstanding.
    pub fn admit(self: &Arc<Self>) -> Option<CallPermit> {
        let mut inner = self.lock();
        let trial = match inner.state {
            CircuitState::Closed => false,
            CircuitState::Open => {
                let cooled = inner
                    .opened_at
                    .map(|t| t.elapsed() >= self.settings.break_duration)
                    .unwrap_or(true);
                if !cooled {
                    return None;
                }
                inner.state = CircuitState::HalfOpen;
                inner.trial_in_flight = true;
                tracing::info!(
                    caller = %self.caller,
                    endpoint = %self.endpoint,
                    "Circuit half-open, admitting trial call"
                );
                metrics::record_circuit_state(&self.caller, &self.endpoint, CircuitState::HalfOpen);
                true
            }
            CircuitState::HalfOpen => {
                if inner.trial_in_flight {
                    return None;
                }
                inner.trial_in_flight = true;
                true
            }
        };

        Some(CallPermit {
            breaker: self.clone(),
            trial,
            settled: false,
        })
    }

    /// Current state as last recorded. An open breaker whose break duration
    /// has elapsed still reports `Open` until the next admission.
    pub fn state(&self) -> CircuitState {
        self.lock().state
    }

    pub fn consecutive_failures(&self) -> u32 {
        self.lock().consecutive_failures
    }

    pub fn snapshot(&self) -> BreakerSnapshot {
        let inner = self.lock();
        let retry_after_ms = match (inner.state, inner.opened_at) {
            (CircuitState::Open, Some(opened_at)) => Some(
                self.settings
                    .break_duration
                    .saturating_sub(opened_at.elapsed())
                    .as_millis() as u64,
            ),
            _ => None,
        };
        BreakerSnapshot {
            caller: self.caller.clone(),
            endpoint: self.endpoint.clone(),
            state: inner.state,
            consecutive_failures: inner.consecutive_failures,
            retry_after_ms,
        }
    }

    fn on_success(&self, trial: bool) {
        let mut inner = self.lock();
        if !trial {
            // A permit issued before a trip settles late; the open record keeps its count.
            if inner.state == CircuitState::Closed {
                inner.consecutive_failures = 0;
            }
            return;
        }

        inner.trial_in_flight = false;
        if inner.state == CircuitState::HalfOpen {
            inner.consecutive_failures = 0;
            inner.state = CircuitState::Closed;
            inner.opened_at = None;
            tracing::info!(
                caller = %self.caller,
                endpoint = %self.endpoint,
                "Trial call succeeded, circuit closed"
            );
            metrics::record_circuit_state(&self.caller, &self.endpoint, CircuitState::Closed);
        }
    }

    fn on_failure(&self, trial: bool) -> FailureVerdict {
        let mut inner = self.lock();
        if trial {
            inner.trial_in_flight = false;
            if inner.state == CircuitState::HalfOpen {
                tracing::warn!(
                    caller = %self.caller,
                    endpoint = %self.endpoint,
                    "Trial call failed, circuit re-opened"
                );
                self.trip(&mut inner);
            }
            return FailureVerdict::Opened;
        }

        match inner.state {
            CircuitState::Closed => {
                inner.consecutive_failures += 1;
                if inner.consecutive_failures >= self.settings.failure_threshold {
                    tracing::warn!(
                        caller = %self.caller,
                        endpoint = %self.endpoint,
                        failures = inner.consecutive_failures,
                        break_ms = self.settings.break_duration.as_millis() as u64,
                        "Failure threshold reached, circuit opened"
                    );
                    self.trip(&mut inner);
                    FailureVerdict::Opened
                } else {
                    FailureVerdict::Counted {
                        consecutive_failures: inner.consecutive_failures,
                    }
                }
            }
            // A concurrent attempt already opened it.
            CircuitState::Open | CircuitState::HalfOpen => FailureVerdict::Opened,
        }
    }

    fn trip(&self, inner: &mut BreakerInner) {
        inner.state = CircuitState::Open;
        inner.opened_at = Some(Instant::now());
        metrics::record_circuit_state(&self.caller, &self.endpoint, CircuitState::Open);
    }

    fn release_trial(&self) {
        self.lock().trial_in_flight = false;
    }
}

/// Permission to make exactly one attempt. Settle it with the attempt's result.
#[must_use]
#[derive(Debug)]
pub struct CallPermit {
    breaker: Arc<CircuitBreaker>,
    trial: bool,
    settled: bool,
}

impl CallPermit {
    /// Whether this is the half-open trial call.
    pub fn is_trial(&self) -> bool {
        self.trial
    }

    pub fn succeed(mut self) {
        self.settled = true;
        self.breaker.on_success(self.trial);
    }

    pub fn fail(mut self) -> FailureVerdict {
        self.settled = true;
        self.breaker.on_failure(self.trial)
    }
}

impl Drop for CallPermit {
    fn drop(&mut self) {
        if !self.settled && self.trial {
            self.breaker.release_trial();
        }
    }
}
