//! Resilient call executor.
//!
//! # Data Flow
//! ```text
//! execute(endpoint, call)
//!     → registry: breaker for (caller, endpoint)
//!     → loop:
//!         circuit_breaker.admit()      (fail fast with CircuitOpen when refused)
//!         timeouts::with_deadline(call())
//!         success       → permit.succeed(), return payload
//!         non-transient → permit.succeed(), return classified error unchanged
//!         transient     → permit.fail()
//!                           opened    → CircuitOpen
//!                           counted   → wait retry interval, loop
//!                           exhausted → DownstreamUnavailable
//! ```

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use crate::observability::metrics;
use crate::resilience::circuit_breaker::{BreakerSettings, FailureVerdict};
use crate::resilience::outcome::{AttemptError, CallError, CallOutcome};
use crate::resilience::registry::BreakerRegistry;
use crate::resilience::retries::RetryPolicy;
use crate::resilience::timeouts::with_deadline;

/// Process-wide policy for one endpoint binding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResiliencePolicy {
    pub retry: RetryPolicy,
    pub breaker: BreakerSettings,
    /// Deadline for a single attempt.
    pub attempt_timeout: Duration,
}

impl ResiliencePolicy {
    /// Longest one logical call can take: every attempt runs to its deadline
    /// and every retry waits the full interval.
    pub fn chain_bound(&self) -> Duration {
        self.attempt_timeout
            .saturating_mul(self.retry.attempts())
            .saturating_add(self.retry.interval.saturating_mul(self.retry.retry_count))
    }
}

impl Default for ResiliencePolicy {
    fn default() -> Self {
        Self {
            retry: RetryPolicy::default(),
            breaker: BreakerSettings::default(),
            attempt_timeout: Duration::from_secs(10),
        }
    }
}

/// Wraps outbound calls with retry and circuit-breaker policies.
///
/// Cloning is cheap; clones share the same breaker registry.
#[derive(Debug, Clone)]
pub struct ResilientExecutor {
    caller: String,
    policy: ResiliencePolicy,
    registry: Arc<BreakerRegistry>,
}

impl ResilientExecutor {
    /// `registry` should have been created with `policy.breaker`.
    pub fn new(caller: &str, policy: ResiliencePolicy, registry: Arc<BreakerRegistry>) -> Self {
        Self {
            caller: caller.to_string(),
            policy,
            registry,
        }
    }

    /// Executor with its own registry.
    pub fn standalone(caller: &str, policy: ResiliencePolicy) -> Self {
        Self::new(caller, policy, Arc::new(BreakerRegistry::new(policy.breaker)))
    }

    pub fn caller(&self) -> &str {
        &self.caller
    }

    pub fn policy(&self) -> &ResiliencePolicy {
        &self.policy
    }

    pub fn registry(&self) -> &Arc<BreakerRegistry> {
        &self.registry
    }

    /// Run one logical call against `endpoint`.
    ///
    /// `call` is invoked once per attempt and must be idempotent.
    pub async fn execute<T, F, Fut>(&self, endpoint: &str, mut call: F) -> CallOutcome<T>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, AttemptError>>,
    {
        let breaker = self.registry.get_or_create(&self.caller, endpoint);
        let mut attempt = 0u32;

        loop {
            let Some(permit) = breaker.admit() else {
                tracing::debug!(
                    caller = %self.caller,
                    endpoint = %endpoint,
                    "Circuit open, failing fast"
                );
                return Err(surface(endpoint, CallError::CircuitOpen {
                    endpoint: endpoint.to_string(),
                }));
            };
            attempt += 1;

            match with_deadline(self.policy.attempt_timeout, call()).await {
                Ok(payload) => {
                    permit.succeed();
                    metrics::record_attempt(endpoint, "success", None);
                    if attempt > 1 {
                        tracing::info!(
                            caller = %self.caller,
                            endpoint = %endpoint,
                            attempt,
                            "Call succeeded after retry"
                        );
                    }
                    return Ok(payload);
                }
                Err(err) if !err.is_transient() => {
                    // The downstream answered; for the breaker that is a live peer.
                    permit.succeed();
                    metrics::record_attempt(endpoint, "rejected", Some(err.kind()));
                    tracing::warn!(
                        caller = %self.caller,
                        endpoint = %endpoint,
                        kind = %err.kind(),
                        error = %err,
                        "Non-retryable downstream failure"
                    );
                    return Err(surface(endpoint, CallError::from_attempt(endpoint, err)));
                }
                Err(err) => {
                    metrics::record_attempt(endpoint, "transient", Some(err.kind()));
                    let verdict = permit.fail();
                    tracing::warn!(
                        caller = %self.caller,
                        endpoint = %endpoint,
                        attempt,
                        kind = %err.kind(),
                        error = %err,
                        "Attempt failed"
                    );

                    match verdict {
                        FailureVerdict::Opened => {
                            return Err(surface(endpoint, CallError::CircuitOpen {
                                endpoint: endpoint.to_string(),
                            }));
                        }
                        FailureVerdict::Counted { consecutive_failures } => {
                            match self.policy.retry.next_delay(attempt) {
                                Some(delay) => {
                                    tracing::info!(
                                        caller = %self.caller,
                                        endpoint = %endpoint,
                                        attempt,
                                        consecutive_failures,
                                        delay = ?delay,
                                        "Retrying after transient failure"
                                    );
                                    tokio::time::sleep(delay).await;
                                }
                                None => {
                                    return Err(surface(endpoint, CallError::DownstreamUnavailable {
                                        endpoint: endpoint.to_string(),
                                        attempts: attempt,
                                        last: err,
                                    }));
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

fn surface(endpoint: &str, err: CallError) -> CallError {
    metrics::record_call_failure(endpoint, err.kind());
    err
}
