//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cascade_requests_total` (counter): inbound requests by tier, status
//! - `cascade_request_duration_seconds` (histogram): inbound latency by tier
//! - `cascade_call_attempts_total` (counter): outbound attempts by endpoint, outcome, kind
//! - `cascade_call_failures_total` (counter): surfaced failures by endpoint, kind
//! - `cascade_circuit_state` (gauge): 0=closed, 1=half-open, 2=open
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, gauge, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;

use crate::resilience::circuit_breaker::CircuitState;
use crate::resilience::outcome::FailureKind;

/// Install the Prometheus recorder with its own HTTP listener.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record a handled inbound request.
pub fn record_request(tier: &str, status: u16, start: Instant) {
    counter!(
        "cascade_requests_total",
        "tier" => tier.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("cascade_request_duration_seconds", "tier" => tier.to_string())
        .record(start.elapsed().as_secs_f64());
}

/// Record one outbound attempt. `kind` is set for failed attempts.
pub fn record_attempt(endpoint: &str, outcome: &'static str, kind: Option<FailureKind>) {
    counter!(
        "cascade_call_attempts_total",
        "endpoint" => endpoint.to_string(),
        "outcome" => outcome,
        "kind" => kind.map(|k| k.as_str()).unwrap_or("none")
    )
    .increment(1);
}

/// Record a failure surfaced by a logical call.
pub fn record_call_failure(endpoint: &str, kind: FailureKind) {
    counter!(
        "cascade_call_failures_total",
        "endpoint" => endpoint.to_string(),
        "kind" => kind.as_str()
    )
    .increment(1);
}

/// Record a breaker transition.
pub fn record_circuit_state(caller: &str, endpoint: &str, state: CircuitState) {
    let value = match state {
        CircuitState::Closed => 0.0,
        CircuitState::HalfOpen => 1.0,
        CircuitState::Open => 2.0,
    };
    gauge!(
        "cascade_circuit_state",
        "caller" => caller.to_string(),
        "endpoint" => endpoint.to_string()
    )
    .set(value);
}
