//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Outbound call to a downstream tier:
//!     → executor.rs (one logical call)
//!     → circuit_breaker.rs (gate: may an attempt happen at all?)
//!     → timeouts.rs (deadline per attempt)
//!     → On transient failure: retries.rs (fixed interval, bounded count)
//!     → registry.rs (breaker state shared per caller/endpoint pair)
//! ```
//!
//! # Design Decisions
//! - Timeouts are non-negotiable; every outbound attempt has a deadline
//! - Breaker check and retry loop are separate layers composed in sequence
//! - Failures are values (`CallOutcome`), never panics

pub mod circuit_breaker;
pub mod executor;
pub mod outcome;
pub mod registry;
pub mod retries;
pub mod timeouts;

pub use circuit_breaker::{BreakerSettings, BreakerSnapshot, CircuitBreaker, CircuitState};
pub use executor::{ResiliencePolicy, ResilientExecutor};
pub use outcome::{AttemptError, CallError, CallOutcome, FailureKind};
pub use registry::BreakerRegistry;
pub use retries::RetryPolicy;
