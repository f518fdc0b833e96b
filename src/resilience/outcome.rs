//! Failure taxonomy for outbound calls.
//!
//! # Layers
//! - `AttemptError`: what a single attempt produced (internal to the executor)
//! - `CallError`: what a logical call surfaces to the tier that made it
//! - `FailureKind`: the wire tag carried across tier boundaries

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification tag for a failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FailureKind {
    /// One attempt failed in a retryable way. Tags attempts in logs; a
    /// logical call never surfaces it.
    TransientNetwork,
    /// Retries were exhausted.
    DownstreamUnavailable,
    /// The breaker tripped or is still cooling down.
    CircuitOpen,
    /// Sampling was attempted over an empty category set.
    EmptyCategorySet,
    /// The downstream answered, but not with anything usable.
    InvalidResponse,
}

impl FailureKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureKind::TransientNetwork => "transient-network",
            FailureKind::DownstreamUnavailable => "downstream-unavailable",
            FailureKind::CircuitOpen => "circuit-open",
            FailureKind::EmptyCategorySet => "empty-category-set",
            FailureKind::InvalidResponse => "invalid-response",
        }
    }
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one failed attempt.
#[derive(Debug, Clone, Error)]
pub enum AttemptError {
    /// Connection refused, reset, DNS failure and the like.
    #[error("transport error: {0}")]
    Transport(String),

    /// The attempt exceeded its deadline.
    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),

    /// Server error (5xx) or 408 without a classified failure body.
    #[error("downstream returned status {0}")]
    Status(u16),

    /// The downstream tier answered with its own classified failure.
    #[error("downstream reported {kind}: {message}")]
    Remote { kind: FailureKind, message: String },

    /// Non-retryable status such as 404.
    #[error("downstream rejected the request with status {0}")]
    Rejected(u16),

    /// The payload could not be decoded.
    #[error("undecodable payload: {0}")]
    Decode(String),
}

impl AttemptError {
    /// Whether this failure feeds the retry loop and the breaker counter.
    pub fn is_transient(&self) -> bool {
        matches!(
            self,
            AttemptError::Transport(_) | AttemptError::Timeout(_) | AttemptError::Status(_)
        )
    }

    /// Classification of this attempt on its own.
    pub fn kind(&self) -> FailureKind {
        match self {
            AttemptError::Transport(_) | AttemptError::Timeout(_) | AttemptError::Status(_) => {
                FailureKind::TransientNetwork
            }
            AttemptError::Remote { kind, .. } => *kind,
            AttemptError::Rejected(_) | AttemptError::Decode(_) => FailureKind::InvalidResponse,
        }
    }
}

/// Failure surfaced by a logical call.
#[derive(Debug, Clone, Error)]
pub enum CallError {
    #[error("downstream {endpoint} unavailable after {attempts} attempts: {last}")]
    DownstreamUnavailable {
        endpoint: String,
        attempts: u32,
        last: AttemptError,
    },

    #[error("circuit open for {endpoint}")]
    CircuitOpen { endpoint: String },

    /// A classified failure reported by the downstream tier, passed on as-is.
    #[error("{endpoint} reported {kind}: {message}")]
    Remote {
        endpoint: String,
        kind: FailureKind,
        message: String,
    },

    #[error("invalid response from {endpoint}: {reason}")]
    InvalidResponse { endpoint: String, reason: String },

    #[error("cannot sample from an empty category set")]
    EmptyCategorySet,
}

impl CallError {
    /// The classification reported across tier boundaries.
    pub fn kind(&self) -> FailureKind {
        match self {
            CallError::DownstreamUnavailable { .. } => FailureKind::DownstreamUnavailable,
            CallError::CircuitOpen { .. } => FailureKind::CircuitOpen,
            CallError::Remote { kind, .. } => *kind,
            CallError::InvalidResponse { .. } => FailureKind::InvalidResponse,
            CallError::EmptyCategorySet => FailureKind::EmptyCategorySet,
        }
    }

    /// Convert a non-transient attempt failure into the surfaced error.
    pub(crate) fn from_attempt(endpoint: &str, err: AttemptError) -> Self {
        match err {
            AttemptError::Remote { kind, message } => CallError::Remote {
                endpoint: endpoint.to_string(),
                kind,
                message,
            },
            other => CallError::InvalidResponse {
                endpoint: endpoint.to_string(),
                reason: other.to_string(),
            },
        }
    }
}

/// Result threaded through every tier boundary.
pub type CallOutcome<T> = Result<T, CallError>;
