//! Failure responses at the tier boundary.
//!
//! # Status Mapping
//! ```text
//! circuit-open            → 503 Service Unavailable
//! downstream-unavailable  → 502 Bad Gateway
//! invalid-response        → 502 Bad Gateway
//! empty-category-set      → 500 Internal Server Error
//! ```
//!
//! The JSON body carries the kind, so the calling tier can decode it and
//! pass the same classification on.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::resilience::outcome::{CallError, FailureKind};

/// Wire form of a classified failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub kind: FailureKind,
    pub message: String,
}

pub fn status_for(kind: FailureKind) -> StatusCode {
    match kind {
        FailureKind::CircuitOpen => StatusCode::SERVICE_UNAVAILABLE,
        FailureKind::DownstreamUnavailable | FailureKind::InvalidResponse => StatusCode::BAD_GATEWAY,
        // Attempt-level tag; calls surface downstream-unavailable instead.
        FailureKind::TransientNetwork => StatusCode::BAD_GATEWAY,
        FailureKind::EmptyCategorySet => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for CallError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let body = ErrorBody {
            kind,
            message: self.to_string(),
        };
        (status_for(kind), Json(body)).into_response()
    }
}
