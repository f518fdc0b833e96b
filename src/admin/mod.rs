//! Operator surface: liveness, version, breaker inspection.
//!
//! Read-only; there is no authentication on these routes.

pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};

use crate::config::Tier;
use crate::resilience::BreakerRegistry;
use self::handlers::*;

pub fn router(tier: Tier, registry: Arc<BreakerRegistry>) -> Router {
    Router::new()
        .route("/health", get(get_health))
        .route("/admin/status", get(get_status))
        .route("/admin/breakers", get(get_breakers))
        .with_state(AdminState { tier, registry })
}
