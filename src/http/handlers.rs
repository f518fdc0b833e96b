//! Tier operation handlers.

use std::sync::Arc;
use std::time::Instant;

use axum::{
    extract::State,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::config::Tier;
use crate::forecast::{CategorySource, ForecastSource};
use crate::observability::metrics;
use crate::resilience::outcome::CallOutcome;

/// State injected into a tier's operation handler.
pub struct TierState<S> {
    pub tier: Tier,
    pub source: Arc<S>,
}

impl<S> Clone for TierState<S> {
    fn clone(&self) -> Self {
        Self {
            tier: self.tier,
            source: self.source.clone(),
        }
    }
}

/// `GET /weatherforecast` on the catalog tier.
pub async fn get_categories<C>(State(state): State<TierState<C>>) -> Response
where
    C: CategorySource + 'static,
{
    let start = Instant::now();
    let outcome = state.source.categories().await;
    respond(state.tier, outcome, start)
}

/// `GET /weatherforecast` on the synthesizer and converter tiers.
pub async fn get_forecasts<F>(State(state): State<TierState<F>>) -> Response
where
    F: ForecastSource + 'static,
{
    let start = Instant::now();
    let outcome = state.source.forecasts().await;
    respond(state.tier, outcome, start)
}

fn respond<T: Serialize>(tier: Tier, outcome: CallOutcome<T>, start: Instant) -> Response {
    let response = match outcome {
        Ok(payload) => Json(payload).into_response(),
        Err(err) => {
            tracing::warn!(tier = %tier, kind = %err.kind(), error = %err, "Request failed");
            err.into_response()
        }
    };
    metrics::record_request(tier.as_str(), response.status().as_u16(), start);
    response
}
