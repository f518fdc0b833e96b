//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble the tier selected at startup (catalog, synthesizer, converter)
//! - Create the Axum Router with the tier operation and admin handlers
//! - Wire up middleware (request ID, tracing, timeout)
//! - Serve until the shutdown signal, then drain

use std::sync::Arc;
use std::time::Duration;

use axum::{routing::get, Router};
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{
    request_id::{PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::admin;
use crate::config::{CascadeConfig, Tier};
use crate::downstream::{DownstreamError, HttpDownstream, RemoteCatalog, RemoteForecasts, ResilientDownstream};
use crate::forecast::{CategorySource, Converter, ForecastSource, StaticCatalog, Synthesizer, ThreadRandom};
use crate::http::handlers::{get_categories, get_forecasts, TierState};
use crate::http::request::{make_span, MakeRequestUuid};
use crate::resilience::{BreakerRegistry, ResiliencePolicy, ResilientExecutor};

/// Path every tier serves its operation on.
pub const OPERATION_PATH: &str = "/weatherforecast";

/// Errors assembling a tier.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("{0} tier requires a downstream address")]
    MissingDownstream(Tier),

    #[error(transparent)]
    Downstream(#[from] DownstreamError),
}

/// Routes for the catalog tier.
pub fn catalog_app<C>(catalog: Arc<C>, registry: Arc<BreakerRegistry>) -> Router
where
    C: CategorySource + 'static,
{
    Router::new()
        .route(OPERATION_PATH, get(get_categories::<C>))
        .with_state(TierState {
            tier: Tier::Catalog,
            source: catalog,
        })
        .merge(admin::router(Tier::Catalog, registry))
}

/// Routes for a tier that serves forecast records.
pub fn forecast_app<F>(tier: Tier, source: Arc<F>, registry: Arc<BreakerRegistry>) -> Router
where
    F: ForecastSource + 'static,
{
    Router::new()
        .route(OPERATION_PATH, get(get_forecasts::<F>))
        .with_state(TierState { tier, source })
        .merge(admin::router(tier, registry))
}

/// Resilient client for the tier below `tier`.
pub fn resilient_downstream(
    tier: Tier,
    config: &CascadeConfig,
    policy: ResiliencePolicy,
    registry: Arc<BreakerRegistry>,
) -> Result<ResilientDownstream, BuildError> {
    let base_url = config
        .downstream_base_url(tier)
        .ok_or(BuildError::MissingDownstream(tier))?;
    let downstream = HttpDownstream::new(&base_url, &config.downstream.path, policy.attempt_timeout)?;
    let executor = ResilientExecutor::new(tier.as_str(), policy, registry);

    tracing::info!(
        tier = %tier,
        endpoint = %downstream.endpoint(),
        retry_count = policy.retry.retry_count,
        retry_interval = ?policy.retry.interval,
        attempt_timeout = ?policy.attempt_timeout,
        failure_threshold = policy.breaker.failure_threshold,
        break_duration = ?policy.breaker.break_duration,
        "Downstream configured"
    );
    Ok(ResilientDownstream::new(downstream, executor))
}

/// HTTP server for one tier.
pub struct HttpServer {
    router: Router,
    tier: Tier,
    config: CascadeConfig,
}

impl HttpServer {
    /// Assemble `tier` from configuration.
    pub fn new(tier: Tier, config: CascadeConfig) -> Result<Self, BuildError> {
        let policy = config.outbound_policy(tier);
        let registry = Arc::new(BreakerRegistry::new(policy.breaker));

        let app = match tier {
            Tier::Catalog => {
                let categories = config.catalog.categories.iter().cloned().collect();
                catalog_app(Arc::new(StaticCatalog::new(categories)), registry)
            }
            Tier::Synthesizer => {
                let catalog = RemoteCatalog::new(resilient_downstream(tier, &config, policy, registry.clone())?);
                forecast_app(tier, Arc::new(Synthesizer::new(catalog, ThreadRandom)), registry)
            }
            Tier::Converter => {
                let synthesizer = RemoteForecasts::new(resilient_downstream(tier, &config, policy, registry.clone())?);
                forecast_app(tier, Arc::new(Converter::new(synthesizer)), registry)
            }
        };

        Ok(Self::with_app(tier, config, app))
    }

    /// Serve a pre-built app, e.g. one with a deterministic random source.
    pub fn with_app(tier: Tier, config: CascadeConfig, app: Router) -> Self {
        let router = Self::build_router(config.request_timeout(tier), app);
        Self { router, tier, config }
    }

    /// Wrap the app with all middleware layers.
    #[allow(deprecated)]
    fn build_router(request_timeout: Duration, app: Router) -> Router {
        app.layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TraceLayer::new_for_http().make_span_with(make_span))
                .layer(TimeoutLayer::new(request_timeout)),
        )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(
            tier = %self.tier,
            address = %addr,
            "HTTP server starting"
        );

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
                tracing::info!("Shutdown signal received, draining");
            })
            .await?;

        tracing::info!(tier = %self.tier, "HTTP server stopped");
        Ok(())
    }

    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &CascadeConfig {
        &self.config
    }
}
