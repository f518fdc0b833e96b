//! Remote tiers seen through the resilient executor.

use serde::de::DeserializeOwned;

use crate::downstream::client::HttpDownstream;
use crate::forecast::types::{CategorySet, ForecastRecord};
use crate::forecast::{CategorySource, ForecastSource};
use crate::resilience::executor::ResilientExecutor;
use crate::resilience::outcome::CallOutcome;

/// A downstream endpoint whose every call goes through retry and breaker policy.
#[derive(Debug, Clone)]
pub struct ResilientDownstream {
    downstream: HttpDownstream,
    executor: ResilientExecutor,
}

impl ResilientDownstream {
    pub fn new(downstream: HttpDownstream, executor: ResilientExecutor) -> Self {
        Self {
            downstream,
            executor,
        }
    }

    pub fn endpoint(&self) -> &str {
        self.downstream.endpoint()
    }

    pub fn executor(&self) -> &ResilientExecutor {
        &self.executor
    }

    pub async fn get<T>(&self) -> CallOutcome<T>
    where
        T: DeserializeOwned + Send,
    {
        let downstream = &self.downstream;
        self.executor
            .execute(downstream.endpoint(), || downstream.fetch_json::<T>())
            .await
    }
}

/// The catalog provider, as the synthesizer reaches it.
#[derive(Debug, Clone)]
pub struct RemoteCatalog(ResilientDownstream);

impl RemoteCatalog {
    pub fn new(inner: ResilientDownstream) -> Self {
        Self(inner)
    }
}

impl CategorySource for RemoteCatalog {
    async fn categories(&self) -> CallOutcome<CategorySet> {
        self.0.get().await
    }
}

/// The synthesizer, as the converter reaches it.
#[derive(Debug, Clone)]
pub struct RemoteForecasts(ResilientDownstream);

impl RemoteForecasts {
    pub fn new(inner: ResilientDownstream) -> Self {
        Self(inner)
    }
}

impl ForecastSource for RemoteForecasts {
    async fn forecasts(&self) -> CallOutcome<Vec<ForecastRecord>> {
        self.0.get().await
    }
}
