//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for a tier.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::forecast::catalog::DEFAULT_CATEGORIES;
use crate::resilience::{BreakerSettings, ResiliencePolicy, RetryPolicy};

/// Which service a process runs as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Leaf: serves the fixed category set.
    Catalog,
    /// Middle: calls the catalog, synthesizes records.
    Synthesizer,
    /// Front: calls the synthesizer, converts units.
    Converter,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Catalog => "catalog",
            Tier::Synthesizer => "synthesizer",
            Tier::Converter => "converter",
        }
    }

    /// The tier this one calls, if any.
    pub fn downstream(&self) -> Option<Tier> {
        match self {
            Tier::Catalog => None,
            Tier::Synthesizer => Some(Tier::Catalog),
            Tier::Converter => Some(Tier::Synthesizer),
        }
    }

    pub fn default_bind_address(&self) -> &'static str {
        match self {
            Tier::Catalog => "127.0.0.1:5005",
            Tier::Synthesizer => "127.0.0.1:5003",
            Tier::Converter => "127.0.0.1:5001",
        }
    }
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Root configuration for a tier process.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CascadeConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Address of the next tier down.
    pub downstream: DownstreamConfig,

    /// Retry and circuit-breaker policy for outbound calls.
    pub resilience: ResilienceConfig,

    /// Category labels served by the catalog tier.
    pub catalog: CatalogConfig,

    /// Inbound request timeouts.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Headroom added past a worst-case retry chain when sizing deadlines.
pub const CHAIN_SLACK: Duration = Duration::from_secs(1);

/// Inbound request deadline when nothing longer is needed.
pub const DEFAULT_REQUEST_SECS: u64 = 120;

impl CascadeConfig {
    /// Policy for the outbound calls `tier` makes.
    ///
    /// Every tier reads the same `[resilience]` section. When the downstream
    /// tier retries against its own downstream, this tier's attempt deadline
    /// is stretched past that chain, so the downstream's classified answer
    /// arrives before this tier gives up and calls it again.
    pub fn outbound_policy(&self, tier: Tier) -> ResiliencePolicy {
        let mut policy = self.resilience.policy();
        if let Some(next) = tier.downstream().filter(|next| next.downstream().is_some()) {
            let downstream_chain = self.outbound_policy(next).chain_bound();
            policy.attempt_timeout = policy
                .attempt_timeout
                .max(downstream_chain.saturating_add(CHAIN_SLACK));
        }
        policy
    }

    /// Inbound deadline for `tier`.
    ///
    /// Unset means `DEFAULT_REQUEST_SECS` or just past the tier's own outbound
    /// chain, whichever is longer.
    pub fn request_timeout(&self, tier: Tier) -> Duration {
        if let Some(secs) = self.timeouts.request_secs {
            return Duration::from_secs(secs);
        }
        let floor = Duration::from_secs(DEFAULT_REQUEST_SECS);
        match tier.downstream() {
            Some(_) => floor.max(self.outbound_policy(tier).chain_bound().saturating_add(CHAIN_SLACK)),
            None => floor,
        }
    }

    /// Bind address, falling back to the tier's well-known port.
    pub fn bind_address(&self, tier: Tier) -> String {
        self.listener
            .bind_address
            .clone()
            .unwrap_or_else(|| tier.default_bind_address().to_string())
    }

    /// Base URL of the downstream tier, falling back to its well-known port.
    pub fn downstream_base_url(&self, tier: Tier) -> Option<String> {
        let next = tier.downstream()?;
        Some(
            self.downstream
                .base_url
                .clone()
                .unwrap_or_else(|| format!("http://{}", next.default_bind_address())),
        )
    }
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:5001"). Unset means the tier default.
    pub bind_address: Option<String>,
}

/// Downstream endpoint configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DownstreamConfig {
    /// Base URL (e.g., "http://127.0.0.1:5005"). Unset means the tier default.
    pub base_url: Option<String>,

    /// Path of the downstream operation.
    pub path: String,
}

impl Default for DownstreamConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            path: "/weatherforecast".to_string(),
        }
    }
}

/// Resilience policy configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ResilienceConfig {
    /// Retries after the first attempt.
    pub retry_count: u32,

    /// Fixed wait between attempts in seconds.
    pub retry_interval_secs: u64,

    /// Overrides `retry_interval_secs` when set.
    pub retry_interval_ms: Option<u64>,

    /// Consecutive transient failures before the breaker opens.
    pub failure_threshold: u32,

    /// How long the breaker stays open in seconds.
    pub break_duration_secs: u64,

    /// Overrides `break_duration_secs` when set.
    pub break_duration_ms: Option<u64>,

    /// Deadline for each outbound attempt in seconds.
    pub attempt_timeout_secs: u64,

    /// Overrides `attempt_timeout_secs` when set.
    pub attempt_timeout_ms: Option<u64>,
}

impl Default for ResilienceConfig {
    fn default() -> Self {
        Self {
            retry_count: 3,
            retry_interval_secs: 6,
            retry_interval_ms: None,
            failure_threshold: 5,
            break_duration_secs: 30,
            break_duration_ms: None,
            attempt_timeout_secs: 10,
            attempt_timeout_ms: None,
        }
    }
}

fn millis_or_secs(ms: Option<u64>, secs: u64) -> Duration {
    ms.map(Duration::from_millis)
        .unwrap_or_else(|| Duration::from_secs(secs))
}

impl ResilienceConfig {
    pub fn retry_interval(&self) -> Duration {
        millis_or_secs(self.retry_interval_ms, self.retry_interval_secs)
    }

    pub fn break_duration(&self) -> Duration {
        millis_or_secs(self.break_duration_ms, self.break_duration_secs)
    }

    pub fn attempt_timeout(&self) -> Duration {
        millis_or_secs(self.attempt_timeout_ms, self.attempt_timeout_secs)
    }

    pub fn policy(&self) -> ResiliencePolicy {
        ResiliencePolicy {
            retry: RetryPolicy {
                retry_count: self.retry_count,
                interval: self.retry_interval(),
            },
            breaker: BreakerSettings {
                failure_threshold: self.failure_threshold,
                break_duration: self.break_duration(),
            },
            attempt_timeout: self.attempt_timeout(),
        }
    }
}

/// Catalog configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct CatalogConfig {
    /// Ordered category labels.
    pub categories: Vec<String>,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Timeout configuration for inbound requests.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    /// Must cover the tier's full outbound retry chain. Unset means derived
    /// per tier.
    pub request_secs: Option<u64>,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}
