//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: CascadeConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;
use url::Url;

use crate::config::schema::{CascadeConfig, Tier};

/// A semantic problem with a parsed configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("listener.bind_address '{0}' is not a socket address")]
    InvalidBindAddress(String),

    #[error("downstream.base_url '{0}' is not an http(s) URL")]
    InvalidDownstreamUrl(String),

    #[error("downstream.path '{0}' must start with '/'")]
    InvalidDownstreamPath(String),

    #[error("resilience.failure_threshold must be at least 1")]
    ZeroFailureThreshold,

    #[error("resilience.{0} must be greater than zero")]
    ZeroDuration(&'static str),

    #[error("catalog.categories must not be empty")]
    EmptyCategories,

    #[error("catalog.categories[{0}] is blank")]
    BlankCategory(usize),

    #[error("timeouts.request_secs must be greater than zero")]
    ZeroRequestTimeout,

    #[error("timeouts.request_secs = {request_secs} does not cover the {tier} tier's retry chain of {chain:?}")]
    RequestTimeoutBelowChain {
        tier: Tier,
        request_secs: u64,
        chain: Duration,
    },

    #[error("observability.metrics_address '{0}' is not a socket address")]
    InvalidMetricsAddress(String),
}

/// Check a configuration for semantic errors.
pub fn validate_config(config: &CascadeConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if let Some(addr) = &config.listener.bind_address {
        if addr.parse::<SocketAddr>().is_err() {
            errors.push(ValidationError::InvalidBindAddress(addr.clone()));
        }
    }

    if let Some(base) = &config.downstream.base_url {
        let ok = Url::parse(base)
            .map(|u| matches!(u.scheme(), "http" | "https"))
            .unwrap_or(false);
        if !ok {
            errors.push(ValidationError::InvalidDownstreamUrl(base.clone()));
        }
    }
    if !config.downstream.path.starts_with('/') {
        errors.push(ValidationError::InvalidDownstreamPath(config.downstream.path.clone()));
    }

    let resilience = &config.resilience;
    if resilience.failure_threshold == 0 {
        errors.push(ValidationError::ZeroFailureThreshold);
    }
    if resilience.retry_interval().is_zero() {
        errors.push(ValidationError::ZeroDuration("retry_interval"));
    }
    if resilience.break_duration().is_zero() {
        errors.push(ValidationError::ZeroDuration("break_duration"));
    }
    if resilience.attempt_timeout().is_zero() {
        errors.push(ValidationError::ZeroDuration("attempt_timeout"));
    }

    if config.catalog.categories.is_empty() {
        errors.push(ValidationError::EmptyCategories);
    }
    for (i, label) in config.catalog.categories.iter().enumerate() {
        if label.trim().is_empty() {
            errors.push(ValidationError::BlankCategory(i));
        }
    }

    if config.timeouts.request_secs == Some(0) {
        errors.push(ValidationError::ZeroRequestTimeout);
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::InvalidMetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// `validate_config` plus the checks that depend on which tier runs.
pub fn validate_for_tier(config: &CascadeConfig, tier: Tier) -> Result<(), Vec<ValidationError>> {
    let mut errors = validate_config(config).err().unwrap_or_default();

    if let (Some(request_secs), Some(_)) = (config.timeouts.request_secs, tier.downstream()) {
        let chain = config.outbound_policy(tier).chain_bound();
        if request_secs > 0 && Duration::from_secs(request_secs) <= chain {
            errors.push(ValidationError::RequestTimeoutBelowChain {
                tier,
                request_secs,
                chain,
            });
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
