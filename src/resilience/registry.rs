//! Per-pairing breaker storage.
//!
//! One `CircuitBreaker` per (caller, endpoint) pair, created on first use
//! and kept for the life of the process.

use std::sync::Arc;

use dashmap::DashMap;

use crate::resilience::circuit_breaker::{BreakerSettings, BreakerSnapshot, CircuitBreaker};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct BreakerKey {
    caller: String,
    endpoint: String,
}

/// Thread-safe map of breakers.
#[derive(Debug, Default)]
pub struct BreakerRegistry {
    settings: BreakerSettings,
    breakers: DashMap<BreakerKey, Arc<CircuitBreaker>>,
}

impl BreakerRegistry {
    pub fn new(settings: BreakerSettings) -> Self {
        Self {
            settings,
            breakers: DashMap::new(),
        }
    }

    /// Get the breaker for a pairing, creating it closed if absent.
    pub fn get_or_create(&self, caller: &str, endpoint: &str) -> Arc<CircuitBreaker> {
        let key = BreakerKey {
            caller: caller.to_string(),
            endpoint: endpoint.to_string(),
        };
        self.breakers
            .entry(key)
            .or_insert_with(|| Arc::new(CircuitBreaker::new(caller, endpoint, self.settings)))
            .value()
            .clone()
    }

    pub fn len(&self) -> usize {
        self.breakers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.breakers.is_empty()
    }

    /// Snapshot every breaker, ordered by caller then endpoint.
    pub fn snapshots(&self) -> Vec<BreakerSnapshot> {
        let mut all: Vec<BreakerSnapshot> = self
            .breakers
            .iter()
            .map(|entry| entry.value().snapshot())
            .collect();
        all.sort_by(|a, b| (&a.caller, &a.endpoint).cmp(&(&b.caller, &b.endpoint)));
        all
    }
}
