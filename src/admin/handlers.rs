use std::sync::Arc;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::config::Tier;
use crate::resilience::{BreakerRegistry, BreakerSnapshot};

#[derive(Clone)]
pub struct AdminState {
    pub tier: Tier,
    pub registry: Arc<BreakerRegistry>,
}

#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub tier: Tier,
}

#[derive(Serialize)]
pub struct SystemStatus {
    pub version: &'static str,
    pub tier: Tier,
    pub breakers: usize,
}

pub async fn get_health(State(state): State<AdminState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        tier: state.tier,
    })
}

pub async fn get_status(State(state): State<AdminState>) -> Json<SystemStatus> {
    Json(SystemStatus {
        version: env!("CARGO_PKG_VERSION"),
        tier: state.tier,
        breakers: state.registry.len(),
    })
}

pub async fn get_breakers(State(state): State<AdminState>) -> Json<Vec<BreakerSnapshot>> {
    Json(state.registry.snapshots())
}
