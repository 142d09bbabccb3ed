//! Health check handler

use std::collections::BTreeMap;

use axum::{extract::State, Json};
use serde::Serialize;

use crate::state::{AppState, SlotStatus};

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
    timestamp: i64,
    services: BTreeMap<&'static str, SlotStatus>,
}

pub async fn check(State(state): State<AppState>) -> Json<HealthResponse> {
    let services = BTreeMap::from([
        (state.tumor.name(), state.tumor.status()),
        (state.heart.name(), state.heart.status()),
        (state.symptoms.name(), state.symptoms.status()),
    ]);

    let status = if services.values().all(|s| s.ready) { "healthy" } else { "degraded" };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: chrono::Utc::now().timestamp(),
        services,
    })
}
