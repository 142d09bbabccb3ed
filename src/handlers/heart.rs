//! Heart disease handler

use axum::{extract::State, Json};

use crate::extract::ValidatedJson;
use crate::models::{HeartDiseaseRequest, HeartOutcome, HeartPredictionResponse};
use crate::state::AppState;
use crate::AppResult;

/// Predict heart disease from clinical fields
pub async fn predict(
    State(state): State<AppState>,
    payload: AppResult<ValidatedJson<HeartDiseaseRequest>>,
) -> AppResult<Json<HeartPredictionResponse>> {
    let classifier = state.heart.ready()?;
    let ValidatedJson(req) = payload?;
    let row = req.to_row()?;

    tracing::debug!("Heart request: {:?}", req);

    let pick = tokio::task::spawn_blocking(move || classifier.predict(&row)).await??;
    let outcome = HeartOutcome::from_class(pick.index)?;

    tracing::info!("Heart prediction: {}", outcome.message());

    Ok(Json(outcome.into()))
}
