//! Symptom classifier handler

use axum::{extract::State, Json};

use crate::extract::ValidatedJson;
use crate::models::{SymptomPredictionResponse, SymptomRequest};
use crate::state::AppState;
use crate::AppResult;

/// Predict a disease label from a list of symptom names
pub async fn predict(
    State(state): State<AppState>,
    payload: AppResult<ValidatedJson<SymptomRequest>>,
) -> AppResult<Json<SymptomPredictionResponse>> {
    let classifier = state.symptoms.ready()?;
    let ValidatedJson(req) = payload?;

    let vector = classifier.schema().encode(&req.symptoms);
    tracing::debug!(
        "Symptoms: {} matched, {} ignored",
        vector.matched,
        vector.ignored
    );
    if vector.is_empty() {
        tracing::debug!("No known symptoms, predicting from the zero vector");
    }

    let prediction = tokio::task::spawn_blocking(move || classifier.predict(&vector)).await??;

    tracing::info!("Symptom prediction: {}", prediction);

    Ok(Json(SymptomPredictionResponse { prediction }))
}
