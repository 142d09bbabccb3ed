//! Symptom request/response model

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Body for `POST /model`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SymptomRequest {
    pub symptoms: Vec<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SymptomPredictionResponse {
    pub prediction: String,
}
