//! Tumor image request/response model

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::inference::tumor::TumorPrediction;

/// Multipart part carrying the image
pub const UPLOAD_FIELD: &str = "file";

/// Upload must carry at least one byte
pub fn validate_upload(bytes: &[u8]) -> AppResult<()> {
    if bytes.is_empty() {
        return Err(AppError::ValidationError("Empty file received".to_string()));
    }
    Ok(())
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TumorPredictionResponse {
    #[serde(rename = "class")]
    pub class_name: String,
    /// Percent, two decimals
    pub confidence: f64,
    pub all_predictions: BTreeMap<String, f64>,
}

impl TumorPredictionResponse {
    pub fn from_prediction(class_names: &[String], prediction: &TumorPrediction) -> Self {
        let class_name = class_names
            .get(prediction.pick.index)
            .cloned()
            .unwrap_or_default();

        let all_predictions = class_names
            .iter()
            .zip(&prediction.scores)
            .map(|(name, score)| (name.clone(), f64::from(*score)))
            .collect();

        Self {
            class_name,
            confidence: prediction.pick.confidence_percent(),
            all_predictions,
        }
    }
}
