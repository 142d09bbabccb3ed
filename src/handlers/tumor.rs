//! Tumor image handler

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    Json,
};

use crate::features::image;
use crate::models::{validate_upload, TumorPredictionResponse, UPLOAD_FIELD};
use crate::state::AppState;
use crate::{AppError, AppResult};

/// Classify an uploaded MRI image
pub async fn predict(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> AppResult<Json<TumorPredictionResponse>> {
    let classifier = state.tumor.ready()?;

    let multipart = multipart.map_err(|e| AppError::ValidationError(e.body_text()))?;
    let upload = read_upload(multipart).await?;
    validate_upload(&upload)?;

    tracing::debug!("Received image upload ({} bytes)", upload.len());

    let response = tokio::task::spawn_blocking(move || -> AppResult<TumorPredictionResponse> {
        let batch = image::preprocess(&upload, classifier.image_size())?;
        let prediction = classifier.classify(batch)?;
        Ok(TumorPredictionResponse::from_prediction(classifier.class_names(), &prediction))
    })
    .await??;

    tracing::info!("Tumor prediction: {} ({}%)", response.class_name, response.confidence);

    Ok(Json(response))
}

/// Bytes of the `file` part; other parts are skipped
async fn read_upload(mut multipart: Multipart) -> AppResult<Vec<u8>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(e.body_text()))?
    {
        if field.name() == Some(UPLOAD_FIELD) {
            let bytes = field
                .bytes()
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            return Ok(bytes.to_vec());
        }
    }

    Err(AppError::ValidationError(format!("Missing multipart field '{}'", UPLOAD_FIELD)))
}
