//! Inference Module - model loading and execution
//!
//! Each service owns one pipeline: stored transforms → classifier →
//! output interpretation. Pipelines are built once at startup and are
//! immutable afterwards.

pub mod decision;
pub mod engine;
pub mod heart;
pub mod symptoms;
pub mod transform;
pub mod tumor;

pub use heart::HeartClassifier;
pub use symptoms::SymptomClassifier;
pub use tumor::TumorClassifier;

/// Model execution failed or produced unusable output
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct InferenceError(pub String);

/// Read a JSON artifact written by the training side
pub(crate) fn read_artifact<T: serde::de::DeserializeOwned>(
    path: &std::path::Path,
) -> Result<T, InferenceError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| InferenceError(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&raw)
        .map_err(|e| InferenceError(format!("Invalid artifact {}: {}", path.display(), e)))
}
