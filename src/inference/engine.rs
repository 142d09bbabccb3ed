//! Inference Engine - ONNX Runtime Integration
//!
//! `Classifier` is the seam between pipelines and the runtime, so tests
//! can swap in fixed-output models.

use std::path::Path;

use ndarray::ArrayD;
use ort::session::{Session, builder::GraphOptimizationLevel};
use ort::value::Tensor;
use parking_lot::Mutex;

use super::InferenceError;

// ============================================================================
// CLASSIFIER TRAIT
// ============================================================================

/// A loaded model mapping one input batch to a flat score vector
pub trait Classifier: Send + Sync {
    fn predict(&self, input: ArrayD<f32>) -> Result<Vec<f32>, InferenceError>;

    /// Where the model came from, for logs and health output
    fn source(&self) -> &str;
}

// ============================================================================
// ONNX IMPLEMENTATION
// ============================================================================

/// ONNX session plus the output it reads scores from
pub struct OnnxClassifier {
    // `Session::run` needs exclusive access
    session: Mutex<Session>,
    output_name: String,
    source: String,
}

impl std::fmt::Debug for OnnxClassifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxClassifier")
            .field("output_name", &self.output_name)
            .field("source", &self.source)
            .finish()
    }
}

impl OnnxClassifier {
    /// Load an ONNX model from file.
    ///
    /// `output` selects the graph output holding scores; defaults to the
    /// last one (scikit-learn exports put probabilities after labels).
    pub fn load(model_path: &Path, output: Option<&str>) -> Result<Self, InferenceError> {
        tracing::info!("Loading ONNX model from: {}", model_path.display());

        if !model_path.exists() {
            return Err(InferenceError(format!("Model not found: {}", model_path.display())));
        }

        let session = Session::builder()
            .map_err(|e| InferenceError(format!("Failed to create session builder: {}", e)))?
            .with_optimization_level(GraphOptimizationLevel::Level3)
            .map_err(|e| InferenceError(format!("Failed to set optimization: {}", e)))?
            .commit_from_file(model_path)
            .map_err(|e| InferenceError(format!("Failed to load model: {}", e)))?;

        let output_name = match output {
            Some(name) => {
                if !session.outputs.iter().any(|o| o.name == name) {
                    return Err(InferenceError(format!("Model has no output named {}", name)));
                }
                name.to_string()
            }
            None => session
                .outputs
                .last()
                .map(|o| o.name.clone())
                .ok_or_else(|| InferenceError("No output defined".to_string()))?,
        };

        tracing::info!(
            "ONNX model loaded ({} inputs, reading output '{}')",
            session.inputs.len(),
            output_name
        );

        Ok(Self {
            session: Mutex::new(session),
            output_name,
            source: model_path.display().to_string(),
        })
    }
}

impl Classifier for OnnxClassifier {
    fn predict(&self, input: ArrayD<f32>) -> Result<Vec<f32>, InferenceError> {
        let start_time = std::time::Instant::now();
        let shape = input.shape().to_vec();

        let input_tensor = Tensor::from_array(input)
            .map_err(|e| InferenceError(format!("Tensor error: {}", e)))?;

        let mut session = self.session.lock();
        let outputs = session
            .run(ort::inputs![input_tensor])
            .map_err(|e| InferenceError(format!("Inference failed: {}", e)))?;

        let output = outputs
            .get(&self.output_name)
            .ok_or_else(|| InferenceError(format!("No output '{}'", self.output_name)))?;

        let (_, data) = output
            .try_extract_tensor::<f32>()
            .map_err(|e| InferenceError(format!("Extract error: {}", e)))?;
        let scores = data.to_vec();

        tracing::debug!(
            "ONNX inference on {:?} → {} scores in {}us",
            shape,
            scores.len(),
            start_time.elapsed().as_micros()
        );

        Ok(scores)
    }

    fn source(&self) -> &str {
        &self.source
    }
}

// ============================================================================
// TEST DOUBLES
// ============================================================================


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_model_file() {
        let err = OnnxClassifier::load(Path::new("/nonexistent/model.onnx"), None).unwrap_err();
        assert!(err.0.contains("Model not found"));
    }

    #[test]
    fn test_corrupt_model_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.onnx");
        std::fs::write(&path, b"not a protobuf").unwrap();

        assert!(OnnxClassifier::load(&path, None).is_err());
    }
}
