//! Brain tumor image classifier

use std::path::Path;

use ndarray::Array4;

use super::decision::{self, ClassPick};
use super::engine::{Classifier, OnnxClassifier};
use super::InferenceError;
use crate::features::image::blank_batch;

/// Default class order the tumor model was trained with
pub const DEFAULT_CLASS_NAMES: &[&str] = &["glioma", "meningioma", "notumor", "pituitary"];

/// Raw model answer for one image
#[derive(Debug, Clone)]
pub struct TumorPrediction {
    pub pick: ClassPick,
    /// One score per class, in class order
    pub scores: Vec<f32>,
}

pub struct TumorClassifier {
    model: Box<dyn Classifier>,
    class_names: Vec<String>,
    image_size: u32,
}

impl TumorClassifier {
    pub fn new(
        model: Box<dyn Classifier>,
        class_names: Vec<String>,
        image_size: u32,
    ) -> Result<Self, InferenceError> {
        if class_names.is_empty() {
            return Err(InferenceError("tumor classifier needs at least one class".to_string()));
        }
        Ok(Self { model, class_names, image_size })
    }

    /// Load the ONNX model and check it with one all-zero image
    pub fn load(path: &Path, class_names: Vec<String>, image_size: u32) -> Result<Self, InferenceError> {
        let model = OnnxClassifier::load(path, None)?;
        let classifier = Self::new(Box::new(model), class_names, image_size)?;

        let width = classifier.warm_up()?;
        tracing::info!(
            "Tumor model test successful. Output width: {} ({} classes)",
            width,
            classifier.class_names.len()
        );

        Ok(classifier)
    }

    /// Run a blank input through the model, returning the output width
    pub fn warm_up(&self) -> Result<usize, InferenceError> {
        let raw = self.model.predict(blank_batch(self.image_size).into_dyn())?;
        decision::per_class_scores(&raw, self.class_names.len())?;
        Ok(raw.len())
    }

    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn class_names(&self) -> &[String] {
        &self.class_names
    }

    pub fn source(&self) -> &str {
        self.model.source()
    }

    pub fn classify(&self, batch: Array4<f32>) -> Result<TumorPrediction, InferenceError> {
        let edge = self.image_size as usize;
        if batch.shape() != [1, edge, edge, 3] {
            return Err(InferenceError(format!("unexpected input shape {:?}", batch.shape())));
        }

        let raw = self.model.predict(batch.into_dyn())?;
        let pick = decision::interpret(&raw)?;
        let scores = decision::per_class_scores(&raw, self.class_names.len())?;

        Ok(TumorPrediction { pick, scores })
    }
}
