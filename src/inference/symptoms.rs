//! Symptom-based disease classifier
//!
//! Artifact dir layout:
//! - `pipeline.json` : feature columns, scaler, pca, class labels
//! - `classifier.onnx`
//!
//! Chain: one-hot symptoms → StandardScaler → PCA → classifier

use std::path::Path;

use ndarray::Array2;
use serde::Deserialize;

use super::decision::{self, ClassPick};
use super::engine::{Classifier, OnnxClassifier};
use super::transform::{Pca, StandardScaler};
use super::InferenceError;
use crate::features::{FeatureSchema, SymptomVector};

#[derive(Debug, Clone, Deserialize)]
pub struct SymptomArtifact {
    pub feature_columns: Vec<String>,
    pub scaler: StandardScaler,
    pub pca: Pca,
    pub classes: Vec<String>,
    #[serde(default)]
    pub output: Option<String>,
}

pub struct SymptomClassifier {
    schema: FeatureSchema,
    scaler: StandardScaler,
    pca: Pca,
    model: Box<dyn Classifier>,
    classes: Vec<String>,
}

impl SymptomClassifier {
    pub fn new(
        schema: FeatureSchema,
        scaler: StandardScaler,
        pca: Pca,
        model: Box<dyn Classifier>,
        classes: Vec<String>,
    ) -> Result<Self, InferenceError> {
        scaler.validate()?;
        pca.validate()?;

        if scaler.width() != schema.len() {
            return Err(InferenceError(format!(
                "scaler width {} does not match {} feature columns",
                scaler.width(),
                schema.len()
            )));
        }
        if pca.input_width() != schema.len() {
            return Err(InferenceError(format!(
                "pca input width {} does not match {} feature columns",
                pca.input_width(),
                schema.len()
            )));
        }
        if classes.is_empty() {
            return Err(InferenceError("symptom classifier has no classes".to_string()));
        }

        Ok(Self { schema, scaler, pca, model, classes })
    }

    pub fn load(dir: &Path) -> Result<Self, InferenceError> {
        let artifact: SymptomArtifact = super::read_artifact(&dir.join("pipeline.json"))?;
        let model = OnnxClassifier::load(&dir.join("classifier.onnx"), artifact.output.as_deref())?;
        let schema = FeatureSchema::new(artifact.feature_columns)
            .map_err(|e| InferenceError(e.to_string()))?;

        let classifier = Self::new(schema, artifact.scaler, artifact.pca, Box::new(model), artifact.classes)?;

        let pick = classifier.warm_up()?;
        tracing::info!(
            "Symptom pipeline loaded: {} columns → {} components → {} classes (blank input → {})",
            classifier.schema.len(),
            classifier.pca.output_width(),
            classifier.classes.len(),
            classifier.label(&pick)
        );

        Ok(classifier)
    }

    /// Push the all-zero vector through the chain and check output width
    pub fn warm_up(&self) -> Result<ClassPick, InferenceError> {
        let blank = self.schema.encode(&[]);
        let raw = self.run(&blank)?;
        decision::per_class_scores(&raw, self.classes.len())?;
        decision::interpret(&raw)
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn source(&self) -> &str {
        self.model.source()
    }

    pub fn label(&self, pick: &ClassPick) -> &str {
        self.classes.get(pick.index).map(String::as_str).unwrap_or("unknown")
    }

    fn run(&self, vector: &SymptomVector) -> Result<Vec<f32>, InferenceError> {
        let row = Array2::from_shape_vec((1, vector.values.len()), vector.values.clone())
            .map_err(|e| InferenceError(format!("Array error: {}", e)))?;

        let scaled = self.scaler.transform(row.view())?;
        let reduced = self.pca.transform(scaled.view())?;
        self.model.predict(reduced.into_dyn())
    }

    /// Scaler → PCA → model, returning the predicted class label
    pub fn predict(&self, vector: &SymptomVector) -> Result<String, InferenceError> {
        let raw = self.run(vector)?;
        decision::per_class_scores(&raw, self.classes.len())?;
        let pick = decision::interpret(&raw)?;

        self.classes
            .get(pick.index)
            .cloned()
            .ok_or_else(|| InferenceError(format!("class index {} out of range", pick.index)))
    }
}
