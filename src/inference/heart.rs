//! Heart disease tabular classifier
//!
//! Artifact dir layout:
//! - `pipeline.json` : column transformer + optional output name
//! - `classifier.onnx`

use std::path::Path;

use serde::Deserialize;

use super::decision::{self, ClassPick};
use super::engine::{Classifier, OnnxClassifier};
use super::transform::ColumnTransformer;
use super::InferenceError;
use crate::features::{TabularRow, HEART_COLUMNS};

#[derive(Debug, Clone, Deserialize)]
pub struct HeartArtifact {
    pub transformer: ColumnTransformer,
    #[serde(default)]
    pub output: Option<String>,
}

pub struct HeartClassifier {
    transformer: ColumnTransformer,
    model: Box<dyn Classifier>,
}

impl HeartClassifier {
    pub fn new(transformer: ColumnTransformer, model: Box<dyn Classifier>) -> Result<Self, InferenceError> {
        transformer.validate(HEART_COLUMNS)?;
        Ok(Self { transformer, model })
    }

    pub fn load(dir: &Path) -> Result<Self, InferenceError> {
        let artifact: HeartArtifact = super::read_artifact(&dir.join("pipeline.json"))?;
        let model = OnnxClassifier::load(&dir.join("classifier.onnx"), artifact.output.as_deref())?;

        tracing::info!(
            "Heart pipeline loaded: {} numeric + {} categorical columns → {} features",
            artifact.transformer.numeric.len(),
            artifact.transformer.categorical.len(),
            artifact.transformer.output_width()
        );

        Self::new(artifact.transformer, Box::new(model))
    }

    pub fn source(&self) -> &str {
        self.model.source()
    }

    /// transformer → classifier; the pick is always class 0 or 1
    pub fn predict(&self, row: &TabularRow) -> Result<ClassPick, InferenceError> {
        tracing::debug!("Transforming {}-column row", row.columns().len());
        let features = self.transformer.transform(row)?;
        let raw = self.model.predict(features.into_dyn())?;

        if raw.len() > 2 {
            return Err(InferenceError(format!("binary model produced {} scores", raw.len())));
        }
        decision::interpret(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::Cell;
    use crate::inference::engine::testing::FixedClassifier;
    use crate::inference::transform::{CategoricalColumn, NumericColumn};

    fn transformer() -> ColumnTransformer {
        ColumnTransformer {
            numeric: vec![
                NumericColumn { column: "Age".into(), mean: 50.0, scale: 10.0 },
                NumericColumn { column: "MaxHR".into(), mean: 140.0, scale: 20.0 },
            ],
            categorical: vec![CategoricalColumn {
                column: "ChestPainType".into(),
                categories: vec!["asy".into(), "ata".into(), "nap".into(), "ta".into()],
                drop_first: true,
            }],
        }
    }

    fn row() -> TabularRow {
        let cells = HEART_COLUMNS
            .iter()
            .map(|c| {
                let cell = match *c {
                    "Age" => Cell::Number(60.0),
                    "MaxHR" => Cell::Number(150.0),
                    "ChestPainType" => Cell::Token("nap".into()),
                    "Sex" | "RestingECG" | "ExerciseAngina" | "ST_Slope" => Cell::Token("x".into()),
                    _ => Cell::Number(0.0),
                };
                (*c, cell)
            })
            .collect();
        TabularRow::assemble(HEART_COLUMNS, cells).unwrap()
    }

    #[test]
    fn test_features_reach_model_in_order() {
        let model = FixedClassifier::new(vec![0.3, 0.7]);
        let classifier = HeartClassifier::new(transformer(), Box::new(model.clone())).unwrap();

        let pick = classifier.predict(&row()).unwrap();
        assert_eq!(pick.index, 1);
        assert_eq!(model.last_input().unwrap(), vec![1.0, 0.5, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_scalar_output() {
        let classifier = HeartClassifier::new(transformer(), Box::new(FixedClassifier::new(vec![0.2]))).unwrap();
        assert_eq!(classifier.predict(&row()).unwrap().index, 0);
    }

    #[test]
    fn test_rejects_multiclass_output() {
        let classifier =
            HeartClassifier::new(transformer(), Box::new(FixedClassifier::new(vec![0.2, 0.3, 0.5]))).unwrap();
        assert!(classifier.predict(&row()).is_err());
    }

    #[test]
    fn test_load_missing_dir() {
        let dir = tempfile::tempdir().unwrap();
        let err = HeartClassifier::load(dir.path()).err().unwrap();
        assert!(err.0.contains("pipeline.json"));
    }

    #[test]
    fn test_artifact_json_shape() {
        let json = r#"{
            "transformer": {
                "numeric": [{"column": "Age", "mean": 53.5, "scale": 9.4}],
                "categorical": [{"column": "Sex", "categories": ["f", "m"], "drop_first": true}]
            }
        }"#;
        let artifact: HeartArtifact = serde_json::from_str(json).unwrap();
        assert!(artifact.output.is_none());
        assert_eq!(artifact.transformer.output_width(), 2);
    }
}
