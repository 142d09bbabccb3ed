//! Symptom Feature Schema
//!
//! Ordered list of symptom columns the disease classifier was fit on.
//! Names outside the schema are ignored, never rejected.

use std::collections::HashMap;

use super::PreprocessingError;

/// Ordered feature columns with a name → position index
#[derive(Debug, Clone)]
pub struct FeatureSchema {
    columns: Vec<String>,
    index: HashMap<String, usize>,
}

/// Encoded symptom vector plus how many request names it matched
#[derive(Debug, Clone)]
pub struct SymptomVector {
    pub values: Vec<f32>,
    pub matched: usize,
    pub ignored: usize,
}

impl FeatureSchema {
    /// Build a schema, rejecting empty or duplicated column lists
    pub fn new(columns: Vec<String>) -> Result<Self, PreprocessingError> {
        if columns.is_empty() {
            return Err(PreprocessingError("feature schema has no columns".to_string()));
        }

        let mut index = HashMap::with_capacity(columns.len());
        for (i, name) in columns.iter().enumerate() {
            if index.insert(name.clone(), i).is_some() {
                return Err(PreprocessingError(format!("duplicate feature column: {}", name)));
            }
        }

        Ok(Self { columns, index })
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    /// Position of a column, if the model was trained on it
    pub fn position(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// One-hot the provided symptom names into a zero-initialized vector.
    ///
    /// Every recognized name sets its column to 1; repeats hit the same
    /// column. Unknown names are counted but otherwise dropped.
    pub fn encode(&self, symptoms: &[String]) -> SymptomVector {
        let mut values = vec![0.0f32; self.columns.len()];
        let mut ignored = 0;

        for symptom in symptoms {
            match self.position(symptom) {
                Some(i) => values[i] = 1.0,
                None => ignored += 1,
            }
        }

        let matched = values.iter().filter(|v| **v == 1.0).count();

        SymptomVector { values, matched, ignored }
    }
}

impl SymptomVector {
    pub fn is_empty(&self) -> bool {
        self.matched == 0
    }
}
