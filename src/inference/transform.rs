//! Stored preprocessing transforms
//!
//! Fitted parameters exported from training, applied in fixed order
//! before the classifier. All transforms are read-only after load.

use ndarray::{Array1, Array2, ArrayView2};
use serde::Deserialize;

use super::InferenceError;
use crate::features::{Cell, TabularRow};

// ============================================================================
// STANDARD SCALER
// ============================================================================

/// `(x - mean) / scale`, per column
#[derive(Debug, Clone, Deserialize)]
pub struct StandardScaler {
    pub mean: Vec<f32>,
    pub scale: Vec<f32>,
}

impl StandardScaler {
    #[cfg(test)]
    pub fn identity(width: usize) -> Self {
        Self {
            mean: vec![0.0; width],
            scale: vec![1.0; width],
        }
    }

    pub fn width(&self) -> usize {
        self.mean.len()
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.mean.len() != self.scale.len() {
            return Err(InferenceError(format!(
                "scaler mean has {} entries, scale has {}",
                self.mean.len(),
                self.scale.len()
            )));
        }
        Ok(())
    }

    pub fn transform(&self, x: ArrayView2<f32>) -> Result<Array2<f32>, InferenceError> {
        check_width("scaler", self.width(), x.ncols())?;

        let mean = Array1::from(self.mean.clone());
        // Zero-variance columns were fit with scale 1
        let scale = Array1::from_iter(self.scale.iter().map(|s| if *s == 0.0 { 1.0 } else { *s }));

        Ok((&x - &mean) / &scale)
    }
}

// ============================================================================
// PCA
// ============================================================================

/// Linear projection `(x - mean) · componentsᵀ`, no whitening
#[derive(Debug, Clone, Deserialize)]
pub struct Pca {
    pub mean: Vec<f32>,
    /// Row-major `n_components × n_features`
    pub components: Vec<Vec<f32>>,
}

impl Pca {
    pub fn input_width(&self) -> usize {
        self.mean.len()
    }

    pub fn output_width(&self) -> usize {
        self.components.len()
    }

    pub fn validate(&self) -> Result<(), InferenceError> {
        if self.components.is_empty() {
            return Err(InferenceError("pca has no components".to_string()));
        }
        if let Some(row) = self.components.iter().find(|r| r.len() != self.mean.len()) {
            return Err(InferenceError(format!(
                "pca component has {} entries, expected {}",
                row.len(),
                self.mean.len()
            )));
        }
        Ok(())
    }

    fn components_matrix(&self) -> Result<Array2<f32>, InferenceError> {
        let flat: Vec<f32> = self.components.iter().flatten().copied().collect();
        Array2::from_shape_vec((self.output_width(), self.input_width()), flat)
            .map_err(|e| InferenceError(format!("pca shape error: {}", e)))
    }

    pub fn transform(&self, x: ArrayView2<f32>) -> Result<Array2<f32>, InferenceError> {
        check_width("pca", self.input_width(), x.ncols())?;

        let mean = Array1::from(self.mean.clone());
        let centered = &x - &mean;
        Ok(centered.dot(&self.components_matrix()?.t()))
    }
}

// ============================================================================
// COLUMN TRANSFORMER
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
pub struct NumericColumn {
    pub column: String,
    pub mean: f32,
    pub scale: f32,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CategoricalColumn {
    pub column: String,
    pub categories: Vec<String>,
    #[serde(default)]
    pub drop_first: bool,
}

impl CategoricalColumn {
    fn encoded_width(&self) -> usize {
        if self.drop_first {
            self.categories.len().saturating_sub(1)
        } else {
            self.categories.len()
        }
    }

    /// One-hot a token; unknown tokens encode as all zeros
    fn encode(&self, token: &str, out: &mut Vec<f32>) {
        let skip = usize::from(self.drop_first);
        let hit = self.categories.iter().position(|c| c == token);

        out.extend(
            (skip..self.categories.len()).map(|i| if Some(i) == hit { 1.0 } else { 0.0 }),
        );
    }
}

/// Scaled numeric block followed by one-hot categorical block
#[derive(Debug, Clone, Deserialize)]
pub struct ColumnTransformer {
    pub numeric: Vec<NumericColumn>,
    pub categorical: Vec<CategoricalColumn>,
}

impl ColumnTransformer {
    pub fn output_width(&self) -> usize {
        self.numeric.len() + self.categorical.iter().map(CategoricalColumn::encoded_width).sum::<usize>()
    }

    /// Every referenced column must exist in `columns`
    pub fn validate(&self, columns: &[&str]) -> Result<(), InferenceError> {
        let referenced = self
            .numeric
            .iter()
            .map(|c| &c.column)
            .chain(self.categorical.iter().map(|c| &c.column));

        for name in referenced {
            if !columns.contains(&name.as_str()) {
                return Err(InferenceError(format!("transformer column {} not in schema", name)));
            }
        }
        if self.output_width() == 0 {
            return Err(InferenceError("transformer produces no features".to_string()));
        }
        Ok(())
    }

    pub fn transform(&self, row: &TabularRow) -> Result<Array2<f32>, InferenceError> {
        let mut out = Vec::with_capacity(self.output_width());

        for col in &self.numeric {
            let value = row
                .get(&col.column)
                .and_then(Cell::as_number)
                .ok_or_else(|| InferenceError(format!("column {} is not numeric", col.column)))?;
            let scale = if col.scale == 0.0 { 1.0 } else { col.scale };
            out.push((value - col.mean) / scale);
        }

        for col in &self.categorical {
            let token = match row.get(&col.column) {
                Some(Cell::Token(t)) => t.clone(),
                Some(Cell::Number(n)) => n.to_string(),
                None => return Err(InferenceError(format!("column {} missing", col.column))),
            };
            col.encode(&token, &mut out);
        }

        let width = out.len();
        Array2::from_shape_vec((1, width), out)
            .map_err(|e| InferenceError(format!("row shape error: {}", e)))
    }
}

fn check_width(stage: &str, expected: usize, actual: usize) -> Result<(), InferenceError> {
    if expected != actual {
        return Err(InferenceError(format!(
            "{} expects {} features, got {}",
            stage, expected, actual
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::HEART_COLUMNS;
    use ndarray::array;

    #[test]
    fn test_scaler() {
        let scaler = StandardScaler { mean: vec![1.0, 2.0], scale: vec![2.0, 0.0] };
        let out = scaler.transform(array![[3.0, 5.0]].view()).unwrap();
        assert_eq!(out, array![[1.0, 3.0]]);
    }

    #[test]
    fn test_scaler_width_mismatch() {
        let scaler = StandardScaler::identity(3);
        assert!(scaler.transform(array![[1.0, 2.0]].view()).is_err());
    }

    #[test]
    fn test_pca_projection() {
        let pca = Pca {
            mean: vec![1.0, 1.0, 1.0],
            components: vec![vec![1.0, 0.0, 0.0], vec![0.0, 1.0, 1.0]],
        };
        pca.validate().unwrap();

        let out = pca.transform(array![[2.0, 3.0, 4.0]].view()).unwrap();
        assert_eq!(out, array![[1.0, 5.0]]);
    }

    #[test]
    fn test_pca_validate_ragged() {
        let pca = Pca { mean: vec![0.0, 0.0], components: vec![vec![1.0]] };
        assert!(pca.validate().is_err());
    }

    fn heart_row(sex: &str) -> TabularRow {
        let cells = HEART_COLUMNS
            .iter()
            .map(|c| {
                let cell = match *c {
                    "Sex" => Cell::Token(sex.to_string()),
                    "ChestPainType" => Cell::Token("asy".into()),
                    "RestingECG" => Cell::Token("normal".into()),
                    "ExerciseAngina" => Cell::Token("n".into()),
                    "ST_Slope" => Cell::Token("flat".into()),
                    "Age" => Cell::Number(63.0),
                    _ => Cell::Number(1.0),
                };
                (*c, cell)
            })
            .collect();
        TabularRow::assemble(HEART_COLUMNS, cells).unwrap()
    }

    fn transformer() -> ColumnTransformer {
        ColumnTransformer {
            numeric: vec![NumericColumn { column: "Age".into(), mean: 53.0, scale: 10.0 }],
            categorical: vec![
                CategoricalColumn {
                    column: "Sex".into(),
                    categories: vec!["f".into(), "m".into()],
                    drop_first: true,
                },
                CategoricalColumn {
                    column: "ST_Slope".into(),
                    categories: vec!["down".into(), "flat".into(), "up".into()],
                    drop_first: false,
                },
            ],
        }
    }

    #[test]
    fn test_column_transformer_layout() {
        let ct = transformer();
        ct.validate(HEART_COLUMNS).unwrap();
        assert_eq!(ct.output_width(), 5);

        let out = ct.transform(&heart_row("m")).unwrap();
        assert_eq!(out, array![[1.0, 1.0, 0.0, 1.0, 0.0]]);
    }

    #[test]
    fn test_column_transformer_dropped_and_unknown_categories() {
        let ct = transformer();

        // First category is dropped → all zeros for Sex block
        let out = ct.transform(&heart_row("f")).unwrap();
        assert_eq!(out[[0, 1]], 0.0);

        // Unknown category is ignored, not an error
        let out = ct.transform(&heart_row("x")).unwrap();
        assert_eq!(out[[0, 1]], 0.0);
    }

    #[test]
    fn test_column_transformer_unknown_column() {
        let mut ct = transformer();
        ct.numeric.push(NumericColumn { column: "Weight".into(), mean: 0.0, scale: 1.0 });
        assert!(ct.validate(HEART_COLUMNS).is_err());
    }
}
