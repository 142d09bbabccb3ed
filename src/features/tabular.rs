//! Tabular Row - single-row table for the clinical model
//!
//! ## Rules
//! 1. `HEART_COLUMNS` is the training column order
//! 2. Categorical cells keep their raw token; one-hot happens in the
//!    stored column transformer, never here

use super::PreprocessingError;

/// Heart disease columns in exact training order
pub const HEART_COLUMNS: &[&str] = &[
    "Age",            // 0: years
    "Sex",            // 1: m | f
    "ChestPainType",  // 2: ata | nap | asy | ta
    "RestingBP",      // 3: mm Hg
    "Cholesterol",    // 4: mg/dl
    "FastingBS",      // 5: 0 | 1
    "RestingECG",     // 6: normal | st | lvh
    "MaxHR",          // 7: bpm
    "ExerciseAngina", // 8: n | y
    "Oldpeak",        // 9: ST depression
    "ST_Slope",       // 10: up | flat | down
];

/// One table cell
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Number(f32),
    Token(String),
}

impl Cell {
    pub fn as_number(&self) -> Option<f32> {
        match self {
            Cell::Number(v) => Some(*v),
            Cell::Token(_) => None,
        }
    }
}

/// A single row whose cells line up with a fixed column list
#[derive(Debug, Clone)]
pub struct TabularRow {
    columns: &'static [&'static str],
    cells: Vec<Cell>,
}

impl TabularRow {
    /// Assemble a row from `(column, cell)` pairs that must follow `columns` exactly
    pub fn assemble(
        columns: &'static [&'static str],
        cells: Vec<(&str, Cell)>,
    ) -> Result<Self, PreprocessingError> {
        if cells.len() != columns.len() {
            return Err(PreprocessingError(format!(
                "row has {} cells, schema has {} columns",
                cells.len(),
                columns.len()
            )));
        }

        let mut ordered = Vec::with_capacity(cells.len());
        for (expected, (name, cell)) in columns.iter().zip(cells) {
            if *expected != name {
                return Err(PreprocessingError(format!(
                    "column out of order: expected {}, got {}",
                    expected, name
                )));
            }
            ordered.push(cell);
        }

        Ok(Self { columns, cells: ordered })
    }

    pub fn columns(&self) -> &'static [&'static str] {
        self.columns
    }

    /// Look up a cell by column name
    pub fn get(&self, column: &str) -> Option<&Cell> {
        self.columns
            .iter()
            .position(|c| *c == column)
            .and_then(|i| self.cells.get(i))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const COLS: &[&str] = &["Age", "Sex"];

    #[test]
    fn test_assemble_in_order() {
        let row = TabularRow::assemble(
            COLS,
            vec![("Age", Cell::Number(63.0)), ("Sex", Cell::Token("m".into()))],
        )
        .unwrap();

        assert_eq!(row.get("Age").and_then(Cell::as_number), Some(63.0));
        assert_eq!(row.get("Sex"), Some(&Cell::Token("m".into())));
        assert!(row.get("MaxHR").is_none());
    }

    #[test]
    fn test_assemble_rejects_misordered_columns() {
        let err = TabularRow::assemble(
            COLS,
            vec![("Sex", Cell::Token("m".into())), ("Age", Cell::Number(63.0))],
        )
        .unwrap_err();
        assert!(err.0.contains("out of order"));
    }

    #[test]
    fn test_assemble_rejects_wrong_width() {
        assert!(TabularRow::assemble(COLS, vec![("Age", Cell::Number(1.0))]).is_err());
    }

    #[test]
    fn test_heart_layout_width() {
        assert_eq!(HEART_COLUMNS.len(), 11);
        assert_eq!(HEART_COLUMNS[0], "Age");
        assert_eq!(HEART_COLUMNS[10], "ST_Slope");
    }
}
