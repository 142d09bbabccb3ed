//! Features Module - Feature Builders
//!
//! Turns validated request payloads into the exact numeric layout each
//! trained model expects. Models raise no error on a misordered vector,
//! so column order must match training exactly.

pub mod image;
pub mod schema;
pub mod tabular;

pub use schema::{FeatureSchema, SymptomVector};
pub use tabular::{Cell, TabularRow, HEART_COLUMNS};

/// Raw payload could not be converted into model input
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct PreprocessingError(pub String);
