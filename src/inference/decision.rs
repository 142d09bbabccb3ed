//! Output interpretation
//!
//! Turns a raw score vector into a class index + confidence.
//! - 1 score  → binary: class 1 iff score ≥ 0.5, the score is the confidence
//! - N scores → argmax, first index wins ties

use super::InferenceError;

/// Binary decision boundary for single-score models
pub const BINARY_THRESHOLD: f32 = 0.5;

/// Chosen class and the score backing it (0.0 - 1.0)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassPick {
    pub index: usize,
    pub confidence: f32,
}

impl ClassPick {
    /// Confidence as a percentage rounded to two decimals
    pub fn confidence_percent(&self) -> f64 {
        round_percent(self.confidence)
    }
}

/// Interpret raw model output
pub fn interpret(scores: &[f32]) -> Result<ClassPick, InferenceError> {
    if scores.is_empty() {
        return Err(InferenceError("model produced no output".to_string()));
    }
    if let Some(bad) = scores.iter().find(|s| !s.is_finite()) {
        return Err(InferenceError(format!("model produced non-finite score {}", bad)));
    }

    if scores.len() == 1 {
        let score = scores[0];
        let index = usize::from(score >= BINARY_THRESHOLD);
        return Ok(ClassPick { index, confidence: score });
    }

    let mut best = 0;
    for (i, score) in scores.iter().enumerate().skip(1) {
        if *score > scores[best] {
            best = i;
        }
    }

    Ok(ClassPick { index: best, confidence: scores[best] })
}

/// Align raw scores with an ordered class list.
///
/// A single score against two classes expands to `[1 - p, p]`.
pub fn per_class_scores(scores: &[f32], class_count: usize) -> Result<Vec<f32>, InferenceError> {
    match (scores.len(), class_count) {
        (1, 2) => Ok(vec![1.0 - scores[0], scores[0]]),
        (n, c) if n == c => Ok(scores.to_vec()),
        (n, c) => Err(InferenceError(format!(
            "model produced {} scores for {} classes",
            n, c
        ))),
    }
}

pub fn round_percent(confidence: f32) -> f64 {
    (f64::from(confidence) * 100.0 * 100.0).round() / 100.0
}
