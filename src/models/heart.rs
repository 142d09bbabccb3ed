//! Heart disease request/response model

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::features::{Cell, PreprocessingError, TabularRow, HEART_COLUMNS};
use crate::inference::InferenceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    M,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChestPainType {
    Ata,
    Nap,
    Asy,
    Ta,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RestingEcg {
    Normal,
    St,
    Lvh,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StSlope {
    Up,
    Flat,
    Down,
}

/// Exercise-induced angina. Only `"y"` means yes; any other value is `"n"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExerciseAngina {
    No,
    Yes,
}

impl<'de> Deserialize<'de> for ExerciseAngina {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = serde_json::Value::deserialize(deserializer)?;
        Ok(if value.as_str() == Some("y") {
            ExerciseAngina::Yes
        } else {
            ExerciseAngina::No
        })
    }
}

/// Integer field that also takes integral floats such as `63.0`
fn integral<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let number = serde_json::Number::deserialize(deserializer)?;
    number
        .as_i64()
        .or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        })
        .ok_or_else(|| D::Error::custom(format!("expected an integer, got {}", number)))
}

impl Sex {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sex::M => "m",
            Sex::F => "f",
        }
    }
}

impl ChestPainType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChestPainType::Ata => "ata",
            ChestPainType::Nap => "nap",
            ChestPainType::Asy => "asy",
            ChestPainType::Ta => "ta",
        }
    }
}

impl RestingEcg {
    pub fn as_str(&self) -> &'static str {
        match self {
            RestingEcg::Normal => "normal",
            RestingEcg::St => "st",
            RestingEcg::Lvh => "lvh",
        }
    }
}

impl StSlope {
    pub fn as_str(&self) -> &'static str {
        match self {
            StSlope::Up => "up",
            StSlope::Flat => "flat",
            StSlope::Down => "down",
        }
    }
}

impl ExerciseAngina {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExerciseAngina::No => "n",
            ExerciseAngina::Yes => "y",
        }
    }
}

/// Clinical fields for `POST /hd`
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct HeartDiseaseRequest {
    /// Age in years
    #[serde(deserialize_with = "integral")]
    #[validate(range(min = 0, max = 120))]
    pub age: i64,

    pub sex: Sex,

    #[serde(rename = "ChestPainType")]
    pub chest_pain_type: ChestPainType,

    /// Resting blood pressure (mm Hg)
    #[serde(rename = "RestingBP", deserialize_with = "integral")]
    #[validate(range(min = 50, max = 250))]
    pub resting_bp: i64,

    /// Serum cholesterol (mg/dl)
    #[serde(rename = "Cholesterol", deserialize_with = "integral")]
    #[validate(range(min = 100, max = 600))]
    pub cholesterol: i64,

    #[serde(rename = "FastingBS", deserialize_with = "integral")]
    #[validate(range(min = 0, max = 1))]
    pub fasting_bs: i64,

    #[serde(rename = "RestingECG")]
    pub resting_ecg: RestingEcg,

    /// Maximum heart rate achieved
    #[serde(rename = "MaxHR", deserialize_with = "integral")]
    #[validate(range(min = 60, max = 220))]
    pub max_hr: i64,

    #[serde(rename = "ExerciseAngina")]
    pub exercise_angina: ExerciseAngina,

    /// ST depression induced by exercise
    #[serde(rename = "Oldpeak")]
    #[validate(range(min = 0.0, max = 10.0))]
    pub oldpeak: f64,

    #[serde(rename = "ST_Slope")]
    pub st_slope: StSlope,
}

impl HeartDiseaseRequest {
    /// Single-row table in training column order; categoricals stay raw tokens
    pub fn to_row(&self) -> Result<TabularRow, PreprocessingError> {
        let token = |s: &str| Cell::Token(s.to_string());

        TabularRow::assemble(
            HEART_COLUMNS,
            vec![
                ("Age", Cell::Number(self.age as f32)),
                ("Sex", token(self.sex.as_str())),
                ("ChestPainType", token(self.chest_pain_type.as_str())),
                ("RestingBP", Cell::Number(self.resting_bp as f32)),
                ("Cholesterol", Cell::Number(self.cholesterol as f32)),
                ("FastingBS", Cell::Number(self.fasting_bs as f32)),
                ("RestingECG", token(self.resting_ecg.as_str())),
                ("MaxHR", Cell::Number(self.max_hr as f32)),
                ("ExerciseAngina", token(self.exercise_angina.as_str())),
                ("Oldpeak", Cell::Number(self.oldpeak as f32)),
                ("ST_Slope", token(self.st_slope.as_str())),
            ],
        )
    }
}

/// Binary outcome, keyed by the class index the model emits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeartOutcome {
    NoHeartDisease = 0,
    HeartDisease = 1,
}

impl HeartOutcome {
    pub fn from_class(index: usize) -> Result<Self, InferenceError> {
        match index {
            0 => Ok(HeartOutcome::NoHeartDisease),
            1 => Ok(HeartOutcome::HeartDisease),
            other => Err(InferenceError(format!("unexpected heart class {}", other))),
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            HeartOutcome::NoHeartDisease => "No Heart Disease Detected",
            HeartOutcome::HeartDisease => "Heart Disease Detected",
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HeartPredictionResponse {
    pub prediction: String,
}

impl From<HeartOutcome> for HeartPredictionResponse {
    fn from(outcome: HeartOutcome) -> Self {
        Self { prediction: outcome.message().to_string() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> serde_json::Value {
        json!({
            "age": 63, "sex": "m", "ChestPainType": "asy", "RestingBP": 145,
            "Cholesterol": 233, "FastingBS": 1, "RestingECG": "normal", "MaxHR": 150,
            "ExerciseAngina": "n", "Oldpeak": 2.3, "ST_Slope": "flat"
        })
    }

    #[test]
    fn test_reference_case_is_valid() {
        let req: HeartDiseaseRequest = serde_json::from_value(sample()).unwrap();
        req.validate().unwrap();

        let row = req.to_row().unwrap();
        assert_eq!(row.columns(), HEART_COLUMNS);
        assert_eq!(row.get("Age"), Some(&Cell::Number(63.0)));
        assert_eq!(row.get("ChestPainType"), Some(&Cell::Token("asy".into())));
        assert_eq!(row.get("ST_Slope"), Some(&Cell::Token("flat".into())));
    }

    #[test]
    fn test_out_of_range_fields_fail_validation() {
        for (field, value) in [
            ("age", json!(121)),
            ("RestingBP", json!(49)),
            ("Cholesterol", json!(601)),
            ("MaxHR", json!(59)),
            ("FastingBS", json!(2)),
            ("Oldpeak", json!(10.5)),
        ] {
            let mut body = sample();
            body[field] = value;
            let req: HeartDiseaseRequest = serde_json::from_value(body).unwrap();
            assert!(req.validate().is_err(), "{} should be rejected", field);
        }
    }

    #[test]
    fn test_unknown_enum_token_fails_parsing() {
        let mut body = sample();
        body["ChestPainType"] = json!("xyz");
        assert!(serde_json::from_value::<HeartDiseaseRequest>(body).is_err());

        let mut body = sample();
        body["sex"] = json!("M");
        assert!(serde_json::from_value::<HeartDiseaseRequest>(body).is_err());
    }

    #[test]
    fn test_exercise_angina_coercion() {
        for (raw, expected) in [
            (json!("y"), ExerciseAngina::Yes),
            (json!("n"), ExerciseAngina::No),
            (json!("yes"), ExerciseAngina::No),
            (json!(true), ExerciseAngina::No),
            (json!(null), ExerciseAngina::No),
        ] {
            let mut body = sample();
            body["ExerciseAngina"] = raw;
            let req: HeartDiseaseRequest = serde_json::from_value(body).unwrap();
            assert_eq!(req.exercise_angina, expected);
        }
    }

    #[test]
    fn test_integral_floats_accepted_for_integer_fields() {
        let mut body = sample();
        body["age"] = json!(63.0);
        body["RestingBP"] = json!(145.0);
        body["FastingBS"] = json!(1.0);
        let req: HeartDiseaseRequest = serde_json::from_value(body).unwrap();
        assert_eq!(req.age, 63);
        assert_eq!(req.resting_bp, 145);
        assert_eq!(req.fasting_bs, 1);

        let mut body = sample();
        body["MaxHR"] = json!(150.5);
        assert!(serde_json::from_value::<HeartDiseaseRequest>(body).is_err());

        let mut body = sample();
        body["Cholesterol"] = json!("233");
        assert!(serde_json::from_value::<HeartDiseaseRequest>(body).is_err());
    }

    #[test]
    fn test_missing_field_fails_parsing() {
        let mut body = sample();
        body.as_object_mut().unwrap().remove("MaxHR");
        assert!(serde_json::from_value::<HeartDiseaseRequest>(body).is_err());
    }

    #[test]
    fn test_outcome_mapping() {
        assert_eq!(HeartOutcome::from_class(0).unwrap().message(), "No Heart Disease Detected");
        assert_eq!(HeartOutcome::from_class(1).unwrap().message(), "Heart Disease Detected");
        assert_eq!(HeartOutcome::HeartDisease as u8, 1);
        assert!(HeartOutcome::from_class(2).is_err());
    }
}
