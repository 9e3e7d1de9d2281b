use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::error::FieldIssue;

/// Map of patient id to record, exactly as persisted in the data file. Ids are
/// the map keys and never appear inside the record values.
pub type PatientMap = BTreeMap<String, Patient>;

/// BMI from height (meters) and weight (kilograms), rounded to 2 decimals.
pub fn compute_bmi(height: f64, weight: f64) -> f64 {
    (weight / (height * height) * 100.0).round() / 100.0
}

/// Patient gender with its exact lowercase wire values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Others,
}

impl Gender {
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
            Gender::Others => "others",
        }
    }

    fn parse(value: &str) -> Option<Self> {
        match value {
            "male" => Some(Gender::Male),
            "female" => Some(Gender::Female),
            "others" => Some(Gender::Others),
            _ => None,
        }
    }
}

/// Weight category derived from BMI. The whole 18.5-30 range is a single
/// "Normal" band; there is no separate overweight label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verdict {
    Underweighted,
    Normal,
    Obese,
}

impl Verdict {
    /// Category for a BMI value.
    pub fn from_bmi(bmi: f64) -> Self {
        if bmi < 18.5 {
            Verdict::Underweighted
        } else if bmi < 30.0 {
            Verdict::Normal
        } else {
            Verdict::Obese
        }
    }
}

impl Default for Verdict {
    // Consistent with the bmi = 0 default for records missing numeric fields.
    fn default() -> Self {
        Verdict::Underweighted
    }
}

/// A validated patient record. `bmi` and `verdict` are derived from height and
/// weight, recomputed on every create and edit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub city: String,
    pub age: u32,
    pub gender: Gender,
    // Numeric fields missing from a hand-edited data file read back as 0.
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub weight: f64,
    #[serde(default)]
    pub bmi: f64,
    #[serde(default)]
    pub verdict: Verdict,
}

/// Raw record fields as they arrive on the wire. Range and enum checks happen
/// in `validate` rather than during deserialization so violations come back as
/// one structured list per request.
#[derive(Debug, Clone, Deserialize)]
pub struct PatientInput {
    pub name: String,
    pub city: String,
    pub age: i64,
    pub gender: String,
    pub height: f64,
    pub weight: f64,
}

impl PatientInput {
    /// Check every field, collecting one issue per violation, then derive bmi
    /// and verdict for the accepted record.
    pub fn validate(self) -> Result<Patient, Vec<FieldIssue>> {
        let mut issues = Vec::new();

        if self.age <= 0 || self.age >= 60 {
            issues.push(FieldIssue::new(
                "age",
                "must be greater than 0 and less than 60",
            ));
        }
        if self.height <= 0.0 {
            issues.push(FieldIssue::new("height", "must be greater than 0"));
        }
        if self.weight <= 0.0 {
            issues.push(FieldIssue::new("weight", "must be greater than 0"));
        }
        let gender = match Gender::parse(&self.gender) {
            Some(gender) => gender,
            None => {
                issues.push(FieldIssue::new(
                    "gender",
                    "must be one of male, female or others",
                ));
                return Err(issues);
            }
        };
        if !issues.is_empty() {
            return Err(issues);
        }

        let bmi = compute_bmi(self.height, self.weight);
        Ok(Patient {
            name: self.name,
            city: self.city,
            age: self.age as u32,
            gender,
            height: self.height,
            weight: self.weight,
            bmi,
            verdict: Verdict::from_bmi(bmi),
        })
    }
}

/// Body of a create request: a full set of record fields plus the id under
/// which they are stored.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub id: String,
    #[serde(flatten)]
    pub fields: PatientInput,
}

/// Body of an edit request: any subset of the record fields.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PatientUpdate {
    pub name: Option<String>,
    pub city: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
}

impl PatientUpdate {
    /// Merge the supplied fields onto an existing record, then run the full
    /// validation and derivation pipeline on the merged result. A merged field
    /// that is out of range fails the edit even if this request left it alone.
    pub fn merge_into(self, existing: &Patient) -> Result<Patient, Vec<FieldIssue>> {
        let merged = PatientInput {
            name: self.name.unwrap_or_else(|| existing.name.clone()),
            city: self.city.unwrap_or_else(|| existing.city.clone()),
            age: self.age.unwrap_or(existing.age as i64),
            gender: self
                .gender
                .unwrap_or_else(|| existing.gender.as_str().to_string()),
            height: self.height.unwrap_or(existing.height),
            weight: self.weight.unwrap_or(existing.weight),
        };
        merged.validate()
    }
}
