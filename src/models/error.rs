use serde::{Deserialize, Serialize};

/// Body of every non-2xx response: a human-readable detail plus, for
/// validation failures, the list of failing fields.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorBody {
    pub detail: String,
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub issues: Vec<FieldIssue>,
}

/// One failing field and the constraint it broke.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldIssue {
    pub field: String,
    pub constraint: String,
}

impl FieldIssue {
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

impl ErrorBody {
    /// Create an error body with a detail message only.
    pub fn message(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
            issues: Vec::new(),
        }
    }

    /// Create a validation error body listing every failing field.
    pub fn validation(issues: Vec<FieldIssue>) -> Self {
        Self {
            detail: "Validation failed".to_string(),
            issues,
        }
    }
}
