//! Retina validation outcomes.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Correlated answer of the matching service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationOutcome {
    pub status: String,
    pub matching_employee_id: Option<String>,
    pub similarity: f64,
}

impl ValidationOutcome {
    /// Reads an answer from any of the body shapes the matching service emits.
    ///
    /// Accepted: a flat body with `status`, a body nesting the answer under
    /// `response`, or anything else (treated as a success without match).
    pub fn from_body(body: &Value) -> Self {
        if body.get("status").is_some() {
            return Self::from_fields(body);
        }
        if let Some(nested) = body.get("response").filter(|v| v.is_object()) {
            return Self::from_fields(nested);
        }
        Self {
            status: "success".to_string(),
            matching_employee_id: None,
            similarity: 0.0,
        }
    }

    fn from_fields(fields: &Value) -> Self {
        Self {
            status: fields
                .get("status")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .unwrap_or("success")
                .to_string(),
            matching_employee_id: fields
                .get("matchingEmployeeId")
                .and_then(Value::as_str)
                .filter(|s| !s.is_empty())
                .map(str::to_string),
            similarity: fields.get("similarity").and_then(Value::as_f64).unwrap_or(0.0),
        }
    }

    /// A success that names the matched employee
    pub fn is_match(&self) -> bool {
        self.status == "success" && self.matching_employee_id.is_some()
    }
}

/// Body returned by the validation endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValidationResponse {
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub matching_employee_id: Option<Option<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ValidationResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".to_string(),
            matching_employee_id: None,
            similarity: None,
            message: Some(message.into()),
        }
    }
}

impl From<ValidationOutcome> for ValidationResponse {
    fn from(outcome: ValidationOutcome) -> Self {
        Self {
            status: outcome.status,
            matching_employee_id: Some(outcome.matching_employee_id),
            similarity: Some(outcome.similarity),
            message: None,
        }
    }
}

/// Message id of a matching service answer, taken from the body
pub fn message_id_of(body: &Value) -> Option<String> {
    body.get("messageId")
        .or_else(|| body.get("response").and_then(|r| r.get("messageId")))
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}
