use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const INVALID_JSON: &str = "Invalid JSON";

/// Fallback returned when model output cannot be read as a JSON object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    pub error: String,
    /// The model text exactly as received, before any repair.
    pub raw_output: String,
}

impl ErrorEnvelope {
    pub fn invalid_json(raw_output: &str) -> Self {
        Self {
            error: INVALID_JSON.to_string(),
            raw_output: raw_output.to_string(),
        }
    }
}

/// Outcome of the explanation stage.
///
/// `Parsed` holds whatever object the model produced; the expected keys
/// (`health_score`, `explanation`, `recommendations`) are not enforced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ReportResult {
    Parsed(Map<String, Value>),
    Invalid(ErrorEnvelope),
}

impl ReportResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ReportResult::Parsed(_))
    }

    pub fn health_score(&self) -> Option<&str> {
        self.field("health_score").and_then(Value::as_str)
    }

    pub fn explanation(&self) -> Option<&str> {
        self.field("explanation").and_then(Value::as_str)
    }

    /// String entries of `recommendations`; anything else in the list is skipped.
    pub fn recommendations(&self) -> Vec<&str> {
        self.field("recommendations")
            .and_then(Value::as_array)
            .map(|items| items.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default()
    }

    fn field(&self, key: &str) -> Option<&Value> {
        match self {
            ReportResult::Parsed(map) => map.get(key),
            ReportResult::Invalid(_) => None,
        }
    }
}
