//! Server-side HTML for the upload, result and error pages.

use anyhow::Result;
use askama::Template;
use serde_json::Value;

use crate::models::{ErrorEnvelope, ReportResult};

#[derive(Template)]
#[template(path = "upload.html")]
struct UploadTemplate;

#[derive(Template)]
#[template(path = "error.html")]
struct ErrorTemplate;

#[derive(Template)]
#[template(path = "result.html")]
struct ResultTemplate<'a> {
    filename: &'a str,
    envelope: Option<&'a ErrorEnvelope>,
    health_score: Option<&'a str>,
    /// Width of the score bar, 0-100.
    score_percent: Option<f64>,
    explanation: Option<&'a str>,
    recommendations: Vec<&'a str>,
    extra: Option<&'a str>,
}

pub fn render_upload() -> Result<String> {
    Ok(UploadTemplate.render()?)
}

pub fn render_result(filename: &str, report: &ReportResult) -> Result<String> {
    let extra = match report {
        ReportResult::Parsed(map) => unrendered_fields(map),
        ReportResult::Invalid(_) => None,
    };
    let envelope = match report {
        ReportResult::Invalid(envelope) => Some(envelope),
        ReportResult::Parsed(_) => None,
    };
    let health_score = report.health_score();

    let template = ResultTemplate {
        filename,
        envelope,
        health_score,
        score_percent: health_score.and_then(parse_percent),
        explanation: report.explanation(),
        recommendations: report.recommendations(),
        extra: extra.as_deref(),
    };

    Ok(template.render()?)
}

pub fn render_server_error() -> String {
    ErrorTemplate
        .render()
        .unwrap_or_else(|_| "Internal Server Error".to_string())
}

/// Read a score like `"82%"` or `"82.5 %"`, clamped to 0-100.
pub fn parse_percent(score: &str) -> Option<f64> {
    let number = score.trim().trim_end_matches('%').trim();
    let value = number.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }
    Some(value.clamp(0.0, 100.0))
}

/// Keys the model added on its own, or known keys with unexpected types,
/// as pretty JSON.
fn unrendered_fields(map: &serde_json::Map<String, Value>) -> Option<String> {
    let extra: serde_json::Map<String, Value> = map
        .iter()
        .filter(|(key, value)| !is_rendered(key, value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if extra.is_empty() {
        return None;
    }
    serde_json::to_string_pretty(&Value::Object(extra)).ok()
}

fn is_rendered(key: &str, value: &Value) -> bool {
    match key {
        "health_score" | "explanation" => value.is_string(),
        "recommendations" => value
            .as_array()
            .map(|items| items.iter().all(Value::is_string))
            .unwrap_or(false),
        _ => false,
    }
}
