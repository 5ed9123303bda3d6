//! Best-effort recovery of a JSON object from free-form model output.
//!
//! The repair is deliberately narrow: take the span from the first `{` to the
//! last `}`, drop commas that sit directly before a closing bracket, then parse
//! strictly. Anything else lands in an [`ErrorEnvelope`].

use regex::Regex;
use serde_json::Value;
use std::sync::OnceLock;

use crate::models::{ErrorEnvelope, ReportResult};

/// Greedy first-`{`-to-last-`}` span, newlines included.
fn object_span_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(?s)\{.*\}").expect("valid object span pattern"))
}

/// A comma, any whitespace, then a closing bracket. The `\x1C-\x1F`
/// separators count as whitespace.
fn trailing_comma_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r",[\s\x1C-\x1F]*([}\]])").expect("valid trailing comma pattern"))
}

/// Turn raw model text into a report. Never fails.
pub fn normalize(raw: &str) -> ReportResult {
    let candidate = extract_json(raw);

    match serde_json::from_str::<Value>(&candidate) {
        Ok(Value::Object(map)) => ReportResult::Parsed(map),
        Ok(other) => {
            log::warn!("⚠️ Model output parsed to a non-object JSON value: {}", other);
            ReportResult::Invalid(ErrorEnvelope::invalid_json(raw))
        }
        Err(e) => {
            log::warn!("⚠️ Model output is not valid JSON after repair: {}", e);
            ReportResult::Invalid(ErrorEnvelope::invalid_json(raw))
        }
    }
}

/// Isolate the outermost `{...}` span, strip trailing commas and trim.
pub fn extract_json(raw: &str) -> String {
    let span = object_span_re()
        .find(raw)
        .map(|m| m.as_str())
        .unwrap_or(raw);
    strip_trailing_commas(span)
        .trim_matches(is_json_space)
        .to_string()
}

/// Applies inside string literals too.
fn strip_trailing_commas(text: &str) -> String {
    trailing_comma_re().replace_all(text, "$1").into_owned()
}

fn is_json_space(c: char) -> bool {
    c.is_whitespace() || ('\u{1C}'..='\u{1F}').contains(&c)
}
