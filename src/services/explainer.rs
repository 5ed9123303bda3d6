use anyhow::Result;
use std::sync::Arc;

use super::groq::{ChatMessage, ChatRequest, GroqClient};
use super::normalizer::normalize;
use crate::models::ReportResult;

const SYSTEM_PROMPT: &str = r#"You are a medical report analyser.
Output strictly valid JSON in this structure:
{
  "health_score": "a percentage number between 0 and 100, always include the % sign",
  "explanation": "A detailed paragraph (at least 6-8 sentences) giving an in-depth medical analysis of the findings, explaining the meaning of abnormal/normal results, possible causes, and their implications for the patient.",
  "recommendations": ["...", "..."]
}"#;

/// Turns extracted report text into a structured explanation.
pub struct ExplanationGenerator {
    client: Arc<GroqClient>,
    model: String,
}

impl ExplanationGenerator {
    pub fn new(client: Arc<GroqClient>, model: String) -> Self {
        Self { client, model }
    }

    /// API failures are returned as errors; malformed output is not.
    pub async fn generate_explanation(&self, input_text: &str) -> Result<ReportResult> {
        log::info!("🩺 Requesting explanation for {} characters of report text", input_text.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::system(SYSTEM_PROMPT), ChatMessage::user(input_text)],
        };

        let full_response = self.client.chat_completion(&request).await?;
        let report = normalize(&full_response);

        if report.is_parsed() {
            log::info!("✅ Explanation parsed successfully");
        } else {
            log::warn!("⚠️ Explanation was not valid JSON, returning raw output");
        }

        Ok(report)
    }
}
