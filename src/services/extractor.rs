use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use std::path::Path;
use std::sync::Arc;

use super::groq::{ChatMessage, ChatRequest, ContentPart, GroqClient, ImageData};

const EXTRACT_INSTRUCTION: &str = "extract the test data as a json";

/// Reads a report image and asks the vision model to transcribe it.
pub struct ImageExtractor {
    client: Arc<GroqClient>,
    model: String,
}

impl ImageExtractor {
    pub fn new(client: Arc<GroqClient>, model: String) -> Self {
        Self { client, model }
    }

    /// Returns the model's text as-is; repair happens downstream.
    pub async fn extract_image(&self, image_path: &Path) -> Result<String> {
        log::debug!("📸 Starting text extraction for: {}", image_path.display());

        let image_data = tokio::fs::read(image_path).await?;
        let base64_image = general_purpose::STANDARD.encode(&image_data);

        log::debug!("📊 Image file size: {} bytes", image_data.len());
        log::debug!("🔄 Base64 encoded size: {} bytes", base64_image.len());

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![ChatMessage::user_parts(vec![
                ContentPart::Text {
                    text: EXTRACT_INSTRUCTION.to_string(),
                },
                ContentPart::ImageUrl {
                    image_url: ImageData {
                        url: format!("data:image/jpeg;base64,{}", base64_image),
                    },
                },
            ])],
        };

        let extracted = self.client.chat_completion(&request).await?;
        log::info!("✅ Extracted {} characters from {}", extracted.len(), image_path.display());

        Ok(extracted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_extract_image_sends_inline_jpeg() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("report.jpg");
        std::fs::write(&image_path, b"fake-jpeg").unwrap();

        let expected_url = format!(
            "data:image/jpeg;base64,{}",
            general_purpose::STANDARD.encode(b"fake-jpeg")
        );

        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(body_partial_json(json!({
                "model": "vision-model",
                "messages": [{
                    "role": "user",
                    "content": [
                        {"type": "text", "text": "extract the test data as a json"},
                        {"type": "image_url", "image_url": {"url": expected_url}}
                    ]
                }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"content": "```json\n{\"hemoglobin\": \"13.5\"}\n```"}}]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = Arc::new(GroqClient::new("k".to_string(), server.uri(), None).unwrap());
        let extractor = ImageExtractor::new(client, "vision-model".to_string());

        let text = extractor.extract_image(&image_path).await.unwrap();

        assert_eq!(text, "```json\n{\"hemoglobin\": \"13.5\"}\n```");
    }

    #[tokio::test]
    async fn test_missing_file_fails_before_any_request() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = Arc::new(GroqClient::new("k".to_string(), server.uri(), None).unwrap());
        let extractor = ImageExtractor::new(client, "vision-model".to_string());

        assert!(extractor
            .extract_image(Path::new("/nonexistent/report.jpg"))
            .await
            .is_err());
    }
}
