use anyhow::Result;
use std::path::PathBuf;
use std::sync::Arc;

use crate::config::AppConfig;
use crate::models::ReportResult;
use crate::services::{ExplanationGenerator, GroqClient, ImageExtractor};

/// Runs one upload through the two-stage pipeline: save, extract, explain.
pub struct ReportHandler {
    upload_dir: PathBuf,
    extractor: ImageExtractor,
    generator: ExplanationGenerator,
}

impl ReportHandler {
    pub fn new(upload_dir: PathBuf, extractor: ImageExtractor, generator: ExplanationGenerator) -> Self {
        Self {
            upload_dir,
            extractor,
            generator,
        }
    }

    /// Build both API clients from the startup config.
    pub fn from_config(config: &AppConfig) -> Result<Self> {
        let vision_client = Arc::new(GroqClient::new(
            config.vision_api_key.clone(),
            config.base_url.clone(),
            config.request_timeout,
        )?);
        let chat_client = Arc::new(GroqClient::new(
            config.chat_api_key.clone(),
            config.base_url.clone(),
            config.request_timeout,
        )?);

        Ok(Self::new(
            config.upload_dir.clone(),
            ImageExtractor::new(vision_client, config.vision_model.clone()),
            ExplanationGenerator::new(chat_client, config.chat_model.clone()),
        ))
    }

    /// The file is stored under its original name and overwrites any earlier
    /// upload with the same name.
    pub async fn explain_upload(&self, filename: &str, data: &[u8]) -> Result<ReportResult> {
        log::info!("📨 Report upload received: {} ({} bytes)", filename, data.len());

        let filepath = self.upload_dir.join(filename);
        tokio::fs::write(&filepath, data).await?;
        log::debug!("💾 Saved upload to: {}", filepath.display());

        let extracted = self.extractor.extract_image(&filepath).await?;
        let report = self.generator.generate_explanation(&extracted).await?;

        Ok(report)
    }
}
