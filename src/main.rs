mod config;
mod handlers;
mod models;
mod services;
mod web; // Upload form and result pages

use anyhow::Result;
use dotenv::dotenv;
use std::path::Path;
use std::sync::Arc;

use config::AppConfig;
use handlers::ReportHandler;
use web::create_router;

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables first so RUST_LOG from .env applies
    dotenv().ok();

    // Initialize logger
    env_logger::init();

    log::info!("🚀 Starting Report Explainer...");

    let config = AppConfig::from_env();

    if !config.upload_dir.exists() {
        std::fs::create_dir_all(&config.upload_dir)?;
        log::info!("📁 Created upload directory: {}", config.upload_dir.display());
    }

    let report_handler = Arc::new(ReportHandler::from_config(&config)?);
    log::info!(
        "✅ Groq clients initialized (vision: {}, chat: {})",
        config.vision_model,
        config.chat_model
    );
    match config.request_timeout {
        Some(timeout) => log::info!("⏱️ External request timeout: {:?}", timeout),
        None => log::warn!("⚠️ No REQUEST_TIMEOUT_SECS set, external calls are unbounded"),
    }

    let app = create_router(report_handler, Path::new("static"), config.max_upload_bytes);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr).await?;
    log::info!("🌐 Server listening on http://{}", config.bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            log::info!("🛑 Shutting down...");
        })
        .await?;

    Ok(())
}
