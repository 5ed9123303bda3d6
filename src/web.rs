use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::path::Path;
use std::sync::Arc;
use tower_http::services::ServeDir;

use crate::handlers::ReportHandler;

pub mod render;

pub struct AppState {
    pub report_handler: Arc<ReportHandler>,
}

pub fn create_router(report_handler: Arc<ReportHandler>, static_dir: &Path, max_upload_bytes: usize) -> Router {
    let state = Arc::new(AppState { report_handler });

    Router::new()
        .route("/", get(upload_page))
        .route("/explain", post(explain_handler))
        .route("/health", get(health_check))
        .nest_service("/static", ServeDir::new(static_dir))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .with_state(state)
}

/// Errors surfaced to the browser.
#[derive(Debug)]
pub enum WebError {
    NoFile,
    BadUpload(String),
    Pipeline(anyhow::Error),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response {
        match self {
            WebError::NoFile => (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "No file uploaded"})),
            )
                .into_response(),
            WebError::BadUpload(message) => {
                log::warn!("⚠️ Rejected upload: {}", message);
                (StatusCode::BAD_REQUEST, Json(json!({"error": message}))).into_response()
            }
            WebError::Pipeline(e) => {
                log::error!("❌ Report pipeline failed: {:#}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, Html(render::render_server_error())).into_response()
            }
        }
    }
}

impl From<anyhow::Error> for WebError {
    fn from(e: anyhow::Error) -> Self {
        WebError::Pipeline(e)
    }
}

struct Upload {
    filename: String,
    data: Vec<u8>,
}

/// Pull the `file` part out of the form. A part without a filename counts as
/// missing, and so does a body that breaks before its first part.
async fn read_upload(mut multipart: Multipart) -> Result<Option<Upload>, WebError> {
    let mut seen_part = false;

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => return Ok(None),
            Err(e) if !seen_part => {
                log::debug!("🔍 Unreadable multipart body treated as no file: {}", e);
                return Ok(None);
            }
            Err(e) => {
                return Err(WebError::BadUpload(format!(
                    "Failed to parse multipart data: {}",
                    e
                )))
            }
        };
        seen_part = true;

        if field.name() != Some("file") {
            continue;
        }

        let filename = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Ok(None),
        };
        let data = field
            .bytes()
            .await
            .map_err(|e| WebError::BadUpload(format!("Failed to read file: {}", e)))?;

        return Ok(Some(Upload {
            filename,
            data: data.to_vec(),
        }));
    }
}

async fn explain_handler(
    State(state): State<Arc<AppState>>,
    multipart: Option<Multipart>,
) -> Result<Html<String>, WebError> {
    let upload = match multipart {
        Some(multipart) => read_upload(multipart).await?,
        None => None,
    };
    let Some(upload) = upload else {
        log::info!("ℹ️ Explain request without a file");
        return Err(WebError::NoFile);
    };

    let report = state
        .report_handler
        .explain_upload(&upload.filename, &upload.data)
        .await?;

    Ok(Html(render::render_result(&upload.filename, &report)?))
}

async fn upload_page() -> Result<Html<String>, WebError> {
    Ok(Html(render::render_upload()?))
}

async fn health_check() -> &'static str {
    "OK"
}
