use std::path::Path;
use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{Value, json};
use tracing::{info, warn};

use crate::client::OllamaClient;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::prompts::PromptSet;
use crate::reviewer::Reviewer;
use crate::schema::ReviewReport;

pub const DEFAULT_BIND: &str = "127.0.0.1:8741";

/// Extensions rejected before any model call. Everything else is decoded
/// lossily and reviewed as text.
const BINARY_EXTS: &[&str] = &["png", "jpg", "jpeg", "gif", "pdf", "zip", "exe", "dmg", "bin"];

pub struct AppState {
    reviewer: Reviewer<OllamaClient>,
    model: String,
    base_url: String,
}

/// Serve the browser upload UI and the review API until the process is killed.
pub async fn run_server(config: Config) -> Result<()> {
    let client = OllamaClient::new(
        &config.base_url,
        &config.model,
        config.temperature,
        config.num_ctx,
    );
    let prompts = PromptSet::load(config.prompt_dir.as_deref().map(Path::new))?;
    let state = Arc::new(AppState {
        reviewer: Reviewer::new(client, prompts, config.max_chars),
        model: config.model.clone(),
        base_url: config.base_url.clone(),
    });
    let router = build_router(state);

    let listener = tokio::net::TcpListener::bind(&config.bind)
        .await
        .map_err(|e| Error::Serve(format!("cannot bind {}: {e}", config.bind)))?;
    info!(model = %config.model, "review UI listening on http://{}", config.bind);
    axum::serve(listener, router)
        .await
        .map_err(|e| Error::Serve(e.to_string()))
}

pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/api/info", get(info_handler))
        .route("/api/review", post(review_handler))
        .with_state(state)
}

async fn index() -> Html<&'static str> {
    Html(include_str!("ui/index.html"))
}

async fn info_handler(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({ "model": state.model, "base_url": state.base_url }))
}

#[derive(Deserialize)]
pub struct ReviewRequest {
    pub files: Vec<UploadedFile>,
}

#[derive(Deserialize)]
pub struct UploadedFile {
    pub name: String,
    pub content: String,
}

/// Review every uploaded file in request order. Failures never fail the
/// request: each file independently degrades to a zero-score report.
async fn review_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ReviewRequest>,
) -> Json<Value> {
    let mut reports = Vec::with_capacity(body.files.len());
    for file in body.files {
        reports.push(review_upload(state.clone(), file).await);
    }
    Json(json!({ "reports": reports }))
}

async fn review_upload(state: Arc<AppState>, file: UploadedFile) -> ReviewReport {
    if !is_probably_text(&file.name) {
        info!(path = %file.name, "skipping binary upload");
        return skipped_report(&file.name);
    }

    let path = file.name.clone();
    let joined =
        tokio::task::spawn_blocking(move || state.reviewer.review_code(&file.name, &file.content))
            .await;
    match joined {
        Ok(Ok(report)) => report,
        Ok(Err(e)) => {
            warn!(path = %path, error = %e, "review failed");
            ReviewReport::degraded(&path, &e.to_string())
        }
        Err(e) => {
            warn!(path = %path, error = %e, "review task failed");
            ReviewReport::degraded(&path, &e.to_string())
        }
    }
}

fn is_probably_text(name: &str) -> bool {
    match Path::new(name).extension().and_then(|e| e.to_str()) {
        Some(ext) => !BINARY_EXTS.contains(&ext.to_ascii_lowercase().as_str()),
        None => true,
    }
}

fn skipped_report(path: &str) -> ReviewReport {
    ReviewReport {
        path: path.to_string(),
        language: "unknown".to_string(),
        summary: "Skipped non-text/binary-ish file".to_string(),
        score: 0,
        findings: Vec::new(),
    }
}
