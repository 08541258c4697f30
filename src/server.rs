//! HTTP layer: routes, handlers, and graceful serving.

use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use serde::{Deserialize, Serialize};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::answerer::DocumentAnswerer;
use crate::extractor::extract_text;

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    answerer: Arc<DocumentAnswerer>,
}

impl AppState {
    /// Creates the state shared across handlers.
    pub fn new(answerer: Arc<DocumentAnswerer>) -> Self {
        Self { answerer }
    }
}

/// Errors reported to the browser as `{"detail": ...}` payloads.
enum ApiError {
    BadRequest(&'static str),
    Internal(&'static str),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::BadRequest(detail) => (StatusCode::BAD_REQUEST, detail),
            ApiError::Internal(detail) => (StatusCode::INTERNAL_SERVER_ERROR, detail),
        };
        (status, Json(serde_json::json!({ "detail": detail }))).into_response()
    }
}

#[derive(Debug, Serialize)]
struct ExtractResponse {
    filename: String,
    text: String,
}

#[derive(Debug, Deserialize)]
struct AskRequest {
    #[serde(default)]
    document_text: String,
    #[serde(default)]
    question: String,
    #[serde(default)]
    model: Option<String>,
}

#[derive(Debug, Serialize)]
struct AskResponse {
    answer: String,
}

/// Builds the application router over `state`, serving the frontend from
/// `static_dir`.
pub fn router(state: AppState, static_dir: &Path) -> Router {
    Router::new()
        .route("/api/extract", post(extract_endpoint))
        .route("/api/ask", post(ask_endpoint))
        .route_service("/", ServeFile::new(static_dir.join("index.html")))
        .nest_service("/static", ServeDir::new(static_dir))
        // Uploads are unbounded; axum caps request bodies at 2MB by default.
        .layer(DefaultBodyLimit::disable())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// `POST /api/extract`: accepts a multipart upload and returns its text.
async fn extract_endpoint(mut multipart: Multipart) -> Result<Json<ExtractResponse>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|_| ApiError::BadRequest("Uploaded file is empty."))?
    {
        if field.name() == Some("file") {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field
                .bytes()
                .await
                .map_err(|_| ApiError::BadRequest("Uploaded file is empty."))?;
            upload = Some((filename, bytes.to_vec()));
        }
    }

    let (filename, bytes) = upload.ok_or(ApiError::BadRequest("Uploaded file is empty."))?;
    if bytes.is_empty() {
        return Err(ApiError::BadRequest("Uploaded file is empty."));
    }

    // Extraction is synchronous; keep it off the async workers.
    let extract_filename = filename.clone();
    let text = tokio::task::spawn_blocking(move || extract_text(&bytes, &extract_filename))
        .await
        .map_err(|e| {
            tracing::error!("extraction task failed: {e}");
            ApiError::Internal("Failed to extract document text.")
        })?;

    tracing::info!(filename = %filename, chars = text.len(), "extracted text from upload");

    Ok(Json(ExtractResponse { filename, text }))
}

/// `POST /api/ask`: answers a question about previously extracted text.
async fn ask_endpoint(
    State(state): State<AppState>,
    Json(request): Json<AskRequest>,
) -> Result<Json<AskResponse>, ApiError> {
    if request.document_text.trim().is_empty() {
        return Err(ApiError::BadRequest("No document text provided."));
    }
    if request.question.trim().is_empty() {
        return Err(ApiError::BadRequest("Question cannot be empty."));
    }

    // The answerer blocks on the LLM round trip.
    let answerer = state.answerer.clone();
    let answer = tokio::task::spawn_blocking(move || {
        answerer.answer(
            &request.document_text,
            &request.question,
            request.model.as_deref(),
        )
    })
    .await
    .map_err(|e| {
        tracing::error!("answer task failed: {e}");
        ApiError::Internal("Failed to query local LLM.")
    })?;

    Ok(Json(AskResponse { answer }))
}

/// Binds `addr` and serves `router` until a shutdown signal arrives.
pub async fn serve(router: Router, addr: SocketAddr) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;

    tracing::info!("listening on http://{addr}");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")
}

/// Resolves when the process receives Ctrl-C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl-C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
