//! HTTP server for the Digest API.
//!
//! Exposes the summarization pipeline over a small JSON API: PDF upload,
//! raw-text summarization, export, and catalog endpoints.

use crate::analyze::TextAnalyzer;
use crate::api::{
    ApiError, HealthResponse, ProcessPdfResponse, StyleInfo, SummarizeResponse,
};
use crate::config::Config;
use crate::export::{self, ExportFile, ExportFormat, ExportMeta, ExportPayload};
use crate::model::{self, ModelClient, ModelError, ModelInfo};
use crate::pdf::{PdfDocument, PdfError};
use crate::pipeline::{self, PipelineError, SummaryOptions};
use crate::style::SummaryStyle;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{debug, info, instrument, warn};
use utoipa::OpenApi;
use uuid::Uuid;

/// OpenAPI documentation for the Digest API
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Digest API",
        version = "0.1.0",
        description = "Document summarization service: extracts text from uploaded PDFs, \
                       summarizes it chunk by chunk through a local model CLI, merges the \
                       partial summaries, and exports the result as text, markdown, or JSON.",
        license(name = "MIT"),
        contact(name = "Digest Contributors")
    ),
    paths(
        health_check,
        process_pdf,
        summarize_text,
        export_summary,
        available_models,
        summary_styles,
    ),
    components(schemas(
        crate::analyze::AnalysisResult,
        crate::analyze::WordFrequency,
        crate::pipeline::PartialSummary,
        crate::api::ApiError,
        crate::api::ApiErrorDetail,
        crate::api::ProcessPdfResponse,
        crate::api::SummarizeResponse,
        crate::api::StyleInfo,
        crate::api::HealthResponse,
        crate::export::ExportPayload,
        crate::export::ExportMeta,
        crate::export::ExportFile,
        crate::model::ModelInfo,
        crate::pdf::TocEntry,
        crate::style::SummaryStyle,
        SummarizeRequest,
        ExportRequest,
    )),
    tags(
        (name = "Documents", description = "PDF upload and summarization"),
        (name = "Export", description = "Summary export in multiple formats"),
        (name = "Catalog", description = "Available models and summary styles"),
        (name = "Health", description = "Server health and status")
    )
)]
pub struct ApiDoc;

/// Shared application state, built once at startup
pub struct AppState {
    pub model: ModelClient,
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(model: ModelClient, config: Config) -> Self {
        Self {
            model,
            config: Arc::new(RwLock::new(config)),
        }
    }

    /// Clone the base client, optionally switching the model identifier
    fn client_for(&self, model_override: Option<&str>) -> ModelClient {
        match model_override {
            Some(model) => self.model.clone().with_model(model),
            None => self.model.clone(),
        }
    }
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>, max_upload_bytes: usize) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/process-pdf", post(process_pdf))
        .route("/summarize", post(summarize_text))
        .route("/export", post(export_summary))
        .route("/available-models", get(available_models))
        .route("/summary-styles", get(summary_styles))
        .route("/health", get(health_check))
        .route("/", get(root))
        .layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// OpenAPI JSON specification endpoint
async fn openapi_json() -> impl IntoResponse {
    Json(ApiDoc::openapi())
}

/// Root endpoint - plain status banner
async fn root() -> &'static str {
    "Digest document summarizer API is running."
}

/// Health check endpoint
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Server health status", body = HealthResponse)
    )
)]
#[instrument(skip(state))]
async fn health_check(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let model_available = state.model.check_available().await;

    Json(HealthResponse {
        status: if model_available { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        model_available,
    })
}

/// Request body for `/summarize`
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct SummarizeRequest {
    /// Raw text to summarize
    pub text: String,
    /// Summary style identifier
    #[serde(default)]
    pub style: Option<String>,
    /// Model identifier override
    #[serde(default)]
    pub model: Option<String>,
    /// Chunk budget override in characters
    #[serde(default)]
    pub max_chunk_chars: Option<usize>,
}

/// Request body for `/export`
#[derive(Debug, Clone, Deserialize, Serialize, utoipa::ToSchema)]
pub struct ExportRequest {
    /// Export format: text, markdown, or json
    pub format: String,
    #[serde(default = "default_export_filename")]
    pub filename: String,
    #[serde(default)]
    pub summary_parts: Vec<String>,
    #[serde(default)]
    pub combined_summary: String,
    #[serde(default)]
    pub meta: ExportMeta,
}

fn default_export_filename() -> String {
    "document".to_string()
}

/// Fields parsed from the `/process-pdf` multipart form
#[derive(Default)]
struct UploadForm {
    file_name: Option<String>,
    file_bytes: Option<Vec<u8>>,
    style: Option<String>,
    model: Option<String>,
    max_chunk_chars: Option<usize>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart body: {}", e)))?
    {
        match field.name().unwrap_or_default() {
            "file" => {
                form.file_name = field.file_name().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::InvalidRequest(format!("Failed to read upload: {}", e)))?;
                form.file_bytes = Some(bytes.to_vec());
            }
            "style" => {
                form.style = Some(read_text_field(field).await?);
            }
            "model" => {
                form.model = Some(read_text_field(field).await?);
            }
            "max_chunk_chars" => {
                let raw = read_text_field(field).await?;
                form.max_chunk_chars = Some(raw.parse().map_err(|_| {
                    AppError::InvalidRequest(format!("Invalid max_chunk_chars: {}", raw))
                })?);
            }
            other => {
                debug!("Ignoring unknown multipart field: {}", other);
            }
        }
    }

    Ok(form)
}

async fn read_text_field(field: axum::extract::multipart::Field<'_>) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidRequest(format!("Malformed multipart field: {}", e)))
}

/// PDF upload and summarization endpoint
#[utoipa::path(
    post,
    path = "/process-pdf",
    tag = "Documents",
    responses(
        (status = 200, description = "Summary of the uploaded document", body = ProcessPdfResponse),
        (status = 400, description = "Invalid request or empty document", body = ApiError),
        (status = 422, description = "Text extraction failed", body = ApiError),
        (status = 503, description = "Model unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, multipart))]
async fn process_pdf(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Json<ProcessPdfResponse>, AppError> {
    let started = Instant::now();
    info!("Received PDF processing request");

    let form = read_upload_form(multipart).await?;

    let file_name = form
        .file_name
        .ok_or_else(|| AppError::InvalidRequest("No file part in request".to_string()))?;
    let file_bytes = form
        .file_bytes
        .ok_or_else(|| AppError::InvalidRequest("Uploaded file is empty".to_string()))?;

    if !file_name.to_lowercase().ends_with(".pdf") {
        return Err(AppError::InvalidRequest(format!(
            "File type not supported: {}. Allowed types: pdf",
            file_name
        )));
    }

    // The temp file is removed when the guard drops, on every exit path
    let mut temp = tempfile::Builder::new()
        .prefix(&format!("digest-{}-", Uuid::new_v4()))
        .suffix(".pdf")
        .tempfile()
        .map_err(|e| AppError::InternalError(format!("Failed to create temp file: {}", e)))?;
    temp.write_all(&file_bytes)
        .map_err(|e| AppError::InternalError(format!("Failed to write temp file: {}", e)))?;

    debug!("Upload saved to {}", temp.path().display());

    let doc = PdfDocument::load(temp.path())?;

    if !doc.has_text() {
        return Err(AppError::EmptyDocument);
    }

    let text = doc.full_text();
    let page_count = doc.page_count();
    let toc = doc.toc();

    let (options, analyzer) = build_run_parameters(
        &state,
        form.style.as_deref(),
        form.max_chunk_chars,
    )
    .await;
    let client = state.client_for(form.model.as_deref());
    ensure_model_available(&client).await?;

    let outcome = pipeline::summarize_document(&client, &analyzer, &text, &options).await?;

    info!(
        "Processed '{}': {} pages, {} chunks in {:.2}s",
        file_name,
        page_count,
        outcome.chunk_count,
        started.elapsed().as_secs_f64()
    );

    Ok(Json(ProcessPdfResponse {
        filename: file_name,
        page_count,
        toc,
        text_preview: text_preview(&text),
        analysis: outcome.analysis,
        summary_parts: outcome.summary_parts,
        combined_summary: outcome.combined_summary,
        processing_time: round2(started.elapsed().as_secs_f64()),
        timestamp: now_string(),
    }))
}

/// Raw-text summarization endpoint
#[utoipa::path(
    post,
    path = "/summarize",
    tag = "Documents",
    request_body = SummarizeRequest,
    responses(
        (status = 200, description = "Summary of the provided text", body = SummarizeResponse),
        (status = 400, description = "Invalid request or empty text", body = ApiError),
        (status = 503, description = "Model unavailable", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(state, request), fields(text_len = request.text.len()))]
async fn summarize_text(
    State(state): State<Arc<AppState>>,
    Json(request): Json<SummarizeRequest>,
) -> Result<Json<SummarizeResponse>, AppError> {
    let started = Instant::now();
    info!("Received text summarization request");

    if request.text.trim().is_empty() {
        return Err(AppError::InvalidRequest("No text provided".to_string()));
    }

    let (options, analyzer) = build_run_parameters(
        &state,
        request.style.as_deref(),
        request.max_chunk_chars,
    )
    .await;
    let client = state.client_for(request.model.as_deref());
    ensure_model_available(&client).await?;

    let outcome =
        pipeline::summarize_document(&client, &analyzer, &request.text, &options).await?;

    info!(
        "Summarized {} chunks in {:.2}s",
        outcome.chunk_count,
        started.elapsed().as_secs_f64()
    );

    Ok(Json(SummarizeResponse {
        analysis: outcome.analysis,
        summary_parts: outcome.summary_parts,
        combined_summary: outcome.combined_summary,
        processing_time: round2(started.elapsed().as_secs_f64()),
        timestamp: now_string(),
    }))
}

/// Summary export endpoint
#[utoipa::path(
    post,
    path = "/export",
    tag = "Export",
    request_body = ExportRequest,
    responses(
        (status = 200, description = "Rendered export file", body = ExportFile),
        (status = 400, description = "Unsupported export format", body = ApiError),
        (status = 500, description = "Internal server error", body = ApiError)
    )
)]
#[instrument(skip(request), fields(format = %request.format))]
async fn export_summary(
    Json(request): Json<ExportRequest>,
) -> Result<Json<ExportFile>, AppError> {
    info!("Received export request");

    let format = ExportFormat::parse(&request.format)
        .map_err(|e| AppError::UnsupportedFormat(e.to_string()))?;

    let payload = ExportPayload {
        filename: request.filename,
        format,
        combined_summary: request.combined_summary,
        summary_parts: request.summary_parts,
        meta: request.meta,
    };

    let file = export::export(&payload, format)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(Json(file))
}

/// List models the service knows how to drive
#[utoipa::path(
    get,
    path = "/available-models",
    tag = "Catalog",
    responses(
        (status = 200, description = "Model catalog", body = [ModelInfo])
    )
)]
async fn available_models() -> Json<Vec<ModelInfo>> {
    Json(model::available_models())
}

/// List the supported summary styles
#[utoipa::path(
    get,
    path = "/summary-styles",
    tag = "Catalog",
    responses(
        (status = 200, description = "Summary style catalog", body = [StyleInfo])
    )
)]
async fn summary_styles() -> Json<Vec<StyleInfo>> {
    Json(
        SummaryStyle::ALL
            .into_iter()
            .map(|style| StyleInfo {
                id: style.id().to_string(),
                name: style.name().to_string(),
                description: style.description().to_string(),
            })
            .collect(),
    )
}

/// Resolve per-request pipeline options and analyzer from config + overrides
async fn build_run_parameters(
    state: &AppState,
    style: Option<&str>,
    max_chunk_chars: Option<usize>,
) -> (SummaryOptions, TextAnalyzer) {
    let config = state.config.read().await;

    let style = style
        .map(SummaryStyle::parse_or_default)
        .unwrap_or_default();
    let budget = max_chunk_chars.unwrap_or(config.chunking.max_chunk_chars);

    let options = SummaryOptions::new(budget).with_style(style);
    let analyzer = TextAnalyzer::new(
        config.analysis.top_words,
        config.analysis.stop_words.iter().cloned(),
    );

    (options, analyzer)
}

/// Fail fast with 503 instead of generating a placeholder for every chunk
async fn ensure_model_available(client: &ModelClient) -> Result<(), AppError> {
    if client.check_available().await {
        Ok(())
    } else {
        Err(AppError::ModelUnavailable(
            client.binary_path().display().to_string(),
        ))
    }
}

fn text_preview(text: &str) -> String {
    const PREVIEW_CHARS: usize = 500;
    if text.chars().count() <= PREVIEW_CHARS {
        text.to_string()
    } else {
        let preview: String = text.chars().take(PREVIEW_CHARS).collect();
        format!("{}...", preview)
    }
}

fn now_string() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Application error type
#[derive(Debug)]
pub enum AppError {
    InvalidRequest(String),
    ExtractionFailed(String),
    EmptyDocument,
    UnsupportedFormat(String),
    ModelUnavailable(String),
    InternalError(String),
}

impl From<PdfError> for AppError {
    fn from(e: PdfError) -> Self {
        match e {
            PdfError::EmptyDocument => AppError::EmptyDocument,
            other => AppError::ExtractionFailed(other.to_string()),
        }
    }
}

impl From<PipelineError> for AppError {
    fn from(e: PipelineError) -> Self {
        match e {
            PipelineError::EmptyDocument => AppError::EmptyDocument,
        }
    }
}

impl From<ModelError> for AppError {
    fn from(e: ModelError) -> Self {
        match e {
            ModelError::ModelUnavailable(path) => AppError::ModelUnavailable(path),
            other => AppError::InternalError(other.to_string()),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, error) = match self {
            AppError::InvalidRequest(msg) => {
                (StatusCode::BAD_REQUEST, ApiError::invalid_request(msg))
            }
            AppError::ExtractionFailed(msg) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                ApiError::extraction_failed(msg),
            ),
            AppError::EmptyDocument => (
                StatusCode::BAD_REQUEST,
                ApiError::empty_document("No text could be extracted from the document"),
            ),
            AppError::UnsupportedFormat(msg) => (
                StatusCode::BAD_REQUEST,
                ApiError::unsupported_format(msg),
            ),
            AppError::ModelUnavailable(path) => (
                StatusCode::SERVICE_UNAVAILABLE,
                ApiError::model_unavailable(format!("Model binary not found at '{}'", path)),
            ),
            AppError::InternalError(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ApiError::internal_error(msg),
            ),
        };

        if status.is_server_error() {
            warn!("Request failed: {} {}", status, error.error.message);
        }

        (status, Json(error)).into_response()
    }
}

/// Start the HTTP server
pub async fn start_server(state: Arc<AppState>) -> Result<(), std::io::Error> {
    let config = state.config.read().await;
    let addr = config.server_addr();
    let max_upload_bytes = config.server.max_upload_bytes;
    drop(config);

    let router = create_router(state, max_upload_bytes);

    info!("Starting Digest server on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).await?;

    Ok(())
}
