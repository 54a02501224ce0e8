//! HTTP Server for the Soundex API.
//!
//! # API Endpoints
//!
//! | Method | Path              | Description                              |
//! |--------|-------------------|------------------------------------------|
//! | GET    | `/health`         | Health check                             |
//! | POST   | `/api/columns`    | Upload CSV, list its columns             |
//! | POST   | `/api/soundex`    | Upload CSV, add Soundex columns          |
//! | GET    | `/api/encode`     | Encode a single word                     |
//! | GET    | `/api/logs`       | SSE stream for real-time logs            |

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query},
    http::{header, Method, StatusCode},
    response::{sse::Event, Json, Sse},
    routing::{get, post},
    Router,
};
use futures::stream::Stream;
use serde_json::{json, Value};
use std::{convert::Infallible, net::SocketAddr, time::Duration};
use tokio_stream::wrappers::BroadcastStream;
use tokio_stream::StreamExt as _;
use tower_http::cors::CorsLayer;

use super::logs::{log_error, log_info, log_warning, LOG_BROADCASTER};
use super::types::{
    column_error_response, error_response, parse_column_list, ColumnsResponse, EncodeQuery,
    EncodeResponse, SoundexResponse,
};
use crate::error::{PipelineError, ServerError, ServerResult, TransformError};
use crate::transform::pipeline::{inspect_bytes, soundex_bytes, TransformOptions};

/// Upload size limit
const MAX_UPLOAD_BYTES: usize = 50 * 1024 * 1024;

type ApiError = (StatusCode, Json<Value>);

/// Start the HTTP server
pub async fn start_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    println!("🚀 Soundex server running on http://localhost:{}", port);
    println!("   POST /api/columns - List CSV columns");
    println!("   POST /api/soundex - Add Soundex columns");
    println!("   GET  /api/encode  - Encode one word");
    println!("   GET  /api/logs    - SSE log stream");
    println!("   GET  /health      - Health check");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, router()).await?;

    Ok(())
}

/// Application routes
pub fn router() -> Router {
    let cors = CorsLayer::new()
        .allow_origin(tower_http::cors::Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers([header::CONTENT_TYPE]);

    Router::new()
        .route("/", get(health))
        .route("/health", get(health))
        .route("/api/columns", post(list_columns))
        .route("/api/soundex", post(add_soundex))
        .route("/api/encode", get(encode_word))
        .route("/api/logs", get(sse_logs))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .layer(cors)
}

/// Health check endpoint
async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": "soundex-csv",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "columns": "POST /api/columns",
            "soundex": "POST /api/soundex",
            "encode": "GET /api/encode?word=",
            "logs": "GET /api/logs (SSE)"
        }
    }))
}

/// SSE endpoint for real-time log streaming
async fn sse_logs() -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = LOG_BROADCASTER.subscribe();

    // lagged receivers just skip what they missed
    let stream = BroadcastStream::new(rx).filter_map(|result| {
        let entry = result.ok()?;
        let json = serde_json::to_string(&entry).ok()?;
        Some(Ok(Event::default().data(json)))
    });

    Sse::new(stream).keep_alive(
        axum::response::sse::KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}

async fn encode_word(Query(query): Query<EncodeQuery>) -> Json<EncodeResponse> {
    Json(EncodeResponse::for_word(&query.word))
}

/// Fields of an upload form
#[derive(Debug, Default)]
struct Upload {
    file_name: Option<String>,
    bytes: Option<Vec<u8>>,
    columns: Vec<String>,
    suffix: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> ServerResult<Upload> {
    let mut upload = Upload::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::BadRequest(format!("Multipart error: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                upload.file_name = field.file_name().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                upload.bytes = Some(bytes.to_vec());
            }
            "columns" | "suffix" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ServerError::BadRequest(format!("Read error: {}", e)))?;
                if name == "columns" {
                    upload.columns.extend(parse_column_list(&text));
                } else if !text.is_empty() {
                    upload.suffix = Some(text);
                }
            }
            _ => {}
        }
    }

    Ok(upload)
}

impl Upload {
    fn take_bytes(&mut self) -> ServerResult<Vec<u8>> {
        let bytes = self
            .bytes
            .take()
            .ok_or_else(|| ServerError::BadRequest("No file provided".to_string()))?;

        log_info(format!(
            "📄 Upload: {} ({} bytes)",
            self.file_name.as_deref().unwrap_or("unknown"),
            bytes.len()
        ));
        Ok(bytes)
    }
}

/// List the columns of an uploaded CSV
async fn list_columns(multipart: Multipart) -> Result<Json<ColumnsResponse>, ApiError> {
    let mut upload = read_upload(multipart).await.map_err(reject)?;
    let bytes = upload.take_bytes().map_err(reject)?;

    let info = run_blocking(move || inspect_bytes(&bytes, None))
        .await
        .map_err(reject)?;

    Ok(Json(ColumnsResponse::from(info)))
}

/// Add Soundex columns to an uploaded CSV
async fn add_soundex(multipart: Multipart) -> Result<Json<SoundexResponse>, ApiError> {
    let mut upload = read_upload(multipart).await.map_err(reject)?;
    let bytes = upload.take_bytes().map_err(reject)?;

    let mut options = TransformOptions::from_env();
    if let Some(suffix) = upload.suffix.take() {
        options.suffix = suffix;
    }
    let columns = upload.columns;

    let output = run_blocking(move || soundex_bytes(&bytes, &columns, &options))
        .await
        .map_err(reject)?;

    Ok(Json(SoundexResponse::from(output)))
}

/// Run a pipeline call off the async executor.
async fn run_blocking<T, F>(f: F) -> ServerResult<T>
where
    F: FnOnce() -> Result<T, PipelineError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| ServerError::Internal(e.to_string()))?
        .map_err(ServerError::from)
}

fn status_for(err: &ServerError) -> StatusCode {
    match err {
        ServerError::BadRequest(_) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::Transform(_)) => StatusCode::UNPROCESSABLE_ENTITY,
        ServerError::Pipeline(PipelineError::Csv(_)) => StatusCode::BAD_REQUEST,
        ServerError::Pipeline(PipelineError::Io(_)) | ServerError::Internal(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn reject(err: ServerError) -> ApiError {
    let status = status_for(&err);
    if status.is_server_error() {
        log_error(err.to_string());
    } else {
        log_warning(err.to_string());
    }

    let body = match &err {
        ServerError::Pipeline(PipelineError::Transform(
            TransformError::MissingColumns(names) | TransformError::ColumnCollision(names),
        )) => column_error_response(&err.to_string(), names),
        _ => error_response(&err.to_string()),
    };

    (status, Json(body))
}
