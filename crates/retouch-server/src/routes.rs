//! Request handlers and the JSON wire contract.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use retouch_core::{
    EditRequest, FsStore, ImageStore, StoreError, TransformEngine, TransformError,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{info, instrument, warn};

/// File extensions the upload gate accepts.
const ALLOWED_EXTENSIONS: [&str; 7] = ["png", "jpg", "jpeg", "gif", "bmp", "webp", "tiff"];

#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<TransformEngine<FsStore>>,
}

#[derive(Debug, Serialize)]
pub struct EditSuccess {
    success: bool,
    edited_filename: String,
    preview: String,
    operation_applied: String,
}

#[derive(Debug, Serialize)]
pub struct UploadSuccess {
    success: bool,
    filename: String,
}

#[derive(Debug, Serialize)]
struct Failure {
    success: bool,
    error: String,
    kind: &'static str,
}

/// Transform errors rendered as structured JSON failures.
#[derive(Debug)]
pub struct ApiError(TransformError);

impl From<TransformError> for ApiError {
    fn from(err: TransformError) -> Self {
        ApiError(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            TransformError::NoFilename
            | TransformError::UnknownOperation(_)
            | TransformError::InvalidParameter(_) => StatusCode::BAD_REQUEST,
            TransformError::FileNotFound(_) => StatusCode::NOT_FOUND,
            TransformError::Processing(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        warn!(kind = self.0.kind(), "request failed: {}", self.0);
        let body = Failure {
            success: false,
            error: self.0.to_string(),
            kind: self.0.kind(),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /edit_image`: run one transform request.
///
/// Body rejections (malformed JSON, missing required fields) are mapped
/// into the same structured failure shape as every other error.
#[instrument(skip_all)]
pub async fn edit_image(
    State(state): State<AppState>,
    payload: Result<Json<EditRequest>, JsonRejection>,
) -> Result<Json<EditSuccess>, ApiError> {
    let Json(request) = payload
        .map_err(|rejection| TransformError::InvalidParameter(rejection.body_text()))?;

    let engine = Arc::clone(&state.engine);
    let outcome = tokio::task::spawn_blocking(move || engine.edit(&request))
        .await
        .map_err(|err| TransformError::Processing(err.to_string()))??;

    info!(
        operation = %outcome.operation_applied,
        edited = %outcome.edited_filename,
        "edit complete"
    );
    Ok(Json(EditSuccess {
        success: true,
        edited_filename: outcome.edited_filename,
        preview: outcome.preview,
        operation_applied: outcome.operation_applied,
    }))
}

/// `POST /upload_image`: the upload gate.
///
/// Accepts a multipart `file` field, checks the extension allowlist,
/// verifies the bytes decode as a real image, and stores them under a
/// timestamp-prefixed sanitized name.
#[instrument(skip_all)]
pub async fn upload_image(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<UploadSuccess>, ApiError> {
    let mut upload: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|err| TransformError::Processing(err.to_string()))?
    {
        if field.name() != Some("file") {
            continue;
        }
        let Some(original) = field.file_name().map(str::to_string) else {
            break;
        };
        let bytes = field
            .bytes()
            .await
            .map_err(|err| TransformError::Processing(err.to_string()))?;
        upload = Some((original, bytes.to_vec()));
        break;
    }

    let Some((original, bytes)) = upload else {
        return Err(TransformError::InvalidParameter("No file selected".to_string()).into());
    };

    let sanitized = sanitize_filename(&original);
    if !has_allowed_extension(&sanitized) {
        return Err(TransformError::InvalidParameter(
            "Invalid file type. Supported formats: PNG, JPG, JPEG, GIF, BMP, WEBP, TIFF"
                .to_string(),
        )
        .into());
    }

    // The stored bytes must be a decodable image, not just a well-named file.
    if image::load_from_memory(&bytes).is_err() {
        return Err(TransformError::InvalidParameter("Invalid image file".to_string()).into());
    }

    let name = format!("{}_{}", unix_timestamp(), sanitized);
    state
        .engine
        .store()
        .write(&name, &bytes)
        .map_err(|err| TransformError::Processing(err.to_string()))?;

    info!(filename = %name, size = bytes.len(), "upload stored");
    Ok(Json(UploadSuccess {
        success: true,
        filename: name,
    }))
}

/// `GET /uploads/:name`: serve stored image bytes.
pub async fn get_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Response, ApiError> {
    let bytes = state.engine.store().read(&name).map_err(|err| match err {
        StoreError::NotFound(name) | StoreError::InvalidName(name) => {
            TransformError::FileNotFound(name)
        }
        StoreError::Io(io) => TransformError::Processing(io.to_string()),
    })?;

    let content_type = sniff_content_type(&bytes);
    Ok(([(header::CONTENT_TYPE, content_type)], bytes).into_response())
}

/// Strip directories and replace anything outside `[A-Za-z0-9._-]`.
fn sanitize_filename(original: &str) -> String {
    let basename = original.rsplit(['/', '\\']).next().unwrap_or(original);
    let cleaned: String = basename
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();
    let trimmed = cleaned.trim_matches('.');
    if trimmed.is_empty() {
        "upload".to_string()
    } else {
        trimmed.to_string()
    }
}

fn has_allowed_extension(name: &str) -> bool {
    name.rsplit_once('.')
        .map(|(_, ext)| ALLOWED_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}

fn sniff_content_type(bytes: &[u8]) -> &'static str {
    match image::guess_format(bytes) {
        Ok(image::ImageFormat::Png) => "image/png",
        Ok(image::ImageFormat::Jpeg) => "image/jpeg",
        Ok(image::ImageFormat::Gif) => "image/gif",
        Ok(image::ImageFormat::Bmp) => "image/bmp",
        Ok(image::ImageFormat::WebP) => "image/webp",
        Ok(image::ImageFormat::Tiff) => "image/tiff",
        _ => "application/octet-stream",
    }
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
