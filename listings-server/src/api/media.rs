//! Media files
//!
//! - `GET /media/{*key}`       serve a stored file
//! - `POST /api/admin/media`   multipart upload (`file`, `category`)

use std::collections::HashMap;

use axum::extract::{Multipart, Path, State};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Extension, Json, Router};
use http::header;
use shared::error::{AppError, AppResult, ErrorCode};

use super::ApiResult;
use crate::auth::AdminIdentity;
use crate::state::AppState;
use crate::storage::{MediaCategory, StoredFile};

/// Stored files are content-addressed and never change
const CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

pub fn router() -> Router<AppState> {
    Router::new().route("/media/{*key}", get(serve))
}

pub async fn serve(State(state): State<AppState>, Path(key): Path<String>) -> Result<Response, AppError> {
    let (bytes, mime) = state.storage.open(&key).await?;
    Ok((
        [
            (header::CONTENT_TYPE, mime),
            (header::CACHE_CONTROL, CACHE_CONTROL.to_string()),
        ],
        bytes,
    )
        .into_response())
}

/// An uploaded file plus the text fields sent alongside it
pub struct UploadForm {
    pub data: Vec<u8>,
    pub filename: String,
    pub fields: HashMap<String, String>,
}

impl UploadForm {
    /// Trimmed, non-empty text field
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Read a multipart body: the `file` part and every other part as text
pub async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut file: Option<(Vec<u8>, String)> = None;
    let mut fields = HashMap::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        AppError::with_message(ErrorCode::InvalidRequest, format!("Multipart error: {e}"))
    })? {
        let name = field.name().unwrap_or_default().to_string();
        if name == "file" {
            let filename = field.file_name().unwrap_or_default().to_string();
            let bytes = field.bytes().await.map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?;
            file = Some((bytes.to_vec(), filename));
        } else {
            let text = field.text().await.map_err(|e| {
                AppError::with_message(ErrorCode::InvalidRequest, format!("Read error: {e}"))
            })?;
            fields.insert(name, text);
        }
    }

    let (data, filename) = file.ok_or_else(|| AppError::new(ErrorCode::NoFileProvided))?;
    Ok(UploadForm {
        data,
        filename,
        fields,
    })
}

/// POST /api/admin/media
pub async fn upload(
    State(state): State<AppState>,
    Extension(identity): Extension<AdminIdentity>,
    multipart: Multipart,
) -> ApiResult<StoredFile> {
    let form = read_form(multipart).await?;
    let category = form
        .field("category")
        .and_then(MediaCategory::parse)
        .ok_or_else(|| {
            AppError::validation("category must be one of venues, gallery, awards, beaches, menus")
        })?;

    let stored = match category {
        MediaCategory::Menus => {
            state
                .storage
                .store_document(category, form.data, &form.filename)
                .await?
        }
        _ => {
            state
                .storage
                .store_image(category, form.data, &form.filename)
                .await?
        }
    };

    super::admin::audit(
        &state,
        &identity,
        "upload",
        "media",
        None,
        Some(serde_json::json!({ "key": stored.key, "size": stored.size })),
    )
    .await;

    Ok(Json(stored))
}
