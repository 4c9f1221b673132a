use axum::{
    extract::{multipart::MultipartError, DefaultBodyLimit, Multipart, State},
    http::StatusCode,
    routing::post,
    Json, Router,
};
use bytes::{Bytes, BytesMut};
use tracing::{instrument, warn};

use super::dto::NutritionRecord;
use crate::{error::AppError, state::AppState};

pub const MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;
const UPLOAD_FIELD: &str = "file";

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze_meal))
        // room above the file limit so oversize uploads get our 400, not a 413
        .layer(DefaultBodyLimit::max(2 * MAX_UPLOAD_BYTES))
}

/// POST /api/analyze (multipart, field `file`)
#[instrument(skip(state, mp))]
pub async fn analyze_meal(
    State(state): State<AppState>,
    mut mp: Multipart,
) -> Result<Json<NutritionRecord>, AppError> {
    let Some(credential) = state.config.gemini_api_key.as_deref() else {
        return Err(AppError::Configuration(
            "GEMINI_API_KEY is not configured on the server".into(),
        ));
    };

    let image = read_image_field(&mut mp).await?;
    let record = state.analyzer.analyze(image, credential).await?;
    Ok(Json(record))
}

async fn read_image_field(mp: &mut Multipart) -> Result<Bytes, AppError> {
    while let Some(mut field) = mp.next_field().await.map_err(multipart_error)? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let content_type = field.content_type().map(|s| s.to_ascii_lowercase());
        if !content_type.as_deref().is_some_and(|ct| ct.starts_with("image/")) {
            warn!(content_type = ?content_type, "rejected non-image upload");
            return Err(AppError::Validation(
                "Please upload an image file (content type must be image/*)".into(),
            ));
        }

        let mut buf = BytesMut::new();
        while let Some(chunk) = field.chunk().await.map_err(multipart_error)? {
            if buf.len() + chunk.len() > MAX_UPLOAD_BYTES {
                warn!(received = buf.len() + chunk.len(), "rejected oversize upload");
                return Err(too_large());
            }
            buf.extend_from_slice(&chunk);
        }
        return Ok(buf.freeze());
    }

    Err(AppError::Validation(format!(
        "multipart field `{UPLOAD_FIELD}` is required"
    )))
}

fn too_large() -> AppError {
    AppError::Validation("File size must be 10 MB or less".into())
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        too_large()
    } else {
        AppError::Validation(format!("invalid multipart upload: {}", e.body_text()))
    }
}
