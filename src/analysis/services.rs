use std::sync::Arc;

use bytes::Bytes;
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::NutritionRecord;
use super::parser;
use super::prompt::ANALYSIS_PROMPT;
use crate::error::AppError;
use crate::inference::{InferenceClient, InferenceError, InlineImage};

#[derive(Debug, thiserror::Error)]
pub enum AnalyzeError {
    #[error("uploaded file is not a valid image: {0}")]
    Decode(String),
    #[error(transparent)]
    Service(#[from] InferenceError),
    #[error("image decoding task failed: {0}")]
    Task(String),
}

impl From<AnalyzeError> for AppError {
    fn from(e: AnalyzeError) -> Self {
        match e {
            AnalyzeError::Decode(_) => AppError::Decode(e.to_string()),
            AnalyzeError::Service(inner) => AppError::Service(inner),
            AnalyzeError::Task(_) => AppError::Internal(e.to_string()),
        }
    }
}

/// Photo in, nutrition record out. Holds no per-request state.
#[derive(Clone)]
pub struct NutritionAnalyzer {
    inference: Arc<dyn InferenceClient>,
}

impl NutritionAnalyzer {
    pub fn new(inference: Arc<dyn InferenceClient>) -> Self {
        Self { inference }
    }

    #[instrument(skip_all, fields(analysis_id = %Uuid::new_v4(), bytes = image.len()))]
    pub async fn analyze(
        &self,
        image: Bytes,
        credential: &str,
    ) -> Result<NutritionRecord, AnalyzeError> {
        let mime_type = decode_image(image.clone()).await?;

        let text = self
            .inference
            .generate(
                credential,
                ANALYSIS_PROMPT,
                InlineImage {
                    mime_type,
                    data: &image,
                },
            )
            .await?;

        let record = parser::parse(&text);
        info!(
            %mime_type,
            foods = record.food_items.len(),
            calories = record.calories,
            carbs = record.carbs,
            "meal analyzed"
        );
        Ok(record)
    }
}

/// Fully decodes the image off the async runtime and returns its MIME type.
async fn decode_image(bytes: Bytes) -> Result<&'static str, AnalyzeError> {
    tokio::task::spawn_blocking(move || -> Result<&'static str, AnalyzeError> {
        let format =
            image::guess_format(&bytes).map_err(|e| AnalyzeError::Decode(e.to_string()))?;
        image::load_from_memory_with_format(&bytes, format)
            .map_err(|e| AnalyzeError::Decode(e.to_string()))?;
        Ok(format.to_mime_type())
    })
    .await
    .map_err(|e| AnalyzeError::Task(e.to_string()))?
}
