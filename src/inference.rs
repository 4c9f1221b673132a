use axum::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::config::GeminiConfig;

/// Image bytes plus the MIME type to declare for them.
#[derive(Debug, Clone, Copy)]
pub struct InlineImage<'a> {
    pub mime_type: &'a str,
    pub data: &'a [u8],
}

#[derive(Debug, thiserror::Error)]
pub enum InferenceError {
    #[error("request to inference service failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("inference service returned {status}: {message}")]
    Status { status: u16, message: String },
    #[error("inference service blocked the request: {0}")]
    Blocked(String),
    #[error("unreadable inference response: {0}")]
    Malformed(String),
    #[error("inference service returned no text")]
    EmptyResponse,
}

/// One prompt + one image in, free-form text out.
#[async_trait]
pub trait InferenceClient: Send + Sync {
    async fn generate(
        &self,
        credential: &str,
        prompt: &str,
        image: InlineImage<'_>,
    ) -> Result<String, InferenceError>;
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    model: String,
    api_base: String,
}

impl GeminiClient {
    pub fn new(cfg: &GeminiConfig) -> Self {
        Self {
            client: Client::new(),
            model: cfg.model.clone(),
            api_base: cfg.api_base.clone(),
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("model", &self.model)
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl InferenceClient for GeminiClient {
    #[instrument(skip_all, fields(model = %self.model, mime_type = %image.mime_type, bytes = image.data.len()))]
    async fn generate(
        &self,
        credential: &str,
        prompt: &str,
        image: InlineImage<'_>,
    ) -> Result<String, InferenceError> {
        let body = build_request(prompt, image);

        debug!("sending generateContent request");
        let response = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", credential)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            let message = api_error_message(&text);
            error!(%status, %message, "gemini returned an error status");
            return Err(InferenceError::Status {
                status: status.as_u16(),
                message,
            });
        }

        let parsed: GenerateResponse =
            serde_json::from_str(&text).map_err(|e| InferenceError::Malformed(e.to_string()))?;
        let out = extract_text(parsed)?;
        debug!(chars = out.len(), "gemini response received");
        Ok(out)
    }
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text { text: &'a str },
    InlineData { inline_data: InlineData<'a> },
}

#[derive(Debug, Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
    error: Option<ApiError>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    message: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorEnvelope {
    error: ApiError,
}

fn build_request<'a>(prompt: &'a str, image: InlineImage<'a>) -> GenerateRequest<'a> {
    GenerateRequest {
        contents: vec![Content {
            parts: vec![
                Part::Text { text: prompt },
                Part::InlineData {
                    inline_data: InlineData {
                        mime_type: image.mime_type,
                        data: STANDARD.encode(image.data),
                    },
                },
            ],
        }],
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, InferenceError> {
    if let Some(err) = resp.error {
        return Err(InferenceError::Malformed(err.message));
    }
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(InferenceError::Blocked(reason));
    }

    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(InferenceError::EmptyResponse);
    }
    Ok(text)
}

fn api_error_message(body: &str) -> String {
    match serde_json::from_str::<ApiErrorEnvelope>(body) {
        Ok(env) => env.error.message,
        Err(_) => body.chars().take(200).collect(),
    }
}
