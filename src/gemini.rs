use crate::data_url;
use crate::models::GenerationRequest;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_with::skip_serializing_none;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error, info};

pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Low temperature keeps the model close to the literal instruction.
pub const TEMPERATURE: f64 = 0.4;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Finish reasons that mean the output was withheld by moderation.
const BLOCKING_FINISH_REASONS: [&str; 5] = ["SAFETY", "IMAGE_SAFETY", "PROHIBITED_CONTENT", "BLOCKLIST", "SPII"];

#[derive(Debug, Error)]
pub enum GeminiError {
    #[error("API key not configured (set GEMINI_API_KEY)")]
    MissingApiKey,
    #[error("HTTP error: {0}")]
    Http(String),
    #[error("API error {code} ({status}): {message}")]
    Api { code: u16, status: String, message: String },
    #[error("request blocked by SAFETY filters: {reason}")]
    Blocked { reason: String },
    #[error("model {model} returned no image")]
    NoImage { model: String },
    #[error("model {model} timed out after {after:?}")]
    Timeout { model: String, after: Duration },
    #[error("no candidate models configured")]
    NoCandidates,
    #[error("Other: {0}")]
    Other(String),
}

impl GeminiError {
    /// Builds an error from a non-2xx response, preferring the structured `error` envelope.
    pub fn from_response(code: u16, body: &str) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(body) {
            Ok(envelope) => GeminiError::Api {
                code: envelope.error.code.unwrap_or(code),
                status: envelope.error.status,
                message: envelope.error.message,
            },
            Err(_) => GeminiError::Api { code, status: String::new(), message: body.trim().to_string() },
        }
    }
}

// The request URL carries the API key, so it never reaches the message.
impl From<reqwest::Error> for GeminiError {
    fn from(err: reqwest::Error) -> Self {
        GeminiError::Http(err.without_url().to_string())
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope { error: ErrorBody }

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)] code: Option<u16>,
    #[serde(default)] message: String,
    #[serde(default)] status: String,
}

// Replaces long base64 `data` strings so request/response dumps stay readable.
fn truncate_base64_in_json(value: &mut serde_json::Value) {
    match value {
        serde_json::Value::Object(map) => {
            for (key, val) in map.iter_mut() {
                if key == "data" {
                    if let serde_json::Value::String(s) = val {
                        if s.len() > 100 {
                            *val = serde_json::Value::String(data_url::preview(s));
                        }
                    }
                } else {
                    truncate_base64_in_json(val);
                }
            }
        }
        serde_json::Value::Array(arr) => {
            for val in arr.iter_mut() {
                truncate_base64_in_json(val);
            }
        }
        _ => {}
    }
}

fn loggable<T: Serialize>(payload: &T) -> String {
    match serde_json::to_value(payload) {
        Ok(mut value) => {
            truncate_base64_in_json(&mut value);
            value.to_string()
        }
        Err(e) => format!("<unserializable: {e}>"),
    }
}

/// One model endpoint able to answer a `generateContent` call.
#[async_trait]
pub trait ImageBackend: Send + Sync {
    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> Result<GeminiResponse, GeminiError>;
}

pub struct GeminiClient {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl GeminiClient {
    pub fn new(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client: Client::new(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn has_api_key(&self) -> bool { self.api_key.is_some() }

    fn endpoint(&self, model: &str, api_key: &str) -> String {
        format!("{}/models/{}:generateContent?key={}", self.base_url, model, api_key)
    }
}

#[async_trait]
impl ImageBackend for GeminiClient {
    async fn generate_content(&self, model: &str, request: &GenerationRequest) -> Result<GeminiResponse, GeminiError> {
        let api_key = self.api_key.as_deref().ok_or(GeminiError::MissingApiKey)?;
        let url = self.endpoint(model, api_key);
        info!("🔗 Making request to: {}", url.replace(api_key, "***"));

        let body = GenerateContentRequest::for_edit(request);
        debug!("📤 Request body: {}", loggable(&body));

        let response = self.client
            .post(&url)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        info!("📥 Response status from {}: {}", model, status);

        let response_text = response.text().await?;
        if !status.is_success() {
            error!("❌ API error response from {}: {}", model, response_text);
            return Err(GeminiError::from_response(status.as_u16(), &response_text));
        }

        let raw: serde_json::Value = serde_json::from_str(&response_text)
            .map_err(|e| GeminiError::Other(format!("parse error: {e}")))?;
        debug!("📥 Raw Gemini API response: {}", loggable(&raw));
        let parsed: GeminiResponse = serde_json::from_value(raw)
            .map_err(|e| GeminiError::Other(format!("parse error: {e}")))?;

        if let Some(reason) = parsed.blocked_reason() {
            error!("🚫 Model {} blocked the request: {}", model, reason);
            return Err(GeminiError::Blocked { reason });
        }
        Ok(parsed)
    }
}

// --- Request body ---

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    contents: Vec<RequestContent>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct RequestContent { role: &'static str, parts: Vec<RequestPart> }

#[skip_serializing_none]
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct RequestPart {
    inline_data: Option<InlineData>,
    text: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f64,
    response_modalities: [&'static str; 2],
}

#[derive(Debug, Serialize)]
struct SafetySetting { category: &'static str, threshold: &'static str }

impl GenerateContentRequest {
    /// Image first, then the instruction; all harm categories set to `BLOCK_NONE`.
    pub fn for_edit(request: &GenerationRequest) -> Self {
        Self {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![
                    RequestPart {
                        inline_data: Some(InlineData { data: request.image_data.clone(), mime_type: request.mime_type.clone() }),
                        text: None,
                    },
                    RequestPart { inline_data: None, text: Some(request.prompt.clone()) },
                ],
            }],
            generation_config: GenerationConfig { temperature: TEMPERATURE, response_modalities: ["TEXT", "IMAGE"] },
            safety_settings: HARM_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting { category, threshold: "BLOCK_NONE" })
                .collect(),
        }
    }
}

// --- Response parsing ---

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Content,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Content { #[serde(default)] pub parts: Vec<Part> }

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback { #[serde(default)] pub block_reason: Option<String> }

#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Part {
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
    Text { text: String },
    Other(serde_json::Value),
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub data: String,
    pub mime_type: String,
}

impl GeminiResponse {
    /// Single-candidate response carrying the given parts.
    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate { content: Content { parts }, finish_reason: Some("STOP".into()) }],
            prompt_feedback: None,
        }
    }

    /// Moderation verdict hidden inside an otherwise successful response.
    pub fn blocked_reason(&self) -> Option<String> {
        if let Some(reason) = self.prompt_feedback.as_ref().and_then(|f| f.block_reason.clone()) {
            return Some(reason);
        }
        let candidate = self.candidates.first()?;
        let reason = candidate.finish_reason.as_deref()?;
        let has_image = candidate.content.parts.iter().any(|p| matches!(p, Part::Inline { .. }));
        if BLOCKING_FINISH_REASONS.contains(&reason) && !has_image {
            Some(reason.to_string())
        } else {
            None
        }
    }
}

impl Part {
    pub fn image(data: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Part::Inline { inline_data: InlineData { data: data.into(), mime_type: mime_type.into() } }
    }

    pub fn text(text: impl Into<String>) -> Self { Part::Text { text: text.into() } }
}
