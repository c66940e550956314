use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, Multipart, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::Utc;
use serde_json::json;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{cors::{Any, CorsLayer}, trace::TraceLayer};
use uuid::Uuid;

use crate::{
    catalog::{catalog, StyleFilter, PRESET_COLORS},
    data_url,
    error::ErrorCategory,
    gemini::GeminiError,
    models::{GenerateRequest, GenerateResponse, GenerationResult, HairStyleDefinition, PresetColor, StylistOptions},
    orchestrator::Orchestrator,
};

/// Photos arrive base64 encoded; leave room well above a typical phone picture.
const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

#[derive(Clone)]
pub struct AppState {
    pub orchestrator: Arc<Orchestrator>,
    pub api_key_configured: bool,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/generate", post(generate))
        .route("/api/generate/upload", post(generate_upload))
        .route("/api/styles", get(list_styles))
        .route("/api/styles/:id", get(get_style))
        .route("/api/colors", get(list_colors))
        .route("/api/options/default", get(default_options))
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(
                    CorsLayer::new()
                        .allow_origin(Any)
                        .allow_methods(Any)
                        .allow_headers(Any)
                )
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .with_state(state)
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    error: &'static str,
    message: String,
    detail: Option<String>,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self { status: StatusCode::BAD_REQUEST, error: "bad_request", message: message.into(), detail: None }
    }
}

impl From<GeminiError> for ApiError {
    fn from(err: GeminiError) -> Self {
        let category = err.category();
        let status = match category {
            ErrorCategory::Safety => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCategory::Quota => StatusCode::TOO_MANY_REQUESTS,
            ErrorCategory::Overloaded => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCategory::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ErrorCategory::Timeout => StatusCode::GATEWAY_TIMEOUT,
            ErrorCategory::NoImage | ErrorCategory::Unknown => StatusCode::BAD_GATEWAY,
        };
        Self { status, error: category.code(), message: category.user_message().to_string(), detail: Some(err.to_string()) }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.error, "message": self.message, "detail": self.detail });
        (self.status, Json(body)).into_response()
    }
}

async fn run_generation(state: &AppState, image: &str, options: &StylistOptions) -> Result<Json<GenerateResponse>, ApiError> {
    if !state.api_key_configured {
        return Err(GeminiError::MissingApiKey.into());
    }
    if data_url::strip_prefix(image).trim().is_empty() {
        return Err(ApiError::bad_request("image is empty"));
    }

    let id = Uuid::new_v4();
    tracing::info!("🎯 Generation {} requested for style '{}'", id, options.style_id);
    let result: GenerationResult = state.orchestrator.generate_hairstyle(image, options).await?;
    tracing::info!("✅ Generation {} finished (analysis: {})", id, result.text_analysis.is_some());
    Ok(Json(GenerateResponse { id, result, generated_at: Utc::now() }))
}

pub async fn generate(State(state): State<AppState>, Json(body): Json<GenerateRequest>) -> Result<Json<GenerateResponse>, ApiError> {
    run_generation(&state, &body.image, &body.options).await
}

/// Multipart form: `photo` (file) and optional `options` (JSON); missing options use the session defaults.
pub async fn generate_upload(State(state): State<AppState>, mut multipart: Multipart) -> Result<Json<GenerateResponse>, ApiError> {
    let mut photo: Option<String> = None;
    let mut options: Option<StylistOptions> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| ApiError::bad_request(e.to_string()))? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "photo" => {
                let mime = field.content_type().unwrap_or(data_url::DEFAULT_UPLOAD_MIME).to_string();
                let bytes = field.bytes().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
                tracing::info!("📦 Received {} byte {} upload", bytes.len(), mime);
                photo = Some(data_url::encode(&mime, &bytes));
            }
            "options" => {
                let text = field.text().await.map_err(|e| ApiError::bad_request(e.to_string()))?;
                let parsed = serde_json::from_str(&text).map_err(|e| ApiError::bad_request(format!("invalid options: {e}")))?;
                options = Some(parsed);
            }
            _ => {}
        }
    }

    let photo = photo.ok_or_else(|| ApiError::bad_request("missing 'photo' field"))?;
    let options = options.unwrap_or_else(|| catalog().default_options());
    run_generation(&state, &photo, &options).await
}

pub async fn list_styles(Query(filter): Query<StyleFilter>) -> Json<Vec<&'static HairStyleDefinition>> {
    Json(catalog().filter(&filter))
}

pub async fn get_style(Path(id): Path<String>) -> Result<Json<&'static HairStyleDefinition>, StatusCode> {
    catalog().get(&id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

pub async fn list_colors() -> Json<&'static [PresetColor]> {
    Json(PRESET_COLORS)
}

pub async fn default_options() -> Json<StylistOptions> {
    Json(catalog().default_options())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn errors_map_to_status_codes() {
        let quota: ApiError = GeminiError::Api { code: 429, status: "RESOURCE_EXHAUSTED".into(), message: "Quota".into() }.into();
        assert_eq!(quota.status, StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(quota.error, "quota");

        let blocked: ApiError = GeminiError::Blocked { reason: "SAFETY".into() }.into();
        assert_eq!(blocked.status, StatusCode::UNPROCESSABLE_ENTITY);
        assert!(blocked.message.contains("safety filters"));

        let missing: ApiError = GeminiError::MissingApiKey.into();
        assert_eq!(missing.status, StatusCode::UNAUTHORIZED);
        assert_eq!(missing.detail.as_deref(), Some("API key not configured (set GEMINI_API_KEY)"));

        let empty: ApiError = GeminiError::NoImage { model: "m".into() }.into();
        assert_eq!(empty.status, StatusCode::BAD_GATEWAY);
    }
}
