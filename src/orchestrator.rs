//! Sequential multi-model fallback.
//!
//! Each candidate model is tried once, in configured order. A candidate that answers with an image
//! ends the call. Retryable failures (quota, overload, timeout, missing image) move on to the next
//! candidate; anything else aborts immediately. When the list runs out, the most recent error is
//! returned.

use crate::gemini::{GeminiError, ImageBackend};
use crate::models::{GenerationRequest, GenerationResult, StylistOptions};
use crate::{data_url, normalize, prompt};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn, Instrument};
use uuid::Uuid;

/// Decides whether a failed candidate should hand over to the next one.
pub trait RetryPolicy: Send + Sync {
    fn is_retryable(&self, error: &GeminiError) -> bool;
}

impl<F> RetryPolicy for F
where
    F: Fn(&GeminiError) -> bool + Send + Sync,
{
    fn is_retryable(&self, error: &GeminiError) -> bool { self(error) }
}

/// Default heuristic: quota exhaustion, overload, timeouts and structurally empty answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuotaOrOverload;

impl RetryPolicy for QuotaOrOverload {
    fn is_retryable(&self, error: &GeminiError) -> bool {
        match error {
            GeminiError::NoImage { .. } | GeminiError::Timeout { .. } => true,
            GeminiError::MissingApiKey | GeminiError::Blocked { .. } | GeminiError::NoCandidates => false,
            other => other.is_quota_signal() || other.is_overload_signal(),
        }
    }
}

#[derive(Debug)]
pub enum Attempt {
    Success(GenerationResult),
    Continue(GeminiError),
    Abort(GeminiError),
}

/// Pure decision for one candidate's outcome.
pub fn classify(outcome: Result<GenerationResult, GeminiError>, model: &str, policy: &dyn RetryPolicy) -> Attempt {
    match outcome {
        Ok(result) if result.image_url.is_some() => Attempt::Success(result),
        Ok(_) => Attempt::Continue(GeminiError::NoImage { model: model.to_string() }),
        Err(err) if policy.is_retryable(&err) => Attempt::Continue(err),
        Err(err) => Attempt::Abort(err),
    }
}

pub struct Orchestrator {
    backend: Arc<dyn ImageBackend>,
    candidates: Vec<String>,
    policy: Box<dyn RetryPolicy>,
    timeout: Duration,
}

impl Orchestrator {
    pub fn new(backend: Arc<dyn ImageBackend>, candidates: Vec<String>, timeout: Duration) -> Self {
        Self { backend, candidates, policy: Box::new(QuotaOrOverload), timeout }
    }

    pub fn with_policy(mut self, policy: impl RetryPolicy + 'static) -> Self {
        self.policy = Box::new(policy);
        self
    }

    pub fn candidates(&self) -> &[String] { &self.candidates }

    /// Photo (data URL or bare base64) plus style selection in, edited image and rationale out.
    pub async fn generate_hairstyle(&self, image: &str, options: &StylistOptions) -> Result<GenerationResult, GeminiError> {
        let request = prompt::build_request(image, options);
        info!(
            "💇 Generating style '{}' ({}, {}) from {} image",
            options.style_id, options.gender, options.color, request.mime_type
        );
        self.generate(&request).await
    }

    pub async fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, GeminiError> {
        let span = tracing::info_span!("generation", id = %Uuid::new_v4());
        self.run(request).instrument(span).await
    }

    async fn run(&self, request: &GenerationRequest) -> Result<GenerationResult, GeminiError> {
        let mut last_error = None;
        for (index, model) in self.candidates.iter().enumerate() {
            info!("🚀 Attempt {}/{} with model {}", index + 1, self.candidates.len(), model);
            let outcome = self.attempt(model, request).await;
            match classify(outcome, model, self.policy.as_ref()) {
                Attempt::Success(result) => {
                    if let Some(url) = &result.image_url {
                        info!("✅ Model {} produced image: {}", model, data_url::preview(url));
                    }
                    return Ok(result);
                }
                Attempt::Continue(err) => {
                    warn!("🔄 Model {} failed with retryable error: {}", model, err);
                    last_error = Some(err);
                }
                Attempt::Abort(err) => {
                    error!("❌ Model {} failed with fatal error: {}", model, err);
                    return Err(err);
                }
            }
        }
        error!("❌ All {} candidate models exhausted", self.candidates.len());
        Err(last_error.unwrap_or(GeminiError::NoCandidates))
    }

    async fn attempt(&self, model: &str, request: &GenerationRequest) -> Result<GenerationResult, GeminiError> {
        match tokio::time::timeout(self.timeout, self.backend.generate_content(model, request)).await {
            Ok(response) => response.map(|r| normalize::normalize(&r)),
            Err(_) => Err(GeminiError::Timeout { model: model.to_string(), after: self.timeout }),
        }
    }
}
