use crate::gemini::GeminiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("GEMINI_MODELS must name at least one model")]
    NoModels,
    #[error("invalid GEMINI_TIMEOUT_SECS '{0}': expected a positive number of seconds")]
    InvalidTimeout(String),
    #[error("invalid PORT '{0}'")]
    InvalidPort(String),
}

/// Coarse failure kind used to pick a user-facing message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Safety,
    Quota,
    Overloaded,
    InvalidCredentials,
    NoImage,
    Timeout,
    Unknown,
}

impl ErrorCategory {
    pub fn code(&self) -> &'static str {
        match self {
            ErrorCategory::Safety => "safety",
            ErrorCategory::Quota => "quota",
            ErrorCategory::Overloaded => "overloaded",
            ErrorCategory::InvalidCredentials => "invalid_credentials",
            ErrorCategory::NoImage => "no_image",
            ErrorCategory::Timeout => "timeout",
            ErrorCategory::Unknown => "unknown",
        }
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::Safety => "图片因安全策略被拦截，请尝试更换照片。(Image blocked by safety filters)",
            ErrorCategory::Quota => "API 配额已耗尽，请稍后再试。(API Quota Exceeded. Please try again later.)",
            ErrorCategory::Overloaded => "模型服务繁忙，请稍后再试。(Model service overloaded. Please try again later.)",
            ErrorCategory::InvalidCredentials => "API Key 无效或未配置，请检查服务设置。(Invalid API Key)",
            ErrorCategory::NoImage => "模型未返回图片，请重试或更换照片。(No image was produced)",
            ErrorCategory::Timeout => "生成超时，请稍后再试。(Generation timed out)",
            ErrorCategory::Unknown => "生成失败 (Generation failed)",
        }
    }
}

// Wording only; status codes are matched on the structured fields, never inside free text.
fn mentions_quota(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    ["resource_exhausted", "quota", "rate limit", "too many requests"]
        .iter()
        .any(|needle| text.contains(needle))
}

fn mentions_overload(text: &str) -> bool {
    let text = text.to_ascii_lowercase();
    ["overloaded", "unavailable"].iter().any(|needle| text.contains(needle))
}

impl GeminiError {
    /// Rate limiting or exhausted quota, by status code, status string or message wording.
    /// Transport failures never count: they carry no upstream verdict.
    pub fn is_quota_signal(&self) -> bool {
        match self {
            GeminiError::Api { code, status, message } => {
                *code == 429 || status == "RESOURCE_EXHAUSTED" || mentions_quota(message)
            }
            GeminiError::Other(message) => mentions_quota(message),
            _ => false,
        }
    }

    /// Upstream reports itself busy or temporarily unavailable.
    pub fn is_overload_signal(&self) -> bool {
        match self {
            GeminiError::Api { code, status, message } => {
                *code == 503 || status == "UNAVAILABLE" || mentions_overload(message)
            }
            GeminiError::Other(message) => mentions_overload(message),
            _ => false,
        }
    }

    fn is_credential_failure(&self) -> bool {
        match self {
            GeminiError::MissingApiKey => true,
            GeminiError::Api { code, status, message } => {
                *code == 401
                    || *code == 403
                    || status == "UNAUTHENTICATED"
                    || status == "PERMISSION_DENIED"
                    || message.contains("API key not valid")
                    || message.contains("API_KEY_INVALID")
            }
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        if self.is_credential_failure() {
            return ErrorCategory::InvalidCredentials;
        }
        match self {
            GeminiError::Blocked { .. } => ErrorCategory::Safety,
            GeminiError::NoImage { .. } => ErrorCategory::NoImage,
            GeminiError::Timeout { .. } => ErrorCategory::Timeout,
            err if err.to_string().contains("SAFETY") => ErrorCategory::Safety,
            err if err.is_quota_signal() => ErrorCategory::Quota,
            err if err.is_overload_signal() => ErrorCategory::Overloaded,
            _ => ErrorCategory::Unknown,
        }
    }
}
