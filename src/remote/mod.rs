mod client;
mod request;
mod response;

pub use client::GeminiClient;
pub use request::RemoteConfig;

use crate::modules::helpers::encoded_image::EncodedImage;
use serde::{Deserialize, Serialize};

pub type Result<T> = std::result::Result<T, RemoteEditError>;

#[derive(Debug, thiserror::Error)]
pub enum RemoteEditError {
    #[error("No API key configured (set GEMINI_API_KEY or add one in Settings)")]
    MissingApiKey,
    #[error("API key contains characters that cannot be sent")]
    InvalidApiKey,
    #[error("Request Error {0}")]
    Network(#[from] reqwest::Error),
    #[error("Service returned {code}: {message}")]
    Status { code: u16, message: String },
    #[error("The model returned no image: {0}")]
    Declined(String),
    #[error("Unreadable response: {0}")]
    InvalidResponse(String),
    #[error("Remote edit stopped unexpectedly: {0}")]
    Aborted(String),
}

impl RemoteEditError {
    /// Whether the same request may succeed if sent again unchanged.
    pub fn is_retryable(&self) -> bool {
        match self {
            RemoteEditError::Network(_) => true,
            RemoteEditError::Status { code, .. } => *code == 408 || *code == 429 || *code >= 500,
            _ => false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelTier {
    Fast,
    #[serde(rename = "fast_3")]
    Fast3,
    #[default]
    Pro,
    Ultra,
}

impl ModelTier {
    pub fn as_str(&self) -> &str {
        match self {
            ModelTier::Fast => "Neural Flash",
            ModelTier::Fast3 => "Gemini 3.0 Fast",
            ModelTier::Pro => "Gemini 3.0 Pro",
            ModelTier::Ultra => "Neural Ultra",
        }
    }

    pub fn badge(&self) -> &str {
        match self {
            ModelTier::Fast => "FAST",
            ModelTier::Fast3 => "SPEED",
            ModelTier::Pro => "EXPERIMENTAL",
            ModelTier::Ultra => "2.0 EXP",
        }
    }

    pub fn all() -> Vec<ModelTier> {
        vec![ModelTier::Fast, ModelTier::Fast3, ModelTier::Pro, ModelTier::Ultra]
    }
}

#[derive(Debug, Clone)]
pub struct EditRequest {
    pub image: EncodedImage,
    pub instruction: String,
    pub tier: ModelTier,
}

/// A hosted model that rewrites an image from a natural-language instruction.
#[async_trait::async_trait]
pub trait RemoteEditor: Send + Sync {
    async fn edit(&self, request: EditRequest) -> Result<EncodedImage>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_classification() {
        assert!(RemoteEditError::Status { code: 503, message: String::new() }.is_retryable());
        assert!(RemoteEditError::Status { code: 429, message: String::new() }.is_retryable());
        assert!(!RemoteEditError::Status { code: 400, message: String::new() }.is_retryable());
        assert!(!RemoteEditError::Declined("SAFETY".into()).is_retryable());
        assert!(!RemoteEditError::MissingApiKey.is_retryable());
    }

    #[test]
    fn test_tier_serde_names() {
        assert_eq!(serde_json::to_string(&ModelTier::Fast3).unwrap(), "\"fast_3\"");
        assert_eq!(serde_json::from_str::<ModelTier>("\"ultra\"").unwrap(), ModelTier::Ultra);
        assert_eq!(ModelTier::default(), ModelTier::Pro);
    }
}
