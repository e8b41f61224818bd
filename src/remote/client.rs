use super::request::{self, GenerateContentRequest, RemoteConfig};
use super::response::{self, GenerateContentResponse};
use super::{EditRequest, ModelTier, RemoteEditError, RemoteEditor, Result};
use crate::modules::helpers::encoded_image::EncodedImage;
use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use std::time::Duration;

#[derive(Debug, Clone)]
pub struct GeminiClient {
    config: RemoteConfig,
    http: reqwest::Client,
}

impl GeminiClient {
    pub fn new(config: RemoteConfig) -> Self {
        Self { config, http: reqwest::Client::new() }
    }

    fn headers(&self) -> Result<HeaderMap> {
        let key = self.config.api_key.trim();
        if key.is_empty() { return Err(RemoteEditError::MissingApiKey); }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-goog-api-key", HeaderValue::from_str(key).map_err(|_| RemoteEditError::InvalidApiKey)?);
        Ok(headers)
    }

    fn endpoint(&self, tier: ModelTier) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.models.for_tier(tier)
        )
    }
}

#[async_trait::async_trait]
impl RemoteEditor for GeminiClient {
    async fn edit(&self, req: EditRequest) -> Result<EncodedImage> {
        let headers = self.headers()?;
        let url = self.endpoint(req.tier);
        let body = GenerateContentRequest::image_edit(
            req.image.mime_type(),
            req.image.to_base64(),
            request::edit_prompt(&req.instruction, req.tier),
        );

        log::info!("Remote edit via {} ({} bytes in)", self.config.models.for_tier(req.tier), req.image.len());
        let resp = self.http
            .post(url)
            .headers(headers)
            .json(&body)
            .timeout(Duration::from_secs(self.config.timeout_secs.max(1)))
            .send()
            .await?;

        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let message = response::error_message(&text);
            log::warn!("Remote edit failed with {}: {}", status, message);
            return Err(RemoteEditError::Status { code: status.as_u16(), message });
        }

        let parsed: GenerateContentResponse = serde_json::from_str(&text)
            .map_err(|e| RemoteEditError::InvalidResponse(e.to_string()))?;
        response::extract_image(parsed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_uses_tier_model() {
        let client = GeminiClient::new(RemoteConfig {
            api_base_url: "https://example.test/v1beta/".into(),
            ..RemoteConfig::default()
        });
        assert_eq!(client.endpoint(ModelTier::Ultra), "https://example.test/v1beta/models/gemini-2.0-flash-exp:generateContent");
    }

    #[test]
    fn test_headers_require_a_key() {
        let client = GeminiClient::new(RemoteConfig::default());
        assert!(matches!(client.headers(), Err(RemoteEditError::MissingApiKey)));

        let client = GeminiClient::new(RemoteConfig { api_key: "bad\nkey".into(), ..RemoteConfig::default() });
        assert!(matches!(client.headers(), Err(RemoteEditError::InvalidApiKey)));

        let client = GeminiClient::new(RemoteConfig { api_key: " k-123 ".into(), ..RemoteConfig::default() });
        assert_eq!(client.headers().unwrap()["x-goog-api-key"], "k-123");
    }

    #[tokio::test]
    async fn test_missing_key_fails_before_network() {
        let client = GeminiClient::new(RemoteConfig::default());
        let req = EditRequest {
            image: EncodedImage::solid(1, 1, [0, 0, 0, 255]),
            instruction: "anything".into(),
            tier: ModelTier::Pro,
        };
        assert!(matches!(client.edit(req).await, Err(RemoteEditError::MissingApiKey)));
    }
}
