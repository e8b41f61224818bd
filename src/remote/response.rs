use super::request::InlineData;
use super::{RemoteEditError, Result};
use crate::modules::helpers::encoded_image::EncodedImage;
use serde::Deserialize;

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Candidate {
    pub content: Option<CandidateContent>,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct CandidateContent {
    #[serde(default)]
    pub parts: Vec<ResponsePart>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ResponsePart {
    pub text: Option<String>,
    pub inline_data: Option<InlineData>,
}

#[derive(Deserialize, Debug)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromptFeedback {
    pub block_reason: Option<String>,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorBody {
    pub error: ErrorDetail,
}

#[derive(Deserialize, Debug)]
pub(crate) struct ErrorDetail {
    #[serde(default)]
    pub message: String,
}

/// The first inline image of the first candidate. Anything else is a decline.
pub(crate) fn extract_image(resp: GenerateContentResponse) -> Result<EncodedImage> {
    if let Some(reason) = resp.prompt_feedback.and_then(|f| f.block_reason) {
        return Err(RemoteEditError::Declined(format!("prompt blocked ({})", reason)));
    }

    let candidate = resp.candidates.into_iter().next()
        .ok_or_else(|| RemoteEditError::Declined("no candidates".to_string()))?;
    let parts = candidate.content.map(|c| c.parts).unwrap_or_default();

    if let Some(data) = parts.iter().find_map(|p| p.inline_data.as_ref()) {
        log::debug!("Received inline {} payload", data.mime_type);
        return EncodedImage::from_base64(&data.data)
            .map_err(|e| RemoteEditError::InvalidResponse(e.to_string()));
    }

    let text: Vec<&str> = parts.iter().filter_map(|p| p.text.as_deref()).collect();
    let reason = if !text.is_empty() {
        text.join(" ")
    } else {
        candidate.finish_reason.unwrap_or_else(|| "empty response".to_string())
    };
    Err(RemoteEditError::Declined(reason))
}

/// Pulls a readable message out of an error body, falling back to the raw text.
pub(crate) fn error_message(body: &str) -> String {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(e) if !e.error.message.is_empty() => e.error.message,
        _ => body.chars().take(200).collect(),
    }
}
