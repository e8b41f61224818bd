use super::ModelTier;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RemoteConfig {
    pub api_base_url: String,
    pub api_key: String,
    pub timeout_secs: u64,
    pub models: ModelIds,
}

impl Default for RemoteConfig {
    fn default() -> Self {
        Self {
            api_base_url: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            api_key: String::new(),
            timeout_secs: 120,
            models: ModelIds::default(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelIds {
    pub fast: String,
    pub fast_3: String,
    pub pro: String,
    pub ultra: String,
}

impl Default for ModelIds {
    fn default() -> Self {
        Self {
            fast: "gemini-3-flash-preview".to_string(),
            fast_3: "gemini-3-flash-preview".to_string(),
            pro: "gemini-3-pro-preview".to_string(),
            ultra: "gemini-2.0-flash-exp".to_string(),
        }
    }
}

impl ModelIds {
    pub fn for_tier(&self, tier: ModelTier) -> &str {
        match tier {
            ModelTier::Fast => &self.fast,
            ModelTier::Fast3 => &self.fast_3,
            ModelTier::Pro => &self.pro,
            ModelTier::Ultra => &self.ultra,
        }
    }
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerateContentRequest {
    pub contents: Vec<Content>,
    pub generation_config: GenerationConfig,
}

#[derive(Serialize, Debug, Clone)]
pub(crate) struct Content {
    pub parts: Vec<Part>,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct InlineData {
    pub mime_type: String,
    pub data: String,
}

#[derive(Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub(crate) struct GenerationConfig {
    pub response_modalities: Vec<String>,
}

impl GenerateContentRequest {
    pub fn image_edit(mime_type: &str, base64: String, prompt: String) -> Self {
        Self {
            contents: vec![Content {
                parts: vec![
                    Part { text: None, inline_data: Some(InlineData { mime_type: mime_type.to_string(), data: base64 }) },
                    Part { text: Some(prompt), inline_data: None },
                ],
            }],
            generation_config: GenerationConfig {
                response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
            },
        }
    }
}

pub(crate) fn edit_prompt(instruction: &str, tier: ModelTier) -> String {
    format!(
        "You are the image engine of ZEditor PRO running in {} mode.\n\
         TASK: Modify the provided image according to this request: \"{}\".\n\
         Keep the original resolution and composition unless the request says otherwise.\n\
         When removing a background, use a clean transparent or neutral studio backdrop.\n\
         When adding elements, match the scene's lighting and shadows.\n\
         Return only the edited image.",
        tier.as_str(),
        instruction.trim(),
    )
}
