use crate::i18n::Language;
use crate::remote::{ModelTier, RemoteConfig};
use crate::style::ThemeMode;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

const API_KEY_VARS: [&str; 2] = ["GEMINI_API_KEY", "API_KEY"];

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct AppSettings {
    pub theme: ThemeMode,
    pub language: Language,
    pub high_precision: bool,
    pub model_tier: ModelTier,
    pub reset_tools_on_undo: bool,
    /// Maximum history entries kept; 0 keeps everything.
    pub history_cap: usize,
    pub export_dir: Option<PathBuf>,
    pub remote: RemoteConfig,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            language: Language::Es,
            high_precision: true,
            model_tier: ModelTier::Pro,
            reset_tools_on_undo: true,
            history_cap: 0,
            export_dir: None,
            remote: RemoteConfig::default(),
        }
    }
}

impl AppSettings {
    pub fn load() -> Self { Self::load_from(&Self::get_config_path()) }

    pub fn save(&self) { self.save_to(&Self::get_config_path()); }

    pub fn load_from(path: &Path) -> Self {
        let Ok(contents) = fs::read_to_string(path) else { return Self::default() };
        match serde_json::from_str(&contents) {
            Ok(settings) => settings,
            Err(e) => {
                log::warn!("Ignoring unreadable settings at {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn save_to(&self, path: &Path) {
        if let Some(parent) = path.parent() {
            let _ = fs::create_dir_all(parent);
        }
        match serde_json::to_string_pretty(self) {
            Ok(json) => {
                if let Err(e) = fs::write(path, json) {
                    log::warn!("Could not write settings to {}: {}", path.display(), e);
                }
            }
            Err(e) => log::warn!("Could not serialize settings: {}", e),
        }
    }

    fn get_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push("zeditor");
        path.push("settings.json");
        path
    }

    pub fn env_api_key() -> Option<String> {
        API_KEY_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|v| !v.trim().is_empty())
    }

    /// Remote settings with an environment-provided key taking precedence over the stored one.
    pub fn remote_config(&self) -> RemoteConfig { self.remote_config_with(Self::env_api_key()) }

    fn remote_config_with(&self, env_key: Option<String>) -> RemoteConfig {
        let mut config = self.remote.clone();
        if let Some(key) = env_key { config.api_key = key; }
        config
    }

    pub fn export_dir(&self) -> PathBuf {
        self.export_dir
            .clone()
            .or_else(dirs::download_dir)
            .or_else(dirs::picture_dir)
            .unwrap_or_else(|| PathBuf::from("."))
    }
}
