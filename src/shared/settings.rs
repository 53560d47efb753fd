use serde::{Deserialize, Serialize};
use tokio::fs;
use std::path::{Path, PathBuf};
use directories::ProjectDirs;
use keyring::Entry;
use tracing::{debug, warn};

use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{ProviderKind, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG};

const KEYRING_SERVICE: &str = "abajiang-translator";
const SECRET_MASK: &str = "********";

pub const BAIDU_ENDPOINT: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";
pub const GOOGLE_ENDPOINT: &str = "https://translate.googleapis.com/translate_a/single";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub provider: ProviderSettings,
    pub preferences: UserPreferences,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderSettings {
    pub translation_provider: ProviderKind,
    pub baidu_app_id: String,
    #[serde(default)]
    pub baidu_secret_key: String,
    pub baidu_endpoint: String,
    pub google_endpoint: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserPreferences {
    pub default_source_lang: String,
    pub default_target_lang: String,
    /// Solid fill shown when no background image is set.
    pub fallback_fill: String,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            provider: ProviderSettings {
                translation_provider: ProviderKind::Baidu,
                baidu_app_id: String::new(),
                baidu_secret_key: String::new(),
                baidu_endpoint: BAIDU_ENDPOINT.to_string(),
                google_endpoint: GOOGLE_ENDPOINT.to_string(),
            },
            preferences: UserPreferences {
                default_source_lang: DEFAULT_SOURCE_LANG.to_string(),
                default_target_lang: DEFAULT_TARGET_LANG.to_string(),
                fallback_fill: "#D3D3D3".to_string(),
            },
        }
    }
}

impl AppSettings {
    pub fn project_dirs() -> AppResult<ProjectDirs> {
        ProjectDirs::from("com", "transcale", "abajiang")
            .ok_or_else(|| AppError::System("Failed to determine project directories".to_string()))
    }

    pub fn get_settings_path() -> AppResult<PathBuf> {
        Ok(Self::project_dirs()?.config_dir().join("settings.json"))
    }

    /// Read `path`, then fill secrets from the keyring and finally from
    /// `BAIDU_APP_ID` / `BAIDU_SECRET_KEY`.
    pub async fn load_with_secrets(path: &Path) -> AppResult<Self> {
        let mut settings = Self::load_from_path(path).await?;
        settings.load_secrets_from_keyring();
        settings.apply_overrides(
            std::env::var("BAIDU_APP_ID").ok(),
            std::env::var("BAIDU_SECRET_KEY").ok(),
        );
        Ok(settings)
    }

    /// Read the settings file only. A missing file yields defaults.
    pub async fn load_from_path(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            debug!(path = %path.display(), "settings file missing, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).await
            .map_err(|e| AppError::Io(format!("Failed to read settings file: {}", e)))?;

        serde_json::from_str(&content)
            .map_err(|e| AppError::Validation(format!("Failed to parse settings: {}", e)))
    }

    /// Environment values win over file and keyring values when non-blank.
    pub fn apply_overrides(&mut self, app_id: Option<String>, secret: Option<String>) {
        if let Some(id) = app_id.filter(|v| !v.trim().is_empty()) {
            self.provider.baidu_app_id = id;
        }
        if let Some(key) = secret.filter(|v| !v.trim().is_empty()) {
            self.provider.baidu_secret_key = key;
        }
    }

    /// Write settings to `path` with secrets stripped.
    pub async fn save_to_path(&self, path: &Path) -> AppResult<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await
                .map_err(|e| AppError::Io(format!("Failed to create config directory: {}", e)))?;
        }

        let mut disk_copy = self.clone();
        disk_copy.clear_secrets();

        let content = serde_json::to_string_pretty(&disk_copy)?;
        fs::write(path, content).await
            .map_err(|e| AppError::Io(format!("Failed to write settings file: {}", e)))
    }

    /// Save secrets to the keyring and the rest to `path`.
    pub async fn save(&self, path: &Path) -> AppResult<()> {
        self.save_secrets_to_keyring()?;
        self.save_to_path(path).await
    }

    /// Copy with secrets masked (for display/logging)
    pub fn masked(&self) -> Self {
        let mut copy = self.clone();
        if !copy.provider.baidu_secret_key.is_empty() {
            copy.provider.baidu_secret_key = SECRET_MASK.to_string();
        }
        copy
    }

    fn clear_secrets(&mut self) {
        self.provider.baidu_secret_key = String::new();
    }

    fn load_secrets_from_keyring(&mut self) {
        match Entry::new(KEYRING_SERVICE, "baidu_secret_key") {
            Ok(entry) => match entry.get_password() {
                Ok(pw) => self.provider.baidu_secret_key = pw,
                Err(keyring::Error::NoEntry) => {}
                Err(e) => warn!("keyring error for baidu_secret_key: {}", e),
            },
            Err(e) => warn!("failed to access keyring: {}", e),
        }
    }

    fn save_secrets_to_keyring(&self) -> AppResult<()> {
        let value = &self.provider.baidu_secret_key;
        if value.is_empty() || value == SECRET_MASK {
            return Ok(());
        }
        let entry = Entry::new(KEYRING_SERVICE, "baidu_secret_key")
            .map_err(|e| AppError::System(format!("Keyring init error: {}", e)))?;
        entry.set_password(value)
            .map_err(|e| AppError::System(format!("Failed to save secret to keyring: {}", e)))
    }
}
