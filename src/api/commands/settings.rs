//! Settings command module
//!
//! Settings inspection and Baidu credential storage.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;

/// `explicit` wins; otherwise the platform config location.
pub fn settings_path(explicit: Option<&Path>) -> AppResult<PathBuf> {
    match explicit {
        Some(path) => Ok(path.to_path_buf()),
        None => AppSettings::get_settings_path(),
    }
}

/// Settings with secrets resolved.
pub async fn get_settings(path: &Path) -> AppResult<AppSettings> {
    AppSettings::load_with_secrets(path).await
}

/// Pretty JSON of the settings with secrets masked.
pub async fn show_settings(path: &Path) -> AppResult<String> {
    let settings = get_settings(path).await?;
    Ok(serde_json::to_string_pretty(&settings.masked())?)
}

/// Store the app id in the settings file and the secret in the keyring.
pub async fn set_baidu_credentials(path: &Path, app_id: &str, secret: &str) -> AppResult<()> {
    if app_id.trim().is_empty() || secret.trim().is_empty() {
        return Err(AppError::Validation("App id and secret key must not be empty".to_string()));
    }
    let mut settings = AppSettings::load_from_path(path).await?;
    settings.provider.baidu_app_id = app_id.trim().to_string();
    settings.provider.baidu_secret_key = secret.trim().to_string();
    settings.save(path).await?;
    info!(path = %path.display(), "baidu credentials saved");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_path_wins() {
        let path = Path::new("/tmp/custom/settings.json");
        assert_eq!(settings_path(Some(path)).unwrap(), path);
    }

    #[tokio::test]
    async fn test_blank_credentials_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = set_baidu_credentials(&dir.path().join("settings.json"), " ", "secret")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(!dir.path().join("settings.json").exists());
    }
}
