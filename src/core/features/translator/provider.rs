use std::sync::Arc;

use crate::core::http::HttpResponse;
use crate::shared::error::{AppError, AppResult};
use crate::shared::settings::AppSettings;
use crate::shared::types::ProviderKind;

use super::baidu::BaiduProvider;
use super::google::GoogleProvider;
use super::types::{TranslationRequest, TranslationResult};

/// A translation backend: turns a request into a GET URL and a response body
/// into a result. The transport is not the provider's concern.
pub trait TranslationProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// Build the full request URL. May mix in fresh randomness (salts).
    fn build_url(&self, request: &TranslationRequest) -> AppResult<String>;

    /// Map a raw response to a result. Never fails; parse problems become
    /// transport failures.
    fn parse_response(&self, response: &HttpResponse) -> TranslationResult;
}

/// Build the provider selected by `kind` from settings.
pub fn provider_from_settings(
    settings: &AppSettings,
    kind: ProviderKind,
) -> AppResult<Arc<dyn TranslationProvider>> {
    let cfg = &settings.provider;
    match kind {
        ProviderKind::Baidu => {
            if cfg.baidu_app_id.trim().is_empty() || cfg.baidu_secret_key.trim().is_empty() {
                return Err(AppError::Validation(
                    "Missing Baidu app id or secret key (set BAIDU_APP_ID / BAIDU_SECRET_KEY or run `config set-baidu`)".to_string(),
                ));
            }
            Ok(Arc::new(BaiduProvider::new(
                &cfg.baidu_app_id,
                &cfg.baidu_secret_key,
                &cfg.baidu_endpoint,
            )))
        }
        ProviderKind::Google => Ok(Arc::new(GoogleProvider::new(&cfg.google_endpoint))),
    }
}
