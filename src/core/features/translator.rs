//! Translator feature
//!
//! One `translate` call = at most one GET to the configured provider. Every
//! outcome, including transport errors, comes back as a `TranslationResult`.

pub mod baidu;
pub mod google;
pub mod provider;
pub mod types;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::core::http::{HttpTransport, ReqwestTransport};
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::shared::types::ProviderKind;

use provider::{provider_from_settings, TranslationProvider};
use types::{TranslationRequest, TranslationResult};

#[derive(Clone)]
pub struct TranslatorService {
    provider: Arc<dyn TranslationProvider>,
    http: Arc<dyn HttpTransport>,
}

impl TranslatorService {
    pub fn new(provider: Arc<dyn TranslationProvider>, http: Arc<dyn HttpTransport>) -> Self {
        Self { provider, http }
    }

    /// Service for `kind` backed by a real HTTP client.
    pub fn from_settings(settings: &AppSettings, kind: ProviderKind) -> AppResult<Self> {
        let provider = provider_from_settings(settings, kind)?;
        let http = Arc::new(ReqwestTransport::new()?);
        Ok(Self::new(provider, http))
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn translate(&self, text: &str, source_lang: &str, target_lang: &str) -> TranslationResult {
        let request = match TranslationRequest::new(text, source_lang, target_lang) {
            Some(request) => request,
            None => return TranslationResult::empty_input(),
        };
        self.execute(&request).await
    }

    async fn execute(&self, request: &TranslationRequest) -> TranslationResult {
        let url = match self.provider.build_url(request) {
            Ok(url) => url,
            Err(e) => return e.into(),
        };

        info!(
            provider = self.provider.name(),
            from = %request.source_lang,
            to = %request.target_lang,
            chars = request.text.chars().count(),
            "sending translation request"
        );

        let result = match self.http.get(&url).await {
            Ok(response) => self.provider.parse_response(&response),
            Err(e) => {
                warn!(provider = self.provider.name(), "translation request failed: {}", e);
                e.into()
            }
        };

        debug!(success = result.is_success(), "translation finished");
        result
    }
}

#[cfg(test)]
pub(crate) mod testing {
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;

    use crate::core::http::{HttpResponse, HttpTransport};
    use crate::shared::error::{AppError, AppResult};

    /// Records every URL and answers with a canned response.
    pub struct FakeTransport {
        pub requests: Mutex<Vec<String>>,
        reply: Result<HttpResponse, String>,
        delay: Option<Duration>,
    }

    impl FakeTransport {
        pub fn replying(status: u16, body: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Ok(HttpResponse { status, body: body.to_string() }),
                delay: None,
            }
        }

        pub fn failing(message: &str) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                reply: Err(message.to_string()),
                delay: None,
            }
        }

        pub fn with_delay(mut self, delay: Duration) -> Self {
            self.delay = Some(delay);
            self
        }

        pub fn request_count(&self) -> usize {
            self.requests.lock().unwrap().len()
        }

        pub fn last_request(&self) -> Option<String> {
            self.requests.lock().unwrap().last().cloned()
        }
    }

    #[async_trait]
    impl HttpTransport for FakeTransport {
        async fn get(&self, url: &str) -> AppResult<HttpResponse> {
            self.requests.lock().unwrap().push(url.to_string());
            if let Some(delay) = self.delay {
                tokio::time::sleep(delay).await;
            }
            self.reply.clone().map_err(AppError::Network)
        }
    }
}
