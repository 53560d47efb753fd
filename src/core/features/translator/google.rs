//! Public provider: the unauthenticated Google endpoint (`client=gtx`).

use tracing::warn;

use crate::core::http::HttpResponse;
use crate::shared::error::AppResult;

use super::provider::TranslationProvider;
use super::types::{TranslationRequest, TranslationResult, EMPTY_RESPONSE_REASON};

pub struct GoogleProvider {
    endpoint: String,
}

impl GoogleProvider {
    pub fn new(endpoint: &str) -> Self {
        Self { endpoint: endpoint.to_string() }
    }
}

/// Map catalog codes to the ISO 639-1 codes this endpoint expects.
pub fn iso_code(code: &str) -> &str {
    match code {
        "jp" => "ja",
        "kor" => "ko",
        "fra" => "fr",
        "spa" => "es",
        other => other,
    }
}

impl TranslationProvider for GoogleProvider {
    fn name(&self) -> &'static str {
        "google"
    }

    fn build_url(&self, request: &TranslationRequest) -> AppResult<String> {
        Ok(format!(
            "{}?client=gtx&sl={}&tl={}&dt=t&q={}",
            self.endpoint,
            urlencoding::encode(iso_code(&request.source_lang)),
            urlencoding::encode(iso_code(&request.target_lang)),
            urlencoding::encode(&request.text)
        ))
    }

    fn parse_response(&self, response: &HttpResponse) -> TranslationResult {
        if !response.is_success() {
            warn!(status = response.status, "translation endpoint returned an error status");
            return TranslationResult::transport(format!("Translation API error: HTTP {}", response.status));
        }
        if response.body.trim().is_empty() {
            return TranslationResult::transport(EMPTY_RESPONSE_REASON);
        }

        let raw_json: serde_json::Value = match serde_json::from_str(&response.body) {
            Ok(json) => json,
            Err(e) => return TranslationResult::transport(format!("Failed to parse JSON: {}", e)),
        };

        // Nested arrays: [[["Translated", "Source", ...], ...], null, "detected"]
        let sentences = match raw_json.get(0).and_then(|v| v.as_array()) {
            Some(sentences) => sentences,
            None => return TranslationResult::transport("Invalid response format"),
        };

        let translated: String = sentences
            .iter()
            .filter_map(|sentence| sentence.get(0).and_then(|v| v.as_str()))
            .collect();

        if translated.is_empty() {
            TranslationResult::no_result()
        } else {
            TranslationResult::success(translated)
        }
    }
}
