//! Signed provider: Baidu general translation API.
//!
//! Every request carries `appid`, a fresh `salt` and
//! `sign = md5(appid + q + salt + secret)` in lowercase hex. The signature is
//! computed over the raw text; only the `q` query value is percent-encoded.

use serde::Deserialize;
use tracing::warn;
use uuid::Uuid;

use crate::core::http::HttpResponse;
use crate::shared::error::AppResult;

use super::provider::TranslationProvider;
use super::types::{TranslationRequest, TranslationResult, EMPTY_RESPONSE_REASON};

/// Code Baidu uses for "ok" when it does send `error_code` on success.
const SUCCESS_CODE: &str = "52000";

const KNOWN_ERRORS: &[(&str, &str)] = &[
    ("52001", "request timed out, try again"),
    ("52002", "provider system error, try again"),
    ("52003", "unauthorized user, check the app id"),
    ("54000", "a required parameter is empty"),
    ("54001", "invalid signature, check the app id and secret key"),
    ("54003", "access frequency limited"),
    ("54004", "account balance is insufficient"),
    ("54005", "long queries sent too frequently"),
    ("58000", "client IP is not allowed"),
    ("58001", "target language may require a paid plan"),
    ("58002", "the service is disabled for this account"),
    ("90107", "authentication failed"),
];

#[derive(Debug, Deserialize)]
struct BaiduResponse {
    error_code: Option<serde_json::Value>,
    error_msg: Option<String>,
    trans_result: Option<Vec<BaiduCandidate>>,
}

#[derive(Debug, Deserialize)]
struct BaiduCandidate {
    dst: String,
}

pub struct BaiduProvider {
    app_id: String,
    secret_key: String,
    endpoint: String,
}

impl BaiduProvider {
    pub fn new(app_id: &str, secret_key: &str, endpoint: &str) -> Self {
        Self {
            app_id: app_id.trim().to_string(),
            secret_key: secret_key.trim().to_string(),
            endpoint: endpoint.to_string(),
        }
    }

    pub fn sign(&self, text: &str, salt: &str) -> String {
        let input = format!("{}{}{}{}", self.app_id, text, salt, self.secret_key);
        format!("{:x}", md5::compute(input.as_bytes()))
    }

    /// Deterministic for a given salt.
    pub fn signed_url(&self, request: &TranslationRequest, salt: &str) -> String {
        format!(
            "{}?q={}&from={}&to={}&appid={}&salt={}&sign={}",
            self.endpoint,
            urlencoding::encode(&request.text),
            urlencoding::encode(&request.source_lang),
            urlencoding::encode(&request.target_lang),
            urlencoding::encode(&self.app_id),
            salt,
            self.sign(&request.text, salt)
        )
    }
}

fn code_to_string(code: &serde_json::Value) -> String {
    match code {
        serde_json::Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Human-readable reason for a provider error code.
pub fn describe_error(code: &str, message: &str) -> String {
    match KNOWN_ERRORS.iter().find(|(known, _)| *known == code) {
        Some((_, explanation)) => format!("{} (code {}, {})", explanation, code, message),
        None => format!("code {}, {}", code, message),
    }
}

impl TranslationProvider for BaiduProvider {
    fn name(&self) -> &'static str {
        "baidu"
    }

    fn build_url(&self, request: &TranslationRequest) -> AppResult<String> {
        let salt = Uuid::new_v4().to_string();
        Ok(self.signed_url(request, &salt))
    }

    fn parse_response(&self, response: &HttpResponse) -> TranslationResult {
        if response.body.trim().is_empty() {
            return TranslationResult::transport(EMPTY_RESPONSE_REASON);
        }

        let parsed: BaiduResponse = match serde_json::from_str(&response.body) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(status = response.status, "unparseable provider response: {}", e);
                return TranslationResult::transport(format!("Failed to parse response: {}", e));
            }
        };

        if let Some(code) = parsed.error_code.as_ref().map(code_to_string) {
            if code != SUCCESS_CODE {
                let message = parsed.error_msg.unwrap_or_default();
                warn!(code = %code, message = %message, "provider reported an error");
                let reason = describe_error(&code, &message);
                return TranslationResult::provider_error(code, reason);
            }
        }

        match parsed.trans_result {
            Some(candidates) => match candidates.into_iter().next() {
                Some(first) => TranslationResult::success(first.dst),
                None => TranslationResult::no_result(),
            },
            None => TranslationResult::transport("response has no trans_result"),
        }
    }
}
