use serde::{Deserialize, Serialize};

use crate::shared::error::AppError;

pub const EMPTY_INPUT_MESSAGE: &str = "Please enter text to translate";
pub const FAILURE_PREFIX: &str = "Translation failed: ";
pub const NO_RESULT_REASON: &str = "no translation result";
pub const EMPTY_RESPONSE_REASON: &str = "empty response";

/// One translation call's inputs. Text is never blank.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationRequest {
    pub text: String,
    pub source_lang: String,
    pub target_lang: String,
}

impl TranslationRequest {
    /// Returns `None` when the text is blank; callers show the prompt instead.
    pub fn new(text: &str, source_lang: &str, target_lang: &str) -> Option<Self> {
        if text.trim().is_empty() {
            return None;
        }
        Some(Self {
            text: text.to_string(),
            source_lang: source_lang.trim().to_string(),
            target_lang: target_lang.trim().to_string(),
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Short-circuited locally, nothing sent.
    EmptyInput,
    /// Provider answered with an error code.
    Provider,
    /// Provider answered but returned no candidates.
    NoResult,
    /// Transport or parse failure.
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TranslationResult {
    Success {
        translated: String,
    },
    Failure {
        kind: FailureKind,
        reason: String,
        provider_error_code: Option<String>,
    },
}

impl TranslationResult {
    pub fn success(translated: impl Into<String>) -> Self {
        TranslationResult::Success { translated: translated.into() }
    }

    pub fn empty_input() -> Self {
        Self::failure(FailureKind::EmptyInput, EMPTY_INPUT_MESSAGE)
    }

    pub fn no_result() -> Self {
        Self::failure(FailureKind::NoResult, NO_RESULT_REASON)
    }

    pub fn provider_error(code: impl Into<String>, reason: impl Into<String>) -> Self {
        TranslationResult::Failure {
            kind: FailureKind::Provider,
            reason: reason.into(),
            provider_error_code: Some(code.into()),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::failure(FailureKind::Transport, reason)
    }

    fn failure(kind: FailureKind, reason: impl Into<String>) -> Self {
        TranslationResult::Failure {
            kind,
            reason: reason.into(),
            provider_error_code: None,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, TranslationResult::Success { .. })
    }

    pub fn translated(&self) -> Option<&str> {
        match self {
            TranslationResult::Success { translated } => Some(translated),
            TranslationResult::Failure { .. } => None,
        }
    }

    pub fn error_code(&self) -> Option<&str> {
        match self {
            TranslationResult::Failure { provider_error_code, .. } => provider_error_code.as_deref(),
            TranslationResult::Success { .. } => None,
        }
    }

    /// The string shown in the result box.
    pub fn display_text(&self) -> String {
        match self {
            TranslationResult::Success { translated } => translated.clone(),
            TranslationResult::Failure { kind: FailureKind::EmptyInput, reason, .. } => reason.clone(),
            TranslationResult::Failure { reason, .. } => format!("{}{}", FAILURE_PREFIX, reason),
        }
    }
}

impl From<AppError> for TranslationResult {
    fn from(err: AppError) -> Self {
        TranslationResult::transport(err.to_string())
    }
}

impl std::fmt::Display for TranslationResult {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display_text())
    }
}
