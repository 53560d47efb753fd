//! Shared types used by the translator screen and its front ends.

use serde::{Deserialize, Serialize};

/// A selectable language on the translator screen.
///
/// Codes follow the signed provider's vocabulary (`jp`, `kor`, `fra`, ...);
/// providers with ISO codes translate them at request time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub code: &'static str,
    pub name: &'static str,
}

pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { code: "zh", name: "Chinese" },
    LanguageOption { code: "en", name: "English" },
    LanguageOption { code: "jp", name: "Japanese" },
    LanguageOption { code: "kor", name: "Korean" },
    LanguageOption { code: "fra", name: "French" },
    LanguageOption { code: "spa", name: "Spanish" },
    LanguageOption { code: "de", name: "German" },
    LanguageOption { code: "hmn", name: "Hmong" },
];

pub const DEFAULT_SOURCE_LANG: &str = "zh";
pub const DEFAULT_TARGET_LANG: &str = "en";

/// Look up a catalog entry by code (case-insensitive).
pub fn find_language(code: &str) -> Option<&'static LanguageOption> {
    let code = code.trim();
    LANGUAGES.iter().find(|lang| lang.code.eq_ignore_ascii_case(code))
}

pub fn language_name(code: &str) -> Option<&'static str> {
    find_language(code).map(|lang| lang.name)
}

/// Which translation backend serves `translate` calls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// Signed enterprise API (app id + secret key).
    #[default]
    Baidu,
    /// Unauthenticated public endpoint.
    Google,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Baidu => "baidu",
            ProviderKind::Google => "google",
        }
    }
}

impl std::str::FromStr for ProviderKind {
    type Err = crate::shared::error::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "baidu" => Ok(ProviderKind::Baidu),
            "google" => Ok(ProviderKind::Google),
            other => Err(crate::shared::error::AppError::Validation(format!(
                "Unknown translation provider: {}",
                other
            ))),
        }
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
