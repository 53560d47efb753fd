use crate::core::background::media::DecodedBitmap;
use crate::core::features::translator::types::{TranslationRequest, TranslationResult};
use crate::shared::error::{AppError, AppResult};
use crate::shared::types::{find_language, language_name, DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG};

pub const DEFAULT_FALLBACK_FILL: &str = "#D3D3D3";

/// Everything the translator screen shows.
#[derive(Debug, Clone)]
pub struct ScreenState {
    pub input_text: String,
    pub result_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub background: Option<DecodedBitmap>,
    /// Requests sent and not yet answered.
    pub in_flight: usize,
    pub fallback_fill: String,
}

impl Default for ScreenState {
    fn default() -> Self {
        Self::new(DEFAULT_SOURCE_LANG, DEFAULT_TARGET_LANG)
    }
}

impl ScreenState {
    pub fn new(source_lang: &str, target_lang: &str) -> Self {
        Self {
            input_text: String::new(),
            result_text: String::new(),
            source_lang: source_lang.to_string(),
            target_lang: target_lang.to_string(),
            background: None,
            in_flight: 0,
            fallback_fill: DEFAULT_FALLBACK_FILL.to_string(),
        }
    }

    pub fn is_translating(&self) -> bool {
        self.in_flight > 0
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input_text = text.into();
    }

    pub fn set_source_lang(&mut self, code: &str) -> AppResult<()> {
        self.source_lang = catalog_code(code)?;
        Ok(())
    }

    pub fn set_target_lang(&mut self, code: &str) -> AppResult<()> {
        self.target_lang = catalog_code(code)?;
        Ok(())
    }

    pub fn swap_languages(&mut self) {
        std::mem::swap(&mut self.source_lang, &mut self.target_lang);
    }

    /// Clears input and result; languages and background stay.
    pub fn clear_text(&mut self) {
        self.input_text.clear();
        self.result_text.clear();
    }

    /// Start a translation of the current input. With blank input the
    /// prompt goes straight into the result box and nothing is returned.
    pub fn begin_translation(&mut self) -> Option<TranslationRequest> {
        match TranslationRequest::new(&self.input_text, &self.source_lang, &self.target_lang) {
            Some(request) => {
                self.in_flight += 1;
                Some(request)
            }
            None => {
                self.result_text = TranslationResult::empty_input().display_text();
                None
            }
        }
    }

    /// Apply a result from `begin_translation`. The latest answer wins the
    /// result box; "Translating..." stays until every request has answered.
    pub fn finish_translation(&mut self, result: &TranslationResult) {
        self.result_text = result.display_text();
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn set_background(&mut self, background: Option<DecodedBitmap>) {
        self.background = background;
    }
}

fn catalog_code(code: &str) -> AppResult<String> {
    find_language(code)
        .map(|lang| lang.code.to_string())
        .ok_or_else(|| AppError::Validation(format!("Unsupported language code: {}", code.trim())))
}

fn language_label(code: &str) -> String {
    match language_name(code) {
        Some(name) => format!("{} ({})", name, code),
        None => code.to_string(),
    }
}

fn boxed(title: &str, body: &str) -> String {
    let mut out = format!("┌ {}\n", title);
    if body.is_empty() {
        out.push_str("│\n");
    }
    for line in body.lines() {
        out.push_str("│ ");
        out.push_str(line);
        out.push('\n');
    }
    out.push_str("└\n");
    out
}

/// Render the screen as plain text. Called after every state change.
pub fn render(state: &ScreenState) -> String {
    let mut out = String::new();

    match &state.background {
        Some(bitmap) => out.push_str(&format!("[background: image {}x{}]\n", bitmap.width, bitmap.height)),
        None => out.push_str(&format!("[background: solid {}]\n", state.fallback_fill)),
    }

    out.push_str(&format!(
        "Source: {}  ⇄  Target: {}\n",
        language_label(&state.source_lang),
        language_label(&state.target_lang)
    ));

    out.push_str(&boxed("Input", &state.input_text));

    let result = if state.is_translating() {
        "Translating..."
    } else {
        state.result_text.as_str()
    };
    out.push_str(&boxed("Result", result));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::features::translator::types::EMPTY_INPUT_MESSAGE;

    #[test]
    fn test_defaults() {
        let state = ScreenState::default();
        assert_eq!(state.source_lang, "zh");
        assert_eq!(state.target_lang, "en");
        assert!(state.background.is_none());
        assert!(!state.is_translating());
    }

    #[test]
    fn test_swap_languages() {
        let mut state = ScreenState::default();
        state.swap_languages();
        assert_eq!((state.source_lang.as_str(), state.target_lang.as_str()), ("en", "zh"));
    }

    #[test]
    fn test_language_codes_are_validated() {
        let mut state = ScreenState::default();
        state.set_target_lang("KOR").unwrap();
        assert_eq!(state.target_lang, "kor");
        assert!(state.set_source_lang("klingon").is_err());
        assert_eq!(state.source_lang, "zh");
    }

    #[test]
    fn test_blank_input_shows_prompt() {
        let mut state = ScreenState::default();
        state.set_input("   ");
        assert!(state.begin_translation().is_none());
        assert_eq!(state.result_text, EMPTY_INPUT_MESSAGE);
        assert!(!state.is_translating());
    }

    #[test]
    fn test_translation_lifecycle() {
        let mut state = ScreenState::default();
        state.set_input("你好");
        let request = state.begin_translation().unwrap();
        assert_eq!(request.text, "你好");
        assert!(state.is_translating());
        assert!(render(&state).contains("Translating..."));

        state.finish_translation(&TranslationResult::success("Hello"));
        assert!(!state.is_translating());
        assert_eq!(state.result_text, "Hello");

        state.clear_text();
        assert!(state.input_text.is_empty());
        assert!(state.result_text.is_empty());
        assert_eq!(state.source_lang, "zh");
    }

    #[test]
    fn test_overlapping_requests_keep_translating() {
        let mut state = ScreenState::default();
        state.set_input("one");
        state.begin_translation().unwrap();
        state.set_input("two");
        state.begin_translation().unwrap();

        state.finish_translation(&TranslationResult::success("first"));
        assert!(state.is_translating());
        assert!(render(&state).contains("Translating..."));

        state.finish_translation(&TranslationResult::success("second"));
        assert!(!state.is_translating());
        assert!(render(&state).contains("│ second"));
    }

    #[test]
    fn test_render_background_and_labels() {
        let mut state = ScreenState::default();
        state.set_input("line one\nline two");
        let frame = render(&state);
        assert!(frame.starts_with("[background: solid #D3D3D3]"));
        assert!(frame.contains("Source: Chinese (zh)"));
        assert!(frame.contains("Target: English (en)"));
        assert!(frame.contains("│ line two\n"));

        state.set_background(Some(DecodedBitmap { width: 1080, height: 1920, pixels: Vec::new() }));
        assert!(render(&state).starts_with("[background: image 1080x1920]"));
    }
}
