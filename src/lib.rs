pub mod api;
pub mod app;
pub mod core;
pub mod logging;
pub mod shared;

use crate::api::commands::screen::ScreenController;
use crate::app::state::ScreenState;
use crate::core::background::BackgroundStore;
use crate::core::features::translator::TranslatorService;
use crate::shared::error::AppResult;
use crate::shared::settings::AppSettings;
use crate::shared::types::ProviderKind;

/// Wire the translator screen: provider, background store, and the initial
/// state with the saved background restored.
pub fn open_screen(settings: &AppSettings, kind: ProviderKind) -> AppResult<ScreenController> {
    let translator = TranslatorService::from_settings(settings, kind)?;
    let background = BackgroundStore::open_default()?;

    let prefs = &settings.preferences;
    let mut state = ScreenState::default();
    if state.set_source_lang(&prefs.default_source_lang).is_err() {
        tracing::warn!(code = %prefs.default_source_lang, "ignoring unknown default source language");
    }
    if state.set_target_lang(&prefs.default_target_lang).is_err() {
        tracing::warn!(code = %prefs.default_target_lang, "ignoring unknown default target language");
    }
    state.fallback_fill = prefs.fallback_fill.clone();

    let screen = ScreenController::new(translator, background, state);
    screen.restore_background()?;
    Ok(screen)
}
