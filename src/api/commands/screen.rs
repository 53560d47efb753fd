//! Translator screen commands
//!
//! The controller owns the shared `ScreenState`. The lock is never held
//! across the network await: overlapping translations run concurrently and
//! whichever finishes last sets the result box.

use std::sync::{Arc, Mutex, MutexGuard};

use tokio::task::JoinHandle;
use tracing::debug;

use crate::app::state::{render, ScreenState};
use crate::core::background::BackgroundStore;
use crate::core::features::translator::types::{TranslationRequest, TranslationResult};
use crate::core::features::translator::TranslatorService;
use crate::shared::error::{AppError, AppResult};

#[derive(Clone)]
pub struct ScreenController {
    translator: TranslatorService,
    background: BackgroundStore,
    state: Arc<Mutex<ScreenState>>,
}

impl ScreenController {
    pub fn new(translator: TranslatorService, background: BackgroundStore, state: ScreenState) -> Self {
        Self {
            translator,
            background,
            state: Arc::new(Mutex::new(state)),
        }
    }

    fn lock(&self) -> AppResult<MutexGuard<'_, ScreenState>> {
        self.state
            .lock()
            .map_err(|e| AppError::System(format!("Mutex poisoned: {}", e)))
    }

    fn update<F>(&self, f: F) -> AppResult<String>
    where
        F: FnOnce(&mut ScreenState) -> AppResult<()>,
    {
        let mut state = self.lock()?;
        f(&mut state)?;
        Ok(render(&state))
    }

    /// Launch step: pull the saved background into the state.
    pub fn restore_background(&self) -> AppResult<String> {
        let bitmap = self.background.load();
        self.update(|state| {
            state.set_background(bitmap);
            Ok(())
        })
    }

    pub fn snapshot(&self) -> AppResult<ScreenState> {
        Ok(self.lock()?.clone())
    }

    pub fn render(&self) -> AppResult<String> {
        Ok(render(&*self.lock()?))
    }

    pub fn set_input(&self, text: &str) -> AppResult<String> {
        self.update(|state| {
            state.set_input(text);
            Ok(())
        })
    }

    pub fn set_source_lang(&self, code: &str) -> AppResult<String> {
        self.update(|state| state.set_source_lang(code))
    }

    pub fn set_target_lang(&self, code: &str) -> AppResult<String> {
        self.update(|state| state.set_target_lang(code))
    }

    pub fn swap_languages(&self) -> AppResult<String> {
        self.update(|state| {
            state.swap_languages();
            Ok(())
        })
    }

    pub fn clear_text(&self) -> AppResult<String> {
        self.update(|state| {
            state.clear_text();
            Ok(())
        })
    }

    pub fn provider_name(&self) -> &'static str {
        self.translator.provider_name()
    }

    /// Translate the current input and return the final frame.
    pub async fn translate_current(&self) -> AppResult<String> {
        let request = {
            let mut state = self.lock()?;
            match state.begin_translation() {
                Some(request) => request,
                None => return Ok(render(&state)),
            }
        };
        self.complete(request).await
    }

    /// Set the input and start translating it on a background task.
    ///
    /// Returns the frame as of now ("Translating..." or the empty-input
    /// prompt) and, when a request went out, a handle yielding the frame
    /// after it answered.
    pub fn spawn_translation(&self, text: &str) -> AppResult<(String, Option<JoinHandle<AppResult<String>>>)> {
        let (frame, request) = {
            let mut state = self.lock()?;
            state.set_input(text);
            let request = state.begin_translation();
            (render(&state), request)
        };
        let request = match request {
            Some(request) => request,
            None => return Ok((frame, None)),
        };

        let screen = self.clone();
        let handle = tokio::spawn(async move { screen.complete(request).await });
        Ok((frame, Some(handle)))
    }

    /// Set the input and translate it in one step.
    pub async fn translate_text(&self, text: &str) -> AppResult<TranslationResult> {
        let request = {
            let mut state = self.lock()?;
            state.set_input(text);
            state.begin_translation()
        };
        let request = match request {
            Some(request) => request,
            None => return Ok(TranslationResult::empty_input()),
        };
        let result = self.send(&request).await;
        self.lock()?.finish_translation(&result);
        Ok(result)
    }

    async fn send(&self, request: &TranslationRequest) -> TranslationResult {
        self.translator
            .translate(&request.text, &request.source_lang, &request.target_lang)
            .await
    }

    async fn complete(&self, request: TranslationRequest) -> AppResult<String> {
        let result = self.send(&request).await;
        debug!(success = result.is_success(), "applying translation result");
        self.update(|state| {
            state.finish_translation(&result);
            Ok(())
        })
    }

    /// Pick a new background. Undecodable images leave the screen unchanged.
    pub fn choose_background(&self, uri: &str) -> AppResult<Option<String>> {
        match self.background.select(uri) {
            Some(bitmap) => self
                .update(|state| {
                    state.set_background(Some(bitmap));
                    Ok(())
                })
                .map(Some),
            None => Ok(None),
        }
    }

    /// `choose_background` on the blocking pool: decode and the preference
    /// write stay off the async workers.
    pub async fn pick_background(&self, uri: &str) -> AppResult<Option<String>> {
        let screen = self.clone();
        let uri = uri.to_string();
        tokio::task::spawn_blocking(move || screen.choose_background(&uri))
            .await
            .map_err(|e| AppError::System(format!("Background task failed: {}", e)))?
    }

    pub fn reset_background(&self) -> AppResult<String> {
        self.background.clear()?;
        self.update(|state| {
            state.set_background(None);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::background::media::LocalMedia;
    use crate::core::background::prefs::{RedbPreferences, PREFS_NAMESPACE};
    use crate::core::features::translator::baidu::BaiduProvider;
    use crate::core::features::translator::testing::FakeTransport;
    use crate::core::features::translator::types::EMPTY_INPUT_MESSAGE;
    use std::time::Duration;

    fn controller(dir: &std::path::Path, transport: Arc<FakeTransport>) -> ScreenController {
        let provider = Arc::new(BaiduProvider::new("id", "key", "https://fanyi-api.baidu.com/api/trans/vip/translate"));
        let translator = TranslatorService::new(provider, transport);
        let prefs = RedbPreferences::open(&dir.join("prefs.redb"), PREFS_NAMESPACE).unwrap();
        let background = BackgroundStore::new(Arc::new(prefs), Arc::new(LocalMedia));
        ScreenController::new(translator, background, ScreenState::default())
    }

    #[tokio::test]
    async fn test_translate_current_updates_result() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::replying(200, r#"{"trans_result":[{"dst":"Hello"}]}"#));
        let screen = controller(dir.path(), transport.clone());

        screen.set_input("你好").unwrap();
        let frame = screen.translate_current().await.unwrap();
        assert!(frame.contains("│ Hello"));

        let state = screen.snapshot().unwrap();
        assert_eq!(state.result_text, "Hello");
        assert!(!state.is_translating());
        assert_eq!(transport.request_count(), 1);
    }

    #[tokio::test]
    async fn test_empty_input_skips_network() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::replying(200, "{}"));
        let screen = controller(dir.path(), transport.clone());

        screen.translate_current().await.unwrap();
        assert_eq!(screen.snapshot().unwrap().result_text, EMPTY_INPUT_MESSAGE);

        let result = screen.translate_text("").await.unwrap();
        assert_eq!(result, TranslationResult::empty_input());
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_overlapping_translations_do_not_deadlock() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(
            FakeTransport::replying(200, r#"{"trans_result":[{"dst":"done"}]}"#)
                .with_delay(Duration::from_millis(25)),
        );
        let screen = controller(dir.path(), transport.clone());

        let first = screen.clone();
        let second = screen.clone();
        let a = tokio::spawn(async move { first.translate_text("one").await });
        let b = tokio::spawn(async move { second.translate_text("two").await });

        let (a, b) = tokio::time::timeout(Duration::from_secs(5), async { (a.await, b.await) })
            .await
            .expect("translations should not hang");
        assert!(a.unwrap().unwrap().is_success());
        assert!(b.unwrap().unwrap().is_success());

        let state = screen.snapshot().unwrap();
        assert!(state.input_text == "one" || state.input_text == "two");
        assert_eq!(state.result_text, "done");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_spawned_translation_leaves_screen_responsive() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(
            FakeTransport::replying(200, r#"{"trans_result":[{"dst":"done"}]}"#)
                .with_delay(Duration::from_millis(50)),
        );
        let screen = controller(dir.path(), transport.clone());

        let (frame, first) = screen.spawn_translation("one").unwrap();
        assert!(frame.contains("Translating..."));
        let first = first.expect("request should be in flight");

        // Commands still go through while the request is pending.
        screen.swap_languages().unwrap();
        let (_, second) = screen.spawn_translation("two").unwrap();
        let second = second.expect("request should be in flight");
        let state = screen.snapshot().unwrap();
        assert_eq!(state.source_lang, "en");
        assert_eq!(state.in_flight, 2);

        let (a, b) = tokio::time::timeout(Duration::from_secs(5), async { (first.await, second.await) })
            .await
            .expect("translations should not hang");
        a.unwrap().unwrap();
        let frame = b.unwrap().unwrap();
        assert!(frame.contains("│ done"));

        let state = screen.snapshot().unwrap();
        assert!(!state.is_translating());
        assert_eq!(state.result_text, "done");
        assert_eq!(transport.request_count(), 2);
    }

    #[tokio::test]
    async fn test_spawned_blank_input_sends_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(FakeTransport::replying(200, "{}"));
        let screen = controller(dir.path(), transport.clone());

        let (frame, pending) = screen.spawn_translation("   ").unwrap();
        assert!(pending.is_none());
        assert!(frame.contains(EMPTY_INPUT_MESSAGE));
        assert_eq!(transport.request_count(), 0);
    }

    #[tokio::test]
    async fn test_blank_input_keeps_other_request_pending() {
        let dir = tempfile::tempdir().unwrap();
        let transport = Arc::new(
            FakeTransport::replying(200, r#"{"trans_result":[{"dst":"done"}]}"#)
                .with_delay(Duration::from_millis(50)),
        );
        let screen = controller(dir.path(), transport.clone());

        let (_, pending) = screen.spawn_translation("one").unwrap();
        let result = screen.translate_text("").await.unwrap();
        assert_eq!(result, TranslationResult::empty_input());
        assert_eq!(screen.snapshot().unwrap().in_flight, 1);

        pending.unwrap().await.unwrap().unwrap();
        assert_eq!(screen.snapshot().unwrap().in_flight, 0);
    }

    #[tokio::test]
    async fn test_pick_background_runs_off_the_runtime() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("bg.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([9, 9, 9, 255])).save(&image_path).unwrap();

        let screen = controller(dir.path(), Arc::new(FakeTransport::replying(200, "{}")));
        let frame = screen.pick_background(&image_path.to_string_lossy()).await.unwrap().unwrap();
        assert!(frame.starts_with("[background: image 3x2]"));
        assert!(screen.pick_background("/no/such/image.png").await.unwrap().is_none());
    }

    #[test]
    fn test_provider_name() {
        let dir = tempfile::tempdir().unwrap();
        let screen = controller(dir.path(), Arc::new(FakeTransport::replying(200, "{}")));
        assert_eq!(screen.provider_name(), "baidu");
    }

    #[tokio::test]
    async fn test_background_choose_and_reset() {
        let dir = tempfile::tempdir().unwrap();
        let image_path = dir.path().join("bg.png");
        image::RgbaImage::from_pixel(5, 4, image::Rgba([0, 0, 0, 255])).save(&image_path).unwrap();

        let screen = controller(dir.path(), Arc::new(FakeTransport::replying(200, "{}")));
        let frame = screen.choose_background(&image_path.to_string_lossy()).unwrap().unwrap();
        assert!(frame.starts_with("[background: image 5x4]"));

        assert!(screen.choose_background("/no/such/image.png").unwrap().is_none());
        assert!(screen.snapshot().unwrap().background.is_some());

        let frame = screen.reset_background().unwrap();
        assert!(frame.starts_with("[background: solid"));
        screen.restore_background().unwrap();
        assert!(screen.snapshot().unwrap().background.is_none());
    }

    #[test]
    fn test_language_commands() {
        let dir = tempfile::tempdir().unwrap();
        let screen = controller(dir.path(), Arc::new(FakeTransport::replying(200, "{}")));

        screen.set_target_lang("jp").unwrap();
        screen.swap_languages().unwrap();
        let state = screen.snapshot().unwrap();
        assert_eq!(state.source_lang, "jp");
        assert_eq!(state.target_lang, "zh");
        assert!(screen.set_source_lang("xx").is_err());
    }
}
