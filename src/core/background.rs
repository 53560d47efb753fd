//! Background persistence
//!
//! Remembers a single user-chosen image reference and reloads it on startup.
//! Decode and access problems never surface as errors from `load`: the screen
//! just falls back to its solid fill.

pub mod media;
pub mod prefs;

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::shared::error::AppResult;

use media::{BackgroundImageRef, DecodedBitmap, LocalMedia, MediaAccess};
use prefs::{PreferenceStore, RedbPreferences, PREFS_NAMESPACE};

pub const BACKGROUND_URI_KEY: &str = "background_uri";

#[derive(Clone)]
pub struct BackgroundStore {
    prefs: Arc<dyn PreferenceStore>,
    media: Arc<dyn MediaAccess>,
}

impl BackgroundStore {
    pub fn new(prefs: Arc<dyn PreferenceStore>, media: Arc<dyn MediaAccess>) -> Self {
        Self { prefs, media }
    }

    /// Store in the platform data dir, decoding from the local filesystem.
    pub fn open_default() -> AppResult<Self> {
        let path = RedbPreferences::default_path()?;
        let prefs = RedbPreferences::open(&path, PREFS_NAMESPACE)?;
        Ok(Self::new(Arc::new(prefs), Arc::new(LocalMedia)))
    }

    /// Record `uri` as the background, replacing any previous one.
    pub fn save(&self, uri: &str) -> AppResult<()> {
        let image = BackgroundImageRef::new(uri);
        self.request_access(&image);
        self.prefs.put_string(BACKGROUND_URI_KEY, &image.uri)?;
        info!(uri = %image, "background saved");
        Ok(())
    }

    /// Picker flow: decode first, persist only what decoded.
    pub fn select(&self, uri: &str) -> Option<DecodedBitmap> {
        let image = BackgroundImageRef::new(uri);
        self.request_access(&image);

        let bitmap = match self.media.decode_image(&image) {
            Ok(bitmap) => bitmap,
            Err(e) => {
                warn!(uri = %image, "failed to decode selected image: {}", e);
                return None;
            }
        };

        if let Err(e) = self.prefs.put_string(BACKGROUND_URI_KEY, &image.uri) {
            warn!(uri = %image, "failed to persist background: {}", e);
        } else {
            info!(uri = %image, "background saved");
        }
        Some(bitmap)
    }

    /// The stored reference, without decoding.
    pub fn current(&self) -> AppResult<Option<BackgroundImageRef>> {
        Ok(self
            .prefs
            .get_string(BACKGROUND_URI_KEY)?
            .map(BackgroundImageRef::new))
    }

    /// Decode the stored background, if any. Every failure means "none".
    pub fn load(&self) -> Option<DecodedBitmap> {
        let image = match self.current() {
            Ok(Some(image)) => image,
            Ok(None) => {
                debug!("no background stored");
                return None;
            }
            Err(e) => {
                warn!("failed to read background preference: {}", e);
                return None;
            }
        };

        match self.media.decode_image(&image) {
            Ok(bitmap) => {
                debug!(uri = %image, width = bitmap.width, height = bitmap.height, "background loaded");
                Some(bitmap)
            }
            Err(e) => {
                warn!(uri = %image, "failed to load background: {}", e);
                None
            }
        }
    }

    pub fn clear(&self) -> AppResult<()> {
        self.prefs.remove(BACKGROUND_URI_KEY)?;
        info!("background cleared");
        Ok(())
    }

    fn request_access(&self, image: &BackgroundImageRef) {
        if let Err(e) = self.media.request_read_access(image) {
            warn!(uri = %image, "failed to take read permission: {}", e);
        }
    }
}
