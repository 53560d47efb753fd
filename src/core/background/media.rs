//! Media access: the permission and decode boundary for user-picked images.

use std::path::PathBuf;

use image::ImageReader;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::shared::error::{AppError, AppResult};

/// Persisted pointer to a user-selected image (`file://` URL or plain path).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundImageRef {
    pub uri: String,
}

impl BackgroundImageRef {
    pub fn new(uri: impl Into<String>) -> Self {
        Self { uri: uri.into() }
    }

    /// Resolve to a local path. Non-file URL schemes are rejected.
    pub fn to_path(&self) -> AppResult<PathBuf> {
        let uri = self.uri.trim();
        if uri.is_empty() {
            return Err(AppError::Validation("Empty image reference".to_string()));
        }
        if uri.starts_with("file:") {
            let url = Url::parse(uri)
                .map_err(|e| AppError::Validation(format!("Invalid image URI '{}': {}", uri, e)))?;
            return url
                .to_file_path()
                .map_err(|_| AppError::Validation(format!("Not a local file URI: {}", uri)));
        }
        if let Ok(url) = Url::parse(uri) {
            // Single-letter schemes are Windows drive letters, not URLs.
            if url.scheme().len() > 1 {
                return Err(AppError::Validation(format!(
                    "Unsupported image URI scheme '{}'",
                    url.scheme()
                )));
            }
        }
        Ok(PathBuf::from(uri))
    }
}

impl std::fmt::Display for BackgroundImageRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.uri)
    }
}

/// In-memory RGBA8 pixels. Never persisted.
#[derive(Clone, PartialEq, Eq)]
pub struct DecodedBitmap {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<u8>,
}

impl std::fmt::Debug for DecodedBitmap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DecodedBitmap")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("bytes", &self.pixels.len())
            .finish()
    }
}

pub trait MediaAccess: Send + Sync {
    /// Ask for durable read access to the image. Best-effort for callers.
    fn request_read_access(&self, image: &BackgroundImageRef) -> AppResult<()>;

    fn decode_image(&self, image: &BackgroundImageRef) -> AppResult<DecodedBitmap>;
}

/// Local filesystem media: access means the file exists and is readable.
#[derive(Debug, Default, Clone, Copy)]
pub struct LocalMedia;

impl MediaAccess for LocalMedia {
    fn request_read_access(&self, image: &BackgroundImageRef) -> AppResult<()> {
        let path = image.to_path()?;
        let metadata = std::fs::metadata(&path)?;
        if !metadata.is_file() {
            return Err(AppError::Media(format!("Not a file: {}", path.display())));
        }
        std::fs::File::open(&path)?;
        Ok(())
    }

    fn decode_image(&self, image: &BackgroundImageRef) -> AppResult<DecodedBitmap> {
        let path = image.to_path()?;
        let decoded = ImageReader::open(&path)?
            .with_guessed_format()?
            .decode()?;
        let rgba = decoded.to_rgba8();
        Ok(DecodedBitmap {
            width: rgba.width(),
            height: rgba.height(),
            pixels: rgba.into_raw(),
        })
    }
}
