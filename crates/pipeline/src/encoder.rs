//! Avatar re-encoding.
//!
//! An [`AvatarEncoder`] turns the raw bytes of one avatar into the list of
//! files to publish. [`WebpEncoder`] keeps the original bytes under their
//! detected extension and adds a lossless webp rendition.

use std::io::Cursor;

use charsync_core::{SyncError, SyncResult};
use image::ImageFormat;

/// Extension of the canonical output encoding.
pub const WEBP_EXTENSION: &str = "webp";

/// One file to upload for an avatar, stored at `raw_path + "." + extension`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub extension: String,
    pub bytes: Vec<u8>,
}

/// Opaque byte transform applied to every avatar before upload.
pub trait AvatarEncoder: Send + Sync {
    fn encode(&self, raw: &[u8]) -> SyncResult<Vec<Rendition>>;
}

/// Original bytes plus a webp copy.
#[derive(Debug, Clone, Copy, Default)]
pub struct WebpEncoder;

impl AvatarEncoder for WebpEncoder {
    fn encode(&self, raw: &[u8]) -> SyncResult<Vec<Rendition>> {
        let format = image::guess_format(raw)
            .map_err(|e| SyncError::Encode(format!("unrecognised avatar format: {e}")))?;
        let extension = format
            .extensions_str()
            .first()
            .copied()
            .unwrap_or("bin")
            .to_string();

        let decoded = image::load_from_memory_with_format(raw, format)
            .map_err(|e| SyncError::Encode(format!("decoding {extension} avatar: {e}")))?;

        // The webp encoder only accepts 8-bit RGB(A).
        let rgba = image::DynamicImage::ImageRgba8(decoded.to_rgba8());
        let mut webp = Cursor::new(Vec::new());
        rgba.write_to(&mut webp, ImageFormat::WebP)
            .map_err(|e| SyncError::Encode(format!("encoding webp avatar: {e}")))?;

        Ok(vec![
            Rendition {
                extension,
                bytes: raw.to_vec(),
            },
            Rendition {
                extension: WEBP_EXTENSION.to_string(),
                bytes: webp.into_inner(),
            },
        ])
    }
}
