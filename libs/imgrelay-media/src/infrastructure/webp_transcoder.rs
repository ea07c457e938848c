//! WebP Transcoder Implementation
//!
//! This module implements the `ImageTranscoder` trait: decode any supported
//! raster format via the `image` crate, encode lossy WebP via the `webp`
//! crate. Pure function over input bytes, no retained state.

use bytes::Bytes;
use tracing::{debug, instrument};

use imgrelay_domain::{ports::ImageTranscoder, resolution::error::ResolutionError};

/// Default WebP encoding quality (0-100)
const DEFAULT_QUALITY: f32 = 80.0;

/// image/webp-based implementation of the ImageTranscoder port
#[derive(Debug, Clone, Copy)]
pub struct WebpTranscoder {
    quality: f32,
}

impl WebpTranscoder {
    /// Create a transcoder with the default quality
    pub fn new() -> Self {
        Self::with_quality(DEFAULT_QUALITY)
    }

    /// Create a transcoder with an explicit quality (clamped to 0-100)
    pub fn with_quality(quality: f32) -> Self {
        Self {
            quality: quality.clamp(0.0, 100.0),
        }
    }

    /// The configured encoding quality
    pub fn quality(&self) -> f32 {
        self.quality
    }
}

impl Default for WebpTranscoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageTranscoder for WebpTranscoder {
    #[instrument(skip(self, data), fields(input_size = data.len()))]
    fn transcode(&self, data: &[u8]) -> Result<Bytes, ResolutionError> {
        let img = image::load_from_memory(data).map_err(|err| {
            ResolutionError::transcode(format!("Failed to decode source image: {}", err))
        })?;

        // WebP encoding works on RGBA pixels
        let rgba = img.to_rgba8();
        let (width, height) = rgba.dimensions();

        let encoder = webp::Encoder::from_rgba(&rgba, width, height);
        let encoded = encoder.encode(self.quality);

        debug!(
            width,
            height,
            output_size = encoded.len(),
            "Transcoded image to WebP"
        );
        Ok(Bytes::copy_from_slice(&encoded))
    }
}
