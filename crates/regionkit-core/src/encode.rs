//! PNG encoding and data-URL export for thumbnails.
//!
//! Thumbnails leave the crate as `data:image/png;base64,...` URIs, the same
//! form a canvas `toDataURL()` call produces, so the caller can upload or
//! display them without caring where they were rendered.

use std::io::Cursor;

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, RgbaImage};
use thiserror::Error;

/// Prefix of every data URL produced by [`to_data_url`].
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Errors that can occur during PNG encoding.
#[derive(Debug, Error)]
pub enum EncodeError {
    /// Width or height is zero
    #[error("Invalid dimensions: width ({width}) and height ({height}) must be non-zero")]
    InvalidDimensions { width: u32, height: u32 },

    /// PNG encoding failed
    #[error("PNG encoding failed: {0}")]
    EncodingFailed(String),
}

/// Encode an RGBA image to PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, EncodeError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(EncodeError::InvalidDimensions { width, height });
    }

    let mut buffer = Cursor::new(Vec::new());
    PngEncoder::new(&mut buffer)
        .write_image(image.as_raw(), width, height, ExtendedColorType::Rgba8)
        .map_err(|e| EncodeError::EncodingFailed(e.to_string()))?;

    Ok(buffer.into_inner())
}

/// Wrap PNG bytes in a `data:image/png;base64,` URL.
pub fn to_data_url(png: &[u8]) -> String {
    let mut url = String::with_capacity(PNG_DATA_URL_PREFIX.len() + png.len() * 4 / 3 + 4);
    url.push_str(PNG_DATA_URL_PREFIX);
    STANDARD.encode_string(png, &mut url);
    url
}
