//! Source image decoding.
//!
//! The region selector draws over an image the browser already loaded; the
//! thumbnail pipeline needs the same pixels at natural resolution. This module
//! decodes PNG or JPEG bytes, applies the EXIF orientation the browser would
//! apply, and returns RGBA pixels.

mod types;

use std::io::Cursor;

use exif::{In, Reader, Tag};
use image::{DynamicImage, ImageReader};

pub use types::{DecodeError, Orientation, SourceImage};

/// Decode PNG or JPEG bytes into an oriented RGBA image.
///
/// # Errors
///
/// Returns `DecodeError::InvalidFormat` if the format cannot be guessed,
/// `DecodeError::CorruptedFile` if decoding fails and
/// `DecodeError::EmptyImage` for a zero-area result.
pub fn decode_image(bytes: &[u8]) -> Result<SourceImage, DecodeError> {
    let orientation = get_orientation(bytes);

    let reader = ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    if reader.format().is_none() {
        return Err(DecodeError::InvalidFormat);
    }

    let img = reader
        .decode()
        .map_err(|e| DecodeError::CorruptedFile(e.to_string()))?;

    log::trace!(
        "decoded {}x{} source image, orientation {:?}",
        img.width(),
        img.height(),
        orientation
    );

    let rgba = apply_orientation(img, orientation).into_rgba8();
    let (width, height) = rgba.dimensions();
    if width == 0 || height == 0 {
        return Err(DecodeError::EmptyImage { width, height });
    }

    Ok(SourceImage::from_rgba_image(rgba))
}

/// Read the EXIF orientation from image bytes.
///
/// Returns `Orientation::Normal` when there is no EXIF block or no
/// orientation tag.
pub fn get_orientation(bytes: &[u8]) -> Orientation {
    let mut cursor = Cursor::new(bytes);
    Reader::new()
        .read_from_container(&mut cursor)
        .ok()
        .and_then(|exif| {
            exif.get_field(Tag::Orientation, In::PRIMARY)
                .and_then(|field| field.value.get_uint(0))
        })
        .map(Orientation::from)
        .unwrap_or_default()
}

fn apply_orientation(img: DynamicImage, orientation: Orientation) -> DynamicImage {
    match orientation {
        Orientation::Normal => img,
        Orientation::FlipHorizontal => img.fliph(),
        Orientation::Rotate180 => img.rotate180(),
        Orientation::FlipVertical => img.flipv(),
        Orientation::Transpose => img.rotate90().fliph(),
        Orientation::Rotate90CW => img.rotate90(),
        Orientation::Transverse => img.rotate270().fliph(),
        Orientation::Rotate270CW => img.rotate270(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_png;

    fn png_bytes(width: u32, height: u32) -> Vec<u8> {
        let img = image::RgbaImage::from_fn(width, height, |x, y| {
            image::Rgba([x as u8, y as u8, 0, 255])
        });
        encode_png(&img).unwrap()
    }

    #[test]
    fn test_decode_png() {
        let img = decode_image(&png_bytes(4, 3)).unwrap();
        assert_eq!((img.width, img.height), (4, 3));
        assert_eq!(img.pixels.len(), 4 * 3 * 4);
        // Pixel (2, 1) keeps its position
        let view = img.as_rgba_image().unwrap();
        assert_eq!(view.get_pixel(2, 1).0, [2, 1, 0, 255]);
    }

    #[test]
    fn test_decode_garbage_is_invalid_format() {
        let result = decode_image(&[0x00, 0x01, 0x02, 0x03]);
        assert!(matches!(result, Err(DecodeError::InvalidFormat)));
    }

    #[test]
    fn test_decode_empty_bytes() {
        assert!(decode_image(&[]).is_err());
    }

    #[test]
    fn test_decode_truncated_png() {
        let bytes = png_bytes(8, 8);
        let result = decode_image(&bytes[..bytes.len() / 2]);
        assert!(matches!(result, Err(DecodeError::CorruptedFile(_))));
    }

    #[test]
    fn test_orientation_without_exif() {
        assert_eq!(get_orientation(&png_bytes(2, 2)), Orientation::Normal);
        assert_eq!(get_orientation(&[0x00, 0x01]), Orientation::Normal);
    }

    #[test]
    fn test_apply_orientation_rotate90_swaps() {
        let img = DynamicImage::ImageRgba8(image::RgbaImage::new(4, 2));
        let rotated = apply_orientation(img, Orientation::Rotate90CW);
        assert_eq!((rotated.width(), rotated.height()), (2, 4));
    }

    #[test]
    fn test_apply_orientation_flip_horizontal() {
        let mut src = image::RgbaImage::new(2, 1);
        src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
        src.put_pixel(1, 0, image::Rgba([0, 255, 0, 255]));

        let flipped = apply_orientation(DynamicImage::ImageRgba8(src), Orientation::FlipHorizontal)
            .into_rgba8();
        assert_eq!(flipped.get_pixel(0, 0).0, [0, 255, 0, 255]);
        assert_eq!(flipped.get_pixel(1, 0).0, [255, 0, 0, 255]);
    }
}
