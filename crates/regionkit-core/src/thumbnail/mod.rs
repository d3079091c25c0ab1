//! Region thumbnail rendering.
//!
//! A rect region's thumbnail is the matching crop of the source image at
//! natural resolution. A brush region's thumbnail is the crop around all of
//! its strokes with the strokes painted back on top, so the marked area is
//! visible inside the thumbnail. The strokes are a highlight over the image,
//! not an alpha mask.

mod bounds;
mod confirm;
mod raster;

use image::RgbaImage;
use thiserror::Error;

use crate::config::SelectorConfig;
use crate::decode::SourceImage;
use crate::encode::{encode_png, to_data_url, EncodeError};
use crate::region::{Region, RegionShape};

pub use bounds::{brush_pixel_bounds, rect_pixel_bounds, PixelBounds};
pub use confirm::{confirm_regions, ConfirmError, ConfirmOutcome};
pub use raster::draw_strokes;

/// Errors from rendering a single region thumbnail.
#[derive(Debug, Error)]
pub enum ThumbnailError {
    /// The source image has no pixels, or its buffer does not match its size.
    #[error("Source image is empty or malformed")]
    EmptyImage,

    /// The region maps to a zero-area pixel rectangle.
    #[error("Region bounds are empty on a {width}x{height} image")]
    EmptyBounds { width: u32, height: u32 },

    /// A brush region without any stroke points.
    #[error("Brush region has no strokes")]
    NoStrokes,

    /// PNG export failed.
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

/// Pixel bounds of `region` on `image`.
pub fn region_pixel_bounds(
    image: &SourceImage,
    region: &Region,
    config: &SelectorConfig,
) -> Result<PixelBounds, ThumbnailError> {
    let empty = || ThumbnailError::EmptyBounds {
        width: image.width,
        height: image.height,
    };

    match &region.shape {
        RegionShape::Rect { rect } => {
            rect_pixel_bounds(rect, image.width, image.height).ok_or_else(empty)
        }
        RegionShape::Brush { brush_strokes } => {
            if brush_strokes.iter().all(|s| s.points.is_empty()) {
                return Err(ThumbnailError::NoStrokes);
            }
            brush_pixel_bounds(
                brush_strokes,
                image.width,
                image.height,
                config.brush_padding_px,
            )
            .ok_or_else(empty)
        }
    }
}

/// Render the thumbnail raster for one region.
pub fn render_thumbnail(
    image: &SourceImage,
    region: &Region,
    config: &SelectorConfig,
) -> Result<RgbaImage, ThumbnailError> {
    if image.is_empty() {
        return Err(ThumbnailError::EmptyImage);
    }
    let view = image.as_rgba_image().ok_or(ThumbnailError::EmptyImage)?;
    let bounds = region_pixel_bounds(image, region, config)?;

    // Copy the crop into an owned buffer the strokes can be painted on
    let mut canvas = RgbaImage::from_fn(bounds.width, bounds.height, |x, y| {
        *view.get_pixel(bounds.x + x, bounds.y + y)
    });

    if let RegionShape::Brush { brush_strokes } = &region.shape {
        draw_strokes(&mut canvas, brush_strokes, bounds, image.width, image.height);
    }

    Ok(canvas)
}

/// Render a region thumbnail and export it as a PNG data URL.
pub fn thumbnail_data_url(
    image: &SourceImage,
    region: &Region,
    config: &SelectorConfig,
) -> Result<String, ThumbnailError> {
    let canvas = render_thumbnail(image, region, config)?;
    let png = encode_png(&canvas)?;
    Ok(to_data_url(&png))
}
