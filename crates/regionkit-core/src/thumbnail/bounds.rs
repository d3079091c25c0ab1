//! Normalized-to-pixel bounds conversion.

use serde::{Deserialize, Serialize};

use crate::geometry::NormRect;
use crate::region::Stroke;

/// Tolerance absorbing float noise such as `0.1 * 1000 = 100.00000000000001`.
const PIXEL_EPSILON: f64 = 1e-9;

/// A crop rectangle in natural image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PixelBounds {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl PixelBounds {
    pub fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Convert a normalized rect to pixel bounds on an image of the given natural size.
///
/// The origin is floored and the size ceiled, then clamped to the image.
/// Returns `None` when the result has no area.
pub fn rect_pixel_bounds(rect: &NormRect, natural_width: u32, natural_height: u32) -> Option<PixelBounds> {
    let (x, width) = span_to_pixels(rect.x, rect.width, natural_width)?;
    let (y, height) = span_to_pixels(rect.y, rect.height, natural_height)?;
    Some(PixelBounds::new(x, y, width, height))
}

/// Pixel bounds of a set of brush strokes.
///
/// The bounding box of all points is inflated by the largest stroke radius
/// (`normalized_size` times the natural width) plus `padding` pixels, then
/// clamped to the image. Returns `None` if there are no points or the box has
/// no area.
pub fn brush_pixel_bounds(
    strokes: &[Stroke],
    natural_width: u32,
    natural_height: u32,
    padding: u32,
) -> Option<PixelBounds> {
    if natural_width == 0 || natural_height == 0 {
        return None;
    }
    let w = natural_width as f64;
    let h = natural_height as f64;

    let mut points = strokes
        .iter()
        .flat_map(|s| s.points.iter())
        .filter(|p| p.x.is_finite() && p.y.is_finite());
    let first = points.next()?;

    let (mut min_x, mut max_x) = (first.x, first.x);
    let (mut min_y, mut max_y) = (first.y, first.y);
    for p in points {
        min_x = min_x.min(p.x);
        max_x = max_x.max(p.x);
        min_y = min_y.min(p.y);
        max_y = max_y.max(p.y);
    }

    let radius = strokes
        .iter()
        .map(|s| s.normalized_size * w)
        .filter(|r| r.is_finite())
        .fold(0.0f64, f64::max);
    let inflate = radius + padding as f64;

    let left = (min_x * w - inflate).floor().clamp(0.0, w);
    let top = (min_y * h - inflate).floor().clamp(0.0, h);
    let right = (max_x * w + inflate).ceil().clamp(0.0, w);
    let bottom = (max_y * h + inflate).ceil().clamp(0.0, h);

    let width = (right - left) as u32;
    let height = (bottom - top) as u32;
    if width == 0 || height == 0 {
        return None;
    }
    Some(PixelBounds::new(left as u32, top as u32, width, height))
}

/// Map a normalized `(origin, length)` span onto `extent` pixels.
fn span_to_pixels(origin: f64, length: f64, extent: u32) -> Option<(u32, u32)> {
    if extent == 0 || !origin.is_finite() || !length.is_finite() {
        return None;
    }
    let extent_f = extent as f64;

    let start = (origin * extent_f + PIXEL_EPSILON).floor().clamp(0.0, extent_f);
    let size = (length * extent_f - PIXEL_EPSILON).ceil().max(0.0);
    let end = (start + size).min(extent_f);

    let size = (end - start) as u32;
    if size == 0 {
        return None;
    }
    Some((start as u32, size))
}
