//! Brush stroke rasterization.
//!
//! Strokes are drawn the way a 2D canvas draws a path with round caps and
//! joins: each stroke is covered once (overlapping segments do not darken),
//! with a one-pixel anti-aliased edge, and composited source-over.

use image::RgbaImage;

use super::bounds::PixelBounds;
use crate::region::{Color, Stroke};

/// Draw `strokes` onto `canvas`, which holds the crop `bounds` of an image
/// with the given natural size.
///
/// Normalized points are scaled to natural pixels and translated by the crop
/// origin, so the strokes land exactly where they were drawn on the source.
pub fn draw_strokes(
    canvas: &mut RgbaImage,
    strokes: &[Stroke],
    bounds: PixelBounds,
    natural_width: u32,
    natural_height: u32,
) {
    let nw = natural_width as f64;
    let nh = natural_height as f64;

    for stroke in strokes {
        let radius = (stroke.normalized_size * nw) as f32;
        if !(radius.is_finite() && radius > 0.0) || stroke.points.is_empty() {
            continue;
        }

        let path: Vec<(f32, f32)> = stroke
            .points
            .iter()
            .filter(|p| p.x.is_finite() && p.y.is_finite())
            .map(|p| {
                (
                    (p.x * nw - bounds.x as f64) as f32,
                    (p.y * nh - bounds.y as f64) as f32,
                )
            })
            .collect();

        let coverage = stroke_coverage(canvas.width(), canvas.height(), &path, radius);
        blend_coverage(canvas, &coverage, stroke.color);
    }
}

/// Per-pixel coverage (0.0 to 1.0) of a round-capped polyline.
fn stroke_coverage(width: u32, height: u32, path: &[(f32, f32)], radius: f32) -> Vec<f32> {
    let mut coverage = vec![0.0f32; width as usize * height as usize];
    if path.is_empty() || width == 0 || height == 0 {
        return coverage;
    }

    // A single point is a dot: a zero-length segment
    let segments: Vec<((f32, f32), (f32, f32))> = if path.len() == 1 {
        vec![(path[0], path[0])]
    } else {
        path.windows(2).map(|w| (w[0], w[1])).collect()
    };

    let reach = radius + 1.0;
    for (a, b) in segments {
        let min_x = (a.0.min(b.0) - reach).floor().max(0.0) as u32;
        let min_y = (a.1.min(b.1) - reach).floor().max(0.0) as u32;
        let max_x = ((a.0.max(b.0) + reach).ceil().max(0.0) as u32).min(width);
        let max_y = ((a.1.max(b.1) + reach).ceil().max(0.0) as u32).min(height);

        for py in min_y..max_y {
            let row = py as usize * width as usize;
            for px in min_x..max_x {
                // Sample at the pixel center
                let d = distance_to_segment(px as f32 + 0.5, py as f32 + 0.5, a, b);
                let c = (radius + 0.5 - d).clamp(0.0, 1.0);
                let slot = &mut coverage[row + px as usize];
                if c > *slot {
                    *slot = c;
                }
            }
        }
    }

    coverage
}

/// Distance from `(x, y)` to the segment `a`-`b`.
#[inline]
fn distance_to_segment(x: f32, y: f32, a: (f32, f32), b: (f32, f32)) -> f32 {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let len_sq = dx * dx + dy * dy;
    let t = if len_sq > f32::EPSILON {
        (((x - a.0) * dx + (y - a.1) * dy) / len_sq).clamp(0.0, 1.0)
    } else {
        0.0
    };
    let (cx, cy) = (a.0 + t * dx, a.1 + t * dy);
    ((x - cx).powi(2) + (y - cy).powi(2)).sqrt()
}

/// Composite `color` over `canvas` weighted by `coverage` (source-over).
fn blend_coverage(canvas: &mut RgbaImage, coverage: &[f32], color: Color) {
    let src_alpha = color.a as f32 / 255.0;
    let src = [color.r as f32, color.g as f32, color.b as f32];

    for (pixel, &c) in canvas.pixels_mut().zip(coverage) {
        if c <= 0.0 {
            continue;
        }
        let a = src_alpha * c;
        let dst_a = pixel[3] as f32 / 255.0;
        let out_a = a + dst_a * (1.0 - a);
        if out_a <= 0.0 {
            continue;
        }

        for (i, &s) in src.iter().enumerate() {
            let d = pixel[i] as f32;
            let v = (s * a + d * dst_a * (1.0 - a)) / out_a;
            pixel[i] = v.round().clamp(0.0, 255.0) as u8;
        }
        pixel[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
    }
}
