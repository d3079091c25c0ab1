//! Normalized coordinate geometry.
//!
//! Every position and size in a region is a fraction of the source image's
//! dimensions rather than a pixel count, so a region drawn on a scaled-down
//! canvas maps onto the full-resolution image without conversion.
//!
//! # Coordinate System
//!
//! - (0.0, 0.0) = top-left corner
//! - (1.0, 1.0) = bottom-right corner
//! - width/height are relative to the image dimensions

use serde::{Deserialize, Serialize};

/// A point in normalized (0.0 to 1.0) image space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct NormPoint {
    pub x: f64,
    pub y: f64,
}

impl NormPoint {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Clamp both coordinates into the unit square.
    ///
    /// NaN coordinates collapse to 0.
    pub fn clamped(self) -> Self {
        Self {
            x: clamp_unit(self.x),
            y: clamp_unit(self.y),
        }
    }

    /// Euclidean distance in normalized units.
    pub fn distance(self, other: NormPoint) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// A rectangle in normalized image space.
///
/// After any edit through the methods below the rectangle satisfies
/// `x, y >= 0`, `width, height > 0`, `x + width <= 1` and `y + height <= 1`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NormRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl NormRect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// The rectangle covering the whole image.
    pub fn full() -> Self {
        Self::new(0.0, 0.0, 1.0, 1.0)
    }

    /// Build a rectangle from two opposite corners dragged in any direction.
    ///
    /// Both corners are clamped to the unit square first, so a drag that
    /// leaves the canvas still yields an in-bounds rectangle. Width and
    /// height are floored at `min_size`.
    pub fn from_corners(a: NormPoint, b: NormPoint, min_size: f64) -> Self {
        let a = a.clamped();
        let b = b.clamped();

        // A negative drag flips the origin to the smaller coordinate
        let raw = Self {
            x: a.x.min(b.x),
            y: a.y.min(b.y),
            width: (b.x - a.x).abs(),
            height: (b.y - a.y).abs(),
        };
        raw.clamped(min_size)
    }

    /// Clamp all four edges to the unit square and floor the size at `min_size`.
    ///
    /// When flooring the size would push the far edge past 1.0 the origin is
    /// pulled back instead, keeping the rectangle inside the unit square.
    pub fn clamped(self, min_size: f64) -> Self {
        let min_size = min_size.clamp(0.0, 1.0);

        let left = clamp_unit(self.x);
        let top = clamp_unit(self.y);
        let right = clamp_unit(finite_or(self.x + self.width, left));
        let bottom = clamp_unit(finite_or(self.y + self.height, top));

        let (x, width) = floor_span(left, right, min_size);
        let (y, height) = floor_span(top, bottom, min_size);

        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Move the rectangle by a normalized delta, keeping its size and
    /// stopping at the unit-square edges.
    pub fn translated(self, dx: f64, dy: f64) -> Self {
        let width = clamp_unit(self.width);
        let height = clamp_unit(self.height);
        let x = finite_or(self.x + dx, clamp_unit(self.x)).clamp(0.0, 1.0 - width);
        let y = finite_or(self.y + dy, clamp_unit(self.y)).clamp(0.0, 1.0 - height);
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Right edge (`x + width`).
    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    /// Bottom edge (`y + height`).
    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Check whether a point lies inside the rectangle (edges inclusive).
    pub fn contains(&self, p: NormPoint) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }

    /// Check the unit-square invariant.
    pub fn is_within_unit(&self) -> bool {
        self.x >= 0.0
            && self.y >= 0.0
            && self.width > 0.0
            && self.height > 0.0
            && self.right() <= 1.0 + 1e-9
            && self.bottom() <= 1.0 + 1e-9
    }
}

/// A width/height pair in pixels (CSS or natural image pixels).
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// The canvas element's bounding box as reported by the browser.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CanvasBounds {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute the largest canvas size that fits `container` while keeping the
/// aspect ratio of an image with `natural` dimensions.
///
/// Called on every container resize. Returns a zero size if either input has
/// no area.
pub fn fit_canvas(container: Size, natural: Size) -> Size {
    if !(container.width > 0.0 && container.height > 0.0)
        || !(natural.width > 0.0 && natural.height > 0.0)
    {
        return Size::default();
    }

    let image_aspect = natural.width / natural.height;
    let container_aspect = container.width / container.height;

    if image_aspect > container_aspect {
        // Width-bound
        Size::new(container.width, container.width / image_aspect)
    } else {
        Size::new(container.height * image_aspect, container.height)
    }
}

/// Convert a pointer position in client coordinates to a normalized point.
///
/// The position is taken relative to the canvas bounding box and divided by
/// the canvas width/height, then clamped to the unit square. A canvas with no
/// area maps everything to the origin.
pub fn normalize_pointer(client_x: f64, client_y: f64, bounds: CanvasBounds) -> NormPoint {
    let x = if bounds.width > 0.0 {
        (client_x - bounds.left) / bounds.width
    } else {
        0.0
    };
    let y = if bounds.height > 0.0 {
        (client_y - bounds.top) / bounds.height
    } else {
        0.0
    };
    NormPoint::new(x, y).clamped()
}

#[inline]
fn clamp_unit(v: f64) -> f64 {
    if v.is_nan() {
        0.0
    } else {
        v.clamp(0.0, 1.0)
    }
}

#[inline]
fn finite_or(v: f64, fallback: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        fallback
    }
}

/// Turn a clamped `[start, end]` span into `(origin, length)` with the length
/// floored at `min_size`, keeping `origin + length <= 1`.
fn floor_span(start: f64, end: f64, min_size: f64) -> (f64, f64) {
    let (start, end) = if end < start { (end, start) } else { (start, end) };
    let length = (end - start).max(min_size);
    let origin = start.min(1.0 - length).max(0.0);
    (origin, length)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_corners_forward_drag() {
        let r = NormRect::from_corners(NormPoint::new(0.1, 0.2), NormPoint::new(0.4, 0.6), 0.002);
        assert!((r.x - 0.1).abs() < 1e-12);
        assert!((r.y - 0.2).abs() < 1e-12);
        assert!((r.width - 0.3).abs() < 1e-12);
        assert!((r.height - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_from_corners_backward_drag_flips_origin() {
        let r = NormRect::from_corners(NormPoint::new(0.8, 0.9), NormPoint::new(0.5, 0.3), 0.002);
        assert!((r.x - 0.5).abs() < 1e-12);
        assert!((r.y - 0.3).abs() < 1e-12);
        assert!((r.width - 0.3).abs() < 1e-12);
        assert!((r.height - 0.6).abs() < 1e-12);
    }

    #[test]
    fn test_from_corners_outside_canvas_is_clamped() {
        let r = NormRect::from_corners(NormPoint::new(-0.5, 0.5), NormPoint::new(1.5, 2.0), 0.002);
        assert_eq!(r.x, 0.0);
        assert_eq!(r.width, 1.0);
        assert!((r.y - 0.5).abs() < 1e-12);
        assert!((r.bottom() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_from_corners_same_point_gets_min_size() {
        let r = NormRect::from_corners(NormPoint::new(1.0, 1.0), NormPoint::new(1.0, 1.0), 0.002);
        assert!((r.width - 0.002).abs() < 1e-12);
        assert!((r.height - 0.002).abs() < 1e-12);
        assert!(r.is_within_unit());
    }

    #[test]
    fn test_clamped_pulls_origin_back_inside() {
        let r = NormRect::new(0.95, 0.5, 0.2, 0.1).clamped(0.02);
        assert!((r.x - 0.95).abs() < 1e-12);
        assert!((r.width - 0.05).abs() < 1e-12);

        let r = NormRect::new(0.999, 0.0, 0.0, 0.5).clamped(0.02);
        assert!((r.width - 0.02).abs() < 1e-12);
        assert!((r.right() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_clamped_handles_nan() {
        let r = NormRect::new(f64::NAN, 0.1, 0.3, f64::INFINITY).clamped(0.02);
        assert!(r.is_within_unit());
    }

    #[test]
    fn test_translated_stops_at_edges() {
        let r = NormRect::new(0.7, 0.1, 0.2, 0.2).translated(0.5, -0.5);
        assert!((r.x - 0.8).abs() < 1e-12);
        assert_eq!(r.y, 0.0);
        assert!((r.width - 0.2).abs() < 1e-12);
    }

    #[test]
    fn test_contains() {
        let r = NormRect::new(0.2, 0.2, 0.3, 0.3);
        assert!(r.contains(NormPoint::new(0.3, 0.4)));
        assert!(r.contains(NormPoint::new(0.2, 0.2)));
        assert!(!r.contains(NormPoint::new(0.6, 0.3)));
    }

    #[test]
    fn test_fit_canvas_wide_image() {
        let s = fit_canvas(Size::new(800.0, 600.0), Size::new(2000.0, 1000.0));
        assert_eq!(s, Size::new(800.0, 400.0));
    }

    #[test]
    fn test_fit_canvas_tall_image() {
        let s = fit_canvas(Size::new(800.0, 600.0), Size::new(1000.0, 2000.0));
        assert_eq!(s, Size::new(300.0, 600.0));
    }

    #[test]
    fn test_fit_canvas_degenerate() {
        assert_eq!(fit_canvas(Size::new(0.0, 600.0), Size::new(10.0, 10.0)), Size::default());
        assert_eq!(fit_canvas(Size::new(10.0, 10.0), Size::new(0.0, 0.0)), Size::default());
    }

    #[test]
    fn test_normalize_pointer() {
        let bounds = CanvasBounds {
            left: 100.0,
            top: 50.0,
            width: 400.0,
            height: 200.0,
        };
        let p = normalize_pointer(300.0, 100.0, bounds);
        assert_eq!(p, NormPoint::new(0.5, 0.25));

        // Outside the canvas clamps
        let p = normalize_pointer(0.0, 1000.0, bounds);
        assert_eq!(p, NormPoint::new(0.0, 1.0));
    }

    #[test]
    fn test_normalize_pointer_zero_bounds() {
        let p = normalize_pointer(10.0, 10.0, CanvasBounds::default());
        assert_eq!(p, NormPoint::new(0.0, 0.0));
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn point_strategy() -> impl Strategy<Value = NormPoint> {
        (-0.5f64..=1.5, -0.5f64..=1.5).prop_map(|(x, y)| NormPoint::new(x, y))
    }

    proptest! {
        /// Property: a rectangle drawn from any two corners stays in the unit square.
        #[test]
        fn prop_drawn_rect_in_bounds(a in point_strategy(), b in point_strategy()) {
            let r = NormRect::from_corners(a, b, 0.002);

            prop_assert!(r.x >= 0.0 && r.y >= 0.0);
            prop_assert!(r.right() <= 1.0 + 1e-9, "right edge {}", r.right());
            prop_assert!(r.bottom() <= 1.0 + 1e-9, "bottom edge {}", r.bottom());
            prop_assert!(r.width >= 0.002 - 1e-12);
            prop_assert!(r.height >= 0.002 - 1e-12);
        }

        /// Property: translation preserves size for in-bounds rects.
        #[test]
        fn prop_translate_preserves_size(
            a in point_strategy(),
            b in point_strategy(),
            dx in -2.0f64..=2.0,
            dy in -2.0f64..=2.0,
        ) {
            let r = NormRect::from_corners(a, b, 0.02);
            let moved = r.translated(dx, dy);

            prop_assert!((moved.width - r.width).abs() < 1e-12);
            prop_assert!((moved.height - r.height).abs() < 1e-12);
            prop_assert!(moved.is_within_unit());
        }

        /// Property: normalized pointers are always inside the unit square.
        #[test]
        fn prop_pointer_in_unit(
            cx in -1000.0f64..=1000.0,
            cy in -1000.0f64..=1000.0,
            w in 0.0f64..=500.0,
            h in 0.0f64..=500.0,
        ) {
            let p = normalize_pointer(cx, cy, CanvasBounds { left: 10.0, top: 20.0, width: w, height: h });
            prop_assert!((0.0..=1.0).contains(&p.x));
            prop_assert!((0.0..=1.0).contains(&p.y));
        }
    }
}
