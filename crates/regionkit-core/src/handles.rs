//! Resize handles for rectangle regions.
//!
//! A selected rectangle exposes eight handles: the four corners and the four
//! edge midpoints. Hit testing uses a fixed normalized distance so handles are
//! equally grabbable regardless of the canvas's on-screen size.

use serde::{Deserialize, Serialize};

use crate::geometry::{NormPoint, NormRect};

/// Default hit radius around a handle anchor, in normalized units.
pub const HANDLE_HIT_THRESHOLD: f64 = 0.02;

/// Minimum width/height of a rectangle after a resize drag.
pub const MIN_RESIZE_SIZE: f64 = 0.02;

/// One of the eight resize anchors of a rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Handle {
    TopLeft,
    Top,
    TopRight,
    Right,
    BottomRight,
    Bottom,
    BottomLeft,
    Left,
}

impl Handle {
    /// All handles in hit-test order (corners before edges).
    pub const ALL: [Handle; 8] = [
        Handle::TopLeft,
        Handle::TopRight,
        Handle::BottomRight,
        Handle::BottomLeft,
        Handle::Top,
        Handle::Right,
        Handle::Bottom,
        Handle::Left,
    ];

    /// Position of this handle on `rect`.
    pub fn anchor(self, rect: &NormRect) -> NormPoint {
        let cx = rect.x + rect.width / 2.0;
        let cy = rect.y + rect.height / 2.0;
        match self {
            Handle::TopLeft => NormPoint::new(rect.x, rect.y),
            Handle::Top => NormPoint::new(cx, rect.y),
            Handle::TopRight => NormPoint::new(rect.right(), rect.y),
            Handle::Right => NormPoint::new(rect.right(), cy),
            Handle::BottomRight => NormPoint::new(rect.right(), rect.bottom()),
            Handle::Bottom => NormPoint::new(cx, rect.bottom()),
            Handle::BottomLeft => NormPoint::new(rect.x, rect.bottom()),
            Handle::Left => NormPoint::new(rect.x, cy),
        }
    }

    /// Whether dragging this handle moves the left edge.
    #[inline]
    fn moves_left(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Left | Handle::BottomLeft)
    }

    #[inline]
    fn moves_right(self) -> bool {
        matches!(self, Handle::TopRight | Handle::Right | Handle::BottomRight)
    }

    #[inline]
    fn moves_top(self) -> bool {
        matches!(self, Handle::TopLeft | Handle::Top | Handle::TopRight)
    }

    #[inline]
    fn moves_bottom(self) -> bool {
        matches!(self, Handle::BottomLeft | Handle::Bottom | Handle::BottomRight)
    }

    /// CSS cursor name shown while hovering this handle.
    pub fn cursor(self) -> &'static str {
        match self {
            Handle::TopLeft | Handle::BottomRight => "nwse-resize",
            Handle::TopRight | Handle::BottomLeft => "nesw-resize",
            Handle::Top | Handle::Bottom => "ns-resize",
            Handle::Left | Handle::Right => "ew-resize",
        }
    }
}

/// Find the handle of `rect` under `point`, if any.
///
/// Returns the first handle whose anchor lies within `threshold` (Euclidean,
/// normalized units) of the point.
pub fn hit_test(rect: &NormRect, point: NormPoint, threshold: f64) -> Option<Handle> {
    Handle::ALL
        .into_iter()
        .find(|h| h.anchor(rect).distance(point) <= threshold)
}

/// Apply a handle drag to `rect`.
///
/// `dx`/`dy` are the pointer movement in normalized units. Only the edges the
/// handle controls move; a moving edge stops `min_size` short of the opposite
/// edge and at the unit-square boundary. The result then goes through the
/// usual clamp-and-floor pass.
pub fn apply_resize(rect: &NormRect, handle: Handle, dx: f64, dy: f64, min_size: f64) -> NormRect {
    let dx = if dx.is_finite() { dx } else { 0.0 };
    let dy = if dy.is_finite() { dy } else { 0.0 };

    let mut left = rect.x;
    let mut top = rect.y;
    let mut right = rect.right();
    let mut bottom = rect.bottom();

    if handle.moves_left() {
        left = (left + dx).max(0.0).min(right - min_size);
    }
    if handle.moves_right() {
        right = (right + dx).min(1.0).max(left + min_size);
    }
    if handle.moves_top() {
        top = (top + dy).max(0.0).min(bottom - min_size);
    }
    if handle.moves_bottom() {
        bottom = (bottom + dy).min(1.0).max(top + min_size);
    }

    NormRect::new(left, top, right - left, bottom - top).clamped(min_size)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn handle_strategy() -> impl Strategy<Value = Handle> {
        (0usize..8).prop_map(|i| Handle::ALL[i])
    }

    fn rect_strategy() -> impl Strategy<Value = NormRect> {
        (0.0f64..=0.9, 0.0f64..=0.9, 0.02f64..=1.0, 0.02f64..=1.0)
            .prop_map(|(x, y, w, h)| NormRect::new(x, y, w, h).clamped(MIN_RESIZE_SIZE))
    }

    proptest! {
        /// Property: resizing never yields negative size or leaves the unit square.
        #[test]
        fn prop_resize_stays_valid(
            r in rect_strategy(),
            handle in handle_strategy(),
            dx in -2.0f64..=2.0,
            dy in -2.0f64..=2.0,
        ) {
            let out = apply_resize(&r, handle, dx, dy, MIN_RESIZE_SIZE);

            prop_assert!(out.width >= MIN_RESIZE_SIZE - 1e-9, "width {}", out.width);
            prop_assert!(out.height >= MIN_RESIZE_SIZE - 1e-9, "height {}", out.height);
            prop_assert!(out.x >= 0.0 && out.y >= 0.0);
            prop_assert!(out.right() <= 1.0 + 1e-9);
            prop_assert!(out.bottom() <= 1.0 + 1e-9);
        }

        /// Property: a zero drag leaves an in-bounds rect unchanged.
        #[test]
        fn prop_zero_drag_is_identity(r in rect_strategy(), handle in handle_strategy()) {
            let out = apply_resize(&r, handle, 0.0, 0.0, MIN_RESIZE_SIZE);
            prop_assert!((out.x - r.x).abs() < 1e-9);
            prop_assert!((out.y - r.y).abs() < 1e-9);
            prop_assert!((out.width - r.width).abs() < 1e-9);
            prop_assert!((out.height - r.height).abs() < 1e-9);
        }
    }
}
