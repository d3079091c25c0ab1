//! Selector configuration.
//!
//! All fields have defaults, so the frontend can pass a partial object (or
//! nothing) and only override what it needs.

use serde::{Deserialize, Serialize};

use crate::handles::{HANDLE_HIT_THRESHOLD, MIN_RESIZE_SIZE};
use crate::region::Color;

/// Minimum width/height of a freshly drawn rectangle.
pub const MIN_DRAW_SIZE: f64 = 0.002;

/// Drags smaller than this in both dimensions are treated as clicks.
pub const MIN_COMMIT_SIZE: f64 = 0.01;

/// Default brush radius as a fraction of the canvas width.
pub const DEFAULT_BRUSH_SIZE: f64 = 0.03;

/// Largest brush radius accepted by the selector.
pub const MAX_BRUSH_SIZE: f64 = 0.5;

/// Extra pixels around a brush region's bounding box in its thumbnail.
pub const DEFAULT_BRUSH_PADDING_PX: u32 = 8;

/// Tunables for the region selector and thumbnail rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SelectorConfig {
    /// Hit radius around resize handles (normalized units).
    pub handle_threshold: f64,
    /// Minimum rect size after a resize drag.
    pub min_resize_size: f64,
    /// Minimum rect size while drawing.
    pub min_draw_size: f64,
    /// Minimum drag extent for a rect to be committed.
    pub min_commit_size: f64,
    /// Initial brush radius (fraction of canvas width).
    pub default_brush_size: f64,
    /// Initial brush color.
    pub brush_color: Color,
    /// Padding around brush thumbnails, in natural image pixels.
    pub brush_padding_px: u32,
}

impl Default for SelectorConfig {
    fn default() -> Self {
        Self {
            handle_threshold: HANDLE_HIT_THRESHOLD,
            min_resize_size: MIN_RESIZE_SIZE,
            min_draw_size: MIN_DRAW_SIZE,
            min_commit_size: MIN_COMMIT_SIZE,
            default_brush_size: DEFAULT_BRUSH_SIZE,
            brush_color: Color::BRUSH_DEFAULT,
            brush_padding_px: DEFAULT_BRUSH_PADDING_PX,
        }
    }
}
