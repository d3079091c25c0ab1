//! Selection regions and brush strokes.
//!
//! A region is either a rectangle or a bundle of freehand brush strokes. The
//! shape is a tagged enum so the fields valid for each kind travel together;
//! on the wire it keeps the frontend's `{ type: "rect", rect }` /
//! `{ type: "brush", brushStrokes }` layout.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

use crate::geometry::{NormPoint, NormRect};

/// Minimum number of points for a stroke to be committed.
pub const MIN_STROKE_POINTS: usize = 2;

/// Error returned when a CSS hex color cannot be parsed.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("Invalid color '{0}': expected #rgb, #rgba, #rrggbb or #rrggbbaa")]
pub struct ColorParseError(pub String);

/// An sRGB color with straight (non-premultiplied) alpha.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// The default brush highlight: a translucent red.
    pub const BRUSH_DEFAULT: Color = Color::rgba(0xff, 0x3b, 0x30, 0xcc);
}

impl Default for Color {
    fn default() -> Self {
        Self::BRUSH_DEFAULT
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }

        let nibble = |i: usize| u8::from_str_radix(&hex[i..i + 1], 16).map(|v| v * 17);
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16);

        let parsed = match hex.len() {
            3 => (nibble(0), nibble(1), nibble(2), Ok(0xff)),
            4 => (nibble(0), nibble(1), nibble(2), nibble(3)),
            6 => (byte(0), byte(2), byte(4), Ok(0xff)),
            8 => (byte(0), byte(2), byte(4), byte(6)),
            _ => return Err(err()),
        };

        match parsed {
            (Ok(r), Ok(g), Ok(b), Ok(a)) => Ok(Color { r, g, b, a }),
            _ => Err(err()),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.a == 0xff {
            write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            write!(f, "#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Serialize for Color {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// One freehand brush stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Stroke {
    /// Ordered stroke path in normalized coordinates.
    pub points: Vec<NormPoint>,
    /// Brush radius in canvas pixels at the time the stroke was drawn.
    #[serde(default)]
    pub size: f64,
    /// Brush radius as a fraction of the canvas width.
    pub normalized_size: f64,
    #[serde(default)]
    pub color: Color,
}

impl Stroke {
    pub fn new(normalized_size: f64, color: Color) -> Self {
        Self {
            points: Vec::new(),
            size: 0.0,
            normalized_size,
            color,
        }
    }

    /// Whether the stroke has enough points to be committed.
    pub fn is_committable(&self) -> bool {
        self.points.len() >= MIN_STROKE_POINTS
    }
}

/// Geometry of a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum RegionShape {
    Rect {
        rect: NormRect,
    },
    Brush {
        #[serde(rename = "brushStrokes")]
        brush_strokes: Vec<Stroke>,
    },
}

/// A user-marked area of the source image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Region {
    pub id: String,
    #[serde(flatten)]
    pub shape: RegionShape,
    /// Rendered thumbnail, populated on confirm.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thumbnail_url: Option<String>,
}

impl Region {
    pub fn rect(id: impl Into<String>, rect: NormRect) -> Self {
        Self {
            id: id.into(),
            shape: RegionShape::Rect { rect },
            thumbnail_url: None,
        }
    }

    pub fn brush(id: impl Into<String>, brush_strokes: Vec<Stroke>) -> Self {
        Self {
            id: id.into(),
            shape: RegionShape::Brush { brush_strokes },
            thumbnail_url: None,
        }
    }

    /// The rectangle, for rect regions.
    pub fn as_rect(&self) -> Option<&NormRect> {
        match &self.shape {
            RegionShape::Rect { rect } => Some(rect),
            RegionShape::Brush { .. } => None,
        }
    }

    /// Normalized bounding box of the region's geometry.
    ///
    /// For brush regions this is the box around all stroke points, without
    /// the brush radius. Returns `None` for a brush region with no points.
    pub fn bounds(&self) -> Option<NormRect> {
        match &self.shape {
            RegionShape::Rect { rect } => Some(*rect),
            RegionShape::Brush { brush_strokes } => {
                let mut points = brush_strokes.iter().flat_map(|s| s.points.iter());
                let first = points.next()?;
                let (mut min_x, mut min_y) = (first.x, first.y);
                let (mut max_x, mut max_y) = (first.x, first.y);
                for p in points {
                    min_x = min_x.min(p.x);
                    min_y = min_y.min(p.y);
                    max_x = max_x.max(p.x);
                    max_y = max_y.max(p.y);
                }
                Some(NormRect::new(min_x, min_y, max_x - min_x, max_y - min_y))
            }
        }
    }

    /// Whether the region has renderable geometry.
    pub fn is_committable(&self) -> bool {
        match &self.shape {
            RegionShape::Rect { rect } => rect.width > 0.0 && rect.height > 0.0,
            RegionShape::Brush { brush_strokes } => {
                brush_strokes.iter().any(Stroke::is_committable)
            }
        }
    }
}
