//! Avatar crop mapping.
//!
//! A character's avatar is a circular thumbnail showing one region of a
//! reference image. The region is stored as an [`AvatarCrop`] in percent of
//! the image, and rendered by scaling the whole image up and shifting it so
//! the crop fills the container exactly, whatever its pixel size.
//!
//! # Layout
//!
//! For a crop `{x, y, width, height}`:
//!
//! - `scale = 100 / width`
//! - image offset = `(-x * scale, -y * scale)` percent of the container
//!
//! An absent or identity crop skips the transform and falls back to
//! `object-fit: cover` anchored at the top center.

mod editor;
mod profile;

use serde::{Deserialize, Serialize};

use crate::geometry::Size;

pub use editor::{AvatarCropEditor, MAX_ZOOM, MIN_ZOOM};
pub use profile::AvatarProfile;

/// Crop rectangle in percent (0 to 100) of the source image.
///
/// Deserializing accepts the legacy `{x, y, zoom}` shape as well; see
/// [`StoredAvatarCrop`]. Serializing always writes the canonical shape.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "StoredAvatarCrop")]
pub struct AvatarCrop {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Default for AvatarCrop {
    fn default() -> Self {
        Self::new(0.0, 0.0, 100.0, 100.0)
    }
}

impl AvatarCrop {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Whether this crop shows the whole image.
    pub fn is_identity(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width >= 100.0 && self.height >= 100.0
    }
}

/// Every crop shape found in stored avatar profiles.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StoredAvatarCrop {
    Sized {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
    },
    /// Square crop stored as a zoom factor: `width = height = 100 / zoom`.
    Legacy { x: f64, y: f64, zoom: f64 },
}

impl From<StoredAvatarCrop> for AvatarCrop {
    fn from(stored: StoredAvatarCrop) -> Self {
        match stored {
            StoredAvatarCrop::Sized {
                x,
                y,
                width,
                height,
            } => Self::new(x, y, width, height),
            StoredAvatarCrop::Legacy { x, y, zoom } => {
                let size = if zoom.is_finite() && zoom > 0.0 {
                    100.0 / zoom
                } else {
                    100.0
                };
                Self::new(x, y, size, size)
            }
        }
    }
}

/// How to place the avatar image inside its container.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum AvatarLayout {
    /// No crop: `object-fit: cover`, anchored at the top center.
    Cover,
    /// Image scaled by `scale` and offset by percent of the container.
    #[serde(rename_all = "camelCase")]
    Scaled {
        scale: f64,
        offset_x: f64,
        offset_y: f64,
    },
}

/// Pixel placement of the full image when drawing an avatar on a canvas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PixelPlacement {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Compute the layout for an optional crop.
pub fn map_avatar(crop: Option<&AvatarCrop>) -> AvatarLayout {
    let crop = match crop {
        Some(crop) if !crop.is_identity() => crop,
        _ => return AvatarLayout::Cover,
    };

    let scale = finite_or_zero(100.0 / crop.width);
    AvatarLayout::Scaled {
        scale,
        offset_x: finite_or_zero(-crop.x * scale),
        offset_y: finite_or_zero(-crop.y * scale),
    }
}

impl AvatarLayout {
    /// Inline CSS for an absolutely positioned `<img>` inside the container.
    pub fn image_style(&self) -> String {
        match *self {
            AvatarLayout::Cover => {
                "width: 100%; height: 100%; object-fit: cover; object-position: top center"
                    .to_string()
            }
            AvatarLayout::Scaled {
                scale,
                offset_x,
                offset_y,
            } => {
                let size = percent(scale * 100.0);
                format!(
                    "position: absolute; width: {size}; height: {size}; left: {}; top: {}; max-width: none",
                    percent(offset_x),
                    percent(offset_y)
                )
            }
        }
    }

    /// Inline CSS for rendering the avatar as a container background.
    ///
    /// A background position of `P%` aligns the image's `P%` point with the
    /// container's, so an offset `o` with image scale `s` needs
    /// `P = o / (1 - s)`. At `s = 1` there is nothing to move and `P` is 0.
    pub fn background_style(&self) -> String {
        match *self {
            AvatarLayout::Cover => "background-size: cover; background-position: top center".to_string(),
            AvatarLayout::Scaled {
                scale,
                offset_x,
                offset_y,
            } => {
                let size = percent(scale * 100.0);
                format!(
                    "background-size: {size} {size}; background-position: {} {}",
                    percent(offset_x / (1.0 - scale)),
                    percent(offset_y / (1.0 - scale))
                )
            }
        }
    }

    /// Where to draw the full image for a square avatar of `size_px`.
    ///
    /// The cover layout needs the image's natural size to preserve its
    /// aspect ratio; the scaled layout stretches to the crop.
    pub fn pixel_placement(&self, size_px: f64, natural: Size) -> PixelPlacement {
        match *self {
            AvatarLayout::Cover => {
                let fit = (size_px / natural.width).max(size_px / natural.height);
                let fit = finite_or_zero(fit);
                let width = natural.width * fit;
                let height = natural.height * fit;
                PixelPlacement {
                    x: finite_or_zero((size_px - width) / 2.0),
                    y: 0.0,
                    width: finite_or_zero(width),
                    height: finite_or_zero(height),
                }
            }
            AvatarLayout::Scaled {
                scale,
                offset_x,
                offset_y,
            } => PixelPlacement {
                x: finite_or_zero(offset_x / 100.0 * size_px),
                y: finite_or_zero(offset_y / 100.0 * size_px),
                width: finite_or_zero(scale * size_px),
                height: finite_or_zero(scale * size_px),
            },
        }
    }
}

#[inline]
fn finite_or_zero(v: f64) -> f64 {
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

/// Format a CSS percentage, rounded to 4 decimals. Non-finite becomes `0%`.
fn percent(v: f64) -> String {
    let v = (finite_or_zero(v) * 1e4).round() / 1e4;
    // Adding zero turns -0.0 into 0.0
    format!("{}%", v + 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_legacy_crop_normalizes() {
        let crop: AvatarCrop = serde_json::from_str(r#"{"x":10,"y":10,"zoom":2}"#).unwrap();
        assert_eq!(crop, AvatarCrop::new(10.0, 10.0, 50.0, 50.0));
    }

    #[test]
    fn test_legacy_bad_zoom_shows_whole_width() {
        let crop: AvatarCrop = serde_json::from_str(r#"{"x":0,"y":0,"zoom":0}"#).unwrap();
        assert_eq!(crop.width, 100.0);
        assert!(crop.is_identity());
    }

    #[test]
    fn test_canonical_crop_round_trips_canonical() {
        let crop: AvatarCrop =
            serde_json::from_str(r#"{"x":25,"y":0,"width":50,"height":50}"#).unwrap();
        let json = serde_json::to_value(crop).unwrap();
        assert_eq!(json["width"], 50.0);
        assert!(json.get("zoom").is_none());
    }

    #[test]
    fn test_identity_and_absent_use_cover() {
        assert_eq!(map_avatar(None), AvatarLayout::Cover);
        assert_eq!(map_avatar(Some(&AvatarCrop::default())), AvatarLayout::Cover);
        assert_eq!(
            map_avatar(Some(&AvatarCrop::new(0.0, 0.0, 120.0, 100.0))),
            AvatarLayout::Cover
        );
    }

    #[test]
    fn test_scaled_layout() {
        let layout = map_avatar(Some(&AvatarCrop::new(25.0, 0.0, 50.0, 50.0)));
        assert_eq!(
            layout,
            AvatarLayout::Scaled {
                scale: 2.0,
                offset_x: -50.0,
                offset_y: 0.0
            }
        );
        let css = layout.image_style();
        assert!(css.contains("width: 200%"), "{}", css);
        assert!(css.contains("left: -50%"), "{}", css);
        assert!(css.contains("top: 0%"), "{}", css);
    }

    #[test]
    fn test_background_style_position() {
        let layout = map_avatar(Some(&AvatarCrop::new(25.0, 0.0, 50.0, 50.0)));
        assert_eq!(
            layout.background_style(),
            "background-size: 200% 200%; background-position: 50% 0%"
        );
    }

    #[test]
    fn test_background_style_unit_scale_is_zero() {
        // Not identity (x offset) but scale 1: P would divide by zero
        let layout = map_avatar(Some(&AvatarCrop::new(10.0, 0.0, 100.0, 100.0)));
        assert!(layout.background_style().ends_with("background-position: 0% 0%"));
    }

    #[test]
    fn test_zero_width_crop_collapses_to_zero() {
        let layout = map_avatar(Some(&AvatarCrop::new(10.0, 10.0, 0.0, 0.0)));
        assert_eq!(
            layout,
            AvatarLayout::Scaled {
                scale: 0.0,
                offset_x: 0.0,
                offset_y: 0.0
            }
        );
    }

    #[test]
    fn test_pixel_placement_scaled() {
        let layout = map_avatar(Some(&AvatarCrop::new(25.0, 10.0, 50.0, 50.0)));
        let p = layout.pixel_placement(64.0, Size::new(800.0, 600.0));
        assert_eq!(p, PixelPlacement { x: -32.0, y: -12.8, width: 128.0, height: 128.0 });
    }

    #[test]
    fn test_pixel_placement_cover_centers_horizontally() {
        let p = AvatarLayout::Cover.pixel_placement(100.0, Size::new(200.0, 100.0));
        assert_eq!(p, PixelPlacement { x: -50.0, y: 0.0, width: 200.0, height: 100.0 });
    }

    #[test]
    fn test_percent_formatting() {
        assert_eq!(percent(-0.0), "0%");
        assert_eq!(percent(100.0 / 3.0), "33.3333%");
        assert_eq!(percent(f64::INFINITY), "0%");
    }
}
