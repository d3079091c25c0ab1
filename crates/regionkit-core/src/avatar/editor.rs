//! Crop dialog model.
//!
//! The dialog shows a square window over the reference image. Zoom shrinks
//! the window (side `100 / zoom` percent), pan moves it. The window never
//! leaves the image.

use super::AvatarCrop;

pub const MIN_ZOOM: f64 = 1.0;
pub const MAX_ZOOM: f64 = 5.0;

/// Editable avatar crop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AvatarCropEditor {
    zoom: f64,
    x: f64,
    y: f64,
}

impl Default for AvatarCropEditor {
    fn default() -> Self {
        Self::new()
    }
}

impl AvatarCropEditor {
    /// Whole image, zoom 1.
    pub fn new() -> Self {
        Self {
            zoom: MIN_ZOOM,
            x: 0.0,
            y: 0.0,
        }
    }

    /// Resume editing a stored crop.
    pub fn from_crop(crop: &AvatarCrop) -> Self {
        let zoom = if crop.width.is_finite() && crop.width > 0.0 {
            100.0 / crop.width
        } else {
            MIN_ZOOM
        };
        let mut editor = Self {
            zoom: clamp_zoom(zoom),
            x: crop.x,
            y: crop.y,
        };
        editor.constrain();
        editor
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Side of the crop window in percent.
    pub fn window_size(&self) -> f64 {
        100.0 / self.zoom
    }

    /// Change zoom, keeping the window centered on the same point.
    pub fn set_zoom(&mut self, zoom: f64) {
        if !zoom.is_finite() {
            return;
        }
        let half = self.window_size() / 2.0;
        let (cx, cy) = (self.x + half, self.y + half);

        self.zoom = clamp_zoom(zoom);
        let half = self.window_size() / 2.0;
        self.x = cx - half;
        self.y = cy - half;
        self.constrain();
    }

    /// Move the window by a delta in percent of the image.
    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        if dx.is_finite() {
            self.x += dx;
        }
        if dy.is_finite() {
            self.y += dy;
        }
        self.constrain();
    }

    /// Move the window by a pointer drag measured in preview pixels.
    ///
    /// Dragging the image right moves the window left, as in any pan view.
    pub fn drag_by_pixels(&mut self, dx_px: f64, dy_px: f64, preview_px: f64) {
        if !(preview_px.is_finite() && preview_px > 0.0) {
            return;
        }
        let per_px = self.window_size() / preview_px;
        self.pan_by(-dx_px * per_px, -dy_px * per_px);
    }

    /// Back to the whole image.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// The canonical crop to save.
    pub fn crop(&self) -> AvatarCrop {
        let size = self.window_size();
        AvatarCrop::new(self.x, self.y, size, size)
    }

    fn constrain(&mut self) {
        let max = 100.0 - self.window_size();
        self.x = clamp_pan(self.x, max);
        self.y = clamp_pan(self.y, max);
    }
}

fn clamp_zoom(zoom: f64) -> f64 {
    zoom.clamp(MIN_ZOOM, MAX_ZOOM)
}

fn clamp_pan(v: f64, max: f64) -> f64 {
    if v.is_finite() {
        v.clamp(0.0, max.max(0.0))
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_editor_is_identity() {
        let crop = AvatarCropEditor::new().crop();
        assert!(crop.is_identity());
    }

    #[test]
    fn test_zoom_keeps_center() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(2.0);
        assert_eq!(editor.crop(), AvatarCrop::new(25.0, 25.0, 50.0, 50.0));
    }

    #[test]
    fn test_zoom_clamped() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(50.0);
        assert_eq!(editor.zoom(), MAX_ZOOM);
        editor.set_zoom(0.1);
        assert_eq!(editor.zoom(), MIN_ZOOM);
        editor.set_zoom(f64::NAN);
        assert_eq!(editor.zoom(), MIN_ZOOM);
    }

    #[test]
    fn test_pan_stays_inside_image() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(4.0);
        editor.pan_by(500.0, -500.0);

        let crop = editor.crop();
        assert_eq!(crop.x, 75.0);
        assert_eq!(crop.y, 0.0);
    }

    #[test]
    fn test_zoom_out_near_edge_pulls_window_back() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(4.0);
        editor.pan_by(100.0, 100.0);
        editor.set_zoom(2.0);

        assert_eq!(editor.crop(), AvatarCrop::new(50.0, 50.0, 50.0, 50.0));
    }

    #[test]
    fn test_drag_by_pixels() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(2.0);
        // Window is 50% wide shown in 200 px, so 1 px = 0.25%
        editor.drag_by_pixels(-40.0, 20.0, 200.0);
        assert_eq!(editor.crop(), AvatarCrop::new(35.0, 20.0, 50.0, 50.0));
    }

    #[test]
    fn test_from_stored_crop() {
        let editor = AvatarCropEditor::from_crop(&AvatarCrop::new(10.0, 10.0, 50.0, 50.0));
        assert_eq!(editor.zoom(), 2.0);
        assert_eq!(editor.crop(), AvatarCrop::new(10.0, 10.0, 50.0, 50.0));

        // Out-of-range crop is pulled inside
        let editor = AvatarCropEditor::from_crop(&AvatarCrop::new(90.0, -5.0, 50.0, 50.0));
        assert_eq!(editor.crop(), AvatarCrop::new(50.0, 0.0, 50.0, 50.0));
    }

    #[test]
    fn test_reset() {
        let mut editor = AvatarCropEditor::new();
        editor.set_zoom(3.0);
        editor.pan_by(10.0, 10.0);
        editor.reset();
        assert_eq!(editor, AvatarCropEditor::new());
    }
}
