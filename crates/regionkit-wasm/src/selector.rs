//! Region selector bindings.
//!
//! The frontend owns the canvas and pointer listeners. It converts pointer
//! events with [`normalize_pointer`], forwards them here, and redraws from
//! `regions()`, `pendingStrokes()`, `draftRect()` and `draftStroke()`.

use regionkit_core::decode::SourceImage;
use regionkit_core::geometry::{self, CanvasBounds, NormPoint, Size};
use regionkit_core::region::{Color, Region};
use regionkit_core::selector::{DrawMode, RegionSelector};
use regionkit_core::thumbnail::ConfirmError;
use regionkit_core::SelectorConfig;
use wasm_bindgen::prelude::*;

use crate::thumbnail::{confirm_with, JsConfirmResult};
use crate::types::{from_js_or_default, to_js, JsSourceImage};

/// Stateful region selector for one selection session.
#[wasm_bindgen]
pub struct JsRegionSelector {
    inner: RegionSelector,
}

#[wasm_bindgen]
impl JsRegionSelector {
    /// Create a selector.
    ///
    /// # Arguments
    /// * `config` - Optional partial `SelectorConfig` object
    /// * `initial_regions` - Optional array of previously confirmed regions
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue, initial_regions: JsValue) -> Result<JsRegionSelector, JsValue> {
        let config: SelectorConfig = from_js_or_default(config, "selector config")?;
        let regions: Vec<Region> = from_js_or_default(initial_regions, "region data")?;
        Ok(Self::from_parts(config, regions))
    }

    /// Pointer pressed at a normalized position. Returns the selector event.
    pub fn pointer_down(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pointer_down(NormPoint::new(x, y)))
    }

    pub fn pointer_move(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pointer_move(NormPoint::new(x, y)))
    }

    pub fn pointer_up(&mut self, x: f64, y: f64) -> Result<JsValue, JsValue> {
        to_js(&self.inner.pointer_up(NormPoint::new(x, y)))
    }

    /// Abandon the current drag (Escape, or pointer capture lost).
    pub fn cancel(&mut self) {
        self.inner.cancel_interaction();
    }

    /// Set the drawing mode: "rect" or "brush".
    pub fn set_mode(&mut self, mode: &str) -> Result<(), JsValue> {
        let mode = parse_mode(mode).map_err(|e| JsValue::from_str(&e))?;
        self.inner.set_mode(mode);
        Ok(())
    }

    #[wasm_bindgen(getter)]
    pub fn mode(&self) -> String {
        mode_name(self.inner.mode()).to_string()
    }

    #[wasm_bindgen(getter)]
    pub fn brush_size(&self) -> f64 {
        self.inner.brush_size()
    }

    /// Brush radius as a fraction of canvas width.
    #[wasm_bindgen(setter)]
    pub fn set_brush_size(&mut self, size: f64) {
        self.inner.set_brush_size(size);
    }

    #[wasm_bindgen(getter)]
    pub fn brush_color(&self) -> String {
        self.inner.brush_color().to_string()
    }

    /// Set the brush color from a CSS hex string.
    pub fn set_brush_color(&mut self, color: &str) -> Result<(), JsValue> {
        let color: Color = color.parse().map_err(|e: regionkit_core::region::ColorParseError| {
            JsValue::from_str(&e.to_string())
        })?;
        self.inner.set_brush_color(color);
        Ok(())
    }

    /// Current on-screen canvas width in CSS pixels.
    pub fn set_canvas_width(&mut self, width: f64) {
        self.inner.set_canvas_width(width);
    }

    /// Bundle pending strokes into a brush region; returns its id.
    pub fn commit_brush(&mut self) -> Option<String> {
        self.inner.commit_brush()
    }

    pub fn undo(&mut self) -> bool {
        self.inner.undo()
    }

    pub fn select(&mut self, id: &str) -> bool {
        self.inner.select(id)
    }

    pub fn deselect(&mut self) {
        self.inner.deselect();
    }

    /// Delete the selected region; returns the deleted id.
    pub fn delete_selected(&mut self) -> Option<String> {
        self.inner.delete_selected().map(|r| r.id)
    }

    pub fn remove(&mut self, id: &str) -> bool {
        self.inner.remove(id).is_some()
    }

    pub fn clear(&mut self) {
        self.inner.clear();
    }

    #[wasm_bindgen(getter)]
    pub fn selected_id(&self) -> Option<String> {
        self.selected_id_inner()
    }

    #[wasm_bindgen(getter)]
    pub fn is_interacting(&self) -> bool {
        self.inner.is_interacting()
    }

    /// CSS cursor for hovering at a normalized position.
    pub fn cursor_at(&self, x: f64, y: f64) -> String {
        self.inner.cursor_at(NormPoint::new(x, y)).to_string()
    }

    pub fn regions(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.regions())
    }

    pub fn pending_strokes(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.pending_strokes())
    }

    /// The rectangle being drawn, or `null`.
    pub fn draft_rect(&self) -> Result<JsValue, JsValue> {
        match self.inner.draft_rect() {
            Some(rect) => to_js(&rect),
            None => Ok(JsValue::NULL),
        }
    }

    /// The stroke being drawn, or `null`.
    pub fn draft_stroke(&self) -> Result<JsValue, JsValue> {
        match self.inner.draft_stroke() {
            Some(stroke) => to_js(stroke),
            None => Ok(JsValue::NULL),
        }
    }

    /// Render thumbnails for every region and return `{ regions, dropped }`.
    ///
    /// Pending brush strokes are committed as a region first.
    /// Throws the user-visible message when nothing could be rendered.
    pub fn confirm(&mut self, image: &JsSourceImage) -> Result<JsValue, JsValue> {
        let result = self
            .confirm_source(image.source())
            .map_err(|e| JsValue::from_str(&e.to_string()))?;
        to_js(&result)
    }
}

impl JsRegionSelector {
    pub(crate) fn from_parts(config: SelectorConfig, regions: Vec<Region>) -> Self {
        Self {
            inner: RegionSelector::with_regions(config, regions),
        }
    }

    pub(crate) fn confirm_source(
        &mut self,
        image: &SourceImage,
    ) -> Result<JsConfirmResult, ConfirmError> {
        self.inner.commit_brush();
        confirm_with(image, self.inner.regions(), self.inner.config())
    }

    fn selected_id_inner(&self) -> Option<String> {
        self.inner.selected().map(|r| r.id.clone())
    }
}

fn parse_mode(mode: &str) -> Result<DrawMode, String> {
    match mode {
        "rect" => Ok(DrawMode::Rect),
        "brush" => Ok(DrawMode::Brush),
        other => Err(format!("Unknown draw mode: {}", other)),
    }
}

fn mode_name(mode: DrawMode) -> &'static str {
    match mode {
        DrawMode::Rect => "rect",
        DrawMode::Brush => "brush",
    }
}

/// Canvas size that fits the container while keeping the image aspect ratio.
///
/// Returns `[width, height]`.
#[wasm_bindgen]
pub fn fit_canvas(
    container_width: f64,
    container_height: f64,
    natural_width: f64,
    natural_height: f64,
) -> Vec<f64> {
    let size = geometry::fit_canvas(
        Size::new(container_width, container_height),
        Size::new(natural_width, natural_height),
    );
    vec![size.width, size.height]
}

/// Convert client pointer coordinates to a normalized `[x, y]` using the
/// canvas bounding rect.
#[wasm_bindgen]
pub fn normalize_pointer(
    client_x: f64,
    client_y: f64,
    left: f64,
    top: f64,
    width: f64,
    height: f64,
) -> Vec<f64> {
    let p = geometry::normalize_pointer(
        client_x,
        client_y,
        CanvasBounds {
            left,
            top,
            width,
            height,
        },
    );
    vec![p.x, p.y]
}

#[cfg(test)]
mod tests {
    use super::*;
    use regionkit_core::NormRect;

    #[test]
    fn test_parse_mode() {
        assert_eq!(parse_mode("rect"), Ok(DrawMode::Rect));
        assert_eq!(parse_mode("brush"), Ok(DrawMode::Brush));
        assert!(parse_mode("lasso").is_err());
        assert_eq!(mode_name(DrawMode::Brush), "brush");
    }

    #[test]
    fn test_selector_session() {
        let mut sel = JsRegionSelector::from_parts(
            SelectorConfig::default(),
            vec![Region::rect("region-2", NormRect::new(0.1, 0.1, 0.2, 0.2))],
        );
        assert_eq!(sel.mode(), "rect");

        sel.inner.pointer_down(NormPoint::new(0.5, 0.5));
        sel.inner.pointer_up(NormPoint::new(0.8, 0.9));
        assert_eq!(sel.inner.regions().len(), 2);
        assert_eq!(sel.inner.regions()[1].id, "region-3");

        assert!(sel.select("region-3"));
        assert_eq!(sel.selected_id(), Some("region-3".to_string()));
        assert_eq!(sel.delete_selected(), Some("region-3".to_string()));
        assert!(sel.undo());
        assert!(!sel.undo());
    }

    #[test]
    fn test_brush_settings() {
        let mut sel = JsRegionSelector::from_parts(SelectorConfig::default(), Vec::new());
        sel.set_brush_size(0.1);
        assert_eq!(sel.brush_size(), 0.1);
        assert_eq!(sel.brush_color(), "#ff3b30cc");
    }

    #[test]
    fn test_confirm_commits_pending_strokes() {
        let mut sel = JsRegionSelector::from_parts(SelectorConfig::default(), Vec::new());
        sel.set_mode("brush").unwrap();
        sel.inner.pointer_down(NormPoint::new(0.2, 0.2));
        sel.inner.pointer_move(NormPoint::new(0.5, 0.4));
        sel.inner.pointer_up(NormPoint::new(0.6, 0.6));
        assert_eq!(sel.inner.pending_strokes().len(), 1);
        assert!(sel.inner.regions().is_empty());

        let image = SourceImage::new(40, 20, vec![128; 40 * 20 * 4]);
        let result = sel.confirm_source(&image).unwrap();

        assert!(sel.inner.pending_strokes().is_empty());
        assert_eq!(sel.inner.regions().len(), 1);
        assert_eq!(result.regions.len(), 1);
        assert!(result.dropped.is_empty());
        assert!(result.regions[0].thumbnail_url.is_some());
    }

    #[test]
    fn test_fit_canvas_and_normalize() {
        assert_eq!(fit_canvas(800.0, 600.0, 1000.0, 500.0), vec![800.0, 400.0]);
        assert_eq!(
            normalize_pointer(150.0, 70.0, 100.0, 50.0, 200.0, 100.0),
            vec![0.25, 0.2]
        );
        assert_eq!(normalize_pointer(5.0, 5.0, 0.0, 0.0, 0.0, 0.0), vec![0.0, 0.0]);
    }
}
