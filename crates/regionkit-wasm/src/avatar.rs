//! Avatar crop bindings.
//!
//! Crops arrive from stored character records in either the canonical or the
//! legacy zoom shape; both deserialize into the canonical `AvatarCrop`.

use regionkit_core::avatar::{map_avatar, AvatarCrop, AvatarCropEditor, AvatarLayout, AvatarProfile};
use regionkit_core::geometry::Size;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, to_js};

/// Everything a component needs to render an avatar.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsAvatarRender {
    pub layout: AvatarLayout,
    pub image_style: String,
    pub background_style: String,
}

impl JsAvatarRender {
    pub(crate) fn for_crop(crop: Option<&AvatarCrop>) -> Self {
        let layout = map_avatar(crop);
        Self {
            image_style: layout.image_style(),
            background_style: layout.background_style(),
            layout,
        }
    }
}

fn optional_crop(crop: JsValue) -> Result<Option<AvatarCrop>, JsValue> {
    if crop.is_undefined() || crop.is_null() {
        Ok(None)
    } else {
        from_js(crop, "avatar crop").map(Some)
    }
}

/// Map a stored crop (or `null`) to layout and CSS.
#[wasm_bindgen]
pub fn map_avatar_crop(crop: JsValue) -> Result<JsValue, JsValue> {
    let crop = optional_crop(crop)?;
    to_js(&JsAvatarRender::for_crop(crop.as_ref()))
}

/// Convert a stored crop of either shape into `{x, y, width, height}`.
#[wasm_bindgen]
pub fn normalize_avatar_crop(crop: JsValue) -> Result<JsValue, JsValue> {
    let crop: AvatarCrop = from_js(crop, "avatar crop")?;
    to_js(&crop)
}

/// Normalize every crop in a stored avatar profile.
#[wasm_bindgen]
pub fn normalize_avatar_profile(profile: JsValue) -> Result<JsValue, JsValue> {
    let profile: AvatarProfile = from_js(profile, "avatar profile")?;
    to_js(&profile)
}

/// Pixel placement `[x, y, width, height]` of the full image for drawing an
/// avatar of `size_px` on a canvas.
#[wasm_bindgen]
pub fn avatar_pixel_placement(
    crop: JsValue,
    size_px: f64,
    natural_width: f64,
    natural_height: f64,
) -> Result<Vec<f64>, JsValue> {
    let crop = optional_crop(crop)?;
    let p = map_avatar(crop.as_ref()).pixel_placement(size_px, Size::new(natural_width, natural_height));
    Ok(vec![p.x, p.y, p.width, p.height])
}

/// State of the avatar crop dialog.
#[wasm_bindgen]
pub struct JsAvatarCropEditor {
    inner: AvatarCropEditor,
}

#[wasm_bindgen]
impl JsAvatarCropEditor {
    /// Open the editor on an existing crop, or the whole image when `null`.
    #[wasm_bindgen(constructor)]
    pub fn new(crop: JsValue) -> Result<JsAvatarCropEditor, JsValue> {
        let inner = match optional_crop(crop)? {
            Some(crop) => AvatarCropEditor::from_crop(&crop),
            None => AvatarCropEditor::new(),
        };
        Ok(Self { inner })
    }

    #[wasm_bindgen(getter)]
    pub fn zoom(&self) -> f64 {
        self.inner.zoom()
    }

    #[wasm_bindgen(setter)]
    pub fn set_zoom(&mut self, zoom: f64) {
        self.inner.set_zoom(zoom);
    }

    pub fn pan_by(&mut self, dx: f64, dy: f64) {
        self.inner.pan_by(dx, dy);
    }

    /// Pan by a drag on the preview, measured in CSS pixels.
    pub fn drag_by_pixels(&mut self, dx_px: f64, dy_px: f64, preview_px: f64) {
        self.inner.drag_by_pixels(dx_px, dy_px, preview_px);
    }

    pub fn reset(&mut self) {
        self.inner.reset();
    }

    /// The crop to pass to `onSave`.
    pub fn crop(&self) -> Result<JsValue, JsValue> {
        to_js(&self.inner.crop())
    }

    /// Layout and CSS for previewing the current crop.
    pub fn preview(&self) -> Result<JsValue, JsValue> {
        to_js(&JsAvatarRender::for_crop(Some(&self.inner.crop())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_for_crop() {
        let render = JsAvatarRender::for_crop(Some(&AvatarCrop::new(25.0, 0.0, 50.0, 50.0)));
        assert!(render.image_style.contains("width: 200%"));
        assert!(render.background_style.contains("background-position: 50% 0%"));

        let json = serde_json::to_value(&render).unwrap();
        assert_eq!(json["layout"]["kind"], "scaled");
        assert_eq!(json["layout"]["offsetX"], -50.0);
        assert!(json.get("imageStyle").is_some());
    }

    #[test]
    fn test_render_without_crop() {
        let render = JsAvatarRender::for_crop(None);
        assert_eq!(render.layout, AvatarLayout::Cover);
        assert!(render.image_style.contains("object-fit: cover"));
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn legacy_crop() -> JsValue {
        let obj = js_sys::Object::new();
        js_sys::Reflect::set(&obj, &"x".into(), &10.0.into()).unwrap();
        js_sys::Reflect::set(&obj, &"y".into(), &10.0.into()).unwrap();
        js_sys::Reflect::set(&obj, &"zoom".into(), &2.0.into()).unwrap();
        obj.into()
    }

    #[wasm_bindgen_test]
    fn test_normalize_legacy() {
        let crop = normalize_avatar_crop(legacy_crop()).unwrap();
        let width = js_sys::Reflect::get(&crop, &"width".into()).unwrap();
        assert_eq!(width.as_f64(), Some(50.0));
    }

    #[wasm_bindgen_test]
    fn test_editor_from_legacy() {
        let editor = JsAvatarCropEditor::new(legacy_crop()).unwrap();
        assert_eq!(editor.zoom(), 2.0);
    }

    #[wasm_bindgen_test]
    fn test_null_crop_is_cover() {
        let render = map_avatar_crop(JsValue::NULL).unwrap();
        let layout = js_sys::Reflect::get(&render, &"layout".into()).unwrap();
        let kind = js_sys::Reflect::get(&layout, &"kind".into()).unwrap();
        assert_eq!(kind.as_string().as_deref(), Some("cover"));
    }
}
