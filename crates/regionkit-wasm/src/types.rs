//! WASM-compatible wrapper types and JS value conversion.

use regionkit_core::decode::{decode_image as core_decode, SourceImage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// A decoded source image held in WASM memory.
///
/// Decode once when the selector's image loads, then reuse the same handle
/// for every thumbnail render.
#[wasm_bindgen]
pub struct JsSourceImage {
    inner: SourceImage,
}

#[wasm_bindgen]
impl JsSourceImage {
    /// Wrap raw RGBA pixels (4 bytes per pixel, row-major).
    #[wasm_bindgen(constructor)]
    pub fn new(width: u32, height: u32, pixels: Vec<u8>) -> Result<JsSourceImage, JsValue> {
        let expected = width as usize * height as usize * 4;
        if pixels.len() != expected {
            return Err(JsValue::from_str(&format!(
                "Expected {} bytes for {}x{} RGBA, got {}",
                expected,
                width,
                height,
                pixels.len()
            )));
        }
        Ok(Self {
            inner: SourceImage::new(width, height, pixels),
        })
    }

    /// Decode PNG or JPEG bytes, applying EXIF orientation.
    pub fn decode(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
        core_decode(bytes)
            .map(Self::from_source)
            .map_err(|e| JsValue::from_str(&e.to_string()))
    }

    /// Natural width in pixels
    #[wasm_bindgen(getter)]
    pub fn width(&self) -> u32 {
        self.inner.width
    }

    /// Natural height in pixels
    #[wasm_bindgen(getter)]
    pub fn height(&self) -> u32 {
        self.inner.height
    }

    #[wasm_bindgen(getter)]
    pub fn byte_length(&self) -> usize {
        self.inner.pixels.len()
    }

    /// RGBA pixel data as a Uint8Array (copied).
    pub fn pixels(&self) -> Vec<u8> {
        self.inner.pixels.clone()
    }
}

impl JsSourceImage {
    pub(crate) fn from_source(inner: SourceImage) -> Self {
        Self { inner }
    }

    pub(crate) fn source(&self) -> &SourceImage {
        &self.inner
    }
}

/// Decode PNG or JPEG bytes into a source image.
#[wasm_bindgen]
pub fn decode_image(bytes: &[u8]) -> Result<JsSourceImage, JsValue> {
    JsSourceImage::decode(bytes)
}

/// Serialize to a plain JS object (not a `Map`), as the frontend expects JSON shapes.
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| JsValue::from_str(&format!("Serialization failed: {}", e)))
}

/// Deserialize a JS value, treating `undefined`/`null` as the default.
pub(crate) fn from_js_or_default<T: DeserializeOwned + Default>(
    value: JsValue,
    what: &str,
) -> Result<T, JsValue> {
    if value.is_undefined() || value.is_null() {
        return Ok(T::default());
    }
    from_js(value, what)
}

pub(crate) fn from_js<T: DeserializeOwned>(value: JsValue, what: &str) -> Result<T, JsValue> {
    serde_wasm_bindgen::from_value(value)
        .map_err(|e| JsValue::from_str(&format!("Invalid {}: {}", what, e)))
}
