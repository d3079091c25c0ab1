//! Thumbnail and confirm bindings.

use regionkit_core::decode::SourceImage;
use regionkit_core::region::Region;
use regionkit_core::thumbnail::{self, ConfirmError};
use regionkit_core::SelectorConfig;
use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::types::{from_js, from_js_or_default, to_js, JsSourceImage};

/// Confirm result handed back to `onConfirm`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JsConfirmResult {
    /// Regions with `thumbnailUrl` set
    pub regions: Vec<Region>,
    /// Ids of regions whose thumbnail failed
    pub dropped: Vec<String>,
}

pub(crate) fn confirm_with(
    image: &SourceImage,
    regions: &[Region],
    config: &SelectorConfig,
) -> Result<JsConfirmResult, ConfirmError> {
    let outcome = thumbnail::confirm_regions(image, regions, config)?;
    Ok(JsConfirmResult {
        regions: outcome.regions,
        dropped: outcome.dropped,
    })
}

/// Render thumbnails for a list of regions.
///
/// # Arguments
/// * `image` - The decoded source image
/// * `regions` - Array of region objects
/// * `config` - Optional partial `SelectorConfig`
///
/// # Returns
/// `{ regions, dropped }`, or throws when no thumbnail could be produced.
#[wasm_bindgen]
pub fn confirm_regions(
    image: &JsSourceImage,
    regions: JsValue,
    config: JsValue,
) -> Result<JsValue, JsValue> {
    let regions: Vec<Region> = from_js(regions, "region data")?;
    let config: SelectorConfig = from_js_or_default(config, "selector config")?;

    let result = confirm_with(image.source(), &regions, &config)
        .map_err(|e| JsValue::from_str(&e.to_string()))?;
    to_js(&result)
}

/// Render one region's thumbnail as a PNG data URL.
#[wasm_bindgen]
pub fn region_thumbnail(
    image: &JsSourceImage,
    region: JsValue,
    config: JsValue,
) -> Result<String, JsValue> {
    let region: Region = from_js(region, "region data")?;
    let config: SelectorConfig = from_js_or_default(config, "selector config")?;

    thumbnail::thumbnail_data_url(image.source(), &region, &config)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}


#[cfg(all(test, target_arch = "wasm32"))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_confirm_regions_from_js() {
        let image = JsSourceImage::new(10, 10, vec![255; 400]).unwrap();
        let regions = to_js(&vec![Region::rect(
            "region-1",
            regionkit_core::NormRect::new(0.2, 0.2, 0.5, 0.5),
        )])
        .unwrap();

        let result = confirm_regions(&image, regions, JsValue::UNDEFINED).unwrap();
        let dropped = js_sys::Reflect::get(&result, &JsValue::from_str("dropped")).unwrap();
        assert_eq!(js_sys::Array::from(&dropped).length(), 0);
    }

    #[wasm_bindgen_test]
    fn test_confirm_empty_throws() {
        let image = JsSourceImage::new(10, 10, vec![255; 400]).unwrap();
        let regions = js_sys::Array::new();
        assert!(confirm_regions(&image, regions.into(), JsValue::UNDEFINED).is_err());
    }

    #[wasm_bindgen_test]
    fn test_invalid_region_payload() {
        let image = JsSourceImage::new(10, 10, vec![255; 400]).unwrap();
        let err = confirm_regions(&image, JsValue::from_str("nope"), JsValue::UNDEFINED).unwrap_err();
        assert!(err.as_string().unwrap().starts_with("Invalid region data"));
    }
}
