//! Regionkit WASM - WebAssembly bindings for regionkit
//!
//! This crate exposes the regionkit-core selector, thumbnail and avatar
//! functionality to the TypeScript frontend.
//!
//! # Module Structure
//!
//! - `selector` - Region selector state machine and canvas helpers
//! - `thumbnail` - Confirm flow and per-region PNG data URLs
//! - `avatar` - Avatar crop mapping and the crop dialog model
//! - `load` - Source image load/retry tracking
//! - `types` - Source image wrapper and JS value conversion
//! - `logger` - Console logging and panic reporting
//!
//! # Usage
//!
//! ```typescript
//! import init, { JsRegionSelector, JsSourceImage } from '@regionkit/wasm';
//!
//! await init();
//!
//! const selector = new JsRegionSelector(undefined, existingRegions);
//! selector.pointer_down(0.2, 0.3);
//! selector.pointer_up(0.6, 0.7);
//!
//! const image = JsSourceImage.decode(new Uint8Array(await blob.arrayBuffer()));
//! const { regions, dropped } = selector.confirm(image);
//! ```

use wasm_bindgen::prelude::*;

mod avatar;
mod load;
mod logger;
mod selector;
mod thumbnail;
mod types;

// Re-export public types
pub use avatar::{
    avatar_pixel_placement, map_avatar_crop, normalize_avatar_crop, normalize_avatar_profile,
    JsAvatarCropEditor,
};
pub use load::{cache_busted_url, JsImageLoad};
pub use logger::set_log_level;
pub use selector::{fit_canvas, normalize_pointer, JsRegionSelector};
pub use thumbnail::{confirm_regions, region_thumbnail};
pub use types::{decode_image, JsSourceImage};

/// Initialize the WASM module (called automatically on load)
#[wasm_bindgen(start)]
pub fn init() {
    logger::panic_hook_setup();
    logger::init_logger();
    log::debug!("regionkit-wasm {} ready", version());
}

/// Get the version of the WASM module
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
