//! Source image load tracking for the selector's `<img>`.

use regionkit_core::selector::{self, ImageLoad};
use wasm_bindgen::prelude::*;

use crate::types::to_js;

/// Append cache-busting session/retry parameters to an image URL.
#[wasm_bindgen]
pub fn cache_busted_url(url: &str, session: &str, retry: u32) -> String {
    selector::cache_busted_url(url, session, retry)
}

/// Load/error/retry state of the source image.
#[wasm_bindgen]
pub struct JsImageLoad {
    inner: ImageLoad,
}

#[wasm_bindgen]
impl JsImageLoad {
    /// Start tracking `url`. Without a `session` key one is derived from
    /// the current time, so each dialog opening gets fresh URLs.
    #[wasm_bindgen(constructor)]
    pub fn new(url: String, session: Option<String>) -> JsImageLoad {
        let session = session.unwrap_or_else(time_session_key);
        Self {
            inner: ImageLoad::new(url, session),
        }
    }

    /// URL to put in the `<img src>`.
    #[wasm_bindgen(getter)]
    pub fn url(&self) -> String {
        self.inner.url()
    }

    #[wasm_bindgen(getter)]
    pub fn retry_count(&self) -> u32 {
        self.inner.retry_count()
    }

    #[wasm_bindgen(getter)]
    pub fn image_error(&self) -> bool {
        self.inner.image_error()
    }

    /// `{ status: "loading" | "loaded" | "failed", width?, height? }`
    pub fn status(&self) -> Result<JsValue, JsValue> {
        to_js(self.inner.status())
    }

    pub fn on_load(&mut self, natural_width: u32, natural_height: u32) {
        self.inner.on_load(natural_width, natural_height);
    }

    pub fn on_error(&mut self) {
        self.inner.on_error();
    }

    /// Retry after a failure; returns the new URL to load.
    pub fn retry(&mut self) -> String {
        self.inner.retry()
    }
}

fn time_session_key() -> String {
    format!("{:x}", js_sys::Date::now() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_session() {
        let mut load = JsImageLoad::new("/a.png".to_string(), Some("k".to_string()));
        assert_eq!(load.url(), "/a.png?_s=k&_r=0");
        load.on_error();
        assert!(load.image_error());
        assert_eq!(load.retry(), "/a.png?_s=k&_r=1");
        assert_eq!(load.retry_count(), 1);
    }

    #[test]
    fn test_cache_busted_url() {
        assert_eq!(cache_busted_url("/a?b=1", "s", 3), "/a?b=1&_s=s&_r=3");
    }
}
