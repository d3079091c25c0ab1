//! Source image load tracking.
//!
//! A failed cross-origin image load is cached by the browser, so a plain
//! reload of the same URL fails again. Every attempt therefore requests a
//! URL carrying a session key and a retry counter.

use serde::{Deserialize, Serialize};

/// Append cache-busting `_s` (session) and `_r` (retry) query parameters.
///
/// An existing query string and `#fragment` are preserved. `data:` and
/// `blob:` URLs are returned unchanged, since they never hit the cache.
pub fn cache_busted_url(url: &str, session: &str, retry: u32) -> String {
    if url.starts_with("data:") || url.starts_with("blob:") {
        return url.to_string();
    }

    let (base, fragment) = match url.find('#') {
        Some(i) => url.split_at(i),
        None => (url, ""),
    };
    let separator = if base.contains('?') {
        if base.ends_with('?') || base.ends_with('&') {
            ""
        } else {
            "&"
        }
    } else {
        "?"
    };

    format!(
        "{base}{separator}_s={}&_r={retry}{fragment}",
        encode_query_value(session)
    )
}

/// Percent-encode the characters that would break a query parameter value.
fn encode_query_value(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for b in value.bytes() {
        match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(b as char)
            }
            _ => out.push_str(&format!("%{:02X}", b)),
        }
    }
    out
}

/// Load status of the selector's source image.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum LoadStatus {
    Loading { retry: u32 },
    Loaded { width: u32, height: u32 },
    Failed { retry: u32 },
}

/// Tracks loading, failure and manual retries of the source image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageLoad {
    source_url: String,
    session: String,
    retry: u32,
    status: LoadStatus,
}

impl ImageLoad {
    /// Start loading `source_url` under a session key.
    pub fn new(source_url: impl Into<String>, session: impl Into<String>) -> Self {
        Self {
            source_url: source_url.into(),
            session: session.into(),
            retry: 0,
            status: LoadStatus::Loading { retry: 0 },
        }
    }

    /// URL to request for the current attempt.
    pub fn url(&self) -> String {
        cache_busted_url(&self.source_url, &self.session, self.retry)
    }

    pub fn status(&self) -> &LoadStatus {
        &self.status
    }

    /// Number of manual retries so far.
    pub fn retry_count(&self) -> u32 {
        self.retry
    }

    /// The image finished loading with its natural dimensions.
    pub fn on_load(&mut self, width: u32, height: u32) {
        self.status = LoadStatus::Loaded { width, height };
    }

    /// The image failed to load.
    pub fn on_error(&mut self) {
        log::warn!("source image failed to load (attempt {})", self.retry + 1);
        self.status = LoadStatus::Failed { retry: self.retry };
    }

    /// Start another attempt with a fresh cache-busting URL.
    pub fn retry(&mut self) -> String {
        self.retry = self.retry.saturating_add(1);
        self.status = LoadStatus::Loading { retry: self.retry };
        self.url()
    }

    /// Whether the last attempt failed (as opposed to still loading).
    pub fn image_error(&self) -> bool {
        matches!(self.status, LoadStatus::Failed { .. })
    }

    /// Natural dimensions once loaded.
    pub fn natural_size(&self) -> Option<(u32, u32)> {
        match self.status {
            LoadStatus::Loaded { width, height } => Some((width, height)),
            _ => None,
        }
    }
}
