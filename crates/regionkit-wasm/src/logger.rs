//! Browser console logging.
//!
//! Forwards `log` records from the core crate to `console.*` and installs a
//! panic hook that reports to `console.error`. Off wasm32 both are no-ops
//! apart from level bookkeeping, so host tests can call them.

use log::{Level, LevelFilter, Log, Metadata, Record};
use wasm_bindgen::prelude::*;

struct ConsoleLogger;

static LOGGER: ConsoleLogger = ConsoleLogger;

impl Log for ConsoleLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format_record(record.level(), record.target(), &record.args().to_string());

        #[cfg(target_arch = "wasm32")]
        {
            let value = JsValue::from_str(&line);
            match record.level() {
                Level::Error => web_sys::console::error_1(&value),
                Level::Warn => web_sys::console::warn_1(&value),
                Level::Info => web_sys::console::log_1(&value),
                Level::Debug | Level::Trace => web_sys::console::debug_1(&value),
            }
        }
        #[cfg(not(target_arch = "wasm32"))]
        let _ = line;
    }

    fn flush(&self) {}
}

fn format_record(level: Level, target: &str, message: &str) -> String {
    format!("[{} {}] {}", level, target, message)
}

fn default_level() -> LevelFilter {
    if cfg!(debug_assertions) {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    }
}

/// Install the console logger. Repeated calls are ignored.
pub(crate) fn init_logger() {
    if log::set_logger(&LOGGER).is_ok() {
        log::set_max_level(default_level());
    }
}

pub(crate) fn panic_hook_setup() {
    #[cfg(target_arch = "wasm32")]
    {
        use std::sync::Once;
        static SET_HOOK: Once = Once::new();
        SET_HOOK.call_once(|| {
            std::panic::set_hook(Box::new(|info| {
                let msg = format!("regionkit panic: {info}");
                web_sys::console::error_1(&msg.into());
            }));
        });
    }
}

/// Set the console log level: "off", "error", "warn", "info", "debug" or "trace".
#[wasm_bindgen]
pub fn set_log_level(level: &str) -> Result<(), JsValue> {
    let filter = parse_level(level).map_err(|e| JsValue::from_str(&e))?;
    log::set_max_level(filter);
    Ok(())
}

fn parse_level(level: &str) -> Result<LevelFilter, String> {
    level
        .parse::<LevelFilter>()
        .map_err(|_| format!("Unknown log level: {}", level))
}
