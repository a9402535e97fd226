//! WASM bindings for browser-side extraction.

use wasm_bindgen::prelude::*;

use crate::{Options, run_with};

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// Extract records from an HTML string.
///
/// `options_json` is an optional JSON object such as
/// `{"cssSelector": "p", "tagsToExclude": ["script"]}`. Returns the records as
/// a JSON array string.
#[wasm_bindgen]
pub fn extract(html: &str, options_json: Option<String>) -> Result<String, JsValue> {
    let options = match options_json {
        Some(json) => Options::from_json_str(&json).map_err(|e| JsValue::from_str(&e.to_string()))?,
        None => Options::default(),
    };

    let extraction = run_with(html, &options).map_err(|e| JsValue::from_str(&e.to_string()))?;
    serde_json::to_string(extraction.records()).map_err(|e| JsValue::from_str(&e.to_string()))
}
