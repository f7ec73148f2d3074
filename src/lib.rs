//! pictoview - interactive pictogram grid viewer for the web
//!
//! Loads a CSV of `{word, row, col, page}` records and renders them as a
//! dense grid of labeled rectangles in the browser via WebAssembly and
//! Canvas 2D:
//! - Flat or page-tiled layout on a single canvas, no scrolling
//! - Hover tooltip, exact-word search, sticky marks, page-color overlay
//! - Magnified neighborhood view on a secondary canvas
//! - Partial repaints: only the cells a transition touched are redrawn
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { PictoView, fetch_csv } from 'pictoview';
//! await init();
//! const viewer = PictoView.new_with_zoom(canvas, zoomCanvas, devicePixelRatio);
//! viewer.set_render_callback(() => requestAnimationFrame(() => viewer.render()));
//! viewer.load(await fetch_csv('words.csv'));
//! viewer.render();
//! ```

// Data modules
pub mod color;
pub mod csv;
pub mod error;
pub mod types;
pub mod zoom;

// Rendering modules (Canvas 2D)
pub mod layout;
pub mod render;
pub mod state;
pub mod viewer;

use wasm_bindgen::prelude::*;

// Re-export the main viewer struct
pub use viewer::PictoView;

pub use types::*;

/// Parse pictogram CSV bytes and return the records as a JSON string
///
/// # Arguments
/// * `data` - The raw bytes of the CSV file
///
/// # Returns
/// A JSON array of `{word, row, col, page, identifier}` records
///
/// # Errors
/// Returns an error if the CSV is missing required columns or a row fails
/// to parse.
#[wasm_bindgen]
pub fn parse_records(data: &[u8]) -> Result<String, JsValue> {
    let records = csv::parse_records(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_json::to_string(&records)
        .map_err(|e| JsValue::from_str(&format!("JSON serialization error: {e}")))
}

/// Parse pictogram CSV bytes and return the records as a `JsValue`
///
/// This is more efficient than `parse_records` when the result will be
/// used directly in JavaScript.
///
/// # Errors
/// Returns an error if the CSV is missing required columns or a row fails
/// to parse.
#[wasm_bindgen]
pub fn parse_records_to_js(data: &[u8]) -> Result<JsValue, JsValue> {
    let records = csv::parse_records(data).map_err(|e| JsValue::from_str(&e.to_string()))?;

    serde_wasm_bindgen::to_value(&records)
        .map_err(|e| JsValue::from_str(&format!("Serialization error: {e}")))
}

/// Fetch a CSV over HTTP and return its bytes (WASM only).
///
/// Pairs with [`PictoView::load`]: hosts that serve the dataset next to
/// the page fetch it here instead of wiring up their own `fetch` call.
///
/// # Errors
/// Returns an error on network failure or a non-2xx status.
#[cfg(target_arch = "wasm32")]
#[wasm_bindgen]
pub async fn fetch_csv(url: String) -> Result<js_sys::Uint8Array, JsValue> {
    use wasm_bindgen::JsCast;
    use wasm_bindgen_futures::JsFuture;
    use web_sys::{Request, RequestInit, Response};

    let opts = RequestInit::new();
    opts.set_method("GET");
    let request = Request::new_with_str_and_init(&url, &opts)?;

    let window = web_sys::window().ok_or_else(|| JsValue::from_str("No window available"))?;
    let response: Response = JsFuture::from(window.fetch_with_request(&request))
        .await?
        .dyn_into()?;
    if !response.ok() {
        return Err(JsValue::from_str(&format!(
            "Fetch failed: HTTP {}",
            response.status()
        )));
    }

    let buffer = JsFuture::from(response.array_buffer()?).await?;
    Ok(js_sys::Uint8Array::new(&buffer))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
