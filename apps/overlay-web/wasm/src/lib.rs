//! Browser client for the device-classification overlay
//!
//! The user picks a project level and ticks region/category cells; the
//! selections are drawn live over the reference PDF page and sent to the
//! document server to generate outputs.
//!
//! ## Architecture
//!
//! - Selections, layout, and overlay geometry live in `overlay-core`
//! - This crate binds them to the DOM, PDF.js, and `fetch`
//! - `App` is the composition root, started from `#[wasm_bindgen(start)]`
//!
//! ## Host page
//!
//! ```html
//! <script src="https://cdn.jsdelivr.net/npm/pdfjs-dist@3.11.174/build/pdf.min.js"></script>
//! <script type="application/json" id="overlayConfig">{"api_base": ""}</script>
//! <script type="module">
//!   import init from './pkg/overlay_wasm.js';
//!   await init();
//! </script>
//! ```

mod logging;

pub mod api;
pub mod app;
pub mod calibrate;
pub mod components;
pub mod dom;
pub mod error;
pub mod pdf_view;
pub mod storage;
pub mod svg_overlay;
pub mod ui;

use wasm_bindgen::prelude::*;

pub use app::App;
pub use calibrate::enable_calibration;

/// Initialize the WASM module and start the client
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
    wasm_bindgen_futures::spawn_local(async {
        if let Err(e) = App::start().await {
            logging::console_error!("overlay client stopped: {}", e);
        }
    });
}

/// Get the library version
#[wasm_bindgen]
pub fn get_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
