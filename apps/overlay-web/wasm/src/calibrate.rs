//! Click-to-log helper for measuring normalized positions on the page

use crate::dom::{self, listen};
use overlay_core::Viewport;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Element, MouseEvent};

/// One line of JSON-ish output, ready to paste into a layout map
pub fn calibration_line(nx: f64, ny: f64) -> String {
    format!("{{ \"x\": {:.3}, \"y\": {:.3} }},", nx, ny)
}

/// Log normalized click coordinates on `#overlaySvg` into `#log`
#[wasm_bindgen]
pub fn enable_calibration() -> Result<(), JsValue> {
    let document = dom::document()?;
    let overlay: Element = dom::require(&document, "overlaySvg")?;
    let log: Element = dom::require(&document, "log")?;
    if let Some(style) = crate::svg_overlay::inline_style(&overlay) {
        style.set_property("pointer-events", "auto")?;
    }

    let target = overlay.clone();
    listen(&overlay, "click", move |e| {
        let Some(mouse) = e.dyn_ref::<MouseEvent>() else { return };
        let rect = target.get_bounding_client_rect();
        let box_px = Viewport::new(rect.width(), rect.height(), 1.0);
        let (nx, ny) = box_px.to_normalized(
            mouse.client_x() as f64 - rect.left(),
            mouse.client_y() as f64 - rect.top(),
        );
        let mut text = log.text_content().unwrap_or_default();
        text.push_str(&calibration_line(nx, ny));
        text.push('\n');
        log.set_text_content(Some(&text));
    })
}
