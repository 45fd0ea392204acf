//! Conversions between `JsValue` errors and [`OverlayError`]

use overlay_core::OverlayError;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

/// Best-effort message of a thrown JS value
pub fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    if let Some(s) = value.as_string() {
        return s;
    }
    format!("{:?}", value)
}

pub fn js_error(value: JsValue) -> OverlayError {
    OverlayError::Js(js_message(&value))
}

pub trait JsResultExt<T> {
    /// Convert a browser API failure into [`OverlayError::Js`]
    fn or_overlay(self) -> Result<T, OverlayError>;
}

impl<T> JsResultExt<T> for Result<T, JsValue> {
    fn or_overlay(self) -> Result<T, OverlayError> {
        self.map_err(js_error)
    }
}
