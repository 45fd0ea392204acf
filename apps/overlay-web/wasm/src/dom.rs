//! Small DOM helpers shared by the UI modules

use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, Event, EventTarget, Window};

pub fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("No window object available"))
}

pub fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("No document object available"))
}

/// Look up an element by id and cast it; `None` if missing or of another type
pub fn by_id<T: JsCast>(document: &Document, id: &str) -> Option<T> {
    document
        .get_element_by_id(id)
        .and_then(|el| el.dyn_into::<T>().ok())
}

/// Like [`by_id`] but the element is required
pub fn require<T: JsCast>(document: &Document, id: &str) -> Result<T, JsValue> {
    by_id(document, id).ok_or_else(|| JsValue::from_str(&format!("Missing element #{}", id)))
}

/// Create an element with a class name and optional text content
pub fn create(document: &Document, tag: &str, class: &str, text: Option<&str>) -> Result<Element, JsValue> {
    let el = document.create_element(tag)?;
    if !class.is_empty() {
        el.set_class_name(class);
    }
    if let Some(text) = text {
        el.set_text_content(Some(text));
    }
    Ok(el)
}

/// Attach an event listener for the lifetime of the page
pub fn listen<F>(target: &EventTarget, event: &str, handler: F) -> Result<(), JsValue>
where
    F: FnMut(Event) + 'static,
{
    let closure = Closure::wrap(Box::new(handler) as Box<dyn FnMut(Event)>);
    target.add_event_listener_with_callback(event, closure.as_ref().unchecked_ref())?;
    closure.forget();
    Ok(())
}

/// Remove every child node
pub fn clear_children(el: &Element) -> Result<(), JsValue> {
    while let Some(child) = el.first_child() {
        el.remove_child(&child)?;
    }
    Ok(())
}

/// Toggle the `hidden` class together with `aria-hidden`
pub fn set_hidden(el: &Element, hidden: bool) -> Result<(), JsValue> {
    let classes = el.class_list();
    if hidden {
        classes.add_1("hidden")?;
    } else {
        classes.remove_1("hidden")?;
    }
    el.set_attribute("aria-hidden", if hidden { "true" } else { "false" })
}

/// Blocking alert; failures to show it are only logged
pub fn alert(message: &str) {
    let shown = window().and_then(|w| w.alert_with_message(message));
    if shown.is_err() {
        crate::logging::console_error!("alert failed: {}", message);
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn test_create_and_clear() {
        let doc = document().unwrap();
        let parent = create(&doc, "div", "cell head", Some("Category")).unwrap();
        assert_eq!(parent.class_name(), "cell head");
        assert_eq!(parent.text_content().unwrap(), "Category");

        parent.append_child(&create(&doc, "span", "", None).unwrap()).unwrap();
        clear_children(&parent).unwrap();
        assert_eq!(parent.child_element_count(), 0);
    }

    #[wasm_bindgen_test]
    fn test_set_hidden() {
        let doc = document().unwrap();
        let el = create(&doc, "div", "busy", None).unwrap();
        set_hidden(&el, true).unwrap();
        assert!(el.class_list().contains("hidden"));
        assert_eq!(el.get_attribute("aria-hidden").unwrap(), "true");
        set_hidden(&el, false).unwrap();
        assert!(!el.class_list().contains("hidden"));
    }
}
