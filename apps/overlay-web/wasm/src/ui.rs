//! Page chrome: busy overlay, help modal, theme toggle

use crate::dom::{by_id, listen, set_hidden};
use crate::error::js_message;
use crate::logging::{console_error, console_log};
use crate::storage::BrowserStore;
use overlay_core::prefs::{Preferences, Theme};
use overlay_core::{BusyState, BusyView};
use std::cell::RefCell;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

pub const BUSY_OVERLAY_ID: &str = "busyOverlay";

/// Full-page busy indicator shared by every network action
///
/// Nested `begin`/`end` pairs keep it visible until the last one ends.
#[derive(Clone)]
pub struct BusyOverlay {
    element: Option<Element>,
    state: Rc<RefCell<BusyState>>,
}

impl BusyOverlay {
    pub fn new(document: &Document) -> Self {
        Self {
            element: by_id(document, BUSY_OVERLAY_ID),
            state: Rc::new(RefCell::new(BusyState::new())),
        }
    }

    pub fn begin(&self, label: &str) -> BusyGuard {
        let view = self.state.borrow_mut().begin(label);
        self.show(&view);
        BusyGuard { overlay: self.clone() }
    }

    fn end(&self) {
        let view = self.state.borrow_mut().end();
        self.show(&view);
    }

    pub fn is_busy(&self) -> bool {
        self.state.borrow().is_busy()
    }

    fn show(&self, view: &BusyView) {
        let Some(el) = &self.element else { return };
        let result = match view {
            BusyView::Shown(label) => {
                if let Ok(Some(text)) = el.query_selector(".busy-text") {
                    text.set_text_content(Some(label));
                }
                set_hidden(el, false)
            }
            BusyView::Hidden => set_hidden(el, true),
        };
        report("busy overlay", result);
    }
}

fn report(context: &str, result: Result<(), JsValue>) {
    if let Err(e) = result {
        console_error!("{}: {}", context, js_message(&e));
    }
}

/// Ends its busy period when dropped, on success and error paths alike
pub struct BusyGuard {
    overlay: BusyOverlay,
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        self.overlay.end();
    }
}

/// Wire the help link, close buttons, backdrop click, and Escape key
pub fn bind_help_modal(document: &Document) -> Result<(), JsValue> {
    let Some(modal) = by_id::<HtmlElement>(document, "helpModal") else {
        return Ok(());
    };
    let close_btn = by_id::<HtmlElement>(document, "helpClose");

    if let Some(link) = by_id::<Element>(document, "helpLink") {
        let modal = modal.clone();
        let close_btn = close_btn.clone();
        listen(&link, "click", move |e| {
            e.prevent_default();
            match set_hidden(&modal, false) {
                Ok(()) => {
                    if let Some(btn) = &close_btn {
                        report("help modal focus", btn.focus());
                    }
                }
                Err(e) => report("help modal", Err(e)),
            }
        })?;
    }

    for id in ["helpClose", "helpOk"] {
        if let Some(btn) = by_id::<Element>(document, id) {
            let modal = modal.clone();
            listen(&btn, "click", move |_| {
                report("help modal", set_hidden(&modal, true));
            })?;
        }
    }

    {
        let target = modal.clone();
        listen(&modal, "click", move |e| {
            let on_backdrop = e
                .target()
                .and_then(|t| t.dyn_into::<web_sys::Node>().ok())
                .map(|t| t.is_same_node(Some(&target)))
                .unwrap_or(false);
            if on_backdrop {
                report("help modal", set_hidden(&target, true));
            }
        })?;
    }

    let target = modal.clone();
    listen(document, "keydown", move |e| {
        let Some(key) = e.dyn_ref::<KeyboardEvent>() else { return };
        if key.key() == "Escape" && target.get_attribute("aria-hidden").as_deref() == Some("false") {
            report("help modal", set_hidden(&target, true));
        }
    })
}

/// Apply `theme` to the page and the toggle button, then persist it
pub fn apply_theme(document: &Document, prefs: &mut Preferences<BrowserStore>, theme: Theme) {
    if let Some(root) = document.document_element() {
        report("theme", root.set_attribute("data-theme", theme.as_str()));
    }
    if let Some(btn) = by_id::<Element>(document, "themeToggle") {
        btn.set_text_content(Some(theme.toggle_label()));
        let pressed = if theme == Theme::Light { "true" } else { "false" };
        report("theme toggle", btn.set_attribute("aria-pressed", pressed));
    }
    if let Err(e) = prefs.set_theme(theme) {
        console_log!("theme not saved: {}", e);
    }
}

/// Current theme attribute of the page, dark when unset
pub fn current_theme(document: &Document) -> Theme {
    document
        .document_element()
        .and_then(|root| root.get_attribute("data-theme"))
        .and_then(|v| Theme::parse(&v))
        .unwrap_or(Theme::Dark)
}

fn prefers_light() -> bool {
    crate::dom::window()
        .ok()
        .and_then(|w| w.match_media("(prefers-color-scheme: light)").ok().flatten())
        .map(|mq| mq.matches())
        .unwrap_or(false)
}

/// Apply the saved or system theme and wire the toggle button
pub fn init_theme(
    document: &Document,
    prefs: Rc<RefCell<Preferences<BrowserStore>>>,
) -> Result<(), JsValue> {
    let initial = prefs.borrow().theme(prefers_light());
    apply_theme(document, &mut prefs.borrow_mut(), initial);

    let Some(btn) = by_id::<Element>(document, "themeToggle") else {
        return Ok(());
    };
    let doc = document.clone();
    listen(&btn, "click", move |_| {
        let next = current_theme(&doc).toggled();
        apply_theme(&doc, &mut prefs.borrow_mut(), next);
    })
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use overlay_core::prefs::MemoryPreferences;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn busy_fixture(document: &Document) -> Element {
        let el = document.create_element("div").unwrap();
        el.set_id(BUSY_OVERLAY_ID);
        el.set_class_name("hidden");
        let text = document.create_element("span").unwrap();
        text.set_class_name("busy-text");
        el.append_child(&text).unwrap();
        document.body().unwrap().append_child(&el).unwrap();
        el
    }

    #[wasm_bindgen_test]
    fn test_busy_overlay_nests() {
        let doc = crate::dom::document().unwrap();
        let el = busy_fixture(&doc);
        let busy = BusyOverlay::new(&doc);

        let outer = busy.begin("Exporting…");
        assert!(!el.class_list().contains("hidden"));
        let inner = busy.begin("Processing CSV…");
        assert_eq!(
            el.query_selector(".busy-text").unwrap().unwrap().text_content().unwrap(),
            "Processing CSV…"
        );
        drop(inner);
        assert!(!el.class_list().contains("hidden"));
        drop(outer);
        assert!(el.class_list().contains("hidden"));
        assert!(!busy.is_busy());

        el.remove();
    }

    #[wasm_bindgen_test]
    fn test_help_modal_opens_and_closes() {
        let doc = crate::dom::document().unwrap();
        let body = doc.body().unwrap();
        let root = doc.create_element("div").unwrap();
        root.set_inner_html(
            r##"<a id="helpLink" href="#">Help</a>
               <div id="helpModal" class="hidden" aria-hidden="true">
                 <button id="helpClose">x</button>
               </div>"##,
        );
        body.append_child(&root).unwrap();
        bind_help_modal(&doc).unwrap();

        let modal: Element = by_id(&doc, "helpModal").unwrap();
        by_id::<HtmlElement>(&doc, "helpLink").unwrap().click();
        assert!(!modal.class_list().contains("hidden"));
        assert_eq!(modal.get_attribute("aria-hidden").unwrap(), "false");
        assert_eq!(doc.active_element().unwrap().id(), "helpClose");

        by_id::<HtmlElement>(&doc, "helpClose").unwrap().click();
        assert!(modal.class_list().contains("hidden"));
        assert_eq!(modal.get_attribute("aria-hidden").unwrap(), "true");

        root.remove();
    }

    #[wasm_bindgen_test]
    fn test_report_swallows_dom_failures() {
        report("test", Err(JsValue::from_str("boom")));
        report("test", Ok(()));
    }

    #[wasm_bindgen_test]
    fn test_apply_theme_updates_page() {
        let doc = crate::dom::document().unwrap();
        let mut prefs = Preferences::new(BrowserStore::Memory(MemoryPreferences::new()));
        apply_theme(&doc, &mut prefs, Theme::Light);
        assert_eq!(current_theme(&doc), Theme::Light);
        assert_eq!(prefs.theme(false), Theme::Light);
        apply_theme(&doc, &mut prefs, Theme::Dark);
        assert_eq!(current_theme(&doc), Theme::Dark);
    }
}
