//! PDF.js integration for the single reference page
//!
//! Page 1 is rasterized onto a canvas; the SVG overlay is resized to the
//! same viewport before `on_rendered` listeners run, so overlay redraws
//! never see a stale size.

use crate::error::{js_message, JsResultExt};
use crate::svg_overlay;
use overlay_core::{OverlayError, PageSize, Result, Viewport, ZoomController};
use serde::Deserialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlCanvasElement, HtmlElement};

// External JavaScript functions from pdf-bridge.js
#[wasm_bindgen(module = "/www/js/pdf-bridge.js")]
extern "C" {
    #[wasm_bindgen(js_name = initPdfJs, catch)]
    async fn init_pdf_js_internal(worker_src: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = loadDocument, catch)]
    async fn load_document_internal(url: &str) -> std::result::Result<JsValue, JsValue>;

    #[wasm_bindgen(js_name = renderPage, catch)]
    async fn render_page_internal(
        canvas: &HtmlCanvasElement,
        scale: f64,
    ) -> std::result::Result<JsValue, JsValue>;
}

/// What `loadDocument` reports about the document and its first page
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DocumentInfo {
    num_pages: u32,
    width: f64,
    height: f64,
}

type RenderListener = Rc<dyn Fn(&Viewport)>;

struct Inner {
    canvas: HtmlCanvasElement,
    overlay: Element,
    container: Option<HtmlElement>,
    zoom: Cell<ZoomController>,
    page_size: Cell<Option<PageSize>>,
    viewport: Cell<Option<Viewport>>,
    listeners: RefCell<Vec<RenderListener>>,
    generation: Cell<u64>,
}

/// Renders page 1 of a PDF and keeps the overlay sized to it.
///
/// Cloning is cheap; clones share the same canvas and state.
#[derive(Clone)]
pub struct PdfView {
    inner: Rc<Inner>,
}

impl PdfView {
    pub fn new(
        canvas: HtmlCanvasElement,
        overlay: Element,
        container: Option<HtmlElement>,
        zoom: ZoomController,
    ) -> Self {
        Self {
            inner: Rc::new(Inner {
                canvas,
                overlay,
                container,
                zoom: Cell::new(zoom),
                page_size: Cell::new(None),
                viewport: Cell::new(None),
                listeners: RefCell::new(Vec::new()),
                generation: Cell::new(0),
            }),
        }
    }

    /// Fetch and parse the PDF, then render page 1 at scale 1.0
    pub async fn load(&self, worker_src: &str, url: &str) -> Result<Viewport> {
        init_pdf_js_internal(worker_src)
            .await
            .map_err(|e| OverlayError::resource_load("PDF.js", js_message(&e)))?;

        let info = load_document_internal(url)
            .await
            .map_err(|e| OverlayError::resource_load(url, js_message(&e)))?;
        let info: DocumentInfo = serde_wasm_bindgen::from_value(info)
            .map_err(|e| OverlayError::resource_load(url, e.to_string()))?;
        if info.num_pages > 1 {
            crate::logging::console_log!(
                "PDF has {} pages; only page 1 is shown",
                info.num_pages
            );
        }
        self.inner
            .page_size
            .set(Some(PageSize::new(info.width, info.height)));

        self.set_scale(1.0).await
    }

    /// Clamp `factor`, resize canvas and overlay, render, notify listeners
    pub async fn set_scale(&self, factor: f64) -> Result<Viewport> {
        let page = self
            .inner
            .page_size
            .get()
            .ok_or_else(|| OverlayError::Js("No document loaded".to_string()))?;

        let mut zoom = self.inner.zoom.get();
        let scale = zoom.set_scale(factor);
        self.inner.zoom.set(zoom);

        let viewport = page.viewport_at(scale);
        self.resize(&viewport).or_overlay()?;
        self.inner.viewport.set(Some(viewport));

        let generation = self.inner.generation.get() + 1;
        self.inner.generation.set(generation);

        render_page_internal(&self.inner.canvas, scale)
            .await
            .or_overlay()?;

        // A newer call has resized everything already; its render will notify.
        if self.inner.generation.get() == generation {
            self.emit(&viewport);
        }
        Ok(viewport)
    }

    fn resize(&self, viewport: &Viewport) -> std::result::Result<(), JsValue> {
        let (w, h) = viewport.backing_size();
        let canvas = &self.inner.canvas;
        canvas.set_width(w);
        canvas.set_height(h);
        let style = canvas.style();
        style.set_property("width", &format!("{}px", viewport.width))?;
        style.set_property("height", &format!("{}px", viewport.height))?;
        svg_overlay::fit_to_viewport(&self.inner.overlay, viewport)
    }

    fn emit(&self, viewport: &Viewport) {
        let listeners: Vec<RenderListener> = self.inner.listeners.borrow().clone();
        for listener in listeners {
            listener(viewport);
        }
    }

    /// Register a callback run after every successful render
    pub fn on_rendered(&self, listener: impl Fn(&Viewport) + 'static) {
        self.inner.listeners.borrow_mut().push(Rc::new(listener));
    }

    pub fn viewport(&self) -> Option<Viewport> {
        self.inner.viewport.get()
    }

    /// Last recorded viewport, or a zero-sized one before the first render
    pub fn viewport_or_empty(&self) -> Viewport {
        self.viewport()
            .unwrap_or_else(|| Viewport::empty(self.inner.zoom.get().scale()))
    }

    pub fn scale(&self) -> f64 {
        self.inner.zoom.get().scale()
    }

    pub fn zoom_label(&self) -> String {
        self.inner.zoom.get().label()
    }

    pub async fn zoom_in(&self) -> Result<Option<Viewport>> {
        let mut zoom = self.inner.zoom.get();
        match zoom.step_in() {
            Some(next) => self.set_scale(next).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn zoom_out(&self) -> Result<Option<Viewport>> {
        let mut zoom = self.inner.zoom.get();
        match zoom.step_out() {
            Some(next) => self.set_scale(next).await.map(Some),
            None => Ok(None),
        }
    }

    pub async fn fit_width(&self) -> Result<Viewport> {
        let page = self.page_size()?;
        let (width, _) = self.container_size();
        self.set_scale(page.fit_width_scale(width)).await
    }

    pub async fn fit_page(&self) -> Result<Viewport> {
        let page = self.page_size()?;
        let (width, height) = self.container_size();
        self.set_scale(page.fit_page_scale(width, height)).await
    }

    fn page_size(&self) -> Result<PageSize> {
        self.inner
            .page_size
            .get()
            .ok_or_else(|| OverlayError::Js("No document loaded".to_string()))
    }

    fn container_size(&self) -> (f64, f64) {
        match &self.inner.container {
            Some(c) => (c.client_width() as f64, c.client_height() as f64),
            None => {
                let vp = self.viewport_or_empty();
                (vp.width, vp.height)
            }
        }
    }
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use crate::svg_overlay::SVG_NS;
    use overlay_core::viewport::ZoomBounds;
    use wasm_bindgen::JsCast;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn view() -> PdfView {
        let doc = crate::dom::document().unwrap();
        let canvas = doc
            .create_element("canvas")
            .unwrap()
            .dyn_into::<HtmlCanvasElement>()
            .unwrap();
        let svg = doc.create_element_ns(Some(SVG_NS), "svg").unwrap();
        PdfView::new(canvas, svg, None, ZoomController::new(ZoomBounds::default()))
    }

    #[wasm_bindgen_test]
    fn test_empty_viewport_before_load() {
        let v = view();
        assert!(v.viewport().is_none());
        let vp = v.viewport_or_empty();
        assert_eq!(vp.width, 0.0);
        assert_eq!(vp.scale, 1.0);
        assert_eq!(v.zoom_label(), "100%");
    }

    #[wasm_bindgen_test]
    fn test_resize_sets_canvas_backing_store() {
        let v = view();
        v.resize(&Viewport::new(918.4, 1188.0, 1.5)).unwrap();
        assert_eq!(v.inner.canvas.width(), 918);
        assert_eq!(v.inner.canvas.height(), 1188);
        assert_eq!(
            v.inner.overlay.get_attribute("viewBox").unwrap(),
            "0 0 918.4 1188"
        );
    }

    #[wasm_bindgen_test]
    async fn test_set_scale_without_document_fails() {
        let v = view();
        assert!(v.set_scale(2.0).await.is_err());
    }
}
