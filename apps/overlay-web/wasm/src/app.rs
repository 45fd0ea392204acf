//! Composition root: wires the store, PDF view, overlay, and page controls

use crate::api::{ServerClient, MISSING_TEMPLATE_FOR_DOWNLOAD, MISSING_TEMPLATE_FOR_EXPORT};
use crate::components::{
    apply_ticks_to_ui, bind_dropdown, build_device_grid, render_batch_results,
    render_extract_summary,
};
use crate::dom::{self, by_id, listen, require, set_hidden};
use crate::error::JsResultExt;
use crate::logging::{console_error, console_log};
use crate::pdf_view::PdfView;
use crate::storage::BrowserStore;
use crate::svg_overlay::SvgSurface;
use crate::ui::{self, BusyOverlay};
use overlay_core::config::PDF_QUERY_PARAM;
use overlay_core::prefs::Preferences;
use overlay_core::{
    ClientConfig, OverlayLayoutMap, OverlayRenderer, ProjectLevel, Result,
    SelectionSnapshot, SelectionStore, Viewport, ZoomController,
};
use std::cell::RefCell;
use std::future::Future;
use std::rc::Rc;
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{
    Document, Element, File, HtmlAnchorElement, HtmlCanvasElement, HtmlElement, HtmlInputElement,
    HtmlSelectElement, KeyboardEvent, UrlSearchParams,
};

pub const CONFIG_ELEMENT_ID: &str = "overlayConfig";
pub const LAYOUT_LOAD_FAILED: &str = "Could not load overlay definition.";
pub const PDF_LOAD_FAILED: &str = "Could not load the reference PDF.";

type Renderer = Rc<RefCell<OverlayRenderer<SvgSurface>>>;
type JsResult<T> = std::result::Result<T, JsValue>;

pub struct App {
    document: Document,
    config: ClientConfig,
    client: ServerClient,
    store: Rc<RefCell<SelectionStore<File>>>,
    view: PdfView,
    renderer: Renderer,
    busy: BusyOverlay,
    prefs: Rc<RefCell<Preferences<BrowserStore>>>,
}

/// Inline JSON config (if any) plus the `pdf` query override
pub fn load_config(document: &Document) -> Result<ClientConfig> {
    let inline = by_id::<Element>(document, CONFIG_ELEMENT_ID)
        .and_then(|el| el.text_content())
        .filter(|json| !json.trim().is_empty());
    let config = match inline {
        Some(json) => ClientConfig::from_json(&json)?,
        None => ClientConfig::default(),
    };

    let search = dom::window().or_overlay()?.location().search().or_overlay()?;
    let params = UrlSearchParams::new_with_str(&search).or_overlay()?;
    Ok(config.with_pdf_override(params.get(PDF_QUERY_PARAM).as_deref()))
}

fn draw(renderer: &Renderer, snapshot: &SelectionSnapshot, viewport: &Viewport) {
    let result = renderer.borrow_mut().render(snapshot, viewport);
    if let Err(e) = result {
        console_error!("overlay render failed: {}", e);
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ZoomAction {
    In,
    Out,
    FitWidth,
    FitPage,
}

impl ZoomAction {
    /// Zoom key bound to `key`; chords with Ctrl, Meta or Alt stay with the browser
    fn from_key(key: &str, modified: bool) -> Option<Self> {
        if modified {
            return None;
        }
        match key {
            "+" | "=" => Some(ZoomAction::In),
            "-" | "_" => Some(ZoomAction::Out),
            _ => None,
        }
    }

    async fn apply(self, view: &PdfView) -> Result<()> {
        match self {
            ZoomAction::In => view.zoom_in().await.map(drop),
            ZoomAction::Out => view.zoom_out().await.map(drop),
            ZoomAction::FitWidth => view.fit_width().await.map(drop),
            ZoomAction::FitPage => view.fit_page().await.map(drop),
        }
    }

    fn spawn(self, view: PdfView) {
        spawn_local(async move {
            if let Err(e) = self.apply(&view).await {
                console_error!("zoom failed: {}", e);
            }
        });
    }
}

fn first_file(input: Option<&HtmlInputElement>) -> Option<File> {
    input?.files()?.get(0)
}

impl App {
    /// Load everything and wire the page. Resource-load failures are alerted
    /// and stop the bootstrap.
    pub async fn start() -> Result<Rc<App>> {
        let document = dom::document().or_overlay()?;
        let config = load_config(&document)?;
        console_log!("overlay client starting, pdf = {}", config.pdf_url);

        let prefs = Rc::new(RefCell::new(Preferences::new(BrowserStore::open())));
        ui::init_theme(&document, prefs.clone()).or_overlay()?;
        ui::bind_help_modal(&document).or_overlay()?;

        let client = ServerClient::new(config.api_base.clone());
        let layout = match client.fetch_overlay_map().await {
            Ok(layout) => layout,
            Err(e) => {
                console_error!("{}", e);
                dom::alert(LAYOUT_LOAD_FAILED);
                return Err(e);
            }
        };

        let canvas: HtmlCanvasElement = require(&document, "pdfCanvas").or_overlay()?;
        let svg: Element = require(&document, "overlaySvg").or_overlay()?;
        let container = by_id::<HtmlElement>(&document, "pdfContainer");
        let view = PdfView::new(canvas, svg.clone(), container, ZoomController::new(config.zoom));

        let surface = SvgSurface::new(svg).or_overlay()?;
        let renderer = Rc::new(RefCell::new(OverlayRenderer::new(surface, &layout)?));

        let app = Rc::new(App {
            busy: BusyOverlay::new(&document),
            document,
            config,
            client,
            store: Rc::new(RefCell::new(SelectionStore::new())),
            view,
            renderer,
            prefs,
        });

        app.wire_selection(&layout).or_overlay()?;
        app.wire_zoom().or_overlay()?;
        app.subscribe_overlay();

        let loaded = app
            .view
            .load(&app.config.pdfjs_worker_src, &app.config.pdf_url)
            .await;
        if let Err(e) = loaded {
            console_error!("{}", e);
            dom::alert(PDF_LOAD_FAILED);
            return Err(e);
        }

        app.wire_actions().or_overlay()?;
        Ok(app)
    }

    pub fn snapshot(&self) -> SelectionSnapshot {
        self.store.borrow().snapshot()
    }

    /// Redraw on every store change and after every page render
    fn subscribe_overlay(self: &Rc<Self>) {
        let renderer = self.renderer.clone();
        let view = self.view.clone();
        self.store.borrow_mut().subscribe(move |store| {
            // Nothing to draw on until the first page render
            if let Some(viewport) = view.viewport() {
                draw(&renderer, &store.snapshot(), &viewport);
            }
        });

        let renderer = self.renderer.clone();
        let store = self.store.clone();
        let label = by_id::<Element>(&self.document, "zoomLabel");
        let view = self.view.clone();
        self.view.on_rendered(move |viewport| {
            let snapshot = store.borrow().snapshot();
            draw(&renderer, &snapshot, viewport);
            if let Some(label) = &label {
                label.set_text_content(Some(&view.zoom_label()));
            }
        });
    }

    fn wire_selection(self: &Rc<Self>, layout: &OverlayLayoutMap) -> JsResult<()> {
        if let Some(select) = by_id::<HtmlSelectElement>(&self.document, "projectLevel") {
            if select.length() == 0 {
                self.fill_levels(&select, layout)?;
            }

            let app = self.clone();
            bind_dropdown(&select, move |value| {
                app.store.borrow_mut().set_project_level(value.clone());
                let saved = app
                    .prefs
                    .borrow_mut()
                    .set_default_project_level(ProjectLevel::parse(&value));
                if let Err(e) = saved {
                    console_log!("default project level not saved: {}", e);
                }
            })?;

            let seeded = self.prefs.borrow().default_project_level();
            if let Some(level) = seeded {
                select.set_value(level.as_str());
                self.store.borrow_mut().set_project_level(level.as_str());
            }
        }

        if let Some(grid) = by_id::<Element>(&self.document, "deviceGrid") {
            let store = self.store.clone();
            build_device_grid(
                &self.document,
                &grid,
                Rc::new(move |id, checked| store.borrow_mut().set_tick(id, checked)),
            )?;
        }
        Ok(())
    }

    /// Options from the layout's dropdown values; the first one is the placeholder
    fn fill_levels(
        &self,
        select: &HtmlSelectElement,
        layout: &OverlayLayoutMap,
    ) -> JsResult<()> {
        let Ok(page) = layout.first_page() else {
            return Ok(());
        };
        let Some(dropdown) = &page.dropdown else {
            return Ok(());
        };
        for (i, text) in dropdown.values.iter().enumerate() {
            let value = if i == 0 { "" } else { text.as_str() };
            let option = web_sys::HtmlOptionElement::new_with_text_and_value(text, value)?;
            select.add_with_html_option_element(&option)?;
        }
        Ok(())
    }

    fn wire_zoom(self: &Rc<Self>) -> JsResult<()> {
        let buttons = [
            ("zoomIn", ZoomAction::In),
            ("zoomOut", ZoomAction::Out),
            ("fitWidth", ZoomAction::FitWidth),
            ("fitPage", ZoomAction::FitPage),
        ];
        for (id, action) in buttons {
            let Some(btn) = by_id::<Element>(&self.document, id) else {
                continue;
            };
            let view = self.view.clone();
            listen(&btn, "click", move |_| action.spawn(view.clone()))?;
        }

        if let Some(container) = by_id::<HtmlElement>(&self.document, "pdfContainer") {
            if !container.has_attribute("tabindex") {
                container.set_tab_index(0);
            }
            let view = self.view.clone();
            listen(&container, "keydown", move |e| {
                let Some(key) = e.dyn_ref::<KeyboardEvent>() else { return };
                let modified = key.ctrl_key() || key.meta_key() || key.alt_key();
                let Some(action) = ZoomAction::from_key(&key.key(), modified) else {
                    return;
                };
                e.prevent_default();
                action.spawn(view.clone());
            })?;
        }

        if let Some(label) = by_id::<Element>(&self.document, "zoomLabel") {
            label.set_text_content(Some(&self.view.zoom_label()));
        }
        Ok(())
    }

    fn wire_actions(self: &Rc<Self>) -> JsResult<()> {
        self.on_click("btnProcess", |app| app.process_documents())?;
        self.on_click("btnTemplateExport", |app| app.export_template())?;

        if by_id::<Element>(&self.document, "btnDownload").is_some() {
            for id in ["btnDownload", "btnDownloadPdf", "btnDownloadDocx"] {
                self.on_click(id, |app| app.download())?;
            }
        } else {
            self.on_click("btnDownloadPdf", |app| app.export_single(false))?;
            self.on_click("btnDownloadDocx", |app| app.export_single(true))?;
        }

        if let Some(form) = by_id::<Element>(&self.document, "csvForm") {
            let app = self.clone();
            listen(&form, "submit", move |e| {
                e.prevent_default();
                app.process_csv();
            })?;
        }
        Ok(())
    }

    fn on_click(
        self: &Rc<Self>,
        id: &str,
        handler: impl Fn(&Rc<App>) + 'static,
    ) -> JsResult<()> {
        let Some(btn) = by_id::<Element>(&self.document, id) else {
            return Ok(());
        };
        let app = self.clone();
        listen(&btn, "click", move |_| handler(&app))
    }

    /// Run a network action with the busy overlay shown; failures are alerted
    fn run<F, Fut>(self: &Rc<Self>, label: &str, action: F)
    where
        F: FnOnce(Rc<App>) -> Fut + 'static,
        Fut: Future<Output = Result<()>> + 'static,
    {
        let app = self.clone();
        let label = label.to_string();
        spawn_local(async move {
            let _busy = app.busy.begin(&label);
            if let Err(e) = action(app.clone()).await {
                console_error!("{}", e);
                dom::alert(&e.to_string());
            }
        });
    }

    fn input(&self, id: &str) -> Option<HtmlInputElement> {
        by_id(&self.document, id)
    }

    /// Extract from the regulatory document, then prefill the summary and ticks
    pub fn process_documents(self: &Rc<Self>) {
        let Some(regulatory) = first_file(self.input("regulatoryFile").as_ref()) else {
            dom::alert("Please choose the Regulatory Document (.docx).");
            return;
        };
        let Some(template) = first_file(self.input("templateFile").as_ref()) else {
            dom::alert("Please choose the Template Document (.docx or .pdf).");
            return;
        };

        let label = self.config.messages.extract.clone();
        self.run(&label, move |app| async move {
            let response = app.client.extract(&regulatory).await?;
            app.store.borrow_mut().set_template(Some(template));

            let medical = by_id::<HtmlElement>(&app.document, "extractMedical");
            let lines = by_id::<HtmlElement>(&app.document, "extractLines");
            if let (Some(medical), Some(lines)) = (medical, lines) {
                render_extract_summary(&medical, &lines, &response);
            }
            apply_ticks_to_ui(&app.document, &response.ticks);
            app.store.borrow_mut().apply_ticks(&response.ticks);
            Ok(())
        });
    }

    fn template(&self) -> Option<File> {
        self.store.borrow().template().cloned()
    }

    /// `/download` with the stored template and the full snapshot
    pub fn download(self: &Rc<Self>) {
        let Some(template) = self.template() else {
            dom::alert(MISSING_TEMPLATE_FOR_DOWNLOAD);
            return;
        };
        let label = self.config.messages.export.clone();
        self.run(&label, move |app| async move {
            let file = app.client.download(&app.snapshot(), Some(&template)).await?;
            file.save()
        });
    }

    /// `/api/export` with the stored template and content lines
    pub fn export_template(self: &Rc<Self>) {
        let Some(template) = self.template() else {
            dom::alert(MISSING_TEMPLATE_FOR_EXPORT);
            return;
        };
        let label = self.config.messages.export.clone();
        self.run(&label, move |app| async move {
            let file = app
                .client
                .export_with_template(&app.snapshot(), Some(&template))
                .await?;
            file.save()
        });
    }

    /// `/export`, then open the returned links in new tabs
    pub fn export_single(self: &Rc<Self>, docx_too: bool) {
        let label = self.config.messages.export.clone();
        self.run(&label, move |app| async move {
            let links = app
                .client
                .export_single(&app.snapshot(), &app.config.company_id)
                .await?;
            let window = dom::window().or_overlay()?;
            window
                .open_with_url_and_target(&links.pdf_url, "_blank")
                .or_overlay()?;
            if docx_too {
                if let Some(docx) = &links.docx_url {
                    window
                        .open_with_url_and_target(docx, "_blank")
                        .or_overlay()?;
                }
            }
            Ok(())
        });
    }

    /// `/batch` with the chosen CSV, then show the result cards
    pub fn process_csv(self: &Rc<Self>) {
        let Some(csv) = first_file(self.input("csvFile").as_ref()) else {
            dom::alert("Choose a CSV file");
            return;
        };
        let label = self.config.messages.batch.clone();
        self.run(&label, move |app| async move {
            let response = app.client.process_csv(&csv).await?;
            app.show_batch(&response).or_overlay()
        });
    }

    fn show_batch(&self, response: &overlay_core::BatchResponse) -> JsResult<()> {
        let doc = &self.document;
        if let Some(initial) = by_id::<Element>(doc, "batchInitial") {
            set_hidden(&initial, true)?;
        }
        if let Some(results) = by_id::<Element>(doc, "batchResults") {
            set_hidden(&results, false)?;
        }
        if let Some(count) = by_id::<Element>(doc, "processedCount") {
            count.set_text_content(Some(&response.processed_label()));
        }
        if let Some(zip) = by_id::<HtmlAnchorElement>(doc, "downloadAllZip") {
            zip.set_href(&response.zip_url);
        }
        let list = require::<Element>(doc, "resultsList")?;
        render_batch_results(doc, &list, &response.items)
    }
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("config", &self.config)
            .field("scale", &self.view.scale())
            .finish()
    }
}
