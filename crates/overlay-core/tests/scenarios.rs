//! End-to-end flows through the store and the overlay renderer
//!
//! Wires a `SelectionStore` to an `OverlayRenderer` the same way the browser
//! client does, with a `MemorySurface` standing in for the SVG.
//!
//! Run with: cargo test -p overlay-core --test scenarios

use overlay_core::overlay::{OverlayElement, TextVariant};
use overlay_core::{
    snapshot_to_lines, ExportRequest, ExtractResponse, MemorySurface, OverlayLayoutMap,
    OverlayRenderer, SelectionStore, Viewport,
};
use pretty_assertions::assert_eq;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

const LAYOUT: &str = r##"{
    "pages": {
        "1": {
            "dropdown": {
                "x": 0.30, "y": 0.20, "w": 0.25, "h": 0.02,
                "values": ["<Choose a Project Level.>", "L1", "L2L", "L2", "L3L"],
                "styles": {
                    "placeholder": {"fontSizePt": 9, "color": "#808080", "italic": true},
                    "selected": {"fontSizePt": 10, "color": "#000000", "fontFamily": "Calibri"}
                }
            },
            "ticks": [
                {"id": "glyph_r16_c2", "x": 0.40, "y": 0.50},
                {"id": "glyph_r16_c3", "x": 0.50, "y": 0.50},
                {"id": "glyph_r17_c2", "x": 0.40, "y": 0.55}
            ]
        }
    }
}"##;

type Renderer = Rc<RefCell<OverlayRenderer<MemorySurface>>>;

struct Harness {
    store: SelectionStore<String>,
    renderer: Renderer,
    viewport: Rc<Cell<Viewport>>,
}

impl Harness {
    fn new(viewport: Viewport) -> Self {
        let layout = OverlayLayoutMap::from_json(LAYOUT).unwrap();
        let renderer = Rc::new(RefCell::new(
            OverlayRenderer::new(MemorySurface::new(), &layout).unwrap(),
        ));
        let viewport = Rc::new(Cell::new(viewport));

        let mut store = SelectionStore::new();
        let (r, vp) = (renderer.clone(), viewport.clone());
        store.subscribe(move |s: &SelectionStore<String>| {
            r.borrow_mut().render(&s.snapshot(), &vp.get()).unwrap();
        });

        let h = Self {
            store,
            renderer,
            viewport,
        };
        h.redraw();
        h
    }

    /// What the page-render listener does after a zoom
    fn zoom_to(&self, viewport: Viewport) {
        self.viewport.set(viewport);
        self.redraw();
    }

    fn redraw(&self) {
        self.renderer
            .borrow_mut()
            .render(&self.store.snapshot(), &self.viewport.get())
            .unwrap();
    }

    fn elements(&self) -> Vec<OverlayElement> {
        self.renderer.borrow().surface().elements().to_vec()
    }
}

#[test]
fn test_initial_render_shows_placeholder_only() {
    let h = Harness::new(Viewport::new(1000.0, 2000.0, 1.5));
    let elements = h.elements();
    assert_eq!(elements.len(), 1);
    match &elements[0] {
        OverlayElement::Text(t) => {
            assert_eq!(t.text, "<Choose a Project Level.>");
            assert_eq!(t.variant, TextVariant::Placeholder);
            assert!(t.italic);
        }
        other => panic!("expected text, got {:?}", other),
    }
}

#[test]
fn test_select_level_and_tick_redraws() {
    let mut h = Harness::new(Viewport::new(1000.0, 2000.0, 1.5));
    h.store.set_project_level("L2");
    h.store.set_tick("glyph_r16_c2", true);

    let elements = h.elements();
    assert_eq!(elements.len(), 2);
    match &elements[0] {
        OverlayElement::Text(t) => {
            assert_eq!(t.text, "L2");
            assert_eq!(t.variant, TextVariant::Selected);
            assert_eq!(t.font_family, "Calibri");
        }
        other => panic!("expected text, got {:?}", other),
    }
    match &elements[1] {
        OverlayElement::Tick(t) => {
            assert_eq!(t.id, "glyph_r16_c2");
            assert!((t.x - 400.0).abs() < 1e-9);
            assert!((t.y - 1000.0).abs() < 1e-9);
            assert!((t.font_size - 21.0).abs() < 1e-9);
        }
        other => panic!("expected tick, got {:?}", other),
    }
}

#[test]
fn test_untick_removes_checkmark() {
    let mut h = Harness::new(Viewport::new(612.0, 792.0, 1.0));
    h.store.set_tick("glyph_r17_c2", true);
    assert_eq!(h.renderer.borrow().surface().ticks().count(), 1);
    h.store.set_tick("glyph_r17_c2", false);
    assert_eq!(h.renderer.borrow().surface().ticks().count(), 0);
}

#[test]
fn test_extract_prefill_draws_returned_ticks() {
    let mut h = Harness::new(Viewport::new(612.0, 792.0, 1.0));
    let response: ExtractResponse = serde_json::from_str(
        r#"{"medical":"Yes","lines":["GP: EMEA"],"ticks":{"glyph_r16_c3":true}}"#,
    )
    .unwrap();

    h.store.set_template(Some("template.docx".to_string()));
    h.store.apply_ticks(&response.ticks);

    let ticks: Vec<String> = h
        .renderer
        .borrow()
        .surface()
        .ticks()
        .map(|t| t.id.clone())
        .collect();
    assert_eq!(ticks, vec!["glyph_r16_c3".to_string()]);
    assert_eq!(h.store.template().map(String::as_str), Some("template.docx"));
    assert_eq!(response.medical_or_dash(), "Yes");
}

#[test]
fn test_zoom_rescales_existing_selection() {
    let mut h = Harness::new(Viewport::new(612.0, 792.0, 1.0));
    h.store.set_tick("glyph_r16_c2", true);
    h.zoom_to(Viewport::new(1224.0, 1584.0, 2.0));

    let tick = h
        .renderer
        .borrow()
        .surface()
        .ticks()
        .next()
        .cloned()
        .unwrap();
    assert!((tick.x - 489.6).abs() < 1e-9);
    assert!((tick.y - 792.0).abs() < 1e-9);
    assert!((tick.font_size - 28.0).abs() < 1e-9);
    // Redraw replaces, never accumulates
    assert_eq!(h.elements().len(), 2);
}

#[test]
fn test_snapshot_feeds_export_payloads() {
    let mut h = Harness::new(Viewport::new(612.0, 792.0, 1.0));
    h.store.set_project_level("L3L");
    h.store.set_tick("glyph_r16_c3", true);
    h.store.set_tick("glyph_r16_c2", true);
    h.store.set_tick("glyph_r17_c2", false);

    let snapshot = h.store.snapshot();
    let body = serde_json::to_value(ExportRequest::new(&snapshot, "interactive")).unwrap();
    assert_eq!(body["company_id"], "interactive");
    assert_eq!(body["projectLevel"], "L3L");
    assert_eq!(body["ticks"]["glyph_r17_c2"], false);

    assert_eq!(
        snapshot_to_lines(&snapshot),
        vec![
            "Project Level: L3L".to_string(),
            "General Purpose (GP): N. America, EMEA".to_string(),
        ]
    );
}
