//! DOM builders for the device grid, the dropdown, and result panels

use crate::dom::{clear_children, create, listen};
use overlay_core::api::batch_cards;
use overlay_core::grid::{self, CELL_LABEL};
use overlay_core::{BatchItem, ExtractResponse};
use std::collections::BTreeMap;
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{Document, Element, HtmlElement, HtmlInputElement, HtmlSelectElement};

pub type TickHandler = Rc<dyn Fn(&str, bool)>;

/// Render the region x category checkbox matrix into `container`
///
/// Each checkbox id is the tick id of its cell (`glyph_r{row}_c{col}`);
/// every change calls `on_change(id, checked)`.
pub fn build_device_grid(
    document: &Document,
    container: &Element,
    on_change: TickHandler,
) -> Result<(), JsValue> {
    clear_children(container)?;

    for (i, text) in grid::header().into_iter().enumerate() {
        let class = if i == 0 { "cell head first" } else { "cell head" };
        container.append_child(&create(document, "div", class, Some(text))?.into())?;
    }

    for (category, cells) in grid::rows() {
        let label = create(document, "div", "cell label", Some(category.label))?;
        container.append_child(&label)?;

        for cell in cells {
            let id = cell.tick_id().to_string();
            let wrapper = create(document, "div", "cell", None)?;

            let input = document
                .create_element("input")?
                .dyn_into::<HtmlInputElement>()?;
            input.set_type("checkbox");
            input.set_id(&id);
            input.set_attribute(
                "aria-label",
                &format!("{} / {}", category.short_name, cell.region.name),
            )?;

            let text = create(document, "label", "", Some(CELL_LABEL))?;
            text.set_attribute("for", &id)?;

            let handler = on_change.clone();
            let target = input.clone();
            listen(&input, "change", move |_| {
                handler(&target.id(), target.checked());
            })?;

            wrapper.append_child(&input)?;
            wrapper.append_child(&text)?;
            container.append_child(&wrapper)?;
        }
    }
    Ok(())
}

/// Forward the select's current value on every change
pub fn bind_dropdown(
    select: &HtmlSelectElement,
    on_change: impl Fn(String) + 'static,
) -> Result<(), JsValue> {
    let target = select.clone();
    listen(select, "change", move |_| on_change(target.value()))
}

/// Check or uncheck grid inputs to mirror `ticks`; unknown ids are skipped
pub fn apply_ticks_to_ui(document: &Document, ticks: &BTreeMap<String, bool>) {
    for (id, checked) in ticks {
        if let Some(input) = crate::dom::by_id::<HtmlInputElement>(document, id) {
            input.set_checked(*checked);
        }
    }
}

/// Fill the extract summary panel
pub fn render_extract_summary(
    medical: &HtmlElement,
    lines: &HtmlElement,
    response: &ExtractResponse,
) {
    medical.set_text_content(Some(response.medical_or_dash()));
    lines.set_text_content(Some(&response.lines_text()));
}

/// Replace `container` contents with one card per batch item
///
/// Values from the server are only ever set as text or `href`, never parsed
/// as markup.
pub fn render_batch_results(
    document: &Document,
    container: &Element,
    items: &[BatchItem],
) -> Result<(), JsValue> {
    clear_children(container)?;

    for card in batch_cards(items) {
        let root = create(document, "div", "result-card", None)?;
        root.append_child(&create(document, "div", "serial", Some(&card.serial))?.into())?;

        let body = create(document, "div", "result-body", None)?;
        body.append_child(&create(document, "strong", "", Some(&card.company_id))?.into())?;
        body.append_child(&document.create_element("br")?.into())?;
        body.append_child(&create(document, "small", "", Some("Completed"))?.into())?;
        root.append_child(&body)?;

        let actions = create(document, "div", "actions", None)?;
        for link in &card.links {
            let a = create(document, "a", "btn btn-primary", Some(link.label))?;
            a.set_attribute("href", &link.href)?;
            a.set_attribute("target", "_blank")?;
            a.set_attribute("rel", "noopener")?;
            actions.append_child(&a)?;
        }
        root.append_child(&actions)?;

        container.append_child(&root)?;
    }
    Ok(())
}

#[cfg(test)]
#[cfg(target_arch = "wasm32")]
mod wasm_tests {
    use super::*;
    use std::cell::RefCell;
    use wasm_bindgen_test::*;
    use web_sys::Event;

    wasm_bindgen_test_configure!(run_in_browser);

    fn doc() -> Document {
        crate::dom::document().unwrap()
    }

    #[wasm_bindgen_test]
    fn test_grid_layout_and_ids() {
        let doc = doc();
        let container = doc.create_element("div").unwrap();
        build_device_grid(&doc, &container, Rc::new(|_, _| {})).unwrap();

        // 5 header cells, then 5 rows of (label + 4 cells)
        assert_eq!(container.child_element_count(), 5 + 5 * 5);
        let inputs = container.query_selector_all("input[type=checkbox]").unwrap();
        assert_eq!(inputs.length(), 20);
        assert!(container.query_selector("#glyph_r16_c2").unwrap().is_some());
        assert!(container.query_selector("#glyph_r20_c5").unwrap().is_some());
        assert!(container.query_selector("#glyph_r15_c2").unwrap().is_none());
    }

    #[wasm_bindgen_test]
    fn test_grid_change_invokes_callback() {
        let doc = doc();
        let body = doc.body().unwrap();
        let container = doc.create_element("div").unwrap();
        body.append_child(&container).unwrap();

        let seen: Rc<RefCell<Vec<(String, bool)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = seen.clone();
        build_device_grid(
            &doc,
            &container,
            Rc::new(move |id, checked| sink.borrow_mut().push((id.to_string(), checked))),
        )
        .unwrap();

        let input: HtmlInputElement = crate::dom::by_id(&doc, "glyph_r17_c3").unwrap();
        input.set_checked(true);
        input.dispatch_event(&Event::new("change").unwrap()).unwrap();
        assert_eq!(*seen.borrow(), vec![("glyph_r17_c3".to_string(), true)]);

        body.remove_child(&container).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_extracted_ticks_check_only_their_boxes() {
        let doc = doc();
        let body = doc.body().unwrap();
        let container = doc.create_element("div").unwrap();
        body.append_child(&container).unwrap();
        build_device_grid(&doc, &container, Rc::new(|_, _| {})).unwrap();

        let prior: HtmlInputElement = crate::dom::by_id(&doc, "glyph_r17_c2").unwrap();
        prior.set_checked(true);

        let mut ticks = BTreeMap::new();
        ticks.insert("glyph_r16_c3".to_string(), true);
        ticks.insert("bogus".to_string(), true);
        apply_ticks_to_ui(&doc, &ticks);

        let inputs = container.query_selector_all("input[type=checkbox]").unwrap();
        let mut checked = Vec::new();
        for i in 0..inputs.length() {
            let input: HtmlInputElement = inputs.get(i).unwrap().dyn_into().unwrap();
            if input.checked() {
                checked.push(input.id());
            }
        }
        assert_eq!(inputs.length(), 20);
        assert_eq!(checked, vec!["glyph_r16_c3".to_string(), "glyph_r17_c2".to_string()]);

        body.remove_child(&container).unwrap();
    }

    #[wasm_bindgen_test]
    fn test_batch_cards_render_optional_docx() {
        let doc = doc();
        let container = doc.create_element("div").unwrap();
        container.set_inner_html("<p>stale</p>");
        let items = vec![
            BatchItem {
                company_id: "acme".to_string(),
                pdf_url: "/files/acme.pdf".to_string(),
                docx_url: Some("/files/acme.docx".to_string()),
            },
            BatchItem {
                company_id: "<b>globex</b>".to_string(),
                pdf_url: "/files/globex.pdf".to_string(),
                docx_url: None,
            },
        ];
        render_batch_results(&doc, &container, &items).unwrap();

        assert_eq!(container.child_element_count(), 2);
        let serials = container.query_selector_all(".serial").unwrap();
        assert_eq!(serials.get(0).unwrap().text_content().unwrap(), "01");
        assert_eq!(serials.get(1).unwrap().text_content().unwrap(), "02");

        let second = container.last_element_child().unwrap();
        assert_eq!(second.query_selector_all("a").unwrap().length(), 1);
        assert!(second.query_selector("b").unwrap().is_none());
    }
}
