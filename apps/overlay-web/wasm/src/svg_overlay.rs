//! SVG drawing surface laid over the PDF canvas
//!
//! The SVG shares the canvas' pixel size and uses a `0 0 width height`
//! viewBox, so draw-list coordinates map 1:1 onto the rendered page.

use crate::error::JsResultExt;
use overlay_core::overlay::{DrawSurface, TextElement, TickMark, CHECKMARK};
use overlay_core::{Result, Viewport};
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CssStyleDeclaration, Document, Element, HtmlElement, SvgElement};

pub const SVG_NS: &str = "http://www.w3.org/2000/svg";

/// Draws overlay elements as SVG `<text>` nodes
pub struct SvgSurface {
    svg: Element,
    document: Document,
}

impl SvgSurface {
    pub fn new(svg: Element) -> std::result::Result<Self, JsValue> {
        let document = svg
            .owner_document()
            .ok_or_else(|| JsValue::from_str("SVG element is detached"))?;
        Ok(Self { svg, document })
    }

    fn text_node(&self, x: f64, y: f64, font_size: f64) -> std::result::Result<Element, JsValue> {
        let node = self.document.create_element_ns(Some(SVG_NS), "text")?;
        node.set_attribute("x", &format!("{:.2}", x))?;
        node.set_attribute("y", &format!("{:.2}", y))?;
        node.set_attribute("font-size", &format!("{:.2}", font_size))?;
        Ok(node)
    }

    fn append_text(&self, text: &TextElement) -> std::result::Result<(), JsValue> {
        let node = self.text_node(text.x, text.y, text.font_size)?;
        node.set_attribute("fill", &text.fill)?;
        node.set_attribute("font-family", &text.font_family)?;
        if text.italic {
            node.set_attribute("font-style", "italic")?;
        }
        node.set_attribute("data-variant", variant_name(text))?;
        node.set_text_content(Some(&text.text));
        self.svg.append_child(&node)?;
        Ok(())
    }

    fn append_tick(&self, tick: &TickMark) -> std::result::Result<(), JsValue> {
        let node = self.text_node(tick.x, tick.y, tick.font_size)?;
        node.set_attribute("class", "tick")?;
        node.set_attribute("font-weight", "700")?;
        node.set_attribute("data-tick", &tick.id)?;
        node.set_text_content(Some(CHECKMARK));
        self.svg.append_child(&node)?;
        Ok(())
    }
}

fn variant_name(text: &TextElement) -> &'static str {
    match text.variant {
        overlay_core::overlay::TextVariant::Placeholder => "placeholder",
        overlay_core::overlay::TextVariant::Selected => "selected",
    }
}

impl DrawSurface for SvgSurface {
    fn clear(&mut self) -> Result<()> {
        crate::dom::clear_children(&self.svg).or_overlay()
    }

    fn draw_text(&mut self, text: &TextElement) -> Result<()> {
        self.append_text(text).or_overlay()
    }

    fn draw_tick(&mut self, tick: &TickMark) -> Result<()> {
        self.append_tick(tick).or_overlay()
    }
}

/// Inline style of an SVG or HTML element
pub fn inline_style(el: &Element) -> Option<CssStyleDeclaration> {
    if let Some(svg) = el.dyn_ref::<SvgElement>() {
        return Some(svg.style());
    }
    el.dyn_ref::<HtmlElement>().map(|html| html.style())
}

/// Match the overlay's coordinate space and CSS box to a viewport
pub fn fit_to_viewport(svg: &Element, viewport: &Viewport) -> std::result::Result<(), JsValue> {
    svg.set_attribute(
        "viewBox",
        &format!("0 0 {} {}", viewport.width, viewport.height),
    )?;
    let style = inline_style(svg).ok_or_else(|| JsValue::from_str("overlay has no inline style"))?;
    style.set_property("width", &format!("{}px", viewport.width))?;
    style.set_property("height", &format!("{}px", viewport.height))?;
    Ok(())
}
