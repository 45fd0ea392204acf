//! Overlay composition for the reference page
//!
//! [`compose`] turns a snapshot and a viewport into an ordered draw list;
//! [`OverlayRenderer`] clears a [`DrawSurface`] and replays that list on it.
//! Every render is a full clear-and-redraw, there is no diffing.

use crate::error::Result;
use crate::layout::{OverlayLayoutMap, PageLayout, TextStyle};
use crate::snapshot::SelectionSnapshot;
use crate::viewport::Viewport;
use serde::Serialize;
use tracing::{debug, warn};

pub const CHECKMARK: &str = "\u{2713}";

/// Checkmark font size at scale 1, in pixels
pub const TICK_SIZE_PX: f64 = 14.0;

/// Baseline of the dropdown text, as a fraction of the box height
const TEXT_BASELINE_RATIO: f64 = 0.8;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextVariant {
    Placeholder,
    Selected,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextElement {
    pub x: f64,
    pub y: f64,
    pub text: String,
    pub variant: TextVariant,
    pub fill: String,
    pub font_size: f64,
    pub font_family: String,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TickMark {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub font_size: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum OverlayElement {
    Text(TextElement),
    Tick(TickMark),
}

/// Something the overlay can be painted on
pub trait DrawSurface {
    /// Remove everything previously drawn
    fn clear(&mut self) -> Result<()>;

    fn draw_text(&mut self, text: &TextElement) -> Result<()>;

    fn draw_tick(&mut self, tick: &TickMark) -> Result<()>;

    fn draw(&mut self, element: &OverlayElement) -> Result<()> {
        match element {
            OverlayElement::Text(text) => self.draw_text(text),
            OverlayElement::Tick(tick) => self.draw_tick(tick),
        }
    }
}

/// Build the draw list: dropdown text first, then ticks in layout order
pub fn compose(
    page: &PageLayout,
    snapshot: &SelectionSnapshot,
    viewport: &Viewport,
) -> Vec<OverlayElement> {
    let mut elements = Vec::with_capacity(page.ticks.len() + 1);

    if let Some(dd) = &page.dropdown {
        let (text, variant, style) = match snapshot.selected_level() {
            Some(level) => (level, TextVariant::Selected, &dd.styles.selected),
            None => (dd.placeholder(), TextVariant::Placeholder, &dd.styles.placeholder),
        };
        let (x, y) = viewport.to_px(dd.x, dd.y);
        let (_, h) = viewport.to_px(dd.w, dd.h);
        elements.push(OverlayElement::Text(text_element(
            x,
            y + h * TEXT_BASELINE_RATIO,
            text,
            variant,
            style,
            viewport,
        )));
    }

    let tick_size = TICK_SIZE_PX * viewport.scale;
    for tick in &page.ticks {
        if !snapshot.is_ticked(&tick.id) {
            continue;
        }
        let (x, y) = viewport.to_px(tick.x, tick.y);
        elements.push(OverlayElement::Tick(TickMark {
            id: tick.id.clone(),
            x,
            y,
            font_size: tick_size,
        }));
    }

    elements
}

fn text_element(
    x: f64,
    y: f64,
    text: &str,
    variant: TextVariant,
    style: &TextStyle,
    viewport: &Viewport,
) -> TextElement {
    TextElement {
        x,
        y,
        text: text.to_string(),
        variant,
        fill: style.color().to_string(),
        font_size: viewport.pt_to_px(style.font_size_pt()),
        font_family: style.font_family().to_string(),
        italic: style.italic,
    }
}

/// Draws snapshots of the selection onto a surface using page 1 of a layout map
pub struct OverlayRenderer<S> {
    surface: S,
    page: PageLayout,
}

impl<S: DrawSurface> OverlayRenderer<S> {
    pub fn new(surface: S, layout: &OverlayLayoutMap) -> Result<Self> {
        let page = layout.first_page()?.clone();
        if page.dropdown.as_ref().is_some_and(|dd| dd.values.is_empty()) {
            warn!("overlay dropdown declares no values; placeholder text will be empty");
        }
        Ok(Self { surface, page })
    }

    /// Clear the surface and draw the snapshot. Returns the number of elements drawn.
    pub fn render(&mut self, snapshot: &SelectionSnapshot, viewport: &Viewport) -> Result<usize> {
        let elements = compose(&self.page, snapshot, viewport);
        self.surface.clear()?;
        for element in &elements {
            self.surface.draw(element)?;
        }
        debug!(
            elements = elements.len(),
            width = viewport.width,
            height = viewport.height,
            scale = viewport.scale,
            "overlay rendered"
        );
        Ok(elements.len())
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }
}

/// In-memory surface that keeps what was drawn since the last clear
#[derive(Debug, Default, Clone)]
pub struct MemorySurface {
    elements: Vec<OverlayElement>,
    clears: usize,
}

impl MemorySurface {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn elements(&self) -> &[OverlayElement] {
        &self.elements
    }

    pub fn clear_count(&self) -> usize {
        self.clears
    }

    pub fn ticks(&self) -> impl Iterator<Item = &TickMark> {
        self.elements.iter().filter_map(|e| match e {
            OverlayElement::Tick(t) => Some(t),
            OverlayElement::Text(_) => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &TextElement> {
        self.elements.iter().filter_map(|e| match e {
            OverlayElement::Text(t) => Some(t),
            OverlayElement::Tick(_) => None,
        })
    }
}

impl DrawSurface for MemorySurface {
    fn clear(&mut self) -> Result<()> {
        self.elements.clear();
        self.clears += 1;
        Ok(())
    }

    fn draw_text(&mut self, text: &TextElement) -> Result<()> {
        self.elements.push(OverlayElement::Text(text.clone()));
        Ok(())
    }

    fn draw_tick(&mut self, tick: &TickMark) -> Result<()> {
        self.elements.push(OverlayElement::Tick(tick.clone()));
        Ok(())
    }
}


#[cfg(test)]
mod proptests {
    use super::*;
    use crate::layout::{PageLayout, TickDescriptor};
    use proptest::prelude::*;
    use std::collections::BTreeMap;

    fn page_with_ticks(n: u32) -> PageLayout {
        PageLayout {
            dropdown: None,
            ticks: (0..n)
                .map(|i| TickDescriptor {
                    id: format!("glyph_r{}_c2", 16 + i),
                    x: 0.1,
                    y: 0.1 * f64::from(i),
                })
                .collect(),
        }
    }

    proptest! {
        /// Property: exactly the declared and ticked ids are drawn
        #[test]
        fn draws_declared_true_ticks_only(
            set in prop::collection::btree_map("glyph_r(1[6-9]|2[0-9])_c2", any::<bool>(), 0..20),
        ) {
            let page = page_with_ticks(5);
            let snap = SelectionSnapshot::new(None, set.clone());
            let drawn = compose(&page, &snap, &Viewport::new(100.0, 100.0, 1.0));

            let expected = page
                .ticks
                .iter()
                .filter(|t| set.get(&t.id).copied().unwrap_or(false))
                .count();
            prop_assert_eq!(drawn.len(), expected);
        }

        /// Property: composing twice yields the same draw list
        #[test]
        fn compose_is_deterministic(
            w in 1.0f64..3000.0,
            h in 1.0f64..3000.0,
            scale in 0.5f64..3.0,
        ) {
            let page = page_with_ticks(5);
            let ticks: BTreeMap<String, bool> =
                page.ticks.iter().map(|t| (t.id.clone(), true)).collect();
            let snap = SelectionSnapshot::new(Some("L1".into()), ticks);
            let vp = Viewport::new(w, h, scale);
            prop_assert_eq!(compose(&page, &snap, &vp), compose(&page, &snap, &vp));
        }
    }
}
