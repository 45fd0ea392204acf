//! Busy indicator bookkeeping
//!
//! Overlapping actions each hold the indicator; it is hidden only when the
//! last one finishes. The label is the one of the most recent action.

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BusyState {
    depth: usize,
    label: Option<String>,
}

/// What the indicator should look like after a transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BusyView {
    Shown(String),
    Hidden,
}

impl BusyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.depth > 0
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn begin(&mut self, label: impl Into<String>) -> BusyView {
        self.depth += 1;
        let label = label.into();
        self.label = Some(label.clone());
        BusyView::Shown(label)
    }

    pub fn end(&mut self) -> BusyView {
        self.depth = self.depth.saturating_sub(1);
        if self.depth == 0 {
            self.label = None;
            BusyView::Hidden
        } else {
            BusyView::Shown(self.label.clone().unwrap_or_default())
        }
    }
}
