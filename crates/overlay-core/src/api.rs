//! Request and response bodies of the document server

use crate::grid;
use crate::snapshot::{SelectionSnapshot, TickId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Text shown for an unset project level in exported content
pub const PROJECT_LEVEL_PLACEHOLDER: &str = "<Choose a Project Level.>";

/// Prefill values read from an uploaded regulatory document (`POST /extract`)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractResponse {
    #[serde(default)]
    pub medical: Option<String>,
    #[serde(default)]
    pub lines: Vec<String>,
    #[serde(default)]
    pub ticks: BTreeMap<String, bool>,
}

impl ExtractResponse {
    pub fn medical_or_dash(&self) -> &str {
        self.medical
            .as_deref()
            .filter(|m| !m.is_empty())
            .unwrap_or("\u{2014}")
    }

    pub fn lines_text(&self) -> String {
        if self.lines.is_empty() {
            "No lines returned.".to_string()
        } else {
            self.lines.join("\n")
        }
    }
}

/// Body of `POST /export`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    pub company_id: String,
    #[serde(rename = "projectLevel")]
    pub project_level: Option<String>,
    pub ticks: BTreeMap<String, bool>,
}

impl ExportRequest {
    pub fn new(snapshot: &SelectionSnapshot, company_id: impl Into<String>) -> Self {
        Self {
            company_id: company_id.into(),
            project_level: snapshot.project_level.clone(),
            ticks: snapshot.ticks.clone(),
        }
    }
}

/// Links to the generated documents of one export
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportLinks {
    pub pdf_url: String,
    #[serde(default)]
    pub docx_url: Option<String>,
}

/// Result of `POST /batch`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchResponse {
    pub processed: u32,
    pub zip_url: String,
    #[serde(default)]
    pub items: Vec<BatchItem>,
}

impl BatchResponse {
    pub fn processed_label(&self) -> String {
        format!("Processed: {}", self.processed)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BatchItem {
    pub company_id: String,
    pub pdf_url: String,
    #[serde(default)]
    pub docx_url: Option<String>,
}

/// A download link on a batch result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardLink {
    pub label: &'static str,
    pub href: String,
}

/// Display model of one batch result card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchCard {
    pub serial: String,
    pub company_id: String,
    pub links: Vec<CardLink>,
}

impl BatchCard {
    /// Card for the item at zero-based `index`
    pub fn new(index: usize, item: &BatchItem) -> Self {
        let mut links = vec![CardLink {
            label: "Download PDF",
            href: item.pdf_url.clone(),
        }];
        if let Some(docx) = &item.docx_url {
            links.push(CardLink {
                label: "Download DOCX",
                href: docx.clone(),
            });
        }
        Self {
            serial: serial_label(index),
            company_id: item.company_id.clone(),
            links,
        }
    }
}

/// 1-based serial, zero-padded to two digits
pub fn serial_label(index: usize) -> String {
    format!("{:02}", index + 1)
}

pub fn batch_cards(items: &[BatchItem]) -> Vec<BatchCard> {
    items
        .iter()
        .enumerate()
        .map(|(i, item)| BatchCard::new(i, item))
        .collect()
}

/// `snapshot` form field of `POST /api/export`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentPayload {
    pub content: Vec<String>,
}

impl ContentPayload {
    pub fn from_snapshot(snapshot: &SelectionSnapshot) -> Self {
        Self {
            content: snapshot_to_lines(snapshot),
        }
    }
}

/// Human-readable content lines the server injects into the template
///
/// First line is the project level, then one line per row that has at least
/// one tick, rows ascending and regions in column order.
pub fn snapshot_to_lines(snapshot: &SelectionSnapshot) -> Vec<String> {
    let mut lines = vec![format!(
        "Project Level: {}",
        snapshot
            .selected_level()
            .unwrap_or(PROJECT_LEVEL_PLACEHOLDER)
    )];

    let mut picked: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
    for id in snapshot.ticked_ids() {
        if let Some(tick) = TickId::parse(id) {
            picked.entry(tick.row).or_default().push(tick.col);
        }
    }

    for (row, mut cols) in picked {
        cols.sort_unstable();
        let name = grid::category(row)
            .map(|c| c.short_name.to_string())
            .unwrap_or_else(|| format!("Row {}", row));
        let regions: Vec<String> = cols
            .into_iter()
            .map(|col| {
                grid::region(col)
                    .map(|r| r.name.to_string())
                    .unwrap_or_else(|| format!("C{}", col))
            })
            .collect();
        lines.push(format!("{}: {}", name, regions.join(", ")));
    }

    lines
}
