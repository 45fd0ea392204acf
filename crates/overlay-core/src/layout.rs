//! Server-declared overlay layout (normalized coordinates and text styles)

use crate::error::{OverlayError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Key of the only page the reference template has
pub const FIRST_PAGE: &str = "1";

const DEFAULT_FONT_SIZE_PT: f64 = 10.0;
const DEFAULT_COLOR: &str = "#000";
const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Overlay layout for every page of the reference document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverlayLayoutMap {
    pub pages: BTreeMap<String, PageLayout>,
}

impl OverlayLayoutMap {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Layout of page 1; the renderer only ever draws this page
    pub fn first_page(&self) -> Result<&PageLayout> {
        self.pages
            .get(FIRST_PAGE)
            .ok_or_else(|| OverlayError::Decode("overlay map has no page \"1\"".to_string()))
    }
}

/// Dropdown box and tick positions on one page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageLayout {
    #[serde(default)]
    pub dropdown: Option<DropdownDescriptor>,
    #[serde(default)]
    pub ticks: Vec<TickDescriptor>,
}

impl PageLayout {
    pub fn tick(&self, id: &str) -> Option<&TickDescriptor> {
        self.ticks.iter().find(|t| t.id == id)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DropdownDescriptor {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
    /// Candidate values; the first one doubles as placeholder text
    #[serde(default)]
    pub values: Vec<String>,
    #[serde(default)]
    pub styles: DropdownStyles,
}

impl DropdownDescriptor {
    pub fn placeholder(&self) -> &str {
        self.values.first().map(String::as_str).unwrap_or("")
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DropdownStyles {
    #[serde(default)]
    pub placeholder: TextStyle,
    #[serde(default)]
    pub selected: TextStyle,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size_pt: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default)]
    pub italic: bool,
}

impl TextStyle {
    pub fn font_size_pt(&self) -> f64 {
        self.font_size_pt.unwrap_or(DEFAULT_FONT_SIZE_PT)
    }

    pub fn color(&self) -> &str {
        self.color.as_deref().unwrap_or(DEFAULT_COLOR)
    }

    pub fn font_family(&self) -> &str {
        self.font_family.as_deref().unwrap_or(DEFAULT_FONT_FAMILY)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TickDescriptor {
    pub id: String,
    pub x: f64,
    pub y: f64,
}
