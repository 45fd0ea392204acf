//! Selection snapshot and the identifiers it is keyed by

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

lazy_static! {
    static ref TICK_ID: Regex = Regex::new(r"^glyph_r(\d+)_c(\d+)$").unwrap();
}

/// Copy of the current user selections handed to the renderer and the network layer.
///
/// A tick id missing from `ticks` reads as unticked.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionSnapshot {
    #[serde(rename = "projectLevel")]
    pub project_level: Option<String>,
    #[serde(default)]
    pub ticks: BTreeMap<String, bool>,
}

impl SelectionSnapshot {
    pub fn new(project_level: Option<String>, ticks: BTreeMap<String, bool>) -> Self {
        Self {
            project_level,
            ticks,
        }
    }

    /// Whether the given tick is set
    pub fn is_ticked(&self, id: &str) -> bool {
        self.ticks.get(id).copied().unwrap_or(false)
    }

    /// Project level to display, `None` while the placeholder is showing
    pub fn selected_level(&self) -> Option<&str> {
        self.project_level.as_deref().filter(|v| !v.is_empty())
    }

    /// Ids of all ticks currently set, in key order
    pub fn ticked_ids(&self) -> impl Iterator<Item = &str> {
        self.ticks
            .iter()
            .filter(|(_, on)| **on)
            .map(|(id, _)| id.as_str())
    }
}

/// Row/column address of a tick box, rendered as `glyph_r<row>_c<col>`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TickId {
    pub row: u32,
    pub col: u32,
}

impl TickId {
    pub fn new(row: u32, col: u32) -> Self {
        Self { row, col }
    }

    /// Parse a `glyph_r<row>_c<col>` id. Anything else yields `None`.
    pub fn parse(id: &str) -> Option<Self> {
        let caps = TICK_ID.captures(id)?;
        let row = caps[1].parse().ok()?;
        let col = caps[2].parse().ok()?;
        Some(Self { row, col })
    }
}

impl fmt::Display for TickId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "glyph_r{}_c{}", self.row, self.col)
    }
}

/// Project levels accepted as a persisted default
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProjectLevel {
    L1,
    L2L,
    L2,
    L3L,
}

impl ProjectLevel {
    pub const ALL: [ProjectLevel; 4] = [
        ProjectLevel::L1,
        ProjectLevel::L2L,
        ProjectLevel::L2,
        ProjectLevel::L3L,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectLevel::L1 => "L1",
            ProjectLevel::L2L => "L2L",
            ProjectLevel::L2 => "L2",
            ProjectLevel::L3L => "L3L",
        }
    }

    /// Normalize a raw value against the allow-list
    pub fn parse(value: &str) -> Option<Self> {
        let v = value.trim();
        Self::ALL.into_iter().find(|level| level.as_str() == v)
    }
}

impl fmt::Display for ProjectLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tick_id_parse_and_format() {
        let id = TickId::parse("glyph_r16_c2").unwrap();
        assert_eq!(id, TickId::new(16, 2));
        assert_eq!(id.to_string(), "glyph_r16_c2");
    }

    #[test]
    fn test_tick_id_rejects_malformed() {
        assert_eq!(TickId::parse("glyph_r16"), None);
        assert_eq!(TickId::parse("glyph_rX_c2"), None);
        assert_eq!(TickId::parse(" glyph_r16_c2"), None);
        assert_eq!(TickId::parse("capa_yes"), None);
    }

    #[test]
    fn test_absent_tick_reads_false() {
        let snap = SelectionSnapshot::default();
        assert!(!snap.is_ticked("glyph_r16_c2"));
    }

    #[test]
    fn test_snapshot_wire_format() {
        let mut ticks = BTreeMap::new();
        ticks.insert("glyph_r16_c2".to_string(), true);
        let snap = SelectionSnapshot::new(Some("L2".to_string()), ticks);
        let json = serde_json::to_string(&snap).unwrap();
        assert_eq!(json, r#"{"projectLevel":"L2","ticks":{"glyph_r16_c2":true}}"#);

        let empty: SelectionSnapshot = serde_json::from_str(r#"{"projectLevel":null}"#).unwrap();
        assert_eq!(empty, SelectionSnapshot::default());
    }

    #[test]
    fn test_selected_level_treats_empty_as_placeholder() {
        let snap = SelectionSnapshot::new(Some(String::new()), BTreeMap::new());
        assert_eq!(snap.selected_level(), None);
    }

    #[test]
    fn test_project_level_allow_list() {
        assert_eq!(ProjectLevel::parse(" L2L "), Some(ProjectLevel::L2L));
        assert_eq!(ProjectLevel::parse("L4"), None);
        assert_eq!(ProjectLevel::parse(""), None);
        for level in ProjectLevel::ALL {
            assert_eq!(ProjectLevel::parse(level.as_str()), Some(level));
        }
    }
}
