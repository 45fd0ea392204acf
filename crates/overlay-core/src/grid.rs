//! Device-classification matrix: fixed device categories × regions

use crate::snapshot::TickId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Region {
    /// Column of the tick table in the generated document
    pub col: u32,
    pub name: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DeviceCategory {
    /// Row of the tick table in the generated document
    pub row: u32,
    pub label: &'static str,
    /// Name used in exported content lines
    pub short_name: &'static str,
}

pub static REGIONS: [Region; 4] = [
    Region { col: 2, name: "N. America" },
    Region { col: 3, name: "EMEA" },
    Region { col: 4, name: "LATAM" },
    Region { col: 5, name: "APAC" },
];

pub static CATEGORIES: [DeviceCategory; 5] = [
    DeviceCategory {
        row: 16,
        label: "General Purpose (GP)",
        short_name: "General Purpose (GP)",
    },
    DeviceCategory {
        row: 17,
        label: "Medical (MD)",
        short_name: "Medical (MD)",
    },
    DeviceCategory {
        row: 18,
        label: "In Vitro Diagnostics (IVD)",
        short_name: "In Vitro Diagnostics (IVD)",
    },
    DeviceCategory {
        row: 19,
        label: "Gen Purpose + Cell Gene Therapy (GP + CGT)",
        short_name: "Gen Purpose + Cell Gene Therapy (GP + CGT)",
    },
    DeviceCategory {
        row: 20,
        label: "Accessories in Scope (GP / MD / IVD / GP + CGT)",
        short_name: "Accessories in Scope",
    },
];

pub const HEADER_LABEL: &str = "Category";
pub const CELL_LABEL: &str = "Tick";

pub fn region(col: u32) -> Option<&'static Region> {
    REGIONS.iter().find(|r| r.col == col)
}

pub fn category(row: u32) -> Option<&'static DeviceCategory> {
    CATEGORIES.iter().find(|c| c.row == row)
}

/// One checkbox of the matrix
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCell {
    pub category: &'static DeviceCategory,
    pub region: &'static Region,
}

impl GridCell {
    pub fn tick_id(&self) -> TickId {
        TickId::new(self.category.row, self.region.col)
    }
}

/// Header texts: the category column followed by every region name
pub fn header() -> Vec<&'static str> {
    std::iter::once(HEADER_LABEL)
        .chain(REGIONS.iter().map(|r| r.name))
        .collect()
}

/// Rows of the matrix in display order, each with its cells in column order
pub fn rows() -> impl Iterator<Item = (&'static DeviceCategory, Vec<GridCell>)> {
    CATEGORIES.iter().map(|category| {
        let cells = REGIONS
            .iter()
            .map(|region| GridCell { category, region })
            .collect();
        (category, cells)
    })
}

/// Every tick id of the matrix, row-major
pub fn all_tick_ids() -> Vec<TickId> {
    rows()
        .flat_map(|(_, cells)| cells.into_iter().map(|c| c.tick_id()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;

    #[test]
    fn test_cell_count_is_rows_times_columns() {
        let ids = all_tick_ids();
        assert_eq!(ids.len(), CATEGORIES.len() * REGIONS.len());
        assert_eq!(ids.len(), 20);
        let unique: HashSet<_> = ids.iter().collect();
        assert_eq!(unique.len(), ids.len());
    }

    #[test]
    fn test_ids_are_reproducible() {
        for (category, cells) in rows() {
            for cell in cells {
                let expected = format!("glyph_r{}_c{}", category.row, cell.region.col);
                assert_eq!(cell.tick_id().to_string(), expected);
                assert_eq!(TickId::parse(&expected), Some(cell.tick_id()));
            }
        }
    }

    #[test]
    fn test_first_and_last_ids() {
        let ids = all_tick_ids();
        assert_eq!(ids.first().unwrap().to_string(), "glyph_r16_c2");
        assert_eq!(ids.last().unwrap().to_string(), "glyph_r20_c5");
    }

    #[test]
    fn test_header() {
        assert_eq!(
            header(),
            vec!["Category", "N. America", "EMEA", "LATAM", "APAC"]
        );
    }

    #[test]
    fn test_lookup() {
        assert_eq!(region(3).unwrap().name, "EMEA");
        assert_eq!(category(20).unwrap().short_name, "Accessories in Scope");
        assert!(region(6).is_none());
        assert!(category(15).is_none());
    }
}
