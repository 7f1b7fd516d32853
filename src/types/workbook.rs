use serde::{Deserialize, Serialize};

use super::CellData;

/// A spreadsheet package opened for scanning.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Workbook {
    /// Sheets in workbook order.
    pub sheets: Vec<Sheet>,
}

impl Workbook {
    /// Sheet names in container order.
    #[must_use]
    pub fn sheet_names(&self) -> Vec<String> {
        self.sheets.iter().map(|s| s.name.clone()).collect()
    }
}

/// A single worksheet
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sheet {
    pub name: String,
    /// Package part holding this sheet's markup (e.g. `xl/worksheets/sheet1.xml`).
    pub path: String,
    /// Populated cells, sorted row-major.
    pub cells: Vec<CellData>,
    /// 1-based extent of populated rows (at least 1).
    pub max_row: u32,
    /// 1-based extent of populated columns (at least 1).
    pub max_col: u32,
}

impl Sheet {
    /// Cell at 0-indexed (row, col), if populated.
    #[must_use]
    pub fn cell_at(&self, row: u32, col: u32) -> Option<&CellData> {
        self.cells
            .binary_search_by(|cd| (cd.r, cd.c).cmp(&(row, col)))
            .ok()
            .and_then(|idx| self.cells.get(idx))
    }

    /// Cell at an A1-style address, if populated.
    #[must_use]
    pub fn cell_by_ref(&self, cell_ref: &str) -> Option<&CellData> {
        let (col, row) = crate::cell_ref::parse_cell_ref(cell_ref)?;
        self.cell_at(row, col)
    }
}
