use serde::{Deserialize, Serialize};

/// Cell with position
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CellData {
    pub r: u32, // row (0-indexed)
    pub c: u32, // col (0-indexed)
    pub cell: Cell,
}

impl CellData {
    /// 1-based row, as reported to consumers.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.r.saturating_add(1)
    }

    /// 1-based column, as reported to consumers.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.c.saturating_add(1)
    }

    /// A1-style address of this cell.
    #[must_use]
    pub fn address(&self) -> String {
        crate::cell_ref::cell_address(self.r, self.c)
    }
}

/// A single populated cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cell {
    /// Raw `<v>` text, or the inline string for `inlineStr` cells.
    pub raw: String,
    /// Cell type: s=string, n=number, b=boolean, e=error
    pub t: CellType,
    /// Resolved display text when it differs from `raw`
    /// (shared-string lookup, boolean literal).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
}

impl Cell {
    /// The cell value coerced to text.
    #[must_use]
    pub fn text(&self) -> &str {
        self.display.as_deref().unwrap_or(&self.raw)
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum CellType {
    #[serde(rename = "s")]
    String,
    #[serde(rename = "n")]
    Number,
    #[serde(rename = "b")]
    Boolean,
    #[serde(rename = "e")]
    Error,
}
