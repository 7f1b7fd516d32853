use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One location where a `{{name}}` placeholder appears.
///
/// Serialized with the field names the form renderer expects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlaceholderOccurrence {
    /// Placeholder name, trimmed and without braces.
    pub pattern: String,
    /// A1-style address of the containing cell.
    pub cell: String,
    /// 1-based row
    pub row: u32,
    /// 1-based column
    pub column: u32,
    pub column_letter: String,
    /// Full text of the containing cell.
    pub original_value: String,
    pub sheet: String,
}

/// Per-sheet part of an analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetSummary {
    pub name: String,
    pub max_row: u32,
    pub max_column: u32,
    pub input_fields: Vec<PlaceholderOccurrence>,
}

/// Workbook-level metadata.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FileInfo {
    pub sheet_names: Vec<String>,
    pub total_sheets: usize,
}

/// Everything the form renderer needs to build an input form for a template.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub sheets: BTreeMap<String, SheetSummary>,
    /// All occurrences across sheets, in workbook order.
    pub input_fields: Vec<PlaceholderOccurrence>,
    pub file_info: FileInfo,
    /// Identifier of the analysed source (template id or upload id).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

impl AnalysisResult {
    /// Distinct placeholder names, case-insensitively deduplicated,
    /// keeping the first spelling seen.
    #[must_use]
    pub fn distinct_patterns(&self) -> Vec<&str> {
        let mut seen = std::collections::HashSet::new();
        self.input_fields
            .iter()
            .filter(|o| seen.insert(crate::planner::fold_name(&o.pattern)))
            .map(|o| o.pattern.as_str())
            .collect()
    }
}
