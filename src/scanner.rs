//! Placeholder scanner
//!
//! Walks every populated cell of every sheet and reports each `{{name}}`
//! token together with its location. Scanning is read-only and
//! deterministic: the same workbook always yields the same ordered list.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::cell_ref::column_letter;
use crate::types::{AnalysisResult, FileInfo, PlaceholderOccurrence, Sheet, SheetSummary, Workbook};

/// `{{name}}`, where `name` is one or more characters other than `}`.
#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{\{([^}]+)\}\}").expect("literal placeholder pattern"));

/// Placeholder names in `text`, in order of appearance, trimmed.
///
/// Names that are blank after trimming (`{{  }}`) are skipped.
pub fn placeholders(text: &str) -> impl Iterator<Item = &str> {
    PLACEHOLDER
        .captures_iter(text)
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim())
        .filter(|name| !name.is_empty())
}

/// Occurrences in one sheet, row-major then column-major.
pub fn scan_sheet(sheet: &Sheet) -> Vec<PlaceholderOccurrence> {
    let mut found = Vec::new();
    // cells are kept sorted row-major by the reader
    for cd in &sheet.cells {
        let text = cd.cell.text();
        if !text.contains("{{") {
            continue;
        }
        for name in placeholders(text) {
            found.push(PlaceholderOccurrence {
                pattern: name.to_string(),
                cell: cd.address(),
                row: cd.row(),
                column: cd.column(),
                column_letter: column_letter(cd.c),
                original_value: text.to_string(),
                sheet: sheet.name.clone(),
            });
        }
    }
    found
}

/// Occurrences across the whole workbook, sheet by sheet in workbook order.
pub fn scan(workbook: &Workbook) -> Vec<PlaceholderOccurrence> {
    workbook.sheets.iter().flat_map(scan_sheet).collect()
}

/// Build the full analysis of a workbook.
///
/// `file_id` correlates the result with the template or upload it came from.
pub fn analyze(workbook: &Workbook, file_id: Option<&str>) -> AnalysisResult {
    let mut result = AnalysisResult {
        file_info: FileInfo {
            sheet_names: workbook.sheet_names(),
            total_sheets: workbook.sheets.len(),
        },
        file_id: file_id.map(ToString::to_string),
        ..AnalysisResult::default()
    };

    for sheet in &workbook.sheets {
        let input_fields = scan_sheet(sheet);
        result.input_fields.extend(input_fields.iter().cloned());
        result.sheets.insert(
            sheet.name.clone(),
            SheetSummary {
                name: sheet.name.clone(),
                max_row: sheet.max_row,
                max_column: sheet.max_col,
                input_fields,
            },
        );
    }

    log::debug!(
        "analysis found {} placeholder occurrence(s) in {} sheet(s)",
        result.input_fields.len(),
        result.file_info.total_sheets
    );

    result
}
