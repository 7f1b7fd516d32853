//! Test fixtures for generating valid XLSX files in memory.
//!
//! This module provides builders for creating XLSX files programmatically,
//! useful for testing the reader, scanner and patcher with known inputs.
//!
//! # Example
//!
//! ```rust,ignore
//! use fixtures::{CellValue, XlsxBuilder};
//!
//! let xlsx = XlsxBuilder::new()
//!     .add_sheet("Invoice")
//!     .add_cell("A1", "Dear {{Name}},")
//!     .add_styled_cell("B2", 42, STYLE_BOLD)
//!     .add_merge("A1:C1")
//!     .build();
//!
//! let workbook = xlfill::parser::open(&xlsx).unwrap();
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::io::{Cursor, Write};
use zip::write::FileOptions;
use zip::ZipWriter;

/// Default cell format.
pub const STYLE_DEFAULT: u32 = 0;
/// Bold font.
pub const STYLE_BOLD: u32 = 1;
/// Solid yellow fill.
pub const STYLE_FILL: u32 = 2;

// ============================================================================
// Cell Value
// ============================================================================

/// Represents a cell value that can be added to a sheet.
#[derive(Debug, Clone)]
pub enum CellValue {
    /// A shared string.
    String(String),
    /// An inline string (`t="inlineStr"`).
    InlineString(String),
    /// A shared string made of formatting runs: (text, bold).
    RichString(Vec<(String, bool)>),
    /// A numeric value.
    Number(f64),
    /// A boolean value.
    Boolean(bool),
    /// A formula with its cached string result.
    Formula { formula: String, cached: String },
}

impl From<&str> for CellValue {
    fn from(s: &str) -> Self {
        CellValue::String(s.to_string())
    }
}

impl From<String> for CellValue {
    fn from(s: String) -> Self {
        CellValue::String(s)
    }
}

impl From<f64> for CellValue {
    fn from(n: f64) -> Self {
        CellValue::Number(n)
    }
}

impl From<i32> for CellValue {
    fn from(n: i32) -> Self {
        CellValue::Number(f64::from(n))
    }
}

impl From<bool> for CellValue {
    fn from(b: bool) -> Self {
        CellValue::Boolean(b)
    }
}

// ============================================================================
// Sheet Builder
// ============================================================================

/// A cell in the sheet.
#[derive(Debug, Clone)]
pub struct CellEntry {
    pub cell_ref: String,
    pub value: CellValue,
    pub style: Option<u32>,
}

/// Builder for a single worksheet.
#[derive(Debug, Clone, Default)]
pub struct SheetBuilder {
    pub name: String,
    pub cells: Vec<CellEntry>,
    pub merges: Vec<String>,
}

impl SheetBuilder {
    /// Create a new sheet builder with the given name.
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    /// Add a cell.
    #[must_use]
    pub fn cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style: None,
        });
        self
    }

    /// Add a cell with a style index.
    #[must_use]
    pub fn styled_cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V, style: u32) -> Self {
        self.cells.push(CellEntry {
            cell_ref: cell_ref.to_string(),
            value: value.into(),
            style: Some(style),
        });
        self
    }

    /// Add a merge range, e.g. `"A1:B2"`.
    #[must_use]
    pub fn merge(mut self, range: &str) -> Self {
        self.merges.push(range.to_string());
        self
    }
}

// ============================================================================
// XLSX Builder
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
enum SharedEntry {
    Plain(String),
    Rich(Vec<(String, bool)>),
}

/// Builder for a complete package.
#[derive(Debug, Default)]
pub struct XlsxBuilder {
    sheets: Vec<SheetBuilder>,
    extra_parts: Vec<(String, Vec<u8>)>,
    stored: bool,
}

impl XlsxBuilder {
    /// Create a new XLSX builder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a prepared sheet.
    #[must_use]
    pub fn sheet(mut self, sheet: SheetBuilder) -> Self {
        self.sheets.push(sheet);
        self
    }

    /// Add a simple sheet by name (returns a builder for chaining).
    #[must_use]
    pub fn add_sheet(self, name: &str) -> XlsxSheetAdder {
        XlsxSheetAdder {
            builder: self,
            sheet: SheetBuilder::new(name),
        }
    }

    /// Add an arbitrary part (e.g. media or a comments part).
    #[must_use]
    pub fn part(mut self, name: &str, data: &[u8]) -> Self {
        self.extra_parts.push((name.to_string(), data.to_vec()));
        self
    }

    /// Write entries without compression.
    #[must_use]
    pub fn stored(mut self) -> Self {
        self.stored = true;
        self
    }

    /// Build the XLSX file as bytes.
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let method = if self.stored {
            zip::CompressionMethod::Stored
        } else {
            zip::CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);

        let mut shared: Vec<SharedEntry> = Vec::new();
        for sheet in &self.sheets {
            for cell in &sheet.cells {
                let entry = match &cell.value {
                    CellValue::String(s) => SharedEntry::Plain(s.clone()),
                    CellValue::RichString(runs) => SharedEntry::Rich(runs.clone()),
                    _ => continue,
                };
                if !shared.contains(&entry) {
                    shared.push(entry);
                }
            }
        }

        let mut write = |name: &str, data: &[u8]| {
            zip.start_file(name, options).unwrap();
            zip.write_all(data).unwrap();
        };

        write(
            "[Content_Types].xml",
            generate_content_types(self.sheets.len()).as_bytes(),
        );
        write("_rels/.rels", generate_rels().as_bytes());
        write(
            "xl/_rels/workbook.xml.rels",
            generate_workbook_rels(self.sheets.len()).as_bytes(),
        );
        write("xl/workbook.xml", generate_workbook(&self.sheets).as_bytes());
        write("xl/styles.xml", STYLES_XML.as_bytes());
        if !shared.is_empty() {
            write(
                "xl/sharedStrings.xml",
                generate_shared_strings(&shared).as_bytes(),
            );
        }
        for (i, sheet) in self.sheets.iter().enumerate() {
            let path = format!("xl/worksheets/sheet{}.xml", i + 1);
            write(&path, generate_sheet_xml(sheet, &shared).as_bytes());
        }
        for (name, data) in &self.extra_parts {
            write(name, data);
        }

        zip.finish().expect("Failed to finish ZIP").into_inner()
    }
}

/// Helper for fluent sheet building within `XlsxBuilder`.
pub struct XlsxSheetAdder {
    builder: XlsxBuilder,
    sheet: SheetBuilder,
}

impl XlsxSheetAdder {
    /// Add a cell to the current sheet.
    #[must_use]
    pub fn add_cell<V: Into<CellValue>>(mut self, cell_ref: &str, value: V) -> Self {
        self.sheet = self.sheet.cell(cell_ref, value);
        self
    }

    /// Add a styled cell to the current sheet.
    #[must_use]
    pub fn add_styled_cell<V: Into<CellValue>>(
        mut self,
        cell_ref: &str,
        value: V,
        style: u32,
    ) -> Self {
        self.sheet = self.sheet.styled_cell(cell_ref, value, style);
        self
    }

    /// Add a merge range to the current sheet.
    #[must_use]
    pub fn add_merge(mut self, range: &str) -> Self {
        self.sheet = self.sheet.merge(range);
        self
    }

    /// Finish the current sheet and return the builder.
    #[must_use]
    pub fn done(mut self) -> XlsxBuilder {
        self.builder.sheets.push(self.sheet);
        self.builder
    }

    /// Build the XLSX directly (finishes the current sheet automatically).
    #[must_use]
    pub fn build(self) -> Vec<u8> {
        self.done().build()
    }
}

// ============================================================================
// XML Generation
// ============================================================================

const STYLES_XML: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<styleSheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><fonts count="2"><font><sz val="11"/><name val="Calibri"/></font><font><b/><sz val="11"/><name val="Calibri"/></font></fonts><fills count="3"><fill><patternFill patternType="none"/></fill><fill><patternFill patternType="gray125"/></fill><fill><patternFill patternType="solid"><fgColor rgb="FFFFFF00"/></patternFill></fill></fills><borders count="1"><border><left/><right/><top/><bottom/><diagonal/></border></borders><cellStyleXfs count="1"><xf numFmtId="0" fontId="0" fillId="0" borderId="0"/></cellStyleXfs><cellXfs count="3"><xf numFmtId="0" fontId="0" fillId="0" borderId="0" xfId="0"/><xf numFmtId="0" fontId="1" fillId="0" borderId="0" xfId="0" applyFont="1"/><xf numFmtId="0" fontId="0" fillId="2" borderId="0" xfId="0" applyFill="1"/></cellXfs></styleSheet>"#;

/// Escape XML special characters.
pub fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn generate_content_types(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#);
    xml.push_str(r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#);
    xml.push_str(r#"<Default Extension="xml" ContentType="application/xml"/>"#);
    xml.push_str(r#"<Default Extension="png" ContentType="image/png"/>"#);
    xml.push_str(r#"<Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/styles.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml"/>"#);
    xml.push_str(r#"<Override PartName="/xl/sharedStrings.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml"/>"#);
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{i}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn generate_rels() -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    xml.push_str(r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/>"#);
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook_rels(sheet_count: usize) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );
    for i in 1..=sheet_count {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{i}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{i}.xml"/>"#
        ));
    }
    let rid = sheet_count + 1;
    xml.push_str(&format!(
        r#"<Relationship Id="rId{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles" Target="styles.xml"/>"#
    ));
    let rid = rid + 1;
    xml.push_str(&format!(
        r#"<Relationship Id="rId{rid}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings" Target="sharedStrings.xml"/>"#
    ));
    xml.push_str("</Relationships>");
    xml
}

fn generate_workbook(sheets: &[SheetBuilder]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(r#"<workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#);
    xml.push_str("<sheets>");
    for (i, sheet) in sheets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape_xml(&sheet.name),
            i + 1,
            i + 1
        ));
    }
    xml.push_str("</sheets></workbook>");
    xml
}

fn generate_shared_strings(entries: &[SharedEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(&format!(
        r#"<sst xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" count="{0}" uniqueCount="{0}">"#,
        entries.len()
    ));
    for entry in entries {
        xml.push_str("<si>");
        match entry {
            SharedEntry::Plain(s) => {
                xml.push_str(&format!(r#"<t xml:space="preserve">{}</t>"#, escape_xml(s)));
            }
            SharedEntry::Rich(runs) => {
                for (text, bold) in runs {
                    xml.push_str("<r>");
                    if *bold {
                        xml.push_str("<rPr><b/></rPr>");
                    }
                    xml.push_str(&format!(
                        r#"<t xml:space="preserve">{}</t>"#,
                        escape_xml(text)
                    ));
                    xml.push_str("</r>");
                }
            }
        }
        xml.push_str("</si>");
    }
    xml.push_str("</sst>");
    xml
}

fn row_of(cell_ref: &str) -> u32 {
    cell_ref
        .trim_start_matches(|c: char| c.is_ascii_alphabetic())
        .parse()
        .expect("cell reference needs a row")
}

fn generate_sheet_xml(sheet: &SheetBuilder, shared: &[SharedEntry]) -> String {
    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main">"#,
    );
    xml.push_str("<sheetData>");

    let mut cells: Vec<&CellEntry> = sheet.cells.iter().collect();
    cells.sort_by_key(|c| row_of(&c.cell_ref));

    let mut current_row = None;
    for cell in cells {
        let row = row_of(&cell.cell_ref);
        if current_row != Some(row) {
            if current_row.is_some() {
                xml.push_str("</row>");
            }
            xml.push_str(&format!(r#"<row r="{row}">"#));
            current_row = Some(row);
        }

        let style = cell.style.map(|s| format!(r#" s="{s}""#)).unwrap_or_default();
        let r = &cell.cell_ref;
        match &cell.value {
            CellValue::String(s) => {
                let idx = shared
                    .iter()
                    .position(|e| *e == SharedEntry::Plain(s.clone()))
                    .expect("shared string collected");
                xml.push_str(&format!(r#"<c r="{r}"{style} t="s"><v>{idx}</v></c>"#));
            }
            CellValue::RichString(runs) => {
                let idx = shared
                    .iter()
                    .position(|e| *e == SharedEntry::Rich(runs.clone()))
                    .expect("shared string collected");
                xml.push_str(&format!(r#"<c r="{r}"{style} t="s"><v>{idx}</v></c>"#));
            }
            CellValue::InlineString(s) => {
                xml.push_str(&format!(
                    r#"<c r="{r}"{style} t="inlineStr"><is><t>{}</t></is></c>"#,
                    escape_xml(s)
                ));
            }
            CellValue::Number(n) => {
                xml.push_str(&format!(r#"<c r="{r}"{style}><v>{n}</v></c>"#));
            }
            CellValue::Boolean(b) => {
                let v = u8::from(*b);
                xml.push_str(&format!(r#"<c r="{r}"{style} t="b"><v>{v}</v></c>"#));
            }
            CellValue::Formula { formula, cached } => {
                xml.push_str(&format!(
                    r#"<c r="{r}"{style} t="str"><f>{}</f><v>{}</v></c>"#,
                    escape_xml(formula),
                    escape_xml(cached)
                ));
            }
        }
    }
    if current_row.is_some() {
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData>");

    if !sheet.merges.is_empty() {
        xml.push_str(&format!(r#"<mergeCells count="{}">"#, sheet.merges.len()));
        for range in &sheet.merges {
            xml.push_str(&format!(r#"<mergeCell ref="{range}"/>"#));
        }
        xml.push_str("</mergeCells>");
    }

    xml.push_str("</worksheet>");
    xml
}
