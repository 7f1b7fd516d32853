//! Relationship parsing - workbook relationships, sheet list, shared strings.

use quick_xml::events::Event;
use quick_xml::Reader;
use std::collections::HashMap;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::error::{Result, XlfillError};
use crate::xml_helpers::{attr_string, attr_string_suffix};

use super::worksheet::SheetInfo;
use super::{SHARED_STRINGS_PART, WORKBOOK_PART, WORKBOOK_RELS_PART};

/// Workbook relationships parsed from xl/_rels/workbook.xml.rels
///
/// Paths are resolved relative to the xl/ directory and stored as full paths.
#[derive(Default, Debug)]
pub(crate) struct WorkbookRelationships {
    /// Map of rId -> full path for worksheet relationships
    /// e.g., "rId1" -> "xl/worksheets/sheet1.xml"
    pub worksheets: HashMap<String, String>,
    /// Path to shared strings file (e.g., "xl/sharedStrings.xml")
    pub shared_strings: Option<String>,
}

/// Parse workbook relationships from xl/_rels/workbook.xml.rels
pub(crate) fn parse_workbook_relationships<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
) -> WorkbookRelationships {
    let mut rels = WorkbookRelationships::default();

    let Ok(file) = archive.by_name(WORKBOOK_RELS_PART) else {
        return rels; // Relationships file is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let id = attr_string(e, b"Id").unwrap_or_default();
                    let target = attr_string(e, b"Target").unwrap_or_default();
                    let rel_type = attr_string(e, b"Type").unwrap_or_default();

                    if target.is_empty() {
                        buf.clear();
                        continue;
                    }
                    let full_path = resolve_target(&target);

                    if rel_type.ends_with("/worksheet") && !id.is_empty() {
                        rels.worksheets.insert(id, full_path);
                    } else if rel_type.ends_with("/sharedStrings") {
                        rels.shared_strings = Some(full_path);
                    }
                }
            }
            Ok(Event::Eof) | Err(_) => break,
            _ => {}
        }
        buf.clear();
    }

    rels
}

/// Resolve a relationship target relative to `xl/`.
fn resolve_target(target: &str) -> String {
    if let Some(stripped) = target.strip_prefix('/') {
        stripped.to_string()
    } else {
        let mut parts: Vec<&str> = vec!["xl"];
        for segment in target.split('/') {
            match segment {
                "" | "." => {}
                ".." => {
                    parts.pop();
                }
                s => parts.push(s),
            }
        }
        parts.join("/")
    }
}

/// Get sheet names and part paths from xl/workbook.xml, in workbook order.
pub(crate) fn get_sheet_info<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    relationships: &HashMap<String, String>,
) -> Result<Vec<SheetInfo>> {
    let file = archive
        .by_name(WORKBOOK_PART)
        .map_err(|_| XlfillError::MalformedPackage(format!("missing {WORKBOOK_PART}")))?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(true);

    let mut sheets = Vec::new();
    let mut buf = Vec::new();

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Empty(ref e) | Event::Start(ref e)) => {
                if e.local_name().as_ref() == b"sheet" {
                    let name = attr_string(e, b"name")
                        .map(|n| quick_xml::escape::unescape(&n).map(|u| u.into_owned()))
                        .transpose()
                        .map_err(|err| XlfillError::MalformedPackage(err.to_string()))?
                        .unwrap_or_default();
                    let r_id = attr_string_suffix(e, b"id").unwrap_or_default();

                    if !name.is_empty() {
                        // Try to get path from relationships, fallback to default
                        let path = relationships.get(&r_id).cloned().unwrap_or_else(|| {
                            let idx = sheets.len() + 1;
                            format!("xl/worksheets/sheet{idx}.xml")
                        });
                        sheets.push(SheetInfo { name, path });
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(XlfillError::MalformedPackage(format!(
                    "{WORKBOOK_PART}: {err}"
                )))
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(sheets)
}

/// Parse the shared string table.
///
/// Rich-text runs of one `<si>` are concatenated; phonetic runs are skipped.
pub(crate) fn parse_shared_strings<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    path: Option<&str>,
) -> Result<Vec<String>> {
    let sst_path = path.unwrap_or(SHARED_STRINGS_PART);
    let Ok(file) = archive.by_name(sst_path) else {
        return Ok(Vec::new()); // SharedStrings is optional
    };

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut strings = Vec::new();
    let mut buf = Vec::new();
    let mut current_string = String::new();
    let mut in_si = false;
    let mut in_t = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    in_si = true;
                    current_string.clear();
                }
                b"rPh" => in_phonetic = true,
                b"t" if in_si && !in_phonetic => in_t = true,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => {
                // <si/> is a valid empty entry
                if e.local_name().as_ref() == b"si" {
                    strings.push(String::new());
                }
            }
            Ok(Event::Text(ref e)) if in_t => {
                let text = e
                    .unescape()
                    .map_err(|err| XlfillError::MalformedPackage(format!("{sst_path}: {err}")))?;
                current_string.push_str(&text);
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"si" => {
                    strings.push(std::mem::take(&mut current_string));
                    in_si = false;
                }
                b"rPh" => in_phonetic = false,
                b"t" => in_t = false,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(XlfillError::MalformedPackage(format!("{sst_path}: {err}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(strings)
}
