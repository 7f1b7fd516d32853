//! Package reader
//!
//! Opens an XLSX container and exposes its sheets and populated cells for
//! scanning. Reading never mutates the input bytes.

mod relationships;
mod worksheet;

use std::io::{Cursor, Read, Seek};
use zip::ZipArchive;

use crate::error::{Result, XlfillError};
use crate::types::Workbook;

pub(crate) use relationships::parse_workbook_relationships;
use relationships::{get_sheet_info, parse_shared_strings};
use worksheet::parse_sheet;

/// Main workbook part.
pub const WORKBOOK_PART: &str = "xl/workbook.xml";
/// Workbook relationships part.
pub const WORKBOOK_RELS_PART: &str = "xl/_rels/workbook.xml.rels";
/// Conventional location of the shared string table.
pub const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
/// Directory holding worksheet parts.
pub const WORKSHEETS_DIR: &str = "xl/worksheets/";

/// Open a ZIP archive over `data`, mapping any container error to
/// [`XlfillError::MalformedPackage`].
pub(crate) fn open_archive(data: &[u8]) -> Result<ZipArchive<Cursor<&[u8]>>> {
    let archive = ZipArchive::new(Cursor::new(data)).map_err(XlfillError::malformed)?;
    Ok(archive)
}

/// Parse an XLSX file from bytes.
///
/// # Errors
/// Returns [`XlfillError::MalformedPackage`] if `data` is not a ZIP archive,
/// lacks `xl/workbook.xml`, references a missing sheet part, or contains
/// unreadable sheet markup.
pub fn open(data: &[u8]) -> Result<Workbook> {
    let mut archive = open_archive(data)?;

    if archive.by_name(WORKBOOK_PART).is_err() {
        return Err(XlfillError::MalformedPackage(format!(
            "not a spreadsheet package: missing {WORKBOOK_PART}"
        )));
    }

    let relationships = parse_workbook_relationships(&mut archive);
    let shared_strings_path = relationships
        .shared_strings
        .clone()
        .or_else(|| {
            archive
                .by_name(SHARED_STRINGS_PART)
                .is_ok()
                .then(|| SHARED_STRINGS_PART.to_string())
        });
    let shared_strings = parse_shared_strings(&mut archive, shared_strings_path.as_deref())?;

    let sheet_info = get_sheet_info(&mut archive, &relationships.worksheets)?;
    let mut sheets = Vec::with_capacity(sheet_info.len());
    for info in &sheet_info {
        sheets.push(parse_sheet(&mut archive, info, &shared_strings)?);
    }

    log::debug!(
        "opened package: {} sheet(s), {} shared string(s)",
        sheets.len(),
        shared_strings.len()
    );

    Ok(Workbook { sheets })
}

/// Names of the text-bearing parts of a package: the shared string table and
/// every worksheet part.
///
/// Worksheets are taken from the workbook relationships and from any entry
/// under `xl/worksheets/`, so a package with incomplete relationships is
/// still fully covered.
pub(crate) fn text_part_paths<R: Read + Seek>(archive: &mut ZipArchive<R>) -> Vec<String> {
    let relationships = parse_workbook_relationships(archive);

    let mut paths: Vec<String> = Vec::new();
    paths.push(
        relationships
            .shared_strings
            .unwrap_or_else(|| SHARED_STRINGS_PART.to_string()),
    );
    paths.extend(relationships.worksheets.into_values());
    paths.extend(
        archive
            .file_names()
            .filter(|name| {
                name.strip_prefix(WORKSHEETS_DIR)
                    .is_some_and(|rest| rest.ends_with(".xml") && !rest.contains('/'))
            })
            .map(ToString::to_string),
    );

    paths.sort();
    paths.dedup();
    paths
}
