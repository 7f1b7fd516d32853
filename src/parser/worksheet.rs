//! Worksheet parsing - reads the populated cells of one sheet part.

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::io::{BufReader, Read, Seek};
use zip::ZipArchive;

use crate::cell_ref::parse_cell_ref_bytes;
use crate::error::{Result, XlfillError};
use crate::types::{Cell, CellData, CellType, Sheet};

/// Sheet metadata from workbook.xml
#[derive(Debug, Clone)]
pub(crate) struct SheetInfo {
    pub name: String,
    pub path: String,
}

/// Cell type tag from the `t` attribute of a `<c>` element.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub(super) enum CellTypeTag {
    Shared,
    Inline,
    Str,
    Bool,
    Error,
    Default,
}

pub(super) fn parse_cell_type_tag(value: &[u8]) -> CellTypeTag {
    match value {
        b"s" => CellTypeTag::Shared,
        b"b" => CellTypeTag::Bool,
        b"e" => CellTypeTag::Error,
        b"str" | b"d" => CellTypeTag::Str,
        b"inlineStr" => CellTypeTag::Inline,
        _ => CellTypeTag::Default,
    }
}

pub(super) fn parse_u32_bytes(value: &[u8]) -> Option<u32> {
    let mut num: u32 = 0;
    let mut seen = false;
    for &b in value {
        if !b.is_ascii_digit() {
            return None;
        }
        seen = true;
        num = num.saturating_mul(10).saturating_add(u32::from(b - b'0'));
    }
    if seen {
        Some(num)
    } else {
        None
    }
}

/// A `<c>` element whose children are still being read.
struct PendingCell {
    row: u32,
    col: u32,
    tag: CellTypeTag,
    value: Option<String>,
    inline: Option<String>,
}

impl PendingCell {
    fn from_start(e: &BytesStart, current_row: u32, next_col: u32) -> Self {
        let mut cell = Self {
            row: current_row,
            col: next_col,
            tag: CellTypeTag::Default,
            value: None,
            inline: None,
        };
        for attr in e.attributes().flatten() {
            match attr.key.as_ref() {
                b"r" => {
                    if let Some((c, r)) = parse_cell_ref_bytes(&attr.value) {
                        cell.col = c;
                        cell.row = r;
                    }
                }
                b"t" => cell.tag = parse_cell_type_tag(&attr.value),
                _ => {}
            }
        }
        cell
    }

    /// Resolve into a populated cell, or `None` when the cell carries no value.
    fn finish(self, shared_strings: &[String], part: &str) -> Result<Option<CellData>> {
        let cell = match self.tag {
            CellTypeTag::Inline => {
                let Some(text) = self.inline.or(self.value) else {
                    return Ok(None);
                };
                Cell {
                    raw: text,
                    t: CellType::String,
                    display: None,
                }
            }
            tag => {
                let Some(raw) = self.value else {
                    return Ok(None);
                };
                match tag {
                    CellTypeTag::Shared => {
                        let text = parse_u32_bytes(raw.trim().as_bytes())
                            .and_then(|idx| shared_strings.get(idx as usize))
                            .ok_or_else(|| {
                                XlfillError::MalformedPackage(format!(
                                    "{part}: shared string index {raw:?} out of range"
                                ))
                            })?;
                        Cell {
                            display: Some(text.clone()),
                            raw,
                            t: CellType::String,
                        }
                    }
                    CellTypeTag::Bool => {
                        let literal = if raw.trim() == "1" { "TRUE" } else { "FALSE" };
                        Cell {
                            raw,
                            t: CellType::Boolean,
                            display: Some(literal.to_string()),
                        }
                    }
                    CellTypeTag::Error => Cell {
                        raw,
                        t: CellType::Error,
                        display: None,
                    },
                    CellTypeTag::Str | CellTypeTag::Inline => Cell {
                        raw,
                        t: CellType::String,
                        display: None,
                    },
                    CellTypeTag::Default => Cell {
                        raw,
                        t: CellType::Number,
                        display: None,
                    },
                }
            }
        };

        if cell.text().is_empty() {
            return Ok(None);
        }

        Ok(Some(CellData {
            r: self.row,
            c: self.col,
            cell,
        }))
    }
}

/// Where text events inside a cell should go.
#[derive(Copy, Clone, PartialEq, Eq)]
enum TextTarget {
    None,
    Value,
    Inline,
}

/// Parse the populated cells of a single worksheet.
pub(super) fn parse_sheet<R: Read + Seek>(
    archive: &mut ZipArchive<R>,
    info: &SheetInfo,
    shared_strings: &[String],
) -> Result<Sheet> {
    let file = archive.by_name(&info.path).map_err(|_| {
        XlfillError::MalformedPackage(format!(
            "sheet '{}' refers to missing part {}",
            info.name, info.path
        ))
    })?;

    let reader = BufReader::new(file);
    let mut xml = Reader::from_reader(reader);
    xml.trim_text(false);

    let mut cells: Vec<CellData> = Vec::new();
    let mut buf = Vec::new();
    let mut current_row: u32 = 0;
    let mut next_col: u32 = 0;
    let mut pending: Option<PendingCell> = None;
    let mut target = TextTarget::None;
    let mut in_is = false;
    let mut in_phonetic = false;

    loop {
        match xml.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    if let Some(r) = crate::xml_helpers::attr_string(e, b"r")
                        .and_then(|s| parse_u32_bytes(s.as_bytes()))
                    {
                        current_row = r.saturating_sub(1);
                    }
                    next_col = 0;
                }
                b"c" => {
                    pending = Some(PendingCell::from_start(e, current_row, next_col));
                }
                b"v" if pending.is_some() => target = TextTarget::Value,
                b"is" if pending.is_some() => in_is = true,
                b"rPh" => in_phonetic = true,
                b"t" if in_is && !in_phonetic => target = TextTarget::Inline,
                _ => {}
            },
            Ok(Event::Empty(ref e)) => match e.local_name().as_ref() {
                b"row" => {
                    current_row = crate::xml_helpers::attr_string(e, b"r")
                        .and_then(|s| parse_u32_bytes(s.as_bytes()))
                        .unwrap_or_else(|| current_row.saturating_add(1));
                    next_col = 0;
                }
                b"c" => {
                    let cell = PendingCell::from_start(e, current_row, next_col);
                    next_col = cell.col.saturating_add(1);
                }
                _ => {}
            },
            Ok(Event::Text(ref e)) if target != TextTarget::None => {
                let text = e.unescape().map_err(|err| {
                    XlfillError::MalformedPackage(format!("{}: {err}", info.path))
                })?;
                if let Some(cell) = pending.as_mut() {
                    let slot = if target == TextTarget::Value {
                        &mut cell.value
                    } else {
                        &mut cell.inline
                    };
                    slot.get_or_insert_with(String::new).push_str(&text);
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"v" | b"t" => target = TextTarget::None,
                b"is" => in_is = false,
                b"rPh" => in_phonetic = false,
                b"c" => {
                    if let Some(cell) = pending.take() {
                        next_col = cell.col.saturating_add(1);
                        if let Some(data) = cell.finish(shared_strings, &info.path)? {
                            cells.push(data);
                        }
                    }
                }
                b"row" => {
                    current_row = current_row.saturating_add(1);
                }
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(err) => {
                return Err(XlfillError::MalformedPackage(format!("{}: {err}", info.path)));
            }
            _ => {}
        }
        buf.clear();
    }

    cells.sort_by_key(|cd| (cd.r, cd.c));
    cells.dedup_by_key(|cd| (cd.r, cd.c));

    let max_row = cells.iter().map(|cd| cd.r.saturating_add(1)).max().unwrap_or(1);
    let max_col = cells.iter().map(|cd| cd.c.saturating_add(1)).max().unwrap_or(1);

    Ok(Sheet {
        name: info.name.clone(),
        path: info.path.clone(),
        cells,
        max_row,
        max_col,
    })
}
