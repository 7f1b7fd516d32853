//! Patch an XLSX ZIP archive in place.
//!
//! Unmodified entries are copied via `raw_copy_file` (zero recompression cost).
//! Only text parts whose XML actually changed are re-deflated.

use std::collections::HashSet;
use std::io::{Cursor, Read, Write};
use zip::write::FileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::error::{Result, XlfillError};
use crate::parser::text_part_paths;

use super::PlaceholderReplacer;

fn patch_err(context: &str, err: impl std::fmt::Display) -> XlfillError {
    XlfillError::PatchFailure(format!("{context}: {err}"))
}

/// Rewrite the text-bearing parts of `original_data` with `replacer`.
///
/// Entry order, names, timestamps and permissions are preserved. Returns the
/// new XLSX file as `Vec<u8>`, or a copy of `original_data` when no part
/// contained a matching placeholder.
pub(crate) fn patch_zip(original_data: &[u8], replacer: &PlaceholderReplacer) -> Result<Vec<u8>> {
    let cursor = Cursor::new(original_data);
    let mut archive = ZipArchive::new(cursor).map_err(|e| patch_err("open archive", e))?;

    let text_parts: HashSet<String> = text_part_paths(&mut archive).into_iter().collect();

    let buf: Vec<u8> = Vec::with_capacity(original_data.len());
    let mut writer = ZipWriter::new(Cursor::new(buf));
    let mut patched_parts = 0usize;

    for i in 0..archive.len() {
        let name = archive
            .by_index_raw(i)
            .map_err(|e| patch_err("read entry", e))?
            .name()
            .to_string();

        if text_parts.contains(&name) {
            let mut xml = String::new();
            let mut options =
                FileOptions::default().compression_method(CompressionMethod::Deflated);
            {
                let mut entry = archive.by_index(i).map_err(|e| patch_err(&name, e))?;
                entry
                    .read_to_string(&mut xml)
                    .map_err(|e| patch_err(&name, e))?;
                options = options.last_modified_time(entry.last_modified());
                if let Some(mode) = entry.unix_mode() {
                    options = options.unix_permissions(mode);
                }
            }

            let patched = replacer.apply(&xml);
            if patched != xml {
                log::debug!("patching {name}");
                writer
                    .start_file(name.as_str(), options)
                    .map_err(|e| patch_err(&name, e))?;
                writer
                    .write_all(patched.as_bytes())
                    .map_err(|e| patch_err(&name, e))?;
                patched_parts += 1;
                continue;
            }
        }

        // Pass through unmodified entry (raw copy, no re-compression)
        let entry = archive
            .by_index_raw(i)
            .map_err(|e| patch_err(&name, e))?;
        writer
            .raw_copy_file(entry)
            .map_err(|e| patch_err(&name, e))?;
    }

    if patched_parts == 0 {
        return Ok(original_data.to_vec());
    }
    let cursor = writer.finish().map_err(|e| patch_err("finish archive", e))?;
    log::debug!("patched {patched_parts} part(s)");
    Ok(cursor.into_inner())
}
