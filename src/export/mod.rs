//! Package patcher
//!
//! Fills placeholders by rewriting the raw XML of the text-bearing parts
//! (shared string table and worksheets) and re-zipping the package. Every
//! other part is passed through byte-identical, so styles, merges, formulas
//! and layout survive untouched.
//!
//! Text split across rich-text runs (`<r>` elements) is not reassembled; a
//! placeholder broken up that way is left as is.

mod replacer;
pub(crate) mod zip_patcher;

pub use replacer::PlaceholderReplacer;

use crate::error::Result;
use crate::planner::replacement_set;
use crate::types::SubstitutionInstruction;

/// Apply `instructions` to the package in `original`.
///
/// Never fails: if any patch step goes wrong the original bytes are returned
/// and a warning is logged. Callers that expected a change can compare the
/// output with the input to detect this.
#[must_use]
pub fn fill_package(original: &[u8], instructions: &[SubstitutionInstruction]) -> Vec<u8> {
    let replacements = replacement_set(instructions);
    match try_patch(original, &replacements) {
        Ok(bytes) => bytes,
        Err(err) => {
            log::warn!("patch failed, returning the unmodified package: {err}");
            original.to_vec()
        }
    }
}

/// Replace every `{{pattern}}` with its value in all text-bearing parts.
///
/// An empty replacement set returns `original` unchanged.
///
/// # Errors
/// Returns [`crate::error::XlfillError::PatchFailure`] when the archive or one
/// of its text parts cannot be read or rewritten.
pub fn try_patch(original: &[u8], replacements: &[(String, String)]) -> Result<Vec<u8>> {
    let Some(replacer) = PlaceholderReplacer::new(replacements)? else {
        return Ok(original.to_vec());
    };
    zip_patcher::patch_zip(original, &replacer)
}
