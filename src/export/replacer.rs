//! Single-pass placeholder replacement over raw part XML.

use regex::{Captures, Regex};
use std::borrow::Cow;
use std::collections::HashSet;

use crate::error::Result;
use crate::planner::fold_name;
use crate::xml_helpers::{escape_cell_text, escape_text};

/// Replaces `{{name}}` tokens in XML text with escaped values.
///
/// All names are folded into one alternation so a cell holding several
/// placeholders is rewritten in a single pass; a value that happens to
/// contain another placeholder's token is never re-expanded.
#[derive(Debug, Clone)]
pub struct PlaceholderReplacer {
    regex: Regex,
    /// Escaped value for each alternative, in capture-group order.
    values: Vec<String>,
}

impl PlaceholderReplacer {
    /// Compile a replacer for the given (name, value) pairs.
    ///
    /// Returns `Ok(None)` when there is nothing to replace. Names are matched
    /// case-insensitively, with optional whitespace inside the braces. When
    /// the same name appears twice, the first pair wins.
    ///
    /// # Errors
    /// Fails only if the combined pattern exceeds the regex size limit.
    pub fn new(replacements: &[(String, String)]) -> Result<Option<Self>> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();
        let mut alternatives = Vec::new();

        for (name, value) in replacements {
            let name = name.trim();
            if name.is_empty() || !seen.insert(fold_name(name)) {
                continue;
            }
            // names are matched as they appear in markup, i.e. XML-escaped
            alternatives.push(format!("({})", regex::escape(&escape_text(name))));
            values.push(escape_cell_text(value).into_owned());
        }

        if alternatives.is_empty() {
            return Ok(None);
        }

        let pattern = format!(r"(?i)\{{\{{\s*(?:{})\s*\}}\}}", alternatives.join("|"));
        let regex = Regex::new(&pattern)?;
        Ok(Some(Self { regex, values }))
    }

    /// Rewrite `xml`, borrowing it unchanged when no placeholder matched.
    pub fn apply<'a>(&self, xml: &'a str) -> Cow<'a, str> {
        self.regex.replace_all(xml, |caps: &Captures| {
            // exactly one alternative group takes part in a match
            caps.iter()
                .skip(1)
                .position(|group| group.is_some())
                .and_then(|idx| self.values.get(idx))
                .map_or_else(
                    || caps.get(0).map_or("", |m| m.as_str()).to_string(),
                    Clone::clone,
                )
        })
    }
}
