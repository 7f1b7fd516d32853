//! Substitution planner
//!
//! Turns scanned occurrences plus user-supplied values into substitution
//! instructions. Pure functions, no I/O.

use std::collections::HashMap;

use crate::types::{InputValue, PlaceholderOccurrence, SubstitutionInstruction};

/// User values keyed by placeholder name, matched case-insensitively.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValueMap {
    values: HashMap<String, String>,
}

/// Case-folded form of a placeholder name, used for every name comparison.
///
/// Folds one character at a time, so a sigma folds the same wherever it
/// sits in the word; final sigma folds to sigma.
pub fn fold_name(name: &str) -> String {
    name.trim()
        .chars()
        .flat_map(char::to_lowercase)
        .map(|c| if c == '\u{3c2}' { '\u{3c3}' } else { c })
        .collect()
}

impl ValueMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from submitted form values.
    ///
    /// When a name is submitted more than once, the first non-empty value wins.
    #[must_use]
    pub fn from_inputs(inputs: &[InputValue]) -> Self {
        let mut map = Self::new();
        for input in inputs {
            map.insert(&input.pattern, &input.value);
        }
        map
    }

    /// Record `value` for `name` unless a non-empty value is already present.
    pub fn insert(&mut self, name: &str, value: &str) {
        let key = fold_name(name);
        match self.values.get_mut(&key) {
            Some(existing) if existing.is_empty() => *existing = value.to_string(),
            Some(_) => {}
            None => {
                self.values.insert(key, value.to_string());
            }
        }
    }

    /// Record `value` for `name`, replacing whatever was there.
    pub fn set(&mut self, name: &str, value: &str) {
        self.values.insert(fold_name(name), value.to_string());
    }

    /// Value for `name`, if one was supplied.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(&fold_name(name)).map(String::as_str)
    }

    /// Value for `name`, or the empty string when none was supplied.
    #[must_use]
    pub fn resolve(&self, name: &str) -> &str {
        self.get(name).unwrap_or("")
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<K: AsRef<str>, V: AsRef<str>> FromIterator<(K, V)> for ValueMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k.as_ref(), v.as_ref());
        }
        map
    }
}

/// One instruction per occurrence; every occurrence of a name gets the same value.
pub fn plan(
    occurrences: &[PlaceholderOccurrence],
    values: &ValueMap,
) -> Vec<SubstitutionInstruction> {
    occurrences
        .iter()
        .map(|o| SubstitutionInstruction {
            pattern: o.pattern.clone(),
            sheet: o.sheet.clone(),
            cell: o.cell.clone(),
            value: values.resolve(&o.pattern).to_string(),
        })
        .collect()
}

/// Distinct (pattern, value) pairs, keyed case-insensitively, in first-seen order.
pub fn replacement_set(instructions: &[SubstitutionInstruction]) -> Vec<(String, String)> {
    let mut seen = std::collections::HashSet::new();
    instructions
        .iter()
        .filter(|i| seen.insert(fold_name(&i.pattern)))
        .map(|i| (i.pattern.clone(), i.value.clone()))
        .collect()
}
