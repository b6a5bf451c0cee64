//! Per-column filter predicates
//!
//! A filter set maps a column key to either free text (case-insensitive substring)
//! or a multi-choice selection (exact match on the value's text form). Entries that
//! are empty impose no constraint; all constraining entries must hold (AND).

use nomina_parser::{CellValue, Record};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Predicate value for one column
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    /// Case-insensitive substring
    Text(String),
    /// Allowed literal values
    Choices(Vec<String>),
}

impl FilterValue {
    /// Empty text or empty selection
    pub fn is_unconstrained(&self) -> bool {
        match self {
            Self::Text(needle) => needle.is_empty(),
            Self::Choices(options) => options.is_empty(),
        }
    }

    /// Check a cell against this predicate. An absent cell fails unless the
    /// predicate is unconstrained.
    pub fn matches(&self, value: Option<&CellValue>) -> bool {
        if self.is_unconstrained() {
            return true;
        }

        let Some(value) = value else {
            return false;
        };

        match self {
            Self::Text(needle) => value
                .to_text()
                .to_lowercase()
                .contains(&needle.to_lowercase()),
            Self::Choices(options) => {
                let text = value.to_text();
                options.iter().any(|o| *o == text)
            }
        }
    }
}

/// Filters keyed by column
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet {
    entries: BTreeMap<String, FilterValue>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the predicate of `key`
    pub fn set(&mut self, key: impl Into<String>, value: FilterValue) {
        self.entries.insert(key.into(), value);
    }

    /// Set a free-text predicate
    pub fn set_text(&mut self, key: impl Into<String>, needle: impl Into<String>) {
        self.set(key, FilterValue::Text(needle.into()));
    }

    /// Set a multi-choice predicate
    pub fn set_choices<I, S>(&mut self, key: impl Into<String>, options: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.set(
            key,
            FilterValue::Choices(options.into_iter().map(Into::into).collect()),
        );
    }

    /// Add `option` to the selection of `key`, or remove it if already selected.
    ///
    /// A free-text predicate on the column is replaced by a selection.
    pub fn toggle_choice(&mut self, key: &str, option: &str) {
        let mut selected = match self.entries.get(key) {
            Some(FilterValue::Choices(selected)) => selected.clone(),
            _ => Vec::new(),
        };

        if let Some(pos) = selected.iter().position(|s| s == option) {
            selected.remove(pos);
        } else {
            selected.push(option.to_string());
        }
        self.set(key, FilterValue::Choices(selected));
    }

    /// Select every option, or clear the selection when all are already selected
    pub fn toggle_all(&mut self, key: &str, options: &[String]) {
        let all_selected = match self.entries.get(key) {
            Some(FilterValue::Choices(selected)) => {
                !options.is_empty() && selected.len() == options.len()
            }
            _ => false,
        };

        if all_selected {
            self.set(key, FilterValue::Choices(Vec::new()));
        } else {
            self.set(key, FilterValue::Choices(options.to_vec()));
        }
    }

    /// Drop the predicate of `key`
    pub fn clear(&mut self, key: &str) {
        self.entries.remove(key);
    }

    pub fn clear_all(&mut self) {
        self.entries.clear();
    }

    pub fn get(&self, key: &str) -> Option<&FilterValue> {
        self.entries.get(key)
    }

    /// True when no entry constrains anything
    pub fn is_unconstrained(&self) -> bool {
        self.entries.values().all(FilterValue::is_unconstrained)
    }

    /// Entries that actually constrain
    pub fn active(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.entries
            .iter()
            .filter(|(_, v)| !v.is_unconstrained())
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Check a record against every predicate
    pub fn matches(&self, record: &Record) -> bool {
        self.active().all(|(key, value)| value.matches(record.get(key)))
    }
}
