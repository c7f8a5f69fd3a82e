//! The computed-style element model the crawler supplies.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// One rendered element's snapshot: identity, accessibility attributes,
/// and browser-resolved styles (pixels for dimensions, `rgb(...)`/hex for
/// colors), plus optional pseudo-class states.
///
/// Maps are ordered so downstream iteration is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputedStyleEntry {
    /// Synthetic path identifying the element.
    pub selector: String,
    /// Lowercased element tag.
    pub tag_name: String,
    /// Explicit ARIA role, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// `aria-*` attributes, keyed without the `aria-` prefix.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub aria: BTreeMap<String, String>,
    /// Raw attributes (`class`, `data-*`, `type`, ...).
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub attributes: BTreeMap<String, String>,
    /// Resolved base styles, kebab-case property names.
    pub computed_style: BTreeMap<String, String>,
    /// Resolved styles under `:hover`, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<BTreeMap<String, String>>,
    /// Resolved styles under `:focus`, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<BTreeMap<String, String>>,
    /// Resolved styles under `:active`, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<BTreeMap<String, String>>,
    /// Resolved styles when disabled, when captured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<BTreeMap<String, String>>,
}

impl ComputedStyleEntry {
    /// A resolved base-style property.
    #[must_use]
    pub fn style(&self, property: &str) -> Option<&str> {
        self.computed_style.get(property).map(String::as_str)
    }

    /// The element's `class` attribute, empty when absent.
    #[must_use]
    pub fn class_attr(&self) -> &str {
        self.attributes.get("class").map_or("", String::as_str)
    }

    /// Selector plus class text, lowercased, for substring matching.
    #[must_use]
    pub fn match_text(&self) -> String {
        let mut text = self.selector.to_ascii_lowercase();
        let class = self.class_attr();
        if !class.is_empty() {
            text.push(' ');
            text.push_str(&class.to_ascii_lowercase());
        }
        text
    }

    /// Whether the snapshot is usable at all: elements without a selector
    /// or any computed style are dropped before scoring.
    #[must_use]
    pub fn is_well_formed(&self) -> bool {
        !self.selector.trim().is_empty()
            && !self.tag_name.trim().is_empty()
            && !self.computed_style.is_empty()
    }

    /// Properties that differ between a state map and the base style.
    #[must_use]
    pub fn state_diff(&self, state: &BTreeMap<String, String>) -> BTreeMap<String, String> {
        state
            .iter()
            .filter(|(prop, value)| self.style(prop) != Some(value.as_str()))
            .map(|(p, v)| (p.clone(), v.clone()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_diff_only_reports_changes() {
        let mut entry = ComputedStyleEntry {
            selector: ".btn".to_string(),
            tag_name: "button".to_string(),
            ..ComputedStyleEntry::default()
        };
        let _ = entry
            .computed_style
            .insert("background-color".to_string(), "#0a84ff".to_string());
        let _ = entry
            .computed_style
            .insert("color".to_string(), "#ffffff".to_string());

        let mut hover = BTreeMap::new();
        let _ = hover.insert("background-color".to_string(), "#0060df".to_string());
        let _ = hover.insert("color".to_string(), "#ffffff".to_string());

        let diff = entry.state_diff(&hover);
        assert_eq!(diff.len(), 1);
        assert_eq!(diff.get("background-color").map(String::as_str), Some("#0060df"));
    }

    #[test]
    fn well_formedness() {
        let empty = ComputedStyleEntry::default();
        assert!(!empty.is_well_formed());
    }
}
