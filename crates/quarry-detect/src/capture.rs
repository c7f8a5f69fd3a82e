//! Component token capture.
//!
//! Once an element matches an archetype, its computed style is distilled
//! into a grouped token struct, with neutral browser defaults stripped so
//! the captured tokens describe design decisions rather than the
//! initial-value noise computed styles carry.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::element::ComputedStyleEntry;

/// Captured style tokens, grouped by concern.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentTokens {
    /// Display, position, offsets, sizing, overflow, z-index.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub layout: BTreeMap<String, String>,
    /// Margins, paddings, gaps.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub spacing: BTreeMap<String, String>,
    /// Font and text properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub typography: BTreeMap<String, String>,
    /// Foreground and background colors.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub color: BTreeMap<String, String>,
    /// Borders, outlines, radii.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub border: BTreeMap<String, String>,
    /// Shadows, opacity, filters, transitions, animations.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub effects: BTreeMap<String, String>,
    /// Transforms.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub transform: BTreeMap<String, String>,
    /// Flex and grid container/child properties.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub flex_grid: BTreeMap<String, String>,
    /// Everything else that survived the default filter.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub other: BTreeMap<String, String>,
}

impl ComponentTokens {
    /// Total captured property count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.layout.len()
            + self.spacing.len()
            + self.typography.len()
            + self.color.len()
            + self.border.len()
            + self.effects.len()
            + self.transform.len()
            + self.flex_grid.len()
            + self.other.len()
    }

    /// Whether nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look up a captured property across all groups.
    #[must_use]
    pub fn get(&self, property: &str) -> Option<&str> {
        [
            &self.layout,
            &self.spacing,
            &self.typography,
            &self.color,
            &self.border,
            &self.effects,
            &self.transform,
            &self.flex_grid,
            &self.other,
        ]
        .into_iter()
        .find_map(|group| group.get(property).map(String::as_str))
    }
}

/// Per-pseudo-class captured diffs.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentStates {
    /// Properties that change under `:hover`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hover: Option<BTreeMap<String, String>>,
    /// Properties that change under `:focus`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub focus: Option<BTreeMap<String, String>>,
    /// Properties that change under `:active`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub active: Option<BTreeMap<String, String>>,
    /// Properties that change when disabled.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub disabled: Option<BTreeMap<String, String>>,
}

/// Values that are initial-value noise for their property.
fn is_neutral(property: &str, value: &str) -> bool {
    let value = value.trim();
    if value.is_empty() {
        return true;
    }
    match property {
        "background-color" | "background" => {
            value == "rgba(0, 0, 0, 0)" || value == "transparent"
        }
        "box-shadow" | "text-shadow" => value == "none",
        "transition" => value == "all 0s ease 0s" || value == "none",
        "animation" => value == "none",
        "cursor" | "overflow" | "overflow-x" | "overflow-y" | "z-index" | "user-select"
        | "width" | "height" => value == "auto",
        "opacity" => value == "1",
        "transform" => value == "none",
        "margin" | "margin-top" | "margin-right" | "margin-bottom" | "margin-left"
        | "padding" | "padding-top" | "padding-right" | "padding-bottom" | "padding-left" => {
            value == "0px" || value == "0"
        }
        "border" | "border-width" | "outline" => {
            value == "none" || value.starts_with("0px") || value == "medium none"
        }
        "border-radius" => value == "0px" || value == "0",
        _ => false,
    }
}

/// Which group a property belongs to.
fn group_of(property: &str) -> Group {
    if property.starts_with("margin") || property.starts_with("padding") || property.ends_with("gap")
    {
        return Group::Spacing;
    }
    if property.starts_with("font")
        || property.starts_with("text")
        || property.starts_with("letter")
        || matches!(property, "line-height" | "white-space" | "word-break")
    {
        return Group::Typography;
    }
    if property == "color" || property.starts_with("background") {
        return Group::Color;
    }
    if property.starts_with("border") || property.starts_with("outline") {
        return Group::Border;
    }
    if matches!(
        property,
        "box-shadow" | "opacity" | "filter" | "backdrop-filter" | "transition" | "animation"
    ) || property.starts_with("transition-")
        || property.starts_with("animation-")
    {
        return Group::Effects;
    }
    if property.starts_with("transform") {
        return Group::Transform;
    }
    if property.starts_with("flex")
        || property.starts_with("grid")
        || property.starts_with("align")
        || property.starts_with("justify")
        || property.starts_with("place")
        || property == "order"
    {
        return Group::FlexGrid;
    }
    if matches!(
        property,
        "display"
            | "position"
            | "top"
            | "right"
            | "bottom"
            | "left"
            | "z-index"
            | "overflow"
            | "overflow-x"
            | "overflow-y"
            | "width"
            | "height"
            | "min-width"
            | "min-height"
            | "max-width"
            | "max-height"
            | "inset"
            | "aspect-ratio"
    ) {
        return Group::Layout;
    }
    Group::Other
}

enum Group {
    Layout,
    Spacing,
    Typography,
    Color,
    Border,
    Effects,
    Transform,
    FlexGrid,
    Other,
}

/// Distill an element's base style into grouped tokens.
#[must_use]
pub fn capture_tokens(entry: &ComputedStyleEntry) -> ComponentTokens {
    let mut tokens = ComponentTokens::default();
    for (property, value) in &entry.computed_style {
        if is_neutral(property, value) {
            continue;
        }
        let target = match group_of(property) {
            Group::Layout => &mut tokens.layout,
            Group::Spacing => &mut tokens.spacing,
            Group::Typography => &mut tokens.typography,
            Group::Color => &mut tokens.color,
            Group::Border => &mut tokens.border,
            Group::Effects => &mut tokens.effects,
            Group::Transform => &mut tokens.transform,
            Group::FlexGrid => &mut tokens.flex_grid,
            Group::Other => &mut tokens.other,
        };
        let _ = target.insert(property.clone(), value.clone());
    }
    tokens
}

/// Capture the per-state diffs the crawler supplied.
#[must_use]
pub fn capture_states(entry: &ComputedStyleEntry) -> ComponentStates {
    let diff = |state: &Option<BTreeMap<String, String>>| {
        state.as_ref().map(|s| entry.state_diff(s)).filter(|d| !d.is_empty())
    };
    ComponentStates {
        hover: diff(&entry.hover),
        focus: diff(&entry.focus),
        active: diff(&entry.active),
        disabled: diff(&entry.disabled),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(styles: &[(&str, &str)]) -> ComputedStyleEntry {
        let mut computed = BTreeMap::new();
        for (p, v) in styles {
            let _ = computed.insert((*p).to_string(), (*v).to_string());
        }
        ComputedStyleEntry {
            selector: ".x".to_string(),
            tag_name: "div".to_string(),
            computed_style: computed,
            ..ComputedStyleEntry::default()
        }
    }

    #[test]
    fn neutral_defaults_are_stripped() {
        let tokens = capture_tokens(&entry(&[
            ("background-color", "rgba(0, 0, 0, 0)"),
            ("box-shadow", "none"),
            ("transition", "all 0s ease 0s"),
            ("cursor", "auto"),
            ("opacity", "1"),
            ("width", "auto"),
            ("color", "#111827"),
        ]));
        assert_eq!(tokens.len(), 1);
        assert_eq!(tokens.get("color"), Some("#111827"));
    }

    #[test]
    fn properties_land_in_their_groups() {
        let tokens = capture_tokens(&entry(&[
            ("display", "inline-flex"),
            ("padding", "8px 16px"),
            ("font-size", "14px"),
            ("background-color", "#0a84ff"),
            ("border-radius", "6px"),
            ("box-shadow", "0 1px 2px rgba(0, 0, 0, 0.3)"),
            ("transform", "translateY(-1px)"),
            ("justify-content", "center"),
            ("cursor", "pointer"),
        ]));
        assert!(tokens.layout.contains_key("display"));
        assert!(tokens.spacing.contains_key("padding"));
        assert!(tokens.typography.contains_key("font-size"));
        assert!(tokens.color.contains_key("background-color"));
        assert!(tokens.border.contains_key("border-radius"));
        assert!(tokens.effects.contains_key("box-shadow"));
        assert!(tokens.transform.contains_key("transform"));
        assert!(tokens.flex_grid.contains_key("justify-content"));
        assert!(tokens.other.contains_key("cursor"));
    }

    #[test]
    fn states_capture_only_diffs() {
        let mut e = entry(&[("background-color", "#0a84ff")]);
        let mut hover = BTreeMap::new();
        let _ = hover.insert("background-color".to_string(), "#0060df".to_string());
        e.hover = Some(hover);
        e.focus = Some(BTreeMap::new());

        let states = capture_states(&e);
        assert!(states.hover.is_some());
        assert!(states.focus.is_none());
        assert!(states.active.is_none());
    }
}
