//! The eight scoring signals.
//!
//! Each signal scores one element against one archetype on a 0-100 scale;
//! the detector folds them with fixed weights into a confidence value.
//! The composition signal is reserved (the crawler does not ship
//! parent/child shape yet) and always scores zero, with its weight kept
//! in the denominator.

use crate::archetype::{ArchetypePattern, BehaviorProfile, StyleExpectation, VisualCue};
use crate::element::ComputedStyleEntry;
use crate::facts::{CornerClass, ElementFacts, Elevation};

/// Signal weights, in strategy order: selector, computed style, ARIA,
/// semantic tag, composition, visual signature, framework, behavioral.
pub const WEIGHTS: [f64; 8] = [0.12, 0.08, 0.18, 0.08, 0.08, 0.12, 0.17, 0.17];

/// Score one element against one archetype; 0-100.
#[must_use]
pub fn confidence(
    pattern: &ArchetypePattern,
    entry: &ComputedStyleEntry,
    facts: &ElementFacts,
) -> f64 {
    let scores = [
        selector_score(pattern, entry),
        computed_style_score(pattern, entry),
        aria_score(pattern, entry),
        semantic_score(pattern, entry),
        composition_score(),
        visual_score(pattern, facts),
        framework_score(pattern, entry),
        behavioral_score(pattern, facts),
    ];
    let total_weight: f64 = WEIGHTS.iter().sum();
    let weighted: f64 = scores.iter().zip(WEIGHTS.iter()).map(|(s, w)| s * w).sum();
    (weighted / total_weight).min(100.0)
}

/// Selector signal: hint substrings against selector and class text.
/// An exact class/ident token match scores full; a substring scores
/// partial.
fn selector_score(pattern: &ArchetypePattern, entry: &ComputedStyleEntry) -> f64 {
    let text = entry.match_text();
    if text.is_empty() {
        return 0.0;
    }
    let tokens: Vec<&str> = text
        .split(|c: char| !c.is_ascii_alphanumeric() && c != '-' && c != '_')
        .filter(|t| !t.is_empty())
        .collect();

    let mut best: f64 = 0.0;
    for hint in pattern.selector_hints {
        if tokens.iter().any(|t| t == hint) {
            return 100.0;
        }
        if text.contains(hint) {
            best = best.max(70.0);
        }
    }
    best
}

/// Computed-style signal: fraction of the archetype's expectations met.
fn computed_style_score(pattern: &ArchetypePattern, entry: &ComputedStyleEntry) -> f64 {
    if pattern.style.is_empty() {
        return 0.0;
    }
    let met = pattern
        .style
        .iter()
        .filter(|expectation| expectation_met(expectation, entry))
        .count();
    met as f64 / pattern.style.len() as f64 * 100.0
}

fn expectation_met(expectation: &StyleExpectation, entry: &ComputedStyleEntry) -> bool {
    match expectation {
        StyleExpectation::OneOf(property, allowed) => entry
            .style(property)
            .is_some_and(|v| allowed.contains(&v.trim())),
        StyleExpectation::Exists(property) => entry
            .style(property)
            .is_some_and(|v| !v.is_empty() && v != "none" && v != "normal" && v != "auto"),
        StyleExpectation::MaxPx(property, max) => {
            ElementFacts::px(entry, property).is_some_and(|px| px <= *max)
        }
        StyleExpectation::MinPx(property, min) => {
            ElementFacts::px(entry, property).is_some_and(|px| px >= *min)
        }
    }
}

/// ARIA signal. A role match is decisive; supporting `aria-*` attributes
/// score partial credit. Archetypes with no role expectation treat a
/// role-less element as weakly consistent and an explicitly-roled one as
/// evidence against.
fn aria_score(pattern: &ArchetypePattern, entry: &ComputedStyleEntry) -> f64 {
    let role = entry.role.as_deref().map(str::to_ascii_lowercase);

    if pattern.roles.is_empty() {
        return match role {
            None => 50.0,
            Some(_) => 0.0,
        };
    }

    if let Some(role) = &role {
        if pattern.roles.contains(&role.as_str()) {
            return 100.0;
        }
    }

    let supporting = pattern
        .aria_hints
        .iter()
        .filter(|hint| entry.aria.contains_key(**hint))
        .count();
    if supporting == 0 {
        0.0
    } else if supporting == 1 {
        60.0
    } else {
        80.0
    }
}

/// Semantic-tag signal: tag membership in the archetype's allowed set.
/// Like ARIA, tag-less archetypes treat generic containers as weakly
/// consistent.
fn semantic_score(pattern: &ArchetypePattern, entry: &ComputedStyleEntry) -> f64 {
    let tag = entry.tag_name.to_ascii_lowercase();
    if pattern.tags.is_empty() {
        return if matches!(tag.as_str(), "div" | "span" | "section") {
            50.0
        } else {
            0.0
        };
    }
    if pattern.tags.contains(&tag.as_str()) {
        100.0
    } else {
        0.0
    }
}

/// Composition signal: reserved, always zero.
fn composition_score() -> f64 {
    0.0
}

/// Visual-signature signal: fraction of the archetype's cues present.
fn visual_score(pattern: &ArchetypePattern, facts: &ElementFacts) -> f64 {
    if pattern.visual.is_empty() {
        return 0.0;
    }
    let met = pattern
        .visual
        .iter()
        .filter(|cue| cue_met(cue, facts))
        .count();
    met as f64 / pattern.visual.len() as f64 * 100.0
}

fn cue_met(cue: &VisualCue, facts: &ElementFacts) -> bool {
    match cue {
        VisualCue::Rounded => facts.corner == CornerClass::Rounded,
        VisualCue::Pill => matches!(facts.corner, CornerClass::Pill | CornerClass::Circle),
        VisualCue::Circle => facts.corner == CornerClass::Circle,
        VisualCue::Elevated => facts.elevation != Elevation::Flat,
        VisualCue::Bordered => facts.bordered,
        VisualCue::FlexContainer => facts.display.contains("flex"),
        VisualCue::GridContainer => facts.display.contains("grid") || facts.display == "table",
        VisualCue::SpacingScale => facts.on_spacing_grid && (facts.padding_x > 0.0 || facts.padding_y > 0.0),
        VisualCue::Truncation => facts.truncated,
        VisualCue::ThinLine => {
            facts.height_px.is_some_and(|h| h <= 8.0) || facts.width_px.is_some_and(|w| w <= 8.0)
        }
        VisualCue::OutOfFlow => matches!(facts.position.as_str(), "absolute" | "fixed"),
        VisualCue::WidePadding => facts.padding_x > 0.0 && facts.padding_x >= facts.padding_y,
    }
}

/// Framework markers, checked against class text and attributes:
/// shadcn/Radix `data-state` slots, MUI `Mui*-root`, Chakra, Ant Design,
/// HeadlessUI, NextUI, Mantine, Fluent, Carbon, Shoelace, Vuetify,
/// Element, Quasar, Ionic, DaisyUI, Semantic UI, Blueprint, plus raw
/// Tailwind utility density.
///
/// The marker must also speak about *this* archetype (its kind name or a
/// selector hint) to score: a `MuiButton-root` class is evidence for
/// button, not for every archetype at once.
fn framework_score(pattern: &ArchetypePattern, entry: &ComputedStyleEntry) -> f64 {
    let class = entry.class_attr().to_ascii_lowercase();
    let kind_name = pattern.kind.to_string();
    let kind_compact = kind_name.replace('-', "");

    let mut marker_text = String::new();
    for prefix in [
        "mui", "chakra-", "ant-", "mantine-", "nextui", "fui-", "cds--", "bx--", "sl-", "v-",
        "el-", "q-", "ion-", "bp3-", "bp4-", "bp5-", "headlessui", "ui ",
    ] {
        if class.contains(prefix) {
            marker_text.push_str(&class);
            break;
        }
    }
    for (attr, value) in &entry.attributes {
        if attr.starts_with("data-state")
            || attr.starts_with("data-radix")
            || attr.starts_with("data-headlessui")
            || attr.starts_with("data-slot")
            || attr.starts_with("data-sonner")
        {
            marker_text.push(' ');
            marker_text.push_str(attr);
            marker_text.push(' ');
            marker_text.push_str(&value.to_ascii_lowercase());
        }
    }

    if !marker_text.is_empty() {
        // Exact archetype naming inside a framework namespace.
        if marker_text.contains(&kind_name) || marker_text.contains(&kind_compact) {
            return 100.0;
        }
        if pattern
            .selector_hints
            .iter()
            .any(|hint| marker_text.contains(hint))
        {
            return 70.0;
        }
        return 0.0;
    }

    // DaisyUI ships bare component classes; Tailwind shows as utility
    // density. Both are weaker evidence than a namespaced marker.
    let utility_count = class
        .split_whitespace()
        .filter(|c| is_tailwind_utility(c))
        .count();
    if utility_count >= 4 && class.contains(&kind_name) {
        return 60.0;
    }
    0.0
}

/// A rough Tailwind utility shape: known prefix families.
fn is_tailwind_utility(class: &str) -> bool {
    const PREFIXES: &[&str] = &[
        "p-", "px-", "py-", "pt-", "pb-", "pl-", "pr-", "m-", "mx-", "my-", "mt-", "mb-",
        "ml-", "mr-", "w-", "h-", "flex", "grid", "gap-", "text-", "font-", "bg-", "border",
        "rounded", "shadow", "items-", "justify-", "inline-", "absolute", "relative", "fixed",
        "z-", "overflow-", "transition", "duration-", "hover:", "focus:",
    ];
    PREFIXES.iter().any(|p| class.starts_with(p))
}

/// Behavioral signal: evidence scored against the archetype's profile.
fn behavioral_score(pattern: &ArchetypePattern, facts: &ElementFacts) -> f64 {
    let score: f64 = match pattern.behavior {
        BehaviorProfile::Interactive => {
            let mut s = 0.0;
            if facts.has_transition {
                s += 30.0;
            }
            if facts.hover_diff {
                s += 25.0;
            }
            if facts.hover_elevates {
                s += 10.0;
            }
            if facts.focus_diff || facts.focus_ring {
                s += 20.0;
            }
            if facts.active_diff {
                s += 15.0;
            }
            if facts.cursor == "pointer" {
                s += 20.0;
            }
            s
        }
        BehaviorProfile::Overlay => {
            let mut s = 0.0;
            if matches!(facts.position.as_str(), "fixed" | "absolute") {
                s += 50.0;
            }
            if facts.z_index.is_some_and(|z| z >= 100) {
                s += 30.0;
            } else if facts.z_index.is_some_and(|z| z >= 10) {
                s += 15.0;
            }
            if facts.elevation != Elevation::Flat {
                s += 20.0;
            }
            s
        }
        BehaviorProfile::Scrollable => {
            let mut s = 0.0;
            if matches!(facts.overflow.as_str(), "auto" | "scroll" | "overlay" | "hidden") {
                s += 70.0;
            }
            if facts.has_transition {
                s += 30.0;
            }
            s
        }
        BehaviorProfile::Loading => {
            let mut s = 0.0;
            if facts.has_animation {
                s += 70.0;
            }
            if facts.no_user_select {
                s += 15.0;
            }
            if facts.corner != CornerClass::Square {
                s += 15.0;
            }
            s
        }
        BehaviorProfile::Draggable => {
            let mut s = 0.0;
            if matches!(
                facts.cursor.as_str(),
                "grab" | "grabbing" | "move" | "col-resize" | "row-resize" | "ew-resize" | "ns-resize"
            ) {
                s += 70.0;
            }
            if facts.no_user_select {
                s += 30.0;
            }
            s
        }
        BehaviorProfile::Static => {
            // No interaction expected; interactive evidence argues for a
            // different archetype.
            if facts.hover_diff || facts.cursor == "pointer" {
                20.0
            } else {
                50.0
            }
        }
    };
    score.min(100.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::archetype::{patterns, ComponentKind};
    use std::collections::BTreeMap;

    fn button_entry() -> ComputedStyleEntry {
        let mut computed = BTreeMap::new();
        for (p, v) in [
            ("cursor", "pointer"),
            ("display", "inline-flex"),
            ("padding", "8px 16px"),
            ("border-radius", "6px"),
            ("background-color", "#0a84ff"),
            ("color", "#ffffff"),
            ("height", "36px"),
        ] {
            let _ = computed.insert(p.to_string(), v.to_string());
        }
        ComputedStyleEntry {
            selector: ".btn".to_string(),
            tag_name: "button".to_string(),
            role: Some("button".to_string()),
            computed_style: computed,
            ..ComputedStyleEntry::default()
        }
    }

    fn pattern_for(kind: ComponentKind) -> &'static ArchetypePattern {
        patterns()
            .iter()
            .find(|p| p.kind == kind)
            .expect("pattern exists")
    }

    #[test]
    fn button_scores_above_threshold() {
        let entry = button_entry();
        let facts = ElementFacts::compute(&entry);
        let score = confidence(pattern_for(ComponentKind::Button), &entry, &facts);
        assert!(score >= 50.0, "button scored {score}");
    }

    #[test]
    fn paragraph_scores_low_everywhere() {
        let mut computed = BTreeMap::new();
        let _ = computed.insert("display".to_string(), "block".to_string());
        let entry = ComputedStyleEntry {
            selector: "p.body-text".to_string(),
            tag_name: "p".to_string(),
            computed_style: computed,
            ..ComputedStyleEntry::default()
        };
        let facts = ElementFacts::compute(&entry);
        for pattern in patterns() {
            let score = confidence(pattern, &entry, &facts);
            assert!(score < 50.0, "{} scored {score} for a paragraph", pattern.kind);
        }
    }

    #[test]
    fn framework_marker_is_archetype_specific() {
        let mut entry = button_entry();
        let _ = entry
            .attributes
            .insert("class".to_string(), "MuiButton-root MuiButton-contained".to_string());
        let facts = ElementFacts::compute(&entry);
        let button = confidence(pattern_for(ComponentKind::Button), &entry, &facts);
        let dialog = confidence(pattern_for(ComponentKind::Dialog), &entry, &facts);
        assert!(button > dialog);
    }

    #[test]
    fn selector_exact_token_beats_substring() {
        let exact = ComputedStyleEntry {
            selector: ".btn".to_string(),
            tag_name: "div".to_string(),
            computed_style: {
                let mut m = BTreeMap::new();
                let _ = m.insert("display".to_string(), "block".to_string());
                m
            },
            ..ComputedStyleEntry::default()
        };
        let pattern = pattern_for(ComponentKind::Button);
        assert!((selector_score(pattern, &exact) - 100.0).abs() < f64::EPSILON);

        let partial = ComputedStyleEntry {
            selector: ".submit-btn-wrapper".to_string(),
            ..exact
        };
        // "btn" appears as a token inside the hyphenated selector
        assert!(selector_score(pattern, &partial) >= 70.0);
    }
}
