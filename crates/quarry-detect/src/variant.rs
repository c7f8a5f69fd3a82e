//! Variant inference.
//!
//! A handful of archetypes carry a recognizable visual variant: buttons
//! split into solid/outline/ghost by how they use background and border,
//! alerts by their background hue, badges by fill. Everything else has no
//! inferred variant.

use quarry_values::{parse_color, ParsedColor};

use crate::archetype::ComponentKind;
use crate::capture::ComponentTokens;

/// Infer the variant for a matched element, if the archetype has one.
#[must_use]
pub fn infer_variant(kind: ComponentKind, tokens: &ComponentTokens) -> Option<String> {
    match kind {
        ComponentKind::Button | ComponentKind::Toggle => Some(button_variant(tokens)),
        ComponentKind::Alert | ComponentKind::Toast => alert_variant(tokens),
        ComponentKind::Badge => Some(badge_variant(tokens)),
        _ => None,
    }
}

/// Buttons: background plus foreground is `solid`, border without
/// background is `outline`, neither is `ghost`.
fn button_variant(tokens: &ComponentTokens) -> String {
    let has_background = has_concrete_color(tokens, "background-color");
    let has_foreground = tokens.color.contains_key("color");
    let has_border = tokens.border.keys().any(|k| {
        k == "border" || k == "border-width" || k == "border-color" || k == "border-style"
    });

    if has_background && has_foreground {
        "solid".to_string()
    } else if has_border && !has_background {
        "outline".to_string()
    } else {
        "ghost".to_string()
    }
}

/// Alerts and toasts: classify by background hue arc.
fn alert_variant(tokens: &ComponentTokens) -> Option<String> {
    let value = tokens.color.get("background-color")?;
    let rgba = match parse_color(value) {
        Some(ParsedColor::Concrete(rgba)) => rgba,
        _ => return None,
    };
    let hsl = rgba.to_hsl();
    if hsl.s < 0.15 {
        return Some("neutral".to_string());
    }
    let variant = if hsl.h < 20.0 || hsl.h >= 340.0 {
        "destructive"
    } else if hsl.h < 70.0 {
        "warning"
    } else if hsl.h < 160.0 {
        "success"
    } else {
        "info"
    };
    Some(variant.to_string())
}

/// Badges: filled or outline.
fn badge_variant(tokens: &ComponentTokens) -> String {
    if has_concrete_color(tokens, "background-color") {
        "solid".to_string()
    } else {
        "outline".to_string()
    }
}

fn has_concrete_color(tokens: &ComponentTokens, property: &str) -> bool {
    tokens
        .color
        .get(property)
        .and_then(|v| parse_color(v))
        .and_then(|c| c.concrete())
        .is_some_and(|rgba| rgba.a > 0.01)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

    fn tokens(colors: &[(&str, &str)], border: &[(&str, &str)]) -> ComponentTokens {
        let mut t = ComponentTokens::default();
        for (p, v) in colors {
            let _ = t.color.insert((*p).to_string(), (*v).to_string());
        }
        for (p, v) in border {
            let _ = t.border.insert((*p).to_string(), (*v).to_string());
        }
        t
    }

    #[test]
    fn button_variants() {
        let solid = tokens(&[("background-color", "#0a84ff"), ("color", "#fff")], &[]);
        assert_eq!(
            infer_variant(ComponentKind::Button, &solid).as_deref(),
            Some("solid")
        );

        let outline = tokens(&[], &[("border", "1px solid #0a84ff")]);
        assert_eq!(
            infer_variant(ComponentKind::Button, &outline).as_deref(),
            Some("outline")
        );

        let ghost = tokens(&[], &[]);
        assert_eq!(
            infer_variant(ComponentKind::Button, &ghost).as_deref(),
            Some("ghost")
        );
    }

    #[test]
    fn alert_hue_classification() {
        let destructive = tokens(&[("background-color", "#dc2626")], &[]);
        assert_eq!(
            infer_variant(ComponentKind::Alert, &destructive).as_deref(),
            Some("destructive")
        );

        let warning = tokens(&[("background-color", "#f59e0b")], &[]);
        assert_eq!(
            infer_variant(ComponentKind::Alert, &warning).as_deref(),
            Some("warning")
        );

        let info = tokens(&[("background-color", "#3b82f6")], &[]);
        assert_eq!(
            infer_variant(ComponentKind::Alert, &info).as_deref(),
            Some("info")
        );
    }

    #[test]
    fn non_variant_archetypes() {
        let t = tokens(&[("background-color", "#fff")], &[]);
        assert_eq!(infer_variant(ComponentKind::Card, &t), None);
        assert_eq!(infer_variant(ComponentKind::Separator, &t), None);
    }
}
