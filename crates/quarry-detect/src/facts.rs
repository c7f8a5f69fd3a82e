//! Per-element derived facts.
//!
//! The scoring signals all consult the same handful of derived values
//! (padding geometry, corner class, elevation, state diffs), so they are
//! computed once per element here.

use quarry_values::{parse_border, parse_dimension, parse_shadow, shadow, BorderStyle, Unit};

use crate::element::ComputedStyleEntry;

/// Corner-rounding classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CornerClass {
    /// No meaningful radius.
    Square,
    /// Radius in the 2-16px band.
    Rounded,
    /// Radius at least half the element height, or the 9999px idiom.
    Pill,
    /// Equal axes with a 50% (or pill) radius.
    Circle,
}

/// Shadow elevation buckets by blur radius and layer count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Elevation {
    /// No shadow.
    Flat,
    /// Blur under 8px, single layer.
    Low,
    /// Blur 8-24px or two layers.
    Medium,
    /// Blur above 24px or three-plus layers.
    High,
}

/// Everything the signals need, derived once.
#[derive(Debug, Clone)]
pub struct ElementFacts {
    /// `display` value.
    pub display: String,
    /// `position` value.
    pub position: String,
    /// `cursor` value.
    pub cursor: String,
    /// Effective overflow: the first non-`visible` of `overflow`,
    /// `overflow-x`, `overflow-y`.
    pub overflow: String,
    /// Width in pixels, when resolvable.
    pub width_px: Option<f64>,
    /// Height in pixels, when resolvable.
    pub height_px: Option<f64>,
    /// Mean horizontal padding in pixels.
    pub padding_x: f64,
    /// Mean vertical padding in pixels.
    pub padding_y: f64,
    /// Border radius in pixels (percent radii resolve against height).
    pub radius_px: Option<f64>,
    /// Corner classification.
    pub corner: CornerClass,
    /// Whether a visible border is present.
    pub bordered: bool,
    /// Elevation bucket.
    pub elevation: Elevation,
    /// Number of shadow layers.
    pub shadow_layers: usize,
    /// `z-index` when numeric.
    pub z_index: Option<i64>,
    /// Font size in pixels.
    pub font_size_px: Option<f64>,
    /// Whether a non-default transition is declared.
    pub has_transition: bool,
    /// Whether an animation is declared.
    pub has_animation: bool,
    /// `text-overflow: ellipsis` style truncation.
    pub truncated: bool,
    /// `user-select: none`.
    pub no_user_select: bool,
    /// Whether `:hover` styles differ from base.
    pub hover_diff: bool,
    /// Whether the hover diff changes the shadow (hover elevation).
    pub hover_elevates: bool,
    /// Whether `:focus` styles differ from base.
    pub focus_diff: bool,
    /// Whether the focus diff adds a ring (outline or box-shadow).
    pub focus_ring: bool,
    /// Whether `:active` styles differ from base.
    pub active_diff: bool,
    /// Whether both paddings sit on the 4px grid.
    pub on_spacing_grid: bool,
}

impl ElementFacts {
    /// Derive the facts for one element.
    #[must_use]
    pub fn compute(entry: &ComputedStyleEntry) -> Self {
        let style = |p: &str| entry.style(p).unwrap_or("").to_string();

        let width_px = px_of(entry, "width");
        let height_px = px_of(entry, "height");

        let padding_left = px_of(entry, "padding-left").unwrap_or(0.0);
        let padding_right = px_of(entry, "padding-right").unwrap_or(0.0);
        let padding_top = px_of(entry, "padding-top").unwrap_or(0.0);
        let padding_bottom = px_of(entry, "padding-bottom").unwrap_or(0.0);
        let (shorthand_y, shorthand_x) = padding_shorthand(entry);
        let padding_x = if padding_left + padding_right > 0.0 {
            (padding_left + padding_right) / 2.0
        } else {
            shorthand_x
        };
        let padding_y = if padding_top + padding_bottom > 0.0 {
            (padding_top + padding_bottom) / 2.0
        } else {
            shorthand_y
        };

        let (radius_px, radius_percent) = radius_of(entry, height_px);
        let corner = classify_corner(radius_px, radius_percent, width_px, height_px);

        let shadow_value = style("box-shadow");
        let shadow_layers = if shadow_value.is_empty() || shadow_value == "none" {
            0
        } else {
            shadow::layer_count(&shadow_value)
        };
        let max_blur = parse_shadow(&shadow_value).map_or(0.0, |s| s.blur.value.abs());
        let elevation = classify_elevation(shadow_layers, max_blur);

        // The `border` shorthand (when present) is authoritative; longhand
        // width/style pairs cover computed styles that expand it.
        let bordered = match entry.style("border").and_then(parse_border) {
            Some(border) => {
                border.width.value > 0.0
                    && !matches!(border.style, BorderStyle::None | BorderStyle::Hidden)
            }
            None => {
                let width = px_of(entry, "border-width")
                    .or_else(|| px_of(entry, "border-top-width"))
                    .unwrap_or(0.0);
                let border_style = style("border-style");
                width > 0.0
                    && !border_style.is_empty()
                    && border_style != "none"
                    && border_style != "hidden"
            }
        };

        let transition = style("transition");
        let has_transition = !transition.is_empty()
            && transition != "none"
            && transition != "all 0s ease 0s"
            || entry.style("transition-duration").is_some_and(|d| d != "0s");
        let animation = style("animation");
        let has_animation =
            (!animation.is_empty() && animation != "none") || entry.style("animation-name").is_some_and(|n| n != "none");

        let hover = entry.hover.as_ref().map(|s| entry.state_diff(s)).unwrap_or_default();
        let focus = entry.focus.as_ref().map(|s| entry.state_diff(s)).unwrap_or_default();
        let active = entry.active.as_ref().map(|s| entry.state_diff(s)).unwrap_or_default();

        let overflow = ["overflow", "overflow-x", "overflow-y"]
            .iter()
            .map(|p| style(p))
            .find(|v| !v.is_empty() && v != "visible")
            .unwrap_or_default();

        let on_grid = |v: f64| v == 0.0 || (v.round() - v).abs() < 0.01 && (v.round() as i64) % 4 == 0;

        Self {
            display: style("display"),
            position: style("position"),
            cursor: style("cursor"),
            overflow,
            width_px,
            height_px,
            padding_x,
            padding_y,
            radius_px,
            corner,
            bordered,
            elevation,
            shadow_layers,
            z_index: entry
                .style("z-index")
                .and_then(|z| z.parse::<i64>().ok()),
            font_size_px: px_of(entry, "font-size"),
            has_transition,
            has_animation,
            truncated: style("text-overflow") == "ellipsis",
            no_user_select: style("user-select") == "none",
            hover_diff: !hover.is_empty(),
            hover_elevates: hover.contains_key("box-shadow"),
            focus_diff: !focus.is_empty(),
            focus_ring: focus.contains_key("outline")
                || focus.contains_key("outline-width")
                || focus.contains_key("box-shadow"),
            active_diff: !active.is_empty(),
            on_spacing_grid: on_grid(padding_x) && on_grid(padding_y),
        }
    }

    /// Pixel value of an arbitrary property of this element.
    #[must_use]
    pub fn px(entry: &ComputedStyleEntry, property: &str) -> Option<f64> {
        px_of(entry, property)
    }
}

fn px_of(entry: &ComputedStyleEntry, property: &str) -> Option<f64> {
    let value = entry.style(property)?;
    let dim = parse_dimension(value.split_whitespace().next()?)?;
    dim.to_px(16.0)
}

/// `padding: 8px 16px` shorthand as (vertical, horizontal).
fn padding_shorthand(entry: &ComputedStyleEntry) -> (f64, f64) {
    let Some(value) = entry.style("padding") else {
        return (0.0, 0.0);
    };
    let parts: Vec<f64> = value
        .split_whitespace()
        .filter_map(parse_dimension)
        .filter_map(|d| d.to_px(16.0))
        .collect();
    match parts.as_slice() {
        [all] => (*all, *all),
        [y, x] => (*y, *x),
        [top, x, bottom] => ((top + bottom) / 2.0, *x),
        [top, right, bottom, left] => ((top + bottom) / 2.0, (right + left) / 2.0),
        _ => (0.0, 0.0),
    }
}

/// Radius in pixels plus whether it was authored as a percentage.
fn radius_of(entry: &ComputedStyleEntry, height_px: Option<f64>) -> (Option<f64>, bool) {
    let value = entry
        .style("border-radius")
        .or_else(|| entry.style("border-top-left-radius"));
    let Some(value) = value else {
        return (None, false);
    };
    let Some(dim) = value.split_whitespace().find_map(parse_dimension) else {
        return (None, false);
    };
    if dim.unit == Unit::Percent {
        let px = height_px.map(|h| h * dim.value / 100.0);
        return (px, dim.value >= 50.0);
    }
    (dim.to_px(16.0), false)
}

fn classify_corner(
    radius_px: Option<f64>,
    percent_half: bool,
    width_px: Option<f64>,
    height_px: Option<f64>,
) -> CornerClass {
    let radius = radius_px.unwrap_or(0.0);
    let square_aspect = match (width_px, height_px) {
        (Some(w), Some(h)) if h > 0.0 => (w / h - 1.0).abs() < 0.05,
        _ => false,
    };
    let pill = radius >= 9999.0
        || percent_half
        || height_px.is_some_and(|h| h > 0.0 && radius >= h / 2.0);

    if pill && square_aspect {
        CornerClass::Circle
    } else if pill {
        CornerClass::Pill
    } else if (2.0..=16.0).contains(&radius) {
        CornerClass::Rounded
    } else {
        CornerClass::Square
    }
}

fn classify_elevation(layers: usize, max_blur: f64) -> Elevation {
    if layers == 0 {
        Elevation::Flat
    } else if layers >= 3 || max_blur > 24.0 {
        Elevation::High
    } else if layers == 2 || max_blur >= 8.0 {
        Elevation::Medium
    } else {
        Elevation::Low
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap;

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
    fn padding_shorthand_and_grid() {
        let facts = ElementFacts::compute(&entry(&[("padding", "8px 16px")]));
        assert!((facts.padding_y - 8.0).abs() < f64::EPSILON);
        assert!((facts.padding_x - 16.0).abs() < f64::EPSILON);
        assert!(facts.on_spacing_grid);

        let off = ElementFacts::compute(&entry(&[("padding", "7px 13px")]));
        assert!(!off.on_spacing_grid);
    }

    #[test]
    fn corner_classes() {
        let rounded = ElementFacts::compute(&entry(&[
            ("border-radius", "6px"),
            ("height", "36px"),
        ]));
        assert_eq!(rounded.corner, CornerClass::Rounded);

        let pill = ElementFacts::compute(&entry(&[
            ("border-radius", "9999px"),
            ("height", "24px"),
            ("width", "64px"),
        ]));
        assert_eq!(pill.corner, CornerClass::Pill);

        let circle = ElementFacts::compute(&entry(&[
            ("border-radius", "50%"),
            ("height", "40px"),
            ("width", "40px"),
        ]));
        assert_eq!(circle.corner, CornerClass::Circle);
    }

    #[test]
    fn border_fact_from_shorthand() {
        let with = ElementFacts::compute(&entry(&[("border", "1px solid rgb(17, 24, 39)")]));
        assert!(with.bordered);

        let without = ElementFacts::compute(&entry(&[("border", "0px none rgb(0, 0, 0)")]));
        assert!(!without.bordered);
    }

    #[test]
    fn elevation_buckets() {
        let flat = ElementFacts::compute(&entry(&[]));
        assert_eq!(flat.elevation, Elevation::Flat);

        let low = ElementFacts::compute(&entry(&[("box-shadow", "0 1px 2px rgba(0, 0, 0, 0.2)")]));
        assert_eq!(low.elevation, Elevation::Low);

        let high = ElementFacts::compute(&entry(&[(
            "box-shadow",
            "0 4px 32px rgba(0, 0, 0, 0.3)",
        )]));
        assert_eq!(high.elevation, Elevation::High);
    }

    #[test]
    fn state_facts() {
        let mut e = entry(&[("background-color", "#0a84ff"), ("transition", "all 0.2s ease")]);
        let mut hover = BTreeMap::new();
        let _ = hover.insert("background-color".to_string(), "#0060df".to_string());
        e.hover = Some(hover);

        let facts = ElementFacts::compute(&e);
        assert!(facts.has_transition);
        assert!(facts.hover_diff);
        assert!(!facts.hover_elevates);
    }
}
