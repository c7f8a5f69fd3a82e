//! Box/text shadow parsing.
//!
//! [§ 7.2 box-shadow](https://www.w3.org/TR/css-backgrounds-3/#box-shadow)
//!
//! "`<shadow>` = inset? && `<length>`{2,4} && `<color>`?"
//!
//! The tokenizer here splits on whitespace while keeping function colors
//! (`rgba(...)`) intact. The first 2-4 tokens that parse as dimensions
//! become offsets, blur, and spread; whatever remains is the color
//! literal. Missing blur/spread default to `0px`; a missing or
//! unparseable color defaults to opaque black.

use serde::{Deserialize, Serialize};

use crate::color::{parse_color, ParsedColor, Rgba};
use crate::dimension::{parse_dimension, Dimension};

/// A canonical single-layer shadow.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shadow {
    /// Horizontal offset.
    pub offset_x: Dimension,
    /// Vertical offset.
    pub offset_y: Dimension,
    /// Blur radius (never negative in valid CSS).
    pub blur: Dimension,
    /// Spread distance.
    pub spread: Dimension,
    /// Shadow color.
    pub color: Rgba,
    /// Whether the shadow is drawn inside the box.
    pub inset: bool,
}

impl Shadow {
    /// Deterministic identity key: the canonical fields in a fixed-order
    /// JSON shape.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        format!(
            "{{\"x\":\"{}\",\"y\":\"{}\",\"blur\":\"{}\",\"spread\":\"{}\",\"color\":\"{}\",\"inset\":{}}}",
            self.offset_x.canonical_key(),
            self.offset_y.canonical_key(),
            self.blur.canonical_key(),
            self.spread.canonical_key(),
            self.color.canonical_key(),
            self.inset,
        )
    }
}

/// Parse a shadow declaration value.
///
/// Multi-layer values (`a, b, c`) contribute their first layer; `none`
/// and empty values return `None`.
#[must_use]
pub fn parse_shadow(input: &str) -> Option<Shadow> {
    let first_layer = split_top_level_commas(input).into_iter().next()?;
    let trimmed = first_layer.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return None;
    }

    let mut inset = false;
    let mut lengths: Vec<Dimension> = Vec::new();
    let mut color_parts: Vec<&str> = Vec::new();

    for token in split_respecting_parens(trimmed) {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if lengths.len() < 4 {
            if let Some(dim) = parse_dimension(token) {
                lengths.push(dim);
            } else {
                color_parts.push(token);
            }
        } else {
            color_parts.push(token);
        }
    }

    if lengths.len() < 2 {
        return None;
    }

    let color = if color_parts.is_empty() {
        Rgba::BLACK
    } else {
        match parse_color(&color_parts.join(" ")) {
            Some(ParsedColor::Concrete(rgba)) => rgba,
            // Unparseable or non-concrete literal falls back to black.
            _ => Rgba::BLACK,
        }
    };

    Some(Shadow {
        offset_x: lengths[0],
        offset_y: lengths[1],
        blur: lengths.get(2).copied().unwrap_or(Dimension::ZERO),
        spread: lengths.get(3).copied().unwrap_or(Dimension::ZERO),
        color,
        inset,
    })
}

/// Number of layers in a (possibly multi-layer) shadow value.
#[must_use]
pub fn layer_count(input: &str) -> usize {
    split_top_level_commas(input)
        .iter()
        .filter(|layer| !layer.trim().is_empty())
        .count()
}

/// Split on commas that are not inside parentheses, so
/// `0 1px 2px rgba(0, 0, 0, 0.1), 0 2px 4px #000` yields two layers.
fn split_top_level_commas(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                out.push(std::mem::take(&mut current));
            }
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

/// Split on whitespace that is not inside parentheses, keeping
/// `rgba(0, 0, 0, 0.1)` as a single token.
fn split_respecting_parens(input: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if start.is_none() {
                    start = Some(i);
                }
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    out.push(&input[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        out.push(&input[s..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dimension::Unit;

    #[test]
    fn basic_shadow() {
        let s = parse_shadow("0px 2px 4px rgba(0, 0, 0, 0.5)").expect("shadow");
        assert_eq!(s.offset_x.value, 0.0);
        assert_eq!(s.offset_y.value, 2.0);
        assert_eq!(s.blur.value, 4.0);
        assert_eq!(s.spread, Dimension::ZERO);
        assert!((s.color.a - 0.5).abs() < f32::EPSILON);
        assert!(!s.inset);
    }

    #[test]
    fn inset_and_spread() {
        let s = parse_shadow("inset 0 1px 2px 1px #336699").expect("shadow");
        assert!(s.inset);
        assert_eq!(s.spread.value, 1.0);
        assert_eq!(s.spread.unit, Unit::Px);
        assert_eq!(s.color.r, 0x33);
    }

    #[test]
    fn missing_color_defaults_to_black() {
        let s = parse_shadow("1px 1px").expect("shadow");
        assert_eq!(s.color, Rgba::BLACK);
        assert_eq!(s.blur, Dimension::ZERO);
    }

    #[test]
    fn multi_layer_takes_first() {
        let s = parse_shadow("0 1px 2px #111, 0 8px 16px #222").expect("shadow");
        assert_eq!(s.offset_y.value, 1.0);
        assert_eq!(layer_count("0 1px 2px #111, 0 8px 16px #222"), 2);
        assert_eq!(layer_count("0 1px 2px rgba(1, 2, 3, 0.4)"), 1);
    }

    #[test]
    fn rejects_none_and_garbage() {
        assert_eq!(parse_shadow("none"), None);
        assert_eq!(parse_shadow(""), None);
        assert_eq!(parse_shadow("red"), None);
    }
}
