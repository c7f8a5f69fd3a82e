//! Border shorthand parsing.
//!
//! [§ 3.3 border](https://www.w3.org/TR/css-backgrounds-3/#the-border-shorthands)
//!
//! "`border` = `<line-width>` || `<line-style>` || `<color>`"
//!
//! The three pieces may appear in any order and each may be omitted.
//! Missing pieces take the shorthand defaults: `1px solid #000`.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

use crate::color::{parse_color, ParsedColor, Rgba};
use crate::dimension::{parse_dimension, Dimension, Unit};

/// [§ 3.2 border-style](https://www.w3.org/TR/css-backgrounds-3/#border-style)
///
/// The closed set of line styles.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Display, EnumString,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum BorderStyle {
    /// No border, zero width.
    None,
    /// Same as none, but wins border-conflict resolution in tables.
    Hidden,
    /// A series of dots.
    Dotted,
    /// A series of dashes.
    Dashed,
    /// A single solid line.
    Solid,
    /// Two parallel solid lines.
    Double,
    /// Carved into the canvas.
    Groove,
    /// Coming out of the canvas.
    Ridge,
    /// Box looks sunken.
    Inset,
    /// Box looks raised.
    Outset,
}

/// A parsed border shorthand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Border {
    /// Line width.
    pub width: Dimension,
    /// Line style.
    pub style: BorderStyle,
    /// Line color.
    pub color: Rgba,
}

impl Default for Border {
    fn default() -> Self {
        Self {
            width: Dimension { value: 1.0, unit: Unit::Px },
            style: BorderStyle::Solid,
            color: Rgba::BLACK,
        }
    }
}

/// Lenient positional parse of a border shorthand value.
///
/// Each whitespace token is tried as a width, then a style keyword, then a
/// color; unrecognized tokens are skipped. Named widths (`thin`/`medium`/
/// `thick`) map to their usual pixel values. An empty or `none`-only value
/// still yields a border (style `none`), matching how computed styles
/// report it.
#[must_use]
pub fn parse_border(input: &str) -> Option<Border> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let mut border = Border::default();
    let mut saw_any = false;

    for token in split_respecting_parens(trimmed) {
        if let Some(width) = named_width(token).or_else(|| parse_dimension(token)) {
            border.width = width;
            saw_any = true;
        } else if let Ok(style) = token.parse::<BorderStyle>() {
            border.style = style;
            saw_any = true;
        } else if let Some(ParsedColor::Concrete(color)) = parse_color(token) {
            border.color = color;
            saw_any = true;
        }
    }

    saw_any.then_some(border)
}

/// `<line-width>` keywords per [§ 3.1](https://www.w3.org/TR/css-backgrounds-3/#the-border-width).
fn named_width(token: &str) -> Option<Dimension> {
    let px = match token.to_ascii_lowercase().as_str() {
        "thin" => 1.0,
        "medium" => 3.0,
        "thick" => 5.0,
        _ => return None,
    };
    Some(Dimension { value: px, unit: Unit::Px })
}

/// Whitespace split keeping function colors intact (shared shape with the
/// shadow tokenizer; borders can carry `rgb(...)` colors too).
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

    #[test]
    fn full_shorthand() {
        let b = parse_border("2px dashed #336699").expect("border");
        assert_eq!(b.width.value, 2.0);
        assert_eq!(b.style, BorderStyle::Dashed);
        assert_eq!(b.color.r, 0x33);
    }

    #[test]
    fn pieces_default() {
        let b = parse_border("solid").expect("border");
        assert_eq!(b.width.value, 1.0);
        assert_eq!(b.color, Rgba::BLACK);

        let b = parse_border("red").expect("border");
        assert_eq!(b.style, BorderStyle::Solid);
        assert_eq!(b.color.r, 255);
    }

    #[test]
    fn named_widths_and_function_colors() {
        let b = parse_border("thick solid rgb(10, 20, 30)").expect("border");
        assert_eq!(b.width.value, 5.0);
        assert_eq!(b.color.g, 20);
    }

    #[test]
    fn empty_is_none() {
        assert_eq!(parse_border(""), None);
        assert_eq!(parse_border("   "), None);
    }
}
