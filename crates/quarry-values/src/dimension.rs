//! CSS dimension values and parsing.
//!
//! [CSS Values and Units Level 4](https://www.w3.org/TR/css-values-4/)
//!
//! A dimension is a signed number with one of the units the extraction
//! pipeline understands. A unitless numeric value is interpreted as `px`
//! (computed styles report resolved pixel numbers without units for some
//! properties).

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString};

/// [§ 4.1 Lengths](https://www.w3.org/TR/css-values-4/#lengths)
///
/// The closed set of units a dimension token may carry.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord,
    Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    /// "1px = 1/96th of 1in" - absolute pixels.
    Px,
    /// Relative to the root element's font size.
    Rem,
    /// Relative to the element's font size.
    Em,
    /// Percentage of the reference box.
    #[strum(serialize = "%")]
    #[serde(rename = "%")]
    Percent,
    /// 1% of viewport height.
    Vh,
    /// 1% of viewport width.
    Vw,
    /// 1% of the smaller viewport axis.
    Vmin,
    /// 1% of the larger viewport axis.
    Vmax,
    /// Advance measure of "0" in the element's font.
    Ch,
    /// x-height of the element's font.
    Ex,
}

/// A parsed dimension: value rounded to 3 decimals plus its unit.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dimension {
    /// Numeric magnitude, rounded to 3 decimal places at parse time.
    pub value: f64,
    /// The unit.
    pub unit: Unit,
}

impl Dimension {
    /// A zero-pixel dimension.
    pub const ZERO: Self = Self { value: 0.0, unit: Unit::Px };

    /// Deterministic identity key: `"{value}{unit}"` with minimal digits.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        format!("{}{}", trim_trailing_zeros(self.value), self.unit)
    }

    /// Pixel-normalized magnitude under the given root font size.
    ///
    /// Units without a pixel equivalence in this pipeline (`%`, viewport
    /// and font-metric units) return `None`.
    #[must_use]
    pub fn to_px(&self, root_font_size_px: f64) -> Option<f64> {
        match self.unit {
            Unit::Px => Some(self.value),
            // "Equal to the computed value of the font-size property of
            // the root element." Em is approximated against the same root
            // size; element context is not available post-harvest.
            Unit::Rem | Unit::Em => Some(self.value * root_font_size_px),
            Unit::Percent | Unit::Vh | Unit::Vw | Unit::Vmin | Unit::Vmax | Unit::Ch | Unit::Ex => {
                None
            }
        }
    }

}

/// Number of decimal places in an authored numeric literal. The noise
/// filter uses this on the original text (parsing rounds to 3 decimals,
/// which would hide computed artifacts like `14.399999618530273px`).
#[must_use]
pub fn literal_decimal_places(literal: &str) -> usize {
    let Some(dot) = literal.find('.') else {
        return 0;
    };
    literal[dot + 1..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count()
}

/// Parse a dimension literal: `-?digits(.digits)?(unit)?`.
///
/// A bare number is treated as pixels. Returns `None` for anything that
/// does not match, including non-finite results.
#[must_use]
pub fn parse_dimension(input: &str) -> Option<Dimension> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    let (number_part, unit_part) = split_numeric_prefix(trimmed)?;
    let value = number_part.parse::<f64>().ok()?;
    if !value.is_finite() {
        return None;
    }

    let unit = if unit_part.is_empty() {
        Unit::Px
    } else {
        unit_part.to_ascii_lowercase().parse::<Unit>().ok()?
    };

    Some(Dimension {
        value: round3(value),
        unit,
    })
}

/// Split `-12.5px` into (`-12.5`, `px`). The numeric prefix must be a
/// well-formed signed decimal with at least one digit.
fn split_numeric_prefix(s: &str) -> Option<(&str, &str)> {
    let bytes = s.as_bytes();
    let mut i = 0;
    if bytes.first() == Some(&b'-') {
        i += 1;
    }
    let digits_start = i;
    while i < bytes.len() && bytes[i].is_ascii_digit() {
        i += 1;
    }
    if i == digits_start {
        return None;
    }
    if bytes.get(i) == Some(&b'.') {
        i += 1;
        let frac_start = i;
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        if i == frac_start {
            return None;
        }
    }
    Some((&s[..i], &s[i..]))
}

fn round3(v: f64) -> f64 {
    (v * 1000.0).round() / 1000.0
}

/// Minimal decimal rendering: `16` not `16.0`, `0.5` not `0.500`.
fn trim_trailing_zeros(v: f64) -> String {
    let s = format!("{v:.3}");
    let t = s.trim_end_matches('0').trim_end_matches('.');
    if t.is_empty() { "0".to_string() } else { t.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_common_units() {
        assert_eq!(
            parse_dimension("16px"),
            Some(Dimension { value: 16.0, unit: Unit::Px })
        );
        assert_eq!(
            parse_dimension("1.5rem"),
            Some(Dimension { value: 1.5, unit: Unit::Rem })
        );
        assert_eq!(
            parse_dimension("-4px"),
            Some(Dimension { value: -4.0, unit: Unit::Px })
        );
        assert_eq!(
            parse_dimension("50%"),
            Some(Dimension { value: 50.0, unit: Unit::Percent })
        );
        assert_eq!(
            parse_dimension("100vh"),
            Some(Dimension { value: 100.0, unit: Unit::Vh })
        );
    }

    #[test]
    fn unitless_is_px() {
        assert_eq!(
            parse_dimension("0"),
            Some(Dimension { value: 0.0, unit: Unit::Px })
        );
        assert_eq!(
            parse_dimension("24"),
            Some(Dimension { value: 24.0, unit: Unit::Px })
        );
    }

    #[test]
    fn rejects_malformed() {
        assert_eq!(parse_dimension("auto"), None);
        assert_eq!(parse_dimension("px"), None);
        assert_eq!(parse_dimension("12pt"), None);
        assert_eq!(parse_dimension("1.px"), None);
        assert_eq!(parse_dimension(""), None);
    }

    #[test]
    fn rounds_to_three_decimals() {
        let d = parse_dimension("0.123456px").unwrap_or(Dimension::ZERO);
        assert!((d.value - 0.123).abs() < f64::EPSILON);
    }

    #[test]
    fn px_normalization() {
        let rem = Dimension { value: 1.5, unit: Unit::Rem };
        assert_eq!(rem.to_px(16.0), Some(24.0));
        let pct = Dimension { value: 50.0, unit: Unit::Percent };
        assert_eq!(pct.to_px(16.0), None);
    }

    #[test]
    fn canonical_keys() {
        assert_eq!(
            Dimension { value: 16.0, unit: Unit::Px }.canonical_key(),
            "16px"
        );
        assert_eq!(
            Dimension { value: 1.5, unit: Unit::Rem }.canonical_key(),
            "1.5rem"
        );
        assert_eq!(
            Dimension { value: 50.0, unit: Unit::Percent }.canonical_key(),
            "50%"
        );
    }
}
