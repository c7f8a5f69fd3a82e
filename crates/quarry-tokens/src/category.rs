//! Token categories.

use serde::Serialize;
use strum_macros::{Display, EnumIter};

/// The closed set of token categories the extractor emits.
///
/// Categories are a closed variant set on purpose: routing is an
/// exhaustive match, and a plugin registry would defeat determinism.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Display, EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum TokenCategory {
    /// Colors from any color-bearing property.
    Color,
    /// Spacing dimensions: margins, paddings, gaps, sizes.
    DimensionSpacing,
    /// Corner radii.
    DimensionRadius,
    /// Font family stacks.
    TypographyFamily,
    /// Font sizes.
    TypographySize,
    /// Font weights.
    TypographyWeight,
    /// Box and text shadows.
    Shadow,
    /// Transition and animation durations.
    Duration,
}

impl TokenCategory {
    /// The W3C `$type` string for tokens in this category.
    #[must_use]
    pub fn w3c_type(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::DimensionSpacing | Self::DimensionRadius => "dimension",
            Self::TypographyFamily => "fontFamily",
            Self::TypographySize => "dimension",
            Self::TypographyWeight => "fontWeight",
            Self::Shadow => "shadow",
            Self::Duration => "duration",
        }
    }

    /// The top-level group name this category serializes under in the
    /// W3C token set.
    #[must_use]
    pub fn w3c_group(self) -> &'static str {
        match self {
            Self::Color => "color",
            Self::DimensionSpacing | Self::DimensionRadius => "dimension",
            Self::TypographyFamily | Self::TypographySize | Self::TypographyWeight => "typography",
            Self::Shadow => "shadow",
            Self::Duration => "duration",
        }
    }

    /// Confidence formula constants `(base, per_usage)`: confidence is
    /// `clamp(base + per_usage * usage, 0, 100)`. Monotonic in usage.
    #[must_use]
    pub fn confidence_constants(self) -> (u32, u32) {
        match self {
            Self::Color => (75, 2),
            Self::DimensionSpacing | Self::DimensionRadius => (70, 2),
            Self::TypographyFamily => (80, 1),
            Self::TypographySize | Self::TypographyWeight => (75, 2),
            Self::Shadow | Self::Duration => (70, 3),
        }
    }

    /// Compute a token's confidence from its usage count.
    #[must_use]
    pub fn confidence(self, usage: u32) -> u32 {
        let (base, per_usage) = self.confidence_constants();
        base.saturating_add(per_usage.saturating_mul(usage)).min(100)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn confidence_is_monotonic_and_clamped() {
        for category in TokenCategory::iter() {
            let mut last = 0;
            for usage in 0..200 {
                let c = category.confidence(usage);
                assert!(c >= last, "{category} not monotonic at usage {usage}");
                assert!(c <= 100);
                last = c;
            }
        }
    }

    #[test]
    fn color_constants_match_contract() {
        assert_eq!(TokenCategory::Color.confidence(1), 77);
        assert_eq!(TokenCategory::TypographyFamily.confidence(1), 81);
        assert_eq!(TokenCategory::Shadow.confidence(10), 100);
    }
}
