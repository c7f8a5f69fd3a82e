//! Token curation.
//!
//! Takes the deduplicated buckets, applies the caller's usage and
//! confidence thresholds, ranks what remains, and attaches semantic
//! labels plus display previews. Percentages are computed over the
//! filtered set (before any caps), so within a category they sum to 100
//! give or take rounding.

use serde::Serialize;

use quarry_common::Options;
use quarry_values::{semantic, Rgba};

use crate::bucket::CanonicalValue;
use crate::category::TokenCategory;
use crate::dedup::{dedup_category, DedupedCategory};
use crate::extract::Aggregation;
use crate::w3c::{bucket_name, NameAllocator};

/// Display payload attached to each curated token.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TokenPreview {
    /// Colors: hex, rgb() rendering, and scaled OKLCH triple.
    Color {
        /// Hex rendering.
        hex: String,
        /// `rgb(...)`/`rgba(...)` rendering.
        rgb: String,
        /// `[lightness, chroma, hue]` in scaled OKLCH.
        oklch: [f64; 3],
    },
    /// Dimensions: pixel equivalence when one exists.
    Dimension {
        /// Pixel-normalized magnitude.
        #[serde(skip_serializing_if = "Option::is_none")]
        px: Option<f64>,
    },
    /// Font families: the lead family plus a stack sample.
    Font {
        /// First family in the stack.
        family: String,
        /// The stack as authored.
        stack: String,
    },
    /// Shadows: the authored CSS.
    Shadow {
        /// Raw shadow text.
        css: String,
    },
    /// Durations: integer milliseconds.
    Duration {
        /// Milliseconds.
        ms: u64,
    },
    /// Weights and anything else without a richer preview.
    Plain {
        /// Display text.
        text: String,
    },
}

/// One curated token.
#[derive(Debug, Clone, Serialize)]
pub struct CuratedToken {
    /// Deterministic semantic name, unique within the category.
    pub name: String,
    /// Canonical display value (hex for colors, `{value}{unit}` for
    /// dimensions, authored text for shadows).
    pub value: String,
    /// Contributing declaration count.
    pub usage: u32,
    /// Share of the category's total usage, rounded.
    pub percentage: u32,
    /// Usage-derived confidence, 0-100.
    pub confidence: u32,
    /// Semantic label (scale position, hue family, elevation).
    pub semantic: String,
    /// Display preview.
    pub preview: TokenPreview,
}

/// The curated output across categories.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CuratedTokenSet {
    /// Curated colors, usage-ranked.
    pub colors: Vec<CuratedToken>,
    /// Curated spacing dimensions.
    pub spacing: Vec<CuratedToken>,
    /// Curated radii.
    pub radius: Vec<CuratedToken>,
    /// Curated font families.
    pub font_families: Vec<CuratedToken>,
    /// Curated font sizes.
    pub font_sizes: Vec<CuratedToken>,
    /// Curated font weights.
    pub font_weights: Vec<CuratedToken>,
    /// Curated shadows.
    pub shadows: Vec<CuratedToken>,
    /// Curated durations.
    pub durations: Vec<CuratedToken>,
}

impl CuratedTokenSet {
    /// All categories as `(label, tokens)` pairs, in a fixed order.
    #[must_use]
    pub fn categories(&self) -> Vec<(&'static str, &[CuratedToken])> {
        vec![
            ("colors", self.colors.as_slice()),
            ("spacing", self.spacing.as_slice()),
            ("radius", self.radius.as_slice()),
            ("font-families", self.font_families.as_slice()),
            ("font-sizes", self.font_sizes.as_slice()),
            ("font-weights", self.font_weights.as_slice()),
            ("shadows", self.shadows.as_slice()),
            ("durations", self.durations.as_slice()),
        ]
    }

    /// Total curated token count.
    #[must_use]
    pub fn total(&self) -> usize {
        self.categories().iter().map(|(_, t)| t.len()).sum()
    }
}

/// Run dedup plus curation for every category.
#[must_use]
pub fn curate(aggregation: &Aggregation, options: &Options) -> CuratedTokenSet {
    let caps = options.caps;
    let cap = |limit: usize| {
        if options.return_all_filtered {
            usize::MAX
        } else {
            limit
        }
    };

    CuratedTokenSet {
        colors: curate_category(aggregation, TokenCategory::Color, options, cap(caps.max_colors)),
        spacing: curate_category(
            aggregation,
            TokenCategory::DimensionSpacing,
            options,
            cap(caps.max_spacing),
        ),
        radius: curate_category(
            aggregation,
            TokenCategory::DimensionRadius,
            options,
            cap(caps.max_radius),
        ),
        font_families: curate_category(
            aggregation,
            TokenCategory::TypographyFamily,
            options,
            cap(caps.max_fonts),
        ),
        font_sizes: curate_category(
            aggregation,
            TokenCategory::TypographySize,
            options,
            cap(caps.max_sizes),
        ),
        font_weights: curate_category(
            aggregation,
            TokenCategory::TypographyWeight,
            options,
            cap(caps.max_sizes),
        ),
        shadows: curate_category(aggregation, TokenCategory::Shadow, options, cap(caps.max_shadows)),
        durations: curate_category(
            aggregation,
            TokenCategory::Duration,
            options,
            cap(caps.max_motion),
        ),
    }
}

fn curate_category(
    aggregation: &Aggregation,
    category: TokenCategory,
    options: &Options,
    cap: usize,
) -> Vec<CuratedToken> {
    let DedupedCategory { buckets } = dedup_category(aggregation, category, options.root_font_size_px);

    let surviving: Vec<_> = buckets
        .into_iter()
        .filter(|b| {
            b.usage_count >= options.min_usage
                && category.confidence(b.usage_count) >= options.min_confidence
        })
        .collect();

    let total_usage: u64 = surviving.iter().map(|b| u64::from(b.usage_count)).sum();
    let mut allocator = NameAllocator::default();

    let mut tokens: Vec<CuratedToken> = surviving
        .iter()
        .enumerate()
        .map(|(position, bucket)| {
            let base = bucket_name(category, bucket, position, options.root_font_size_px);
            let name = allocator.allocate(&base);
            let percentage = if total_usage == 0 {
                0
            } else {
                let share =
                    f64::from(bucket.usage_count) * 100.0 / total_usage as f64;
                share.round() as u32
            };
            CuratedToken {
                name,
                value: display_value(&bucket.canonical, &bucket.original_literal),
                usage: bucket.usage_count,
                percentage,
                confidence: category.confidence(bucket.usage_count),
                semantic: semantic_label(category, bucket, options.root_font_size_px),
                preview: preview(&bucket.canonical, &bucket.original_literal, options),
            }
        })
        .collect();

    tokens.truncate(cap);
    tokens
}

/// The display value for a curated token.
fn display_value(canonical: &CanonicalValue, literal: &str) -> String {
    match canonical {
        CanonicalValue::Color(rgba) => rgba.to_hex_string(),
        CanonicalValue::Dimension(dim) => dim.canonical_key(),
        CanonicalValue::FontFamily(stack) => {
            stack.first().cloned().unwrap_or_default()
        }
        CanonicalValue::FontWeight(w) => w.to_string(),
        CanonicalValue::Shadow(_) => literal.to_string(),
        CanonicalValue::DurationMs(ms) => format!("{ms}ms"),
    }
}

/// The semantic label: the value re-mapped through the range namers,
/// without the uniqueness machinery.
fn semantic_label(
    category: TokenCategory,
    bucket: &crate::bucket::RawTokenBucket,
    root_font_size_px: f64,
) -> String {
    match &bucket.canonical {
        CanonicalValue::Color(rgba) => {
            let hsl = rgba.to_hsl();
            if hsl.s < 0.1 {
                "neutral".to_string()
            } else {
                semantic::hue_family(hsl.h).to_string()
            }
        }
        CanonicalValue::Dimension(dim) => dim.to_px(root_font_size_px).map_or_else(
            || dim.canonical_key(),
            |px| match category {
                TokenCategory::DimensionRadius => semantic::radius_name(px),
                TokenCategory::TypographySize => semantic::font_size_name(px),
                _ => semantic::spacing_name(px),
            },
        ),
        CanonicalValue::FontFamily(stack) => stack
            .first()
            .map(|f| semantic::family_slug(f))
            .unwrap_or_default(),
        CanonicalValue::FontWeight(w) => semantic::font_weight_name(*w),
        CanonicalValue::Shadow(shadow) => semantic::shadow_name(shadow),
        CanonicalValue::DurationMs(ms) => semantic::duration_name(*ms),
    }
}

fn preview(canonical: &CanonicalValue, literal: &str, options: &Options) -> TokenPreview {
    match canonical {
        CanonicalValue::Color(rgba) => {
            let oklch = if options.approximate_oklch {
                rgba.to_oklch_approximate()
            } else {
                rgba.to_oklch()
            };
            TokenPreview::Color {
                hex: rgba.to_hex_string(),
                rgb: rgb_string(rgba),
                oklch: [round2(oklch.l), round2(oklch.c), round2(oklch.h)],
            }
        }
        CanonicalValue::Dimension(dim) => TokenPreview::Dimension {
            px: dim.to_px(options.root_font_size_px),
        },
        CanonicalValue::FontFamily(stack) => TokenPreview::Font {
            family: stack.first().cloned().unwrap_or_default(),
            stack: stack.join(", "),
        },
        CanonicalValue::FontWeight(w) => TokenPreview::Plain { text: w.to_string() },
        CanonicalValue::Shadow(_) => TokenPreview::Shadow {
            css: literal.to_string(),
        },
        CanonicalValue::DurationMs(ms) => TokenPreview::Duration { ms: *ms },
    }
}

fn rgb_string(rgba: &Rgba) -> String {
    if rgba.is_opaque() {
        format!("rgb({}, {}, {})", rgba.r, rgba.g, rgba.b)
    } else {
        format!("rgba({}, {}, {}, {})", rgba.r, rgba.g, rgba.b, rgba.a)
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, StreamDeclaration};
    use quarry_common::Diagnostics;
    use quarry_css::vars::VariableTable;
    use std::collections::BTreeMap;

    fn aggregate(decls: &[(&str, &str)]) -> Aggregation {
        let stream: Vec<StreamDeclaration> = decls
            .iter()
            .map(|(p, v)| StreamDeclaration {
                property: (*p).to_string(),
                value: (*v).to_string(),
                selectors: vec![".x".to_string()],
                source_index: 0,
            })
            .collect();
        let mut diag = Diagnostics::new();
        extract(&stream, &VariableTable::default(), &BTreeMap::new(), &mut diag)
    }

    #[test]
    fn min_usage_threshold_drops_singletons() {
        let agg = aggregate(&[("color", "#ff0000")]);
        let curated = curate(&agg, &Options::default());
        assert!(curated.colors.is_empty());

        let lenient = Options { min_usage: 1, ..Options::default() };
        let curated = curate(&agg, &lenient);
        assert_eq!(curated.colors.len(), 1);
        let token = &curated.colors[0];
        assert_eq!(token.name, "red-base-1");
        assert_eq!(token.value, "#ff0000");
        assert_eq!(token.usage, 1);
        assert_eq!(token.percentage, 100);
    }

    #[test]
    fn percentages_sum_to_about_100() {
        let agg = aggregate(&[
            ("color", "#ff0000"),
            ("color", "#ff0000"),
            ("color", "#ff0000"),
            ("color", "#00ff00"),
            ("color", "#00ff00"),
            ("color", "#0000ff"),
            ("color", "#0000ff"),
        ]);
        let opts = Options { min_usage: 1, ..Options::default() };
        let curated = curate(&agg, &opts);
        let sum: u32 = curated.colors.iter().map(|t| t.percentage).sum();
        assert!((99..=101).contains(&sum), "sum = {sum}");
    }

    #[test]
    fn caps_apply_when_not_returning_all() {
        let agg = aggregate(&[
            ("padding", "4px"),
            ("padding", "4px"),
            ("padding", "8px"),
            ("padding", "8px"),
            ("padding", "12px"),
            ("padding", "12px"),
        ]);
        let mut opts = Options { min_usage: 1, ..Options::default() };
        opts.return_all_filtered = false;
        opts.caps.max_spacing = 2;
        let curated = curate(&agg, &opts);
        assert_eq!(curated.spacing.len(), 2);
    }

    #[test]
    fn unit_equivalent_spacing_curates_to_one_token() {
        let agg = aggregate(&[
            ("padding", "16px"),
            ("padding", "1rem"),
            ("padding", "16px"),
        ]);
        let opts = Options { min_usage: 1, ..Options::default() };
        let curated = curate(&agg, &opts);
        assert_eq!(curated.spacing.len(), 1);
        let token = &curated.spacing[0];
        assert_eq!(token.usage, 3);
        assert_eq!(token.value, "1rem");
        assert_eq!(token.preview, TokenPreview::Dimension { px: Some(16.0) });
    }

    #[test]
    fn color_preview_carries_oklch() {
        let agg = aggregate(&[("color", "#ff0000"), ("color", "#ff0000")]);
        let curated = curate(&agg, &Options::default());
        match &curated.colors[0].preview {
            TokenPreview::Color { hex, oklch, .. } => {
                assert_eq!(hex, "#ff0000");
                assert!((oklch[0] - 62.8).abs() < 1.0);
            }
            other => panic!("expected color preview, got {other:?}"),
        }
    }
}
