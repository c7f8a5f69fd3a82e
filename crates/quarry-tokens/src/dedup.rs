//! Token deduplication and noise filtering.
//!
//! Runs between aggregation and curation:
//! 1. **Exact color dedup** - buckets sharing a hex rendering merge into
//!    the highest-usage one (aggregation keys are rounded component
//!    tuples, so distinct keys can still render the same hex).
//! 2. **Near-duplicate color dedup** - Euclidean similarity in 0-255 RGB
//!    space above 0.98 merges into the higher-usage bucket. Iteration is
//!    pinned to usage-descending, key-ascending order so the outcome is
//!    reproducible.
//! 3. **Unit-equivalence dedup** - dimensions whose pixel normalizations
//!    differ by less than half a pixel merge; the relative-unit
//!    representative (`rem` over `em` over `px`) wins the rendering.
//! 4. **Noise filters** - browser defaults, sub-1% alpha artifacts,
//!    over-precise computed values, and zero values are dropped.

use quarry_values::{literal_decimal_places, Unit};

use crate::bucket::{CanonicalValue, RawTokenBucket};
use crate::category::TokenCategory;
use crate::extract::Aggregation;

/// Similarity above which two colors are considered the same token.
const NEAR_DUPLICATE_SIMILARITY: f64 = 0.98;

/// Pixel delta under which two dimensions are considered equivalent.
const UNIT_EQUIVALENCE_PX: f64 = 0.5;

/// Literals that are browser defaults, not design decisions.
const BROWSER_DEFAULTS: &[&str] = &[
    "transparent",
    "currentcolor",
    "inherit",
    "initial",
    "unset",
    "none",
    "0",
    "0px",
];

/// The deduplicated, noise-filtered buckets of one category, ordered by
/// usage descending then canonical key.
#[derive(Debug, Default)]
pub struct DedupedCategory {
    /// Surviving buckets.
    pub buckets: Vec<RawTokenBucket>,
}

/// Deduplicate and filter one category from the aggregation.
#[must_use]
pub fn dedup_category(
    aggregation: &Aggregation,
    category: TokenCategory,
    root_font_size_px: f64,
) -> DedupedCategory {
    let sorted = aggregation.sorted(category);

    let merged = match category {
        TokenCategory::Color => {
            let exact = merge_exact_colors(sorted);
            merge_near_duplicate_colors(exact)
        }
        TokenCategory::DimensionSpacing
        | TokenCategory::DimensionRadius
        | TokenCategory::TypographySize => merge_equivalent_units(sorted, root_font_size_px),
        _ => sorted,
    };

    let mut buckets: Vec<RawTokenBucket> = merged
        .into_iter()
        .filter(|b| !is_noise(b, category))
        .collect();

    // Merges change usage counts; re-pin the order.
    buckets.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.canonical.key().cmp(&b.canonical.key()))
    });

    DedupedCategory { buckets }
}

/// Group color buckets by hex rendering; the highest-usage bucket in each
/// group becomes primary and absorbs the rest.
fn merge_exact_colors(sorted: Vec<RawTokenBucket>) -> Vec<RawTokenBucket> {
    let mut out: Vec<RawTokenBucket> = Vec::new();
    for bucket in sorted {
        let CanonicalValue::Color(rgba) = &bucket.canonical else {
            out.push(bucket);
            continue;
        };
        let hex = rgba.to_hex_string();
        let existing = out.iter_mut().find(|b| {
            matches!(&b.canonical, CanonicalValue::Color(c) if c.to_hex_string() == hex)
        });
        match existing {
            // Input is usage-sorted, so the first holder has the higher
            // usage and stays primary.
            Some(primary) => primary.absorb(&bucket),
            None => out.push(bucket),
        }
    }
    out
}

/// Merge colors whose RGB similarity exceeds the threshold. Each bucket
/// is processed at most once, in descending-usage order.
fn merge_near_duplicate_colors(sorted: Vec<RawTokenBucket>) -> Vec<RawTokenBucket> {
    let mut out: Vec<RawTokenBucket> = Vec::new();
    let mut absorbed = vec![false; sorted.len()];

    for i in 0..sorted.len() {
        if absorbed[i] {
            continue;
        }
        let mut primary = sorted[i].clone();
        let CanonicalValue::Color(primary_color) = primary.canonical.clone() else {
            out.push(primary);
            continue;
        };
        for (j, candidate) in sorted.iter().enumerate().skip(i + 1) {
            if absorbed[j] {
                continue;
            }
            if let CanonicalValue::Color(other) = &candidate.canonical {
                if primary_color.similarity(other) > NEAR_DUPLICATE_SIMILARITY {
                    primary.absorb(candidate);
                    absorbed[j] = true;
                }
            }
        }
        out.push(primary);
    }
    out
}

/// Merge dimensions that normalize to (nearly) the same pixel value.
/// The relative-unit representative wins the rendering: `rem` over `em`
/// over `px`.
fn merge_equivalent_units(
    sorted: Vec<RawTokenBucket>,
    root_font_size_px: f64,
) -> Vec<RawTokenBucket> {
    let mut out: Vec<RawTokenBucket> = Vec::new();
    let mut absorbed = vec![false; sorted.len()];

    for i in 0..sorted.len() {
        if absorbed[i] {
            continue;
        }
        let mut primary = sorted[i].clone();
        let CanonicalValue::Dimension(mut primary_dim) = primary.canonical.clone() else {
            out.push(primary);
            continue;
        };
        let Some(primary_px) = primary_dim.to_px(root_font_size_px) else {
            out.push(primary);
            continue;
        };

        for (j, candidate) in sorted.iter().enumerate().skip(i + 1) {
            if absorbed[j] {
                continue;
            }
            let CanonicalValue::Dimension(other_dim) = &candidate.canonical else {
                continue;
            };
            let Some(other_px) = other_dim.to_px(root_font_size_px) else {
                continue;
            };
            if (primary_px - other_px).abs() < UNIT_EQUIVALENCE_PX {
                // Usage merges into the primary, but the preferred unit's
                // rendering survives.
                if unit_preference(other_dim.unit) > unit_preference(primary_dim.unit) {
                    primary.canonical = candidate.canonical.clone();
                    primary.original_literal = candidate.original_literal.clone();
                    primary_dim = *other_dim;
                }
                primary.absorb(candidate);
                absorbed[j] = true;
            }
        }
        out.push(primary);
    }
    out
}

/// Representation preference for unit-equivalent merges.
fn unit_preference(unit: Unit) -> u8 {
    match unit {
        Unit::Rem => 2,
        Unit::Em => 1,
        _ => 0,
    }
}

/// Noise filters, applied after dedup.
fn is_noise(bucket: &RawTokenBucket, category: TokenCategory) -> bool {
    // Single sighting with low confidence carries no signal.
    if bucket.usage_count == 1 && category.confidence(1) < 70 {
        return true;
    }

    let literal = bucket.original_literal.trim().to_ascii_lowercase();
    if BROWSER_DEFAULTS.contains(&literal.as_str()) {
        return true;
    }

    match &bucket.canonical {
        CanonicalValue::Color(rgba) => {
            // Effectively invisible computed artifacts.
            rgba.a < 0.01
        }
        CanonicalValue::Dimension(dim) => {
            if dim.value == 0.0 {
                return true;
            }
            // Over-precise values are computed artifacts, not authored
            // tokens; the authored literal is what carries the decimals.
            literal_decimal_places(&bucket.original_literal) > 3
        }
        CanonicalValue::FontFamily(stack) => stack.is_empty(),
        CanonicalValue::FontWeight(_) => false,
        CanonicalValue::Shadow(shadow) => {
            shadow.offset_x.value == 0.0
                && shadow.offset_y.value == 0.0
                && shadow.blur.value == 0.0
                && shadow.spread.value == 0.0
        }
        CanonicalValue::DurationMs(ms) => *ms == 0,
    }
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
    fn near_duplicates_merge_into_higher_usage() {
        let agg = aggregate(&[
            ("color", "#336699"),
            ("color", "#336699"),
            ("color", "#336698"),
        ]);
        let deduped = dedup_category(&agg, TokenCategory::Color, 16.0);
        assert_eq!(deduped.buckets.len(), 1);
        assert_eq!(deduped.buckets[0].usage_count, 3);
        assert_eq!(deduped.buckets[0].original_literal, "#336699");
    }

    #[test]
    fn distant_colors_stay_separate() {
        let agg = aggregate(&[("color", "#336699"), ("color", "#993366")]);
        let deduped = dedup_category(&agg, TokenCategory::Color, 16.0);
        assert_eq!(deduped.buckets.len(), 2);
    }

    #[test]
    fn unit_equivalence_prefers_rem() {
        let agg = aggregate(&[
            ("padding", "16px"),
            ("padding", "16px"),
            ("padding", "1rem"),
        ]);
        let deduped = dedup_category(&agg, TokenCategory::DimensionSpacing, 16.0);
        assert_eq!(deduped.buckets.len(), 1);
        assert_eq!(deduped.buckets[0].usage_count, 3);
        // The px bucket had higher usage, but rem wins the rendering.
        assert_eq!(deduped.buckets[0].canonical.key(), "1rem");
    }

    #[test]
    fn alpha_artifacts_are_dropped() {
        let agg = aggregate(&[
            ("color", "rgba(0, 0, 0, 0.005)"),
            ("color", "rgba(0, 0, 0, 0.005)"),
        ]);
        let deduped = dedup_category(&agg, TokenCategory::Color, 16.0);
        assert!(deduped.buckets.is_empty());
    }

    #[test]
    fn overprecise_dimensions_are_dropped() {
        let agg = aggregate(&[
            ("padding", "0.123456px"),
            ("padding", "0.123456px"),
        ]);
        let deduped = dedup_category(&agg, TokenCategory::DimensionSpacing, 16.0);
        assert!(deduped.buckets.is_empty());
    }

    #[test]
    fn zero_values_are_dropped() {
        let agg = aggregate(&[
            ("margin", "0"),
            ("margin", "0"),
            ("padding", "8px"),
            ("padding", "8px"),
        ]);
        let deduped = dedup_category(&agg, TokenCategory::DimensionSpacing, 16.0);
        assert_eq!(deduped.buckets.len(), 1);
        assert_eq!(deduped.buckets[0].canonical.key(), "8px");
    }
}
