//! W3C Design Tokens Community Group emission.
//!
//! [Design Tokens Format Module](https://design-tokens.github.io/community-group/format/)
//!
//! Every aggregated bucket becomes a token carrying `$type`, `$value` in
//! the DTCG shape, an auto-generated `$description`, and `$extensions`
//! with usage and provenance. Groups serialize as `color`, `dimension`,
//! `typography`, `shadow`, and `duration` under the schema root.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use quarry_values::{semantic, Dimension, Rgba, Shadow};

use crate::bucket::{CanonicalValue, RawTokenBucket};
use crate::category::TokenCategory;
use crate::extract::Aggregation;

/// The DTCG schema identifier.
pub const W3C_SCHEMA: &str = "https://design-tokens.github.io/community-group/format/";

/// Provenance of one CSS source, surfaced in `$metadata`.
///
/// The hash is caller-supplied and opaque; nothing downstream may assume
/// an algorithm.
#[derive(Debug, Clone, Serialize)]
pub struct W3cSourceRef {
    /// Source URL (possibly synthetic for inline styles).
    pub url: String,
    /// Caller-supplied content hash, carried verbatim.
    pub sha: String,
    /// Source size in octets.
    pub bytes: u64,
}

/// `$metadata` for the token set.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct W3cMetadata {
    /// Bare host the bundle was harvested from.
    pub domain: String,
    /// Page URL.
    pub url: String,
    /// The CSS sources that fed extraction.
    pub css_sources: Vec<W3cSourceRef>,
}

/// A token `$value` in its DTCG shape.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum W3cValue {
    /// `color` tokens.
    Color {
        /// Always `"srgb"`.
        #[serde(rename = "colorSpace")]
        color_space: &'static str,
        /// `[r, g, b]` or `[r, g, b, a]`, each in `[0, 1]` rounded to 3
        /// decimals.
        components: Vec<f64>,
        /// Alpha, present only when not fully opaque.
        #[serde(skip_serializing_if = "Option::is_none")]
        alpha: Option<f64>,
    },
    /// `dimension` tokens.
    Dimension {
        /// Numeric magnitude.
        value: f64,
        /// Unit string.
        unit: String,
    },
    /// `fontFamily` tokens: the ordered stack, quotes stripped.
    FontFamily(Vec<String>),
    /// `fontWeight` tokens: 100-900.
    FontWeight(u32),
    /// `shadow` tokens.
    Shadow {
        /// Horizontal offset.
        #[serde(rename = "offsetX")]
        offset_x: Box<W3cValue>,
        /// Vertical offset.
        #[serde(rename = "offsetY")]
        offset_y: Box<W3cValue>,
        /// Blur radius.
        blur: Box<W3cValue>,
        /// Spread distance.
        spread: Box<W3cValue>,
        /// Shadow color.
        color: Box<W3cValue>,
        /// Present (true) only for inset shadows.
        #[serde(skip_serializing_if = "Option::is_none")]
        inset: Option<bool>,
    },
    /// `duration` tokens: `"{N}ms"`.
    Duration(String),
}

impl W3cValue {
    fn from_color(rgba: &Rgba) -> Self {
        let components = rgba.canonical_components();
        let alpha = (components.len() == 4).then(|| components[3]);
        Self::Color {
            color_space: "srgb",
            components: components[..3].to_vec(),
            alpha,
        }
    }

    fn from_dimension(dim: &Dimension) -> Self {
        Self::Dimension {
            value: dim.value,
            unit: dim.unit.to_string(),
        }
    }

    fn from_shadow(shadow: &Shadow) -> Self {
        Self::Shadow {
            offset_x: Box::new(Self::from_dimension(&shadow.offset_x)),
            offset_y: Box::new(Self::from_dimension(&shadow.offset_y)),
            blur: Box::new(Self::from_dimension(&shadow.blur)),
            spread: Box::new(Self::from_dimension(&shadow.spread)),
            color: Box::new(Self::from_color(&shadow.color)),
            inset: shadow.inset.then_some(true),
        }
    }
}

/// `$extensions` payload: usage and provenance.
#[derive(Debug, Clone, Serialize)]
pub struct W3cExtensions {
    /// Number of contributing declarations.
    pub usage: u32,
    /// Usage-derived confidence, 0-100.
    pub confidence: u32,
    /// CSS properties the value appeared under.
    pub sources: Vec<String>,
    /// Provenance selectors (at most 10).
    pub selectors: Vec<String>,
    /// First-seen raw text.
    pub original: String,
}

/// One emitted token.
#[derive(Debug, Clone, Serialize)]
pub struct W3cToken {
    /// DTCG `$type`.
    #[serde(rename = "$type")]
    pub token_type: &'static str,
    /// DTCG `$value`.
    #[serde(rename = "$value")]
    pub value: W3cValue,
    /// Auto-generated description.
    #[serde(rename = "$description")]
    pub description: String,
    /// Usage and provenance.
    #[serde(rename = "$extensions")]
    pub extensions: W3cExtensions,
}

/// The full token set.
#[derive(Debug, Clone, Serialize)]
pub struct W3cTokenSet {
    /// Schema identifier.
    #[serde(rename = "$schema")]
    pub schema: &'static str,
    /// Bundle provenance.
    #[serde(rename = "$metadata")]
    pub metadata: W3cMetadata,
    /// Color tokens by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub color: BTreeMap<String, W3cToken>,
    /// Dimension tokens (spacing and radius) by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub dimension: BTreeMap<String, W3cToken>,
    /// Typography tokens (families, sizes, weights) by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub typography: BTreeMap<String, W3cToken>,
    /// Shadow tokens by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub shadow: BTreeMap<String, W3cToken>,
    /// Duration tokens by name.
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub duration: BTreeMap<String, W3cToken>,
}

impl W3cTokenSet {
    /// Total token count across groups.
    #[must_use]
    pub fn total(&self) -> usize {
        self.color.len()
            + self.dimension.len()
            + self.typography.len()
            + self.shadow.len()
            + self.duration.len()
    }
}

/// Allocates unique names within a scope: the first holder keeps the base
/// name, later collisions get `-2`, `-3`, ...
#[derive(Debug, Default)]
pub struct NameAllocator {
    used: BTreeSet<String>,
}

impl NameAllocator {
    /// Claim a unique name derived from `base`.
    pub fn allocate(&mut self, base: &str) -> String {
        if self.used.insert(base.to_string()) {
            return base.to_string();
        }
        let mut n = 2usize;
        loop {
            let candidate = format!("{base}-{n}");
            if self.used.insert(candidate.clone()) {
                return candidate;
            }
            n += 1;
        }
    }
}

/// Derive the semantic base name for a bucket at its usage rank.
///
/// The rank feeds the color namer (names carry their 1-based rank); other
/// categories collide on the base name and rely on [`NameAllocator`].
#[must_use]
pub fn bucket_name(
    category: TokenCategory,
    bucket: &RawTokenBucket,
    position: usize,
    root_font_size_px: f64,
) -> String {
    match (&bucket.canonical, category) {
        (CanonicalValue::Color(rgba), _) => semantic::color_name(rgba.to_hsl(), position),
        (CanonicalValue::Dimension(dim), TokenCategory::DimensionRadius) => {
            if dim.unit == quarry_values::Unit::Percent && dim.value >= 50.0 {
                "radius-full".to_string()
            } else {
                dim.to_px(root_font_size_px)
                    .map_or_else(|| fallback_name("radius", dim), semantic::radius_name)
            }
        }
        (CanonicalValue::Dimension(dim), TokenCategory::TypographySize) => dim
            .to_px(root_font_size_px)
            .map_or_else(|| fallback_name("text", dim), semantic::font_size_name),
        (CanonicalValue::Dimension(dim), _) => dim
            .to_px(root_font_size_px)
            .map_or_else(|| fallback_name("spacing", dim), semantic::spacing_name),
        (CanonicalValue::FontFamily(stack), _) => {
            stack.first().map_or_else(|| "font".to_string(), |f| semantic::family_slug(f))
        }
        (CanonicalValue::FontWeight(w), _) => semantic::font_weight_name(*w),
        (CanonicalValue::Shadow(shadow), _) => semantic::shadow_name(shadow),
        (CanonicalValue::DurationMs(ms), _) => semantic::duration_name(*ms),
    }
}

/// Name for dimensions without a pixel equivalence (`%`, viewport units):
/// the canonical key with the unit spelled out.
fn fallback_name(prefix: &str, dim: &Dimension) -> String {
    let key = dim.canonical_key().replace('%', "pct");
    format!("{prefix}-{key}")
}

/// Emit the W3C token set from an aggregation.
///
/// Buckets are walked in usage-descending, key-ascending order so ranks
/// (and therefore names) are stable.
#[must_use]
pub fn emit(
    aggregation: &Aggregation,
    metadata: W3cMetadata,
    root_font_size_px: f64,
) -> W3cTokenSet {
    let mut set = W3cTokenSet {
        schema: W3C_SCHEMA,
        metadata,
        color: BTreeMap::new(),
        dimension: BTreeMap::new(),
        typography: BTreeMap::new(),
        shadow: BTreeMap::new(),
        duration: BTreeMap::new(),
    };

    // One allocator per serialized group: spacing and radius share the
    // `dimension` group, so they share a namespace.
    let mut allocators: BTreeMap<&'static str, NameAllocator> = BTreeMap::new();

    for category in [
        TokenCategory::Color,
        TokenCategory::DimensionSpacing,
        TokenCategory::DimensionRadius,
        TokenCategory::TypographyFamily,
        TokenCategory::TypographySize,
        TokenCategory::TypographyWeight,
        TokenCategory::Shadow,
        TokenCategory::Duration,
    ] {
        let group = category.w3c_group();
        for (position, bucket) in aggregation.sorted(category).iter().enumerate() {
            let base = bucket_name(category, bucket, position, root_font_size_px);
            let name = allocators.entry(group).or_default().allocate(&base);
            let token = build_token(category, bucket);
            let target = match group {
                "color" => &mut set.color,
                "dimension" => &mut set.dimension,
                "typography" => &mut set.typography,
                "shadow" => &mut set.shadow,
                _ => &mut set.duration,
            };
            let _ = target.insert(name, token);
        }
    }

    set
}

fn build_token(category: TokenCategory, bucket: &RawTokenBucket) -> W3cToken {
    let value = match &bucket.canonical {
        CanonicalValue::Color(rgba) => W3cValue::from_color(rgba),
        CanonicalValue::Dimension(dim) => W3cValue::from_dimension(dim),
        CanonicalValue::FontFamily(stack) => W3cValue::FontFamily(stack.clone()),
        CanonicalValue::FontWeight(w) => W3cValue::FontWeight(*w),
        CanonicalValue::Shadow(shadow) => W3cValue::from_shadow(shadow),
        CanonicalValue::DurationMs(ms) => W3cValue::Duration(format!("{ms}ms")),
    };

    let usage = bucket.usage_count;
    let properties = bucket.source_properties.len();
    W3cToken {
        token_type: category.w3c_type(),
        value,
        description: format!(
            "{} - used {usage} time{} across {properties} propert{}",
            bucket.original_literal,
            if usage == 1 { "" } else { "s" },
            if properties == 1 { "y" } else { "ies" },
        ),
        extensions: W3cExtensions {
            usage,
            confidence: category.confidence(usage),
            sources: bucket.source_properties.iter().cloned().collect(),
            selectors: bucket.source_selectors.iter().cloned().collect(),
            original: bucket.original_literal.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::{extract, StreamDeclaration};
    use quarry_common::Diagnostics;
    use quarry_css::vars::VariableTable;
    use std::collections::BTreeMap as Map;

    fn metadata() -> W3cMetadata {
        W3cMetadata {
            domain: "example.com".to_string(),
            url: "https://example.com".to_string(),
            css_sources: vec![],
        }
    }

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
        extract(&stream, &VariableTable::default(), &Map::new(), &mut diag)
    }

    #[test]
    fn emits_color_token_with_components() {
        let agg = aggregate(&[("color", "#ff0000"), ("color", "#ff0000")]);
        let set = emit(&agg, metadata(), 16.0);
        assert_eq!(set.color.len(), 1);
        let token = set.color.get("red-base-1").expect("named token");
        assert_eq!(token.token_type, "color");
        assert_eq!(token.extensions.usage, 2);
        match &token.value {
            W3cValue::Color { components, alpha, .. } => {
                assert_eq!(components, &vec![1.0, 0.0, 0.0]);
                assert!(alpha.is_none());
            }
            other => panic!("expected color value, got {other:?}"),
        }
    }

    #[test]
    fn serializes_with_dollar_keys() {
        let agg = aggregate(&[("color", "#0a84ff")]);
        let set = emit(&agg, metadata(), 16.0);
        let json = serde_json::to_string(&set).expect("serialize");
        assert!(json.contains("\"$schema\""));
        assert!(json.contains("\"$type\":\"color\""));
        assert!(json.contains("\"colorSpace\":\"srgb\""));
        assert!(json.contains("\"cssSources\""));
    }

    #[test]
    fn spacing_and_radius_share_the_dimension_group() {
        let agg = aggregate(&[("padding", "16px"), ("border-radius", "6px")]);
        let set = emit(&agg, metadata(), 16.0);
        assert_eq!(set.dimension.len(), 2);
        assert!(set.dimension.contains_key("spacing-4"));
        assert!(set.dimension.contains_key("radius-md"));
    }

    #[test]
    fn name_collisions_get_suffixes() {
        // 15px and 17px both snap to spacing-4
        let agg = aggregate(&[("padding", "15px"), ("margin", "17px"), ("margin", "17px")]);
        let set = emit(&agg, metadata(), 16.0);
        // 17px has usage 2 so it ranks first and keeps the base name
        assert!(set.dimension.contains_key("spacing-4"));
        assert!(set.dimension.contains_key("spacing-4-2"));
    }

    #[test]
    fn shadow_value_shape() {
        let agg = aggregate(&[("box-shadow", "0 1px 2px rgba(0, 0, 0, 0.4)")]);
        let set = emit(&agg, metadata(), 16.0);
        let token = set.shadow.values().next().expect("shadow token");
        let json = serde_json::to_string(&token.value).expect("serialize");
        assert!(json.contains("\"offsetX\""));
        assert!(json.contains("\"alpha\":0.4"));
    }

    #[test]
    fn duration_is_ms_string() {
        let agg = aggregate(&[("transition-duration", "0.25s")]);
        let set = emit(&agg, metadata(), 16.0);
        let token = set.duration.values().next().expect("duration token");
        match &token.value {
            W3cValue::Duration(s) => assert_eq!(s, "250ms"),
            other => panic!("expected duration, got {other:?}"),
        }
    }
}
