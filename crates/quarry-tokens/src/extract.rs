//! Declaration-stream extraction and aggregation.
//!
//! Each declaration is routed by property name to zero or more category
//! handlers; each handler parses the value into its canonical form and
//! folds it into the per-category bucket map. Values that only exist
//! inside custom-property definitions are credited afterwards with the
//! number of `var()` references observed across the stream.

use std::collections::BTreeMap;

use quarry_common::Diagnostics;
use quarry_css::vars::VariableTable;
use quarry_values::{
    parse_color, parse_dimension, parse_duration_ms, parse_shadow, ParsedColor,
};

use crate::bucket::{CanonicalValue, RawTokenBucket};
use crate::category::TokenCategory;

/// One resolved declaration in the merged stream.
#[derive(Debug, Clone)]
pub struct StreamDeclaration {
    /// Property name, lowercased.
    pub property: String,
    /// Value with `var()` references already resolved.
    pub value: String,
    /// Provenance selectors (already capped by the parser).
    pub selectors: Vec<String>,
    /// Which CSS source the declaration came from.
    pub source_index: usize,
}

/// The per-category bucket maps produced by extraction.
#[derive(Debug, Default)]
pub struct Aggregation {
    map: BTreeMap<TokenCategory, BTreeMap<String, RawTokenBucket>>,
}

impl Aggregation {
    /// Buckets of one category sorted by usage descending, canonical key
    /// ascending. The order is the contract every later stage relies on.
    #[must_use]
    pub fn sorted(&self, category: TokenCategory) -> Vec<RawTokenBucket> {
        let mut buckets: Vec<RawTokenBucket> = self
            .map
            .get(&category)
            .map(|m| m.values().cloned().collect())
            .unwrap_or_default();
        buckets.sort_by(|a, b| {
            b.usage_count
                .cmp(&a.usage_count)
                .then_with(|| a.canonical.key().cmp(&b.canonical.key()))
        });
        buckets
    }

    /// Total bucket count across categories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.values().map(BTreeMap::len).sum()
    }

    /// Whether nothing aggregated.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Record one observation of a canonical value.
    fn observe(
        &mut self,
        category: TokenCategory,
        canonical: CanonicalValue,
        literal: &str,
        property: &str,
        selectors: &[String],
    ) {
        let key = canonical.key();
        let bucket = self
            .map
            .entry(category)
            .or_default()
            .entry(key)
            .or_insert_with(|| RawTokenBucket::new(canonical, literal));
        bucket.observe(property, selectors);
    }

    /// Whether a canonical key already aggregated in a category.
    fn contains(&self, category: TokenCategory, key: &str) -> bool {
        self.map
            .get(&category)
            .is_some_and(|m| m.contains_key(key))
    }

    /// Credit a variable-only value with its reference count.
    fn credit(
        &mut self,
        category: TokenCategory,
        canonical: CanonicalValue,
        literal: &str,
        var_name: &str,
        references: u32,
    ) {
        let key = canonical.key();
        let bucket = self
            .map
            .entry(category)
            .or_default()
            .entry(key)
            .or_insert_with(|| RawTokenBucket::new(canonical, literal));
        bucket.usage_count += references;
        let _ = bucket.source_properties.insert(var_name.to_string());
    }
}

/// Where a property routes.
enum Route {
    Color,
    /// `background` shorthand: only a color-parseable value counts, and
    /// it is credited under `background-color`.
    BackgroundColor,
    Spacing,
    Radius,
    FontFamily,
    FontSize,
    FontWeight,
    Shadow,
    Duration,
    Skip,
}

/// Property-name routing. Closed over the extraction table; unknown
/// properties are skipped, never errors.
fn route(property: &str) -> Route {
    if property.starts_with("--") {
        return Route::Skip;
    }
    match property {
        "fill" | "stroke" => return Route::Color,
        "background" => return Route::BackgroundColor,
        "font-family" => return Route::FontFamily,
        "font-size" => return Route::FontSize,
        "font-weight" => return Route::FontWeight,
        "box-shadow" | "text-shadow" => return Route::Shadow,
        "gap" | "row-gap" | "column-gap" | "width" | "height" => return Route::Spacing,
        _ => {}
    }
    if property.contains("color") {
        return Route::Color;
    }
    if property == "border-radius"
        || (property.starts_with("border-") && property.ends_with("-radius"))
    {
        return Route::Radius;
    }
    if property.starts_with("margin") || property.starts_with("padding") {
        return Route::Spacing;
    }
    if matches!(
        property,
        "min-width" | "min-height" | "max-width" | "max-height"
    ) {
        return Route::Spacing;
    }
    if property.ends_with("duration") {
        return Route::Duration;
    }
    Route::Skip
}

/// Run extraction over a resolved declaration stream, then apply the
/// variable-usage backfill.
#[must_use]
pub fn extract(
    stream: &[StreamDeclaration],
    vars: &VariableTable,
    var_references: &BTreeMap<String, u32>,
    diagnostics: &mut Diagnostics,
) -> Aggregation {
    let mut agg = Aggregation::default();

    for decl in stream {
        extract_declaration(&mut agg, decl, diagnostics);
    }

    backfill_variables(&mut agg, vars, var_references, diagnostics);
    agg
}

fn extract_declaration(
    agg: &mut Aggregation,
    decl: &StreamDeclaration,
    diagnostics: &mut Diagnostics,
) {
    let value = decl.value.trim();
    if value.is_empty() {
        return;
    }

    match route(&decl.property) {
        Route::Color => {
            match parse_color(value) {
                Some(ParsedColor::Concrete(rgba)) => agg.observe(
                    TokenCategory::Color,
                    CanonicalValue::Color(rgba),
                    value,
                    &decl.property,
                    &decl.selectors,
                ),
                // Non-concrete sentinels carry no extractable color.
                Some(ParsedColor::NonConcrete(_)) => {}
                None => diagnostics.value_failed(format!(
                    "unparseable color '{value}' in {}",
                    decl.property
                )),
            }
        }
        Route::BackgroundColor => {
            if let Some(ParsedColor::Concrete(rgba)) = parse_color(value) {
                agg.observe(
                    TokenCategory::Color,
                    CanonicalValue::Color(rgba),
                    value,
                    "background-color",
                    &decl.selectors,
                );
            }
        }
        Route::Spacing => {
            // Each whitespace-separated value that parses as a dimension
            // counts; keywords like `auto` pass through silently.
            for part in value.split_whitespace() {
                if let Some(dim) = parse_dimension(part) {
                    agg.observe(
                        TokenCategory::DimensionSpacing,
                        CanonicalValue::Dimension(dim),
                        part,
                        &decl.property,
                        &decl.selectors,
                    );
                }
            }
        }
        Route::Radius => {
            // Multi-value shorthands simplify to the first radius.
            if let Some(dim) = value.split_whitespace().find_map(parse_dimension) {
                agg.observe(
                    TokenCategory::DimensionRadius,
                    CanonicalValue::Dimension(dim),
                    value,
                    &decl.property,
                    &decl.selectors,
                );
            }
        }
        Route::FontFamily => {
            let stack: Vec<String> = value
                .split(',')
                .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
                .filter(|f| !f.is_empty())
                .collect();
            if !stack.is_empty() {
                agg.observe(
                    TokenCategory::TypographyFamily,
                    CanonicalValue::FontFamily(stack),
                    value,
                    &decl.property,
                    &decl.selectors,
                );
            }
        }
        Route::FontSize => {
            if let Some(dim) = parse_dimension(value) {
                agg.observe(
                    TokenCategory::TypographySize,
                    CanonicalValue::Dimension(dim),
                    value,
                    &decl.property,
                    &decl.selectors,
                );
            }
        }
        Route::FontWeight => {
            if let Some(weight) = parse_font_weight(value) {
                agg.observe(
                    TokenCategory::TypographyWeight,
                    CanonicalValue::FontWeight(weight),
                    value,
                    &decl.property,
                    &decl.selectors,
                );
            }
        }
        Route::Shadow => {
            if let Some(shadow) = parse_shadow(value) {
                agg.observe(
                    TokenCategory::Shadow,
                    CanonicalValue::Shadow(Box::new(shadow)),
                    value,
                    &decl.property,
                    &decl.selectors,
                );
            }
        }
        Route::Duration => {
            for part in value.split(',') {
                if let Some(ms) = parse_duration_ms(part) {
                    agg.observe(
                        TokenCategory::Duration,
                        CanonicalValue::DurationMs(ms),
                        part.trim(),
                        &decl.property,
                        &decl.selectors,
                    );
                }
            }
        }
        Route::Skip => {}
    }
}

/// `font-weight` values: numeric 100-900, or the keywords with their
/// numeric equivalents. Anything else is skipped.
fn parse_font_weight(value: &str) -> Option<u32> {
    match value.trim().to_ascii_lowercase().as_str() {
        "normal" => Some(400),
        "bold" => Some(700),
        "lighter" => Some(300),
        "bolder" => Some(800),
        other => {
            let numeric = other.parse::<u32>().ok()?;
            (100..=900).contains(&numeric).then_some(numeric)
        }
    }
}

/// Credit values that only appear inside `--name` definitions.
///
/// A value that also appeared in a normal declaration was already counted
/// when the reference resolved, so only missing keys are credited. The
/// credit is the number of `var(--name)` references observed, floored at
/// one so a defined-but-unreferenced design token still registers (this
/// is what makes re-feeding an emitted token set as `:root` definitions a
/// fixpoint).
///
/// The variable name steers category routing where the value alone is
/// ambiguous (`--weight-bold: 700` is a weight, not 700px).
fn backfill_variables(
    agg: &mut Aggregation,
    vars: &VariableTable,
    var_references: &BTreeMap<String, u32>,
    diagnostics: &mut Diagnostics,
) {
    for (name, raw) in vars.iter() {
        let references = var_references.get(name).copied().unwrap_or(0).max(1);
        let resolved = vars.resolve(raw, diagnostics);
        let value = resolved.trim();
        if value.is_empty() {
            continue;
        }

        let Some((category, canonical)) = canonicalize_variable(name, value) else {
            continue;
        };
        if !agg.contains(category, &canonical.key()) {
            agg.credit(category, canonical, value, name, references);
        }
    }
}

/// Parse a variable definition into its category, guided by the name.
fn canonicalize_variable(name: &str, value: &str) -> Option<(TokenCategory, CanonicalValue)> {
    let hint = name.trim_start_matches('-').to_ascii_lowercase();

    if hint.contains("weight") {
        return parse_font_weight(value)
            .map(|w| (TokenCategory::TypographyWeight, CanonicalValue::FontWeight(w)));
    }
    if hint.starts_with("text-") || hint.contains("size") {
        return parse_dimension(value)
            .map(|d| (TokenCategory::TypographySize, CanonicalValue::Dimension(d)));
    }
    if hint.contains("font") || hint.contains("family") {
        let stack: Vec<String> = value
            .split(',')
            .map(|f| f.trim().trim_matches(|c| c == '"' || c == '\'').to_string())
            .filter(|f| !f.is_empty())
            .collect();
        if !stack.is_empty() && stack.iter().all(|f| parse_dimension(f).is_none()) {
            return Some((
                TokenCategory::TypographyFamily,
                CanonicalValue::FontFamily(stack),
            ));
        }
        return None;
    }
    if hint.contains("shadow") {
        return parse_shadow(value)
            .map(|s| (TokenCategory::Shadow, CanonicalValue::Shadow(Box::new(s))));
    }

    if let Some(ParsedColor::Concrete(rgba)) = parse_color(value) {
        return Some((TokenCategory::Color, CanonicalValue::Color(rgba)));
    }
    if let Some(ms) = parse_duration_ms(value) {
        return Some((TokenCategory::Duration, CanonicalValue::DurationMs(ms)));
    }
    if let Some(dim) = parse_dimension(value) {
        let category = if hint.contains("radius") {
            TokenCategory::DimensionRadius
        } else {
            TokenCategory::DimensionSpacing
        };
        return Some((category, CanonicalValue::Dimension(dim)));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(property: &str, value: &str) -> StreamDeclaration {
        StreamDeclaration {
            property: property.to_string(),
            value: value.to_string(),
            selectors: vec![".test".to_string()],
            source_index: 0,
        }
    }

    fn run(stream: &[StreamDeclaration]) -> Aggregation {
        let mut diag = Diagnostics::new();
        extract(stream, &VariableTable::default(), &BTreeMap::new(), &mut diag)
    }

    #[test]
    fn colors_aggregate_by_canonical_key() {
        let agg = run(&[
            decl("color", "#ff0000"),
            decl("background-color", "rgb(255, 0, 0)"),
            decl("border-color", "#00ff00"),
        ]);
        let colors = agg.sorted(TokenCategory::Color);
        assert_eq!(colors.len(), 2);
        // #ff0000 and rgb(255,0,0) share a bucket
        assert_eq!(colors[0].usage_count, 2);
        assert!(colors[0].source_properties.contains("color"));
        assert!(colors[0].source_properties.contains("background-color"));
    }

    #[test]
    fn background_shorthand_credits_background_color() {
        let agg = run(&[decl("background", "#0a84ff")]);
        let colors = agg.sorted(TokenCategory::Color);
        assert_eq!(colors.len(), 1);
        assert!(colors[0].source_properties.contains("background-color"));
        // A gradient background is not a color
        let agg = run(&[decl("background", "linear-gradient(red, blue)")]);
        assert!(agg.sorted(TokenCategory::Color).is_empty());
    }

    #[test]
    fn spacing_splits_multi_values() {
        let agg = run(&[decl("margin", "8px 16px"), decl("padding", "8px")]);
        let spacing = agg.sorted(TokenCategory::DimensionSpacing);
        assert_eq!(spacing.len(), 2);
        assert_eq!(spacing[0].canonical.key(), "8px");
        assert_eq!(spacing[0].usage_count, 2);
    }

    #[test]
    fn auto_in_margin_is_not_noise() {
        let mut diag = Diagnostics::new();
        let stream = [decl("margin", "0 auto")];
        let agg = extract(&stream, &VariableTable::default(), &BTreeMap::new(), &mut diag);
        assert_eq!(agg.sorted(TokenCategory::DimensionSpacing).len(), 1);
        assert!(diag.is_empty());
    }

    #[test]
    fn font_properties() {
        let agg = run(&[
            decl("font-family", "\"SF Pro\", -apple-system, sans-serif"),
            decl("font-size", "16px"),
            decl("font-weight", "bold"),
            decl("font-weight", "650"),
            decl("font-weight", "950"),
        ]);
        let families = agg.sorted(TokenCategory::TypographyFamily);
        assert_eq!(families.len(), 1);
        match &families[0].canonical {
            CanonicalValue::FontFamily(stack) => {
                assert_eq!(stack[0], "SF Pro");
                assert_eq!(stack.len(), 3);
            }
            other => panic!("expected family, got {other:?}"),
        }
        let weights = agg.sorted(TokenCategory::TypographyWeight);
        // 950 is out of range
        assert_eq!(weights.len(), 2);
    }

    #[test]
    fn shadows_and_durations() {
        let agg = run(&[
            decl("box-shadow", "0 1px 2px rgba(0, 0, 0, 0.2)"),
            decl("transition-duration", "0.2s, 300ms"),
        ]);
        assert_eq!(agg.sorted(TokenCategory::Shadow).len(), 1);
        let durations = agg.sorted(TokenCategory::Duration);
        assert_eq!(durations.len(), 2);
        assert_eq!(durations[0].canonical.key(), "200ms");
    }

    #[test]
    fn unparseable_color_is_diagnosed() {
        let mut diag = Diagnostics::new();
        let stream = [decl("color", "definitely-not-a-color")];
        let _ = extract(&stream, &VariableTable::default(), &BTreeMap::new(), &mut diag);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn variable_backfill_credits_references() {
        use quarry_css::parser::parse_source;

        let outcome = parse_source(":root { --brand: #0a84ff; }", 16.0);
        let vars = VariableTable::from_rules(&outcome.rules);
        let mut refs = BTreeMap::new();
        let _ = refs.insert("--brand".to_string(), 2u32);

        let mut diag = Diagnostics::new();
        let agg = extract(&[], &vars, &refs, &mut diag);
        let colors = agg.sorted(TokenCategory::Color);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].usage_count, 2);
        assert!(colors[0].source_properties.contains("--brand"));
    }

    #[test]
    fn backfill_skips_already_observed_values() {
        use quarry_css::parser::parse_source;

        let outcome = parse_source(":root { --brand: #0a84ff; }", 16.0);
        let vars = VariableTable::from_rules(&outcome.rules);
        let mut refs = BTreeMap::new();
        let _ = refs.insert("--brand".to_string(), 2u32);

        let mut diag = Diagnostics::new();
        // The resolved stream already observed the color twice.
        let stream = [decl("background", "#0a84ff"), decl("color", "#0a84ff")];
        let agg = extract(&stream, &vars, &refs, &mut diag);
        let colors = agg.sorted(TokenCategory::Color);
        assert_eq!(colors.len(), 1);
        assert_eq!(colors[0].usage_count, 2);
    }
}
