//! The AI-consumable prompt pack.
//!
//! A compact, deterministic JSON summary of the design system, bounded in
//! size: the target is 16 KB serialized, the hard ceiling 64 KB. When the
//! ceiling is threatened the usage-weight and raw-color sections shrink
//! first - they are the bulk and the least load-bearing.

use std::collections::BTreeMap;

use serde::Serialize;

use quarry_detect::ComponentLibrary;
use quarry_tokens::{CuratedToken, CuratedTokenSet, TokenPreview};

use crate::layout::LayoutDna;
use crate::motion::MotionReport;

/// Hard ceiling on the serialized pack.
pub const HARD_CAP_BYTES: usize = 64 * 1024;

/// Scale entries kept for spacing.
const SPACING_SCALE_LEN: usize = 12;
/// Scale entries kept for radius (before the `9999` full marker).
const RADIUS_SCALE_LEN: usize = 9;
/// Usage weights kept at full size.
const USAGE_WEIGHTS_LEN: usize = 64;
/// Archetypes reported.
const ARCHETYPE_LEN: usize = 5;

/// Default archetype list when the detector did not run.
const DEFAULT_ARCHETYPES: [&str; 5] = ["button", "card", "input", "badge", "navigation-menu"];

/// `meta` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackMeta {
    /// Bare host.
    pub domain: String,
    /// Spacing base unit in pixels.
    pub base_unit: u32,
    /// Curated token count feeding this pack.
    pub token_count: usize,
}

/// `invariants` section: the ratios that keep generated values on-system.
#[derive(Debug, Clone, Serialize)]
pub struct PackInvariants {
    /// Median ratio between consecutive spacing steps.
    pub spacing_ratio: f64,
    /// Median ratio between consecutive radius steps.
    pub radius_ratio: f64,
}

/// `scales` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackScales {
    /// Top spacing values in pixels, ascending.
    pub spacing_px: Vec<f64>,
    /// Top radius values in pixels, ascending, with 9999 appended to
    /// denote "full".
    pub radius_px: Vec<f64>,
}

/// `type` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackType {
    /// Font families, most used first.
    pub families: Vec<String>,
    /// Font sizes in pixels, ascending.
    pub sizes_px: Vec<f64>,
    /// Font weights, ascending.
    pub weights: Vec<u32>,
}

/// One raw color: hex plus scaled OKLCH.
#[derive(Debug, Clone, Serialize)]
pub struct PackColor {
    /// Hex rendering.
    pub hex: String,
    /// `[lightness, chroma, hue]`, scaled.
    pub ok: [f64; 3],
}

/// `color.semantic` assignments; each value is a short color key.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PackSemanticColors {
    /// Page background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_base: Option<String>,
    /// Raised surface background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_surface: Option<String>,
    /// Muted background.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bg_muted: Option<String>,
    /// Primary foreground.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_base: Option<String>,
    /// Muted foreground.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fg_muted: Option<String>,
    /// Subtle border.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_subtle: Option<String>,
    /// Strong border.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_strong: Option<String>,
    /// Accent/brand color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub accent: Option<String>,
}

/// `color` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackColors {
    /// Short key to raw color.
    pub raw: BTreeMap<String, PackColor>,
    /// Semantic assignments over the short keys.
    pub semantic: PackSemanticColors,
}

/// `effects` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackEffects {
    /// Shadow CSS strings, most used first.
    pub shadows: Vec<String>,
    /// Durations in milliseconds, most used first.
    pub durations_ms: Vec<u64>,
    /// Easing families observed.
    pub easings: Vec<String>,
}

/// `layout` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackLayout {
    /// Container strategy name.
    pub container: String,
    /// Grid system name.
    pub grid: String,
    /// Breakpoints in pixels.
    pub breakpoints: Vec<u32>,
}

/// `patterns` section.
#[derive(Debug, Clone, Serialize)]
pub struct PackPatterns {
    /// Top detected component archetypes (or a default list).
    pub component_archetypes: Vec<String>,
}

/// The full prompt pack.
#[derive(Debug, Clone, Serialize)]
pub struct PromptPack {
    /// Provenance and base unit.
    pub meta: PackMeta,
    /// System ratios.
    pub invariants: PackInvariants,
    /// Value scales.
    pub scales: PackScales,
    /// Typography.
    #[serde(rename = "type")]
    pub type_system: PackType,
    /// Colors.
    pub color: PackColors,
    /// Shadows and motion.
    pub effects: PackEffects,
    /// Layout.
    pub layout: PackLayout,
    /// Color scheme guess.
    pub modes: BTreeMap<String, String>,
    /// Density label derived from the spacing scale.
    pub density: String,
    /// Usage weights: category-qualified token name to normalized weight.
    pub usage: BTreeMap<String, f64>,
    /// Short color key to full token name.
    pub aliases: BTreeMap<String, String>,
    /// Generation constraints for downstream consumers.
    pub constraints: Vec<String>,
    /// Detected patterns.
    pub patterns: PackPatterns,
}

/// Build the pack. Shrinks the bulky sections if the serialized form
/// would cross the hard ceiling.
#[must_use]
pub fn build_prompt_pack(
    curated: &CuratedTokenSet,
    layout: &LayoutDna,
    motion: &MotionReport,
    library: Option<&ComponentLibrary>,
    domain: &str,
) -> PromptPack {
    let mut weights_len = USAGE_WEIGHTS_LEN;
    let mut colors_len = usize::MAX;
    loop {
        let pack = assemble(curated, layout, motion, library, domain, weights_len, colors_len);
        let size = serde_json::to_string(&pack).map_or(0, |s| s.len());
        if size <= HARD_CAP_BYTES || weights_len <= 8 {
            return pack;
        }
        // Halve the bulky sections and retry.
        weights_len /= 2;
        colors_len = 24.min(colors_len);
        if colors_len > 8 {
            colors_len /= 2;
        }
    }
}

#[allow(clippy::too_many_lines)]
fn assemble(
    curated: &CuratedTokenSet,
    layout: &LayoutDna,
    motion: &MotionReport,
    library: Option<&ComponentLibrary>,
    domain: &str,
    weights_len: usize,
    colors_len: usize,
) -> PromptPack {
    let base_unit = layout.spacing_base.unwrap_or(4);

    let spacing_px = top_px(&curated.spacing, SPACING_SCALE_LEN);
    let mut radius_px = top_px(&curated.radius, RADIUS_SCALE_LEN);
    radius_px.push(9999.0);

    let invariants = PackInvariants {
        spacing_ratio: median_step_ratio(&spacing_px).unwrap_or(1.25),
        radius_ratio: median_step_ratio(&radius_px[..radius_px.len() - 1]).unwrap_or(1.25),
    };

    // Raw colors with short keys, usage order, capped when shrinking.
    let mut raw = BTreeMap::new();
    let mut aliases = BTreeMap::new();
    let mut keyed: Vec<(String, &CuratedToken)> = Vec::new();
    {
        let mut used: std::collections::BTreeSet<String> = std::collections::BTreeSet::new();
        for token in curated.colors.iter().take(colors_len) {
            let mut key = short_color_key(&token.name);
            let mut n = 2;
            while !used.insert(key.clone()) {
                key = format!("{}{n}", short_color_key(&token.name));
                n += 1;
            }
            keyed.push((key, token));
        }
    }
    for (key, token) in &keyed {
        if let TokenPreview::Color { hex, oklch, .. } = &token.preview {
            let _ = raw.insert(
                key.clone(),
                PackColor { hex: hex.clone(), ok: *oklch },
            );
            let _ = aliases.insert(key.clone(), token.name.clone());
        }
    }

    let semantic = assign_semantic_colors(&keyed);

    let type_system = PackType {
        families: curated
            .font_families
            .iter()
            .map(|t| t.value.clone())
            .collect(),
        sizes_px: top_px(&curated.font_sizes, SPACING_SCALE_LEN),
        weights: {
            let mut weights: Vec<u32> = curated
                .font_weights
                .iter()
                .filter_map(|t| t.value.parse().ok())
                .collect();
            weights.sort_unstable();
            weights
        },
    };

    let effects = PackEffects {
        shadows: curated.shadows.iter().map(|t| t.value.clone()).collect(),
        durations_ms: curated
            .durations
            .iter()
            .filter_map(|t| match t.preview {
                TokenPreview::Duration { ms } => Some(ms),
                _ => None,
            })
            .collect(),
        easings: {
            let mut seen = Vec::new();
            for entry in &motion.timing_functions {
                let family = entry.family.to_string();
                if !seen.contains(&family) {
                    seen.push(family);
                }
            }
            seen
        },
    };

    // Usage weights: category-qualified names normalized to the maximum.
    let mut usage = BTreeMap::new();
    {
        let mut all: Vec<(String, u32)> = Vec::new();
        for (label, tokens) in curated.categories() {
            for token in tokens {
                all.push((format!("{label}.{}", token.name), token.usage));
            }
        }
        all.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        let max_usage = all.first().map_or(1, |(_, u)| (*u).max(1));
        for (name, count) in all.into_iter().take(weights_len) {
            let weight = f64::from(count) / f64::from(max_usage);
            let _ = usage.insert(name, (weight * 100.0).round() / 100.0);
        }
    }

    let component_archetypes = library.map_or_else(
        || DEFAULT_ARCHETYPES.iter().map(|s| (*s).to_string()).collect(),
        |lib| {
            let mut counts: Vec<(String, u32)> = lib
                .counts_by_kind()
                .into_iter()
                .map(|(kind, count)| (kind.to_string(), count))
                .collect();
            counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
            let top: Vec<String> = counts
                .into_iter()
                .take(ARCHETYPE_LEN)
                .map(|(name, _)| name)
                .collect();
            if top.is_empty() {
                DEFAULT_ARCHETYPES.iter().map(|s| (*s).to_string()).collect()
            } else {
                top
            }
        },
    );

    let scheme = detect_scheme(&keyed);
    let mut modes = BTreeMap::new();
    let _ = modes.insert("scheme".to_string(), scheme.to_string());

    let density = match spacing_px.iter().copied().fold(None::<f64>, |acc, v| {
        Some(acc.map_or(v, |a| a.max(v)))
    }) {
        Some(max) if max <= 16.0 => "compact",
        Some(max) if max <= 48.0 => "comfortable",
        Some(_) => "spacious",
        None => "comfortable",
    };

    PromptPack {
        meta: PackMeta {
            domain: domain.to_string(),
            base_unit,
            token_count: curated.total(),
        },
        invariants,
        scales: PackScales { spacing_px, radius_px },
        type_system,
        color: PackColors { raw, semantic },
        effects,
        layout: PackLayout {
            container: layout.container_strategy.to_string(),
            grid: layout.grid_system.to_string(),
            breakpoints: layout.breakpoints.clone(),
        },
        modes,
        density: density.to_string(),
        usage,
        aliases,
        constraints: vec![
            "spacing values must come from scales.spacing_px".to_string(),
            "radius values must come from scales.radius_px (9999 means full)".to_string(),
            "colors must come from color.raw, preferring color.semantic roles".to_string(),
            "type sizes must come from type.sizes_px".to_string(),
        ],
        patterns: PackPatterns { component_archetypes },
    }
}

/// Top values by usage, then sorted ascending by magnitude.
fn top_px(tokens: &[CuratedToken], limit: usize) -> Vec<f64> {
    let mut values: Vec<f64> = tokens
        .iter()
        .take(limit)
        .filter_map(|t| match t.preview {
            TokenPreview::Dimension { px } => px,
            _ => None,
        })
        .collect();
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    values.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
    values
}

/// Median of the ratios between consecutive scale entries.
fn median_step_ratio(sorted_ascending: &[f64]) -> Option<f64> {
    let mut ratios: Vec<f64> = sorted_ascending
        .windows(2)
        .filter(|w| w[0] > 0.0)
        .map(|w| w[1] / w[0])
        .collect();
    if ratios.is_empty() {
        return None;
    }
    ratios.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let mid = ratios.len() / 2;
    let median = if ratios.len() % 2 == 0 {
        (ratios[mid - 1] + ratios[mid]) / 2.0
    } else {
        ratios[mid]
    };
    Some((median * 100.0).round() / 100.0)
}

/// `gray-500-2` shortens to `g500`: first letter of each alphabetic
/// segment, digits carried through, trailing rank dropped.
fn short_color_key(name: &str) -> String {
    let segments: Vec<&str> = name.split('-').collect();
    // The final segment is the uniqueness rank when fully numeric and
    // another numeric segment precedes it.
    let trimmed: &[&str] = match segments.split_last() {
        Some((last, rest))
            if !rest.is_empty()
                && last.bytes().all(|b| b.is_ascii_digit())
                && rest.iter().any(|s| s.bytes().all(|b| b.is_ascii_digit())) =>
        {
            rest
        }
        _ => &segments,
    };
    let mut key = String::new();
    for segment in trimmed {
        if segment.bytes().all(|b| b.is_ascii_digit()) {
            key.push_str(segment);
        } else if let Some(first) = segment.chars().next() {
            key.push(first.to_ascii_lowercase());
        }
    }
    if key.is_empty() { "c".to_string() } else { key }
}

/// Scheme guess: dark when the most-used color is dark.
fn detect_scheme(keyed: &[(String, &CuratedToken)]) -> &'static str {
    let first_lightness = keyed.first().and_then(|(_, token)| match &token.preview {
        TokenPreview::Color { oklch, .. } => Some(oklch[0]),
        _ => None,
    });
    match first_lightness {
        Some(l) if l < 30.0 => "dark",
        _ => "light",
    }
}

/// Semantic role assignment over the usage-ordered raw colors.
fn assign_semantic_colors(keyed: &[(String, &CuratedToken)]) -> PackSemanticColors {
    let mut semantic = PackSemanticColors::default();

    let oklch = |token: &CuratedToken| match &token.preview {
        TokenPreview::Color { oklch, .. } => Some(*oklch),
        _ => None,
    };

    let dark_scheme = detect_scheme(keyed) == "dark";

    let mut backgrounds: Vec<&String> = Vec::new();
    let mut foregrounds: Vec<&String> = Vec::new();
    let mut neutrals_mid: Vec<&String> = Vec::new();

    for (key, token) in keyed {
        let Some([l, c, _]) = oklch(token) else { continue };

        let is_light = l >= 90.0;
        let is_dark = l < 30.0;
        if (dark_scheme && is_dark) || (!dark_scheme && is_light) {
            backgrounds.push(key);
        } else if (dark_scheme && is_light) || (!dark_scheme && is_dark) {
            foregrounds.push(key);
        } else if c < 10.0 {
            neutrals_mid.push(key);
        }

        if semantic.accent.is_none() && c > 20.0 && (40.0..=70.0).contains(&l) {
            semantic.accent = Some(key.clone());
        }
    }

    semantic.bg_base = backgrounds.first().map(|k| (*k).clone());
    semantic.bg_surface = backgrounds.get(1).or_else(|| backgrounds.first()).map(|k| (*k).clone());
    semantic.bg_muted = backgrounds.get(2).or_else(|| backgrounds.get(1)).map(|k| (*k).clone());
    semantic.fg_base = foregrounds.first().map(|k| (*k).clone());
    semantic.fg_muted = foregrounds.get(1).or_else(|| foregrounds.first()).map(|k| (*k).clone());
    semantic.border_subtle = neutrals_mid.first().map(|k| (*k).clone());
    semantic.border_strong = neutrals_mid.get(1).or_else(|| neutrals_mid.first()).map(|k| (*k).clone());

    semantic
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_keys() {
        assert_eq!(short_color_key("gray-500"), "g500");
        assert_eq!(short_color_key("gray-500-2"), "g500");
        assert_eq!(short_color_key("blue-dark-2"), "bd2");
        assert_eq!(short_color_key("red-base-1"), "rb1");
        assert_eq!(short_color_key("white-1"), "w1");
    }

    #[test]
    fn median_ratios() {
        // 4, 8, 16: ratios [2, 2] -> 2
        assert_eq!(median_step_ratio(&[4.0, 8.0, 16.0]), Some(2.0));
        assert_eq!(median_step_ratio(&[16.0]), None);
    }
}
