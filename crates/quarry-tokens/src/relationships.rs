//! Relationship analysis across surviving tokens.
//!
//! Detects the structures designers actually build: shade ladders
//! (`blue-50 … blue-900`), modular type/spacing scales, pixel-grid
//! spacing systems, and hue-grouped palettes.

use serde::Serialize;

use quarry_values::Hsl;

/// The lightness steps a shade ladder may use.
const SHADE_STEPS: &[&str] = &[
    "50", "100", "200", "300", "400", "500", "600", "700", "800", "900",
];

/// Candidate ratios for modular scales: major second through octave.
const SCALE_RATIOS: &[f64] = &[1.125, 1.25, 1.333, 1.5, 1.618, 2.0];

/// Relative tolerance for a value to count as on-scale.
const SCALE_TOLERANCE: f64 = 0.10;

/// Minimum fraction of values that must sit on a scale.
const SCALE_MIN_MATCH: f64 = 0.70;

/// Grid bases tried for spacing systems, in preference order.
const GRID_BASES: &[u32] = &[4, 8, 12];

/// Minimum fraction of values divisible by a grid base.
const GRID_MIN_FRACTION: f64 = 0.70;

/// A detected shade ladder.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShadeSystem {
    /// The family name (`blue`, `gray`).
    pub base: String,
    /// How many steps were found.
    pub count: usize,
    /// Detection confidence in `[0, 1]`.
    pub confidence: f64,
}

/// A detected modular scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModularScale {
    /// The ratio between consecutive steps.
    pub ratio: f64,
    /// The base value in pixels.
    pub base_px: f64,
    /// Fraction of values on the scale.
    pub match_ratio: f64,
}

/// A hue-grouped palette.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PaletteGroup {
    /// Hue bucket start in degrees.
    pub hue_bucket: u32,
    /// Member token names.
    pub members: Vec<String>,
}

/// A complementary color pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComplementaryPair {
    /// First token name.
    pub a: String,
    /// Second token name.
    pub b: String,
    /// Hue separation in degrees.
    pub separation: f64,
}

/// Everything the relationship analyzer found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RelationshipReport {
    /// Shade ladders across token and variable names.
    pub shade_systems: Vec<ShadeSystem>,
    /// Best modular scale over font sizes, if any.
    pub type_scale: Option<ModularScale>,
    /// Best modular scale over spacing values, if any.
    pub spacing_scale: Option<ModularScale>,
    /// Detected spacing grid base (4, 8, or 12).
    pub spacing_grid: Option<u32>,
    /// Monochromatic hue groups with at least three members.
    pub monochromatic: Vec<PaletteGroup>,
    /// Complementary pairs (hue separation within [160, 200] degrees).
    pub complementary: Vec<ComplementaryPair>,
}

/// Run every relationship detector.
///
/// `names` are candidate token/variable names for ladder detection,
/// `font_size_px`/`spacing_px` the surviving magnitudes, `colors` the
/// curated `(name, hsl)` pairs.
#[must_use]
pub fn analyze_relationships(
    names: &[String],
    font_size_px: &[f64],
    spacing_px: &[f64],
    colors: &[(String, Hsl)],
) -> RelationshipReport {
    RelationshipReport {
        shade_systems: detect_shade_systems(names),
        type_scale: detect_modular_scale(font_size_px),
        spacing_scale: detect_modular_scale(spacing_px),
        spacing_grid: detect_spacing_grid(spacing_px),
        monochromatic: detect_monochromatic(colors),
        complementary: detect_complementary(colors),
    }
}

/// Group names of the form `{base}-{step}` where step is a shade step;
/// families with at least five steps are shade systems. Confidence is
/// `min(0.95, count / 9)`.
#[must_use]
pub fn detect_shade_systems(names: &[String]) -> Vec<ShadeSystem> {
    use std::collections::BTreeMap;

    let mut families: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        let Some((base, step)) = name.rsplit_once('-') else {
            continue;
        };
        if base.is_empty() || !SHADE_STEPS.contains(&step) {
            continue;
        }
        let entry = families.entry(base.to_string()).or_default();
        if !entry.contains(&step) {
            entry.push(step);
        }
    }

    families
        .into_iter()
        .filter(|(_, steps)| steps.len() >= 5)
        .map(|(base, steps)| ShadeSystem {
            confidence: (steps.len() as f64 / 9.0).min(0.95),
            count: steps.len(),
            base,
        })
        .collect()
}

/// Find the best `(ratio, base)` explaining the value set.
///
/// For each candidate ratio and each candidate base position, a value at
/// sorted position `p` matches when it is within tolerance of
/// `base * ratio^(p - base_position)`. The best combination needs at
/// least [`SCALE_MIN_MATCH`] of the values; ties break toward the higher
/// match ratio, then the smaller base.
#[must_use]
pub fn detect_modular_scale(values_px: &[f64]) -> Option<ModularScale> {
    let mut sorted: Vec<f64> = values_px
        .iter()
        .copied()
        .filter(|v| *v > 0.0 && v.is_finite())
        .collect();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    sorted.dedup_by(|a, b| (*a - *b).abs() < f64::EPSILON);
    if sorted.len() < 3 {
        return None;
    }

    let mut best: Option<ModularScale> = None;
    for &ratio in SCALE_RATIOS {
        for (base_position, &base) in sorted.iter().enumerate() {
            let matches = sorted
                .iter()
                .enumerate()
                .filter(|(position, &value)| {
                    let k = *position as i32 - base_position as i32;
                    let expected = base * ratio.powi(k);
                    let denominator = value.max(expected);
                    denominator > 0.0 && (value - expected).abs() / denominator < SCALE_TOLERANCE
                })
                .count();
            let match_ratio = matches as f64 / sorted.len() as f64;
            if match_ratio < SCALE_MIN_MATCH {
                continue;
            }
            let candidate = ModularScale {
                ratio,
                base_px: base,
                match_ratio,
            };
            let better = match &best {
                None => true,
                Some(current) => {
                    match_ratio > current.match_ratio
                        || ((match_ratio - current.match_ratio).abs() < f64::EPSILON
                            && base < current.base_px)
                }
            };
            if better {
                best = Some(candidate);
            }
        }
    }
    best
}

/// First grid base dividing at least [`GRID_MIN_FRACTION`] of the values.
#[must_use]
pub fn detect_spacing_grid(values_px: &[f64]) -> Option<u32> {
    let integral: Vec<u32> = values_px
        .iter()
        .filter(|v| v.is_finite() && **v > 0.0)
        .map(|v| v.round() as u32)
        .collect();
    if integral.is_empty() {
        return None;
    }
    for &base in GRID_BASES {
        let divisible = integral.iter().filter(|v| *v % base == 0).count();
        if divisible as f64 / integral.len() as f64 >= GRID_MIN_FRACTION {
            return Some(base);
        }
    }
    None
}

/// Group saturated colors into 30-degree hue buckets; groups of three or
/// more are monochromatic families.
#[must_use]
pub fn detect_monochromatic(colors: &[(String, Hsl)]) -> Vec<PaletteGroup> {
    use std::collections::BTreeMap;

    let mut buckets: BTreeMap<u32, Vec<String>> = BTreeMap::new();
    for (name, hsl) in colors {
        if hsl.s < 0.1 {
            continue;
        }
        let bucket = (hsl.h.rem_euclid(360.0) / 30.0).floor() as u32 * 30;
        buckets.entry(bucket).or_default().push(name.clone());
    }

    buckets
        .into_iter()
        .filter(|(_, members)| members.len() >= 3)
        .map(|(hue_bucket, members)| PaletteGroup { hue_bucket, members })
        .collect()
}

/// Pairs of saturated colors whose hue separation falls in the
/// complementary band.
#[must_use]
pub fn detect_complementary(colors: &[(String, Hsl)]) -> Vec<ComplementaryPair> {
    let saturated: Vec<&(String, Hsl)> = colors.iter().filter(|(_, h)| h.s >= 0.1).collect();
    let mut pairs = Vec::new();
    for (i, (name_a, hsl_a)) in saturated.iter().enumerate() {
        for (name_b, hsl_b) in saturated.iter().skip(i + 1) {
            // Wheel distance: opposite hues sit 180 degrees apart.
            let raw = (hsl_a.h - hsl_b.h).abs();
            let separation = raw.min(360.0 - raw);
            if (160.0..=200.0).contains(&separation) {
                pairs.push(ComplementaryPair {
                    a: name_a.clone(),
                    b: name_b.clone(),
                    separation,
                });
            }
        }
    }
    pairs
}
