//! Semantic names for numeric ranges.
//!
//! Token names are derived, not authored: a color is named from its HSL
//! position (`red-base-1`, `gray-200-3`), a spacing value from the nearest
//! step of the familiar 4px-grid scale (`spacing-4`), a radius, font size,
//! shadow, or duration from its magnitude bucket. Every function here is
//! deterministic and total.

use crate::color::Hsl;
use crate::shadow::Shadow;

/// Tailwind-style spacing steps as `(suffix, px)`.
const SPACING_SCALE: &[(&str, f64)] = &[
    ("0", 0.0),
    ("0.5", 2.0),
    ("1", 4.0),
    ("1.5", 6.0),
    ("2", 8.0),
    ("2.5", 10.0),
    ("3", 12.0),
    ("3.5", 14.0),
    ("4", 16.0),
    ("5", 20.0),
    ("6", 24.0),
    ("7", 28.0),
    ("8", 32.0),
    ("9", 36.0),
    ("10", 40.0),
    ("11", 44.0),
    ("12", 48.0),
    ("14", 56.0),
    ("16", 64.0),
    ("20", 80.0),
    ("24", 96.0),
    ("28", 112.0),
    ("32", 128.0),
    ("36", 144.0),
    ("40", 160.0),
    ("44", 176.0),
    ("48", 192.0),
    ("52", 208.0),
    ("56", 224.0),
    ("60", 240.0),
    ("64", 256.0),
];

/// Border-radius buckets as `(suffix, px upper bound)`.
const RADIUS_SCALE: &[(&str, f64)] = &[
    ("none", 0.0),
    ("sm", 3.0),
    ("md", 7.0),
    ("lg", 10.0),
    ("xl", 14.0),
    ("2xl", 20.0),
    ("3xl", 28.0),
];

/// Font-size steps as `(suffix, px)`.
const FONT_SIZE_SCALE: &[(&str, f64)] = &[
    ("xs", 12.0),
    ("sm", 14.0),
    ("base", 16.0),
    ("lg", 18.0),
    ("xl", 20.0),
    ("2xl", 24.0),
    ("3xl", 30.0),
    ("4xl", 36.0),
    ("5xl", 48.0),
    ("6xl", 60.0),
    ("7xl", 72.0),
    ("8xl", 96.0),
    ("9xl", 128.0),
];

/// Grayscale lightness ladder, brightest first, as `(bucket, lower bound)`.
const GRAY_LADDER: &[(&str, f64)] = &[
    ("white", 0.95),
    ("gray-50", 0.90),
    ("gray-100", 0.80),
    ("gray-200", 0.70),
    ("gray-300", 0.60),
    ("gray-400", 0.50),
    ("gray-500", 0.40),
    ("gray-600", 0.30),
    ("gray-700", 0.20),
    ("gray-800", 0.10),
];

/// Name a color from its HSL position and its rank within the category.
///
/// Near-achromatic colors (`s < 0.1`) take the grayscale ladder; the rest
/// classify by hue arc and lightness band. The 1-based rank suffix keeps
/// names unique within a category.
#[must_use]
pub fn color_name(hsl: Hsl, position: usize) -> String {
    let index = position + 1;
    if hsl.s < 0.1 {
        let bucket = GRAY_LADDER
            .iter()
            .find(|(_, bound)| hsl.l >= *bound)
            .map_or("black", |(name, _)| *name);
        return format!("{bucket}-{index}");
    }

    let hue = hue_family(hsl.h);
    let band = if hsl.l >= 0.70 {
        "light"
    } else if hsl.l < 0.35 {
        "dark"
    } else {
        "base"
    };
    format!("{hue}-{band}-{index}")
}

/// Classify a hue angle into its color family.
#[must_use]
pub fn hue_family(h: f64) -> &'static str {
    let h = h.rem_euclid(360.0);
    match h {
        h if h < 15.0 || h >= 345.0 => "red",
        h if h < 45.0 => "orange",
        h if h < 70.0 => "yellow",
        h if h < 160.0 => "green",
        h if h < 200.0 => "cyan",
        h if h < 260.0 => "blue",
        h if h < 290.0 => "purple",
        _ => "pink",
    }
}

/// Name a spacing magnitude from the nearest scale step.
#[must_use]
pub fn spacing_name(px: f64) -> String {
    let px = px.abs();
    let mut best = SPACING_SCALE[0];
    let mut best_distance = f64::INFINITY;
    for step in SPACING_SCALE {
        let distance = (step.1 - px).abs();
        if distance < best_distance {
            best = *step;
            best_distance = distance;
        }
    }
    format!("spacing-{}", best.0)
}

/// Name a border radius from its pixel bucket. Values at or beyond 9999px
/// (and 50% circles normalized by the caller) are `radius-full`.
#[must_use]
pub fn radius_name(px: f64) -> String {
    if px >= 9999.0 {
        return "radius-full".to_string();
    }
    let bucket = RADIUS_SCALE
        .iter()
        .find(|(_, bound)| px <= *bound)
        .map_or("full", |(name, _)| *name);
    format!("radius-{bucket}")
}

/// Name a font size from the nearest type-scale step.
#[must_use]
pub fn font_size_name(px: f64) -> String {
    let mut best = FONT_SIZE_SCALE[0];
    let mut best_distance = f64::INFINITY;
    for step in FONT_SIZE_SCALE {
        let distance = (step.1 - px).abs();
        if distance < best_distance {
            best = *step;
            best_distance = distance;
        }
    }
    format!("text-{}", best.0)
}

/// Name a font weight: the nine standard weights by their common names.
#[must_use]
pub fn font_weight_name(weight: u32) -> String {
    let name = match weight {
        0..=149 => "thin",
        150..=249 => "extralight",
        250..=349 => "light",
        350..=449 => "normal",
        450..=549 => "medium",
        550..=649 => "semibold",
        650..=749 => "bold",
        750..=849 => "extrabold",
        _ => "black",
    };
    format!("weight-{name}")
}

/// Name a shadow by elevation: inset shadows are `shadow-inner`, outer
/// shadows bucket by blur radius.
#[must_use]
pub fn shadow_name(shadow: &Shadow) -> String {
    if shadow.inset {
        return "shadow-inner".to_string();
    }
    let blur = shadow.blur.value.abs();
    let bucket = if blur <= 2.0 {
        "sm"
    } else if blur <= 6.0 {
        "md"
    } else if blur <= 12.0 {
        "lg"
    } else if blur <= 24.0 {
        "xl"
    } else {
        "2xl"
    };
    format!("shadow-{bucket}")
}

/// Name a duration by millisecond bucket.
#[must_use]
pub fn duration_name(ms: u64) -> String {
    let bucket = match ms {
        0..=75 => "fastest",
        76..=150 => "faster",
        151..=250 => "fast",
        251..=400 => "normal",
        401..=600 => "slow",
        601..=1000 => "slower",
        _ => "slowest",
    };
    format!("duration-{bucket}")
}

/// Slugify a font family for use in a token name: lowercase, spaces to
/// hyphens, quotes stripped.
#[must_use]
pub fn family_slug(family: &str) -> String {
    let cleaned = family.trim().trim_matches(|c| c == '"' || c == '\'');
    let slug: String = cleaned
        .to_ascii_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    let collapsed = slug
        .split('-')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("-");
    if collapsed.is_empty() {
        "font".to_string()
    } else {
        format!("font-{collapsed}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::Rgba;
    use crate::dimension::{Dimension, Unit};

    #[test]
    fn pure_red_is_red_base() {
        let hsl = Rgba { r: 255, g: 0, b: 0, a: 1.0 }.to_hsl();
        assert_eq!(color_name(hsl, 0), "red-base-1");
    }

    #[test]
    fn grayscale_ladder() {
        let white = Rgba::WHITE.to_hsl();
        assert_eq!(color_name(white, 0), "white-1");
        let black = Rgba::BLACK.to_hsl();
        assert_eq!(color_name(black, 2), "black-3");
        let mid = Rgba { r: 128, g: 128, b: 128, a: 1.0 }.to_hsl();
        assert_eq!(color_name(mid, 0), "gray-400-1");
    }

    #[test]
    fn hue_families_cover_the_wheel() {
        assert_eq!(hue_family(0.0), "red");
        assert_eq!(hue_family(30.0), "orange");
        assert_eq!(hue_family(60.0), "yellow");
        assert_eq!(hue_family(120.0), "green");
        assert_eq!(hue_family(180.0), "cyan");
        assert_eq!(hue_family(220.0), "blue");
        assert_eq!(hue_family(270.0), "purple");
        assert_eq!(hue_family(320.0), "pink");
        assert_eq!(hue_family(350.0), "red");
    }

    #[test]
    fn spacing_names_snap_to_scale() {
        assert_eq!(spacing_name(16.0), "spacing-4");
        assert_eq!(spacing_name(17.0), "spacing-4");
        assert_eq!(spacing_name(0.0), "spacing-0");
        assert_eq!(spacing_name(300.0), "spacing-64");
    }

    #[test]
    fn radius_names() {
        assert_eq!(radius_name(0.0), "radius-none");
        assert_eq!(radius_name(6.0), "radius-md");
        assert_eq!(radius_name(9999.0), "radius-full");
        assert_eq!(radius_name(40.0), "radius-full");
    }

    #[test]
    fn font_size_names() {
        assert_eq!(font_size_name(16.0), "text-base");
        assert_eq!(font_size_name(15.0), "text-sm");
        assert_eq!(font_size_name(128.0), "text-9xl");
    }

    #[test]
    fn weight_names() {
        assert_eq!(font_weight_name(400), "weight-normal");
        assert_eq!(font_weight_name(700), "weight-bold");
        assert_eq!(font_weight_name(900), "weight-black");
    }

    #[test]
    fn shadow_and_duration_names() {
        let shadow = Shadow {
            offset_x: Dimension::ZERO,
            offset_y: Dimension { value: 2.0, unit: Unit::Px },
            blur: Dimension { value: 8.0, unit: Unit::Px },
            spread: Dimension::ZERO,
            color: Rgba::BLACK,
            inset: false,
        };
        assert_eq!(shadow_name(&shadow), "shadow-lg");
        let inner = Shadow { inset: true, ..shadow };
        assert_eq!(shadow_name(&inner), "shadow-inner");

        assert_eq!(duration_name(150), "duration-faster");
        assert_eq!(duration_name(300), "duration-normal");
        assert_eq!(duration_name(2000), "duration-slowest");
    }

    #[test]
    fn family_slugs() {
        assert_eq!(family_slug("\"Inter\""), "font-inter");
        assert_eq!(family_slug("SF Pro Display"), "font-sf-pro-display");
        assert_eq!(family_slug("''"), "font");
    }
}
