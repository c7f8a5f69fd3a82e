//! CSS color values and parsing.
//!
//! [CSS Color Level 4](https://www.w3.org/TR/css-color-4/)
//!
//! Accepts the hex notations, `rgb()`/`rgba()`, `hsl()`/`hsla()`, the 147
//! named colors, and the non-concrete literals (`transparent`,
//! `currentcolor`, `inherit`, `initial`, `unset`). Anything else parses to
//! `None` - malformed color input never panics.

use serde::{Deserialize, Serialize};

use crate::named;

/// [§ 4 Color syntax](https://www.w3.org/TR/css-color-4/#color-syntax)
///
/// sRGB color with 8-bit channels and a float alpha in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rgba {
    /// Red channel (0-255).
    pub r: u8,
    /// Green channel (0-255).
    pub g: u8,
    /// Blue channel (0-255).
    pub b: u8,
    /// Alpha (0.0 transparent - 1.0 opaque).
    pub a: f32,
}

/// A color in the HSL cylinder: hue in degrees, saturation and lightness
/// in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Hsl {
    /// Hue angle in degrees, normalized to `[0, 360)`.
    pub h: f64,
    /// Saturation, `[0, 1]`.
    pub s: f64,
    /// Lightness, `[0, 1]`.
    pub l: f64,
}

/// A color in OKLCH, scaled for reporting: lightness `[0, 100]`, chroma
/// multiplied by 100 (typical sRGB maximum around 32), hue in degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Oklch {
    /// Perceptual lightness, `[0, 100]`.
    pub l: f64,
    /// Chroma, scaled by 100.
    pub c: f64,
    /// Hue angle in degrees, normalized to `[0, 360)`.
    pub h: f64,
}

/// Result of parsing a color literal.
///
/// The non-concrete literals carry no extractable color; token extraction
/// treats them as noise, but they still parse so callers can tell
/// "not a color" from "a color with no concrete value".
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum ParsedColor {
    /// A concrete sRGB color.
    Concrete(Rgba),
    /// `transparent`, `currentcolor`, `inherit`, `initial`, or `unset`.
    NonConcrete(String),
}

impl ParsedColor {
    /// The concrete color, if any.
    #[must_use]
    pub fn concrete(&self) -> Option<Rgba> {
        match self {
            Self::Concrete(rgba) => Some(*rgba),
            Self::NonConcrete(_) => None,
        }
    }
}

impl Rgba {
    /// Opaque black (#000000).
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0, a: 1.0 };

    /// Opaque white (#ffffff).
    pub const WHITE: Self = Self { r: 255, g: 255, b: 255, a: 1.0 };

    /// Whether the alpha channel is fully opaque.
    #[must_use]
    pub fn is_opaque(&self) -> bool {
        self.a >= 1.0
    }

    /// [§ 4.2 The RGB hexadecimal notations](https://www.w3.org/TR/css-color-4/#hex-notation)
    ///
    /// "The syntax of a `<hex-color>` is a `<hash-token>` token whose value
    /// consists of 3, 4, 6, or 8 hexadecimal digits."
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.strip_prefix('#').unwrap_or(hex);
        if !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return None;
        }
        let expand = |i: usize| u8::from_str_radix(&hex[i..=i].repeat(2), 16).ok();
        let pair = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        match hex.len() {
            // "The three-digit RGB notation (#RGB) is converted into
            // six-digit form (#RRGGBB) by replicating digits."
            3 => Some(Self {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
                a: 1.0,
            }),
            4 => Some(Self {
                r: expand(0)?,
                g: expand(1)?,
                b: expand(2)?,
                a: f32::from(expand(3)?) / 255.0,
            }),
            6 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: 1.0,
            }),
            8 => Some(Self {
                r: pair(0)?,
                g: pair(2)?,
                b: pair(4)?,
                a: f32::from(pair(6)?) / 255.0,
            }),
            _ => None,
        }
    }

    /// Hex string notation: `#rrggbb`, or `#rrggbbaa` when not opaque.
    #[must_use]
    pub fn to_hex_string(&self) -> String {
        if self.is_opaque() {
            format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
        } else {
            let a = (f64::from(self.a) * 255.0).round().clamp(0.0, 255.0) as u8;
            format!("#{:02x}{:02x}{:02x}{:02x}", self.r, self.g, self.b, a)
        }
    }

    /// sRGB components clamped to `[0, 1]` and rounded to 3 decimals, in
    /// the shape the W3C token `$value` carries: `[r, g, b]` when opaque,
    /// `[r, g, b, a]` otherwise.
    #[must_use]
    pub fn canonical_components(&self) -> Vec<f64> {
        let round3 = |v: f64| (v * 1000.0).round() / 1000.0;
        let mut out = vec![
            round3(f64::from(self.r) / 255.0),
            round3(f64::from(self.g) / 255.0),
            round3(f64::from(self.b) / 255.0),
        ];
        if !self.is_opaque() {
            out.push(round3(f64::from(self.a).clamp(0.0, 1.0)));
        }
        out
    }

    /// Deterministic identity key for deduplication: the canonical
    /// components JSON-encoded with minimal number formatting.
    #[must_use]
    pub fn canonical_key(&self) -> String {
        let parts: Vec<String> = self
            .canonical_components()
            .iter()
            .map(|v| format_number(*v))
            .collect();
        format!("[{}]", parts.join(","))
    }

    /// Euclidean similarity in 0-255 RGB space: `1 - d / sqrt(3 * 255^2)`.
    /// 1.0 means identical channels; near-duplicate merging uses > 0.98.
    #[must_use]
    pub fn similarity(&self, other: &Self) -> f64 {
        let dr = f64::from(self.r) - f64::from(other.r);
        let dg = f64::from(self.g) - f64::from(other.g);
        let db = f64::from(self.b) - f64::from(other.b);
        let distance = (dr * dr + dg * dg + db * db).sqrt();
        1.0 - distance / (3.0f64 * 255.0 * 255.0).sqrt()
    }

    /// Convert to HSL.
    ///
    /// [§ 4.2.4 HSL-to-RGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
    /// run in reverse (the standard max/min formulation).
    #[must_use]
    pub fn to_hsl(&self) -> Hsl {
        let r = f64::from(self.r) / 255.0;
        let g = f64::from(self.g) / 255.0;
        let b = f64::from(self.b) / 255.0;
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;
        let l = (max + min) / 2.0;

        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let s = if l > 0.5 {
            delta / (2.0 - max - min)
        } else {
            delta / (max + min)
        };

        let h = if max == r {
            ((g - b) / delta) % 6.0
        } else if max == g {
            (b - r) / delta + 2.0
        } else {
            (r - g) / delta + 4.0
        };
        let h = (h * 60.0).rem_euclid(360.0);

        Hsl { h, s, l }
    }

    /// Convert to OKLCH through the sRGB -> linear -> Oklab pipeline.
    ///
    /// Matrix constants from Björn Ottosson's published Oklab definition.
    #[must_use]
    pub fn to_oklch(&self) -> Oklch {
        let r = srgb_to_linear(f64::from(self.r) / 255.0);
        let g = srgb_to_linear(f64::from(self.g) / 255.0);
        let b = srgb_to_linear(f64::from(self.b) / 255.0);

        let l = 0.412_221_470_8 * r + 0.536_332_536_3 * g + 0.051_445_992_9 * b;
        let m = 0.211_903_498_2 * r + 0.680_699_545_1 * g + 0.107_396_956_6 * b;
        let s = 0.088_302_461_9 * r + 0.281_718_837_6 * g + 0.629_978_700_5 * b;

        let l_ = l.cbrt();
        let m_ = m.cbrt();
        let s_ = s.cbrt();

        let ok_l = 0.210_454_255_3 * l_ + 0.793_617_785_0 * m_ - 0.004_072_046_8 * s_;
        let ok_a = 1.977_998_495_1 * l_ - 2.428_592_205_0 * m_ + 0.450_593_709_9 * s_;
        let ok_b = 0.025_904_037_1 * l_ + 0.782_771_766_2 * m_ - 0.808_675_766_0 * s_;

        let c = (ok_a * ok_a + ok_b * ok_b).sqrt();
        let h = ok_b.atan2(ok_a).to_degrees().rem_euclid(360.0);

        Oklch {
            l: ok_l * 100.0,
            c: c * 100.0,
            h,
        }
    }

    /// Legacy luminance-only OKLCH approximation.
    ///
    /// Lightness comes from relative luminance alone; chroma and hue are
    /// estimated from the HSL cylinder. Kept for bit-compatibility runs
    /// behind an option; the correct transform is [`Rgba::to_oklch`].
    #[must_use]
    pub fn to_oklch_approximate(&self) -> Oklch {
        let r = srgb_to_linear(f64::from(self.r) / 255.0);
        let g = srgb_to_linear(f64::from(self.g) / 255.0);
        let b = srgb_to_linear(f64::from(self.b) / 255.0);
        let luminance = 0.2126 * r + 0.7152 * g + 0.0722 * b;
        let hsl = self.to_hsl();
        Oklch {
            l: luminance.cbrt() * 100.0,
            c: hsl.s * 32.0,
            h: hsl.h,
        }
    }
}

/// [§ 6.1 Transfer function](https://www.w3.org/TR/css-color-4/#predefined-sRGB)
///
/// Invert the sRGB gamma encoding for one channel.
fn srgb_to_linear(c: f64) -> f64 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Format a component with minimal digits (`1` not `1.000`, `0.2` not
/// `0.200`) so canonical keys are stable across platforms.
fn format_number(v: f64) -> String {
    let s = format!("{v:.3}");
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    if trimmed.is_empty() || trimmed == "-" {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Parse any supported color literal.
///
/// Returns `None` on malformed input; never panics.
#[must_use]
pub fn parse_color(input: &str) -> Option<ParsedColor> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }

    if let Some(hex) = trimmed.strip_prefix('#') {
        return Rgba::from_hex(hex).map(ParsedColor::Concrete);
    }

    let lower = trimmed.to_ascii_lowercase();

    // [§ 6.3 transparent] and the CSS-wide keywords carry no concrete
    // color; callers treat these as non-extractable.
    if matches!(
        lower.as_str(),
        "transparent" | "currentcolor" | "inherit" | "initial" | "unset"
    ) {
        return Some(ParsedColor::NonConcrete(lower));
    }

    if let Some(args) = function_args(&lower, &["rgb", "rgba"]) {
        return parse_rgb_args(&args).map(ParsedColor::Concrete);
    }
    if let Some(args) = function_args(&lower, &["hsl", "hsla"]) {
        return parse_hsl_args(&args).map(ParsedColor::Concrete);
    }

    named::lookup(&lower).map(|[r, g, b]| {
        ParsedColor::Concrete(Rgba { r, g, b, a: 1.0 })
    })
}

/// If `input` is `name(...)` for one of `names`, return the argument list
/// split on commas, whitespace, and the modern `/` alpha separator.
fn function_args(input: &str, names: &[&str]) -> Option<Vec<String>> {
    let open = input.find('(')?;
    let name = input[..open].trim();
    if !names.contains(&name) {
        return None;
    }
    let close = input.rfind(')')?;
    if close <= open {
        return None;
    }
    let inner = &input[open + 1..close];
    Some(
        inner
            .split(|c: char| c == ',' || c == '/' || c.is_whitespace())
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect(),
    )
}

/// [§ 4.1 The RGB Functions](https://www.w3.org/TR/css-color-4/#rgb-functions)
///
/// "Values outside these ranges are not invalid, but are clamped to the
/// ranges defined here at parsed-value time."
fn parse_rgb_args(args: &[String]) -> Option<Rgba> {
    if args.len() < 3 {
        return None;
    }
    let channel = |arg: &str| -> Option<u8> {
        let v = if let Some(pct) = arg.strip_suffix('%') {
            pct.parse::<f64>().ok()? * 255.0 / 100.0
        } else {
            arg.parse::<f64>().ok()?
        };
        if !v.is_finite() {
            return None;
        }
        Some(v.round().clamp(0.0, 255.0) as u8)
    };
    let r = channel(&args[0])?;
    let g = channel(&args[1])?;
    let b = channel(&args[2])?;
    // "The final argument, <alpha-value>, specifies the alpha of the
    // color. If omitted, it defaults to 100%."
    let a = match args.get(3) {
        Some(arg) => parse_alpha(arg)?,
        None => 1.0,
    };
    Some(Rgba { r, g, b, a })
}

/// [§ 4.1 The HSL Functions](https://www.w3.org/TR/css-color-4/#the-hsl-notation)
///
/// "hsl() = hsl( <hue> <percentage> <percentage> [ / <alpha-value> ]? )"
///
/// The hue is unitless degrees (a trailing `deg` is tolerated); saturation
/// and lightness must be percentages.
fn parse_hsl_args(args: &[String]) -> Option<Rgba> {
    if args.len() < 3 {
        return None;
    }
    let h = args[0]
        .strip_suffix("deg")
        .unwrap_or(&args[0])
        .parse::<f64>()
        .ok()?;
    let s = args[1].strip_suffix('%')?.parse::<f64>().ok()? / 100.0;
    let l = args[2].strip_suffix('%')?.parse::<f64>().ok()? / 100.0;
    if !h.is_finite() || !s.is_finite() || !l.is_finite() {
        return None;
    }
    let a = match args.get(3) {
        Some(arg) => parse_alpha(arg)?,
        None => 1.0,
    };
    let (r, g, b) = hsl_to_rgb(h, s.clamp(0.0, 1.0), l.clamp(0.0, 1.0));
    Some(Rgba { r, g, b, a })
}

/// "The `<alpha-value>` can be a `<number>` (clamped to [0, 1]) or a
/// `<percentage>` (clamped to [0%, 100%])."
fn parse_alpha(arg: &str) -> Option<f32> {
    let v = if let Some(pct) = arg.strip_suffix('%') {
        pct.parse::<f64>().ok()? / 100.0
    } else {
        arg.parse::<f64>().ok()?
    };
    if !v.is_finite() {
        return None;
    }
    Some(v.clamp(0.0, 1.0) as f32)
}

/// [§ 4.2.4 HSL-to-RGB](https://www.w3.org/TR/css-color-4/#hsl-to-rgb)
///
/// Standard algorithm using chroma and the intermediate value.
fn hsl_to_rgb(hue: f64, saturation: f64, lightness: f64) -> (u8, u8, u8) {
    let h = hue.rem_euclid(360.0);
    let c = (1.0 - (2.0 * lightness - 1.0).abs()) * saturation;
    let h_prime = h / 60.0;
    let x = c * (1.0 - (h_prime % 2.0 - 1.0).abs());

    let (r1, g1, b1) = match h_prime as u32 {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        5 => (c, 0.0, x),
        _ => (0.0, 0.0, 0.0),
    };

    let m = lightness - c / 2.0;
    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r1), to_u8(g1), to_u8(b1))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn concrete(input: &str) -> Rgba {
        match parse_color(input) {
            Some(ParsedColor::Concrete(rgba)) => rgba,
            other => panic!("expected concrete color for {input:?}, got {other:?}"),
        }
    }

    #[test]
    fn hex_forms() {
        assert_eq!(concrete("#f00"), Rgba { r: 255, g: 0, b: 0, a: 1.0 });
        assert_eq!(
            concrete("#336699"),
            Rgba { r: 0x33, g: 0x66, b: 0x99, a: 1.0 }
        );
        let with_alpha = concrete("#33669980");
        assert!((with_alpha.a - 128.0 / 255.0).abs() < 0.01);
    }

    #[test]
    fn rgb_functions() {
        assert_eq!(
            concrete("rgb(12, 34, 56)"),
            Rgba { r: 12, g: 34, b: 56, a: 1.0 }
        );
        let a = concrete("rgba(255, 0, 0, 0.5)");
        assert_eq!((a.r, a.g, a.b), (255, 0, 0));
        assert!((a.a - 0.5).abs() < f32::EPSILON);
        // Out-of-range channels clamp, not fail
        assert_eq!(concrete("rgb(300, -5, 0)").r, 255);
    }

    #[test]
    fn hsl_functions() {
        // hsl(0, 100%, 50%) is pure red
        assert_eq!(concrete("hsl(0, 100%, 50%)"), Rgba { r: 255, g: 0, b: 0, a: 1.0 });
        // saturation/lightness without % are rejected per the grammar
        assert_eq!(parse_color("hsl(0, 100, 50)"), None);
    }

    #[test]
    fn named_and_sentinels() {
        assert_eq!(concrete("tomato"), Rgba { r: 0xFF, g: 0x63, b: 0x47, a: 1.0 });
        assert_eq!(
            parse_color("transparent"),
            Some(ParsedColor::NonConcrete("transparent".to_string()))
        );
        assert_eq!(
            parse_color("currentColor"),
            Some(ParsedColor::NonConcrete("currentcolor".to_string()))
        );
        assert_eq!(parse_color("not-a-color"), None);
        assert_eq!(parse_color(""), None);
    }

    #[test]
    fn hsl_round_trip() {
        let red = Rgba { r: 255, g: 0, b: 0, a: 1.0 };
        let hsl = red.to_hsl();
        assert!((hsl.h - 0.0).abs() < 0.001);
        assert!((hsl.s - 1.0).abs() < 0.001);
        assert!((hsl.l - 0.5).abs() < 0.001);

        let gray = Rgba { r: 128, g: 128, b: 128, a: 1.0 };
        assert!(gray.to_hsl().s < 0.001);
    }

    #[test]
    fn oklch_known_values() {
        // White: L = 100, C = 0
        let white = Rgba::WHITE.to_oklch();
        assert!((white.l - 100.0).abs() < 0.1, "white L = {}", white.l);
        assert!(white.c < 0.1);
        // Black: L = 0
        let black = Rgba::BLACK.to_oklch();
        assert!(black.l < 0.1);
        // Pure red lands near L 62.8, C 25.8, H 29.2 in scaled units
        let red = Rgba { r: 255, g: 0, b: 0, a: 1.0 }.to_oklch();
        assert!((red.l - 62.8).abs() < 0.5, "red L = {}", red.l);
        assert!((red.c - 25.8).abs() < 0.5, "red C = {}", red.c);
        assert!((red.h - 29.2).abs() < 1.0, "red H = {}", red.h);
    }

    #[test]
    fn canonical_key_is_minimal_and_stable() {
        let red = Rgba { r: 255, g: 0, b: 0, a: 1.0 };
        assert_eq!(red.canonical_key(), "[1,0,0]");
        let translucent = Rgba { r: 255, g: 0, b: 0, a: 0.5 };
        assert_eq!(translucent.canonical_key(), "[1,0,0,0.5]");
    }

    #[test]
    fn similarity_of_close_colors() {
        let a = concrete("#336699");
        let b = concrete("#336698");
        assert!(a.similarity(&b) > 0.98);
        let far = concrete("#ffffff");
        assert!(a.similarity(&far) < 0.5);
    }
}
