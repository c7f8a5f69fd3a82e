//! Motion pattern extraction.
//!
//! Catalogs transition durations and timing functions from the rule set,
//! naming each duration's speed band and each easing's family so the
//! prompt pack can describe the motion system in words.

use std::collections::BTreeMap;

use serde::Serialize;

use quarry_css::ParsedRule;
use quarry_values::parse_duration_ms;

/// A cataloged duration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DurationEntry {
    /// Milliseconds.
    pub ms: u64,
    /// Speed band label.
    pub label: &'static str,
    /// Times observed.
    pub count: u32,
}

/// A cataloged timing function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TimingEntry {
    /// The value as authored.
    pub value: String,
    /// Easing family label.
    pub family: &'static str,
    /// Times observed.
    pub count: u32,
}

/// The motion report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct MotionReport {
    /// Durations, most used first.
    pub durations: Vec<DurationEntry>,
    /// Timing functions, most used first.
    pub timing_functions: Vec<TimingEntry>,
}

/// Speed band for a duration.
#[must_use]
pub fn speed_label(ms: u64) -> &'static str {
    match ms {
        0..=50 => "Instant",
        51..=100 => "Very Fast",
        101..=200 => "Fast",
        201..=350 => "Normal",
        351..=500 => "Slow",
        501..=800 => "Very Slow",
        _ => "Extra Slow",
    }
}

/// Easing family for a timing-function value.
#[must_use]
pub fn easing_family(value: &str) -> &'static str {
    let v = value.trim().to_ascii_lowercase();
    match v.as_str() {
        "linear" => return "Linear",
        "ease" => return "Ease",
        "ease-in" => return "Ease In",
        "ease-out" => return "Ease Out",
        "ease-in-out" => return "Ease In Out",
        "step-start" | "step-end" => return "Stepped",
        _ => {}
    }
    if let Some(points) = bezier_points(&v) {
        // The Material motion curves are ubiquitous enough to name.
        if close(&points, &[0.4, 0.0, 0.2, 1.0]) {
            return "Material Standard";
        }
        if close(&points, &[0.0, 0.0, 0.2, 1.0]) {
            return "Material Decelerate";
        }
        if close(&points, &[0.4, 0.0, 1.0, 1.0]) {
            return "Material Accelerate";
        }
        // Overshooting control points read as spring physics.
        if points[1] < -0.05 || points[1] > 1.05 || points[3] < -0.05 || points[3] > 1.05 {
            return "Spring/Bounce";
        }
        return "Custom Bezier";
    }
    if v.starts_with("steps(") {
        return "Stepped";
    }
    if v.contains("spring") || v.contains("bounce") {
        return "Spring/Bounce";
    }
    "Custom"
}

fn bezier_points(value: &str) -> Option<[f64; 4]> {
    let inner = value.strip_prefix("cubic-bezier(")?.strip_suffix(')')?;
    let parts: Vec<f64> = inner
        .split(',')
        .map(str::trim)
        .filter_map(|p| p.parse::<f64>().ok())
        .collect();
    if parts.len() == 4 {
        Some([parts[0], parts[1], parts[2], parts[3]])
    } else {
        None
    }
}

fn close(a: &[f64; 4], b: &[f64; 4]) -> bool {
    a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < 0.05)
}

/// Extract the motion report from the rule set.
#[must_use]
pub fn extract_motion(rules: &[ParsedRule]) -> MotionReport {
    let mut durations: BTreeMap<u64, u32> = BTreeMap::new();
    let mut timings: BTreeMap<String, u32> = BTreeMap::new();

    for rule in rules {
        for decl in &rule.declarations {
            match decl.property.as_str() {
                "transition-duration" | "animation-duration" => {
                    for part in decl.value.split(',') {
                        if let Some(ms) = parse_duration_ms(part) {
                            *durations.entry(ms).or_insert(0) += 1;
                        }
                    }
                }
                "transition-timing-function" | "animation-timing-function" => {
                    for part in split_top_level_commas(&decl.value) {
                        let trimmed = part.trim().to_string();
                        if !trimmed.is_empty() {
                            *timings.entry(trimmed).or_insert(0) += 1;
                        }
                    }
                }
                "transition" => {
                    for layer in split_top_level_commas(&decl.value) {
                        scan_transition_shorthand(&layer, &mut durations, &mut timings);
                    }
                }
                _ => {}
            }
        }
    }

    let mut duration_entries: Vec<DurationEntry> = durations
        .into_iter()
        .map(|(ms, count)| DurationEntry { ms, label: speed_label(ms), count })
        .collect();
    duration_entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.ms.cmp(&b.ms)));

    let mut timing_entries: Vec<TimingEntry> = timings
        .into_iter()
        .map(|(value, count)| TimingEntry {
            family: easing_family(&value),
            value,
            count,
        })
        .collect();
    timing_entries.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.value.cmp(&b.value)));

    MotionReport {
        durations: duration_entries,
        timing_functions: timing_entries,
    }
}

/// `transition: background-color 0.2s ease-in-out 0s` - the first time
/// value is the duration (the second is delay), everything ident-like
/// that names an easing is a timing function.
fn scan_transition_shorthand(
    layer: &str,
    durations: &mut BTreeMap<u64, u32>,
    timings: &mut BTreeMap<String, u32>,
) {
    let mut time_seen = false;
    for token in split_respecting_parens(layer) {
        if let Some(ms) = parse_duration_ms(token) {
            if !time_seen {
                *durations.entry(ms).or_insert(0) += 1;
                time_seen = true;
            }
            continue;
        }
        let lower = token.to_ascii_lowercase();
        let is_easing = matches!(
            lower.as_str(),
            "linear" | "ease" | "ease-in" | "ease-out" | "ease-in-out" | "step-start" | "step-end"
        ) || lower.starts_with("cubic-bezier(")
            || lower.starts_with("steps(");
        if is_easing {
            *timings.entry(token.to_string()).or_insert(0) += 1;
        }
    }
}

fn split_top_level_commas(input: &str) -> Vec<String> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in input.chars() {
        match c {
            '(' => {
                depth += 1;
                current.push(c);
            }
            ')' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => out.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    if !current.trim().is_empty() {
        out.push(current);
    }
    out
}

fn split_respecting_parens(input: &str) -> Vec<&str> {
    let mut out = Vec::new();
    let mut depth = 0usize;
    let mut start: Option<usize> = None;
    for (i, c) in input.char_indices() {
        match c {
            '(' => {
                depth += 1;
                if start.is_none() {
                    start = Some(i);
                }
            }
            ')' => depth = depth.saturating_sub(1),
            c if c.is_whitespace() && depth == 0 => {
                if let Some(s) = start.take() {
                    out.push(&input[s..i]);
                }
            }
            _ => {
                if start.is_none() {
                    start = Some(i);
                }
            }
        }
    }
    if let Some(s) = start {
        out.push(&input[s..]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_css::parse_source;

    fn report(css: &str) -> MotionReport {
        extract_motion(&parse_source(css, 16.0).rules)
    }

    #[test]
    fn longhand_properties() {
        let r = report(
            ".a { transition-duration: 0.2s; transition-timing-function: ease-in-out } \
             .b { transition-duration: 200ms }",
        );
        assert_eq!(r.durations.len(), 1);
        assert_eq!(r.durations[0].ms, 200);
        assert_eq!(r.durations[0].count, 2);
        assert_eq!(r.durations[0].label, "Fast");
        assert_eq!(r.timing_functions[0].family, "Ease In Out");
    }

    #[test]
    fn shorthand_scan() {
        let r = report(".a { transition: background-color 0.3s cubic-bezier(0.4, 0, 0.2, 1) 0s }");
        assert_eq!(r.durations[0].ms, 300);
        assert_eq!(r.timing_functions[0].family, "Material Standard");
    }

    #[test]
    fn spring_detection() {
        assert_eq!(easing_family("cubic-bezier(0.68, -0.55, 0.27, 1.55)"), "Spring/Bounce");
        assert_eq!(easing_family("linear"), "Linear");
        assert_eq!(easing_family("nonsense"), "Custom");
    }
}
