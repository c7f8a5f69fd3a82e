//! Z-index stacking semantics.
//!
//! Buckets the numeric `z-index` values found in the rule set into named
//! stacking layers and classifies the overall scale shape.

use serde::Serialize;
use strum_macros::Display;

use quarry_css::ParsedRule;

/// Named stacking layers, bottom to top, with their value ranges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum StackingLayer {
    /// Below 10.
    Base,
    /// 10-99.
    Content,
    /// 100-999.
    Dropdown,
    /// 1000-1999.
    Sticky,
    /// 2000-4999.
    Overlay,
    /// 5000-8999.
    Modal,
    /// 9000-9499.
    Popover,
    /// 9500 and above.
    Tooltip,
}

impl StackingLayer {
    /// Bucket a z-index value.
    #[must_use]
    pub fn of(z: i64) -> Self {
        match z {
            i64::MIN..=9 => Self::Base,
            10..=99 => Self::Content,
            100..=999 => Self::Dropdown,
            1000..=1999 => Self::Sticky,
            2000..=4999 => Self::Overlay,
            5000..=8999 => Self::Modal,
            9000..=9499 => Self::Popover,
            _ => Self::Tooltip,
        }
    }
}

/// Scale shape of the observed values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ScaleShape {
    /// Roughly constant steps.
    Linear,
    /// Multiplicative steps near 2x or 10x.
    Exponential,
    /// Neither.
    Custom,
}

/// One populated stacking layer.
#[derive(Debug, Clone, Serialize)]
pub struct LayerEntry {
    /// The layer.
    pub layer: StackingLayer,
    /// Sorted distinct values in the layer.
    pub values: Vec<i64>,
    /// Selectors observed using those values (first few).
    pub selectors: Vec<String>,
}

/// The stacking report.
#[derive(Debug, Clone, Default, Serialize)]
pub struct StackingReport {
    /// Populated layers, bottom to top.
    pub layers: Vec<LayerEntry>,
    /// Scale classification, when at least three distinct values exist.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scale: Option<ScaleShape>,
}

/// Build the stacking report from the rule set.
#[must_use]
pub fn extract_stacking(rules: &[ParsedRule]) -> StackingReport {
    use std::collections::BTreeMap;

    let mut by_layer: BTreeMap<StackingLayer, (Vec<i64>, Vec<String>)> = BTreeMap::new();
    let mut all_values: Vec<i64> = Vec::new();

    for rule in rules {
        for decl in &rule.declarations {
            if decl.property != "z-index" {
                continue;
            }
            let Ok(z) = decl.value.trim().parse::<i64>() else {
                continue;
            };
            all_values.push(z);
            let entry = by_layer.entry(StackingLayer::of(z)).or_default();
            if !entry.0.contains(&z) {
                entry.0.push(z);
            }
            for selector in &rule.selectors {
                if entry.1.len() < 4 && !entry.1.contains(selector) {
                    entry.1.push(selector.clone());
                }
            }
        }
    }

    let layers = by_layer
        .into_iter()
        .map(|(layer, (mut values, selectors))| {
            values.sort_unstable();
            LayerEntry { layer, values, selectors }
        })
        .collect();

    all_values.sort_unstable();
    all_values.dedup();
    StackingReport {
        layers,
        scale: classify_scale(&all_values),
    }
}

/// Linear when the step differences are tight (standard deviation under
/// 30% of the mean step); exponential when consecutive ratios hover near
/// 2x or 10x; custom otherwise.
fn classify_scale(values: &[i64]) -> Option<ScaleShape> {
    if values.len() < 3 {
        return None;
    }

    let diffs: Vec<f64> = values.windows(2).map(|w| (w[1] - w[0]) as f64).collect();
    let mean = diffs.iter().sum::<f64>() / diffs.len() as f64;
    if mean > 0.0 {
        let variance =
            diffs.iter().map(|d| (d - mean).powi(2)).sum::<f64>() / diffs.len() as f64;
        if variance.sqrt() < 0.3 * mean {
            return Some(ScaleShape::Linear);
        }
    }

    let ratios: Vec<f64> = values
        .windows(2)
        .filter(|w| w[0] > 0)
        .map(|w| w[1] as f64 / w[0] as f64)
        .collect();
    if !ratios.is_empty() {
        let mean_ratio = ratios.iter().sum::<f64>() / ratios.len() as f64;
        if (mean_ratio - 2.0).abs() < 0.4 || (mean_ratio - 10.0).abs() < 2.0 {
            return Some(ScaleShape::Exponential);
        }
    }

    Some(ScaleShape::Custom)
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_css::parse_source;

    fn report(css: &str) -> StackingReport {
        extract_stacking(&parse_source(css, 16.0).rules)
    }

    #[test]
    fn buckets_land_in_layers() {
        let r = report(
            ".a { z-index: 1 } .b { z-index: 50 } .c { z-index: 500 } \
             .d { z-index: 1500 } .e { z-index: 9999 }",
        );
        let layers: Vec<StackingLayer> = r.layers.iter().map(|l| l.layer).collect();
        assert_eq!(
            layers,
            vec![
                StackingLayer::Base,
                StackingLayer::Content,
                StackingLayer::Dropdown,
                StackingLayer::Sticky,
                StackingLayer::Tooltip
            ]
        );
    }

    #[test]
    fn linear_scale() {
        let r = report(".a { z-index: 10 } .b { z-index: 20 } .c { z-index: 30 } .d { z-index: 40 }");
        assert_eq!(r.scale, Some(ScaleShape::Linear));
    }

    #[test]
    fn exponential_scale() {
        let r = report(".a { z-index: 10 } .b { z-index: 100 } .c { z-index: 1000 }");
        assert_eq!(r.scale, Some(ScaleShape::Exponential));
    }

    #[test]
    fn too_few_values_is_unclassified() {
        let r = report(".a { z-index: 10 }");
        assert_eq!(r.scale, None);
    }
}
