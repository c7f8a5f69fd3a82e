//! The detection pipeline.
//!
//! Scores every well-formed element against the archetype table, keeps
//! the best match above the confidence floor, deduplicates instances by
//! `(type, variant)`, applies cross-element validation boosts, and flags
//! low-confidence outliers without removing them.

use std::collections::BTreeMap;

use serde::Serialize;

use quarry_common::Diagnostics;

use crate::archetype::{patterns, ComponentKind};
use crate::capture::{capture_states, capture_tokens, ComponentStates, ComponentTokens};
use crate::element::ComputedStyleEntry;
use crate::facts::ElementFacts;
use crate::signals::confidence;
use crate::variant::infer_variant;

/// Matches below this confidence are discarded.
const CONFIDENCE_FLOOR: f64 = 50.0;

/// Properties consulted by the consistency boost.
const CONSISTENCY_PROPS: [&str; 5] =
    ["border-radius", "padding", "font-size", "font-weight", "display"];

/// How many example selectors an instance retains.
const MAX_EXAMPLES: usize = 3;

/// Confidence bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ConfidenceLevel {
    /// 90 and above.
    VeryHigh,
    /// 75-89.
    High,
    /// 60-74.
    Medium,
    /// Below 60.
    Low,
}

impl ConfidenceLevel {
    /// Band for a confidence value.
    #[must_use]
    pub fn from_confidence(confidence: u32) -> Self {
        match confidence {
            90..=u32::MAX => Self::VeryHigh,
            75..=89 => Self::High,
            60..=74 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Identity and provenance facts carried on an instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstanceMetadata {
    /// Tags observed across merged elements.
    pub tags: Vec<String>,
    /// ARIA roles observed across merged elements.
    pub roles: Vec<String>,
}

/// One detected component (post-merge).
#[derive(Debug, Clone, Serialize)]
pub struct ComponentInstance {
    /// The archetype.
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    /// Inferred variant, when the archetype has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant: Option<String>,
    /// Merged confidence, 0-100.
    pub confidence: u32,
    /// Confidence band.
    pub confidence_level: ConfidenceLevel,
    /// How many elements merged into this instance.
    pub usage_count: u32,
    /// Deduplicated selectors, element order preserved.
    pub selectors: Vec<String>,
    /// Captured design tokens from the representative element.
    pub tokens: ComponentTokens,
    /// Captured state diffs from the representative element.
    pub states: ComponentStates,
    /// Provenance facts.
    pub metadata: InstanceMetadata,
    /// Example selectors (at most three).
    pub examples: Vec<String>,
    /// Set when the instance sits well below its type's median
    /// confidence; the instance is retained.
    pub outlier: bool,
}

/// The detected component library.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ComponentLibrary {
    /// Merged instances, highest usage first.
    pub components: Vec<ComponentInstance>,
    /// Elements that were scored.
    pub elements_scored: usize,
    /// Elements that matched something.
    pub elements_matched: usize,
}

impl ComponentLibrary {
    /// Instance count per kind, used by the prompt pack.
    #[must_use]
    pub fn counts_by_kind(&self) -> BTreeMap<ComponentKind, u32> {
        let mut counts = BTreeMap::new();
        for instance in &self.components {
            *counts.entry(instance.kind).or_insert(0) += instance.usage_count;
        }
        counts
    }
}

/// A per-element match before merging.
struct PreInstance {
    kind: ComponentKind,
    variant: Option<String>,
    confidence: f64,
    selector: String,
    tag: String,
    role: Option<String>,
    tokens: ComponentTokens,
    states: ComponentStates,
}

/// Run detection over the supplied elements.
#[must_use]
pub fn detect_components(
    entries: &[ComputedStyleEntry],
    diagnostics: &mut Diagnostics,
) -> ComponentLibrary {
    let mut pre: Vec<PreInstance> = Vec::new();
    let mut scored = 0usize;

    for entry in entries {
        if !entry.is_well_formed() {
            diagnostics.element_dropped(
                if entry.selector.is_empty() { "<unknown>" } else { &entry.selector },
                "element snapshot missing selector, tag, or computed style",
            );
            continue;
        }
        scored += 1;

        let facts = ElementFacts::compute(entry);
        let mut best: Option<(f64, &'static crate::archetype::ArchetypePattern)> = None;
        for pattern in patterns() {
            let score = confidence(pattern, entry, &facts);
            // Strict comparison keeps the earlier (enum-ordered) archetype
            // on ties, so outcomes are deterministic.
            if score >= CONFIDENCE_FLOOR && best.map_or(true, |(b, _)| score > b) {
                best = Some((score, pattern));
            }
        }

        let Some((score, pattern)) = best else {
            continue;
        };

        let tokens = capture_tokens(entry);
        let states = capture_states(entry);
        let variant = infer_variant(pattern.kind, &tokens);
        pre.push(PreInstance {
            kind: pattern.kind,
            variant,
            confidence: score,
            selector: entry.selector.clone(),
            tag: entry.tag_name.clone(),
            role: entry.role.clone(),
            tokens,
            states,
        });
    }

    let matched = pre.len();
    let mut components = merge_instances(pre);
    apply_cross_validation(&mut components);
    flag_outliers(&mut components.merged);

    let mut instances = components.merged;
    instances.sort_by(|a, b| {
        b.usage_count
            .cmp(&a.usage_count)
            .then_with(|| a.kind.cmp(&b.kind))
            .then_with(|| a.variant.cmp(&b.variant))
    });

    ComponentLibrary {
        components: instances,
        elements_scored: scored,
        elements_matched: matched,
    }
}

/// Merged instances plus the pre-merge data cross-validation needs.
struct MergedLibrary {
    merged: Vec<ComponentInstance>,
    /// Per merged instance: the captured tokens of every contributing
    /// element, for the consistency boost.
    cluster_tokens: Vec<Vec<ComponentTokens>>,
}

/// Group pre-instances by `(kind, variant-or-default)` and merge each
/// group: usage sums, selectors union, confidence is the rounded mean,
/// and the highest-confidence element donates tokens and states.
fn merge_instances(pre: Vec<PreInstance>) -> MergedLibrary {
    let mut groups: BTreeMap<(ComponentKind, String), Vec<PreInstance>> = BTreeMap::new();
    for instance in pre {
        let variant_key = instance.variant.clone().unwrap_or_else(|| "default".to_string());
        groups
            .entry((instance.kind, variant_key))
            .or_default()
            .push(instance);
    }

    let mut merged = Vec::new();
    let mut cluster_tokens = Vec::new();

    for ((kind, _), group) in groups {
        let usage_count = group.len() as u32;
        let mean = group.iter().map(|i| i.confidence).sum::<f64>() / f64::from(usage_count);
        let confidence = mean.round().clamp(0.0, 100.0) as u32;

        let mut selectors: Vec<String> = Vec::new();
        let mut tags: Vec<String> = Vec::new();
        let mut roles: Vec<String> = Vec::new();
        for instance in &group {
            if !selectors.contains(&instance.selector) {
                selectors.push(instance.selector.clone());
            }
            if !tags.contains(&instance.tag) {
                tags.push(instance.tag.clone());
            }
            if let Some(role) = &instance.role {
                if !roles.contains(role) {
                    roles.push(role.clone());
                }
            }
        }

        // Highest confidence donates the representative capture; ties
        // resolve to the earliest element.
        let representative = group
            .iter()
            .enumerate()
            .max_by(|(ia, a), (ib, b)| {
                a.confidence
                    .partial_cmp(&b.confidence)
                    .unwrap_or(std::cmp::Ordering::Equal)
                    .then_with(|| ib.cmp(ia))
            })
            .map(|(_, i)| i);
        let Some(representative) = representative else {
            continue;
        };

        let examples: Vec<String> = selectors.iter().take(MAX_EXAMPLES).cloned().collect();

        merged.push(ComponentInstance {
            kind,
            variant: representative.variant.clone(),
            confidence,
            confidence_level: ConfidenceLevel::from_confidence(confidence),
            usage_count,
            selectors,
            tokens: representative.tokens.clone(),
            states: representative.states.clone(),
            metadata: InstanceMetadata { tags, roles },
            examples,
            outlier: false,
        });
        cluster_tokens.push(group.into_iter().map(|i| i.tokens).collect());
    }

    MergedLibrary { merged, cluster_tokens }
}

/// Cross-element validation: clusters that repeat consistently earn
/// confidence boosts, clamped at 100.
fn apply_cross_validation(library: &mut MergedLibrary) {
    // Per-kind totals for the variant-family and significance boosts.
    let mut kind_totals: BTreeMap<ComponentKind, u32> = BTreeMap::new();
    let mut kind_clusters: BTreeMap<ComponentKind, u32> = BTreeMap::new();
    for instance in &library.merged {
        *kind_totals.entry(instance.kind).or_insert(0) += instance.usage_count;
        *kind_clusters.entry(instance.kind).or_insert(0) += 1;
    }

    for (instance, tokens) in library.merged.iter_mut().zip(&library.cluster_tokens) {
        let mut boost = 0.0f64;

        // Repetition: the same shape appearing again and again.
        boost += (f64::from(instance.usage_count) * 5.0).min(15.0);

        // Consistency across the defining properties, normalized to 0-10:
        // unanimous agreement earns full credit, two variants half.
        let mut consistency = 0.0f64;
        for property in CONSISTENCY_PROPS {
            let mut distinct: Vec<&str> = Vec::new();
            for captured in tokens {
                let value = captured.get(property).unwrap_or("");
                if !distinct.contains(&value) {
                    distinct.push(value);
                }
            }
            if distinct.len() <= 1 {
                consistency += 2.0;
            } else if distinct.len() == 2 {
                consistency += 1.0;
            }
        }
        boost += consistency;

        // A variant family (solid + outline + ghost buttons) is a system.
        if kind_clusters.get(&instance.kind).copied().unwrap_or(0) >= 2 {
            boost += 5.0;
        }

        // Statistical significance: this cluster dominates its type.
        let total = kind_totals.get(&instance.kind).copied().unwrap_or(0);
        if total > 0 && f64::from(instance.usage_count) / f64::from(total) >= 0.5 {
            boost += 5.0;
        }

        let boosted = (f64::from(instance.confidence) + boost).clamp(0.0, 100.0);
        instance.confidence = boosted.round() as u32;
        instance.confidence_level = ConfidenceLevel::from_confidence(instance.confidence);
    }
}

/// Flag instances sitting below 60% of their type's median confidence.
/// Requires at least three instances of the type; flagged instances are
/// kept.
fn flag_outliers(instances: &mut [ComponentInstance]) {
    let mut by_kind: BTreeMap<ComponentKind, Vec<u32>> = BTreeMap::new();
    for instance in instances.iter() {
        by_kind.entry(instance.kind).or_default().push(instance.confidence);
    }

    let mut medians: BTreeMap<ComponentKind, f64> = BTreeMap::new();
    for (kind, mut confidences) in by_kind {
        if confidences.len() < 3 {
            continue;
        }
        confidences.sort_unstable();
        let mid = confidences.len() / 2;
        let median = if confidences.len() % 2 == 0 {
            f64::from(confidences[mid - 1] + confidences[mid]) / 2.0
        } else {
            f64::from(confidences[mid])
        };
        let _ = medians.insert(kind, median);
    }

    for instance in instances.iter_mut() {
        if let Some(median) = medians.get(&instance.kind) {
            instance.outlier = f64::from(instance.confidence) < 0.6 * median;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::BTreeMap as Map;

    fn button(selector: &str) -> ComputedStyleEntry {
        let mut computed = Map::new();
        for (p, v) in [
            ("cursor", "pointer"),
            ("display", "inline-flex"),
            ("padding", "8px 16px"),
            ("border-radius", "6px"),
            ("background-color", "#0a84ff"),
            ("color", "#ffffff"),
            ("height", "36px"),
        ] {
            let _ = computed.insert(p.to_string(), v.to_string());
        }
        ComputedStyleEntry {
            selector: selector.to_string(),
            tag_name: "button".to_string(),
            role: Some("button".to_string()),
            computed_style: computed,
            ..ComputedStyleEntry::default()
        }
    }

    #[test]
    fn button_cluster_merges_and_boosts() {
        let entries = vec![button(".btn"), button(".btn.primary"), button(".cta")];
        let mut diag = Diagnostics::new();
        let library = detect_components(&entries, &mut diag);

        assert_eq!(library.components.len(), 1);
        let instance = &library.components[0];
        assert_eq!(instance.kind, ComponentKind::Button);
        assert_eq!(instance.variant.as_deref(), Some("solid"));
        assert_eq!(instance.usage_count, 3);
        assert_eq!(instance.selectors.len(), 3);
        // Repetition (15) + consistency (10) + significance (5) land the
        // cluster comfortably in the high band.
        assert!(instance.confidence >= 75, "confidence {}", instance.confidence);
        assert!(matches!(
            instance.confidence_level,
            ConfidenceLevel::High | ConfidenceLevel::VeryHigh
        ));
        assert!(!instance.outlier);
    }

    #[test]
    fn malformed_elements_are_dropped_with_diagnostics() {
        let entries = vec![ComputedStyleEntry::default(), button(".btn")];
        let mut diag = Diagnostics::new();
        let library = detect_components(&entries, &mut diag);
        assert_eq!(library.elements_scored, 1);
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn plain_text_matches_nothing() {
        let mut computed = Map::new();
        let _ = computed.insert("display".to_string(), "block".to_string());
        let entries = vec![ComputedStyleEntry {
            selector: "p.copy".to_string(),
            tag_name: "p".to_string(),
            computed_style: computed,
            ..ComputedStyleEntry::default()
        }];
        let mut diag = Diagnostics::new();
        let library = detect_components(&entries, &mut diag);
        assert!(library.components.is_empty());
        assert_eq!(library.elements_scored, 1);
        assert_eq!(library.elements_matched, 0);
    }

    #[test]
    fn confidence_levels_band_correctly() {
        assert_eq!(ConfidenceLevel::from_confidence(95), ConfidenceLevel::VeryHigh);
        assert_eq!(ConfidenceLevel::from_confidence(80), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_confidence(65), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_confidence(50), ConfidenceLevel::Low);
    }
}
