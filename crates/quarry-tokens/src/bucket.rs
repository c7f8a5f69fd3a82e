//! Aggregation buckets.
//!
//! During extraction every observed value lands in a [`RawTokenBucket`]
//! keyed by `(category, canonical value key)`. The bucket accumulates
//! usage and provenance; emission and curation later rank and name the
//! buckets.

use std::collections::BTreeSet;

use serde::Serialize;

use quarry_values::{Dimension, Rgba, Shadow};

/// How many provenance selectors a bucket retains.
pub const MAX_BUCKET_SELECTORS: usize = 10;

/// The canonical (normalized) value a bucket aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CanonicalValue {
    /// A concrete sRGB color.
    Color(Rgba),
    /// A dimension with its authored unit.
    Dimension(Dimension),
    /// A font family stack, quotes stripped, authored order.
    FontFamily(Vec<String>),
    /// A font weight, 100-900.
    FontWeight(u32),
    /// A single-layer shadow.
    Shadow(Box<Shadow>),
    /// A duration in integer milliseconds.
    DurationMs(u64),
}

impl CanonicalValue {
    /// The deterministic identity key used for aggregation and dedup.
    ///
    /// - color: JSON array of 0-1 sRGB components rounded to 3 decimals
    /// - dimension: `"{value}{unit}"`
    /// - shadow: canonical JSON shape
    /// - duration: `"{ms}ms"`
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::Color(rgba) => rgba.canonical_key(),
            Self::Dimension(dim) => dim.canonical_key(),
            Self::FontFamily(stack) => stack
                .first()
                .map(|f| f.to_ascii_lowercase())
                .unwrap_or_default(),
            Self::FontWeight(w) => w.to_string(),
            Self::Shadow(shadow) => shadow.canonical_key(),
            Self::DurationMs(ms) => format!("{ms}ms"),
        }
    }
}

/// One aggregated value: canonical form plus usage and provenance.
#[derive(Debug, Clone, Serialize)]
pub struct RawTokenBucket {
    /// How many declarations contributed this value.
    pub usage_count: u32,
    /// CSS properties the value appeared under.
    pub source_properties: BTreeSet<String>,
    /// Selectors the value appeared under, first
    /// [`MAX_BUCKET_SELECTORS`] retained.
    pub source_selectors: BTreeSet<String>,
    /// First-seen raw text, kept for previews.
    pub original_literal: String,
    /// The normalized value.
    pub canonical: CanonicalValue,
}

impl RawTokenBucket {
    /// Start a bucket from its first observation.
    #[must_use]
    pub fn new(canonical: CanonicalValue, literal: &str) -> Self {
        Self {
            usage_count: 0,
            source_properties: BTreeSet::new(),
            source_selectors: BTreeSet::new(),
            original_literal: literal.to_string(),
            canonical,
        }
    }

    /// Record one observation.
    pub fn observe(&mut self, property: &str, selectors: &[String]) {
        self.usage_count += 1;
        let _ = self.source_properties.insert(property.to_string());
        for selector in selectors {
            if self.source_selectors.len() >= MAX_BUCKET_SELECTORS {
                break;
            }
            let _ = self.source_selectors.insert(selector.clone());
        }
    }

    /// Fold another bucket into this one (dedup merges). Usage sums,
    /// provenance unions, the literal of the higher-usage side wins
    /// (callers merge into the primary).
    pub fn absorb(&mut self, other: &Self) {
        self.usage_count += other.usage_count;
        for p in &other.source_properties {
            let _ = self.source_properties.insert(p.clone());
        }
        for s in &other.source_selectors {
            if self.source_selectors.len() >= MAX_BUCKET_SELECTORS {
                break;
            }
            let _ = self.source_selectors.insert(s.clone());
        }
    }
}
