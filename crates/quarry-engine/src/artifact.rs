//! The analysis artifact: everything one run produces.

use std::collections::BTreeMap;

use serde::Serialize;

use quarry_common::Diagnostic;
use quarry_detect::ComponentLibrary;
use quarry_tokens::{CuratedTokenSet, RelationshipReport, W3cTokenSet};

use crate::layout::LayoutDna;
use crate::motion::MotionReport;
use crate::prompt_pack::PromptPack;
use crate::stacking::StackingReport;

/// Rollup numbers for one analysis.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    /// Total tokens in the W3C set.
    pub total_tokens: usize,
    /// Curated token counts per category label.
    pub by_category: BTreeMap<String, usize>,
    /// Mean curated confidence, 0-100 (0 when nothing survived).
    pub confidence: u32,
    /// Coarse quality band derived from volume and confidence.
    pub quality: &'static str,
}

impl AnalysisSummary {
    /// Compute the rollup from the outputs.
    #[must_use]
    pub fn compute(w3c: &W3cTokenSet, curated: &CuratedTokenSet) -> Self {
        let mut by_category = BTreeMap::new();
        let mut confidence_sum: u64 = 0;
        let mut confidence_count: u64 = 0;
        for (label, tokens) in curated.categories() {
            let _ = by_category.insert(label.to_string(), tokens.len());
            for token in tokens {
                confidence_sum += u64::from(token.confidence);
                confidence_count += 1;
            }
        }
        let confidence = if confidence_count == 0 {
            0
        } else {
            (confidence_sum / confidence_count) as u32
        };

        let curated_total = curated.total();
        let quality = if curated_total >= 40 && confidence >= 80 {
            "excellent"
        } else if curated_total >= 15 && confidence >= 70 {
            "good"
        } else if curated_total >= 5 {
            "fair"
        } else {
            "sparse"
        };

        Self {
            total_tokens: w3c.total(),
            by_category,
            confidence,
            quality,
        }
    }
}

/// The full output of [`crate::analyze`].
#[derive(Debug, Serialize)]
pub struct AnalysisArtifact {
    /// The W3C-format token set.
    pub w3c_token_set: W3cTokenSet,
    /// The curated (deduplicated, filtered, ranked) tokens.
    pub curated_tokens: CuratedTokenSet,
    /// Shade ladders, scales, grids, palettes.
    pub relationships: RelationshipReport,
    /// Breakpoints, containers, grid system, spacing base.
    pub layout_dna: LayoutDna,
    /// Z-index stacking layers.
    pub stacking: StackingReport,
    /// Durations and easings.
    pub motion: MotionReport,
    /// Detected components; absent when no computed styles were supplied
    /// (or detection was disabled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_library: Option<ComponentLibrary>,
    /// The bounded AI-consumable summary.
    pub prompt_pack: PromptPack,
    /// Rollup numbers.
    pub summary: AnalysisSummary,
    /// Structured events recorded along the way; always present.
    pub diagnostics: Vec<Diagnostic>,
}
