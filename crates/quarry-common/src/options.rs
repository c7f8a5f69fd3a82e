//! Engine configuration.
//!
//! Every tunable the pipeline consults is an explicit field here. The
//! engine holds no module-level defaults; construct [`Options`] (or take
//! `Options::default()`) and pass it to `analyze`.

use serde::{Deserialize, Serialize};

/// Per-category caps applied during curation when
/// [`Options::return_all_filtered`] is `false`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurationCaps {
    /// Maximum curated color tokens.
    pub max_colors: usize,
    /// Maximum curated font families.
    pub max_fonts: usize,
    /// Maximum curated font sizes.
    pub max_sizes: usize,
    /// Maximum curated spacing dimensions.
    pub max_spacing: usize,
    /// Maximum curated radius dimensions.
    pub max_radius: usize,
    /// Maximum curated shadows.
    pub max_shadows: usize,
    /// Maximum curated motion (duration) tokens.
    pub max_motion: usize,
}

impl Default for CurationCaps {
    fn default() -> Self {
        Self {
            max_colors: 24,
            max_fonts: 6,
            max_sizes: 12,
            max_spacing: 16,
            max_radius: 8,
            max_shadows: 8,
            max_motion: 8,
        }
    }
}

/// All engine tunables for one analysis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Options {
    /// Base font size in pixels for `rem`/`em` conversion everywhere.
    pub root_font_size_px: f64,
    /// Minimum usage count a token needs to survive curation.
    pub min_usage: u32,
    /// Minimum confidence (0-100) a token needs to survive curation.
    pub min_confidence: u32,
    /// When `false`, apply [`CurationCaps`] after filtering and ranking.
    pub return_all_filtered: bool,
    /// Caps used when `return_all_filtered` is `false`.
    pub caps: CurationCaps,
    /// Component detection toggle. `None` means auto: run the detector
    /// exactly when computed styles are present in the bundle.
    pub component_detection: Option<bool>,
    /// Upper bound on elements fed to the component detector. Excess
    /// elements are stride-sampled deterministically.
    pub max_elements: Option<usize>,
    /// Upper bound on CSS sources. Excess sources are truncated at the end.
    pub max_sources: Option<usize>,
    /// Use the legacy luminance-only OKLCH approximation instead of the
    /// correct sRGB to Oklab transform.
    pub approximate_oklch: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            root_font_size_px: 16.0,
            min_usage: 2,
            min_confidence: 60,
            return_all_filtered: true,
            caps: CurationCaps::default(),
            component_detection: None,
            max_elements: None,
            max_sources: None,
            approximate_oklch: false,
        }
    }
}

impl Options {
    /// Whether the component detector should run, given whether the bundle
    /// carries computed styles.
    #[must_use]
    pub fn detection_enabled(&self, has_computed_styles: bool) -> bool {
        self.component_detection.unwrap_or(has_computed_styles)
    }
}
