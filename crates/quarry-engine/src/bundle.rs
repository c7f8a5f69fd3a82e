//! The scan bundle: everything the crawler hands the engine.

use serde::{Deserialize, Serialize};

use quarry_detect::ComputedStyleEntry;

/// Where a CSS source came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SourceKind {
    /// A linked stylesheet.
    External,
    /// A `<style>` block (the URL is synthetic).
    Inline,
    /// Styles recovered from computed-style snapshots.
    Computed,
    /// Framework preflight/reset layers.
    Preflight,
}

/// One harvested CSS source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CssSource {
    /// Source kind.
    pub kind: SourceKind,
    /// Source URL.
    pub url: String,
    /// Raw CSS text.
    pub content: String,
    /// Caller-supplied content hash, carried verbatim and never verified.
    #[serde(default)]
    pub sha: String,
    /// Size in octets.
    #[serde(default)]
    pub bytes: u64,
}

/// The immutable input to one analysis run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanBundle {
    /// Bare host.
    pub domain: String,
    /// Page URL.
    pub url: String,
    /// Ordered CSS sources.
    pub css_sources: Vec<CssSource>,
    /// Computed-style snapshots; empty means component detection is
    /// skipped under auto mode.
    #[serde(default)]
    pub computed_styles: Vec<ComputedStyleEntry>,
}

impl ScanBundle {
    /// A minimal bundle around CSS strings, used by tests and the CLI's
    /// raw-CSS mode.
    #[must_use]
    pub fn from_css(domain: &str, url: &str, css: &[&str]) -> Self {
        Self {
            domain: domain.to_string(),
            url: url.to_string(),
            css_sources: css
                .iter()
                .enumerate()
                .map(|(i, content)| CssSource {
                    kind: SourceKind::Inline,
                    url: format!("inline:{i}"),
                    content: (*content).to_string(),
                    sha: String::new(),
                    bytes: content.len() as u64,
                })
                .collect(),
            computed_styles: Vec::new(),
        }
    }
}
