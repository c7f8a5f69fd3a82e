//! The orchestrator.

use rayon::prelude::*;

use quarry_common::{AnalyzeError, CancelFlag, Diagnostics, Options};
use quarry_css::{parse_source, vars, ParseOutcome, ParsedRule, VariableTable};
use quarry_detect::detect_components;
use quarry_tokens::{
    analyze_relationships, curate, extract, StreamDeclaration, TokenPreview, W3cMetadata,
    W3cSourceRef,
};
use quarry_values::{parse_color, ParsedColor};

use crate::artifact::{AnalysisArtifact, AnalysisSummary};
use crate::bundle::ScanBundle;
use crate::layout::inspect_layout;
use crate::motion::extract_motion;
use crate::prompt_pack::build_prompt_pack;
use crate::stacking::extract_stacking;

/// Run a full analysis without external cancellation.
///
/// # Errors
///
/// Returns [`AnalyzeError::InvalidInput`] for an unusable bundle and
/// [`AnalyzeError::NoParseableCss`] when every source fails to parse.
/// A zero-token analysis is a success.
pub fn analyze(bundle: &ScanBundle, options: &Options) -> Result<AnalysisArtifact, AnalyzeError> {
    analyze_with_cancel(bundle, options, &CancelFlag::new())
}

/// Run a full analysis, checking the cancellation flag between stages.
///
/// # Errors
///
/// As [`analyze`], plus [`AnalyzeError::Cancelled`] when the flag is
/// raised; partial results are discarded.
pub fn analyze_with_cancel(
    bundle: &ScanBundle,
    options: &Options,
    cancel: &CancelFlag,
) -> Result<AnalysisArtifact, AnalyzeError> {
    validate(bundle)?;
    let mut diagnostics = Diagnostics::new();

    // Stage 1: parse each source independently. Parallel per source,
    // joined back in source order so everything downstream is
    // deterministic.
    check(cancel, "parse")?;
    let sources = match options.max_sources {
        Some(max) => &bundle.css_sources[..bundle.css_sources.len().min(max)],
        None => &bundle.css_sources[..],
    };
    let outcomes: Vec<ParseOutcome> = sources
        .par_iter()
        .map(|source| parse_source(&source.content, options.root_font_size_px))
        .collect();

    let mut failed = 0usize;
    for (index, (source, outcome)) in sources.iter().zip(&outcomes).enumerate() {
        if outcome.failed(&source.content) {
            failed += 1;
            diagnostics.source_failed(index, format!("no parseable rules in {}", source.url));
        }
    }
    if failed == sources.len() && !sources.is_empty() {
        return Err(AnalyzeError::NoParseableCss {
            source_count: sources.len(),
        });
    }

    // Stage 2: the custom-property table, last writer wins across
    // sources in order.
    check(cancel, "variables")?;
    let all_rules: Vec<&ParsedRule> = outcomes.iter().flat_map(|o| o.rules.iter()).collect();
    let variables = VariableTable::from_rules(all_rules.iter().copied());
    let var_references = vars::count_references(
        all_rules
            .iter()
            .flat_map(|r| r.declarations.iter().map(|d| d.value.as_str())),
    );

    // Stage 3: the resolved declaration stream and token aggregation.
    check(cancel, "extract")?;
    let mut stream: Vec<StreamDeclaration> = Vec::new();
    for (source_index, outcome) in outcomes.iter().enumerate() {
        for rule in &outcome.rules {
            for decl in &rule.declarations {
                if decl.property.starts_with("--") {
                    continue;
                }
                let value = if decl.value.contains("var(") {
                    variables.resolve(&decl.value, &mut diagnostics)
                } else {
                    decl.value.clone()
                };
                stream.push(StreamDeclaration {
                    property: decl.property.clone(),
                    value,
                    selectors: rule.selectors.clone(),
                    source_index,
                });
            }
        }
    }
    let aggregation = extract(&stream, &variables, &var_references, &mut diagnostics);

    // Stage 4: emission, curation, relationships.
    check(cancel, "curate")?;
    let metadata = W3cMetadata {
        domain: bundle.domain.clone(),
        url: bundle.url.clone(),
        css_sources: sources
            .iter()
            .map(|s| W3cSourceRef {
                url: s.url.clone(),
                sha: s.sha.clone(),
                bytes: s.bytes,
            })
            .collect(),
    };
    let w3c_token_set =
        quarry_tokens::w3c::emit(&aggregation, metadata, options.root_font_size_px);
    let curated_tokens = curate(&aggregation, options);
    verify_curated(&curated_tokens)?;

    let relationship_names: Vec<String> = variables
        .iter()
        .map(|(name, _)| name.trim_start_matches("--").to_string())
        .chain(
            curated_tokens
                .categories()
                .into_iter()
                .flat_map(|(_, tokens)| tokens.iter().map(|t| t.name.clone())),
        )
        .collect();
    let spacing_px = preview_px(&curated_tokens.spacing);
    let font_size_px = preview_px(&curated_tokens.font_sizes);
    let color_hsl: Vec<(String, quarry_values::Hsl)> = curated_tokens
        .colors
        .iter()
        .filter_map(|token| match parse_color(&token.value) {
            Some(ParsedColor::Concrete(rgba)) => Some((token.name.clone(), rgba.to_hsl())),
            _ => None,
        })
        .collect();
    let relationships =
        analyze_relationships(&relationship_names, &font_size_px, &spacing_px, &color_hsl);

    // Stage 5: layout, stacking, motion.
    check(cancel, "layout")?;
    let owned_rules: Vec<ParsedRule> = all_rules.into_iter().cloned().collect();
    let layout_dna = inspect_layout(&owned_rules, options.root_font_size_px);
    let stacking = extract_stacking(&owned_rules);
    let motion = extract_motion(&owned_rules);

    // Stage 6: component detection, only with computed styles in hand.
    check(cancel, "detect")?;
    let component_library = if options.detection_enabled(!bundle.computed_styles.is_empty())
        && !bundle.computed_styles.is_empty()
    {
        let sampled = sample_elements(&bundle.computed_styles, options.max_elements);
        Some(detect_components(&sampled, &mut diagnostics))
    } else {
        None
    };

    // Stage 7: prompt pack and summary.
    check(cancel, "summarize")?;
    let prompt_pack = build_prompt_pack(
        &curated_tokens,
        &layout_dna,
        &motion,
        component_library.as_ref(),
        &bundle.domain,
    );
    let summary = AnalysisSummary::compute(&w3c_token_set, &curated_tokens);

    Ok(AnalysisArtifact {
        w3c_token_set,
        curated_tokens,
        relationships,
        layout_dna,
        stacking,
        motion,
        component_library,
        prompt_pack,
        summary,
        diagnostics: diagnostics.into_events(),
    })
}

fn validate(bundle: &ScanBundle) -> Result<(), AnalyzeError> {
    if bundle.domain.trim().is_empty() {
        return Err(AnalyzeError::InvalidInput {
            reason: "domain is empty".to_string(),
        });
    }
    if bundle.url.trim().is_empty() {
        return Err(AnalyzeError::InvalidInput {
            reason: "url is empty".to_string(),
        });
    }
    if bundle.css_sources.is_empty() {
        return Err(AnalyzeError::InvalidInput {
            reason: "no CSS sources supplied".to_string(),
        });
    }
    Ok(())
}

/// Post-curation contract check: names unique per category, confidence
/// in range. A violation here is a bug in the engine, not in the input.
fn verify_curated(curated: &quarry_tokens::CuratedTokenSet) -> Result<(), AnalyzeError> {
    for (label, tokens) in curated.categories() {
        let mut names = std::collections::BTreeSet::new();
        for token in tokens {
            if !names.insert(token.name.as_str()) {
                return Err(AnalyzeError::InternalInvariant {
                    location: "curate",
                    detail: format!("duplicate token name '{}' in {label}", token.name),
                });
            }
            if token.confidence > 100 {
                return Err(AnalyzeError::InternalInvariant {
                    location: "curate",
                    detail: format!("confidence {} out of range for '{}'", token.confidence, token.name),
                });
            }
        }
    }
    Ok(())
}

fn check(cancel: &CancelFlag, stage: &'static str) -> Result<(), AnalyzeError> {
    if cancel.is_cancelled() {
        return Err(AnalyzeError::Cancelled { stage });
    }
    Ok(())
}

/// Deterministic stride sampling: every nth element so the sample spans
/// the whole capture without randomness.
fn sample_elements(
    elements: &[quarry_detect::ComputedStyleEntry],
    max: Option<usize>,
) -> Vec<quarry_detect::ComputedStyleEntry> {
    match max {
        Some(max) if max > 0 && elements.len() > max => {
            let stride = elements.len().div_ceil(max);
            elements.iter().step_by(stride).cloned().collect()
        }
        _ => elements.to_vec(),
    }
}

fn preview_px(tokens: &[quarry_tokens::CuratedToken]) -> Vec<f64> {
    tokens
        .iter()
        .filter_map(|t| match t.preview {
            TokenPreview::Dimension { px } => px,
            _ => None,
        })
        .collect()
}
