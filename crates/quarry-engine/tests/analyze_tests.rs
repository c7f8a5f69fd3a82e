//! End-to-end tests for the analysis pipeline.

use std::collections::BTreeMap;

use quarry_common::{AnalyzeError, CancelFlag, DiagnosticKind, Options};
use quarry_detect::ComputedStyleEntry;
use quarry_engine::{analyze, analyze_with_cancel, AnalysisArtifact, ScanBundle};

fn bundle(css: &[&str]) -> ScanBundle {
    ScanBundle::from_css("example.com", "https://example.com", css)
}

fn lenient() -> Options {
    Options {
        min_usage: 1,
        ..Options::default()
    }
}

fn run(css: &[&str], options: &Options) -> AnalysisArtifact {
    analyze(&bundle(css), options).expect("analysis succeeds")
}

#[test]
fn single_low_usage_color_is_dropped_by_default_thresholds() {
    // One sighting falls below the default min_usage of 2.
    let artifact = run(&[".a{color:#ff0000}"], &Options::default());
    assert!(artifact.curated_tokens.colors.is_empty());

    // With min_usage 1 it survives with full share.
    let artifact = run(&[".a{color:#ff0000}"], &lenient());
    assert_eq!(artifact.curated_tokens.colors.len(), 1);
    let token = &artifact.curated_tokens.colors[0];
    assert_eq!(token.name, "red-base-1");
    assert_eq!(token.value, "#ff0000");
    assert_eq!(token.usage, 1);
    assert_eq!(token.percentage, 100);
}

#[test]
fn near_duplicate_colors_merge() {
    let artifact = run(
        &[".a{color:#336699} .b{color:#336699} .c{color:#336698}"],
        &lenient(),
    );
    assert_eq!(artifact.curated_tokens.colors.len(), 1);
    assert_eq!(artifact.curated_tokens.colors[0].usage, 3);
}

#[test]
fn unit_equivalent_spacing_merges_preferring_rem() {
    let artifact = run(
        &[".a{padding:16px} .b{padding:1rem} .c{padding:16px}"],
        &lenient(),
    );
    assert_eq!(artifact.curated_tokens.spacing.len(), 1);
    let token = &artifact.curated_tokens.spacing[0];
    assert_eq!(token.usage, 3);
    assert_eq!(token.value, "1rem");
    match token.preview {
        quarry_tokens::TokenPreview::Dimension { px } => assert_eq!(px, Some(16.0)),
        ref other => panic!("expected dimension preview, got {other:?}"),
    }
}

#[test]
fn variable_references_resolve_and_credit_usage() {
    let artifact = run(
        &[":root{--brand:#0a84ff} .btn{background:var(--brand)} .alt{color:var(--brand)}"],
        &lenient(),
    );
    assert_eq!(artifact.curated_tokens.colors.len(), 1);
    assert_eq!(artifact.curated_tokens.colors[0].usage, 2);

    // The W3C token carries both resolved source properties.
    let token = artifact
        .w3c_token_set
        .color
        .values()
        .next()
        .expect("one color token");
    assert_eq!(token.extensions.usage, 2);
    assert!(token.extensions.sources.contains(&"background-color".to_string()));
    assert!(token.extensions.sources.contains(&"color".to_string()));
}

fn button_entry(selector: &str) -> ComputedStyleEntry {
    let mut computed = BTreeMap::new();
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
fn button_cluster_detects_with_high_confidence() {
    let mut scan = bundle(&[".btn{background:#0a84ff;color:#fff}"]);
    scan.computed_styles = vec![
        button_entry(".btn"),
        button_entry(".btn.primary"),
        button_entry(".cta"),
    ];

    let artifact = analyze(&scan, &lenient()).expect("analysis succeeds");
    let library = artifact.component_library.expect("library present");
    assert_eq!(library.components.len(), 1);

    let instance = &library.components[0];
    assert_eq!(instance.kind.to_string(), "button");
    assert_eq!(instance.variant.as_deref(), Some("solid"));
    assert_eq!(instance.usage_count, 3);
    assert!(instance.confidence >= 75, "confidence {}", instance.confidence);
}

#[test]
fn css_only_bundle_has_no_component_library() {
    let artifact = run(&[".a{color:#ff0000;padding:8px}"], &lenient());
    assert!(artifact.component_library.is_none());
    assert!(!artifact.curated_tokens.colors.is_empty());
    // The prompt pack falls back to the default archetype list.
    assert_eq!(artifact.prompt_pack.patterns.component_archetypes.len(), 5);
}

#[test]
fn invalid_input_errors() {
    let empty_domain = ScanBundle {
        domain: String::new(),
        ..bundle(&[".a{color:red}"])
    };
    assert!(matches!(
        analyze(&empty_domain, &Options::default()),
        Err(AnalyzeError::InvalidInput { .. })
    ));

    let no_sources = ScanBundle {
        css_sources: Vec::new(),
        ..bundle(&[])
    };
    assert!(matches!(
        analyze(&no_sources, &Options::default()),
        Err(AnalyzeError::InvalidInput { .. })
    ));
}

#[test]
fn all_sources_unparseable_errors() {
    let result = analyze(&bundle(&["%%% not css", "@@@@ also not css"]), &Options::default());
    assert!(matches!(
        result,
        Err(AnalyzeError::NoParseableCss { source_count: 2 })
    ));
}

#[test]
fn one_bad_source_among_good_is_a_diagnostic() {
    let artifact = run(&["%%% not css", ".a{color:#ff0000;}"], &lenient());
    assert!(!artifact.curated_tokens.colors.is_empty());
    assert!(artifact
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::SourceParseFailed && d.source_index == Some(0)));
}

#[test]
fn empty_source_yields_zero_tokens_without_error() {
    let artifact = run(&[""], &Options::default());
    assert_eq!(artifact.summary.total_tokens, 0);
    assert_eq!(artifact.summary.quality, "sparse");
}

#[test]
fn variable_cycle_terminates_with_diagnostic() {
    let artifact = run(
        &[":root{--a:var(--b);--b:var(--c);--c:var(--a)} .x{color:var(--a)}"],
        &lenient(),
    );
    assert!(artifact
        .diagnostics
        .iter()
        .any(|d| d.kind == DiagnosticKind::VariableRecursionBounded));
}

#[test]
fn near_invisible_alpha_is_filtered() {
    let artifact = run(
        &[".a{color:rgba(0,0,0,0.005)} .b{color:rgba(0,0,0,0.005)}"],
        &lenient(),
    );
    assert!(artifact.curated_tokens.colors.is_empty());
}

#[test]
fn overprecise_dimension_is_filtered() {
    let artifact = run(
        &[".a{padding:0.123456px} .b{padding:0.123456px}"],
        &lenient(),
    );
    assert!(artifact.curated_tokens.spacing.is_empty());
}

#[test]
fn output_is_deterministic() {
    let css = &[
        ":root{--brand:#0a84ff;--radius-md:6px}",
        ".a{color:var(--brand);padding:16px 8px;border-radius:var(--radius-md)}",
        "@media (min-width: 768px){.a{padding:24px}}",
        ".b{box-shadow:0 1px 2px rgba(0,0,0,0.2);transition:all 0.2s ease}",
    ];
    let first = serde_json::to_string(&run(css, &lenient())).expect("serialize");
    let second = serde_json::to_string(&run(css, &lenient())).expect("serialize");
    assert_eq!(first, second);
}

#[test]
fn reordering_independent_sources_keeps_curated_values() {
    let a = ".a{color:#336699;padding:8px}";
    let b = ".b{color:#993311;margin:16px}";

    let forward = run(&[a, b], &lenient());
    let reversed = run(&[b, a], &lenient());

    let values = |artifact: &AnalysisArtifact| {
        let mut v: Vec<String> = artifact
            .curated_tokens
            .colors
            .iter()
            .map(|t| t.value.clone())
            .collect();
        v.sort();
        v
    };
    assert_eq!(values(&forward), values(&reversed));
}

#[test]
fn variable_redefinition_follows_last_writer() {
    let artifact = run(
        &[
            ":root{--x:#ff0000}",
            ":root{--x:#00ff00}",
            ".a{color:var(--x)} .b{background-color:var(--x)}",
        ],
        &lenient(),
    );
    let hexes: Vec<&str> = artifact
        .curated_tokens
        .colors
        .iter()
        .map(|t| t.value.as_str())
        .collect();
    assert!(hexes.contains(&"#00ff00"), "curated colors: {hexes:?}");
    assert!(!hexes.contains(&"#ff0000"));
}

#[test]
fn reemitting_tokens_as_variables_is_a_fixpoint() {
    let css = &[
        ".a{color:#0a84ff} .b{color:#0a84ff} .c{color:#dc2626} .d{color:#dc2626}\
         .e{padding:16px} .f{padding:16px} .g{padding:8px} .h{padding:8px}",
    ];
    let first = run(css, &lenient());

    // Re-emit every curated token as a :root custom property.
    let mut synthetic = String::from(":root{");
    for (_, tokens) in first.curated_tokens.categories() {
        for token in tokens {
            synthetic.push_str(&format!("--{}:{};", token.name, token.value));
        }
    }
    synthetic.push('}');

    let second = run(&[&synthetic], &lenient());

    let keys = |artifact: &AnalysisArtifact| {
        let mut keys: Vec<String> = artifact
            .curated_tokens
            .colors
            .iter()
            .chain(&artifact.curated_tokens.spacing)
            .map(|t| t.value.clone())
            .collect();
        keys.sort();
        keys
    };
    assert_eq!(keys(&first), keys(&second));
}

#[test]
fn cancellation_is_observed() {
    let cancel = CancelFlag::new();
    cancel.cancel();
    let result = analyze_with_cancel(&bundle(&[".a{color:red}"]), &Options::default(), &cancel);
    assert!(matches!(result, Err(AnalyzeError::Cancelled { .. })));
}

#[test]
fn max_elements_samples_deterministically() {
    let mut scan = bundle(&[".btn{color:#fff}"]);
    scan.computed_styles = (0..100).map(|i| button_entry(&format!(".btn-{i}"))).collect();

    let opts = Options {
        max_elements: Some(10),
        ..lenient()
    };
    let artifact = analyze(&scan, &opts).expect("analysis succeeds");
    let library = artifact.component_library.expect("library present");
    assert!(library.elements_scored <= 10);
    assert!(library.elements_scored > 0);
}

#[test]
fn percentages_sum_to_about_100_per_category() {
    let artifact = run(
        &[".a{color:#111111} .b{color:#111111} .c{color:#ee5522} .d{color:#2255ee} .e{color:#2255ee} .f{color:#2255ee}"],
        &lenient(),
    );
    let sum: u32 = artifact
        .curated_tokens
        .colors
        .iter()
        .map(|t| t.percentage)
        .sum();
    assert!((99..=101).contains(&sum), "sum = {sum}");
}

#[test]
fn layout_breakpoints_and_prompt_pack_agree() {
    let artifact = run(
        &[
            ".container{max-width:1200px;padding:16px} \
             @media (min-width: 640px){.container{max-width:640px}} \
             @media (min-width: 1024px){.container{max-width:1024px}}",
        ],
        &lenient(),
    );
    assert_eq!(artifact.layout_dna.breakpoints, vec![640, 1024]);
    assert_eq!(artifact.prompt_pack.layout.breakpoints, vec![640, 1024]);
    assert_eq!(artifact.prompt_pack.meta.base_unit, artifact.layout_dna.spacing_base.unwrap_or(4));
}

#[test]
fn prompt_pack_stays_under_the_hard_cap() {
    // A wide spread of values to fatten every section.
    let mut css = String::new();
    for i in 0..200 {
        css.push_str(&format!(
            ".c{i}{{color:rgb({}, {}, {});padding:{}px;font-size:{}px}}",
            (i * 7) % 256,
            (i * 31) % 256,
            (i * 83) % 256,
            i % 64,
            10 + (i % 30),
        ));
    }
    let artifact = run(&[&css], &lenient());
    let serialized = serde_json::to_string(&artifact.prompt_pack).expect("serialize");
    assert!(serialized.len() <= quarry_engine::prompt_pack::HARD_CAP_BYTES);
}

#[test]
fn w3c_token_components_are_in_range() {
    let artifact = run(
        &[".a{color:#ff0000} .a{color:#ff0000} .b{background-color:rgba(10, 132, 255, 0.5)} .c{background-color:rgba(10, 132, 255, 0.5)}"],
        &lenient(),
    );
    for token in artifact.w3c_token_set.color.values() {
        match &token.value {
            quarry_tokens::w3c::W3cValue::Color { components, alpha, .. } => {
                for c in components {
                    assert!((0.0..=1.0).contains(c));
                }
                if let Some(a) = alpha {
                    assert!((0.0..=1.0).contains(a));
                }
            }
            other => panic!("expected color value, got {other:?}"),
        }
        assert!(token.extensions.usage >= 1);
    }
}
