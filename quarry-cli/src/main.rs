//! Quarry CLI
//!
//! Runs the analysis engine over a scan bundle and writes the artifact.

use std::fs;
use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use owo_colors::OwoColorize;

use quarry_common::Options;
use quarry_engine::{analyze, AnalysisArtifact, ScanBundle};

/// Quarry CLI - design token extraction and component detection
#[derive(Parser, Debug)]
#[command(name = "quarry-cli")]
#[command(author, version, about, long_about = None)]
#[command(after_help = r#"EXAMPLES:
    # Analyze a scan bundle and print the artifact JSON
    quarry-cli bundle.json

    # Read the bundle from stdin, write the artifact to a file
    cat bundle.json | quarry-cli - -o artifact.json

    # Analyze raw CSS files directly (a synthetic bundle is built)
    quarry-cli --css styles.css --css theme.css --domain example.com

    # Keep only heavily-used tokens and print the summary
    quarry-cli bundle.json --min-usage 5 --summary
"#)]
struct Cli {
    /// Path to a scan-bundle JSON file, or `-` for stdin
    #[arg(value_name = "BUNDLE", required_unless_present = "css")]
    bundle: Option<String>,

    /// Analyze raw CSS files instead of a bundle (repeatable)
    #[arg(long, value_name = "FILE", conflicts_with = "bundle")]
    css: Vec<PathBuf>,

    /// Domain recorded in the artifact when using --css
    #[arg(long, default_value = "localhost")]
    domain: String,

    /// Write the artifact JSON here instead of stdout
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print a colored one-screen summary to stderr
    #[arg(long)]
    summary: bool,

    /// Root font size in pixels for rem/em conversion
    #[arg(long, default_value = "16")]
    root_font_size: f64,

    /// Minimum usage count for curated tokens
    #[arg(long, default_value = "2")]
    min_usage: u32,

    /// Minimum confidence (0-100) for curated tokens
    #[arg(long, default_value = "60")]
    min_confidence: u32,

    /// Apply per-category caps instead of returning all filtered tokens
    #[arg(long)]
    capped: bool,

    /// Upper bound on elements fed to component detection
    #[arg(long, value_name = "N")]
    max_elements: Option<usize>,

    /// Pretty-print the artifact JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let bundle = load_bundle(&cli)?;
    let options = Options {
        root_font_size_px: cli.root_font_size,
        min_usage: cli.min_usage,
        min_confidence: cli.min_confidence,
        return_all_filtered: !cli.capped,
        max_elements: cli.max_elements,
        ..Options::default()
    };

    let artifact = analyze(&bundle, &options).map_err(|e| anyhow::anyhow!("{e}"))?;

    if cli.summary {
        print_summary(&artifact);
    }

    let json = if cli.pretty {
        serde_json::to_string_pretty(&artifact)?
    } else {
        serde_json::to_string(&artifact)?
    };

    match cli.output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("writing {}", path.display()))?;
            eprintln!("Artifact written to {}", path.display());
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn load_bundle(cli: &Cli) -> Result<ScanBundle> {
    if !cli.css.is_empty() {
        let mut contents = Vec::new();
        for path in &cli.css {
            let css = fs::read_to_string(path)
                .with_context(|| format!("reading {}", path.display()))?;
            contents.push(css);
        }
        let refs: Vec<&str> = contents.iter().map(String::as_str).collect();
        let url = format!("https://{}/", cli.domain);
        return Ok(ScanBundle::from_css(&cli.domain, &url, &refs));
    }

    let raw = match cli.bundle.as_deref() {
        Some("-") => {
            let mut buffer = String::new();
            let _ = std::io::stdin()
                .read_to_string(&mut buffer)
                .context("reading bundle from stdin")?;
            buffer
        }
        Some(path) => fs::read_to_string(path).with_context(|| format!("reading {path}"))?,
        None => anyhow::bail!("either a bundle path or --css must be provided"),
    };
    serde_json::from_str(&raw).context("parsing scan bundle JSON")
}

fn print_summary(artifact: &AnalysisArtifact) {
    eprintln!(
        "{} {} tokens extracted ({})",
        "Quarry:".bold(),
        artifact.summary.total_tokens.to_string().cyan(),
        artifact.summary.quality.green(),
    );
    for (category, count) in &artifact.summary.by_category {
        if *count > 0 {
            eprintln!("  {category}: {count}");
        }
    }
    if let Some(library) = &artifact.component_library {
        eprintln!(
            "{} {} component shape(s) across {} element(s)",
            "Components:".bold(),
            library.components.len().to_string().cyan(),
            library.elements_scored,
        );
        for instance in library.components.iter().take(8) {
            let variant = instance
                .variant
                .as_deref()
                .map(|v| format!(" ({v})"))
                .unwrap_or_default();
            eprintln!(
                "  {}{} x{} at {}%",
                instance.kind,
                variant,
                instance.usage_count,
                instance.confidence,
            );
        }
    }
    if !artifact.diagnostics.is_empty() {
        eprintln!(
            "{} {} event(s)",
            "Diagnostics:".yellow(),
            artifact.diagnostics.len()
        );
    }
}
