//! Layout inspection.
//!
//! Walks the parsed rule set for the page-level layout story: responsive
//! breakpoints, container sizing strategy, the layout system in use, and
//! the base unit the spacing values sit on.

use std::collections::BTreeMap;

use serde::Serialize;
use strum_macros::Display;

use quarry_css::{MediaContext, ParsedRule};
use quarry_values::parse_dimension;

/// How many container snapshots are retained.
const MAX_CONTAINERS: usize = 50;

/// Properties that make a rule a container snapshot.
const CONTAINER_PROPS: &[&str] = &[
    "max-width",
    "min-width",
    "grid-template-columns",
    "grid-template-rows",
    "gap",
    "grid-gap",
];

/// Container sizing strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ContainerStrategy {
    /// Percent/viewport widths, or no widths with breakpoints present.
    Fluid,
    /// Pixel widths stepped by breakpoints.
    Centered,
    /// Fixed pixel widths, no responsive stepping.
    Fixed,
}

/// The dominant layout system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Display)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum GridSystem {
    /// Flexbox only.
    Flex,
    /// CSS grid only.
    Grid,
    /// Both flex and grid in use.
    Mixed,
    /// Neither; floats/tables/blocks.
    Classic,
}

/// One container-defining rule.
#[derive(Debug, Clone, Serialize)]
pub struct ContainerSnapshot {
    /// Breakpoint context in pixels; absent for base styles.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub breakpoint_px: Option<u32>,
    /// The rule's selectors (already provenance-capped).
    pub selectors: Vec<String>,
    /// The container-defining declarations.
    pub fields: BTreeMap<String, String>,
}

/// The layout story of the page.
#[derive(Debug, Clone, Serialize)]
pub struct LayoutDna {
    /// Sorted unique `min-width` breakpoints in pixels.
    pub breakpoints: Vec<u32>,
    /// Container snapshots, capped at 50.
    pub containers: Vec<ContainerSnapshot>,
    /// Container sizing strategy.
    pub container_strategy: ContainerStrategy,
    /// Dominant layout system.
    pub grid_system: GridSystem,
    /// Base unit the spacing values sit on, when one is detectable.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spacing_base: Option<u32>,
}

/// Inspect the full rule set.
#[must_use]
pub fn inspect_layout(rules: &[ParsedRule], root_font_size_px: f64) -> LayoutDna {
    let breakpoints = collect_breakpoints(rules);
    let containers = collect_containers(rules);
    let container_strategy = container_strategy(&containers, &breakpoints);
    let grid_system = grid_system(rules);
    let spacing_base = spacing_base(rules, root_font_size_px);

    LayoutDna {
        breakpoints,
        containers,
        container_strategy,
        grid_system,
        spacing_base,
    }
}

fn collect_breakpoints(rules: &[ParsedRule]) -> Vec<u32> {
    let mut breakpoints: Vec<u32> = rules
        .iter()
        .filter_map(|rule| match rule.media {
            MediaContext::MinWidth(px) => Some(px),
            MediaContext::Base => None,
        })
        .collect();
    breakpoints.sort_unstable();
    breakpoints.dedup();
    breakpoints
}

fn collect_containers(rules: &[ParsedRule]) -> Vec<ContainerSnapshot> {
    let mut containers = Vec::new();
    for rule in rules {
        if containers.len() >= MAX_CONTAINERS {
            break;
        }
        let fields: BTreeMap<String, String> = rule
            .declarations
            .iter()
            .filter(|d| CONTAINER_PROPS.contains(&d.property.as_str()))
            .map(|d| (d.property.clone(), d.value.clone()))
            .collect();
        if fields.is_empty() {
            continue;
        }
        containers.push(ContainerSnapshot {
            breakpoint_px: match rule.media {
                MediaContext::MinWidth(px) => Some(px),
                MediaContext::Base => None,
            },
            selectors: rule.selectors.clone(),
            fields,
        });
    }
    containers
}

/// Strategy selection:
/// - no widths at all: fluid when breakpoints exist, fixed otherwise
/// - first width in `%`/`vw`: fluid
/// - pixel widths with breakpoints: centered
/// - anything else: fixed
fn container_strategy(
    containers: &[ContainerSnapshot],
    breakpoints: &[u32],
) -> ContainerStrategy {
    let first_width = containers.iter().find_map(|c| {
        c.fields
            .get("max-width")
            .or_else(|| c.fields.get("min-width"))
            .cloned()
    });

    let Some(width) = first_width else {
        return if breakpoints.is_empty() {
            ContainerStrategy::Fixed
        } else {
            ContainerStrategy::Fluid
        };
    };

    if width.contains('%') || width.contains("vw") {
        return ContainerStrategy::Fluid;
    }
    if width.contains("px") && !breakpoints.is_empty() {
        return ContainerStrategy::Centered;
    }
    ContainerStrategy::Fixed
}

fn grid_system(rules: &[ParsedRule]) -> GridSystem {
    let mut has_flex = false;
    let mut has_grid = false;
    for rule in rules {
        for decl in &rule.declarations {
            if decl.property == "display" {
                if decl.value.contains("flex") {
                    has_flex = true;
                }
                if decl.value.contains("grid") {
                    has_grid = true;
                }
            }
        }
    }
    match (has_flex, has_grid) {
        (true, true) => GridSystem::Mixed,
        (true, false) => GridSystem::Flex,
        (false, true) => GridSystem::Grid,
        (false, false) => GridSystem::Classic,
    }
}

/// The spacing base: GCD of the most frequent integral pixel magnitudes,
/// nudged onto {4, 8, 16} when it lands next to one.
fn spacing_base(rules: &[ParsedRule], root_font_size_px: f64) -> Option<u32> {
    let mut frequency: BTreeMap<u32, u32> = BTreeMap::new();
    for rule in rules {
        for decl in &rule.declarations {
            let is_spacing = decl.property.starts_with("margin")
                || decl.property.starts_with("padding")
                || decl.property.ends_with("gap");
            if !is_spacing {
                continue;
            }
            for part in decl.value.split_whitespace() {
                let Some(dim) = parse_dimension(part) else { continue };
                let Some(px) = dim.to_px(root_font_size_px) else { continue };
                if px <= 0.0 || (px.round() - px).abs() > 0.01 {
                    continue;
                }
                *frequency.entry(px.round() as u32).or_insert(0) += 1;
            }
        }
    }

    let mut ranked: Vec<(u32, u32)> = frequency.into_iter().collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    let top: Vec<u32> = ranked.iter().take(5).map(|(v, _)| *v).collect();
    if top.is_empty() {
        return None;
    }

    let gcd = top.iter().copied().reduce(gcd_u32).unwrap_or(0);
    if gcd == 0 {
        return None;
    }
    for canonical in [4u32, 8, 16] {
        if gcd.abs_diff(canonical) <= 1 {
            return Some(canonical);
        }
    }
    Some(gcd)
}

fn gcd_u32(a: u32, b: u32) -> u32 {
    if b == 0 { a } else { gcd_u32(b, a % b) }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quarry_css::parse_source;

    fn rules(css: &str) -> Vec<ParsedRule> {
        parse_source(css, 16.0).rules
    }

    #[test]
    fn breakpoints_sorted_unique() {
        let css = "@media (min-width: 1024px) { .a { gap: 8px } } \
                   @media (min-width: 640px) { .b { gap: 8px } } \
                   @media (min-width: 1024px) { .c { gap: 4px } }";
        let dna = inspect_layout(&rules(css), 16.0);
        assert_eq!(dna.breakpoints, vec![640, 1024]);
    }

    #[test]
    fn centered_strategy() {
        let css = ".container { max-width: 1200px } \
                   @media (min-width: 640px) { .container { max-width: 640px } }";
        let dna = inspect_layout(&rules(css), 16.0);
        assert_eq!(dna.container_strategy, ContainerStrategy::Centered);
        assert_eq!(dna.containers.len(), 2);
    }

    #[test]
    fn fluid_strategy_from_percent() {
        let css = ".wrap { max-width: 90% }";
        let dna = inspect_layout(&rules(css), 16.0);
        assert_eq!(dna.container_strategy, ContainerStrategy::Fluid);
    }

    #[test]
    fn grid_system_detection() {
        assert_eq!(
            inspect_layout(&rules(".a { display: flex }"), 16.0).grid_system,
            GridSystem::Flex
        );
        assert_eq!(
            inspect_layout(&rules(".a { display: flex } .b { display: grid }"), 16.0).grid_system,
            GridSystem::Mixed
        );
        assert_eq!(
            inspect_layout(&rules(".a { display: block }"), 16.0).grid_system,
            GridSystem::Classic
        );
    }

    #[test]
    fn spacing_base_gcd() {
        let css = ".a { padding: 8px 16px; margin: 24px } .b { gap: 8px; padding: 32px }";
        let dna = inspect_layout(&rules(css), 16.0);
        assert_eq!(dna.spacing_base, Some(8));
    }
}
