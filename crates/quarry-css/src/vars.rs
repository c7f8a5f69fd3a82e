//! Custom-property table and `var()` resolution.
//!
//! [CSS Custom Properties for Cascading Variables Level 1](https://www.w3.org/TR/css-variables-1/)
//!
//! The table is built from every declaration whose property starts with
//! `--`, across all sources in order; redefinitions favor the last writer.
//! Resolution substitutes textually: the first `var(--name[, fallback])`
//! occurrence is replaced by the table value (or the fallback literal) and
//! the result re-scanned, up to a fixed depth.
//!
//! [§ 2.3 Resolving Dependency Cycles](https://www.w3.org/TR/css-variables-1/#cycles)
//!
//! "If there is a cycle in the dependency graph, all the custom properties
//! in the cycle are invalid at computed-value time." The depth bound is a
//! pragmatic approximation of cycle detection: cycles are bounded, not
//! detected, and the partially-resolved string is retained.

use std::collections::BTreeMap;

use quarry_common::Diagnostics;

use crate::parser::ParsedRule;

/// Maximum substitution depth before a value is returned partially
/// resolved.
const MAX_SUBSTITUTION_DEPTH: u32 = 10;

/// The `--name` to raw-value mapping for one analysis run.
#[derive(Debug, Default, Clone)]
pub struct VariableTable {
    map: BTreeMap<String, String>,
}

impl VariableTable {
    /// Build the table from rules in source order. Later definitions of
    /// the same name overwrite earlier ones (last writer wins).
    #[must_use]
    pub fn from_rules<'a>(rules: impl IntoIterator<Item = &'a ParsedRule>) -> Self {
        let mut map = BTreeMap::new();
        for rule in rules {
            for decl in &rule.declarations {
                if decl.property.starts_with("--") {
                    let _ = map.insert(decl.property.clone(), decl.value.clone());
                }
            }
        }
        Self { map }
    }

    /// Number of defined custom properties.
    #[must_use]
    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// Whether no custom properties are defined.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Look up a raw (unresolved) definition.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map.get(name).map(String::as_str)
    }

    /// Iterate definitions in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Resolve every `var()` reference in `value`.
    ///
    /// Substitution replaces the first occurrence and re-scans, so nested
    /// and chained references resolve naturally. When the depth bound is
    /// hit with references remaining, the partially-resolved string is
    /// returned and a diagnostic recorded. A reference to an undefined
    /// name with no fallback stops resolution and leaves the reference in
    /// place.
    #[must_use]
    pub fn resolve(&self, value: &str, diagnostics: &mut Diagnostics) -> String {
        let mut current = value.to_string();
        let mut depth = 0u32;

        while let Some(reference) = find_var(&current) {
            if depth > MAX_SUBSTITUTION_DEPTH {
                diagnostics.variable_bounded(&reference.name);
                return current;
            }
            depth += 1;

            let replacement = match self.map.get(&reference.name) {
                Some(defined) => defined.clone(),
                None => match reference.fallback {
                    Some(fallback) => fallback,
                    // Invalid at computed-value time; retain the text.
                    None => return current,
                },
            };

            current.replace_range(reference.start..reference.end, &replacement);
        }

        current
    }
}

/// A located `var()` reference inside a value string.
struct VarReference {
    /// Byte offset of `var(`.
    start: usize,
    /// Byte offset one past the matching `)`.
    end: usize,
    /// The `--name` argument.
    name: String,
    /// The fallback text after the first top-level comma, trimmed.
    fallback: Option<String>,
}

/// Find the first `var(...)` occurrence, honoring nested parentheses.
fn find_var(value: &str) -> Option<VarReference> {
    let start = find_var_open(value)?;
    let args_start = start + "var(".len();

    let mut depth = 1usize;
    let mut comma: Option<usize> = None;
    let mut end = None;
    for (offset, c) in value[args_start..].char_indices() {
        let i = args_start + offset;
        match c {
            '(' => depth += 1,
            ')' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(i);
                    break;
                }
            }
            ',' if depth == 1 && comma.is_none() => comma = Some(i),
            _ => {}
        }
    }
    let end = end?;

    let name_end = comma.unwrap_or(end);
    let name = value[args_start..name_end].trim().to_string();
    if !name.starts_with("--") {
        return None;
    }
    let fallback = comma.map(|c| value[c + 1..end].trim().to_string());

    Some(VarReference {
        start,
        end: end + 1,
        name,
        fallback,
    })
}

/// Find `var(` as a whole word (not `--my-var(`, not `invar(`).
fn find_var_open(value: &str) -> Option<usize> {
    let bytes = value.as_bytes();
    let mut from = 0;
    while let Some(pos) = value[from..].find("var(") {
        let i = from + pos;
        let preceded_by_ident = i > 0
            && (bytes[i - 1].is_ascii_alphanumeric() || bytes[i - 1] == b'-' || bytes[i - 1] == b'_');
        if !preceded_by_ident {
            return Some(i);
        }
        from = i + 4;
    }
    None
}

/// Count `var(--name)` references per variable across declaration values.
/// Token extraction credits variable-only colors with this usage.
#[must_use]
pub fn count_references<'a>(
    values: impl IntoIterator<Item = &'a str>,
) -> BTreeMap<String, u32> {
    let mut counts: BTreeMap<String, u32> = BTreeMap::new();
    for value in values {
        let mut rest = value;
        loop {
            let mut consumed = false;
            if let Some(reference) = find_var(rest) {
                *counts.entry(reference.name.clone()).or_insert(0) += 1;
                // Continue scanning after the opener so nested references
                // inside fallbacks are counted too.
                let next = reference.start + "var(".len();
                if next <= rest.len() {
                    rest = &rest[next..];
                    consumed = true;
                }
            }
            if !consumed {
                break;
            }
        }
    }
    counts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_source;

    fn table(css: &str) -> VariableTable {
        let outcome = parse_source(css, 16.0);
        VariableTable::from_rules(&outcome.rules)
    }

    #[test]
    fn basic_lookup_and_resolution() {
        let vars = table(":root { --brand: #0a84ff; }");
        let mut diag = Diagnostics::new();
        assert_eq!(vars.resolve("var(--brand)", &mut diag), "#0a84ff");
        assert!(diag.is_empty());
    }

    #[test]
    fn last_writer_wins() {
        let vars = table(":root { --x: red; } .theme { --x: blue; }");
        assert_eq!(vars.get("--x"), Some("blue"));
    }

    #[test]
    fn fallback_used_when_undefined() {
        let vars = table(":root {}");
        let mut diag = Diagnostics::new();
        assert_eq!(vars.resolve("var(--missing, 4px)", &mut diag), "4px");
        // Fallbacks keep their internal commas.
        assert_eq!(
            vars.resolve("var(--missing, Arial, sans-serif)", &mut diag),
            "Arial, sans-serif"
        );
    }

    #[test]
    fn undefined_without_fallback_is_retained() {
        let vars = table(":root {}");
        let mut diag = Diagnostics::new();
        assert_eq!(vars.resolve("var(--missing)", &mut diag), "var(--missing)");
    }

    #[test]
    fn chained_references_resolve() {
        let vars = table(":root { --a: var(--b); --b: 8px; }");
        let mut diag = Diagnostics::new();
        assert_eq!(vars.resolve("var(--a)", &mut diag), "8px");
    }

    #[test]
    fn cycle_is_bounded_not_fatal() {
        let vars = table(":root { --a: var(--b); --b: var(--c); --c: var(--a); }");
        let mut diag = Diagnostics::new();
        let resolved = vars.resolve("var(--a)", &mut diag);
        // Depth ran out; the partial string still contains a reference.
        assert!(resolved.contains("var(--"));
        assert_eq!(diag.len(), 1);
    }

    #[test]
    fn nested_function_values_survive() {
        let vars = table(":root { --shadow-color: rgba(0, 0, 0, 0.2); }");
        let mut diag = Diagnostics::new();
        assert_eq!(
            vars.resolve("0 1px 2px var(--shadow-color)", &mut diag),
            "0 1px 2px rgba(0, 0, 0, 0.2)"
        );
    }

    #[test]
    fn reference_counting() {
        let counts = count_references([
            "var(--brand)",
            "1px solid var(--brand)",
            "var(--other, var(--brand))",
        ]);
        assert_eq!(counts.get("--brand"), Some(&3));
        assert_eq!(counts.get("--other"), Some(&1));
    }
}
