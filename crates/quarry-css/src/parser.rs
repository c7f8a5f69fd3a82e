//! CSS rule parser.
//!
//! [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing)
//!
//! "The input to the parsing stage is a stream of tokens from the
//! tokenization stage." This parser is tolerant: a malformed construct is
//! skipped with local recovery (scan to the next `;` or block edge), never
//! fatal for the source. `@media` blocks are entered recursively and their
//! `(min-width: …)` prelude becomes the context every inner declaration
//! carries.

use serde::Serialize;

use crate::tokenizer::{Spanned, Token, Tokenizer, Tokens};

/// How many provenance selectors a rule retains.
const MAX_SELECTORS: usize = 4;

/// The media context a rule was found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case", tag = "context", content = "px")]
pub enum MediaContext {
    /// Not inside any media query.
    Base,
    /// Inside `@media (min-width: Npx)`; the value is pixels.
    MinWidth(u32),
}

/// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
///
/// A declaration: lowercased property, authored value text, importance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    /// Property name, lowercased.
    pub property: String,
    /// Value exactly as authored, whitespace-trimmed, `!important` removed.
    pub value: String,
    /// Whether the declaration carried `!important`.
    pub important: bool,
}

/// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
///
/// A style rule: selectors (capped for provenance), declarations, and the
/// media context it appeared under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParsedRule {
    /// Selector list, split on top-level commas, trimmed, first
    /// [`MAX_SELECTORS`] retained.
    pub selectors: Vec<String>,
    /// Declarations in authored order.
    pub declarations: Vec<Declaration>,
    /// Enclosing media context.
    pub media: MediaContext,
}

/// What one source parsed into.
#[derive(Debug, Default)]
pub struct ParseOutcome {
    /// Style rules in document order (media blocks flattened).
    pub rules: Vec<ParsedRule>,
    /// At-rules encountered (used to tell "nothing parseable" from
    /// "nothing but at-rules we skip").
    pub at_rule_count: usize,
}

impl ParseOutcome {
    /// Whether this source should count as a parse failure: non-blank
    /// input that produced neither rules nor at-rules.
    #[must_use]
    pub fn failed(&self, content: &str) -> bool {
        self.rules.is_empty() && self.at_rule_count == 0 && !content.trim().is_empty()
    }
}

/// Parse one CSS source. `root_font_size_px` resolves `rem`/`em`
/// breakpoint preludes to pixels.
#[must_use]
pub fn parse_source(content: &str, root_font_size_px: f64) -> ParseOutcome {
    let tokens = Tokenizer::new(content).run();
    let mut parser = Parser {
        tokens: &tokens,
        position: 0,
        root_font_size_px,
        outcome: ParseOutcome::default(),
    };
    parser.consume_rule_list(MediaContext::Base, true);
    parser.outcome
}

struct Parser<'a> {
    tokens: &'a Tokens,
    position: usize,
    root_font_size_px: f64,
    outcome: ParseOutcome,
}

impl Parser<'_> {
    /// [§ 5.4.1 Consume a list of rules](https://www.w3.org/TR/css-syntax-3/#consume-list-of-rules)
    fn consume_rule_list(&mut self, media: MediaContext, top_level: bool) {
        loop {
            match self.peek() {
                None | Some(Token::Eof) => return,
                Some(Token::RightBrace) if !top_level => {
                    // Caller consumes the closing brace.
                    return;
                }
                Some(Token::Whitespace) => {
                    let _ = self.consume();
                }
                // "<CDO-token> <CDC-token>: If the top-level flag is set,
                // do nothing."
                Some(Token::Cdo | Token::Cdc) => {
                    let _ = self.consume();
                }
                Some(Token::AtKeyword(_)) => self.consume_at_rule(media),
                Some(_) => self.consume_qualified_rule(media),
            }
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    ///
    /// `@media` and `@supports` blocks are entered; every other at-rule's
    /// block is skipped wholesale (keyframe frames would pollute the
    /// token stream with animation-interpolation values).
    fn consume_at_rule(&mut self, media: MediaContext) {
        let name = match self.consume() {
            Some(Spanned { token: Token::AtKeyword(name), .. }) => name.clone(),
            _ => return,
        };
        self.outcome.at_rule_count += 1;

        // Collect the prelude up to `{` or `;`.
        let mut prelude: Vec<Spanned> = Vec::new();
        loop {
            match self.peek() {
                None | Some(Token::Eof) => return,
                Some(Token::Semicolon) => {
                    let _ = self.consume();
                    return;
                }
                Some(Token::LeftBrace) => {
                    let _ = self.consume();
                    break;
                }
                Some(_) => {
                    if let Some(spanned) = self.consume() {
                        prelude.push(spanned.clone());
                    }
                }
            }
        }

        match name.to_ascii_lowercase().as_str() {
            "media" => {
                let inner = self
                    .min_width_from_prelude(&prelude)
                    .map_or(media, MediaContext::MinWidth);
                self.consume_rule_list(inner, false);
                self.expect_right_brace();
            }
            // Conditional group rules contain ordinary style rules.
            "supports" | "layer" | "container" => {
                self.consume_rule_list(media, false);
                self.expect_right_brace();
            }
            _ => self.skip_block(),
        }
    }

    /// Scan an `@media` prelude for `(min-width: N)`.
    ///
    /// Pixel values pass through; `rem`/`em` convert at the root font
    /// size; anything else (max-width-only queries, ranges we do not
    /// model) yields `None` and the enclosing context is kept.
    fn min_width_from_prelude(&self, prelude: &[Spanned]) -> Option<u32> {
        let mut i = 0;
        while i < prelude.len() {
            if let Token::Ident(ident) = &prelude[i].token {
                if ident.eq_ignore_ascii_case("min-width") {
                    // Skip whitespace and the colon.
                    let mut j = i + 1;
                    while matches!(
                        prelude.get(j).map(|s| &s.token),
                        Some(Token::Whitespace | Token::Colon)
                    ) {
                        j += 1;
                    }
                    let px = match prelude.get(j).map(|s| &s.token) {
                        Some(Token::Dimension { value, unit }) => {
                            match unit.to_ascii_lowercase().as_str() {
                                "px" => Some(*value),
                                "rem" | "em" => Some(value * self.root_font_size_px),
                                _ => None,
                            }
                        }
                        Some(Token::Number { value }) => Some(*value),
                        _ => None,
                    };
                    if let Some(px) = px {
                        if px.is_finite() && px >= 0.0 {
                            return Some(px.round() as u32);
                        }
                    }
                }
            }
            i += 1;
        }
        None
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self, media: MediaContext) {
        let prelude_start = self.peek_span_start();
        let mut prelude_end = prelude_start;
        let mut depth = 0usize;

        loop {
            match self.peek() {
                // "<EOF-token>: This is a parse error. Return nothing."
                None | Some(Token::Eof) => return,
                Some(Token::LeftBrace) if depth == 0 => {
                    let _ = self.consume();
                    break;
                }
                Some(Token::LeftParen | Token::LeftBracket) => {
                    depth += 1;
                    prelude_end = self.consume_span_end();
                }
                Some(Token::RightParen | Token::RightBracket) => {
                    depth = depth.saturating_sub(1);
                    prelude_end = self.consume_span_end();
                }
                Some(_) => {
                    prelude_end = self.consume_span_end();
                }
            }
        }

        let selector_text = self.tokens.text(prelude_start, prelude_end);
        let selectors = split_selector_list(&selector_text);
        let declarations = self.consume_declaration_list();
        self.expect_right_brace();

        if !selectors.is_empty() && !declarations.is_empty() {
            self.outcome.rules.push(ParsedRule {
                selectors,
                declarations,
                media,
            });
        }
    }

    /// [§ 5.4.5 Consume a list of declarations](https://www.w3.org/TR/css-syntax-3/#consume-list-of-declarations)
    fn consume_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            match self.peek() {
                None | Some(Token::Eof) | Some(Token::RightBrace) => return declarations,
                Some(Token::Whitespace | Token::Semicolon) => {
                    let _ = self.consume();
                }
                // Nested at-rules inside declaration blocks are skipped.
                Some(Token::AtKeyword(_)) => {
                    let _ = self.consume();
                    self.recover_declaration();
                }
                Some(Token::Ident(_)) => {
                    if let Some(decl) = self.consume_declaration() {
                        declarations.push(decl);
                    }
                }
                // "anything else: This is a parse error." Discard
                // component values until the next semicolon.
                Some(_) => {
                    let _ = self.consume();
                    self.recover_declaration();
                }
            }
        }
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self) -> Option<Declaration> {
        let property = match self.consume() {
            Some(Spanned { token: Token::Ident(name), .. }) => name.to_ascii_lowercase(),
            _ => return None,
        };

        while matches!(self.peek(), Some(Token::Whitespace)) {
            let _ = self.consume();
        }
        // "If the next input token is anything other than a
        // <colon-token>, this is a parse error."
        if !matches!(self.peek(), Some(Token::Colon)) {
            self.recover_declaration();
            return None;
        }
        let _ = self.consume();
        while matches!(self.peek(), Some(Token::Whitespace)) {
            let _ = self.consume();
        }

        let value_start = self.peek_span_start();
        let mut value_end = value_start;
        let mut depth = 0usize;
        let mut saw_bad_token = false;

        loop {
            match self.peek() {
                None | Some(Token::Eof) => break,
                Some(Token::Semicolon) if depth == 0 => break,
                Some(Token::RightBrace) if depth == 0 => break,
                Some(Token::BadString | Token::BadUrl) => {
                    saw_bad_token = true;
                    value_end = self.consume_span_end();
                }
                Some(Token::LeftBrace | Token::LeftParen | Token::LeftBracket) => {
                    depth += 1;
                    value_end = self.consume_span_end();
                }
                Some(Token::RightBrace | Token::RightParen | Token::RightBracket) => {
                    depth = depth.saturating_sub(1);
                    value_end = self.consume_span_end();
                }
                Some(_) => {
                    value_end = self.consume_span_end();
                }
            }
        }

        if saw_bad_token {
            return None;
        }

        let raw = self.tokens.text(value_start, value_end);
        if raw.is_empty() {
            return None;
        }
        let (value, important) = strip_important(&raw);
        if value.is_empty() {
            return None;
        }

        Some(Declaration {
            property,
            value,
            important,
        })
    }

    /// Error recovery: discard tokens until the next top-level `;` or the
    /// end of the enclosing block.
    fn recover_declaration(&mut self) {
        let mut depth = 0usize;
        loop {
            match self.peek() {
                None | Some(Token::Eof) => return,
                Some(Token::Semicolon) if depth == 0 => {
                    let _ = self.consume();
                    return;
                }
                Some(Token::RightBrace) if depth == 0 => return,
                Some(Token::LeftBrace | Token::LeftParen | Token::LeftBracket) => {
                    depth += 1;
                    let _ = self.consume();
                }
                Some(Token::RightBrace | Token::RightParen | Token::RightBracket) => {
                    depth = depth.saturating_sub(1);
                    let _ = self.consume();
                }
                Some(_) => {
                    let _ = self.consume();
                }
            }
        }
    }

    /// Skip a block whose `{` has already been consumed, tracking nesting.
    fn skip_block(&mut self) {
        let mut depth = 1usize;
        loop {
            match self.peek() {
                None | Some(Token::Eof) => return,
                Some(Token::LeftBrace) => {
                    depth += 1;
                    let _ = self.consume();
                }
                Some(Token::RightBrace) => {
                    depth -= 1;
                    let _ = self.consume();
                    if depth == 0 {
                        return;
                    }
                }
                Some(_) => {
                    let _ = self.consume();
                }
            }
        }
    }

    fn expect_right_brace(&mut self) {
        if matches!(self.peek(), Some(Token::RightBrace)) {
            let _ = self.consume();
        }
    }

    fn consume(&mut self) -> Option<&Spanned> {
        let spanned = self.tokens.as_slice().get(self.position);
        if spanned.is_some() {
            self.position += 1;
        }
        spanned
    }

    fn consume_span_end(&mut self) -> usize {
        let end = self
            .tokens
            .as_slice()
            .get(self.position)
            .map_or(0, |s| s.end);
        self.position += 1;
        end
    }

    fn peek(&self) -> Option<&Token> {
        self.tokens.as_slice().get(self.position).map(|s| &s.token)
    }

    fn peek_span_start(&self) -> usize {
        self.tokens
            .as_slice()
            .get(self.position)
            .map_or(0, |s| s.start)
    }
}

/// [§ 5.1 Selector Lists](https://www.w3.org/TR/selectors-4/#selector-list)
///
/// "A selector list is a comma-separated list of selectors." Commas
/// inside functional pseudo-classes (`:is(a, b)`) and attribute selectors
/// stay put. The first [`MAX_SELECTORS`] survive for provenance.
fn split_selector_list(text: &str) -> Vec<String> {
    let mut selectors = Vec::new();
    let mut depth = 0usize;
    let mut current = String::new();
    for c in text.chars() {
        match c {
            '(' | '[' => {
                depth += 1;
                current.push(c);
            }
            ')' | ']' => {
                depth = depth.saturating_sub(1);
                current.push(c);
            }
            ',' if depth == 0 => {
                let s = collapse_whitespace(current.trim());
                if !s.is_empty() && selectors.len() < MAX_SELECTORS {
                    selectors.push(s);
                }
                current.clear();
            }
            _ => current.push(c),
        }
    }
    let s = collapse_whitespace(current.trim());
    if !s.is_empty() && selectors.len() < MAX_SELECTORS {
        selectors.push(s);
    }
    selectors
}

/// Collapse internal whitespace runs to single spaces so selector text is
/// stable across formatting styles.
fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// [§ 6.4.2 Important declarations](https://www.w3.org/TR/css-cascade-4/#importance)
///
/// "A declaration is important if ... the last two (non-whitespace,
/// non-comment) tokens in its value are a <delim-token> with the value
/// '!' followed by an <ident-token> ... 'important'."
fn strip_important(value: &str) -> (String, bool) {
    let trimmed = value.trim_end();
    let lower = trimmed.to_ascii_lowercase();
    if let Some(before) = lower.strip_suffix("important") {
        let before_original = &trimmed[..before.len()];
        if let Some(stripped) = before_original.trim_end().strip_suffix('!') {
            return (stripped.trim_end().to_string(), true);
        }
    }
    (trimmed.to_string(), false)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules(css: &str) -> Vec<ParsedRule> {
        parse_source(css, 16.0).rules
    }

    #[test]
    fn simple_rule() {
        let parsed = rules(".a { color: #ff0000; }");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].selectors, vec![".a"]);
        assert_eq!(parsed[0].declarations.len(), 1);
        assert_eq!(parsed[0].declarations[0].property, "color");
        assert_eq!(parsed[0].declarations[0].value, "#ff0000");
        assert_eq!(parsed[0].media, MediaContext::Base);
    }

    #[test]
    fn authored_value_is_preserved() {
        let parsed = rules(".b{font: 700 14px/1.5 \"SF Pro\", sans-serif}");
        assert_eq!(
            parsed[0].declarations[0].value,
            "700 14px/1.5 \"SF Pro\", sans-serif"
        );
    }

    #[test]
    fn selector_list_splits_and_caps() {
        let parsed = rules("a, b, :is(c, d), e, f, g { margin: 0 }");
        assert_eq!(parsed[0].selectors, vec!["a", "b", ":is(c, d)", "e"]);
    }

    #[test]
    fn media_min_width_context() {
        let parsed = rules("@media (min-width: 768px) { .c { gap: 8px } }");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].media, MediaContext::MinWidth(768));

        let rem = rules("@media (min-width: 48rem) { .c { gap: 8px } }");
        assert_eq!(rem[0].media, MediaContext::MinWidth(768));
    }

    #[test]
    fn media_without_min_width_keeps_base() {
        let parsed = rules("@media print { .c { margin: 0 } }");
        assert_eq!(parsed[0].media, MediaContext::Base);
    }

    #[test]
    fn important_is_stripped_and_flagged() {
        let parsed = rules(".d { color: red !important; }");
        assert_eq!(parsed[0].declarations[0].value, "red");
        assert!(parsed[0].declarations[0].important);
    }

    #[test]
    fn custom_properties_parse_as_declarations() {
        let parsed = rules(":root { --brand: #0a84ff; }");
        assert_eq!(parsed[0].declarations[0].property, "--brand");
        assert_eq!(parsed[0].declarations[0].value, "#0a84ff");
    }

    #[test]
    fn malformed_declaration_recovers() {
        let parsed = rules(".e { color red; margin: 4px; }");
        assert_eq!(parsed[0].declarations.len(), 1);
        assert_eq!(parsed[0].declarations[0].property, "margin");
    }

    #[test]
    fn keyframes_block_is_skipped() {
        let parsed = rules("@keyframes spin { from { opacity: 0 } } .f { opacity: 1 }");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].selectors, vec![".f"]);
    }

    #[test]
    fn supports_block_is_entered() {
        let parsed = rules("@supports (display: grid) { .g { display: grid } }");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].declarations[0].value, "grid");
    }

    #[test]
    fn empty_source_is_not_a_failure() {
        let outcome = parse_source("", 16.0);
        assert!(outcome.rules.is_empty());
        assert!(!outcome.failed(""));

        let garbage = parse_source("%%% not css at all", 16.0);
        assert!(garbage.failed("%%% not css at all"));
    }

    #[test]
    fn unterminated_block_is_tolerated() {
        let parsed = rules(".h { color: blue");
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed[0].declarations[0].value, "blue");
    }
}
