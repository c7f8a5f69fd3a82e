//! Integration tests for the CSS tokenizer.

use quarry_css::{Token, Tokenizer};

/// Helper to tokenize a string and return the bare tokens.
fn tokenize(input: &str) -> Vec<Token> {
    Tokenizer::new(input)
        .run()
        .as_slice()
        .iter()
        .map(|s| s.token.clone())
        .collect()
}

#[test]
fn whitespace_collapses_to_one_token() {
    let tokens = tokenize("   \t\n  ");
    assert_eq!(tokens, vec![Token::Whitespace, Token::Eof]);
}

#[test]
fn idents_and_custom_properties() {
    assert_eq!(
        tokenize("background-color"),
        vec![Token::Ident("background-color".to_string()), Token::Eof]
    );
    assert_eq!(
        tokenize("--brand-primary"),
        vec![Token::Ident("--brand-primary".to_string()), Token::Eof]
    );
}

#[test]
fn hash_tokens_keep_their_value() {
    assert_eq!(
        tokenize("#ff0000"),
        vec![Token::Hash("ff0000".to_string()), Token::Eof]
    );
    assert_eq!(
        tokenize("#header"),
        vec![Token::Hash("header".to_string()), Token::Eof]
    );
}

#[test]
fn functions_and_at_keywords() {
    assert_eq!(
        tokenize("rgb("),
        vec![Token::Function("rgb".to_string()), Token::Eof]
    );
    assert_eq!(
        tokenize("@media"),
        vec![Token::AtKeyword("media".to_string()), Token::Eof]
    );
}

#[test]
fn numeric_tokens() {
    assert_eq!(
        tokenize("16px"),
        vec![
            Token::Dimension { value: 16.0, unit: "px".to_string() },
            Token::Eof
        ]
    );
    assert_eq!(
        tokenize("1.5rem"),
        vec![
            Token::Dimension { value: 1.5, unit: "rem".to_string() },
            Token::Eof
        ]
    );
    assert_eq!(
        tokenize("50%"),
        vec![Token::Percentage { value: 50.0 }, Token::Eof]
    );
    assert_eq!(
        tokenize("-4"),
        vec![Token::Number { value: -4.0 }, Token::Eof]
    );
    assert_eq!(
        tokenize(".5"),
        vec![Token::Number { value: 0.5 }, Token::Eof]
    );
}

#[test]
fn strings_and_urls() {
    assert_eq!(
        tokenize("\"hello world\""),
        vec![Token::Str("hello world".to_string()), Token::Eof]
    );
    assert_eq!(
        tokenize("url(image.png)"),
        vec![Token::Url("image.png".to_string()), Token::Eof]
    );
    // Quoted urls stay as a function wrapping a string.
    assert_eq!(
        tokenize("url(\"image.png\")"),
        vec![
            Token::Function("url".to_string()),
            Token::Str("image.png".to_string()),
            Token::RightParen,
            Token::Eof
        ]
    );
}

#[test]
fn comments_are_invisible() {
    assert_eq!(
        tokenize("/* note */color"),
        vec![Token::Ident("color".to_string()), Token::Eof]
    );
    // Unterminated comment swallows the rest without panicking.
    assert_eq!(tokenize("/* dangling"), vec![Token::Eof]);
}

#[test]
fn unterminated_string_is_bad_string() {
    let tokens = tokenize("\"oops\nnext");
    assert_eq!(tokens[0], Token::BadString);
}

#[test]
fn cdo_cdc_tokens() {
    assert_eq!(tokenize("<!--"), vec![Token::Cdo, Token::Eof]);
    assert_eq!(tokenize("-->"), vec![Token::Cdc, Token::Eof]);
}

#[test]
fn spans_recover_authored_text() {
    let tokens = Tokenizer::new("margin: 0 auto").run();
    let all = tokens.as_slice();
    let first = all.first().expect("token");
    let last = all[all.len() - 2].clone();
    assert_eq!(tokens.text(first.start, last.end), "margin: 0 auto");
}
