//! CSS tokenizer.
//!
//! [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
//!
//! Follows the CSS Syntax Module Level 3 consume-a-token algorithm. Every
//! token carries its span (char indices into the input) so the parser can
//! recover the exact authored text of a declaration value instead of
//! re-serializing tokens.

/// A single CSS token.
///
/// [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization)
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// An identifier (`color`, `--brand`, `auto`).
    Ident(String),
    /// A function opener (`rgb(` yields `Function("rgb")`).
    Function(String),
    /// An at-keyword (`@media` yields `AtKeyword("media")`).
    AtKeyword(String),
    /// A hash token (`#fff`, `#header`); the value excludes the `#`.
    Hash(String),
    /// A quoted string, quotes stripped.
    Str(String),
    /// A `url(...)` token with the unquoted URL.
    Url(String),
    /// A number.
    Number {
        /// Numeric value.
        value: f64,
    },
    /// A percentage; value excludes the `%`.
    Percentage {
        /// Numeric value before the `%`.
        value: f64,
    },
    /// A dimension: number plus unit ident.
    Dimension {
        /// Numeric value.
        value: f64,
        /// The unit as written (`px`, `rem`, ...).
        unit: String,
    },
    /// Any other single code point.
    Delim(char),
    /// `:`
    Colon,
    /// `;`
    Semicolon,
    /// `,`
    Comma,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// A run of whitespace.
    Whitespace,
    /// `<!--`
    Cdo,
    /// `-->`
    Cdc,
    /// An unterminated string; the parser discards the declaration.
    BadString,
    /// A malformed `url(`; the parser discards the declaration.
    BadUrl,
    /// End of input.
    Eof,
}

impl Token {
    /// Whether this is the EOF token.
    #[must_use]
    pub fn is_eof(&self) -> bool {
        matches!(self, Token::Eof)
    }
}

/// A token plus its span as char indices `[start, end)` into the input.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned {
    /// The token.
    pub token: Token,
    /// First char index.
    pub start: usize,
    /// One past the last char index.
    pub end: usize,
}

/// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
///
/// The tokenizer. Owns the input as chars; positions in [`Spanned`] index
/// into that char sequence.
pub struct Tokenizer {
    input: Vec<char>,
    position: usize,
}

impl Tokenizer {
    /// Create a tokenizer over the given input.
    #[must_use]
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
        }
    }

    /// Tokenize the whole input, EOF token included.
    #[must_use]
    pub fn run(mut self) -> Tokens {
        let mut tokens = Vec::new();
        loop {
            let start = self.position;
            let token = self.consume_token();
            let is_eof = token.is_eof();
            tokens.push(Spanned {
                token,
                start,
                end: self.position,
            });
            if is_eof {
                break;
            }
        }
        Tokens {
            input: self.input,
            tokens,
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> Token {
        // "Consume comments."
        self.consume_comments();

        let Some(c) = self.consume() else {
            return Token::Eof;
        };

        match c {
            // "Consume as much whitespace as possible."
            c if is_whitespace(c) => {
                while self.peek().is_some_and(is_whitespace) {
                    let _ = self.consume();
                }
                Token::Whitespace
            }

            '"' | '\'' => self.consume_string(c),

            '#' => {
                // "If the next input code point is an ident code point or
                // the next two input code points are a valid escape..."
                if self.peek().is_some_and(is_ident_code_point)
                    || is_valid_escape(self.peek(), self.peek_at(1))
                {
                    Token::Hash(self.consume_ident_sequence())
                } else {
                    Token::Delim('#')
                }
            }

            '(' => Token::LeftParen,
            ')' => Token::RightParen,
            '[' => Token::LeftBracket,
            ']' => Token::RightBracket,
            '{' => Token::LeftBrace,
            '}' => Token::RightBrace,
            ',' => Token::Comma,
            ':' => Token::Colon,
            ';' => Token::Semicolon,

            '+' => {
                if would_start_number(Some('+'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric()
                } else {
                    Token::Delim('+')
                }
            }

            '-' => {
                if would_start_number(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_numeric()
                } else if self.peek() == Some('-') && self.peek_at(1) == Some('>') {
                    let _ = self.consume();
                    let _ = self.consume();
                    Token::Cdc
                } else if would_start_ident(Some('-'), self.peek(), self.peek_at(1)) {
                    self.reconsume();
                    self.consume_ident_like()
                } else {
                    Token::Delim('-')
                }
            }

            '.' => {
                if self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    self.reconsume();
                    self.consume_numeric()
                } else {
                    Token::Delim('.')
                }
            }

            '<' => {
                // "If the next 3 input code points are !--, consume them
                // and return a <CDO-token>."
                if self.peek() == Some('!')
                    && self.peek_at(1) == Some('-')
                    && self.peek_at(2) == Some('-')
                {
                    let _ = self.consume();
                    let _ = self.consume();
                    let _ = self.consume();
                    Token::Cdo
                } else {
                    Token::Delim('<')
                }
            }

            '@' => {
                if would_start_ident(self.peek(), self.peek_at(1), self.peek_at(2)) {
                    Token::AtKeyword(self.consume_ident_sequence())
                } else {
                    Token::Delim('@')
                }
            }

            '\\' => {
                if is_valid_escape(Some('\\'), self.peek()) {
                    self.reconsume();
                    self.consume_ident_like()
                } else {
                    // "This is a parse error."
                    Token::Delim('\\')
                }
            }

            c if c.is_ascii_digit() => {
                self.reconsume();
                self.consume_numeric()
            }

            c if is_ident_start_code_point(c) => {
                self.reconsume();
                self.consume_ident_like()
            }

            other => Token::Delim(other),
        }
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    ///
    /// "If the next two input code points are U+002F SOLIDUS followed by a
    /// U+002A ASTERISK, consume them and all following code points up to
    /// and including the first U+002A ASTERISK followed by a U+002F
    /// SOLIDUS, or up to an EOF code point."
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            let _ = self.consume();
            let _ = self.consume();
            loop {
                match self.consume() {
                    Some('*') if self.peek() == Some('/') => {
                        let _ = self.consume();
                        break;
                    }
                    Some(_) => {}
                    None => return,
                }
            }
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, quote: char) -> Token {
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(c) if c == quote => return Token::Str(value),
                // "This is a parse error. Reconsume the current input code
                // point, create a <bad-string-token>, and return it."
                Some('\n') => {
                    self.reconsume();
                    return Token::BadString;
                }
                Some('\\') => match self.peek() {
                    None => {}
                    Some('\n') => {
                        let _ = self.consume();
                    }
                    Some(_) => value.push(self.consume_escape()),
                },
                Some(c) => value.push(c),
                None => return Token::Str(value),
            }
        }
    }

    /// [§ 4.3.7 Consume an escaped code point](https://www.w3.org/TR/css-syntax-3/#consume-escaped-code-point)
    fn consume_escape(&mut self) -> char {
        let Some(c) = self.consume() else {
            return char::REPLACEMENT_CHARACTER;
        };
        if c.is_ascii_hexdigit() {
            let mut digits = String::new();
            digits.push(c);
            while digits.len() < 6 && self.peek().is_some_and(|c| c.is_ascii_hexdigit()) {
                if let Some(d) = self.consume() {
                    digits.push(d);
                }
            }
            // "If the next input code point is whitespace, consume it."
            if self.peek().is_some_and(is_whitespace) {
                let _ = self.consume();
            }
            u32::from_str_radix(&digits, 16)
                .ok()
                .and_then(char::from_u32)
                .unwrap_or(char::REPLACEMENT_CHARACTER)
        } else {
            c
        }
    }

    /// [§ 4.3.11 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_ident_sequence(&mut self) -> String {
        let mut result = String::new();
        loop {
            match self.peek() {
                Some(c) if is_ident_code_point(c) => {
                    result.push(c);
                    let _ = self.consume();
                }
                Some('\\') if is_valid_escape(Some('\\'), self.peek_at(1)) => {
                    let _ = self.consume();
                    result.push(self.consume_escape());
                }
                _ => return result,
            }
        }
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> Token {
        let name = self.consume_ident_sequence();

        if self.peek() == Some('(') {
            let _ = self.consume();
            // "If the returned string's value is an ASCII case-insensitive
            // match for 'url', ... consume a url token."
            if name.eq_ignore_ascii_case("url") {
                // "If the next one or two input code points are ...
                // whitespace followed by a quotation mark, consume a
                // function token" - quoted urls stay functions.
                let mut lookahead = 0;
                while self.peek_at(lookahead).is_some_and(is_whitespace) {
                    lookahead += 1;
                }
                if matches!(self.peek_at(lookahead), Some('"' | '\'')) {
                    return Token::Function(name);
                }
                return self.consume_url();
            }
            return Token::Function(name);
        }

        Token::Ident(name)
    }

    /// [§ 4.3.6 Consume a url token](https://www.w3.org/TR/css-syntax-3/#consume-url-token)
    fn consume_url(&mut self) -> Token {
        while self.peek().is_some_and(is_whitespace) {
            let _ = self.consume();
        }
        let mut value = String::new();
        loop {
            match self.consume() {
                Some(')') | None => return Token::Url(value),
                Some(c) if is_whitespace(c) => {
                    while self.peek().is_some_and(is_whitespace) {
                        let _ = self.consume();
                    }
                    match self.consume() {
                        Some(')') | None => return Token::Url(value),
                        Some(_) => return self.consume_bad_url_remnants(),
                    }
                }
                Some('"' | '\'' | '(') => return self.consume_bad_url_remnants(),
                Some('\\') => {
                    if is_valid_escape(Some('\\'), self.peek()) {
                        value.push(self.consume_escape());
                    } else {
                        return self.consume_bad_url_remnants();
                    }
                }
                Some(c) => value.push(c),
            }
        }
    }

    /// [§ 4.3.14 Consume the remnants of a bad url](https://www.w3.org/TR/css-syntax-3/#consume-remnants-of-bad-url)
    fn consume_bad_url_remnants(&mut self) -> Token {
        loop {
            match self.consume() {
                Some(')') | None => return Token::BadUrl,
                Some('\\') => {
                    let _ = self.consume();
                }
                Some(_) => {}
            }
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> Token {
        let value = self.consume_number();

        if would_start_ident(self.peek(), self.peek_at(1), self.peek_at(2)) {
            let unit = self.consume_ident_sequence();
            Token::Dimension { value, unit }
        } else if self.peek() == Some('%') {
            let _ = self.consume();
            Token::Percentage { value }
        } else {
            Token::Number { value }
        }
    }

    /// [§ 4.3.12 Consume a number](https://www.w3.org/TR/css-syntax-3/#consume-number)
    fn consume_number(&mut self) -> f64 {
        let mut repr = String::new();
        if matches!(self.peek(), Some('+' | '-')) {
            if let Some(sign) = self.consume() {
                repr.push(sign);
            }
        }
        while self.peek().is_some_and(|c| c.is_ascii_digit()) {
            if let Some(d) = self.consume() {
                repr.push(d);
            }
        }
        if self.peek() == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()) {
            if let Some(dot) = self.consume() {
                repr.push(dot);
            }
            while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                if let Some(d) = self.consume() {
                    repr.push(d);
                }
            }
        }
        // "e" notation
        if matches!(self.peek(), Some('e' | 'E')) {
            let mut lookahead = 1;
            if matches!(self.peek_at(1), Some('+' | '-')) {
                lookahead = 2;
            }
            if self.peek_at(lookahead).is_some_and(|c| c.is_ascii_digit()) {
                if let Some(e) = self.consume() {
                    repr.push(e);
                }
                if matches!(self.peek(), Some('+' | '-')) {
                    if let Some(sign) = self.consume() {
                        repr.push(sign);
                    }
                }
                while self.peek().is_some_and(|c| c.is_ascii_digit()) {
                    if let Some(d) = self.consume() {
                        repr.push(d);
                    }
                }
            }
        }
        repr.parse().unwrap_or(0.0)
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.input.get(self.position).copied();
        if c.is_some() {
            self.position += 1;
        }
        c
    }

    fn reconsume(&mut self) {
        self.position = self.position.saturating_sub(1);
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }
}

/// The tokenized input: tokens plus the char sequence they index into,
/// so spans can be turned back into authored text.
#[derive(Debug)]
pub struct Tokens {
    input: Vec<char>,
    tokens: Vec<Spanned>,
}

impl Tokens {
    /// The token sequence, EOF included.
    #[must_use]
    pub fn as_slice(&self) -> &[Spanned] {
        &self.tokens
    }

    /// Recover the authored text of a char-index range, trimmed.
    #[must_use]
    pub fn text(&self, start: usize, end: usize) -> String {
        let end = end.min(self.input.len());
        let start = start.min(end);
        self.input[start..end]
            .iter()
            .collect::<String>()
            .trim()
            .to_string()
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#whitespace)
fn is_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
fn is_ident_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || !c.is_ascii()
}

/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
fn is_ident_code_point(c: char) -> bool {
    is_ident_start_code_point(c) || c.is_ascii_digit() || c == '-'
}

/// [§ 4.3.8 Check if two code points are a valid escape](https://www.w3.org/TR/css-syntax-3/#starts-with-a-valid-escape)
fn is_valid_escape(first: Option<char>, second: Option<char>) -> bool {
    first == Some('\\') && second.is_some_and(|c| c != '\n')
}

/// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
fn would_start_number(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('+' | '-') => {
            second.is_some_and(|c| c.is_ascii_digit())
                || (second == Some('.') && third.is_some_and(|c| c.is_ascii_digit()))
        }
        Some('.') => second.is_some_and(|c| c.is_ascii_digit()),
        Some(c) => c.is_ascii_digit(),
        None => false,
    }
}

/// [§ 4.3.9 Check if three code points would start an ident sequence](https://www.w3.org/TR/css-syntax-3/#would-start-an-identifier)
fn would_start_ident(first: Option<char>, second: Option<char>, third: Option<char>) -> bool {
    match first {
        Some('-') => {
            second.is_some_and(|c| is_ident_start_code_point(c) || c == '-')
                || is_valid_escape(second, third)
        }
        Some('\\') => is_valid_escape(first, second),
        Some(c) => is_ident_start_code_point(c),
        None => false,
    }
}
