//! CSS tokenizer per [§ 4 Tokenization](https://www.w3.org/TR/css-syntax-3/#tokenization).
//!
//! Covers the token types the style resolver consumes. Escapes, unicode
//! ranges and `url()` tokens are not produced; a `url(` is tokenized as a
//! function whose argument is skipped by the parser.

use core::fmt;

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#token-diagrams)
#[derive(Debug, Clone, PartialEq)]
pub enum CSSToken {
    /// "`<ident-token>`"
    Ident(String),
    /// "`<function-token>`", the name without the parenthesis
    Function(String),
    /// "`<at-keyword-token>`", the name without the `@`
    AtKeyword(String),
    /// "`<hash-token>`", the value without the `#`
    Hash(String),
    /// "`<string-token>`"
    String(String),
    /// "`<number-token>`"
    Number(f32),
    /// "`<percentage-token>`"
    Percentage(f32),
    /// "`<dimension-token>`" with its unit, lowercased
    Dimension {
        /// Numeric part.
        value: f32,
        /// Unit identifier.
        unit: String,
    },
    /// "`<whitespace-token>`"
    Whitespace,
    /// "`<colon-token>`"
    Colon,
    /// "`<semicolon-token>`"
    Semicolon,
    /// "`<comma-token>`"
    Comma,
    /// "`<{-token>`"
    LeftBrace,
    /// "`<}-token>`"
    RightBrace,
    /// "`<(-token>`"
    LeftParen,
    /// "`<)-token>`"
    RightParen,
    /// "`<[-token>`"
    LeftBracket,
    /// "`<]-token>`"
    RightBracket,
    /// "`<delim-token>`"
    Delim(char),
    /// End of input.
    EOF,
}

impl CSSToken {
    /// Returns true if this is the EOF token.
    #[must_use]
    pub const fn is_eof(&self) -> bool {
        matches!(self, Self::EOF)
    }
}

impl fmt::Display for CSSToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) => write!(f, "{s}"),
            Self::Function(s) => write!(f, "{s}("),
            Self::AtKeyword(s) => write!(f, "@{s}"),
            Self::Hash(s) => write!(f, "#{s}"),
            Self::String(s) => write!(f, "\"{s}\""),
            Self::Number(n) => write!(f, "{n}"),
            Self::Percentage(n) => write!(f, "{n}%"),
            Self::Dimension { value, unit } => write!(f, "{value}{unit}"),
            Self::Whitespace => write!(f, " "),
            Self::Colon => write!(f, ":"),
            Self::Semicolon => write!(f, ";"),
            Self::Comma => write!(f, ","),
            Self::LeftBrace => write!(f, "{{"),
            Self::RightBrace => write!(f, "}}"),
            Self::LeftParen => write!(f, "("),
            Self::RightParen => write!(f, ")"),
            Self::LeftBracket => write!(f, "["),
            Self::RightBracket => write!(f, "]"),
            Self::Delim(c) => write!(f, "{c}"),
            Self::EOF => Ok(()),
        }
    }
}

/// [§ 4.3 Tokenizer Algorithms](https://www.w3.org/TR/css-syntax-3/#tokenizer-algorithms)
pub struct CSSTokenizer {
    /// The input being tokenized
    input: Vec<char>,
    /// Current position in the input
    position: usize,
    /// Collected tokens
    tokens: Vec<CSSToken>,
}

impl CSSTokenizer {
    /// Create a new CSS tokenizer with the given input.
    pub fn new(input: impl Into<String>) -> Self {
        Self {
            input: input.into().chars().collect(),
            position: 0,
            tokens: Vec::new(),
        }
    }

    /// Tokenize the whole input. The last token is always [`CSSToken::EOF`].
    pub fn run(&mut self) {
        loop {
            let token = self.consume_token();
            let is_eof = token.is_eof();
            self.tokens.push(token);
            if is_eof {
                break;
            }
        }
    }

    /// Return the collected tokens.
    #[must_use]
    pub fn into_tokens(self) -> Vec<CSSToken> {
        self.tokens
    }

    /// Tokenize `input` in one call.
    #[must_use]
    pub fn tokenize(input: &str) -> Vec<CSSToken> {
        let mut tokenizer = Self::new(input);
        tokenizer.run();
        tokenizer.into_tokens()
    }

    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    fn peek_at(&self, offset: usize) -> Option<char> {
        self.input.get(self.position + offset).copied()
    }

    fn consume(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.position += 1;
        Some(c)
    }

    /// [§ 4.3.2 Consume comments](https://www.w3.org/TR/css-syntax-3/#consume-comment)
    fn consume_comments(&mut self) {
        while self.peek() == Some('/') && self.peek_at(1) == Some('*') {
            self.position += 2;
            loop {
                match self.consume() {
                    None => return,
                    Some('*') if self.peek() == Some('/') => {
                        self.position += 1;
                        break;
                    }
                    Some(_) => {}
                }
            }
        }
    }

    /// [§ 4.3.1 Consume a token](https://www.w3.org/TR/css-syntax-3/#consume-token)
    fn consume_token(&mut self) -> CSSToken {
        self.consume_comments();

        let Some(c) = self.consume() else {
            return CSSToken::EOF;
        };

        match c {
            c if c.is_whitespace() => {
                while self.peek().is_some_and(char::is_whitespace) {
                    self.position += 1;
                }
                CSSToken::Whitespace
            }
            '"' | '\'' => self.consume_string(c),
            '#' => {
                if self.peek().is_some_and(is_name_code_point) {
                    CSSToken::Hash(self.consume_name())
                } else {
                    CSSToken::Delim('#')
                }
            }
            '(' => CSSToken::LeftParen,
            ')' => CSSToken::RightParen,
            '[' => CSSToken::LeftBracket,
            ']' => CSSToken::RightBracket,
            '{' => CSSToken::LeftBrace,
            '}' => CSSToken::RightBrace,
            ',' => CSSToken::Comma,
            ':' => CSSToken::Colon,
            ';' => CSSToken::Semicolon,
            '@' if self.peek().is_some_and(is_name_start_code_point) => {
                CSSToken::AtKeyword(self.consume_name())
            }
            '+' | '.' if self.starts_number_after(c) => {
                self.position -= 1;
                self.consume_numeric()
            }
            '-' if self.starts_number_after(c) => {
                self.position -= 1;
                self.consume_numeric()
            }
            '-' if self.peek().is_some_and(is_name_start_code_point) || self.peek() == Some('-') => {
                self.position -= 1;
                self.consume_ident_like()
            }
            c if c.is_ascii_digit() => {
                self.position -= 1;
                self.consume_numeric()
            }
            c if is_name_start_code_point(c) => {
                self.position -= 1;
                self.consume_ident_like()
            }
            other => CSSToken::Delim(other),
        }
    }

    /// [§ 4.3.10 Check if three code points would start a number](https://www.w3.org/TR/css-syntax-3/#starts-with-a-number)
    fn starts_number_after(&self, first: char) -> bool {
        let next = self.peek();
        match first {
            '+' | '-' => {
                next.is_some_and(|c| c.is_ascii_digit())
                    || (next == Some('.') && self.peek_at(1).is_some_and(|c| c.is_ascii_digit()))
            }
            '.' => next.is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        }
    }

    /// [§ 4.3.5 Consume a string token](https://www.w3.org/TR/css-syntax-3/#consume-string-token)
    fn consume_string(&mut self, ending: char) -> CSSToken {
        let mut value = String::new();
        while let Some(c) = self.consume() {
            match c {
                c if c == ending => break,
                '\\' => {
                    if let Some(escaped) = self.consume() {
                        value.push(escaped);
                    }
                }
                c => value.push(c),
            }
        }
        CSSToken::String(value)
    }

    /// [§ 4.3.12 Consume an ident sequence](https://www.w3.org/TR/css-syntax-3/#consume-name)
    fn consume_name(&mut self) -> String {
        let mut name = String::new();
        while let Some(c) = self.peek().filter(|&c| is_name_code_point(c)) {
            name.push(c);
            self.position += 1;
        }
        name
    }

    /// [§ 4.3.4 Consume an ident-like token](https://www.w3.org/TR/css-syntax-3/#consume-ident-like-token)
    fn consume_ident_like(&mut self) -> CSSToken {
        let name = self.consume_name();
        if self.peek() == Some('(') {
            self.position += 1;
            CSSToken::Function(name.to_ascii_lowercase())
        } else {
            CSSToken::Ident(name)
        }
    }

    /// [§ 4.3.3 Consume a numeric token](https://www.w3.org/TR/css-syntax-3/#consume-numeric-token)
    fn consume_numeric(&mut self) -> CSSToken {
        let mut repr = String::new();
        if let Some(sign) = self.peek().filter(|&c| c == '+' || c == '-') {
            repr.push(sign);
            self.position += 1;
        }
        let mut seen_dot = false;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                repr.push(c);
            } else if c == '.' && !seen_dot && self.peek_at(1).is_some_and(|d| d.is_ascii_digit()) {
                seen_dot = true;
                repr.push(c);
            } else {
                break;
            }
            self.position += 1;
        }
        let value = repr.parse::<f32>().unwrap_or(0.0);

        if self.peek() == Some('%') {
            self.position += 1;
            CSSToken::Percentage(value)
        } else if self.peek().is_some_and(is_name_start_code_point) {
            let unit = self.consume_name().to_ascii_lowercase();
            CSSToken::Dimension { value, unit }
        } else {
            CSSToken::Number(value)
        }
    }
}

/// [§ 4.2 Definitions](https://www.w3.org/TR/css-syntax-3/#ident-start-code-point)
///
/// "A letter, a non-ASCII code point, or U+005F LOW LINE (_)."
fn is_name_start_code_point(c: char) -> bool {
    c.is_ascii_alphabetic() || !c.is_ascii() || c == '_'
}

/// "An ident-start code point, a digit, or U+002D HYPHEN-MINUS (-)."
fn is_name_code_point(c: char) -> bool {
    is_name_start_code_point(c) || c.is_ascii_digit() || c == '-'
}
