//! CSS parser per [§ 5 Parsing](https://www.w3.org/TR/css-syntax-3/#parsing).
//!
//! Produces style rules whose selector lists are already parsed. At-rules
//! are skipped, and a rule whose selector list uses anything the resolver
//! cannot match is dropped whole, as CSS requires for invalid selectors.

use marten_common::warning::warn_once;

use crate::selector::{Selector, parse_selector_list};
use crate::tokenizer::{CSSToken, CSSTokenizer};

/// [§ 5.3.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
#[derive(Debug, Clone, PartialEq)]
pub enum ComponentValue {
    /// A preserved token.
    Token(CSSToken),
    /// A function and its arguments, whitespace removed.
    Function {
        /// Lowercased function name.
        name: String,
        /// Arguments including separating commas.
        args: Vec<ComponentValue>,
    },
}

impl ComponentValue {
    /// The identifier, if this is an `<ident-token>`.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Token(CSSToken::Ident(s)) => Some(s),
            _ => None,
        }
    }
}

/// [§ 5.3.9 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
#[derive(Debug, Clone, PartialEq)]
pub struct Declaration {
    /// Property name, lowercased.
    pub name: String,
    /// Value with whitespace tokens removed.
    pub value: Vec<ComponentValue>,
    /// "If the last two non-whitespace tokens in the declaration's value are
    /// a `<delim-token>` with the value "!" followed by an `<ident-token>`
    /// with a value that is an ASCII case-insensitive match for "important",
    /// remove them from the declaration's value and set the declaration's
    /// important flag to true."
    pub important: bool,
}

/// A qualified rule whose prelude parsed as a selector list.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRule {
    /// Comma-separated selectors; each matches independently.
    pub selectors: Vec<Selector>,
    /// Declarations in source order.
    pub declarations: Vec<Declaration>,
}

/// A parsed stylesheet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Stylesheet {
    /// Style rules in source order.
    pub rules: Vec<StyleRule>,
}

impl Stylesheet {
    /// Append every rule of `other`, keeping source order.
    pub fn extend(&mut self, other: Self) {
        self.rules.extend(other.rules);
    }
}

/// Parser over a token list.
pub struct CSSParser {
    tokens: Vec<CSSToken>,
    position: usize,
}

impl CSSParser {
    /// Create a parser over `tokens`, which should end with EOF.
    #[must_use]
    pub fn new(tokens: Vec<CSSToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> &CSSToken {
        self.tokens.get(self.position).unwrap_or(&CSSToken::EOF)
    }

    fn next_token(&mut self) -> CSSToken {
        let token = self.peek().clone();
        if !token.is_eof() {
            self.position += 1;
        }
        token
    }

    fn skip_whitespace(&mut self) {
        while *self.peek() == CSSToken::Whitespace {
            self.position += 1;
        }
    }

    /// [§ 5.3.3 Parse a stylesheet](https://www.w3.org/TR/css-syntax-3/#parse-stylesheet)
    pub fn parse_stylesheet(&mut self) -> Stylesheet {
        let mut sheet = Stylesheet::default();
        loop {
            self.skip_whitespace();
            match self.peek() {
                CSSToken::EOF => break,
                CSSToken::AtKeyword(name) => {
                    warn_once("CSS", &format!("ignoring at-rule '@{name}'"));
                    self.skip_at_rule();
                }
                _ => {
                    if let Some(rule) = self.consume_qualified_rule() {
                        sheet.rules.push(rule);
                    }
                }
            }
        }
        sheet
    }

    /// [§ 5.3.6 Parse a list of declarations](https://www.w3.org/TR/css-syntax-3/#parse-list-of-declarations)
    pub fn parse_declaration_list(&mut self) -> Vec<Declaration> {
        let mut declarations = Vec::new();
        loop {
            self.skip_whitespace();
            match self.next_token() {
                CSSToken::EOF => break,
                CSSToken::Semicolon => {}
                CSSToken::Ident(name) => {
                    if let Some(decl) = self.consume_declaration(name) {
                        declarations.push(decl);
                    }
                }
                other => {
                    warn_once("CSS", &format!("skipping declaration starting with '{other}'"));
                    self.skip_to_semicolon();
                }
            }
        }
        declarations
    }

    fn skip_to_semicolon(&mut self) {
        loop {
            match self.next_token() {
                CSSToken::Semicolon | CSSToken::EOF => return,
                CSSToken::Function(_) | CSSToken::LeftParen => self.skip_block(&CSSToken::RightParen),
                _ => {}
            }
        }
    }

    /// Skip tokens up to and including `close`, honoring nesting.
    fn skip_block(&mut self, close: &CSSToken) {
        let _ = self.collect_block(close);
    }

    /// Collect tokens up to (not including) the matching `close`, which is
    /// consumed.
    fn collect_block(&mut self, close: &CSSToken) -> Vec<CSSToken> {
        let mut depth = 0usize;
        let mut out = Vec::new();
        loop {
            let token = self.next_token();
            match &token {
                CSSToken::EOF => return out,
                t if t == close && depth == 0 => return out,
                CSSToken::LeftBrace | CSSToken::LeftParen | CSSToken::LeftBracket
                | CSSToken::Function(_) => depth += 1,
                CSSToken::RightBrace | CSSToken::RightParen | CSSToken::RightBracket => {
                    depth = depth.saturating_sub(1);
                }
                _ => {}
            }
            out.push(token);
        }
    }

    /// [§ 5.4.2 Consume an at-rule](https://www.w3.org/TR/css-syntax-3/#consume-at-rule)
    fn skip_at_rule(&mut self) {
        let _ = self.next_token();
        loop {
            match self.next_token() {
                CSSToken::Semicolon | CSSToken::EOF => return,
                CSSToken::LeftBrace => {
                    self.skip_block(&CSSToken::RightBrace);
                    return;
                }
                _ => {}
            }
        }
    }

    /// [§ 5.4.3 Consume a qualified rule](https://www.w3.org/TR/css-syntax-3/#consume-qualified-rule)
    fn consume_qualified_rule(&mut self) -> Option<StyleRule> {
        let mut prelude = Vec::new();
        loop {
            match self.next_token() {
                // "This is a parse error. Return nothing."
                CSSToken::EOF => return None,
                CSSToken::LeftBrace => break,
                token => prelude.push(token),
            }
        }
        let body = self.collect_block(&CSSToken::RightBrace);

        let Some(selectors) = parse_selector_list(&prelude) else {
            let text: String = prelude.iter().map(ToString::to_string).collect();
            warn_once("CSS", &format!("unsupported selector '{}'", text.trim()));
            return None;
        };

        let mut tokens = body;
        tokens.push(CSSToken::EOF);
        let declarations = CSSParser::new(tokens).parse_declaration_list();
        Some(StyleRule {
            selectors,
            declarations,
        })
    }

    /// [§ 5.4.6 Consume a declaration](https://www.w3.org/TR/css-syntax-3/#consume-declaration)
    fn consume_declaration(&mut self, name: String) -> Option<Declaration> {
        self.skip_whitespace();
        if *self.peek() != CSSToken::Colon {
            warn_once("CSS", &format!("expected ':' after property '{name}'"));
            self.skip_to_semicolon();
            return None;
        }
        let _ = self.next_token();

        let mut value = Vec::new();
        loop {
            match self.peek() {
                CSSToken::Semicolon | CSSToken::EOF => break,
                _ => {
                    if let Some(component) = self.consume_component_value() {
                        value.push(component);
                    }
                }
            }
        }
        let _ = self.next_token();

        let important = matches!(
            value.as_slice(),
            [.., ComponentValue::Token(CSSToken::Delim('!')), ComponentValue::Token(CSSToken::Ident(word))]
                if word.eq_ignore_ascii_case("important")
        );
        if important {
            value.truncate(value.len() - 2);
        }

        Some(Declaration {
            name: name.to_ascii_lowercase(),
            value,
            important,
        })
    }

    /// [§ 5.4.7 Consume a component value](https://www.w3.org/TR/css-syntax-3/#consume-component-value)
    ///
    /// Whitespace yields `None`.
    fn consume_component_value(&mut self) -> Option<ComponentValue> {
        match self.next_token() {
            CSSToken::Whitespace => None,
            CSSToken::Function(name) => {
                let mut args = Vec::new();
                loop {
                    match self.peek() {
                        CSSToken::RightParen => {
                            let _ = self.next_token();
                            break;
                        }
                        CSSToken::EOF => break,
                        _ => {
                            if let Some(arg) = self.consume_component_value() {
                                args.push(arg);
                            }
                        }
                    }
                }
                Some(ComponentValue::Function { name, args })
            }
            token => Some(ComponentValue::Token(token)),
        }
    }
}

/// Parse a complete stylesheet from source text.
#[must_use]
pub fn parse_stylesheet(css: &str) -> Stylesheet {
    CSSParser::new(CSSTokenizer::tokenize(css)).parse_stylesheet()
}

/// Parse the contents of a `style` attribute or a rule body.
#[must_use]
pub fn parse_declarations(css: &str) -> Vec<Declaration> {
    CSSParser::new(CSSTokenizer::tokenize(css)).parse_declaration_list()
}
