//! Tests for the CSS tokenizer and parser.

use marten_css::{CSSToken, CSSTokenizer, ComponentValue, parse_declarations, parse_stylesheet};

#[test]
fn test_tokenize_rule() {
    let tokens = CSSTokenizer::tokenize("p.a#b{width:12.5px;margin:-3%}");
    assert_eq!(
        tokens,
        vec![
            CSSToken::Ident("p".into()),
            CSSToken::Delim('.'),
            CSSToken::Ident("a".into()),
            CSSToken::Hash("b".into()),
            CSSToken::LeftBrace,
            CSSToken::Ident("width".into()),
            CSSToken::Colon,
            CSSToken::Dimension {
                value: 12.5,
                unit: "px".into()
            },
            CSSToken::Semicolon,
            CSSToken::Ident("margin".into()),
            CSSToken::Colon,
            CSSToken::Percentage(-3.0),
            CSSToken::RightBrace,
            CSSToken::EOF,
        ]
    );
}

#[test]
fn test_comments_and_strings() {
    let tokens = CSSTokenizer::tokenize("/* x */a/**/'it\\'s'");
    assert_eq!(
        tokens,
        vec![
            CSSToken::Ident("a".into()),
            CSSToken::String("it's".into()),
            CSSToken::EOF
        ]
    );
}

#[test]
fn test_hash_with_digits_and_functions() {
    let tokens = CSSTokenizer::tokenize("#333 rgb(1,2,3) .5em");
    assert_eq!(tokens[0], CSSToken::Hash("333".into()));
    assert_eq!(tokens[2], CSSToken::Function("rgb".into()));
    assert_eq!(
        tokens[tokens.len() - 2],
        CSSToken::Dimension {
            value: 0.5,
            unit: "em".into()
        }
    );
}

#[test]
fn test_declarations_and_important() {
    let decls = parse_declarations("Color: red ! important; ; width : 3px; bogus; 12: x");
    assert_eq!(decls.len(), 2);
    assert_eq!(decls[0].name, "color");
    assert!(decls[0].important);
    assert_eq!(decls[0].value.len(), 1);
    assert_eq!(decls[1].name, "width");
    assert!(!decls[1].important);
}

#[test]
fn test_function_arguments_grouped() {
    let decls = parse_declarations("color: rgb(10, 20, 30)");
    let [ComponentValue::Function { name, args }] = decls[0].value.as_slice() else {
        panic!("expected one function value");
    };
    assert_eq!(name, "rgb");
    assert_eq!(args.len(), 5);
}

#[test]
fn test_at_rules_skipped() {
    let sheet = parse_stylesheet(
        "@import url(x.css); @media print { p { color: red } } h1, h2 { color: blue }",
    );
    assert_eq!(sheet.rules.len(), 1);
    assert_eq!(sheet.rules[0].selectors.len(), 2);
}

#[test]
fn test_unterminated_rule_dropped() {
    let sheet = parse_stylesheet("p { color: red } div");
    assert_eq!(sheet.rules.len(), 1);
}
