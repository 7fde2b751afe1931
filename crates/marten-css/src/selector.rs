//! Selector parsing and matching.
//!
//! The resolver understands [CSS 2.1 § 5](https://www.w3.org/TR/CSS2/selector.html)
//! type, universal, class and ID selectors, compounds of those, and the
//! descendant combinator. Any other combinator, pseudo-class or attribute
//! selector makes the whole selector list unsupported.

use marten_dom::ElementData;

use crate::tokenizer::CSSToken;

/// Weight of a matched element name.
pub const ELEMENT_WEIGHT: u32 = 1;
/// Weight of each matched class.
pub const CLASS_WEIGHT: u32 = 0x100;
/// Weight of a matched id.
pub const ID_WEIGHT: u32 = 0x10000;

/// One compound selector such as `p.note#intro`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompoundSelector {
    /// Element name; `None` for `*` or an omitted type selector.
    pub element: Option<String>,
    /// Required classes.
    pub classes: Vec<String>,
    /// Required id.
    pub id: Option<String>,
}

impl CompoundSelector {
    /// Whether `element` satisfies every part of this compound.
    #[must_use]
    pub fn matches(&self, element: &ElementData) -> bool {
        if let Some(name) = &self.element
            && !name.eq_ignore_ascii_case(&element.tag_name)
        {
            return false;
        }
        if let Some(id) = &self.id
            && element.id() != Some(id.as_str())
        {
            return false;
        }
        if self.classes.is_empty() {
            return true;
        }
        let classes = element.classes();
        self.classes.iter().all(|c| classes.contains(&c.as_str()))
    }

    /// Contribution of this compound to the rule specificity.
    #[must_use]
    pub fn specificity(&self) -> u32 {
        let element = if self.element.is_some() { ELEMENT_WEIGHT } else { 0 };
        let classes = CLASS_WEIGHT * self.classes.len() as u32;
        let id = if self.id.is_some() { ID_WEIGHT } else { 0 };
        element + classes + id
    }
}

/// A chain of compounds joined by descendant combinators, outermost first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selector {
    /// Compounds from the outermost ancestor to the subject.
    pub components: Vec<CompoundSelector>,
    /// Sum of the component specificities.
    pub specificity: u32,
}

impl Selector {
    /// Build a selector and compute its specificity.
    #[must_use]
    pub fn new(components: Vec<CompoundSelector>) -> Self {
        let specificity = components.iter().map(CompoundSelector::specificity).sum();
        Self {
            components,
            specificity,
        }
    }

    /// Match against an element chain ordered root first, subject last.
    ///
    /// The last component must match the subject. Each earlier component,
    /// walking backwards, must match some ancestor above the one matched
    /// by the component after it; non-matching ancestors are skipped.
    #[must_use]
    pub fn matches(&self, chain: &[&ElementData]) -> bool {
        let Some((subject_rule, ancestor_rules)) = self.components.split_last() else {
            return false;
        };
        let Some((subject, mut ancestors)) = chain.split_last() else {
            return false;
        };
        if !subject_rule.matches(subject) {
            return false;
        }
        for rule in ancestor_rules.iter().rev() {
            loop {
                let Some((candidate, rest)) = ancestors.split_last() else {
                    return false;
                };
                ancestors = rest;
                if rule.matches(candidate) {
                    break;
                }
            }
        }
        true
    }
}

/// Parse a comma-separated selector list from a rule prelude.
///
/// Returns `None` if any selector in the list is unsupported or empty.
#[must_use]
pub fn parse_selector_list(prelude: &[CSSToken]) -> Option<Vec<Selector>> {
    prelude
        .split(|t| *t == CSSToken::Comma)
        .map(parse_selector)
        .collect()
}

/// Parse one complex selector.
#[must_use]
pub fn parse_selector(tokens: &[CSSToken]) -> Option<Selector> {
    let mut components = Vec::new();
    let mut current: Option<CompoundSelector> = None;
    let mut iter = tokens.iter().peekable();

    while let Some(token) = iter.next() {
        match token {
            CSSToken::Whitespace => {
                if let Some(compound) = current.take() {
                    components.push(compound);
                }
            }
            CSSToken::Ident(name) => {
                let compound = current.get_or_insert_with(CompoundSelector::default);
                // A type selector can only start a compound.
                if compound.element.is_some() || !compound.classes.is_empty() || compound.id.is_some() {
                    return None;
                }
                compound.element = Some(name.to_ascii_lowercase());
            }
            CSSToken::Delim('*') => {
                let _ = current.get_or_insert_with(CompoundSelector::default);
            }
            CSSToken::Delim('.') => {
                let Some(CSSToken::Ident(class)) = iter.next() else {
                    return None;
                };
                current
                    .get_or_insert_with(CompoundSelector::default)
                    .classes
                    .push(class.clone());
            }
            CSSToken::Hash(id) => {
                let compound = current.get_or_insert_with(CompoundSelector::default);
                if compound.id.is_some() {
                    return None;
                }
                compound.id = Some(id.clone());
            }
            _ => return None,
        }
    }
    if let Some(compound) = current {
        components.push(compound);
    }
    if components.is_empty() {
        return None;
    }
    Some(Selector::new(components))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tokenizer::CSSTokenizer;

    fn selector(text: &str) -> Option<Selector> {
        let mut tokens = CSSTokenizer::tokenize(text);
        let _ = tokens.pop();
        parse_selector(&tokens)
    }

    #[test]
    fn test_specificity_weights() {
        assert_eq!(selector("p").unwrap().specificity, 1);
        assert_eq!(selector("p.foo").unwrap().specificity, 0x101);
        assert_eq!(selector("#x").unwrap().specificity, 0x10000);
        assert_eq!(selector("div p.a.b").unwrap().specificity, 0x202);
        assert_eq!(selector("*").unwrap().specificity, 0);
    }

    #[test]
    fn test_unsupported_combinators_rejected() {
        assert!(selector("div > p").is_none());
        assert!(selector("a:hover").is_none());
        assert!(selector("input[type]").is_none());
        assert!(selector("h1 + p").is_none());
    }

    #[test]
    fn test_leading_and_trailing_whitespace() {
        let s = selector("  ul   li ").unwrap();
        assert_eq!(s.components.len(), 2);
    }
}
