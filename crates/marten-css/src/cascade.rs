//! The cascade.
//!
//! [§ 6.4 The cascade](https://www.w3.org/TR/CSS2/cascade.html#cascade)
//!
//! For each element: start from the inherited parent style, apply
//! presentational hints, then every matching rule in ascending specificity
//! order, then the `style` attribute. Rules of equal specificity apply in
//! source order (the sort is stable), so the later rule wins. Declarations
//! marked `!important` are applied after all normal ones, in the same order.

use std::collections::HashMap;

use marten_dom::{DomTree, ElementData, NodeId, NodeType};

use crate::hints::presentational_hints;
use crate::parser::{Declaration, StyleRule, Stylesheet, parse_declarations};
use crate::style::{ComputedStyle, apply_declaration};
use crate::ua_stylesheet::ua_stylesheet;

/// Resolved styles for every element of a document.
pub type StyleMap = HashMap<NodeId, ComputedStyle>;

/// A rule that matched the element being styled.
#[derive(Debug, Clone, Copy)]
struct MatchedRule<'a> {
    /// Highest specificity among the rule's matching selectors.
    specificity: u32,
    rule: &'a StyleRule,
}

/// Matches elements against an ordered set of stylesheets.
#[derive(Debug)]
pub struct StyleResolver<'a> {
    /// Rules of every sheet, in cascade source order.
    rules: Vec<&'a StyleRule>,
}

impl<'a> StyleResolver<'a> {
    /// Resolver over `sheets`; earlier sheets come first in source order.
    #[must_use]
    pub fn new(sheets: &[&'a Stylesheet]) -> Self {
        Self {
            rules: sheets.iter().flat_map(|s| s.rules.iter()).collect(),
        }
    }

    /// Rules whose selectors match the last element of `chain`, sorted by
    /// ascending specificity with source order kept among equals.
    fn matching_rules(&self, chain: &[&ElementData]) -> Vec<MatchedRule<'a>> {
        let mut matched: Vec<MatchedRule<'a>> = self
            .rules
            .iter()
            .filter_map(|&rule| {
                rule.selectors
                    .iter()
                    .filter(|s| s.matches(chain))
                    .map(|s| s.specificity)
                    .max()
                    .map(|specificity| MatchedRule { specificity, rule })
            })
            .collect();
        // `sort_by_key` is stable: equal specificity keeps source order.
        matched.sort_by_key(|m| m.specificity);
        matched
    }

    /// Resolve the style of the last element in `chain` (root first).
    #[must_use]
    pub fn resolve(&self, chain: &[&ElementData], parent: &ComputedStyle) -> ComputedStyle {
        let mut style = ComputedStyle::inherit_from(parent);
        let Some(element) = chain.last() else {
            return style;
        };

        let hints = presentational_hints(element);
        let matched = self.matching_rules(chain);
        let inline = element
            .attr("style")
            .map(parse_declarations)
            .unwrap_or_default();

        let ordered: Vec<&Declaration> = hints
            .iter()
            .chain(matched.iter().flat_map(|m| m.rule.declarations.iter()))
            .chain(inline.iter())
            .collect();

        for decl in ordered.iter().filter(|d| !d.important) {
            apply_declaration(&mut style, decl, parent);
        }
        for decl in ordered.iter().filter(|d| d.important) {
            apply_declaration(&mut style, decl, parent);
        }
        style
    }
}

/// Compute styles for every element under the document, using the user
/// agent stylesheet followed by `author`.
#[must_use]
pub fn compute_styles(tree: &DomTree, author: &Stylesheet) -> StyleMap {
    let resolver = StyleResolver::new(&[ua_stylesheet(), author]);
    let mut styles = StyleMap::new();
    let mut chain = Vec::new();
    compute_node_styles(
        tree,
        tree.root(),
        &resolver,
        &ComputedStyle::default(),
        &mut chain,
        &mut styles,
    );
    styles
}

/// Recursively compute styles for a node and its children.
fn compute_node_styles<'t>(
    tree: &'t DomTree,
    id: NodeId,
    resolver: &StyleResolver<'_>,
    inherited: &ComputedStyle,
    chain: &mut Vec<&'t ElementData>,
    styles: &mut StyleMap,
) {
    let Some(node) = tree.get(id) else { return };

    match &node.node_type {
        NodeType::Element(element) => {
            chain.push(element);
            let computed = resolver.resolve(chain, inherited);
            for &child in tree.children(id) {
                compute_node_styles(tree, child, resolver, &computed, chain, styles);
            }
            let _ = chain.pop();
            let _ = styles.insert(id, computed);
        }
        NodeType::Document => {
            for &child in tree.children(id) {
                compute_node_styles(tree, child, resolver, inherited, chain, styles);
            }
        }
        // Text takes its parent's style when boxes are built.
        NodeType::Text(_) | NodeType::Comment(_) => {}
    }
}

/// Collect the author stylesheet embedded in `style` elements.
///
/// `link` elements are reported and skipped; fetching is not part of the
/// layout core.
#[must_use]
pub fn document_stylesheet(tree: &DomTree) -> Stylesheet {
    let mut sheet = Stylesheet::default();
    for id in tree.descendants(tree.root()) {
        let Some(element) = tree.as_element(id) else {
            continue;
        };
        match element.tag_name.as_str() {
            "style" => sheet.extend(crate::parser::parse_stylesheet(&tree.text_content(id))),
            "link" if element
                .attr("rel")
                .is_some_and(|r| r.eq_ignore_ascii_case("stylesheet")) =>
            {
                marten_common::warning::warn_once(
                    "CSS",
                    &format!(
                        "external stylesheet '{}' not loaded",
                        element.attr("href").unwrap_or_default()
                    ),
                );
            }
            _ => {}
        }
    }
    sheet
}
