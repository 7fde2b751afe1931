//! Pull-parser driven tree construction.

use std::fmt::Write as _;

use marten_common::warning::warn_once;
use marten_dom::{AttributesMap, DomTree, ElementData, NodeId, NodeType};
use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;
use thiserror::Error;

use crate::entities;

/// Markup the reader could not recover from.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The underlying reader rejected the input.
    #[error("malformed markup near byte {position}: {source}")]
    Syntax {
        /// Byte offset the reader had reached.
        position: u64,
        /// What went wrong.
        #[source]
        source: quick_xml::Error,
    },
}

/// [§ 13.1.2 Elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
///
/// "Void elements: area, base, br, col, embed, hr, img, input, link, meta,
/// source, track, wbr"
const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param",
    "source", "track", "wbr",
];

/// Start tags that close an open `p` element.
const CLOSES_P: &[&str] = &[
    "address", "blockquote", "div", "dl", "fieldset", "form", "h1", "h2", "h3", "h4", "h5",
    "h6", "hr", "ol", "p", "pre", "table", "ul",
];

/// Parse `markup` into a fresh element tree.
///
/// # Errors
/// Returns [`ParseError::Syntax`] when the reader hits markup it cannot
/// tokenize at all (for example an unterminated tag).
pub fn parse(markup: &str) -> Result<DomTree, ParseError> {
    let mut reader = Reader::from_reader(markup.as_bytes());
    let config = reader.config_mut();
    config.trim_text(false);
    config.check_end_names = false;

    let mut builder = TreeBuilder::new();
    let mut buf = Vec::new();
    loop {
        let event = reader
            .read_event_into(&mut buf)
            .map_err(|err| syntax(&reader, err))?;
        match event {
            Event::Start(e) => {
                let (tag, attrs) = element(&reader, &e)?;
                builder.start(tag, attrs, false);
            }
            Event::Empty(e) => {
                let (tag, attrs) = element(&reader, &e)?;
                builder.start(tag, attrs, true);
            }
            Event::End(e) => {
                let tag = tag_name(&reader, e.name().as_ref())?;
                builder.end(&tag);
            }
            Event::Text(e) => {
                let text = e.decode().map_err(|err| syntax(&reader, err))?;
                builder.text.push_str(&text);
            }
            Event::CData(e) => {
                let text = reader
                    .decoder()
                    .decode(&e)
                    .map_err(|err| syntax(&reader, err))?;
                builder.text.push_str(&text);
            }
            Event::GeneralRef(e) => {
                let name = e.decode().map_err(|err| syntax(&reader, err))?;
                match entities::resolve(&name) {
                    Some(c) => builder.text.push(c),
                    None => {
                        warn_once("HTML", &format!("unknown character reference '&{name};'"));
                        let _ = write!(builder.text, "&{name};");
                    }
                }
            }
            Event::Comment(e) => {
                let text = e.decode().map_err(|err| syntax(&reader, err))?;
                builder.comment(text.into_owned());
            }
            Event::Eof => break,
            _ => {}
        }
        buf.clear();
    }
    builder.flush_text();
    Ok(builder.tree)
}

fn syntax(reader: &Reader<&[u8]>, err: impl Into<quick_xml::Error>) -> ParseError {
    ParseError::Syntax {
        position: reader.buffer_position(),
        source: err.into(),
    }
}

fn tag_name(reader: &Reader<&[u8]>, raw: &[u8]) -> Result<String, ParseError> {
    let decoded = reader.decoder().decode(raw).map_err(|err| syntax(reader, err))?;
    let local = decoded.rsplit(':').next().unwrap_or(decoded.as_ref());
    Ok(local.to_ascii_lowercase())
}

fn element(
    reader: &Reader<&[u8]>,
    e: &BytesStart<'_>,
) -> Result<(String, AttributesMap), ParseError> {
    let tag = tag_name(reader, e.name().as_ref())?;
    let mut attrs = AttributesMap::new();
    for attr in e.html_attributes().flatten() {
        let Ok(key) = reader.decoder().decode(attr.key.as_ref()) else {
            continue;
        };
        let Ok(value) = reader.decoder().decode(&attr.value) else {
            continue;
        };
        // First occurrence wins, as in HTML.
        let _ = attrs
            .entry(key.to_ascii_lowercase())
            .or_insert_with(|| entities::unescape(&value));
    }
    Ok((tag, attrs))
}

/// Tree construction state: the open element stack plus pending text.
struct TreeBuilder {
    tree: DomTree,
    open: Vec<(NodeId, String)>,
    text: String,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            tree: DomTree::new(),
            open: vec![(NodeId::ROOT, String::new())],
            text: String::new(),
        }
    }

    fn current(&self) -> NodeId {
        self.open.last().map_or(NodeId::ROOT, |(id, _)| *id)
    }

    fn flush_text(&mut self) {
        if self.text.is_empty() {
            return;
        }
        let text = std::mem::take(&mut self.text);
        let _ = self.tree.append_new(self.current(), NodeType::Text(text));
    }

    fn comment(&mut self, text: String) {
        self.flush_text();
        let _ = self.tree.append_new(self.current(), NodeType::Comment(text));
    }

    fn start(&mut self, tag_name: String, attrs: AttributesMap, self_closing: bool) {
        self.flush_text();
        self.close_implied(&tag_name);
        let void = self_closing || VOID_ELEMENTS.contains(&tag_name.as_str());
        let id = self.tree.append_new(
            self.current(),
            NodeType::Element(ElementData {
                tag_name: tag_name.clone(),
                attrs,
            }),
        );
        if !void {
            self.open.push((id, tag_name));
        }
    }

    fn end(&mut self, tag: &str) {
        self.flush_text();
        if VOID_ELEMENTS.contains(&tag) {
            return;
        }
        match self.open.iter().rposition(|(_, open)| open == tag) {
            Some(0) | None => warn_once("HTML", &format!("ignoring stray end tag </{tag}>")),
            Some(index) => self.open.truncate(index),
        }
    }

    /// Pop to and including the nearest open element in `targets`, unless
    /// an element in `boundary` is reached first.
    fn close_nearest(&mut self, targets: &[&str], boundary: &[&str]) {
        for index in (1..self.open.len()).rev() {
            let name = self.open[index].1.as_str();
            if targets.contains(&name) {
                self.open.truncate(index);
                return;
            }
            if boundary.contains(&name) {
                return;
            }
        }
    }

    /// [§ 13.1.2.4 Optional tags](https://html.spec.whatwg.org/multipage/syntax.html#optional-tags)
    fn close_implied(&mut self, tag: &str) {
        match tag {
            t if CLOSES_P.contains(&t) => {
                self.close_nearest(&["p"], &["div", "td", "th", "li", "table", "form", "body"]);
            }
            "li" => self.close_nearest(&["li"], &["ul", "ol"]),
            "option" => self.close_nearest(&["option"], &["select"]),
            "td" | "th" => self.close_nearest(&["td", "th"], &["tr", "table"]),
            "tr" => self.close_nearest(&["tr"], &["tbody", "thead", "tfoot", "table"]),
            "tbody" | "thead" | "tfoot" => {
                self.close_nearest(&["tbody", "thead", "tfoot"], &["table"]);
            }
            _ => {}
        }
    }
}

/// Render the subtree at `id` as an indented outline, one node per line.
#[must_use]
pub fn dump_tree(tree: &DomTree, id: NodeId) -> String {
    let mut out = String::new();
    let mut stack = vec![(id, 0usize)];
    while let Some((node, depth)) = stack.pop() {
        let prefix = "  ".repeat(depth);
        let Some(data) = tree.get(node) else { continue };
        let _ = match &data.node_type {
            NodeType::Document => writeln!(out, "{prefix}Document"),
            NodeType::Element(element) => {
                let mut attrs: Vec<String> = element
                    .attrs
                    .iter()
                    .map(|(k, v)| {
                        if v.is_empty() {
                            k.clone()
                        } else {
                            format!("{k}=\"{v}\"")
                        }
                    })
                    .collect();
                attrs.sort();
                if attrs.is_empty() {
                    writeln!(out, "{prefix}<{}>", element.tag_name)
                } else {
                    writeln!(out, "{prefix}<{} {}>", element.tag_name, attrs.join(" "))
                }
            }
            NodeType::Text(text) => {
                let trimmed = text.trim();
                if trimmed.is_empty() {
                    continue;
                }
                writeln!(out, "{prefix}\"{trimmed}\"")
            }
            NodeType::Comment(text) => writeln!(out, "{prefix}<!-- {text} -->"),
        };
        stack.extend(tree.children(node).iter().rev().map(|&c| (c, depth + 1)));
    }
    out
}
