//! HTML document tree

use ego_tree::NodeRef;
use regex::{Regex, RegexBuilder};
use scraper::Html;
use std::collections::HashMap;

/// A node in the markup tree
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MarkupNode {
    Document { children: Vec<MarkupNode> },
    Element(Element),
    Text(String),
    Comment(String),
    Doctype(String),
}

impl MarkupNode {
    /// Node kind (e.g., "element", "text", "comment")
    pub fn kind(&self) -> &'static str {
        match self {
            MarkupNode::Document { .. } => "document",
            MarkupNode::Element(_) => "element",
            MarkupNode::Text(_) => "text",
            MarkupNode::Comment(_) => "comment",
            MarkupNode::Doctype(_) => "doctype",
        }
    }

    pub fn children(&self) -> &[MarkupNode] {
        match self {
            MarkupNode::Document { children } => children,
            MarkupNode::Element(element) => &element.children,
            _ => &[],
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            _ => None,
        }
    }
}

/// An element node
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attributes: HashMap<String, String>,
    pub children: Vec<MarkupNode>,
    /// Byte offset of `<name` in the source text
    pub offset: Option<usize>,
}

impl Element {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn with_attribute(mut self, key: &str, value: &str) -> Self {
        self.attributes.insert(key.to_string(), value.to_string());
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_child(mut self, child: MarkupNode) -> Self {
        self.children.push(child);
        self
    }

    /// Tag name comparison, ignoring ASCII case
    pub fn is(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// Check for an attribute.
    ///
    /// The HTML tokenizer lowercases attribute names, so `htmlFor` is also
    /// looked up as `htmlfor`.
    pub fn has_attribute(&self, key: &str) -> bool {
        self.attributes.contains_key(key)
            || self.attributes.contains_key(key.to_ascii_lowercase().as_str())
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.attributes
            .get(key)
            .or_else(|| self.attributes.get(key.to_ascii_lowercase().as_str()))
            .map(String::as_str)
    }
}

/// A parsed HTML document
#[derive(Debug, Clone)]
pub struct HtmlDocument {
    root: MarkupNode,
}

impl HtmlDocument {
    /// Parse markup. Malformed input is recovered, never rejected.
    pub fn parse(content: &str) -> Self {
        let html = Html::parse_document(content);
        if !html.errors.is_empty() {
            log::debug!("html parser recovered from {} error(s)", html.errors.len());
            for error in &html.errors {
                log::trace!("html parse error: {}", error);
            }
        }

        let mut locator = TagLocator::new(content);
        let children = build_children(html.tree.root(), &mut locator, 0);
        Self {
            root: MarkupNode::Document { children },
        }
    }

    /// Wrap an already-built tree
    pub fn from_root(root: MarkupNode) -> Self {
        Self { root }
    }

    pub fn root(&self) -> &MarkupNode {
        &self.root
    }

    /// Iterate over all nodes, depth-first in document order
    pub fn iter(&self) -> impl Iterator<Item = &MarkupNode> + '_ {
        let mut stack = vec![&self.root];
        std::iter::from_fn(move || {
            let node = stack.pop()?;
            stack.extend(node.children().iter().rev());
            Some(node)
        })
    }

    /// Iterate over element nodes in document order
    pub fn elements(&self) -> impl Iterator<Item = &Element> + '_ {
        self.iter().filter_map(MarkupNode::as_element)
    }
}

/// Elements nested deeper than this are attached flat at this level
pub const MAX_NESTING: usize = 256;

/// Elements whose content the tokenizer reads as text, not markup
const RAW_TEXT_ELEMENTS: &[&str] = &[
    "script", "style", "textarea", "title", "xmp", "iframe", "noembed", "noframes",
];

fn build_children(
    parent: NodeRef<'_, scraper::Node>,
    locator: &mut TagLocator<'_>,
    depth: usize,
) -> Vec<MarkupNode> {
    if depth >= MAX_NESTING {
        log::debug!("markup nested deeper than {} levels, flattening", MAX_NESTING);
        return flatten_descendants(parent, locator);
    }

    let mut nodes = Vec::new();

    for child in parent.children() {
        match child.value() {
            scraper::Node::Element(el) => match locator.locate(el.name()) {
                Some(offset) => {
                    let mut element = element_from(el, offset);
                    element.children = build_children(child, locator, depth + 1);
                    nodes.push(MarkupNode::Element(element));
                }
                None => {
                    // Implied by the parser, not present in the source
                    log::trace!("splicing implied <{}> element", el.name());
                    nodes.extend(build_children(child, locator, depth + 1));
                }
            },
            other => nodes.extend(leaf_node(other)),
        }
    }

    nodes
}

/// Every descendant of `parent`, in document order, as childless nodes
fn flatten_descendants(
    parent: NodeRef<'_, scraper::Node>,
    locator: &mut TagLocator<'_>,
) -> Vec<MarkupNode> {
    parent
        .descendants()
        .skip(1)
        .filter_map(|node| match node.value() {
            scraper::Node::Element(el) => locator
                .locate(el.name())
                .map(|offset| MarkupNode::Element(element_from(el, offset))),
            other => leaf_node(other),
        })
        .collect()
}

fn element_from(el: &scraper::node::Element, offset: usize) -> Element {
    Element {
        name: el.name().to_string(),
        attributes: el
            .attrs()
            .map(|(key, value)| (key.to_string(), value.to_string()))
            .collect(),
        children: Vec::new(),
        offset: Some(offset),
    }
}

fn leaf_node(value: &scraper::Node) -> Option<MarkupNode> {
    match value {
        scraper::Node::Text(text) => Some(MarkupNode::Text(text.text.to_string())),
        scraper::Node::Comment(comment) => Some(MarkupNode::Comment(comment.comment.to_string())),
        scraper::Node::Doctype(doctype) => Some(MarkupNode::Doctype(doctype.name().to_string())),
        _ => None,
    }
}

/// Recovers source offsets of elements from the raw text.
///
/// Elements are located in document order, so a forward-moving cursor keeps
/// repeated tags matched to their own occurrence.
struct TagLocator<'a> {
    source: &'a str,
    cursor: usize,
    /// Sorted, disjoint ranges where `<name` is not a tag
    hidden: Vec<(usize, usize)>,
    patterns: HashMap<String, Option<Regex>>,
}

impl<'a> TagLocator<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            source,
            cursor: 0,
            hidden: hidden_spans(source),
            patterns: HashMap::new(),
        }
    }

    fn locate(&mut self, name: &str) -> Option<usize> {
        let key = name.to_ascii_lowercase();
        let re = self
            .patterns
            .entry(key)
            .or_insert_with(|| {
                RegexBuilder::new(&format!(r"<{}(?:[\s/>]|\z)", regex::escape(name)))
                    .case_insensitive(true)
                    .build()
                    .ok()
            })
            .as_ref()?;

        let source = self.source;
        let hidden = &self.hidden;
        let first_from = |start: usize| {
            let mut at = start;
            while let Some(m) = re.find_at(source, at) {
                if !is_hidden(hidden, m.start()) {
                    return Some(m.start());
                }
                at = m.start() + 1;
            }
            None
        };

        if let Some(offset) = first_from(self.cursor) {
            self.cursor = offset + 1;
            return Some(offset);
        }

        // Reordered by the tree builder (e.g., foster parenting)
        first_from(0)
    }
}

fn is_hidden(hidden: &[(usize, usize)], pos: usize) -> bool {
    let idx = hidden.partition_point(|&(start, _)| start <= pos);
    idx > 0 && pos < hidden[idx - 1].1
}

/// Ranges of the source where tag-like text is not markup: comments, quoted
/// attribute values and the bodies of raw-text elements.
fn hidden_spans(source: &str) -> Vec<(usize, usize)> {
    let lower = source.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let len = lower.len();
    let mut spans = Vec::new();
    let mut at = 0;

    while let Some(found) = lower[at..].find('<') {
        let start = at + found;
        let rest = &lower[start..];

        if rest.starts_with("<!--") {
            let end = rest[4..].find("-->").map_or(len, |e| start + 4 + e + 3);
            spans.push((start, end));
            at = end;
            continue;
        }

        let name: String = rest[1..]
            .chars()
            .take_while(|c| c.is_ascii_alphanumeric())
            .collect();
        if !name.starts_with(|c: char| c.is_ascii_alphabetic()) {
            at = start + 1;
            continue;
        }

        // Start tag: quoted values run to the matching quote, `>` ends the tag
        let mut pos = start + 1 + name.len();
        let mut tag_end = len;
        let mut after_equals = false;
        while pos < len {
            match bytes[pos] {
                b'>' => {
                    tag_end = pos + 1;
                    break;
                }
                quote @ (b'"' | b'\'') if after_equals => {
                    let close = lower[pos + 1..]
                        .find(quote as char)
                        .map_or(len, |e| pos + 1 + e);
                    spans.push((pos, (close + 1).min(len)));
                    pos = close + 1;
                    after_equals = false;
                }
                b'=' => {
                    after_equals = true;
                    pos += 1;
                }
                b if b.is_ascii_whitespace() => pos += 1,
                _ => {
                    after_equals = false;
                    pos += 1;
                }
            }
        }

        at = tag_end;
        if tag_end < len && RAW_TEXT_ELEMENTS.contains(&name.as_str()) {
            let body_end = lower[tag_end..]
                .find(&format!("</{}", name))
                .map_or(len, |e| tag_end + e);
            spans.push((tag_end, body_end));
            at = body_end;
        }
    }

    spans
}
