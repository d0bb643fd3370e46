//! Entity decoding and tag-vocabulary restriction.
//!
//! Editor output is parsed with the HTML5 algorithm, so unbalanced or
//! misnested markup is repaired rather than rejected. The parsed DOM is then
//! copied into an owned [`Markup`] tree that only knows the tags listed in
//! [`Tag`]; every other element is dropped and its children are spliced into
//! its parent, so the text survives.

use scraper::{ElementRef, Html, Node};
use std::borrow::Cow;

/// Typographic entities decoded ahead of parsing.
const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&nbsp;", "\u{a0}"),
    ("&ndash;", "\u{2013}"),
    ("&mdash;", "\u{2014}"),
    ("&ldquo;", "\u{201c}"),
    ("&rdquo;", "\u{201d}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&hellip;", "\u{2026}"),
];

/// Replaces the typographic named entities with their literal characters.
///
/// No replacement contains `&`, so the output never holds a new entity and a
/// second pass is a no-op. Input without any known entity is returned borrowed.
pub fn decode_entities(input: &str) -> Cow<'_, str> {
    if !input.contains('&') {
        return Cow::Borrowed(input);
    }

    let mut out = String::with_capacity(input.len());
    let mut rest = input;
    let mut changed = false;

    while let Some(pos) = rest.find('&') {
        out.push_str(&rest[..pos]);
        let tail = &rest[pos..];
        match NAMED_ENTITIES
            .iter()
            .find(|(name, _)| tail.starts_with(name))
        {
            Some((name, literal)) => {
                out.push_str(literal);
                rest = &tail[name.len()..];
                changed = true;
            }
            None => {
                out.push('&');
                rest = &tail[1..];
            }
        }
    }
    out.push_str(rest);

    if changed {
        Cow::Owned(out)
    } else {
        Cow::Borrowed(input)
    }
}

/// The closed tag vocabulary that survives normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    Heading(u8),
    Paragraph,
    Break,
    /// `strong` or `b`
    Strong,
    /// `em` or `i`
    Emphasis,
    Underline,
    Code,
    Anchor,
    Blockquote,
    Preformatted,
    UnorderedList,
    OrderedList,
    ListItem,
    Image,
    Div,
    Span,
    Table,
    TableRow,
    TableCell,
    TableHeader,
}

impl Tag {
    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name.to_ascii_lowercase().as_str() {
            "h1" => Tag::Heading(1),
            "h2" => Tag::Heading(2),
            "h3" => Tag::Heading(3),
            "h4" => Tag::Heading(4),
            "h5" => Tag::Heading(5),
            "h6" => Tag::Heading(6),
            "p" => Tag::Paragraph,
            "br" => Tag::Break,
            "strong" | "b" => Tag::Strong,
            "em" | "i" => Tag::Emphasis,
            "u" => Tag::Underline,
            "code" => Tag::Code,
            "a" => Tag::Anchor,
            "blockquote" => Tag::Blockquote,
            "pre" => Tag::Preformatted,
            "ul" => Tag::UnorderedList,
            "ol" => Tag::OrderedList,
            "li" => Tag::ListItem,
            "img" => Tag::Image,
            "div" => Tag::Div,
            "span" => Tag::Span,
            "table" => Tag::Table,
            "tr" => Tag::TableRow,
            "td" => Tag::TableCell,
            "th" => Tag::TableHeader,
            _ => return None,
        };
        Some(tag)
    }

    /// Tags that never have children.
    pub fn is_void(&self) -> bool {
        matches!(self, Tag::Break | Tag::Image)
    }
}

/// The attributes the renderer reads; everything else is discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    pub href: Option<String>,
    pub src: Option<String>,
    pub alt: Option<String>,
}

impl Attributes {
    fn from_element(element: ElementRef<'_>) -> Self {
        let value = element.value();
        let keep = |name: &str| value.attr(name).map(str::to_string);
        Self {
            href: keep("href"),
            src: keep("src"),
            alt: keep("alt"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct MarkupElement {
    pub tag: Tag,
    pub attrs: Attributes,
    pub children: Vec<MarkupNode>,
}

impl MarkupElement {
    /// Raw concatenated text of all descendants, whitespace untouched.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(MarkupElement),
    Text(String),
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(text) => out.push_str(text),
            MarkupNode::Element(el) => collect_text(&el.children, out),
        }
    }
}

/// A normalized markup fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Markup {
    pub nodes: Vec<MarkupNode>,
}

impl Markup {
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.nodes, &mut out);
        out
    }
}

/// Decodes entities, parses `html` as a body fragment, and restricts the
/// result to the [`Tag`] vocabulary.
pub fn normalize(html: &str) -> Markup {
    let decoded = decode_entities(html);
    let fragment = Html::parse_fragment(&decoded);
    let mut nodes = Vec::new();
    convert_children(fragment.root_element(), &mut nodes);
    Markup { nodes }
}

fn convert_children(parent: ElementRef<'_>, out: &mut Vec<MarkupNode>) {
    for child in parent.children() {
        match child.value() {
            Node::Text(text) => push_text(out, text),
            Node::Element(_) => {
                if let Some(element) = ElementRef::wrap(child) {
                    convert_element(element, out);
                }
            }
            _ => {}
        }
    }
}

fn convert_element(element: ElementRef<'_>, out: &mut Vec<MarkupNode>) {
    let name = element.value().name();
    match Tag::from_name(name) {
        Some(tag) => {
            let mut children = Vec::new();
            if !tag.is_void() {
                convert_children(element, &mut children);
            }
            out.push(MarkupNode::Element(MarkupElement {
                tag,
                attrs: Attributes::from_element(element),
                children,
            }));
        }
        None => {
            log::trace!("Stripping <{}>, keeping its content", name);
            convert_children(element, out);
        }
    }
}

/// Appends text, merging with a preceding text node left behind by a stripped tag.
fn push_text(out: &mut Vec<MarkupNode>, text: &str) {
    if text.is_empty() {
        return;
    }
    if let Some(MarkupNode::Text(prev)) = out.last_mut() {
        prev.push_str(text);
    } else {
        out.push(MarkupNode::Text(text.to_string()));
    }
}
