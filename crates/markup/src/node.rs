//! The block and inline model produced by the segmenter.

/// Character-level style flags shared by every character of an [`InlineRun`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct RunStyle {
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    pub monospace: bool,
}

impl RunStyle {
    pub fn plain() -> Self {
        Self::default()
    }

    pub fn bold() -> Self {
        Self {
            bold: true,
            ..Self::default()
        }
    }

    pub fn italic() -> Self {
        Self {
            italic: true,
            ..Self::default()
        }
    }
}

/// A maximal span of text sharing one style combination and link target.
///
/// A `'\n'` inside `text` is a forced line break that keeps the style scope open.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineRun {
    pub text: String,
    pub style: RunStyle,
    /// Captured from `<a href>`; rendered decoratively, never as a live link.
    pub link: Option<String>,
}

impl InlineRun {
    pub fn new(text: impl Into<String>, style: RunStyle) -> Self {
        Self {
            text: text.into(),
            style,
            link: None,
        }
    }

    pub fn plain(text: impl Into<String>) -> Self {
        Self::new(text, RunStyle::plain())
    }

    pub fn is_link(&self) -> bool {
        self.link.is_some()
    }
}

/// Concatenated text of a run sequence, line breaks included.
pub fn runs_text(runs: &[InlineRun]) -> String {
    runs.iter().map(|r| r.text.as_str()).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListBlock {
    pub ordered: bool,
    pub items: Vec<ListItem>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    pub runs: Vec<InlineRun>,
    /// Lists nested inside this item, rendered after the item's own line.
    pub nested: Vec<ListBlock>,
}

impl ListItem {
    pub fn text(&self) -> String {
        runs_text(&self.runs)
    }
}

/// A block-level node. The set is closed: every consumer matches exhaustively.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentNode {
    Paragraph(Vec<InlineRun>),
    Heading { level: u8, text: String },
    List(ListBlock),
    Image { src: String, alt: String },
    /// Rows of trimmed cell texts, in source order.
    Table(Vec<Vec<String>>),
    Blockquote(Vec<InlineRun>),
    CodeBlock(String),
    LineBreak,
}

impl ContentNode {
    pub fn kind(&self) -> &'static str {
        match self {
            ContentNode::Paragraph(_) => "Paragraph",
            ContentNode::Heading { .. } => "Heading",
            ContentNode::List(_) => "List",
            ContentNode::Image { .. } => "Image",
            ContentNode::Table(_) => "Table",
            ContentNode::Blockquote(_) => "Blockquote",
            ContentNode::CodeBlock(_) => "CodeBlock",
            ContentNode::LineBreak => "LineBreak",
        }
    }
}
