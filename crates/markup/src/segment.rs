//! The single walk from normalized markup to [`ContentNode`] blocks.

use crate::inline::{collapse_whitespace, InlineFormatter};
use crate::node::{runs_text, ContentNode, InlineRun, ListBlock, ListItem};
use crate::normalize::{Markup, MarkupElement, MarkupNode, Tag};

/// Splits `markup` into ordered block nodes.
pub fn segment(markup: &Markup) -> Vec<ContentNode> {
    let mut segmenter = Segmenter::default();
    segmenter.walk(&markup.nodes);
    segmenter.finish()
}

#[derive(Default)]
struct Segmenter {
    blocks: Vec<ContentNode>,
    inline: InlineFormatter,
}

impl Segmenter {
    fn walk(&mut self, nodes: &[MarkupNode]) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => self.inline.push_text(text),
                MarkupNode::Element(el) => self.visit(el),
            }
        }
    }

    fn visit(&mut self, el: &MarkupElement) {
        match el.tag {
            Tag::Heading(level) => {
                self.flush();
                let text = collapse_whitespace(&el.text_content());
                if !text.is_empty() {
                    self.blocks.push(ContentNode::Heading { level, text });
                }
            }
            Tag::Paragraph
            | Tag::Div
            | Tag::ListItem
            | Tag::TableRow
            | Tag::TableCell
            | Tag::TableHeader => {
                self.flush();
                self.walk(&el.children);
                self.flush();
            }
            Tag::Break => {
                if self.inline.has_content() {
                    self.inline.line_break();
                } else {
                    self.inline.take_runs();
                    self.blocks.push(ContentNode::LineBreak);
                }
            }
            Tag::Strong | Tag::Emphasis | Tag::Underline | Tag::Code | Tag::Anchor | Tag::Span => {
                let scope = self.inline.enter(el.tag, el.attrs.href.as_deref());
                self.walk(&el.children);
                self.inline.restore(scope);
            }
            Tag::Image => {
                self.flush();
                self.blocks.push(ContentNode::Image {
                    src: attr_text(el.attrs.src.as_deref()),
                    alt: attr_text(el.attrs.alt.as_deref()),
                });
            }
            Tag::UnorderedList | Tag::OrderedList => {
                self.flush();
                self.blocks.push(ContentNode::List(build_list(el)));
            }
            Tag::Table => {
                self.flush();
                let rows = table_rows(el);
                if rows.is_empty() {
                    log::debug!("Dropping table without cells");
                } else {
                    self.blocks.push(ContentNode::Table(rows));
                }
            }
            Tag::Blockquote => {
                self.flush();
                let (runs, _) = Flattener::quote().run(&el.children);
                if !runs.is_empty() {
                    self.blocks.push(ContentNode::Blockquote(runs));
                }
            }
            Tag::Preformatted => {
                self.flush();
                let text = preformatted_text(el);
                if !text.trim().is_empty() {
                    self.blocks.push(ContentNode::CodeBlock(text));
                }
            }
        }
    }

    fn flush(&mut self) {
        let runs = self.inline.take_runs();
        if !runs.is_empty() {
            self.blocks.push(ContentNode::Paragraph(runs));
        }
    }

    fn finish(mut self) -> Vec<ContentNode> {
        self.flush();
        self.blocks
    }
}

fn attr_text(value: Option<&str>) -> String {
    value.map(str::trim).unwrap_or_default().to_string()
}

fn preformatted_text(el: &MarkupElement) -> String {
    let raw = el.text_content();
    let body = raw
        .strip_prefix("\r\n")
        .or_else(|| raw.strip_prefix('\n'))
        .unwrap_or(&raw);
    body.trim_end().to_string()
}

fn build_list(el: &MarkupElement) -> ListBlock {
    let mut items: Vec<ListItem> = Vec::new();
    for child in &el.children {
        match child {
            MarkupNode::Element(li) if li.tag == Tag::ListItem => {
                let (runs, nested) = Flattener::list_item().run(&li.children);
                items.push(ListItem { runs, nested });
            }
            MarkupNode::Element(inner)
                if matches!(inner.tag, Tag::UnorderedList | Tag::OrderedList) =>
            {
                // A list directly inside a list belongs to the preceding item.
                let list = build_list(inner);
                match items.last_mut() {
                    Some(item) => item.nested.push(list),
                    None => items.push(ListItem {
                        runs: Vec::new(),
                        nested: vec![list],
                    }),
                }
            }
            other => {
                let (runs, nested) = Flattener::list_item().run(std::slice::from_ref(other));
                if !runs.is_empty() || !nested.is_empty() {
                    items.push(ListItem { runs, nested });
                }
            }
        }
    }
    ListBlock {
        ordered: el.tag == Tag::OrderedList,
        items,
    }
}

fn table_rows(table: &MarkupElement) -> Vec<Vec<String>> {
    let mut rows = Vec::new();
    collect_rows(&table.children, &mut rows);
    rows
}

fn collect_rows(nodes: &[MarkupNode], rows: &mut Vec<Vec<String>>) {
    for node in nodes {
        let MarkupNode::Element(el) = node else {
            continue;
        };
        match el.tag {
            Tag::TableRow => {
                if let Some(cells) = row_cells(el) {
                    rows.push(cells);
                }
            }
            // Nested tables are only reachable through a cell's text.
            Tag::Table => {}
            _ => collect_rows(&el.children, rows),
        }
    }
}

fn row_cells(row: &MarkupElement) -> Option<Vec<String>> {
    let cells_of = |tag: Tag| -> Vec<String> {
        row.children
            .iter()
            .filter_map(|n| match n {
                MarkupNode::Element(cell) if cell.tag == tag => Some(cell_text(cell)),
                _ => None,
            })
            .collect()
    };

    let data = cells_of(Tag::TableCell);
    let cells = if data.is_empty() {
        cells_of(Tag::TableHeader)
    } else {
        data
    };
    (!cells.is_empty()).then_some(cells)
}

/// Plain text of a cell. Images become the same placeholders as in flattened
/// blocks.
fn cell_text(cell: &MarkupElement) -> String {
    let (runs, _) = Flattener::quote().run(&cell.children);
    collapse_whitespace(&runs_text(&runs))
}

/// Collapses block content into one run sequence, separating block-level
/// children with line breaks.
struct Flattener {
    inline: InlineFormatter,
    nested: Vec<ListBlock>,
    lift_lists: bool,
}

impl Flattener {
    /// Nested lists are lifted out into the item.
    fn list_item() -> Self {
        Self {
            inline: InlineFormatter::new(),
            nested: Vec::new(),
            lift_lists: true,
        }
    }

    fn quote() -> Self {
        Self {
            inline: InlineFormatter::new(),
            nested: Vec::new(),
            lift_lists: false,
        }
    }

    fn run(mut self, nodes: &[MarkupNode]) -> (Vec<InlineRun>, Vec<ListBlock>) {
        self.walk(nodes);
        (self.inline.take_runs(), self.nested)
    }

    fn walk(&mut self, nodes: &[MarkupNode]) {
        for node in nodes {
            match node {
                MarkupNode::Text(text) => self.inline.push_text(text),
                MarkupNode::Element(el) => self.visit(el),
            }
        }
    }

    fn visit(&mut self, el: &MarkupElement) {
        match el.tag {
            Tag::Strong | Tag::Emphasis | Tag::Underline | Tag::Code | Tag::Anchor | Tag::Span => {
                let scope = self.inline.enter(el.tag, el.attrs.href.as_deref());
                self.walk(&el.children);
                self.inline.restore(scope);
            }
            Tag::Break => self.inline.line_break(),
            Tag::Image => {
                let alt = attr_text(el.attrs.alt.as_deref());
                self.inline.push_text(" ");
                if alt.is_empty() {
                    self.inline.push_text("[Image]");
                } else {
                    self.inline.push_text(&format!("[Image: {}]", alt));
                }
                self.inline.push_text(" ");
            }
            Tag::UnorderedList | Tag::OrderedList if self.lift_lists => {
                self.nested.push(build_list(el));
            }
            Tag::TableCell | Tag::TableHeader => {
                self.inline.push_text(" ");
                self.walk(&el.children);
                self.inline.push_text(" ");
            }
            Tag::Heading(_) => {
                self.inline.soft_break();
                let scope = self.inline.enter(el.tag, None);
                self.walk(&el.children);
                self.inline.restore(scope);
                self.inline.soft_break();
            }
            Tag::Paragraph
            | Tag::Div
            | Tag::Blockquote
            | Tag::Preformatted
            | Tag::UnorderedList
            | Tag::OrderedList
            | Tag::ListItem
            | Tag::Table
            | Tag::TableRow => {
                self.inline.soft_break();
                self.walk(&el.children);
                self.inline.soft_break();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::RunStyle;
    use crate::normalize::normalize;

    fn blocks(html: &str) -> Vec<ContentNode> {
        segment(&normalize(html))
    }

    #[test]
    fn test_paragraph_and_nested_list() {
        let out = blocks(
            "<p>Hello <strong>World</strong></p><ul><li>A</li><li>B<ul><li>B1</li></ul></li></ul>",
        );
        assert_eq!(out.len(), 2);

        let ContentNode::Paragraph(runs) = &out[0] else {
            panic!("expected paragraph, got {:?}", out[0]);
        };
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], InlineRun::plain("Hello "));
        assert_eq!(runs[1], InlineRun::new("World", RunStyle::bold()));

        let ContentNode::List(list) = &out[1] else {
            panic!("expected list, got {:?}", out[1]);
        };
        assert!(!list.ordered);
        assert_eq!(list.items.len(), 2);
        assert_eq!(list.items[0].text(), "A");
        assert!(list.items[0].nested.is_empty());
        assert_eq!(list.items[1].text(), "B");
        assert_eq!(list.items[1].nested.len(), 1);
        assert_eq!(list.items[1].nested[0].items.len(), 1);
        assert_eq!(list.items[1].nested[0].items[0].text(), "B1");
    }

    #[test]
    fn test_loose_text_becomes_implicit_paragraph() {
        let out = blocks("Intro text <em>here</em><h2>Title</h2>after");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], ContentNode::Paragraph(runs) if runs_text(runs) == "Intro text here"));
        assert_eq!(
            out[1],
            ContentNode::Heading {
                level: 2,
                text: "Title".to_string()
            }
        );
        assert!(matches!(&out[2], ContentNode::Paragraph(runs) if runs_text(runs) == "after"));
    }

    #[test]
    fn test_image_splits_paragraph_and_style_continues() {
        let out = blocks(r#"<p><strong>before <img src="a.png" alt="Chart"> after</strong></p>"#);
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], ContentNode::Paragraph(runs) if runs_text(runs) == "before"));
        assert_eq!(
            out[1],
            ContentNode::Image {
                src: "a.png".to_string(),
                alt: "Chart".to_string()
            }
        );
        let ContentNode::Paragraph(runs) = &out[2] else {
            panic!("expected trailing paragraph");
        };
        assert_eq!(runs_text(runs), "after");
        assert!(runs[0].style.bold);
    }

    #[test]
    fn test_break_handling() {
        let out = blocks("<p>one<br>two</p><br><p>three</p>");
        assert_eq!(out.len(), 3);
        assert!(matches!(&out[0], ContentNode::Paragraph(runs) if runs_text(runs) == "one\ntwo"));
        assert_eq!(out[1], ContentNode::LineBreak);
        assert!(matches!(&out[2], ContentNode::Paragraph(_)));
    }

    #[test]
    fn test_empty_paragraphs_are_skipped() {
        let out = blocks("<p>   </p><p>&nbsp;</p><div></div><p>text</p>");
        assert_eq!(out.len(), 1);
    }

    #[test]
    fn test_ordered_lists_and_nested_numbering_source() {
        let out = blocks("<ol><li>one</li><li>two<ol><li>inner</li></ol></li><li>three</li></ol>");
        let ContentNode::List(list) = &out[0] else {
            panic!("expected list");
        };
        assert!(list.ordered);
        assert_eq!(list.items.len(), 3);
        assert!(list.items[1].nested[0].ordered);
    }

    #[test]
    fn test_list_item_content_is_flattened() {
        let out = blocks("<ul><li><p>first</p><p>second <b>bold</b></p></li></ul>");
        let ContentNode::List(list) = &out[0] else {
            panic!("expected list");
        };
        assert_eq!(list.items[0].text(), "first\nsecond bold");
    }

    #[test]
    fn test_table_rows_and_header_fallback() {
        let out = blocks(
            "<table><thead><tr><th>Name</th><th>Role</th></tr></thead>\
             <tbody><tr><td> Ada </td><td>Engineer</td></tr><tr></tr>\
             <tr><th>ignored</th><td>Only data</td></tr></tbody></table>",
        );
        assert_eq!(
            out,
            vec![ContentNode::Table(vec![
                vec!["Name".to_string(), "Role".to_string()],
                vec!["Ada".to_string(), "Engineer".to_string()],
                vec!["Only data".to_string()],
            ])]
        );
    }

    #[test]
    fn test_nested_table_text_joins_outer_cell() {
        let out = blocks(
            "<table><tr><td>outer <table><tr><td>inner</td></tr></table></td></tr></table>",
        );
        let ContentNode::Table(rows) = &out[0] else {
            panic!("expected table");
        };
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0], vec!["outer inner".to_string()]);
    }

    #[test]
    fn test_images_in_cells_keep_a_placeholder() {
        let out = blocks(
            r#"<table><tr><td><img src="logo.png" alt="Logo"></td><td>Acme <img src="x.png"></td></tr></table>"#,
        );
        let ContentNode::Table(rows) = &out[0] else {
            panic!("expected table");
        };
        assert_eq!(rows[0], vec!["[Image: Logo]".to_string(), "Acme [Image]".to_string()]);
    }

    #[test]
    fn test_blockquote_flattens_blocks_and_images() {
        let out = blocks(r#"<blockquote><p>first</p><img src="x.png" alt="Logo"><p>last</p></blockquote>"#);
        let ContentNode::Blockquote(runs) = &out[0] else {
            panic!("expected blockquote");
        };
        assert_eq!(runs_text(runs), "first\n[Image: Logo]\nlast");
    }

    #[test]
    fn test_preformatted_text_is_preserved() {
        let out = blocks("<pre>fn main() {\n    println!(\"hi\");\n}\n\n</pre>");
        assert_eq!(
            out,
            vec![ContentNode::CodeBlock(
                "fn main() {\n    println!(\"hi\");\n}".to_string()
            )]
        );
    }

    #[test]
    fn test_entities_reach_the_blocks() {
        let out = blocks("<p>Wait&hellip; &ldquo;quoted&rdquo; &amp; more</p>");
        assert!(matches!(
            &out[0],
            ContentNode::Paragraph(runs) if runs_text(runs) == "Wait\u{2026} \u{201c}quoted\u{201d} & more"
        ));
    }
}
