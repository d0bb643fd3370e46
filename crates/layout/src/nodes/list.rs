//! Bulleted and numbered lists with nesting.

use super::BlockContext;
use crate::config::LayoutConfig;
use crate::elements::{LayoutElement, TextElement};
use crate::flow::Flow;
use crate::fonts::marker_font;
use crate::text::{draw_line, draw_lines, pieces_from_runs, wrap, Line};
use postpress_markup::{InlineRun, ListBlock};

pub const LIST_SPACE_BEFORE: f32 = 2.0;
pub const LIST_SPACE_AFTER: f32 = 3.0;

/// Glyphs outside WinAnsi are drawn from ZapfDingbats, whose shapes run
/// larger than text glyphs.
const DINGBAT_SCALE: f32 = 0.6;

/// Floor for the reduced font size of nested items, in points.
const MIN_NESTED_SIZE: f32 = 1.0;

/// One item of a (possibly nested) list, ready to place.
#[derive(Debug, Clone, PartialEq)]
pub struct ListLine {
    pub depth: usize,
    /// Marker offset from the left margin, in millimetres.
    pub indent: f32,
    pub marker: String,
    pub runs: Vec<InlineRun>,
    /// Points.
    pub font_size: f32,
}

/// Flattens `list` into one [`ListLine`] per item, nested lists following
/// the item that owns them. Numbering restarts at 1 for every list.
pub fn plan_list(list: &ListBlock, depth: usize, config: &LayoutConfig, base_size: f32) -> Vec<ListLine> {
    let mut out = Vec::new();
    plan_into(list, depth, config, base_size, &mut out);
    out
}

fn plan_into(
    list: &ListBlock,
    depth: usize,
    config: &LayoutConfig,
    base_size: f32,
    out: &mut Vec<ListLine>,
) {
    let font_size = if depth >= 1 {
        (base_size - 1.0).max(MIN_NESTED_SIZE)
    } else {
        base_size
    };
    for (n, item) in list.items.iter().enumerate() {
        let marker = if list.ordered {
            format!("{}.", n + 1)
        } else {
            config.lists.bullet(depth).to_string()
        };
        out.push(ListLine {
            depth,
            indent: config.lists.indent(depth),
            marker,
            runs: item.runs.clone(),
            font_size,
        });
        for nested in &item.nested {
            plan_into(nested, depth + 1, config, base_size, out);
        }
    }
}

/// A planned item measured against the page: marker, wrapped text and the
/// height it needs.
struct PlacedItem {
    marker: TextElement,
    marker_x: f32,
    marker_width: f32,
    text_x: f32,
    lines: Vec<Line>,
    line_height: f32,
    first_height: f32,
    height: f32,
}

fn measure_item(flow: &Flow, ctx: &BlockContext<'_>, line: ListLine) -> PlacedItem {
    let factor = ctx.line_factor();
    let style = ctx.body.sized(line.font_size);
    let line_height = style.line_height(factor);

    let font = marker_font(style.font(), &line.marker);
    let marker_size = if font.is_symbolic() {
        style.size * DINGBAT_SCALE
    } else {
        style.size
    };
    let marker_width = font.text_width(&line.marker, marker_size);
    let gutter = marker_width + style.text_width(" ");

    let marker_x = flow.content_left() + line.indent;
    let text_x = marker_x + gutter;
    let text_width = (flow.content_width() - line.indent - gutter).max(gutter);
    let lines = wrap(&pieces_from_runs(&line.runs, &style), text_width);

    let first_height = lines
        .first()
        .map(|l| l.height(factor, line_height))
        .unwrap_or(line_height);
    let height = first_height + lines.iter().skip(1).map(|l| l.height(factor, line_height)).sum::<f32>();

    PlacedItem {
        marker: TextElement {
            content: line.marker,
            font,
            size: marker_size,
            color: style.color,
            underline: false,
            background: None,
            link: None,
        },
        marker_x,
        marker_width,
        text_x,
        lines,
        line_height,
        first_height,
        height,
    }
}

/// Lists that fit a page are kept together; longer lists break between
/// items, or inside an item after its first line.
pub fn layout_list(flow: &mut Flow, ctx: &BlockContext<'_>, list: &ListBlock) {
    let factor = ctx.line_factor();
    let items: Vec<PlacedItem> = plan_list(list, 0, ctx.config, ctx.body.size)
        .into_iter()
        .map(|line| measure_item(flow, ctx, line))
        .collect();

    flow.gap(LIST_SPACE_BEFORE);
    flow.keep_together(items.iter().map(|item| item.height).sum());

    for item in items {
        // The marker and the first line of its item always share a page.
        flow.ensure_room(item.first_height);

        let y = flow.y();
        flow.push(
            item.marker_x,
            y,
            item.marker_width,
            item.first_height,
            LayoutElement::Text(item.marker),
        );

        match item.lines.split_first() {
            Some((first, rest)) => {
                draw_line(flow, first, item.text_x, item.first_height);
                flow.advance(item.first_height);
                draw_lines(flow, rest, item.text_x, factor, item.line_height);
            }
            None => flow.advance(item.first_height),
        }
    }

    flow.gap(LIST_SPACE_AFTER);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fonts::{BuiltinFont, FontFamily};
    use crate::style::TextStyle;
    use postpress_markup::{parse_blocks, ContentNode, ListItem};
    use postpress_types::{Margins, Size};

    fn item(text: &str) -> ListItem {
        ListItem {
            runs: vec![InlineRun::plain(text)],
            nested: Vec::new(),
        }
    }

    fn flat(ordered: bool, n: usize) -> ListBlock {
        ListBlock {
            ordered,
            items: (0..n).map(|i| item(&format!("item {}", i))).collect(),
        }
    }

    #[test]
    fn test_n_items_give_n_prefixed_lines() {
        let config = LayoutConfig::default();
        for n in [1, 4, 12] {
            let lines = plan_list(&flat(false, n), 0, &config, 11.0);
            assert_eq!(lines.len(), n);
            assert!(lines.iter().all(|l| l.marker == "•"));

            let numbered = plan_list(&flat(true, n), 0, &config, 11.0);
            let markers: Vec<_> = numbered.iter().map(|l| l.marker.clone()).collect();
            let expected: Vec<_> = (1..=n).map(|i| format!("{}.", i)).collect();
            assert_eq!(markers, expected);
        }
    }

    #[test]
    fn test_numbering_restarts_for_each_list() {
        let config = LayoutConfig::default();
        let mut outer = flat(true, 2);
        outer.items[0].nested.push(flat(true, 3));
        outer.items[1].nested.push(flat(true, 2));

        let markers: Vec<_> = plan_list(&outer, 0, &config, 11.0)
            .into_iter()
            .map(|l| (l.depth, l.marker))
            .collect();
        assert_eq!(
            markers,
            vec![
                (0, "1.".to_string()),
                (1, "1.".to_string()),
                (1, "2.".to_string()),
                (1, "3.".to_string()),
                (0, "2.".to_string()),
                (1, "1.".to_string()),
                (1, "2.".to_string()),
            ]
        );
    }

    #[test]
    fn test_indent_grows_and_nested_text_shrinks() {
        let config = LayoutConfig::default();
        let mut level2 = flat(false, 1);
        level2.items[0].nested.push(flat(false, 1));
        let mut outer = flat(false, 1);
        outer.items[0].nested.push(level2);

        let lines = plan_list(&outer, 0, &config, 11.0);
        assert_eq!(lines.len(), 3);
        assert!(lines.windows(2).all(|w| w[0].indent <= w[1].indent));
        assert_eq!(
            lines.iter().map(|l| l.indent).collect::<Vec<_>>(),
            vec![10.0, 30.0, 50.0]
        );
        assert_eq!(lines[0].font_size, 11.0);
        assert_eq!(lines[1].font_size, 10.0);
        assert_eq!(
            lines.iter().map(|l| l.marker.as_str()).collect::<Vec<_>>(),
            vec!["•", "◦", "▪"]
        );
    }

    #[test]
    fn test_markup_list_renders_nested_item_with_hollow_bullet() {
        let blocks = parse_blocks("<ul><li>A</li><li>B<ul><li>B1</li></ul></li></ul>");
        let ContentNode::List(list) = &blocks[0] else {
            panic!("expected a list block");
        };
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        layout_list(&mut flow, &ctx, list);

        let pages = flow.finish(None);
        let texts: Vec<_> = pages[0].texts().map(|(p, t)| (p.x, t.content.clone(), t.font)).collect();
        let nested_marker = texts.iter().find(|(_, c, _)| c == "◦").unwrap();
        assert_eq!(nested_marker.0, 15.0 + 30.0);
        assert_eq!(nested_marker.2, BuiltinFont::ZapfDingbats);
        let b1 = texts.iter().find(|(_, c, _)| c == "B1").unwrap();
        assert!(b1.0 > nested_marker.0);
        assert_eq!(texts.iter().filter(|(_, c, _)| c == "•").count(), 2);
    }

    #[test]
    fn test_marker_stays_with_first_line() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        flow.advance(264.0);

        layout_list(&mut flow, &ctx, &flat(false, 3));
        let pages = flow.finish(None);
        for page in &pages {
            let markers = page.texts().filter(|(_, t)| t.content == "•").count();
            let items = page.texts().filter(|(_, t)| t.content.starts_with("item")).count();
            assert_eq!(markers, items);
        }
    }

    #[test]
    fn test_list_that_fits_a_page_moves_whole() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        flow.advance(250.0);

        let mut list = flat(false, 6);
        list.items[2].nested.push(flat(true, 2));
        layout_list(&mut flow, &ctx, &list);

        let pages = flow.finish(None);
        assert_eq!(pages.len(), 2);
        assert!(pages[0].elements.is_empty());
        assert_eq!(pages[1].texts().filter(|(_, t)| t.content.starts_with("item")).count(), 8);
    }

    #[test]
    fn test_list_taller_than_a_page_breaks_between_items() {
        let config = LayoutConfig::default();
        let ctx = BlockContext::new(&config, TextStyle::new(FontFamily::Helvetica, 11.0));
        let mut flow = Flow::new(Size::new(210.0, 297.0), Margins::all(15.0));
        flow.advance(200.0);

        layout_list(&mut flow, &ctx, &flat(true, 80));
        let pages = flow.finish(None);
        assert!(pages.len() >= 2);
        assert!(pages[0].texts().any(|(_, t)| t.content == "1."));
        for page in &pages {
            let markers = page.texts().filter(|(_, t)| t.content.ends_with('.')).count();
            let items = page.texts().filter(|(_, t)| t.content.starts_with("item")).count();
            assert_eq!(markers, items);
        }
    }

    #[test]
    fn test_nested_size_never_drops_below_floor() {
        let config = LayoutConfig::default();
        let mut outer = flat(false, 1);
        outer.items[0].nested.push(flat(false, 1));
        let lines = plan_list(&outer, 0, &config, 1.0);
        assert_eq!(lines[1].font_size, MIN_NESTED_SIZE);
        assert!(lines.iter().all(|l| l.font_size > 0.0));
    }
}
