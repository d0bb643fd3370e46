use super::BlockContext;
use crate::elements::{LayoutElement, RectElement};
use crate::flow::Flow;
use crate::text::{draw_line, lines_height, pieces_from_runs, wrap};
use postpress_markup::InlineRun;
use postpress_types::Color;

pub const QUOTE_SPACING: f32 = 3.0;
pub const QUOTE_INDENT: f32 = 10.0;

const QUOTE_COLOR: Color = Color::gray(100);
const BAR_COLOR: Color = Color::gray(180);
const BAR_WIDTH: f32 = 0.8;

/// Quoted text is indented, set in grey italics and marked with a bar in the
/// left margin. A quote that fits a page is never split; longer quotes break
/// between lines and the bar follows them onto the next page.
pub fn layout_blockquote(flow: &mut Flow, ctx: &BlockContext<'_>, runs: &[InlineRun]) {
    let style = ctx.body.italic().colored(QUOTE_COLOR);
    let factor = ctx.line_factor();
    let fallback = style.line_height(factor);

    let left = flow.content_left();
    let x = left + QUOTE_INDENT;
    let lines = wrap(&pieces_from_runs(runs, &style), flow.content_width() - QUOTE_INDENT);

    flow.gap(QUOTE_SPACING);
    flow.keep_together(lines_height(&lines, factor, fallback));
    for line in &lines {
        let height = line.height(factor, fallback);
        flow.ensure_room(height);
        let y = flow.y();
        flow.push(
            left + QUOTE_INDENT / 2.0 - BAR_WIDTH,
            y,
            BAR_WIDTH,
            height,
            LayoutElement::Rectangle(RectElement { fill: BAR_COLOR }),
        );
        draw_line(flow, line, x, height);
        flow.advance(height);
    }
    flow.gap(QUOTE_SPACING);
}
