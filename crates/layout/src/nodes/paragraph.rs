use super::BlockContext;
use crate::flow::Flow;
use crate::text::{draw_lines, pieces_from_runs, wrap};
use postpress_markup::InlineRun;

/// Space after a paragraph.
pub const PARAGRAPH_SPACING: f32 = 3.0;

/// Paragraph text flows line by line and may continue on the next page.
pub fn layout_paragraph(flow: &mut Flow, ctx: &BlockContext<'_>, runs: &[InlineRun]) {
    let (x, width) = (flow.content_left(), flow.content_width());
    let lines = wrap(&pieces_from_runs(runs, &ctx.body), width);
    draw_lines(flow, &lines, x, ctx.line_factor(), ctx.body_line_height());
    flow.gap(PARAGRAPH_SPACING);
}
