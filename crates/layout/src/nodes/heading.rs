use super::BlockContext;
use crate::flow::Flow;
use crate::text::{draw_lines, lines_height, wrap, Piece};

pub const HEADING_SPACE_BEFORE: f32 = 5.0;
pub const HEADING_SPACE_AFTER: f32 = 3.0;

/// Font size in points for a heading level.
pub fn heading_size(level: u8) -> f32 {
    match level {
        1 => 16.0,
        2 => 14.0,
        3 => 12.0,
        _ => 11.0,
    }
}

/// Bold heading, kept on the same page as the first line that follows it.
pub fn layout_heading(flow: &mut Flow, ctx: &BlockContext<'_>, level: u8, text: &str) {
    let style = ctx.body.sized(heading_size(level)).bold();
    let factor = ctx.line_factor();
    let (x, width) = (flow.content_left(), flow.content_width());
    let lines = wrap(&[Piece::new(text, style)], width);
    let height = lines_height(&lines, factor, style.line_height(factor));

    flow.gap(HEADING_SPACE_BEFORE);
    let with_next_line = height + HEADING_SPACE_AFTER + ctx.body_line_height();
    if with_next_line <= flow.cursor().page_capacity() {
        flow.ensure_room(with_next_line);
    }
    draw_lines(flow, &lines, x, factor, style.line_height(factor));
    flow.gap(HEADING_SPACE_AFTER);
}
