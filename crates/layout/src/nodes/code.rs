use super::BlockContext;
use crate::elements::{LayoutElement, RectElement};
use crate::flow::Flow;
use crate::text::{draw_line, lines_height, wrap, Piece};
use postpress_types::Color;

pub const CODE_SPACING: f32 = 3.0;
pub const CODE_FONT_SIZE: f32 = 10.0;
/// Horizontal inset of the code text inside its shaded box.
pub const CODE_PADDING: f32 = 2.0;

const CODE_BACKGROUND: Color = Color::gray(245);
const TAB_WIDTH: usize = 4;
const NBSP: char = '\u{a0}';

/// Replaces spaces and tabs with no-break spaces so that indentation
/// survives line breaking.
pub fn preserve_indentation(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            ' ' => out.push(NBSP),
            '\t' => out.extend(std::iter::repeat_n(NBSP, TAB_WIDTH)),
            '\r' => {}
            _ => out.push(ch),
        }
    }
    out
}

/// Preformatted text in Courier on a shaded band. Each source line starts a
/// new output line; lines wider than the box are split between characters.
pub fn layout_code_block(flow: &mut Flow, ctx: &BlockContext<'_>, text: &str) {
    let style = ctx.body.sized(CODE_FONT_SIZE).monospace();
    let factor = ctx.line_factor();
    let line_height = style.line_height(factor);

    let (left, width) = (flow.content_left(), flow.content_width());
    let lines = wrap(
        &[Piece::new(preserve_indentation(text), style)],
        width - 2.0 * CODE_PADDING,
    );

    flow.gap(CODE_SPACING);
    flow.keep_together(lines_height(&lines, factor, line_height));
    for line in &lines {
        let height = line.height(factor, line_height);
        flow.ensure_room(height);
        let y = flow.y();
        flow.push(
            left,
            y,
            width,
            height,
            LayoutElement::Rectangle(RectElement {
                fill: CODE_BACKGROUND,
            }),
        );
        draw_line(flow, line, left + CODE_PADDING, height);
        flow.advance(height);
    }
    flow.gap(CODE_SPACING);
}
