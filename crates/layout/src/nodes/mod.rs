//! Layout of each block kind.
//!
//! Every node follows the same contract: measure, ask the flow for room,
//! place, advance. Spacing before a block uses [`Flow::gap`] so it vanishes
//! at the top of a page.

pub mod blockquote;
pub mod code;
pub mod heading;
pub mod image;
pub mod list;
pub mod paragraph;
pub mod table;

use crate::config::LayoutConfig;
use crate::elements::{LayoutElement, RuleElement};
use crate::flow::Flow;
use crate::style::TextStyle;
use postpress_types::Color;

/// What every block needs besides the flow: configuration and the style of
/// the surrounding body text.
#[derive(Debug, Clone, Copy)]
pub struct BlockContext<'a> {
    pub config: &'a LayoutConfig,
    pub body: TextStyle,
}

impl<'a> BlockContext<'a> {
    pub fn new(config: &'a LayoutConfig, body: TextStyle) -> Self {
        Self { config, body }
    }

    pub fn line_factor(&self) -> f32 {
        self.config.fonts.line_height
    }

    pub fn body_line_height(&self) -> f32 {
        self.body.line_height(self.line_factor())
    }
}

/// A full-width horizontal rule at the cursor.
pub fn rule(flow: &mut Flow, color: Color, thickness: f32) {
    flow.ensure_room(thickness);
    let (x, y, width) = (flow.content_left(), flow.y(), flow.content_width());
    flow.push(
        x,
        y,
        width,
        thickness,
        LayoutElement::Rule(RuleElement { color, thickness }),
    );
    flow.advance(thickness);
}
