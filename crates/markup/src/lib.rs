//! Editor markup to typed content blocks.
//!
//! The pipeline is two steps, both infallible:
//! - [`normalize`] decodes typographic entities and rebuilds the HTML as a
//!   [`Markup`] tree restricted to a fixed tag vocabulary.
//! - [`segment`] walks that tree once and produces the ordered
//!   [`ContentNode`] blocks consumed by the layout engine.

pub mod inline;
pub mod node;
pub mod normalize;
pub mod segment;

pub use inline::{collapse_whitespace, InlineFormatter, StyleScope};
pub use node::{runs_text, ContentNode, InlineRun, ListBlock, ListItem, RunStyle};
pub use normalize::{decode_entities, normalize, Attributes, Markup, MarkupElement, MarkupNode, Tag};
pub use segment::segment;

/// Normalizes and segments `html` in one call.
pub fn parse_blocks(html: &str) -> Vec<ContentNode> {
    let markup = normalize(html);
    segment(&markup)
}
