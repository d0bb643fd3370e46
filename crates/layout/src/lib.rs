//! Paginated layout of content blocks.
//!
//! Positions are in millimetres from the top-left corner of the page. The
//! engine walks blocks in order, asks the [`Flow`] for room before placing
//! each one and produces finished [`Page`]s for a renderer.

pub mod config;
pub mod elements;
pub mod engine;
pub mod error;
pub mod flow;
pub mod fonts;
pub mod nodes;
pub mod style;
pub mod text;

pub use self::config::{FontConfig, ImageConfig, LayoutConfig, ListConfig, PageConfig, TableConfig};
pub use self::elements::{
    ImageElement, LayoutElement, Page, PositionedElement, RasterImage, RectElement, RuleElement,
    TextElement,
};
pub use self::engine::LayoutEngine;
pub use self::error::LayoutError;
pub use self::flow::{Flow, FlowState, PageCursor};
pub use self::fonts::{BuiltinFont, FontFamily};
pub use self::style::TextStyle;
