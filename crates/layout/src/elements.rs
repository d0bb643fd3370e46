use crate::fonts::BuiltinFont;
use postpress_types::{Color, Size};
use std::sync::Arc;

/// An element with its box on the page. Coordinates are millimetres from the
/// top-left corner of the page; `y` is the top of the box.
#[derive(Debug, Clone, PartialEq)]
pub struct PositionedElement {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub element: LayoutElement,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LayoutElement {
    Text(TextElement),
    Image(ImageElement),
    Rule(RuleElement),
    Rectangle(RectElement),
}

/// A single-line piece of text. The box height is the line pitch; the
/// renderer places the baseline inside it.
#[derive(Debug, Clone, PartialEq)]
pub struct TextElement {
    pub content: String,
    pub font: BuiltinFont,
    /// Font size in points.
    pub size: f32,
    pub color: Color,
    pub underline: bool,
    pub background: Option<Color>,
    /// Link target, kept for inspection; links are not clickable.
    pub link: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageElement {
    pub image: Arc<RasterImage>,
}

/// Decoded pixels, alpha already composited onto white.
#[derive(Clone, PartialEq, Eq)]
pub struct RasterImage {
    /// Root-relative path the pixels were read from. Identical keys share one
    /// PDF image object.
    pub key: String,
    pub width_px: u32,
    pub height_px: u32,
    /// Packed 8-bit RGB, row-major.
    pub rgb: Vec<u8>,
}

impl std::fmt::Debug for RasterImage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RasterImage")
            .field("key", &self.key)
            .field("width_px", &self.width_px)
            .field("height_px", &self.height_px)
            .field("rgb_len", &self.rgb.len())
            .finish()
    }
}

/// A horizontal line across the element's width, vertically centred in its box.
#[derive(Debug, Clone, PartialEq)]
pub struct RuleElement {
    pub color: Color,
    /// Stroke width in millimetres.
    pub thickness: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RectElement {
    pub fill: Color,
}

/// One finished page.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Zero-based page number.
    pub index: usize,
    pub size: Size,
    pub elements: Vec<PositionedElement>,
}

impl Page {
    pub fn texts(&self) -> impl Iterator<Item = (&PositionedElement, &TextElement)> {
        self.elements.iter().filter_map(|el| match &el.element {
            LayoutElement::Text(text) => Some((el, text)),
            _ => None,
        })
    }

    /// All text on the page joined with spaces, in placement order.
    pub fn plain_text(&self) -> String {
        self.texts()
            .map(|(_, t)| t.content.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }
}
