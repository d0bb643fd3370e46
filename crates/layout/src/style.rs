use crate::fonts::{BuiltinFont, FontFamily};
use postpress_markup::RunStyle;
use postpress_types::{pt_to_mm, Color};

/// Background behind inline `code` spans.
pub const CODE_SPAN_BACKGROUND: Color = Color::gray(235);

/// Resolved text appearance for one piece of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub family: FontFamily,
    /// Font size in points.
    pub size: f32,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
    /// Forces the Courier family regardless of `family`.
    pub monospace: bool,
    pub color: Color,
    pub background: Option<Color>,
}

impl TextStyle {
    pub fn new(family: FontFamily, size: f32) -> Self {
        Self {
            family,
            size,
            bold: false,
            italic: false,
            underline: false,
            monospace: false,
            color: Color::BLACK,
            background: None,
        }
    }

    pub fn sized(mut self, size: f32) -> Self {
        self.size = size;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn italic(mut self) -> Self {
        self.italic = true;
        self
    }

    pub fn colored(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn monospace(mut self) -> Self {
        self.monospace = true;
        self
    }

    pub fn font(&self) -> BuiltinFont {
        let family = if self.monospace {
            FontFamily::Courier
        } else {
            self.family
        };
        BuiltinFont::select(family, self.bold, self.italic)
    }

    /// Line pitch in millimetres.
    pub fn line_height(&self, factor: f32) -> f32 {
        pt_to_mm(self.size * factor)
    }

    pub fn text_width(&self, text: &str) -> f32 {
        self.font().text_width(text, self.size)
    }

    /// Layers the flags of an inline run over this block style. Links are
    /// shown blue and underlined; code spans get a shaded background.
    pub fn with_run(&self, run: RunStyle, is_link: bool) -> TextStyle {
        let mut style = *self;
        style.bold |= run.bold;
        style.italic |= run.italic;
        style.underline |= run.underline;
        if run.monospace {
            style.monospace = true;
            style.background = Some(CODE_SPAN_BACKGROUND);
        }
        if is_link {
            style.color = Color::LINK_BLUE;
            style.underline = true;
        }
        style
    }
}
