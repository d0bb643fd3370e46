use crate::error::RenderError;
use crate::writer::{DocumentInfo, PdfDocumentWriter};
use lopdf::content::{Content, Operation};
use lopdf::{Object, ObjectId, StringFormat};
use postpress_layout::{ImageElement, LayoutElement, Page, PositionedElement, TextElement};
use postpress_types::{mm_to_pt, pt_to_mm, Color};

/// Baseline position inside a text box, as a fraction of the font size below
/// the top of the glyph box.
const ASCENT: f32 = 0.8;
const UNDERLINE_OFFSET: f32 = 0.12;
const UNDERLINE_THICKNESS: f32 = 0.05;

/// Draws laid-out pages into a PDF. Layout coordinates are millimetres from
/// the top-left corner; PDF user space is points from the bottom-left.
pub struct PdfRenderer {
    writer: PdfDocumentWriter,
}

impl Default for PdfRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfRenderer {
    pub fn new() -> Self {
        Self {
            writer: PdfDocumentWriter::new(),
        }
    }

    pub fn render_page(&mut self, page: &Page) -> Result<ObjectId, RenderError> {
        let width = mm_to_pt(page.size.width);
        let height = mm_to_pt(page.size.height);

        let mut page_ctx = PageContext::new(&mut self.writer, height);
        for el in &page.elements {
            page_ctx.draw_element(el)?;
        }
        let content = page_ctx.finish();
        self.writer.add_page(content, width, height)
    }

    pub fn page_count(&self) -> usize {
        self.writer.page_count()
    }

    pub fn finish(self, info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
        self.writer.finish(info)
    }
}

/// Renders `pages` and returns the serialized PDF.
pub fn render_pages(pages: &[Page], info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
    let mut renderer = PdfRenderer::new();
    for page in pages {
        renderer.render_page(page)?;
    }
    log::debug!("Rendered {} page(s)", renderer.page_count());
    renderer.finish(info)
}

struct PageContext<'a> {
    writer: &'a mut PdfDocumentWriter,
    page_height: f32,
    content: Content,
    state: PageRenderState,
}

/// Graphics state already set in the content stream, so repeated values are
/// not emitted twice.
#[derive(Default)]
struct PageRenderState {
    font: Option<(&'static str, f32)>,
    fill_color: Option<Color>,
    stroke_color: Option<Color>,
    line_width: Option<f32>,
}

impl<'a> PageContext<'a> {
    fn new(writer: &'a mut PdfDocumentWriter, page_height: f32) -> Self {
        Self {
            writer,
            page_height,
            content: Content { operations: vec![] },
            state: PageRenderState::default(),
        }
    }

    fn finish(self) -> Content {
        self.content
    }

    fn op(&mut self, operator: &str, operands: Vec<Object>) {
        self.content.operations.push(Operation::new(operator, operands));
    }

    /// PDF y of a layout y, both measured at the same point of the page.
    fn pdf_y(&self, y_mm: f32) -> f32 {
        self.page_height - mm_to_pt(y_mm)
    }

    fn draw_element(&mut self, el: &PositionedElement) -> Result<(), RenderError> {
        match &el.element {
            LayoutElement::Text(text) => self.draw_text(text, el),
            LayoutElement::Image(image) => self.draw_image(image, el)?,
            LayoutElement::Rule(rule) => {
                let y = self.pdf_y(el.y + el.height / 2.0);
                let x = mm_to_pt(el.x);
                self.stroke_line(x, x + mm_to_pt(el.width), y, rule.color, mm_to_pt(rule.thickness));
            }
            LayoutElement::Rectangle(rect) => {
                self.set_fill_color(rect.fill);
                let bottom = self.pdf_y(el.y + el.height);
                self.op(
                    "re",
                    vec![
                        mm_to_pt(el.x).into(),
                        bottom.into(),
                        mm_to_pt(el.width).into(),
                        mm_to_pt(el.height).into(),
                    ],
                );
                self.op("f", vec![]);
            }
        }
        Ok(())
    }

    fn set_font(&mut self, name: &'static str, size: f32) {
        if self.state.font != Some((name, size)) {
            self.op("Tf", vec![Object::Name(name.as_bytes().to_vec()), size.into()]);
            self.state.font = Some((name, size));
        }
    }

    fn set_fill_color(&mut self, color: Color) {
        if self.state.fill_color != Some(color) {
            let [r, g, b] = color.to_unit();
            self.op("rg", vec![r.into(), g.into(), b.into()]);
            self.state.fill_color = Some(color);
        }
    }

    fn set_stroke(&mut self, color: Color, width: f32) {
        if self.state.stroke_color != Some(color) {
            let [r, g, b] = color.to_unit();
            self.op("RG", vec![r.into(), g.into(), b.into()]);
            self.state.stroke_color = Some(color);
        }
        if self.state.line_width != Some(width) {
            self.op("w", vec![width.into()]);
            self.state.line_width = Some(width);
        }
    }

    fn stroke_line(&mut self, x1: f32, x2: f32, y: f32, color: Color, width: f32) {
        self.set_stroke(color, width);
        self.op("m", vec![x1.into(), y.into()]);
        self.op("l", vec![x2.into(), y.into()]);
        self.op("S", vec![]);
    }

    fn draw_text(&mut self, text: &TextElement, el: &PositionedElement) {
        if text.content.trim().is_empty() {
            return;
        }
        let font_name = self.writer.font_resource(text.font);
        let size_mm = pt_to_mm(text.size);
        let baseline = el.y + (el.height - size_mm) / 2.0 + size_mm * ASCENT;
        let x = mm_to_pt(el.x);
        let y = self.pdf_y(baseline);

        self.op("BT", vec![]);
        self.set_font(font_name, text.size);
        self.set_fill_color(text.color);
        self.op("Td", vec![x.into(), y.into()]);
        self.op(
            "Tj",
            vec![Object::String(text.font.encode(&text.content), StringFormat::Literal)],
        );
        self.op("ET", vec![]);

        if text.underline {
            let line_y = y - text.size * UNDERLINE_OFFSET;
            let width = text.size * UNDERLINE_THICKNESS;
            self.stroke_line(x, x + mm_to_pt(el.width), line_y, text.color, width);
        }
    }

    fn draw_image(&mut self, image: &ImageElement, el: &PositionedElement) -> Result<(), RenderError> {
        let name = self.writer.image_resource(&image.image)?;
        let width = mm_to_pt(el.width);
        let height = mm_to_pt(el.height);
        let x = mm_to_pt(el.x);
        let y = self.pdf_y(el.y + el.height);

        self.op("q", vec![]);
        self.op(
            "cm",
            vec![width.into(), 0.into(), 0.into(), height.into(), x.into(), y.into()],
        );
        self.op("Do", vec![Object::Name(name.into_bytes())]);
        self.op("Q", vec![]);
        Ok(())
    }
}
