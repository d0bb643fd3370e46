use crate::config::LayoutConfig;
use crate::error::LayoutError;
use crate::flow::Flow;
use crate::nodes::blockquote::layout_blockquote;
use crate::nodes::code::layout_code_block;
use crate::nodes::heading::layout_heading;
use crate::nodes::image::{layout_image, ImageLoader};
use crate::nodes::list::layout_list;
use crate::nodes::paragraph::layout_paragraph;
use crate::nodes::table::layout_table;
use crate::nodes::BlockContext;
use crate::style::TextStyle;
use crate::text::draw_text;
use postpress_markup::ContentNode;
use postpress_resource::ResourceProvider;
use postpress_types::Color;

/// Space left by a `<br>` between blocks.
pub const LINE_BREAK_SPACING: f32 = 3.0;

/// Places content blocks into a [`Flow`]. One engine serves one render: its
/// image cache lives as long as the engine.
#[derive(Debug)]
pub struct LayoutEngine<'a> {
    config: &'a LayoutConfig,
    images: ImageLoader<'a>,
}

impl<'a> LayoutEngine<'a> {
    pub fn new(config: &'a LayoutConfig, resources: &'a dyn ResourceProvider) -> Self {
        Self {
            config,
            images: ImageLoader::new(resources, config.images),
        }
    }

    pub fn config(&self) -> &LayoutConfig {
        self.config
    }

    /// Body text style at the configured base size.
    pub fn body_style(&self) -> TextStyle {
        TextStyle::new(self.config.fonts.family, self.config.fonts.base_size)
    }

    /// A fresh flow on the configured page.
    pub fn new_flow(&self) -> Flow {
        let mut flow = Flow::new(self.config.page.size.dimensions(), self.config.page.margins);
        flow.begin();
        flow
    }

    /// Lays out `blocks` in order with `body` as the base text style. A block
    /// that fails is replaced by a one-line marker; the rest still render.
    pub fn layout_blocks(&mut self, flow: &mut Flow, blocks: &[ContentNode], body: TextStyle) {
        for block in blocks {
            if let Err(e) = self.layout_block(flow, block, body) {
                log::warn!("Skipping {} block: {}", block.kind(), e);
                let marker = body.sized(9.0).italic().colored(Color::ERROR_RED);
                draw_text(
                    flow,
                    &format!("[Content block skipped: {}]", e),
                    &marker,
                    self.config.fonts.line_height,
                );
            }
        }
    }

    pub fn layout_block(
        &mut self,
        flow: &mut Flow,
        block: &ContentNode,
        body: TextStyle,
    ) -> Result<(), LayoutError> {
        let ctx = BlockContext::new(self.config, body);
        match block {
            ContentNode::Paragraph(runs) => layout_paragraph(flow, &ctx, runs),
            ContentNode::Heading { level, text } => layout_heading(flow, &ctx, *level, text),
            ContentNode::List(list) => layout_list(flow, &ctx, list),
            ContentNode::Image { src, alt } => layout_image(flow, &ctx, &mut self.images, src, alt)?,
            ContentNode::Table(rows) => layout_table(flow, &ctx, rows),
            ContentNode::Blockquote(runs) => layout_blockquote(flow, &ctx, runs),
            ContentNode::CodeBlock(text) => layout_code_block(flow, &ctx, text),
            ContentNode::LineBreak => flow.gap(LINE_BREAK_SPACING),
        }
        Ok(())
    }

    /// Number of distinct images decoded so far.
    pub fn cached_images(&self) -> usize {
        self.images.cached()
    }
}
