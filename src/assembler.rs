//! Arranges a post, its attachments and its replies into pages.

use crate::config::ExportConfig;
use crate::record::{Attachment, ContentRecord};
use chrono::{NaiveDate, NaiveDateTime};
use postpress_layout::nodes::rule;
use postpress_layout::text::{draw_line, text_element, wrap, Piece};
use postpress_layout::{Flow, LayoutEngine, Page, TextElement, TextStyle};
use postpress_markup::parse_blocks;
use postpress_resource::ResourceProvider;
use postpress_types::Color;
use std::fmt::Write;

const MUTED: Color = Color::gray(100);
const FAINT: Color = Color::gray(150);
const RULE_COLOR: Color = Color::gray(200);
const RULE_THICKNESS: f32 = 0.2;

pub const ATTACHMENTS_NOTE: &str = "(See online version for file downloads)";

/// Lays out one content record. Owns the layout engine, and with it the
/// image cache, for the duration of one export.
pub struct DocumentAssembler<'a> {
    config: &'a ExportConfig,
    engine: LayoutEngine<'a>,
}

impl<'a> DocumentAssembler<'a> {
    pub fn new(config: &'a ExportConfig, resources: &'a dyn ResourceProvider) -> Self {
        Self {
            config,
            engine: LayoutEngine::new(&config.layout, resources),
        }
    }

    /// Renders `record` into pages. The footer on the last page carries
    /// `export_date`.
    pub fn assemble(&mut self, record: &ContentRecord, export_date: NaiveDate) -> Vec<Page> {
        let mut flow = self.engine.new_flow();
        let body = self.engine.body_style();

        self.header(&mut flow, record, body);

        let blocks = parse_blocks(&record.html_content);
        log::debug!("Post {} has {} content block(s)", record.id, blocks.len());
        self.engine.layout_blocks(&mut flow, &blocks, body);
        flow.gap(4.0);

        if !record.attachments.is_empty() {
            self.attachments(&mut flow, &record.attachments, body);
        }

        let replies = record.replies_chronological();
        if !replies.is_empty() {
            flow.gap(4.0);
            self.cell(&mut flow, &format!("Updates ({})", replies.len()), body.sized(14.0).bold(), 8.0);
            flow.gap(2.0);

            for (n, reply) in replies.into_iter().enumerate() {
                let heading = format!(
                    "Update #{} \u{2014} {}",
                    n + 1,
                    format_timestamp(&reply.created_at, &self.config.timestamp_format)
                );
                // The header stays with the first line of the reply.
                flow.ensure_room(6.0 + body.sized(10.0).line_height(self.line_factor()));
                self.cell(&mut flow, &heading, body.sized(11.0).bold(), 6.0);
                if reply.edited {
                    self.cell(&mut flow, "edited", body.sized(9.0).italic().colored(FAINT), 4.0);
                }

                let blocks = parse_blocks(&reply.content_html);
                self.engine.layout_blocks(&mut flow, &blocks, body.sized(10.0));

                if !reply.attachments.is_empty() {
                    let names: Vec<&str> = reply
                        .attachments
                        .iter()
                        .map(|a| a.original_filename.as_str())
                        .collect();
                    self.cell(
                        &mut flow,
                        &format!("Attachments: {}", names.join(", ")),
                        body.sized(9.0).italic().colored(MUTED),
                        4.0,
                    );
                }
                flow.gap(4.0);
            }
        }

        let footer = self.config.footer_enabled.then(|| self.footer(export_date, body));
        flow.finish(footer)
    }

    fn line_factor(&self) -> f32 {
        self.config.layout.fonts.line_height
    }

    fn header(&self, flow: &mut Flow, record: &ContentRecord, body: TextStyle) {
        self.cell(flow, &record.title, body.sized(18.0).bold(), 10.0);
        flow.gap(2.0);

        let meta = body.sized(10.0).colored(MUTED);
        let breadcrumb = record.breadcrumb();
        if !breadcrumb.is_empty() {
            self.cell(flow, &breadcrumb, meta, 6.0);
            flow.gap(2.0);
        }
        let posted = format!(
            "Posted: {}",
            format_timestamp(&record.created_at, &self.config.timestamp_format)
        );
        self.cell(flow, &posted, meta, 6.0);
        flow.gap(4.0);

        rule(flow, RULE_COLOR, RULE_THICKNESS);
        flow.gap(6.0);
    }

    fn attachments(&self, flow: &mut Flow, attachments: &[Attachment], body: TextStyle) {
        self.cell(flow, "Attachments:", body.sized(12.0).bold(), 8.0);
        let item = body.sized(10.0);
        for attachment in attachments {
            self.cell(flow, &format!("- {}", attachment.original_filename), item, 5.0);
        }
        if self.config.attachments_note {
            self.cell(flow, ATTACHMENTS_NOTE, body.sized(9.0).italic().colored(MUTED), 5.0);
        }
        flow.gap(4.0);
    }

    fn footer(&self, export_date: NaiveDate, body: TextStyle) -> TextElement {
        let date = format_date(&export_date, &self.config.footer_date_format);
        let text = format!("Exported from {} on {}", self.config.app_name, date);
        text_element(&text, &body.sized(8.0).italic().colored(FAINT), None)
    }

    /// A line of text in a box at least `min_height` tall, wrapped to the
    /// content width.
    fn cell(&self, flow: &mut Flow, text: &str, style: TextStyle, min_height: f32) {
        let (x, width) = (flow.content_left(), flow.content_width());
        let factor = self.line_factor();
        for line in wrap(&[Piece::new(text, style)], width) {
            let height = line.height(factor, min_height).max(min_height);
            flow.ensure_room(height);
            draw_line(flow, &line, x, height);
            flow.advance(height);
        }
    }
}

/// Formats with a chrono pattern, falling back to the storage format when the
/// pattern is invalid.
pub fn format_timestamp(value: &NaiveDateTime, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(pattern)).is_err() {
        log::warn!("Invalid timestamp format '{}'", pattern);
        return value.format("%Y-%m-%d %H:%M:%S").to_string();
    }
    out
}

pub fn format_date(value: &NaiveDate, pattern: &str) -> String {
    let mut out = String::new();
    if write!(out, "{}", value.format(pattern)).is_err() {
        log::warn!("Invalid date format '{}'", pattern);
        return value.format("%Y-%m-%d").to_string();
    }
    out
}
