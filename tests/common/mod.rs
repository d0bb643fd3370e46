#![allow(dead_code)]

pub mod fixtures;

use lopdf::{Dictionary, Document as LopdfDocument, Object};
use postpress_render_lopdf::decode_text_string;
use std::collections::HashMap;

pub type TestResult = Result<(), Box<dyn std::error::Error>>;

/// One `Tj` operation as read back from a page.
#[derive(Debug, Clone, PartialEq)]
pub struct ShownText {
    pub base_font: String,
    pub size: f32,
    pub text: String,
}

/// Wrapper around a generated PDF with helper methods
pub struct GeneratedPdf {
    pub bytes: Vec<u8>,
    pub doc: LopdfDocument,
}

impl GeneratedPdf {
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self, Box<dyn std::error::Error>> {
        let doc = LopdfDocument::load_mem(&bytes)?;
        Ok(Self { bytes, doc })
    }

    pub fn page_count(&self) -> usize {
        self.doc.get_pages().len()
    }

    /// Text shown on page `page_no` (1-based), in content stream order.
    pub fn page_texts(&self, page_no: u32) -> Vec<ShownText> {
        let pages = self.doc.get_pages();
        let Some(&page_id) = pages.get(&page_no) else {
            return Vec::new();
        };
        let fonts = self.page_fonts(page_id);
        let Ok(content) = self.doc.get_and_decode_page_content(page_id) else {
            return Vec::new();
        };

        let mut current = (String::new(), 0.0);
        let mut out = Vec::new();
        for op in &content.operations {
            match op.operator.as_str() {
                "Tf" => {
                    let name = op
                        .operands
                        .first()
                        .and_then(|o| o.as_name().ok())
                        .map(|n| String::from_utf8_lossy(n).into_owned())
                        .unwrap_or_default();
                    let size = op.operands.get(1).and_then(|o| o.as_float().ok()).unwrap_or(0.0);
                    current = (fonts.get(&name).cloned().unwrap_or(name), size);
                }
                "Tj" => {
                    if let Some(Object::String(bytes, _)) = op.operands.first() {
                        out.push(ShownText {
                            base_font: current.0.clone(),
                            size: current.1,
                            text: decode_win_ansi(bytes),
                        });
                    }
                }
                _ => {}
            }
        }
        out
    }

    pub fn page_lines(&self, page_no: u32) -> Vec<String> {
        self.page_texts(page_no).into_iter().map(|t| t.text).collect()
    }

    /// Every shown string of every page, one per line.
    pub fn all_text(&self) -> String {
        (1..=self.page_count() as u32)
            .flat_map(|n| self.page_lines(n))
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// First page (1-based) showing a string that contains `needle`.
    pub fn page_of(&self, needle: &str) -> Option<u32> {
        (1..=self.page_count() as u32).find(|&n| self.page_lines(n).iter().any(|l| l.contains(needle)))
    }

    pub fn info(&self, key: &str) -> Option<String> {
        let info_id = self.doc.trailer.get(b"Info").ok()?.as_reference().ok()?;
        let info = self.doc.get_object(info_id).ok()?.as_dict().ok()?;
        let value = info.get(key.as_bytes()).ok()?.as_str().ok()?;
        Some(decode_text_string(value))
    }

    /// Number of image XObjects in the file.
    pub fn image_count(&self) -> usize {
        self.doc
            .objects
            .values()
            .filter(|obj| match obj {
                Object::Stream(stream) => stream
                    .dict
                    .get(b"Subtype")
                    .and_then(|s| s.as_name())
                    .map(|name| name == b"Image")
                    .unwrap_or(false),
                _ => false,
            })
            .count()
    }

    /// `(width, height)` in points of every image drawn on page `page_no`.
    pub fn image_sizes(&self, page_no: u32) -> Vec<(f32, f32)> {
        let pages = self.doc.get_pages();
        let Some(&page_id) = pages.get(&page_no) else {
            return Vec::new();
        };
        let Ok(content) = self.doc.get_and_decode_page_content(page_id) else {
            return Vec::new();
        };
        content
            .operations
            .iter()
            .filter(|op| op.operator == "cm")
            .filter_map(|op| {
                let w = op.operands.first()?.as_float().ok()?;
                let h = op.operands.get(3)?.as_float().ok()?;
                Some((w, h))
            })
            .collect()
    }

    /// Save PDF to a file for manual debugging
    pub fn save_for_debug(&self, name: &str) -> std::io::Result<()> {
        std::fs::write(format!("test_output_{}.pdf", name), &self.bytes)
    }

    fn page_fonts(&self, page_id: lopdf::ObjectId) -> HashMap<String, String> {
        let mut out = HashMap::new();
        let Some(page) = self.doc.get_object(page_id).ok().and_then(|o| o.as_dict().ok()) else {
            return out;
        };
        let Some(resources) = page.get(b"Resources").ok().and_then(|r| self.resolve_dict(r)) else {
            return out;
        };
        let Some(fonts) = resources.get(b"Font").ok().and_then(|f| self.resolve_dict(f)) else {
            return out;
        };
        for (name, value) in fonts.iter() {
            if let Some(base) = self
                .resolve_dict(value)
                .and_then(|font| font.get(b"BaseFont").ok())
                .and_then(|b| b.as_name().ok())
            {
                out.insert(
                    String::from_utf8_lossy(name).into_owned(),
                    String::from_utf8_lossy(base).into_owned(),
                );
            }
        }
        out
    }

    fn resolve_dict<'a>(&'a self, object: &'a Object) -> Option<&'a Dictionary> {
        match object.as_reference() {
            Ok(id) => self.doc.get_object(id).ok()?.as_dict().ok(),
            Err(_) => object.as_dict().ok(),
        }
    }
}

/// Reads WinAnsi bytes back into text. Only the code points the exporter
/// writes outside Latin-1 are mapped.
pub fn decode_win_ansi(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|&b| match b {
            0x80 => '\u{20ac}',
            0x85 => '\u{2026}',
            0x91 => '\u{2018}',
            0x92 => '\u{2019}',
            0x93 => '\u{201c}',
            0x94 => '\u{201d}',
            0x95 => '\u{2022}',
            0x96 => '\u{2013}',
            0x97 => '\u{2014}',
            other => char::from(other),
        })
        .collect()
}

#[macro_export]
macro_rules! assert_pdf_contains_text {
    ($pdf:expr, $text:expr) => {
        let all = $pdf.all_text();
        assert!(all.contains($text), "Expected PDF to contain '{}', got:\n{}", $text, all);
    };
}

#[macro_export]
macro_rules! assert_pdf_lacks_text {
    ($pdf:expr, $text:expr) => {
        let all = $pdf.all_text();
        assert!(!all.contains($text), "Expected PDF not to contain '{}', got:\n{}", $text, all);
    };
}
