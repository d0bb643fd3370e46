use super::GeneratedPdf;
use chrono::NaiveDate;
use postpress::{ContentRecord, Exporter, ResourceProvider};
use postpress_resource::{ResourceError, SharedResourceData};
use serde_json::{json, Value};
use std::io::Cursor;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::TempDir;

pub fn export_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 1).unwrap()
}

/// A post record with no attachments or replies.
pub fn post(id: u64, title: &str, html: &str) -> Value {
    json!({
        "id": id,
        "title": title,
        "category_name": "Engineering",
        "subcategory_name": "Guides",
        "created_at": "2024-03-05 14:07:00",
        "html_content": html,
        "attachments": [],
        "replies": []
    })
}

pub fn reply(html: &str, created_at: &str) -> Value {
    json!({ "content_html": html, "created_at": created_at })
}

pub fn record(value: Value) -> ContentRecord {
    ContentRecord::from_json(&value.to_string()).unwrap()
}

pub fn export_with(exporter: &Exporter, value: Value) -> GeneratedPdf {
    let document = exporter.export_at(&record(value), export_date()).unwrap();
    GeneratedPdf::from_bytes(document.bytes).unwrap()
}

/// Exports with the default configuration and no document root.
pub fn export(value: Value) -> GeneratedPdf {
    let exporter = Exporter::builder().build().unwrap();
    export_with(&exporter, value)
}

/// A solid RGB PNG.
pub fn png(width: u32, height: u32) -> Vec<u8> {
    let img = image::RgbImage::from_pixel(width, height, image::Rgb([30, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    image::DynamicImage::ImageRgb8(img)
        .write_to(&mut out, image::ImageFormat::Png)
        .unwrap();
    out.into_inner()
}

/// A temporary document root holding `files` at their root-relative paths.
pub fn docroot(files: &[(&str, Vec<u8>)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (path, data) in files {
        let full = dir.path().join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(full, data).unwrap();
    }
    dir
}

pub fn exporter_for(root: &Path) -> Exporter {
    Exporter::builder().with_document_root(root).build().unwrap()
}

/// Counts every lookup and answers none of them.
#[derive(Debug, Default)]
pub struct CountingProvider {
    pub calls: AtomicUsize,
}

impl CountingProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ResourceProvider for CountingProvider {
    fn load(&self, path: &str) -> Result<SharedResourceData, ResourceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(ResourceError::NotFound(path.to_string()))
    }

    fn is_readable(&self, _path: &str) -> bool {
        self.calls.fetch_add(1, Ordering::SeqCst);
        false
    }

    fn name(&self) -> &'static str {
        "counting"
    }
}
