use crate::error::RenderError;
use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::content::Content;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream, StringFormat};
use postpress_layout::{BuiltinFont, RasterImage};
use std::collections::{BTreeMap, HashMap};
use std::io::Write;

/// Fields of the PDF Info dictionary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentInfo {
    pub title: String,
    pub author: String,
    pub creator: String,
    pub subject: String,
    pub producer: String,
}

/// Builds the object graph of one PDF in memory.
///
/// Fonts and images are added on first use and shared by every page through
/// a single resources dictionary, written when the document is finished.
pub struct PdfDocumentWriter {
    document: Document,
    pages_id: ObjectId,
    resources_id: ObjectId,
    page_ids: Vec<ObjectId>,
    fonts: BTreeMap<&'static str, ObjectId>,
    /// Image key to XObject resource name.
    images: HashMap<String, String>,
    xobjects: BTreeMap<String, ObjectId>,
}

impl Default for PdfDocumentWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfDocumentWriter {
    pub fn new() -> Self {
        let mut document = Document::with_version("1.7");
        let pages_id = document.new_object_id();
        let resources_id = document.new_object_id();
        Self {
            document,
            pages_id,
            resources_id,
            page_ids: Vec::new(),
            fonts: BTreeMap::new(),
            images: HashMap::new(),
            xobjects: BTreeMap::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.page_ids.len()
    }

    /// Resource name of `font`, adding its font object on first use.
    pub fn font_resource(&mut self, font: BuiltinFont) -> &'static str {
        let name = font.resource_name();
        if !self.fonts.contains_key(name) {
            let mut font_dict = dictionary! {
                "Type" => "Font",
                "Subtype" => "Type1",
                "BaseFont" => font.base_name(),
            };
            if !font.is_symbolic() {
                font_dict.set("Encoding", "WinAnsiEncoding");
            }
            let id = self.document.add_object(font_dict);
            self.fonts.insert(name, id);
        }
        name
    }

    /// Resource name of `image`. Pixels are compressed and stored once per
    /// image key.
    pub fn image_resource(&mut self, image: &RasterImage) -> Result<String, RenderError> {
        if let Some(name) = self.images.get(&image.key) {
            return Ok(name.clone());
        }

        let data = deflate(&image.rgb)?;
        let stream = Stream::new(
            dictionary! {
                "Type" => "XObject",
                "Subtype" => "Image",
                "Width" => i64::from(image.width_px),
                "Height" => i64::from(image.height_px),
                "ColorSpace" => "DeviceRGB",
                "BitsPerComponent" => 8,
                "Filter" => "FlateDecode",
            },
            data,
        );
        let id = self.document.add_object(stream);
        let name = format!("Im{}", self.xobjects.len() + 1);
        log::debug!("Embedded image '{}' as /{}", image.key, name);
        self.xobjects.insert(name.clone(), id);
        self.images.insert(image.key.clone(), name.clone());
        Ok(name)
    }

    /// Adds a page of `width` x `height` points drawing `content`.
    pub fn add_page(&mut self, content: Content, width: f32, height: f32) -> Result<ObjectId, RenderError> {
        let content_stream = Stream::new(
            dictionary! { "Filter" => "FlateDecode" },
            deflate(&content.encode()?)?,
        );
        let content_id = self.document.add_object(content_stream);

        let page_dict = dictionary! {
            "Type" => "Page",
            "Parent" => self.pages_id,
            "MediaBox" => vec![0.into(), 0.into(), width.into(), height.into()],
            "Contents" => content_id,
            "Resources" => self.resources_id,
        };
        let page_id = self.document.add_object(page_dict);
        self.page_ids.push(page_id);
        Ok(page_id)
    }

    /// Writes the shared resources, page tree, catalog and Info dictionary and
    /// serializes the document.
    pub fn finish(mut self, info: &DocumentInfo) -> Result<Vec<u8>, RenderError> {
        if self.page_ids.is_empty() {
            return Err(RenderError::Other("document has no pages".into()));
        }

        let mut font_dict = Dictionary::new();
        for (name, id) in &self.fonts {
            font_dict.set(*name, *id);
        }
        let mut xobject_dict = Dictionary::new();
        for (name, id) in &self.xobjects {
            xobject_dict.set(name.as_str(), *id);
        }
        let mut resources = dictionary! { "Font" => font_dict };
        if !xobject_dict.is_empty() {
            resources.set("XObject", xobject_dict);
        }
        self.document
            .objects
            .insert(self.resources_id, Object::Dictionary(resources));

        let kids: Vec<Object> = self.page_ids.iter().map(|id| Object::from(*id)).collect();
        let pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => self.page_ids.len() as i64,
        };
        self.document
            .objects
            .insert(self.pages_id, Object::Dictionary(pages_dict));

        let catalog_id = self
            .document
            .add_object(dictionary! { "Type" => "Catalog", "Pages" => self.pages_id });
        self.document.trailer.set("Root", catalog_id);

        let info_id = self.document.add_object(dictionary! {
            "Title" => text_string(&info.title),
            "Author" => text_string(&info.author),
            "Creator" => text_string(&info.creator),
            "Subject" => text_string(&info.subject),
            "Producer" => text_string(&info.producer),
        });
        self.document.trailer.set("Info", info_id);

        let mut out = Vec::new();
        self.document.save_to(&mut out)?;
        Ok(out)
    }
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, RenderError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder.write_all(data)?;
    Ok(encoder.finish()?)
}

/// A PDF text string: a literal for printable ASCII, UTF-16BE with a byte
/// order mark otherwise.
pub fn text_string(text: &str) -> Object {
    if text.chars().all(|c| (' '..='~').contains(&c)) {
        return Object::String(text.as_bytes().to_vec(), StringFormat::Literal);
    }
    let mut bytes = vec![0xfe, 0xff];
    for unit in text.encode_utf16() {
        bytes.extend_from_slice(&unit.to_be_bytes());
    }
    Object::String(bytes, StringFormat::Hexadecimal)
}

/// Inverse of [`text_string`], for reading Info values back.
pub fn decode_text_string(bytes: &[u8]) -> String {
    match bytes.strip_prefix(&[0xfe, 0xff]) {
        Some(utf16) => {
            let units: Vec<u16> = utf16
                .chunks_exact(2)
                .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
                .collect();
            String::from_utf16_lossy(&units)
        }
        None => bytes.iter().map(|&b| char::from(b)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_string_roundtrip_for_non_ascii() {
        for text in ["Plain title", "Café — notes", ""] {
            let Object::String(bytes, _) = text_string(text) else {
                panic!("expected a string object");
            };
            assert_eq!(decode_text_string(&bytes), text);
        }
    }

    #[test]
    fn test_fonts_are_registered_once() {
        let mut writer = PdfDocumentWriter::new();
        assert_eq!(writer.font_resource(BuiltinFont::Helvetica), "F1");
        assert_eq!(writer.font_resource(BuiltinFont::Helvetica), "F1");
        writer.font_resource(BuiltinFont::ZapfDingbats);
        assert_eq!(writer.fonts.len(), 2);
    }

    #[test]
    fn test_finish_without_pages_fails() {
        let writer = PdfDocumentWriter::new();
        assert!(writer.finish(&DocumentInfo::default()).is_err());
    }
}
