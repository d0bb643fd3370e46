//! PDF output for laid-out pages using lopdf.
//!
//! Text is set in the standard Type1 faces, so no font data is embedded.
//! Images become Flate-compressed RGB XObjects, each written once.

mod error;
mod renderer;
mod writer;

pub use error::RenderError;
pub use renderer::{render_pages, PdfRenderer};
pub use writer::{decode_text_string, text_string, DocumentInfo, PdfDocumentWriter};
