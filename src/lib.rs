//! Exports knowledge-base posts as paginated PDF documents.
//!
//! A post's body and replies are stored as editor HTML. The exporter
//! normalizes and segments that markup, lays the blocks out page by page
//! together with the post header, attachment list and replies, and renders
//! the pages with the standard PDF fonts.
//!
//! ```no_run
//! use postpress::{ContentRecord, Exporter};
//!
//! # fn main() -> Result<(), postpress::ExportError> {
//! let record = ContentRecord::from_json(&std::fs::read_to_string("post.json")?)?;
//! let exporter = Exporter::builder().with_document_root("/var/www/html").build()?;
//! let document = exporter.export(&record)?;
//! document.write_to_dir(".")?;
//! # Ok(())
//! # }
//! ```

pub mod assembler;
pub mod config;
pub mod document;
pub mod error;
pub mod exporter;
pub mod filename;
pub mod record;
pub mod store;

pub use config::ExportConfig;
pub use document::ExportedDocument;
pub use error::ExportError;
pub use exporter::{Exporter, ExporterBuilder};
pub use record::{Attachment, ContentRecord, Reply};
pub use store::{ContentStore, InMemoryContentStore, JsonDirectoryStore};

pub use postpress_layout::LayoutConfig;
pub use postpress_resource::{DocumentRoot, InMemoryResourceProvider, ResourceProvider};
