//! Image bytes for exported documents.
//!
//! Markup refers to images by the path the web application served them
//! under. A [`ResourceProvider`] answers those lookups relative to a document
//! root:
//!
//! - [`DocumentRoot`] reads from a directory on disk and refuses paths that
//!   escape it.
//! - [`InMemoryResourceProvider`] serves pre-registered bytes, for tests and
//!   for callers that already hold the files.

mod docroot;
mod provider;

pub use docroot::DocumentRoot;
pub use provider::{InMemoryResourceProvider, ResourceError, ResourceProvider, SharedResourceData};
