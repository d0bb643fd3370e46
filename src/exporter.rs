use crate::assembler::DocumentAssembler;
use crate::config::ExportConfig;
use crate::document::ExportedDocument;
use crate::error::ExportError;
use crate::filename::export_filename;
use crate::record::ContentRecord;
use crate::store::ContentStore;
use chrono::{Local, NaiveDate};
use postpress_render_lopdf::{render_pages, DocumentInfo};
use postpress_resource::{DocumentRoot, InMemoryResourceProvider, ResourceProvider};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

pub const PDF_SUBJECT: &str = "Knowledge Base Export";
pub const PDF_PRODUCER: &str = "postpress";

/// A builder for creating an [`Exporter`].
#[derive(Default)]
pub struct ExporterBuilder {
    config: Option<ExportConfig>,
    resources: Option<Arc<dyn ResourceProvider>>,
}

impl ExporterBuilder {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn with_config(mut self, config: ExportConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Loads the configuration from a JSON file.
    pub fn with_config_file<P: AsRef<Path>>(mut self, path: P) -> Result<Self, ExportError> {
        self.config = Some(ExportConfig::from_file(path)?);
        Ok(self)
    }

    /// Resolves images against files below `root`.
    pub fn with_document_root<P: AsRef<Path>>(mut self, root: P) -> Self {
        self.resources = Some(Arc::new(DocumentRoot::new(root)));
        self
    }

    pub fn with_resource_provider(mut self, provider: Arc<dyn ResourceProvider>) -> Self {
        self.resources = Some(provider);
        self
    }

    /// Validates the configuration and creates the exporter. Without a
    /// document root or provider, every local image becomes a placeholder.
    pub fn build(self) -> Result<Exporter, ExportError> {
        let config = self.config.unwrap_or_default();
        config.validate()?;
        let resources = self.resources.unwrap_or_else(|| {
            log::debug!("No document root configured; local images will not resolve");
            Arc::new(InMemoryResourceProvider::new())
        });
        Ok(Exporter { config, resources })
    }
}

/// Turns content records into PDF documents. Holds only configuration and a
/// shared resource provider; each export builds its own layout state.
#[derive(Debug, Clone)]
pub struct Exporter {
    config: ExportConfig,
    resources: Arc<dyn ResourceProvider>,
}

impl Exporter {
    pub fn builder() -> ExporterBuilder {
        ExporterBuilder::new()
    }

    pub fn config(&self) -> &ExportConfig {
        &self.config
    }

    /// Exports `record`, dating the footer and filename today.
    pub fn export(&self, record: &ContentRecord) -> Result<ExportedDocument, ExportError> {
        self.export_at(record, Local::now().date_naive())
    }

    /// Exports `record` as of `date`.
    pub fn export_at(&self, record: &ContentRecord, date: NaiveDate) -> Result<ExportedDocument, ExportError> {
        let started = Instant::now();

        let mut assembler = DocumentAssembler::new(&self.config, self.resources.as_ref());
        let pages = assembler.assemble(record, date);

        let info = DocumentInfo {
            title: record.title.clone(),
            author: self.config.app_name.clone(),
            creator: self.config.app_name.clone(),
            subject: PDF_SUBJECT.to_string(),
            producer: PDF_PRODUCER.to_string(),
        };
        let bytes = render_pages(&pages, &info)?;
        let filename = export_filename(&self.config.filename_template, record.id, &record.title, date, "pdf");

        log::info!(
            "Exported post {} as {} ({} page(s), {} bytes) in {:.2?}",
            record.id,
            filename,
            pages.len(),
            bytes.len(),
            started.elapsed()
        );
        Ok(ExportedDocument {
            bytes,
            filename,
            page_count: pages.len(),
        })
    }

    /// Fetches post `id` from `store` and exports it.
    pub fn export_from_store(&self, store: &dyn ContentStore, id: u64) -> Result<ExportedDocument, ExportError> {
        let record = store
            .fetch_post(id)?
            .ok_or_else(|| ExportError::NotFound(id.to_string()))?;
        self.export(&record)
    }
}
