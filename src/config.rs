use crate::error::ExportError;
use chrono::format::{Item, StrftimeItems};
use postpress_layout::LayoutConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Settings for an [`Exporter`](crate::Exporter). Every field has a default,
/// so a partial JSON object is a valid configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExportConfig {
    pub layout: LayoutConfig,
    /// Output filename with `{id}`, `{slug}`, `{date}` and `{ext}` placeholders.
    ///
    /// Defaults to `"post_{id}_{slug}_{date}.{ext}"`.
    pub filename_template: String,
    /// chrono format for post and reply timestamps.
    pub timestamp_format: String,
    /// chrono format for the export date in the footer.
    pub footer_date_format: String,
    /// Shown in the footer and written as the PDF author and creator.
    pub app_name: String,
    pub footer_enabled: bool,
    /// Print the note pointing readers to the online version under the
    /// attachment list.
    pub attachments_note: bool,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            filename_template: "post_{id}_{slug}_{date}.{ext}".to_string(),
            timestamp_format: "%b %-d, %Y at %-I:%M %p".to_string(),
            footer_date_format: "%b %-d, %Y".to_string(),
            app_name: "Work Knowledge Base".to_string(),
            footer_enabled: true,
            attachments_note: true,
        }
    }
}

impl ExportConfig {
    pub fn from_json(json: &str) -> Result<Self, ExportError> {
        let config: ExportConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ExportError> {
        let path = path.as_ref();
        let json = fs::read_to_string(path).map_err(|e| {
            ExportError::Config(format!("failed to read '{}': {}", path.display(), e))
        })?;
        Self::from_json(&json)
    }

    /// Rejects values the layout cannot work with.
    pub fn validate(&self) -> Result<(), ExportError> {
        let page = self.layout.page.size.dimensions();
        let margins = self.layout.page.margins;
        if !page.has_area() {
            return Err(ExportError::Config("page size must be positive".to_string()));
        }
        if page.width - margins.horizontal() <= 0.0 || page.height - margins.top - margins.bottom <= 0.0 {
            return Err(ExportError::Config(
                "margins leave no room for content".to_string(),
            ));
        }
        if self.layout.fonts.base_size <= 0.0 || self.layout.fonts.line_height <= 0.0 {
            return Err(ExportError::Config(
                "font size and line height must be positive".to_string(),
            ));
        }
        if self.layout.images.px_to_mm <= 0.0 {
            return Err(ExportError::Config("pxToMm must be positive".to_string()));
        }
        for pattern in [&self.timestamp_format, &self.footer_date_format] {
            if StrftimeItems::new(pattern).any(|item| matches!(item, Item::Error)) {
                return Err(ExportError::Config(format!(
                    "'{}' is not a valid date format",
                    pattern
                )));
            }
        }
        if !self.filename_template.contains("{ext}") && !self.filename_template.ends_with(".pdf") {
            log::warn!(
                "Filename template '{}' produces names without a .pdf extension",
                self.filename_template
            );
        }
        Ok(())
    }
}
