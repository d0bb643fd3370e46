use postpress_render_lopdf::RenderError;
use thiserror::Error;

/// Everything that can stop an export. Per-block layout problems never get
/// here; they are rendered as markers inside the document.
#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Content record {0} not found")]
    NotFound(String),

    #[error("Content store error: {0}")]
    Store(String),

    #[error("Configuration is invalid: {0}")]
    Config(String),

    #[error("Rendering failed: {0}")]
    Render(#[from] RenderError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
