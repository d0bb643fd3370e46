use thiserror::Error;

/// A failure confined to one content block. The engine replaces the block
/// with a visible marker and carries on with the next one.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum LayoutError {
    #[error("image '{path}' has degenerate dimensions {width}x{height}")]
    DegenerateImage { path: String, width: u32, height: u32 },

    #[error("image '{path}' has {pixels} pixels, more than the limit of {limit}")]
    ImageTooLarge { path: String, pixels: u64, limit: u64 },

    #[error("{0}")]
    Generic(String),
}
