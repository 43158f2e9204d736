use thiserror::Error;

pub type Canvas2dResult<T> = Result<T, Canvas2dError>;

#[derive(Debug, Error)]
pub enum Canvas2dError {
    /// Zero-sized, or larger than the 32767 pixel limit.
    #[error("invalid canvas size {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },

    #[error("invalid CSS font: {0}")]
    Font(String),

    #[error("invalid CSS color: {0}")]
    Color(String),

    #[error("image data has {actual} bytes, expected {expected} for {width}x{height} RGBA")]
    ImageDataMismatch {
        width: u32,
        height: u32,
        expected: usize,
        actual: usize,
    },

    #[error("PNG encoding failed: {0}")]
    Png(#[from] png::EncodingError),
}
