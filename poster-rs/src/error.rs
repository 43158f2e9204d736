//! Error types for poster composition.

use crate::generator::GenerationError;
use poster_canvas2d::Canvas2dError;
use thiserror::Error;

/// Errors raised by the poster core.
#[derive(Debug, Error)]
pub enum PosterError {
    /// Canvas backend failure.
    #[error("canvas error: {0}")]
    Canvas(#[from] Canvas2dError),

    /// Image bytes could not be decoded into a raster.
    #[error("failed to decode image: {0}")]
    ImageDecode(String),

    /// Image encoding (PNG or JPEG) failed.
    #[error("failed to encode image: {0}")]
    ImageEncode(String),

    #[error("unknown paper size: {0}")]
    UnknownPaperSize(String),

    #[error("color {0} is not in the poster palette")]
    UnknownColor(String),

    #[error("unknown vibe: {0}")]
    UnknownVibe(String),

    /// A generation was requested while another was still in flight.
    #[error("a generation is already in progress")]
    GenerationInProgress,

    /// A generation result arrived with no generation pending.
    #[error("no generation is in progress")]
    NoGenerationInProgress,

    #[error(transparent)]
    Generation(#[from] GenerationError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for PosterError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::Encoding(e) => PosterError::ImageEncode(e.to_string()),
            other => PosterError::ImageDecode(other.to_string()),
        }
    }
}

/// Result type for poster operations.
pub type PosterResult<T> = Result<T, PosterError>;
