//! Decoding of background images from uploads and generator payloads.

use crate::error::{PosterError, PosterResult};
use poster_canvas2d::ImageView;
use std::sync::Arc;

/// Where a background came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageOrigin {
    Generated,
    Uploaded,
}

/// A fully decoded, non-empty RGBA raster.
///
/// Pixels are straight alpha and shared, so cloning a `PosterState` does not
/// copy them.
#[derive(Debug, Clone)]
pub struct BackgroundImage {
    width: u32,
    height: u32,
    data: Arc<Vec<u8>>,
    origin: ImageOrigin,
}

impl BackgroundImage {
    /// Decode PNG or JPEG bytes.
    pub fn decode(bytes: &[u8], origin: ImageOrigin) -> PosterResult<Self> {
        if bytes.is_empty() {
            return Err(PosterError::ImageDecode("empty image data".to_string()));
        }
        let rgba = image::load_from_memory(bytes)?.to_rgba8();
        let (width, height) = rgba.dimensions();
        log::debug!("decoded {:?} background {}x{}", origin, width, height);
        Self::from_rgba(width, height, rgba.into_raw(), origin)
    }

    /// Wrap already-decoded straight-alpha RGBA pixels.
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>, origin: ImageOrigin) -> PosterResult<Self> {
        if width == 0 || height == 0 {
            return Err(PosterError::ImageDecode(format!(
                "image has zero size ({width}x{height})"
            )));
        }
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(PosterError::ImageDecode(format!(
                "expected {expected} bytes of RGBA data, got {}",
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data: Arc::new(data),
            origin,
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn origin(&self) -> ImageOrigin {
        self.origin
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn view(&self) -> ImageView<'_> {
        ImageView::new(&self.data, self.width, self.height)
    }
}
