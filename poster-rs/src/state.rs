use crate::image_loading::BackgroundImage;
use crate::overlay::TextOverlaySpec;
use crate::paper::PaperSize;

/// Everything the compositor needs to draw a poster.
#[derive(Debug, Clone, Default)]
pub struct PosterState {
    /// Decoded background, or `None` for the placeholder.
    pub background: Option<BackgroundImage>,
    pub paper: PaperSize,
    pub overlay: TextOverlaySpec,
}

impl PosterState {
    pub fn new(paper: PaperSize, overlay: TextOverlaySpec) -> Self {
        Self {
            background: None,
            paper,
            overlay,
        }
    }

    pub fn with_background(mut self, background: BackgroundImage) -> Self {
        self.background = Some(background);
        self
    }
}
