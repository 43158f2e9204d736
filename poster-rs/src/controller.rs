//! Interaction controller for the poster editor.
//!
//! Input handlers only mutate [`PosterState`] and then ask the compositor for
//! a fresh preview frame. The last frame is kept so export writes exactly
//! what was on screen.

use crate::compositor::{Compositor, Frame, RenderTarget};
use crate::error::{PosterError, PosterResult};
use crate::export::ExportedPoster;
use crate::generator::{GeneratedImage, GenerationError, GenerationRequest, ImageGenerator, Vibe};
use crate::image_loading::{BackgroundImage, ImageOrigin};
use crate::overlay::TextColor;
use crate::paper::PaperSize;
use crate::state::PosterState;
use chrono::{DateTime, Utc};

pub const GENERATION_ERROR_MESSAGE: &str = "Gagal bikin gambar. Coba lagi yak.";
pub const UPLOAD_ERROR_MESSAGE: &str = "Gambar tidak bisa dibaca.";

pub type PointerId = i32;

/// On-screen rectangle of the preview surface, in client coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasRect {
    pub left: f32,
    pub top: f32,
    pub width: f32,
    pub height: f32,
}

impl CanvasRect {
    pub fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Client point as fractions of the rectangle, clamped to [0, 1].
    /// `None` while the rectangle has no area.
    pub fn normalize(&self, client_x: f32, client_y: f32) -> Option<(f32, f32)> {
        if !(self.width > 0.0 && self.height > 0.0) {
            return None;
        }
        let x = (client_x - self.left) / self.width;
        let y = (client_y - self.top) / self.height;
        Some((x.clamp(0.0, 1.0), y.clamp(0.0, 1.0)))
    }
}

/// Host surface that can route a pointer's events to the canvas.
pub trait PointerCapture {
    fn capture(&mut self, pointer_id: PointerId);
    fn release(&mut self, pointer_id: PointerId);
}

/// Capture sink for hosts without pointer capture.
#[derive(Debug, Default)]
pub struct NoCapture;

impl PointerCapture for NoCapture {
    fn capture(&mut self, _pointer_id: PointerId) {}
    fn release(&mut self, _pointer_id: PointerId) {}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging { pointer_id: PointerId },
}

/// Where the background comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SourceMode {
    #[default]
    Generate,
    Upload,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GeneratorSession {
    #[default]
    Idle,
    Generating,
}

pub struct InteractionController {
    compositor: Compositor,
    state: PosterState,
    drag: DragState,
    mode: SourceMode,
    vibe: Vibe,
    custom_prompt: String,
    session: GeneratorSession,
    error: Option<&'static str>,
    frame: Frame,
    capture: Box<dyn PointerCapture>,
}

impl std::fmt::Debug for InteractionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InteractionController")
            .field("state", &self.state)
            .field("drag", &self.drag)
            .field("mode", &self.mode)
            .field("vibe", &self.vibe)
            .field("session", &self.session)
            .field("error", &self.error)
            .finish_non_exhaustive()
    }
}

impl InteractionController {
    /// Create a controller with the default poster and render the first frame.
    pub fn new(compositor: Compositor) -> PosterResult<Self> {
        Self::with_state(compositor, PosterState::default())
    }

    pub fn with_state(compositor: Compositor, state: PosterState) -> PosterResult<Self> {
        let frame = compositor.render(&state, RenderTarget::Preview)?;
        Ok(Self {
            compositor,
            state,
            drag: DragState::Idle,
            mode: SourceMode::default(),
            vibe: Vibe::default(),
            custom_prompt: String::new(),
            session: GeneratorSession::Idle,
            error: None,
            frame,
            capture: Box::new(NoCapture),
        })
    }

    /// Route pointer capture through the host surface.
    pub fn with_pointer_capture(mut self, capture: impl PointerCapture + 'static) -> Self {
        self.capture = Box::new(capture);
        self
    }

    pub fn state(&self) -> &PosterState {
        &self.state
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    pub fn mode(&self) -> SourceMode {
        self.mode
    }

    pub fn vibe(&self) -> Vibe {
        self.vibe
    }

    pub fn custom_prompt(&self) -> &str {
        &self.custom_prompt
    }

    pub fn session(&self) -> GeneratorSession {
        self.session
    }

    pub fn is_generating(&self) -> bool {
        self.session == GeneratorSession::Generating
    }

    /// User-facing message for the last failed action, if any.
    pub fn error_message(&self) -> Option<&'static str> {
        self.error
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    /// The most recently rendered preview.
    pub fn last_frame(&self) -> &Frame {
        &self.frame
    }

    /// Re-render the preview from the current state.
    pub fn render(&mut self) -> PosterResult<&Frame> {
        self.frame = self.compositor.render(&self.state, RenderTarget::Preview)?;
        Ok(&self.frame)
    }

    // Pointer input

    pub fn pointer_down(&mut self, pointer_id: PointerId) {
        if let DragState::Dragging { .. } = self.drag {
            return;
        }
        self.capture.capture(pointer_id);
        self.drag = DragState::Dragging { pointer_id };
    }

    /// Move the text anchor while dragging. Returns whether a re-render happened.
    pub fn pointer_move(
        &mut self,
        pointer_id: PointerId,
        client_x: f32,
        client_y: f32,
        rect: CanvasRect,
    ) -> PosterResult<bool> {
        match self.drag {
            DragState::Dragging { pointer_id: active } if active == pointer_id => {}
            _ => return Ok(false),
        }
        let Some((x, y)) = rect.normalize(client_x, client_y) else {
            return Ok(false);
        };
        self.state.overlay.set_position(x, y);
        self.render()?;
        Ok(true)
    }

    pub fn pointer_up(&mut self, pointer_id: PointerId) {
        self.end_drag(pointer_id);
    }

    pub fn pointer_leave(&mut self, pointer_id: PointerId) {
        self.end_drag(pointer_id);
    }

    pub fn pointer_cancel(&mut self, pointer_id: PointerId) {
        self.end_drag(pointer_id);
    }

    fn end_drag(&mut self, pointer_id: PointerId) {
        if self.drag == (DragState::Dragging { pointer_id }) {
            self.capture.release(pointer_id);
            self.drag = DragState::Idle;
        }
    }

    // Overlay and paper edits

    pub fn set_text(&mut self, text: impl Into<String>) -> PosterResult<()> {
        self.state.overlay.set_text(text);
        self.render().map(|_| ())
    }

    pub fn set_color(&mut self, color: TextColor) -> PosterResult<()> {
        self.state.overlay.set_color(color);
        self.render().map(|_| ())
    }

    pub fn set_scale(&mut self, scale: f32) -> PosterResult<()> {
        self.state.overlay.set_scale(scale);
        self.render().map(|_| ())
    }

    pub fn set_paper(&mut self, paper: PaperSize) -> PosterResult<()> {
        self.state.paper = paper;
        self.render().map(|_| ())
    }

    /// Switching source keeps the overlay and the current background.
    pub fn set_mode(&mut self, mode: SourceMode) {
        self.mode = mode;
    }

    pub fn set_vibe(&mut self, vibe: Vibe) {
        self.vibe = vibe;
    }

    pub fn set_custom_prompt(&mut self, prompt: impl Into<String>) {
        self.custom_prompt = prompt.into();
    }

    // Generation

    /// Enter the generating state and return the request to send.
    pub fn begin_generation(&mut self) -> PosterResult<GenerationRequest> {
        if self.is_generating() {
            return Err(PosterError::GenerationInProgress);
        }
        self.session = GeneratorSession::Generating;
        self.error = None;
        Ok(GenerationRequest::for_vibe(
            self.vibe,
            Some(self.custom_prompt.as_str()),
        ))
    }

    /// Apply the outcome of a generation started with [`begin_generation`].
    ///
    /// Returns `Ok(true)` when the image became the background. Failures,
    /// including undecodable payloads, keep the old background and set the
    /// generation error message.
    ///
    /// [`begin_generation`]: InteractionController::begin_generation
    pub fn finish_generation(
        &mut self,
        result: Result<GeneratedImage, GenerationError>,
    ) -> PosterResult<bool> {
        if !self.is_generating() {
            return Err(PosterError::NoGenerationInProgress);
        }
        self.session = GeneratorSession::Idle;

        let decoded = result
            .map_err(PosterError::from)
            .and_then(|image| BackgroundImage::decode(&image.data, ImageOrigin::Generated));
        match decoded {
            Ok(background) => {
                self.state.background = Some(background);
                self.render()?;
                Ok(true)
            }
            Err(err) => {
                log::error!("Background generation failed: {err}");
                self.error = Some(GENERATION_ERROR_MESSAGE);
                Ok(false)
            }
        }
    }

    /// Run one generation end to end.
    pub async fn generate(&mut self, generator: &impl ImageGenerator) -> PosterResult<bool> {
        let request = self.begin_generation()?;
        let result = generator.generate(&request).await;
        self.finish_generation(result)
    }

    // Upload

    /// Use uploaded bytes as the background. Returns whether they decoded.
    pub fn upload(&mut self, bytes: &[u8]) -> PosterResult<bool> {
        match BackgroundImage::decode(bytes, ImageOrigin::Uploaded) {
            Ok(background) => {
                self.error = None;
                self.state.background = Some(background);
                self.render()?;
                Ok(true)
            }
            Err(err) => {
                log::warn!("Uploaded image could not be decoded: {err}");
                self.error = Some(UPLOAD_ERROR_MESSAGE);
                Ok(false)
            }
        }
    }

    // Export

    /// Encode the last preview frame exactly as rendered.
    pub fn export(&self, at: DateTime<Utc>) -> PosterResult<ExportedPoster> {
        ExportedPoster::from_frame(&self.frame, at)
    }

    /// Re-render at the paper's full print resolution and encode that.
    pub fn export_print(&self, at: DateTime<Utc>) -> PosterResult<ExportedPoster> {
        let frame = self.compositor.render(&self.state, RenderTarget::Print)?;
        ExportedPoster::from_frame(&frame, at)
    }
}

impl Drop for InteractionController {
    fn drop(&mut self) {
        if let DragState::Dragging { pointer_id } = self.drag {
            self.capture.release(pointer_id);
            self.drag = DragState::Idle;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(CanvasRect::new(100.0, 50.0, 200.0, 400.0), 200.0, 250.0, Some((0.5, 0.5)))]
    #[case(CanvasRect::new(100.0, 50.0, 200.0, 400.0), 0.0, 1000.0, Some((0.0, 1.0)))]
    #[case(CanvasRect::new(0.0, 0.0, 0.0, 400.0), 10.0, 10.0, None)]
    fn test_canvas_rect_normalize(
        #[case] rect: CanvasRect,
        #[case] x: f32,
        #[case] y: f32,
        #[case] expected: Option<(f32, f32)>,
    ) {
        assert_eq!(rect.normalize(x, y), expected);
    }
}
