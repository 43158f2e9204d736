#![doc = include_str!("../README.md")]

pub mod compositor;
pub mod controller;
pub mod error;
pub mod export;
pub mod gemini;
pub mod generator;
pub mod image_loading;
pub mod overlay;
pub mod paper;
pub mod pinboard;
pub mod state;

pub use poster_canvas2d::{EmbeddedFont, FamilyFallbacks, FontConfig};

pub use compositor::{Compositor, CompositorConfig, Frame, RenderTarget};
pub use controller::{CanvasRect, DragState, InteractionController, PointerCapture, SourceMode};
pub use error::{PosterError, PosterResult};
pub use export::ExportedPoster;
pub use gemini::{GeminiConfig, GeminiImageGenerator};
pub use generator::{GeneratedImage, GenerationError, GenerationRequest, ImageGenerator, Vibe};
pub use image_loading::{BackgroundImage, ImageOrigin};
pub use overlay::{TextColor, TextOverlaySpec};
pub use paper::PaperSize;
pub use pinboard::{CaptureSession, Pinboard, PinPost};
pub use state::PosterState;
