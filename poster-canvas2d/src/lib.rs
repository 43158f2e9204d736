//! Pure Rust subset of the Canvas 2D API, sized for poster compositing.
//!
//! The context renders with:
//! - `tiny-skia` for rasterization of paths, rectangles and images
//! - `cosmic-text` for shaping text into vector glyph outlines
//! - `fontdb` for font discovery (resolved once and shared between contexts)
//!
//! Only the operations a poster needs are provided: solid fills and strokes,
//! filled and stroked text with alignment and baseline, hard drop shadows,
//! scaled image drawing from a source rectangle, pixel readback and PNG output.
//!
//! # Example
//!
//! ```rust,ignore
//! use poster_canvas2d::{Canvas2dContext, Rect};
//!
//! let mut ctx = Canvas2dContext::new(400, 300)?;
//! ctx.set_fill_style("#ff0000")?;
//! ctx.fill_rect(&Rect::new(10.0, 10.0, 100.0, 50.0));
//! let png_data = ctx.to_png(None)?;
//! ```

mod context;
mod drawing_state;
mod error;
mod font_config;
mod font_parser;
mod geometry;
mod style;
mod text;

pub use context::{encode_png, Canvas2dContext};
pub use drawing_state::DrawingState;
pub use error::{Canvas2dError, Canvas2dResult};
pub use font_config::{
    bundled_fonts, EmbeddedFont, FamilyFallbacks, FontBook, FontConfig, BUNDLED_MONO_FAMILY,
    BUNDLED_SANS_FAMILY,
};
pub use font_parser::FontSpec;
pub use geometry::{ImageView, Rect, Rgba};
pub use style::{LineJoin, TextAlign, TextBaseline};
pub use text::TextMetrics;
