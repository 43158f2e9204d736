//! The drawing surface and its state machine.

mod drawing;
mod image_ops;
mod path_ops;
mod text_rendering;

pub use image_ops::encode_png;

use crate::drawing_state::DrawingState;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::font_config::{FontBook, FontConfig};
use crate::geometry::Rgba;
use crate::style::LineJoin;
use cosmic_text::{FontSystem, SwashCache};
use tiny_skia::{Color, PathBuilder, Pixmap};

/// Largest surface edge accepted, in pixels.
const MAX_DIMENSION: u32 = 32767;

/// An RGBA surface with a subset of the HTML canvas 2D API on top.
///
/// There is no transform stack; every coordinate is a device pixel.
pub struct Canvas2dContext {
    pub(crate) width: u32,
    pub(crate) height: u32,
    pub(crate) pixmap: Pixmap,
    pub(crate) font_system: FontSystem,
    pub(crate) swash_cache: SwashCache,
    pub(crate) state: DrawingState,
    saved: Vec<DrawingState>,
    pub(crate) path: PathBuilder,
}

impl Canvas2dContext {
    /// Surface backed by the system and bundled fonts. Scans the filesystem on every
    /// call, see [`Canvas2dContext::with_fonts`].
    pub fn new(width: u32, height: u32) -> Canvas2dResult<Self> {
        Self::with_fonts(width, height, &FontConfig::default().resolve())
    }

    /// Surface drawing text from an already loaded [`FontBook`].
    pub fn with_fonts(width: u32, height: u32, fonts: &FontBook) -> Canvas2dResult<Self> {
        let too_big = width > MAX_DIMENSION || height > MAX_DIMENSION;
        let pixmap = match too_big {
            true => None,
            false => Pixmap::new(width, height),
        }
        .ok_or(Canvas2dError::InvalidDimensions { width, height })?;

        Ok(Self {
            width,
            height,
            pixmap,
            font_system: FontSystem::new_with_locale_and_db("en".to_string(), fonts.db.clone()),
            swash_cache: SwashCache::new(),
            state: DrawingState::default(),
            saved: vec![],
            path: PathBuilder::new(),
        })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn state(&self) -> &DrawingState {
        &self.state
    }

    /// Push the drawing state.
    pub fn save(&mut self) {
        self.saved.push(self.state.clone());
        log::trace!(target: "canvas", "save (depth {})", self.saved.len());
    }

    /// Pop the drawing state. Unbalanced calls are ignored.
    pub fn restore(&mut self) {
        match self.saved.pop() {
            Some(state) => self.state = state,
            None => log::trace!(target: "canvas", "restore with empty stack"),
        }
    }

    pub fn set_fill_style(&mut self, css: &str) -> Canvas2dResult<()> {
        self.state.fill_color = parse_color(css)?;
        Ok(())
    }

    pub fn set_fill_rgba(&mut self, color: Rgba) {
        self.state.fill_color = color.into();
    }

    pub fn set_stroke_style(&mut self, css: &str) -> Canvas2dResult<()> {
        self.state.stroke_color = parse_color(css)?;
        Ok(())
    }

    /// Widths that are not finite and positive leave the current one in place.
    pub fn set_line_width(&mut self, width: f32) {
        if width > 0.0 && width.is_finite() {
            self.state.line_width = width;
        }
    }

    pub fn set_line_join(&mut self, join: LineJoin) {
        self.state.line_join = join;
    }

    /// Shadows are hard-edged: a copy of each painted shape in this color,
    /// displaced by the shadow offset.
    pub fn set_shadow_color(&mut self, css: &str) -> Canvas2dResult<()> {
        self.state.shadow_color = parse_color(css)?;
        Ok(())
    }

    pub fn set_shadow_offset(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            (self.state.shadow_offset_x, self.state.shadow_offset_y) = (x, y);
        }
    }

    pub fn clear_shadow(&mut self) {
        self.state.shadow_color = Color::TRANSPARENT;
    }

    /// Nearest-neighbour sampling when disabled.
    pub fn set_image_smoothing_enabled(&mut self, enabled: bool) {
        self.state.image_smoothing_enabled = enabled;
    }

    pub(crate) fn image_filter_quality(&self) -> tiny_skia::FilterQuality {
        match self.state.image_smoothing_enabled {
            true => tiny_skia::FilterQuality::Bilinear,
            false => tiny_skia::FilterQuality::Nearest,
        }
    }
}

pub(crate) fn parse_color(css: &str) -> Canvas2dResult<Color> {
    let [r, g, b, a] = csscolorparser::parse(css)
        .map_err(|e| Canvas2dError::Color(format!("{css}: {e}")))?
        .to_array();
    Color::from_rgba(r, g, b, a)
        .ok_or_else(|| Canvas2dError::Color(format!("{css}: component out of range")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn no_fonts() -> FontBook {
        FontConfig {
            system_fonts: false,
            ..FontConfig::default()
        }
        .resolve()
    }

    #[test]
    fn test_fresh_surface_is_transparent() {
        let ctx = Canvas2dContext::with_fonts(200, 150, &no_fonts()).unwrap();
        assert_eq!((ctx.width(), ctx.height()), (200, 150));
        assert!(!ctx.state().has_shadow());
        assert!(ctx.pixmap.data().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_rejects_empty_and_oversized_surfaces() {
        let fonts = no_fonts();
        for (w, h) in [(0, 100), (100, 0), (100, MAX_DIMENSION + 1)] {
            assert!(matches!(
                Canvas2dContext::with_fonts(w, h, &fonts),
                Err(Canvas2dError::InvalidDimensions { .. })
            ));
        }
    }

    #[test]
    fn test_bad_line_widths_are_ignored() {
        let mut ctx = Canvas2dContext::with_fonts(10, 10, &no_fonts()).unwrap();
        ctx.set_line_width(7.5);
        for bad in [-1.0, 0.0, f32::NAN, f32::INFINITY] {
            ctx.set_line_width(bad);
        }
        assert_eq!(ctx.state().line_width, 7.5);
    }

    #[test]
    fn test_shadow_survives_save_restore() {
        let mut ctx = Canvas2dContext::with_fonts(10, 10, &no_fonts()).unwrap();
        ctx.set_shadow_color("black").unwrap();
        assert!(!ctx.state().has_shadow());
        ctx.set_shadow_offset(4.0, 4.0);
        assert!(ctx.state().has_shadow());
        ctx.save();
        ctx.clear_shadow();
        assert!(!ctx.state().has_shadow());
        ctx.restore();
        assert!(ctx.state().has_shadow());
        // Extra restore is harmless
        ctx.restore();
        assert!(ctx.state().has_shadow());
    }

    #[test]
    fn test_parse_color() {
        assert!(matches!(
            parse_color("not-a-color"),
            Err(Canvas2dError::Color(_))
        ));
        let c = parse_color("rgba(255, 255, 255, 0.02)").unwrap();
        assert!((c.alpha() - 0.02).abs() < 1e-6);
    }
}
