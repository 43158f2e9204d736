//! Poster compositor.
//!
//! A render is a pure function of [`PosterState`] and [`RenderTarget`]. It
//! draws four layers, in order:
//!
//! 1. the background (cover-fitted image, or the dark placeholder with its
//!    call-to-action caption),
//! 2. a faint horizontal scanline texture,
//! 3. the multi-line overlay text with hard shadow and outline,
//! 4. the attribution sticker in the bottom-right corner.
//!
//! Absolute sizes are expressed in units of `height / 1000`, so a print render
//! is the preview render scaled up.

use crate::error::{PosterError, PosterResult};
use crate::image_loading::BackgroundImage;
use crate::overlay::layout_text;
use crate::paper::{PaperSize, PREVIEW_HEIGHT};
use crate::state::PosterState;
use poster_canvas2d::{
    encode_png, Canvas2dContext, FontBook, FontConfig, Rect, TextAlign, TextBaseline,
};

pub const PLACEHOLDER_FILL: &str = "#1a1a1a";
pub const PLACEHOLDER_TEXT: &str = "KLIK BIKIN GAMBAR";
pub const PLACEHOLDER_TEXT_FILL: &str = "#333333";
const PLACEHOLDER_FONT_SIZE: f32 = 40.0;

pub const SCANLINE_FILL: &str = "rgba(255, 255, 255, 0.02)";
const SCANLINE_PITCH: f32 = 4.0;
const SCANLINE_THICKNESS: f32 = 1.0;

pub const TEXT_SHADOW_COLOR: &str = "#000000";
const TEXT_SHADOW_OFFSET: f32 = 4.0;
pub const TEXT_OUTLINE_COLOR: &str = "#000000";

pub const STICKER_LABEL: &str = "ANTIJUDOL.ID";
pub const STICKER_FILL: &str = "#000000";
pub const STICKER_TEXT_FILL: &str = "#FFFFFF";
const STICKER_WIDTH_FACTOR: f32 = 0.4;
const STICKER_HEIGHT_FACTOR: f32 = 0.05;
const STICKER_MARGIN_FACTOR: f32 = 0.05;
const STICKER_FONT_FACTOR: f32 = 0.6;

pub const PREVIEW_PPI: f32 = 72.0;
pub const PRINT_PPI: f32 = 300.0;

/// Which surface a render is for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RenderTarget {
    /// Fixed 1000-unit-high interactive surface.
    #[default]
    Preview,
    /// Full catalog resolution.
    Print,
}

impl RenderTarget {
    pub fn surface_size(&self, paper: PaperSize) -> (u32, u32) {
        match self {
            RenderTarget::Preview => paper.preview_size(),
            RenderTarget::Print => paper.print_size(),
        }
    }

    pub fn ppi(&self) -> f32 {
        match self {
            RenderTarget::Preview => PREVIEW_PPI,
            RenderTarget::Print => PRINT_PPI,
        }
    }
}

/// A composited raster: straight-alpha RGBA, row-major.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    width: u32,
    height: u32,
    target: RenderTarget,
    data: Vec<u8>,
}

impl Frame {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn target(&self) -> RenderTarget {
        self.target
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// RGBA value at a pixel, or `None` outside the frame.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        let px = self.data.get(idx..idx + 4)?;
        Some([px[0], px[1], px[2], px[3]])
    }

    /// Encode as PNG, tagged with the target's pixel density.
    pub fn to_png(&self) -> PosterResult<Vec<u8>> {
        Ok(encode_png(
            &self.data,
            self.width,
            self.height,
            Some(self.target.ppi()),
        )?)
    }
}

/// Scale an image uniformly so it covers the canvas and center it. The
/// overflow on one axis is cropped by the canvas bounds.
pub fn cover_fit(image_width: u32, image_height: u32, width: f32, height: f32) -> Rect {
    let (iw, ih) = (image_width as f32, image_height as f32);
    let scale = (width / iw).max(height / ih);
    let (dw, dh) = (iw * scale, ih * scale);
    Rect::new((width - dw) / 2.0, (height - dh) / 2.0, dw, dh)
}

/// Rectangle of the attribution sticker.
pub fn sticker_rect(width: f32, height: f32) -> Rect {
    let w = width * STICKER_WIDTH_FACTOR;
    let h = height * STICKER_HEIGHT_FACTOR;
    Rect::new(
        width - w - width * STICKER_MARGIN_FACTOR,
        height - h - height * STICKER_MARGIN_FACTOR,
        w,
        h,
    )
}

/// Configuration for a [`Compositor`].
#[derive(Debug, Clone)]
pub struct CompositorConfig {
    pub font_config: FontConfig,
    /// CSS family list for the overlay headline.
    pub display_family: String,
    /// CSS family list for the placeholder caption and sticker label.
    pub label_family: String,
}

impl Default for CompositorConfig {
    fn default() -> Self {
        Self {
            font_config: FontConfig::default(),
            display_family: "Oswald, sans-serif".to_string(),
            label_family: "\"Courier Prime\", monospace".to_string(),
        }
    }
}

/// Renders posters. Fonts are resolved once at construction and reused by
/// every render.
#[derive(Debug, Clone)]
pub struct Compositor {
    fonts: FontBook,
    display_family: String,
    label_family: String,
}

impl Default for Compositor {
    fn default() -> Self {
        Self::new(CompositorConfig::default())
    }
}

impl Compositor {
    pub fn new(config: CompositorConfig) -> Self {
        let fonts = config.font_config.resolve();
        log::info!("compositor resolved {} font faces", fonts.face_count());
        for family in ["Oswald", "Courier Prime"] {
            if fonts.face_count() > 0 && !fonts.has_family(family) {
                log::warn!("{family} is not installed, falling back to a generic family");
            }
        }
        Self {
            fonts,
            display_family: config.display_family,
            label_family: config.label_family,
        }
    }

    pub fn font_face_count(&self) -> usize {
        self.fonts.face_count()
    }

    /// Composite `state` onto a fresh surface for `target`.
    pub fn render(&self, state: &PosterState, target: RenderTarget) -> PosterResult<Frame> {
        let (width, height) = target.surface_size(state.paper);
        let mut ctx = Canvas2dContext::with_fonts(width, height, &self.fonts)?;
        let (w, h) = (width as f32, height as f32);
        let unit = h / PREVIEW_HEIGHT as f32;

        match &state.background {
            Some(image) => draw_background(&mut ctx, image, w, h)?,
            None => self.draw_placeholder(&mut ctx, w, h, unit)?,
        }
        draw_scanlines(&mut ctx, w, h, unit)?;
        self.draw_overlay(&mut ctx, state, w, h, unit)?;
        self.draw_sticker(&mut ctx, w, h)?;

        log::debug!(
            "rendered {:?} frame {}x{} for {:?}",
            target,
            width,
            height,
            state.paper
        );
        Ok(Frame {
            width,
            height,
            target,
            data: ctx.snapshot(),
        })
    }

    fn draw_placeholder(
        &self,
        ctx: &mut Canvas2dContext,
        w: f32,
        h: f32,
        unit: f32,
    ) -> PosterResult<()> {
        ctx.set_fill_style(PLACEHOLDER_FILL)?;
        ctx.fill_rect(&Rect::new(0.0, 0.0, w, h));

        ctx.set_fill_style(PLACEHOLDER_TEXT_FILL)?;
        ctx.set_font(&format!(
            "bold {}px {}",
            PLACEHOLDER_FONT_SIZE * unit,
            self.label_family
        ))?;
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Middle);
        ctx.fill_text(PLACEHOLDER_TEXT, w / 2.0, h / 2.0);
        Ok(())
    }

    fn draw_overlay(
        &self,
        ctx: &mut Canvas2dContext,
        state: &PosterState,
        w: f32,
        h: f32,
        unit: f32,
    ) -> PosterResult<()> {
        let Some(layout) = layout_text(&state.overlay, w, h) else {
            return Ok(());
        };

        ctx.save();
        ctx.set_font(&format!("900 {}px {}", layout.font_size, self.display_family))?;
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Middle);
        ctx.set_fill_style(state.overlay.color().hex())?;
        ctx.set_stroke_style(TEXT_OUTLINE_COLOR)?;
        ctx.set_line_width(layout.stroke_width);

        for (line, y) in &layout.lines {
            // Fill, outline, then fill again so the outline sits under the face
            apply_text_shadow(ctx, unit)?;
            ctx.fill_text(line, layout.anchor_x, *y);
            ctx.clear_shadow();
            ctx.stroke_text(line, layout.anchor_x, *y);
            apply_text_shadow(ctx, unit)?;
            ctx.fill_text(line, layout.anchor_x, *y);
        }
        ctx.restore();
        Ok(())
    }

    fn draw_sticker(&self, ctx: &mut Canvas2dContext, w: f32, h: f32) -> PosterResult<()> {
        let rect = sticker_rect(w, h);
        ctx.save();
        ctx.clear_shadow();
        ctx.set_fill_style(STICKER_FILL)?;
        ctx.fill_rect(&rect);

        ctx.set_fill_style(STICKER_TEXT_FILL)?;
        ctx.set_font(&format!(
            "bold {}px {}",
            rect.height * STICKER_FONT_FACTOR,
            self.label_family
        ))?;
        ctx.set_text_align(TextAlign::Center);
        ctx.set_text_baseline(TextBaseline::Middle);
        ctx.fill_text(
            STICKER_LABEL,
            rect.x + rect.width / 2.0,
            rect.y + rect.height / 2.0,
        );
        ctx.restore();
        Ok(())
    }
}

fn draw_background(
    ctx: &mut Canvas2dContext,
    image: &BackgroundImage,
    w: f32,
    h: f32,
) -> PosterResult<()> {
    let dest = cover_fit(image.width(), image.height(), w, h);
    ctx.draw_image(&image.view(), None, &dest)
        .map_err(PosterError::from)
}

fn draw_scanlines(ctx: &mut Canvas2dContext, w: f32, h: f32, unit: f32) -> PosterResult<()> {
    ctx.set_fill_style(SCANLINE_FILL)?;
    let pitch = SCANLINE_PITCH * unit;
    let mut row = 0u32;
    loop {
        let y = row as f32 * pitch;
        if y >= h {
            break;
        }
        ctx.fill_rect(&Rect::new(0.0, y, w, SCANLINE_THICKNESS * unit));
        row += 1;
    }
    Ok(())
}

fn apply_text_shadow(ctx: &mut Canvas2dContext, unit: f32) -> PosterResult<()> {
    ctx.set_shadow_color(TEXT_SHADOW_COLOR)?;
    ctx.set_shadow_offset(TEXT_SHADOW_OFFSET * unit, TEXT_SHADOW_OFFSET * unit);
    Ok(())
}
