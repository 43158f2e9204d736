//! Save/restore-able drawing state.

use crate::font_parser::FontSpec;
use crate::style::{LineJoin, TextAlign, TextBaseline};
use tiny_skia::Color;

#[derive(Debug, Clone)]
pub struct DrawingState {
    pub fill_color: Color,
    pub stroke_color: Color,
    pub line_width: f32,
    pub line_join: LineJoin,
    pub miter_limit: f32,
    pub font: FontSpec,
    pub text_align: TextAlign,
    pub text_baseline: TextBaseline,
    /// Shadows are skipped while this is fully transparent.
    pub shadow_color: Color,
    /// Device-space shadow displacement. There is no blur.
    pub shadow_offset_x: f32,
    pub shadow_offset_y: f32,
    /// Bilinear filtering for scaled images, nearest neighbour when off.
    pub image_smoothing_enabled: bool,
}

impl DrawingState {
    /// A shadow is drawn only when it is visible and displaced from the shape.
    pub fn has_shadow(&self) -> bool {
        self.shadow_color.alpha() > 0.0
            && (self.shadow_offset_x != 0.0 || self.shadow_offset_y != 0.0)
    }
}

impl Default for DrawingState {
    fn default() -> Self {
        Self {
            fill_color: Color::BLACK,
            stroke_color: Color::BLACK,
            line_width: 1.0,
            line_join: LineJoin::default(),
            miter_limit: 10.0,
            font: FontSpec::default(),
            text_align: TextAlign::default(),
            text_baseline: TextBaseline::default(),
            shadow_color: Color::TRANSPARENT,
            shadow_offset_x: 0.0,
            shadow_offset_y: 0.0,
            image_smoothing_enabled: true,
        }
    }
}
