//! Filling and stroking paths, with hard shadows.

use super::Canvas2dContext;
use crate::geometry::Rect;
use tiny_skia::{Color, FillRule, Paint, Path, Stroke, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum PaintMode {
    Fill,
    Stroke,
}

impl Canvas2dContext {
    /// Fill the current path with the non-zero rule. The path stays current.
    pub fn fill(&mut self) {
        if let Some(path) = self.path.clone().finish() {
            self.paint_path(&path, Transform::identity(), PaintMode::Fill);
        }
    }

    pub fn stroke(&mut self) {
        if let Some(path) = self.path.clone().finish() {
            self.paint_path(&path, Transform::identity(), PaintMode::Stroke);
        }
    }

    /// Fill a rectangle. Replaces the current path, like `beginPath` + `rect` + `fill`.
    pub fn fill_rect(&mut self, rect: &Rect) {
        self.begin_path();
        self.rect(rect);
        self.fill();
    }

    /// Paint `path` in the current fill or stroke color, preceded by its
    /// shadow when one is set.
    pub(crate) fn paint_path(&mut self, path: &Path, at: Transform, mode: PaintMode) {
        let state = &self.state;
        let color = match mode {
            PaintMode::Fill => state.fill_color,
            PaintMode::Stroke => state.stroke_color,
        };
        if state.has_shadow() {
            let shadow_at = at.post_translate(state.shadow_offset_x, state.shadow_offset_y);
            let shadow = state.shadow_color;
            self.rasterize(path, shadow_at, mode, shadow);
        }
        self.rasterize(path, at, mode, color);
    }

    fn rasterize(&mut self, path: &Path, at: Transform, mode: PaintMode, color: Color) {
        let mut paint = Paint {
            anti_alias: true,
            ..Paint::default()
        };
        paint.set_color(color);

        if mode == PaintMode::Fill {
            self.pixmap.fill_path(path, &paint, FillRule::Winding, at, None);
            return;
        }
        let stroke = Stroke {
            width: self.state.line_width,
            miter_limit: self.state.miter_limit,
            line_join: self.state.line_join.into(),
            ..Stroke::default()
        };
        self.pixmap.stroke_path(path, &paint, &stroke, at, None);
    }
}
