//! fillText / strokeText: text is shaped by cosmic-text and painted as
//! vector glyph outlines, so strokes and shadows follow the real shapes.

use super::drawing::PaintMode;
use super::Canvas2dContext;
use crate::error::Canvas2dResult;
use crate::font_parser::parse_font;
use crate::style::{TextAlign, TextBaseline};
use crate::text::{self, TextMetrics};
use cosmic_text::Command;
use tiny_skia::{Path, PathBuilder, Transform};

impl Canvas2dContext {
    /// Set the font from a CSS `font` shorthand.
    pub fn set_font(&mut self, css: &str) -> Canvas2dResult<()> {
        self.state.font = parse_font(css)?;
        Ok(())
    }

    pub fn set_text_align(&mut self, align: TextAlign) {
        self.state.text_align = align;
    }

    pub fn set_text_baseline(&mut self, baseline: TextBaseline) {
        self.state.text_baseline = baseline;
    }

    pub fn measure_text(&mut self, line: &str) -> TextMetrics {
        text::measure_text(&mut self.font_system, line, &self.state.font)
    }

    pub fn fill_text(&mut self, line: &str, x: f32, y: f32) {
        self.draw_text(line, x, y, PaintMode::Fill);
    }

    pub fn stroke_text(&mut self, line: &str, x: f32, y: f32) {
        self.draw_text(line, x, y, PaintMode::Stroke);
    }

    fn draw_text(&mut self, line: &str, x: f32, y: f32, mode: PaintMode) {
        if line.is_empty() || !x.is_finite() || !y.is_finite() {
            return;
        }
        log::trace!(target: "canvas", "{mode:?} text {line:?} at {x} {y}");

        let glyphs = self.glyph_paths(line, x, y);
        if glyphs.is_empty() {
            return;
        }

        // The shadow of the whole run goes down before any glyph body
        let saved = self.state.clone();
        if saved.has_shadow() {
            let (ox, oy) = (saved.shadow_offset_x, saved.shadow_offset_y);
            self.state.fill_color = saved.shadow_color;
            self.state.stroke_color = saved.shadow_color;
            self.clear_shadow();
            for (path, at) in &glyphs {
                self.paint_path(path, at.post_translate(ox, oy), mode);
            }
            self.state = saved.clone();
        }

        self.clear_shadow();
        for (path, at) in &glyphs {
            self.paint_path(path, *at, mode);
        }
        self.state = saved;
    }

    /// Outline and placement of every glyph in `line`, anchored at (x, y)
    /// according to the current alignment and baseline.
    fn glyph_paths(&mut self, line: &str, x: f32, y: f32) -> Vec<(Path, Transform)> {
        let font = self.state.font.clone();
        let Some(buffer) = text::shape_line(&mut self.font_system, line, &font) else {
            return Vec::new();
        };
        let metrics = text::metrics_for_buffer(&buffer, &font);
        let origin_x = x + text::align_offset(metrics.width, self.state.text_align);
        let origin_y = y + text::baseline_offset(
            metrics.ascent,
            metrics.descent,
            self.state.text_baseline,
        );

        let mut out = Vec::new();
        for run in buffer.layout_runs() {
            for glyph in run.glyphs {
                let cache_key = glyph.physical((origin_x, origin_y), 1.0).cache_key;
                let Some(commands) = self
                    .swash_cache
                    .get_outline_commands(&mut self.font_system, cache_key)
                else {
                    continue;
                };
                let Some(path) = outline_to_path(commands) else {
                    continue;
                };
                // Unrounded position, the cache key snaps to whole pixels
                let gx = origin_x + glyph.x + glyph.font_size * glyph.x_offset;
                let gy = origin_y + glyph.y - glyph.font_size * glyph.y_offset;
                out.push((path, Transform::from_translate(gx, gy)));
            }
        }
        out
    }
}

/// Font units point Y up; the canvas points it down.
fn outline_to_path(commands: &[Command]) -> Option<Path> {
    let mut pb = PathBuilder::new();
    for command in commands {
        match *command {
            Command::MoveTo(p) => pb.move_to(p.x, -p.y),
            Command::LineTo(p) => pb.line_to(p.x, -p.y),
            Command::QuadTo(c, p) => pb.quad_to(c.x, -c.y, p.x, -p.y),
            Command::CurveTo(c1, c2, p) => pb.cubic_to(c1.x, -c1.y, c2.x, -c2.y, p.x, -p.y),
            Command::Close => pb.close(),
        }
    }
    pb.finish()
}
