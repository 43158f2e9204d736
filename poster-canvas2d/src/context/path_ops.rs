//! Path construction. Non-finite coordinates are dropped, as in browsers.

use super::Canvas2dContext;
use crate::geometry::Rect;
use tiny_skia::PathBuilder;

impl Canvas2dContext {
    pub fn begin_path(&mut self) {
        self.path = PathBuilder::new();
    }

    pub fn move_to(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.path.move_to(x, y);
        }
    }

    pub fn line_to(&mut self, x: f32, y: f32) {
        if x.is_finite() && y.is_finite() {
            self.path.line_to(x, y);
        }
    }

    pub fn close_path(&mut self) {
        self.path.close();
    }

    /// Append `r` as a closed subpath.
    pub fn rect(&mut self, r: &Rect) {
        if !(r.x.is_finite() && r.y.is_finite() && r.width.is_finite() && r.height.is_finite()) {
            return;
        }
        let (right, bottom) = (r.x + r.width, r.y + r.height);
        self.path.move_to(r.x, r.y);
        for (x, y) in [(right, r.y), (right, bottom), (r.x, bottom)] {
            self.path.line_to(x, y);
        }
        self.path.close();
    }
}
