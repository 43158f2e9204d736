//! The draggable text overlay: palette, overlay settings and pure layout helpers.

use crate::error::PosterError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

pub const MIN_SCALE: f32 = 0.5;
pub const MAX_SCALE: f32 = 2.5;

/// Font size as a fraction of canvas width, before the user scale.
pub const FONT_SIZE_FACTOR: f32 = 0.15;
/// Line pitch as a multiple of font size.
pub const LINE_HEIGHT_FACTOR: f32 = 1.1;
/// Outline width as a multiple of font size.
pub const STROKE_WIDTH_FACTOR: f32 = 0.05;

pub const DEFAULT_TEXT: &str = "INGAT ANAK ISTRI\nSTOP JUDI";

/// Fixed brand palette for overlay text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TextColor {
    White,
    Black,
    Red,
    #[default]
    Yellow,
}

impl TextColor {
    pub const ALL: [TextColor; 4] = [
        TextColor::White,
        TextColor::Black,
        TextColor::Red,
        TextColor::Yellow,
    ];

    pub fn hex(&self) -> &'static str {
        match self {
            TextColor::White => "#FFFFFF",
            TextColor::Black => "#000000",
            TextColor::Red => "#D6001C",
            TextColor::Yellow => "#FFDE59",
        }
    }
}

impl Display for TextColor {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hex())
    }
}

impl FromStr for TextColor {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        TextColor::ALL
            .into_iter()
            .find(|color| {
                color.hex()[1..].eq_ignore_ascii_case(digits)
                    || format!("{color:?}").eq_ignore_ascii_case(trimmed)
            })
            .ok_or_else(|| PosterError::UnknownColor(s.to_string()))
    }
}

impl TryFrom<String> for TextColor {
    type Error = PosterError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TextColor> for String {
    fn from(value: TextColor) -> Self {
        value.hex().to_string()
    }
}

/// Placement and styling of the overlay text.
///
/// Positions are fractions of the canvas so the same overlay renders identically
/// on the preview and print surfaces. Text keeps the casing the user typed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextOverlaySpec {
    x: f32,
    y: f32,
    text: String,
    color: TextColor,
    scale: f32,
}

impl Default for TextOverlaySpec {
    fn default() -> Self {
        Self {
            x: 0.5,
            y: 0.5,
            text: DEFAULT_TEXT.to_string(),
            color: TextColor::default(),
            scale: 1.0,
        }
    }
}

impl TextOverlaySpec {
    pub fn new(text: impl Into<String>, color: TextColor) -> Self {
        Self {
            text: text.into(),
            color,
            ..Self::default()
        }
    }

    pub fn x(&self) -> f32 {
        self.x
    }

    pub fn y(&self) -> f32 {
        self.y
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn color(&self) -> TextColor {
        self.color
    }

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Set the anchor position, clamping each fraction to [0, 1].
    pub fn set_position(&mut self, x: f32, y: f32) {
        self.x = clamp_unit(x);
        self.y = clamp_unit(y);
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn set_color(&mut self, color: TextColor) {
        self.color = color;
    }

    /// Set the size multiplier, clamped to [0.5, 2.5].
    pub fn set_scale(&mut self, scale: f32) {
        self.scale = if scale.is_nan() {
            1.0
        } else {
            scale.clamp(MIN_SCALE, MAX_SCALE)
        };
    }

    /// Deserialized specs bypass the setters, so bring them back in range.
    pub fn normalized(mut self) -> Self {
        let (x, y, scale) = (self.x, self.y, self.scale);
        self.set_position(x, y);
        self.set_scale(scale);
        self
    }
}

fn clamp_unit(v: f32) -> f32 {
    if v.is_nan() {
        0.5
    } else {
        v.clamp(0.0, 1.0)
    }
}

/// Lines as they appear on the poster: split on newlines and upper-cased.
pub fn display_lines(text: &str) -> Vec<String> {
    text.split('\n').map(|line| line.to_uppercase()).collect()
}

/// Positioned text ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct TextLayout {
    pub font_size: f32,
    pub line_pitch: f32,
    pub stroke_width: f32,
    pub anchor_x: f32,
    /// Each display line with the vertical center it is drawn at.
    pub lines: Vec<(String, f32)>,
}

/// Lay out the overlay for a canvas of the given size.
///
/// Returns `None` when the text is empty. Lines are vertically centered as a
/// block around `y * height`.
pub fn layout_text(spec: &TextOverlaySpec, width: f32, height: f32) -> Option<TextLayout> {
    if spec.text.is_empty() {
        return None;
    }
    let font_size = width * FONT_SIZE_FACTOR * spec.scale;
    let line_pitch = font_size * LINE_HEIGHT_FACTOR;
    let lines = display_lines(&spec.text);
    let count = lines.len() as f32;
    let first_y = spec.y * height - count * line_pitch / 2.0 + line_pitch / 2.0;

    Some(TextLayout {
        font_size,
        line_pitch,
        stroke_width: font_size * STROKE_WIDTH_FACTOR,
        anchor_x: spec.x * width,
        lines: lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| (line, first_y + i as f32 * line_pitch))
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_default_overlay() {
        let spec = TextOverlaySpec::default();
        assert_eq!(spec.x(), 0.5);
        assert_eq!(spec.y(), 0.5);
        assert_eq!(spec.text(), "INGAT ANAK ISTRI\nSTOP JUDI");
        assert_eq!(spec.color(), TextColor::Yellow);
        assert_eq!(spec.scale(), 1.0);
    }

    #[rstest]
    #[case(-0.2, 1.7, (0.0, 1.0))]
    #[case(0.25, 0.75, (0.25, 0.75))]
    #[case(f32::NAN, 0.0, (0.5, 0.0))]
    fn test_position_clamps(#[case] x: f32, #[case] y: f32, #[case] expected: (f32, f32)) {
        let mut spec = TextOverlaySpec::default();
        spec.set_position(x, y);
        assert_eq!((spec.x(), spec.y()), expected);
    }

    #[rstest]
    #[case(0.1, 0.5)]
    #[case(1.75, 1.75)]
    #[case(9.0, 2.5)]
    fn test_scale_clamps(#[case] input: f32, #[case] expected: f32) {
        let mut spec = TextOverlaySpec::default();
        spec.set_scale(input);
        assert_eq!(spec.scale(), expected);
    }

    #[rstest]
    #[case("#FFDE59", TextColor::Yellow)]
    #[case("ffffff", TextColor::White)]
    #[case("#d6001c", TextColor::Red)]
    #[case("black", TextColor::Black)]
    fn test_color_parse(#[case] input: &str, #[case] expected: TextColor) {
        assert_eq!(input.parse::<TextColor>().unwrap(), expected);
    }

    #[test]
    fn test_color_outside_palette_rejected() {
        assert!(matches!(
            "#123456".parse::<TextColor>(),
            Err(PosterError::UnknownColor(_))
        ));
    }

    #[test]
    fn test_display_lines_keeps_typed_casing() {
        let spec = TextOverlaySpec::new("stop judi\nsekarang", TextColor::Red);
        assert_eq!(display_lines(spec.text()), vec!["STOP JUDI", "SEKARANG"]);
        assert_eq!(spec.text(), "stop judi\nsekarang");
    }

    #[test]
    fn test_display_lines_keeps_empty_lines() {
        assert_eq!(display_lines("a\n\nb"), vec!["A", "", "B"]);
    }

    #[test]
    fn test_layout_two_lines_on_a4_preview() {
        let spec = TextOverlaySpec::default();
        let layout = layout_text(&spec, 707.0, 1000.0).unwrap();
        let font_size = 707.0 * 0.15;
        let pitch = font_size * 1.1;
        assert!((layout.font_size - font_size).abs() < 1e-3);
        assert!((layout.line_pitch - pitch).abs() < 1e-3);
        assert!((layout.stroke_width - font_size * 0.05).abs() < 1e-3);
        assert_eq!(layout.anchor_x, 353.5);
        assert_eq!(layout.lines.len(), 2);
        // The two lines straddle the anchor symmetrically
        let (_, y0) = layout.lines[0];
        let (_, y1) = layout.lines[1];
        assert!(((y0 + y1) / 2.0 - 500.0).abs() < 1e-3);
        assert!((y1 - y0 - pitch).abs() < 1e-3);
    }

    #[test]
    fn test_layout_single_line_centered_on_anchor() {
        let mut spec = TextOverlaySpec::new("judi", TextColor::White);
        spec.set_position(0.25, 0.8);
        let layout = layout_text(&spec, 1000.0, 1000.0).unwrap();
        assert_eq!(layout.lines.len(), 1);
        assert_eq!(layout.lines[0].0, "JUDI");
        assert!((layout.lines[0].1 - 800.0).abs() < 1e-3);
        assert_eq!(layout.anchor_x, 250.0);
    }

    #[test]
    fn test_layout_three_lines_centered_on_anchor() {
        let mut spec = TextOverlaySpec::new("satu\ndua\ntiga", TextColor::Black);
        spec.set_position(0.5, 0.4);
        let layout = layout_text(&spec, 1000.0, 1000.0).unwrap();
        let pitch = 1000.0 * 0.15 * 1.1;
        let ys: Vec<f32> = layout.lines.iter().map(|(_, y)| *y).collect();
        // First line at center - N*P/2 + P/2, so the middle one sits on the anchor
        assert!((ys[0] - (400.0 - 3.0 * pitch / 2.0 + pitch / 2.0)).abs() < 1e-3);
        assert!((ys[1] - 400.0).abs() < 1e-3);
        assert!((ys[2] - (400.0 + pitch)).abs() < 1e-3);
    }

    #[test]
    fn test_layout_empty_text_is_none() {
        let spec = TextOverlaySpec::new("", TextColor::White);
        assert!(layout_text(&spec, 707.0, 1000.0).is_none());
    }

    #[test]
    fn test_serde_round_trip_preserves_casing() {
        let mut spec = TextOverlaySpec::new("Lawan Judol", TextColor::Red);
        spec.set_scale(2.0);
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"#D6001C\""));
        let back: TextOverlaySpec = serde_json::from_str(&json).unwrap();
        assert_eq!(back, spec);
    }

    #[test]
    fn test_normalized_clamps_deserialized_values() {
        let json = r##"{"x":3.0,"y":-1.0,"text":"x","color":"#FFFFFF","scale":10.0}"##;
        let spec: TextOverlaySpec = serde_json::from_str::<TextOverlaySpec>(json)
            .unwrap()
            .normalized();
        assert_eq!((spec.x(), spec.y(), spec.scale()), (1.0, 0.0, 2.5));
    }
}
