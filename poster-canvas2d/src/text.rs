//! Text measurement and family resolution using cosmic-text.

use crate::font_parser::FontSpec;
use crate::style::{TextAlign, TextBaseline};
use cosmic_text::{Attrs, Buffer, CacheKeyFlags, Family, FontSystem, Metrics, Shaping};

/// Result of [`Canvas2dContext::measure_text`](crate::Canvas2dContext::measure_text).
#[derive(Debug, Clone, Default)]
pub struct TextMetrics {
    /// Width of the text in pixels.
    pub width: f32,
    /// Distance from baseline to the top of the line box.
    pub ascent: f32,
    /// Distance from baseline to the bottom of the line box.
    pub descent: f32,
}

/// Pick the first family in the CSS list that the font database can serve.
///
/// Generic names map onto cosmic-text's generic families, which fontdb has
/// already bound to concrete faces. Unknown names fall through to the next
/// entry, and an exhausted list falls back to sans-serif.
pub(crate) fn resolve_family<'a>(font_system: &FontSystem, families: &'a [String]) -> Family<'a> {
    for name in families {
        match name.to_ascii_lowercase().as_str() {
            "sans-serif" => return Family::SansSerif,
            "serif" => return Family::Serif,
            "monospace" => return Family::Monospace,
            _ => {
                let available = font_system.db().faces().any(|face| {
                    face.families
                        .iter()
                        .any(|(family, _)| family.eq_ignore_ascii_case(name))
                });
                if available {
                    return Family::Name(name);
                }
            }
        }
    }
    Family::SansSerif
}

/// Shape `text` into a single-line buffer with the given font. `None` when
/// the database holds no faces at all, as cosmic-text cannot shape then.
pub(crate) fn shape_line(
    font_system: &mut FontSystem,
    text: &str,
    font: &FontSpec,
) -> Option<Buffer> {
    if font_system.db().is_empty() {
        log::debug!(target: "canvas", "no font faces loaded, skipping text {text:?}");
        return None;
    }
    let metrics = Metrics::new(font.px, font.px * 1.2);
    let mut buffer = Buffer::new(font_system, metrics);

    let family = resolve_family(font_system, &font.families);
    let attrs = Attrs::new()
        .family(family)
        .weight(font.weight)
        .style(font.style)
        .cache_key_flags(CacheKeyFlags::DISABLE_HINTING);

    buffer.set_text(font_system, text, &attrs, Shaping::Advanced, None);
    buffer.shape_until_scroll(font_system, false);
    Some(buffer)
}

/// Shape `text` and report its advance and line box. Without fonts the
/// advance is zero.
pub fn measure_text(font_system: &mut FontSystem, text: &str, font: &FontSpec) -> TextMetrics {
    match shape_line(font_system, text, font) {
        Some(buffer) => metrics_for_buffer(&buffer, font),
        None => TextMetrics {
            width: 0.0,
            ascent: font.px * 0.8,
            descent: font.px * 0.2,
        },
    }
}

pub(crate) fn metrics_for_buffer(buffer: &Buffer, font: &FontSpec) -> TextMetrics {
    let mut width: f32 = 0.0;
    let mut ascent: f32 = 0.0;
    let mut descent: f32 = 0.0;
    for run in buffer.layout_runs() {
        width = width.max(run.line_w);
        ascent = ascent.max(run.line_y - run.line_top);
        descent = descent.max((run.line_top + run.line_height) - run.line_y);
    }
    if ascent == 0.0 && descent == 0.0 {
        ascent = font.px * 0.8;
        descent = font.px * 0.2;
    }
    TextMetrics {
        width,
        ascent,
        descent,
    }
}

/// Horizontal shift that puts the aligned edge of a `width`-wide run on the anchor.
pub(crate) fn align_offset(width: f32, align: TextAlign) -> f32 {
    match align {
        TextAlign::Left => 0.0,
        TextAlign::Right => -width,
        TextAlign::Center => -width / 2.0,
    }
}

/// Vertical shift that moves the requested baseline onto the anchor.
pub(crate) fn baseline_offset(ascent: f32, descent: f32, baseline: TextBaseline) -> f32 {
    match baseline {
        TextBaseline::Top => ascent,
        TextBaseline::Middle => (ascent - descent) / 2.0,
        TextBaseline::Alphabetic => 0.0,
        TextBaseline::Bottom => -descent,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_align_offset() {
        assert_eq!(align_offset(100.0, TextAlign::Center), -50.0);
        assert_eq!(align_offset(100.0, TextAlign::Left), 0.0);
        assert_eq!(align_offset(100.0, TextAlign::Right), -100.0);
    }

    #[test]
    fn test_baseline_offset() {
        // Glyphs sit on the alphabetic baseline, so middle shifts them down by
        // half of the (ascent - descent) span.
        assert_eq!(baseline_offset(80.0, 20.0, TextBaseline::Middle), 30.0);
        assert_eq!(baseline_offset(80.0, 20.0, TextBaseline::Top), 80.0);
        assert_eq!(baseline_offset(80.0, 20.0, TextBaseline::Bottom), -20.0);
    }
}
