//! Image drawing, pixel readback and PNG output.

use super::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::{ImageView, Rect};
use tiny_skia::{Pixmap, PixmapPaint, Transform};

impl Canvas2dContext {
    /// Copy `source` (the whole image when `None`) into `dest`, scaling as
    /// needed. Whatever lands outside the surface is clipped, which is how a
    /// cover-fitted background loses its overflow.
    pub fn draw_image(
        &mut self,
        image: &ImageView<'_>,
        source: Option<Rect>,
        dest: &Rect,
    ) -> Canvas2dResult<()> {
        let pixmap = premultiply(image)?;
        let bounds = image.bounds();
        let source = source.unwrap_or(bounds);
        if !source.is_drawable() {
            return Ok(());
        }

        // Clamp the source rectangle to the image
        let x0 = source.x.clamp(0.0, bounds.width);
        let y0 = source.y.clamp(0.0, bounds.height);
        let x1 = (source.x + source.width).clamp(x0, bounds.width);
        let y1 = (source.y + source.height).clamp(y0, bounds.height);
        let source = Rect::new(x0, y0, x1 - x0, y1 - y0);

        if !source.is_drawable() || !dest.is_drawable() {
            log::trace!(target: "canvas", "drawImage skipped, empty rect");
            return Ok(());
        }
        log::trace!(target: "canvas", "drawImage {source:?} -> {dest:?}");

        let paint = PixmapPaint {
            quality: self.image_filter_quality(),
            ..PixmapPaint::default()
        };
        let (sx, sy) = (dest.width / source.width, dest.height / source.height);
        let transform = Transform::from_translate(dest.x, dest.y)
            .pre_scale(sx, sy)
            .pre_translate(-source.x, -source.y);
        let clip = tiny_skia::Rect::from_xywh(dest.x, dest.y, dest.width, dest.height)
            .and_then(|r| {
                let mut mask = tiny_skia::Mask::new(self.width, self.height)?;
                let path = tiny_skia::PathBuilder::from_rect(r);
                mask.fill_path(&path, tiny_skia::FillRule::Winding, false, Transform::identity());
                Some(mask)
            });

        self.pixmap
            .draw_pixmap(0, 0, pixmap.as_ref(), &paint, transform, clip.as_ref());
        Ok(())
    }

    /// The whole surface as straight-alpha RGBA.
    pub fn snapshot(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.pixmap.data().len());
        for px in self.pixmap.pixels() {
            let c = px.demultiply();
            out.extend_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
        }
        out
    }

    /// PNG of the whole surface, tagged with `ppi` (72 when `None`).
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        encode_png(&self.snapshot(), self.width, self.height, ppi)
    }
}

/// Encode straight-alpha RGBA data as PNG with a pHYs density chunk.
pub fn encode_png(data: &[u8], width: u32, height: u32, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
    check_len(data.len(), width, height)?;
    let pixels_per_meter = (ppi.unwrap_or(72.0).max(0.0) / 0.0254).round() as u32;

    let mut png_bytes = Vec::new();
    let mut encoder = png::Encoder::new(&mut png_bytes, width, height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_pixel_dims(Some(png::PixelDimensions {
        xppu: pixels_per_meter,
        yppu: pixels_per_meter,
        unit: png::Unit::Meter,
    }));
    encoder.write_header()?.write_image_data(data)?;
    Ok(png_bytes)
}

fn check_len(actual: usize, width: u32, height: u32) -> Canvas2dResult<()> {
    let expected = width as usize * height as usize * 4;
    if actual == expected {
        Ok(())
    } else {
        Err(Canvas2dError::ImageDataMismatch {
            width,
            height,
            expected,
            actual,
        })
    }
}

fn premultiply(image: &ImageView<'_>) -> Canvas2dResult<Pixmap> {
    check_len(image.data.len(), image.width, image.height)?;
    let mut pixmap =
        Pixmap::new(image.width, image.height).ok_or(Canvas2dError::InvalidDimensions {
            width: image.width,
            height: image.height,
        })?;
    for (dst, src) in pixmap.pixels_mut().iter_mut().zip(image.data.chunks_exact(4)) {
        *dst = tiny_skia::ColorU8::from_rgba(src[0], src[1], src[2], src[3]).premultiply();
    }
    Ok(pixmap)
}
