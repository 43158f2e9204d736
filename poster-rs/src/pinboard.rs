//! Pinboard: photograph posters in the wild and pin them to a board.
//!
//! Camera hardware sits behind [`CameraSource`]. An open stream is always
//! held by a [`StreamGuard`], which stops it when dropped, so every path out
//! of a capture session releases the device.

use crate::error::PosterError;
use chrono::{DateTime, Utc};
use image::codecs::jpeg::JpegEncoder;
use rand::Rng;
use thiserror::Error;
use uuid::Uuid;

pub const CAMERA_ERROR_MESSAGE: &str = "Gagal akses kamera. Cek izin browser lo.";
pub const DEFAULT_CAPTION: &str = "Lawan Judol!";
pub const DEFAULT_LOCATION: &str = "Indonesia";
pub const MAX_CAPTION_CHARS: usize = 40;
/// Posts are pinned up to this many degrees off square, either way.
pub const MAX_ROTATION_DEGREES: f32 = 3.0;
const JPEG_QUALITY: u8 = 92;

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("camera access denied")]
    PermissionDenied,

    #[error("camera unavailable: {0}")]
    Unavailable(String),

    #[error("could not read camera frame: {0}")]
    Frame(String),

    #[error("camera is not open")]
    NotOpen,

    #[error("no photo has been captured")]
    NothingCaptured,

    #[error(transparent)]
    Poster(#[from] PosterError),
}

impl CameraError {
    /// Message to show the user when acquiring the camera fails.
    pub fn user_message(&self) -> &'static str {
        CAMERA_ERROR_MESSAGE
    }
}

/// One straight-alpha RGBA video frame.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

pub trait CameraStream {
    fn frame(&mut self) -> Result<CameraFrame, CameraError>;
    /// Stop every track. Called once, by [`StreamGuard`].
    fn stop(&mut self);
}

pub trait CameraSource {
    fn open(&mut self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// Owns an open camera stream and stops it on drop.
pub struct StreamGuard {
    stream: Box<dyn CameraStream>,
}

impl StreamGuard {
    pub fn new(stream: Box<dyn CameraStream>) -> Self {
        Self { stream }
    }

    pub fn frame(&mut self) -> Result<CameraFrame, CameraError> {
        self.stream.frame()
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        log::debug!("stopping camera stream");
        self.stream.stop();
    }
}

impl std::fmt::Debug for StreamGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("StreamGuard")
    }
}

/// Camera modal state.
#[derive(Debug, Default)]
pub enum CaptureSession {
    #[default]
    Closed,
    Previewing(StreamGuard),
    /// JPEG bytes of the square crop. The stream is already released.
    Captured(Vec<u8>),
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::Closed
    }

    /// Acquire the camera. On failure the session stays closed.
    pub fn open_camera(&mut self, source: &mut dyn CameraSource) -> Result<(), CameraError> {
        self.close();
        match source.open() {
            Ok(stream) => {
                *self = CaptureSession::Previewing(StreamGuard::new(stream));
                Ok(())
            }
            Err(err) => {
                log::error!("Error accessing camera: {err}");
                Err(err)
            }
        }
    }

    /// Grab a frame, crop it square and release the stream.
    pub fn capture(&mut self) -> Result<(), CameraError> {
        let CaptureSession::Previewing(guard) = self else {
            return Err(CameraError::NotOpen);
        };
        let frame = guard.frame()?;
        let jpeg = center_crop_jpeg(&frame)?;
        // Replacing the state drops the guard, which stops the stream
        *self = CaptureSession::Captured(jpeg);
        Ok(())
    }

    /// Release the camera and discard any capture.
    pub fn close(&mut self) {
        *self = CaptureSession::Closed;
    }

    pub fn is_previewing(&self) -> bool {
        matches!(self, CaptureSession::Previewing(_))
    }

    pub fn captured_image(&self) -> Option<&[u8]> {
        match self {
            CaptureSession::Captured(jpeg) => Some(jpeg),
            _ => None,
        }
    }
}

/// Side and top-left corner of the largest centered square in a frame. An
/// odd margin leaves the extra pixel on the right or bottom.
pub fn center_square(width: u32, height: u32) -> (u32, u32, u32) {
    let side = width.min(height);
    (side, (width - side) / 2, (height - side) / 2)
}

/// The centered square of a frame, pixels copied as-is.
pub fn center_crop(frame: &CameraFrame) -> Result<image::RgbaImage, CameraError> {
    if frame.width == 0 || frame.height == 0 {
        return Err(CameraError::Frame("empty frame".to_string()));
    }
    let full = image::ImageBuffer::<image::Rgba<u8>, Vec<u8>>::from_raw(
        frame.width,
        frame.height,
        frame.data.clone(),
    )
    .ok_or_else(|| {
        CameraError::Frame(format!(
            "{}x{} frame with {} bytes of RGBA data",
            frame.width,
            frame.height,
            frame.data.len()
        ))
    })?;
    let (side, x, y) = center_square(frame.width, frame.height);
    Ok(image::imageops::crop_imm(&full, x, y, side, side).to_image())
}

/// Crop the centered square out of a frame and encode it as JPEG.
pub fn center_crop_jpeg(frame: &CameraFrame) -> Result<Vec<u8>, CameraError> {
    let square = center_crop(frame)?;
    let rgb = image::DynamicImage::ImageRgba8(square).to_rgb8();

    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, JPEG_QUALITY)
        .encode_image(&rgb)
        .map_err(PosterError::from)?;
    Ok(jpeg)
}

/// A photo pinned to the board.
#[derive(Debug, Clone, PartialEq)]
pub struct PinPost {
    pub id: Uuid,
    /// JPEG bytes of the square crop.
    pub image: Vec<u8>,
    pub caption: String,
    pub location: String,
    pub created_at: DateTime<Utc>,
    /// Tilt in degrees, within ±[`MAX_ROTATION_DEGREES`].
    pub rotation: f32,
}

/// In-memory board, newest post first.
#[derive(Debug, Clone, Default)]
pub struct Pinboard {
    posts: Vec<PinPost>,
}

impl Pinboard {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn posts(&self) -> &[PinPost] {
        &self.posts
    }

    pub fn len(&self) -> usize {
        self.posts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.posts.is_empty()
    }

    /// Pin the session's captured photo and reset the session.
    pub fn submit(
        &mut self,
        session: &mut CaptureSession,
        caption: &str,
        location: &str,
    ) -> Result<&PinPost, CameraError> {
        self.submit_with(session, caption, location, Utc::now(), &mut rand::rng())
    }

    pub fn submit_with(
        &mut self,
        session: &mut CaptureSession,
        caption: &str,
        location: &str,
        at: DateTime<Utc>,
        rng: &mut impl Rng,
    ) -> Result<&PinPost, CameraError> {
        if session.captured_image().is_none() {
            return Err(CameraError::NothingCaptured);
        }
        let CaptureSession::Captured(image) = std::mem::take(session) else {
            return Err(CameraError::NothingCaptured);
        };

        let caption: String = caption.trim().chars().take(MAX_CAPTION_CHARS).collect();
        let location = location.trim();
        let post = PinPost {
            id: Uuid::new_v4(),
            image,
            caption: if caption.is_empty() {
                DEFAULT_CAPTION.to_string()
            } else {
                caption
            },
            location: if location.is_empty() {
                DEFAULT_LOCATION.to_string()
            } else {
                location.to_string()
            },
            created_at: at,
            rotation: rng.random_range(-MAX_ROTATION_DEGREES..=MAX_ROTATION_DEGREES),
        };
        log::info!("pinned post {} from {}", post.id, post.location);
        self.posts.insert(0, post);
        Ok(&self.posts[0])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(640, 480, (480, 80, 0))]
    #[case(480, 640, (480, 0, 80))]
    #[case(101, 100, (100, 0, 0))]
    #[case(100, 103, (100, 0, 1))]
    #[case(50, 50, (50, 0, 0))]
    fn test_center_square(#[case] w: u32, #[case] h: u32, #[case] expected: (u32, u32, u32)) {
        assert_eq!(center_square(w, h), expected);
    }

    #[test]
    fn test_capture_requires_open_camera() {
        let mut session = CaptureSession::new();
        assert!(matches!(session.capture(), Err(CameraError::NotOpen)));
    }

    #[test]
    fn test_user_message() {
        assert_eq!(
            CameraError::PermissionDenied.user_message(),
            "Gagal akses kamera. Cek izin browser lo."
        );
    }
}
