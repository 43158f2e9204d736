//! Encoded poster output and file naming.

use crate::compositor::Frame;
use crate::error::PosterResult;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

pub const EXPORT_PREFIX: &str = "ANTIJUDOL_";

/// `ANTIJUDOL_<unix-epoch-ms>.png`
pub fn export_file_name(at: DateTime<Utc>) -> String {
    format!("{}{}.png", EXPORT_PREFIX, at.timestamp_millis())
}

/// A PNG-encoded poster ready to be saved.
#[derive(Debug, Clone, PartialEq)]
pub struct ExportedPoster {
    pub file_name: String,
    pub width: u32,
    pub height: u32,
    pub png: Vec<u8>,
}

impl ExportedPoster {
    /// Encode a frame, naming it after the given instant.
    pub fn from_frame(frame: &Frame, at: DateTime<Utc>) -> PosterResult<Self> {
        Ok(Self {
            file_name: export_file_name(at),
            width: frame.width(),
            height: frame.height(),
            png: frame.to_png()?,
        })
    }

    /// Write into `dir` under the export file name.
    pub fn write_to_dir(&self, dir: &Path) -> PosterResult<PathBuf> {
        let path = dir.join(&self.file_name);
        self.write_to(&path)?;
        Ok(path)
    }

    pub fn write_to(&self, path: &Path) -> PosterResult<()> {
        std::fs::write(path, &self.png)?;
        log::info!("wrote {}x{} poster to {}", self.width, self.height, path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_export_file_name() {
        let at = Utc.timestamp_millis_opt(1_700_000_000_123).unwrap();
        assert_eq!(export_file_name(at), "ANTIJUDOL_1700000000123.png");
    }
}
