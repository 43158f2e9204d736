//! Fixed paper-size catalog.

use crate::error::PosterError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Height in pixels of the interactive preview surface.
pub const PREVIEW_HEIGHT: u32 = 1000;

/// Standard poster targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaperSize {
    A5,
    #[default]
    A4,
    A3,
    /// Social story, 9:16.
    Story,
    /// Square, 1:1.
    Square,
}

/// Catalog record for a paper size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaperDimensions {
    /// Print width in pixels (300 ppi for ISO sizes).
    pub width: u32,
    /// Print height in pixels.
    pub height: u32,
    pub label: &'static str,
    /// Width divided by height.
    pub ratio: f64,
}

impl PaperSize {
    pub const ALL: [PaperSize; 5] = [
        PaperSize::A5,
        PaperSize::A4,
        PaperSize::A3,
        PaperSize::Story,
        PaperSize::Square,
    ];

    pub fn dimensions(&self) -> PaperDimensions {
        match self {
            PaperSize::A5 => PaperDimensions {
                width: 1748,
                height: 2480,
                label: "A5 (148 x 210 mm)",
                ratio: 148.0 / 210.0,
            },
            PaperSize::A4 => PaperDimensions {
                width: 2480,
                height: 3508,
                label: "A4 (210 x 297 mm)",
                ratio: 210.0 / 297.0,
            },
            PaperSize::A3 => PaperDimensions {
                width: 3508,
                height: 4961,
                label: "A3 (297 x 420 mm)",
                ratio: 297.0 / 420.0,
            },
            PaperSize::Story => PaperDimensions {
                width: 1080,
                height: 1920,
                label: "Story (9:16)",
                ratio: 9.0 / 16.0,
            },
            PaperSize::Square => PaperDimensions {
                width: 2000,
                height: 2000,
                label: "Square (1:1)",
                ratio: 1.0,
            },
        }
    }

    /// Short identifier used on the command line and in serialized state.
    pub fn name(&self) -> &'static str {
        match self {
            PaperSize::A5 => "a5",
            PaperSize::A4 => "a4",
            PaperSize::A3 => "a3",
            PaperSize::Story => "story",
            PaperSize::Square => "square",
        }
    }

    /// Preview surface size: fixed height, width truncated the way an HTML
    /// canvas truncates a fractional width.
    pub fn preview_size(&self) -> (u32, u32) {
        let width = (PREVIEW_HEIGHT as f64 * self.dimensions().ratio).floor() as u32;
        (width.max(1), PREVIEW_HEIGHT)
    }

    /// Full catalog resolution.
    pub fn print_size(&self) -> (u32, u32) {
        let dims = self.dimensions();
        (dims.width, dims.height)
    }
}

impl Display for PaperSize {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.dimensions().label)
    }
}

impl FromStr for PaperSize {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        PaperSize::ALL
            .into_iter()
            .find(|size| {
                size.name().eq_ignore_ascii_case(needle)
                    || size.dimensions().label.eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| PosterError::UnknownPaperSize(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(PaperSize::A5, (704, 1000))]
    #[case(PaperSize::A4, (707, 1000))]
    #[case(PaperSize::A3, (707, 1000))]
    #[case(PaperSize::Story, (562, 1000))]
    #[case(PaperSize::Square, (1000, 1000))]
    fn test_preview_size(#[case] size: PaperSize, #[case] expected: (u32, u32)) {
        assert_eq!(size.preview_size(), expected);
    }

    #[test]
    fn test_catalog_ratios_match_print_dimensions() {
        for size in PaperSize::ALL {
            let dims = size.dimensions();
            let print_ratio = dims.width as f64 / dims.height as f64;
            assert!(
                (print_ratio - dims.ratio).abs() < 1e-3,
                "{size:?}: {print_ratio} vs {}",
                dims.ratio
            );
        }
    }

    #[rstest]
    #[case("a4", PaperSize::A4)]
    #[case("A3", PaperSize::A3)]
    #[case(" story ", PaperSize::Story)]
    #[case("Square (1:1)", PaperSize::Square)]
    #[case("A5 (148 x 210 mm)", PaperSize::A5)]
    fn test_parse(#[case] input: &str, #[case] expected: PaperSize) {
        assert_eq!(input.parse::<PaperSize>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown() {
        assert!(matches!(
            "letter".parse::<PaperSize>(),
            Err(PosterError::UnknownPaperSize(_))
        ));
    }

    #[test]
    fn test_default_is_a4() {
        assert_eq!(PaperSize::default(), PaperSize::A4);
    }
}
