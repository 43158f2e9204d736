//! Background generation: vibes, prompt construction and the generator trait.

use crate::error::PosterError;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

/// Style used when no preset applies.
pub const FALLBACK_STYLE: &str = "Abstract artistic background, high contrast, poster design";

/// Preset art directions for generated backgrounds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Vibe {
    #[default]
    Truck,
    Minimalist,
    Bold,
    Vibrant,
    Illustrated,
    Grunge,
    /// Free-form prompt supplied by the user.
    Custom,
}

impl Vibe {
    pub const ALL: [Vibe; 7] = [
        Vibe::Truck,
        Vibe::Minimalist,
        Vibe::Bold,
        Vibe::Vibrant,
        Vibe::Illustrated,
        Vibe::Grunge,
        Vibe::Custom,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Vibe::Truck => "truck",
            Vibe::Minimalist => "minimalist",
            Vibe::Bold => "bold",
            Vibe::Vibrant => "vibrant",
            Vibe::Illustrated => "illustrated",
            Vibe::Grunge => "grunge",
            Vibe::Custom => "custom",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Vibe::Truck => "Lukisan Bak Truk",
            Vibe::Minimalist => "Minimalist",
            Vibe::Bold => "Bold & Aggressive",
            Vibe::Vibrant => "Vibrant & Neon",
            Vibe::Illustrated => "Hand-Drawn Illustration",
            Vibe::Grunge => "Grunge & Street",
            Vibe::Custom => "Custom Chaos",
        }
    }

    /// Preset style description for this vibe.
    pub fn style_prompt(&self) -> &'static str {
        match self {
            Vibe::Truck => "Indonesian truck art style (lukisan bak truk), classic airbrush technique, vibrant yellow and green gradients, realistic portrait of a beautiful indonesian woman on the right side looking at viewer, decorative floral borders, street kitsch aesthetic, high gloss finish",
            Vibe::Minimalist => "Swiss style, bauhaus, geometric shapes, high contrast red and white, minimalist grain, negative space, abstract symbolism",
            Vibe::Bold => "Brutalist design, distressed texture, photocopy effect, industrial aesthetics, hazard stripes, bold blocks of color, heavy ink",
            Vibe::Vibrant => "Risograph printing style, neon overlay, dithered texture, halftone patterns, glitch art, psychedelic warning, vivid red and yellow",
            Vibe::Illustrated => "Woodcut style, linocut, raw sketch, hand-drawn horror aesthetic, scratchy textures, ink splatter, dramatic shading, propaganda art",
            Vibe::Grunge => "Torn paper collage, street paste-up style, spray paint textures, urban decay, dirty overlay, noir atmosphere, analog photography feel",
            Vibe::Custom => FALLBACK_STYLE,
        }
    }
}

impl Display for Vibe {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Vibe {
    type Err = PosterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Vibe::ALL
            .into_iter()
            .find(|v| v.name().eq_ignore_ascii_case(needle) || v.label().eq_ignore_ascii_case(needle))
            .ok_or_else(|| PosterError::UnknownVibe(s.to_string()))
    }
}

/// Fixed constraints appended to every style description.
pub const GENERATION_CONSTRAINTS: [&str; 4] = [
    "NO TEXT. Do not include any letters, words, or characters. The user will add text later.",
    "Center or one side of the image should be relatively clear to allow text overlay.",
    "High quality, artistic, and textured look.",
    "Aspect ratio vertical poster.",
];

/// What to ask the generator for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationRequest {
    pub style_description: String,
    pub constraints: Vec<String>,
}

impl GenerationRequest {
    /// Build a request for a vibe.
    ///
    /// The custom prompt only applies to [`Vibe::Custom`] and only when it has
    /// non-whitespace content. Everything else uses the vibe's preset.
    pub fn for_vibe(vibe: Vibe, custom_prompt: Option<&str>) -> Self {
        let style = match (vibe, custom_prompt.map(str::trim)) {
            (Vibe::Custom, Some(prompt)) if !prompt.is_empty() => prompt.to_string(),
            _ => vibe.style_prompt().to_string(),
        };
        Self {
            style_description: style,
            constraints: GENERATION_CONSTRAINTS.iter().map(|c| c.to_string()).collect(),
        }
    }

    /// Full prompt text sent to the model.
    pub fn prompt(&self) -> String {
        let mut prompt = format!(
            "Create a background for a poster.\nAesthetic: {}.\n\nCRITICAL INSTRUCTIONS:\n",
            self.style_description
        );
        for (i, constraint) in self.constraints.iter().enumerate() {
            prompt.push_str(&format!("{}. {}\n", i + 1, constraint));
        }
        prompt
    }
}

/// Raw image returned by a generator, not yet decoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("generator is not configured: {0}")]
    Config(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("generator returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("could not parse generator response: {0}")]
    InvalidResponse(String),

    #[error("no image data found in response")]
    MissingImage,

    #[error("invalid base64 image payload: {0}")]
    InvalidPayload(#[from] base64::DecodeError),
}

/// Produces background images from a request.
///
/// Implementations make no retries. One call is one attempt.
#[allow(async_fn_in_trait)]
pub trait ImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Vibe::Truck, Some("ignored"), Vibe::Truck.style_prompt())]
    #[case(Vibe::Custom, Some("neon cats"), "neon cats")]
    #[case(Vibe::Custom, Some("   "), FALLBACK_STYLE)]
    #[case(Vibe::Custom, None, FALLBACK_STYLE)]
    #[case(Vibe::Grunge, None, Vibe::Grunge.style_prompt())]
    fn test_request_style(#[case] vibe: Vibe, #[case] prompt: Option<&str>, #[case] expected: &str) {
        assert_eq!(GenerationRequest::for_vibe(vibe, prompt).style_description, expected);
    }

    #[test]
    fn test_prompt_embeds_style_and_constraints() {
        let prompt = GenerationRequest::for_vibe(Vibe::Minimalist, None).prompt();
        assert!(prompt.starts_with("Create a background for a poster."));
        assert!(prompt.contains("Aesthetic: Swiss style, bauhaus"));
        assert!(prompt.contains("1. NO TEXT."));
        assert!(prompt.contains("4. Aspect ratio vertical poster."));
    }

    #[rstest]
    #[case("truck", Vibe::Truck)]
    #[case("Bold & Aggressive", Vibe::Bold)]
    #[case("CUSTOM", Vibe::Custom)]
    fn test_parse_vibe(#[case] input: &str, #[case] expected: Vibe) {
        assert_eq!(input.parse::<Vibe>().unwrap(), expected);
    }

    #[test]
    fn test_parse_unknown_vibe() {
        assert!("vaporwave".parse::<Vibe>().is_err());
    }
}
