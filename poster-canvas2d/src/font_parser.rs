//! The CSS `font` shorthand, as far as canvas text needs it:
//! `[style] [weight] <size>[/<line-height>] <family>[, <family>]*`.

use crate::error::{Canvas2dError, Canvas2dResult};
use cosmic_text::{Style, Weight};
use std::str::FromStr;

/// A font request decoded from a CSS `font` string.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    pub style: Style,
    pub weight: Weight,
    /// Size in device pixels.
    pub px: f32,
    /// Preference order; generic names (`sans-serif`, `monospace`) allowed.
    pub families: Vec<String>,
}

impl Default for FontSpec {
    /// The canvas default, `10px sans-serif`.
    fn default() -> Self {
        Self {
            style: Style::Normal,
            weight: Weight::NORMAL,
            px: 10.0,
            families: vec!["sans-serif".to_string()],
        }
    }
}

impl FromStr for FontSpec {
    type Err = Canvas2dError;

    fn from_str(css: &str) -> Canvas2dResult<Self> {
        let mut spec = FontSpec::default();
        let mut words = css.trim_start();
        if words.trim().is_empty() {
            return Ok(spec);
        }

        // Style and weight keywords, until the first word that is neither
        let size_word = loop {
            let (word, rest) = next_word(words);
            words = rest;
            if !apply_keyword(&mut spec, word) {
                break word;
            }
        };

        // Line height means nothing for single-line text
        let size = size_word.split('/').next().unwrap_or_default();
        spec.px = parse_length(size)?;

        let families = split_families(words);
        if !families.is_empty() {
            spec.families = families;
        }
        Ok(spec)
    }
}

pub(crate) fn parse_font(css: &str) -> Canvas2dResult<FontSpec> {
    css.parse()
}

fn next_word(s: &str) -> (&str, &str) {
    let s = s.trim_start();
    let end = s.find(char::is_whitespace).unwrap_or(s.len());
    (&s[..end], &s[end..])
}

/// Returns false when `word` is not a style or weight keyword.
fn apply_keyword(spec: &mut FontSpec, word: &str) -> bool {
    match word {
        "normal" | "small-caps" => {}
        "italic" => spec.style = Style::Italic,
        "oblique" => spec.style = Style::Oblique,
        "bold" => spec.weight = Weight::BOLD,
        "bolder" => spec.weight = Weight::EXTRA_BOLD,
        "lighter" => spec.weight = Weight::LIGHT,
        _ => match word.parse::<u16>() {
            Ok(w) if (100..=900).contains(&w) && w % 100 == 0 => spec.weight = Weight(w),
            _ => return false,
        },
    }
    true
}

/// `px`, `pt` or a bare number.
fn parse_length(word: &str) -> Canvas2dResult<f32> {
    let (number, factor) = if let Some(n) = word.strip_suffix("px") {
        (n, 1.0)
    } else if let Some(n) = word.strip_suffix("pt") {
        (n, 4.0 / 3.0)
    } else {
        (word, 1.0)
    };
    match number.parse::<f32>() {
        Ok(v) if v.is_finite() && v >= 0.0 => Ok(v * factor),
        _ => Err(Canvas2dError::Font(format!("bad font size {word:?}"))),
    }
}

fn split_families(list: &str) -> Vec<String> {
    list.split(',')
        .map(|name| name.trim().trim_matches(['"', '\'']).to_string())
        .filter(|name| !name.is_empty())
        .collect()
}
