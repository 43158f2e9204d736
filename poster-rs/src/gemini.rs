//! Gemini `generateContent` client for background images.

use crate::generator::{GeneratedImage, GenerationError, GenerationRequest, ImageGenerator};
use base64::Engine as _;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

static POSTER_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";
pub const DEFAULT_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_MIME_TYPE: &str = "image/png";

pub const API_KEY_ENV: &str = "GEMINI_API_KEY";
pub const API_KEY_FALLBACK_ENV: &str = "API_KEY";
pub const MODEL_ENV: &str = "POSTER_GEMINI_MODEL";
pub const ENDPOINT_ENV: &str = "POSTER_GEMINI_ENDPOINT";

#[derive(Clone)]
pub struct GeminiConfig {
    pub api_key: String,
    pub model: String,
    /// Base URL, without the `/v1beta/...` path.
    pub endpoint: String,
    pub timeout: Duration,
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl GeminiConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(120),
        }
    }

    /// Read configuration from the environment.
    pub fn from_env() -> Result<Self, GenerationError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, GenerationError> {
        let non_empty = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let api_key = non_empty(API_KEY_ENV)
            .or_else(|| non_empty(API_KEY_FALLBACK_ENV))
            .ok_or_else(|| {
                GenerationError::Config(format!("set {API_KEY_ENV} or {API_KEY_FALLBACK_ENV}"))
            })?;
        let mut config = Self::new(api_key);
        if let Some(model) = non_empty(MODEL_ENV) {
            config.model = model;
        }
        if let Some(endpoint) = non_empty(ENDPOINT_ENV) {
            config.endpoint = endpoint;
        }
        Ok(config)
    }

    fn url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            self.model
        )
    }
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<TextPart<'a>>,
}

#[derive(Debug, Serialize)]
struct TextPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    inline_data: Option<InlineData>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    mime_type: Option<String>,
    #[serde(default)]
    data: String,
}

/// Extract the first inline image from a `generateContent` response body.
pub fn parse_response(body: &str) -> Result<GeneratedImage, GenerationError> {
    let response: GenerateContentResponse =
        serde_json::from_str(body).map_err(|e| GenerationError::InvalidResponse(e.to_string()))?;

    let inline = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .and_then(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.inline_data)
                .find(|inline| !inline.data.is_empty())
        })
        .ok_or(GenerationError::MissingImage)?;

    let data = base64::engine::general_purpose::STANDARD.decode(inline.data.trim())?;
    Ok(GeneratedImage {
        mime_type: inline
            .mime_type
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| DEFAULT_MIME_TYPE.to_string()),
        data,
    })
}

/// [`ImageGenerator`] backed by the Gemini REST API.
#[derive(Debug, Clone)]
pub struct GeminiImageGenerator {
    config: GeminiConfig,
    client: Client,
}

impl GeminiImageGenerator {
    pub fn new(config: GeminiConfig) -> Result<Self, GenerationError> {
        let client = reqwest::ClientBuilder::new()
            .user_agent(POSTER_USER_AGENT)
            .timeout(config.timeout)
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &GeminiConfig {
        &self.config
    }
}

impl ImageGenerator for GeminiImageGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedImage, GenerationError> {
        let prompt = request.prompt();
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![TextPart { text: &prompt }],
            }],
        };
        log::info!("Requesting background from model {}", self.config.model);

        let response = self
            .client
            .post(self.config.url())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&body)
            .send()
            .await?;
        let status = response.status();
        let text = response.text().await?;

        if status != StatusCode::OK {
            log::error!(
                "Gemini generation failed with status code {:?}\n{}",
                status,
                text
            );
            return Err(GenerationError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let image = parse_response(&text)?;
        log::info!(
            "Received {} bytes of {} from model {}",
            image.data.len(),
            image.mime_type,
            self.config.model
        );
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_parse_response_success() {
        let body = r#"{
            "candidates": [{
                "content": {
                    "parts": [
                        {"text": "here you go"},
                        {"inlineData": {"mimeType": "image/jpeg", "data": "aGVsbG8="}}
                    ]
                }
            }]
        }"#;
        let image = parse_response(body).unwrap();
        assert_eq!(image.mime_type, "image/jpeg");
        assert_eq!(image.data, b"hello");
    }

    #[test]
    fn test_parse_response_defaults_mime_type() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"aGk="}}]}}]}"#;
        assert_eq!(parse_response(body).unwrap().mime_type, "image/png");
    }

    #[test]
    fn test_parse_response_skips_empty_inline_data() {
        let body = r#"{"candidates":[{"content":{"parts":[
            {"inlineData":{"mimeType":"image/png","data":""}},
            {"inlineData":{"mimeType":"image/webp","data":"aGk="}}
        ]}}]}"#;
        assert_eq!(parse_response(body).unwrap().mime_type, "image/webp");
    }

    #[test]
    fn test_parse_response_missing_image() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"sorry"}]}}]}"#;
        assert!(matches!(parse_response(body), Err(GenerationError::MissingImage)));
        assert!(matches!(parse_response("{}"), Err(GenerationError::MissingImage)));
    }

    #[test]
    fn test_parse_response_bad_base64() {
        let body = r#"{"candidates":[{"content":{"parts":[{"inlineData":{"data":"!!!"}}]}}]}"#;
        assert!(matches!(parse_response(body), Err(GenerationError::InvalidPayload(_))));
    }

    #[test]
    fn test_parse_response_not_json() {
        assert!(matches!(
            parse_response("<html>"),
            Err(GenerationError::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_config_from_lookup() {
        let config = GeminiConfig::from_lookup(lookup(&[
            ("API_KEY", "fallback"),
            ("POSTER_GEMINI_MODEL", "custom-model"),
        ]))
        .unwrap();
        assert_eq!(config.api_key, "fallback");
        assert_eq!(config.model, "custom-model");
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn test_config_prefers_gemini_key() {
        let config =
            GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "primary"), ("API_KEY", "x")]))
                .unwrap();
        assert_eq!(config.api_key, "primary");
    }

    #[test]
    fn test_config_missing_key() {
        assert!(matches!(
            GeminiConfig::from_lookup(lookup(&[("GEMINI_API_KEY", "  ")])),
            Err(GenerationError::Config(_))
        ));
    }

    #[test]
    fn test_url() {
        let mut config = GeminiConfig::new("k");
        config.endpoint = "http://127.0.0.1:9/".to_string();
        assert_eq!(
            config.url(),
            "http://127.0.0.1:9/v1beta/models/gemini-2.5-flash-image:generateContent"
        );
    }

    #[test]
    fn test_debug_redacts_key() {
        let rendered = format!("{:?}", GeminiConfig::new("secret-key"));
        assert!(!rendered.contains("secret-key"));
    }
}
