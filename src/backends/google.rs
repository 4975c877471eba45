use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};

use crate::color::Color;
use crate::error::{AnalysisError, ClientError};

use super::ColorBackend;

pub const DEFAULT_ENDPOINT: &str = "https://vision.googleapis.com/v1/images:annotate";

/// How requests to the Vision API are authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Credentials {
    /// Sent as the `key` query parameter.
    ApiKey(String),
    /// Sent as an `Authorization: Bearer` header.
    AccessToken(String),
}

impl Credentials {
    /// Pick credentials from the configured sources. The API key wins when
    /// both are present; empty strings count as absent.
    pub fn resolve(
        api_key: Option<String>,
        access_token: Option<String>,
    ) -> Result<Self, ClientError> {
        let present = |v: Option<String>| {
            v.map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
        };
        if let Some(key) = present(api_key) {
            return Ok(Credentials::ApiKey(key));
        }
        if let Some(token) = present(access_token) {
            return Ok(Credentials::AccessToken(token));
        }
        Err(ClientError::MissingCredentials)
    }

    fn kind(&self) -> &'static str {
        match self {
            Credentials::ApiKey(_) => "api-key",
            Credentials::AccessToken(_) => "access-token",
        }
    }
}

#[derive(Debug, Clone)]
pub struct VisionConfig {
    pub endpoint: String,
    pub credentials: Credentials,
    /// `None` waits for the service indefinitely.
    pub timeout: Option<Duration>,
}

/// Google Cloud Vision `IMAGE_PROPERTIES` backend over the REST API.
pub struct GoogleVision {
    client: Client,
    endpoint: String,
    credentials: Credentials,
}

impl GoogleVision {
    pub fn new(config: VisionConfig) -> Result<Self, ClientError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        tracing::debug!(
            endpoint = %config.endpoint,
            auth = config.credentials.kind(),
            "Vision client ready"
        );
        Ok(Self {
            client,
            endpoint: config.endpoint,
            credentials: config.credentials,
        })
    }
}

impl ColorBackend for GoogleVision {
    fn name(&self) -> &str {
        "Google Cloud Vision"
    }

    fn dominant_colors(&self, image: &[u8]) -> Result<Vec<Color>, AnalysisError> {
        let body = AnnotateRequest::image_properties(image);

        let request = self.client.post(&self.endpoint).json(&body);
        let request = match &self.credentials {
            Credentials::ApiKey(key) => request.query(&[("key", key)]),
            Credentials::AccessToken(token) => request.bearer_auth(token),
        };

        tracing::debug!(bytes = image.len(), endpoint = %self.endpoint, "Requesting image properties");
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .ok()
                .and_then(|e| e.error)
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| format!("HTTP {status}"));
            return Err(AnalysisError::Service(message));
        }

        let parsed: AnnotateResponse = serde_json::from_str(&text)?;
        parse_colors(parsed)
    }
}

fn parse_colors(response: AnnotateResponse) -> Result<Vec<Color>, AnalysisError> {
    let Some(first) = response.responses.into_iter().next() else {
        return Ok(Vec::new());
    };

    if let Some(error) = first.error.filter(|e| !e.message.is_empty()) {
        return Err(AnalysisError::Service(error.message));
    }

    let colors = first
        .image_properties_annotation
        .and_then(|p| p.dominant_colors)
        .map(|d| d.colors)
        .unwrap_or_default()
        .into_iter()
        .map(|c| Color::from_channels(c.color.red, c.color.green, c.color.blue))
        .collect();
    Ok(colors)
}

// --- wire types ---

#[derive(Debug, Serialize)]
struct AnnotateRequest {
    requests: Vec<ImageRequest>,
}

impl AnnotateRequest {
    fn image_properties(image: &[u8]) -> Self {
        Self {
            requests: vec![ImageRequest {
                image: ImageContent {
                    content: BASE64.encode(image),
                },
                features: vec![Feature {
                    kind: "IMAGE_PROPERTIES",
                }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct ImageRequest {
    image: ImageContent,
    features: Vec<Feature>,
}

#[derive(Debug, Serialize)]
struct ImageContent {
    content: String,
}

#[derive(Debug, Serialize)]
struct Feature {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Default, Deserialize)]
struct AnnotateResponse {
    #[serde(default)]
    responses: Vec<ImageResponse>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageResponse {
    image_properties_annotation: Option<ImageProperties>,
    error: Option<Status>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ImageProperties {
    dominant_colors: Option<DominantColors>,
}

#[derive(Debug, Deserialize)]
struct DominantColors {
    #[serde(default)]
    colors: Vec<ColorInfo>,
}

#[derive(Debug, Deserialize)]
struct ColorInfo {
    #[serde(default)]
    color: RgbValue,
}

// Proto3 JSON drops zero-valued fields, so every channel defaults to 0.
#[derive(Debug, Default, Deserialize)]
struct RgbValue {
    #[serde(default)]
    red: f32,
    #[serde(default)]
    green: f32,
    #[serde(default)]
    blue: f32,
}

#[derive(Debug, Deserialize)]
struct Status {
    #[serde(default)]
    message: String,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: Option<Status>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> Result<Vec<Color>, AnalysisError> {
        parse_colors(serde_json::from_str(json).unwrap())
    }

    #[test]
    fn request_body_shape() {
        let body = serde_json::to_value(AnnotateRequest::image_properties(b"abc")).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "requests": [{
                    "image": { "content": "YWJj" },
                    "features": [{ "type": "IMAGE_PROPERTIES" }]
                }]
            })
        );
    }

    #[test]
    fn takes_colors_in_ranked_order() {
        let colors = parse(
            r#"{"responses":[{"imagePropertiesAnnotation":{"dominantColors":{"colors":[
                {"color":{"red":200,"green":190,"blue":180},"score":0.6,"pixelFraction":0.4},
                {"color":{"red":10,"green":20,"blue":30},"score":0.2}
            ]}}}]}"#,
        )
        .unwrap();
        assert_eq!(colors, vec![Color::new(200, 190, 180), Color::new(10, 20, 30)]);
    }

    #[test]
    fn missing_channels_are_zero() {
        let colors = parse(
            r#"{"responses":[{"imagePropertiesAnnotation":{"dominantColors":{"colors":[
                {"color":{"green":255}}
            ]}}}]}"#,
        )
        .unwrap();
        assert_eq!(colors, vec![Color::new(0, 255, 0)]);
    }

    #[test]
    fn per_image_error_is_a_service_error() {
        let err = parse(r#"{"responses":[{"error":{"code":3,"message":"Bad image data."}}]}"#)
            .unwrap_err();
        assert!(
            matches!(err, AnalysisError::Service(ref m) if m == "Bad image data."),
            "got {err:?}"
        );
    }

    #[test]
    fn empty_responses_yield_no_colors() {
        assert!(parse(r#"{}"#).unwrap().is_empty());
        assert!(parse(r#"{"responses":[{}]}"#).unwrap().is_empty());
        assert!(parse(r#"{"responses":[{"imagePropertiesAnnotation":{}}]}"#)
            .unwrap()
            .is_empty());
    }

    #[test]
    fn api_key_wins_over_token() {
        let creds =
            Credentials::resolve(Some("key".into()), Some("token".into())).unwrap();
        assert_eq!(creds, Credentials::ApiKey("key".into()));
    }

    #[test]
    fn blank_key_falls_back_to_token() {
        let creds = Credentials::resolve(Some("  ".into()), Some("token".into())).unwrap();
        assert_eq!(creds, Credentials::AccessToken("token".into()));
    }

    #[test]
    fn no_credentials_is_an_error() {
        let err = Credentials::resolve(None, Some(String::new())).unwrap_err();
        assert!(matches!(err, ClientError::MissingCredentials));
    }
}
