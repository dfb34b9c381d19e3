//! `ImageGenerator` trait, the OpenAI-compatible `ApiImageGenerator`, and
//! `UnsupportedImageGenerator` for hosts without image generation.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use futures::stream::{self, BoxStream, StreamExt, TryStreamExt};
use serde::{Deserialize, Serialize};

use crate::config::GenerationConfig;
use crate::service::error::ServiceError;

// ---------------------------------------------------------------------------
// ImageData
// ---------------------------------------------------------------------------

/// Encoded image bytes plus their media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageData {
    pub media_type: String,
    pub bytes: Vec<u8>,
}

impl ImageData {
    pub fn png(bytes: Vec<u8>) -> Self {
        Self {
            media_type: "image/png".into(),
            bytes,
        }
    }

    pub fn svg(document: String) -> Self {
        Self {
            media_type: "image/svg+xml".into(),
            bytes: document.into_bytes(),
        }
    }
}

// ---------------------------------------------------------------------------
// ImageStyle
// ---------------------------------------------------------------------------

/// Style hint passed to the image backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ImageStyle {
    #[default]
    Sketch,
    Illustration,
    Animation,
}

impl ImageStyle {
    pub fn as_str(&self) -> &'static str {
        match self {
            ImageStyle::Sketch => "sketch",
            ImageStyle::Illustration => "illustration",
            ImageStyle::Animation => "animation",
        }
    }
}

// ---------------------------------------------------------------------------
// ImageGenerator trait
// ---------------------------------------------------------------------------

/// Lazily produced images; nothing happens until the stream is polled.
pub type ImageStream = BoxStream<'static, Result<ImageData, ServiceError>>;

/// Image generation from a text prompt.
///
/// The returned stream yields up to `limit` images and may fail at any item.
/// A first item of `Err(ServiceError::Unavailable)` means the host cannot
/// generate images at all.
pub trait ImageGenerator: Send + Sync {
    fn images(&self, prompt: &str, style: ImageStyle, limit: usize) -> ImageStream;
}

// ---------------------------------------------------------------------------
// UnsupportedImageGenerator
// ---------------------------------------------------------------------------

/// Always reports [`ServiceError::Unavailable`].
///
/// Used when generation is disabled in config, so every call takes the
/// pipeline's fallback path.
#[derive(Debug, Clone, Copy, Default)]
pub struct UnsupportedImageGenerator;

impl ImageGenerator for UnsupportedImageGenerator {
    fn images(&self, _prompt: &str, _style: ImageStyle, _limit: usize) -> ImageStream {
        stream::iter(std::iter::once(Err(ServiceError::Unavailable))).boxed()
    }
}

// ---------------------------------------------------------------------------
// ApiImageGenerator
// ---------------------------------------------------------------------------

/// Calls an OpenAI-compatible `/v1/images/generations` endpoint and decodes
/// the base64 (`b64_json`) payloads.
pub struct ApiImageGenerator {
    client: reqwest::Client,
    config: GenerationConfig,
}

impl ApiImageGenerator {
    pub fn from_config(config: &GenerationConfig) -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(config.timeout_secs))
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());

        Self {
            client,
            config: config.clone(),
        }
    }
}

impl ImageGenerator for ApiImageGenerator {
    fn images(&self, prompt: &str, style: ImageStyle, limit: usize) -> ImageStream {
        let url = format!(
            "{}/v1/images/generations",
            self.config.base_url.trim_end_matches('/')
        );

        let body = serde_json::json!({
            "model":           self.config.model,
            "prompt":          format!("{prompt} Render it as a {}.", style.as_str()),
            "n":               limit.max(1),
            "response_format": "b64_json",
        });

        let mut req = self.client.post(url).json(&body);
        if let Some(key) = self.config.api_key.as_deref().filter(|k| !k.is_empty()) {
            req = req.bearer_auth(key);
        }

        stream::once(fetch_images(req))
            .map_ok(|images| stream::iter(images.into_iter().map(Ok::<ImageData, ServiceError>)))
            .try_flatten()
            .boxed()
    }
}

async fn fetch_images(req: reqwest::RequestBuilder) -> Result<Vec<ImageData>, ServiceError> {
    let response = req.send().await?;

    if let Some(err) = ServiceError::from_status(response.status()) {
        return Err(err);
    }

    let json: serde_json::Value = response
        .json()
        .await
        .map_err(|e| ServiceError::Parse(e.to_string()))?;

    let entries = json["data"].as_array().ok_or(ServiceError::EmptyResponse)?;

    let mut images = Vec::with_capacity(entries.len());
    for entry in entries {
        let encoded = entry["b64_json"]
            .as_str()
            .ok_or_else(|| ServiceError::Parse("missing b64_json".into()))?;
        let bytes = STANDARD
            .decode(encoded)
            .map_err(|e| ServiceError::Parse(e.to_string()))?;
        images.push(ImageData::png(bytes));
    }

    if images.is_empty() {
        return Err(ServiceError::EmptyResponse);
    }

    Ok(images)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn make_config(base_url: &str) -> GenerationConfig {
        GenerationConfig {
            base_url: base_url.into(),
            api_key: Some("sk-img".into()),
            ..GenerationConfig::default()
        }
    }

    #[tokio::test]
    async fn unsupported_yields_single_unavailable() {
        let items: Vec<_> = UnsupportedImageGenerator
            .images("🐶", ImageStyle::Sketch, 1)
            .collect()
            .await;
        assert_eq!(items.len(), 1);
        assert!(matches!(items[0], Err(ServiceError::Unavailable)));
    }

    #[tokio::test]
    async fn api_decodes_each_image() {
        let first = STANDARD.encode(b"\x89PNG-one");
        let second = STANDARD.encode(b"\x89PNG-two");

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/v1/images/generations")
            .match_header("authorization", "Bearer sk-img")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(format!(
                r#"{{"data":[{{"b64_json":"{first}"}},{{"b64_json":"{second}"}}]}}"#
            ))
            .create_async()
            .await;

        let generator = ApiImageGenerator::from_config(&make_config(&server.url()));
        let images: Vec<ImageData> = generator
            .images("🐶", ImageStyle::Sketch, 2)
            .try_collect()
            .await
            .unwrap();

        assert_eq!(images.len(), 2);
        assert_eq!(images[0].bytes, b"\x89PNG-one");
        assert_eq!(images[1].media_type, "image/png");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn api_missing_endpoint_is_unavailable() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/images/generations")
            .with_status(404)
            .create_async()
            .await;

        let generator = ApiImageGenerator::from_config(&make_config(&server.url()));
        let first = generator
            .images("🐶", ImageStyle::Sketch, 1)
            .next()
            .await
            .expect("one item");
        assert!(first.unwrap_err().is_unavailable());
    }

    #[tokio::test]
    async fn api_bad_base64_is_parse_error() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", "/v1/images/generations")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"data":[{"b64_json":"***"}]}"#)
            .create_async()
            .await;

        let generator = ApiImageGenerator::from_config(&make_config(&server.url()));
        let first = generator
            .images("🐶", ImageStyle::Sketch, 1)
            .next()
            .await
            .expect("one item");
        assert!(matches!(first, Err(ServiceError::Parse(_))));
    }

    #[test]
    fn style_names() {
        assert_eq!(ImageStyle::Sketch.as_str(), "sketch");
        assert_eq!(ImageStyle::default(), ImageStyle::Sketch);
    }
}
