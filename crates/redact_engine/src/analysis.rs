//! Risk analysis through a multimodal `generateContent` endpoint.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use redact_logging::{redact_debug, redact_info};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use url::Url;

use crate::http::{map_reqwest_error, read_body, read_local};
use crate::{EngineSettings, FailureKind, TransportError};

pub const ANALYSIS_PROMPT: &str = "Analyze this image for any cues or risks that will make this place easily identifiable. Provide a concise summary that includes any visible personal information, dangerous objects, or identifiable locations. Recommend from list ['face', 'flag', 'landmark', 'sign'] on which to redact.";
pub const INLINE_MIME_TYPE: &str = "image/jpeg";

#[async_trait::async_trait]
pub trait RiskAnalyzer: Send + Sync {
    /// `Ok(None)` when the response was well formed but carried no text.
    async fn analyze(&self, image_uri: &str) -> Result<Option<String>, TransportError>;
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InferenceRequest {
    pub contents: Vec<Content>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    pub role: &'static str,
    pub parts: Vec<ContentPart>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text {
        text: String,
    },
    #[serde(rename_all = "camelCase")]
    InlineData {
        inline_data: InlineData,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: &'static str,
    pub data: String,
}

impl InferenceRequest {
    /// Single user turn: the fixed prompt followed by the inlined image.
    pub fn for_image(base64_image: String) -> Self {
        Self {
            contents: vec![Content {
                role: "user",
                parts: vec![
                    ContentPart::Text {
                        text: ANALYSIS_PROMPT.to_string(),
                    },
                    ContentPart::InlineData {
                        inline_data: InlineData {
                            mime_type: INLINE_MIME_TYPE,
                            data: base64_image,
                        },
                    },
                ],
            }],
        }
    }
}

pub fn encode_image(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Reads `candidates[0].content.parts[0].text`; empty text counts as absent.
pub fn extract_summary(response: &serde_json::Value) -> Option<String> {
    response
        .pointer("/candidates/0/content/parts/0/text")
        .and_then(serde_json::Value::as_str)
        .filter(|text| !text.is_empty())
        .map(ToOwned::to_owned)
}

/// Calls the inference backend with reqwest. Every call re-reads the image.
pub struct ReqwestRiskAnalyzer {
    client: reqwest::Client,
    endpoint: Url,
    api_key: SecretString,
    max_bytes: u64,
}

impl ReqwestRiskAnalyzer {
    pub fn new(settings: &EngineSettings) -> Result<Self, TransportError> {
        let endpoint = Url::parse(&settings.inference_endpoint)
            .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
        let client = settings
            .client_builder()
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            client,
            endpoint,
            api_key: SecretString::new(settings.api_key.expose_secret().clone()),
            max_bytes: settings.max_response_bytes,
        })
    }

    fn keyed_endpoint(&self) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("key", self.api_key.expose_secret());
        url
    }
}

#[async_trait::async_trait]
impl RiskAnalyzer for ReqwestRiskAnalyzer {
    async fn analyze(&self, image_uri: &str) -> Result<Option<String>, TransportError> {
        let image = read_local(image_uri).await?;
        let payload = InferenceRequest::for_image(encode_image(&image));
        redact_debug!(
            "Analysis request uri={} endpoint={} image_bytes={}",
            image_uri,
            self.endpoint,
            image.len()
        );

        let response = self
            .client
            .post(self.keyed_endpoint())
            .json(&payload)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        redact_info!("Analysis response status={}", response.status());

        // Error statuses still carry a JSON body (quota, bad key); it has no
        // candidate text and so reads as "no findings".
        let body = read_body(response, self.max_bytes).await?;
        let parsed: serde_json::Value = serde_json::from_slice(&body)
            .map_err(|err| TransportError::new(FailureKind::Protocol, err.to_string()))?;
        Ok(extract_summary(&parsed))
    }
}
