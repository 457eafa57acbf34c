use redact_core::GeoRiskEstimate;
use redact_logging::{redact_debug, redact_info};
use serde::Deserialize;
use url::Url;

use crate::http::{map_reqwest_error, read_local, read_success_body};
use crate::request::RedactionRequest;
use crate::{EngineSettings, FailureKind, RedactionOutcome, TransportError};

pub const PROCESS_IMAGE_PATH: &str = "process_image";

#[async_trait::async_trait]
pub trait RedactionBackend: Send + Sync {
    async fn redact(&self, request: RedactionRequest) -> Result<RedactionOutcome, TransportError>;
}

#[derive(Debug, Deserialize)]
struct ProcessImageResponse {
    redacted_image: String,
    predicted_location: PredictedLocation,
}

#[derive(Debug, Deserialize)]
struct PredictedLocation {
    gps: Vec<f64>,
    probability: Vec<f64>,
}

/// Sends redaction requests to the HTTP backend.
#[derive(Debug, Clone)]
pub struct ReqwestRedactionBackend {
    client: reqwest::Client,
    endpoint: Url,
    max_bytes: u64,
}

impl ReqwestRedactionBackend {
    pub fn new(settings: &EngineSettings) -> Result<Self, TransportError> {
        let endpoint = process_image_url(&settings.backend_url)?;
        let client = settings
            .client_builder()
            .build()
            .map_err(map_reqwest_error)?;
        Ok(Self {
            client,
            endpoint,
            max_bytes: settings.max_response_bytes,
        })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait::async_trait]
impl RedactionBackend for ReqwestRedactionBackend {
    async fn redact(&self, request: RedactionRequest) -> Result<RedactionOutcome, TransportError> {
        let image = read_local(&request.image_uri).await?;
        redact_debug!(
            "Redaction request uri={} image_bytes={} query={}",
            request.image_uri,
            image.len(),
            request.field("query").unwrap_or_default()
        );
        let form = request.into_form(image)?;

        let response = self
            .client
            .post(self.endpoint.clone())
            .multipart(form)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        let body = read_success_body(response, self.max_bytes).await?;
        let outcome = parse_response(&body)?;
        redact_info!(
            "Redaction response redacted_len={} gps={:?}",
            outcome.redacted_uri.len(),
            outcome.estimate.coordinates
        );
        Ok(outcome)
    }
}

/// Joins `process_image` onto the base URL, keeping any base path.
fn process_image_url(base: &str) -> Result<Url, TransportError> {
    let mut base = Url::parse(base)
        .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(PROCESS_IMAGE_PATH)
        .map_err(|err| TransportError::new(FailureKind::InvalidUrl, err.to_string()))
}

fn parse_response(body: &[u8]) -> Result<RedactionOutcome, TransportError> {
    let parsed: ProcessImageResponse = serde_json::from_slice(body)
        .map_err(|err| TransportError::new(FailureKind::Protocol, err.to_string()))?;
    let [latitude, longitude] = match parsed.predicted_location.gps.as_slice() {
        [latitude, longitude, ..] => [*latitude, *longitude],
        other => {
            return Err(TransportError::new(
                FailureKind::Protocol,
                format!("gps needs latitude and longitude, got {} values", other.len()),
            ))
        }
    };
    Ok(RedactionOutcome {
        redacted_uri: parsed.redacted_image,
        estimate: GeoRiskEstimate::new(
            latitude,
            longitude,
            parsed.predicted_location.probability,
        ),
    })
}
