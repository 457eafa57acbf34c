use std::fmt;
use std::time::Duration;

use secrecy::SecretString;

pub const DEFAULT_BACKEND_URL: &str = "http://10.0.2.2:8000";
pub const DEFAULT_INFERENCE_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.5-flash-preview-05-20:generateContent";
pub const DEFAULT_MAX_RESPONSE_BYTES: u64 = 32 * 1024 * 1024;

/// Connection settings for both backends.
///
/// Timeouts are unset by default, so a request may wait indefinitely.
pub struct EngineSettings {
    /// Base URL of the redaction backend; `/process_image` is appended.
    pub backend_url: String,
    /// Full `generateContent` URL of the inference backend, without the key.
    pub inference_endpoint: String,
    /// Inference API key. Only ever placed in the request URL.
    pub api_key: SecretString,
    pub connect_timeout: Option<Duration>,
    pub request_timeout: Option<Duration>,
    /// Upper bound on a buffered response body.
    pub max_response_bytes: u64,
}

impl EngineSettings {
    pub fn new(backend_url: impl Into<String>, api_key: SecretString) -> Self {
        Self {
            backend_url: backend_url.into(),
            inference_endpoint: DEFAULT_INFERENCE_ENDPOINT.to_string(),
            api_key,
            connect_timeout: None,
            request_timeout: None,
            max_response_bytes: DEFAULT_MAX_RESPONSE_BYTES,
        }
    }

    pub(crate) fn client_builder(&self) -> reqwest::ClientBuilder {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.connect_timeout {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = self.request_timeout {
            builder = builder.timeout(timeout);
        }
        builder
    }
}

impl fmt::Debug for EngineSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EngineSettings")
            .field("backend_url", &self.backend_url)
            .field("inference_endpoint", &self.inference_endpoint)
            .field("api_key", &"[redacted]")
            .field("connect_timeout", &self.connect_timeout)
            .field("request_timeout", &self.request_timeout)
            .field("max_response_bytes", &self.max_response_bytes)
            .finish()
    }
}
