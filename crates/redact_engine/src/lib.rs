//! Redaction engine: backend round-trips and effect execution.
mod analysis;
mod engine;
mod http;
mod redaction;
mod request;
mod settings;
mod types;

pub use analysis::{
    encode_image, extract_summary, Content, ContentPart, InferenceRequest, InlineData,
    ReqwestRiskAnalyzer, RiskAnalyzer, ANALYSIS_PROMPT, INLINE_MIME_TYPE,
};
pub use engine::{EngineError, EngineHandle};
pub use redaction::{RedactionBackend, ReqwestRedactionBackend, PROCESS_IMAGE_PATH};
pub use request::{RedactionRequest, IMAGE_CONTENT_TYPE, IMAGE_FIELD, IMAGE_FILENAME};
pub use settings::{
    EngineSettings, DEFAULT_BACKEND_URL, DEFAULT_INFERENCE_ENDPOINT, DEFAULT_MAX_RESPONSE_BYTES,
};
pub use types::{EngineEvent, FailureKind, RedactionOutcome, TransportError};

/// Re-exported so callers can build [`EngineSettings`] without their own dependency.
pub use secrecy::SecretString;
