use std::fmt;

use redact_core::{AssetId, GeoRiskEstimate};

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    RedactionCompleted {
        asset_id: AssetId,
        generation: u64,
        result: Result<RedactionOutcome, TransportError>,
    },
    AnalysisCompleted {
        ticket: u64,
        /// `Ok(None)`: well-formed response without summary text.
        result: Result<Option<String>, TransportError>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct RedactionOutcome {
    pub redacted_uri: String,
    pub estimate: GeoRiskEstimate,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    pub kind: FailureKind,
    pub message: String,
}

impl TransportError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    InvalidUrl,
    UnreadableImage,
    HttpStatus(u16),
    Timeout,
    TooLarge { max_bytes: u64, actual: Option<u64> },
    /// Response did not have the agreed shape.
    Protocol,
    Network,
    /// The task running the request panicked.
    Aborted,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::InvalidUrl => write!(f, "invalid url"),
            FailureKind::UnreadableImage => write!(f, "unreadable image"),
            FailureKind::HttpStatus(code) => write!(f, "http status {code}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::TooLarge { max_bytes, actual } => {
                write!(f, "response too large (max {max_bytes}, actual {actual:?})")
            }
            FailureKind::Protocol => write!(f, "unexpected response shape"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Aborted => write!(f, "request aborted"),
        }
    }
}
