use futures_util::StreamExt;

use crate::{FailureKind, TransportError};

/// Checks the status and buffers the body, refusing anything over `max_bytes`.
pub(crate) async fn read_success_body(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, TransportError> {
    let status = response.status();
    if !status.is_success() {
        return Err(TransportError::new(
            FailureKind::HttpStatus(status.as_u16()),
            status.to_string(),
        ));
    }
    read_body(response, max_bytes).await
}

/// Buffers the body whatever the status, refusing anything over `max_bytes`.
pub(crate) async fn read_body(
    response: reqwest::Response,
    max_bytes: u64,
) -> Result<Vec<u8>, TransportError> {
    if let Some(content_len) = response.content_length() {
        if content_len > max_bytes {
            return Err(too_large(max_bytes, Some(content_len)));
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();
    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(map_reqwest_error)?;
        let next_len = bytes.len() as u64 + chunk.len() as u64;
        if next_len > max_bytes {
            return Err(too_large(max_bytes, Some(next_len)));
        }
        bytes.extend_from_slice(&chunk);
    }
    Ok(bytes)
}

fn too_large(max_bytes: u64, actual: Option<u64>) -> TransportError {
    TransportError::new(
        FailureKind::TooLarge { max_bytes, actual },
        "response too large",
    )
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    // The inference URL carries the API key; keep it out of messages.
    let err = err.without_url();
    if err.is_timeout() {
        return TransportError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_builder() {
        return TransportError::new(FailureKind::InvalidUrl, err.to_string());
    }
    TransportError::new(FailureKind::Network, err.to_string())
}

/// Resolves an asset URI to a filesystem path. `file://` URIs are stripped;
/// anything else is treated as a plain path.
pub(crate) fn local_path(uri: &str) -> &str {
    uri.strip_prefix("file://").unwrap_or(uri)
}

pub(crate) async fn read_local(uri: &str) -> Result<Vec<u8>, TransportError> {
    let path = local_path(uri);
    tokio::fs::read(path).await.map_err(|err| {
        TransportError::new(FailureKind::UnreadableImage, format!("{path}: {err}"))
    })
}
