use std::panic::AssertUnwindSafe;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use futures_util::FutureExt;
use redact_core::AssetId;
use redact_logging::{redact_debug, redact_error, redact_warn};

use crate::analysis::{ReqwestRiskAnalyzer, RiskAnalyzer};
use crate::redaction::{RedactionBackend, ReqwestRedactionBackend};
use crate::request::RedactionRequest;
use crate::{EngineEvent, EngineSettings, FailureKind, TransportError};

#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("failed to start async runtime: {0}")]
    Runtime(#[from] std::io::Error),
    #[error("failed to configure backend client: {0}")]
    Client(#[from] TransportError),
    #[error("engine thread has stopped")]
    Disconnected,
}

enum EngineCommand {
    Redact {
        asset_id: AssetId,
        generation: u64,
        request: RedactionRequest,
    },
    Analyze {
        ticket: u64,
        image_uri: String,
    },
}

/// Runs backend calls on a background tokio runtime. Commands go in through
/// [`EngineHandle::submit_redaction`] and [`EngineHandle::submit_analysis`];
/// completions come back as [`EngineEvent`]s in completion order.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: &EngineSettings) -> Result<Self, EngineError> {
        let redactor = Arc::new(ReqwestRedactionBackend::new(settings)?);
        let analyzer = Arc::new(ReqwestRiskAnalyzer::new(settings)?);
        Self::with_backends(redactor, analyzer)
    }

    pub fn with_backends(
        redactor: Arc<dyn RedactionBackend>,
        analyzer: Arc<dyn RiskAnalyzer>,
    ) -> Result<Self, EngineError> {
        let (cmd_tx, cmd_rx) = mpsc::channel::<EngineCommand>();
        let (event_tx, event_rx) = mpsc::channel();
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()?;

        thread::spawn(move || {
            while let Ok(command) = cmd_rx.recv() {
                let redactor = redactor.clone();
                let analyzer = analyzer.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let aborted = command.aborted_event();
                    let event = AssertUnwindSafe(handle_command(
                        redactor.as_ref(),
                        analyzer.as_ref(),
                        command,
                    ))
                    .catch_unwind()
                    .await
                    .unwrap_or_else(|_| {
                        redact_error!("Engine task panicked; reporting failure");
                        aborted
                    });
                    let _ = event_tx.send(event);
                });
            }
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit_redaction(&self, asset_id: AssetId, generation: u64, request: RedactionRequest) {
        let _ = self.cmd_tx.send(EngineCommand::Redact {
            asset_id,
            generation,
            request,
        });
    }

    pub fn submit_analysis(&self, ticket: u64, image_uri: impl Into<String>) {
        let _ = self.cmd_tx.send(EngineCommand::Analyze {
            ticket,
            image_uri: image_uri.into(),
        });
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    /// `Ok(None)` when nothing arrived within `timeout`.
    pub fn recv_timeout(&self, timeout: Duration) -> Result<Option<EngineEvent>, EngineError> {
        match self.event_rx.recv_timeout(timeout) {
            Ok(event) => Ok(Some(event)),
            Err(mpsc::RecvTimeoutError::Timeout) => Ok(None),
            Err(mpsc::RecvTimeoutError::Disconnected) => Err(EngineError::Disconnected),
        }
    }
}

impl EngineCommand {
    /// Completion reported when the request task dies before producing one.
    fn aborted_event(&self) -> EngineEvent {
        let error = TransportError::new(FailureKind::Aborted, "request task panicked");
        match self {
            EngineCommand::Redact {
                asset_id,
                generation,
                ..
            } => EngineEvent::RedactionCompleted {
                asset_id: *asset_id,
                generation: *generation,
                result: Err(error),
            },
            EngineCommand::Analyze { ticket, .. } => EngineEvent::AnalysisCompleted {
                ticket: *ticket,
                result: Err(error),
            },
        }
    }
}

async fn handle_command(
    redactor: &dyn RedactionBackend,
    analyzer: &dyn RiskAnalyzer,
    command: EngineCommand,
) -> EngineEvent {
    match command {
        EngineCommand::Redact {
            asset_id,
            generation,
            request,
        } => {
            redact_debug!("Redaction started asset_id={} generation={}", asset_id, generation);
            let result = redactor.redact(request).await;
            if let Err(err) = &result {
                redact_warn!("Redaction failed asset_id={}: {}", asset_id, err);
            }
            EngineEvent::RedactionCompleted {
                asset_id,
                generation,
                result,
            }
        }
        EngineCommand::Analyze { ticket, image_uri } => {
            redact_debug!("Analysis started ticket={}", ticket);
            let result = analyzer.analyze(&image_uri).await;
            if let Err(err) = &result {
                redact_warn!("Analysis failed ticket={}: {}", ticket, err);
            }
            EngineEvent::AnalysisCompleted { ticket, result }
        }
    }
}
