use std::time::Duration;

use redact_core::{AnalysisResultKind, Effect, Msg, RedactionFailed, RedactionResult};
use redact_engine::{EngineError, EngineEvent, EngineHandle, RedactionRequest};
use redact_logging::{redact_info, redact_warn};

/// Hands core effects to the engine and turns engine events back into messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitRedaction {
                    asset_id,
                    generation,
                    uri,
                    parameters,
                    selection,
                } => {
                    redact_info!(
                        "SubmitRedaction asset_id={} generation={} method={} blur_ksize={}",
                        asset_id,
                        generation,
                        parameters.method,
                        parameters.blur_kernel_size
                    );
                    let request = RedactionRequest::build(uri, &parameters, &selection);
                    self.engine.submit_redaction(asset_id, generation, request);
                }
                Effect::SubmitAnalysis {
                    ticket,
                    asset_id,
                    uri,
                } => {
                    redact_info!("SubmitAnalysis ticket={} asset_id={}", ticket, asset_id);
                    self.engine.submit_analysis(ticket, uri);
                }
            }
        }
    }

    /// Waits up to `timeout` for the next engine completion.
    pub fn next_msg(&self, timeout: Duration) -> Result<Option<Msg>, EngineError> {
        Ok(self.engine.recv_timeout(timeout)?.map(map_event))
    }
}

fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::RedactionCompleted {
            asset_id,
            generation,
            result,
        } => Msg::RedactionCompleted {
            asset_id,
            generation,
            result: match result {
                Ok(outcome) => Ok(RedactionResult {
                    redacted_uri: outcome.redacted_uri,
                    estimate: outcome.estimate,
                }),
                Err(err) => {
                    redact_warn!("Redaction of asset {} failed: {}", asset_id, err);
                    Err(RedactionFailed)
                }
            },
        },
        EngineEvent::AnalysisCompleted { ticket, result } => Msg::AnalysisCompleted {
            ticket,
            result: match result {
                Ok(Some(text)) => AnalysisResultKind::Summary(text),
                Ok(None) => AnalysisResultKind::NoFindings,
                Err(err) => {
                    redact_warn!("Analysis {} failed: {}", ticket, err);
                    AnalysisResultKind::Failed
                }
            },
        },
    }
}
