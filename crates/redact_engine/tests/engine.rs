use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Once};
use std::time::Duration;

use redact_core::{normalize, GeoRiskEstimate, RedactionMethod, TargetSelection};
use redact_engine::{
    EngineEvent, EngineHandle, FailureKind, RedactionBackend, RedactionOutcome, RedactionRequest,
    RiskAnalyzer, TransportError,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(redact_logging::initialize_for_tests);
}

/// Redacts everything except URIs containing "fail" or "panic"; slow for URIs containing "slow".
#[derive(Default)]
struct FakeRedactor {
    calls: AtomicUsize,
}

#[async_trait::async_trait]
impl RedactionBackend for FakeRedactor {
    async fn redact(&self, request: RedactionRequest) -> Result<RedactionOutcome, TransportError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if request.image_uri.contains("slow") {
            tokio::time::sleep(Duration::from_millis(200)).await;
        }
        if request.image_uri.contains("panic") {
            panic!("backend bug");
        }
        if request.image_uri.contains("fail") {
            return Err(TransportError {
                kind: FailureKind::Network,
                message: "connection refused".to_string(),
            });
        }
        Ok(RedactionOutcome {
            redacted_uri: format!("redacted:{}", request.image_uri),
            estimate: GeoRiskEstimate::new(1.29, 103.85, vec![0.7]),
        })
    }
}

struct FixedAnalyzer(Option<String>);

#[async_trait::async_trait]
impl RiskAnalyzer for FixedAnalyzer {
    async fn analyze(&self, _image_uri: &str) -> Result<Option<String>, TransportError> {
        Ok(self.0.clone())
    }
}

fn request(uri: &str) -> RedactionRequest {
    let params = normalize(RedactionMethod::Blur, "151", "0.06");
    RedactionRequest::build(uri, &params, &TargetSelection::default())
}

fn collect(engine: &EngineHandle, count: usize) -> Vec<EngineEvent> {
    (0..count)
        .map(|_| {
            match engine.recv_timeout(Duration::from_secs(5)) {
                Ok(Some(event)) => event,
                other => panic!("expected engine event, got {other:?}"),
            }
        })
        .collect()
}

#[test]
fn redaction_results_carry_asset_and_generation() {
    init_logging();
    let redactor = Arc::new(FakeRedactor::default());
    let engine = match EngineHandle::with_backends(redactor.clone(), Arc::new(FixedAnalyzer(None))) {
        Ok(engine) => engine,
        Err(err) => panic!("engine start: {err}"),
    };

    engine.submit_redaction(1, 1, request("a.jpg"));
    engine.submit_redaction(2, 4, request("fail.jpg"));
    let mut events = collect(&engine, 2);
    events.sort_by_key(|event| match event {
        EngineEvent::RedactionCompleted { asset_id, .. } => *asset_id,
        EngineEvent::AnalysisCompleted { .. } => u64::MAX,
    });

    match &events[0] {
        EngineEvent::RedactionCompleted {
            asset_id: 1,
            generation: 1,
            result: Ok(outcome),
        } => assert_eq!(outcome.redacted_uri, "redacted:a.jpg"),
        other => panic!("unexpected event {other:?}"),
    }
    match &events[1] {
        EngineEvent::RedactionCompleted {
            asset_id: 2,
            generation: 4,
            result: Err(err),
        } => assert_eq!(err.message, "connection refused"),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(redactor.calls.load(Ordering::SeqCst), 2);
}

#[test]
fn faster_requests_complete_first() {
    init_logging();
    let engine = match EngineHandle::with_backends(
        Arc::new(FakeRedactor::default()),
        Arc::new(FixedAnalyzer(None)),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("engine start: {err}"),
    };

    engine.submit_redaction(1, 1, request("slow.jpg"));
    engine.submit_redaction(2, 1, request("quick.jpg"));
    let order: Vec<u64> = collect(&engine, 2)
        .into_iter()
        .filter_map(|event| match event {
            EngineEvent::RedactionCompleted { asset_id, .. } => Some(asset_id),
            EngineEvent::AnalysisCompleted { .. } => None,
        })
        .collect();
    assert_eq!(order, vec![2, 1]);
}

#[test]
fn analysis_result_is_reported_with_ticket() {
    init_logging();
    let engine = match EngineHandle::with_backends(
        Arc::new(FakeRedactor::default()),
        Arc::new(FixedAnalyzer(Some("X".to_string()))),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("engine start: {err}"),
    };

    engine.submit_analysis(3, "a.jpg");
    assert_eq!(
        collect(&engine, 1),
        vec![EngineEvent::AnalysisCompleted {
            ticket: 3,
            result: Ok(Some("X".to_string())),
        }]
    );
    assert!(engine.try_recv().is_none());
}

#[test]
fn panicking_backend_reports_an_aborted_failure() {
    init_logging();
    let engine = match EngineHandle::with_backends(
        Arc::new(FakeRedactor::default()),
        Arc::new(FixedAnalyzer(None)),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("engine start: {err}"),
    };

    engine.submit_redaction(5, 2, request("panic.jpg"));
    match collect(&engine, 1).pop() {
        Some(EngineEvent::RedactionCompleted {
            asset_id: 5,
            generation: 2,
            result: Err(err),
        }) => assert_eq!(err.kind, FailureKind::Aborted),
        other => panic!("unexpected event {other:?}"),
    }

    engine.submit_redaction(6, 1, request("a.jpg"));
    assert!(matches!(
        collect(&engine, 1).pop(),
        Some(EngineEvent::RedactionCompleted { asset_id: 6, result: Ok(_), .. })
    ));
}

#[test]
fn quiet_engine_times_out_without_an_event() {
    init_logging();
    let engine = match EngineHandle::with_backends(
        Arc::new(FakeRedactor::default()),
        Arc::new(FixedAnalyzer(None)),
    ) {
        Ok(engine) => engine,
        Err(err) => panic!("engine start: {err}"),
    };
    assert!(matches!(engine.recv_timeout(Duration::from_millis(20)), Ok(None)));
}
