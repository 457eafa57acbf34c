use std::env;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{bail, Context};
use redact_core::{update, AppState, AppViewModel, Msg, RedactionMethod, RiskSummary};
use redact_engine::{EngineHandle, SecretString};
use redact_logging::{redact_debug, redact_info, redact_warn};

use super::config::{AppConfig, API_KEY_VAR, DEFAULT_CONFIG_FILE};
use super::effects::EffectRunner;

const USAGE: &str = "usage: redact_app [--config FILE] [--method blur|pixelate] [--analyze] IMAGE...";
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const URI_PREVIEW_CHARS: usize = 64;

#[derive(Debug, Clone, PartialEq, Eq)]
struct HostArgs {
    config: PathBuf,
    method: Option<RedactionMethod>,
    analyze: bool,
    images: Vec<String>,
}

fn parse_args(args: impl IntoIterator<Item = String>) -> anyhow::Result<HostArgs> {
    let mut parsed = HostArgs {
        config: PathBuf::from(DEFAULT_CONFIG_FILE),
        method: None,
        analyze: false,
        images: Vec::new(),
    };
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--config" => {
                parsed.config = args.next().map(PathBuf::from).context(USAGE)?;
            }
            "--method" => {
                let name = args.next().context(USAGE)?;
                match RedactionMethod::from_name(&name) {
                    Some(method) => parsed.method = Some(method),
                    None => bail!("unknown method {name:?}\n{USAGE}"),
                }
            }
            "--analyze" => parsed.analyze = true,
            "-h" | "--help" => bail!(USAGE),
            flag if flag.starts_with("--") => bail!("unknown flag {flag:?}\n{USAGE}"),
            _ => parsed.images.push(arg),
        }
    }
    if parsed.images.is_empty() {
        bail!(USAGE);
    }
    Ok(parsed)
}

/// Headless stand-in for the view layer: picks the given images, requests a
/// redaction for each, optionally analyses the first, then reports.
pub fn run(args: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
    let args = parse_args(args)?;
    let config = AppConfig::load(&args.config)?;
    redact_logging::initialize(config.log_destination(), config.log_level());

    let api_key = env::var(API_KEY_VAR).unwrap_or_else(|_| {
        redact_warn!("{} is not set; analysis requests will be rejected", API_KEY_VAR);
        String::new()
    });
    let settings = config.engine_settings(SecretString::new(api_key));
    redact_debug!("Engine settings {:?}", settings);
    let engine = EngineHandle::new(&settings).context("starting engine")?;
    let runner = EffectRunner::new(engine);

    let mut inputs = config.inputs();
    if let Some(method) = args.method {
        inputs.method = method;
    }
    let mut host = Host {
        state: AppState::with_inputs(inputs).with_targets(config.targets()),
        runner,
    };

    host.dispatch(Msg::AssetsPicked(args.images));
    let ids: Vec<_> = host.state.assets().iter().map(|asset| asset.id).collect();
    for id in &ids {
        host.dispatch(Msg::RedactionToggled(*id));
    }
    if args.analyze {
        if let Some(first) = ids.first() {
            host.dispatch(Msg::AssetSelected(*first));
            host.dispatch(Msg::AnalyzeClicked);
        }
    }

    let settled = host.pump_until_settled(config.settle_timeout());
    print_report(&host.state.view());
    settled
}

struct Host {
    state: AppState,
    runner: EffectRunner,
}

impl Host {
    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        if self.state.consume_dirty() {
            redact_debug!("State changed; pending={}", !self.state.is_settled());
        }
        self.runner.enqueue(effects);
    }

    /// Feeds engine completions back through `update` until nothing is
    /// pending, the engine stops, or `limit` elapses.
    fn pump_until_settled(&mut self, limit: Option<Duration>) -> anyhow::Result<()> {
        let deadline = limit.map(|limit| Instant::now() + limit);
        while !self.state.is_settled() {
            if deadline.is_some_and(|deadline| Instant::now() >= deadline) {
                bail!("requests still pending after {:?}", limit.unwrap_or_default());
            }
            match self.runner.next_msg(POLL_INTERVAL).context("waiting for engine")? {
                Some(msg) => self.dispatch(msg),
                None => redact_debug!("Waiting for backend responses"),
            }
        }
        redact_info!("All requests settled");
        Ok(())
    }
}

fn print_report(view: &AppViewModel) {
    for row in &view.assets {
        println!(
            "#{} {} -> {:?} {}",
            row.asset_id,
            row.uri,
            row.phase,
            preview(&row.displayed_uri)
        );
    }
    if let Some(latest) = &view.estimate {
        let (lat, lon) = latest.estimate.coordinates;
        match latest.estimate.top_confidence() {
            Some(confidence) => println!(
                "Predicted location (asset #{}): lat {lat}, lon {lon}, geo-risk {confidence}",
                latest.asset_id
            ),
            None => println!(
                "Predicted location (asset #{}): lat {lat}, lon {lon}",
                latest.asset_id
            ),
        }
    }
    if let Some(selected) = &view.selected {
        match &selected.risk_summary {
            RiskSummary::Available(text) | RiskSummary::Failed(text) => {
                println!("Risk summary (asset #{}):\n{text}", selected.asset_id)
            }
            RiskSummary::Absent | RiskSummary::Pending => {}
        }
    }
}

/// Redacted URIs are usually inline data URIs; only show their head.
fn preview(uri: &str) -> String {
    match uri.char_indices().nth(URI_PREVIEW_CHARS) {
        Some((end, _)) => format!("{}...", &uri[..end]),
        None => uri.to_string(),
    }
}
