use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;

use veritas_core::{Effect, FinalResult, JobId, Msg, ProgressEvent, Verdict};
use veritas_engine::{EngineEvent, EngineHandle, ResultPayload};
use veritas_logging::{veritas_error, veritas_info};

use super::config::AppConfig;
use super::history::save_history;
use super::ticker::Ticker;

/// Executes controller effects against the engine, the ticker and the history file.
pub struct EffectRunner {
    engine: EngineHandle,
    ticker: Ticker,
    data_dir: PathBuf,
}

impl EffectRunner {
    pub fn new(config: &AppConfig, msg_tx: mpsc::Sender<Msg>) -> anyhow::Result<Self> {
        let (engine, events) = EngineHandle::spawn(config.client_settings())?;
        let forward_tx = msg_tx.clone();
        thread::Builder::new()
            .name("veritas-events".to_string())
            .spawn(move || {
                for event in events {
                    if forward_tx.send(map_event(event)).is_err() {
                        break;
                    }
                }
            })?;

        Ok(Self {
            engine,
            ticker: Ticker::new(config.tick_interval(), msg_tx),
            data_dir: config.data_dir.clone(),
        })
    }

    pub fn enqueue(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { key, claim } => {
                    veritas_info!("SubmitJob key={} claim_len={}", key, claim.len());
                    self.engine.submit(key, claim);
                }
                Effect::OpenStream { key, job_id } => {
                    self.engine.open_stream(key, job_id.as_str());
                }
                Effect::CloseStream { key } => self.engine.close_stream(key),
                Effect::FetchResult { key, job_id } => {
                    self.engine.fetch_result(key, job_id.as_str());
                }
                Effect::StartTicker { key } => self.ticker.start(key),
                Effect::StopTicker { key } => self.ticker.stop(key),
                Effect::SaveHistory(entries) => {
                    if let Err(err) = save_history(&self.data_dir, &entries) {
                        veritas_error!("Failed to save history to {:?}: {}", self.data_dir, err);
                    }
                }
            }
        }
    }
}

pub(crate) fn map_event(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::Submitted { key, result } => match result {
            Ok(job_id) => Msg::SubmitSucceeded {
                key,
                job_id: JobId::new(job_id),
            },
            Err(err) => Msg::SubmitFailed {
                key,
                reason: err.to_string(),
            },
        },
        EngineEvent::Progress { key, event } => Msg::StreamEvent {
            key,
            event: ProgressEvent {
                source: event.source,
                kind: event.kind,
                raw: event.raw,
            },
        },
        EngineEvent::StreamFailed { key, error } => Msg::StreamFailed {
            key,
            reason: error.to_string(),
        },
        EngineEvent::ResultReady { key, result } => match result {
            Ok(payload) => Msg::ResultFetched {
                key,
                result: map_result(payload),
            },
            Err(err) => Msg::ResultFailed {
                key,
                reason: err.to_string(),
            },
        },
    }
}

fn map_result(payload: ResultPayload) -> FinalResult {
    FinalResult::new(
        Verdict::parse(&payload.verdict),
        payload.confidence,
        payload.reasoning,
        payload.key_factors,
        payload.sources_analyzed,
    )
}
