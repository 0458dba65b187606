use std::collections::HashMap;
use std::io;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use veritas_logging::{veritas_debug, veritas_info};

use crate::channel::{ChannelEventSink, EventSink, ProgressChannel};
use crate::client::{ClientSettings, CrewApi, ReqwestCrewClient};
use crate::{EngineEvent, JobKey};

enum EngineCommand {
    Submit { key: JobKey, claim: String },
    OpenStream { key: JobKey, job_id: String },
    CloseStream { key: JobKey },
    FetchResult { key: JobKey, job_id: String },
}

/// Executes crew requests on a background runtime.
///
/// Commands run in the order they are sent, so a `close_stream` followed by a
/// `submit` tears the old channel down before the new request leaves.
#[derive(Clone)]
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
}

impl EngineHandle {
    pub fn spawn(settings: ClientSettings) -> io::Result<(Self, mpsc::Receiver<EngineEvent>)> {
        let job_timeout = settings.job_timeout;
        let api: Arc<dyn CrewApi> = Arc::new(ReqwestCrewClient::new(settings));
        Self::spawn_with(api, job_timeout)
    }

    pub fn spawn_with(
        api: Arc<dyn CrewApi>,
        job_timeout: Duration,
    ) -> io::Result<(Self, mpsc::Receiver<EngineEvent>)> {
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let runtime = tokio::runtime::Runtime::new()?;

        thread::Builder::new()
            .name("veritas-engine".to_string())
            .spawn(move || {
                let mut channels: HashMap<JobKey, ProgressChannel> = HashMap::new();
                while let Ok(command) = cmd_rx.recv() {
                    handle_command(
                        runtime.handle(),
                        &api,
                        &sink,
                        &mut channels,
                        job_timeout,
                        command,
                    );
                }
                for channel in channels.values() {
                    channel.close();
                }
                veritas_debug!("engine command loop finished");
            })?;

        Ok((Self { cmd_tx }, event_rx))
    }

    pub fn submit(&self, key: JobKey, claim: impl Into<String>) {
        self.send(EngineCommand::Submit {
            key,
            claim: claim.into(),
        });
    }

    pub fn open_stream(&self, key: JobKey, job_id: impl Into<String>) {
        self.send(EngineCommand::OpenStream {
            key,
            job_id: job_id.into(),
        });
    }

    pub fn close_stream(&self, key: JobKey) {
        self.send(EngineCommand::CloseStream { key });
    }

    pub fn fetch_result(&self, key: JobKey, job_id: impl Into<String>) {
        self.send(EngineCommand::FetchResult {
            key,
            job_id: job_id.into(),
        });
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

fn handle_command(
    runtime: &tokio::runtime::Handle,
    api: &Arc<dyn CrewApi>,
    sink: &Arc<dyn EventSink>,
    channels: &mut HashMap<JobKey, ProgressChannel>,
    job_timeout: Duration,
    command: EngineCommand,
) {
    match command {
        EngineCommand::Submit { key, claim } => {
            let api = api.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = api.start(&claim).await;
                if let Ok(job_id) = &result {
                    veritas_info!("attempt {} started remote job {}", key, job_id);
                }
                sink.emit(EngineEvent::Submitted { key, result });
            });
        }
        EngineCommand::OpenStream { key, job_id } => {
            let channel =
                ProgressChannel::open(runtime, api.clone(), key, job_id, job_timeout, sink.clone());
            if let Some(previous) = channels.insert(key, channel) {
                previous.close();
            }
        }
        EngineCommand::CloseStream { key } => {
            if let Some(channel) = channels.remove(&key) {
                channel.close();
            }
        }
        EngineCommand::FetchResult { key, job_id } => {
            let api = api.clone();
            let sink = sink.clone();
            runtime.spawn(async move {
                let result = api.result(&job_id).await;
                sink.emit(EngineEvent::ResultReady { key, result });
            });
        }
    }
}
