use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{mpsc, Arc};
use std::time::Duration;

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use veritas_logging::{veritas_debug, veritas_trace, veritas_warn};

use crate::sse::{decode_log_frame, Decoded, SseDecoder};
use crate::{CrewApi, EngineEvent, JobKey, StreamError};

pub trait EventSink: Send + Sync {
    fn emit(&self, event: EngineEvent);
}

pub struct ChannelEventSink {
    tx: mpsc::Sender<EngineEvent>,
}

impl ChannelEventSink {
    pub fn new(tx: mpsc::Sender<EngineEvent>) -> Self {
        Self { tx }
    }
}

impl EventSink for ChannelEventSink {
    fn emit(&self, event: EngineEvent) {
        let _ = self.tx.send(event);
    }
}

/// Live progress stream for one job.
///
/// Frames are forwarded to the sink in transport order as `EngineEvent::Progress`.
/// A transport failure, an unexpected end of stream, or the job timeout elapsing
/// is reported once as `EngineEvent::StreamFailed`, unless `close` ran first.
/// Dropping the channel closes it.
pub struct ProgressChannel {
    key: JobKey,
    token: CancellationToken,
    dropped: Arc<AtomicU64>,
}

impl ProgressChannel {
    pub fn open(
        runtime: &tokio::runtime::Handle,
        api: Arc<dyn CrewApi>,
        key: JobKey,
        job_id: String,
        job_timeout: Duration,
        sink: Arc<dyn EventSink>,
    ) -> Self {
        let token = CancellationToken::new();
        let dropped = Arc::new(AtomicU64::new(0));
        runtime.spawn(pump(
            api,
            key,
            job_id,
            job_timeout,
            sink,
            token.clone(),
            dropped.clone(),
        ));
        Self {
            key,
            token,
            dropped,
        }
    }

    pub fn key(&self) -> JobKey {
        self.key
    }

    /// Stops delivery. Safe to call any number of times, before or after a failure.
    pub fn close(&self) {
        if !self.token.is_cancelled() {
            veritas_debug!("closing progress channel for attempt {}", self.key);
        }
        self.token.cancel();
    }

    pub fn is_closed(&self) -> bool {
        self.token.is_cancelled()
    }

    /// Number of `log` frames discarded because their payload did not decode.
    pub fn dropped_frames(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}

impl Drop for ProgressChannel {
    fn drop(&mut self) {
        self.token.cancel();
    }
}

async fn pump(
    api: Arc<dyn CrewApi>,
    key: JobKey,
    job_id: String,
    job_timeout: Duration,
    sink: Arc<dyn EventSink>,
    token: CancellationToken,
    dropped: Arc<AtomicU64>,
) {
    let failure = tokio::select! {
        _ = token.cancelled() => None,
        _ = tokio::time::sleep(job_timeout) => Some(StreamError::TimedOut(job_timeout)),
        error = forward_frames(api.as_ref(), key, &job_id, sink.as_ref(), &dropped) => Some(error),
    };

    let dropped_count = dropped.load(Ordering::Relaxed);
    if dropped_count > 0 {
        veritas_warn!(
            "attempt {} dropped {} malformed log frame(s)",
            key,
            dropped_count
        );
    }

    match failure {
        Some(error) if !token.is_cancelled() => {
            veritas_warn!("progress stream for attempt {} failed: {}", key, error);
            token.cancel();
            sink.emit(EngineEvent::StreamFailed { key, error });
        }
        _ => veritas_debug!("progress stream for attempt {} finished", key),
    }
}

/// Reads until the stream ends or fails; only returns on failure.
async fn forward_frames(
    api: &dyn CrewApi,
    key: JobKey,
    job_id: &str,
    sink: &dyn EventSink,
    dropped: &AtomicU64,
) -> StreamError {
    let mut stream = match api.open_stream(job_id).await {
        Ok(stream) => stream,
        Err(error) => return error,
    };
    let mut decoder = SseDecoder::new();
    while let Some(chunk) = stream.next().await {
        let chunk = match chunk {
            Ok(chunk) => chunk,
            Err(error) => return error,
        };
        for frame in decoder.push(&chunk) {
            match decode_log_frame(&frame) {
                Decoded::Log(event) => {
                    veritas_trace!("attempt {} frame {}/{}", key, event.source, event.kind);
                    sink.emit(EngineEvent::Progress { key, event });
                }
                Decoded::Ignored => {}
                Decoded::Malformed(reason) => {
                    dropped.fetch_add(1, Ordering::Relaxed);
                    veritas_debug!("attempt {} dropped malformed frame: {}", key, reason);
                }
            }
        }
    }
    StreamError::Closed
}
