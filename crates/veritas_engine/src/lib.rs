//! Veritas engine: HTTP access to the analysis crew and command execution.
mod channel;
mod client;
mod engine;
mod sse;
mod types;

pub use channel::{ChannelEventSink, EventSink, ProgressChannel};
pub use client::{ByteStream, ClientSettings, CrewApi, ReqwestCrewClient};
pub use engine::EngineHandle;
pub use sse::{decode_log_frame, Decoded, SseDecoder, SseFrame};
pub use types::{
    EngineEvent, FetchError, JobKey, LogEvent, ResultPayload, StreamError, SubmissionError,
};
