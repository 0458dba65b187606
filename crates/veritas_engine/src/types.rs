use std::collections::BTreeMap;
use std::time::Duration;

use serde::Deserialize;

pub type JobKey = u64;

/// One `log` frame decoded from the progress stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEvent {
    pub source: String,
    pub kind: String,
    pub raw: String,
}

/// Body of `GET /crew/result/{job_id}`.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ResultPayload {
    pub verdict: String,
    pub confidence: f64,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub key_factors: BTreeMap<String, f64>,
    #[serde(default)]
    pub sources_analyzed: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted {
        key: JobKey,
        result: Result<String, SubmissionError>,
    },
    Progress {
        key: JobKey,
        event: LogEvent,
    },
    StreamFailed {
        key: JobKey,
        error: StreamError,
    },
    ResultReady {
        key: JobKey,
        result: Result<ResultPayload, FetchError>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmissionError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("response did not include a job id")]
    MissingJobId,
    #[error("malformed response: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StreamError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("stream closed by server")]
    Closed,
    #[error("no verdict within {0:?}")]
    TimedOut(Duration),
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    #[error("network error: {0}")]
    Transport(String),
    #[error("http status {0}")]
    HttpStatus(u16),
    #[error("malformed result: {0}")]
    Malformed(String),
}
