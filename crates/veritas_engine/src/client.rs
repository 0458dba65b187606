use std::time::Duration;

use bytes::Bytes;
use futures_util::stream::BoxStream;
use futures_util::StreamExt;
use reqwest::header::{ACCEPT, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use url::Url;
use veritas_logging::{veritas_debug, veritas_warn};

use crate::{FetchError, ResultPayload, StreamError, SubmissionError};

/// Raw body chunks of the progress stream.
pub type ByteStream = BoxStream<'static, Result<Bytes, StreamError>>;

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    /// Applies to submission and result requests; the progress stream is bounded by `job_timeout`.
    pub request_timeout: Duration,
    pub job_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            job_timeout: Duration::from_secs(300),
        }
    }
}

/// The three endpoints of the remote analysis crew.
#[async_trait::async_trait]
pub trait CrewApi: Send + Sync {
    async fn start(&self, claim: &str) -> Result<String, SubmissionError>;

    async fn open_stream(&self, job_id: &str) -> Result<ByteStream, StreamError>;

    async fn result(&self, job_id: &str) -> Result<ResultPayload, FetchError>;
}

#[derive(Serialize)]
struct StartRequest<'a> {
    claim: &'a str,
}

#[derive(Deserialize)]
struct StartResponse {
    job_id: Option<serde_json::Value>,
}

#[derive(Debug, Clone)]
pub struct ReqwestCrewClient {
    settings: ClientSettings,
}

impl ReqwestCrewClient {
    pub fn new(settings: ClientSettings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    fn build_client(&self, timeout: Option<Duration>) -> Result<reqwest::Client, String> {
        let mut builder = reqwest::Client::builder().connect_timeout(self.settings.connect_timeout);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        builder.build().map_err(|err| err.to_string())
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, String> {
        let mut url = Url::parse(&self.settings.base_url).map_err(|err| err.to_string())?;
        url.path_segments_mut()
            .map_err(|_| format!("base url {} cannot carry a path", self.settings.base_url))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

#[async_trait::async_trait]
impl CrewApi for ReqwestCrewClient {
    async fn start(&self, claim: &str) -> Result<String, SubmissionError> {
        let url = self
            .endpoint(&["crew", "start"])
            .map_err(SubmissionError::Transport)?;
        let client = self
            .build_client(Some(self.settings.request_timeout))
            .map_err(SubmissionError::Transport)?;
        let body = serde_json::to_vec(&StartRequest { claim })
            .map_err(|err| SubmissionError::Malformed(err.to_string()))?;

        veritas_debug!("POST {} ({} bytes)", url, body.len());
        let response = client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SubmissionError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| SubmissionError::Transport(err.to_string()))?;
        let parsed: StartResponse = serde_json::from_slice(&bytes)
            .map_err(|err| SubmissionError::Malformed(err.to_string()))?;

        match parsed.job_id {
            Some(serde_json::Value::String(id)) if !id.trim().is_empty() => Ok(id),
            Some(serde_json::Value::Number(id)) => Ok(id.to_string()),
            _ => Err(SubmissionError::MissingJobId),
        }
    }

    async fn open_stream(&self, job_id: &str) -> Result<ByteStream, StreamError> {
        let url = self
            .endpoint(&["crew", "stream", job_id])
            .map_err(StreamError::Transport)?;
        let client = self.build_client(None).map_err(StreamError::Transport)?;

        veritas_debug!("GET {} (event stream)", url);
        let response = client
            .get(url)
            .header(ACCEPT, "text/event-stream")
            .send()
            .await
            .map_err(|err| StreamError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(StreamError::HttpStatus(status.as_u16()));
        }

        Ok(response
            .bytes_stream()
            .map(|chunk| chunk.map_err(|err| StreamError::Transport(err.to_string())))
            .boxed())
    }

    async fn result(&self, job_id: &str) -> Result<ResultPayload, FetchError> {
        let url = self
            .endpoint(&["crew", "result", job_id])
            .map_err(FetchError::Transport)?;
        let client = self
            .build_client(Some(self.settings.request_timeout))
            .map_err(FetchError::Transport)?;

        veritas_debug!("GET {}", url);
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        serde_json::from_slice(&bytes).map_err(|err| {
            veritas_warn!("result for {} did not parse: {}", job_id, err);
            FetchError::Malformed(err.to_string())
        })
    }
}
