use std::collections::VecDeque;
use std::fmt;

use veritas_logging::{veritas_debug, veritas_info};

use crate::{Effect, FinalResult, JobError, Verdict, DEFAULT_MIN_TEXT_LEN};

/// Locally allocated identifier for one submission attempt.
pub type JobKey = u64;

const HISTORY_TITLE_CHARS: usize = 48;

/// Opaque identifier issued by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputMode {
    #[default]
    Text,
    Url,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalysisRequest {
    pub mode: InputMode,
    pub content: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Submitted,
    Streaming,
    Completed,
    Failed,
    Errored,
    Cancelled,
}

impl JobStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::Completed | JobStatus::Failed | JobStatus::Errored | JobStatus::Cancelled
        )
    }
}

/// One decoded `log` frame from the progress channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgressEvent {
    pub source: String,
    pub kind: String,
    /// Undecoded frame payload, kept for diagnostics.
    pub raw: String,
}

impl ProgressEvent {
    pub fn new(source: impl Into<String>, kind: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            kind: kind.into(),
            raw: String::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyLevel {
    Info,
    Success,
    Warning,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub level: NotifyLevel,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentAnalysis {
    pub title: String,
    pub verdict: Verdict,
    pub confidence: u8,
    pub job_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoreSettings {
    pub min_text_len: usize,
    pub history_limit: usize,
}

impl Default for CoreSettings {
    fn default() -> Self {
        Self {
            min_text_len: DEFAULT_MIN_TEXT_LEN,
            history_limit: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Job {
    pub(crate) key: JobKey,
    pub(crate) id: JobId,
    pub(crate) request: AnalysisRequest,
    pub(crate) status: JobStatus,
}

impl Job {
    /// Moves the job into `status` unless it already reached a terminal status.
    /// Returns the teardown effects for the first terminal transition only.
    fn try_finish(&mut self, status: JobStatus) -> Option<Vec<Effect>> {
        debug_assert!(status.is_terminal());
        if self.status.is_terminal() {
            veritas_debug!(
                "job {} already {:?}; ignoring transition to {:?}",
                self.id,
                self.status,
                status
            );
            return None;
        }
        let was_streaming = self.status == JobStatus::Streaming;
        self.status = status;
        veritas_info!("job {} -> {:?}", self.id, status);
        let mut effects = Vec::with_capacity(2);
        if was_streaming {
            effects.push(Effect::CloseStream { key: self.key });
            effects.push(Effect::StopTicker { key: self.key });
        }
        Some(effects)
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub(crate) enum Lifecycle {
    #[default]
    Idle,
    Submitting {
        key: JobKey,
        request: AnalysisRequest,
    },
    Active(Job),
}

/// Owns the single live job of one client and everything the view needs.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppState {
    pub(crate) settings: CoreSettings,
    pub(crate) mode: InputMode,
    pub(crate) input: String,
    last_key: JobKey,
    pub(crate) lifecycle: Lifecycle,
    pub(crate) caption: Option<&'static str>,
    pub(crate) spinner: usize,
    pub(crate) fetching: bool,
    pub(crate) result: Option<FinalResult>,
    pub(crate) last_error: Option<JobError>,
    notifications: Vec<Notification>,
    pub(crate) history: VecDeque<RecentAnalysis>,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: CoreSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn settings(&self) -> &CoreSettings {
        &self.settings
    }

    /// Key of the attempt currently owned by the controller, if any.
    pub fn current_key(&self) -> Option<JobKey> {
        match &self.lifecycle {
            Lifecycle::Idle => None,
            Lifecycle::Submitting { key, .. } => Some(*key),
            Lifecycle::Active(job) => Some(job.key),
        }
    }

    pub fn job_status(&self) -> Option<JobStatus> {
        match &self.lifecycle {
            Lifecycle::Active(job) => Some(job.status),
            _ => None,
        }
    }

    pub fn history_snapshot(&self) -> Vec<RecentAnalysis> {
        self.history.iter().cloned().collect()
    }

    /// Returns whether a repaint is pending and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Drains queued notifications; each is handed out exactly once.
    pub fn take_notifications(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.notifications)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn notify(&mut self, level: NotifyLevel, message: impl Into<String>) {
        self.notifications.push(Notification {
            level,
            message: message.into(),
        });
        self.mark_dirty();
    }

    pub(crate) fn allocate_key(&mut self) -> JobKey {
        self.last_key += 1;
        self.last_key
    }

    pub(crate) fn active_job_mut(&mut self, key: JobKey) -> Option<&mut Job> {
        match &mut self.lifecycle {
            Lifecycle::Active(job) if job.key == key => Some(job),
            _ => None,
        }
    }

    pub(crate) fn is_streaming(&self, key: JobKey) -> bool {
        matches!(&self.lifecycle, Lifecycle::Active(job) if job.key == key && job.status == JobStatus::Streaming)
    }

    /// Guarded terminal transition for the job identified by `key`.
    pub(crate) fn finish_job(&mut self, key: JobKey, status: JobStatus) -> Option<Vec<Effect>> {
        let effects = self.active_job_mut(key)?.try_finish(status)?;
        self.caption = None;
        self.spinner = 0;
        self.mark_dirty();
        Some(effects)
    }

    /// Cancels the live stream, if there is one, returning its teardown effects.
    pub(crate) fn cancel_streaming(&mut self) -> Vec<Effect> {
        let key = match &self.lifecycle {
            Lifecycle::Active(job) if job.status == JobStatus::Streaming => job.key,
            _ => return Vec::new(),
        };
        self.finish_job(key, JobStatus::Cancelled)
            .unwrap_or_default()
    }

    pub(crate) fn record_history(&mut self, job_id: &JobId, request: &AnalysisRequest, result: &FinalResult) {
        let entry = RecentAnalysis {
            title: history_title(request),
            verdict: result.verdict(),
            confidence: result.confidence().round() as u8,
            job_id: job_id.to_string(),
        };
        self.history.push_front(entry);
        self.history.truncate(self.settings.history_limit);
    }

    pub(crate) fn restore_history(&mut self, entries: Vec<RecentAnalysis>) {
        self.history = entries.into_iter().take(self.settings.history_limit).collect();
        self.mark_dirty();
    }
}

fn history_title(request: &AnalysisRequest) -> String {
    if request.mode == InputMode::Url {
        if let Ok(parsed) = url::Url::parse(&request.content) {
            if let Some(host) = parsed.host_str() {
                return host.to_string();
            }
        }
    }
    let mut title: String = request.content.chars().take(HISTORY_TITLE_CHARS).collect();
    if request.content.chars().count() > HISTORY_TITLE_CHARS {
        title.push_str("...");
    }
    title
}
