use crate::{FinalResult, InputMode, JobId, JobKey, ProgressEvent, RecentAnalysis};

#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User toggled between text and URL input.
    ModeSelected(InputMode),
    /// User edited the claim input.
    InputChanged(String),
    /// User asked to analyze the current input.
    SubmitClicked,
    /// User asked for a fresh analysis (clears input, cancels a live stream).
    ResetClicked,
    /// Remote service accepted the job.
    SubmitSucceeded { key: JobKey, job_id: JobId },
    /// Submission never produced a job.
    SubmitFailed { key: JobKey, reason: String },
    /// One decoded frame from the progress channel.
    StreamEvent { key: JobKey, event: ProgressEvent },
    /// Transport-level failure of the progress channel.
    StreamFailed { key: JobKey, reason: String },
    /// Final verdict retrieved for a completed job.
    ResultFetched { key: JobKey, result: FinalResult },
    /// Final verdict could not be retrieved.
    ResultFailed { key: JobKey, reason: String },
    /// Cosmetic loader repaint.
    Tick { key: JobKey },
    /// Restore recent analyses from persisted history.
    RestoreHistory(Vec<RecentAnalysis>),
    /// Fallback for placeholder wiring.
    NoOp,
}
