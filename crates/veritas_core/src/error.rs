use crate::ValidationError;

/// Every way an analysis attempt can end short of a rendered verdict.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum JobError {
    #[error("input rejected: {0}")]
    Validation(ValidationError),
    #[error("could not start the analysis: {0}")]
    Submission(String),
    #[error("lost connection to the analysis stream: {0}")]
    StreamTransport(String),
    #[error("the analysis pipeline reported a failure")]
    AnalysisFailed,
    #[error("analysis finished but the result could not be retrieved: {0}")]
    Fetch(String),
}
