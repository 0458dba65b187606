use crate::{JobId, JobKey, RecentAnalysis};

/// Side effects requested by `update`. The runner must execute them in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { key: JobKey, claim: String },
    OpenStream { key: JobKey, job_id: JobId },
    CloseStream { key: JobKey },
    FetchResult { key: JobKey, job_id: JobId },
    StartTicker { key: JobKey },
    StopTicker { key: JobKey },
    SaveHistory(Vec<RecentAnalysis>),
}
