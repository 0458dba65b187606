//! Veritas core: pure job lifecycle state machine and view-model helpers.
mod effect;
mod error;
mod msg;
mod result;
mod stage;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use error::JobError;
pub use msg::Msg;
pub use result::{FactorTone, FinalResult, Verdict};
pub use stage::{classify, map_stage, StageSignal, GENERIC_CAPTION, VERDICT_STAGE};
pub use state::{
    AnalysisRequest, AppState, CoreSettings, InputMode, JobId, JobKey, JobStatus, Notification,
    NotifyLevel, ProgressEvent, RecentAnalysis,
};
pub use update::update;
pub use validate::{validate, ValidationError, DEFAULT_MIN_TEXT_LEN};
pub use view_model::{AppViewModel, FactorTag, InputGauge, Phase, ResultView, SourceLink};
