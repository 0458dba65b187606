use crate::state::Lifecycle;
use crate::{
    AppState, FactorTone, FinalResult, InputMode, JobStatus, RecentAnalysis, Verdict,
};

const SPINNER_FRAMES: [&str; 4] = ["|", "/", "-", "\\"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Submitting,
    Streaming,
    FetchingResult,
    Completed,
    /// The analysis finished but its verdict could not be retrieved.
    ResultUnavailable,
    Failed,
    Errored,
    Cancelled,
}

impl Phase {
    /// Whether some request or stream for this attempt is still outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(
            self,
            Phase::Submitting | Phase::Streaming | Phase::FetchingResult
        )
    }
}

/// Character-count gauge shown next to the text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputGauge {
    #[default]
    Short,
    Fair,
    Good,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct AppViewModel {
    pub mode: InputMode,
    pub input_chars: usize,
    pub gauge: InputGauge,
    pub phase: Phase,
    pub job_id: Option<String>,
    pub caption: Option<String>,
    pub spinner: &'static str,
    pub can_submit: bool,
    pub result: Option<ResultView>,
    pub error: Option<String>,
    pub recent: Vec<RecentAnalysis>,
}

impl AppViewModel {
    /// True when nothing is outstanding and the last attempt (if any) has settled.
    pub fn is_settled(&self) -> bool {
        !self.phase.is_in_flight()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ResultView {
    pub verdict: Verdict,
    pub confidence_label: String,
    pub reasoning: String,
    pub factors: Vec<FactorTag>,
    pub sources: Vec<SourceLink>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FactorTag {
    pub name: String,
    pub label: String,
    pub weight: f64,
    pub tone: FactorTone,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLink {
    pub category: String,
    pub url: String,
}

impl AppState {
    pub fn view(&self) -> AppViewModel {
        let input_chars = self.input.trim().chars().count();
        let min = self.settings.min_text_len;
        let gauge = if input_chars < min {
            InputGauge::Short
        } else if input_chars < min.saturating_mul(2) {
            InputGauge::Fair
        } else {
            InputGauge::Good
        };

        let (phase, job_id) = match &self.lifecycle {
            Lifecycle::Idle => (Phase::Idle, None),
            Lifecycle::Submitting { .. } => (Phase::Submitting, None),
            Lifecycle::Active(job) => {
                let phase = match job.status {
                    JobStatus::Submitted | JobStatus::Streaming => Phase::Streaming,
                    JobStatus::Completed if self.fetching => Phase::FetchingResult,
                    JobStatus::Completed if self.result.is_some() => Phase::Completed,
                    JobStatus::Completed => Phase::ResultUnavailable,
                    JobStatus::Failed => Phase::Failed,
                    JobStatus::Errored => Phase::Errored,
                    JobStatus::Cancelled => Phase::Cancelled,
                };
                (phase, Some(job.id.to_string()))
            }
        };

        let spinner = if phase == Phase::Streaming {
            SPINNER_FRAMES[self.spinner % SPINNER_FRAMES.len()]
        } else {
            ""
        };

        AppViewModel {
            mode: self.mode,
            input_chars,
            gauge,
            phase,
            job_id,
            caption: self.caption.map(ToOwned::to_owned),
            spinner,
            can_submit: !matches!(phase, Phase::Submitting | Phase::FetchingResult),
            result: self.result.as_ref().map(result_view),
            error: self.last_error.as_ref().map(ToString::to_string),
            recent: self.history_snapshot(),
        }
    }
}

fn result_view(result: &FinalResult) -> ResultView {
    let factors = result
        .key_factors()
        .iter()
        .map(|(name, weight)| FactorTag {
            name: name.clone(),
            label: humanize(name),
            weight: *weight,
            tone: FactorTone::for_weight(*weight),
        })
        .collect();
    let sources = result
        .sources_analyzed()
        .iter()
        .flat_map(|(category, urls)| {
            urls.iter().map(move |url| SourceLink {
                category: category.clone(),
                url: url.clone(),
            })
        })
        .collect();

    ResultView {
        verdict: result.verdict(),
        confidence_label: format!("{:.0}%", result.confidence()),
        reasoning: result.reasoning().to_string(),
        factors,
        sources,
    }
}

/// `source_credibility` -> `Source Credibility`.
fn humanize(name: &str) -> String {
    name.split(['_', '-', ' '])
        .filter(|word| !word.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
