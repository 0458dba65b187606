use crate::ProgressEvent;

/// Source tag of the pipeline stage whose END/FAILED events are terminal.
pub const VERDICT_STAGE: &str = "VERDICT AGENT";

/// Caption for any stage the mapper does not know.
pub const GENERIC_CAPTION: &str = "Processing...";

const STAGE_CAPTIONS: &[(&str, &str)] = &[
    ("CLAIM AGENT", "Extracting the core claim..."),
    ("SEARCH-TOOL", "Searching the web for coverage..."),
    ("SCRAPE-TOOL", "Reading source articles..."),
    ("SOURCE AGENT", "Weighing source credibility..."),
    ("FACT AGENT", "Cross-checking the facts..."),
    ("VERDICT AGENT", "Drafting the verdict..."),
];

/// What a progress event means for the job lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageSignal {
    Progress,
    Completed,
    Failed,
}

/// Maps a stage source tag to a human-readable caption. Tags compare case-insensitively.
pub fn map_stage(source: &str) -> &'static str {
    let source = source.trim();
    STAGE_CAPTIONS
        .iter()
        .find(|(tag, _)| tag.eq_ignore_ascii_case(source))
        .map(|(_, caption)| *caption)
        .unwrap_or(GENERIC_CAPTION)
}

pub fn classify(event: &ProgressEvent) -> StageSignal {
    if !event.source.trim().eq_ignore_ascii_case(VERDICT_STAGE) {
        return StageSignal::Progress;
    }
    let kind = event.kind.trim();
    if kind.eq_ignore_ascii_case("END") {
        StageSignal::Completed
    } else if kind.eq_ignore_ascii_case("FAILED") {
        StageSignal::Failed
    } else {
        StageSignal::Progress
    }
}
