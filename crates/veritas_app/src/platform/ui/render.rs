use veritas_core::{
    AppViewModel, FactorTone, InputMode, Notification, NotifyLevel, Phase, RecentAnalysis,
    ResultView,
};

const FETCHING_CAPTION: &str = "Fetching the verdict...";

/// The single repaintable status line, while something is in flight.
pub fn progress_line(view: &AppViewModel) -> Option<String> {
    let caption = view.caption.as_deref().unwrap_or("Working...");
    match view.phase {
        Phase::Submitting => Some(caption.to_string()),
        Phase::Streaming => Some(format!("{} {}", view.spinner, caption)),
        Phase::FetchingResult => Some(FETCHING_CAPTION.to_string()),
        _ => None,
    }
}

pub fn format_result(result: &ResultView) -> String {
    let mut out = format!(
        "Verdict: {} ({} confidence)\n",
        result.verdict.label(),
        result.confidence_label
    );
    if !result.reasoning.trim().is_empty() {
        out.push_str(&format!("Reasoning: {}\n", result.reasoning.trim()));
    }
    if !result.factors.is_empty() {
        out.push_str("Key factors:\n");
        for factor in &result.factors {
            let marker = match factor.tone {
                FactorTone::Positive => "+",
                FactorTone::Neutral => "~",
                FactorTone::Negative => "-",
            };
            out.push_str(&format!("  [{marker}] {} {:.0}\n", factor.label, factor.weight));
        }
    }
    if !result.sources.is_empty() {
        out.push_str("Sources:\n");
        for source in &result.sources {
            out.push_str(&format!("  {}: {}\n", source.category, source.url));
        }
    }
    out
}

pub fn format_notification(notification: &Notification) -> String {
    let tag = match notification.level {
        NotifyLevel::Info => "info",
        NotifyLevel::Success => "ok",
        NotifyLevel::Warning => "warn",
        NotifyLevel::Error => "error",
    };
    format!("[{tag}] {}", notification.message)
}

pub fn format_recent(recent: &[RecentAnalysis]) -> String {
    if recent.is_empty() {
        return "No recent analyses.".to_string();
    }
    recent
        .iter()
        .map(|entry| {
            format!(
                "  {:<10} {:>3}%  {}",
                entry.verdict.label(),
                entry.confidence,
                entry.title
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

pub fn prompt(view: &AppViewModel) -> &'static str {
    match view.mode {
        InputMode::Text => "text> ",
        InputMode::Url => "url> ",
    }
}
