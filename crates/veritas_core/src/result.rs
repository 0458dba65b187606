use std::collections::BTreeMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Verdict {
    Real,
    Fake,
    #[default]
    Unverified,
}

impl Verdict {
    /// Parses the service's verdict label; anything unrecognised is `Unverified`.
    pub fn parse(label: &str) -> Self {
        let label = label.trim();
        if label.eq_ignore_ascii_case("REAL") || label.eq_ignore_ascii_case("TRUE") {
            Verdict::Real
        } else if label.eq_ignore_ascii_case("FAKE") || label.eq_ignore_ascii_case("FALSE") {
            Verdict::Fake
        } else {
            Verdict::Unverified
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Verdict::Real => "REAL",
            Verdict::Fake => "FAKE",
            Verdict::Unverified => "UNVERIFIED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FactorTone {
    Positive,
    Neutral,
    Negative,
}

impl FactorTone {
    pub fn for_weight(weight: f64) -> Self {
        if weight >= 70.0 {
            FactorTone::Positive
        } else if weight >= 40.0 {
            FactorTone::Neutral
        } else {
            FactorTone::Negative
        }
    }
}

/// Final verdict for a completed job. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct FinalResult {
    verdict: Verdict,
    confidence: f64,
    reasoning: String,
    key_factors: BTreeMap<String, f64>,
    sources_analyzed: BTreeMap<String, Vec<String>>,
}

impl FinalResult {
    /// Builds a result, clamping confidence and factor weights into 0..=100.
    pub fn new(
        verdict: Verdict,
        confidence: f64,
        reasoning: impl Into<String>,
        key_factors: BTreeMap<String, f64>,
        sources_analyzed: BTreeMap<String, Vec<String>>,
    ) -> Self {
        Self {
            verdict,
            confidence: clamp_percent(confidence),
            reasoning: reasoning.into(),
            key_factors: key_factors
                .into_iter()
                .map(|(name, weight)| (name, clamp_percent(weight)))
                .collect(),
            sources_analyzed,
        }
    }

    pub fn verdict(&self) -> Verdict {
        self.verdict
    }

    pub fn confidence(&self) -> f64 {
        self.confidence
    }

    pub fn reasoning(&self) -> &str {
        &self.reasoning
    }

    pub fn key_factors(&self) -> &BTreeMap<String, f64> {
        &self.key_factors
    }

    pub fn sources_analyzed(&self) -> &BTreeMap<String, Vec<String>> {
        &self.sources_analyzed
    }
}

fn clamp_percent(value: f64) -> f64 {
    if value.is_nan() {
        return 0.0;
    }
    value.clamp(0.0, 100.0)
}
