use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;
use veritas_core::{RecentAnalysis, Verdict};
use veritas_logging::{veritas_info, veritas_warn};

const HISTORY_FILENAME: &str = ".veritas_history.ron";

#[derive(Debug, thiserror::Error)]
pub enum HistoryError {
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    #[error("history format error: {0}")]
    Format(String),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct PersistedAnalysis {
    title: String,
    verdict: String,
    confidence: u8,
    job_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PersistedHistory {
    #[serde(default)]
    saved_at: Option<String>,
    recent: Vec<PersistedAnalysis>,
}

pub(crate) fn history_path(data_dir: &Path) -> PathBuf {
    data_dir.join(HISTORY_FILENAME)
}

/// Loads recent analyses; a missing or unreadable file is an empty history.
pub(crate) fn load_history(data_dir: &Path) -> Vec<RecentAnalysis> {
    let path = history_path(data_dir);
    let content = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Vec::new(),
        Err(err) => {
            veritas_warn!("Failed to read history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    let history: PersistedHistory = match ron::from_str(&content) {
        Ok(history) => history,
        Err(err) => {
            veritas_warn!("Failed to parse history from {:?}: {}", path, err);
            return Vec::new();
        }
    };

    veritas_info!(
        "Loaded {} recent analyses from {:?}",
        history.recent.len(),
        path
    );
    history
        .recent
        .into_iter()
        .map(|entry| RecentAnalysis {
            title: entry.title,
            verdict: Verdict::parse(&entry.verdict),
            confidence: entry.confidence.min(100),
            job_id: entry.job_id,
        })
        .collect()
}

/// Writes the history atomically: temp file in the same directory, then rename.
pub(crate) fn save_history(
    data_dir: &Path,
    entries: &[RecentAnalysis],
) -> Result<PathBuf, HistoryError> {
    fs::create_dir_all(data_dir)?;

    let history = PersistedHistory {
        saved_at: Some(Utc::now().to_rfc3339()),
        recent: entries
            .iter()
            .map(|entry| PersistedAnalysis {
                title: entry.title.clone(),
                verdict: entry.verdict.label().to_string(),
                confidence: entry.confidence,
                job_id: entry.job_id.clone(),
            })
            .collect(),
    };
    let content = ron::ser::to_string_pretty(&history, ron::ser::PrettyConfig::new())
        .map_err(|err| HistoryError::Format(err.to_string()))?;

    let target = history_path(data_dir);
    let mut tmp = NamedTempFile::new_in(data_dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    tmp.as_file_mut().sync_all()?;
    tmp.persist(&target).map_err(|err| HistoryError::Io(err.error))?;
    Ok(target)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn entry(title: &str, verdict: Verdict) -> RecentAnalysis {
        RecentAnalysis {
            title: title.to_string(),
            verdict,
            confidence: 88,
            job_id: format!("id-{title}"),
        }
    }

    #[test]
    fn history_survives_a_save_load_cycle() {
        let temp = TempDir::new().unwrap();
        let entries = vec![entry("first", Verdict::Fake), entry("second", Verdict::Unverified)];

        let path = save_history(temp.path(), &entries).unwrap();
        assert_eq!(path.file_name().unwrap(), HISTORY_FILENAME);
        assert_eq!(load_history(temp.path()), entries);
    }

    #[test]
    fn save_replaces_previous_history() {
        let temp = TempDir::new().unwrap();
        save_history(temp.path(), &[entry("old", Verdict::Real)]).unwrap();
        save_history(temp.path(), &[entry("new", Verdict::Real)]).unwrap();

        let loaded = load_history(temp.path());
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].title, "new");
    }

    #[test]
    fn missing_or_corrupt_history_is_empty() {
        let temp = TempDir::new().unwrap();
        assert!(load_history(temp.path()).is_empty());

        fs::write(history_path(temp.path()), "not ron at all {").unwrap();
        assert!(load_history(temp.path()).is_empty());
    }

    #[test]
    fn save_into_a_file_path_fails_cleanly() {
        let temp = TempDir::new().unwrap();
        let not_a_dir = temp.path().join("plain");
        fs::write(&not_a_dir, "x").unwrap();
        assert!(save_history(&not_a_dir, &[entry("a", Verdict::Real)]).is_err());
    }
}
