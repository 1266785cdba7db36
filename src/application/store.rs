// src/application/store.rs
// Analysis state container: in-flight guard, cooldown, persisted snapshot

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::application::analyzer::MarketAnalyzer;
use crate::domain::errors::{AnalysisError, AnalysisResult};
use crate::domain::models::{Analysis, NewsItem};

/// Default file slot for the persisted snapshot.
pub const SNAPSHOT_FILE: &str = "forex-analysis-storage.json";

/// Minimum wait between two successful analysis runs, in milliseconds.
pub const ANALYSIS_COOLDOWN_MS: i64 = 5 * 60 * 1000;

/// Progress of the in-flight analysis.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Progress {
    pub value: u8,
    pub message: String,
}

/// Slice of state persisted across sessions.
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PersistedState {
    analysis: Option<Analysis>,
    last_analysis_time: Option<i64>,
}

/// State container owning the last analysis snapshot. Owned by the
/// application root and passed by reference to consumers; all mutation goes
/// through it, one operation at a time.
pub struct AnalysisStore {
    analyzer: MarketAnalyzer,
    path: Option<PathBuf>,
    analysis: Option<Analysis>,
    last_analysis_time: Option<i64>,
    is_analyzing: bool,
    progress: Progress,
    error: Option<String>,
}

impl AnalysisStore {
    /// Create a store, restoring the persisted snapshot when a slot is given.
    pub fn new(analyzer: MarketAnalyzer, path: Option<PathBuf>) -> Self {
        let restored = path.as_deref().map(restore).unwrap_or_default();

        Self {
            analyzer,
            path,
            analysis: restored.analysis,
            last_analysis_time: restored.last_analysis_time,
            is_analyzing: false,
            progress: Progress::default(),
            error: None,
        }
    }

    pub fn analysis(&self) -> Option<&Analysis> {
        self.analysis.as_ref()
    }

    pub fn is_analyzing(&self) -> bool {
        self.is_analyzing
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn last_error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn last_analysis_time(&self) -> Option<i64> {
        self.last_analysis_time
    }

    /// Run one analysis. Preconditions (API key, news present, nothing in
    /// flight, cooldown elapsed) are checked here, before any network call;
    /// the cooldown rejection carries the remaining wait in seconds.
    pub async fn analyze_news(
        &mut self,
        news: &[NewsItem],
        api_key: &str,
        model: &str,
    ) -> AnalysisResult<()> {
        if api_key.is_empty() {
            return Err(AnalysisError::MissingApiKey);
        }
        if news.is_empty() {
            return Err(AnalysisError::NoNews);
        }
        if self.is_analyzing {
            return Err(AnalysisError::AlreadyRunning);
        }

        if let Some(last) = self.last_analysis_time {
            let elapsed = Utc::now().timestamp_millis() - last;
            if elapsed < ANALYSIS_COOLDOWN_MS {
                let remaining = ((ANALYSIS_COOLDOWN_MS - elapsed) as f64 / 1000.0).ceil() as u64;
                return Err(AnalysisError::Cooldown(remaining));
            }
        }

        self.is_analyzing = true;
        self.error = None;

        let result = {
            let progress = &mut self.progress;
            self.analyzer
                .analyze(news, api_key, model, |value, message| {
                    log::debug!("analyse {}% - {}", value, message);
                    *progress = Progress {
                        value,
                        message: message.to_string(),
                    };
                })
                .await
        };

        match result {
            Ok(analysis) => {
                self.analysis = Some(analysis);
                self.last_analysis_time = Some(Utc::now().timestamp_millis());
                self.is_analyzing = false;
                self.progress = Progress::default();
                self.persist();
                Ok(())
            }
            Err(e) => {
                self.error = Some(e.to_string());
                self.is_analyzing = false;
                self.progress = Progress::default();
                Err(e)
            }
        }
    }

    /// Clear the snapshot and transient state. The cooldown timestamp is
    /// kept: resetting the view does not re-open the rate limit.
    pub fn reset(&mut self) {
        self.analysis = None;
        self.is_analyzing = false;
        self.progress = Progress::default();
        self.error = None;
    }

    fn persist(&self) {
        let Some(path) = &self.path else { return };

        let state = PersistedState {
            analysis: self.analysis.clone(),
            last_analysis_time: self.last_analysis_time,
        };

        match serde_json::to_string_pretty(&state) {
            Ok(contents) => {
                if let Err(e) = std::fs::write(path, contents) {
                    log::warn!("Failed to persist analysis snapshot: {}", e);
                }
            }
            Err(e) => log::warn!("Failed to serialize analysis snapshot: {}", e),
        }
    }
}

fn restore(path: &Path) -> PersistedState {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            if e.kind() != std::io::ErrorKind::NotFound {
                log::warn!("Failed to read analysis snapshot: {}", e);
            }
            return PersistedState::default();
        }
    };

    match serde_json::from_str(&raw) {
        Ok(state) => state,
        Err(e) => {
            log::warn!("Stored analysis snapshot is unreadable, ignoring it: {}", e);
            PersistedState::default()
        }
    }
}
