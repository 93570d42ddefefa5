//! JSON learning report written at exit.
//!
//! Export only: the file is never read back by the application.

use crate::domain::{Analytics, Avatar, GameKind, HistoryEntry, LearningStats, Session};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ReportError {
    #[error("failed to serialize report: {0}")]
    Serialize(#[from] serde_json::Error),
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),
}

#[derive(Debug, Serialize)]
pub struct SessionReport<'a> {
    pub generated_at: DateTime<Utc>,
    pub user_name: &'a str,
    pub avatar: Option<Avatar>,
    pub last_played_game: Option<GameKind>,
    pub analytics: Analytics,
    pub memory_total_score: u32,
    pub counting_plays: usize,
    /// Newest first
    pub history: &'a [HistoryEntry],
}

impl<'a> SessionReport<'a> {
    pub fn from_session(session: &'a Session) -> Self {
        let stats = LearningStats::from_history(&session.history);
        Self {
            generated_at: Utc::now(),
            user_name: &session.user_name,
            avatar: session.avatar,
            last_played_game: session.last_played_game,
            analytics: session.analytics,
            memory_total_score: stats.memory_total_score,
            counting_plays: stats.counting_plays,
            history: &session.history,
        }
    }

    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn write_to(&self, path: &Path) -> Result<(), ReportError> {
        fs::write(path, self.to_json()?)?;
        info!(path = %path.display(), entries = self.history.len(), "report written");
        Ok(())
    }
}
