//! Summary and learning-stats views derived from the session.
//!
//! Nothing here mutates the session; the stats view in particular reorders a
//! borrowed slice of the history without touching the stored order.

use super::models::{Analytics, GameKind, HistoryEntry, Session};

/// How many records the stats screen lists.
pub const RECENT_LIMIT: usize = 10;

/// Formats seconds as `m:ss`.
///
/// # Examples
///
/// ```
/// use ceria::domain::format_time;
///
/// assert_eq!(format_time(0), "0:00");
/// assert_eq!(format_time(75), "1:15");
/// ```
pub fn format_time(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

fn memory_rating(wrong_clicks: u32) -> &'static str {
    match wrong_clicks {
        0..=1 => "Sangat Baik!",
        2..=4 => "Baik!",
        _ => "Terus Berlatih!",
    }
}

fn focus_rating(repeated_clicks: u32) -> &'static str {
    match repeated_clicks {
        0..=2 => "Sangat Fokus!",
        3..=5 => "Fokus!",
        _ => "Ayo Lebih Sabar!",
    }
}

fn counting_rating(score: u32) -> &'static str {
    match score {
        90..=u32::MAX => "Sangat Baik!",
        70..=89 => "Baik!",
        _ => "Terus Berlatih!",
    }
}

/// Content of the summary screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assessment {
    pub title: String,
    pub game: GameKind,
    pub time_elapsed: u32,
    pub score: u32,
    /// Game-specific (label, value) rows
    pub rows: Vec<(&'static str, String)>,
}

impl Assessment {
    /// Builds the summary from the newest history record and the counters.
    ///
    /// Time and score come from `history[0]` (zero when there is none); the
    /// rows depend on `last_played_game`, defaulting to the memory game.
    pub fn for_session(session: &Session) -> Self {
        let (time_elapsed, score) = session
            .latest()
            .map(|entry| (entry.time_elapsed, entry.score))
            .unwrap_or((0, 0));
        let game = session.last_played_game.unwrap_or(GameKind::Game1);

        let (title, rows) = match game {
            GameKind::Game1 => (
                format!("Hebat, {}!", session.user_name),
                memory_rows(&session.analytics),
            ),
            GameKind::Game2 => ("Pintar Sekali! 🎉".to_string(), counting_rows(score)),
        };

        Self {
            title,
            game,
            time_elapsed,
            score,
            rows,
        }
    }
}

fn memory_rows(analytics: &Analytics) -> Vec<(&'static str, String)> {
    vec![
        ("Percobaan", format!("{} kali", analytics.attempts)),
        ("Daya Ingat", memory_rating(analytics.wrong_clicks).to_string()),
        ("Fokus", focus_rating(analytics.repeated_clicks).to_string()),
    ]
}

fn counting_rows(score: u32) -> Vec<(&'static str, String)> {
    let rating = counting_rating(score);
    vec![
        ("Menghitung", rating.to_string()),
        ("Fokus", focus_rating(0).to_string()),
        (
            "Hafal Bilangan",
            if score >= 70 { "Hafal!" } else { "Ayo Ulangi!" }.to_string(),
        ),
    ]
}

/// Totals and recent games for the learning-stats screen.
#[derive(Debug, Clone, PartialEq)]
pub struct LearningStats<'a> {
    pub memory_total_score: u32,
    pub counting_plays: usize,
    /// Up to ten records taken from the oldest end of the history, oldest first
    pub recent: Vec<&'a HistoryEntry>,
}

impl<'a> LearningStats<'a> {
    pub fn from_history(history: &'a [HistoryEntry]) -> Self {
        let memory_total_score = history
            .iter()
            .filter(|h| h.game == GameKind::Game1)
            .map(|h| h.score)
            .sum();
        let counting_plays = history
            .iter()
            .filter(|h| h.game == GameKind::Game2)
            .count();
        let recent = history.iter().rev().take(RECENT_LIMIT).collect();

        Self {
            memory_total_score,
            counting_plays,
            recent,
        }
    }
}
