//! Session model shared by every screen.
//!
//! The [`Session`] value holds the player's profile, the active step, the
//! analytics counters of the current run and the history of finished games.

use super::errors::DomainError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Companion animal picked during onboarding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Avatar {
    Lion,
    Rabbit,
    Cat,
}

impl Avatar {
    pub const ALL: [Avatar; 3] = [Avatar::Lion, Avatar::Rabbit, Avatar::Cat];

    /// Name of the animal as it is spoken to the child.
    pub fn local_name(self) -> &'static str {
        match self {
            Avatar::Lion => "Singa",
            Avatar::Rabbit => "Kelinci",
            Avatar::Cat => "Kucing",
        }
    }

    pub fn emoji(self) -> &'static str {
        match self {
            Avatar::Lion => "🦁",
            Avatar::Rabbit => "🐰",
            Avatar::Cat => "🐱",
        }
    }

    /// Cycles through the avatars, wrapping around in both directions.
    pub fn cycle(current: Option<Avatar>, forward: bool) -> Avatar {
        let len = Self::ALL.len();
        let index = match current {
            None => return if forward { Self::ALL[0] } else { Self::ALL[len - 1] },
            Some(avatar) => Self::ALL.iter().position(|a| *a == avatar).unwrap_or(0),
        };
        let next = if forward {
            (index + 1) % len
        } else {
            (index + len - 1) % len
        };
        Self::ALL[next]
    }
}

impl fmt::Display for Avatar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Avatar::Lion => "Lion",
            Avatar::Rabbit => "Rabbit",
            Avatar::Cat => "Cat",
        };
        f.write_str(name)
    }
}

impl FromStr for Avatar {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lion" => Ok(Avatar::Lion),
            "rabbit" => Ok(Avatar::Rabbit),
            "cat" => Ok(Avatar::Cat),
            _ => Err(DomainError::UnknownAvatar(s.to_string())),
        }
    }
}

/// The screen currently mounted. Exactly one step is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Onboarding,
    Menu,
    Game1,
    Game2,
    Summary,
    Stats,
}

impl Step {
    pub const ALL: [Step; 6] = [
        Step::Onboarding,
        Step::Menu,
        Step::Game1,
        Step::Game2,
        Step::Summary,
        Step::Stats,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Step::Onboarding => "onboarding",
            Step::Menu => "menu",
            Step::Game1 => "game1",
            Step::Game2 => "game2",
            Step::Summary => "summary",
            Step::Stats => "stats",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Step {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Step::ALL
            .into_iter()
            .find(|step| step.as_str() == s)
            .ok_or_else(|| DomainError::UnknownStep(s.to_string()))
    }
}

/// Difficulty of the memory game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Level {
    #[default]
    One,
    Two,
    Three,
}

impl Level {
    pub const ALL: [Level; 3] = [Level::One, Level::Two, Level::Three];

    pub fn number(self) -> u8 {
        match self {
            Level::One => 1,
            Level::Two => 2,
            Level::Three => 3,
        }
    }

    /// Number of animal pairs dealt at this level.
    pub fn pairs(self) -> usize {
        match self {
            Level::One => 1,
            Level::Two => 3,
            Level::Three => 4,
        }
    }

    /// Grid columns used to lay the deck out.
    pub fn columns(self) -> usize {
        match self {
            Level::One => 2,
            Level::Two => 3,
            Level::Three => 4,
        }
    }
}

impl TryFrom<u8> for Level {
    type Error = DomainError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Level::One),
            2 => Ok(Level::Two),
            3 => Ok(Level::Three),
            other => Err(DomainError::InvalidLevel(other)),
        }
    }
}

impl From<Level> for u8 {
    fn from(level: Level) -> Self {
        level.number()
    }
}

/// Which mini-game produced a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GameKind {
    Game1,
    Game2,
}

impl GameKind {
    pub fn title(self) -> &'static str {
        match self {
            GameKind::Game1 => "Box Misteri",
            GameKind::Game2 => "Keranjang Angka",
        }
    }

    pub fn step(self) -> Step {
        match self {
            GameKind::Game1 => Step::Game1,
            GameKind::Game2 => Step::Game2,
        }
    }
}

impl fmt::Display for GameKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.step().as_str())
    }
}

impl FromStr for GameKind {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "game1" => Ok(GameKind::Game1),
            "game2" => Ok(GameKind::Game2),
            _ => Err(DomainError::UnknownGame(s.to_string())),
        }
    }
}

/// Running counters for the current run, reset by `reset_game`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Analytics {
    /// Non-matching pair comparisons in the memory game
    pub wrong_clicks: u32,
    /// Clicks on cards that were already revealed or matched
    pub repeated_clicks: u32,
    /// Reserved; no rule computes it
    pub drag_accuracy: u32,
    /// Total pair comparisons in the memory game
    pub attempts: u32,
}

impl Analytics {
    /// Overwrites the fields present in `update` and leaves the rest untouched.
    pub fn merge(&mut self, update: AnalyticsUpdate) {
        if let Some(value) = update.wrong_clicks {
            self.wrong_clicks = value;
        }
        if let Some(value) = update.repeated_clicks {
            self.repeated_clicks = value;
        }
        if let Some(value) = update.drag_accuracy {
            self.drag_accuracy = value;
        }
        if let Some(value) = update.attempts {
            self.attempts = value;
        }
    }
}

/// A partial analytics record. Values are absolute, not deltas.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct AnalyticsUpdate {
    pub wrong_clicks: Option<u32>,
    pub repeated_clicks: Option<u32>,
    pub drag_accuracy: Option<u32>,
    pub attempts: Option<u32>,
}

impl AnalyticsUpdate {
    pub fn wrong_clicks(mut self, value: u32) -> Self {
        self.wrong_clicks = Some(value);
        self
    }

    pub fn repeated_clicks(mut self, value: u32) -> Self {
        self.repeated_clicks = Some(value);
        self
    }

    pub fn drag_accuracy(mut self, value: u32) -> Self {
        self.drag_accuracy = Some(value);
        self
    }

    pub fn attempts(mut self, value: u32) -> Self {
        self.attempts = Some(value);
        self
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Opaque identifier of a history record.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HistoryId(String);

impl HistoryId {
    /// Generates a fresh random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HistoryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outcome of a finished game, as reported by the game screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NewHistoryEntry {
    pub game: GameKind,
    pub score: u32,
    pub time_elapsed: u32,
}

/// Immutable record of one completed game.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: HistoryId,
    pub game: GameKind,
    pub score: u32,
    /// Seconds spent in the round
    pub time_elapsed: u32,
    pub timestamp: DateTime<Utc>,
}

impl HistoryEntry {
    pub fn record(entry: NewHistoryEntry) -> Self {
        Self {
            id: HistoryId::generate(),
            game: entry.game,
            score: entry.score,
            time_elapsed: entry.time_elapsed,
            timestamp: Utc::now(),
        }
    }
}

/// The whole mutable state of one play session.
///
/// # Examples
///
/// ```
/// use ceria::domain::{Session, Step, Level};
///
/// let session = Session::default();
/// assert_eq!(session.current_step, Step::Onboarding);
/// assert_eq!(session.level, Level::One);
/// assert!(session.history.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Session {
    pub user_name: String,
    pub avatar: Option<Avatar>,
    pub current_step: Step,
    pub level: Level,
    pub last_played_game: Option<GameKind>,
    pub analytics: Analytics,
    /// Completed games, newest first
    pub history: Vec<HistoryEntry>,
}

impl Session {
    /// Restores every field to its initial value except the history.
    pub fn reset_keeping_history(&mut self) {
        let history = std::mem::take(&mut self.history);
        *self = Session {
            history,
            ..Session::default()
        };
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.history.first()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_defaults() {
        let session = Session::default();
        assert!(session.user_name.is_empty());
        assert!(session.avatar.is_none());
        assert_eq!(session.current_step, Step::Onboarding);
        assert_eq!(session.level, Level::One);
        assert!(session.last_played_game.is_none());
        assert_eq!(session.analytics, Analytics::default());
        assert!(session.history.is_empty());
    }

    #[test]
    fn test_analytics_merge_keeps_untouched_fields() {
        let mut analytics = Analytics {
            wrong_clicks: 3,
            repeated_clicks: 4,
            drag_accuracy: 0,
            attempts: 9,
        };
        analytics.merge(AnalyticsUpdate::default().wrong_clicks(5));
        assert_eq!(analytics.wrong_clicks, 5);
        assert_eq!(analytics.repeated_clicks, 4);
        assert_eq!(analytics.attempts, 9);
    }

    #[test]
    fn test_analytics_merge_overwrites_rather_than_adds() {
        let mut analytics = Analytics {
            attempts: 7,
            ..Analytics::default()
        };
        analytics.merge(AnalyticsUpdate::default().attempts(2));
        assert_eq!(analytics.attempts, 2);
    }

    #[test]
    fn test_empty_update_is_noop() {
        let mut analytics = Analytics {
            wrong_clicks: 1,
            ..Analytics::default()
        };
        let update = AnalyticsUpdate::default();
        assert!(update.is_empty());
        analytics.merge(update);
        assert_eq!(analytics.wrong_clicks, 1);
    }

    #[test]
    fn test_level_conversions() {
        assert_eq!(Level::try_from(2), Ok(Level::Two));
        assert_eq!(Level::try_from(0), Err(DomainError::InvalidLevel(0)));
        assert_eq!(Level::try_from(4), Err(DomainError::InvalidLevel(4)));
        assert_eq!(u8::from(Level::Three), 3);
        assert_eq!(Level::One.pairs(), 1);
        assert_eq!(Level::Two.pairs(), 3);
        assert_eq!(Level::Three.pairs(), 4);
    }

    #[test]
    fn test_parse_step_and_game() {
        for step in Step::ALL {
            assert_eq!(step.as_str().parse::<Step>(), Ok(step));
        }
        assert!("lobby".parse::<Step>().is_err());
        assert_eq!("game2".parse::<GameKind>(), Ok(GameKind::Game2));
        assert!(matches!(
            "game3".parse::<GameKind>(),
            Err(DomainError::UnknownGame(_))
        ));
    }

    #[test]
    fn test_parse_avatar_is_case_insensitive() {
        assert_eq!("Lion".parse::<Avatar>(), Ok(Avatar::Lion));
        assert_eq!("rabbit".parse::<Avatar>(), Ok(Avatar::Rabbit));
        assert!("Dog".parse::<Avatar>().is_err());
    }

    #[test]
    fn test_avatar_cycle_wraps() {
        assert_eq!(Avatar::cycle(None, true), Avatar::Lion);
        assert_eq!(Avatar::cycle(None, false), Avatar::Cat);
        assert_eq!(Avatar::cycle(Some(Avatar::Cat), true), Avatar::Lion);
        assert_eq!(Avatar::cycle(Some(Avatar::Lion), false), Avatar::Cat);
    }

    #[test]
    fn test_history_ids_are_distinct() {
        let a = HistoryId::generate();
        let b = HistoryId::generate();
        assert_ne!(a, b);
        assert!(!a.as_str().is_empty());
    }

    #[test]
    fn test_reset_keeping_history() {
        let mut session = Session {
            user_name: "Ardi".to_string(),
            avatar: Some(Avatar::Cat),
            current_step: Step::Summary,
            level: Level::Three,
            last_played_game: Some(GameKind::Game1),
            analytics: Analytics {
                attempts: 4,
                ..Analytics::default()
            },
            history: vec![HistoryEntry::record(NewHistoryEntry {
                game: GameKind::Game1,
                score: 100,
                time_elapsed: 12,
            })],
        };
        let history = session.history.clone();
        session.reset_keeping_history();
        assert_eq!(
            session,
            Session {
                history,
                ..Session::default()
            }
        );
    }

    #[test]
    fn test_serialized_tags_are_lowercase() {
        let json = serde_json::to_string(&Step::Game2).unwrap();
        assert_eq!(json, "\"game2\"");
        let json = serde_json::to_string(&Level::Two).unwrap();
        assert_eq!(json, "2");
    }
}
