use super::models::Step;
use super::navigation::NavEvent;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum DomainError {
    #[error("Cannot handle {event:?} while on the {from} screen")]
    IllegalTransition { from: Step, event: NavEvent },
    #[error("Invalid level: {0} (expected 1, 2 or 3)")]
    InvalidLevel(u8),
    #[error("Unknown avatar: {0}")]
    UnknownAvatar(String),
    #[error("Unknown step: {0}")]
    UnknownStep(String),
    #[error("Unknown game: {0}")]
    UnknownGame(String),
}

pub type DomainResult<T> = Result<T, DomainError>;
