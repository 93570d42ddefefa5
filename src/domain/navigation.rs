//! Screen-to-screen navigation.
//!
//! Screens do not pick their next step directly; they raise a [`NavEvent`]
//! and [`Step::on`] decides where that event leads from the current step.

use super::errors::{DomainError, DomainResult};
use super::models::{GameKind, Step};
use serde::{Deserialize, Serialize};

/// Something that happened on a screen and may move the session elsewhere.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum NavEvent {
    /// Name and avatar were accepted and the greeting has been played
    Greeted,
    OpenMemoryGame,
    OpenCountingGame,
    OpenStats,
    /// The given game reached its win condition
    Finished(GameKind),
    BackToMenu,
    /// Start over from onboarding with a fresh profile
    PlayAgain,
}

impl Step {
    /// Returns the step reached by handling `event` on this step.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::IllegalTransition`] when the event has no
    /// meaning on this step.
    ///
    /// # Examples
    ///
    /// ```
    /// use ceria::domain::{GameKind, NavEvent, Step};
    ///
    /// assert_eq!(Step::Menu.on(NavEvent::OpenMemoryGame), Ok(Step::Game1));
    /// assert_eq!(Step::Game2.on(NavEvent::Finished(GameKind::Game2)), Ok(Step::Summary));
    /// assert!(Step::Onboarding.on(NavEvent::Finished(GameKind::Game1)).is_err());
    /// ```
    pub fn on(self, event: NavEvent) -> DomainResult<Step> {
        use NavEvent::*;

        let next = match (self, event) {
            (Step::Onboarding, Greeted) => Some(Step::Menu),
            (Step::Menu, OpenMemoryGame) => Some(Step::Game1),
            (Step::Menu, OpenCountingGame) => Some(Step::Game2),
            (Step::Menu, OpenStats) => Some(Step::Stats),
            (Step::Game1, Finished(GameKind::Game1)) => Some(Step::Summary),
            (Step::Game2, Finished(GameKind::Game2)) => Some(Step::Summary),
            (Step::Game1 | Step::Game2 | Step::Summary | Step::Stats, BackToMenu) => {
                Some(Step::Menu)
            }
            (Step::Summary, PlayAgain) => Some(Step::Onboarding),
            _ => None,
        };

        next.ok_or(DomainError::IllegalTransition { from: self, event })
    }

    /// Whether `event` is accepted on this step.
    pub fn accepts(self, event: NavEvent) -> bool {
        self.on(event).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EVENTS: [NavEvent; 8] = [
        NavEvent::Greeted,
        NavEvent::OpenMemoryGame,
        NavEvent::OpenCountingGame,
        NavEvent::OpenStats,
        NavEvent::Finished(GameKind::Game1),
        NavEvent::Finished(GameKind::Game2),
        NavEvent::BackToMenu,
        NavEvent::PlayAgain,
    ];

    #[test]
    fn test_observed_paths_are_legal() {
        assert_eq!(Step::Onboarding.on(NavEvent::Greeted), Ok(Step::Menu));
        assert_eq!(Step::Menu.on(NavEvent::OpenCountingGame), Ok(Step::Game2));
        assert_eq!(Step::Menu.on(NavEvent::OpenStats), Ok(Step::Stats));
        assert_eq!(
            Step::Game1.on(NavEvent::Finished(GameKind::Game1)),
            Ok(Step::Summary)
        );
        assert_eq!(Step::Summary.on(NavEvent::BackToMenu), Ok(Step::Menu));
        assert_eq!(Step::Summary.on(NavEvent::PlayAgain), Ok(Step::Onboarding));
        assert_eq!(Step::Stats.on(NavEvent::BackToMenu), Ok(Step::Menu));
    }

    #[test]
    fn test_game_cannot_finish_the_other_game() {
        assert_eq!(
            Step::Game1.on(NavEvent::Finished(GameKind::Game2)),
            Err(DomainError::IllegalTransition {
                from: Step::Game1,
                event: NavEvent::Finished(GameKind::Game2),
            })
        );
        assert!(!Step::Game2.accepts(NavEvent::Finished(GameKind::Game1)));
    }

    #[test]
    fn test_onboarding_cannot_jump_to_summary() {
        for event in EVENTS {
            let result = Step::Onboarding.on(event);
            if event == NavEvent::Greeted {
                assert_eq!(result, Ok(Step::Menu));
            } else {
                assert!(result.is_err(), "{event:?} should be rejected");
            }
        }
    }

    #[test]
    fn test_transition_table_size() {
        let legal: usize = Step::ALL
            .iter()
            .map(|step| EVENTS.iter().filter(|event| step.accepts(**event)).count())
            .sum();
        // 1 onboarding + 3 menu + 2 finishes + 4 back + 1 play again
        assert_eq!(legal, 11);
    }

    #[test]
    fn test_no_event_leaves_the_step_unchanged() {
        for step in Step::ALL {
            for event in EVENTS {
                if let Ok(next) = step.on(event) {
                    assert_ne!(next, step);
                }
            }
        }
    }
}
