//! Transient state owned by the mounted screen.
//!
//! Nothing in here is part of the session: it is thrown away, timers
//! included, as soon as the screen is replaced.

use super::timers::{TimerId, Timers};
use crate::domain::{Avatar, CountingGame, FlipOutcome, Level, MemoryGame, Step, Zone};
use std::time::{Duration, Instant};

/// Delays used by the screens.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Timings {
    /// Pause after the greeting before the menu opens
    pub greeting_delay: Duration,
    /// How long a matched pair stays revealed before it is marked matched
    pub match_delay: Duration,
    /// How long a mismatched pair stays revealed
    pub flip_back: Duration,
    pub error_cue_delay: Duration,
    /// Silence before the counting question is repeated
    pub idle_hint: Duration,
    pub nudge: Duration,
}

impl Default for Timings {
    fn default() -> Self {
        Self {
            greeting_delay: Duration::from_millis(2000),
            match_delay: Duration::from_millis(500),
            flip_back: Duration::from_millis(1000),
            error_cue_delay: Duration::from_millis(200),
            idle_hint: Duration::from_secs(10),
            nudge: Duration::from_millis(500),
        }
    }
}

const ONE_SECOND: Duration = Duration::from_secs(1);

/// Every deferred action a screen can schedule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScreenTimer {
    Greeted,
    NudgeOver,
    Second,
    ResolvePair,
    ErrorCue,
    IdleHint,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnboardingField {
    Name,
    Avatar,
}

#[derive(Debug)]
pub struct OnboardingForm {
    pub name: String,
    pub avatar: Option<Avatar>,
    pub focus: OnboardingField,
    /// Set briefly when the child presses start too early
    pub nudge: bool,
    /// Greeting accepted; waiting for the menu to open
    pub waiting: bool,
    pub timers: Timers<ScreenTimer>,
}

impl Default for OnboardingForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            avatar: None,
            focus: OnboardingField::Name,
            nudge: false,
            waiting: false,
            timers: Timers::new(),
        }
    }
}

impl OnboardingForm {
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && self.avatar.is_some()
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            OnboardingField::Name => OnboardingField::Avatar,
            OnboardingField::Avatar => OnboardingField::Name,
        };
    }
}

/// One memory game in progress.
#[derive(Debug)]
pub struct MemoryRound {
    pub game: MemoryGame,
    pub cursor: usize,
    pub elapsed: u32,
    pub timers: Timers<ScreenTimer>,
}

impl MemoryRound {
    pub fn start(game: MemoryGame, now: Instant) -> Self {
        let mut timers = Timers::new();
        timers.every(ONE_SECOND, ScreenTimer::Second, now);
        Self {
            game,
            cursor: 0,
            elapsed: 0,
            timers,
        }
    }

    /// Flips the card under the cursor and schedules its resolution.
    pub fn flip(&mut self, timings: &Timings, now: Instant) -> FlipOutcome {
        let outcome = self.game.flip(self.cursor);
        match outcome {
            FlipOutcome::Match { .. } => {
                self.timers
                    .after(timings.match_delay, ScreenTimer::ResolvePair, now);
            }
            FlipOutcome::Mismatch { .. } => {
                self.timers
                    .after(timings.error_cue_delay, ScreenTimer::ErrorCue, now);
                self.timers
                    .after(timings.flip_back, ScreenTimer::ResolvePair, now);
            }
            _ => {}
        }
        outcome
    }

    /// Moves the cursor by whole cells, staying inside the grid.
    pub fn move_cursor(&mut self, rows: isize, cols: isize) {
        let columns = self.game.level().columns() as isize;
        let total = self.game.cards().len() as isize;
        let row = self.cursor as isize / columns + rows;
        let col = self.cursor as isize % columns + cols;
        if row < 0 || col < 0 || col >= columns {
            return;
        }
        let target = row * columns + col;
        if target < total {
            self.cursor = target as usize;
        }
    }
}

#[derive(Debug)]
pub enum MemoryScreen {
    Selecting { cursor: Level },
    Playing(MemoryRound),
}

/// The counting game in progress.
#[derive(Debug)]
pub struct CountingScreen {
    pub game: CountingGame,
    pub zone_cursor: usize,
    pub elapsed: u32,
    pub timers: Timers<ScreenTimer>,
    hint: Option<TimerId>,
}

impl CountingScreen {
    pub fn start(timings: &Timings, now: Instant) -> Self {
        let mut timers = Timers::new();
        timers.every(ONE_SECOND, ScreenTimer::Second, now);
        let mut screen = Self {
            game: CountingGame::new(),
            zone_cursor: 0,
            elapsed: 0,
            timers,
            hint: None,
        };
        screen.rearm_hint(timings, now);
        screen
    }

    pub fn selected_zone(&self) -> Zone {
        Zone::ALL[self.zone_cursor]
    }

    pub fn move_zone(&mut self, forward: bool) {
        let len = Zone::ALL.len();
        self.zone_cursor = if forward {
            (self.zone_cursor + 1) % len
        } else {
            (self.zone_cursor + len - 1) % len
        };
    }

    /// Restarts the idle countdown after any input.
    pub fn rearm_hint(&mut self, timings: &Timings, now: Instant) {
        if let Some(id) = self.hint.take() {
            self.timers.cancel(id);
        }
        self.hint = Some(self.timers.after(timings.idle_hint, ScreenTimer::IdleHint, now));
    }
}

/// The screen currently mounted, with its local state.
#[derive(Debug)]
pub enum Screen {
    Onboarding(OnboardingForm),
    Menu,
    Memory(MemoryScreen),
    Counting(CountingScreen),
    Summary,
    Stats,
}

impl Screen {
    pub fn step(&self) -> Step {
        match self {
            Screen::Onboarding(_) => Step::Onboarding,
            Screen::Menu => Step::Menu,
            Screen::Memory(_) => Step::Game1,
            Screen::Counting(_) => Step::Game2,
            Screen::Summary => Step::Summary,
            Screen::Stats => Step::Stats,
        }
    }

    pub fn timers_mut(&mut self) -> Option<&mut Timers<ScreenTimer>> {
        match self {
            Screen::Onboarding(form) => Some(&mut form.timers),
            Screen::Memory(MemoryScreen::Playing(round)) => Some(&mut round.timers),
            Screen::Counting(screen) => Some(&mut screen.timers),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn round(level: Level, labels: Vec<&'static str>) -> MemoryRound {
        MemoryRound::start(MemoryGame::with_layout(level, labels), Instant::now())
    }

    #[test]
    fn test_cursor_stays_in_grid() {
        let mut round = round(
            Level::Two,
            vec!["Beruang", "Kucing", "Anjing", "Beruang", "Kucing", "Anjing"],
        );
        round.move_cursor(0, -1);
        assert_eq!(round.cursor, 0);
        round.move_cursor(0, 2);
        assert_eq!(round.cursor, 2);
        round.move_cursor(0, 1);
        assert_eq!(round.cursor, 2);
        round.move_cursor(1, 0);
        assert_eq!(round.cursor, 5);
        round.move_cursor(1, 0);
        assert_eq!(round.cursor, 5);
    }

    #[test]
    fn test_mismatch_schedules_cue_and_flip_back() {
        let start = Instant::now();
        let timings = Timings::default();
        let labels = vec!["Beruang", "Kucing", "Anjing", "Beruang", "Kucing", "Anjing"];
        let mut round = MemoryRound::start(MemoryGame::with_layout(Level::Two, labels), start);
        round.flip(&timings, start);
        round.cursor = 1;
        round.flip(&timings, start);

        let fired = round.timers.poll(start + Duration::from_millis(1000));
        assert_eq!(
            fired,
            vec![
                ScreenTimer::ErrorCue,
                ScreenTimer::Second,
                ScreenTimer::ResolvePair
            ]
        );
    }

    #[test]
    fn test_idle_hint_is_rearmed_not_stacked() {
        let start = Instant::now();
        let timings = Timings::default();
        let mut screen = CountingScreen::start(&timings, start);
        screen.rearm_hint(&timings, start + Duration::from_secs(5));
        // interval + one hint
        assert_eq!(screen.timers.len(), 2);
        let fired = screen.timers.poll(start + Duration::from_secs(10));
        assert!(!fired.contains(&ScreenTimer::IdleHint));
        let fired = screen.timers.poll(start + Duration::from_secs(15));
        assert!(fired.contains(&ScreenTimer::IdleHint));
    }

    #[test]
    fn test_zone_cursor_wraps() {
        let mut screen = CountingScreen::start(&Timings::default(), Instant::now());
        screen.move_zone(false);
        assert_eq!(screen.selected_zone(), Zone::Kelinci);
        screen.move_zone(true);
        assert_eq!(screen.selected_zone(), Zone::Kandang);
    }

    #[test]
    fn test_only_active_screens_have_timers() {
        assert!(Screen::Menu.timers_mut().is_none());
        let mut selecting = Screen::Memory(MemoryScreen::Selecting { cursor: Level::One });
        assert!(selecting.timers_mut().is_none());
        let mut onboarding = Screen::Onboarding(OnboardingForm::default());
        assert!(onboarding.timers_mut().is_some());
        assert_eq!(onboarding.step(), Step::Onboarding);
    }
}
