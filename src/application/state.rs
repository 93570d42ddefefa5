//! Application state for the terminal learning games.
//!
//! [`App`] ties the session store to the mounted screen. Input handlers and
//! the event-loop tick call into it; it mutates the store through its
//! actions, raises navigation events, emits audio cues and mounts a fresh
//! screen whenever the store reports a step change.

use super::screens::{
    CountingScreen, MemoryRound, MemoryScreen, OnboardingForm, Screen, ScreenTimer, Timings,
};
use super::store::{Change, SessionStore};
use crate::domain::{
    Advance, AnalyticsUpdate, Avatar, CheckOutcome, DropOutcome, FlipOutcome, GameKind, Level,
    MemoryGame, NavEvent, NewHistoryEntry, Step, Zone,
};
use crate::infrastructure::audio::{AudioChannel, Cue, Voice};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;
use tracing::{debug, warn};

/// Score recorded for a finished memory game.
pub const MEMORY_GAME_SCORE: u32 = 100;

/// Pitch used for the onboarding greeting.
const GREETING_PITCH: f32 = 1.3;

/// Main application state: the session store plus the mounted screen.
///
/// # Examples
///
/// ```
/// use ceria::application::App;
/// use ceria::domain::Step;
///
/// let app = App::default();
/// assert_eq!(app.store.current_step(), Step::Onboarding);
/// assert!(!app.should_quit);
/// ```
pub struct App {
    pub store: SessionStore,
    pub screen: Screen,
    pub timings: Timings,
    pub voice: Voice,
    /// Cues and speech are sent only while this is set
    pub sound_enabled: bool,
    /// Background-music flag last sent to the audio worker
    pub music_on: bool,
    /// Last line spoken to the child, shown as a caption
    pub caption: Option<String>,
    /// Temporary status message to display
    pub status_message: Option<String>,
    pub should_quit: bool,
    audio: AudioChannel,
    step_changed: Rc<Cell<bool>>,
    rng: StdRng,
}

impl std::fmt::Debug for App {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("App")
            .field("store", &self.store)
            .field("screen", &self.screen)
            .field("sound_enabled", &self.sound_enabled)
            .field("music_on", &self.music_on)
            .field("caption", &self.caption)
            .finish()
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new(AudioChannel::detached(), Timings::default(), Voice::default())
    }
}

impl App {
    /// Builds an app on the onboarding screen that sends sound to `audio`.
    ///
    /// Music starts off; the caller switches it on with [`App::toggle_music`].
    pub fn new(audio: AudioChannel, timings: Timings, voice: Voice) -> Self {
        let mut store = SessionStore::new();
        let step_changed = Rc::new(Cell::new(false));
        let flag = Rc::clone(&step_changed);
        store.subscribe(move |_, change| {
            if matches!(change, Change::Step | Change::Reset) {
                flag.set(true);
            }
        });

        Self {
            store,
            screen: Screen::Onboarding(OnboardingForm::default()),
            timings,
            voice,
            sound_enabled: true,
            music_on: false,
            caption: None,
            status_message: None,
            should_quit: false,
            audio,
            step_changed,
            rng: StdRng::from_os_rng(),
        }
    }

    /// Replaces the deck shuffler with a seeded one.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    /// Mutes or unmutes cues and speech. Captions stay on screen either way.
    pub fn toggle_sound(&mut self) {
        self.sound_enabled = !self.sound_enabled;
        self.status_message = Some(if self.sound_enabled {
            "Suara: nyala".to_string()
        } else {
            "Suara: mati".to_string()
        });
    }

    /// Switches the background music on or off, independently of the cues.
    pub fn toggle_music(&mut self) {
        self.music_on = !self.music_on;
        self.audio.music(self.music_on);
        self.status_message = Some(if self.music_on {
            "Musik: nyala".to_string()
        } else {
            "Musik: mati".to_string()
        });
    }

    /// Sends a tone cue unless sound is muted.
    fn cue(&self, cue: Cue) {
        if self.sound_enabled {
            self.audio.cue(cue);
        }
    }

    /// Speaks `text` with the configured voice.
    fn speak(&mut self, text: impl Into<String>) {
        let voice = self.voice.clone();
        self.speak_with(text, voice);
    }

    /// Shows `text` as the caption and, unless muted, sends it for speech.
    fn speak_with(&mut self, text: impl Into<String>, voice: Voice) {
        let text = text.into();
        if self.sound_enabled {
            self.audio.speak(text.clone(), voice);
        }
        self.caption = Some(text);
    }

    /// Raises a navigation event and mounts the resulting screen.
    ///
    /// Events the current step does not accept are logged and ignored; the
    /// mounted screen and its timers stay as they are.
    pub fn navigate(&mut self, event: NavEvent, now: Instant) {
        if let Err(err) = self.store.dispatch(event) {
            warn!("navigation refused: {err}");
            return;
        }
        self.sync_screen(now);
    }

    /// Mounts the screen for the store's current step if it changed.
    ///
    /// The previous screen is dropped, which cancels all of its timers.
    fn sync_screen(&mut self, now: Instant) {
        if !self.step_changed.replace(false) {
            return;
        }
        let step = self.store.current_step();
        if step == self.screen.step() && step != Step::Onboarding {
            return;
        }
        debug!(%step, "mounting screen");
        self.status_message = None;
        self.caption = None;
        self.screen = match step {
            Step::Onboarding => Screen::Onboarding(OnboardingForm::default()),
            Step::Menu => Screen::Menu,
            Step::Game1 => Screen::Memory(MemoryScreen::Selecting {
                cursor: self.store.session().level,
            }),
            Step::Game2 => {
                let screen = CountingScreen::start(&self.timings, now);
                let question = screen.game.question().text;
                self.speak(question);
                Screen::Counting(screen)
            }
            Step::Summary => Screen::Summary,
            Step::Stats => Screen::Stats,
        };
    }

    /// Mounts any pending step change, then fires every timer of the mounted
    /// screen that is due at `now`.
    pub fn on_tick(&mut self, now: Instant) {
        self.sync_screen(now);
        let mounted = self.screen.step();
        let fired = match self.screen.timers_mut() {
            Some(timers) => timers.poll(now),
            None => return,
        };
        for event in fired {
            if self.screen.step() != mounted {
                break;
            }
            self.on_timer(event, now);
        }
    }

    /// Applies one fired timer. Timers that no longer match the mounted
    /// screen are ignored.
    fn on_timer(&mut self, event: ScreenTimer, now: Instant) {
        match (event, &mut self.screen) {
            (ScreenTimer::Greeted, Screen::Onboarding(_)) => {
                self.navigate(NavEvent::Greeted, now);
            }
            (ScreenTimer::NudgeOver, Screen::Onboarding(form)) => form.nudge = false,
            (ScreenTimer::Second, Screen::Memory(MemoryScreen::Playing(round))) => {
                round.elapsed += 1;
            }
            (ScreenTimer::Second, Screen::Counting(screen)) => screen.elapsed += 1,
            (ScreenTimer::ErrorCue, _) => self.cue(Cue::Error),
            (ScreenTimer::ResolvePair, Screen::Memory(MemoryScreen::Playing(round))) => {
                round.game.resolve();
                if round.game.is_won() {
                    self.finish_memory_game(now);
                }
            }
            (ScreenTimer::IdleHint, Screen::Counting(screen)) => {
                screen.rearm_hint(&self.timings, now);
                let question = screen.game.question().text;
                self.speak(question);
            }
            _ => {}
        }
    }

    // --- onboarding ---

    /// Appends to the name field unless the greeting is already playing.
    pub fn type_name_char(&mut self, c: char) {
        if let Screen::Onboarding(form) = &mut self.screen {
            if !form.waiting {
                form.name.push(c);
            }
        }
    }

    /// Removes the last character of the name.
    pub fn delete_name_char(&mut self) {
        if let Screen::Onboarding(form) = &mut self.screen {
            if !form.waiting {
                form.name.pop();
            }
        }
    }

    /// Cycles the avatar choice; the first press picks the first animal.
    pub fn choose_avatar(&mut self, forward: bool) {
        if let Screen::Onboarding(form) = &mut self.screen {
            if !form.waiting {
                form.avatar = Some(Avatar::cycle(form.avatar, forward));
            }
        }
    }

    /// Moves focus between the name field and the avatar row.
    pub fn toggle_onboarding_focus(&mut self) {
        if let Screen::Onboarding(form) = &mut self.screen {
            form.toggle_focus();
        }
    }

    /// Accepts the name and avatar, greets the child and opens the menu
    /// after the greeting delay. Refuses with a nudge while incomplete.
    pub fn submit_onboarding(&mut self, now: Instant) {
        let Screen::Onboarding(form) = &mut self.screen else {
            return;
        };
        if form.waiting {
            return;
        }
        let (name, avatar) = match (form.name.trim(), form.avatar) {
            (name, Some(avatar)) if !name.is_empty() => (name.to_string(), avatar),
            _ => {
                form.nudge = true;
                form.timers.after(self.timings.nudge, ScreenTimer::NudgeOver, now);
                self.status_message = Some("Tulis nama dan pilih teman main dulu ya!".to_string());
                return;
            }
        };
        form.waiting = true;
        form.timers
            .after(self.timings.greeting_delay, ScreenTimer::Greeted, now);

        self.status_message = None;
        self.store.set_user_name(name.clone());
        self.store.set_avatar(avatar);
        let voice = Voice {
            pitch: GREETING_PITCH,
            ..self.voice.clone()
        };
        self.speak_with(
            format!(
                "Halo {}, ayo kita bermain bersama {}!",
                name,
                avatar.local_name()
            ),
            voice,
        );
    }

    // --- menu ---

    /// Plays the click cue and raises `event`. Ignored off the menu.
    pub fn open_from_menu(&mut self, event: NavEvent, now: Instant) {
        if !matches!(self.screen, Screen::Menu) {
            return;
        }
        self.cue(Cue::Flip);
        self.navigate(event, now);
    }

    // --- memory game ---

    /// Moves the level cursor, clamped to the first and last level.
    pub fn move_level_cursor(&mut self, forward: bool) {
        if let Screen::Memory(MemoryScreen::Selecting { cursor }) = &mut self.screen {
            let index = Level::ALL.iter().position(|l| l == cursor).unwrap_or(0);
            let next = if forward {
                (index + 1).min(Level::ALL.len() - 1)
            } else {
                index.saturating_sub(1)
            };
            *cursor = Level::ALL[next];
        }
    }

    /// Deals a new deck at `level` and starts the clock.
    ///
    /// The level is stored in the session so the selector reopens on it.
    /// Does nothing outside the memory game.
    pub fn start_memory_game(&mut self, level: Level, now: Instant) {
        if !matches!(self.screen, Screen::Memory(_)) {
            return;
        }
        self.store.set_level(level);
        let game = MemoryGame::deal(level, &mut self.rng);
        self.caption = None;
        self.screen = Screen::Memory(MemoryScreen::Playing(MemoryRound::start(game, now)));
    }

    /// Starts a game at the level under the cursor.
    pub fn start_selected_level(&mut self, now: Instant) {
        if let Screen::Memory(MemoryScreen::Selecting { cursor }) = self.screen {
            self.start_memory_game(cursor, now);
        }
    }

    /// Deals again at the current level, cancelling the running clock.
    pub fn restart_memory_game(&mut self, now: Instant) {
        if let Screen::Memory(MemoryScreen::Playing(round)) = &mut self.screen {
            round.timers.clear();
            let level = round.game.level();
            self.start_memory_game(level, now);
        }
    }

    /// Moves the card cursor by whole rows and columns, clamped to the board.
    pub fn move_card_cursor(&mut self, rows: isize, cols: isize) {
        if let Screen::Memory(MemoryScreen::Playing(round)) = &mut self.screen {
            round.move_cursor(rows, cols);
        }
    }

    /// Flips the card under the cursor.
    ///
    /// A reveal plays the flip cue. A match also plays the success cue and
    /// names the animal. Mismatches are hidden again by the round's timers,
    /// and the last match finishes the game once its pair resolves.
    pub fn flip_selected_card(&mut self, now: Instant) {
        let Screen::Memory(MemoryScreen::Playing(round)) = &mut self.screen else {
            return;
        };
        let outcome = round.flip(&self.timings, now);
        match outcome {
            FlipOutcome::Busy | FlipOutcome::Repeated => {}
            FlipOutcome::Revealed | FlipOutcome::Mismatch { .. } => self.cue(Cue::Flip),
            FlipOutcome::Match { label, .. } => {
                self.cue(Cue::Flip);
                self.cue(Cue::Match);
                self.speak(format!("Hebat! Ini {label}!"));
            }
        }
    }

    /// Leaves a running round for level selection, or the game for the menu.
    pub fn leave_memory_game(&mut self, now: Instant) {
        match &self.screen {
            Screen::Memory(MemoryScreen::Playing(round)) => {
                let cursor = round.game.level();
                self.caption = None;
                self.screen = Screen::Memory(MemoryScreen::Selecting { cursor });
            }
            Screen::Memory(MemoryScreen::Selecting { .. }) => {
                self.navigate(NavEvent::BackToMenu, now);
            }
            _ => {}
        }
    }

    /// Records a won round: adds its counters to the session totals, prepends
    /// a history entry and moves on to the summary.
    fn finish_memory_game(&mut self, now: Instant) {
        let Screen::Memory(MemoryScreen::Playing(round)) = &mut self.screen else {
            return;
        };
        round.timers.clear();
        let elapsed = round.elapsed;
        let (wrong, repeated, attempts) = (
            round.game.wrong_clicks,
            round.game.repeated_clicks,
            round.game.attempts,
        );

        let totals = self.store.session().analytics;
        self.store.update_analytics(
            AnalyticsUpdate::default()
                .wrong_clicks(totals.wrong_clicks.saturating_add(wrong))
                .repeated_clicks(totals.repeated_clicks.saturating_add(repeated))
                .attempts(totals.attempts.saturating_add(attempts)),
        );
        self.store.add_history(NewHistoryEntry {
            game: GameKind::Game1,
            score: MEMORY_GAME_SCORE,
            time_elapsed: elapsed,
        });
        self.store.set_last_played_game(GameKind::Game1);
        self.navigate(NavEvent::Finished(GameKind::Game1), now);
    }

    // --- counting game ---

    /// Moves the zone cursor and restarts the idle-hint countdown.
    pub fn move_zone_cursor(&mut self, forward: bool, now: Instant) {
        if let Screen::Counting(screen) = &mut self.screen {
            screen.move_zone(forward);
            screen.rearm_hint(&self.timings, now);
        }
    }

    /// Drops one item into `zone`, or into the zone under the cursor.
    ///
    /// Only the zone named by the question accepts items; any other zone
    /// buzzes and leaves the board unchanged.
    pub fn drop_item(&mut self, zone: Option<Zone>, now: Instant) {
        let Screen::Counting(screen) = &mut self.screen else {
            return;
        };
        screen.rearm_hint(&self.timings, now);
        let zone = zone.unwrap_or_else(|| screen.selected_zone());
        match screen.game.drop_into(zone) {
            DropOutcome::Accepted => self.cue(Cue::Flip),
            DropOutcome::WrongZone => {
                self.cue(Cue::Error);
                self.status_message = Some(format!("Bukan ke {} ya!", zone.label()));
            }
            DropOutcome::PoolEmpty | DropOutcome::Locked => {}
        }
    }

    /// Puts the last dropped item back in the pool, or all of them.
    pub fn return_item(&mut self, all: bool, now: Instant) {
        if let Screen::Counting(screen) = &mut self.screen {
            screen.rearm_hint(&self.timings, now);
            if all {
                screen.game.return_all();
            } else {
                screen.game.return_one();
            }
        }
    }

    /// Checks the dropped count and speaks the verdict.
    ///
    /// A wrong answer costs points; an empty drop area only shows a reminder.
    pub fn check_answer(&mut self, now: Instant) {
        let Screen::Counting(screen) = &mut self.screen else {
            return;
        };
        screen.rearm_hint(&self.timings, now);
        match screen.game.check() {
            CheckOutcome::Nothing => {
                self.status_message = Some("Pindahkan dulu hewannya ya!".to_string());
            }
            CheckOutcome::Correct => {
                self.cue(Cue::Match);
                self.speak("Hebat! Jawabanmu benar!");
            }
            CheckOutcome::TooFew => {
                self.cue(Cue::Error);
                self.speak("Masih kurang, ayo tambah lagi!");
            }
            CheckOutcome::TooMany => {
                self.cue(Cue::Error);
                self.speak("Kebanyakan! Coba kurangi.");
            }
        }
    }

    /// Goes to the next question, or records the round when it was the last.
    ///
    /// Does nothing until the current answer has been checked as correct.
    /// The recorded score is 100 minus the penalty for wrong checks.
    pub fn next_question(&mut self, now: Instant) {
        let Screen::Counting(screen) = &mut self.screen else {
            return;
        };
        screen.rearm_hint(&self.timings, now);
        match screen.game.advance() {
            Advance::NotReady => {}
            Advance::NextQuestion => {
                let question = screen.game.question().text;
                self.status_message = None;
                self.speak(question);
            }
            Advance::Finished => {
                screen.timers.clear();
                let entry = NewHistoryEntry {
                    game: GameKind::Game2,
                    score: screen.game.score(),
                    time_elapsed: screen.elapsed,
                };
                self.store.add_history(entry);
                self.store.set_last_played_game(GameKind::Game2);
                self.navigate(NavEvent::Finished(GameKind::Game2), now);
            }
        }
    }

    /// Enter on the counting board: drop while answering, continue once correct.
    pub fn confirm_counting(&mut self, now: Instant) {
        let locked = matches!(&self.screen, Screen::Counting(screen) if screen.game.is_locked());
        if locked {
            self.next_question(now);
        } else {
            self.drop_item(None, now);
        }
    }

    // --- summary and stats ---

    /// Clears the session except its history and returns to onboarding.
    pub fn play_again(&mut self, now: Instant) {
        if matches!(self.screen, Screen::Summary) {
            self.navigate(NavEvent::PlayAgain, now);
        }
    }

    /// Returns to the menu from any game, summary or stats screen.
    pub fn back_to_menu(&mut self, now: Instant) {
        self.navigate(NavEvent::BackToMenu, now);
    }
}
