//! The session store: sole owner and writer of the [`Session`].
//!
//! Screens read the session through [`SessionStore::session`] and change it
//! only through the action methods below. Every action notifies all
//! subscribers synchronously, before the action returns, with the updated
//! session and a [`Change`] tag naming what moved.

use crate::domain::{
    AnalyticsUpdate, Avatar, DomainResult, GameKind, HistoryEntry, HistoryId, Level, NavEvent,
    NewHistoryEntry, Session, Step,
};
use tracing::{debug, info};

/// Which part of the session an action touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Change {
    UserName,
    Avatar,
    Step,
    Level,
    LastPlayedGame,
    Analytics,
    History,
    /// Every field except the history went back to its default
    Reset,
}

/// Handle returned by [`SessionStore::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&Session, Change)>;

/// Single source of truth for one play session.
///
/// # Examples
///
/// ```
/// use ceria::application::SessionStore;
/// use ceria::domain::{Avatar, Step};
///
/// let mut store = SessionStore::new();
/// store.set_user_name("Ardi");
/// store.set_avatar(Avatar::Lion);
/// store.set_step(Step::Menu);
///
/// let session = store.session();
/// assert_eq!(session.user_name, "Ardi");
/// assert_eq!(session.avatar, Some(Avatar::Lion));
/// assert_eq!(session.current_step, Step::Menu);
/// ```
#[derive(Default)]
pub struct SessionStore {
    session: Session,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl std::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionStore")
            .field("session", &self.session)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current snapshot of the session.
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn current_step(&self) -> Step {
        self.session.current_step
    }

    /// Registers a listener called after every mutation.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Session, Change) + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn notify(&mut self, change: Change) {
        debug!(?change, step = %self.session.current_step, "session changed");
        for (_, listener) in self.listeners.iter_mut() {
            listener(&self.session, change);
        }
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.session.user_name = name.into();
        self.notify(Change::UserName);
    }

    pub fn set_avatar(&mut self, avatar: Avatar) {
        self.session.avatar = Some(avatar);
        self.notify(Change::Avatar);
    }

    /// Moves to `step` unconditionally; no transition table is consulted.
    ///
    /// Use [`SessionStore::dispatch`] for checked navigation.
    pub fn set_step(&mut self, step: Step) {
        self.session.current_step = step;
        self.notify(Change::Step);
    }

    pub fn set_level(&mut self, level: Level) {
        self.session.level = level;
        self.notify(Change::Level);
    }

    pub fn set_last_played_game(&mut self, game: GameKind) {
        self.session.last_played_game = Some(game);
        self.notify(Change::LastPlayedGame);
    }

    /// Overwrites the given counters and leaves the others as they are.
    ///
    /// Values are absolute: callers pass `old + delta` when accumulating.
    pub fn update_analytics(&mut self, update: AnalyticsUpdate) {
        self.session.analytics.merge(update);
        self.notify(Change::Analytics);
    }

    /// Stamps `entry` with a fresh id and the current time and puts it at the
    /// front of the history.
    pub fn add_history(&mut self, entry: NewHistoryEntry) -> HistoryId {
        let record = HistoryEntry::record(entry);
        let id = record.id.clone();
        info!(
            game = %record.game,
            score = record.score,
            time_elapsed = record.time_elapsed,
            "game recorded"
        );
        self.session.history.insert(0, record);
        self.notify(Change::History);
        id
    }

    /// Clears profile, step, level, last game and counters. History is kept.
    pub fn reset_game(&mut self) {
        self.session.reset_keeping_history();
        self.notify(Change::Reset);
    }

    /// Handles a navigation event through the transition table.
    ///
    /// `PlayAgain` also resets the session. On error nothing changes and no
    /// subscriber is notified.
    pub fn dispatch(&mut self, event: NavEvent) -> DomainResult<Step> {
        let next = self.session.current_step.on(event)?;
        if event == NavEvent::PlayAgain {
            self.reset_game();
        } else {
            self.set_step(next);
        }
        Ok(next)
    }
}
