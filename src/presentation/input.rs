use crate::application::{App, MemoryScreen, OnboardingField, Screen};
use crate::domain::{Level, NavEvent, Zone};
use crossterm::event::{KeyCode, KeyModifiers};
use std::time::Instant;

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        Self::handle_key_event_at(app, key, modifiers, Instant::now());
    }

    /// Same as [`InputHandler::handle_key_event`] with an explicit clock.
    pub fn handle_key_event_at(
        app: &mut App,
        key: KeyCode,
        modifiers: KeyModifiers,
        now: Instant,
    ) {
        if modifiers.contains(KeyModifiers::CONTROL) && key == KeyCode::Char('c') {
            app.should_quit = true;
            return;
        }

        // Keep the message visible until the next key press
        app.status_message = None;

        if key == KeyCode::F(2) {
            app.toggle_sound();
            return;
        }
        if key == KeyCode::F(3) {
            app.toggle_music();
            return;
        }

        match app.screen {
            Screen::Onboarding(_) => Self::handle_onboarding(app, key, now),
            Screen::Menu => Self::handle_menu(app, key, now),
            Screen::Memory(MemoryScreen::Selecting { .. }) => {
                Self::handle_level_select(app, key, now)
            }
            Screen::Memory(MemoryScreen::Playing(_)) => Self::handle_memory(app, key, now),
            Screen::Counting(_) => Self::handle_counting(app, key, now),
            Screen::Summary => Self::handle_summary(app, key, now),
            Screen::Stats => Self::handle_stats(app, key, now),
        }
    }

    fn handle_onboarding(app: &mut App, key: KeyCode, now: Instant) {
        let focus = match &app.screen {
            Screen::Onboarding(form) => form.focus,
            _ => return,
        };
        match key {
            KeyCode::Enter => app.submit_onboarding(now),
            KeyCode::Tab | KeyCode::BackTab => app.toggle_onboarding_focus(),
            KeyCode::Left => app.choose_avatar(false),
            KeyCode::Right => app.choose_avatar(true),
            KeyCode::Backspace if focus == OnboardingField::Name => app.delete_name_char(),
            KeyCode::Char(c) if focus == OnboardingField::Name => app.type_name_char(c),
            _ => {}
        }
    }

    fn handle_menu(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Char('1') => app.open_from_menu(NavEvent::OpenMemoryGame, now),
            KeyCode::Char('2') => app.open_from_menu(NavEvent::OpenCountingGame, now),
            KeyCode::Char('3') | KeyCode::Char('s') => app.open_from_menu(NavEvent::OpenStats, now),
            KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
            _ => {}
        }
    }

    fn handle_level_select(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_level_cursor(false),
            KeyCode::Down | KeyCode::Char('j') => app.move_level_cursor(true),
            KeyCode::Enter | KeyCode::Char(' ') => app.start_selected_level(now),
            KeyCode::Char(c @ '1'..='3') => {
                if let Some(level) = c.to_digit(10).and_then(|n| Level::try_from(n as u8).ok()) {
                    app.start_memory_game(level, now);
                }
            }
            KeyCode::Esc => app.leave_memory_game(now),
            _ => {}
        }
    }

    fn handle_memory(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Up | KeyCode::Char('k') => app.move_card_cursor(-1, 0),
            KeyCode::Down | KeyCode::Char('j') => app.move_card_cursor(1, 0),
            KeyCode::Left | KeyCode::Char('h') => app.move_card_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => app.move_card_cursor(0, 1),
            KeyCode::Enter | KeyCode::Char(' ') => app.flip_selected_card(now),
            KeyCode::Char('r') => app.restart_memory_game(now),
            KeyCode::Esc => app.leave_memory_game(now),
            _ => {}
        }
    }

    fn handle_counting(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Left | KeyCode::Char('h') => app.move_zone_cursor(false, now),
            KeyCode::Right | KeyCode::Char('l') => app.move_zone_cursor(true, now),
            KeyCode::Enter => app.confirm_counting(now),
            KeyCode::Char(' ') => app.drop_item(None, now),
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                app.drop_item(Some(Zone::ALL[index]), now);
            }
            KeyCode::Backspace => app.return_item(false, now),
            KeyCode::Char('x') => app.return_item(true, now),
            KeyCode::Char('c') => app.check_answer(now),
            KeyCode::Char('n') => app.next_question(now),
            KeyCode::Esc => app.back_to_menu(now),
            _ => {}
        }
    }

    fn handle_summary(app: &mut App, key: KeyCode, now: Instant) {
        match key {
            KeyCode::Enter | KeyCode::Char('p') => app.play_again(now),
            KeyCode::Char('m') | KeyCode::Esc => app.back_to_menu(now),
            _ => {}
        }
    }

    fn handle_stats(app: &mut App, key: KeyCode, now: Instant) {
        if matches!(key, KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('m')) {
            app.back_to_menu(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::App;
    use crate::domain::{Avatar, Step};
    use std::time::Duration;

    fn press(app: &mut App, key: KeyCode, now: Instant) {
        InputHandler::handle_key_event_at(app, key, KeyModifiers::NONE, now);
    }

    fn type_text(app: &mut App, text: &str, now: Instant) {
        for c in text.chars() {
            press(app, KeyCode::Char(c), now);
        }
    }

    fn at_menu(now: Instant) -> App {
        let mut app = App::default().with_seed(5);
        type_text(&mut app, "Sari", now);
        press(&mut app, KeyCode::Right, now);
        press(&mut app, KeyCode::Right, now);
        press(&mut app, KeyCode::Enter, now);
        app.on_tick(now + Duration::from_secs(2));
        assert_eq!(app.store.current_step(), Step::Menu);
        app
    }

    #[test]
    fn test_onboarding_keys() {
        let now = Instant::now();
        let app = at_menu(now);
        assert_eq!(app.store.session().user_name, "Sari");
        assert_eq!(app.store.session().avatar, Some(Avatar::Rabbit));
    }

    #[test]
    fn test_typing_ignored_on_avatar_field() {
        let now = Instant::now();
        let mut app = App::default();
        type_text(&mut app, "Bo", now);
        press(&mut app, KeyCode::Tab, now);
        type_text(&mut app, "xy", now);
        press(&mut app, KeyCode::Backspace, now);
        match &app.screen {
            Screen::Onboarding(form) => {
                assert_eq!(form.name, "Bo");
                assert_eq!(form.focus, OnboardingField::Avatar);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_menu_keys_open_screens() {
        let now = Instant::now();
        let mut app = at_menu(now);
        press(&mut app, KeyCode::Char('3'), now);
        assert_eq!(app.store.current_step(), Step::Stats);
        press(&mut app, KeyCode::Esc, now);
        assert_eq!(app.store.current_step(), Step::Menu);
        press(&mut app, KeyCode::Char('2'), now);
        assert_eq!(app.store.current_step(), Step::Game2);
        press(&mut app, KeyCode::Esc, now);
        press(&mut app, KeyCode::Char('1'), now);
        assert_eq!(app.store.current_step(), Step::Game1);
    }

    #[test]
    fn test_quit_from_menu_only() {
        let now = Instant::now();
        let mut app = App::default();
        press(&mut app, KeyCode::Char('q'), now);
        assert!(!app.should_quit);

        let mut app = at_menu(now);
        press(&mut app, KeyCode::Char('q'), now);
        assert!(app.should_quit);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(app.should_quit);
    }

    #[test]
    fn test_f2_toggles_sound() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::F(2), KeyModifiers::NONE);
        assert!(!app.sound_enabled);
        assert!(app.status_message.is_some());
        InputHandler::handle_key_event(&mut app, KeyCode::F(2), KeyModifiers::NONE);
        assert!(app.sound_enabled);
    }

    #[test]
    fn test_f3_toggles_music_only() {
        let mut app = App::default();
        InputHandler::handle_key_event(&mut app, KeyCode::F(3), KeyModifiers::NONE);
        assert!(app.music_on);
        assert!(app.sound_enabled);
        assert_eq!(app.status_message.as_deref(), Some("Musik: nyala"));
        InputHandler::handle_key_event(&mut app, KeyCode::F(3), KeyModifiers::NONE);
        assert!(!app.music_on);
    }

    #[test]
    fn test_level_keys() {
        let now = Instant::now();
        let mut app = at_menu(now);
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('3'), now);
        assert_eq!(app.store.session().level, Level::Three);
        match &app.screen {
            Screen::Memory(MemoryScreen::Playing(round)) => assert_eq!(round.game.cards().len(), 8),
            other => panic!("unexpected screen {other:?}"),
        }

        press(&mut app, KeyCode::Esc, now);
        assert!(matches!(
            app.screen,
            Screen::Memory(MemoryScreen::Selecting { cursor: Level::Three })
        ));
        press(&mut app, KeyCode::Up, now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.store.session().level, Level::Two);
    }

    #[test]
    fn test_memory_keys_flip_under_cursor() {
        let now = Instant::now();
        let mut app = at_menu(now);
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('2'), now);
        press(&mut app, KeyCode::Right, now);
        press(&mut app, KeyCode::Down, now);
        press(&mut app, KeyCode::Char(' '), now);

        match &app.screen {
            Screen::Memory(MemoryScreen::Playing(round)) => {
                assert_eq!(round.cursor, 4);
                assert!(round.game.cards()[4].is_visible());
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_counting_keys() {
        let now = Instant::now();
        let mut app = at_menu(now);
        press(&mut app, KeyCode::Char('2'), now);
        press(&mut app, KeyCode::Char('3'), now);
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Char('1'), now);
        press(&mut app, KeyCode::Backspace, now);
        press(&mut app, KeyCode::Char('c'), now);
        assert_eq!(app.caption.as_deref(), Some("Hebat! Jawabanmu benar!"));

        press(&mut app, KeyCode::Char('n'), now);
        match &app.screen {
            Screen::Counting(screen) => {
                assert_eq!(screen.game.question_index(), 1);
                assert_eq!(screen.game.wrong_checks(), 0);
            }
            other => panic!("unexpected screen {other:?}"),
        }
    }

    #[test]
    fn test_summary_keys() {
        let now = Instant::now();
        let mut app = at_menu(now);
        app.store.set_step(Step::Summary);
        app.on_tick(now);
        press(&mut app, KeyCode::Char('m'), now);
        assert_eq!(app.store.current_step(), Step::Menu);

        app.store.set_step(Step::Summary);
        app.on_tick(now);
        press(&mut app, KeyCode::Enter, now);
        assert_eq!(app.store.current_step(), Step::Onboarding);
        assert!(app.store.session().avatar.is_none());
    }
}
