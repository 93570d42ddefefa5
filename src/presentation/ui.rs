use crate::application::{
    App, CountingScreen, MemoryRound, MemoryScreen, OnboardingField, OnboardingForm, Screen,
};
use crate::domain::{
    format_time, Assessment, Avatar, CheckOutcome, Face, GameKind, Level, LearningStats, Zone,
};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, Wrap},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    match &app.screen {
        Screen::Onboarding(form) => render_onboarding(f, form, chunks[1]),
        Screen::Menu => render_menu(f, app, chunks[1]),
        Screen::Memory(MemoryScreen::Selecting { cursor }) => {
            render_level_select(f, *cursor, chunks[1])
        }
        Screen::Memory(MemoryScreen::Playing(round)) => render_memory(f, round, chunks[1]),
        Screen::Counting(screen) => render_counting(f, screen, chunks[1]),
        Screen::Summary => render_summary(f, app, chunks[1]),
        Screen::Stats => render_stats(f, app, chunks[1]),
    }
    render_caption(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let session = app.store.session();
    let player = match session.avatar {
        Some(avatar) if !session.user_name.is_empty() => {
            format!(" | {} {}", avatar.emoji(), session.user_name)
        }
        _ => String::new(),
    };
    let on_off = |on: bool| if on { "nyala" } else { "mati" };
    let header = Paragraph::new(format!(
        "Dunia Hewan Ceria{} | Suara: {} (F2) | Musik: {} (F3)",
        player,
        on_off(app.sound_enabled),
        on_off(app.music_on)
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn highlight(selected: bool) -> Style {
    if selected {
        Style::default().bg(Color::Blue).fg(Color::White)
    } else {
        Style::default()
    }
}

fn render_onboarding(f: &mut Frame, form: &OnboardingForm, area: Rect) {
    let name_style = if form.focus == OnboardingField::Name {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let mut avatars = vec![Span::raw("Teman main: ")];
    for avatar in Avatar::ALL {
        let selected = form.avatar == Some(avatar);
        avatars.push(Span::styled(
            format!(" {} {} ", avatar.emoji(), avatar.local_name()),
            highlight(selected),
        ));
        avatars.push(Span::raw(" "));
    }
    if form.focus == OnboardingField::Avatar {
        avatars.push(Span::styled("◀ ▶", Style::default().fg(Color::Yellow)));
    }

    let mut lines = vec![
        Line::from("Halo! Siapa namamu?"),
        Line::from(""),
        Line::from(vec![
            Span::raw("Nama: "),
            Span::styled(format!("{}_", form.name), name_style),
        ]),
        Line::from(""),
        Line::from(avatars),
        Line::from(""),
    ];
    if form.waiting {
        lines.push(Line::styled(
            "Sebentar ya...",
            Style::default().fg(Color::Green),
        ));
    } else if form.is_complete() {
        lines.push(Line::styled(
            "Tekan Enter untuk mulai!",
            Style::default().fg(Color::Green),
        ));
    }

    let border = if form.nudge {
        Style::default().fg(Color::Red)
    } else {
        Style::default()
    };
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title("Kenalan Dulu"),
        );
    f.render_widget(widget, area);
}

fn render_menu(f: &mut Frame, app: &App, area: Rect) {
    let name = &app.store.session().user_name;
    let lines = vec![
        Line::from(format!("Mau main apa hari ini, {}?", name)),
        Line::from(""),
        Line::from(format!("1  {}", GameKind::Game1.title())),
        Line::from(format!("2  {}", GameKind::Game2.title())),
        Line::from("3  Statistik Belajar"),
        Line::from(""),
        Line::styled("q  Keluar", Style::default().fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL).title("Menu"));
    f.render_widget(widget, area);
}

fn render_level_select(f: &mut Frame, cursor: Level, area: Rect) {
    let mut lines = vec![Line::from("Pilih level:"), Line::from("")];
    for level in Level::ALL {
        lines.push(Line::styled(
            format!(" Level {} ({} pasang) ", level.number(), level.pairs()),
            highlight(level == cursor),
        ));
    }
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(GameKind::Game1.title()),
        );
    f.render_widget(widget, area);
}

fn render_memory(f: &mut Frame, round: &MemoryRound, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Min(0)])
        .split(area);

    let game = &round.game;
    let info = Paragraph::new(format!(
        "Level {} | Waktu {} | Percobaan {} | Pasangan {}/{}",
        game.level().number(),
        format_time(round.elapsed),
        game.attempts,
        game.matched_pairs(),
        game.level().pairs()
    ))
    .style(Style::default().fg(Color::Yellow));
    f.render_widget(info, chunks[0]);

    let columns = game.level().columns();
    let rows: Vec<Row> = game
        .cards()
        .chunks(columns)
        .map(|cards| {
            let cells: Vec<Cell> = cards
                .iter()
                .map(|card| {
                    let text = if card.is_visible() { card.label } else { "?" };
                    let style = if card.id == round.cursor {
                        highlight(true)
                    } else {
                        match card.face {
                            Face::Matched => Style::default().fg(Color::Green),
                            Face::Revealed => Style::default().fg(Color::Yellow),
                            Face::Hidden => Style::default().fg(Color::Magenta),
                        }
                    };
                    Cell::from(format!(" {} ", text)).style(style)
                })
                .collect();
            Row::new(cells).height(2)
        })
        .collect();
    let widths = vec![Constraint::Length(11); columns];
    let table = Table::new(rows, widths)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(GameKind::Game1.title()),
        )
        .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn render_counting(f: &mut Frame, screen: &CountingScreen, area: Rect) {
    let game = &screen.game;
    let question = game.question();
    let icon = question.item.icon();

    let mut zones = Vec::new();
    for (i, zone) in Zone::ALL.iter().enumerate() {
        let count = if *zone == question.zone {
            game.dropped().len()
        } else {
            0
        };
        zones.push(Span::styled(
            format!(" {} {} ({}) ", zone.icon(), zone.label(), count),
            highlight(i == screen.zone_cursor),
        ));
        zones.push(Span::raw(" "));
    }

    let verdict = match game.verdict() {
        Some(CheckOutcome::Correct) => {
            Line::styled("Benar! Tekan Enter untuk lanjut", Style::default().fg(Color::Green))
        }
        Some(CheckOutcome::TooFew) => Line::styled("Masih kurang", Style::default().fg(Color::Red)),
        Some(CheckOutcome::TooMany) => Line::styled("Kebanyakan", Style::default().fg(Color::Red)),
        _ => Line::from(""),
    };

    let lines = vec![
        Line::from(format!(
            "Soal {}/{} | Waktu {} | ⭐ {}",
            game.question_index() + 1,
            game.question_count(),
            format_time(screen.elapsed),
            game.stars()
        ))
        .style(Style::default().fg(Color::Yellow)),
        Line::from(""),
        Line::styled(question.text, Style::default().add_modifier(Modifier::BOLD)),
        Line::from(""),
        Line::from(format!("Keranjang: {}", icon.repeat(game.pool().len()))),
        Line::from(""),
        Line::from(zones),
        Line::from(""),
        Line::from(format!("Di {}: {}", question.zone.label(), icon.repeat(game.dropped().len()))),
        Line::from(""),
        verdict,
    ];
    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(GameKind::Game2.title()),
        );
    f.render_widget(widget, area);
}

fn render_summary(f: &mut Frame, app: &App, area: Rect) {
    let assessment = Assessment::for_session(app.store.session());
    let mut lines = vec![
        Line::styled(
            assessment.title.clone(),
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ),
        Line::from(""),
        Line::from(format!("Waktu: {}", format_time(assessment.time_elapsed))),
        Line::from(format!("Skor: {}", assessment.score)),
        Line::from(""),
    ];
    for (label, value) in &assessment.rows {
        lines.push(Line::from(format!("{}: {}", label, value)));
    }
    lines.push(Line::from(""));
    lines.push(Line::styled(
        "Enter: main lagi | m: menu",
        Style::default().fg(Color::DarkGray),
    ));

    let widget = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Hasil {}", assessment.game.title())),
        );
    f.render_widget(widget, area);
}

fn render_stats(f: &mut Frame, app: &App, area: Rect) {
    let stats = LearningStats::from_history(&app.store.session().history);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(2), Constraint::Min(0)])
        .split(area);

    let totals = Paragraph::new(format!(
        "Total skor {}: {} | Main {}: {} kali",
        GameKind::Game1.title(),
        stats.memory_total_score,
        GameKind::Game2.title(),
        stats.counting_plays
    ))
    .style(Style::default().fg(Color::Yellow));
    f.render_widget(totals, chunks[0]);

    let header = Row::new(vec!["Permainan", "Skor", "Waktu", "Tanggal"])
        .style(Style::default().fg(Color::Yellow))
        .height(1);
    let rows: Vec<Row> = stats
        .recent
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.game.title()),
                Cell::from(entry.score.to_string()),
                Cell::from(format_time(entry.time_elapsed)),
                Cell::from(entry.timestamp.format("%d/%m %H:%M").to_string()),
            ])
        })
        .collect();
    let widths = [
        Constraint::Length(18),
        Constraint::Length(6),
        Constraint::Length(7),
        Constraint::Length(12),
    ];
    let title = if rows.is_empty() {
        "Statistik Belajar (belum ada permainan)"
    } else {
        "Statistik Belajar"
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title(title))
        .column_spacing(1);
    f.render_widget(table, chunks[1]);
}

fn render_caption(f: &mut Frame, app: &App, area: Rect) {
    let caption = Paragraph::new(app.caption.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Green))
        .block(Block::default().borders(Borders::ALL).title("🔊"));
    f.render_widget(caption, area);
}

fn key_hints(screen: &Screen) -> &'static str {
    match screen {
        Screen::Onboarding(_) => "Ketik nama | Tab: pilih teman | ←→: ganti teman | Enter: mulai",
        Screen::Menu => "1/2/3: pilih | q: keluar",
        Screen::Memory(MemoryScreen::Selecting { .. }) => "↑↓: pilih level | Enter: mulai | Esc: menu",
        Screen::Memory(MemoryScreen::Playing(_)) => {
            "Panah: pindah | Spasi/Enter: buka kotak | r: ulang | Esc: level"
        }
        Screen::Counting(_) => {
            "←→: pilih tempat | Enter: taruh | Backspace: ambil | c: cek | n: lanjut | Esc: menu"
        }
        Screen::Summary => "Enter: main lagi | m: menu",
        Screen::Stats => "Esc: menu",
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let (text, style) = match &app.status_message {
        Some(status) => (status.clone(), Style::default().fg(Color::Yellow)),
        None => (key_hints(&app.screen).to_string(), Style::default()),
    };
    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(style);
    f.render_widget(status, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{NavEvent, NewHistoryEntry, Step};
    use ratatui::{backend::TestBackend, Terminal};
    use std::time::Instant;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|f| render_ui(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|cell| cell.symbol())
            .collect()
    }

    fn at_menu() -> App {
        let mut app = App::default();
        app.store.set_user_name("Ardi");
        app.store.set_avatar(Avatar::Rabbit);
        app.store.set_step(Step::Menu);
        app.on_tick(Instant::now());
        app
    }

    #[test]
    fn test_render_onboarding() {
        let mut app = App::default();
        app.type_name_char('B');
        app.type_name_char('u');
        let screen = draw(&app);
        assert!(screen.contains("Siapa namamu?"));
        assert!(screen.contains("Bu_"));
        assert!(screen.contains("Status"));
    }

    #[test]
    fn test_render_menu_lists_games() {
        let app = at_menu();
        let screen = draw(&app);
        assert!(screen.contains("Ardi"));
        assert!(screen.contains("Box Misteri"));
        assert!(screen.contains("Keranjang Angka"));
        assert!(screen.contains("Statistik Belajar"));
    }

    #[test]
    fn test_render_memory_board_hides_cards() {
        let now = Instant::now();
        let mut app = at_menu();
        app.open_from_menu(NavEvent::OpenMemoryGame, now);
        assert!(draw(&app).contains("Level 3 (4 pasang)"));

        app.start_memory_game(Level::Two, now);
        let screen = draw(&app);
        assert!(screen.contains("Percobaan 0"));
        assert!(screen.contains("Pasangan 0/3"));
        assert!(!screen.contains("Beruang"));
    }

    #[test]
    fn test_render_counting_question() {
        let mut app = at_menu();
        app.open_from_menu(NavEvent::OpenCountingGame, Instant::now());
        let screen = draw(&app);
        assert!(screen.contains("Soal 1/4"));
        assert!(screen.contains("Kandang"));
        assert!(screen.contains("Masukkan 2 singa"));
    }

    #[test]
    fn test_render_summary_and_stats() {
        let mut app = at_menu();
        app.store.add_history(NewHistoryEntry {
            game: GameKind::Game2,
            score: 80,
            time_elapsed: 65,
        });
        app.store.set_last_played_game(GameKind::Game2);
        app.store.set_step(Step::Summary);
        app.on_tick(Instant::now());
        let screen = draw(&app);
        assert!(screen.contains("Skor: 80"));
        assert!(screen.contains("Waktu: 1:05"));

        app.store.set_step(Step::Stats);
        app.on_tick(Instant::now());
        let screen = draw(&app);
        assert!(screen.contains("1 kali"));
        assert!(screen.contains("1:05"));
    }

    #[test]
    fn test_status_message_replaces_hints() {
        let mut app = at_menu();
        assert!(draw(&app).contains("q: keluar"));
        app.toggle_sound();
        let screen = draw(&app);
        assert!(screen.contains("Suara: mati"));
        assert!(!screen.contains("q: keluar"));
    }

    #[test]
    fn test_header_shows_music_state() {
        let mut app = at_menu();
        assert!(draw(&app).contains("Musik: mati (F3)"));
        app.toggle_music();
        app.status_message = None;
        assert!(draw(&app).contains("Musik: nyala (F3)"));
    }
}
