//! Ceria - Dunia Hewan Ceria
//!
//! Terminal front end: parses the command line, loads the configuration,
//! starts the audio worker and runs the event loop until the player quits.

use std::io;
use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use tracing::{info, warn};

use ceria::application::App;
use ceria::infrastructure::{
    init_logging, spawn_audio_worker, Config, SessionReport, SilentSink, TerminalBell,
};
use ceria::presentation::{render_ui, InputHandler};

#[derive(Parser, Debug)]
#[command(name = "ceria", version, about = "Dunia Hewan Ceria: learning games for kids")]
struct Cli {
    /// Config file (defaults to the per-user config.toml)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Append logs to this file
    #[arg(long)]
    log_file: Option<PathBuf>,

    /// Increase verbosity (-v debug, -vv trace with targets)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Start with sound off
    #[arg(long)]
    muted: bool,

    /// Write a JSON learning report here on exit
    #[arg(long)]
    report: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.log_file.as_deref()).context("failed to open log file")?;
    let config = Config::load(cli.config.as_deref())?;

    let sound = config.sound.enabled && !cli.muted;
    let (audio, worker) = if sound {
        spawn_audio_worker(TerminalBell::stderr())
    } else {
        spawn_audio_worker(SilentSink)
    };

    let mut app = App::new(audio, config.timings(), config.speech.clone());
    app.sound_enabled = sound;
    if sound && config.sound.music {
        app.toggle_music();
        app.status_message = None;
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app, config.tick());

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Some(path) = &cli.report {
        SessionReport::from_session(app.store.session())
            .write_to(path)
            .with_context(|| format!("failed to write report to {}", path.display()))?;
    }

    // The worker exits once the last sender is gone
    drop(app);
    if worker.join().is_err() {
        warn!("audio worker panicked");
    }

    res.context("terminal error")?;
    info!("bye");
    Ok(())
}

/// Main application event loop.
///
/// Redraws, waits up to `tick` for a key, then lets the mounted screen's
/// timers fire. Stops once the app asks to quit.
fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    tick: Duration,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| render_ui(f, app))?;

        if event::poll(tick)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    InputHandler::handle_key_event(app, key.code, key.modifiers);
                }
            }
        }
        app.on_tick(Instant::now());

        if app.should_quit {
            return Ok(());
        }
    }
}

