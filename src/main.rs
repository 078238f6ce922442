// Copyright (C) 2026  Caprica Software Limited
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU General Public License for more details.
//
// You should have received a copy of the GNU General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! # Photo Year Quiz.
//!
//! A terminal quiz that shows a photo and asks which year it was taken, and
//! the tooling that keeps the quiz's photo listing in step with the photo
//! directory.
//!
//! The quiz coordinates a TUI frontend built with `ratatui` and a background
//! processing layer:
//!
//! * The **Main Thread** manages the terminal lifecycle, owns the game state
//!   and renders the UI.
//! * A **Task Worker** loads photos from disk, trying alternative file names
//!   when the recorded one is missing.
//! * **Event Loops** capture user input and system ticks to drive the UI
//!   state.
//!
//! ## Architecture
//!
//! The application follows a strict setup-run-teardown pattern to ensure the
//! terminal state is preserved even in the event of a crash. Communication
//! between the UI and background workers is handled via `std::sync::mpsc`
//! channels.
//!
//! The `regenerate` and `watch` subcommands do not use the terminal UI, see
//! [`sync`].

mod cli;
mod config;
mod error;
mod events;
mod game;
mod logging;
mod model;
mod render;
mod sync;
mod tasks;
mod theme;
mod util;

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{
    event::{self},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use rand::rngs::ThreadRng;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::{
    io::{self},
    sync::mpsc::{self, Receiver, Sender},
    thread,
    time::Duration,
};
use tracing::{info, warn};

use crate::{
    cli::{Cli, Mode},
    config::AppConfig,
    events::{AppEvent, process_events},
    game::GameState,
    model::PhotoRecord,
    sync::store::ListingStore,
    tasks::AppTask,
    theme::Theme,
};

/// Application state.
struct App {
    pub config: AppConfig,

    pub theme: Theme,

    pub event_tx: Sender<AppEvent>,
    pub event_rx: Receiver<AppEvent>,

    pub task_tx: Sender<AppTask>,

    /// Every photo in the listing, read once at start-up.
    pub pool: Vec<PhotoRecord>,
    pub game: GameState,
    pub rng: ThreadRng,

    /// Incremented on every new game, tags photo load requests.
    pub session: u64,
    /// Index of the highlighted option in the current round.
    pub selected_option: usize,
    /// Message shown in the status line, if any.
    pub notice: Option<String>,
}

impl App {
    /// Create a new instance of application state.
    pub fn new(config: AppConfig, pool: Vec<PhotoRecord>, task_tx: Sender<AppTask>) -> Self {
        let (event_tx, event_rx) = mpsc::channel();

        let notice = pool.is_empty().then(|| {
            format!(
                "No photos found. Add photos to {}/ and run `photoquiz regenerate`.",
                config.photos_dir
            )
        });

        Self {
            config,
            theme: Theme::default(),
            event_tx,
            event_rx,
            task_tx,
            pool,
            game: GameState::new(),
            rng: rand::rng(),
            session: 0,
            selected_option: 0,
            notice,
        }
    }
}

/// The entry point of the application.
///
/// Loads the configuration, applies command line overrides and runs the
/// requested mode, returning an error if any part of the execution fails.
fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = config::load_config();
    cli.apply(&mut config);

    match cli.mode() {
        Mode::Play => play(config),
        Mode::Regenerate => {
            logging::init_stderr();
            sync::regenerate(&config)
        }
        Mode::Watch { .. } => {
            logging::init_stderr();
            sync::watch::watch(&config, config.watch_strategy)
        }
    }
}

/// Runs the quiz in the terminal.
fn play(config: AppConfig) -> Result<()> {
    logging::init_file(config.log_file.as_deref())?;

    let pool = load_pool(&config);

    let (task_tx, task_rx) = mpsc::channel();

    let mut app = App::new(config, pool, task_tx);

    let mut terminal = setup_terminal(&app)?;
    let res = run(&mut terminal, &mut app, task_rx);
    restore_terminal(&mut terminal);

    res.context("Application error occurred")
}

/// Reads the photo listing the quiz draws from.
///
/// A missing or unreadable listing leaves the quiz with no photos rather
/// than failing.
fn load_pool(config: &AppConfig) -> Vec<PhotoRecord> {
    let store = ListingStore::new(&config.listing_file, config.src_prefix.clone());
    let listing = store.load();

    if listing.is_empty() {
        warn!("No photos found in {}", store.path().display());
    } else {
        info!("Loaded {} photos from {}", listing.len(), store.path().display());
    }

    listing.into_records()
}

/// Switches to the quiz screen: themed background, raw keyboard input and the
/// alternate screen.
///
/// # Errors
///
/// Fails if raw mode or the alternate screen is unavailable, for example
/// when stdout is not a terminal.
fn setup_terminal(app: &App) -> Result<Terminal<CrosstermBackend<io::Stdout>>> {
    // Paint the whole window so the margins match the theme.
    util::term::set_background(app.theme.background_colour).ok();

    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;

    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend).context("Failed to create terminal")?;

    Ok(terminal)
}

/// Puts the shell's terminal back after the quiz exits.
///
/// Runs on every exit path, so each step is attempted even if an earlier one
/// fails.
fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) {
    disable_raw_mode().ok();
    execute!(terminal.backend_mut(), LeaveAlternateScreen).ok();
    util::term::reset_background().ok();
    terminal.show_cursor().ok();
}

/// Runs the quiz until the player quits.
///
/// Photos load on a task worker thread. Key presses and redraw ticks arrive
/// from their own threads as [`AppEvent`]s.
///
/// # Errors
///
/// Fails if drawing or event handling fails.
fn run(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    task_rx: Receiver<AppTask>,
) -> Result<()> {
    let task_event_tx = app.event_tx.clone();
    tasks::spawn_task_worker(&app.config, task_rx, task_event_tx);

    // Spawn a thread to translate raw key events to application events.
    let tx_keys = app.event_tx.clone();
    thread::spawn(move || {
        loop {
            if let Ok(event::Event::Key(key)) = event::read() {
                if tx_keys.send(AppEvent::Key(key)).is_err() {
                    break;
                }
            }
        }
    });

    // Ticks bound how long the screen can go without a redraw.
    let tx_tick = app.event_tx.clone();
    thread::spawn(move || {
        while tx_tick.send(AppEvent::Tick).is_ok() {
            thread::sleep(Duration::from_millis(250));
        }
    });

    // Draw the landing screen before the first event arrives
    terminal.draw(|f| render::draw(f, app))?;

    process_events(terminal, app)
}
