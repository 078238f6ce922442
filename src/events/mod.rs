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

//! Application logic and event handling.
//!
//! This module acts as the central hub for the "Controller" logic of the
//! application. It organizes how inputs and background results are
//! translated into game state changes.
//!
//! # Organization
//!
//! * [`handlers`]: Applies game transitions and requests photo loads.
//! * [`key_handlers`]: Maps key presses to handlers for the current phase.

mod handlers;
mod key_handlers;

use handlers::*;
use key_handlers::process_key_event;

use std::io::Stdout;

use anyhow::Result;
use crossterm::event::KeyEvent;
use ratatui::{Terminal, prelude::CrosstermBackend};

use crate::{
    App,
    error::ImageLoadFailure,
    game::photo::LoadedPhoto,
    render::draw,
};

#[derive(Debug)]
pub(crate) enum AppEvent {
    Key(KeyEvent),

    PhotoLoaded {
        session: u64,
        round: usize,
        photo: LoadedPhoto,
    },
    PhotoLoadFailed {
        session: u64,
        round: usize,
        failure: ImageLoadFailure,
    },

    Tick,

    ExitApplication,

    Error(String),
}

/// Runs the main application loop, handling events and rendering the UI in the
/// terminal.
///
/// This function loops until a 'quit' event is received or the event channel
/// is closed.
pub(crate) fn process_events(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
) -> Result<()> {
    while let Ok(event) = app.event_rx.recv() {
        if matches!(event, AppEvent::ExitApplication) {
            break;
        }

        handle_event(app, event)?;

        terminal.draw(|f| draw(f, app))?;
    }
    Ok(())
}

fn handle_event(app: &mut App, event: AppEvent) -> Result<()> {
    match event {
        AppEvent::Key(key) => process_key_event(app, key)?,
        AppEvent::PhotoLoaded {
            session,
            round,
            photo,
        } => handle_photo_loaded(app, session, round, photo),
        AppEvent::PhotoLoadFailed {
            session,
            round,
            failure,
        } => handle_photo_load_failed(app, session, round, failure),
        AppEvent::Error(message) => handle_error(app, message),
        AppEvent::Tick | AppEvent::ExitApplication => {}
    }

    Ok(())
}
