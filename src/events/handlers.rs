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

use anyhow::Result;
use tracing::{debug, error, warn};

use crate::{
    App,
    error::ImageLoadFailure,
    game::{GameState, Phase, PhotoStatus, photo::LoadedPhoto, rounds::OPTION_COUNT},
    tasks::AppTask,
};

pub(super) fn handle_start_game(app: &mut App) -> Result<()> {
    let settings = app.config.game_settings();

    match GameState::start_game(&app.pool, &settings, &mut app.rng) {
        Ok(game) => {
            app.session += 1;
            app.game = game;
            app.selected_option = 0;
            app.notice = None;
            request_photo(app)?;
        }
        Err(e) => {
            warn!("Cannot start game: {}", e);
            app.notice = Some(format!("Cannot start: {e}"));
        }
    }

    Ok(())
}

pub(super) fn handle_move_selection(app: &mut App, forward: bool) {
    let step = if forward { 1 } else { OPTION_COUNT - 1 };
    app.selected_option = (app.selected_option + step) % OPTION_COUNT;
}

pub(super) fn handle_choose_option(app: &mut App, index: usize) {
    let Some(year) = app
        .game
        .current_round_view()
        .and_then(|view| view.options.get(index).copied())
    else {
        return;
    };

    app.selected_option = index;

    match app.game.submit_answer(year) {
        Ok(game) => app.game = game,
        Err(e) => debug!("Ignoring answer {}: {}", year, e),
    }
}

pub(super) fn handle_retry_photo(app: &mut App) -> Result<()> {
    if !matches!(photo_status(app), Some(PhotoStatus::Failed(_))) {
        return Ok(());
    }

    match app.game.retry_photo() {
        Ok(game) => {
            app.game = game;
            request_photo(app)?;
        }
        Err(e) => debug!("Ignoring retry: {}", e),
    }

    Ok(())
}

pub(super) fn handle_skip_round(app: &mut App) {
    match app.game.skip_round() {
        Ok(game) => app.game = game,
        Err(e) => debug!("Ignoring skip: {}", e),
    }
}

pub(super) fn handle_next_round(app: &mut App) -> Result<()> {
    match app.game.advance_round(&mut app.rng) {
        Ok(game) => {
            app.game = game;
            app.selected_option = 0;
            request_photo(app)?;
        }
        Err(e) => {
            error!("Cannot advance: {}", e);
            app.notice = Some(e.to_string());
        }
    }

    Ok(())
}

pub(super) fn handle_photo_loaded(app: &mut App, session: u64, round: usize, photo: LoadedPhoto) {
    if !awaiting_photo(app, session, round) {
        debug!("Ignoring stale photo {}", photo.path);
        return;
    }

    match app.game.photo_loaded(photo) {
        Ok(game) => app.game = game,
        Err(e) => debug!("Ignoring photo: {}", e),
    }
}

pub(super) fn handle_photo_load_failed(
    app: &mut App,
    session: u64,
    round: usize,
    failure: ImageLoadFailure,
) {
    if !awaiting_photo(app, session, round) {
        debug!("Ignoring stale failure for {}", failure.path);
        return;
    }

    match app.game.photo_failed(failure) {
        Ok(game) => app.game = game,
        Err(e) => debug!("Ignoring photo failure: {}", e),
    }
}

pub(super) fn handle_error(app: &mut App, message: String) {
    error!("{}", message);
    app.notice = Some(message);
}

/// Asks the task worker for the current round's photo.
fn request_photo(app: &mut App) -> Result<()> {
    if let Some(view) = app.game.current_round_view() {
        app.task_tx.send(AppTask::LoadPhoto {
            session: app.session,
            round: view.number - 1,
            path: view.photo.path.clone(),
        })?;
    }

    Ok(())
}

fn photo_status(app: &App) -> Option<&PhotoStatus> {
    app.game.current_round_view().map(|view| view.status)
}

/// Whether a load result for `session` and `round` is the one the game is
/// waiting for.
fn awaiting_photo(app: &App, session: u64, round: usize) -> bool {
    session == app.session
        && app.game.phase() == Phase::RoundActive
        && app.game.round_index() == round
        && matches!(photo_status(app), Some(PhotoStatus::Loading))
}
