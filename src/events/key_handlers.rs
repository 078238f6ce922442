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
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::handlers::*;
use crate::{App, events::AppEvent, game::Phase};

/// Maps keyboard input to game actions.
///
/// Quitting works everywhere. Other keys depend on the game phase:
///
/// * **Landing and final score**: Enter, Space or `p` starts a game.
/// * **Round in play**: `1` to `4` answer directly, the arrow keys (or
///   `h`/`j`/`k`/`l`) move the highlight and Enter answers with it. When the
///   photo failed to load, `r` retries and `s` skips the round.
/// * **Round resolved**: Enter, Space or `n` moves to the next round.
///
/// # Errors
///
/// Returns an error if a task fails to send to the background worker.
pub(super) fn process_key_event(app: &mut App, key: KeyEvent) -> Result<()> {
    if key.kind != KeyEventKind::Press {
        return Ok(());
    }

    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Esc, _) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            return Ok(());
        }
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.event_tx.send(AppEvent::ExitApplication)?;
            return Ok(());
        }
        _ => {}
    }

    match app.game.phase() {
        Phase::NotStarted | Phase::Finished => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('p') => handle_start_game(app)?,
            _ => {}
        },

        Phase::RoundActive => match key.code {
            KeyCode::Char(c @ '1'..='4') => {
                let index = c as usize - '1' as usize;
                handle_choose_option(app, index);
            }

            // Navigation: Down / Right / j / l
            KeyCode::Down | KeyCode::Right | KeyCode::Char('j') | KeyCode::Char('l') => {
                handle_move_selection(app, true)
            }
            // Navigation: Up / Left / k / h
            KeyCode::Up | KeyCode::Left | KeyCode::Char('k') | KeyCode::Char('h') => {
                handle_move_selection(app, false)
            }

            KeyCode::Enter | KeyCode::Char(' ') => {
                let index = app.selected_option;
                handle_choose_option(app, index);
            }

            KeyCode::Char('r') => handle_retry_photo(app)?,
            KeyCode::Char('s') => handle_skip_round(app),

            _ => {}
        },

        Phase::RoundResolved => match key.code {
            KeyCode::Enter | KeyCode::Char(' ') | KeyCode::Char('n') => handle_next_round(app)?,
            _ => {}
        },
    }

    Ok(())
}
