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

//! User interface rendering logic.
//!
//! This module handles the translation of the [`App`] state into visual
//! widgets using the `ratatui` framework. It is responsible for layout
//! management, widget styling, and terminal frame composition.
//!
//! # Rendering Pipeline
//!
//! The primary entry point is the [`draw`] function, which is called on every
//! terminal tick or state change. The body of the screen depends on the game
//! phase: the landing screen before a game, the round screen while playing,
//! and the score screen at the end.

mod icons;
mod landing;
mod round;
mod score;

use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::{
    App,
    game::{Phase, PhotoStatus},
    render::icons::ICON_CAMERA,
};

/// Renders the user interface to the terminal frame.
///
/// # Arguments
///
/// * `f` - The current terminal frame used for drawing.
/// * `app` - The application state.
pub(crate) fn draw(f: &mut Frame, app: &App) {
    let area = f.area();

    f.render_widget(Block::default().bg(app.theme.background_colour), area);

    // Outer layout: header, main, footer
    let outer = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, outer[0], app);

    match app.game.phase() {
        Phase::NotStarted => landing::draw_landing(f, outer[1], app),
        Phase::RoundActive | Phase::RoundResolved => round::draw_round(f, outer[1], app),
        Phase::Finished => score::draw_score(f, outer[1], app),
    }

    draw_footer(f, outer[2], app);
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(Style::default().fg(app.theme.border_colour))
        .padding(Padding::horizontal(1));

    let inner_area = block.inner(area);
    f.render_widget(block, area);

    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(30)])
        .split(inner_area);

    let title = Line::from(vec![
        Span::raw(format!("{} ", ICON_CAMERA)),
        Span::styled("Guess the Year", Style::default().add_modifier(Modifier::BOLD))
            .fg(app.theme.accent_colour),
    ]);
    f.render_widget(Paragraph::new(title), chunks[0]);

    if let Some(view) = app.game.current_round_view() {
        let progress = Line::from(vec![
            Span::raw(format!("Round {} / {}", view.number, view.total)).fg(app.theme.text_colour),
            Span::raw("   Score ").fg(app.theme.muted_colour),
            Span::styled(view.score.to_string(), Style::default().add_modifier(Modifier::BOLD))
                .fg(app.theme.accent_colour),
        ]);
        f.render_widget(
            Paragraph::new(progress).alignment(Alignment::Right),
            chunks[1],
        );
    }
}

/// Status line: a pending notice if there is one, otherwise the keys that
/// do something right now.
fn draw_footer(f: &mut Frame, area: Rect, app: &App) {
    let line = match &app.notice {
        Some(notice) => Line::from(notice.as_str()).fg(app.theme.wrong_colour),
        None => Line::from(key_hints(app)).fg(app.theme.muted_colour),
    };

    let paragraph = Paragraph::new(line).block(Block::default().padding(Padding::horizontal(1)));
    f.render_widget(paragraph, area);
}

fn key_hints(app: &App) -> &'static str {
    match app.game.phase() {
        Phase::NotStarted => "Enter start  q quit",
        Phase::Finished => "Enter play again  q quit",
        Phase::RoundResolved => "Enter next  q quit",
        Phase::RoundActive => match app.game.current_round_view().map(|view| view.status) {
            Some(PhotoStatus::Failed(_)) => "r retry  s skip  q quit",
            _ => "1-4 answer  \u{2191}\u{2193} select  Enter confirm  q quit",
        },
    }
}
