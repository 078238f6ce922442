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

//! Render the screen shown before the first game.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph, Wrap},
};

use crate::{App, game::TOTAL_ROUNDS};

pub(crate) fn draw_landing(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Guess the Year",
            Style::default().add_modifier(Modifier::BOLD),
        ))
        .fg(theme.accent_colour),
        Line::from(""),
        Line::from(format!(
            "You will be shown {TOTAL_ROUNDS} photos. Can you tell which year each one was taken?"
        ))
        .fg(theme.text_colour),
        Line::from(""),
        Line::from(format!("{} photos available", app.pool.len())).fg(theme.muted_colour),
        Line::from(""),
    ];

    if !app.pool.is_empty() {
        lines.push(Line::from(vec![
            Span::raw("Press "),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD))
                .fg(theme.accent_colour),
            Span::raw(" to start"),
        ]));
    }

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::new(2, 2, 1, 1)));

    f.render_widget(paragraph, area);
}
