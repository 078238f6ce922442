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

//! Render the end of game summary.

use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::{Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Padding, Paragraph},
};

use crate::{App, game::SummaryTier, render::icons::ICON_TROPHY};

pub(crate) fn draw_score(f: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.game.final_summary() else {
        return;
    };
    let theme = &app.theme;

    let colour = match summary.tier {
        SummaryTier::Top => theme.accent_colour,
        SummaryTier::Mid => theme.correct_colour,
        SummaryTier::Low => theme.muted_colour,
    };

    let lines = vec![
        Line::from(""),
        Line::from(format!("{} Game over", ICON_TROPHY)).fg(theme.text_colour),
        Line::from(""),
        Line::from(vec![
            Span::styled(
                summary.score.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            )
            .fg(colour),
            Span::raw(format!(" / {}", summary.total)).fg(theme.text_colour),
        ]),
        Line::from(""),
        Line::from(summary.message()).fg(colour),
        Line::from(""),
        Line::from("Press Enter to play again").fg(theme.muted_colour),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().padding(Padding::new(2, 2, 1, 1)));

    f.render_widget(paragraph, area);
}
