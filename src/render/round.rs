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

//! Render a round: the photo, the year options and, once answered, the
//! result.
//!
//! Photos are not drawn in the terminal. The panel reports which file was
//! loaded, or every file name that was tried if none could be.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Padding, Paragraph, Wrap},
};

use crate::{
    App,
    game::{Answer, PhotoStatus, RoundView},
    render::icons::{ICON_CORRECT, ICON_LOADING, ICON_SELECTED, ICON_WRONG},
    theme::Theme,
    util::format::format_size,
};

pub(crate) fn draw_round(f: &mut Frame, area: Rect, app: &App) {
    let Some(view) = app.game.current_round_view() else {
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(5),
            Constraint::Length(6),
            Constraint::Length(3),
        ])
        .split(area);

    draw_photo(f, chunks[0], &view, &app.theme);
    draw_options(f, chunks[1], &view, app.selected_option, &app.theme);
    if let Some(answer) = view.answer {
        draw_result(f, chunks[2], &view, answer, &app.theme);
    }
}

fn draw_photo(f: &mut Frame, area: Rect, view: &RoundView, theme: &Theme) {
    let block = Block::default()
        .title(" Photo ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let recorded = &view.photo.path;
    let bold = Style::default().add_modifier(Modifier::BOLD);

    let lines = match view.status {
        PhotoStatus::Loading => vec![
            Line::from(format!("{} Loading {}...", ICON_LOADING, recorded)).fg(theme.muted_colour),
        ],
        PhotoStatus::Ready(photo) => {
            let mut lines = vec![
                Line::from(Span::styled(photo.path.as_str(), bold)).fg(theme.text_colour),
                Line::from(format!("{}, {}", photo.mime_type, format_size(photo.size)))
                    .fg(theme.muted_colour),
            ];
            if photo.path != *recorded {
                lines.push(Line::from(format!("(listed as {})", recorded)).fg(theme.muted_colour));
            }
            lines
        }
        PhotoStatus::Failed(failure) => {
            let mut lines = vec![
                Line::from(Span::styled(format!("Could not load {}", failure.path), bold))
                    .fg(theme.wrong_colour),
                Line::from("Tried:").fg(theme.muted_colour),
            ];
            lines.extend(
                failure
                    .attempted
                    .iter()
                    .map(|path| Line::from(format!("  {}", path)).fg(theme.muted_colour)),
            );
            lines.push(Line::from(""));
            lines.push(Line::from("Press r to retry or s to skip this round").fg(theme.text_colour));
            lines
        }
    };

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(block);
    f.render_widget(paragraph, area);
}

fn draw_options(f: &mut Frame, area: Rect, view: &RoundView, selected: usize, theme: &Theme) {
    let block = Block::default()
        .title(" What year was this taken? ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(theme.border_colour))
        .padding(Padding::horizontal(1));

    let correct_year = view.photo.year;

    let lines: Vec<Line> = view
        .options
        .iter()
        .enumerate()
        .map(|(idx, &year)| {
            let (marker, colour, bg) = match view.answer {
                None if idx == selected => (ICON_SELECTED, theme.accent_colour, theme.highlight_bg),
                None => (" ", theme.text_colour, Color::Reset),
                Some(_) if year == correct_year => (ICON_CORRECT, theme.correct_colour, Color::Reset),
                Some(Answer {
                    selected: Some(chosen),
                    ..
                }) if chosen == year => (ICON_WRONG, theme.wrong_colour, Color::Reset),
                Some(_) => (" ", theme.muted_colour, Color::Reset),
            };

            Line::from(vec![
                Span::raw(format!("{} [{}] ", marker, idx + 1)),
                Span::styled(year.to_string(), Style::default().add_modifier(Modifier::BOLD)),
            ])
            .style(Style::default().fg(colour).bg(bg))
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn draw_result(f: &mut Frame, area: Rect, view: &RoundView, answer: Answer, theme: &Theme) {
    let (verdict, colour) = match answer {
        Answer { correct: true, .. } => ("Correct!", theme.correct_colour),
        Answer { selected: None, .. } => ("Skipped", theme.muted_colour),
        Answer { .. } => ("Not quite", theme.wrong_colour),
    };

    let lines = vec![
        Line::from(Span::styled(verdict, Style::default().add_modifier(Modifier::BOLD))).fg(colour),
        Line::from(format!("{} \u{2014} {}", view.photo.year, view.photo.caption))
            .fg(theme.text_colour),
    ];

    let paragraph = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::horizontal(1)));
    f.render_widget(paragraph, area);
}
