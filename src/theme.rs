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

//! Visual styling and color configuration for the TUI.

use ratatui::style::Color;

#[derive(Clone, Copy)]
pub(crate) struct Theme {
    pub(crate) background_colour: Color,
    pub(crate) accent_colour: Color,
    pub(crate) border_colour: Color,
    pub(crate) text_colour: Color,
    pub(crate) muted_colour: Color,

    pub(crate) highlight_bg: Color,
    pub(crate) correct_colour: Color,
    pub(crate) wrong_colour: Color,
}

impl Default for Theme {
    fn default() -> Self {
        Self::default_theme()
    }
}

impl Theme {
    pub(crate) const fn default_theme() -> Self {
        Self {
            background_colour: Color::Rgb(24, 28, 40),
            accent_colour: Color::Rgb(250, 189, 47),
            border_colour: Color::Rgb(102, 102, 102),
            text_colour: Color::Rgb(255, 255, 255),
            muted_colour: Color::Rgb(162, 161, 166),

            highlight_bg: Color::Rgb(54, 60, 84),
            correct_colour: Color::Rgb(120, 200, 120),
            wrong_colour: Color::Rgb(230, 100, 100),
        }
    }
}
