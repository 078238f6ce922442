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

//! Terminal emulator styling.
//!
//! The background colour is changed with OSC (Operating System Command)
//! escape sequences. Most modern terminals (XTerm, iTerm2, Alacritty, Kitty)
//! support them; others ignore them.

use std::io::{self, Write};

use ratatui::style::Color;

/// CSS-style hexadecimal form of an RGB colour.
///
/// Returns `None` for palette colours, which have no fixed RGB value.
pub(crate) fn to_hex(colour: Color) -> Option<String> {
    match colour {
        Color::Rgb(r, g, b) => Some(format!("#{:02x}{:02x}{:02x}", r, g, b)),
        _ => None,
    }
}

/// Sets the terminal background colour (OSC 11).
///
/// Palette colours are ignored.
pub(crate) fn set_background(colour: Color) -> io::Result<()> {
    let Some(hex) = to_hex(colour) else {
        return Ok(());
    };

    let mut stdout = io::stdout();
    write!(stdout, "\x1b]11;{}\x07", hex)?;
    stdout.flush()
}

/// Restores the user's own terminal background (OSC 111).
pub(crate) fn reset_background() -> io::Result<()> {
    let mut stdout = io::stdout();
    write!(stdout, "\x1b]111\x07")?;
    stdout.flush()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hex_only_for_rgb() {
        assert_eq!(to_hex(Color::Rgb(24, 28, 255)).as_deref(), Some("#181cff"));
        assert_eq!(to_hex(Color::Red), None);
    }
}
